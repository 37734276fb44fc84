//! Portable carry-less multiplication.
//!
//! Multiplication of 64-bit limbs is performed with four masked integer
//! multiplications per limb product. Bits at positions congruent modulo 4
//! never produce carries into one another, so each partial product is exact
//! after masking. The high half of a limb product is obtained with the
//! bit-reversal identity `hi(a * b) = rev(rev(a) * rev(b)) >> 1`.

use core::ops::{BitXor, BitXorAssign};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clmul {
    lo: u64,
    hi: u64,
}

const M0: u64 = 0x1111_1111_1111_1111;
const M1: u64 = 0x2222_2222_2222_2222;
const M2: u64 = 0x4444_4444_4444_4444;
const M3: u64 = 0x8888_8888_8888_8888;

/// Low 64 bits of the carry-less product of `x` and `y`.
fn bmul64(x: u64, y: u64) -> u64 {
    let x0 = x & M0;
    let x1 = x & M1;
    let x2 = x & M2;
    let x3 = x & M3;
    let y0 = y & M0;
    let y1 = y & M1;
    let y2 = y & M2;
    let y3 = y & M3;

    let z0 = x0.wrapping_mul(y0) ^ x1.wrapping_mul(y3) ^ x2.wrapping_mul(y2) ^ x3.wrapping_mul(y1);
    let z1 = x0.wrapping_mul(y1) ^ x1.wrapping_mul(y0) ^ x2.wrapping_mul(y3) ^ x3.wrapping_mul(y2);
    let z2 = x0.wrapping_mul(y2) ^ x1.wrapping_mul(y1) ^ x2.wrapping_mul(y0) ^ x3.wrapping_mul(y3);
    let z3 = x0.wrapping_mul(y3) ^ x1.wrapping_mul(y2) ^ x2.wrapping_mul(y1) ^ x3.wrapping_mul(y0);

    (z0 & M0) | (z1 & M1) | (z2 & M2) | (z3 & M3)
}

/// High 64 bits of the carry-less product of `x` and `y`.
fn bmul64_high(x: u64, y: u64) -> u64 {
    bmul64(x.reverse_bits(), y.reverse_bits()).reverse_bits() >> 1
}

impl Clmul {
    pub fn new(bytes: &[u8; 16]) -> Self {
        let value = u128::from_le_bytes(*bytes);
        Self {
            lo: value as u64,
            hi: (value >> 64) as u64,
        }
    }

    /// Carry-less multiplication returning `(low, high)` 128-bit halves of
    /// the 256-bit product, computed with Karatsuba over the 64-bit limbs.
    pub fn clmul(self, other: Self) -> (Self, Self) {
        let l00 = bmul64(self.lo, other.lo);
        let h00 = bmul64_high(self.lo, other.lo);
        let l11 = bmul64(self.hi, other.hi);
        let h11 = bmul64_high(self.hi, other.hi);

        let am = self.lo ^ self.hi;
        let bm = other.lo ^ other.hi;
        let lm = bmul64(am, bm) ^ l00 ^ l11;
        let hm = bmul64_high(am, bm) ^ h00 ^ h11;

        (
            Self {
                lo: l00,
                hi: h00 ^ lm,
            },
            Self {
                lo: l11 ^ hm,
                hi: h11,
            },
        )
    }
}

impl From<Clmul> for [u8; 16] {
    #[inline]
    fn from(value: Clmul) -> [u8; 16] {
        (((value.hi as u128) << 64) | (value.lo as u128)).to_le_bytes()
    }
}

impl BitXor for Clmul {
    type Output = Self;

    #[inline]
    fn bitxor(self, other: Self) -> Self::Output {
        Self {
            lo: self.lo ^ other.lo,
            hi: self.hi ^ other.hi,
        }
    }
}

impl BitXorAssign for Clmul {
    #[inline]
    fn bitxor_assign(&mut self, other: Self) {
        self.lo ^= other.lo;
        self.hi ^= other.hi;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Bitwise schoolbook multiplication, the obviously-correct reference.
    fn slow_clmul(a: u128, b: u128) -> (u128, u128) {
        let mut lo = 0u128;
        let mut hi = 0u128;
        for i in 0..128 {
            if (b >> i) & 1 == 1 {
                lo ^= a << i;
                if i > 0 {
                    hi ^= a >> (128 - i);
                }
            }
        }
        (lo, hi)
    }

    #[test]
    fn matches_schoolbook() {
        use rand::Rng;
        use rand_chacha::{rand_core::SeedableRng, ChaCha12Rng};

        let mut rng = ChaCha12Rng::seed_from_u64(0);
        for _ in 0..100 {
            let a: u128 = rng.gen();
            let b: u128 = rng.gen();

            let (lo, hi) = Clmul::new(&a.to_le_bytes()).clmul(Clmul::new(&b.to_le_bytes()));
            let lo = u128::from_le_bytes(lo.into());
            let hi = u128::from_le_bytes(hi.into());

            assert_eq!((lo, hi), slow_clmul(a, b));
        }
    }
}
