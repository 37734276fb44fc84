//! The 128-bit block, the universal unit of seeds, keys and correlations.

use bytemuck::{Pod, Zeroable};
use core::ops::{BitAnd, BitAndAssign, BitXor, BitXorAssign};
use itybity::{BitIterable, BitLength, FromBitIterator, GetBit, Lsb0, Msb0};
use rand::{distributions::Standard, prelude::Distribution, CryptoRng, Rng};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// A block of 128 bits.
#[repr(transparent)]
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable, Serialize, Deserialize,
)]
pub struct Block([u8; 16]);

impl Block {
    /// The length of a block in bytes.
    pub const LEN: usize = 16;
    /// A block with all bits set to 0.
    pub const ZERO: Self = Self([0; 16]);
    /// A block with all bits set to 1.
    pub const ONES: Self = Self([0xff; 16]);

    /// Creates a block from bytes.
    #[inline]
    pub fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Returns the byte representation of the block.
    #[inline]
    pub fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Generates a random block using the provided RNG.
    #[inline]
    pub fn random<R: Rng + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen())
    }

    /// Generates a vector of random blocks using the provided RNG.
    #[inline]
    pub fn random_vec<R: Rng + CryptoRng + ?Sized>(rng: &mut R, n: usize) -> Vec<Self> {
        (0..n).map(|_| Self::new(rng.gen())).collect()
    }

    /// Carry-less multiplication of two blocks, without reduction. Returns
    /// the low and high halves of the 256-bit product.
    #[inline]
    pub fn clmul(self, other: Self) -> (Self, Self) {
        let (lo, hi) = clmul::Clmul::new(&self.0).clmul(clmul::Clmul::new(&other.0));
        (Self::new(lo.into()), Self::new(hi.into()))
    }

    /// Reduces a 256-bit carry-less product modulo the GCM polynomial.
    #[inline]
    pub fn reduce(lo: Self, hi: Self) -> Self {
        let reduced = clmul::Clmul::reduce_gcm(clmul::Clmul::new(&lo.0), clmul::Clmul::new(&hi.0));
        Self::new(reduced.into())
    }

    /// Multiplication in GF(2^128).
    #[inline]
    pub fn gfmul(self, other: Self) -> Self {
        let (lo, hi) = self.clmul(other);
        Self::reduce(lo, hi)
    }

    /// Inner product of two block vectors in GF(2^128), reducing once at the
    /// end.
    #[inline]
    pub fn gf_dot(a: &[Block], b: &[Block]) -> Block {
        assert_eq!(a.len(), b.len());
        let (lo, hi) = a
            .iter()
            .zip(b)
            .fold((Block::ZERO, Block::ZERO), |(lo, hi), (x, y)| {
                let (plo, phi) = x.clmul(*y);
                (lo ^ plo, hi ^ phi)
            });
        Block::reduce(lo, hi)
    }
}

impl BitLength for Block {
    const BITS: usize = 128;
}

impl GetBit<Lsb0> for Block {
    fn get_bit(&self, index: usize) -> bool {
        GetBit::<Lsb0>::get_bit(&self.0[index / 8], index % 8)
    }
}

impl GetBit<Msb0> for Block {
    fn get_bit(&self, index: usize) -> bool {
        GetBit::<Msb0>::get_bit(&self.0[15 - (index / 8)], index % 8)
    }
}

impl BitIterable for Block {}

impl FromBitIterator for Block {
    fn from_lsb0_iter(iter: impl IntoIterator<Item = bool>) -> Self {
        Self::from(u128::from_lsb0_iter(iter))
    }

    fn from_msb0_iter(iter: impl IntoIterator<Item = bool>) -> Self {
        Self::from(u128::from_msb0_iter(iter))
    }
}

impl From<[u8; 16]> for Block {
    #[inline]
    fn from(bytes: [u8; 16]) -> Self {
        Self::new(bytes)
    }
}

impl From<u128> for Block {
    #[inline]
    fn from(value: u128) -> Self {
        Self::new(value.to_le_bytes())
    }
}

impl From<Block> for [u8; 16] {
    #[inline]
    fn from(block: Block) -> Self {
        block.0
    }
}

impl From<Block> for u128 {
    #[inline]
    fn from(block: Block) -> Self {
        u128::from_le_bytes(block.0)
    }
}

impl<'a> TryFrom<&'a [u8]> for Block {
    type Error = <[u8; 16] as TryFrom<&'a [u8]>>::Error;

    fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
        <[u8; 16]>::try_from(value).map(Self::from)
    }
}

impl BitXor for Block {
    type Output = Self;

    #[inline]
    fn bitxor(self, other: Self) -> Self::Output {
        Self(core::array::from_fn(|i| self.0[i] ^ other.0[i]))
    }
}

impl BitXorAssign for Block {
    #[inline]
    fn bitxor_assign(&mut self, other: Self) {
        *self = *self ^ other;
    }
}

impl BitAnd for Block {
    type Output = Self;

    #[inline]
    fn bitand(self, other: Self) -> Self::Output {
        Self(core::array::from_fn(|i| self.0[i] & other.0[i]))
    }
}

impl BitAndAssign for Block {
    #[inline]
    fn bitand_assign(&mut self, other: Self) {
        *self = *self & other;
    }
}

impl AsMut<[u8]> for Block {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl Distribution<Block> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Block {
        Block::new(rng.gen())
    }
}

impl Zeroize for Block {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itybity::ToBits;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn gfmul_commutes() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);

        for _ in 0..50 {
            let a = Block::random(&mut rng);
            let b = Block::random(&mut rng);
            assert_eq!(a.gfmul(b), b.gfmul(a));
        }
    }

    #[test]
    fn gfmul_distributes_over_xor() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);

        for _ in 0..50 {
            let a = Block::random(&mut rng);
            let b = Block::random(&mut rng);
            let c = Block::random(&mut rng);
            assert_eq!(a.gfmul(b ^ c), a.gfmul(b) ^ a.gfmul(c));
        }
    }

    #[test]
    fn gf_dot_matches_pairwise() {
        let mut rng = ChaCha12Rng::seed_from_u64(2);

        let a = Block::random_vec(&mut rng, 100);
        let b = Block::random_vec(&mut rng, 100);

        let expected = a
            .iter()
            .zip(&b)
            .fold(Block::ZERO, |acc, (x, y)| acc ^ x.gfmul(*y));

        assert_eq!(Block::gf_dot(&a, &b), expected);
    }

    #[test]
    fn bit_roundtrip() {
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let a = Block::random(&mut rng);

        let bits: Vec<bool> = a.iter_lsb0().collect();
        assert_eq!(bits.len(), 128);
        assert_eq!(Block::from_lsb0_iter(bits), a);
    }
}
