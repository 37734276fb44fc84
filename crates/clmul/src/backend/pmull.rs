//! `PMULL`-accelerated carry-less multiplication for `aarch64`.
//!
//! Callers must verify support for the ARMv8 Cryptography Extensions at
//! runtime before invoking the `unsafe` functions here.

use core::arch::aarch64::*;
use core::ops::BitXor;

#[derive(Clone, Copy, Debug)]
pub struct Clmul(uint8x16_t);

impl Clmul {
    #[inline]
    pub fn new(bytes: &[u8; 16]) -> Self {
        // SAFETY: NEON loads are baseline on aarch64.
        unsafe { Self(vld1q_u8(bytes.as_ptr())) }
    }

    /// Carry-less multiplication returning `(low, high)` 128-bit halves of
    /// the 256-bit product.
    #[inline]
    #[target_feature(enable = "neon", enable = "aes")]
    pub unsafe fn clmul(self, other: Self) -> (Self, Self) {
        let a = vreinterpretq_u64_u8(self.0);
        let b = vreinterpretq_u64_u8(other.0);

        let a0 = vgetq_lane_u64::<0>(a);
        let a1 = vgetq_lane_u64::<1>(a);
        let b0 = vgetq_lane_u64::<0>(b);
        let b1 = vgetq_lane_u64::<1>(b);

        let t00 = vreinterpretq_u64_p128(vmull_p64(a0, b0));
        let t11 = vreinterpretq_u64_p128(vmull_p64(a1, b1));
        let mid = veorq_u64(
            vreinterpretq_u64_p128(vmull_p64(a1, b0)),
            vreinterpretq_u64_p128(vmull_p64(a0, b1)),
        );

        let zero = vdupq_n_u64(0);
        let mid_lo = vextq_u64::<1>(zero, mid);
        let mid_hi = vextq_u64::<1>(mid, zero);

        let lo = veorq_u64(t00, mid_lo);
        let hi = veorq_u64(t11, mid_hi);

        (
            Self(vreinterpretq_u8_u64(lo)),
            Self(vreinterpretq_u8_u64(hi)),
        )
    }
}

impl From<Clmul> for [u8; 16] {
    #[inline]
    fn from(value: Clmul) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        // SAFETY: NEON stores are baseline on aarch64.
        unsafe { vst1q_u8(bytes.as_mut_ptr(), value.0) };
        bytes
    }
}

impl BitXor for Clmul {
    type Output = Self;

    #[inline]
    fn bitxor(self, other: Self) -> Self::Output {
        // SAFETY: NEON is baseline on aarch64.
        unsafe { Self(veorq_u8(self.0, other.0)) }
    }
}

impl PartialEq for Clmul {
    fn eq(&self, other: &Self) -> bool {
        <[u8; 16]>::from(*self) == <[u8; 16]>::from(*other)
    }
}
