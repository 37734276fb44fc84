//! `PCLMULQDQ`-accelerated carry-less multiplication for `x86`/`x86_64`.
//!
//! Callers must verify `pclmulqdq` support at runtime before invoking the
//! `unsafe` functions here.

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use core::ops::BitXor;

#[derive(Clone, Copy, Debug)]
pub struct Clmul(__m128i);

impl Clmul {
    #[inline]
    pub fn new(bytes: &[u8; 16]) -> Self {
        // SAFETY: `_mm_loadu_si128` has no alignment requirement and SSE2 is
        // baseline on x86_64.
        unsafe { Self(_mm_loadu_si128(bytes.as_ptr() as *const __m128i)) }
    }

    /// Carry-less multiplication returning `(low, high)` 128-bit halves of
    /// the 256-bit product.
    #[inline]
    #[target_feature(enable = "pclmulqdq", enable = "sse2")]
    pub unsafe fn clmul(self, other: Self) -> (Self, Self) {
        let t00 = _mm_clmulepi64_si128(self.0, other.0, 0x00);
        let t11 = _mm_clmulepi64_si128(self.0, other.0, 0x11);
        let mid = _mm_xor_si128(
            _mm_clmulepi64_si128(self.0, other.0, 0x01),
            _mm_clmulepi64_si128(self.0, other.0, 0x10),
        );

        let lo = _mm_xor_si128(t00, _mm_slli_si128(mid, 8));
        let hi = _mm_xor_si128(t11, _mm_srli_si128(mid, 8));

        (Self(lo), Self(hi))
    }
}

impl From<Clmul> for [u8; 16] {
    #[inline]
    fn from(value: Clmul) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        // SAFETY: `_mm_storeu_si128` has no alignment requirement.
        unsafe { _mm_storeu_si128(bytes.as_mut_ptr() as *mut __m128i, value.0) };
        bytes
    }
}

impl BitXor for Clmul {
    type Output = Self;

    #[inline]
    fn bitxor(self, other: Self) -> Self::Output {
        // SAFETY: SSE2 is verified by the caller of this backend.
        unsafe { Self(_mm_xor_si128(self.0, other.0)) }
    }
}

impl PartialEq for Clmul {
    fn eq(&self, other: &Self) -> bool {
        <[u8; 16]>::from(*self) == <[u8; 16]>::from(*other)
    }
}
