//! Runtime selection between the CPU-intrinsic and soft backends, plus the
//! reduction modulo the GCM polynomial shared by both.

use cfg_if::cfg_if;
use core::ops::{BitXor, BitXorAssign};

mod soft;

cfg_if! {
    if #[cfg(any(target_arch = "x86", target_arch = "x86_64"))] {
        #[path = "backend/pclmul.rs"]
        mod intrinsics;
        cpufeatures::new!(mul_intrinsics, "pclmulqdq");
    } else if #[cfg(target_arch = "aarch64")] {
        #[path = "backend/pmull.rs"]
        mod intrinsics;
        // `aes` implies PMULL.
        cpufeatures::new!(mul_intrinsics, "aes");
    }
}

cfg_if! {
    if #[cfg(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64"))] {
        /// Carry-less multiplication of 128-bit operands.
        #[derive(Clone, Copy)]
        pub struct Clmul {
            inner: Inner,
            token: mul_intrinsics::InitToken,
        }

        #[derive(Clone, Copy)]
        union Inner {
            intrinsics: intrinsics::Clmul,
            soft: soft::Clmul,
        }

        impl Clmul {
            pub fn new(bytes: &[u8; 16]) -> Self {
                let (token, has_intrinsics) = mul_intrinsics::init_get();

                let inner = if has_intrinsics {
                    Inner {
                        intrinsics: intrinsics::Clmul::new(bytes),
                    }
                } else {
                    Inner {
                        soft: soft::Clmul::new(bytes),
                    }
                };

                Self { inner, token }
            }

            /// Carry-less multiplication, returning the low and high 128-bit
            /// halves of the 256-bit product.
            pub fn clmul(self, other: Self) -> (Self, Self) {
                // SAFETY: the token determines which union variant is live,
                // and the intrinsics are only invoked when the CPU supports
                // them.
                unsafe {
                    let (lo, hi) = if self.token.get() {
                        let (lo, hi) = self.inner.intrinsics.clmul(other.inner.intrinsics);
                        (Inner { intrinsics: lo }, Inner { intrinsics: hi })
                    } else {
                        let (lo, hi) = self.inner.soft.clmul(other.inner.soft);
                        (Inner { soft: lo }, Inner { soft: hi })
                    };

                    (
                        Self {
                            inner: lo,
                            token: self.token,
                        },
                        Self {
                            inner: hi,
                            token: self.token,
                        },
                    )
                }
            }

            fn to_bytes(self) -> [u8; 16] {
                // SAFETY: the token determines which union variant is live.
                unsafe {
                    if self.token.get() {
                        self.inner.intrinsics.into()
                    } else {
                        self.inner.soft.into()
                    }
                }
            }
        }

        impl BitXor for Clmul {
            type Output = Self;

            #[inline]
            fn bitxor(self, other: Self) -> Self::Output {
                // SAFETY: the token determines which union variant is live.
                unsafe {
                    let inner = if self.token.get() {
                        Inner {
                            intrinsics: self.inner.intrinsics ^ other.inner.intrinsics,
                        }
                    } else {
                        Inner {
                            soft: self.inner.soft ^ other.inner.soft,
                        }
                    };

                    Self {
                        inner,
                        token: self.token,
                    }
                }
            }
        }

        impl core::fmt::Debug for Clmul {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                // SAFETY: the token determines which union variant is live.
                unsafe {
                    if self.token.get() {
                        self.inner.intrinsics.fmt(f)
                    } else {
                        self.inner.soft.fmt(f)
                    }
                }
            }
        }
    } else {
        /// Carry-less multiplication of 128-bit operands.
        #[derive(Clone, Copy, Debug)]
        pub struct Clmul(soft::Clmul);

        impl Clmul {
            pub fn new(bytes: &[u8; 16]) -> Self {
                Self(soft::Clmul::new(bytes))
            }

            /// Carry-less multiplication, returning the low and high 128-bit
            /// halves of the 256-bit product.
            pub fn clmul(self, other: Self) -> (Self, Self) {
                let (lo, hi) = self.0.clmul(other.0);
                (Self(lo), Self(hi))
            }

            fn to_bytes(self) -> [u8; 16] {
                self.0.into()
            }
        }

        impl BitXor for Clmul {
            type Output = Self;

            #[inline]
            fn bitxor(self, other: Self) -> Self::Output {
                Self(self.0 ^ other.0)
            }
        }
    }
}

impl Clmul {
    /// Reduces a 256-bit carry-less product modulo the GCM polynomial
    /// `x^128 + x^7 + x^2 + x + 1`. `lo` and `hi` are the halves returned by
    /// [`Clmul::clmul`].
    ///
    /// Shift-based variant of the reduction from the Intel white paper
    /// "Carry-Less Multiplication Instruction and its Usage for Computing
    /// the GCM Mode", p. 16.
    pub fn reduce_gcm(lo: Self, hi: Self) -> Self {
        let lo = u128::from_le_bytes(lo.to_bytes());
        let hi = u128::from_le_bytes(hi.to_bytes());

        let x0 = lo as u64;
        let x1 = (lo >> 64) as u64;
        let x2 = hi as u64;
        let x3 = (hi >> 64) as u64;

        let d = x2 ^ (x3 >> 63) ^ (x3 >> 62) ^ (x3 >> 57);

        let e1 = (x3 << 1) | (d >> 63);
        let e0 = d << 1;
        let f1 = (x3 << 2) | (d >> 62);
        let f0 = d << 2;
        let g1 = (x3 << 7) | (d >> 57);
        let g0 = d << 7;

        let h1 = x3 ^ e1 ^ f1 ^ g1;
        let h0 = d ^ e0 ^ f0 ^ g0;

        let reduced = (((x1 ^ h1) as u128) << 64) | ((x0 ^ h0) as u128);

        Self::new(&reduced.to_le_bytes())
    }
}

impl From<Clmul> for [u8; 16] {
    #[inline]
    fn from(value: Clmul) -> [u8; 16] {
        value.to_bytes()
    }
}

impl BitXorAssign for Clmul {
    #[inline]
    fn bitxor_assign(&mut self, other: Self) {
        *self = *self ^ other;
    }
}

impl PartialEq for Clmul {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::{soft, Clmul};
    use rand::Rng;
    use rand_chacha::{rand_core::SeedableRng, ChaCha12Rng};

    #[test]
    fn backends_agree() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);

        for _ in 0..100 {
            let a: [u8; 16] = rng.gen();
            let b: [u8; 16] = rng.gen();

            let (lo, hi) = Clmul::new(&a).clmul(Clmul::new(&b));
            let (slo, shi) = soft::Clmul::new(&a).clmul(soft::Clmul::new(&b));

            assert_eq!(<[u8; 16]>::from(lo), <[u8; 16]>::from(slo));
            assert_eq!(<[u8; 16]>::from(hi), <[u8; 16]>::from(shi));

            let r = Clmul::reduce_gcm(lo, hi);
            let s = Clmul::reduce_gcm(Clmul::new(&slo.into()), Clmul::new(&shi.into()));
            assert_eq!(<[u8; 16]>::from(r), <[u8; 16]>::from(s));
        }
    }

    #[test]
    fn multiply_by_one() {
        let one = Clmul::new(&1u128.to_le_bytes());
        let x = Clmul::new(&0x0123_4567_89ab_cdef_u128.to_le_bytes());

        let (lo, hi) = x.clmul(one);
        assert_eq!(<[u8; 16]>::from(lo), 0x0123_4567_89ab_cdef_u128.to_le_bytes());
        assert_eq!(<[u8; 16]>::from(hi), [0u8; 16]);
    }
}
