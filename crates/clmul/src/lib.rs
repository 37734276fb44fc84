//! Carry-less multiplication of 128-bit operands.
//!
//! On `x86`/`x86_64` the `PCLMULQDQ` instruction is used when available, and
//! on `aarch64` the `PMULL` instruction; otherwise a portable constant-time
//! implementation based on the masked-integer-multiplication technique from
//! [BearSSL] is selected. The backend is chosen once at runtime.
//!
//! [BearSSL]: https://bearssl.org/constanttime.html

#![cfg_attr(not(test), no_std)]

mod backend;

pub use backend::Clmul;
