//! AES-based primitives: the fixed-key tweakable correlation-robust hash and
//! a keyed encryptor usable as a PRF.

use aes::{Aes128, Aes128Enc};
use cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use once_cell::sync::Lazy;

use crate::Block;

/// The fixed AES key (an arbitrary constant).
pub const FIXED_KEY: [u8; 16] = [
    0x1b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f,
    0x3c,
];

/// Fixed-key AES cipher.
pub static FIXED_KEY_AES: Lazy<FixedKeyAes> = Lazy::new(|| FixedKeyAes {
    aes: Aes128::new_from_slice(&FIXED_KEY).unwrap(),
});

/// Fixed-key AES cipher.
pub struct FixedKeyAes {
    aes: Aes128,
}

impl FixedKeyAes {
    /// Tweakable circular correlation-robust hash function instantiated with
    /// fixed-key AES: `pi(pi(x) ^ tweak) ^ pi(x)`.
    ///
    /// See <https://eprint.iacr.org/2019/074> (Section 7.4).
    #[inline]
    pub fn tccr(&self, tweak: Block, block: Block) -> Block {
        let mut h1 = GenericArray::from(block.to_bytes());
        self.aes.encrypt_block(&mut h1);
        let h1 = Block::new(h1.into());

        let mut h2 = GenericArray::from((h1 ^ tweak).to_bytes());
        self.aes.encrypt_block(&mut h2);

        Block::new(h2.into()) ^ h1
    }

    /// Applies [`FixedKeyAes::tccr`] to `N` blocks.
    #[inline]
    pub fn tccr_many<const N: usize>(&self, tweaks: &[Block; N], blocks: &mut [Block; N]) {
        for (block, tweak) in blocks.iter_mut().zip(tweaks) {
            *block = self.tccr(*tweak, *block);
        }
    }
}

/// A keyed AES encryptor.
///
/// Doubles as the keyed PRF of the consistency check: AES applied to a
/// block-encoded input is indistinguishable from a random function for the
/// input volumes at play.
#[derive(Clone)]
pub struct AesEncryptor(Aes128Enc);

opaque_debug::implement!(AesEncryptor);

impl AesEncryptor {
    /// Creates an encryptor keyed with `key`.
    #[inline]
    pub fn new(key: Block) -> Self {
        Self(Aes128Enc::new_from_slice(&key.to_bytes()).unwrap())
    }

    /// Encrypts a block.
    #[inline]
    pub fn encrypt_block(&self, block: Block) -> Block {
        let mut ctxt = GenericArray::from(block.to_bytes());
        self.0.encrypt_block(&mut ctxt);
        Block::new(ctxt.into())
    }

    /// Encrypts a slice of blocks in place.
    pub fn encrypt_blocks(&self, blocks: &mut [Block]) {
        for block in blocks.iter_mut() {
            *block = self.encrypt_block(*block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aes_vector() {
        // FIPS-197 appendix C.1 style check against the `aes` crate itself.
        let key = Block::new([
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f,
        ]);
        let pt = Block::new([
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ]);
        let expected = Block::new([
            0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4,
            0xc5, 0x5a,
        ]);

        assert_eq!(AesEncryptor::new(key).encrypt_block(pt), expected);
    }

    #[test]
    fn tccr_depends_on_tweak() {
        let x = Block::ONES;
        let h0 = FIXED_KEY_AES.tccr(Block::from(0u128), x);
        let h1 = FIXED_KEY_AES.tccr(Block::from(1u128), x);
        assert_ne!(h0, h1);
    }

    #[test]
    fn tccr_many_matches_single() {
        let tweaks = [Block::from(1u128), Block::from(2u128)];
        let mut blocks = [Block::ONES, Block::ZERO];
        let expected = [
            FIXED_KEY_AES.tccr(tweaks[0], blocks[0]),
            FIXED_KEY_AES.tccr(tweaks[1], blocks[1]),
        ];

        FIXED_KEY_AES.tccr_many(&tweaks, &mut blocks);
        assert_eq!(blocks, expected);
    }
}
