//! 256-bit hash values.

use serde::{Deserialize, Serialize};

/// A 256-bit hash value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hash([u8; 32]);

impl Hash {
    /// Hashes `data` with blake3.
    pub fn of(data: &[u8]) -> Self {
        Self(blake3::hash(data).into())
    }

    /// Returns the byte representation of the hash.
    pub fn to_bytes(self) -> [u8; 32] {
        self.0
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_inputs_distinct_digests() {
        assert_ne!(Hash::of(b"a"), Hash::of(b"b"));
        assert_eq!(Hash::of(b"a"), Hash::of(b"a"));
    }
}
