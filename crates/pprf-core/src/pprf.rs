//! GGM puncturable-PRF tree.
//!
//! A binary tree of pseudorandom blocks derived from a single root seed with
//! the two-key length-doubling PRG `G(s) = E_k0(s) ^ s || E_k1(s) ^ s`
//! (fixed public expansion keys). The sender expands the full tree and
//! obtains, per level, the XOR of all left children and of all right
//! children; the receiver rebuilds every leaf except the one on a secret
//! path from those aggregates.
//!
//! Levels are materialized one at a time as flat arrays; the receiver's
//! missing node is a single hole index per level with a zero placeholder so
//! the per-index loops never branch on it.

use crate::{aes::AesEncryptor, Block};

/// Left/right expansion keys (arbitrary public constants).
const EXPAND_KEYS: [u128; 2] = [0x5b8cc1cd2c189a96d1b5bfda5a9f2f55, 0x9f461aba4d6d1eb0e68bd92e56ad001f];

/// A GGM tree of a fixed depth.
pub struct PprfTree {
    keys: [AesEncryptor; 2],
    depth: usize,
}

/// The sender's view: all `2^depth` leaves plus per-level aggregates.
pub struct Expansion {
    /// The leaf layer, length `2^depth`.
    pub leaves: Vec<Block>,
    /// Per level, the XOR of all left children, length `depth`.
    pub left_sums: Vec<Block>,
    /// Per level, the XOR of all right children, length `depth`.
    pub right_sums: Vec<Block>,
}

/// The receiver's view: all leaves except the one at `hole`, which is
/// `Block::ZERO`.
pub struct Punctured {
    /// The leaf layer, length `2^depth`, zero at `hole`.
    pub leaves: Vec<Block>,
    /// The index of the missing leaf.
    pub hole: usize,
}

impl PprfTree {
    /// Creates a tree of the given depth. Depth 0 is the degenerate
    /// single-leaf tree.
    pub fn new(depth: usize) -> Self {
        Self {
            keys: [
                AesEncryptor::new(Block::from(EXPAND_KEYS[0])),
                AesEncryptor::new(Block::from(EXPAND_KEYS[1])),
            ],
            depth,
        }
    }

    /// Returns the depth of the tree.
    pub fn depth(&self) -> usize {
        self.depth
    }

    // Expands one level: children interleaved left/right, plus the XOR of
    // each side.
    fn expand_level(&self, parents: &[Block]) -> (Vec<Block>, Block, Block) {
        let mut left = parents.to_vec();
        self.keys[0].encrypt_blocks(&mut left);
        for (child, parent) in left.iter_mut().zip(parents) {
            *child ^= *parent;
        }

        let mut right = parents.to_vec();
        self.keys[1].encrypt_blocks(&mut right);
        for (child, parent) in right.iter_mut().zip(parents) {
            *child ^= *parent;
        }

        let left_sum = left.iter().fold(Block::ZERO, |acc, &x| acc ^ x);
        let right_sum = right.iter().fold(Block::ZERO, |acc, &x| acc ^ x);

        let mut children = Vec::with_capacity(parents.len() * 2);
        for (l, r) in left.into_iter().zip(right) {
            children.push(l);
            children.push(r);
        }

        (children, left_sum, right_sum)
    }

    /// Expands `seed` into the full tree.
    pub fn expand(&self, seed: Block) -> Expansion {
        let mut leaves = vec![seed];
        let mut left_sums = Vec::with_capacity(self.depth);
        let mut right_sums = Vec::with_capacity(self.depth);

        for _ in 0..self.depth {
            let (children, left_sum, right_sum) = self.expand_level(&leaves);
            leaves = children;
            left_sums.push(left_sum);
            right_sums.push(right_sum);
        }

        Expansion {
            leaves,
            left_sums,
            right_sums,
        }
    }

    /// Rebuilds every leaf except the one on the path described by `alpha`.
    ///
    /// # Arguments
    ///
    /// * `keys` - Per level, the aggregate of the side *not* taken by the
    ///   path: `left_sums[i]` when `alpha[i]` is set, `right_sums[i]`
    ///   otherwise. Length `depth`.
    /// * `alpha` - The path bits, most significant (root level) first.
    ///   Length `depth`, which must be at least 1.
    pub fn reconstruct(&self, keys: &[Block], alpha: &[bool]) -> Punctured {
        assert!(self.depth >= 1);
        assert_eq!(keys.len(), self.depth);
        assert_eq!(alpha.len(), self.depth);

        // Level 1: the aggregate of the off-path side is the sibling itself.
        let mut nodes = vec![Block::ZERO; 2];
        let mut hole = alpha[0] as usize;
        nodes[1 - hole] = keys[0];

        for level in 1..self.depth {
            let (mut children, _, _) = self.expand_level(&nodes);

            // The hole expands to garbage; restore the placeholders.
            children[2 * hole] = Block::ZERO;
            children[2 * hole + 1] = Block::ZERO;

            // The aggregate over the off-path side minus the known nodes
            // yields the missing sibling.
            let sibling_side = !alpha[level] as usize;
            let known = children
                .iter()
                .skip(sibling_side)
                .step_by(2)
                .fold(Block::ZERO, |acc, &x| acc ^ x);

            children[2 * hole + sibling_side] = known ^ keys[level];
            hole = 2 * hole + alpha[level] as usize;
            nodes = children;
        }

        Punctured {
            leaves: nodes,
            hole,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn path_bits(index: usize, depth: usize) -> Vec<bool> {
        (0..depth).rev().map(|i| (index >> i) & 1 == 1).collect()
    }

    fn off_path_keys(expansion: &Expansion, alpha: &[bool]) -> Vec<Block> {
        alpha
            .iter()
            .enumerate()
            .map(|(i, &bit)| {
                if bit {
                    expansion.left_sums[i]
                } else {
                    expansion.right_sums[i]
                }
            })
            .collect()
    }

    #[test]
    fn expand_is_deterministic() {
        let tree = PprfTree::new(6);
        let seed = Block::from(7u128);

        let a = tree.expand(seed);
        let b = tree.expand(seed);

        assert_eq!(a.leaves.len(), 64);
        assert_eq!(a.leaves, b.leaves);
        assert_eq!(a.left_sums, b.left_sums);
        assert_eq!(a.right_sums, b.right_sums);
    }

    #[test]
    fn depth_zero_is_the_seed() {
        let tree = PprfTree::new(0);
        let seed = Block::from(99u128);

        let expansion = tree.expand(seed);
        assert_eq!(expansion.leaves, vec![seed]);
        assert!(expansion.left_sums.is_empty());
        assert!(expansion.right_sums.is_empty());
    }

    #[test]
    fn aggregates_cover_the_leaf_level() {
        let tree = PprfTree::new(4);
        let expansion = tree.expand(Block::from(3u128));

        let even = expansion
            .leaves
            .iter()
            .step_by(2)
            .fold(Block::ZERO, |acc, &x| acc ^ x);
        let odd = expansion
            .leaves
            .iter()
            .skip(1)
            .step_by(2)
            .fold(Block::ZERO, |acc, &x| acc ^ x);

        assert_eq!(even, expansion.left_sums[3]);
        assert_eq!(odd, expansion.right_sums[3]);
    }

    #[test]
    fn reconstruct_all_positions_small_depths() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);

        for depth in 1..=4 {
            let tree = PprfTree::new(depth);
            let seed = Block::random(&mut rng);
            let expansion = tree.expand(seed);

            for index in 0..(1usize << depth) {
                let alpha = path_bits(index, depth);
                let keys = off_path_keys(&expansion, &alpha);

                let punctured = tree.reconstruct(&keys, &alpha);

                assert_eq!(punctured.hole, index);
                for (i, (got, want)) in punctured
                    .leaves
                    .iter()
                    .zip(&expansion.leaves)
                    .enumerate()
                {
                    if i == index {
                        assert_eq!(*got, Block::ZERO);
                    } else {
                        assert_eq!(got, want, "leaf {i} differs");
                    }
                }
            }
        }
    }

    #[test]
    fn reconstruct_random_position_larger_depth() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);

        let depth = 10;
        let tree = PprfTree::new(depth);
        let expansion = tree.expand(Block::random(&mut rng));

        let index = 1000 - 24;
        let alpha = path_bits(index, depth);
        let keys = off_path_keys(&expansion, &alpha);

        let punctured = tree.reconstruct(&keys, &alpha);
        assert_eq!(punctured.hole, index);
        for i in (0..1 << depth).filter(|&i| i != index) {
            assert_eq!(punctured.leaves[i], expansion.leaves[i]);
        }
    }
}
