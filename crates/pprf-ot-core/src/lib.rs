//! Low-level crate containing the core of the single-point correlated
//! oblivious transfer protocols.
//!
//! This crate is not intended to be used directly. Instead, use the
//! higher-level APIs provided by the `pprf-ot` crate.
//!
//! # ⚠️ Warning ⚠️
//!
//! Some implementations make assumptions about invariants which may not be
//! checked if using these low-level APIs naively. Failing to uphold these
//! invariants may result in security vulnerabilities.
//!
//! USE AT YOUR OWN RISK.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

use serde::{Deserialize, Serialize};

pub mod config;
pub mod error;
pub mod ideal;
pub mod malicious;
pub mod msgs;
pub mod output;
pub mod semi_honest;
#[cfg(any(test, feature = "test-utils"))]
pub mod test;

/// Computational security parameter.
pub const CSP: usize = 128;

/// Returns the depth of the tree backing an execution of `count`
/// correlations, `ceil(log2(count))`.
pub fn tree_depth(count: u32) -> usize {
    count.next_power_of_two().trailing_zeros() as usize
}

/// An execution identifier.
///
/// Increments once per protocol execution; mixed into hash tweaks and PRF
/// inputs so values never repeat across executions.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ExecutionId(u64);

impl std::fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ExecutionId({})", self.0)
    }
}

impl ExecutionId {
    /// Returns the current execution ID, incrementing `self` in-place.
    pub fn next_id(&mut self) -> Self {
        let id = *self;
        self.0 += 1;
        id
    }

    pub(crate) fn as_u64(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_depth_bounds() {
        assert_eq!(tree_depth(1), 0);
        assert_eq!(tree_depth(2), 1);
        assert_eq!(tree_depth(3), 2);
        assert_eq!(tree_depth(16), 4);
        assert_eq!(tree_depth(17), 5);
    }
}
