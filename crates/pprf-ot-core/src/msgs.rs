//! Messages exchanged by the SSP-COT protocols.

use pprf_core::{hash::Hash, Block};
use serde::{Deserialize, Serialize};

/// The blinded choice bits sent by the receiver, one per tree level:
/// `bits[i] = r_i XOR alpha_i XOR 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskBits {
    /// The blinded choice bits, root level first.
    pub bits: Vec<bool>,
}

/// The per-level correction pairs sent by the sender. Each pair blinds the
/// left and right aggregates of one tree level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeCorrections {
    /// The blinded `(M0, M1)` pairs, root level first.
    pub pairs: Vec<[Block; 2]>,
}

/// The correlation value sent by the sender: `delta` folded with all leaves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    /// `delta XOR v[0] XOR .. XOR v[n-1]`.
    pub sum: Block,
}

/// The key for the random-oracle PRF, chosen by the receiver (malicious
/// variant only).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrfKey {
    /// The 128-bit PRF key.
    pub key: Block,
}

/// The consistency-check message sent by the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckFromReceiver {
    /// `chi_alpha XOR x*`, with the receiver's check-OT choice bits packed
    /// into a field element.
    pub x_prime: Block,
}

/// The consistency-check message sent by the sender.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckFromSender {
    /// The hash of the sender's check value `V`.
    pub digest: Hash,
}
