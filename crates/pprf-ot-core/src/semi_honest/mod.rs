//! The semi-honest SSP-COT protocol.
//!
//! Both parties are trusted to follow the protocol; the correlation is
//! produced with three wire messages (mask bits, tree corrections, the
//! correlation value) and no verification phase.

pub mod receiver;
pub mod sender;
