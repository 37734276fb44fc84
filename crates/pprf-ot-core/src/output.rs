//! Protocol outputs and base-COT batches, with the bookkeeping needed to
//! subdivide them between higher-level protocol calls.

use pprf_core::Block;
use serde::{Deserialize, Serialize};

use crate::{error::OutputError, ExecutionId};

/// The sender's output of one SSP-COT execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderOutput {
    /// The sender's correlation.
    pub delta: Block,
    /// The leaf vector `v`.
    pub leaves: Vec<Block>,
}

impl SenderOutput {
    /// Returns the number of correlations in the batch.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Returns `true` if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Truncates the batch to the first `count` correlations.
    pub fn reduce(&mut self, count: usize) -> Result<(), OutputError> {
        if count == 0 || count > self.leaves.len() {
            return Err(OutputError::InvalidParameter(format!(
                "cannot reduce a batch of {} to {count}",
                self.leaves.len()
            )));
        }
        self.leaves.truncate(count);
        Ok(())
    }

    /// Splits off the first `count` correlations, leaving the remainder.
    pub fn split(&mut self, count: usize) -> Result<SenderOutput, OutputError> {
        if count == 0 || count > self.leaves.len() {
            return Err(OutputError::InvalidParameter(format!(
                "cannot split {count} out of a batch of {}",
                self.leaves.len()
            )));
        }
        let rest = self.leaves.split_off(count);
        let head = SenderOutput {
            delta: self.delta,
            leaves: std::mem::replace(&mut self.leaves, rest),
        };
        Ok(head)
    }

    /// Appends `other` to this batch.
    pub fn merge(&mut self, other: SenderOutput) -> Result<(), OutputError> {
        if self.delta != other.delta {
            return Err(OutputError::Incompatible(
                "batches carry different correlations".to_string(),
            ));
        }
        self.leaves.extend(other.leaves);
        Ok(())
    }
}

/// The receiver's output of one SSP-COT execution.
///
/// The protocol always produces a batch with a punctured index; `alpha` is
/// `None` only for batch halves produced by [`ReceiverOutput::split`] that
/// do not contain it (their leaves agree with the sender's at every index).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverOutput {
    /// The punctured index, if this batch contains it.
    pub alpha: Option<u32>,
    /// The leaf vector `w`.
    pub leaves: Vec<Block>,
}

impl ReceiverOutput {
    /// Returns the number of correlations in the batch.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Returns `true` if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Truncates the batch to the first `count` correlations. The punctured
    /// index is dropped if it falls outside the retained prefix.
    pub fn reduce(&mut self, count: usize) -> Result<(), OutputError> {
        if count == 0 || count > self.leaves.len() {
            return Err(OutputError::InvalidParameter(format!(
                "cannot reduce a batch of {} to {count}",
                self.leaves.len()
            )));
        }
        self.leaves.truncate(count);
        if matches!(self.alpha, Some(alpha) if alpha as usize >= count) {
            self.alpha = None;
        }
        Ok(())
    }

    /// Splits off the first `count` correlations, leaving the remainder. The
    /// punctured index stays with whichever half contains it.
    pub fn split(&mut self, count: usize) -> Result<ReceiverOutput, OutputError> {
        if count == 0 || count > self.leaves.len() {
            return Err(OutputError::InvalidParameter(format!(
                "cannot split {count} out of a batch of {}",
                self.leaves.len()
            )));
        }

        let rest = self.leaves.split_off(count);
        let (head_alpha, rest_alpha) = match self.alpha {
            Some(alpha) if (alpha as usize) < count => (Some(alpha), None),
            Some(alpha) => (None, Some(alpha - count as u32)),
            None => (None, None),
        };

        let head = ReceiverOutput {
            alpha: head_alpha,
            leaves: std::mem::replace(&mut self.leaves, rest),
        };
        self.alpha = rest_alpha;

        Ok(head)
    }

    /// Appends `other` to this batch, re-deriving the punctured index.
    pub fn merge(&mut self, other: ReceiverOutput) -> Result<(), OutputError> {
        if self.alpha.is_some() && other.alpha.is_some() {
            return Err(OutputError::Incompatible(
                "both batches carry a punctured index".to_string(),
            ));
        }
        if let Some(alpha) = other.alpha {
            self.alpha = Some(alpha + self.leaves.len() as u32);
        }
        self.leaves.extend(other.leaves);
        Ok(())
    }
}

/// The sender's half of a batch of random correlated OTs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RcotSenderOutput {
    /// The execution this batch belongs to.
    pub id: ExecutionId,
    /// The zero-choice messages `q`.
    pub msgs: Vec<Block>,
}

impl RcotSenderOutput {
    /// Truncates the batch to the first `count` correlations.
    pub fn reduce(&mut self, count: usize) -> Result<(), OutputError> {
        if count > self.msgs.len() {
            return Err(OutputError::InvalidParameter(format!(
                "cannot reduce a batch of {} to {count}",
                self.msgs.len()
            )));
        }
        self.msgs.truncate(count);
        Ok(())
    }

    /// Splits off the first `count` correlations, leaving the remainder.
    pub fn split(&mut self, count: usize) -> Result<RcotSenderOutput, OutputError> {
        if count > self.msgs.len() {
            return Err(OutputError::InvalidParameter(format!(
                "cannot split {count} out of a batch of {}",
                self.msgs.len()
            )));
        }
        let rest = self.msgs.split_off(count);
        Ok(RcotSenderOutput {
            id: self.id,
            msgs: std::mem::replace(&mut self.msgs, rest),
        })
    }
}

/// The receiver's half of a batch of random correlated OTs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RcotReceiverOutput {
    /// The execution this batch belongs to.
    pub id: ExecutionId,
    /// The random choice bits `r`.
    pub choices: Vec<bool>,
    /// The chosen messages `t`.
    pub msgs: Vec<Block>,
}

impl RcotReceiverOutput {
    /// Truncates the batch to the first `count` correlations.
    pub fn reduce(&mut self, count: usize) -> Result<(), OutputError> {
        if count > self.msgs.len() {
            return Err(OutputError::InvalidParameter(format!(
                "cannot reduce a batch of {} to {count}",
                self.msgs.len()
            )));
        }
        self.choices.truncate(count);
        self.msgs.truncate(count);
        Ok(())
    }

    /// Splits off the first `count` correlations, leaving the remainder.
    pub fn split(&mut self, count: usize) -> Result<RcotReceiverOutput, OutputError> {
        if count > self.msgs.len() {
            return Err(OutputError::InvalidParameter(format!(
                "cannot split {count} out of a batch of {}",
                self.msgs.len()
            )));
        }
        let rest_choices = self.choices.split_off(count);
        let rest_msgs = self.msgs.split_off(count);
        Ok(RcotReceiverOutput {
            id: self.id,
            choices: std::mem::replace(&mut self.choices, rest_choices),
            msgs: std::mem::replace(&mut self.msgs, rest_msgs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(range: std::ops::Range<u128>) -> Vec<Block> {
        range.map(Block::from).collect()
    }

    #[test]
    fn sender_split_merge_roundtrip() {
        let original = SenderOutput {
            delta: Block::ONES,
            leaves: blocks(0..10),
        };

        let mut rest = original.clone();
        let mut head = rest.split(4).unwrap();
        assert_eq!(head.len(), 4);
        assert_eq!(rest.len(), 6);

        head.merge(rest).unwrap();
        assert_eq!(head, original);
    }

    #[test]
    fn receiver_split_keeps_alpha_with_its_half() {
        let original = ReceiverOutput {
            alpha: Some(7),
            leaves: blocks(0..10),
        };

        // Alpha in the tail.
        let mut rest = original.clone();
        let mut head = rest.split(4).unwrap();
        assert_eq!(head.alpha, None);
        assert_eq!(rest.alpha, Some(3));

        head.merge(rest).unwrap();
        assert_eq!(head, original);

        // Alpha in the head.
        let mut rest = original.clone();
        let mut head = rest.split(8).unwrap();
        assert_eq!(head.alpha, Some(7));
        assert_eq!(rest.alpha, None);

        head.merge(rest).unwrap();
        assert_eq!(head, original);
    }

    #[test]
    fn merge_rejects_two_punctured_halves() {
        let mut a = ReceiverOutput {
            alpha: Some(0),
            leaves: blocks(0..2),
        };
        let b = a.clone();

        assert!(matches!(a.merge(b), Err(OutputError::Incompatible(_))));
    }

    #[test]
    fn rcot_batches_partition() {
        let id = ExecutionId::default();
        let mut batch = RcotReceiverOutput {
            id,
            choices: vec![true, false, true, true],
            msgs: blocks(0..4),
        };

        let head = batch.split(3).unwrap();
        assert_eq!(head.choices, vec![true, false, true]);
        assert_eq!(head.msgs, blocks(0..3));
        assert_eq!(batch.choices, vec![true]);
        assert_eq!(batch.msgs, blocks(3..4));

        let mut sender_batch = RcotSenderOutput {
            id,
            msgs: blocks(0..4),
        };
        sender_batch.reduce(2).unwrap();
        assert_eq!(sender_batch.msgs, blocks(0..2));
        assert!(sender_batch.reduce(3).is_err());
    }

    #[test]
    fn reduce_bounds() {
        let mut output = SenderOutput {
            delta: Block::ZERO,
            leaves: blocks(0..4),
        };
        assert!(output.reduce(5).is_err());
        assert!(output.reduce(0).is_err());
        output.reduce(2).unwrap();
        assert_eq!(output.len(), 2);

        let mut output = ReceiverOutput {
            alpha: Some(3),
            leaves: blocks(0..4),
        };
        output.reduce(3).unwrap();
        assert_eq!(output.alpha, None);
    }
}
