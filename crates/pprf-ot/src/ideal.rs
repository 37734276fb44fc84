//! Ideal random COT providers backed by the in-memory ideal functionality.
//!
//! Both halves share one dealer: whichever side asks first draws the batch
//! and queues the peer's half, so concurrent parties always observe
//! matching correlations.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use pprf_core::Block;
use pprf_ot_core::ideal::cot::IdealCot;
use pprf_ot_core::output::{RcotReceiverOutput, RcotSenderOutput};

use crate::{OTError, RandomCotReceiver, RandomCotSender};

#[derive(Debug)]
struct Shared {
    cot: IdealCot,
    for_sender: VecDeque<RcotSenderOutput>,
    for_receiver: VecDeque<RcotReceiverOutput>,
}

/// The sender side of an ideal random COT pair.
#[derive(Debug, Clone)]
pub struct IdealRcotSender {
    inner: Arc<Mutex<Shared>>,
}

/// The receiver side of an ideal random COT pair.
#[derive(Debug, Clone)]
pub struct IdealRcotReceiver {
    inner: Arc<Mutex<Shared>>,
}

/// Creates an ideal random COT pair, returning its correlation.
pub fn ideal_rcot() -> (Block, IdealRcotSender, IdealRcotReceiver) {
    let cot = IdealCot::default();
    let delta = cot.delta();

    let inner = Arc::new(Mutex::new(Shared {
        cot,
        for_sender: VecDeque::new(),
        for_receiver: VecDeque::new(),
    }));

    (
        delta,
        IdealRcotSender {
            inner: inner.clone(),
        },
        IdealRcotReceiver { inner },
    )
}

#[async_trait]
impl<Io: Send> RandomCotSender<Io> for IdealRcotSender {
    async fn send_random_correlated(
        &mut self,
        _io: &mut Io,
        count: usize,
    ) -> Result<RcotSenderOutput, OTError> {
        let mut shared = self.inner.lock().unwrap();

        if let Some(output) = shared.for_sender.pop_front() {
            if output.msgs.len() != count {
                return Err(OTError::SenderError(
                    "mismatched ideal COT batch sizes".into(),
                ));
            }
            return Ok(output);
        }

        let (sender_output, receiver_output) = shared.cot.random_correlated(count);
        shared.for_receiver.push_back(receiver_output);

        Ok(sender_output)
    }
}

#[async_trait]
impl<Io: Send> RandomCotReceiver<Io> for IdealRcotReceiver {
    async fn receive_random_correlated(
        &mut self,
        _io: &mut Io,
        count: usize,
    ) -> Result<RcotReceiverOutput, OTError> {
        let mut shared = self.inner.lock().unwrap();

        if let Some(output) = shared.for_receiver.pop_front() {
            if output.msgs.len() != count {
                return Err(OTError::ReceiverError(
                    "mismatched ideal COT batch sizes".into(),
                ));
            }
            return Ok(output);
        }

        let (sender_output, receiver_output) = shared.cot.random_correlated(count);
        shared.for_sender.push_back(sender_output);

        Ok(receiver_output)
    }
}
