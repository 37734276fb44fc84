//! The semi-honest SSP-COT protocol.

pub(crate) mod receiver;
pub(crate) mod sender;

pub use receiver::Receiver;
pub use sender::Sender;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ideal::ideal_rcot,
        SspcotReceiver as _, SspcotSender as _,
    };
    use pprf_ot_core::{config::Config, test::assert_single_point};
    use serio::channel::duplex;

    #[tokio::test]
    async fn test_semi_honest() {
        let (mut io_sender, mut io_receiver) = duplex(8);
        let (delta, rcot_sender, rcot_receiver) = ideal_rcot();

        let mut sender = Sender::new(Config::default(), rcot_sender);
        let mut receiver = Receiver::new(Config::default(), rcot_receiver);

        tokio::try_join!(
            sender.setup(&mut io_sender, delta),
            receiver.setup(&mut io_receiver)
        )
        .unwrap();

        let (sender_output, receiver_output) = tokio::try_join!(
            sender.send(&mut io_sender, 16),
            receiver.receive(&mut io_receiver, 7, 16)
        )
        .unwrap();

        assert_eq!(receiver_output.alpha, Some(7));
        assert_single_point(delta, &sender_output.leaves, &receiver_output.leaves, 7);

        // A second execution over the same session.
        let (sender_output, receiver_output) = tokio::try_join!(
            sender.send(&mut io_sender, 100),
            receiver.receive(&mut io_receiver, 99, 100)
        )
        .unwrap();

        assert_single_point(delta, &sender_output.leaves, &receiver_output.leaves, 99);

        sender.finalize().unwrap();
        receiver.finalize().unwrap();
    }
}
