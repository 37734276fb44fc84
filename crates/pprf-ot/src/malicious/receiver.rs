use async_trait::async_trait;
use enum_try_as_inner::EnumTryAsInner;
use serio::{stream::IoStreamExt as _, IoSink, IoStream, SinkExt as _};
use tracing::instrument;
use utils_aio::non_blocking_backend::{Backend, NonBlockingBackend};

use pprf_ot_core::{
    config::Config,
    malicious::receiver::{state, Receiver as ReceiverCore},
    msgs::{CheckFromSender, Correlation, TreeCorrections},
    tree_depth, CSP,
};

use crate::{
    error::ReceiverError, OTError, RandomCotReceiver, RcotReceiverOutput, ReceiverOutput,
    SspcotReceiver,
};

#[derive(Debug, EnumTryAsInner)]
#[derive_err(Debug)]
pub(crate) enum State {
    Initialized(ReceiverCore<state::Initialized>),
    Extension(Box<ReceiverCore<state::Extension>>),
    Complete,
    Error,
}

/// Malicious-secure SSP-COT receiver.
#[derive(Debug)]
pub struct Receiver<RandomCOT> {
    state: State,
    rcot: RandomCOT,
}

impl<RandomCOT> Receiver<RandomCOT> {
    /// Creates a new receiver.
    ///
    /// # Arguments
    ///
    /// * `config` - The session configuration.
    /// * `rcot` - The random COT provider.
    pub fn new(config: Config, rcot: RandomCOT) -> Self {
        Self {
            state: State::Initialized(ReceiverCore::new(config)),
            rcot,
        }
    }

    /// Completes the session.
    pub fn finalize(&mut self) -> Result<(), ReceiverError> {
        let mut core = std::mem::replace(&mut self.state, State::Error).try_into_extension()?;

        core.finalize();
        self.state = State::Complete;

        Ok(())
    }
}

#[async_trait]
impl<Io, RandomCOT> SspcotReceiver<Io> for Receiver<RandomCOT>
where
    Io: IoSink + IoStream + Send + Unpin,
    RandomCOT: RandomCotReceiver<Io> + Send,
{
    #[instrument(level = "debug", skip_all, err)]
    async fn setup(&mut self, io: &mut Io) -> Result<(), OTError> {
        let core = std::mem::replace(&mut self.state, State::Error)
            .try_into_initialized()
            .map_err(ReceiverError::from)?;

        let (core, key) = core.setup();

        io.send(key).await.map_err(ReceiverError::from)?;

        self.state = State::Extension(Box::new(core));

        Ok(())
    }

    #[instrument(level = "debug", skip_all, err)]
    async fn receive(
        &mut self,
        io: &mut Io,
        alpha: u32,
        count: u32,
    ) -> Result<ReceiverOutput, OTError> {
        let mut core = std::mem::replace(&mut self.state, State::Error)
            .try_into_extension()
            .map_err(ReceiverError::from)?;

        let RcotReceiverOutput {
            choices, msgs: ts, ..
        } = self
            .rcot
            .receive_random_correlated(io, tree_depth(count))
            .await?;

        let (mut core, masks) = Backend::spawn(move || {
            core.mask_bits(count, alpha, &choices)
                .map(|masks| (core, masks))
        })
        .await
        .map_err(ReceiverError::from)?;

        io.send(masks).await.map_err(ReceiverError::from)?;

        let corrections: TreeCorrections = io.expect_next().await.map_err(ReceiverError::from)?;
        let correlation: Correlation = io.expect_next().await.map_err(ReceiverError::from)?;

        let (mut core, ()) = Backend::spawn(move || {
            core.reconstruct(&ts, &corrections, &correlation)
                .map(|()| (core, ()))
        })
        .await
        .map_err(ReceiverError::from)?;

        // The consistency check gates the output.
        let RcotReceiverOutput {
            choices: x_star,
            msgs: z_star,
            ..
        } = self.rcot.receive_random_correlated(io, CSP).await?;

        let (mut core, check) = Backend::spawn(move || {
            core.check_mask(&x_star).map(|check| (core, check))
        })
        .await
        .map_err(ReceiverError::from)?;

        io.send(check).await.map_err(ReceiverError::from)?;

        let digest: CheckFromSender = io.expect_next().await.map_err(ReceiverError::from)?;

        let (core, output) = Backend::spawn(move || {
            core.verify(&z_star, digest).map(|output| (core, output))
        })
        .await
        .map_err(ReceiverError::from)?;

        self.state = State::Extension(core);

        Ok(output)
    }
}
