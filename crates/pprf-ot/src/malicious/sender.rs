use async_trait::async_trait;
use enum_try_as_inner::EnumTryAsInner;
use serio::{stream::IoStreamExt as _, IoSink, IoStream, SinkExt as _};
use tracing::instrument;
use utils_aio::non_blocking_backend::{Backend, NonBlockingBackend};

use pprf_core::Block;
use pprf_ot_core::{
    config::Config,
    malicious::sender::{state, Sender as SenderCore},
    msgs::{CheckFromReceiver, MaskBits, PrfKey},
    tree_depth, CSP,
};

use crate::{
    error::SenderError, OTError, RandomCotSender, RcotSenderOutput, SenderOutput, SspcotSender,
};

#[derive(Debug, EnumTryAsInner)]
#[derive_err(Debug)]
pub(crate) enum State {
    Initialized(SenderCore<state::Initialized>),
    Extension(Box<SenderCore<state::Extension>>),
    Complete,
    Error,
}

/// Malicious-secure SSP-COT sender.
#[derive(Debug)]
pub struct Sender<RandomCOT> {
    state: State,
    rcot: RandomCOT,
}

impl<RandomCOT> Sender<RandomCOT> {
    /// Creates a new sender.
    ///
    /// # Arguments
    ///
    /// * `config` - The session configuration.
    /// * `rcot` - The random COT provider.
    pub fn new(config: Config, rcot: RandomCOT) -> Self {
        Self {
            state: State::Initialized(SenderCore::new(config)),
            rcot,
        }
    }

    /// Completes the session.
    pub fn finalize(&mut self) -> Result<(), SenderError> {
        let mut core = std::mem::replace(&mut self.state, State::Error).try_into_extension()?;

        core.finalize();
        self.state = State::Complete;

        Ok(())
    }
}

#[async_trait]
impl<Io, RandomCOT> SspcotSender<Io> for Sender<RandomCOT>
where
    Io: IoSink + IoStream + Send + Unpin,
    RandomCOT: RandomCotSender<Io> + Send,
{
    #[instrument(level = "debug", skip_all, err)]
    async fn setup(&mut self, io: &mut Io, delta: Block) -> Result<(), OTError> {
        let core = std::mem::replace(&mut self.state, State::Error)
            .try_into_initialized()
            .map_err(SenderError::from)?;

        let mut core = core.setup(delta);

        let key: PrfKey = io.expect_next().await.map_err(SenderError::from)?;
        core.receive_prf_key(key).map_err(SenderError::from)?;

        self.state = State::Extension(Box::new(core));

        Ok(())
    }

    #[instrument(level = "debug", skip_all, err)]
    async fn send(&mut self, io: &mut Io, count: u32) -> Result<SenderOutput, OTError> {
        let mut core = std::mem::replace(&mut self.state, State::Error)
            .try_into_extension()
            .map_err(SenderError::from)?;

        let RcotSenderOutput { msgs: qs, .. } = self
            .rcot
            .send_random_correlated(io, tree_depth(count))
            .await?;

        let masks: MaskBits = io.expect_next().await.map_err(SenderError::from)?;

        let (mut core, corrections, correlation) = Backend::spawn(move || {
            core.extend(count, &qs, &masks)
                .map(|(corrections, correlation)| (core, corrections, correlation))
        })
        .await
        .map_err(SenderError::from)?;

        io.send(corrections).await.map_err(SenderError::from)?;
        io.send(correlation).await.map_err(SenderError::from)?;

        // The consistency check gates the output.
        let RcotSenderOutput { msgs: y_star, .. } =
            self.rcot.send_random_correlated(io, CSP).await?;

        let check: CheckFromReceiver = io.expect_next().await.map_err(SenderError::from)?;

        let (core, output, digest) = Backend::spawn(move || {
            core.check(&y_star, check)
                .map(|(output, digest)| (core, output, digest))
        })
        .await
        .map_err(SenderError::from)?;

        io.send(digest).await.map_err(SenderError::from)?;

        self.state = State::Extension(core);

        Ok(output)
    }
}
