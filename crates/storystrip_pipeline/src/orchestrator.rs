//! Sequential panel orchestrator.
//!
//! Drives a [`StripSession`] against real collaborators: asks for a panel
//! script, parses it, asks for the panel's image, and once the user accepts
//! the image asks for the next script with every accepted panel as context.
//!
//! The session sits behind an async mutex so operations on one strip are
//! serialized, but the lock is never held while a collaborator is working.
//! Each collaborator call is bounded by a timeout and races a reset signal;
//! both outcomes are reported as `UpstreamFailure`. Responses that arrive
//! after a reset are discarded by the session's ticket check.

use crate::assembler::StripAssembler;
use crate::parser::{ParseMode, parse_script};
use crate::session::{Completion, Issued, PendingCall, Phase, StripSession};
use std::future::Future;
use std::time::Duration;
use storystrip_core::{
    ImageOptions, ImageRequest, PanelImage, PanelScript, ScriptRequest, ScriptScope, StripState,
};
use storystrip_error::{PipelineErrorKind, StripError, StripResult};
use storystrip_interface::{ImageGenerator, ScriptGenerator};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument, warn};

/// Upper bound on a single collaborator call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs one comic-strip session against a script and an image collaborator.
///
/// Independent sessions use independent orchestrators; nothing is shared
/// between them.
pub struct PanelOrchestrator<S, I> {
    scripts: S,
    images: I,
    session: Mutex<StripSession>,
    request_timeout: Duration,
    resets: watch::Sender<u64>,
}

impl<S, I> PanelOrchestrator<S, I>
where
    S: ScriptGenerator,
    I: ImageGenerator,
{
    /// Creates an idle orchestrator with default image options and timeout.
    pub fn new(scripts: S, images: I) -> Self {
        Self::with_options(scripts, images, ImageOptions::default(), DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates an idle orchestrator.
    pub fn with_options(
        scripts: S,
        images: I,
        image_options: ImageOptions,
        request_timeout: Duration,
    ) -> Self {
        let (resets, _) = watch::channel(0);
        Self {
            scripts,
            images,
            session: Mutex::new(StripSession::new(image_options)),
            request_timeout,
            resets,
        }
    }

    /// Snapshot of the strip state.
    pub async fn state(&self) -> StripState {
        self.session.lock().await.state().clone()
    }

    /// Current phase.
    pub async fn phase(&self) -> Phase {
        self.session.lock().await.phase()
    }

    /// Accepted panels in order.
    pub async fn context(&self) -> Vec<PanelScript> {
        self.session.lock().await.context()
    }

    /// Starts a strip and generates panel 1 up to its candidate image.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless idle, `Validation` for blank or too-short input,
    /// `UpstreamFailure` or `MalformedResponse` if a collaborator fails. A
    /// `Validation` error leaves the session idle so it can be started again;
    /// after any other collaborator failure the session keeps its phase and
    /// [`retry`](Self::retry) repeats the request.
    #[instrument(skip(self, summary), fields(summary_len = summary.len()))]
    pub async fn start(&self, summary: &str, style_modifier: &str) -> StripResult<StripState> {
        let issued = self.session.lock().await.start(summary, style_modifier)?;
        self.run_script(issued).await?;
        Ok(self.state().await)
    }

    /// Accepts the pending panel's image; unless the strip is now complete,
    /// generates the next panel up to its candidate image.
    ///
    /// # Errors
    ///
    /// `InvalidIndex` unless `index` is the pending panel, plus the
    /// collaborator errors of [`start`](Self::start) for the next panel.
    #[instrument(skip(self, image), fields(bytes = image.len()))]
    pub async fn accept_panel_image(
        &self,
        index: usize,
        image: PanelImage,
    ) -> StripResult<StripState> {
        let next = self
            .session
            .lock()
            .await
            .accept_panel_image(index, image)?;
        if let Some(issued) = next {
            self.run_script(issued).await?;
        }
        Ok(self.state().await)
    }

    /// Replaces the pending panel's candidate image with a fresh one.
    ///
    /// # Errors
    ///
    /// `InvalidIndex` unless `index` is the pending panel; `UpstreamFailure`
    /// or `MalformedResponse` if the image collaborator fails.
    #[instrument(skip(self))]
    pub async fn regenerate_panel_image(&self, index: usize) -> StripResult<StripState> {
        let issued = self.session.lock().await.regenerate_panel_image(index)?;
        self.run_image(issued).await?;
        Ok(self.state().await)
    }

    /// Repeats the request the session is waiting on after a failure.
    ///
    /// # Errors
    ///
    /// `InvalidState` when idle, complete, or while a request is still in
    /// flight, plus collaborator errors.
    #[instrument(skip(self))]
    pub async fn retry(&self) -> StripResult<StripState> {
        let pending = self.session.lock().await.retry()?;
        match pending {
            PendingCall::Script(issued) => self.run_script(issued).await?,
            PendingCall::Image(issued) => self.run_image(issued).await?,
        }
        Ok(self.state().await)
    }

    /// Discards the strip and cancels any request in flight.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> StripState {
        let mut session = self.session.lock().await;
        session.reset();
        let epoch = session.epoch();
        self.resets.send_replace(epoch);
        session.state().clone()
    }

    /// Composites the four accepted panels into the final strip.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless complete; `PanelDimensions` or `ImageCodec` if
    /// the accepted images cannot be composited.
    #[instrument(skip(self))]
    pub async fn assemble_strip(&self) -> StripResult<StripState> {
        let mut session = self.session.lock().await;
        let images = session.accepted_images()?;
        let assembler = StripAssembler::new(*session.image_options().size());
        let strip = assembler.assemble(&images)?;
        info!(bytes = strip.len(), "Strip assembled");
        session.set_final_image(strip)?;
        Ok(session.state().clone())
    }

    /// Scripts a whole strip in one request without touching the session.
    ///
    /// # Errors
    ///
    /// `Validation` for blank or too-short input, `UpstreamFailure` or
    /// `MalformedResponse` if the script collaborator fails.
    #[instrument(skip(self, summary), fields(summary_len = summary.len()))]
    pub async fn draft_script(
        &self,
        summary: &str,
        style_modifier: &str,
    ) -> StripResult<Vec<PanelScript>> {
        if summary.trim().is_empty() {
            return Err(PipelineErrorKind::Validation("summary is missing".to_string()).into());
        }
        let request = ScriptRequest::builder()
            .summary(summary)
            .style_modifier(style_modifier.trim())
            .scope(ScriptScope::FullStrip)
            .build()
            .map_err(|e| StripError::from(PipelineErrorKind::Validation(e.to_string())))?;

        let script = self
            .call("script generation", self.scripts.generate_script(&request))
            .await?;
        let panels = parse_script(&script, ParseMode::from(*request.scope()));
        if panels.is_empty() {
            return Err(
                PipelineErrorKind::MalformedResponse("script contained no panel".to_string())
                    .into(),
            );
        }
        Ok(panels)
    }

    async fn run_script(&self, issued: Issued<ScriptRequest>) -> StripResult<()> {
        let Issued { ticket, request } = issued;
        debug!(
            provider = self.scripts.provider_name(),
            model = self.scripts.model_name(),
            panel = request.panel_number(),
            "Requesting panel script"
        );
        let result = self
            .call("script generation", self.scripts.generate_script(&request))
            .await;

        let next = {
            let mut session = self.session.lock().await;
            match result {
                Ok(script) => session.on_script_received(ticket, &script)?,
                Err(e) => {
                    if matches!(e.pipeline_kind(), Some(PipelineErrorKind::Validation(_))) {
                        session.on_request_rejected(ticket);
                    } else {
                        session.on_request_failed(ticket);
                    }
                    return Err(e);
                }
            }
        };

        match next {
            Completion::Applied(image_call) => self.run_image(image_call).await,
            Completion::Stale => Err(superseded("script generation")),
        }
    }

    async fn run_image(&self, issued: Issued<ImageRequest>) -> StripResult<()> {
        let Issued { ticket, request } = issued;
        debug!(
            provider = self.images.provider_name(),
            model = self.images.model_name(),
            "Requesting panel image"
        );
        let result = self
            .call("image generation", self.images.generate_image(&request))
            .await;

        let mut session = self.session.lock().await;
        let applied = match result {
            Ok(image) => session.on_image_generated(ticket, image)?,
            Err(e) => {
                session.on_request_failed(ticket);
                return Err(e);
            }
        };

        match applied {
            Completion::Applied(index) => {
                info!(index, "Candidate image ready");
                Ok(())
            }
            Completion::Stale => Err(superseded("image generation")),
        }
    }

    /// Awaits a collaborator call under the timeout and the reset signal.
    async fn call<T, F>(&self, what: &str, request: F) -> StripResult<T>
    where
        F: Future<Output = StripResult<T>>,
    {
        let mut resets = self.resets.subscribe();
        tokio::select! {
            outcome = tokio::time::timeout(self.request_timeout, request) => match outcome {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) => Err(upstream(what, e)),
                Err(_) => {
                    warn!(what, timeout = ?self.request_timeout, "Collaborator timed out");
                    Err(PipelineErrorKind::UpstreamFailure(format!(
                        "{} timed out after {:?}",
                        what, self.request_timeout
                    ))
                    .into())
                }
            },
            _ = resets.changed() => {
                warn!(what, "Collaborator call cancelled by reset");
                Err(PipelineErrorKind::UpstreamFailure(format!("{} cancelled by reset", what)).into())
            }
        }
    }
}

/// Keeps validation and malformed-payload errors as they are; everything
/// else a collaborator reports becomes `UpstreamFailure`.
fn upstream(what: &str, error: StripError) -> StripError {
    match error.pipeline_kind() {
        Some(PipelineErrorKind::Validation(_)) | Some(PipelineErrorKind::MalformedResponse(_)) => {
            error
        }
        _ => {
            warn!(what, error = %error, "Collaborator failed");
            PipelineErrorKind::UpstreamFailure(format!("{} failed: {}", what, error)).into()
        }
    }
}

fn superseded(what: &str) -> StripError {
    PipelineErrorKind::UpstreamFailure(format!("{} was superseded or cancelled", what)).into()
}
