//! Panel generation state machine.
//!
//! [`StripSession`] owns one [`StripState`] and decides, without doing any
//! I/O itself, which request has to be made next. Every request it hands out
//! carries a [`Ticket`]; a completion is applied only when its ticket is the
//! one the session is still waiting for. Starting or resetting a session
//! opens a new epoch, so responses to requests issued before a reset can
//! never touch the state that follows it.
//!
//! ```text
//! Idle --start--> AwaitingScript --script--> AwaitingImage --accept--+--> AwaitingScript (< 4 panels)
//!                                                                     +--> Complete       (4 panels)
//! any --reset--> Idle
//! ```

use crate::parser::{ParseMode, parse_script};
use crate::prompt::panel_image_prompt;
use storystrip_core::{
    ImageOptions, ImageRequest, PANELS_PER_STRIP, PanelImage, PanelScript, ScriptRequest,
    ScriptScope, StripState,
};
use storystrip_error::{PipelineErrorKind, StripError, StripResult};
use tracing::{debug, info, warn};

/// Where a session is in the panel loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::Display)]
pub enum Phase {
    /// No session started
    #[default]
    Idle,
    /// Waiting for the script of the next panel
    AwaitingScript,
    /// Waiting for the user to accept the pending panel's image
    AwaitingImage,
    /// All four panels accepted
    Complete,
}

/// Identity of one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    epoch: u64,
    sequence: u64,
}

impl Ticket {
    /// Session epoch the request belongs to.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Position of the request within the session.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// A request the caller must send to a collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issued<R> {
    /// Hand back with the response
    pub ticket: Ticket,
    /// What to send
    pub request: R,
}

/// A request the session is waiting on, as returned by [`StripSession::retry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingCall {
    /// Script for the next panel
    Script(Issued<ScriptRequest>),
    /// Image for the pending panel
    Image(Issued<ImageRequest>),
}

/// Result of feeding a response back into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T> {
    /// The response was current and has been applied
    Applied(T),
    /// The response belongs to a superseded or discarded request; nothing changed
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestKind {
    Script,
    Image,
}

/// State machine for one comic-strip session.
#[derive(Debug, Default)]
pub struct StripSession {
    state: StripState,
    phase: Phase,
    image_options: ImageOptions,
    epoch: u64,
    sequence: u64,
    in_flight: Option<(Ticket, RequestKind)>,
}

impl StripSession {
    /// Creates an idle session that requests images with `image_options`.
    pub fn new(image_options: ImageOptions) -> Self {
        Self {
            image_options,
            ..Self::default()
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current strip state.
    pub fn state(&self) -> &StripState {
        &self.state
    }

    /// Image options used for panel requests.
    pub fn image_options(&self) -> &ImageOptions {
        &self.image_options
    }

    /// Current session epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether a request is outstanding.
    pub fn has_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Accepted panels in order, as sent with the next script request.
    pub fn context(&self) -> Vec<PanelScript> {
        self.state.context()
    }

    /// Begins a new strip and issues the request for panel 1.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the session is idle; `Validation` if the summary
    /// or style modifier is blank.
    pub fn start(
        &mut self,
        summary: &str,
        style_modifier: &str,
    ) -> StripResult<Issued<ScriptRequest>> {
        self.require_phase(Phase::Idle, "start")?;
        if summary.trim().is_empty() {
            return Err(PipelineErrorKind::Validation("summary is missing".to_string()).into());
        }
        if style_modifier.trim().is_empty() {
            return Err(
                PipelineErrorKind::Validation("style modifier is missing".to_string()).into(),
            );
        }

        self.epoch += 1;
        self.sequence = 0;
        self.state = StripState::new(summary, style_modifier.trim());
        self.phase = Phase::AwaitingScript;
        info!(epoch = self.epoch, style = style_modifier, "Started strip session");
        self.issue_script()
    }

    /// Applies a script response: parses one panel and issues its image request.
    ///
    /// # Errors
    ///
    /// `MalformedResponse` if the script holds no text. The session stays in
    /// `AwaitingScript` and can be retried.
    pub fn on_script_received(
        &mut self,
        ticket: Ticket,
        raw_script: &str,
    ) -> StripResult<Completion<Issued<ImageRequest>>> {
        if !self.is_current(ticket, RequestKind::Script) {
            warn!(?ticket, "Ignoring stale script response");
            return Ok(Completion::Stale);
        }
        self.in_flight = None;

        let Some(script) = parse_script(raw_script, ParseMode::SinglePanel).into_iter().next()
        else {
            warn!("Script response held no panel");
            return Err(
                PipelineErrorKind::MalformedResponse("script contained no panel".to_string())
                    .into(),
            );
        };

        let index = self.state.push_panel(script)?;
        self.phase = Phase::AwaitingImage;
        debug!(index, "Panel script received");
        Ok(Completion::Applied(self.issue_image(index)?))
    }

    /// Applies an image response as the pending panel's candidate.
    ///
    /// # Errors
    ///
    /// `MalformedResponse` if the image is empty.
    pub fn on_image_generated(
        &mut self,
        ticket: Ticket,
        image: PanelImage,
    ) -> StripResult<Completion<usize>> {
        if !self.is_current(ticket, RequestKind::Image) {
            warn!(?ticket, "Ignoring stale image response");
            return Ok(Completion::Stale);
        }
        self.in_flight = None;

        if image.is_empty() {
            return Err(
                PipelineErrorKind::MalformedResponse("image payload is empty".to_string()).into(),
            );
        }

        let index = self.pending_index("store a candidate image")?;
        if let Some(panel) = self.state.panel_mut(index) {
            panel.set_candidate(image)?;
        }
        debug!(index, "Candidate image stored");
        Ok(Completion::Applied(index))
    }

    /// Records that a request failed. The phase is left as is so the caller
    /// can [`retry`](Self::retry).
    pub fn on_request_failed(&mut self, ticket: Ticket) -> Completion<()> {
        match self.in_flight {
            Some((current, _)) if current == ticket => {
                self.in_flight = None;
                debug!(?ticket, phase = %self.phase, "Request failed, state unchanged");
                Completion::Applied(())
            }
            _ => Completion::Stale,
        }
    }

    /// Records that a script request was refused because its input is
    /// unusable. A refused opening request abandons the strip and returns to
    /// `Idle`, so the caller can start again with corrected input; any later
    /// refusal is treated like [`on_request_failed`](Self::on_request_failed).
    pub fn on_request_rejected(&mut self, ticket: Ticket) -> Completion<()> {
        let applied = self.on_request_failed(ticket);
        if applied == Completion::Applied(())
            && self.phase == Phase::AwaitingScript
            && self.state.panels().is_empty()
        {
            self.state.clear();
            self.phase = Phase::Idle;
            info!(epoch = self.epoch, "Opening request rejected, session idle");
        }
        applied
    }

    /// Accepts `image` for the pending panel.
    ///
    /// Returns the script request for the next panel, or `None` once the strip
    /// is complete. Any image request still in flight for the panel is dropped.
    ///
    /// # Errors
    ///
    /// `InvalidIndex` unless `index` is the last panel and it is not yet
    /// accepted; `Validation` if `image` is empty.
    pub fn accept_panel_image(
        &mut self,
        index: usize,
        image: PanelImage,
    ) -> StripResult<Option<Issued<ScriptRequest>>> {
        self.check_pending_index(index)?;
        if let Some(panel) = self.state.panel_mut(index) {
            panel.accept(image)?;
        }
        self.in_flight = None;
        info!(index, accepted = index + 1, "Panel accepted");

        if self.state.panels().len() < PANELS_PER_STRIP {
            self.phase = Phase::AwaitingScript;
            self.issue_script().map(Some)
        } else {
            self.phase = Phase::Complete;
            info!(epoch = self.epoch, "All panels accepted");
            Ok(None)
        }
    }

    /// Issues a fresh image request for the pending panel, superseding any
    /// image request still in flight. Neither the panel count nor the script
    /// is touched.
    ///
    /// # Errors
    ///
    /// `InvalidIndex` unless `index` is the last panel and it is not yet accepted.
    pub fn regenerate_panel_image(&mut self, index: usize) -> StripResult<Issued<ImageRequest>> {
        self.check_pending_index(index)?;
        debug!(index, "Regenerating panel image");
        self.issue_image(index)
    }

    /// Re-issues whatever request the current phase is waiting on.
    ///
    /// # Errors
    ///
    /// `InvalidState` when idle or complete, or while a request is still in
    /// flight.
    pub fn retry(&mut self) -> StripResult<PendingCall> {
        if let Some((ticket, _)) = self.in_flight {
            warn!(?ticket, "Retry refused, request still in flight");
            return Err(PipelineErrorKind::InvalidState {
                operation: "retry".to_string(),
                state: format!("{} with a request in flight", self.phase),
            }
            .into());
        }
        match self.phase {
            Phase::AwaitingScript => self.issue_script().map(PendingCall::Script),
            Phase::AwaitingImage => {
                let index = self.pending_index("retry")?;
                self.issue_image(index).map(PendingCall::Image)
            }
            Phase::Idle | Phase::Complete => Err(self.invalid_state("retry")),
        }
    }

    /// Stores the composited strip.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the strip is complete.
    pub fn set_final_image(&mut self, image: PanelImage) -> StripResult<()> {
        self.require_phase(Phase::Complete, "assemble the strip")?;
        self.state.set_final_image(image)
    }

    /// Accepted images in strip order.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the strip is complete.
    pub fn accepted_images(&self) -> StripResult<Vec<PanelImage>> {
        self.require_phase(Phase::Complete, "assemble the strip")?;
        Ok(self
            .state
            .panels()
            .iter()
            .filter_map(|p| p.image().clone())
            .collect())
    }

    /// Discards every panel and the final image and returns to `Idle`.
    ///
    /// Responses to requests issued before the reset are ignored.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.sequence = 0;
        self.in_flight = None;
        self.state.clear();
        self.phase = Phase::Idle;
        info!(epoch = self.epoch, "Session reset");
    }

    fn issue_script(&mut self) -> StripResult<Issued<ScriptRequest>> {
        let request = ScriptRequest::builder()
            .summary(self.state.summary().clone())
            .style_modifier(self.state.style_modifier().clone())
            .context(self.state.context())
            .scope(ScriptScope::NextPanel)
            .build()
            .map_err(|e| StripError::from(PipelineErrorKind::Validation(e.to_string())))?;
        let ticket = self.next_ticket(RequestKind::Script);
        debug!(?ticket, panel = request.panel_number(), "Issued script request");
        Ok(Issued { ticket, request })
    }

    fn issue_image(&mut self, index: usize) -> StripResult<Issued<ImageRequest>> {
        let panel = self.state.panels().get(index).ok_or_else(|| {
            StripError::from(PipelineErrorKind::InvalidIndex {
                index,
                reason: "no such panel".to_string(),
            })
        })?;
        let prompt = panel_image_prompt(panel.script(), self.state.style_modifier());
        let request = ImageRequest::new(prompt, self.image_options);
        let ticket = self.next_ticket(RequestKind::Image);
        debug!(?ticket, index, "Issued image request");
        Ok(Issued { ticket, request })
    }

    fn next_ticket(&mut self, kind: RequestKind) -> Ticket {
        self.sequence += 1;
        let ticket = Ticket {
            epoch: self.epoch,
            sequence: self.sequence,
        };
        self.in_flight = Some((ticket, kind));
        ticket
    }

    fn is_current(&self, ticket: Ticket, kind: RequestKind) -> bool {
        self.in_flight == Some((ticket, kind))
    }

    #[track_caller]
    fn check_pending_index(&self, index: usize) -> StripResult<()> {
        let count = self.state.panels().len();
        let reason = if count == 0 {
            Some("no panels have been generated".to_string())
        } else if index != count - 1 {
            Some(format!("the pending panel is {}", count - 1))
        } else if *self.state.panels()[index].accepted() {
            Some("panel is already accepted".to_string())
        } else {
            None
        };

        match reason {
            Some(reason) => Err(PipelineErrorKind::InvalidIndex { index, reason }.into()),
            None => Ok(()),
        }
    }

    #[track_caller]
    fn pending_index(&self, operation: &str) -> StripResult<usize> {
        match self.state.pending_panel() {
            Some(_) => Ok(self.state.panels().len() - 1),
            None => Err(self.invalid_state(operation)),
        }
    }

    #[track_caller]
    fn require_phase(&self, phase: Phase, operation: &str) -> StripResult<()> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(self.invalid_state(operation))
        }
    }

    #[track_caller]
    fn invalid_state(&self, operation: &str) -> StripError {
        PipelineErrorKind::InvalidState {
            operation: operation.to_string(),
            state: self.phase.to_string(),
        }
        .into()
    }
}
