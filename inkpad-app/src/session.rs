//! One drawing pad: drawing, rendered frame, interaction state and service.
//!
//! The session is the only place where the pure core meets I/O. Every user
//! action becomes an [`InteractionEvent`]; commands coming back from the
//! state machine are executed here and their outcomes fed back in with the
//! ticket they were issued under.

use std::path::PathBuf;

use inkpad_client::{CorrectionError, RecognitionError, RecognitionService};
use inkpad_core::{
    Candidate, CanvasGeometry, Command, ConnectionStatus, CorrectionRequest, DisplayRect,
    Drawing, InputPhase, InteractionEvent, InteractionState, Phase, PreconditionError, RawInput,
    RecognitionResult, StrokeRecorder, Ticket, Tool, ToolModel, Transition,
};
use inkpad_renderer::{Bitmap, BitmapExporter, ExportFormat, RendererConfig, StrokeRenderer};
use tokio::time::Instant;

use crate::error::{SessionError, SessionResult};
use crate::SessionConfig;

/// A recognition request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRecognition {
    /// Ticket the outcome must be reported under.
    pub ticket: Ticket,
    /// PNG data URL of the committed strokes on white.
    pub image: String,
}

/// A correction request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCorrection {
    /// Ticket the outcome must be reported under.
    pub ticket: Ticket,
    /// Request body.
    pub request: CorrectionRequest,
}

/// Drawing session bound to a recognition service.
pub struct Session<S> {
    config: SessionConfig,
    tools: ToolModel,
    recorder: StrokeRecorder,
    geometry: CanvasGeometry,
    renderer: StrokeRenderer,
    frame: Bitmap,
    state: InteractionState,
    service: S,
    indicator: Option<(Ticket, Instant)>,
}

impl<S: RecognitionService> Session<S> {
    /// Create a session with an empty canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas surface cannot be allocated.
    pub fn new(config: SessionConfig, service: S) -> SessionResult<Self> {
        let renderer = StrokeRenderer::new(RendererConfig::with_size(config.width, config.height));
        let frame = renderer.render(&Drawing::default())?;
        tracing::info!(
            width = config.width,
            height = config.height,
            device = ?config.device,
            user_id = %config.user_id,
            "Session created"
        );
        Ok(Self {
            tools: ToolModel::new(config.device),
            recorder: StrokeRecorder::new(),
            geometry: CanvasGeometry::unscaled(config.width, config.height),
            renderer,
            frame,
            state: InteractionState::new(),
            service,
            indicator: None,
            config,
        })
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Tool selection and sizes.
    #[must_use]
    pub const fn tools(&self) -> &ToolModel {
        &self.tools
    }

    /// The drawing, including any stroke in progress.
    #[must_use]
    pub const fn drawing(&self) -> &Drawing {
        self.recorder.drawing()
    }

    /// Current interaction state.
    #[must_use]
    pub const fn state(&self) -> &InteractionState {
        &self.state
    }

    /// The most recently rendered frame.
    #[must_use]
    pub const fn frame(&self) -> &Bitmap {
        &self.frame
    }

    /// The recognition service.
    #[must_use]
    pub const fn service(&self) -> &S {
        &self.service
    }

    /// Where the canvas is displayed, for input scaling.
    #[must_use]
    pub const fn geometry(&self) -> &CanvasGeometry {
        &self.geometry
    }

    /// Update the on-screen placement of the canvas (after layout or resize).
    pub fn set_display(&mut self, display: DisplayRect) {
        self.geometry.display = display;
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    /// Feed one raw device event. Returns true if the drawing changed.
    ///
    /// Malformed events are logged and dropped.
    pub fn handle_input(&mut self, input: &RawInput) -> bool {
        let phase = input.phase();
        let changed = if phase.is_terminal() {
            let was_recording = self.recorder.drawing().in_progress().is_some();
            self.recorder.end();
            was_recording
        } else {
            match self.geometry.normalize(input) {
                Ok(point) if phase == InputPhase::Start => {
                    self.recorder.begin(point, self.tools.brush())
                }
                Ok(point) => self.recorder.extend(point),
                Err(e) => {
                    tracing::debug!(error = %e, "Dropping input event");
                    false
                }
            }
        };
        if changed {
            self.drawing_changed();
        }
        changed
    }

    /// Select the active tool.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tools.set_tool(tool);
    }

    /// Set a tool's size. Returns the size actually applied after clamping.
    pub fn set_size(&mut self, tool: Tool, size: f32) -> f32 {
        self.tools.set_size(tool, size)
    }

    /// Remove the most recent committed stroke. Returns false if there was none.
    pub fn undo(&mut self) -> bool {
        let undone = self.recorder.undo_last().is_some();
        if undone {
            self.drawing_changed();
        }
        undone
    }

    /// Clear the drawing and every piece of recognition state in one step.
    ///
    /// Responses to requests sent before the clear are dropped when they
    /// arrive.
    pub fn clear(&mut self) {
        self.recorder.clear();
        self.indicator = None;
        self.dispatch(InteractionEvent::Cleared);
        self.rerender();
        tracing::info!("Canvas cleared");
    }

    fn drawing_changed(&mut self) {
        let drawing = self.recorder.drawing();
        let event = InteractionEvent::DrawingChanged {
            committed_strokes: drawing.committed_len(),
            recording: drawing.in_progress().is_some(),
        };
        self.dispatch(event);
        self.rerender();
    }

    fn rerender(&mut self) {
        match self.renderer.render(self.recorder.drawing()) {
            Ok(frame) => self.frame = frame,
            Err(e) => tracing::error!(error = %e, "Failed to render frame"),
        }
    }

    // ------------------------------------------------------------------
    // Connectivity
    // ------------------------------------------------------------------

    /// Probe the service and record the result.
    pub async fn probe_connection(&mut self) -> ConnectionStatus {
        let reachable = self.service.probe().await;
        self.dispatch(InteractionEvent::ConnectionProbed { reachable });
        self.state.connection()
    }

    // ------------------------------------------------------------------
    // Recognition
    // ------------------------------------------------------------------

    /// Start a recognition cycle: check the submit guards, move to
    /// Submitting and render the payload.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Precondition`] if submitting is not allowed
    /// (a notice is set for the user-facing cases), or
    /// [`SessionError::Render`] if the payload cannot be encoded.
    pub fn begin_recognition(&mut self) -> SessionResult<PendingRecognition> {
        let committed_strokes = self.recorder.drawing().committed_len();
        let command = self.try_dispatch(InteractionEvent::SubmitRequested { committed_strokes })?;
        let Some(Command::Recognize { ticket }) = command else {
            return Err(PreconditionError::AlreadySubmitting.into());
        };

        match self.recognition_payload() {
            Ok(image) => Ok(PendingRecognition { ticket, image }),
            Err(e) => {
                self.dispatch(InteractionEvent::RecognitionFailed {
                    ticket,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Report the outcome of a recognition request.
    ///
    /// Outcomes for a ticket that is no longer current are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Recognition`] if a current request failed.
    /// The drawing is kept and the session returns to Drawing.
    pub fn complete_recognition(
        &mut self,
        ticket: Ticket,
        outcome: Result<RecognitionResult, RecognitionError>,
    ) -> SessionResult<()> {
        let current = self.state.phase() == Phase::Submitting && self.state.ticket() == ticket;
        match outcome {
            Ok(result) => {
                self.dispatch(InteractionEvent::RecognitionSucceeded { ticket, result });
                Ok(())
            }
            Err(e) => {
                self.dispatch(InteractionEvent::RecognitionFailed {
                    ticket,
                    message: e.to_string(),
                });
                if current {
                    Err(e.into())
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Run a full recognition cycle against the service.
    ///
    /// # Errors
    ///
    /// See [`begin_recognition`](Self::begin_recognition) and
    /// [`complete_recognition`](Self::complete_recognition).
    pub async fn submit(&mut self) -> SessionResult<()> {
        let pending = self.begin_recognition()?;
        let outcome = self
            .service
            .recognize(&pending.image, &self.config.user_id)
            .await;
        self.complete_recognition(pending.ticket, outcome)
    }

    /// Select the raw text or a suggestion.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Precondition`] if there are no results or the
    /// candidate does not exist.
    pub fn select_candidate(&mut self, candidate: Candidate) -> SessionResult<()> {
        self.try_dispatch(InteractionEvent::CandidateSelected(candidate))?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Correction
    // ------------------------------------------------------------------

    /// Open the correction editor, seeded with the current selection.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Precondition`] if there are no results.
    pub fn open_correction(&mut self) -> SessionResult<()> {
        self.try_dispatch(InteractionEvent::CorrectionOpened)?;
        Ok(())
    }

    /// Replace the correction draft.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Precondition`] if the editor is not open.
    pub fn edit_correction(&mut self, draft: impl Into<String>) -> SessionResult<()> {
        self.try_dispatch(InteractionEvent::CorrectionDraftEdited(draft.into()))?;
        Ok(())
    }

    /// Close the correction editor without submitting.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Precondition`] if the editor is not open.
    pub fn cancel_correction(&mut self) -> SessionResult<()> {
        self.try_dispatch(InteractionEvent::CorrectionCancelled)?;
        Ok(())
    }

    /// Validate the draft and build the correction request.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Precondition`] if the draft is empty, unchanged,
    /// already being submitted, or the editor is not open.
    pub fn begin_correction(&mut self) -> SessionResult<PendingCorrection> {
        let user_id = self.config.user_id.clone();
        match self.try_dispatch(InteractionEvent::CorrectionSubmitted { user_id })? {
            Some(Command::SubmitCorrection { ticket, request }) => {
                Ok(PendingCorrection { ticket, request })
            }
            _ => Err(PreconditionError::NotCorrecting.into()),
        }
    }

    /// Report the outcome of a correction request.
    ///
    /// On success the selection becomes the corrected text and the update
    /// indicator is armed. Outcomes for a ticket that is no longer current are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Correction`] if a current request failed. The
    /// draft is kept for a retry.
    pub fn complete_correction(
        &mut self,
        ticket: Ticket,
        outcome: Result<(), CorrectionError>,
    ) -> SessionResult<()> {
        let current = self.state.correction_in_flight() && self.state.ticket() == ticket;
        match outcome {
            Ok(()) => {
                self.dispatch(InteractionEvent::CorrectionSucceeded { ticket });
                Ok(())
            }
            Err(e) => {
                self.dispatch(InteractionEvent::CorrectionFailed {
                    ticket,
                    message: e.to_string(),
                });
                if current {
                    Err(e.into())
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Submit the correction draft to the service.
    ///
    /// # Errors
    ///
    /// See [`begin_correction`](Self::begin_correction) and
    /// [`complete_correction`](Self::complete_correction).
    pub async fn submit_correction(&mut self) -> SessionResult<()> {
        let pending = self.begin_correction()?;
        let outcome = self.service.submit_correction(&pending.request).await;
        self.complete_correction(pending.ticket, outcome)
    }

    // ------------------------------------------------------------------
    // Timers
    // ------------------------------------------------------------------

    /// When the update indicator will switch off, if it is on.
    #[must_use]
    pub fn indicator_deadline(&self) -> Option<Instant> {
        self.indicator.map(|(_, deadline)| deadline)
    }

    /// Fire any timer whose deadline has passed. Returns true if one fired.
    pub fn refresh_timers(&mut self) -> bool {
        match self.indicator {
            Some((ticket, deadline)) if Instant::now() >= deadline => {
                self.indicator = None;
                self.dispatch(InteractionEvent::UpdateIndicatorExpired { ticket });
                true
            }
            _ => false,
        }
    }

    /// Sleep until the pending timer is due and fire it.
    pub async fn wait_for_timers(&mut self) {
        if let Some(deadline) = self.indicator_deadline() {
            tokio::time::sleep_until(deadline).await;
            self.refresh_timers();
        }
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// PNG data URL of the committed strokes on opaque white.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn recognition_payload(&self) -> SessionResult<String> {
        let bitmap = self
            .renderer
            .render_strokes(self.recorder.drawing().strokes())?;
        Ok(BitmapExporter::for_recognition().to_data_url(&bitmap)?)
    }

    /// Encode the current frame for download. Erased pixels stay transparent
    /// in PNG output.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn export(&self, format: ExportFormat) -> SessionResult<Vec<u8>> {
        Ok(BitmapExporter::with_defaults().export(&self.frame, format)?)
    }

    /// Write the current frame to the configured output directory as
    /// `drawing_<millis>.<ext>`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn export_to_dir(&self, format: ExportFormat) -> SessionResult<PathBuf> {
        Ok(BitmapExporter::with_defaults().write_to_dir(&self.frame, &self.config.out_dir, format)?)
    }

    // ------------------------------------------------------------------
    // State machine plumbing
    // ------------------------------------------------------------------

    fn apply(&mut self, event: InteractionEvent) -> (Option<Command>, Option<PreconditionError>) {
        let Transition {
            state,
            command,
            rejected,
        } = std::mem::take(&mut self.state).apply(event);
        self.state = state;
        if let Some(Command::ExpireUpdateIndicator { ticket, after }) = &command {
            self.indicator = Some((*ticket, Instant::now() + *after));
        }
        (command, rejected)
    }

    fn dispatch(&mut self, event: InteractionEvent) {
        self.apply(event);
    }

    fn try_dispatch(&mut self, event: InteractionEvent) -> SessionResult<Option<Command>> {
        match self.apply(event) {
            (_, Some(error)) => Err(SessionError::Precondition(error)),
            (command, None) => Ok(command),
        }
    }
}

impl<S> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.state.phase())
            .field("connection", &self.state.connection())
            .field("strokes", &self.recorder.drawing().committed_len())
            .finish_non_exhaustive()
    }
}
