//! Interaction state machine: drawing → recognition → selection → correction.
//!
//! Every transition is a pure function `(state, event) → transition`. Side
//! effects the host has to perform (send a request, arm a timer) come back as
//! a [`Command`]; the host feeds the outcome in as another event carrying the
//! same [`Ticket`]. Responses whose ticket is no longer current are dropped,
//! which is what keeps a slow response from resurrecting results after Clear.
//!
//! ```text
//!  Idle ──stroke──▶ Drawing ──submit──▶ Submitting ──ok──▶ Results ◀──▶ Correcting
//!   ▲                  ▲                    │ err                │
//!   │                  └────────────────────┘                    │
//!   └───────────────────────────── clear ────────────────────────┘
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PreconditionError;
use crate::recognition::{Candidate, CorrectionRequest, RecognitionResult, UserId};

/// How long the "text was updated" indicator stays on after a correction.
pub const UPDATE_INDICATOR_WINDOW: Duration = Duration::from_secs(3);

/// Reachability of the recognition service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// Startup probe still running.
    #[default]
    Checking,
    /// Probe succeeded.
    Connected,
    /// Probe failed.
    Disconnected,
}

/// Phase of the interaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Nothing drawn, no results.
    #[default]
    Idle,
    /// At least one stroke committed or in progress.
    Drawing,
    /// Recognition request in flight.
    Submitting,
    /// A result is available.
    Results,
    /// The correction editor is open over a result.
    Correcting,
}

/// Correlates a request with its response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket(u64);

impl Ticket {
    /// Raw ticket number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// The selected text and the correction draft over it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    /// Currently selected candidate text (empty when none).
    pub selected_text: String,
    /// Correction being edited (empty when the editor is closed).
    pub correction_draft: String,
    /// True for a short window after a correction was accepted.
    pub was_updated_recently: bool,
}

/// Input to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    /// The startup connectivity probe finished.
    ConnectionProbed {
        /// Whether the service answered.
        reachable: bool,
    },
    /// The stroke log changed (begin, end, undo).
    DrawingChanged {
        /// Committed strokes after the change.
        committed_strokes: usize,
        /// Whether a stroke is being recorded.
        recording: bool,
    },
    /// The user asked to recognize the drawing.
    SubmitRequested {
        /// Committed strokes at the time of the request.
        committed_strokes: usize,
    },
    /// Recognition returned a result.
    RecognitionSucceeded {
        /// Ticket from [`Command::Recognize`].
        ticket: Ticket,
        /// The result.
        result: RecognitionResult,
    },
    /// Recognition failed.
    RecognitionFailed {
        /// Ticket from [`Command::Recognize`].
        ticket: Ticket,
        /// User-facing failure message.
        message: String,
    },
    /// The user picked a candidate.
    CandidateSelected(Candidate),
    /// The user opened the correction editor.
    CorrectionOpened,
    /// The user edited the correction draft.
    CorrectionDraftEdited(String),
    /// The user closed the editor without submitting.
    CorrectionCancelled,
    /// The user submitted the draft.
    CorrectionSubmitted {
        /// Who is submitting.
        user_id: UserId,
    },
    /// The feedback backend accepted the correction.
    CorrectionSucceeded {
        /// Ticket from [`Command::SubmitCorrection`].
        ticket: Ticket,
    },
    /// The feedback backend rejected the correction or was unreachable.
    CorrectionFailed {
        /// Ticket from [`Command::SubmitCorrection`].
        ticket: Ticket,
        /// User-facing failure message.
        message: String,
    },
    /// The update indicator window elapsed.
    UpdateIndicatorExpired {
        /// Ticket from [`Command::ExpireUpdateIndicator`].
        ticket: Ticket,
    },
    /// The user cleared the canvas.
    Cleared,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Render the drawing and send it for recognition.
    Recognize {
        /// Ticket the response must carry.
        ticket: Ticket,
    },
    /// Send a correction to the feedback backend.
    SubmitCorrection {
        /// Ticket the response must carry.
        ticket: Ticket,
        /// Request body.
        request: CorrectionRequest,
    },
    /// Fire [`InteractionEvent::UpdateIndicatorExpired`] after a delay.
    ExpireUpdateIndicator {
        /// Ticket the expiry must carry.
        ticket: Ticket,
        /// Delay.
        after: Duration,
    },
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// State after the event.
    pub state: InteractionState,
    /// Side effect to perform, if any.
    pub command: Option<Command>,
    /// Why the event was refused, if it was.
    pub rejected: Option<PreconditionError>,
}

impl Transition {
    fn to(state: InteractionState) -> Self {
        Self {
            state,
            command: None,
            rejected: None,
        }
    }

    fn with(state: InteractionState, command: Command) -> Self {
        Self {
            state,
            command: Some(command),
            rejected: None,
        }
    }

    fn reject(mut state: InteractionState, error: PreconditionError) -> Self {
        if error.is_user_facing() {
            tracing::warn!(%error, "request rejected");
            state.notice = Some(error.to_string());
        } else {
            tracing::debug!(%error, "request ignored");
        }
        Self {
            state,
            command: None,
            rejected: Some(error),
        }
    }
}

/// A correction request awaiting its response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PendingCorrection {
    ticket: Ticket,
    corrected_text: String,
}

/// Complete interaction state. Owned by the session, replaced on every event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionState {
    phase: Phase,
    connection: ConnectionStatus,
    result: Option<RecognitionResult>,
    selection: SelectionState,
    notice: Option<String>,
    ticket: Ticket,
    pending_correction: Option<PendingCorrection>,
    indicator: Option<Ticket>,
}

impl InteractionState {
    /// Fresh state: idle, probing connectivity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Recognition service reachability.
    #[must_use]
    pub const fn connection(&self) -> ConnectionStatus {
        self.connection
    }

    /// Latest recognition result.
    #[must_use]
    pub const fn result(&self) -> Option<&RecognitionResult> {
        self.result.as_ref()
    }

    /// Selection and correction draft.
    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// User-visible error message, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Ticket of the most recent request.
    #[must_use]
    pub const fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// Whether a correction request is in flight.
    #[must_use]
    pub const fn correction_in_flight(&self) -> bool {
        self.pending_correction.is_some()
    }

    /// Whether a new recognition could be submitted right now.
    #[must_use]
    pub fn can_submit(&self, committed_strokes: usize) -> bool {
        self.check_submit(committed_strokes).is_ok()
    }

    fn check_submit(&self, committed_strokes: usize) -> Result<(), PreconditionError> {
        if self.phase == Phase::Submitting {
            return Err(PreconditionError::AlreadySubmitting);
        }
        if committed_strokes == 0 {
            return Err(PreconditionError::EmptyDrawing);
        }
        if self.connection != ConnectionStatus::Connected {
            return Err(PreconditionError::Disconnected);
        }
        Ok(())
    }

    fn has_results(&self) -> bool {
        matches!(self.phase, Phase::Results | Phase::Correcting) && self.result.is_some()
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.ticket = self.ticket.next();
        self.ticket
    }

    /// Apply one event.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn apply(mut self, event: InteractionEvent) -> Transition {
        match event {
            InteractionEvent::ConnectionProbed { reachable } => {
                self.connection = if reachable {
                    ConnectionStatus::Connected
                } else {
                    ConnectionStatus::Disconnected
                };
                tracing::info!(connection = ?self.connection, "connectivity probed");
                Transition::to(self)
            }

            InteractionEvent::DrawingChanged {
                committed_strokes,
                recording,
            } => {
                if matches!(self.phase, Phase::Idle | Phase::Drawing) {
                    self.phase = if committed_strokes > 0 || recording {
                        Phase::Drawing
                    } else {
                        Phase::Idle
                    };
                }
                Transition::to(self)
            }

            InteractionEvent::SubmitRequested { committed_strokes } => {
                if let Err(error) = self.check_submit(committed_strokes) {
                    return Transition::reject(self, error);
                }
                let ticket = self.issue_ticket();
                self.phase = Phase::Submitting;
                self.result = None;
                self.selection = SelectionState::default();
                self.notice = None;
                self.pending_correction = None;
                self.indicator = None;
                tracing::info!(ticket = ticket.get(), "recognition submitted");
                Transition::with(self, Command::Recognize { ticket })
            }

            InteractionEvent::RecognitionSucceeded { ticket, result } => {
                if self.phase != Phase::Submitting || ticket != self.ticket {
                    tracing::warn!(ticket = ticket.get(), "stale recognition result dropped");
                    return Transition::to(self);
                }
                self.selection.selected_text = result
                    .initial_selection()
                    .map(str::to_string)
                    .unwrap_or_default();
                tracing::info!(
                    ticket = ticket.get(),
                    suggestions = result.suggestions.len(),
                    "recognition completed"
                );
                self.result = Some(result);
                self.phase = Phase::Results;
                Transition::to(self)
            }

            InteractionEvent::RecognitionFailed { ticket, message } => {
                if self.phase != Phase::Submitting || ticket != self.ticket {
                    tracing::warn!(ticket = ticket.get(), "stale recognition failure dropped");
                    return Transition::to(self);
                }
                tracing::warn!(ticket = ticket.get(), %message, "recognition failed");
                self.phase = Phase::Drawing;
                self.notice = Some(message);
                Transition::to(self)
            }

            InteractionEvent::CandidateSelected(candidate) => {
                if !self.has_results() {
                    return Transition::reject(self, PreconditionError::NoResults);
                }
                let text = self
                    .result
                    .as_ref()
                    .and_then(|r| r.candidate(candidate))
                    .map(str::to_string);
                let Some(text) = text else {
                    let index = match candidate {
                        Candidate::Suggestion(index) => index,
                        Candidate::Raw => 0,
                    };
                    return Transition::reject(self, PreconditionError::UnknownCandidate(index));
                };
                if self.phase == Phase::Correcting && self.pending_correction.is_none() {
                    self.selection.correction_draft.clone_from(&text);
                }
                self.selection.selected_text = text;
                Transition::to(self)
            }

            InteractionEvent::CorrectionOpened => {
                if !self.has_results() {
                    return Transition::reject(self, PreconditionError::NoResults);
                }
                if self.selection.selected_text.is_empty() {
                    return Transition::reject(self, PreconditionError::NothingSelected);
                }
                if self.phase == Phase::Results {
                    self.selection
                        .correction_draft
                        .clone_from(&self.selection.selected_text);
                    self.phase = Phase::Correcting;
                }
                Transition::to(self)
            }

            InteractionEvent::CorrectionDraftEdited(draft) => {
                if self.phase != Phase::Correcting {
                    return Transition::reject(self, PreconditionError::NotCorrecting);
                }
                self.selection.correction_draft = draft;
                Transition::to(self)
            }

            InteractionEvent::CorrectionCancelled => {
                if self.phase != Phase::Correcting {
                    return Transition::reject(self, PreconditionError::NotCorrecting);
                }
                self.phase = Phase::Results;
                self.selection.correction_draft.clear();
                self.pending_correction = None;
                Transition::to(self)
            }

            InteractionEvent::CorrectionSubmitted { user_id } => {
                if self.phase != Phase::Correcting {
                    return Transition::reject(self, PreconditionError::NotCorrecting);
                }
                if self.pending_correction.is_some() {
                    return Transition::reject(self, PreconditionError::CorrectionInFlight);
                }
                let corrected = self.selection.correction_draft.trim().to_string();
                if corrected.is_empty() {
                    return Transition::reject(self, PreconditionError::CorrectionEmpty);
                }
                if corrected == self.selection.selected_text {
                    return Transition::reject(self, PreconditionError::CorrectionUnchanged);
                }
                let (image_hash, confidence_score) = self
                    .result
                    .as_ref()
                    .map(|r| (r.image_fingerprint.clone(), r.confidence))
                    .unwrap_or_default();
                let request = CorrectionRequest {
                    original_text: self.selection.selected_text.clone(),
                    corrected_text: corrected.clone(),
                    user_id,
                    image_hash,
                    confidence_score,
                };
                let ticket = self.issue_ticket();
                self.pending_correction = Some(PendingCorrection {
                    ticket,
                    corrected_text: corrected,
                });
                tracing::info!(ticket = ticket.get(), "correction submitted");
                Transition::with(self, Command::SubmitCorrection { ticket, request })
            }

            InteractionEvent::CorrectionSucceeded { ticket } => {
                let pending = match self.pending_correction.take() {
                    Some(pending) if pending.ticket == ticket => pending,
                    other => {
                        self.pending_correction = other;
                        tracing::warn!(ticket = ticket.get(), "stale correction response dropped");
                        return Transition::to(self);
                    }
                };
                self.selection.selected_text = pending.corrected_text;
                self.selection.correction_draft.clear();
                self.selection.was_updated_recently = true;
                self.notice = None;
                self.phase = Phase::Results;
                self.indicator = Some(ticket);
                tracing::info!(ticket = ticket.get(), "correction accepted");
                Transition::with(
                    self,
                    Command::ExpireUpdateIndicator {
                        ticket,
                        after: UPDATE_INDICATOR_WINDOW,
                    },
                )
            }

            InteractionEvent::CorrectionFailed { ticket, message } => {
                match &self.pending_correction {
                    Some(pending) if pending.ticket == ticket => {
                        self.pending_correction = None;
                        tracing::warn!(ticket = ticket.get(), %message, "correction failed");
                        self.notice = Some(message);
                    }
                    _ => {
                        tracing::warn!(ticket = ticket.get(), "stale correction failure dropped");
                    }
                }
                Transition::to(self)
            }

            InteractionEvent::UpdateIndicatorExpired { ticket } => {
                if self.indicator == Some(ticket) {
                    self.indicator = None;
                    self.selection.was_updated_recently = false;
                }
                Transition::to(self)
            }

            InteractionEvent::Cleared => {
                let connection = self.connection;
                let ticket = self.ticket.next();
                tracing::debug!(from = ?self.phase, "interaction cleared");
                Transition::to(Self {
                    connection,
                    ticket,
                    ..Self::default()
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::Confidence;

    fn connected() -> InteractionState {
        InteractionState::new()
            .apply(InteractionEvent::ConnectionProbed { reachable: true })
            .state
    }

    fn hi_hello() -> RecognitionResult {
        RecognitionResult {
            raw_text: "Hi".to_string(),
            suggestions: vec!["Hi".to_string(), "Hello".to_string()],
            confidence: Some(Confidence::High),
            image_fingerprint: "hash-1".to_string(),
        }
    }

    fn submitted(state: InteractionState) -> (InteractionState, Ticket) {
        let t = state.apply(InteractionEvent::SubmitRequested {
            committed_strokes: 1,
        });
        let Some(Command::Recognize { ticket }) = t.command else {
            panic!("expected recognize command, got {:?}", t.command);
        };
        (t.state, ticket)
    }

    fn with_results() -> InteractionState {
        let (state, ticket) = submitted(connected());
        state
            .apply(InteractionEvent::RecognitionSucceeded {
                ticket,
                result: hi_hello(),
            })
            .state
    }

    #[test]
    fn drawing_changes_move_between_idle_and_drawing() {
        let state = InteractionState::new().apply(InteractionEvent::DrawingChanged {
            committed_strokes: 0,
            recording: true,
        });
        assert_eq!(state.state.phase(), Phase::Drawing);
        let state = state.state.apply(InteractionEvent::DrawingChanged {
            committed_strokes: 0,
            recording: false,
        });
        assert_eq!(state.state.phase(), Phase::Idle);
    }

    #[test]
    fn submit_rejected_on_empty_drawing() {
        let t = connected().apply(InteractionEvent::SubmitRequested {
            committed_strokes: 0,
        });
        assert_eq!(t.rejected, Some(PreconditionError::EmptyDrawing));
        assert!(t.command.is_none());
        assert_eq!(t.state.notice(), Some("Please draw something first!"));
    }

    #[test]
    fn submit_rejected_when_not_connected() {
        for reachable in [None, Some(false)] {
            let mut state = InteractionState::new();
            if let Some(reachable) = reachable {
                state = state
                    .apply(InteractionEvent::ConnectionProbed { reachable })
                    .state;
            }
            let t = state.apply(InteractionEvent::SubmitRequested {
                committed_strokes: 3,
            });
            assert_eq!(t.rejected, Some(PreconditionError::Disconnected));
            assert!(t.command.is_none());
            assert!(t.state.notice().is_some());
        }
    }

    #[test]
    fn submit_is_not_reentrant() {
        let (state, _) = submitted(connected());
        assert_eq!(state.phase(), Phase::Submitting);
        let t = state.apply(InteractionEvent::SubmitRequested {
            committed_strokes: 1,
        });
        assert_eq!(t.rejected, Some(PreconditionError::AlreadySubmitting));
        assert!(t.command.is_none());
    }

    #[test]
    fn success_selects_raw_text() {
        let state = with_results();
        assert_eq!(state.phase(), Phase::Results);
        assert_eq!(state.selection().selected_text, "Hi");
    }

    #[test]
    fn success_without_raw_text_selects_first_suggestion() {
        let (state, ticket) = submitted(connected());
        let mut result = hi_hello();
        result.raw_text = String::new();
        result.suggestions = vec!["Hello".to_string()];
        let state = state
            .apply(InteractionEvent::RecognitionSucceeded { ticket, result })
            .state;
        assert_eq!(state.selection().selected_text, "Hello");
    }

    #[test]
    fn success_with_nothing_leaves_selection_empty() {
        let (state, ticket) = submitted(connected());
        let result = RecognitionResult::default();
        let state = state
            .apply(InteractionEvent::RecognitionSucceeded { ticket, result })
            .state;
        assert_eq!(state.phase(), Phase::Results);
        assert!(state.selection().selected_text.is_empty());
    }

    #[test]
    fn failure_returns_to_drawing_with_notice() {
        let (state, ticket) = submitted(connected());
        let state = state
            .apply(InteractionEvent::RecognitionFailed {
                ticket,
                message: "HTTP error! status: 500".to_string(),
            })
            .state;
        assert_eq!(state.phase(), Phase::Drawing);
        assert_eq!(state.notice(), Some("HTTP error! status: 500"));
        assert!(state.result().is_none());
    }

    #[test]
    fn response_after_clear_is_dropped() {
        let (state, ticket) = submitted(connected());
        let cleared = state.apply(InteractionEvent::Cleared).state;
        let after = cleared.clone().apply(InteractionEvent::RecognitionSucceeded {
            ticket,
            result: hi_hello(),
        });
        assert_eq!(after.state, cleared);
        assert!(after.state.result().is_none());
    }

    #[test]
    fn response_with_old_ticket_is_dropped() {
        let (state, first) = submitted(connected());
        let state = state
            .apply(InteractionEvent::RecognitionFailed {
                ticket: first,
                message: "boom".to_string(),
            })
            .state;
        let (state, second) = submitted(state);
        assert_ne!(first, second);
        let state = state
            .apply(InteractionEvent::RecognitionSucceeded {
                ticket: first,
                result: hi_hello(),
            })
            .state;
        assert_eq!(state.phase(), Phase::Submitting);
    }

    #[test]
    fn selecting_candidates() {
        let t = with_results().apply(InteractionEvent::CandidateSelected(Candidate::Suggestion(1)));
        assert_eq!(t.state.selection().selected_text, "Hello");
        let t = t
            .state
            .apply(InteractionEvent::CandidateSelected(Candidate::Raw));
        assert_eq!(t.state.selection().selected_text, "Hi");
        let t = t
            .state
            .apply(InteractionEvent::CandidateSelected(Candidate::Suggestion(9)));
        assert_eq!(t.rejected, Some(PreconditionError::UnknownCandidate(9)));
        assert_eq!(t.state.selection().selected_text, "Hi");
    }

    #[test]
    fn selecting_without_results_is_rejected() {
        let t = connected().apply(InteractionEvent::CandidateSelected(Candidate::Raw));
        assert_eq!(t.rejected, Some(PreconditionError::NoResults));
        assert!(t.state.notice().is_none());
    }

    #[test]
    fn opening_correction_copies_selection() {
        let state = with_results()
            .apply(InteractionEvent::CorrectionOpened)
            .state;
        assert_eq!(state.phase(), Phase::Correcting);
        assert_eq!(state.selection().correction_draft, "Hi");
    }

    #[test]
    fn selecting_while_correcting_refreshes_draft() {
        let state = with_results()
            .apply(InteractionEvent::CorrectionOpened)
            .state
            .apply(InteractionEvent::CandidateSelected(Candidate::Suggestion(1)))
            .state;
        assert_eq!(state.selection().correction_draft, "Hello");
    }

    fn correcting(draft: &str) -> InteractionState {
        with_results()
            .apply(InteractionEvent::CorrectionOpened)
            .state
            .apply(InteractionEvent::CorrectionDraftEdited(draft.to_string()))
            .state
    }

    #[test]
    fn empty_correction_is_rejected() {
        for draft in ["", "   "] {
            let t = correcting(draft).apply(InteractionEvent::CorrectionSubmitted {
                user_id: UserId::default(),
            });
            assert_eq!(t.rejected, Some(PreconditionError::CorrectionEmpty));
            assert!(t.command.is_none());
        }
    }

    #[test]
    fn unchanged_correction_is_rejected() {
        for draft in ["Hi", "Hi ", " Hi\n"] {
            let t = correcting(draft).apply(InteractionEvent::CorrectionSubmitted {
                user_id: UserId::default(),
            });
            assert_eq!(
                t.rejected,
                Some(PreconditionError::CorrectionUnchanged),
                "draft {draft:?}"
            );
            assert!(t.command.is_none());
            assert!(!t.state.correction_in_flight());
            assert!(!t.state.selection().was_updated_recently);
        }
    }

    #[test]
    fn correction_needs_a_selection() {
        let (state, ticket) = submitted(connected());
        let blank = RecognitionResult {
            raw_text: String::new(),
            suggestions: Vec::new(),
            confidence: None,
            image_fingerprint: "hash-2".to_string(),
        };
        let state = state
            .apply(InteractionEvent::RecognitionSucceeded {
                ticket,
                result: blank,
            })
            .state;
        assert_eq!(state.phase(), Phase::Results);
        assert!(state.selection().selected_text.is_empty());

        let t = state.apply(InteractionEvent::CorrectionOpened);
        assert_eq!(t.rejected, Some(PreconditionError::NothingSelected));
        assert_eq!(t.state.phase(), Phase::Results);
        assert!(t.state.notice().is_none());
    }

    #[test]
    fn correction_round_trip() {
        let t = correcting("  fixed text ").apply(InteractionEvent::CorrectionSubmitted {
            user_id: UserId::new("ada"),
        });
        let Some(Command::SubmitCorrection { ticket, request }) = t.command else {
            panic!("expected correction command");
        };
        assert_eq!(request.original_text, "Hi");
        assert_eq!(request.corrected_text, "fixed text");
        assert_eq!(request.user_id.as_str(), "ada");
        assert_eq!(request.image_hash, "hash-1");
        assert_eq!(request.confidence_score, Some(Confidence::High));
        assert!(t.state.correction_in_flight());

        let t = t
            .state
            .apply(InteractionEvent::CorrectionSucceeded { ticket });
        assert_eq!(t.state.phase(), Phase::Results);
        assert_eq!(t.state.selection().selected_text, "fixed text");
        assert!(t.state.selection().was_updated_recently);
        assert!(t.state.selection().correction_draft.is_empty());
        let Some(Command::ExpireUpdateIndicator { ticket, after }) = t.command else {
            panic!("expected indicator timer");
        };
        assert_eq!(after, UPDATE_INDICATOR_WINDOW);

        let state = t
            .state
            .apply(InteractionEvent::UpdateIndicatorExpired { ticket })
            .state;
        assert!(!state.selection().was_updated_recently);
    }

    #[test]
    fn failed_correction_preserves_draft() {
        let t = correcting("fixed").apply(InteractionEvent::CorrectionSubmitted {
            user_id: UserId::default(),
        });
        let Some(Command::SubmitCorrection { ticket, .. }) = t.command else {
            panic!("expected correction command");
        };
        let state = t
            .state
            .apply(InteractionEvent::CorrectionFailed {
                ticket,
                message: "Failed to submit correction: db down".to_string(),
            })
            .state;
        assert_eq!(state.phase(), Phase::Correcting);
        assert_eq!(state.selection().correction_draft, "fixed");
        assert_eq!(state.selection().selected_text, "Hi");
        assert!(!state.correction_in_flight());
        assert!(state.notice().is_some());
    }

    #[test]
    fn duplicate_correction_submission_is_rejected() {
        let t = correcting("fixed").apply(InteractionEvent::CorrectionSubmitted {
            user_id: UserId::default(),
        });
        let t = t.state.apply(InteractionEvent::CorrectionSubmitted {
            user_id: UserId::default(),
        });
        assert_eq!(t.rejected, Some(PreconditionError::CorrectionInFlight));
    }

    #[test]
    fn cancel_closes_editor() {
        let state = correcting("draft")
            .apply(InteractionEvent::CorrectionCancelled)
            .state;
        assert_eq!(state.phase(), Phase::Results);
        assert!(state.selection().correction_draft.is_empty());
    }

    #[test]
    fn clear_resets_results_and_selection_together() {
        let state = correcting("draft").apply(InteractionEvent::Cleared).state;
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.result().is_none());
        assert_eq!(state.selection(), &SelectionState::default());
        assert!(state.notice().is_none());
        assert_eq!(state.connection(), ConnectionStatus::Connected);
    }

    #[test]
    fn resubmit_from_results_resets_selection() {
        let (state, _) = submitted(with_results());
        assert_eq!(state.phase(), Phase::Submitting);
        assert!(state.result().is_none());
        assert!(state.selection().selected_text.is_empty());
    }
}
