//! Error types for drawing-pad operations.

use thiserror::Error;

/// A raw device event that cannot be turned into a canvas point.
///
/// These are never surfaced to the user; callers log and drop the event.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// Touch event carried no active touch points.
    #[error("touch event has no active touches")]
    NoActiveTouch,

    /// The canvas is not laid out (zero or negative display size).
    #[error("canvas display size is degenerate: {width}x{height}")]
    DegenerateCanvas {
        /// Display width in client pixels.
        width: f32,
        /// Display height in client pixels.
        height: f32,
    },
}

/// An operation was attempted in a state that does not allow it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    /// Submit attempted with no committed strokes.
    #[error("Please draw something first!")]
    EmptyDrawing,

    /// Submit attempted while the recognition service is not reachable.
    #[error("Recognition service is not connected. Make sure the backend server is running.")]
    Disconnected,

    /// A recognition request is already in flight.
    #[error("A recognition request is already in progress")]
    AlreadySubmitting,

    /// The operation needs a recognition result and there is none.
    #[error("No recognition results available")]
    NoResults,

    /// The correction editor needs a selected text to correct.
    #[error("No recognized text is selected")]
    NothingSelected,

    /// The selected candidate does not exist in the current result.
    #[error("Unknown suggestion index: {0}")]
    UnknownCandidate(usize),

    /// The correction editor is not open.
    #[error("Correction editor is not open")]
    NotCorrecting,

    /// The correction draft is empty after trimming.
    #[error("Correction is empty")]
    CorrectionEmpty,

    /// The correction draft equals the current selection.
    #[error("Correction does not change the selected text")]
    CorrectionUnchanged,

    /// A correction request is already in flight.
    #[error("A correction is already being submitted")]
    CorrectionInFlight,
}

impl PreconditionError {
    /// Whether this rejection should be shown to the user as a notice.
    ///
    /// Submission guards are user-facing; the correction and selection
    /// guards are silent no-ops at the call boundary.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::EmptyDrawing | Self::Disconnected | Self::AlreadySubmitting
        )
    }
}
