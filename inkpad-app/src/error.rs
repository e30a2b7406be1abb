//! Session error types.

use inkpad_client::{ClientError, CorrectionError, RecognitionError};
use inkpad_core::PreconditionError;
use inkpad_renderer::RenderError;
use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors surfaced by a [`Session`](crate::Session).
///
/// None of these are fatal; each leaves the session usable for a retry.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The action is not allowed in the current state.
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// Rendering or exporting the drawing failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The recognition request failed.
    #[error(transparent)]
    Recognition(#[from] RecognitionError),

    /// The correction submission failed.
    #[error(transparent)]
    Correction(#[from] CorrectionError),

    /// The recognition client could not be created.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A script could not be read or parsed.
    #[error("invalid script: {0}")]
    Script(String),

    /// Reading a script failed.
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Script(err.to_string())
    }
}
