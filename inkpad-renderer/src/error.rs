//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering or export.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The bitmap surface could not be allocated.
    #[error("Failed to allocate {width}x{height} surface")]
    Surface {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// Encoding the bitmap failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// The requested export format is not compiled in.
    #[error("Unsupported export format: {0}")]
    Unsupported(&'static str),

    /// Writing the exported file failed.
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}
