//! Client error types.

use thiserror::Error;

/// Result type for client construction.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors building a client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service base URL is malformed or not http(s).
    #[error("invalid recognition service URL: {0}")]
    InvalidUrl(String),
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// A recognition request failed or the service reported failure.
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// Connection, timeout, or body decoding failed.
    #[error("OCR processing failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service answered with a non-success HTTP status.
    #[error("OCR processing failed: HTTP status {0}")]
    Status(u16),
    /// The service answered `success: false`.
    #[error("OCR processing failed: {0}")]
    Rejected(String),
}

/// A correction submission failed or the service reported failure.
#[derive(Debug, Error)]
pub enum CorrectionError {
    /// Connection, timeout, or body decoding failed.
    #[error("Failed to submit correction: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service answered with a non-success HTTP status and no usable body.
    #[error("Failed to submit correction: HTTP status {0}")]
    Status(u16),
    /// The service answered `success: false`.
    #[error("Failed to submit correction: {0}")]
    Rejected(String),
}
