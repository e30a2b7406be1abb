//! # Inkpad Client
//!
//! HTTP client for the external recognition service.
//!
//! The service exposes three endpoints under one base URL:
//!
//! | Method | Path | Purpose |
//! |---|---|---|
//! | `POST` | `/process-ocr` | Recognize a PNG data URL |
//! | `POST` | `/submit-feedback` | Store a user correction |
//! | `GET` | `/health` | Reachability probe |
//!
//! Every call is a single attempt. Retrying is left to the user.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod wire;

use std::sync::Arc;

use async_trait::async_trait;
use inkpad_core::{CorrectionRequest, RecognitionResult, UserId};
use reqwest::Client;
use url::Url;

pub use error::{ClientError, ClientResult, CorrectionError, RecognitionError};
use wire::{FeedbackResponse, RecognitionRequest, RecognitionResponse};

/// Base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// The recognition service as seen by a session.
#[async_trait]
pub trait RecognitionService: Send + Sync {
    /// Whether the service answers its health check.
    async fn probe(&self) -> bool;

    /// Recognize the handwriting in a PNG data URL.
    async fn recognize(
        &self,
        image_data_url: &str,
        user_id: &UserId,
    ) -> Result<RecognitionResult, RecognitionError>;

    /// Submit a user correction.
    async fn submit_correction(&self, request: &CorrectionRequest) -> Result<(), CorrectionError>;
}

/// reqwest-backed [`RecognitionService`].
#[derive(Clone)]
pub struct HttpRecognitionClient {
    inner: Arc<InnerClient>,
}

struct InnerClient {
    http: Client,
    base: Url,
    recognize: Url,
    feedback: Url,
    health: Url,
}

impl HttpRecognitionClient {
    /// Create a client for the service at `base_url`.
    ///
    /// The base may carry a path prefix (`https://host/api`); endpoint paths
    /// are resolved beneath it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the URL is malformed or not http(s).
    /// Returns [`ClientError::Http`] if the HTTP client fails to build.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let mut base =
            Url::parse(base_url.trim()).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!(
                "{base_url}: expected an http(s) base URL"
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let endpoint = |name: &str| {
            base.join(name)
                .map_err(|e| ClientError::InvalidUrl(e.to_string()))
        };
        let recognize = endpoint("process-ocr")?;
        let feedback = endpoint("submit-feedback")?;
        let health = endpoint("health")?;

        let http = Client::builder()
            .user_agent(concat!("inkpad/", env!("CARGO_PKG_VERSION")))
            // System proxy detection panics on some macOS configurations.
            .no_proxy()
            .build()?;

        Ok(Self {
            inner: Arc::new(InnerClient {
                http,
                base,
                recognize,
                feedback,
                health,
            }),
        })
    }

    /// The normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base
    }
}

impl std::fmt::Debug for HttpRecognitionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRecognitionClient")
            .field("base", &self.inner.base.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RecognitionService for HttpRecognitionClient {
    #[tracing::instrument(skip(self), fields(url = %self.inner.health))]
    async fn probe(&self) -> bool {
        match self.inner.http.get(self.inner.health.clone()).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!("Recognition service reachable");
                true
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "Health check failed");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Recognition service unreachable");
                false
            }
        }
    }

    #[tracing::instrument(skip(self, image_data_url), fields(user_id = %user_id, bytes = image_data_url.len()))]
    async fn recognize(
        &self,
        image_data_url: &str,
        user_id: &UserId,
    ) -> Result<RecognitionResult, RecognitionError> {
        let request = RecognitionRequest {
            image: image_data_url,
            user_id: user_id.as_str(),
        };
        let response = self
            .inner
            .http
            .post(self.inner.recognize.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecognitionError::Status(status.as_u16()));
        }

        let body: RecognitionResponse = response.json().await?;
        let result = body.into_result().map_err(RecognitionError::Rejected)?;
        tracing::info!(
            suggestions = result.suggestions.len(),
            confidence = ?result.confidence,
            "Recognition succeeded"
        );
        Ok(result)
    }

    #[tracing::instrument(skip(self, request), fields(user_id = %request.user_id))]
    async fn submit_correction(&self, request: &CorrectionRequest) -> Result<(), CorrectionError> {
        let response = self
            .inner
            .http
            .post(self.inner.feedback.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = match response.json::<FeedbackResponse>().await {
            Ok(body) => body,
            Err(_) if !status.is_success() => return Err(CorrectionError::Status(status.as_u16())),
            Err(e) => return Err(CorrectionError::Transport(e)),
        };

        if body.success {
            tracing::info!("Correction stored");
            Ok(())
        } else {
            Err(CorrectionError::Rejected(
                body.error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| "service reported failure".to_string()),
            ))
        }
    }
}
