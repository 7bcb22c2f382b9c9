//! The recommendation backend boundary.
//!
//! The core only knows two request/response contracts plus a download path.
//! `HttpBackend` speaks them over HTTP; `TestBackend` scripts them for tests.

use std::future::Future;

use nutriform_types::{
    ComparisonRequest, ComparisonResponse, DownloadToken, ErrorBody, RecommendationRequest,
    RecommendationResponse,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Endpoint for recommendation requests.
pub const RECOMMENDATIONS_PATH: &str = "/get_nutrient_recommendations";

/// Endpoint for food comparisons.
pub const COMPARE_PATH: &str = "/compare_foods";

/// Resource path of a generated report.
pub fn download_path(token: &DownloadToken) -> String {
    format!("/download/{token}")
}

/// Error type for backend requests.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The request never produced a response (connection refused, DNS, ...).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a failure status.
    #[error("Server responded with status {status}")]
    Server { status: u16, message: Option<String> },

    /// The server answered successfully but the body was not understood.
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl BackendError {
    /// The human-readable message supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } => message.as_deref().filter(|m| !m.trim().is_empty()),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }
}

/// Trait for the backend collaborator that computes reports.
pub trait ReportBackend {
    /// `POST /get_nutrient_recommendations`.
    fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> impl Future<Output = Result<RecommendationResponse, BackendError>> + Send;

    /// `POST /compare_foods`.
    fn compare(
        &self,
        request: &ComparisonRequest,
    ) -> impl Future<Output = Result<ComparisonResponse, BackendError>> + Send;
}

/// HTTP implementation of `ReportBackend` using JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend rooted at `base_url`, e.g. `http://127.0.0.1:5000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a resource path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Fetch a resource path (as produced by `download_path`) as raw bytes.
    pub async fn download(&self, path: &str) -> Result<Vec<u8>, BackendError> {
        let url = self.url(path);
        info!(%url, "downloading report");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Server {
                status: status.as_u16(),
                message: None,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, BackendError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            serde_json::from_slice(&bytes).map_err(|err| BackendError::Decode(err.to_string()))
        } else {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.error);
            Err(BackendError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }
}

impl ReportBackend for HttpBackend {
    async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResponse, BackendError> {
        self.post(RECOMMENDATIONS_PATH, request).await
    }

    async fn compare(&self, request: &ComparisonRequest) -> Result<ComparisonResponse, BackendError> {
        self.post(COMPARE_PATH, request).await
    }
}
