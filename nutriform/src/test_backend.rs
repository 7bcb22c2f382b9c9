//! Test backend for exercising the report flows without a server.
//!
//! `TestBackend` answers every request with a pre-scripted outcome and
//! records what it was asked, so tests can assert on the request bodies.
//!
//! # Example
//!
//! ```rust,ignore
//! use nutriform::{ReportBackend, TestBackend};
//! use nutriform_types::ComparisonRequest;
//!
//! let backend = TestBackend::new().with_comparison_error(404, "food not found");
//! let err = backend
//!     .compare(&ComparisonRequest::new("apple", "banana"))
//!     .await
//!     .unwrap_err();
//! assert_eq!(err.server_message(), Some("food not found"));
//! assert_eq!(backend.compare_requests().len(), 1);
//! ```

use std::future::{Future, ready};
use std::sync::{Mutex, PoisonError};

use nutriform_types::{
    ComparisonRequest, ComparisonResponse, DownloadToken, RecommendationRequest,
    RecommendationResponse, ReportBody,
};

use crate::backend::{BackendError, ReportBackend};

#[derive(Debug, Clone)]
enum Outcome<T> {
    Reply(T),
    Server { status: u16, message: Option<String> },
}

impl<T: Clone> Outcome<T> {
    fn produce(outcome: Option<&Self>, endpoint: &str) -> Result<T, BackendError> {
        match outcome {
            Some(Self::Reply(value)) => Ok(value.clone()),
            Some(Self::Server { status, message }) => Err(BackendError::Server {
                status: *status,
                message: message.clone(),
            }),
            None => Err(BackendError::Decode(format!(
                "no scripted response for {endpoint}"
            ))),
        }
    }
}

/// A backend that returns pre-configured outcomes.
#[derive(Debug, Default)]
pub struct TestBackend {
    recommendation: Option<Outcome<RecommendationResponse>>,
    comparison: Option<Outcome<ComparisonResponse>>,
    recommend_requests: Mutex<Vec<RecommendationRequest>>,
    compare_requests: Mutex<Vec<ComparisonRequest>>,
}

impl TestBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer recommendation requests with pre-rendered markup and an optional token.
    pub fn with_recommendation(mut self, markup: impl Into<String>, token: Option<&str>) -> Self {
        self.recommendation = Some(Outcome::Reply(RecommendationResponse {
            recommendations: ReportBody::Markup(markup.into()),
            download_token: token.and_then(DownloadToken::new),
        }));
        self
    }

    /// Answer recommendation requests with a structured report.
    pub fn with_structured_report(mut self, report: serde_json::Value, token: Option<&str>) -> Self {
        self.recommendation = Some(Outcome::Reply(RecommendationResponse {
            recommendations: ReportBody::Structured(report),
            download_token: token.and_then(DownloadToken::new),
        }));
        self
    }

    /// Fail recommendation requests with a server error.
    pub fn with_recommendation_error(mut self, status: u16, message: impl Into<String>) -> Self {
        self.recommendation = Some(Outcome::Server {
            status,
            message: Some(message.into()),
        });
        self
    }

    /// Fail recommendation requests without an error body.
    pub fn with_silent_recommendation_error(mut self, status: u16) -> Self {
        self.recommendation = Some(Outcome::Server {
            status,
            message: None,
        });
        self
    }

    /// Answer comparison requests with table markup.
    pub fn with_comparison(mut self, markup: impl Into<String>) -> Self {
        self.comparison = Some(Outcome::Reply(ComparisonResponse {
            comparison: markup.into(),
        }));
        self
    }

    /// Fail comparison requests with a server error.
    pub fn with_comparison_error(mut self, status: u16, message: impl Into<String>) -> Self {
        self.comparison = Some(Outcome::Server {
            status,
            message: Some(message.into()),
        });
        self
    }

    /// Recommendation requests received so far.
    pub fn recommend_requests(&self) -> Vec<RecommendationRequest> {
        self.recommend_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Comparison requests received so far.
    pub fn compare_requests(&self) -> Vec<ComparisonRequest> {
        self.compare_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ReportBackend for TestBackend {
    fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> impl Future<Output = Result<RecommendationResponse, BackendError>> + Send {
        self.recommend_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        ready(Outcome::produce(
            self.recommendation.as_ref(),
            crate::backend::RECOMMENDATIONS_PATH,
        ))
    }

    fn compare(
        &self,
        request: &ComparisonRequest,
    ) -> impl Future<Output = Result<ComparisonResponse, BackendError>> + Send {
        self.compare_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        ready(Outcome::produce(
            self.comparison.as_ref(),
            crate::backend::COMPARE_PATH,
        ))
    }
}
