//! The two report flows (recommendations and food comparison) plus the
//! download gate.
//!
//! Each flow runs `idle -> loading -> success | error` and keeps its own
//! request counter. A `RequestTicket` is issued when a flow starts loading;
//! only the outcome carrying the latest ticket is applied.

use nutriform_types::{
    ComparisonRequest, ComparisonResponse, DownloadToken, RecommendationRequest,
    RecommendationResponse, ReportBody,
};
use tracing::{debug, info, warn};

use crate::backend::{BackendError, ReportBackend, download_path};
use crate::error::{DownloadError, ValidationError};
use crate::notify::Notice;
use crate::render::{RenderLine, render};
use crate::wizard::FormWizard;

pub const LOADING_RECOMMENDATIONS: &str = "Loading recommendations...";
pub const COMPARING_FOODS: &str = "Comparing foods...";

pub const RECOMMENDATIONS_READY: &str = "Recommendations generated successfully!";
pub const COMPARISON_READY: &str = "Comparison complete!";

/// Shown when the server gave no usable error message.
pub const RECOMMENDATIONS_FAILED: &str = "Failed to get recommendations. Please try again.";
pub const COMPARISON_FAILED: &str = "Failed to compare foods. Please try again.";

/// The two independent request flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    Submission,
    Comparison,
}

/// Identifies one request of one flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    flow: Flow,
    seq: u64,
}

impl RequestTicket {
    pub fn flow(&self) -> Flow {
        self.flow
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// A displayable report: server markup inserted verbatim, or lines rendered
/// client-side from a structured object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Markup(String),
    Lines(Vec<RenderLine>),
}

impl From<ReportBody> for Report {
    fn from(body: ReportBody) -> Self {
        match body {
            ReportBody::Markup(markup) => Self::Markup(markup),
            ReportBody::Structured(value) => Self::Lines(render(&value)),
        }
    }
}

/// Presentation state of one results container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FlowState {
    #[default]
    Idle,
    Loading {
        message: &'static str,
    },
    Success(Report),
    Error {
        message: String,
    },
}

impl FlowState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

/// Controller for the submission and comparison flows.
#[derive(Debug, Clone, Default)]
pub struct ReportController {
    submission: FlowState,
    comparison: FlowState,
    token: Option<DownloadToken>,
    results_visible: bool,
    issued_submissions: u64,
    issued_comparisons: u64,
}

impl ReportController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submission(&self) -> &FlowState {
        &self.submission
    }

    pub fn comparison(&self) -> &FlowState {
        &self.comparison
    }

    /// Whether the recommendations results view has been revealed.
    pub fn results_visible(&self) -> bool {
        self.results_visible
    }

    pub fn token(&self) -> Option<&DownloadToken> {
        self.token.as_ref()
    }

    /// The download action is shown only while a token is held.
    pub fn download_available(&self) -> bool {
        self.token.is_some()
    }

    /// Validate the final step and move the submission flow to loading.
    ///
    /// Any previously held token is dropped here, so a failed resubmission
    /// leaves download disabled.
    pub fn begin_submit(
        &mut self,
        wizard: &mut FormWizard,
    ) -> Result<(RequestTicket, RecommendationRequest), ValidationError> {
        wizard.validate_step(wizard.total_steps())?;

        self.issued_submissions += 1;
        let ticket = RequestTicket {
            flow: Flow::Submission,
            seq: self.issued_submissions,
        };
        self.token = None;
        self.results_visible = true;
        self.submission = FlowState::Loading {
            message: LOADING_RECOMMENDATIONS,
        };
        info!(seq = ticket.seq, "submitting for recommendations");
        Ok((ticket, RecommendationRequest::from_values(wizard.values())))
    }

    /// Apply the outcome of a submission. Stale outcomes are dropped and
    /// produce no notice.
    pub fn finish_submit(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<RecommendationResponse, BackendError>,
    ) -> Option<Notice> {
        if !self.is_current(ticket) {
            warn!(seq = ticket.seq, latest = self.issued_submissions, "dropping stale recommendation response");
            return None;
        }

        match outcome {
            Ok(response) => {
                self.token = response
                    .download_token
                    .and_then(|t| DownloadToken::new(t.as_str()));
                self.submission = FlowState::Success(response.recommendations.into());
                info!(seq = ticket.seq, download = self.token.is_some(), "recommendations received");
                Some(Notice::success(RECOMMENDATIONS_READY))
            }
            Err(err) => {
                warn!(seq = ticket.seq, %err, "recommendation request failed");
                let message = err.server_message().unwrap_or(RECOMMENDATIONS_FAILED).to_string();
                self.token = None;
                self.submission = FlowState::Error {
                    message: message.clone(),
                };
                Some(Notice::error(message))
            }
        }
    }

    /// Check both foods and move the comparison flow to loading. On a blank
    /// input nothing changes.
    pub fn begin_compare(
        &mut self,
        food_a: &str,
        food_b: &str,
    ) -> Result<(RequestTicket, ComparisonRequest), ValidationError> {
        let (food_a, food_b) = (food_a.trim(), food_b.trim());
        if food_a.is_empty() || food_b.is_empty() {
            warn!("comparison requested with a blank food");
            return Err(ValidationError::MissingFood);
        }

        self.issued_comparisons += 1;
        let ticket = RequestTicket {
            flow: Flow::Comparison,
            seq: self.issued_comparisons,
        };
        self.comparison = FlowState::Loading {
            message: COMPARING_FOODS,
        };
        info!(seq = ticket.seq, food_a, food_b, "comparing foods");
        Ok((ticket, ComparisonRequest::new(food_a, food_b)))
    }

    /// Apply the outcome of a comparison. Never touches the download token.
    pub fn finish_compare(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<ComparisonResponse, BackendError>,
    ) -> Option<Notice> {
        if !self.is_current(ticket) {
            warn!(seq = ticket.seq, latest = self.issued_comparisons, "dropping stale comparison response");
            return None;
        }

        match outcome {
            Ok(response) => {
                self.comparison = FlowState::Success(Report::Markup(response.comparison));
                info!(seq = ticket.seq, "comparison received");
                Some(Notice::success(COMPARISON_READY))
            }
            Err(err) => {
                warn!(seq = ticket.seq, %err, "comparison request failed");
                let message = err.server_message().unwrap_or(COMPARISON_FAILED).to_string();
                self.comparison = FlowState::Error {
                    message: message.clone(),
                };
                Some(Notice::error(message))
            }
        }
    }

    /// Resource path of the held report.
    pub fn download(&self) -> Result<String, DownloadError> {
        let token = self.token.as_ref().ok_or(DownloadError)?;
        let path = download_path(token);
        debug!(%path, "download requested");
        Ok(path)
    }

    /// Run a whole submission against `backend`.
    pub async fn submit<B: ReportBackend>(
        &mut self,
        wizard: &mut FormWizard,
        backend: &B,
    ) -> Result<Option<Notice>, ValidationError> {
        let (ticket, request) = self.begin_submit(wizard)?;
        let outcome = backend.recommend(&request).await;
        Ok(self.finish_submit(ticket, outcome))
    }

    /// Run a whole comparison against `backend`.
    pub async fn compare<B: ReportBackend>(
        &mut self,
        food_a: &str,
        food_b: &str,
        backend: &B,
    ) -> Result<Option<Notice>, ValidationError> {
        let (ticket, request) = self.begin_compare(food_a, food_b)?;
        let outcome = backend.compare(&request).await;
        Ok(self.finish_compare(ticket, outcome))
    }

    fn is_current(&self, ticket: RequestTicket) -> bool {
        let latest = match ticket.flow {
            Flow::Submission => self.issued_submissions,
            Flow::Comparison => self.issued_comparisons,
        };
        ticket.seq == latest
    }
}
