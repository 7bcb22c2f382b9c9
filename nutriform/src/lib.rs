//! # nutriform
//!
//! Client-side controller for the nutrient recommendation form.
//! Presentation-agnostic.
//!
//! The crate holds the state machines behind the page: a multi-step form
//! wizard with custom dropdowns, the recommendation and comparison request
//! flows, toast notifications and the persisted theme. A `Session` ties them
//! together behind a single `dispatch(event, now)` entry point that returns
//! the effects (requests, navigation, persistence) for a front-end to run.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::time::Instant;
//! use nutriform::{Effect, Event, Session, ThemePreference, nutrient_form};
//!
//! let mut session = Session::new(nutrient_form()?, ThemePreference::default());
//! let effects = session.dispatch(Event::Submit, Instant::now());
//! for effect in effects {
//!     if let Effect::SendRecommendation { ticket, request } = effect {
//!         let outcome = backend.recommend(&request).await;
//!         session.dispatch(Event::RecommendationArrived { ticket, outcome }, Instant::now());
//!     }
//! }
//! ```
//!
//! ## Backends
//!
//! Requests go through the `ReportBackend` trait:
//! - `HttpBackend` - JSON over HTTP via reqwest
//! - `TestBackend` - scripted outcomes for tests

// Re-export all types from nutriform-types
pub use nutriform_types::*;

mod backend;
pub use backend::{
    BackendError, COMPARE_PATH, HttpBackend, RECOMMENDATIONS_PATH, ReportBackend, download_path,
};

mod config;
pub use config::{
    BASE_URL_ENV, CONFIG_ENV, ClientConfig, ConfigError, DEFAULT_BASE_URL, REPORT_FILE_NAME,
    resolve_config_path,
};

mod dropdown;
pub use dropdown::{ClickTarget, DropdownId, DropdownRegistry, FieldChange};

mod error;
pub use error::{ClientError, DownloadError, ValidationError, WidgetError};

mod logging;
pub use logging::{init_tracing, init_tracing_to_file};

mod notify;
pub use notify::{DEFAULT_TOAST_DURATION, Notice, NotificationCenter, Severity};

mod nutrient_form;
pub use nutrient_form::{
    HEALTH_CONDITION_TAGS, NO_PREGNANCY, PREGNANCY_ELIGIBLE_GENDER, nutrient_form,
};

pub mod render;
pub use render::{LineKind, NO_DATA, RenderLine};

mod report;
pub use report::{
    COMPARING_FOODS, COMPARISON_FAILED, COMPARISON_READY, Flow, FlowState,
    LOADING_RECOMMENDATIONS, RECOMMENDATIONS_FAILED, RECOMMENDATIONS_READY, Report,
    ReportController, RequestTicket,
};

mod session;
pub use session::{Effect, Event, Session};

mod theme;
pub use theme::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceError, PreferenceStore, THEME_KEY,
    ThemePreference,
};

mod wizard;
pub use wizard::{FormWizard, NavButtons, WizardState};

// Test backend for exercising the report flows without a server
mod test_backend;
pub use test_backend::TestBackend;
