//! Core types for the nutriform client.
//!
//! This crate provides the foundational types shared by the client core and
//! its presentation adapters:
//! - `FormDefinition`, `Step` and `FormField` - The multi-step form structure
//! - `FieldValues` and `FieldName` - Collected scalar values keyed by field
//! - `RecommendationRequest` and friends - The backend request/response payloads
//! - `ThemeMode` - The persisted light/dark preference

mod field_name;
pub use field_name::FieldName;

mod field_values;
pub use field_values::FieldValues;

mod form_field;
pub use form_field::{Choice, FieldKind, FormField, Visibility};

mod form_definition;
pub use form_definition::{FormDefinition, Step};

mod payload;
pub use payload::{
    ComparisonRequest, ComparisonResponse, DownloadToken, ErrorBody, RecommendationRequest,
    RecommendationResponse, ReportBody,
};

mod theme;
pub use theme::ThemeMode;

mod error;
pub use error::DefinitionError;
