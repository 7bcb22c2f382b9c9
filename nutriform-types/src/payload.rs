//! Request and response bodies exchanged with the recommendation backend.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{FieldName, FieldValues};

/// Body of `POST /get_nutrient_recommendations`.
///
/// All values are sent as the strings collected from the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub age: String,
    pub gender: String,
    pub height: String,
    pub weight: String,
    pub activity_level: String,
    pub pregnancy_or_lactation: String,
    pub health_condition: String,
    pub dietary_preferences: String,
}

impl RecommendationRequest {
    /// Build the request from collected field values. Unwritten fields are sent empty.
    pub fn from_values(values: &FieldValues) -> Self {
        let get = |name: &str| values.value(&FieldName::new(name)).to_string();
        Self {
            age: get("age"),
            gender: get("gender"),
            height: get("height"),
            weight: get("weight"),
            activity_level: get("activity_level"),
            pregnancy_or_lactation: get("pregnancy_or_lactation"),
            health_condition: get("health_condition"),
            dietary_preferences: get("dietary_preferences"),
        }
    }
}

/// The report part of a successful recommendation response.
///
/// The backend usually returns pre-rendered markup, but a structured
/// object is accepted too and rendered client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportBody {
    Markup(String),
    Structured(serde_json::Value),
}

/// Success body of `POST /get_nutrient_recommendations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendations: ReportBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_token: Option<DownloadToken>,
}

/// Body of `POST /compare_foods`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    pub foods: [String; 2],
}

impl ComparisonRequest {
    pub fn new(food_a: impl Into<String>, food_b: impl Into<String>) -> Self {
        Self {
            foods: [food_a.into(), food_b.into()],
        }
    }
}

/// Success body of `POST /compare_foods`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResponse {
    pub comparison: String,
}

/// Error body shared by both endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Opaque server-issued identifier for a generated report artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DownloadToken(String);

impl DownloadToken {
    /// Wrap a token. Blank tokens are treated as absent.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DownloadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_wire_field_names() {
        let values: FieldValues = [("age", "30"), ("activity_level", "Moderate")]
            .into_iter()
            .collect();
        let json = serde_json::to_value(RecommendationRequest::from_values(&values)).unwrap();
        assert_eq!(json["age"], "30");
        assert_eq!(json["activity_level"], "Moderate");
        assert_eq!(json["health_condition"], "");
        assert_eq!(json.as_object().unwrap().len(), 8);
    }

    #[test]
    fn markup_report_with_token() {
        let response: RecommendationResponse = serde_json::from_str(
            r#"{"recommendations": "<div>ok</div>", "download_token": "abc123"}"#,
        )
        .unwrap();
        assert_eq!(
            response.recommendations,
            ReportBody::Markup("<div>ok</div>".to_string())
        );
        assert_eq!(response.download_token.unwrap().as_str(), "abc123");
    }

    #[test]
    fn structured_report_without_token() {
        let response: RecommendationResponse =
            serde_json::from_str(r#"{"recommendations": {"BMI": 22.0}}"#).unwrap();
        assert!(matches!(response.recommendations, ReportBody::Structured(_)));
        assert!(response.download_token.is_none());
    }

    #[test]
    fn comparison_request_shape() {
        let json = serde_json::to_string(&ComparisonRequest::new("apple", "banana")).unwrap();
        assert_eq!(json, r#"{"foods":["apple","banana"]}"#);
    }

    #[test]
    fn error_body_message_is_optional() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.error, None);
        let body: ErrorBody = serde_json::from_str(r#"{"error": "food not found"}"#).unwrap();
        assert_eq!(body.error.as_deref(), Some("food not found"));
    }

    #[test]
    fn blank_token_is_absent() {
        assert!(DownloadToken::new("  ").is_none());
        assert_eq!(DownloadToken::new("abc").unwrap().to_string(), "abc");
    }
}
