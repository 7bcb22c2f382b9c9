use nutriform_types::{DefinitionError, FieldName};

/// A locally detected input problem. Non-fatal: the flow does not proceed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field in the current step is blank.
    #[error("Please fill in '{label}' before continuing")]
    MissingField { field: FieldName, label: String },

    /// One of the two foods to compare is blank.
    #[error("Please enter both foods to compare")]
    MissingFood,
}

impl ValidationError {
    /// The offending field, if the error concerns one.
    pub fn field(&self) -> Option<&FieldName> {
        match self {
            Self::MissingField { field, .. } => Some(field),
            Self::MissingFood => None,
        }
    }
}

/// Misuse of a selection widget. Logged and ignored at runtime.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    #[error("No dropdown with id {0}")]
    UnknownWidget(usize),

    #[error("Dropdown {widget} has no option {option}")]
    UnknownOption { widget: usize, option: usize },

    #[error("Field '{0}' is not a dropdown field")]
    NotADropdown(FieldName),

    #[error("Field '{0}' is not a card field")]
    NotACardField(FieldName),

    #[error("Field '{field}' has no choice '{value}'")]
    UnknownChoice { field: FieldName, value: String },

    #[error("Field '{0}' is not a text field")]
    NotATextField(FieldName),

    #[error("Field '{0}' does not exist")]
    UnknownField(FieldName),
}

/// Download was requested without a held token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("No report available to download. Please generate recommendations first.")]
pub struct DownloadError;

/// Error type for client-level operations outside the pure state machines.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Configuration could not be read.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// The preference store failed.
    #[error(transparent)]
    Preference(#[from] crate::theme::PreferenceError),

    /// The form definition is malformed.
    #[error("Invalid form definition: {0}")]
    Definition(#[from] DefinitionError),

    /// The HTTP client could not be built.
    #[error(transparent)]
    Backend(#[from] crate::backend::BackendError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = ValidationError::MissingField {
            field: FieldName::new("age"),
            label: "Age".to_string(),
        };
        assert_eq!(err.to_string(), "Please fill in 'Age' before continuing");
        assert_eq!(err.field(), Some(&FieldName::new("age")));
        assert_eq!(ValidationError::MissingFood.field(), None);

        let err = ClientError::from(crate::backend::BackendError::Decode("eof".to_string()));
        assert!(err.to_string().contains("eof"));

        let err = ClientError::from(DefinitionError::NoSteps);
        assert_eq!(err.to_string(), "Invalid form definition: Form definition has no steps");
    }
}
