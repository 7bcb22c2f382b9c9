use crate::FieldName;

/// Error raised when a form definition is malformed.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    /// A form needs at least one step.
    #[error("Form definition has no steps")]
    NoSteps,

    /// Two fields share a name.
    #[error("Duplicate field name: {0}")]
    DuplicateField(FieldName),

    /// A conditional field is controlled by a field that does not exist.
    #[error("Field '{field}' depends on unknown field '{controller}'")]
    UnknownController {
        field: FieldName,
        controller: FieldName,
    },
}
