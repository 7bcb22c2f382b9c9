use crate::{DefinitionError, FieldName, FormField};

/// One page of a multi-page form.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Heading shown above the step's fields.
    pub title: String,

    /// Fields in declaration order.
    pub fields: Vec<FormField>,
}

impl Step {
    /// Create a new step.
    pub fn new(title: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            title: title.into(),
            fields,
        }
    }
}

/// The top-level structure containing all steps of a form.
///
/// A definition is presentation-agnostic: it can be driven by a terminal
/// front-end or materialised as HTML.
#[derive(Debug, Clone, PartialEq)]
pub struct FormDefinition {
    /// Optional message shown above the first step.
    pub prelude: Option<String>,

    /// Steps in order. Step numbers are 1-based.
    pub steps: Vec<Step>,
}

impl FormDefinition {
    /// Create a definition, checking that it is non-empty, field names are
    /// unique, and conditional fields refer to existing fields.
    pub fn new(steps: Vec<Step>) -> Result<Self, DefinitionError> {
        if steps.is_empty() {
            return Err(DefinitionError::NoSteps);
        }

        let definition = Self {
            prelude: None,
            steps,
        };

        let mut seen: Vec<&FieldName> = Vec::new();
        for field in definition.fields() {
            if seen.contains(&field.name()) {
                return Err(DefinitionError::DuplicateField(field.name().clone()));
            }
            seen.push(field.name());
        }

        for field in definition.fields() {
            if let Some(controller) = field.visibility().controller()
                && definition.field(controller).is_none()
            {
                return Err(DefinitionError::UnknownController {
                    field: field.name().clone(),
                    controller: controller.clone(),
                });
            }
        }

        Ok(definition)
    }

    /// Set the prelude message.
    pub fn with_prelude(mut self, prelude: impl Into<String>) -> Self {
        self.prelude = Some(prelude.into());
        self
    }

    /// Get the number of steps.
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Get a step by its 1-based number.
    pub fn step(&self, step: usize) -> Option<&Step> {
        step.checked_sub(1).and_then(|idx| self.steps.get(idx))
    }

    /// Get all fields across all steps, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FormField> {
        self.steps.iter().flat_map(|s| s.fields.iter())
    }

    /// Look up a field by name.
    pub fn field(&self, name: &FieldName) -> Option<&FormField> {
        self.fields().find(|f| f.name() == name)
    }

    /// Fields whose visibility is controlled by `controller`.
    pub fn dependents<'a>(
        &'a self,
        controller: &'a FieldName,
    ) -> impl Iterator<Item = &'a FormField> + 'a {
        self.fields()
            .filter(move |f| f.visibility().controller() == Some(controller))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldKind;

    #[test]
    fn rejects_empty_definition() {
        assert!(matches!(
            FormDefinition::new(Vec::new()),
            Err(DefinitionError::NoSteps)
        ));
    }

    #[test]
    fn rejects_duplicate_fields() {
        let steps = vec![
            Step::new("One", vec![FormField::new("a", "A", FieldKind::Text)]),
            Step::new("Two", vec![FormField::new("a", "A", FieldKind::Text)]),
        ];
        assert!(matches!(
            FormDefinition::new(steps),
            Err(DefinitionError::DuplicateField(_))
        ));
    }

    #[test]
    fn rejects_unknown_controller() {
        let steps = vec![Step::new(
            "One",
            vec![FormField::new("a", "A", FieldKind::Text).visible_when("missing", "x")],
        )];
        assert!(matches!(
            FormDefinition::new(steps),
            Err(DefinitionError::UnknownController { .. })
        ));
    }

    #[test]
    fn steps_are_one_based() {
        let steps = vec![
            Step::new("One", vec![FormField::new("a", "A", FieldKind::Text)]),
            Step::new("Two", vec![FormField::new("b", "B", FieldKind::Text)]),
        ];
        let definition = FormDefinition::new(steps).unwrap();
        assert_eq!(definition.total_steps(), 2);
        assert!(definition.step(0).is_none());
        assert_eq!(definition.step(1).unwrap().title, "One");
        assert_eq!(definition.step(2).unwrap().title, "Two");
        assert!(definition.step(3).is_none());
    }
}
