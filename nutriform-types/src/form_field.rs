use crate::{FieldName, FieldValues};

/// A single field in a form step.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    /// The name under which the field's value is collected and submitted.
    name: FieldName,

    /// The label shown next to the input.
    label: String,

    /// The kind of input (determines how the value is written).
    kind: FieldKind,

    /// Whether the step cannot be left while this field is blank.
    required: bool,

    /// When the field is shown.
    visibility: Visibility,

    /// Neutral value written when the field is hidden again.
    default: Option<String>,
}

impl FormField {
    /// Create a new optional, always-visible field.
    pub fn new(name: impl Into<FieldName>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            visibility: Visibility::Always,
            default: None,
        }
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Show the field only while `field` holds `value`.
    pub fn visible_when(mut self, field: impl Into<FieldName>, value: impl Into<String>) -> Self {
        self.visibility = Visibility::WhenEquals {
            field: field.into(),
            value: value.into(),
        };
        self
    }

    /// Set the neutral default value.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Get the field name.
    pub fn name(&self) -> &FieldName {
        &self.name
    }

    /// Get the label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the field kind.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Check whether the field is required.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Get the visibility rule.
    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    /// Get the neutral default value, if any.
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Check whether the field is shown given the current values.
    pub fn is_visible(&self, values: &FieldValues) -> bool {
        self.visibility.holds(values)
    }

    /// Get the choices of a card grid or dropdown field.
    pub fn choices(&self) -> &[Choice] {
        match &self.kind {
            FieldKind::CardSelect { choices } | FieldKind::Dropdown { choices, .. } => choices,
            FieldKind::Text | FieldKind::Tags { .. } => &[],
        }
    }
}

/// The kind of input backing a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Free text input.
    Text,

    /// Pick exactly one card from a grid.
    CardSelect { choices: Vec<Choice> },

    /// Pick one option from a custom dropdown menu.
    Dropdown {
        choices: Vec<Choice>,
        /// Label shown on the trigger before anything is chosen.
        placeholder: String,
    },

    /// Free text with clickable tag tokens that append to the value.
    Tags { tags: Vec<String> },
}

impl FieldKind {
    /// Create a card grid from plain values (label = value).
    pub fn cards<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::CardSelect {
            choices: values.into_iter().map(Choice::plain).collect(),
        }
    }

    /// Create a dropdown from plain values (label = value).
    pub fn dropdown<I, S>(placeholder: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Dropdown {
            choices: values.into_iter().map(Choice::plain).collect(),
            placeholder: placeholder.into(),
        }
    }

    /// Create a tag field from its tokens.
    pub fn tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Tags {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if this field is chosen from a fixed set of options.
    pub fn is_selection(&self) -> bool {
        matches!(self, Self::CardSelect { .. } | Self::Dropdown { .. })
    }
}

/// One option of a card grid or dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// The value written into the bound field.
    pub value: String,

    /// The display content.
    pub label: String,
}

impl Choice {
    /// Create a choice with distinct value and label.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Create a choice whose label is its value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Condition for a field to be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Always shown.
    Always,

    /// Shown only while the controlling field holds the given value.
    WhenEquals { field: FieldName, value: String },
}

impl Visibility {
    /// Evaluate the condition against the current values.
    pub fn holds(&self, values: &FieldValues) -> bool {
        match self {
            Self::Always => true,
            Self::WhenEquals { field, value } => values.value(field) == value.as_str(),
        }
    }

    /// Get the controlling field, if the visibility is conditional.
    pub fn controller(&self) -> Option<&FieldName> {
        match self {
            Self::Always => None,
            Self::WhenEquals { field, .. } => Some(field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conditional_visibility_follows_controller() {
        let field = FormField::new("pregnancy", "Pregnancy", FieldKind::Text)
            .visible_when("gender", "Female");
        let mut values = FieldValues::new();
        assert!(!field.is_visible(&values));
        values.set("gender", "Female");
        assert!(field.is_visible(&values));
        values.set("gender", "Male");
        assert!(!field.is_visible(&values));
        assert_eq!(field.visibility().controller(), Some(&FieldName::new("gender")));
    }

    #[test]
    fn choices_only_for_selection_kinds() {
        let cards = FormField::new("g", "G", FieldKind::cards(["A", "B"]));
        assert_eq!(cards.choices().len(), 2);
        assert!(cards.kind().is_selection());

        let text = FormField::new("t", "T", FieldKind::Text);
        assert!(text.choices().is_empty());
        assert!(!text.kind().is_selection());
    }
}
