//! The multi-step form wizard.
//!
//! Owns the current step, the collected field values, the page's dropdowns
//! and the inline validation marker. Transitions are plain method calls so
//! they can be exercised without any presentation layer.

use nutriform_types::{Choice, FieldKind, FieldName, FieldValues, FormDefinition, FormField};
use tracing::{debug, warn};

use crate::dropdown::{ClickTarget, DropdownRegistry, FieldChange};
use crate::error::{ValidationError, WidgetError};

/// Which navigation buttons are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavButtons {
    pub previous: bool,
    pub next: bool,
    pub submit: bool,
}

/// Step index and collected values of one page session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    current_step: usize,
    total_steps: usize,
    fields: FieldValues,
}

impl WizardState {
    fn new(total_steps: usize) -> Self {
        Self {
            current_step: 1,
            total_steps,
            fields: FieldValues::new(),
        }
    }

    /// The 1-based current step.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn fields(&self) -> &FieldValues {
        &self.fields
    }
}

/// The form wizard controller.
#[derive(Debug, Clone)]
pub struct FormWizard {
    definition: FormDefinition,
    state: WizardState,
    dropdowns: DropdownRegistry,
    /// Field currently marked visually invalid.
    invalid: Option<FieldName>,
    /// Field that last received focus from validation.
    focused: Option<FieldName>,
}

impl FormWizard {
    /// Start a wizard on step 1. Fields with a neutral default start with it.
    pub fn new(definition: FormDefinition) -> Self {
        let mut dropdowns = DropdownRegistry::new();
        dropdowns.bind_all(&definition);

        let mut state = WizardState::new(definition.total_steps());
        for field in definition.fields() {
            if let Some(default) = field.default_value() {
                state.fields.set(field.name().clone(), default);
                if dropdowns.id_for(field.name()).is_some() {
                    let _ = dropdowns.reset(field.name(), default);
                }
            }
        }

        Self {
            definition,
            state,
            dropdowns,
            invalid: None,
            focused: None,
        }
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn values(&self) -> &FieldValues {
        &self.state.fields
    }

    pub fn dropdowns(&self) -> &DropdownRegistry {
        &self.dropdowns
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.state.total_steps
    }

    pub fn is_last_step(&self) -> bool {
        self.state.current_step == self.state.total_steps
    }

    /// Progress bar percentage: 0 on the first step, 100 on the last.
    pub fn progress_percent(&self) -> f64 {
        if self.state.total_steps <= 1 {
            return 100.0;
        }
        (self.state.current_step - 1) as f64 / (self.state.total_steps - 1) as f64 * 100.0
    }

    /// Previous is hidden on step 1; next gives way to submit on the last step.
    pub fn nav_buttons(&self) -> NavButtons {
        let last = self.is_last_step();
        NavButtons {
            previous: self.state.current_step > 1,
            next: !last,
            submit: last,
        }
    }

    /// Fields of `step` that are currently shown, in declaration order.
    pub fn visible_fields(&self, step: usize) -> Vec<&FormField> {
        self.definition
            .step(step)
            .map(|s| {
                s.fields
                    .iter()
                    .filter(|f| f.is_visible(&self.state.fields))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The field marked invalid by the last failed validation.
    pub fn invalid_field(&self) -> Option<&FieldName> {
        self.invalid.as_ref()
    }

    /// The field focused by the last failed validation.
    pub fn focused_field(&self) -> Option<&FieldName> {
        self.focused.as_ref()
    }

    /// Check the required fields of `step` in declaration order. The first
    /// blank one is focused and marked invalid; later ones are not inspected.
    pub fn validate_step(&mut self, step: usize) -> Result<(), ValidationError> {
        let missing = self
            .visible_fields(step)
            .into_iter()
            .find(|f| f.is_required() && self.state.fields.is_blank(f.name()))
            .map(|f| (f.name().clone(), f.label().to_string()));

        match missing {
            Some((field, label)) => {
                warn!(step, %field, "required field is empty");
                self.invalid = Some(field.clone());
                self.focused = Some(field.clone());
                Err(ValidationError::MissingField { field, label })
            }
            None => {
                self.invalid = None;
                Ok(())
            }
        }
    }

    /// Move to the next step if the current one validates.
    pub fn advance(&mut self) -> Result<usize, ValidationError> {
        self.validate_step(self.state.current_step)?;
        if self.state.current_step < self.state.total_steps {
            self.state.current_step += 1;
        }
        self.dropdowns.close_all();
        debug!(step = self.state.current_step, "advanced");
        Ok(self.state.current_step)
    }

    /// Move to the previous step. No validation is needed to go back.
    pub fn retreat(&mut self) -> usize {
        if self.state.current_step > 1 {
            self.state.current_step -= 1;
        }
        self.dropdowns.close_all();
        debug!(step = self.state.current_step, "retreated");
        self.state.current_step
    }

    /// Write a free-text value.
    pub fn set_field(&mut self, field: &FieldName, value: impl Into<String>) -> Result<(), WidgetError> {
        let form_field = self.field(field)?;
        if form_field.kind().is_selection() {
            return Err(WidgetError::NotATextField(field.clone()));
        }
        self.write(FieldChange {
            field: field.clone(),
            value: value.into(),
        });
        Ok(())
    }

    /// Select a card: writes the scalar so exactly one card of the grid matches.
    pub fn choose_card(&mut self, field: &FieldName, value: &str) -> Result<(), WidgetError> {
        let form_field = self.field(field)?;
        if !matches!(form_field.kind(), FieldKind::CardSelect { .. }) {
            return Err(WidgetError::NotACardField(field.clone()));
        }
        if !form_field.choices().iter().any(|c| c.value == value) {
            return Err(WidgetError::UnknownChoice {
                field: field.clone(),
                value: value.to_string(),
            });
        }
        self.write(FieldChange {
            field: field.clone(),
            value: value.to_string(),
        });
        Ok(())
    }

    /// The card currently marked selected in a card grid.
    pub fn selected_card(&self, field: &FieldName) -> Option<&Choice> {
        let form_field = self.definition.field(field)?;
        let value = self.state.fields.value(field);
        form_field.choices().iter().find(|c| c.value == value)
    }

    /// Append a tag token to a text field, comma separated, unless the field
    /// already contains it (case-insensitive). Returns whether it was appended.
    pub fn append_tag(&mut self, field: &FieldName, token: &str) -> Result<bool, WidgetError> {
        let form_field = self.field(field)?;
        if form_field.kind().is_selection() {
            return Err(WidgetError::NotATextField(field.clone()));
        }

        let current = self.state.fields.value(field);
        if current.to_lowercase().contains(&token.to_lowercase()) {
            return Ok(false);
        }
        let value = if current.trim().is_empty() {
            token.to_string()
        } else {
            format!("{current}, {token}")
        };
        self.write(FieldChange {
            field: field.clone(),
            value,
        });
        Ok(true)
    }

    /// Route a click to the dropdowns; a chosen option is written like any
    /// other change so dependent fields react.
    pub fn click(&mut self, target: ClickTarget) -> Result<(), WidgetError> {
        let change = self.dropdowns.click(target, &mut self.state.fields)?;
        if let Some(change) = change {
            self.after_change(&change);
        }
        Ok(())
    }

    fn field(&self, field: &FieldName) -> Result<&FormField, WidgetError> {
        self.definition
            .field(field)
            .ok_or_else(|| WidgetError::UnknownField(field.clone()))
    }

    fn write(&mut self, change: FieldChange) {
        self.state
            .fields
            .set(change.field.clone(), change.value.clone());
        self.after_change(&change);
    }

    /// Clear the invalid marker of the edited field and hide-reset any field
    /// whose visibility depends on it.
    fn after_change(&mut self, change: &FieldChange) {
        if self.invalid.as_ref() == Some(&change.field) {
            self.invalid = None;
        }

        let hidden: Vec<(FieldName, String)> = self
            .definition
            .dependents(&change.field)
            .filter(|f| !f.is_visible(&self.state.fields))
            .map(|f| {
                (
                    f.name().clone(),
                    f.default_value().unwrap_or_default().to_string(),
                )
            })
            .collect();

        for (field, default) in hidden {
            debug!(%field, %default, "resetting hidden field");
            self.state.fields.set(field.clone(), default.clone());
            if self.dropdowns.id_for(&field).is_some() {
                let _ = self.dropdowns.reset(&field, &default);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrient_form::nutrient_form;

    fn name(s: &str) -> FieldName {
        FieldName::new(s)
    }

    fn wizard() -> FormWizard {
        FormWizard::new(nutrient_form().unwrap())
    }

    fn fill_step_one(w: &mut FormWizard) {
        w.set_field(&name("age"), "30").unwrap();
        w.choose_card(&name("gender"), "Female").unwrap();
    }

    #[test]
    fn starts_on_step_one_with_defaults() {
        let w = wizard();
        assert_eq!(w.current_step(), 1);
        assert_eq!(w.total_steps(), 4);
        assert_eq!(w.values().value(&name("pregnancy_or_lactation")), "None");
        assert_eq!(w.progress_percent(), 0.0);
        assert_eq!(
            w.nav_buttons(),
            NavButtons {
                previous: false,
                next: true,
                submit: false
            }
        );
    }

    #[test]
    fn advance_blocked_by_first_blank_field() {
        let mut w = wizard();
        let err = w.advance().unwrap_err();
        assert_eq!(err.field(), Some(&name("age")));
        assert_eq!(w.invalid_field(), Some(&name("age")));
        assert_eq!(w.focused_field(), Some(&name("age")));
        assert_eq!(w.current_step(), 1);

        w.set_field(&name("age"), "30").unwrap();
        assert_eq!(w.invalid_field(), None);
        let err = w.advance().unwrap_err();
        assert_eq!(err.field(), Some(&name("gender")));
        assert_eq!(w.current_step(), 1);
    }

    #[test]
    fn whitespace_counts_as_blank() {
        let mut w = wizard();
        w.set_field(&name("age"), "   ").unwrap();
        w.choose_card(&name("gender"), "Male").unwrap();
        assert!(w.advance().is_err());
    }

    #[test]
    fn progress_and_buttons_across_steps() {
        let mut w = wizard();
        fill_step_one(&mut w);
        assert_eq!(w.advance(), Ok(2));
        assert!(w.nav_buttons().previous);

        w.set_field(&name("height"), "165").unwrap();
        w.set_field(&name("weight"), "60").unwrap();
        let activity = w.dropdowns().id_for(&name("activity_level")).unwrap();
        w.click(ClickTarget::Option {
            widget: activity,
            option: 2,
        })
        .unwrap();
        assert_eq!(w.advance(), Ok(3));
        assert_eq!(w.advance(), Ok(4));

        assert_eq!(w.progress_percent(), 100.0);
        assert_eq!(
            w.nav_buttons(),
            NavButtons {
                previous: true,
                next: false,
                submit: true
            }
        );

        w.choose_card(&name("dietary_preferences"), "Vegan").unwrap();
        assert_eq!(w.advance(), Ok(4));
    }

    #[test]
    fn progress_is_monotonic() {
        let mut w = wizard();
        fill_step_one(&mut w);
        w.set_field(&name("height"), "165").unwrap();
        w.set_field(&name("weight"), "60").unwrap();
        let activity = w.dropdowns().id_for(&name("activity_level")).unwrap();
        w.click(ClickTarget::Option {
            widget: activity,
            option: 0,
        })
        .unwrap();

        let mut last = w.progress_percent();
        while !w.is_last_step() {
            w.advance().unwrap();
            assert!(w.progress_percent() > last);
            last = w.progress_percent();
        }
    }

    #[test]
    fn retreat_floors_at_one() {
        let mut w = wizard();
        assert_eq!(w.retreat(), 1);
        fill_step_one(&mut w);
        w.advance().unwrap();
        assert_eq!(w.retreat(), 1);
        assert_eq!(w.retreat(), 1);
    }

    #[test]
    fn hidden_required_fields_are_skipped() {
        let mut w = wizard();
        fill_step_one(&mut w);
        w.choose_card(&name("gender"), "Male").unwrap();
        assert!(w.visible_fields(3).iter().all(|f| f.name() != "pregnancy_or_lactation"));
        assert!(w.validate_step(3).is_ok());
    }

    #[test]
    fn leaving_female_resets_pregnancy() {
        let mut w = wizard();
        w.choose_card(&name("gender"), "Female").unwrap();
        let pregnancy = w.dropdowns().id_for(&name("pregnancy_or_lactation")).unwrap();
        w.click(ClickTarget::Option {
            widget: pregnancy,
            option: 1,
        })
        .unwrap();
        assert_eq!(w.values().value(&name("pregnancy_or_lactation")), "Pregnant");

        w.choose_card(&name("gender"), "Male").unwrap();
        assert_eq!(w.values().value(&name("pregnancy_or_lactation")), "None");
        assert_eq!(w.dropdowns().trigger_label(pregnancy).unwrap(), "None");
        assert_eq!(w.dropdowns().selected(pregnancy).unwrap(), Some(0));
    }

    #[test]
    fn card_grid_has_single_selection() {
        let mut w = wizard();
        w.choose_card(&name("gender"), "Male").unwrap();
        w.choose_card(&name("gender"), "Other").unwrap();
        assert_eq!(w.selected_card(&name("gender")).unwrap().value, "Other");
        assert!(matches!(
            w.choose_card(&name("gender"), "Robot"),
            Err(WidgetError::UnknownChoice { .. })
        ));
        assert!(matches!(
            w.choose_card(&name("age"), "30"),
            Err(WidgetError::NotACardField(_))
        ));
    }

    #[test]
    fn tags_append_without_duplicates() {
        let mut w = wizard();
        let field = name("health_condition");
        assert_eq!(w.append_tag(&field, "Diabetes"), Ok(true));
        assert_eq!(w.append_tag(&field, "Anemia"), Ok(true));
        assert_eq!(w.append_tag(&field, "diabetes"), Ok(false));
        assert_eq!(w.values().value(&field), "Diabetes, Anemia");
    }

    #[test]
    fn tag_substring_match_blocks_append() {
        let mut w = wizard();
        let field = name("health_condition");
        w.set_field(&field, "severe anemia").unwrap();
        assert_eq!(w.append_tag(&field, "Anemia"), Ok(false));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut w = wizard();
        assert!(matches!(
            w.set_field(&name("shoe_size"), "42"),
            Err(WidgetError::UnknownField(_))
        ));
        assert!(matches!(
            w.set_field(&name("gender"), "Female"),
            Err(WidgetError::NotATextField(_))
        ));
    }
}
