//! Custom dropdown widgets and the registry that mediates which one is open.
//!
//! Every dropdown binds a trigger/menu pair to one scalar field. The registry
//! owns all dropdowns of a page and holds at most one open widget, so opening
//! one implicitly closes the previous one.

use nutriform_types::{Choice, FieldKind, FieldName, FieldValues, FormDefinition};
use tracing::{debug, error};

use crate::error::WidgetError;

/// Handle to a registered dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DropdownId(usize);

impl DropdownId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where a click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// A dropdown's trigger.
    Trigger(DropdownId),
    /// An option inside a dropdown's menu.
    Option { widget: DropdownId, option: usize },
    /// Anywhere that is not a trigger.
    Outside,
}

/// Change notification raised on a bound field after a choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: FieldName,
    pub value: String,
}

#[derive(Debug, Clone)]
struct Dropdown {
    field: FieldName,
    choices: Vec<Choice>,
    placeholder: String,
    selected: Option<usize>,
}

impl Dropdown {
    fn label(&self) -> &str {
        self.selected
            .and_then(|idx| self.choices.get(idx))
            .map(|c| c.label.as_str())
            .unwrap_or(self.placeholder.as_str())
    }
}

/// Owns the dropdowns of one page.
#[derive(Debug, Clone, Default)]
pub struct DropdownRegistry {
    widgets: Vec<Dropdown>,
    open: Option<DropdownId>,
}

impl DropdownRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a dropdown to `field`. The field must exist and be a dropdown field.
    pub fn bind(
        &mut self,
        definition: &FormDefinition,
        field: &FieldName,
    ) -> Result<DropdownId, WidgetError> {
        let Some(form_field) = definition.field(field) else {
            error!(%field, "dropdown bound to a field that does not exist");
            return Err(WidgetError::UnknownField(field.clone()));
        };
        let FieldKind::Dropdown {
            choices,
            placeholder,
        } = form_field.kind()
        else {
            error!(%field, "dropdown bound to a non-dropdown field");
            return Err(WidgetError::NotADropdown(field.clone()));
        };

        if let Some(existing) = self.id_for(field) {
            return Ok(existing);
        }

        let id = DropdownId(self.widgets.len());
        self.widgets.push(Dropdown {
            field: field.clone(),
            choices: choices.clone(),
            placeholder: placeholder.clone(),
            selected: None,
        });
        Ok(id)
    }

    /// Bind every dropdown field of the definition.
    pub fn bind_all(&mut self, definition: &FormDefinition) {
        let fields: Vec<FieldName> = definition
            .fields()
            .filter(|f| matches!(f.kind(), FieldKind::Dropdown { .. }))
            .map(|f| f.name().clone())
            .collect();
        for field in fields {
            // Cannot fail: the field was taken from the definition.
            let _ = self.bind(definition, &field);
        }
    }

    /// The dropdown bound to `field`, if any.
    pub fn id_for(&self, field: &FieldName) -> Option<DropdownId> {
        self.widgets
            .iter()
            .position(|w| &w.field == field)
            .map(DropdownId)
    }

    /// The currently open dropdown.
    pub fn open_widget(&self) -> Option<DropdownId> {
        self.open
    }

    pub fn is_open(&self, id: DropdownId) -> bool {
        self.open == Some(id)
    }

    /// Toggle a dropdown. Opening it closes whichever other one was open.
    /// Returns whether it is open afterwards.
    pub fn toggle(&mut self, id: DropdownId) -> Result<bool, WidgetError> {
        self.widget(id)?;
        if self.open == Some(id) {
            self.open = None;
        } else {
            if let Some(previous) = self.open {
                debug!(previous = previous.0, "closing previously open dropdown");
            }
            self.open = Some(id);
        }
        Ok(self.open == Some(id))
    }

    /// Close whichever dropdown is open.
    pub fn close_all(&mut self) {
        self.open = None;
    }

    /// Route a click. A trigger click only toggles its own dropdown; any other
    /// click closes every open dropdown (after applying an option choice).
    pub fn click(
        &mut self,
        target: ClickTarget,
        values: &mut FieldValues,
    ) -> Result<Option<FieldChange>, WidgetError> {
        match target {
            ClickTarget::Trigger(id) => {
                self.toggle(id)?;
                Ok(None)
            }
            ClickTarget::Option { widget, option } => {
                let change = self.choose(widget, option, values);
                self.close_all();
                change.map(Some)
            }
            ClickTarget::Outside => {
                self.close_all();
                Ok(None)
            }
        }
    }

    /// Choose an option: write the bound field, move the selection marker,
    /// and return the change notification for dependent logic.
    pub fn choose(
        &mut self,
        id: DropdownId,
        option: usize,
        values: &mut FieldValues,
    ) -> Result<FieldChange, WidgetError> {
        let widget = self.widget_mut(id)?;
        let Some(choice) = widget.choices.get(option) else {
            error!(widget = id.0, option, "dropdown option out of range");
            return Err(WidgetError::UnknownOption {
                widget: id.0,
                option,
            });
        };
        let change = FieldChange {
            field: widget.field.clone(),
            value: choice.value.clone(),
        };
        widget.selected = Some(option);
        values.set(change.field.clone(), change.value.clone());
        debug!(field = %change.field, value = %change.value, "dropdown option chosen");
        Ok(change)
    }

    /// Resynchronise the marker of the dropdown bound to `field` with `value`
    /// after the owner wrote the field directly. Unknown values clear it.
    pub fn reset(&mut self, field: &FieldName, value: &str) -> Result<(), WidgetError> {
        let id = self
            .id_for(field)
            .ok_or_else(|| WidgetError::NotADropdown(field.clone()))?;
        let widget = self.widget_mut(id)?;
        widget.selected = widget.choices.iter().position(|c| c.value == value);
        Ok(())
    }

    /// Label currently shown on the trigger.
    pub fn trigger_label(&self, id: DropdownId) -> Result<&str, WidgetError> {
        Ok(self.widget(id)?.label())
    }

    /// The option index carrying the selection marker.
    pub fn selected(&self, id: DropdownId) -> Result<Option<usize>, WidgetError> {
        Ok(self.widget(id)?.selected)
    }

    /// The options of a dropdown.
    pub fn choices(&self, id: DropdownId) -> Result<&[Choice], WidgetError> {
        Ok(&self.widget(id)?.choices)
    }

    /// The field a dropdown is bound to.
    pub fn field(&self, id: DropdownId) -> Result<&FieldName, WidgetError> {
        Ok(&self.widget(id)?.field)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    fn widget(&self, id: DropdownId) -> Result<&Dropdown, WidgetError> {
        self.widgets.get(id.0).ok_or(WidgetError::UnknownWidget(id.0))
    }

    fn widget_mut(&mut self, id: DropdownId) -> Result<&mut Dropdown, WidgetError> {
        self.widgets
            .get_mut(id.0)
            .ok_or(WidgetError::UnknownWidget(id.0))
    }
}
