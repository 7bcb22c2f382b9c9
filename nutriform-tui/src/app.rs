//! Keyboard-driven front-end state around a `Session`.
//!
//! Keys are translated into session events; the resulting effects are
//! handed back to the caller, except `Focus`, which only moves the cursor.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use nutriform::{
    ClickTarget, Effect, Event, FieldKind, FieldName, Notice, Session,
};
use tracing::debug;

/// Something on the page that can hold the keyboard focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Field(FieldName),
    FoodA,
    FoodB,
}

pub struct App {
    session: Session,
    title: String,
    focus: usize,
    /// Highlighted option of the open dropdown.
    menu_cursor: usize,
    /// Highlighted token of a tag field.
    tag_cursor: usize,
    food_a: String,
    food_b: String,
    quit: bool,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            title: "Nutrient Recommendations".to_string(),
            focus: 0,
            menu_cursor: 0,
            tag_cursor: 0,
            food_a: String::new(),
            food_b: String::new(),
            quit: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn food_a(&self) -> &str {
        &self.food_a
    }

    pub fn food_b(&self) -> &str {
        &self.food_b
    }

    pub fn menu_cursor(&self) -> usize {
        self.menu_cursor
    }

    pub fn tag_cursor(&self) -> usize {
        self.tag_cursor
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Focusable targets: the visible fields of the current step, then the
    /// two comparison inputs.
    pub fn targets(&self) -> Vec<Target> {
        let wizard = self.session.wizard();
        let mut targets: Vec<Target> = wizard
            .visible_fields(wizard.current_step())
            .into_iter()
            .map(|f| Target::Field(f.name().clone()))
            .collect();
        targets.push(Target::FoodA);
        targets.push(Target::FoodB);
        targets
    }

    pub fn focused(&self) -> Option<Target> {
        let targets = self.targets();
        targets.get(self.focus.min(targets.len().saturating_sub(1))).cloned()
    }

    /// Dispatch to the session, applying focus effects locally.
    pub fn dispatch(&mut self, event: Event, now: Instant) -> Vec<Effect> {
        let effects = self.session.dispatch(event, now);
        let mut rest = Vec::with_capacity(effects.len());
        for effect in effects {
            match effect {
                Effect::Focus(field) => self.focus_field(&field),
                other => rest.push(other),
            }
        }
        rest
    }

    pub fn notify(&mut self, notice: Notice, now: Instant) {
        self.session.notify(notice, now);
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        if key.kind != KeyEventKind::Press {
            return Vec::new();
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true;
                Vec::new()
            }
            KeyCode::F(2) => self.dispatch(Event::ToggleTheme, now),
            KeyCode::F(4) => self.dispatch(Event::Download, now),
            KeyCode::F(5) => {
                if self.session.wizard().nav_buttons().submit {
                    self.dispatch(Event::Submit, now)
                } else {
                    Vec::new()
                }
            }
            KeyCode::PageDown => self.change_step(Event::Advance, now),
            KeyCode::PageUp => self.change_step(Event::Retreat, now),
            KeyCode::Tab => self.move_focus(true, now),
            KeyCode::BackTab => self.move_focus(false, now),
            KeyCode::Esc => {
                if self.session.wizard().dropdowns().open_widget().is_some() {
                    self.dispatch(Event::Click(ClickTarget::Outside), now)
                } else {
                    self.quit = true;
                    Vec::new()
                }
            }
            code => self.key_on_target(code, now),
        }
    }

    fn change_step(&mut self, event: Event, now: Instant) -> Vec<Effect> {
        let before = self.session.wizard().current_step();
        let effects = self.dispatch(event, now);
        if self.session.wizard().current_step() != before {
            self.focus = 0;
            self.reset_cursors();
        }
        effects
    }

    fn move_focus(&mut self, forward: bool, now: Instant) -> Vec<Effect> {
        // Leaving a dropdown is a click elsewhere.
        let effects = if self.session.wizard().dropdowns().open_widget().is_some() {
            self.dispatch(Event::Click(ClickTarget::Outside), now)
        } else {
            Vec::new()
        };

        let len = self.targets().len();
        let current = self.focus.min(len - 1);
        self.focus = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.reset_cursors();
        effects
    }

    fn focus_field(&mut self, field: &FieldName) {
        if let Some(idx) = self
            .targets()
            .iter()
            .position(|t| matches!(t, Target::Field(f) if f == field))
        {
            debug!(%field, "focus moved by validation");
            self.focus = idx;
            self.reset_cursors();
        }
    }

    fn reset_cursors(&mut self) {
        self.menu_cursor = 0;
        self.tag_cursor = 0;
    }

    fn key_on_target(&mut self, code: KeyCode, now: Instant) -> Vec<Effect> {
        match self.focused() {
            Some(Target::Field(field)) => self.key_on_field(field, code, now),
            Some(Target::FoodA) => self.key_on_food(true, code, now),
            Some(Target::FoodB) => self.key_on_food(false, code, now),
            None => Vec::new(),
        }
    }

    fn key_on_field(&mut self, field: FieldName, code: KeyCode, now: Instant) -> Vec<Effect> {
        let Some(kind) = self
            .session
            .wizard()
            .definition()
            .field(&field)
            .map(|f| f.kind().clone())
        else {
            return Vec::new();
        };

        match kind {
            FieldKind::Text => self.edit_text(field, code, now),
            FieldKind::Tags { tags } => match code {
                KeyCode::Left if !tags.is_empty() => {
                    self.tag_cursor = (self.tag_cursor + tags.len() - 1) % tags.len();
                    Vec::new()
                }
                KeyCode::Right if !tags.is_empty() => {
                    self.tag_cursor = (self.tag_cursor + 1) % tags.len();
                    Vec::new()
                }
                KeyCode::Enter => match tags.get(self.tag_cursor) {
                    Some(tag) => self.dispatch(
                        Event::AppendTag {
                            field,
                            tag: tag.clone(),
                        },
                        now,
                    ),
                    None => Vec::new(),
                },
                _ => self.edit_text(field, code, now),
            },
            FieldKind::CardSelect { choices } => {
                if choices.is_empty() {
                    return Vec::new();
                }
                let current = self
                    .session
                    .wizard()
                    .selected_card(&field)
                    .and_then(|c| choices.iter().position(|o| o == c));
                let next = match (code, current) {
                    (KeyCode::Right, Some(idx)) => (idx + 1) % choices.len(),
                    (KeyCode::Left, Some(idx)) => (idx + choices.len() - 1) % choices.len(),
                    (KeyCode::Right | KeyCode::Left | KeyCode::Enter | KeyCode::Char(' '), None) => 0,
                    _ => return Vec::new(),
                };
                self.dispatch(
                    Event::ChooseCard {
                        field,
                        value: choices[next].value.clone(),
                    },
                    now,
                )
            }
            FieldKind::Dropdown { choices, .. } => {
                let dropdowns = self.session.wizard().dropdowns();
                let Some(widget) = dropdowns.id_for(&field) else {
                    return Vec::new();
                };
                if dropdowns.is_open(widget) {
                    match code {
                        KeyCode::Up => {
                            self.menu_cursor = self.menu_cursor.saturating_sub(1);
                            Vec::new()
                        }
                        KeyCode::Down => {
                            if self.menu_cursor + 1 < choices.len() {
                                self.menu_cursor += 1;
                            }
                            Vec::new()
                        }
                        KeyCode::Enter | KeyCode::Char(' ') => self.dispatch(
                            Event::Click(ClickTarget::Option {
                                widget,
                                option: self.menu_cursor,
                            }),
                            now,
                        ),
                        _ => Vec::new(),
                    }
                } else {
                    match code {
                        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down => {
                            self.menu_cursor =
                                dropdowns.selected(widget).ok().flatten().unwrap_or(0);
                            self.dispatch(Event::Click(ClickTarget::Trigger(widget)), now)
                        }
                        _ => Vec::new(),
                    }
                }
            }
        }
    }

    fn edit_text(&mut self, field: FieldName, code: KeyCode, now: Instant) -> Vec<Effect> {
        let mut value = self.session.wizard().values().value(&field).to_string();
        match code {
            KeyCode::Char(c) => value.push(c),
            KeyCode::Backspace => {
                if value.pop().is_none() {
                    return Vec::new();
                }
            }
            _ => return Vec::new(),
        }
        self.dispatch(Event::Input { field, value }, now)
    }

    fn key_on_food(&mut self, first: bool, code: KeyCode, now: Instant) -> Vec<Effect> {
        let buffer = if first {
            &mut self.food_a
        } else {
            &mut self.food_b
        };
        match code {
            KeyCode::Char(c) => {
                buffer.push(c);
                Vec::new()
            }
            KeyCode::Backspace => {
                buffer.pop();
                Vec::new()
            }
            KeyCode::Enter => {
                let event = Event::Compare {
                    food_a: self.food_a.clone(),
                    food_b: self.food_b.clone(),
                };
                self.dispatch(event, now)
            }
            _ => Vec::new(),
        }
    }
}
