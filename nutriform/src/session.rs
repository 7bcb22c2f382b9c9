//! One page session: every controller plus the event dispatch table.
//!
//! `Session::dispatch` is a pure transition of `(state, event)` into a new
//! state and a list of effects for the caller to execute. Toasts are raised
//! on the session's own `NotificationCenter`.

use std::time::{Duration, Instant};

use nutriform_types::{
    ComparisonRequest, ComparisonResponse, FieldName, FormDefinition, RecommendationRequest,
    RecommendationResponse, ThemeMode,
};
use tracing::{debug, error};

use crate::backend::BackendError;
use crate::config::ClientConfig;
use crate::dropdown::ClickTarget;
use crate::error::{ClientError, ValidationError, WidgetError};
use crate::notify::{Notice, NotificationCenter};
use crate::nutrient_form::nutrient_form;
use crate::report::{ReportController, RequestTicket};
use crate::theme::{PreferenceStore, ThemePreference};
use crate::wizard::FormWizard;

/// Something the user (or a finished request, or the clock) did.
#[derive(Debug)]
pub enum Event {
    /// Free-text edit of a field.
    Input { field: FieldName, value: String },
    ChooseCard { field: FieldName, value: String },
    AppendTag { field: FieldName, tag: String },
    Click(ClickTarget),
    Advance,
    Retreat,
    Submit,
    Compare { food_a: String, food_b: String },
    Download,
    ToggleTheme,
    RecommendationArrived {
        ticket: RequestTicket,
        outcome: Result<RecommendationResponse, BackendError>,
    },
    ComparisonArrived {
        ticket: RequestTicket,
        outcome: Result<ComparisonResponse, BackendError>,
    },
    Tick,
}

/// Work the caller must perform on the session's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SendRecommendation {
        ticket: RequestTicket,
        request: RecommendationRequest,
    },
    SendComparison {
        ticket: RequestTicket,
        request: ComparisonRequest,
    },
    /// Go to a resource path (the report download).
    Navigate(String),
    PersistTheme(ThemeMode),
    Focus(FieldName),
}

#[derive(Debug, Clone)]
pub struct Session {
    wizard: FormWizard,
    reports: ReportController,
    notifications: NotificationCenter,
    theme: ThemePreference,
}

impl Session {
    pub fn new(definition: FormDefinition, theme: ThemePreference) -> Self {
        Self {
            wizard: FormWizard::new(definition),
            reports: ReportController::new(),
            notifications: NotificationCenter::default(),
            theme,
        }
    }

    /// The nutrient form session for `config`, with the theme read from `store`.
    pub fn from_config(
        config: &ClientConfig,
        store: &dyn PreferenceStore,
    ) -> Result<Self, ClientError> {
        let definition = nutrient_form()?;
        Ok(Self::new(definition, ThemePreference::load(store))
            .with_toast_duration(config.toast_duration()))
    }

    /// Use a custom toast duration.
    pub fn with_toast_duration(mut self, duration: Duration) -> Self {
        self.notifications = NotificationCenter::new(duration);
        self
    }

    pub fn wizard(&self) -> &FormWizard {
        &self.wizard
    }

    pub fn reports(&self) -> &ReportController {
        &self.reports
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn theme(&self) -> &ThemePreference {
        &self.theme
    }

    /// Raise a toast on behalf of the front-end (e.g. after running an effect).
    pub fn notify(&mut self, notice: Notice, now: Instant) {
        self.notifications.notify(notice, now);
    }

    /// Apply `event` at time `now`.
    pub fn dispatch(&mut self, event: Event, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();

        match event {
            Event::Input { field, value } => {
                let result = self.wizard.set_field(&field, value);
                self.widget_result(result);
            }
            Event::ChooseCard { field, value } => {
                let result = self.wizard.choose_card(&field, &value);
                self.widget_result(result);
            }
            Event::AppendTag { field, tag } => {
                let result = self.wizard.append_tag(&field, &tag).map(|appended| {
                    if !appended {
                        debug!(%field, %tag, "tag already present");
                    }
                });
                self.widget_result(result);
            }
            Event::Click(target) => {
                let result = self.wizard.click(target);
                self.widget_result(result);
            }
            Event::Advance => {
                if let Err(err) = self.wizard.advance() {
                    self.rejected(err, now, &mut effects);
                }
            }
            Event::Retreat => {
                self.wizard.retreat();
            }
            Event::Submit => match self.reports.begin_submit(&mut self.wizard) {
                Ok((ticket, request)) => {
                    effects.push(Effect::SendRecommendation { ticket, request });
                }
                Err(err) => self.rejected(err, now, &mut effects),
            },
            Event::Compare { food_a, food_b } => match self.reports.begin_compare(&food_a, &food_b) {
                Ok((ticket, request)) => effects.push(Effect::SendComparison { ticket, request }),
                Err(err) => self.rejected(err, now, &mut effects),
            },
            Event::Download => match self.reports.download() {
                Ok(path) => effects.push(Effect::Navigate(path)),
                Err(err) => self.notifications.notify(Notice::error(err.to_string()), now),
            },
            Event::ToggleTheme => {
                let mode = self.theme.toggle();
                effects.push(Effect::PersistTheme(mode));
            }
            Event::RecommendationArrived { ticket, outcome } => {
                if let Some(notice) = self.reports.finish_submit(ticket, outcome) {
                    self.notifications.notify(notice, now);
                }
            }
            Event::ComparisonArrived { ticket, outcome } => {
                if let Some(notice) = self.reports.finish_compare(ticket, outcome) {
                    self.notifications.notify(notice, now);
                }
            }
            Event::Tick => {
                self.notifications.tick(now);
            }
        }

        effects
    }

    fn rejected(&mut self, err: ValidationError, now: Instant, effects: &mut Vec<Effect>) {
        if let Some(field) = err.field() {
            effects.push(Effect::Focus(field.clone()));
        }
        self.notifications.notify(Notice::warning(err.to_string()), now);
    }

    /// Widget misuse keeps the page alive: log it and move on.
    fn widget_result(&self, result: Result<(), WidgetError>) {
        if let Err(err) = result {
            error!(%err, "ignored widget event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Severity;
    use crate::theme::MemoryPreferenceStore;

    fn session() -> Session {
        Session::new(nutrient_form().unwrap(), ThemePreference::default())
    }

    #[test]
    fn from_config_reads_theme_and_toast_duration() {
        let config = ClientConfig {
            toast_duration_ms: 500,
            ..ClientConfig::default()
        };
        let mut store = MemoryPreferenceStore::new();
        ThemePreference::new(ThemeMode::Dark)
            .persist(&mut store)
            .unwrap();

        let s = Session::from_config(&config, &store).unwrap();
        assert_eq!(s.theme().mode(), ThemeMode::Dark);
        assert_eq!(s.notifications().duration(), Duration::from_millis(500));
        assert_eq!(s.wizard().current_step(), 1);
    }

    #[test]
    fn blocked_advance_focuses_and_warns() {
        let mut s = session();
        let now = Instant::now();
        let effects = s.dispatch(Event::Advance, now);
        assert_eq!(effects, vec![Effect::Focus(FieldName::new("age"))]);
        assert_eq!(
            s.notifications().visible().map(|n| n.severity),
            Some(Severity::Warning)
        );
        assert_eq!(s.wizard().current_step(), 1);
    }

    #[test]
    fn widget_errors_are_inert() {
        let mut s = session();
        let effects = s.dispatch(
            Event::Input {
                field: FieldName::new("nope"),
                value: "x".to_string(),
            },
            Instant::now(),
        );
        assert!(effects.is_empty());
        assert!(s.notifications().visible().is_none());
    }

    #[test]
    fn download_without_token_notifies_only() {
        let mut s = session();
        let effects = s.dispatch(Event::Download, Instant::now());
        assert!(effects.is_empty());
        assert_eq!(
            s.notifications().visible().map(|n| n.severity),
            Some(Severity::Error)
        );
    }

    #[test]
    fn tick_dismisses_toast() {
        let mut s = session().with_toast_duration(Duration::from_millis(10));
        let start = Instant::now();
        s.dispatch(Event::Download, start);
        s.dispatch(Event::Tick, start + Duration::from_millis(10));
        assert!(s.notifications().visible().is_none());
    }

    #[test]
    fn toggle_theme_persists() {
        let mut s = session();
        let effects = s.dispatch(Event::ToggleTheme, Instant::now());
        assert_eq!(effects, vec![Effect::PersistTheme(ThemeMode::Dark)]);
        assert_eq!(s.theme().mode(), ThemeMode::Dark);
    }
}
