//! Integration tests for the nutriform session

use std::time::{Duration, Instant};

use nutriform::{
    ClickTarget, DownloadError, Effect, Event, FieldName, FlowState, MemoryPreferenceStore,
    NO_DATA, PreferenceStore, ReportBackend, Report, Session, Severity, THEME_KEY, TestBackend,
    ThemeMode, ThemePreference, nutrient_form,
};

fn name(s: &str) -> FieldName {
    FieldName::new(s)
}

fn session() -> Session {
    Session::new(nutrient_form().unwrap(), ThemePreference::default())
}

/// Run every request effect against `backend` and feed the outcome back.
async fn run_effects(
    session: &mut Session,
    backend: &TestBackend,
    effects: Vec<Effect>,
    now: Instant,
) -> Vec<Effect> {
    let mut rest = Vec::new();
    for effect in effects {
        match effect {
            Effect::SendRecommendation { ticket, request } => {
                let outcome = backend.recommend(&request).await;
                rest.extend(session.dispatch(Event::RecommendationArrived { ticket, outcome }, now));
            }
            Effect::SendComparison { ticket, request } => {
                let outcome = backend.compare(&request).await;
                rest.extend(session.dispatch(Event::ComparisonArrived { ticket, outcome }, now));
            }
            other => rest.push(other),
        }
    }
    rest
}

fn input(session: &mut Session, field: &str, value: &str, now: Instant) {
    session.dispatch(
        Event::Input {
            field: name(field),
            value: value.to_string(),
        },
        now,
    );
}

fn card(session: &mut Session, field: &str, value: &str, now: Instant) {
    session.dispatch(
        Event::ChooseCard {
            field: name(field),
            value: value.to_string(),
        },
        now,
    );
}

fn pick(session: &mut Session, field: &str, option: usize, now: Instant) {
    let widget = session.wizard().dropdowns().id_for(&name(field)).unwrap();
    session.dispatch(Event::Click(ClickTarget::Trigger(widget)), now);
    session.dispatch(Event::Click(ClickTarget::Option { widget, option }), now);
}

/// Walk the whole form with the reference answers, ending on the last step.
fn fill_form(session: &mut Session, now: Instant) {
    input(session, "age", "30", now);
    card(session, "gender", "Female", now);
    assert!(session.dispatch(Event::Advance, now).is_empty());

    input(session, "height", "165", now);
    input(session, "weight", "60", now);
    pick(session, "activity_level", 2, now);
    assert!(session.dispatch(Event::Advance, now).is_empty());

    pick(session, "pregnancy_or_lactation", 1, now);
    assert!(session.dispatch(Event::Advance, now).is_empty());

    card(session, "dietary_preferences", "Vegan", now);
}

#[tokio::test]
async fn test_submit_and_download() {
    let backend = TestBackend::new().with_recommendation("<div>...</div>", Some("abc123"));
    let mut s = session();
    let now = Instant::now();
    fill_form(&mut s, now);
    assert!(s.wizard().is_last_step());

    let effects = s.dispatch(Event::Submit, now);
    assert!(s.reports().submission().is_loading());
    let rest = run_effects(&mut s, &backend, effects, now).await;
    assert!(rest.is_empty());

    let request = &backend.recommend_requests()[0];
    assert_eq!(request.age, "30");
    assert_eq!(request.gender, "Female");
    assert_eq!(request.height, "165");
    assert_eq!(request.weight, "60");
    assert_eq!(request.activity_level, "Moderate");
    assert_eq!(request.pregnancy_or_lactation, "Pregnant");
    assert_eq!(request.health_condition, "");
    assert_eq!(request.dietary_preferences, "Vegan");

    assert_eq!(
        s.reports().submission(),
        &FlowState::Success(Report::Markup("<div>...</div>".to_string()))
    );
    assert!(s.reports().download_available());
    assert_eq!(
        s.notifications().visible().map(|n| n.severity),
        Some(Severity::Success)
    );

    let effects = s.dispatch(Event::Download, now);
    assert_eq!(effects, vec![Effect::Navigate("/download/abc123".to_string())]);
}

#[tokio::test]
async fn test_compare_server_error() {
    let backend = TestBackend::new()
        .with_recommendation("<div>ok</div>", Some("keep"))
        .with_comparison_error(404, "food not found");
    let mut s = session();
    let now = Instant::now();
    fill_form(&mut s, now);
    let effects = s.dispatch(Event::Submit, now);
    run_effects(&mut s, &backend, effects, now).await;

    let effects = s.dispatch(
        Event::Compare {
            food_a: "apple".to_string(),
            food_b: "banana".to_string(),
        },
        now,
    );
    run_effects(&mut s, &backend, effects, now).await;

    let FlowState::Error { message } = s.reports().comparison() else {
        panic!("expected an error panel");
    };
    assert!(message.contains("food not found"));
    assert_eq!(s.reports().token().unwrap().as_str(), "keep");
    assert_eq!(
        s.notifications().visible().map(|n| n.severity),
        Some(Severity::Error)
    );
}

#[test]
fn test_compare_blank_input() {
    let mut s = session();
    let now = Instant::now();
    let effects = s.dispatch(
        Event::Compare {
            food_a: String::new(),
            food_b: "banana".to_string(),
        },
        now,
    );
    assert!(effects.is_empty());
    assert_eq!(s.reports().comparison(), &FlowState::Idle);
    assert_eq!(
        s.notifications().visible().map(|n| n.severity),
        Some(Severity::Warning)
    );
}

#[test]
fn test_theme_toggle_twice() {
    let mut store = MemoryPreferenceStore::new();
    store.set(THEME_KEY, "light").unwrap();
    let theme = ThemePreference::load(&store);
    let icon = theme.icon();
    let mut s = Session::new(nutrient_form().unwrap(), theme);

    for _ in 0..2 {
        for effect in s.dispatch(Event::ToggleTheme, Instant::now()) {
            if let Effect::PersistTheme(mode) = effect {
                store.set(THEME_KEY, mode.as_str()).unwrap();
            }
        }
    }

    assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));
    assert_eq!(s.theme().mode(), ThemeMode::Light);
    assert_eq!(s.theme().icon(), icon);
}

#[tokio::test]
async fn test_stale_submission_dropped() {
    let first = TestBackend::new().with_recommendation("<div>old</div>", Some("old"));
    let second = TestBackend::new().with_recommendation("<div>new</div>", Some("new"));
    let mut s = session();
    let now = Instant::now();
    fill_form(&mut s, now);

    let early = s.dispatch(Event::Submit, now);
    let late = s.dispatch(Event::Submit, now);
    run_effects(&mut s, &second, late, now).await;
    run_effects(&mut s, &first, early, now).await;

    assert_eq!(s.reports().token().unwrap().as_str(), "new");
    assert_eq!(
        s.reports().submission(),
        &FlowState::Success(Report::Markup("<div>new</div>".to_string()))
    );
}

#[tokio::test]
async fn test_failed_resubmission_disables_download() {
    let ok = TestBackend::new().with_recommendation("<div>ok</div>", Some("abc123"));
    let failing = TestBackend::new().with_silent_recommendation_error(500);
    let mut s = session();
    let now = Instant::now();
    fill_form(&mut s, now);

    let effects = s.dispatch(Event::Submit, now);
    run_effects(&mut s, &ok, effects, now).await;
    assert!(s.reports().download_available());

    let effects = s.dispatch(Event::Submit, now);
    run_effects(&mut s, &failing, effects, now).await;
    assert!(!s.reports().download_available());
    assert_eq!(s.reports().download(), Err(DownloadError));
    assert!(s.dispatch(Event::Download, now).is_empty());
}

#[tokio::test]
async fn test_structured_report() {
    let backend = TestBackend::new().with_structured_report(serde_json::json!({}), None);
    let mut s = session();
    let now = Instant::now();
    fill_form(&mut s, now);
    let effects = s.dispatch(Event::Submit, now);
    run_effects(&mut s, &backend, effects, now).await;

    let FlowState::Success(Report::Lines(lines)) = s.reports().submission() else {
        panic!("expected rendered lines");
    };
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].text, NO_DATA);
    assert!(!s.reports().download_available());
}

#[test]
fn test_gender_switch_resets_pregnancy() {
    let mut s = session();
    let now = Instant::now();
    card(&mut s, "gender", "Female", now);
    pick(&mut s, "pregnancy_or_lactation", 2, now);
    assert_eq!(
        s.wizard().values().value(&name("pregnancy_or_lactation")),
        "Lactating"
    );

    card(&mut s, "gender", "Other", now);
    assert_eq!(s.wizard().values().value(&name("pregnancy_or_lactation")), "None");
}

#[test]
fn test_single_open_dropdown() {
    let mut s = session();
    let now = Instant::now();
    card(&mut s, "gender", "Female", now);
    let activity = s.wizard().dropdowns().id_for(&name("activity_level")).unwrap();
    let pregnancy = s
        .wizard()
        .dropdowns()
        .id_for(&name("pregnancy_or_lactation"))
        .unwrap();

    s.dispatch(Event::Click(ClickTarget::Trigger(activity)), now);
    s.dispatch(Event::Click(ClickTarget::Trigger(pregnancy)), now);
    assert_eq!(s.wizard().dropdowns().open_widget(), Some(pregnancy));

    s.dispatch(Event::Click(ClickTarget::Outside), now);
    assert_eq!(s.wizard().dropdowns().open_widget(), None);
}

#[test]
fn test_toast_expires() {
    let mut s = session();
    let start = Instant::now();
    s.dispatch(Event::Advance, start);
    assert!(s.notifications().visible().is_some());
    s.dispatch(Event::Tick, start + Duration::from_millis(3999));
    assert!(s.notifications().visible().is_some());
    s.dispatch(Event::Tick, start + Duration::from_millis(4000));
    assert!(s.notifications().visible().is_none());
}
