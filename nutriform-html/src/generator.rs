//! HTML generation for sessions, report lines, result panels and toasts.

use nutriform::{
    FieldKind, FlowState, FormField, FormWizard, LineKind, Notice, RenderLine, Report, Session,
    ThemeMode,
};

/// Horizontal indent per nesting level of a report line.
pub const INDENT_PX: usize = 20;

/// Options for HTML generation.
#[derive(Debug, Clone, Default)]
pub struct HtmlOptions {
    /// Title for the HTML document.
    pub title: Option<String>,
    /// Whether to include default CSS styling.
    pub include_styles: bool,
    /// Whether to generate a complete HTML document (with html/head/body tags).
    pub full_document: bool,
}

impl HtmlOptions {
    pub fn new() -> Self {
        Self {
            title: None,
            include_styles: true,
            full_document: true,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_styles(mut self, include: bool) -> Self {
        self.include_styles = include;
        self
    }

    /// Generate a complete HTML document or just the page fragment.
    pub fn full_document(mut self, full: bool) -> Self {
        self.full_document = full;
        self
    }
}

/// Render a snapshot of the whole page: theme, wizard step, results and toast.
pub fn to_html(session: &Session, options: &HtmlOptions) -> String {
    let mut html = String::new();
    let theme_class = theme_class(session.theme().mode());

    if options.full_document {
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("  <meta charset=\"UTF-8\">\n");
        html.push_str(
            "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        if let Some(title) = &options.title {
            html.push_str(&format!("  <title>{}</title>\n", escape_html(title)));
        }
        if options.include_styles {
            html.push_str(STYLES);
        }
        html.push_str(&format!("</head>\n<body class=\"{theme_class}\">\n"));
    } else {
        html.push_str(&format!("<div class=\"{theme_class}\">\n"));
    }

    html.push_str(&format!(
        "<button type=\"button\" class=\"theme-toggle\">{}</button>\n",
        session.theme().icon()
    ));

    if let Some(title) = &options.title {
        html.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));
    }

    html.push_str(&generate_form(session.wizard()));

    let reports = session.reports();
    let hidden = if reports.results_visible() { "" } else { " hidden" };
    html.push_str(&format!("<section id=\"results\"{hidden}>\n"));
    html.push_str(&format!(
        "  <div id=\"recommendations\">{}</div>\n",
        recommendations_html(reports.submission())
    ));
    if reports.download_available() {
        html.push_str("  <button type=\"button\" id=\"download-btn\">Download Report</button>\n");
    }
    html.push_str("</section>\n");

    html.push_str(&format!(
        "<section id=\"comparison-results\">{}</section>\n",
        comparison_html(reports.comparison())
    ));

    if let Some(notice) = session.notifications().visible() {
        html.push_str(&toast_html(notice));
        html.push('\n');
    }

    if options.full_document {
        html.push_str("</body>\n</html>\n");
    } else {
        html.push_str("</div>\n");
    }

    html
}

fn generate_form(wizard: &FormWizard) -> String {
    let mut html = String::from("<form id=\"nutrient-form\">\n");
    let step = wizard.current_step();

    if let Some(prelude) = &wizard.definition().prelude {
        html.push_str(&format!(
            "  <div class=\"prelude\">{}</div>\n",
            escape_html(prelude)
        ));
    }

    html.push_str(&format!(
        "  <div class=\"progress\"><div class=\"progress-bar\" style=\"width: {:.0}%\"></div></div>\n",
        wizard.progress_percent()
    ));

    html.push_str(&format!(
        "  <div class=\"form-step active\" data-step=\"{step}\">\n"
    ));
    if let Some(current) = wizard.definition().step(step) {
        html.push_str(&format!("    <h2>{}</h2>\n", escape_html(&current.title)));
    }
    for field in wizard.visible_fields(step) {
        html.push_str(&generate_field(wizard, field));
    }
    html.push_str("  </div>\n");

    let nav = wizard.nav_buttons();
    html.push_str("  <div class=\"form-nav\">\n");
    if nav.previous {
        html.push_str("    <button type=\"button\" class=\"prev-step\">Previous</button>\n");
    }
    if nav.next {
        html.push_str("    <button type=\"button\" class=\"next-step\">Next</button>\n");
    }
    if nav.submit {
        html.push_str("    <button type=\"submit\" class=\"submit-btn\">Get Recommendations</button>\n");
    }
    html.push_str("  </div>\n");

    html.push_str("</form>\n");
    html
}

fn generate_field(wizard: &FormWizard, field: &FormField) -> String {
    let name = field.name().as_str();
    let value = wizard.values().value(field.name());
    let invalid = wizard.invalid_field() == Some(field.name());
    let group_class = if invalid {
        "form-group is-invalid"
    } else {
        "form-group"
    };
    let required = if field.is_required() { " required" } else { "" };

    let mut html = format!("    <div class=\"{group_class}\">\n");
    html.push_str(&format!(
        "      <label for=\"{name}\">{}</label>\n",
        escape_html(field.label())
    ));

    match field.kind() {
        FieldKind::Text => {
            html.push_str(&text_input(wizard, field, value, required));
        }

        FieldKind::Tags { tags } => {
            html.push_str(&text_input(wizard, field, value, required));
            html.push_str("      <div class=\"tags\">\n");
            for tag in tags {
                let tag = escape_html(tag);
                html.push_str(&format!(
                    "        <span class=\"tag\" data-tag=\"{tag}\">{tag}</span>\n"
                ));
            }
            html.push_str("      </div>\n");
        }

        FieldKind::CardSelect { choices } => {
            let selected = wizard.selected_card(field.name());
            html.push_str(&format!("      <div class=\"card-grid\" data-field=\"{name}\">\n"));
            for choice in choices {
                let class = if selected == Some(choice) {
                    "select-card selected"
                } else {
                    "select-card"
                };
                html.push_str(&format!(
                    "        <div class=\"{class}\" data-value=\"{}\">{}</div>\n",
                    escape_html(&choice.value),
                    escape_html(&choice.label)
                ));
            }
            html.push_str("      </div>\n");
            html.push_str(&hidden_input(name, value));
        }

        FieldKind::Dropdown { choices, .. } => {
            let dropdowns = wizard.dropdowns();
            let id = dropdowns.id_for(field.name());
            let open = id.is_some_and(|id| dropdowns.is_open(id));
            let selected = id.and_then(|id| dropdowns.selected(id).ok().flatten());
            let label = id
                .and_then(|id| dropdowns.trigger_label(id).ok())
                .unwrap_or_default();

            let class = if open {
                "custom-dropdown open"
            } else {
                "custom-dropdown"
            };
            html.push_str(&format!("      <div class=\"{class}\" data-field=\"{name}\">\n"));
            html.push_str(&format!(
                "        <div class=\"dropdown-trigger\">{}</div>\n",
                escape_html(label)
            ));
            html.push_str("        <ul class=\"dropdown-menu\">\n");
            for (idx, choice) in choices.iter().enumerate() {
                let class = if selected == Some(idx) {
                    "dropdown-option selected"
                } else {
                    "dropdown-option"
                };
                html.push_str(&format!(
                    "          <li class=\"{class}\" data-value=\"{}\">{}</li>\n",
                    escape_html(&choice.value),
                    escape_html(&choice.label)
                ));
            }
            html.push_str("        </ul>\n");
            html.push_str(&format!("  {}", hidden_input(name, value)));
            html.push_str("      </div>\n");
        }
    }

    html.push_str("    </div>\n");
    html
}

fn text_input(wizard: &FormWizard, field: &FormField, value: &str, required: &str) -> String {
    let name = field.name().as_str();
    let autofocus = if wizard.focused_field() == Some(field.name()) {
        " autofocus"
    } else {
        ""
    };
    format!(
        "      <input type=\"text\" id=\"{name}\" name=\"{name}\" class=\"form-control\" value=\"{}\"{required}{autofocus}>\n",
        escape_html(value)
    )
}

fn hidden_input(name: &str, value: &str) -> String {
    format!(
        "      <input type=\"hidden\" id=\"{name}\" name=\"{name}\" value=\"{}\">\n",
        escape_html(value)
    )
}

/// One `<div>` per rendered line. Categories and items are indented by
/// `INDENT_PX` per level; the empty marker is not.
pub fn render_lines_html(lines: &[RenderLine]) -> String {
    let mut html = String::new();
    for line in lines {
        let text = escape_html(&line.text);
        match line.kind {
            LineKind::Empty => {
                html.push_str(&format!("<div class=\"empty-message\">{text}</div>\n"));
            }
            LineKind::Category | LineKind::Item => {
                let class = if line.kind == LineKind::Category {
                    "category"
                } else {
                    "item"
                };
                html.push_str(&format!(
                    "<div class=\"{class}\" style=\"margin-left: {}px\">{text}</div>\n",
                    line.depth * INDENT_PX
                ));
            }
        }
    }
    html
}

/// Content of the recommendations container. Server markup is inserted verbatim.
pub fn recommendations_html(state: &FlowState) -> String {
    flow_html(state, |markup| markup.to_string())
}

/// Content of the comparison container. The server's table is wrapped in a
/// scroll container.
pub fn comparison_html(state: &FlowState) -> String {
    flow_html(state, |markup| {
        format!("<div class=\"table-responsive\">{markup}</div>")
    })
}

fn flow_html(state: &FlowState, wrap_markup: impl Fn(&str) -> String) -> String {
    match state {
        FlowState::Idle => String::new(),
        FlowState::Loading { message } => format!("<p>{}</p>", escape_html(message)),
        FlowState::Success(Report::Markup(markup)) => wrap_markup(markup),
        FlowState::Success(Report::Lines(lines)) => render_lines_html(lines),
        FlowState::Error { message } => {
            format!(
                "<div class=\"alert alert-danger\">{}</div>",
                escape_html(message)
            )
        }
    }
}

/// The shared toast element in its visible state.
pub fn toast_html(notice: &Notice) -> String {
    format!(
        "<div class=\"toast show {}\"><span class=\"toast-icon\">{}</span><span class=\"toast-message\">{}</span></div>",
        notice.severity.class(),
        notice.severity.icon(),
        escape_html(&notice.message)
    )
}

fn theme_class(mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::Light => "light-mode",
        ThemeMode::Dark => "dark-mode",
    }
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const STYLES: &str = r#"  <style>
    body { max-width: 720px; margin: 2rem auto; font-family: sans-serif; }
    body.dark-mode { background: #1e1e1e; color: #eee; }
    .progress { height: 6px; background: #ddd; margin: 1rem 0; }
    .progress-bar { height: 100%; background: #4caf50; }
    .form-group { margin: 0.75rem 0; }
    .form-group.is-invalid .form-control { border-color: #d9534f; }
    .card-grid { display: flex; gap: 0.5rem; }
    .select-card { padding: 0.75rem 1rem; border: 1px solid #ccc; cursor: pointer; }
    .select-card.selected { border-color: #4caf50; background: #e8f5e9; }
    .custom-dropdown .dropdown-menu { display: none; list-style: none; padding: 0; }
    .custom-dropdown.open .dropdown-menu { display: block; }
    .dropdown-option.selected { font-weight: bold; }
    .tag { display: inline-block; margin: 0.25rem; padding: 0.1rem 0.5rem; border-radius: 1rem; background: #eee; cursor: pointer; }
    .category { font-weight: bold; margin-top: 0.5rem; }
    .empty-message { font-style: italic; color: #888; }
    .alert-danger { padding: 0.75rem; background: #f8d7da; color: #721c24; }
    .table-responsive { overflow-x: auto; }
    .toast { position: fixed; bottom: 1rem; right: 1rem; padding: 0.75rem 1rem; }
    .toast.success { background: #d4edda; }
    .toast.error { background: #f8d7da; }
    .toast.warning { background: #fff3cd; }
    .toast.info { background: #d1ecf1; }
  </style>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use nutriform::{
        ClickTarget, Event, FieldName, ThemePreference, nutrient_form, render::render,
    };
    use serde_json::json;
    use std::time::Instant;

    fn session() -> Session {
        Session::new(nutrient_form().unwrap(), ThemePreference::default())
    }

    #[test]
    fn html_options_chaining() {
        let options = HtmlOptions::new()
            .with_title("Report")
            .with_styles(false)
            .full_document(false);
        assert_eq!(options.title.as_deref(), Some("Report"));
        assert!(!options.include_styles);
        assert!(!options.full_document);
    }

    #[test]
    fn lines_get_classes_and_indent() {
        let lines = render(&json!({"Vitamins": {"C": "90 mg"}, "Note": "<b>"}));
        let html = render_lines_html(&lines);
        assert_eq!(
            html,
            "<div class=\"category\" style=\"margin-left: 0px\">Vitamins</div>\n\
             <div class=\"item\" style=\"margin-left: 20px\">C: 90 mg</div>\n\
             <div class=\"item\" style=\"margin-left: 0px\">Note: &lt;b&gt;</div>\n"
        );
    }

    #[test]
    fn empty_data_marker() {
        let html = render_lines_html(&render(&json!({})));
        assert_eq!(html, "<div class=\"empty-message\">No data available</div>\n");
    }

    #[test]
    fn flow_panels() {
        assert_eq!(recommendations_html(&FlowState::Idle), "");
        assert_eq!(
            recommendations_html(&FlowState::Loading {
                message: "Loading recommendations..."
            }),
            "<p>Loading recommendations...</p>"
        );
        assert_eq!(
            recommendations_html(&FlowState::Success(Report::Markup("<div>x</div>".into()))),
            "<div>x</div>"
        );
        assert_eq!(
            comparison_html(&FlowState::Success(Report::Markup("<table></table>".into()))),
            "<div class=\"table-responsive\"><table></table></div>"
        );
        let error = comparison_html(&FlowState::Error {
            message: "food not found".into(),
        });
        assert!(error.contains("alert-danger"));
        assert!(error.contains("food not found"));
    }

    #[test]
    fn toast_markup() {
        let html = toast_html(&Notice::warning("Please enter both foods to compare"));
        assert!(html.starts_with("<div class=\"toast show warning\">"));
        assert!(html.contains("⚠"));
    }

    #[test]
    fn page_reflects_wizard_state() {
        let mut s = session();
        let now = Instant::now();
        s.dispatch(Event::Advance, now);

        let html = to_html(&s, &HtmlOptions::new().with_title("Nutrients"));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<body class=\"light-mode\">"));
        assert!(html.contains("form-group is-invalid"));
        assert!(html.contains("autofocus"));
        assert!(html.contains("style=\"width: 0%\""));
        assert!(!html.contains("prev-step"));
        assert!(html.contains("<section id=\"results\" hidden>"));
        assert!(html.contains("toast show warning"));
        assert!(!html.contains("download-btn"));
    }

    #[test]
    fn page_shows_selected_card_and_open_dropdown() {
        let mut s = session();
        let now = Instant::now();
        s.dispatch(
            Event::Input {
                field: FieldName::new("age"),
                value: "30".into(),
            },
            now,
        );
        s.dispatch(
            Event::ChooseCard {
                field: FieldName::new("gender"),
                value: "Female".into(),
            },
            now,
        );
        let html = to_html(&s, &HtmlOptions::new().full_document(false));
        assert!(html.contains("<div class=\"select-card selected\" data-value=\"Female\">"));

        s.dispatch(Event::Advance, now);
        let activity = s
            .wizard()
            .dropdowns()
            .id_for(&FieldName::new("activity_level"))
            .unwrap();
        s.dispatch(Event::Click(ClickTarget::Trigger(activity)), now);
        let html = to_html(&s, &HtmlOptions::new().full_document(false));
        assert!(html.contains("custom-dropdown open"));
        assert!(html.contains("Select activity level"));
        assert!(html.contains("prev-step"));
    }
}
