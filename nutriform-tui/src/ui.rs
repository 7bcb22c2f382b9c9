//! Drawing of the application state.

use nutriform::{
    FieldKind, FlowState, FormField, LineKind, Notice, Report, Severity, ThemeMode,
};
use nutriform_html::markup_to_text;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{App, Target};

/// Color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub background: Color,
    pub text: Color,
    pub highlight: Color,
    pub error: Color,
    pub warning: Color,
    pub success: Color,
    pub border: Color,
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self {
                primary: Color::Blue,
                secondary: Color::Cyan,
                background: Color::White,
                text: Color::Black,
                highlight: Color::Magenta,
                error: Color::Red,
                warning: Color::Yellow,
                success: Color::Green,
                border: Color::DarkGray,
            },
            ThemeMode::Dark => Self {
                primary: Color::Cyan,
                secondary: Color::Blue,
                background: Color::Black,
                text: Color::White,
                highlight: Color::Yellow,
                error: Color::LightRed,
                warning: Color::LightYellow,
                success: Color::LightGreen,
                border: Color::Gray,
            },
        }
    }

    fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Success => self.success,
            Severity::Error => self.error,
            Severity::Warning => self.warning,
            Severity::Info => self.secondary,
        }
    }
}

pub fn draw(frame: &mut Frame, app: &App) {
    let session = app.session();
    let theme = Theme::for_mode(session.theme().mode());
    let area = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(2), // Progress bar
            Constraint::Min(10),   // Content
            Constraint::Length(3), // Help
        ])
        .split(area);

    let header = Paragraph::new(format!("{}  {}", app.title(), session.theme().icon()))
        .style(Style::default().fg(theme.primary).bold())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.border)),
        );
    frame.render_widget(header, chunks[0]);

    draw_progress(frame, app, &theme, chunks[1]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    draw_step(frame, app, &theme, columns[0]);

    let results = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(columns[1]);
    draw_recommendations(frame, app, &theme, results[0]);
    draw_comparison(frame, app, &theme, results[1]);

    let help = Paragraph::new(help_text(app))
        .style(Style::default().fg(theme.border))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(theme.border)),
        );
    frame.render_widget(help, chunks[3]);

    if let Some(notice) = session.notifications().visible() {
        draw_toast(frame, notice, &theme, area);
    }
}

/// Thin progress bar with the step counter centered below it.
fn draw_progress(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let wizard = app.session().wizard();
    let progress_text = format!(
        " Step {} / {} ({:.0}%) ",
        wizard.current_step(),
        wizard.total_steps(),
        wizard.progress_percent()
    );

    let bar_width = area.width.saturating_sub(2);
    let text_width = (progress_text.chars().count() as u16).min(bar_width);
    let filled_width = (wizard.progress_percent() / 100.0 * f64::from(bar_width)) as u16;
    let bar_x = area.x + 1;

    let track = Paragraph::new("─".repeat(bar_width as usize)).style(Style::default().fg(theme.border));
    frame.render_widget(track, Rect::new(bar_x, area.y, bar_width, 1));

    if filled_width > 0 {
        let filled =
            Paragraph::new("━".repeat(filled_width as usize)).style(Style::default().fg(theme.primary));
        frame.render_widget(filled, Rect::new(bar_x, area.y, filled_width, 1));
    }

    if area.height > 1 {
        let text_x = bar_x + (bar_width.saturating_sub(text_width)) / 2;
        let text = Paragraph::new(progress_text).style(Style::default().fg(theme.secondary));
        frame.render_widget(text, Rect::new(text_x, area.y + 1, text_width, 1));
    }
}

fn draw_step(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let wizard = app.session().wizard();
    let step = wizard.current_step();
    let title = wizard
        .definition()
        .step(step)
        .map(|s| format!(" {} ", s.title))
        .unwrap_or_default();
    let focused = app.focused();

    let mut lines: Vec<Line> = Vec::new();
    if step == 1
        && let Some(prelude) = &wizard.definition().prelude
    {
        lines.push(Line::from(Span::styled(
            prelude.clone(),
            Style::default().fg(theme.secondary).italic(),
        )));
        lines.push(Line::default());
    }

    for field in wizard.visible_fields(step) {
        let is_focused = focused.as_ref() == Some(&Target::Field(field.name().clone()));
        lines.extend(field_lines(app, field, is_focused, theme));
        lines.push(Line::default());
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.primary))
        .title(title)
        .title_style(Style::default().fg(theme.highlight));
    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(theme.text))
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(paragraph, area);
}

fn field_lines<'a>(app: &'a App, field: &'a FormField, focused: bool, theme: &Theme) -> Vec<Line<'a>> {
    let wizard = app.session().wizard();
    let value = wizard.values().value(field.name());
    let invalid = wizard.invalid_field() == Some(field.name());

    let marker = if focused { "► " } else { "  " };
    let required = if field.is_required() { "*" } else { "" };
    let label_style = if invalid {
        Style::default().fg(theme.error).bold()
    } else if focused {
        Style::default().fg(theme.highlight).bold()
    } else {
        Style::default().fg(theme.text)
    };
    let label = Span::styled(format!("{marker}{}{required}: ", field.label()), label_style);

    let mut lines = Vec::new();
    match field.kind() {
        FieldKind::Text => {
            let cursor = if focused { "▏" } else { "" };
            lines.push(Line::from(vec![label, Span::raw(format!("{value}{cursor}"))]));
        }

        FieldKind::Tags { tags } => {
            let cursor = if focused { "▏" } else { "" };
            lines.push(Line::from(vec![label, Span::raw(format!("{value}{cursor}"))]));
            let mut spans = vec![Span::raw("    ")];
            for (idx, tag) in tags.iter().enumerate() {
                let style = if focused && idx == app.tag_cursor() {
                    Style::default().fg(theme.highlight).bold()
                } else {
                    Style::default().fg(theme.secondary)
                };
                spans.push(Span::styled(format!("#{tag}"), style));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }

        FieldKind::CardSelect { choices } => {
            let selected = wizard.selected_card(field.name());
            let mut spans = vec![label];
            for choice in choices {
                if selected == Some(choice) {
                    spans.push(Span::styled(
                        format!("[{}]", choice.label),
                        Style::default().fg(theme.success).bold(),
                    ));
                } else {
                    spans.push(Span::raw(format!(" {} ", choice.label)));
                }
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }

        FieldKind::Dropdown { choices, .. } => {
            let dropdowns = wizard.dropdowns();
            let id = dropdowns.id_for(field.name());
            let trigger = id
                .and_then(|id| dropdowns.trigger_label(id).ok())
                .unwrap_or_default();
            let open = id.is_some_and(|id| dropdowns.is_open(id));
            let arrow = if open { "▴" } else { "▾" };
            lines.push(Line::from(vec![
                label,
                Span::styled(format!("{trigger} {arrow}"), Style::default().fg(theme.secondary)),
            ]));

            if open {
                let selected = id.and_then(|id| dropdowns.selected(id).ok().flatten());
                for (idx, choice) in choices.iter().enumerate() {
                    let pointer = if idx == app.menu_cursor() { "►" } else { " " };
                    let check = if selected == Some(idx) { "✓" } else { " " };
                    let style = if idx == app.menu_cursor() {
                        Style::default().fg(theme.highlight).bold()
                    } else {
                        Style::default().fg(theme.text)
                    };
                    lines.push(Line::from(Span::styled(
                        format!("      {pointer} {check} {}", choice.label),
                        style,
                    )));
                }
            }
        }
    }
    lines
}

fn draw_recommendations(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let reports = app.session().reports();
    let mut lines = if reports.results_visible() {
        flow_lines(reports.submission(), theme)
    } else {
        vec![Line::from(Span::styled(
            "Complete the form and press F5 on the last step.",
            Style::default().fg(theme.border),
        ))]
    };
    if reports.download_available() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "F4: Download Report",
            Style::default().fg(theme.success).bold(),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(theme.text))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .title(" Recommendations ")
                .title_style(Style::default().fg(theme.secondary)),
        );
    frame.render_widget(paragraph, area);
}

fn draw_comparison(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let focused = app.focused();
    let input = |label: &str, value: &str, target: Target| {
        let is_focused = focused.as_ref() == Some(&target);
        let style = if is_focused {
            Style::default().fg(theme.highlight).bold()
        } else {
            Style::default().fg(theme.text)
        };
        let marker = if is_focused { "► " } else { "  " };
        let cursor = if is_focused { "▏" } else { "" };
        Line::from(vec![
            Span::styled(format!("{marker}{label}: "), style),
            Span::raw(format!("{value}{cursor}")),
        ])
    };

    let mut lines = vec![
        input("Food 1", app.food_a(), Target::FoodA),
        input("Food 2", app.food_b(), Target::FoodB),
        Line::default(),
    ];
    lines.extend(flow_lines(app.session().reports().comparison(), theme));

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(theme.text))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .title(" Compare Foods ")
                .title_style(Style::default().fg(theme.secondary)),
        );
    frame.render_widget(paragraph, area);
}

fn flow_lines(state: &FlowState, theme: &Theme) -> Vec<Line<'static>> {
    match state {
        FlowState::Idle => Vec::new(),
        FlowState::Loading { message } => vec![Line::from(Span::styled(
            *message,
            Style::default().fg(theme.secondary).italic(),
        ))],
        FlowState::Success(Report::Markup(markup)) => markup_to_text(markup)
            .into_iter()
            .map(Line::from)
            .collect(),
        FlowState::Success(Report::Lines(lines)) => lines
            .iter()
            .map(|line| {
                let indent = "  ".repeat(line.depth);
                let style = match line.kind {
                    LineKind::Category => Style::default().fg(theme.primary).bold(),
                    LineKind::Item => Style::default().fg(theme.text),
                    LineKind::Empty => Style::default().fg(theme.border).italic(),
                };
                Line::from(Span::styled(format!("{indent}{}", line.text), style))
            })
            .collect(),
        FlowState::Error { message } => vec![Line::from(Span::styled(
            message.clone(),
            Style::default().fg(theme.error).bold(),
        ))],
    }
}

fn draw_toast(frame: &mut Frame, notice: &Notice, theme: &Theme, area: Rect) {
    let text = format!("{} {}", notice.severity.icon(), notice.message);
    let width = (text.chars().count() as u16 + 4).min(area.width);
    let rect = Rect::new(area.x + area.width.saturating_sub(width), area.y, width, area.height.min(3));
    let color = theme.severity(notice.severity);

    frame.render_widget(Clear, rect);
    let toast = Paragraph::new(text)
        .style(Style::default().fg(color).bold())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    frame.render_widget(toast, rect);
}

fn help_text(app: &App) -> &'static str {
    let wizard = app.session().wizard();
    if wizard.dropdowns().open_widget().is_some() {
        return "↑/↓: Select  Enter: Choose  Esc: Close";
    }
    match app.focused() {
        Some(Target::Field(field)) => match wizard.definition().field(&field).map(|f| f.kind()) {
            Some(FieldKind::CardSelect { .. }) => {
                "←/→: Choose  Tab: Next field  PgDn/PgUp: Step  F2: Theme  Esc: Quit"
            }
            Some(FieldKind::Dropdown { .. }) => {
                "Enter: Open  Tab: Next field  PgDn/PgUp: Step  F2: Theme  Esc: Quit"
            }
            Some(FieldKind::Tags { .. }) => {
                "←/→: Tag  Enter: Add tag  Tab: Next field  PgDn/PgUp: Step  Esc: Quit"
            }
            _ if wizard.is_last_step() => {
                "Tab: Next field  PgUp: Back  F5: Submit  F4: Download  F2: Theme  Esc: Quit"
            }
            _ => "Tab: Next field  PgDn/PgUp: Step  F2: Theme  Esc: Quit",
        },
        _ => "Enter: Compare  Tab: Next field  F2: Theme  Esc: Quit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutriform::{Session, ThemePreference, nutrient_form};
    use ratatui::{Terminal, backend::TestBackend};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn theme_palettes_differ() {
        let light = Theme::for_mode(ThemeMode::Light);
        let dark = Theme::for_mode(ThemeMode::Dark);
        assert_ne!(light.background, dark.background);
        assert_eq!(light.error, Color::Red);
    }

    #[test]
    fn draws_first_step() {
        let app = App::new(Session::new(
            nutrient_form().unwrap(),
            ThemePreference::default(),
        ));
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Personal details"));
        assert!(text.contains("Step 1 / 4"));
        assert!(text.contains("Compare Foods"));
    }
}
