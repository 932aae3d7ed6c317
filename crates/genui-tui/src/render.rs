//! Drawing for the prompt form.

use genui_rs::ValidationIssue;
use genui_rs::controller::{FormState, GenerateResult};
use genui_rs::render::{Registry, RenderOutcome, RenderedLine, ValidatedRenderer};
use genui_rs::ui::{LogLevel, LogLine};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{ActivePane, App};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const IDLE_HINT: &str = "Describe a UI above and press Enter to generate it.";
const LOADING_TEXT: &str = "Generating UI from your prompt\u{2026}";

// ── Public Utilities ──────────────────────────────────────────────────

/// Truncate a string to at most `max` characters, appending "..." if
/// truncated.
pub fn truncate_str(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", s.get(..idx).unwrap_or(s)),
        None => s.to_string(),
    }
}

/// Map a log level to a ratatui [`Style`].
pub fn log_level_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Trace => Style::default().fg(Color::DarkGray),
        LogLevel::Debug => Style::default().fg(Color::Cyan),
        LogLevel::Info => Style::default().fg(Color::Green),
        LogLevel::Warn => Style::default().fg(Color::Yellow),
        LogLevel::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

/// Spinner glyph for the given frame.
pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER[tick % SPINNER.len()]
}

/// Style for a rendered node, keyed by its component type.
pub fn node_style(kind: &str) -> Style {
    match kind {
        "heading" => Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
        "card" | "form" => Style::default().fg(Color::Cyan),
        "button" => Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD),
        "input" => Style::default().fg(Color::Yellow),
        "badge" => Style::default().fg(Color::Magenta),
        "divider" | "stack" => Style::default().fg(Color::DarkGray),
        _ => Style::default(),
    }
}

// ── Root Render ───────────────────────────────────────────────────────

/// Draw one frame.
///
/// `snap` is a clone of the controller's state taken before drawing, so the
/// controller lock is never held while widgets are built.
pub(crate) fn render(
    frame: &mut Frame,
    snap: &FormState,
    app: &App,
    endpoint: &str,
    registry: &Registry,
) {
    let area = frame.area();

    // [3] header | [3] prompt | [flex] result (+ log) | [1] footer.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, chunks[0], snap, endpoint);
    render_input(frame, chunks[1], snap);

    if app.show_logs {
        let mid = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[2]);
        render_result(frame, mid[0], snap, app, registry);
        render_logs(frame, mid[1], &app.logs, app);
    } else {
        render_result(frame, chunks[2], snap, app, registry);
    }

    render_footer(frame, chunks[3], app);
}

// ── Header ────────────────────────────────────────────────────────────

fn render_header(frame: &mut Frame, area: Rect, snap: &FormState, endpoint: &str) {
    let status_style = match snap.result {
        GenerateResult::Idle => Style::default().fg(Color::DarkGray),
        GenerateResult::Loading => Style::default().fg(Color::Yellow),
        GenerateResult::Success { .. } => Style::default().fg(Color::Green),
        GenerateResult::Error { .. } => Style::default().fg(Color::Red),
    };
    let width = area.width.saturating_sub(24) as usize;

    let line = Line::from(vec![
        Span::styled("Endpoint: ", Style::default().fg(Color::DarkGray)),
        Span::raw(truncate_str(endpoint, width.max(16))),
        Span::raw("   "),
        Span::styled("Status: ", Style::default().fg(Color::DarkGray)),
        Span::styled(snap.result.label(), status_style),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(" Generative UI ");
    frame.render_widget(Paragraph::new(line).block(block), area);
}

// ── Prompt Input ──────────────────────────────────────────────────────

fn render_input(frame: &mut Frame, area: Rect, snap: &FormState) {
    let (title, border) = if snap.input_disabled() {
        (
            " Prompt  Generating\u{2026} ".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else if snap.can_submit() {
        (" Prompt  [Enter] Generate ".to_string(), Style::default().fg(Color::Green))
    } else {
        (" Prompt  [Enter] Generate ".to_string(), Style::default().fg(Color::DarkGray))
    };

    let text = if snap.input_disabled() {
        Line::from(Span::styled(
            format!("> {}", snap.prompt),
            Style::default().fg(Color::DarkGray),
        ))
    } else if snap.prompt.is_empty() {
        Line::from(vec![
            Span::raw("> \u{2588}"),
            Span::styled(
                " e.g. a login form with email and password",
                Style::default().fg(Color::DarkGray),
            ),
        ])
    } else {
        Line::from(format!("> {}\u{2588}", snap.prompt))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title);
    frame.render_widget(Paragraph::new(text).block(block), area);
}

// ── Result Panel ──────────────────────────────────────────────────────

fn render_result(frame: &mut Frame, area: Rect, snap: &FormState, app: &App, registry: &Registry) {
    let (title, border_color, lines) = result_lines(snap, app, registry);

    let inner_height = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(inner_height);
    let scroll = app.output_scroll.min(max_scroll);

    let border_color = if app.show_logs && app.active_pane != ActivePane::Output {
        Color::DarkGray
    } else {
        border_color
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll as u16, 0))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Title, border color, and body of the result panel.
fn result_lines(
    snap: &FormState,
    app: &App,
    registry: &Registry,
) -> (&'static str, Color, Vec<Line<'static>>) {
    match &snap.result {
        GenerateResult::Idle => (
            " Result ",
            Color::DarkGray,
            vec![Line::from(Span::styled(
                IDLE_HINT,
                Style::default().fg(Color::DarkGray),
            ))],
        ),
        GenerateResult::Loading => (
            " Result ",
            Color::Yellow,
            vec![Line::from(vec![
                Span::styled(
                    format!("{} ", spinner_frame(app.tick)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(LOADING_TEXT),
            ])],
        ),
        GenerateResult::Error { message, issues } => {
            let mut lines = vec![Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))];
            if let Some(issues) = issues
                && !issues.is_empty()
            {
                lines.push(Line::from(""));
                lines.extend(issue_lines(issues, Color::Red));
            }
            (" Generation Failed ", Color::Red, lines)
        }
        GenerateResult::Success { tree } => {
            match ValidatedRenderer::new(registry).render(tree) {
                RenderOutcome::Rendered(rendered) => {
                    (" Generated UI ", Color::Green, tree_lines(&rendered))
                }
                RenderOutcome::Invalid(issues) => {
                    let mut lines = vec![
                        Line::from(Span::styled(
                            "The generated tree could not be rendered:",
                            Style::default()
                                .fg(Color::Yellow)
                                .add_modifier(Modifier::BOLD),
                        )),
                        Line::from(""),
                    ];
                    lines.extend(issue_lines(&issues, Color::Yellow));
                    (" Generated UI ", Color::Yellow, lines)
                }
            }
        }
    }
}

fn issue_lines(issues: &[ValidationIssue], color: Color) -> Vec<Line<'static>> {
    issues
        .iter()
        .map(|issue| {
            Line::from(vec![
                Span::styled("  \u{2022} ", Style::default().fg(color)),
                Span::styled(issue.path.clone(), Style::default().fg(Color::Cyan)),
                Span::raw(format!(": {}", issue.message)),
            ])
        })
        .collect()
}

fn tree_lines(rendered: &[RenderedLine]) -> Vec<Line<'static>> {
    rendered
        .iter()
        .map(|line| {
            Line::from(vec![
                Span::raw("  ".repeat(line.depth)),
                Span::styled(line.text.clone(), node_style(&line.kind)),
            ])
        })
        .collect()
}

// ── Log Pane ──────────────────────────────────────────────────────────

fn render_logs(frame: &mut Frame, area: Rect, logs: &[LogLine], app: &App) {
    let inner_height = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = logs
        .iter()
        .filter(|log| !matches!(log.level, LogLevel::Trace | LogLevel::Debug))
        .map(|log| {
            Line::from(vec![
                Span::styled(format!("{} ", log.time), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{} ", log.level.label()), log_level_style(log.level)),
                Span::raw(log.message.as_str()),
            ])
        })
        .collect();

    let scroll = lines
        .len()
        .saturating_sub(inner_height)
        .saturating_sub(app.log_scroll);

    let border_color = if app.active_pane == ActivePane::Log {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Log ");

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll as u16, 0))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

// ── Footer ────────────────────────────────────────────────────────────

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let text = match app.status_message {
        Some(ref msg) => Span::styled(format!(" {msg}"), Style::default().fg(Color::Yellow)),
        None => Span::styled(
            " [Enter] generate  [F2] logs  [Tab] switch pane  [PgUp/PgDn] scroll  [Esc] quit",
            Style::default().fg(Color::DarkGray),
        ),
    };
    frame.render_widget(Paragraph::new(Line::from(text)), area);
}

// ── Tests ─────────────────────────────────────────────────────────────
