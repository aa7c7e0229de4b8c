//! Rule Detail View
//!
//! Breadcrumb, tab strip, and tab body for a single audit rule. The
//! active tab derives from the current path on every render; the
//! Details tab shows a field pane from the details payload, the other
//! tabs show their sub-collection table.

use crate::app::App;
use crate::resource::extract_first;
use crate::ui::rows::format_fired_at;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};
use serde_json::Value;

pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Breadcrumb
            Constraint::Length(3), // Tab strip
            Constraint::Min(1),    // Tab body
        ])
        .split(area);

    render_breadcrumb(f, app, chunks[0]);
    render_tab_strip(f, app, chunks[1]);

    if app.table_resource().is_some() {
        super::render_main_content(f, app, chunks[2]);
    } else {
        render_details_pane(f, app, chunks[2]);
    }
}

fn render_breadcrumb(f: &mut Frame, app: &App, area: Rect) {
    let crumbs = app.detail_breadcrumbs();
    let mut spans: Vec<Span> = Vec::new();
    for (i, crumb) in crumbs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
        }
        let style = if i == crumbs.len() - 1 {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {}", crumb.clone()), style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tab_strip(f: &mut Frame, app: &App, area: Rect) {
    let tabs = app.rule_tabs();
    if tabs.is_empty() {
        return;
    }

    let active_label = app.active_tab_label();
    let selected = tabs
        .iter()
        .position(|t| t.title == active_label)
        .unwrap_or(1);

    let titles: Vec<Line> = tabs.iter().map(|t| Line::from(t.title.clone())).collect();

    let widget = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(widget, area);
}

fn render_details_pane(f: &mut Frame, app: &App, area: Rect) {
    let title = {
        let name = app.rule_title();
        if name.is_empty() {
            " Rule ".to_string()
        } else {
            format!(" {} ", name)
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(rule) = app.detail.as_ref().and_then(|d| d.rule.as_ref()) else {
        let waiting = Paragraph::new("Loading rule details...")
            .style(Style::default().fg(Color::Yellow));
        f.render_widget(waiting, inner);
        return;
    };

    let lines = vec![
        field_line("Name", field(rule, &["name"])),
        field_line("Description", field(rule, &["description"])),
        field_line("Status", field(rule, &["status"])),
        field_line("Rule type", field(rule, &["rule_type", "type"])),
        field_line("Ruleset", field(rule, &["ruleset.name", "ruleset.id", "ruleset_id"])),
        field_line("Job", field(rule, &["job.name", "job_id", "job.id"])),
        field_line("Last fired at", fired_at(rule)),
        Line::from(""),
        Line::from(Span::styled(
            " d: raw JSON  Tab: next tab  b: back",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    f.render_widget(Paragraph::new(lines), inner);
}

fn field(rule: &Value, paths: &[&str]) -> String {
    extract_first(rule, paths).unwrap_or_else(|| "-".to_string())
}

fn fired_at(rule: &Value) -> String {
    let raw = rule
        .get("last_fired_at")
        .or_else(|| rule.get("fired_date"));
    format_fired_at(raw)
}

fn field_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {:<16}", label),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}
