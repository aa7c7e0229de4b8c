//! Single-Record Views
//!
//! Field panes for one job or one ruleset. Jobs are selected
//! client-side out of the jobs list; rulesets have no endpoint of
//! their own and render the row context they were opened from.

use crate::app::App;
use crate::resource::extract_first;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use serde_json::Value;

pub fn render_job(f: &mut Frame, app: &App, area: Rect) {
    let Some(job) = app.job.as_ref() else {
        return;
    };

    let block = bordered(format!(" Job {} ", job.job_id));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();

    if let Some(record) = job.record.as_ref() {
        lines.push(field_line("Id", field(record, &["id"])));
        lines.push(field_line("Name", field(record, &["name"])));
        lines.push(field_line("Status", field(record, &["status"])));
    } else if job.missing {
        lines.push(Line::from(Span::styled(
            format!(" Job {} is not in the current jobs list.", job.job_id),
            Style::default().fg(Color::Yellow),
        )));
        lines.push(Line::from(""));
        if let Some(context) = job.context.as_ref() {
            lines.push(field_line("Linked from", field(context, &["name", "id"])));
            lines.push(field_line("Job name", field(context, &["job.name", "job_id"])));
            lines.push(field_line("Status", field(context, &["status"])));
        }
    } else {
        lines.push(Line::from(Span::styled(
            " Loading...",
            Style::default().fg(Color::Yellow),
        )));
    }

    lines.push(Line::from(""));
    lines.push(hint_line());

    f.render_widget(Paragraph::new(lines), inner);
}

pub fn render_ruleset(f: &mut Frame, app: &App, area: Rect) {
    let Some(ruleset) = app.ruleset.as_ref() else {
        return;
    };

    let block = bordered(format!(" Ruleset {} ", ruleset.ruleset_id));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines: Vec<Line> = vec![field_line("Id", ruleset.ruleset_id.clone())];

    if let Some(context) = ruleset.context.as_ref() {
        lines.push(field_line(
            "Name",
            field(context, &["ruleset.name", "name"]),
        ));
        lines.push(field_line("Rule", field(context, &["rule.name", "name"])));
        lines.push(field_line("Status", field(context, &["status"])));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " Shown from the row that linked here; the server exposes no ruleset detail.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines.push(Line::from(""));
    lines.push(hint_line());

    f.render_widget(Paragraph::new(lines), inner);
}

fn bordered(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
}

fn field(record: &Value, paths: &[&str]) -> String {
    extract_first(record, paths).unwrap_or_else(|| "-".to_string())
}

fn field_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {:<14}", label),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn hint_line() -> Line<'static> {
    Line::from(Span::styled(
        " d: raw JSON  b: back  q: quit",
        Style::default().fg(Color::DarkGray),
    ))
}
