//! Header Component
//!
//! Displays server, view, and context information.

use crate::app::{App, View};
use crate::VERSION;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" teda v{} ", VERSION),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    f.render_widget(block, area);

    // Split into rows
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    // Row 1: Server and view
    let view_label = match app.view {
        View::Collection => "Browse",
        View::Dashboard => "Dashboard",
        View::RuleDetail => "Rule",
        View::Job => "Job",
        View::Ruleset => "Ruleset",
    };
    let server_view = Line::from(vec![
        Span::styled(" Server: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            &app.client.base_url,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("View: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            view_label,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(server_view), rows[0]);

    // Row 2: Current collection and count
    let resource_info = if let Some(resource) = app.table_resource() {
        Line::from(vec![
            Span::styled(" Resource: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                &resource.display_name,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled("Count: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", app.filtered_items.len()),
                Style::default().fg(Color::White),
            ),
            if app.items.len() != app.filtered_items.len() {
                Span::styled(
                    format!(" (filtered from {})", app.items.len()),
                    Style::default().fg(Color::DarkGray),
                )
            } else {
                Span::raw("")
            },
        ])
    } else {
        Line::from(vec![
            Span::styled(" Path: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                app.path.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        ])
    };
    f.render_widget(Paragraph::new(resource_info), rows[1]);

    // Row 3: Link shortcuts (if the table has any)
    let links_line = if let Some(resource) = app.table_resource() {
        let link_hints: Vec<Span> = resource
            .shortcut_columns()
            .filter_map(|c| {
                c.shortcut.as_ref().map(|s| {
                    Span::styled(
                        format!(" [{}]{} ", s, c.header),
                        Style::default().fg(Color::DarkGray),
                    )
                })
            })
            .collect();

        if link_hints.is_empty() {
            Line::from(Span::raw(""))
        } else {
            let mut spans = vec![Span::styled(
                " Links:",
                Style::default().fg(Color::DarkGray),
            )];
            spans.extend(link_hints);
            Line::from(spans)
        }
    } else {
        Line::from(Span::raw(""))
    };
    f.render_widget(Paragraph::new(links_line), rows[2]);

    // Row 4: Help hint
    let help_line = Line::from(Span::styled(
        " ?:help  ::cmd  /:filter  R:refresh  b:back  q:quit",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(help_line), rows[3]);
}
