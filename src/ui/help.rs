//! Help Overlay
//!
//! Shows keyboard shortcuts and help information.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, _app: &App) {
    let area = f.area();
    let popup_area = centered_rect(70, 80, area);

    f.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Navigation", Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("  j/k, ↑/↓    ", Style::default().fg(Color::Yellow)),
            Span::raw("Move up/down"),
        ]),
        Line::from(vec![
            Span::styled("  gg          ", Style::default().fg(Color::Yellow)),
            Span::raw("Go to top"),
        ]),
        Line::from(vec![
            Span::styled("  G           ", Style::default().fg(Color::Yellow)),
            Span::raw("Go to bottom"),
        ]),
        Line::from(vec![
            Span::styled("  Ctrl+d/u    ", Style::default().fg(Color::Yellow)),
            Span::raw("Page down/up"),
        ]),
        Line::from(vec![
            Span::styled("  1-9         ", Style::default().fg(Color::Yellow)),
            Span::raw("Jump to row"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Views", Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("  Enter       ", Style::default().fg(Color::Yellow)),
            Span::raw("Open the selected row's link"),
        ]),
        Line::from(vec![
            Span::styled("  o           ", Style::default().fg(Color::Yellow)),
            Span::raw("Open the row's job"),
        ]),
        Line::from(vec![
            Span::styled("  r           ", Style::default().fg(Color::Yellow)),
            Span::raw("Open the row's ruleset"),
        ]),
        Line::from(vec![
            Span::styled("  d           ", Style::default().fg(Color::Yellow)),
            Span::raw("View raw JSON"),
        ]),
        Line::from(vec![
            Span::styled("  Tab/S-Tab   ", Style::default().fg(Color::Yellow)),
            Span::raw("Next/previous rule tab (also l/h)"),
        ]),
        Line::from(vec![
            Span::styled("  b/Backspace ", Style::default().fg(Color::Yellow)),
            Span::raw("Go back"),
        ]),
        Line::from(vec![
            Span::styled("  R           ", Style::default().fg(Color::Yellow)),
            Span::raw("Refresh current view"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Filtering", Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("  /           ", Style::default().fg(Color::Yellow)),
            Span::raw("Start filtering"),
        ]),
        Line::from(vec![
            Span::styled("  Esc         ", Style::default().fg(Color::Yellow)),
            Span::raw("Clear filter"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Commands", Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("  :           ", Style::default().fg(Color::Yellow)),
            Span::raw("Enter command mode"),
        ]),
        Line::from(vec![
            Span::styled("  :audit      ", Style::default().fg(Color::Yellow)),
            Span::raw("Rules fired"),
        ]),
        Line::from(vec![
            Span::styled("  :hosts      ", Style::default().fg(Color::Yellow)),
            Span::raw("Hosts changed"),
        ]),
        Line::from(vec![
            Span::styled("  :jobs       ", Style::default().fg(Color::Yellow)),
            Span::raw("Jobs"),
        ]),
        Line::from(vec![
            Span::styled("  :dashboard  ", Style::default().fg(Color::Yellow)),
            Span::raw("Recent activity"),
        ]),
        Line::from(vec![
            Span::styled("  :rule <id>  ", Style::default().fg(Color::Yellow)),
            Span::raw("Open a rule by id (also :job, :ruleset)"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  ?/Esc       ", Style::default().fg(Color::Yellow)),
            Span::raw("Close help"),
        ]),
        Line::from(vec![
            Span::styled("  q           ", Style::default().fg(Color::Yellow)),
            Span::raw("Quit application"),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Help ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left);

    f.render_widget(paragraph, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
