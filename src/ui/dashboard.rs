//! Dashboard View
//!
//! Two side-by-side panels of recent audit activity. Each panel
//! carries its own error so one failing endpoint does not blank the
//! other.

use crate::app::App;
use crate::resource::extract_first;
use crate::ui::rows::format_fired_at;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use serde_json::Value;

/// Rows shown per panel
const PANEL_LIMIT: usize = 8;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let dash = app.dashboard.as_ref();

    render_panel(
        f,
        panels[0],
        "Rules fired",
        dash.and_then(|d| d.rules.as_deref()),
        dash.and_then(|d| d.rules_error.as_deref()),
        &["name", "id"],
        &["last_fired_at"],
    );

    render_panel(
        f,
        panels[1],
        "Hosts changed",
        dash.and_then(|d| d.hosts.as_deref()),
        dash.and_then(|d| d.hosts_error.as_deref()),
        &["name", "host", "id"],
        &["fired_at", "last_fired_at"],
    );
}

/// Timestamp for a panel row, coalescing the same field chain the
/// table column uses
fn panel_fired_at(item: &Value, time_paths: &[&str]) -> String {
    let raw = time_paths
        .iter()
        .find_map(|path| item.get(*path).filter(|v| !v.is_null()));
    format_fired_at(raw)
}

fn render_panel(
    f: &mut Frame,
    area: Rect,
    name: &str,
    items: Option<&[Value]>,
    error: Option<&str>,
    label_paths: &[&str],
    time_paths: &[&str],
) {
    let count = items.map(|i| i.len()).unwrap_or(0);
    let title = format!(" {} [{}] ", name, count);

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

    if let Some(err) = error {
        let msg = Paragraph::new(err.to_string()).style(Style::default().fg(Color::Red));
        f.render_widget(msg, inner);
        return;
    }

    // No data and no error means the fetch is still in flight
    let Some(items) = items else {
        let msg = Paragraph::new("Loading...").style(Style::default().fg(Color::Yellow));
        f.render_widget(msg, inner);
        return;
    };

    if items.is_empty() {
        let msg =
            Paragraph::new("No recent activity").style(Style::default().fg(Color::DarkGray));
        f.render_widget(msg, inner);
        return;
    }

    let rows: Vec<ListItem> = items
        .iter()
        .take(PANEL_LIMIT)
        .map(|item| {
            let label = extract_first(item, label_paths).unwrap_or_default();
            let fired = panel_fired_at(item, time_paths);
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:<28}", label), Style::default().fg(Color::White)),
                Span::styled(fired, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    f.render_widget(List::new(rows), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HOST_TIME_PATHS: &[&str] = &["fired_at", "last_fired_at"];

    #[test]
    fn panel_timestamp_coalesces_host_fields() {
        // Host records sometimes carry only last_fired_at; the panel
        // must show the same time the table column would
        let item = json!({"name": "web-1", "last_fired_at": "2022-07-12T21:28:48Z"});
        assert_eq!(
            panel_fired_at(&item, HOST_TIME_PATHS),
            "7/12/22, 9:28:48 PM UTC"
        );
    }

    #[test]
    fn panel_timestamp_prefers_first_path() {
        let item = json!({
            "fired_at": "2022-07-12T09:00:00Z",
            "last_fired_at": "2021-01-01T00:00:00Z"
        });
        assert_eq!(
            panel_fired_at(&item, HOST_TIME_PATHS),
            "7/12/22, 9:00:00 AM UTC"
        );
    }

    #[test]
    fn panel_timestamp_missing_or_null_is_epoch() {
        let absent = json!({"name": "web-1"});
        let null = json!({"name": "web-1", "fired_at": null, "last_fired_at": null});
        for item in [absent, null] {
            assert_eq!(
                panel_fired_at(&item, HOST_TIME_PATHS),
                "1/1/70, 12:00:00 AM UTC"
            );
        }
    }
}
