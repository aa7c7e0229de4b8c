//! Terminal User Interface rendering module
//!
//! This module handles all UI rendering for teda using the ratatui
//! framework. It provides a composable widget system for displaying
//! audit collections in a table format with vim-style navigation.
//!
//! # Architecture
//!
//! - [`splash`] - Startup splash screen animation
//! - `header` - Header bar with server/view info
//! - `help` - Help overlay showing keybindings
//! - `command_box` - Command mode input (`:` key)
//! - `detail` - Rule detail view with its tab strip
//! - `dashboard` - Recent activity panels
//! - `record` - Single-record views (job, ruleset)
//! - [`rows`] - Pure row/cell building from raw records
//!
//! # Virtual Scrolling
//!
//! The table rendering uses virtual scrolling for performance with large datasets.
//! Only visible rows are rendered, with a scrollbar indicating position.
//!
//! # JSON Highlighting
//!
//! The describe view provides syntax highlighting for JSON output:
//! - Keys in cyan
//! - Strings in green
//! - Numbers in light blue
//! - Booleans in magenta
//! - Null values in dark gray

mod command_box;
mod dashboard;
mod detail;
mod header;
mod help;
mod record;
pub mod rows;
pub mod splash;

use crate::app::{App, Mode, View};
use crate::resource::{get_color_for_value, ColumnDef};
use rows::{build_cell, CellContent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState,
        Table, TableState,
    },
    Frame,
};
use serde_json::Value;

pub fn render(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Header (multi-line)
            Constraint::Min(1),    // Main content (table or describe)
            Constraint::Length(1), // Footer/crumb
        ])
        .split(f.area());

    // Header - multi-line with context info
    header::render(f, app, chunks[0]);

    // Main content - depends on mode and view
    if app.mode == Mode::Describe {
        render_describe_view(f, app, chunks[1]);
    } else {
        match app.view {
            View::Collection => render_main_content(f, app, chunks[1]),
            View::RuleDetail => detail::render(f, app, chunks[1]),
            View::Dashboard => dashboard::render(f, app, chunks[1]),
            View::Job => record::render_job(f, app, chunks[1]),
            View::Ruleset => record::render_ruleset(f, app, chunks[1]),
        }
    }

    // Footer/crumb
    render_crumb(f, app, chunks[2]);

    // Overlays
    match app.mode {
        Mode::Help => {
            help::render(f, app);
        },
        Mode::Command => {
            command_box::render(f, app);
        },
        _ => {},
    }
}

fn render_main_content(f: &mut Frame, app: &mut App, area: Rect) {
    // If filter is active or has text, show filter input above table
    let show_filter = app.filter_active || !app.filter_text.is_empty();

    if show_filter {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area);

        render_filter_bar(f, app, chunks[0]);
        render_dynamic_table(f, app, chunks[1]);
    } else {
        render_dynamic_table(f, app, area);
    }
}

fn render_filter_bar(f: &mut Frame, app: &App, area: Rect) {
    let cursor_style = if app.filter_active {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let filter_display = if app.filter_active {
        format!("/{}_", app.filter_text)
    } else {
        format!("/{}", app.filter_text)
    };

    let paragraph = Paragraph::new(Line::from(vec![Span::styled(filter_display, cursor_style)]));
    f.render_widget(paragraph, area);
}

/// Render dynamic table based on the resource definition behind the
/// current route. Uses virtual scrolling for performance with large
/// datasets.
fn render_dynamic_table(f: &mut Frame, app: &mut App, area: Rect) {
    let Some(resource) = app.table_resource() else {
        let msg = Paragraph::new("Unknown resource").style(Style::default().fg(Color::Red));
        f.render_widget(msg, area);
        return;
    };

    // Build title with counts
    let title = {
        let count = app.filtered_items.len();
        let total = app.items.len();

        if app.filter_text.is_empty() {
            format!(" {}[{}] ", resource.display_name, count)
        } else {
            format!(" {}[{}/{}] ", resource.display_name, count, total)
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
        ))
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    // Calculate viewport - account for header row
    let visible_height = (inner_area.height as usize).saturating_sub(1);
    app.update_viewport(visible_height);
    app.ensure_visible();

    let total_items = app.filtered_items.len();
    let needs_scrollbar = total_items > visible_height;

    // Adjust table area for scrollbar if needed
    let table_area = if needs_scrollbar {
        Rect {
            width: inner_area.width.saturating_sub(1),
            ..inner_area
        }
    } else {
        inner_area
    };

    // Get visible range for virtual scrolling
    let range = app.visible_range();

    let header_cells: Vec<Cell> = resource
        .columns
        .iter()
        .map(|col| {
            Cell::from(format!(" {}", col.header)).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        })
        .collect();

    let header = Row::new(header_cells).height(1);

    // Build only visible rows (virtual scrolling)
    let table_rows: Vec<Row> = app.filtered_items[range.clone()]
        .iter()
        .map(|item| Row::new(data_cells(item, &resource.columns)))
        .collect();

    let widths: Vec<Constraint> = resource
        .columns
        .iter()
        .map(|col| Constraint::Percentage(col.width))
        .collect();

    let table = Table::new(table_rows, widths)
        .header(header)
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    // Adjust selected index for virtual scrolling
    let mut state = TableState::default();
    if app.selected >= range.start && app.selected < range.end {
        state.select(Some(app.selected - range.start));
    }

    f.render_stateful_widget(table, table_area, &mut state);

    // Render scrollbar if needed
    if needs_scrollbar {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .symbols(symbols::scrollbar::VERTICAL)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));

        let mut scrollbar_state = ScrollbarState::new(total_items.saturating_sub(visible_height))
            .position(app.scroll_offset);

        f.render_stateful_widget(scrollbar, inner_area, &mut scrollbar_state);
    }
}

/// Build styled cells for one record (shared by the main table and the
/// dashboard panels)
fn data_cells(item: &Value, columns: &[ColumnDef]) -> Vec<Cell<'static>> {
    columns
        .iter()
        .map(|col| {
            let content = build_cell(col, item);
            let style = get_cell_style(&content, col);
            let display_value = format_cell_value(content.label(), col);
            Cell::from(format!(" {}", truncate_string(&display_value, 38))).style(style)
        })
        .collect()
}

/// Get cell style based on content and column definition
fn get_cell_style(content: &CellContent, col: &ColumnDef) -> Style {
    if let Some(ref color_map_name) = col.color_map {
        if let Some([r, g, b]) = get_color_for_value(color_map_name, content.label()) {
            return Style::default().fg(Color::Rgb(r, g, b));
        }
    }

    match content {
        CellContent::Link { .. } => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::UNDERLINED),
        CellContent::Text(_) => Style::default(),
    }
}

/// Format cell value, adding indicators for transitional states
fn format_cell_value(value: &str, col: &ColumnDef) -> String {
    // Check if this is a status column with transitional states
    if col.color_map.is_some() {
        let lower = value.to_lowercase();
        if lower.contains("pending") || lower.contains("starting") || lower.contains("running") {
            return format!("{} ↻", value);
        }
    }
    value.to_string()
}

/// Truncate string for display (Unicode-safe)
fn truncate_string(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

fn render_describe_view(f: &mut Frame, app: &mut App, area: Rect) {
    let json = app
        .selected_item_json()
        .unwrap_or_else(|| "No item selected".to_string());

    // Apply JSON syntax highlighting
    let lines: Vec<Line> = json.lines().map(highlight_json_line).collect();
    let total_lines = lines.len();

    let title = match app.view {
        View::Job => " Job Details ".to_string(),
        View::Ruleset => " Ruleset Details ".to_string(),
        View::RuleDetail if app.table_resource().is_none() => " Rule Details ".to_string(),
        _ => {
            if let Some(resource) = app.table_resource() {
                format!(" {} Details ", resource.display_name)
            } else {
                " Details ".to_string()
            }
        },
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    // Calculate max scroll based on inner area (content area without borders)
    let visible_lines = inner_area.height as usize;
    app.update_describe_viewport(visible_lines);
    let max_scroll = total_lines.saturating_sub(visible_lines);
    let scroll = app.describe_scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines.clone()).scroll((scroll as u16, 0));

    f.render_widget(paragraph, inner_area);

    // Render scrollbar if content exceeds visible area
    if total_lines > visible_lines {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state = ScrollbarState::new(max_scroll + visible_lines).position(scroll);
        f.render_stateful_widget(scrollbar, inner_area, &mut scrollbar_state);
    }
}

/// Apply JSON syntax highlighting to a single line
fn highlight_json_line(line: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = line.chars().peekable();
    let mut current = String::new();
    let mut is_key = true;

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if !current.is_empty() {
                    spans.push(Span::raw(current.clone()));
                    current.clear();
                }

                let mut string_content = String::from("\"");
                while let Some(&next_c) = chars.peek() {
                    chars.next();
                    string_content.push(next_c);
                    if next_c == '"' {
                        break;
                    }
                    if next_c == '\\' {
                        if let Some(&escaped) = chars.peek() {
                            chars.next();
                            string_content.push(escaped);
                        }
                    }
                }

                let style = if is_key {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::Green)
                };
                spans.push(Span::styled(string_content, style));
            },
            ':' => {
                current.push(c);
                spans.push(Span::styled(
                    current.clone(),
                    Style::default().fg(Color::White),
                ));
                current.clear();
                is_key = false;
            },
            ',' => {
                if !current.is_empty() {
                    let style = get_json_value_style(&current);
                    spans.push(Span::styled(current.clone(), style));
                    current.clear();
                }
                spans.push(Span::styled(
                    ",".to_string(),
                    Style::default().fg(Color::White),
                ));
                is_key = true;
            },
            '{' | '}' | '[' | ']' => {
                if !current.is_empty() {
                    let style = get_json_value_style(&current);
                    spans.push(Span::styled(current.clone(), style));
                    current.clear();
                }
                spans.push(Span::styled(
                    c.to_string(),
                    Style::default().fg(Color::Yellow),
                ));
                if c == '{' || c == '[' {
                    is_key = c == '{';
                }
            },
            ' ' | '\t' => {
                if !current.is_empty() {
                    let style = get_json_value_style(&current);
                    spans.push(Span::styled(current.clone(), style));
                    current.clear();
                }
                spans.push(Span::raw(c.to_string()));
            },
            _ => {
                current.push(c);
            },
        }
    }

    if !current.is_empty() {
        let style = get_json_value_style(&current);
        spans.push(Span::styled(current, style));
    }

    Line::from(spans)
}

/// Get style for JSON values (numbers, booleans, null)
fn get_json_value_style(value: &str) -> Style {
    let trimmed = value.trim();
    if trimmed == "null" {
        Style::default().fg(Color::DarkGray)
    } else if trimmed == "true" || trimmed == "false" {
        Style::default().fg(Color::Magenta)
    } else if trimmed.parse::<f64>().is_ok() {
        Style::default().fg(Color::LightBlue)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_crumb(f: &mut Frame, app: &App, area: Rect) {
    let breadcrumb = app.get_breadcrumb();
    let crumb_display = breadcrumb.join(" > ");

    // Build link shortcut hints for the table on screen
    let shortcuts_hint = {
        let resource = app.table_resource();
        if let Some(resource) = resource.filter(|_| app.mode == Mode::Normal) {
            let mut hints: Vec<String> = Vec::new();
            if resource.primary_link().is_some() {
                hints.push("Enter:open".to_string());
            }
            hints.extend(
                resource
                    .shortcut_columns()
                    .filter_map(|c| c.shortcut.as_ref().map(|s| format!("{}:{}", s, c.header))),
            );
            if hints.is_empty() {
                String::new()
            } else {
                format!(" | {}", hints.join(" "))
            }
        } else {
            String::new()
        }
    };

    let status_text = if let Some(err) = &app.error_message {
        format!("Error: {}", err)
    } else if app.loading {
        "Loading...".to_string()
    } else if app.mode == Mode::Describe {
        "j/k: scroll | q/d/Esc: back".to_string()
    } else if app.filter_active {
        "Type to filter | Enter: apply | Esc: clear".to_string()
    } else {
        shortcuts_hint
    };

    let style = if app.error_message.is_some() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if app.loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let crumb = Line::from(vec![
        Span::styled(
            format!("<{}>", crumb_display),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(status_text, style),
    ]);

    let paragraph = Paragraph::new(crumb);
    f.render_widget(paragraph, area);
}
