//! Event Handling
//!
//! Keyboard and event handling for teda.

use crate::app::{App, Mode, View};
use anyhow::Result;
use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use std::time::Duration;

/// Handle events, returns true if app should quit.
///
/// The poll is non-blocking; when no input is waiting we sleep on the
/// runtime instead, so spawned fetch tasks get to run and their
/// outcomes are ready for the next drain.
pub async fn handle_events(app: &mut App) -> Result<bool> {
    if poll(Duration::ZERO)? {
        if let Event::Key(key) = read()? {
            return handle_key_event(app, key.code, key.modifiers);
        }
        return Ok(false);
    }

    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(false)
}

fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    // Global quit shortcut
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, code, modifiers),
        Mode::Command => handle_command_mode(app, code, modifiers),
        Mode::Help => handle_help_mode(app, code),
        Mode::Describe => handle_describe_mode(app, code, modifiers),
    }
}

fn handle_normal_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    // Check for double-g (go to top) - keep for vim users but increase timeout
    if code == KeyCode::Char('g') {
        if let Some((KeyCode::Char('g'), time)) = app.last_key_press {
            if time.elapsed() < Duration::from_millis(1000) {
                app.go_to_top();
                app.last_key_press = None;
                return Ok(false);
            }
        }
        app.last_key_press = Some((code, std::time::Instant::now()));
        return Ok(false);
    }

    // Clear last key press for non-g keys
    app.last_key_press = None;

    // Handle filter input first
    if app.filter_active {
        match code {
            KeyCode::Esc => {
                app.clear_filter();
            },
            KeyCode::Enter => {
                app.filter_active = false;
            },
            KeyCode::Backspace => {
                app.filter_text.pop();
                app.apply_filter();
            },
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                app.filter_text.push(c);
                app.apply_filter();
            },
            _ => {},
        }
        return Ok(false);
    }

    match code {
        // Quit
        KeyCode::Char('q') => return Ok(true),

        // Navigation - vim style + accessible alternatives
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.previous(),
        KeyCode::Home => app.go_to_top(),
        KeyCode::End | KeyCode::Char('G') => app.go_to_bottom(),
        KeyCode::PageDown => app.page_down(10),
        KeyCode::PageUp => app.page_up(10),

        // Ctrl+D/U for page navigation
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.page_down(10);
        },
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.page_up(10);
        },

        // Quick jump to position 1-9
        KeyCode::Char(c @ '1'..='9') if !app.filter_active => {
            let idx = c.to_digit(10).unwrap() as usize - 1;
            if idx < app.filtered_items.len() {
                app.selected = idx;
            }
        },

        // Rule detail tab switching
        KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right if app.view == View::RuleDetail => {
            app.cycle_tab(true);
        },
        KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Left if app.view == View::RuleDetail => {
            app.cycle_tab(false);
        },

        // Refresh
        KeyCode::Char('R') => {
            app.refresh();
        },

        // Open the selected row's link
        KeyCode::Enter => match app.view {
            View::Collection | View::RuleDetail => app.activate_primary_link(),
            View::Job | View::Ruleset => app.enter_describe_mode(),
            View::Dashboard => {},
        },

        // Describe
        KeyCode::Char('d') => {
            app.enter_describe_mode();
        },

        // Filter
        KeyCode::Char('/') => {
            app.filter_active = true;
        },

        // Command mode
        KeyCode::Char(':') => {
            app.enter_command_mode();
        },

        // Help
        KeyCode::Char('?') => {
            app.enter_help_mode();
        },

        // Back navigation
        KeyCode::Backspace | KeyCode::Left | KeyCode::Char('b') => {
            app.navigate_back();
        },

        // Link column shortcuts (o for job, r for ruleset on audit rows)
        KeyCode::Char(c) => {
            app.activate_shortcut(c);
        },

        _ => {},
    }

    Ok(false)
}

fn handle_command_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    match code {
        KeyCode::Esc => {
            app.exit_mode();
        },
        KeyCode::Enter => {
            let should_quit = app.execute_command();
            if app.mode == Mode::Command {
                app.exit_mode();
            }
            return Ok(should_quit);
        },
        KeyCode::Backspace => {
            app.command_text.pop();
            app.update_command_suggestions();
        },
        KeyCode::Tab | KeyCode::Right => {
            app.apply_suggestion();
        },
        KeyCode::Down => {
            app.next_suggestion();
        },
        KeyCode::Up => {
            app.prev_suggestion();
        },
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_text.push(c);
            app.update_command_suggestions();
        },
        _ => {},
    }
    Ok(false)
}

fn handle_help_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
            app.exit_mode();
        },
        _ => {},
    }
    Ok(false)
}

fn handle_describe_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => {
            app.exit_mode();
        },
        KeyCode::Char('j') | KeyCode::Down => {
            app.describe_scroll = app.describe_scroll.saturating_add(1);
        },
        KeyCode::Char('k') | KeyCode::Up => {
            app.describe_scroll = app.describe_scroll.saturating_sub(1);
        },
        KeyCode::PageDown => {
            app.describe_scroll = app.describe_scroll.saturating_add(10);
        },
        KeyCode::PageUp => {
            app.describe_scroll = app.describe_scroll.saturating_sub(10);
        },
        KeyCode::Char('d') => {
            if modifiers.contains(KeyModifiers::CONTROL) {
                app.describe_scroll = app.describe_scroll.saturating_add(10);
            } else {
                app.exit_mode();
            }
        },
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.describe_scroll = app.describe_scroll.saturating_sub(10);
        },
        KeyCode::Char('g') | KeyCode::Home => {
            app.describe_scroll = 0;
        },
        KeyCode::Char('G') | KeyCode::End => {
            app.describe_scroll_to_bottom();
        },
        _ => {},
    }
    Ok(false)
}
