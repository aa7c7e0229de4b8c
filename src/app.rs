//! Application State
//!
//! Central application state management for teda. The current route
//! path is the single source of truth for what is on screen; fetches
//! run as spawned tasks and report back over a channel, tagged with a
//! request id so responses that arrive after navigating away are
//! dropped instead of clobbering the current view.

use crate::api::client::EdaClient;
use crate::api::{audit, ListParams};
use crate::api::http::format_api_error;
use crate::config::Config;
use crate::resource::{
    extract_first, extract_json_value, fetch_collection, get_resource, ResourceDef,
};
use crate::route::{build_rule_tabs, route_for_resource, tab_from_path, Route, TabItem, DETAILS_TAB};
use crate::ui::rows::{build_cell, create_rows, CellContent};
use crossterm::event::KeyCode;
use serde_json::Value;
use std::ops::Range;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Default viewport height (updated during render based on terminal size)
const DEFAULT_VIEWPORT_HEIGHT: usize = 20;

/// Application modes
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,   // Viewing the current route
    Command,  // : command input
    Help,     // ? help popup
    Describe, // Viewing JSON details of selected item
}

/// What kind of screen the current route resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Collection,
    Dashboard,
    RuleDetail,
    Job,
    Ruleset,
}

/// State for a rule detail visit. `rule` holds the `/details` payload
/// once it arrives; it is fetched once per visit and survives tab
/// switches within the same rule id.
#[derive(Debug, Clone)]
pub struct RuleDetail {
    pub rule_id: String,
    pub rule: Option<Value>,
}

impl RuleDetail {
    fn new(rule_id: &str) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            rule: None,
        }
    }
}

/// State for the job record view. The record is selected client-side
/// from the jobs list; `context` carries the row the link came from.
#[derive(Debug, Clone)]
pub struct JobView {
    pub job_id: String,
    pub record: Option<Value>,
    pub context: Option<Value>,
    pub missing: bool,
}

/// State for the ruleset view. The audit surface has no ruleset
/// endpoint, so this renders carried context only.
#[derive(Debug, Clone)]
pub struct RulesetView {
    pub ruleset_id: String,
    pub context: Option<Value>,
}

/// State for the dashboard panels. Each panel tolerates its own error.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub rules: Option<Vec<Value>>,
    pub hosts: Option<Vec<Value>>,
    pub rules_error: Option<String>,
    pub hosts_error: Option<String>,
}

/// Result of a spawned fetch, tagged with the request id it answers
pub enum FetchOutcome {
    List {
        request_id: Uuid,
        resource_key: String,
        result: anyhow::Result<Vec<Value>>,
    },
    RuleDetails {
        request_id: Uuid,
        rule_id: String,
        result: anyhow::Result<Value>,
    },
    Dashboard {
        request_id: Uuid,
        rules: anyhow::Result<Vec<Value>>,
        hosts: anyhow::Result<Vec<Value>>,
    },
    JobRecord {
        request_id: Uuid,
        job_id: String,
        result: anyhow::Result<Vec<Value>>,
    },
}

/// Request ids the app still expects, one slot per fetch kind.
/// Replacing or clearing a slot cancels delivery of the old response.
#[derive(Debug, Clone, Default)]
struct Pending {
    list: Option<Uuid>,
    details: Option<Uuid>,
    dashboard: Option<Uuid>,
    job: Option<Uuid>,
}

/// Main application state
pub struct App {
    // API client
    pub client: EdaClient,

    // Current route; everything on screen derives from it
    pub path: String,
    pub view: View,
    pub history: Vec<String>,

    // Collection shown in the table area (top-level view or detail tab)
    pub current_resource_key: String,

    // Dynamic data storage (JSON)
    pub items: Vec<Value>,
    pub filtered_items: Vec<Value>,

    // Navigation state
    pub selected: usize,
    pub mode: Mode,
    pub filter_text: String,
    pub filter_active: bool,

    // Per-view state
    pub detail: Option<RuleDetail>,
    pub job: Option<JobView>,
    pub ruleset: Option<RulesetView>,
    pub dashboard: Option<DashboardView>,

    // Command input
    pub command_text: String,
    pub command_suggestions: Vec<String>,
    pub command_suggestion_selected: usize,
    pub command_preview: Option<String>,

    // UI state
    pub loading: bool,
    pub error_message: Option<String>,
    pub describe_scroll: usize,
    pub describe_viewport: usize,
    pub describe_data: Option<Value>,

    // Persistent configuration
    pub config: Config,

    // Key press tracking
    pub last_key_press: Option<(KeyCode, std::time::Instant)>,

    // Virtual scrolling
    pub viewport_height: usize,
    pub scroll_offset: usize,

    // In-flight fetches
    pending: Pending,
    fetch_tx: mpsc::UnboundedSender<FetchOutcome>,
    fetch_rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl App {
    /// Create App from pre-initialized components
    pub fn from_initialized(
        client: EdaClient,
        resource_key: &str,
        initial_items: Vec<Value>,
        initial_error: Option<String>,
        config: Config,
    ) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
        let filtered_items = initial_items.clone();
        let path = route_for_resource(resource_key).unwrap_or("/audit").to_string();

        Self {
            client,
            path,
            view: View::Collection,
            history: Vec::new(),
            current_resource_key: resource_key.to_string(),
            items: initial_items,
            filtered_items,
            selected: 0,
            mode: Mode::Normal,
            filter_text: String::new(),
            filter_active: false,
            detail: None,
            job: None,
            ruleset: None,
            dashboard: None,
            command_text: String::new(),
            command_suggestions: Vec::new(),
            command_suggestion_selected: 0,
            command_preview: None,
            loading: false,
            error_message: initial_error,
            describe_scroll: 0,
            describe_viewport: DEFAULT_VIEWPORT_HEIGHT,
            describe_data: None,
            config,
            last_key_press: None,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            scroll_offset: 0,
            pending: Pending::default(),
            fetch_tx,
            fetch_rx,
        }
    }

    // =========================================================================
    // Resource Definition Access
    // =========================================================================

    /// Definition backing the table area, if one is on screen
    pub fn table_resource(&self) -> Option<&'static ResourceDef> {
        if self.current_resource_key.is_empty() {
            return None;
        }
        get_resource(&self.current_resource_key)
    }

    pub fn get_available_commands(&self) -> Vec<String> {
        let mut commands: Vec<String> = ["audit", "hosts", "jobs", "dashboard"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        commands.push("rule".to_string());
        commands.push("job".to_string());
        commands.push("ruleset".to_string());
        commands.push("back".to_string());
        commands.push("quit".to_string());

        commands.sort();
        commands
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Pull completed fetches off the channel and apply them.
    /// Called once per tick from the run loop.
    pub fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.fetch_rx.try_recv() {
            self.apply_outcome(outcome);
        }
    }

    /// Apply one fetch outcome. Outcomes whose request id no longer
    /// matches the pending slot belong to an abandoned view and are
    /// dropped.
    pub fn apply_outcome(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::List { request_id, resource_key, result } => {
                if self.pending.list != Some(request_id) {
                    tracing::debug!("Dropping stale list response for {}", resource_key);
                    return;
                }
                self.pending.list = None;
                self.loading = false;

                match result {
                    Ok(items) => {
                        // Refreshes keep the cursor on the same record
                        // even when the server reorders the page
                        let prev_id = self.selected_row_id();
                        self.items = items;
                        self.apply_filter();
                        self.restore_selection(prev_id);
                    },
                    Err(e) => {
                        self.error_message = Some(format_api_error(&e));
                        self.items.clear();
                        self.filtered_items.clear();
                        self.selected = 0;
                    },
                }
            },
            FetchOutcome::RuleDetails { request_id, rule_id, result } => {
                if self.pending.details != Some(request_id) {
                    tracing::debug!("Dropping stale details response for rule {}", rule_id);
                    return;
                }
                self.pending.details = None;

                match result {
                    Ok(value) => {
                        if let Some(detail) = self.detail.as_mut() {
                            if detail.rule_id == rule_id {
                                detail.rule = Some(value);
                            }
                        }
                    },
                    Err(e) => {
                        self.error_message = Some(format_api_error(&e));
                    },
                }
            },
            FetchOutcome::Dashboard { request_id, rules, hosts } => {
                if self.pending.dashboard != Some(request_id) {
                    tracing::debug!("Dropping stale dashboard response");
                    return;
                }
                self.pending.dashboard = None;
                self.loading = false;

                if let Some(dash) = self.dashboard.as_mut() {
                    match rules {
                        Ok(items) => dash.rules = Some(items),
                        Err(e) => dash.rules_error = Some(format_api_error(&e)),
                    }
                    match hosts {
                        Ok(items) => dash.hosts = Some(items),
                        Err(e) => dash.hosts_error = Some(format_api_error(&e)),
                    }
                }
            },
            FetchOutcome::JobRecord { request_id, job_id, result } => {
                if self.pending.job != Some(request_id) {
                    tracing::debug!("Dropping stale job response for {}", job_id);
                    return;
                }
                self.pending.job = None;
                self.loading = false;

                match result {
                    Ok(items) => {
                        if let Some(job) = self.job.as_mut() {
                            if job.job_id == job_id {
                                job.record = items
                                    .into_iter()
                                    .find(|item| extract_json_value(item, "id") == job.job_id);
                                job.missing = job.record.is_none();
                            }
                        }
                    },
                    Err(e) => {
                        self.error_message = Some(format_api_error(&e));
                    },
                }
            },
        }
    }

    fn spawn_list_fetch(&mut self, resource_key: &str, parent_id: Option<String>) {
        let request_id = Uuid::new_v4();
        self.pending.list = Some(request_id);
        self.loading = true;

        let client = self.client.clone();
        let key = resource_key.to_string();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result =
                fetch_collection(&client, &key, parent_id.as_deref(), &ListParams::default()).await;
            let _ = tx.send(FetchOutcome::List { request_id, resource_key: key, result });
        });
    }

    fn spawn_details_fetch(&mut self, rule_id: &str) {
        let request_id = Uuid::new_v4();
        self.pending.details = Some(request_id);

        let client = self.client.clone();
        let id = rule_id.to_string();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = audit::rule_details(&client, &id).await;
            let _ = tx.send(FetchOutcome::RuleDetails { request_id, rule_id: id, result });
        });
    }

    fn spawn_dashboard_fetch(&mut self) {
        let request_id = Uuid::new_v4();
        self.pending.dashboard = Some(request_id);
        self.loading = true;

        let client = self.client.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let params = ListParams::default();
            let (rules, hosts) = futures::join!(
                fetch_collection(&client, "audit-rules", None, &params),
                fetch_collection(&client, "audit-hosts", None, &params),
            );
            let _ = tx.send(FetchOutcome::Dashboard { request_id, rules, hosts });
        });
    }

    fn spawn_job_fetch(&mut self, job_id: &str) {
        let request_id = Uuid::new_v4();
        self.pending.job = Some(request_id);
        self.loading = true;

        let client = self.client.clone();
        let id = job_id.to_string();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = fetch_collection(&client, "jobs", None, &ListParams::default()).await;
            let _ = tx.send(FetchOutcome::JobRecord { request_id, job_id: id, result });
        });
    }

    /// Refetch what the current view shows. Rule detail visits refetch
    /// the active tab's collection, never `/details`.
    pub fn refresh(&mut self) {
        match self.view {
            View::Collection => {
                let key = self.current_resource_key.clone();
                self.spawn_list_fetch(&key, None);
            },
            View::RuleDetail => {
                if let Some(detail) = self.detail.as_ref() {
                    let rule_id = detail.rule_id.clone();
                    if let Some(key) = self.active_tab_resource() {
                        self.spawn_list_fetch(key, Some(rule_id));
                    }
                }
            },
            View::Dashboard => self.spawn_dashboard_fetch(),
            View::Job => {
                if let Some(job) = self.job.as_ref() {
                    let id = job.job_id.clone();
                    self.spawn_job_fetch(&id);
                }
            },
            View::Ruleset => {},
        }
    }

    /// Id of the selected row, per the table's id field
    fn selected_row_id(&self) -> Option<String> {
        let def = self.table_resource()?;
        self.selected_item()
            .and_then(|item| extract_first(item, std::slice::from_ref(&def.id_field)))
    }

    /// Move the cursor back onto the record with this id if it is
    /// still in the refreshed list; otherwise leave the clamped cursor
    fn restore_selection(&mut self, prev_id: Option<String>) {
        let Some(def) = self.table_resource() else {
            return;
        };
        let Some(id) = prev_id else {
            return;
        };

        if let Some(idx) = self.filtered_items.iter().position(|item| {
            extract_first(item, std::slice::from_ref(&def.id_field)).as_deref() == Some(&id)
        }) {
            self.selected = idx;
        }
    }

    // =========================================================================
    // Route Navigation
    // =========================================================================

    /// Navigate to a path, pushing the current one onto the history
    pub fn navigate(&mut self, path: &str) {
        self.navigate_with_context(path, None);
    }

    /// Navigate carrying the row the link came from; record views show
    /// it while (or instead of) fetching
    pub fn navigate_with_context(&mut self, path: &str, context: Option<Value>) {
        if Route::parse(path).is_none() {
            self.error_message = Some(format!("Unknown route: {}", path));
            return;
        }

        if self.path != path {
            self.history.push(self.path.clone());
        }
        self.enter_route(path, context);
    }

    /// Pop the previous path off the history and re-enter it
    pub fn navigate_back(&mut self) {
        if let Some(prev) = self.history.pop() {
            self.enter_route(&prev, None);
        }
    }

    fn enter_route(&mut self, path: &str, context: Option<Value>) {
        let Some(route) = Route::parse(path) else {
            self.error_message = Some(format!("Unknown route: {}", path));
            return;
        };

        // Tab switches within the same rule keep the details payload
        // (and any in-flight details request); everything else is a
        // fresh visit.
        let kept_detail = match (&route, self.detail.take()) {
            (Route::Rule { id }, Some(detail)) if *id == detail.rule_id => Some(detail),
            _ => None,
        };

        self.path = path.to_string();
        self.mode = Mode::Normal;
        self.filter_text.clear();
        self.filter_active = false;
        self.selected = 0;
        self.scroll_offset = 0;
        self.error_message = None;
        self.items.clear();
        self.filtered_items.clear();
        self.describe_data = None;
        self.job = None;
        self.ruleset = None;
        self.dashboard = None;
        self.pending.list = None;
        self.pending.dashboard = None;
        self.pending.job = None;
        if kept_detail.is_none() {
            self.pending.details = None;
        }

        match route {
            Route::Audit => self.enter_collection("audit-rules"),
            Route::AuditHosts => self.enter_collection("audit-hosts"),
            Route::Jobs => self.enter_collection("jobs"),
            Route::Dashboard => {
                self.view = View::Dashboard;
                self.current_resource_key = String::new();
                self.dashboard = Some(DashboardView::default());
                self.spawn_dashboard_fetch();
            },
            Route::Rule { id } => {
                self.view = View::RuleDetail;
                let fresh_visit = kept_detail.is_none();
                self.detail = Some(kept_detail.unwrap_or_else(|| RuleDetail::new(&id)));
                if fresh_visit {
                    self.spawn_details_fetch(&id);
                }

                // Tab content follows the path; Details shows no table
                match self.active_tab_resource() {
                    Some(key) => {
                        self.current_resource_key = key.to_string();
                        self.spawn_list_fetch(key, Some(id));
                    },
                    None => {
                        self.current_resource_key = String::new();
                    },
                }
            },
            Route::Job { id } => {
                self.view = View::Job;
                self.current_resource_key = String::new();
                self.job = Some(JobView {
                    job_id: id.clone(),
                    record: None,
                    context,
                    missing: false,
                });
                self.spawn_job_fetch(&id);
            },
            Route::Ruleset { id } => {
                self.view = View::Ruleset;
                self.current_resource_key = String::new();
                self.ruleset = Some(RulesetView { ruleset_id: id, context });
            },
        }
    }

    fn enter_collection(&mut self, resource_key: &str) {
        self.view = View::Collection;
        self.current_resource_key = resource_key.to_string();
        if let Err(e) = self.config.set_last_resource(resource_key) {
            tracing::warn!("Failed to save last resource to config: {}", e);
        }
        self.spawn_list_fetch(resource_key, None);
    }

    // =========================================================================
    // Rule Detail Tabs
    // =========================================================================

    /// Tab strip for the current rule visit
    pub fn rule_tabs(&self) -> Vec<TabItem> {
        self.detail
            .as_ref()
            .map(|d| build_rule_tabs(&d.rule_id))
            .unwrap_or_default()
    }

    /// Resource key of the tab the path points at; `None` for Details
    pub fn active_tab_resource(&self) -> Option<&'static str> {
        let detail = self.detail.as_ref()?;
        let tabs = build_rule_tabs(&detail.rule_id);
        tab_from_path(&tabs, &self.path)?.resource_key()
    }

    /// Label of the active tab. Until the rule details have loaded this
    /// is always "Details"; afterwards it derives from the path, falling
    /// back to "Details" for unmatched suffixes.
    pub fn active_tab_label(&self) -> String {
        let Some(detail) = self.detail.as_ref() else {
            return DETAILS_TAB.to_string();
        };
        if detail.rule.is_none() {
            return DETAILS_TAB.to_string();
        }

        let tabs = build_rule_tabs(&detail.rule_id);
        tab_from_path(&tabs, &self.path)
            .map(|tab| tab.title.clone())
            .unwrap_or_else(|| DETAILS_TAB.to_string())
    }

    /// Rule name for titles; empty until the details payload arrives
    pub fn rule_title(&self) -> String {
        self.detail
            .as_ref()
            .and_then(|d| d.rule.as_ref())
            .map(|rule| extract_json_value(rule, "name"))
            .filter(|name| name != "-")
            .unwrap_or_default()
    }

    /// Breadcrumb trail for the rule detail view
    pub fn detail_breadcrumbs(&self) -> Vec<String> {
        vec![
            "Audit View".to_string(),
            self.rule_title(),
            self.active_tab_label(),
        ]
    }

    /// Switch to the next/previous detail tab (Details through Events)
    pub fn cycle_tab(&mut self, forward: bool) {
        let Some(detail) = self.detail.as_ref() else {
            return;
        };
        let tabs = build_rule_tabs(&detail.rule_id);
        // Back pseudo-tab (index 0) is reachable via 'b', not cycling
        let current = tab_from_path(&tabs, &self.path)
            .map(|t| t.event_key)
            .unwrap_or(1);

        let next = if forward {
            if current >= 4 { 1 } else { current + 1 }
        } else if current <= 1 {
            4
        } else {
            current - 1
        };

        let target = tabs[next].name.clone();
        self.navigate(&target);
    }

    // =========================================================================
    // Link Activation
    // =========================================================================

    /// Open the first link column of the selected row (Enter). Rows
    /// without any link fall back to the describe view.
    pub fn activate_primary_link(&mut self) {
        let Some(def) = self.table_resource() else {
            return;
        };
        let Some(item) = self.selected_item().cloned() else {
            return;
        };

        let Some(col) = def.primary_link() else {
            self.enter_describe_mode();
            return;
        };

        match build_cell(col, &item) {
            CellContent::Link { to, .. } => self.navigate_with_context(&to, Some(item)),
            // No route id on this row; nothing to open
            CellContent::Text(_) => self.enter_describe_mode(),
        }
    }

    /// Open the link column bound to a single-key shortcut.
    /// Returns false when the key maps to no column here.
    pub fn activate_shortcut(&mut self, key: char) -> bool {
        let Some(def) = self.table_resource() else {
            return false;
        };
        let wanted = key.to_string();
        let Some(col) = def
            .shortcut_columns()
            .find(|c| c.shortcut.as_deref() == Some(wanted.as_str()))
            .cloned()
        else {
            return false;
        };
        let Some(item) = self.selected_item().cloned() else {
            return true;
        };

        match build_cell(&col, &item) {
            CellContent::Link { to, .. } => self.navigate_with_context(&to, Some(item)),
            CellContent::Text(_) => {
                self.error_message = Some(format!("No {} link on this row", col.header));
            },
        }
        true
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    pub fn apply_filter(&mut self) {
        let filter = self.filter_text.to_lowercase();

        if filter.is_empty() {
            self.filtered_items = self.items.clone();
        } else {
            let resource = self.table_resource();
            self.filtered_items = self
                .items
                .iter()
                .filter(|item| {
                    if let Some(res) = resource {
                        // Search what the columns display, not raw JSON
                        res.columns
                            .iter()
                            .any(|col| build_cell(col, item).label().to_lowercase().contains(&filter))
                    } else {
                        item.to_string().to_lowercase().contains(&filter)
                    }
                })
                .cloned()
                .collect();
        }

        if self.selected >= self.filtered_items.len() && !self.filtered_items.is_empty() {
            self.selected = self.filtered_items.len() - 1;
        }

        self.scroll_offset = 0;
    }

    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
        self.apply_filter();
    }

    // =========================================================================
    // Selection Movement
    // =========================================================================

    pub fn selected_item(&self) -> Option<&Value> {
        self.filtered_items.get(self.selected)
    }

    pub fn selected_item_json(&self) -> Option<String> {
        if let Some(ref data) = self.describe_data {
            return Some(serde_json::to_string_pretty(data).unwrap_or_default());
        }
        self.selected_item()
            .map(|item| serde_json::to_string_pretty(item).unwrap_or_default())
    }

    pub fn describe_line_count(&self) -> usize {
        self.selected_item_json()
            .map(|s| s.lines().count())
            .unwrap_or(0)
    }

    /// Update the describe pane height (called from UI during render)
    pub fn update_describe_viewport(&mut self, height: usize) {
        self.describe_viewport = height.max(1);
    }

    pub fn describe_scroll_to_bottom(&mut self) {
        let total = self.describe_line_count();
        self.describe_scroll = total.saturating_sub(self.describe_viewport);
    }

    pub fn next(&mut self) {
        if !self.filtered_items.is_empty() {
            self.selected = (self.selected + 1).min(self.filtered_items.len() - 1);
        }
    }

    pub fn previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn go_to_top(&mut self) {
        self.selected = 0;
    }

    pub fn go_to_bottom(&mut self) {
        if !self.filtered_items.is_empty() {
            self.selected = self.filtered_items.len() - 1;
        }
    }

    pub fn page_down(&mut self, page_size: usize) {
        if !self.filtered_items.is_empty() {
            self.selected = (self.selected + page_size).min(self.filtered_items.len() - 1);
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
    }

    // =========================================================================
    // Mode Transitions
    // =========================================================================

    pub fn enter_command_mode(&mut self) {
        self.mode = Mode::Command;
        self.command_text.clear();
        self.command_suggestions = self.get_available_commands();
        self.command_suggestion_selected = 0;
        self.command_preview = None;
    }

    pub fn update_command_suggestions(&mut self) {
        let input = self.command_text.to_lowercase();
        let all_commands = self.get_available_commands();

        if input.is_empty() {
            self.command_suggestions = all_commands;
        } else {
            self.command_suggestions = all_commands
                .into_iter()
                .filter(|cmd| cmd.contains(&input))
                .collect();
        }

        if self.command_suggestion_selected >= self.command_suggestions.len() {
            self.command_suggestion_selected = 0;
        }

        self.update_preview();
    }

    fn update_preview(&mut self) {
        if self.command_suggestions.is_empty() {
            self.command_preview = None;
        } else {
            self.command_preview = self
                .command_suggestions
                .get(self.command_suggestion_selected)
                .cloned();
        }
    }

    pub fn next_suggestion(&mut self) {
        if !self.command_suggestions.is_empty() {
            self.command_suggestion_selected =
                (self.command_suggestion_selected + 1) % self.command_suggestions.len();
            self.update_preview();
        }
    }

    pub fn prev_suggestion(&mut self) {
        if !self.command_suggestions.is_empty() {
            if self.command_suggestion_selected == 0 {
                self.command_suggestion_selected = self.command_suggestions.len() - 1;
            } else {
                self.command_suggestion_selected -= 1;
            }
            self.update_preview();
        }
    }

    pub fn apply_suggestion(&mut self) {
        if let Some(preview) = &self.command_preview {
            self.command_text = preview.clone();
            self.update_command_suggestions();
        }
    }

    pub fn enter_help_mode(&mut self) {
        self.mode = Mode::Help;
    }

    pub fn enter_describe_mode(&mut self) {
        let describe_target = match self.view {
            View::Job => self
                .job
                .as_ref()
                .and_then(|j| j.record.clone().or_else(|| j.context.clone())),
            View::Ruleset => self.ruleset.as_ref().and_then(|r| r.context.clone()),
            // Details tab has no table; describe the rule payload itself
            View::RuleDetail if self.current_resource_key.is_empty() => {
                self.detail.as_ref().and_then(|d| d.rule.clone())
            },
            _ => self.selected_item().cloned(),
        };

        let Some(item) = describe_target else {
            return;
        };

        self.mode = Mode::Describe;
        self.describe_scroll = 0;
        self.describe_data = Some(item);
    }

    pub fn exit_mode(&mut self) {
        self.mode = Mode::Normal;
        self.describe_data = None;
    }

    // =========================================================================
    // Command Execution
    // =========================================================================

    /// Execute the typed (or completed) command. Returns true to quit.
    pub fn execute_command(&mut self) -> bool {
        let command_text = if self.command_text.is_empty() {
            self.command_preview.clone().unwrap_or_default()
        } else if let Some(preview) = &self.command_preview {
            if preview.contains(&self.command_text) {
                preview.clone()
            } else {
                self.command_text.clone()
            }
        } else {
            self.command_text.clone()
        };

        let parts: Vec<&str> = command_text.split_whitespace().collect();

        if parts.is_empty() {
            return false;
        }

        match parts[0] {
            "q" | "quit" => return true,
            "back" => self.navigate_back(),
            "dashboard" => self.navigate("/dashboard"),
            "audit" | "audit-rules" | "rules" => self.navigate("/audit"),
            "hosts" | "audit-hosts" => self.navigate("/audit/hosts"),
            "jobs" => self.navigate("/jobs"),
            "rule" if parts.len() > 1 => {
                let path = format!("/rule/{}/details", urlencoding::encode(parts[1]));
                self.navigate(&path);
            },
            "job" if parts.len() > 1 => {
                let path = format!("/job/{}", urlencoding::encode(parts[1]));
                self.navigate(&path);
            },
            "ruleset" if parts.len() > 1 => {
                let path = format!("/ruleset/{}", urlencoding::encode(parts[1]));
                self.navigate(&path);
            },
            "rule" | "job" | "ruleset" => {
                self.error_message = Some(format!("Usage: {} <id>", parts[0]));
            },
            cmd => {
                self.error_message = Some(format!("Unknown command: {}", cmd));
            },
        }

        false
    }

    // =========================================================================
    // Breadcrumb
    // =========================================================================

    /// Trail shown in the status line: history plus the current path
    pub fn get_breadcrumb(&self) -> Vec<String> {
        let mut crumbs: Vec<String> = self.history.clone();
        crumbs.push(self.path.clone());
        crumbs
    }

    // =========================================================================
    // Virtual Scrolling
    // =========================================================================

    /// Update the viewport height (called from UI during render)
    pub fn update_viewport(&mut self, height: usize) {
        self.viewport_height = height.max(1);
    }

    /// Ensure the selected item is visible in the viewport
    pub fn ensure_visible(&mut self) {
        if self.filtered_items.is_empty() {
            self.scroll_offset = 0;
            return;
        }

        let visible_height = self.viewport_height;
        let margin = 2; // Keep cursor at least this far from edge

        if self.selected < self.scroll_offset + margin {
            self.scroll_offset = self.selected.saturating_sub(margin);
        } else if self.selected >= self.scroll_offset + visible_height.saturating_sub(margin) {
            self.scroll_offset = self
                .selected
                .saturating_sub(visible_height.saturating_sub(margin + 1));
        }

        let max_offset = self
            .filtered_items
            .len()
            .saturating_sub(self.viewport_height);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    /// Get the range of visible items based on scroll offset and viewport
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.scroll_offset;
        let end = (self.scroll_offset + self.viewport_height).min(self.filtered_items.len());
        start..end
    }
}
