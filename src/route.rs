//! Client-side routes
//!
//! String paths are the single source of truth for what is on screen,
//! mirroring the URL space of the web console this tool replaces. Views
//! parse the path once at navigation time; the active detail tab is
//! derived from the path on every render and never stored.

/// A parsed client route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/audit` - rules fired
    Audit,
    /// `/audit/hosts` - hosts changed
    AuditHosts,
    /// `/jobs`
    Jobs,
    /// `/dashboard` (also the bare `/`)
    Dashboard,
    /// `/rule/{id}` with an optional tab suffix, or the `/audit-rule/{id}` alias
    Rule { id: String },
    /// `/job/{id}`
    Job { id: String },
    /// `/ruleset/{id}`
    Ruleset { id: String },
}

impl Route {
    /// Parse a path into a route. Unknown paths yield `None`.
    ///
    /// An unrecognized suffix under `/rule/{id}/` still parses as the
    /// rule route; tab handling falls back to Details separately.
    pub fn parse(path: &str) -> Option<Route> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["dashboard"] => Some(Route::Dashboard),
            ["audit"] => Some(Route::Audit),
            ["audit", "hosts"] => Some(Route::AuditHosts),
            ["jobs"] => Some(Route::Jobs),
            ["rule", id] | ["rule", id, _] => Some(Route::Rule { id: decode(id)? }),
            ["audit-rule", id] => Some(Route::Rule { id: decode(id)? }),
            ["job", id] => Some(Route::Job { id: decode(id)? }),
            ["ruleset", id] => Some(Route::Ruleset { id: decode(id)? }),
            _ => None,
        }
    }
}

fn decode(segment: &str) -> Option<String> {
    urlencoding::decode(segment).ok().map(|s| s.into_owned())
}

/// One tab of the rule detail view. `name` is the route the tab
/// navigates to; the first entry is the back pseudo-tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabItem {
    pub event_key: usize,
    pub title: String,
    pub name: String,
}

impl TabItem {
    fn new(event_key: usize, title: &str, name: String) -> Self {
        Self {
            event_key,
            title: title.to_string(),
            name,
        }
    }

    /// Resource key for the tab's collection; `None` for Details and
    /// the back pseudo-tab
    pub fn resource_key(&self) -> Option<&'static str> {
        match self.event_key {
            2 => Some("audit-rule-jobs"),
            3 => Some("audit-rule-hosts"),
            4 => Some("audit-rule-events"),
            _ => None,
        }
    }
}

/// Label shown when no tab matches the path (and before details load)
pub const DETAILS_TAB: &str = "Details";

/// Build the tab strip for a rule detail view
pub fn build_rule_tabs(rule_id: &str) -> Vec<TabItem> {
    let id = urlencoding::encode(rule_id);
    vec![
        TabItem::new(0, "Back to Audit", "/audit".to_string()),
        TabItem::new(1, "Details", format!("/rule/{}/details", id)),
        TabItem::new(2, "Jobs", format!("/rule/{}/jobs", id)),
        TabItem::new(3, "Hosts", format!("/rule/{}/hosts", id)),
        TabItem::new(4, "Events", format!("/rule/{}/events", id)),
    ]
}

/// Find the tab a path points at by matching the final path segment.
/// No match means the caller falls back to the Details label.
pub fn tab_from_path<'a>(tabs: &'a [TabItem], path: &str) -> Option<&'a TabItem> {
    let last = path.trim_end_matches('/').rsplit('/').next()?;
    tabs.iter()
        .find(|tab| tab.name.trim_end_matches('/').rsplit('/').next() == Some(last))
}

/// Route for a top-level collection key
pub fn route_for_resource(key: &str) -> Option<&'static str> {
    match key {
        "audit-rules" => Some("/audit"),
        "audit-hosts" => Some("/audit/hosts"),
        "jobs" => Some("/jobs"),
        _ => None,
    }
}
