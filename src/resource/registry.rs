//! Resource Registry - Load resource definitions from JSON
//!
//! This module loads the table definitions for every browsable
//! collection from embedded JSON files and provides lookup functions
//! for the rest of the application.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[
    include_str!("../resources/audit.json"),
    include_str!("../resources/jobs.json"),
];

/// Color definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ColorDef {
    pub value: String,
    pub color: [u8; 3],
}

/// How a column's value renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Plain text (optionally colored via `color_map`)
    #[default]
    Text,
    /// Navigable link to another route
    Link,
    /// Timestamp rendered in the fixed UTC format
    Timestamp,
}

/// Column definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDef {
    pub header: String,
    #[serde(default)]
    pub kind: ColumnKind,
    /// Ordered fallback chain of dot paths for the cell label;
    /// the first present, non-null value wins
    pub paths: Vec<String>,
    pub width: u16,
    /// Route template for link columns; `{}` takes the route id
    #[serde(default)]
    pub route: Option<String>,
    /// Fallback chain for the route id
    #[serde(default)]
    pub route_paths: Vec<String>,
    #[serde(default)]
    pub color_map: Option<String>,
    /// Key that opens this column's link for the selected row
    #[serde(default)]
    pub shortcut: Option<String>,
}

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    pub display_name: String,
    /// API operation the fetcher dispatches to
    pub api_op: String,
    /// Dot path to the item array in the response; empty means the
    /// response itself is the array
    #[serde(default)]
    pub response_path: String,
    pub id_field: String,
    pub name_field: String,
    pub columns: Vec<ColumnDef>,
}

impl ResourceDef {
    /// First link column, activated by Enter on a selected row
    pub fn primary_link(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.kind == ColumnKind::Link)
    }

    /// Link columns reachable via a single-key shortcut
    pub fn shortcut_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| c.shortcut.is_some())
    }
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub color_maps: HashMap<String, Vec<ColorDef>>,
    #[serde(default)]
    pub resources: HashMap<String, ResourceDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig {
            color_maps: HashMap::new(),
            resources: HashMap::new(),
        };

        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            final_config.color_maps.extend(partial.color_maps);
            final_config.resources.extend(partial.resources);
        }

        final_config
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.get(key)
}

/// Get all resource keys (for autocomplete)
pub fn get_all_resource_keys() -> Vec<&'static str> {
    get_registry()
        .resources
        .keys()
        .map(|s| s.as_str())
        .collect()
}

/// Get a color map by name
pub fn get_color_map(name: &str) -> Option<&'static Vec<ColorDef>> {
    get_registry().color_maps.get(name)
}

/// Get color for a value based on color map name
pub fn get_color_for_value(color_map_name: &str, value: &str) -> Option<[u8; 3]> {
    get_color_map(color_map_name)?
        .iter()
        .find(|c| c.value == value)
        .map(|c| c.color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads_successfully() {
        let registry = get_registry();
        assert!(
            !registry.resources.is_empty(),
            "Registry should have resources"
        );
    }

    #[test]
    fn test_audit_rules_resource_exists() {
        let resource = get_resource("audit-rules");
        assert!(resource.is_some(), "Audit rules resource should exist");

        let resource = resource.unwrap();
        assert_eq!(resource.display_name, "Rules Fired");
        assert_eq!(resource.api_op, "audit.rules_fired");
        assert_eq!(resource.columns.len(), 5);
    }

    #[test]
    fn test_rule_tab_collections_exist() {
        for key in ["audit-rule-jobs", "audit-rule-hosts", "audit-rule-events"] {
            let resource = get_resource(key);
            assert!(resource.is_some(), "{} should exist", key);
            assert!(
                resource.unwrap().api_op.starts_with("audit.rule_"),
                "{} should dispatch to a per-rule op",
                key
            );
        }
    }

    #[test]
    fn test_get_all_resource_keys() {
        let keys = get_all_resource_keys();
        assert!(!keys.is_empty(), "Should have resource types");
        assert!(keys.contains(&"audit-rules"), "Should contain audit-rules");
        assert!(keys.contains(&"jobs"), "Should contain jobs");
    }

    #[test]
    fn test_status_color_map_exists() {
        let map = get_color_map("status");
        assert!(map.is_some(), "Status color map should exist");
        assert!(get_color_for_value("status", "failed").is_some());
        assert!(get_color_for_value("status", "successful").is_some());
    }

    #[test]
    fn test_audit_rules_primary_link_is_name() {
        let resource = get_resource("audit-rules").unwrap();
        let primary = resource.primary_link().unwrap();
        assert_eq!(primary.header, "Name");
        assert_eq!(primary.route.as_deref(), Some("/audit-rule/{}"));
    }

    #[test]
    fn test_audit_rules_shortcuts_cover_job_and_ruleset() {
        let resource = get_resource("audit-rules").unwrap();
        let shortcuts: Vec<&str> = resource
            .shortcut_columns()
            .filter_map(|c| c.shortcut.as_deref())
            .collect();
        assert!(shortcuts.contains(&"o"));
        assert!(shortcuts.contains(&"r"));
    }
}
