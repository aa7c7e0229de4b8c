//! Row building for collection tables
//!
//! Pure helpers that turn JSON records into renderable cells. No
//! terminal state is involved, so the exact cell contract (labels,
//! link targets, timestamp text) is testable on its own.

use crate::resource::{extract_first, ColumnDef, ColumnKind, ResourceDef};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// What a single cell renders as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    Text(String),
    Link { label: String, to: String },
}

impl CellContent {
    pub fn label(&self) -> &str {
        match self {
            CellContent::Text(s) => s,
            CellContent::Link { label, .. } => label,
        }
    }

    /// Route target for link cells
    pub fn route(&self) -> Option<&str> {
        match self {
            CellContent::Text(_) => None,
            CellContent::Link { to, .. } => Some(to),
        }
    }
}

/// One table row: the record id plus one cell per column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSpec {
    pub id: String,
    pub cells: Vec<CellContent>,
}

/// Build rows for every record against the resource's column set.
/// Row count always equals record count; missing fields render empty.
pub fn create_rows(def: &ResourceDef, items: &[Value]) -> Vec<RowSpec> {
    items
        .iter()
        .map(|item| RowSpec {
            id: extract_first(item, std::slice::from_ref(&def.id_field)).unwrap_or_default(),
            cells: def.columns.iter().map(|col| build_cell(col, item)).collect(),
        })
        .collect()
}

/// Build one cell from a column definition and a record.
///
/// Labels coalesce through `paths`, then `route_paths` (the web console
/// rendered `name || id` style fallbacks), then the empty string. Link
/// cells without a resolvable route id degrade to plain text.
pub fn build_cell(col: &ColumnDef, item: &Value) -> CellContent {
    match col.kind {
        ColumnKind::Timestamp => CellContent::Text(format_fired_at(first_raw(item, &col.paths))),
        ColumnKind::Text => CellContent::Text(extract_first(item, &col.paths).unwrap_or_default()),
        ColumnKind::Link => {
            let label = extract_first(item, &col.paths)
                .or_else(|| extract_first(item, &col.route_paths))
                .unwrap_or_default();

            match (col.route.as_deref(), extract_first(item, &col.route_paths)) {
                (Some(route), Some(id)) => CellContent::Link {
                    label,
                    to: route.replace("{}", &urlencoding::encode(&id)),
                },
                _ => CellContent::Text(label),
            }
        }
    }
}

/// Fixed rendering of fired-at timestamps: UTC, en-US short-date /
/// long-time shape
const FIRED_AT_FORMAT: &str = "%-m/%-d/%y, %-I:%M:%S %p UTC";

/// Format a fired-at value. Absent, null, or unparseable input falls
/// back to the Unix epoch (`1/1/70, 12:00:00 AM UTC`), never an
/// "invalid date" artifact.
pub fn format_fired_at(raw: Option<&Value>) -> String {
    parse_timestamp(raw)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .format(FIRED_AT_FORMAT)
        .to_string()
}

fn parse_timestamp(raw: Option<&Value>) -> Option<DateTime<Utc>> {
    match raw? {
        Value::String(s) => parse_timestamp_str(s),
        // Integer timestamps are epoch milliseconds
        Value::Number(n) => Utc.timestamp_millis_opt(n.as_i64()?).single(),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // The server emits naive ISO 8601 with no offset; treat it as UTC
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// First present, non-null raw value along a path chain
fn first_raw<'a>(item: &'a Value, paths: &[String]) -> Option<&'a Value> {
    for path in paths {
        let mut current = item;
        let mut found = true;

        for part in path.split('.') {
            current = match current.get(part) {
                Some(v) => v,
                None => {
                    found = false;
                    break;
                }
            };
        }

        if found && !current.is_null() {
            return Some(current);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::get_resource;
    use serde_json::json;

    const EPOCH_DISPLAY: &str = "1/1/70, 12:00:00 AM UTC";

    #[test]
    fn audit_rule_row_builds_exact_cells() {
        let def = get_resource("audit-rules").unwrap();
        let items = vec![json!({
            "id": 1,
            "name": "r",
            "job": {"id": 9, "name": "j"},
            "status": "ok",
            "ruleset": {"id": 3},
            "last_fired_at": null
        })];

        let rows = create_rows(def, &items);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "1");
        assert_eq!(
            rows[0].cells,
            vec![
                CellContent::Link { label: "r".into(), to: "/audit-rule/1".into() },
                CellContent::Link { label: "j".into(), to: "/job/9".into() },
                CellContent::Text("ok".into()),
                CellContent::Link { label: "3".into(), to: "/ruleset/3".into() },
                CellContent::Text(EPOCH_DISPLAY.into()),
            ]
        );
    }

    #[test]
    fn name_falls_back_to_id() {
        let def = get_resource("audit-rules").unwrap();
        let rows = create_rows(def, &[json!({"id": 7})]);
        assert_eq!(
            rows[0].cells[0],
            CellContent::Link { label: "7".into(), to: "/audit-rule/7".into() }
        );
    }

    #[test]
    fn job_label_falls_back_to_flat_job_id() {
        let def = get_resource("audit-rules").unwrap();
        let rows = create_rows(def, &[json!({"id": 1, "job_id": 9})]);
        assert_eq!(
            rows[0].cells[1],
            CellContent::Link { label: "9".into(), to: "/job/9".into() }
        );
    }

    #[test]
    fn ruleset_prefers_embedded_then_flat_then_empty() {
        let def = get_resource("audit-rules").unwrap();

        let rows = create_rows(def, &[json!({"id": 1, "ruleset": {"id": 3}, "ruleset_id": 8})]);
        assert_eq!(
            rows[0].cells[3],
            CellContent::Link { label: "3".into(), to: "/ruleset/3".into() }
        );

        let rows = create_rows(def, &[json!({"id": 1, "ruleset_id": 8})]);
        assert_eq!(
            rows[0].cells[3],
            CellContent::Link { label: "8".into(), to: "/ruleset/8".into() }
        );

        // Neither present: the cell degrades to empty text, no link
        let rows = create_rows(def, &[json!({"id": 1})]);
        assert_eq!(rows[0].cells[3], CellContent::Text(String::new()));
    }

    #[test]
    fn row_count_matches_item_count() {
        let def = get_resource("jobs").unwrap();
        let items = vec![json!({"id": 1}), json!({}), json!({"id": 3, "name": "x"})];
        assert_eq!(create_rows(def, &items).len(), 3);
    }

    #[test]
    fn missing_record_id_renders_empty() {
        let def = get_resource("jobs").unwrap();
        let rows = create_rows(def, &[json!({"name": "orphan"})]);
        assert_eq!(rows[0].id, "");
        assert_eq!(rows[0].cells[0], CellContent::Text(String::new()));
    }

    #[test]
    fn route_ids_are_percent_encoded() {
        let def = get_resource("audit-rules").unwrap();
        let rows = create_rows(def, &[json!({"id": "a b"})]);
        assert_eq!(
            rows[0].cells[0],
            CellContent::Link { label: "a b".into(), to: "/audit-rule/a%20b".into() }
        );
    }

    #[test]
    fn fired_at_absent_or_null_is_epoch() {
        assert_eq!(format_fired_at(None), EPOCH_DISPLAY);
        assert_eq!(format_fired_at(Some(&Value::Null)), EPOCH_DISPLAY);
    }

    #[test]
    fn fired_at_garbage_is_epoch_not_invalid() {
        let garbage = json!("not a date");
        let out = format_fired_at(Some(&garbage));
        assert_eq!(out, EPOCH_DISPLAY);
        assert!(!out.to_lowercase().contains("invalid"));
    }

    #[test]
    fn fired_at_parses_rfc3339() {
        let value = json!("2022-07-12T21:28:48Z");
        assert_eq!(format_fired_at(Some(&value)), "7/12/22, 9:28:48 PM UTC");
    }

    #[test]
    fn fired_at_parses_offset_into_utc() {
        let value = json!("2022-07-12T21:28:48+02:00");
        assert_eq!(format_fired_at(Some(&value)), "7/12/22, 7:28:48 PM UTC");
    }

    #[test]
    fn fired_at_parses_naive_iso_as_utc() {
        let value = json!("2022-07-12T09:28:48.123456");
        assert_eq!(format_fired_at(Some(&value)), "7/12/22, 9:28:48 AM UTC");
    }

    #[test]
    fn fired_at_parses_epoch_millis() {
        let value = json!(86_400_000);
        assert_eq!(format_fired_at(Some(&value)), "1/2/70, 12:00:00 AM UTC");
    }

    #[test]
    fn hosts_view_coalesces_host_fields() {
        let def = get_resource("audit-hosts").unwrap();
        let rows = create_rows(
            def,
            &[json!({"host": "web-1", "rule": {"name": "restart"}, "status": "ok"})],
        );
        assert_eq!(rows[0].cells[0], CellContent::Text("web-1".into()));
        assert_eq!(rows[0].cells[1], CellContent::Text("restart".into()));
    }
}
