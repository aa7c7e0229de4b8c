//! Resource Fetcher
//!
//! Fetches collections from the audit API based on resource definitions
//! and extracts display values from the returned records.

use super::registry::get_resource;
use crate::api::client::EdaClient;
use crate::api::{audit, jobs, ListParams};
use anyhow::Result;
use serde_json::Value;

/// Invoke an API operation by its registry name.
///
/// Per-rule operations require `parent_id` (the rule id from the
/// route); `params` reaches the two audit lists, which accept it
/// without serializing it.
pub async fn invoke_op(
    op: &str,
    client: &EdaClient,
    parent_id: Option<&str>,
    params: &ListParams,
) -> Result<Value> {
    match op {
        "audit.rules_fired" => audit::list_rules_fired(client, params).await,
        "audit.hosts_changed" => audit::list_hosts_changed(client, params).await,
        "audit.rule_jobs" => audit::rule_jobs(client, require_parent(op, parent_id)?).await,
        "audit.rule_hosts" => audit::rule_hosts(client, require_parent(op, parent_id)?).await,
        "audit.rule_events" => audit::rule_events(client, require_parent(op, parent_id)?).await,
        "jobs.list" => jobs::list_jobs(client).await,
        _ => Err(anyhow::anyhow!("Unknown API operation: {}", op)),
    }
}

fn require_parent<'a>(op: &str, parent_id: Option<&'a str>) -> Result<&'a str> {
    parent_id.ok_or_else(|| anyhow::anyhow!("Operation {} needs a rule id", op))
}

/// Fetch one collection as a list of JSON records
pub async fn fetch_collection(
    client: &EdaClient,
    resource_key: &str,
    parent_id: Option<&str>,
    params: &ListParams,
) -> Result<Vec<Value>> {
    let Some(resource_def) = get_resource(resource_key) else {
        return Err(anyhow::anyhow!("Unknown resource: {}", resource_key));
    };

    let response = invoke_op(&resource_def.api_op, client, parent_id, params).await?;
    extract_items(&response, &resource_def.response_path)
}

/// Extract the item array from a response using the response_path.
///
/// An empty path means the response itself is the array (the audit
/// endpoints return bare arrays, not envelopes).
pub fn extract_items(response: &Value, path: &str) -> Result<Vec<Value>> {
    let target = if path.is_empty() {
        response
    } else {
        let mut current = response;
        for part in path.split('.') {
            current = match current.get(part) {
                Some(v) => v,
                None => return Ok(vec![]),
            };
        }
        current
    };

    match target {
        Value::Array(arr) => Ok(arr.clone()),
        other => Err(anyhow::anyhow!(
            "Expected an array of records, got {}",
            value_kind(other)
        )),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Extract a value from JSON using a dot-notation path, with a `-`
/// placeholder for anything missing. Used by describe views and titles.
pub fn extract_json_value(item: &Value, path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    let mut current = item;

    for part in parts {
        // Handle array index
        if let Ok(idx) = part.parse::<usize>() {
            current = match current.get(idx) {
                Some(v) => v,
                None => return "-".to_string(),
            };
        } else {
            current = match current.get(part) {
                Some(v) => v,
                None => return "-".to_string(),
            };
        }
    }

    match current {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(_) => "[object]".to_string(),
    }
}

/// First path in the chain that yields a present, non-null scalar.
///
/// Row building renders `None` as an empty cell; server records name
/// the same thing differently across endpoints, so columns carry a
/// fallback chain instead of a single path.
pub fn extract_first<S: AsRef<str>>(item: &Value, paths: &[S]) -> Option<String> {
    for path in paths {
        let mut current = item;
        let mut found = true;

        for part in path.as_ref().split('.') {
            current = match part.parse::<usize>() {
                Ok(idx) => match current.get(idx) {
                    Some(v) => v,
                    None => {
                        found = false;
                        break;
                    }
                },
                Err(_) => match current.get(part) {
                    Some(v) => v,
                    None => {
                        found = false;
                        break;
                    }
                },
            };
        }

        if !found {
            continue;
        }

        match current {
            Value::String(s) => return Some(s.clone()),
            Value::Number(n) => return Some(n.to_string()),
            Value::Bool(b) => return Some(b.to_string()),
            _ => continue,
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_items_accepts_bare_arrays() {
        let response = json!([{"id": 1}, {"id": 2}]);
        let items = extract_items(&response, "").unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn extract_items_walks_nested_paths() {
        let response = json!({"data": {"results": [{"id": 1}]}});
        let items = extract_items(&response, "data.results").unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn extract_items_missing_path_is_empty() {
        let response = json!({"data": {}});
        let items = extract_items(&response, "data.results").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn extract_items_rejects_non_arrays() {
        let response = json!({"id": 1});
        let err = extract_items(&response, "").unwrap_err();
        assert!(err.to_string().contains("Expected an array"));
    }

    #[test]
    fn extract_json_value_handles_scalars_and_placeholders() {
        let item = json!({"name": "rule", "count": 3, "active": true, "gone": null});
        assert_eq!(extract_json_value(&item, "name"), "rule");
        assert_eq!(extract_json_value(&item, "count"), "3");
        assert_eq!(extract_json_value(&item, "active"), "true");
        assert_eq!(extract_json_value(&item, "gone"), "-");
        assert_eq!(extract_json_value(&item, "missing"), "-");
    }

    #[test]
    fn extract_json_value_describes_containers() {
        let item = json!({"hosts": ["a", "b"], "job": {"id": 9}});
        assert_eq!(extract_json_value(&item, "hosts"), "[2 items]");
        assert_eq!(extract_json_value(&item, "job"), "[object]");
        assert_eq!(extract_json_value(&item, "hosts.1"), "b");
    }

    #[test]
    fn extract_first_walks_fallback_chain() {
        let item = json!({"job_id": 9});
        let paths = vec!["job.name".to_string(), "job_id".to_string()];
        assert_eq!(extract_first(&item, &paths), Some("9".to_string()));
    }

    #[test]
    fn extract_first_skips_null_values() {
        let item = json!({"name": null, "id": 5});
        let paths = vec!["name".to_string(), "id".to_string()];
        assert_eq!(extract_first(&item, &paths), Some("5".to_string()));
    }

    #[test]
    fn extract_first_empty_chain_is_none() {
        let item = json!({"ruleset": null});
        let paths = vec!["ruleset.id".to_string(), "ruleset_id".to_string()];
        assert_eq!(extract_first(&item, &paths), None);
    }

    #[tokio::test]
    async fn unknown_op_is_an_error() {
        let client = EdaClient::new("127.0.0.1:1").unwrap();
        let err = invoke_op("unknown.op", &client, None, &ListParams::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unknown API operation"));
    }

    #[tokio::test]
    async fn per_rule_op_without_parent_is_an_error() {
        let client = EdaClient::new("127.0.0.1:1").unwrap();
        let err = invoke_op("audit.rule_jobs", &client, None, &ListParams::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("needs a rule id"));
    }

    #[tokio::test]
    async fn fetch_collection_accepts_params_without_sending_them() {
        use wiremock::matchers::{method, path, query_param_is_missing};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/audit/rules_fired"))
            .and(query_param_is_missing("limit"))
            .and(query_param_is_missing("offset"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
            .expect(1)
            .mount(&server)
            .await;

        let client = EdaClient::new(&server.uri()).unwrap();
        let params = ListParams { limit: 7, offset: 3 };
        let items = fetch_collection(&client, "audit-rules", None, &params)
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
    }
}
