//! Audit surface of the EDA API
//!
//! Read-only views over rule activity: which rules fired, which hosts
//! changed, and the per-rule drill-downs (details, jobs, hosts, events).

use super::client::EdaClient;
use super::ListParams;
use anyhow::Result;
use serde_json::Value;

const RULES_FIRED_ENDPOINT: &str = "/api/audit/rules_fired";
const HOSTS_CHANGED_ENDPOINT: &str = "/api/audit/hosts_changed";
const RULE_ENDPOINT: &str = "/api/audit/rule";

/// List fired rules in server order.
///
/// Pagination is accepted but not serialized; the server returns its
/// default page for this endpoint.
pub async fn list_rules_fired(client: &EdaClient, params: &ListParams) -> Result<Value> {
    let _ = params;
    client.get(RULES_FIRED_ENDPOINT).await
}

/// List hosts changed by rule activity, in server order.
///
/// Same pagination contract as [`list_rules_fired`].
pub async fn list_hosts_changed(client: &EdaClient, params: &ListParams) -> Result<Value> {
    let _ = params;
    client.get(HOSTS_CHANGED_ENDPOINT).await
}

/// Fetch the detail record for a single fired rule
pub async fn rule_details(client: &EdaClient, rule_id: &str) -> Result<Value> {
    client.get(&rule_path(rule_id, "details")).await
}

/// List jobs triggered by a rule
pub async fn rule_jobs(client: &EdaClient, rule_id: &str) -> Result<Value> {
    client.get(&rule_path(rule_id, "jobs")).await
}

/// List hosts a rule touched
pub async fn rule_hosts(client: &EdaClient, rule_id: &str) -> Result<Value> {
    client.get(&rule_path(rule_id, "hosts")).await
}

/// List events that fired a rule
pub async fn rule_events(client: &EdaClient, rule_id: &str) -> Result<Value> {
    client.get(&rule_path(rule_id, "events")).await
}

/// Build a per-rule path, percent-encoding the id segment
fn rule_path(rule_id: &str, suffix: &str) -> String {
    format!("{}/{}/{}", RULE_ENDPOINT, urlencoding::encode(rule_id), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> EdaClient {
        EdaClient::new(&server.uri()).unwrap()
    }

    #[test]
    fn rule_path_encodes_id_segments() {
        assert_eq!(rule_path("42", "details"), "/api/audit/rule/42/details");
        assert_eq!(
            rule_path("a b/c", "jobs"),
            "/api/audit/rule/a%20b%2Fc/jobs"
        );
    }

    #[tokio::test]
    async fn rules_fired_hits_exact_path_without_pagination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/audit/rules_fired"))
            .and(query_param_is_missing("limit"))
            .and(query_param_is_missing("offset"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "shutdown handler", "status": "ok"},
                {"id": 2, "name": "restart handler", "status": "failed"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let params = ListParams { limit: 5, offset: 99 };
        let body = list_rules_fired(&client, &params).await.unwrap();
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn hosts_changed_hits_exact_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/audit/hosts_changed"))
            .and(query_param_is_missing("limit"))
            .and(query_param_is_missing("offset"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let body = list_hosts_changed(&client, &ListParams::default()).await.unwrap();
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn rule_details_fetches_single_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/audit/rule/42/details"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 42, "name": "R1", "status": "ok"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let body = rule_details(&client, "42").await.unwrap();
        assert_eq!(body["name"], "R1");
    }

    #[tokio::test]
    async fn rule_sub_collections_hit_their_paths() {
        let server = MockServer::start().await;
        for suffix in ["jobs", "hosts", "events"] {
            Mock::given(method("GET"))
                .and(path(format!("/api/audit/rule/7/{}", suffix)))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = client_for(&server).await;
        rule_jobs(&client, "7").await.unwrap();
        rule_hosts(&client, "7").await.unwrap();
        rule_events(&client, "7").await.unwrap();
    }

    #[tokio::test]
    async fn missing_rule_propagates_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/audit/rule/999/details"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = rule_details(&client, "999").await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn non_json_success_is_a_shape_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/audit/rules_fired"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = list_rules_fired(&client, &ListParams::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("parse response JSON"));
    }
}
