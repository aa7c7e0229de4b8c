//! Integration tests for the audit API wire contract using wiremock
//!
//! These tests pin the HTTP surface the client depends on: exact
//! endpoint paths, GET-only access, the jobs trailing slash, and the
//! absence of pagination query parameters.

use serde_json::json;
use wiremock::matchers::{method, path, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Wire contract for the audit list endpoints
mod audit_list_tests {
    use super::*;

    /// Rules fired is a plain GET with no query string
    #[tokio::test]
    async fn test_rules_fired_path_and_no_pagination() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/audit/rules_fired"))
            .and(query_param_is_missing("limit"))
            .and(query_param_is_missing("offset"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "shutdown handler", "status": "ok",
                 "ruleset": {"id": 3}, "job": {"id": 9, "name": "deploy"},
                 "last_fired_at": "2022-07-12T21:28:48Z"},
                {"id": 2, "name": "restart handler", "status": "failed",
                 "ruleset_id": 4, "job_id": 11, "last_fired_at": null}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/api/audit/rules_fired", server.uri());

        let response = client
            .get(&url)
            .send()
            .await
            .expect("Request should succeed")
            .json::<serde_json::Value>()
            .await
            .expect("Should parse JSON");

        let rules = response.as_array().expect("Response is a bare array");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0]["name"], "shutdown handler");
        // Both ruleset representations coexist in one page
        assert!(rules[0].get("ruleset").is_some());
        assert!(rules[1].get("ruleset_id").is_some());
    }

    /// Hosts changed uses its own path, same contract
    #[tokio::test]
    async fn test_hosts_changed_path() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/audit/hosts_changed"))
            .and(query_param_is_missing("limit"))
            .and(query_param_is_missing("offset"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 5, "name": "web-1", "status": "ok",
                 "fired_at": "2022-07-12T09:00:00Z"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/api/audit/hosts_changed", server.uri());

        let response = client
            .get(&url)
            .send()
            .await
            .expect("Request should succeed")
            .json::<serde_json::Value>()
            .await
            .expect("Should parse JSON");

        assert_eq!(response[0]["name"], "web-1");
    }

    /// An empty page is a valid response, not an error
    #[tokio::test]
    async fn test_empty_list_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/audit/rules_fired"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/api/audit/rules_fired", server.uri());

        let response = client
            .get(&url)
            .send()
            .await
            .expect("Request should succeed")
            .json::<serde_json::Value>()
            .await
            .expect("Should parse JSON");

        assert!(response.as_array().unwrap().is_empty());
    }
}

/// Wire contract for the per-rule drill-down endpoints
mod rule_detail_tests {
    use super::*;

    /// Details for one rule live under /api/audit/rule/{id}/details
    #[tokio::test]
    async fn test_rule_details_path() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/audit/rule/42/details"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 42,
                "name": "R1",
                "status": "ok",
                "ruleset": {"id": 3, "name": "baseline"},
                "last_fired_at": "2022-07-12T21:28:48Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/api/audit/rule/42/details", server.uri());

        let response = client
            .get(&url)
            .send()
            .await
            .expect("Request should succeed")
            .json::<serde_json::Value>()
            .await
            .expect("Should parse JSON");

        assert_eq!(response["id"], 42);
        assert_eq!(response["name"], "R1");
    }

    /// Each sub-collection has its own suffix under the rule path
    #[tokio::test]
    async fn test_rule_sub_collection_paths() {
        let server = MockServer::start().await;

        for suffix in ["jobs", "hosts", "events"] {
            Mock::given(method("GET"))
                .and(path(format!("/api/audit/rule/7/{}", suffix)))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = reqwest::Client::new();
        for suffix in ["jobs", "hosts", "events"] {
            let url = format!("{}/api/audit/rule/7/{}", server.uri(), suffix);
            let response = client
                .get(&url)
                .send()
                .await
                .expect("Request should complete");
            assert_eq!(response.status(), 200, "{} should answer", suffix);
        }
    }

    /// A rule id the server does not know yields a 404, not a redirect
    #[tokio::test]
    async fn test_missing_rule_404() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/audit/rule/999/details"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "detail": "Not found."
            })))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/api/audit/rule/999/details", server.uri());

        let response = client
            .get(&url)
            .send()
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), 404);
    }
}

/// Wire contract for the jobs endpoint
mod jobs_tests {
    use super::*;

    /// The jobs route is registered with a trailing slash
    #[tokio::test]
    async fn test_jobs_list_trailing_slash() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/jobs/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 9, "name": "deploy", "status": "successful"},
                {"id": 11, "name": "rollback", "status": "failed"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/api/jobs/", server.uri());

        let response = client
            .get(&url)
            .send()
            .await
            .expect("Request should succeed")
            .json::<serde_json::Value>()
            .await
            .expect("Should parse JSON");

        let jobs = response.as_array().unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0]["id"], 9);
    }

    /// Without the slash the server redirects; the contract is to call
    /// the canonical path directly
    #[tokio::test]
    async fn test_jobs_without_slash_redirects() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/jobs"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("Location", "/api/jobs/"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/jobs/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();
        let url = format!("{}/api/jobs", server.uri());

        let response = client
            .get(&url)
            .send()
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), 301);
    }
}

/// Failure modes every view must tolerate
mod failure_tests {
    use super::*;

    /// Server errors surface as their status, body untouched
    #[tokio::test]
    async fn test_500_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/audit/rules_fired"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "detail": "internal error"
            })))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/api/audit/rules_fired", server.uri());

        let response = client
            .get(&url)
            .send()
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), 500);
    }

    /// A success status with a non-JSON body is a shape failure the
    /// caller detects at parse time
    #[tokio::test]
    async fn test_non_json_body_fails_to_parse() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/audit/rules_fired"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/api/audit/rules_fired", server.uri());

        let result = client
            .get(&url)
            .send()
            .await
            .expect("Request should complete")
            .json::<serde_json::Value>()
            .await;

        assert!(result.is_err());
    }

    /// 429 passes through like any other non-2xx status
    #[tokio::test]
    async fn test_rate_limit_429() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/audit/hosts_changed"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "detail": "rate limit exceeded"
            })))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/api/audit/hosts_changed", server.uri());

        let response = client
            .get(&url)
            .send()
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), 429);
    }
}
