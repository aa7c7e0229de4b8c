//! EDA Client
//!
//! Main client for interacting with the automation server's API,
//! combining the server address with HTTP functionality.

use super::http::HttpClient;
use anyhow::{Context, Result};
use serde_json::Value;
use url::Url;

/// Main EDA API client
#[derive(Clone)]
pub struct EdaClient {
    pub http: HttpClient,
    pub base_url: String,
}

impl EdaClient {
    /// Create a new client for the given server address.
    ///
    /// Accepts `host:port` or a full URL; a missing scheme defaults to
    /// plain HTTP, matching how the server is typically deployed behind
    /// a local port.
    pub fn new(server: &str) -> Result<Self> {
        let base_url = normalize_server(server)?;
        let http = HttpClient::new()?;

        Ok(Self { http, base_url })
    }

    /// Build a full API URL from a path like `/api/jobs/`
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Make a GET request to an API path
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.http.get(&self.api_url(path)).await
    }
}

/// Validate a server address and normalize it to a base URL
/// without a trailing slash.
fn normalize_server(server: &str) -> Result<String> {
    let trimmed = server.trim();
    if trimmed.is_empty() {
        anyhow::bail!("Server address is empty");
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let url = Url::parse(&with_scheme)
        .with_context(|| format!("Invalid server address: {}", server))?;

    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("Unsupported scheme '{}' in server address", url.scheme());
    }
    if url.host_str().is_none() {
        anyhow::bail!("Server address has no host: {}", server);
    }

    Ok(with_scheme.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_port_gets_http_scheme() {
        let client = EdaClient::new("127.0.0.1:8080").unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn explicit_scheme_is_preserved() {
        let client = EdaClient::new("https://eda.example.com").unwrap();
        assert_eq!(client.base_url, "https://eda.example.com");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = EdaClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.api_url("/api/jobs/"), "http://localhost:8080/api/jobs/");
    }

    #[test]
    fn empty_address_is_rejected() {
        assert!(EdaClient::new("  ").is_err());
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        assert!(EdaClient::new("ftp://example.com").is_err());
    }

    #[test]
    fn api_url_joins_base_and_path() {
        let client = EdaClient::new("eda.internal:9000").unwrap();
        assert_eq!(
            client.api_url("/api/audit/rules_fired"),
            "http://eda.internal:9000/api/audit/rules_fired"
        );
    }
}
