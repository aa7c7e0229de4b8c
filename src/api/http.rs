//! HTTP utilities for EDA server REST API calls

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        // Back off to a char boundary; byte-slicing mid-character panics
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper for EDA API calls
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("teda/{}", crate::VERSION))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Make a GET request and parse the JSON body
    pub async fn get(&self, url: &str) -> Result<Value> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            // Only log sanitized/truncated error bodies
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(anyhow::anyhow!("API request failed: {}", status));
        }

        serde_json::from_str(&body).context("Failed to parse response JSON")
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new().expect("Failed to create default HTTP client")
    }
}

/// Format an API error for the status line
/// Maps common failures onto short messages and sanitizes the rest
pub fn format_api_error(error: &anyhow::Error) -> String {
    let error_str = error.to_string();

    if error_str.contains("403") {
        return "Permission denied by the server.".to_string();
    }
    if error_str.contains("401") {
        return "Authentication required. Check the server configuration.".to_string();
    }
    if error_str.contains("404") {
        return "Resource not found.".to_string();
    }
    if error_str.contains("429") {
        return "Rate limit exceeded. Please try again later.".to_string();
    }
    if error_str.contains("400") {
        return "Invalid request. Check your parameters.".to_string();
    }
    if error_str.contains("500") || error_str.contains("503") {
        return "Server temporarily unavailable. Please try again.".to_string();
    }

    // Chained reqwest errors carry the connect failure in their sources
    let full_chain = format!("{:#}", error);
    if full_chain.contains("Connection refused") || full_chain.contains("connect error") {
        return "Cannot reach the server. Is it running?".to_string();
    }
    if error_str.contains("API request failed") {
        return "Request failed. Check your network connection and try again.".to_string();
    }
    if error_str.contains("parse response JSON") {
        return "Server returned an unexpected response.".to_string();
    }

    // Truncate anything else rather than exposing raw error text
    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(80)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let out = sanitize_for_log(&body);
        assert!(out.contains("truncated"));
        assert!(out.contains("500 bytes total"));
    }

    #[test]
    fn sanitize_handles_multibyte_at_truncation_point() {
        // A multi-byte char straddling the truncation boundary must not
        // panic the error path; error pages are not always ASCII
        let mut body = "x".repeat(MAX_LOG_BODY_LENGTH - 1);
        body.push('€');
        body.push_str(&"y".repeat(100));

        let out = sanitize_for_log(&body);
        assert!(out.contains("truncated"));
        assert!(out.contains("302 bytes total"));
    }

    #[test]
    fn sanitize_strips_control_characters() {
        let out = sanitize_for_log("ok\u{7}\nline");
        assert_eq!(out, "okline");
    }

    #[test]
    fn format_maps_status_codes() {
        let err = anyhow::anyhow!("API request failed: 404 Not Found");
        assert_eq!(format_api_error(&err), "Resource not found.");

        let err = anyhow::anyhow!("API request failed: 503 Service Unavailable");
        assert_eq!(
            format_api_error(&err),
            "Server temporarily unavailable. Please try again."
        );
    }

    #[test]
    fn format_maps_generic_request_failure() {
        let err = anyhow::anyhow!("API request failed: 418 I'm a teapot");
        assert_eq!(
            format_api_error(&err),
            "Request failed. Check your network connection and try again."
        );
    }

    #[test]
    fn format_maps_shape_errors() {
        let err = anyhow::anyhow!("Failed to parse response JSON");
        assert_eq!(format_api_error(&err), "Server returned an unexpected response.");
    }

    #[test]
    fn format_truncates_unknown_errors() {
        let err = anyhow::anyhow!("{}", "e".repeat(200));
        let out = format_api_error(&err);
        assert!(out.len() <= 83);
        assert!(out.ends_with("..."));
    }
}
