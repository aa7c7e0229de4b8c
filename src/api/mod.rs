//! EDA server API interaction module
//!
//! This module provides the core functionality for talking to an
//! event-driven automation server's JSON API: the HTTP transport, the
//! client handle, and one function per audit/job endpoint.
//!
//! # Module Structure
//!
//! - [`client`] - Client handle holding the server base URL
//! - [`http`] - HTTP utilities for REST API calls
//! - [`audit`] - Audit surface: rules fired, hosts changed, per-rule drill-downs
//! - [`jobs`] - Job listing
//!
//! # Example
//!
//! ```ignore
//! use crate::api::{audit, client::EdaClient, ListParams};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = EdaClient::new("127.0.0.1:8080")?;
//!     let rules = audit::list_rules_fired(&client, &ListParams::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod audit;
pub mod client;
pub mod http;
pub mod jobs;

/// Pagination settings accepted by the audit list operations.
///
/// The server pages with `limit`/`offset` semantics, but the list
/// endpoints currently ignore both and always return the default page.
/// Callers pass these for interface stability; the operations do not
/// serialize them into the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    pub limit: usize,
    pub offset: usize,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_match_server_defaults() {
        let params = ListParams::default();
        assert_eq!(params.limit, 50);
        assert_eq!(params.offset, 0);
    }
}
