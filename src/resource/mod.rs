//! Resource abstraction layer
//!
//! This module provides a data-driven approach to the browsable
//! collections. Table definitions are loaded from JSON files at compile
//! time, so new views can be added without touching the render code.
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches resource definitions from embedded JSON
//! - [`fetcher`] - Fetches collections and extracts display values
//!
//! # Resource Definitions
//!
//! Resources are defined in JSON files under `src/resources/`:
//! - `audit.json` - Audit views (rules fired, hosts changed, per-rule tabs)
//! - `jobs.json` - The jobs view
//!
//! # Example
//!
//! ```ignore
//! use crate::api::{client::EdaClient, ListParams};
//! use crate::resource::fetch_collection;
//!
//! async fn list_rules(client: &EdaClient) -> anyhow::Result<Vec<serde_json::Value>> {
//!     fetch_collection(client, "audit-rules", None, &ListParams::default()).await
//! }
//! ```

mod fetcher;
mod registry;

#[allow(unused_imports)]
pub use fetcher::{extract_first, extract_items, extract_json_value, fetch_collection, invoke_op};
pub use registry::*;
