//! Job surface of the EDA API

use super::client::EdaClient;
use anyhow::Result;
use serde_json::Value;

// The jobs route is registered with a trailing slash; without it the
// server answers with a redirect the client does not follow for APIs.
const JOBS_ENDPOINT: &str = "/api/jobs/";

/// List jobs known to the server, in server order
pub async fn list_jobs(client: &EdaClient) -> Result<Value> {
    client.get(JOBS_ENDPOINT).await
}
