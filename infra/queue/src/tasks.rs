use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the pull queue read by the DNS writer.
pub const DNS_PULL_QUEUE: &str = "dns-pull";
/// Name of the queue feeding reference-safe deletion jobs.
pub const ASYNC_DELETE_QUEUE: &str = "async-delete";

/// Something the DNS writer has to republish.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "name")]
pub enum DnsRefresh {
    Domain(String),
    Host(String),
}

/// A request to delete a resource once nothing references it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionRequest {
    pub job_id: String,
    /// Repo id of the resource to delete.
    pub target: String,
    pub requesting_client_id: String,
    pub is_superuser: bool,
    pub requested_time: DateTime<Utc>,
}
