//! Domain types shared by the poller and the dashboard.
//!
//! Records arrive from the proxy API as a JSON array and are displayed
//! as-is: health is computed upstream, never here.

use serde::{Deserialize, Serialize};

// ── Backend Record ─────────────────────────────────────────────────

/// One monitored backend node, as reported by `GET /v0/backends`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BackendRecord {
    /// Display name and sort key. Not guaranteed unique.
    pub name: String,
    /// Address shown in the "IP Address" column. Not validated.
    pub host: String,
    /// Health as decided by the upstream health checker.
    pub healthy: bool,
    /// Number of client sessions currently routed to this backend.
    pub current_session_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_enabled: Option<bool>,
}

impl BackendRecord {
    /// Build a record with only the displayed fields set.
    pub fn new(name: &str, host: &str, healthy: bool, current_session_count: u64) -> Self {
        Self {
            name: name.to_string(),
            host: host.to_string(),
            healthy,
            current_session_count,
            port: None,
            active: None,
            traffic_enabled: None,
        }
    }
}

/// Decode a `/v0/backends` response body.
///
/// The whole body is rejected if any record is malformed.
pub fn decode_backends(body: &[u8]) -> Result<Vec<BackendRecord>, serde_json::Error> {
    serde_json::from_slice(body)
}
