// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for querying registered peers.

use std::fmt;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

/// Opaque record returned by a peer. Only presence is interpreted.
pub type AgentRecord = serde_json::Value;

/// Why a single peer contributed nothing to a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerError {
    /// Connection refused, DNS failure, malformed URL.
    Unreachable(String),
    /// Peer did not answer within the per-peer timeout.
    Timeout,
    /// Non-2xx status.
    BadStatus(u16),
    /// 2xx with a body that is not JSON.
    BadBody(String),
}

impl fmt::Display for PeerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable(msg) => write!(f, "peer unreachable: {msg}"),
            Self::Timeout => f.write_str("peer timed out"),
            Self::BadStatus(code) => write!(f, "peer returned status {code}"),
            Self::BadBody(msg) => write!(f, "peer returned invalid json: {msg}"),
        }
    }
}

impl std::error::Error for PeerError {}

impl From<reqwest::Error> for PeerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::BadBody(err.to_string())
        } else {
            Self::Unreachable(err.to_string())
        }
    }
}

/// Result of one peer call.
#[derive(Debug, Clone, PartialEq)]
pub enum PeerOutcome {
    Records(Vec<AgentRecord>),
    Failed(PeerError),
}

/// Shared client for all peer calls; carries the per-peer timeout.
#[derive(Debug, Clone)]
pub struct PeerClient {
    client: Client,
}

impl PeerClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        crate::ensure_crypto();
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(2)))
            .build()?;
        Ok(Self { client })
    }

    /// `GET <base>/calls/<target_id>/agents` on one peer.
    pub async fn fetch_agents(&self, base_url: &str, target_id: &str) -> PeerOutcome {
        match self.try_fetch_agents(base_url, target_id).await {
            Ok(records) => PeerOutcome::Records(records),
            Err(e) => PeerOutcome::Failed(e),
        }
    }

    async fn try_fetch_agents(
        &self,
        base_url: &str,
        target_id: &str,
    ) -> Result<Vec<AgentRecord>, PeerError> {
        let req = self
            .client
            .get(agents_url(base_url, target_id))
            .header(CONTENT_TYPE, "application/json");
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PeerError::BadStatus(status.as_u16()));
        }
        let bytes = resp.bytes().await?;
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| PeerError::BadBody(e.to_string()))?;
        Ok(into_records(value))
    }
}

/// Peer endpoint for a target id.
pub fn agents_url(base_url: &str, target_id: &str) -> String {
    format!("{}/calls/{target_id}/agents", base_url.trim_end_matches('/'))
}

/// Arrays are flattened, absent values contribute nothing, anything else is
/// one record.
pub fn into_records(value: serde_json::Value) -> Vec<AgentRecord> {
    match value {
        serde_json::Value::Array(items) => items.into_iter().filter(is_present).collect(),
        other if is_present(&other) => vec![other],
        _ => vec![],
    }
}

/// `null`, `false`, zero and `""` carry no record.
fn is_present(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn agents_url_trims_trailing_slash() {
        assert_eq!(agents_url("http://p1/", "42"), "http://p1/calls/42/agents");
        assert_eq!(agents_url("http://p1", "42"), "http://p1/calls/42/agents");
    }

    #[test]
    fn object_body_is_one_record() {
        assert_eq!(into_records(json!({"name": "A"})), vec![json!({"name": "A"})]);
    }

    #[test]
    fn array_body_is_flattened_without_nulls() {
        let records = into_records(json!([{"name": "A"}, null, {"name": "B"}]));
        assert_eq!(records, vec![json!({"name": "A"}), json!({"name": "B"})]);
    }

    #[test]
    fn null_body_contributes_nothing() {
        assert!(into_records(serde_json::Value::Null).is_empty());
    }

    #[test]
    fn falsy_bodies_contribute_nothing() {
        for body in [json!(false), json!(0), json!(0.0), json!("")] {
            assert!(into_records(body.clone()).is_empty(), "{body} kept");
        }
    }

    #[test]
    fn falsy_array_elements_are_dropped() {
        let records = into_records(json!([false, 0, "", {"name": "A"}, true, 1, "x", []]));
        assert_eq!(records, vec![json!({"name": "A"}), json!(true), json!(1), json!("x"), json!([])]);
    }
}
