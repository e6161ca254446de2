// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness: directory state builders and loopback peers.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::{Json, Router};
use tokio_util::sync::CancellationToken;

use agentdir::config::DirectoryConfig;
use agentdir::state::DirectoryState;
use agentdir::store::{KvKey, KvStore, MemoryStore, StoreError};
use agentdir::transport::build_router;

pub fn test_config() -> DirectoryConfig {
    DirectoryConfig {
        host: "127.0.0.1".into(),
        port: 0,
        store_path: None,
        peer_timeout_ms: 300,
        agent_stream_ms: 50,
        clock_stream_ms: 50,
        log_format: "text".into(),
        log_level: "info".into(),
    }
}

pub fn test_state() -> anyhow::Result<Arc<DirectoryState>> {
    state_with_store(Arc::new(MemoryStore::new()))
}

pub fn state_with_store(store: Arc<dyn KvStore>) -> anyhow::Result<Arc<DirectoryState>> {
    Ok(Arc::new(DirectoryState::new(test_config(), store, CancellationToken::new())?))
}

/// Store that is always unreachable.
pub struct DownStore;

impl KvStore for DownStore {
    fn put(&self, _key: KvKey, _value: String) -> Result<(), StoreError> {
        Err(StoreError::Write("connection refused".to_owned()))
    }

    fn list(&self, _prefix: &[&str]) -> Result<Vec<(KvKey, String)>, StoreError> {
        Err(StoreError::Read("connection refused".to_owned()))
    }
}

/// Serve `router` on an ephemeral loopback port and return its base URL.
pub async fn serve(router: Router) -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://{addr}"))
}

/// Serve the full directory router over real TCP.
pub async fn serve_directory(state: Arc<DirectoryState>) -> anyhow::Result<String> {
    serve(build_router(state)).await
}

/// Peer answering every call with `body`, counting hits.
pub async fn counting_peer(body: serde_json::Value) -> anyhow::Result<(String, Arc<AtomicUsize>)> {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new().route(
        "/calls/{id}/agents",
        get({
            let hits = Arc::clone(&hits);
            move || {
                hits.fetch_add(1, Ordering::SeqCst);
                let body = body.clone();
                async move { Json(body) }
            }
        }),
    );
    Ok((serve(router).await?, hits))
}

/// Peer that never answers within any reasonable timeout.
pub async fn hung_peer() -> anyhow::Result<String> {
    let router = Router::new().route(
        "/calls/{id}/agents",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Json(serde_json::json!({"name": "late"}))
        }),
    );
    serve(router).await
}

/// Read newline-terminated lines from a streaming response until `n` arrive.
pub async fn read_lines(resp: &mut reqwest::Response, n: usize) -> anyhow::Result<Vec<String>> {
    let mut buf = String::new();
    let mut lines = Vec::new();
    while lines.len() < n {
        let chunk = tokio::time::timeout(Duration::from_secs(5), resp.chunk())
            .await??
            .ok_or_else(|| anyhow::anyhow!("stream ended after {} lines", lines.len()))?;
        buf.push_str(std::str::from_utf8(&chunk)?);
        while let Some(pos) = buf.find('\n') {
            lines.push(buf[..pos].to_owned());
            buf.drain(..=pos);
        }
    }
    lines.truncate(n);
    Ok(lines)
}

/// Plain HTTP client for talking to a served directory.
pub fn http_client() -> anyhow::Result<reqwest::Client> {
    agentdir::ensure_crypto();
    Ok(reqwest::Client::builder().build()?)
}
