// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for the directory.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::registry::RegistryError;
use crate::state::DirectoryState;
use crate::upstream::client::AgentRecord;

// -- Request/Response types ---------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub owner: String,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UrlsResponse {
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentsResponse {
    pub agents: Vec<AgentRecord>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub peer_count: usize,
}

#[derive(Debug, Serialize)]
pub struct HelloResponse {
    pub hello: String,
}

#[derive(Debug, Serialize)]
pub struct SampleAgent {
    pub agent: String,
    pub from: String,
}

fn registry_error(err: &RegistryError) -> axum::response::Response {
    let code = ApiError::from(err);
    if code == ApiError::RegistryUnavailable {
        tracing::error!(err = %err, "registry unavailable");
    }
    code.to_http_response(err.to_string()).into_response()
}

// -- Handlers -----------------------------------------------------------------

/// `GET /`
pub async fn hello() -> impl IntoResponse {
    Json(HelloResponse { hello: "world".to_owned() })
}

/// `GET /health`
pub async fn health(State(s): State<Arc<DirectoryState>>) -> impl IntoResponse {
    match s.registry.list_urls() {
        Ok(urls) => {
            Json(HealthResponse { status: "running".to_owned(), peer_count: urls.len() })
                .into_response()
        }
        Err(e) => registry_error(&e),
    }
}

/// `POST /register`: store a peer URL under its owner.
pub async fn register(State(s): State<Arc<DirectoryState>>, body: Bytes) -> impl IntoResponse {
    let nothing_sent = || {
        (StatusCode::BAD_REQUEST, Json(MessageResponse { message: "nothing was sent".to_owned() }))
            .into_response()
    };
    if body.iter().all(u8::is_ascii_whitespace) {
        return nothing_sent();
    }

    let req = match serde_json::from_slice::<Option<RegisterRequest>>(&body) {
        Ok(Some(req)) => req,
        Ok(None) => return nothing_sent(),
        Err(e) => {
            tracing::debug!(err = %e, "rejected registration body");
            return ApiError::Validation
                .to_http_response(format!("invalid registration: {e}"))
                .into_response();
        }
    };

    match s.registry.register(&req.owner, &req.url) {
        Ok(()) => Json(MessageResponse { message: "url stored".to_owned() }).into_response(),
        Err(e) => registry_error(&e),
    }
}

/// `GET /urls`: every registered peer URL.
pub async fn list_urls(State(s): State<Arc<DirectoryState>>) -> impl IntoResponse {
    match s.registry.list_urls() {
        Ok(urls) => Json(UrlsResponse { urls }).into_response(),
        Err(e) => registry_error(&e),
    }
}

/// `GET /calls/{id}/agents`: one aggregation cycle across all peers.
pub async fn call_agents(
    State(s): State<Arc<DirectoryState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match s.aggregator.aggregate(&id).await {
        Ok(agents) => Json(AgentsResponse { agents }).into_response(),
        Err(e) => registry_error(&e),
    }
}

/// `GET /test/calls/{id}/agents`: built-in sample peer answer.
pub async fn sample_agent(Path(_id): Path<String>) -> impl IntoResponse {
    Json(SampleAgent { agent: "Test Agent".to_owned(), from: "Server".to_owned() })
}
