// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transport: registry, aggregation, and streaming routes.

pub mod http;
pub mod stream;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::DirectoryState;

/// Build the axum `Router` with all directory routes.
pub fn build_router(state: Arc<DirectoryState>) -> Router {
    Router::new()
        .route("/", get(http::hello))
        .route("/health", get(http::health))
        // Registry
        .route("/register", post(http::register))
        .route("/urls", get(http::list_urls))
        // Aggregation
        .route("/calls/{id}/agents", get(http::call_agents))
        .route("/test/calls/{id}/agents", get(http::sample_agent))
        // Streams
        .route("/stream/calls/{id}/agents", get(stream::stream_agents))
        .route("/stream", get(stream::stream_clock))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
