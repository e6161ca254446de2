// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chunked `text/plain` streams: one newline-terminated message per tick.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::ApiError;
use crate::publisher::{AgentFeed, Clock, StreamPublisher, TickSource};
use crate::state::DirectoryState;

/// Messages buffered per subscriber before the publisher waits.
const STREAM_BUFFER: usize = 16;

/// `GET /stream/calls/{id}/agents`: aggregation re-run every tick.
pub async fn stream_agents(
    State(s): State<Arc<DirectoryState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    tracing::debug!(target_id = %id, "agent stream opened");
    let feed = AgentFeed::new(s.aggregator.clone(), id);
    subscribe(&s, feed, s.config.agent_stream_interval())
}

/// `GET /stream`: heartbeat clock.
pub async fn stream_clock(State(s): State<Arc<DirectoryState>>) -> impl IntoResponse {
    tracing::debug!("clock stream opened");
    subscribe(&s, Clock, s.config.clock_stream_interval())
}

/// Start a publisher bound to this response body.
///
/// The body owns a drop guard on the subscription token: when the client
/// goes away and the body is dropped, the publisher is cancelled at once,
/// even mid-aggregation. Shutdown cancels every subscription via the parent.
fn subscribe<S: TickSource>(state: &DirectoryState, source: S, interval: Duration) -> Response {
    let cancel = state.shutdown.child_token();
    let (tx, rx) = mpsc::channel::<Bytes>(STREAM_BUFFER);

    let mut publisher = StreamPublisher::new(source, interval);
    let task_cancel = cancel.clone();
    tokio::spawn(async move {
        let summary = publisher.run(tx, task_cancel).await;
        tracing::debug!(
            ticks = summary.ticks,
            sent = summary.sent,
            skipped = summary.skipped,
            "stream closed"
        );
    });

    let guard = cancel.drop_guard();
    let body = ReceiverStream::new(rx).map(move |chunk| {
        let _ = &guard;
        Ok::<_, Infallible>(chunk)
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"))
        .header(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"))
        .body(Body::from_stream(body))
        .unwrap_or_else(|e| {
            ApiError::Internal.to_http_response(format!("stream setup: {e}")).into_response()
        })
}
