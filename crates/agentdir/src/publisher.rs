// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic stream publisher.
//!
//! One publisher per subscriber. Each tick asks a [`TickSource`] for a line
//! and pushes it, newline-terminated, into the subscriber's channel. A tick
//! whose source fails is logged and skipped; the publisher only stops on
//! cancellation or when the subscriber is gone.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use chrono::{SecondsFormat, Utc};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::upstream::aggregator::Aggregator;

/// Produces the payload for one tick.
pub trait TickSource: Send + Sync + 'static {
    /// One message, without the trailing newline.
    fn next_line(&self) -> impl Future<Output = anyhow::Result<String>> + Send;
}

/// Aggregation for a fixed target, serialized as a JSON array.
pub struct AgentFeed {
    aggregator: Aggregator,
    target_id: String,
}

impl AgentFeed {
    pub fn new(aggregator: Aggregator, target_id: impl Into<String>) -> Self {
        Self { aggregator, target_id: target_id.into() }
    }
}

impl TickSource for AgentFeed {
    async fn next_line(&self) -> anyhow::Result<String> {
        let agents = self.aggregator.aggregate(&self.target_id).await?;
        Ok(serde_json::to_string(&agents)?)
    }
}

/// Heartbeat: `It is <ISO-8601 UTC timestamp>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Clock;

impl Clock {
    pub fn line() -> String {
        format!("It is {}", Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl TickSource for Clock {
    async fn next_line(&self) -> anyhow::Result<String> {
        let line = Self::line();
        tracing::trace!(line = %line, "heartbeat");
        Ok(line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublisherState {
    /// Created, timer not armed.
    Idle,
    /// Timer armed, publishing on every tick.
    Running,
    /// Terminal. No further ticks.
    Closed,
}

/// Counters reported when a publisher closes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishSummary {
    pub ticks: u64,
    pub sent: u64,
    pub skipped: u64,
}

pub struct StreamPublisher<S> {
    source: S,
    interval: Duration,
    state: PublisherState,
}

impl<S: TickSource> StreamPublisher<S> {
    pub fn new(source: S, interval: Duration) -> Self {
        Self { source, interval, state: PublisherState::Idle }
    }

    pub fn state(&self) -> PublisherState {
        self.state
    }

    /// Publish into `sink` until `cancel` fires or the receiver is dropped.
    ///
    /// The first tick fires one interval after the call. Calling `run` on a
    /// closed publisher returns immediately.
    pub async fn run(
        &mut self,
        sink: mpsc::Sender<Bytes>,
        cancel: CancellationToken,
    ) -> PublishSummary {
        let mut summary = PublishSummary::default();
        if self.state == PublisherState::Closed {
            return summary;
        }
        self.state = PublisherState::Running;

        let start = tokio::time::Instant::now() + self.interval;
        let mut timer = tokio::time::interval_at(start, self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sink.closed() => {
                    tracing::debug!("stream subscriber disconnected");
                    break;
                }
                _ = timer.tick() => {}
            }
            summary.ticks += 1;

            let line = tokio::select! {
                _ = cancel.cancelled() => break,
                line = self.source.next_line() => line,
            };
            let mut line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(err = %e, "stream tick skipped");
                    summary.skipped += 1;
                    continue;
                }
            };
            line.push('\n');

            let sent = tokio::select! {
                _ = cancel.cancelled() => break,
                sent = sink.send(Bytes::from(line)) => sent,
            };
            if sent.is_err() {
                tracing::debug!("stream enqueue failed, closing");
                break;
            }
            summary.sent += 1;
        }

        self.state = PublisherState::Closed;
        summary
    }
}

#[cfg(test)]
#[path = "publisher_tests.rs"]
mod tests;
