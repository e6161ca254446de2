// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Agent directory: peer registry with fan-out aggregation.
#[derive(Debug, Clone, Parser)]
#[command(name = "agentdir", version, about)]
pub struct DirectoryConfig {
    /// Host to bind on.
    #[arg(long, default_value = "0.0.0.0", env = "AGENTDIR_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 3000, env = "AGENTDIR_PORT")]
    pub port: u16,

    /// JSON file backing the registry. In-memory when unset.
    #[arg(long, env = "AGENTDIR_STORE_PATH")]
    pub store_path: Option<PathBuf>,

    /// Per-peer request timeout in milliseconds.
    #[arg(
        long,
        default_value_t = 5000,
        env = "AGENTDIR_PEER_TIMEOUT_MS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub peer_timeout_ms: u64,

    /// Tick interval for agent streams in milliseconds.
    #[arg(long, default_value_t = 1000, env = "AGENTDIR_AGENT_STREAM_MS")]
    pub agent_stream_ms: u64,

    /// Tick interval for the clock stream in milliseconds.
    #[arg(long, default_value_t = 500, env = "AGENTDIR_CLOCK_STREAM_MS")]
    pub clock_stream_ms: u64,

    /// Log format (json or text).
    #[arg(long, default_value = "text", env = "AGENTDIR_LOG_FORMAT")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "AGENTDIR_LOG_LEVEL")]
    pub log_level: String,
}

impl DirectoryConfig {
    pub fn peer_timeout(&self) -> Duration {
        Duration::from_millis(self.peer_timeout_ms.max(1))
    }

    pub fn agent_stream_interval(&self) -> Duration {
        Duration::from_millis(self.agent_stream_ms.max(1))
    }

    pub fn clock_stream_interval(&self) -> Duration {
        Duration::from_millis(self.clock_stream_ms.max(1))
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 3000,
            store_path: None,
            peer_timeout_ms: 5000,
            agent_stream_ms: 1000,
            clock_stream_ms: 500,
            log_format: "text".to_owned(),
            log_level: "info".to_owned(),
        }
    }
}
