// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agentdir: peer directory with fan-out agent aggregation.
//!
//! Peers register a base URL under an owner key. Queries fan out to every
//! registered peer and merge the successful answers; streaming endpoints
//! repeat the query on a timer for as long as the client stays connected.

pub mod config;
pub mod error;
pub mod publisher;
pub mod registry;
pub mod state;
pub mod store;
pub mod transport;
pub mod upstream;

use std::sync::{Arc, Once};

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::DirectoryConfig;
use crate::state::DirectoryState;
use crate::transport::build_router;

static CRYPTO_INIT: Once = Once::new();

/// Install the ring crypto provider for reqwest/rustls.
/// Safe to call multiple times; only the first call has effect.
pub fn ensure_crypto() {
    CRYPTO_INIT.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Run the directory server until shutdown.
pub async fn run(config: DirectoryConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let shutdown = CancellationToken::new();

    let state = Arc::new(DirectoryState::from_config(config, shutdown.clone())?);
    let registrations = state.registry.list_registrations()?;
    for reg in &registrations {
        tracing::debug!(owner = %reg.owner, url = %reg.url, "known peer");
    }
    tracing::info!(peers = registrations.len(), "registry loaded");

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown requested");
                shutdown.cancel();
            }
        });
    }

    let router = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("agentdir listening on {addr}");
    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;

    Ok(())
}
