// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::DirectoryConfig;
use crate::registry::Registry;
use crate::store::{FileStore, KvStore, MemoryStore};
use crate::upstream::aggregator::Aggregator;
use crate::upstream::client::PeerClient;

/// Shared directory state.
pub struct DirectoryState {
    pub config: DirectoryConfig,
    pub registry: Registry,
    pub aggregator: Aggregator,
    /// Root token; every stream subscription holds a child of it.
    pub shutdown: CancellationToken,
}

impl DirectoryState {
    /// Build state over an explicit store.
    pub fn new(
        config: DirectoryConfig,
        store: Arc<dyn KvStore>,
        shutdown: CancellationToken,
    ) -> anyhow::Result<Self> {
        let registry = Registry::new(store);
        let client = PeerClient::new(config.peer_timeout())?;
        let aggregator = Aggregator::new(registry.clone(), client);
        Ok(Self { config, registry, aggregator, shutdown })
    }

    /// Build state with the store selected by `config.store_path`.
    pub fn from_config(config: DirectoryConfig, shutdown: CancellationToken) -> anyhow::Result<Self> {
        let store: Arc<dyn KvStore> = match config.store_path {
            Some(ref path) => {
                let store = FileStore::open(path)?;
                tracing::info!(path = %store.path().display(), "using file store");
                Arc::new(store)
            }
            None => Arc::new(MemoryStore::new()),
        };
        Self::new(config, store, shutdown)
    }
}
