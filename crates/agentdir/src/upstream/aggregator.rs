// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fan-out aggregation: ask every registered peer about a target and merge
//! the successful answers.

use futures_util::future::join_all;

use crate::registry::{Registry, RegistryError};
use crate::upstream::client::{AgentRecord, PeerClient, PeerOutcome};

/// Runs aggregation cycles against the peers in a [`Registry`].
#[derive(Clone)]
pub struct Aggregator {
    registry: Registry,
    client: PeerClient,
}

impl Aggregator {
    pub fn new(registry: Registry, client: PeerClient) -> Self {
        Self { registry, client }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// One aggregation cycle for `target_id`.
    ///
    /// Only a registry failure is an error. Peer failures are logged and
    /// dropped; the result keeps the registry's URL order.
    pub async fn aggregate(&self, target_id: &str) -> Result<Vec<AgentRecord>, RegistryError> {
        let urls = self.registry.list_urls()?;
        if urls.is_empty() {
            return Ok(vec![]);
        }

        let outcomes =
            join_all(urls.iter().map(|url| self.client.fetch_agents(url, target_id))).await;
        Ok(merge(target_id, urls.iter().map(String::as_str).zip(outcomes)))
    }
}

/// Keep records from successful peers in dispatch order, logging the rest.
pub fn merge<'a>(
    target_id: &str,
    outcomes: impl IntoIterator<Item = (&'a str, PeerOutcome)>,
) -> Vec<AgentRecord> {
    let mut agents = Vec::new();
    for (url, outcome) in outcomes {
        match outcome {
            PeerOutcome::Records(records) => agents.extend(records),
            PeerOutcome::Failed(e) => {
                tracing::warn!(url, target_id, err = %e, "peer dropped from aggregation");
            }
        }
    }
    agents
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;
