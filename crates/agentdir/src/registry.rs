// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Peer registry: owner → base URL, stored under the `url` key namespace.
//!
//! No in-memory cache; every call goes to the store so aggregation always
//! sees the latest registrations.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::store::{KvStore, StoreError};

/// Key namespace for peer URLs.
pub const URL_NAMESPACE: &str = "url";

/// A stored registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub owner: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Owner or URL was empty.
    Validation(String),
    StoreWrite(String),
    StoreRead(String),
}

impl RegistryError {
    /// True when the backing store could not be reached.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::StoreRead(_) | Self::StoreWrite(_))
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "invalid registration: {msg}"),
            Self::StoreWrite(msg) => write!(f, "registry unavailable (write): {msg}"),
            Self::StoreRead(msg) => write!(f, "registry unavailable (read): {msg}"),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Read(msg) => Self::StoreRead(msg),
            StoreError::Write(msg) => Self::StoreWrite(msg),
        }
    }
}

/// Registry over an injected store.
#[derive(Clone)]
pub struct Registry {
    store: Arc<dyn KvStore>,
}

impl Registry {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Store `url` for `owner`. Last write wins.
    ///
    /// The URL is stored verbatim; malformed URLs only fail at fetch time.
    pub fn register(&self, owner: &str, url: &str) -> Result<(), RegistryError> {
        if owner.is_empty() {
            return Err(RegistryError::Validation("owner must not be empty".to_owned()));
        }
        if url.is_empty() {
            return Err(RegistryError::Validation("url must not be empty".to_owned()));
        }
        self.store.put(vec![URL_NAMESPACE.to_owned(), owner.to_owned()], url.to_owned())?;
        tracing::info!(owner, url, "url stored");
        Ok(())
    }

    /// Every stored URL in store key order.
    pub fn list_urls(&self) -> Result<Vec<String>, RegistryError> {
        Ok(self.list_registrations()?.into_iter().map(|reg| reg.url).collect())
    }

    /// Every registration (owner + URL) in store key order.
    pub fn list_registrations(&self) -> Result<Vec<Registration>, RegistryError> {
        let entries = self.store.list(&[URL_NAMESPACE])?;
        Ok(entries
            .into_iter()
            .filter_map(|(key, url)| {
                // Keys are `[namespace, owner]`; anything deeper was not written by us.
                match key.as_slice() {
                    [_, owner] => Some(Registration { owner: owner.clone(), url }),
                    _ => None,
                }
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
