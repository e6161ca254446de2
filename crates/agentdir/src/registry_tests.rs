// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use super::*;
use crate::store::{key, KvKey, MemoryStore};

/// Store that fails every call.
struct DownStore;

impl KvStore for DownStore {
    fn put(&self, _key: KvKey, _value: String) -> Result<(), StoreError> {
        Err(StoreError::Write("connection refused".to_owned()))
    }

    fn list(&self, _prefix: &[&str]) -> Result<Vec<(KvKey, String)>, StoreError> {
        Err(StoreError::Read("connection refused".to_owned()))
    }
}

fn registry() -> Registry {
    Registry::new(Arc::new(MemoryStore::new()))
}

#[test]
fn reregister_keeps_latest_url() -> anyhow::Result<()> {
    let registry = registry();
    registry.register("a", "http://x")?;
    registry.register("a", "http://y")?;

    assert_eq!(registry.list_urls()?, ["http://y"]);
    assert_eq!(
        registry.list_registrations()?,
        vec![Registration { owner: "a".to_owned(), url: "http://y".to_owned() }]
    );
    Ok(())
}

#[test]
fn one_url_per_owner() -> anyhow::Result<()> {
    let registry = registry();
    for (owner, url) in [("p1", "http://p1"), ("p2", "http://p2"), ("p1", "http://p1b")] {
        registry.register(owner, url)?;
    }

    let mut urls = registry.list_urls()?;
    urls.sort();
    assert_eq!(urls, ["http://p1b", "http://p2"]);
    Ok(())
}

#[test]
fn empty_registry_lists_nothing() -> anyhow::Result<()> {
    assert!(registry().list_urls()?.is_empty());
    Ok(())
}

#[test]
fn url_is_stored_verbatim() -> anyhow::Result<()> {
    let registry = registry();
    registry.register("weird", "not a url/")?;
    assert_eq!(registry.list_urls()?, ["not a url/"]);
    Ok(())
}

#[test]
fn empty_owner_or_url_rejected() {
    let registry = registry();
    assert!(matches!(registry.register("", "http://x"), Err(RegistryError::Validation(_))));
    assert!(matches!(registry.register("a", ""), Err(RegistryError::Validation(_))));
}

#[test]
fn nested_keys_are_not_registrations() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    store.put(key(&["url", "a", "extra"]), "http://nested".to_owned())?;
    let registry = Registry::new(store);
    registry.register("b", "http://b")?;

    let owners: Vec<String> =
        registry.list_registrations()?.into_iter().map(|r| r.owner).collect();
    assert_eq!(owners, ["b"]);
    assert_eq!(registry.list_urls()?, ["http://b"]);
    Ok(())
}

#[test]
fn store_failures_map_to_unavailable() {
    let registry = Registry::new(Arc::new(DownStore));

    let write = registry.register("a", "http://x").err();
    assert!(matches!(write, Some(RegistryError::StoreWrite(_))));

    let read = registry.list_urls().err();
    assert!(matches!(read, Some(RegistryError::StoreRead(_))));
    assert!(read.is_some_and(|e| e.is_unavailable()));
}
