#![allow(dead_code)]

pub mod fake_classifier;

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use cardvantage_client::cache::RecommendationCache;
use cardvantage_client::classifier::Classifier;
use cardvantage_client::orchestrator::Orchestrator;
use cardvantage_client::registry::CardRegistry;
use cardvantage_client::ClientResult;
use cardvantage_client::store::{KeyValueStore, MemoryStore, SqliteStore, StoreChange};
use serde_json::Value;
use tempfile::{Builder, TempDir};
use tokio::sync::broadcast;

pub fn temp_home_in_tmp(prefix: &str) -> std::io::Result<(TempDir, PathBuf)> {
    let dir = Builder::new().prefix(prefix).tempdir_in("/tmp")?;
    let home = dir.path().join("profile-home");
    fs::create_dir_all(&home)?;
    Ok((dir, home))
}

/// Registry and orchestrator sharing one cache over a fresh profile store.
pub struct Harness {
    pub store: Arc<dyn KeyValueStore>,
    pub cache: Arc<RecommendationCache>,
    pub registry: CardRegistry,
    pub orchestrator: Orchestrator,
}

pub fn harness(home: &std::path::Path, classifier: Arc<dyn Classifier>) -> Option<Harness> {
    let store = SqliteStore::open_profile(Some(home)).ok()?;
    let store: Arc<dyn KeyValueStore> = Arc::new(store);
    let cache = Arc::new(RecommendationCache::new(Arc::clone(&store)));
    let registry = CardRegistry::new(Arc::clone(&store), Arc::clone(&cache));
    let orchestrator = Orchestrator::new(Arc::clone(&cache), classifier);
    Some(Harness {
        store,
        cache,
        registry,
        orchestrator,
    })
}

/// In-memory store whose writes block the calling thread for `delay`.
pub struct SlowWriteStore {
    inner: MemoryStore,
    delay: Duration,
}

impl SlowWriteStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryStore::new(),
            delay,
        }
    }
}

impl KeyValueStore for SlowWriteStore {
    fn get(&self, keys: &[&str]) -> ClientResult<BTreeMap<String, Value>> {
        self.inner.get(keys)
    }

    fn set(&self, entries: BTreeMap<String, Value>) -> ClientResult<()> {
        std::thread::sleep(self.delay);
        self.inner.set(entries)
    }

    fn remove(&self, keys: &[&str]) -> ClientResult<()> {
        self.inner.remove(keys)
    }

    fn remove_matching(&self, predicate: &dyn Fn(&str) -> bool) -> ClientResult<usize> {
        self.inner.remove_matching(predicate)
    }

    fn keys(&self) -> ClientResult<Vec<String>> {
        self.inner.keys()
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.inner.subscribe()
    }
}
