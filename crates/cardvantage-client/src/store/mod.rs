//! Local key-value storage consumed by the recommendation core.
//!
//! The core only relies on the operations of [`KeyValueStore`]; there are no
//! transactional guarantees across keys, so readers treat a missing key as an
//! empty value rather than an error.

mod memory;
mod sqlite;

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::ClientResult;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub const CARDS_KEY: &str = "cards";
pub const INITIALIZED_KEY: &str = "initialized";

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Keys touched by one completed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    pub keys: Vec<String>,
}

impl StoreChange {
    pub fn touches(&self, key: &str) -> bool {
        self.keys.iter().any(|changed| changed == key)
    }
}

pub trait KeyValueStore: Send + Sync {
    /// Returns the stored values for the requested keys. Absent keys are
    /// simply missing from the map.
    fn get(&self, keys: &[&str]) -> ClientResult<BTreeMap<String, Value>>;

    fn set(&self, entries: BTreeMap<String, Value>) -> ClientResult<()>;

    fn remove(&self, keys: &[&str]) -> ClientResult<()>;

    /// Removes every key accepted by `predicate` and returns how many were removed.
    fn remove_matching(&self, predicate: &dyn Fn(&str) -> bool) -> ClientResult<usize>;

    fn keys(&self) -> ClientResult<Vec<String>>;

    fn subscribe(&self) -> broadcast::Receiver<StoreChange>;
}

pub fn get_one(store: &dyn KeyValueStore, key: &str) -> ClientResult<Option<Value>> {
    let mut values = store.get(&[key])?;
    Ok(values.remove(key))
}

pub fn set_one(store: &dyn KeyValueStore, key: &str, value: Value) -> ClientResult<()> {
    let mut entries = BTreeMap::new();
    entries.insert(key.to_string(), value);
    store.set(entries)
}

pub(crate) fn change_channel() -> broadcast::Sender<StoreChange> {
    let (sender, _receiver) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
    sender
}

pub(crate) fn notify(changes: &broadcast::Sender<StoreChange>, keys: Vec<String>) {
    if keys.is_empty() {
        return;
    }
    // No receivers is the common case outside a session.
    let _ = changes.send(StoreChange { keys });
}

pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
