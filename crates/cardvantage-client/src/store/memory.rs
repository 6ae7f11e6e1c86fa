use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tokio::sync::broadcast;

use super::{KeyValueStore, StoreChange, change_channel, notify};
use crate::ClientResult;

/// Process-local store used for ephemeral sessions and tests.
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Value>>,
    changes: broadcast::Sender<StoreChange>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            changes: change_channel(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Value>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, keys: &[&str]) -> ClientResult<BTreeMap<String, Value>> {
        let entries = self.lock();
        Ok(keys
            .iter()
            .filter_map(|key| {
                entries
                    .get(*key)
                    .map(|value| ((*key).to_string(), value.clone()))
            })
            .collect())
    }

    fn set(&self, entries: BTreeMap<String, Value>) -> ClientResult<()> {
        let keys: Vec<String> = entries.keys().cloned().collect();
        self.lock().extend(entries);
        notify(&self.changes, keys);
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> ClientResult<()> {
        let mut removed = Vec::new();
        {
            let mut entries = self.lock();
            for key in keys {
                if entries.remove(*key).is_some() {
                    removed.push((*key).to_string());
                }
            }
        }
        notify(&self.changes, removed);
        Ok(())
    }

    fn remove_matching(&self, predicate: &dyn Fn(&str) -> bool) -> ClientResult<usize> {
        let mut removed = Vec::new();
        {
            let mut entries = self.lock();
            entries.retain(|key, _| {
                if predicate(key) {
                    removed.push(key.clone());
                    false
                } else {
                    true
                }
            });
        }
        let count = removed.len();
        notify(&self.changes, removed);
        Ok(count)
    }

    fn keys(&self) -> ClientResult<Vec<String>> {
        Ok(self.lock().keys().cloned().collect())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}
