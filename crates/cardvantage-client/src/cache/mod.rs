//! Recommendation cache keyed by fingerprint.
//!
//! Entries live in the shared key-value store next to unrelated state; they
//! are told apart by the fingerprint separator in their key. There is no
//! expiry: entries are only dropped by [`RecommendationCache::invalidate_all`],
//! which the card registry calls on every add or delete.

mod single_flight;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tracing::{debug, warn};

use crate::contracts::types::{CacheEntry, CachedRecommendation, RecommendationResult};
use crate::error::ClassifierError;
use crate::fingerprint::{is_fingerprint_key, split_fingerprint};
use crate::store::{KeyValueStore, get_one, now_timestamp, set_one};
use crate::{ClientError, ClientResult};

pub use single_flight::{FlightRole, SingleFlight};

pub type FetchOutcome = Result<RecommendationResult, ClassifierError>;

pub struct RecommendationCache {
    store: Arc<dyn KeyValueStore>,
    epoch: AtomicU64,
    in_flight: SingleFlight<FetchOutcome>,
}

impl RecommendationCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            epoch: AtomicU64::new(0),
            in_flight: SingleFlight::new(),
        }
    }

    /// Absence, including an unreadable entry, is a normal miss.
    pub fn get(&self, fingerprint: &str) -> Option<RecommendationResult> {
        let stored = match get_one(self.store.as_ref(), fingerprint) {
            Ok(value) => value?,
            Err(error) => {
                warn!(code = %error.code, error = %error, "cache read failed; treating as a miss");
                return None;
            }
        };

        match serde_json::from_value::<CacheEntry>(stored) {
            Ok(entry) => Some(entry.value),
            Err(error) => {
                warn!(error = %error, "ignoring malformed cache entry");
                None
            }
        }
    }

    /// Overwrites any existing entry for `fingerprint`.
    pub fn put(&self, fingerprint: &str, result: &RecommendationResult) -> ClientResult<()> {
        let entry = CacheEntry {
            key: fingerprint.to_string(),
            value: result.clone(),
            stored_at: now_timestamp(),
        };
        let value = serde_json::to_value(&entry)
            .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
        set_one(self.store.as_ref(), fingerprint, value)
    }

    /// Writes only if no invalidation happened since `epoch` was read.
    pub(crate) fn put_if_current(
        &self,
        fingerprint: &str,
        result: &RecommendationResult,
        epoch: u64,
    ) -> ClientResult<bool> {
        if self.epoch() != epoch {
            debug!(fingerprint = %fingerprint, "card set changed during fetch; not caching");
            return Ok(false);
        }
        self.put(fingerprint, result)?;
        Ok(true)
    }

    /// Removes every fingerprint-shaped entry and starts a new epoch.
    pub fn invalidate_all(&self) -> ClientResult<usize> {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let removed = self.store.remove_matching(&is_fingerprint_key)?;
        debug!(removed, "invalidated cached recommendations");
        Ok(removed)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    pub(crate) fn in_flight(&self) -> &SingleFlight<FetchOutcome> {
        &self.in_flight
    }

    /// Lists readable cache entries ordered by fingerprint.
    pub fn entries(&self) -> ClientResult<Vec<CachedRecommendation>> {
        let keys: Vec<String> = self
            .store
            .keys()?
            .into_iter()
            .filter(|key| is_fingerprint_key(key))
            .collect();
        let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        let values = self.store.get(&key_refs)?;

        let mut entries = Vec::new();
        for (key, value) in values {
            let Some(entry) = parse_entry(value) else {
                continue;
            };
            let Some((domain, names)) = split_fingerprint(&key) else {
                continue;
            };
            entries.push(CachedRecommendation {
                domain: domain.to_string(),
                card_names: names.into_iter().map(str::to_string).collect(),
                fingerprint: key.clone(),
                stored_at: entry.stored_at,
                result: entry.value,
            });
        }
        Ok(entries)
    }
}

fn parse_entry(value: Value) -> Option<CacheEntry> {
    serde_json::from_value(value).ok()
}
