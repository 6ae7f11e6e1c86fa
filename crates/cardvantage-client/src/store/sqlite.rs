use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::warn;

use super::{KeyValueStore, StoreChange, change_channel, notify, now_timestamp};
use crate::setup::ensure_initialized_with_home_override;
use crate::state::{map_sqlite_error, open_connection};
use crate::{ClientError, ClientResult};

/// Key-value store persisted in the profile's `kv_entries` table.
///
/// Values are stored as JSON text. A row whose text no longer parses is
/// reported as absent.
pub struct SqliteStore {
    connection: Mutex<Connection>,
    db_path: PathBuf,
    changes: broadcast::Sender<StoreChange>,
}

impl SqliteStore {
    /// Initializes (or upgrades) the profile and opens its store.
    pub fn open_profile(home_override: Option<&Path>) -> ClientResult<Self> {
        let setup = ensure_initialized_with_home_override(home_override)?;
        Self::open(&setup.db_path)
    }

    /// Opens an already initialized profile database.
    pub fn open(db_path: &Path) -> ClientResult<Self> {
        let connection = open_connection(db_path)?;
        Ok(Self {
            connection: Mutex::new(connection),
            db_path: db_path.to_path_buf(),
            changes: change_channel(),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.connection.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, keys: &[&str]) -> ClientResult<BTreeMap<String, Value>> {
        let connection = self.lock();
        let mut values = BTreeMap::new();
        for key in keys {
            let raw = connection
                .query_row(
                    "SELECT value FROM kv_entries WHERE key = ?1 LIMIT 1",
                    [key],
                    |row| row.get::<_, String>(0),
                )
                .optional()
                .map_err(|error| map_sqlite_error(&self.db_path, &error))?;

            let Some(text) = raw else {
                continue;
            };
            match serde_json::from_str::<Value>(&text) {
                Ok(value) => {
                    values.insert((*key).to_string(), value);
                }
                Err(error) => {
                    warn!(key = %key, error = %error, "ignoring unparsable stored value");
                }
            }
        }
        Ok(values)
    }

    fn set(&self, entries: BTreeMap<String, Value>) -> ClientResult<()> {
        let timestamp = now_timestamp();
        let keys: Vec<String> = entries.keys().cloned().collect();
        {
            let mut connection = self.lock();
            let transaction = connection
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
            for (key, value) in &entries {
                let text = serde_json::to_string(value)
                    .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;
                transaction
                    .execute(
                        "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
                         ON CONFLICT(key) DO UPDATE SET
                            value = excluded.value,
                            updated_at = excluded.updated_at",
                        params![key, &text, &timestamp],
                    )
                    .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
            }
            transaction
                .commit()
                .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
        }
        notify(&self.changes, keys);
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> ClientResult<()> {
        let mut removed = Vec::new();
        {
            let mut connection = self.lock();
            let transaction = connection
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
            for key in keys {
                let deleted = transaction
                    .execute("DELETE FROM kv_entries WHERE key = ?1", [key])
                    .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
                if deleted > 0 {
                    removed.push((*key).to_string());
                }
            }
            transaction
                .commit()
                .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
        }
        notify(&self.changes, removed);
        Ok(())
    }

    fn remove_matching(&self, predicate: &dyn Fn(&str) -> bool) -> ClientResult<usize> {
        let mut removed = Vec::new();
        {
            let mut connection = self.lock();
            let transaction = connection
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
            let candidates = select_keys(&transaction, &self.db_path)?;
            for key in candidates.into_iter().filter(|key| predicate(key)) {
                transaction
                    .execute("DELETE FROM kv_entries WHERE key = ?1", [&key])
                    .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
                removed.push(key);
            }
            transaction
                .commit()
                .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
        }
        let count = removed.len();
        notify(&self.changes, removed);
        Ok(count)
    }

    fn keys(&self) -> ClientResult<Vec<String>> {
        let connection = self.lock();
        select_keys(&connection, &self.db_path)
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}

fn select_keys(connection: &Connection, db_path: &Path) -> ClientResult<Vec<String>> {
    let mut statement = connection
        .prepare("SELECT key FROM kv_entries ORDER BY key ASC")
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    let rows = statement
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut keys = Vec::new();
    for row in rows {
        keys.push(row.map_err(|error| map_sqlite_error(db_path, &error))?);
    }
    Ok(keys)
}
