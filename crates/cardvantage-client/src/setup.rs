use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params};

use crate::migrations::{EXPECTED_USER_VERSION, REQUIRED_META_KEYS, run_pending};
use crate::state::{
    ensure_profile_directory, map_sqlite_error, open_connection, profile_db_path,
    resolve_profile_home,
};
use crate::store::{CARDS_KEY, INITIALIZED_KEY, now_timestamp};
use crate::{ClientError, ClientResult};

const KV_ENTRIES_COLUMNS: [&str; 3] = ["key", "value", "updated_at"];
const INTERNAL_META_COLUMNS: [&str; 2] = ["key", "value"];

const REQUIRED_CORE_TABLES: [(&str, &[&str]); 2] = [
    ("kv_entries", &KV_ENTRIES_COLUMNS),
    ("internal_meta", &INTERNAL_META_COLUMNS),
];

/// Seeded with insert-or-ignore so an existing profile keeps its values.
const SEED_ENTRIES: [(&str, &str); 2] = [(INITIALIZED_KEY, "true"), (CARDS_KEY, "[]")];

#[derive(Debug, Clone)]
pub struct SetupContext {
    pub profile_home: PathBuf,
    pub db_path: PathBuf,
    pub schema_version: String,
}

pub fn ensure_initialized() -> ClientResult<SetupContext> {
    ensure_initialized_with_home_override(None)
}

pub fn ensure_initialized_at(home_override: &Path) -> ClientResult<SetupContext> {
    ensure_initialized_with_home_override(Some(home_override))
}

pub(crate) fn ensure_initialized_with_home_override(
    home_override: Option<&Path>,
) -> ClientResult<SetupContext> {
    let profile_home = resolve_profile_home(home_override)?;
    ensure_profile_directory(&profile_home)?;

    let db_path = profile_db_path(&profile_home);
    let mut connection = open_connection(&db_path)?;

    run_pending(&mut connection).map_err(|error| map_migration_error(&db_path, &error))?;

    verify_core_tables(&connection, &db_path)?;
    seed_entries(&connection, &db_path)?;
    verify_meta(&connection, &db_path)?;

    let schema_version = read_schema_version(&connection, &db_path)?;

    Ok(SetupContext {
        profile_home,
        db_path,
        schema_version,
    })
}

fn map_migration_error(db_path: &Path, error: &rusqlite_migration::Error) -> ClientError {
    match error {
        rusqlite_migration::Error::RusqliteError { query: _, err } => {
            let mapped = map_sqlite_error(db_path, err);
            if mapped.code == "profile_locked"
                || mapped.code == "profile_corrupt"
                || mapped.code == "profile_init_permission_denied"
            {
                mapped
            } else {
                ClientError::migration_failed(db_path, &error.to_string())
            }
        }
        _ => ClientError::migration_failed(db_path, &error.to_string()),
    }
}

fn verify_core_tables(connection: &Connection, db_path: &Path) -> ClientResult<()> {
    for (table_name, required_columns) in REQUIRED_CORE_TABLES {
        if !table_exists(connection, table_name, db_path)? {
            return Err(ClientError::profile_corrupt(db_path));
        }

        let columns = table_columns(connection, table_name, db_path)?;
        for required_column in required_columns {
            if !columns.iter().any(|column| column == required_column) {
                return Err(ClientError::profile_corrupt(db_path));
            }
        }
    }

    Ok(())
}

fn seed_entries(connection: &Connection, db_path: &Path) -> ClientResult<()> {
    let timestamp = now_timestamp();
    for (key, value) in SEED_ENTRIES {
        connection
            .execute(
                "INSERT OR IGNORE INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![key, value, &timestamp],
            )
            .map_err(|error| map_sqlite_error(db_path, &error))?;
    }
    Ok(())
}

fn verify_meta(connection: &Connection, db_path: &Path) -> ClientResult<()> {
    let user_version = connection
        .query_row("PRAGMA user_version", [], |row| row.get::<_, i64>(0))
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    if user_version != EXPECTED_USER_VERSION {
        return Err(ClientError::profile_corrupt(db_path));
    }

    for (meta_key, expected_value) in REQUIRED_META_KEYS {
        let value = connection
            .query_row(
                "SELECT value FROM internal_meta WHERE key = ?1 LIMIT 1",
                [meta_key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|error| map_sqlite_error(db_path, &error))?;

        match value {
            Some(actual) if actual == expected_value => {}
            _ => return Err(ClientError::profile_corrupt(db_path)),
        }
    }

    Ok(())
}

fn table_exists(connection: &Connection, table_name: &str, db_path: &Path) -> ClientResult<bool> {
    let exists = connection
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 LIMIT 1",
            [table_name],
            |_row| Ok(true),
        )
        .optional()
        .map_err(|error| map_sqlite_error(db_path, &error))?
        .unwrap_or(false);

    Ok(exists)
}

fn table_columns(
    connection: &Connection,
    table_name: &str,
    db_path: &Path,
) -> ClientResult<Vec<String>> {
    if !is_required_core_table(table_name) {
        return Err(ClientError::profile_init_failed(
            db_path,
            "Refused PRAGMA table inspection for non-core table.",
        ));
    }

    // SAFETY: `table_name` is restricted to the compile-time allowlist from
    // REQUIRED_CORE_TABLES above and never originates from user input.
    let sql = format!("PRAGMA table_info({table_name})");
    let mut statement = connection
        .prepare(&sql)
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let column_iter = statement
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut columns: Vec<String> = Vec::new();
    for row in column_iter {
        let column = row.map_err(|error| map_sqlite_error(db_path, &error))?;
        columns.push(column);
    }

    Ok(columns)
}

fn is_required_core_table(table_name: &str) -> bool {
    REQUIRED_CORE_TABLES
        .iter()
        .any(|(required_name, _)| required_name == &table_name)
}

fn read_schema_version(connection: &Connection, db_path: &Path) -> ClientResult<String> {
    let value = connection
        .query_row(
            "SELECT value FROM internal_meta WHERE key = 'schema_version' LIMIT 1",
            [],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    Ok(value.unwrap_or_else(|| "v1".to_string()))
}
