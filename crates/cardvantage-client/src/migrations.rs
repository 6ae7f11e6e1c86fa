use rusqlite::Connection;
use rusqlite_migration::{M, Migrations};

const BOOTSTRAP_SQL: &str = include_str!("migrations/0001_bootstrap.sql");

pub const EXPECTED_USER_VERSION: i64 = 1;

pub const REQUIRED_META_KEYS: [(&str, &str); 1] = [("schema_version", "v1")];

pub fn run_pending(conn: &mut Connection) -> rusqlite_migration::Result<()> {
    migrations().to_latest(conn)
}

fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(BOOTSTRAP_SQL)])
}
