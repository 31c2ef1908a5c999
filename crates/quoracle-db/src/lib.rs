//! # quoracle-db
//!
//! SQLite persistence for the price oracle: construction parameters, the
//! owner and initialization latch, the asset registry and the price cache.
//!
//! Storage conventions:
//!
//! - write-ahead logging, foreign keys enforced
//! - addresses as 20-byte BLOBs
//! - prices and the scale factor as decimal TEXT, since they exceed `i64`
//! - timestamps as INTEGER Unix milliseconds
//! - schema version in `PRAGMA user_version` (see [`migrations`])

pub mod migrations;
pub mod queries;
pub mod schema;
pub mod store;

use std::path::Path;

use rusqlite::Connection;

pub use store::SqlitePriceStore;

/// Schema version this build writes.
pub const SCHEMA_VERSION: u32 = 1;

/// Database file name inside the data directory.
pub const DB_FILE: &str = "quoracle.db";

const PRAGMAS: &str = "PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;
PRAGMA synchronous = NORMAL;";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    /// A row the oracle relies on is missing.
    #[error("not found: {0}")]
    NotFound(String),

    /// A stored value does not decode into its domain type.
    #[error("corrupt column value: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

impl From<DbError> for quoracle_core::OracleError {
    fn from(e: DbError) -> Self {
        quoracle_core::OracleError::Storage(e.to_string())
    }
}

/// Open (creating if needed) the database file at `path` and migrate it.
pub fn open(path: &Path) -> Result<Connection> {
    prepare(Connection::open(path)?)
}

/// Private in-memory database, migrated. Used by tests and dry runs.
pub fn open_memory() -> Result<Connection> {
    prepare(Connection::open_in_memory()?)
}

fn prepare(mut conn: Connection) -> Result<Connection> {
    conn.execute_batch(PRAGMAS)?;
    migrations::run(&mut conn)?;
    Ok(conn)
}
