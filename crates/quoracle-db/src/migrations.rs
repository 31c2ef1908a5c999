//! Forward-only schema migrations keyed on `PRAGMA user_version`.
//!
//! Step `n` in [`MIGRATIONS`] upgrades a database from version `n` to `n + 1`.
//! Each step runs in its own transaction together with the version bump, so
//! an interrupted upgrade leaves the database at the last completed version.

use rusqlite::Connection;

use crate::{schema, DbError, Result, SCHEMA_VERSION};

/// Ordered upgrade scripts. `MIGRATIONS[0]` creates the v1 schema.
const MIGRATIONS: &[&str] = &[schema::SCHEMA_V1];

/// Version recorded in `user_version`.
pub fn current_version(conn: &Connection) -> Result<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Bring the database up to [`SCHEMA_VERSION`].
///
/// # Errors
///
/// - [`DbError::Migration`] if the database was written by a newer build
pub fn run(conn: &mut Connection) -> Result<()> {
    let from = current_version(conn)?;
    if from > SCHEMA_VERSION {
        return Err(DbError::Migration(format!(
            "database is at v{from}, this build supports up to v{SCHEMA_VERSION}"
        )));
    }

    for (index, script) in MIGRATIONS.iter().enumerate().skip(from as usize) {
        let to = index as u32 + 1;
        tracing::info!(from = to - 1, to, "migrating oracle database");
        let tx = conn.transaction()?;
        tx.execute_batch(script)?;
        tx.pragma_update(None, "user_version", to)?;
        tx.commit()?;
    }
    Ok(())
}
