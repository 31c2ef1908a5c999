//! Administration state and construction parameters.

use rusqlite::{Connection, OptionalExtension};

use quoracle_core::access::AccessControl;
use quoracle_core::config::OracleParams;

use super::{address_from_blob, from_sql_int, to_sql_int, u128_from_text};
use crate::{DbError, Result};

/// Write the construction-time row. Fails if one already exists.
pub fn insert(conn: &Connection, params: &OracleParams, access: &AccessControl) -> Result<()> {
    conn.execute(
        "INSERT INTO oracle_admin (id, owner, initialized, expiration_offset_sec, bound_threshold_percent, scale_factor)
         VALUES (1, ?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            access.owner().as_bytes().as_slice(),
            access.initialized(),
            to_sql_int(params.expiration_offset_sec)?,
            params.bound_threshold_percent,
            params.scale_factor.to_string(),
        ],
    )?;
    Ok(())
}

/// Whether the construction-time row exists.
pub fn exists(conn: &Connection) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM oracle_admin WHERE id = 1", [], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

/// Persisted construction parameters.
pub fn load_params(conn: &Connection) -> Result<OracleParams> {
    let (offset, threshold, scale) = conn
        .query_row(
            "SELECT expiration_offset_sec, bound_threshold_percent, scale_factor FROM oracle_admin WHERE id = 1",
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )
        .optional()?
        .ok_or_else(|| DbError::NotFound("oracle_admin".to_string()))?;

    Ok(OracleParams {
        expiration_offset_sec: from_sql_int(offset)?,
        bound_threshold_percent: threshold,
        scale_factor: u128_from_text(&scale)?,
    })
}

/// Persisted owner and initialization latch.
pub fn load_access(conn: &Connection) -> Result<AccessControl> {
    let (owner, initialized) = conn
        .query_row(
            "SELECT owner, initialized FROM oracle_admin WHERE id = 1",
            [],
            |row| Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, bool>(1)?)),
        )
        .optional()?
        .ok_or_else(|| DbError::NotFound("oracle_admin".to_string()))?;
    Ok(AccessControl::restore(address_from_blob(owner)?, initialized))
}

/// Persist owner and initialization latch.
pub fn save_access(conn: &Connection, access: &AccessControl) -> Result<()> {
    let updated = conn.execute(
        "UPDATE oracle_admin SET owner = ?1, initialized = ?2 WHERE id = 1",
        rusqlite::params![access.owner().as_bytes().as_slice(), access.initialized()],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound("oracle_admin".to_string()));
    }
    Ok(())
}
