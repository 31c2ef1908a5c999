//! Asset registry query functions.

use rusqlite::Connection;

use quoracle_types::AssetInfo;

use super::address_from_blob;
use crate::Result;

/// Insert the construction-time asset list.
///
/// Does not open a transaction of its own; callers seeding a database run it
/// inside the same transaction as the admin row.
pub fn insert_all(conn: &Connection, assets: &[AssetInfo]) -> Result<()> {
    let mut stmt =
        conn.prepare("INSERT INTO assets (address, oracle_denom, precision) VALUES (?1, ?2, ?3)")?;
    for asset in assets {
        stmt.execute(rusqlite::params![
            asset.address.as_bytes().as_slice(),
            asset.oracle_denom,
            asset.precision,
        ])?;
    }
    Ok(())
}

/// All registered assets, ordered by address.
pub fn list(conn: &Connection) -> Result<Vec<AssetInfo>> {
    let mut stmt =
        conn.prepare("SELECT address, oracle_denom, precision FROM assets ORDER BY address")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, Vec<u8>>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, u32>(2)?,
        ))
    })?;

    let mut assets = Vec::new();
    for row in rows {
        let (address, oracle_denom, precision) = row?;
        assets.push(AssetInfo {
            address: address_from_blob(address)?,
            oracle_denom,
            precision,
        });
    }
    Ok(assets)
}
