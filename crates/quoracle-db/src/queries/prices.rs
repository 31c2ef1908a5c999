//! Price cache query functions.

use rusqlite::{Connection, OptionalExtension};

use quoracle_types::{AssetPair, PriceCacheEntry};

use super::{from_sql_int, to_sql_int, u128_from_text};
use crate::Result;

/// Entry stored under exactly `pair`.
pub fn get(conn: &Connection, pair: &AssetPair) -> Result<Option<PriceCacheEntry>> {
    let row = conn
        .query_row(
            "SELECT price, expiration FROM price_cache WHERE base = ?1 AND quote = ?2",
            rusqlite::params![
                pair.base.as_bytes().as_slice(),
                pair.quote.as_bytes().as_slice()
            ],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
        )
        .optional()?;

    match row {
        Some((price, expiration)) => Ok(Some(PriceCacheEntry::new(
            u128_from_text(&price)?,
            from_sql_int(expiration)?,
        ))),
        None => Ok(None),
    }
}

/// Insert or replace the entry for `pair`.
pub fn upsert(conn: &Connection, pair: &AssetPair, entry: &PriceCacheEntry) -> Result<()> {
    conn.execute(
        "INSERT INTO price_cache (base, quote, price, expiration) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (base, quote) DO UPDATE SET price = excluded.price, expiration = excluded.expiration",
        rusqlite::params![
            pair.base.as_bytes().as_slice(),
            pair.quote.as_bytes().as_slice(),
            entry.price.to_string(),
            to_sql_int(entry.expiration)?,
        ],
    )?;
    Ok(())
}

/// Number of stored entries.
pub fn count(conn: &Connection) -> Result<u64> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM price_cache", [], |row| row.get(0))?;
    from_sql_int(n)
}
