//! Query functions grouped by table.

pub mod admin;
pub mod assets;
pub mod prices;

use quoracle_types::Address;

use crate::{DbError, Result};

/// Decode a 20-byte address column.
pub(crate) fn address_from_blob(bytes: Vec<u8>) -> Result<Address> {
    let raw: [u8; 20] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| DbError::Serialization(format!("address of {} bytes", b.len())))?;
    Ok(Address::new(raw))
}

/// Store a `u64` in an INTEGER column.
pub(crate) fn to_sql_int(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|e| DbError::Serialization(format!("{value}: {e}")))
}

/// Read a `u64` back from an INTEGER column.
pub(crate) fn from_sql_int(value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|e| DbError::Serialization(format!("{value}: {e}")))
}

/// Read a `u128` back from a TEXT column.
pub(crate) fn u128_from_text(text: &str) -> Result<u128> {
    text.parse()
        .map_err(|e: std::num::ParseIntError| DbError::Serialization(format!("{text}: {e}")))
}
