//! Registered assets and ordered asset pairs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Address;

/// Registration record for one asset.
///
/// Set once at construction of the oracle and immutable thereafter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    /// Local identifier of the asset.
    pub address: Address,
    /// Denomination name used by the upstream price feed (e.g. "btc").
    pub oracle_denom: String,
    /// Number of decimal places of the asset's atomic unit.
    pub precision: u32,
}

impl AssetInfo {
    pub fn new(address: Address, oracle_denom: impl Into<String>, precision: u32) -> Self {
        Self {
            address,
            oracle_denom: oracle_denom.into(),
            precision,
        }
    }
}

/// An ordered `(base, quote)` pair identifying an exchange-rate direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetPair {
    pub base: Address,
    pub quote: Address,
}

impl AssetPair {
    pub fn new(base: Address, quote: Address) -> Self {
        Self { base, quote }
    }

    /// The same pair in the opposite direction.
    pub fn inverse(&self) -> Self {
        Self {
            base: self.quote,
            quote: self.base,
        }
    }
}

impl fmt::Display for AssetPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}
