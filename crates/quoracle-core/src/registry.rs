//! Immutable asset registry.
//!
//! Populated once when the oracle is constructed. There is no way to add,
//! change or remove an entry afterwards.

use std::collections::BTreeMap;

use quoracle_types::{Address, AssetInfo, AssetPair};

use crate::config::ConfigError;
use crate::math::MAX_DECIMALS;
use crate::{OracleError, Result};

/// Mapping from local asset identifier to its registration record.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    assets: BTreeMap<Address, AssetInfo>,
}

impl AssetRegistry {
    /// Build a registry from the construction-time asset list.
    ///
    /// # Errors
    ///
    /// - [`OracleError::Config`] if an address appears twice or a precision
    ///   cannot be represented
    pub fn new(infos: impl IntoIterator<Item = AssetInfo>) -> Result<Self> {
        let mut assets = BTreeMap::new();
        for info in infos {
            if info.precision > MAX_DECIMALS {
                return Err(ConfigError::Invalid(format!(
                    "asset {} precision {} exceeds {MAX_DECIMALS}",
                    info.address, info.precision
                ))
                .into());
            }
            if assets.contains_key(&info.address) {
                return Err(ConfigError::Invalid(format!(
                    "asset {} registered twice",
                    info.address
                ))
                .into());
            }
            assets.insert(info.address, info);
        }
        Ok(Self { assets })
    }

    /// Look up an asset's registration.
    pub fn get(&self, address: &Address) -> Option<&AssetInfo> {
        self.assets.get(address)
    }

    /// Upstream denomination name of an asset.
    pub fn oracle_denom(&self, address: &Address) -> Option<&str> {
        self.get(address).map(|info| info.oracle_denom.as_str())
    }

    /// Decimal precision of an asset.
    pub fn precision(&self, address: &Address) -> Option<u32> {
        self.get(address).map(|info| info.precision)
    }

    /// Resolve both sides of a pair, base first.
    ///
    /// # Errors
    ///
    /// - [`OracleError::BaseNotRegistered`] if the base is unknown
    /// - [`OracleError::QuoteNotRegistered`] if the quote is unknown
    pub fn resolve(&self, pair: &AssetPair) -> Result<(&AssetInfo, &AssetInfo)> {
        let base = self
            .get(&pair.base)
            .ok_or(OracleError::BaseNotRegistered(pair.base))?;
        let quote = self
            .get(&pair.quote)
            .ok_or(OracleError::QuoteNotRegistered(pair.quote))?;
        Ok((base, quote))
    }

    /// All registered assets, ordered by address.
    pub fn iter(&self) -> impl Iterator<Item = &AssetInfo> {
        self.assets.values()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
