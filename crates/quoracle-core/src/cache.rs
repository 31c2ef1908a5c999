//! Price cache with TTL expiry and derived inverse quotes.
//!
//! Each submitted direction is stored under its own key. A direction with no
//! entry of its own is answered by inverting the opposite entry at read time.
//! Entries are never removed; they simply stop being readable once their
//! expiration has passed.

use std::collections::HashMap;

use quoracle_types::{AssetPair, PriceCacheEntry, PriceResponse};

use crate::normalize::invert;
use crate::{OracleError, Result};

/// Key-value storage behind the price cache.
///
/// Implementations must make `put` all-or-nothing.
pub trait PriceStore {
    /// Entry stored under exactly `pair`, if any.
    fn get(&self, pair: &AssetPair) -> Result<Option<PriceCacheEntry>>;

    /// Store `entry` under `pair`, replacing any previous entry.
    fn put(&mut self, pair: AssetPair, entry: PriceCacheEntry) -> Result<()>;

    /// Whether an entry is stored under exactly `pair`.
    fn contains(&self, pair: &AssetPair) -> Result<bool> {
        Ok(self.get(pair)?.is_some())
    }
}

/// In-process [`PriceStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryPriceStore {
    entries: HashMap<AssetPair, PriceCacheEntry>,
}

impl MemoryPriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PriceStore for MemoryPriceStore {
    fn get(&self, pair: &AssetPair) -> Result<Option<PriceCacheEntry>> {
        Ok(self.entries.get(pair).copied())
    }

    fn put(&mut self, pair: AssetPair, entry: PriceCacheEntry) -> Result<()> {
        self.entries.insert(pair, entry);
        Ok(())
    }
}

/// Most recent accepted price per ordered pair.
#[derive(Debug)]
pub struct PriceCache<S> {
    store: S,
    scale_factor: u128,
}

impl<S: PriceStore> PriceCache<S> {
    pub fn new(store: S, scale_factor: u128) -> Self {
        Self {
            store,
            scale_factor,
        }
    }

    /// Stored entry for exactly `pair`, ignoring expiry.
    pub fn entry(&self, pair: &AssetPair) -> Result<Option<PriceCacheEntry>> {
        Ok(self.store.get(pair)?.filter(|e| e.exists))
    }

    /// Replace the entry for `pair`.
    pub fn insert(&mut self, pair: AssetPair, price: u128, expiration: u64) -> Result<PriceCacheEntry> {
        let entry = PriceCacheEntry::new(price, expiration);
        self.store.put(pair, entry)?;
        Ok(entry)
    }

    /// Price for `pair` at `now_ms`.
    ///
    /// The forward entry wins when present; an expired forward entry is an
    /// error even if the reverse entry is still valid. Otherwise the reverse
    /// entry is inverted.
    ///
    /// # Errors
    ///
    /// - [`OracleError::PriceExpired`] if the entry used has expired
    /// - [`OracleError::PriceNotFound`] if neither direction is stored
    pub fn lookup(&self, pair: &AssetPair, now_ms: u64) -> Result<PriceResponse> {
        if let Some(entry) = self.entry(pair)? {
            ensure_fresh(&entry, now_ms)?;
            return Ok(PriceResponse {
                price: entry.price,
                is_inverse: false,
            });
        }

        match self.entry(&pair.inverse())? {
            Some(entry) => {
                ensure_fresh(&entry, now_ms)?;
                Ok(PriceResponse {
                    price: invert(entry.price, self.scale_factor)?,
                    is_inverse: true,
                })
            }
            None => Err(OracleError::PriceNotFound),
        }
    }

    pub fn scale_factor(&self) -> u128 {
        self.scale_factor
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

fn ensure_fresh(entry: &PriceCacheEntry, now_ms: u64) -> Result<()> {
    if entry.is_expired(now_ms) {
        return Err(OracleError::PriceExpired {
            expiration: entry.expiration,
            now: now_ms,
        });
    }
    Ok(())
}
