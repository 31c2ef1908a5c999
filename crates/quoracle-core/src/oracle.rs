//! The price oracle facade.
//!
//! [`PriceOracle`] wires the registry, proof validator, normalizer, cache,
//! bound checker and access control together. Every mutating call either
//! commits completely (and journals its notification) or fails with no
//! effect. Callers needing concurrent access must serialize calls, see
//! [`crate::sequencer`].

use quoracle_types::{
    Address, AssetInfo, AssetPair, OracleEvent, PriceCacheEntry, PriceResponse, PriceWithProof,
};

use crate::access::AccessControl;
use crate::bound::BoundChecker;
use crate::cache::{PriceCache, PriceStore};
use crate::config::{OracleConfig, OracleParams};
use crate::normalize::{convert_amount, normalize_price};
use crate::proof::ProofValidator;
use crate::registry::AssetRegistry;
use crate::Result;

/// Registry-backed price oracle over a [`PriceStore`].
#[derive(Debug)]
pub struct PriceOracle<S> {
    params: OracleParams,
    registry: AssetRegistry,
    validator: ProofValidator,
    cache: PriceCache<S>,
    bound: BoundChecker,
    access: AccessControl,
    events: Vec<OracleEvent>,
}

impl<S: PriceStore> PriceOracle<S> {
    /// Construct an oracle from a validated configuration. The configured
    /// owner becomes the deployer.
    pub fn new(config: &OracleConfig, store: S) -> Result<Self> {
        config.validate()?;
        Self::from_parts(
            config.params(),
            config.assets.iter().cloned(),
            AccessControl::new(config.owner),
            store,
        )
    }

    /// Construct an oracle from its parts, e.g. when reopening persisted state.
    pub fn from_parts(
        params: OracleParams,
        assets: impl IntoIterator<Item = AssetInfo>,
        access: AccessControl,
        store: S,
    ) -> Result<Self> {
        if params.scale_factor == 0 {
            return Err(crate::config::ConfigError::Invalid(
                "scale factor must be non-zero".into(),
            )
            .into());
        }
        Ok(Self {
            params,
            registry: AssetRegistry::new(assets)?,
            validator: ProofValidator::new(params.expiration_offset_sec)?,
            cache: PriceCache::new(store, params.scale_factor),
            bound: BoundChecker::new(params.bound_threshold_percent)?,
            access,
            events: Vec::new(),
        })
    }

    /// Set the one-shot initialization latch.
    pub fn initialize(&mut self, caller: Address) -> Result<()> {
        let event = self.access.initialize(caller)?;
        self.events.push(event);
        Ok(())
    }

    /// Owner-only ownership transfer.
    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<()> {
        let event = self.access.transfer_ownership(caller, new_owner)?;
        self.events.push(event);
        Ok(())
    }

    /// Accept a price update for `(base, quote)` at `now_ms`.
    ///
    /// Checks run in order: base registered, quote registered, proof
    /// freshness, strictly newer than the cached entry, non-zero price.
    /// Returns the stored entry.
    pub fn update_price(
        &mut self,
        base: Address,
        quote: Address,
        update: &PriceWithProof,
        now_ms: u64,
    ) -> Result<PriceCacheEntry> {
        let pair = AssetPair::new(base, quote);
        let (base_info, quote_info) = self.registry.resolve(&pair).inspect_err(|e| {
            tracing::debug!(pair = %pair, error = %e, "update rejected");
        })?;

        let last_created_at = self
            .cache
            .entry(&pair)?
            .map(|entry| self.validator.created_at_for(entry.expiration));
        if let Err(e) = self.validator.validate(&update.proof, last_created_at, now_ms) {
            tracing::warn!(
                pair = %pair,
                created_at = update.proof.creation_time_unix_ms,
                now = now_ms,
                error = %e,
                "update rejected"
            );
            return Err(e);
        }

        let price = normalize_price(update.price, base_info, quote_info)?;
        let expiration = self
            .validator
            .expiration_for(update.proof.creation_time_unix_ms)?;
        let entry = self.cache.insert(pair, price, expiration)?;

        tracing::info!(
            base = %base,
            quote = %quote,
            price,
            expiration,
            creation_height = update.proof.creation_height,
            revision = update.proof.revision,
            "price updated"
        );
        self.events.push(OracleEvent::PriceUpdated {
            base,
            quote,
            price,
            expiration,
        });
        Ok(entry)
    }

    /// Price for `(base, quote)` at `now_ms`, direct or derived from the
    /// opposite pair.
    pub fn get_price(&self, base: Address, quote: Address, now_ms: u64) -> Result<PriceResponse> {
        self.cache.lookup(&AssetPair::new(base, quote), now_ms)
    }

    /// Whether `price` is within the tolerance band around the current
    /// `(base, quote)` price. Out-of-band prices are errors, not `false`.
    pub fn price_in_bound(
        &self,
        base: Address,
        quote: Address,
        price: u128,
        now_ms: u64,
    ) -> Result<bool> {
        let oracle_price = self.get_price(base, quote, now_ms)?;
        self.bound.check(oracle_price.price, price)
    }

    /// Convert `amount` atomic units of `base` into atomic units of `quote`
    /// at the current price.
    pub fn quote_amount(
        &self,
        base: Address,
        quote: Address,
        amount: u128,
        now_ms: u64,
    ) -> Result<u128> {
        let pair = AssetPair::new(base, quote);
        let (base_info, quote_info) = self.registry.resolve(&pair)?;
        let response = self.cache.lookup(&pair, now_ms)?;
        convert_amount(
            amount,
            response,
            base_info.precision,
            quote_info.precision,
            self.params.scale_factor,
        )
    }

    /// Raw cache entry for exactly `(base, quote)`; `exists == false` when
    /// nothing was ever stored.
    pub fn prices_cache(&self, base: Address, quote: Address) -> Result<PriceCacheEntry> {
        Ok(self
            .cache
            .entry(&AssetPair::new(base, quote))?
            .unwrap_or_else(PriceCacheEntry::absent))
    }

    /// Take the notifications journaled since the last drain, in commit order.
    pub fn drain_events(&mut self) -> Vec<OracleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn expiration_offset_sec(&self) -> u64 {
        self.params.expiration_offset_sec
    }

    pub fn bound_threshold(&self) -> u32 {
        self.params.bound_threshold_percent
    }

    pub fn scale_factor(&self) -> u128 {
        self.params.scale_factor
    }

    pub fn params(&self) -> OracleParams {
        self.params
    }

    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    pub fn initialized(&self) -> bool {
        self.access.initialized()
    }

    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn asset_info(&self, address: &Address) -> Option<&AssetInfo> {
        self.registry.get(address)
    }

    pub fn oracle_denom(&self, address: &Address) -> Option<&str> {
        self.registry.oracle_denom(address)
    }

    pub fn precision(&self, address: &Address) -> Option<u32> {
        self.registry.precision(address)
    }

    pub fn store(&self) -> &S {
        self.cache.store()
    }

    pub fn store_mut(&mut self) -> &mut S {
        self.cache.store_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryPriceStore;
    use crate::OracleError;
    use quoracle_types::{PriceProof, SCALE_FACTOR};

    const OWNER: Address = Address::repeat(0x01);
    const OTHER: Address = Address::repeat(0x02);
    const BTC: Address = Address::repeat(0x12);
    const USDC: Address = Address::repeat(0x21);
    const USDT: Address = Address::repeat(0xf6);
    const UNREGISTERED: Address = Address::repeat(0x99);

    const HOUR_MS: u64 = 3_600_000;
    const NOW: u64 = 1_700_000_000_000;

    fn config() -> OracleConfig {
        OracleConfig {
            owner: OWNER,
            assets: vec![
                AssetInfo::new(BTC, "btc", 8),
                AssetInfo::new(USDC, "usdc", 18),
                AssetInfo::new(USDT, "usdt", 6),
            ],
            ..OracleConfig::default()
        }
    }

    fn oracle() -> PriceOracle<MemoryPriceStore> {
        PriceOracle::new(&config(), MemoryPriceStore::new()).expect("oracle")
    }

    fn update(price: u128, created_at: u64) -> PriceWithProof {
        PriceWithProof {
            price,
            proof: PriceProof {
                creation_height: 150,
                creation_time_unix_ms: created_at,
                height: 150,
                revision: 1,
                merkle_proof: vec![0x42],
            },
        }
    }

    #[test]
    fn test_deployment_state() {
        let o = oracle();
        assert_eq!(o.owner(), OWNER);
        assert!(!o.initialized());
        assert_eq!(o.expiration_offset_sec(), 3600);
        assert_eq!(o.bound_threshold(), 10);
        assert_eq!(o.scale_factor(), SCALE_FACTOR);
        assert_eq!(o.oracle_denom(&BTC), Some("btc"));
        assert_eq!(o.precision(&USDC), Some(18));
        assert!(o.asset_info(&UNREGISTERED).is_none());
    }

    #[test]
    fn test_update_and_read_both_directions() {
        let mut o = oracle();
        let entry = o
            .update_price(BTC, USDC, &update(50_000, NOW), NOW)
            .expect("update");
        assert_eq!(entry.expiration, NOW + HOUR_MS);

        let fwd = o.get_price(BTC, USDC, NOW).expect("forward");
        assert_eq!(fwd, PriceResponse { price: 50_000, is_inverse: false });

        let inv = o.get_price(USDC, BTC, NOW).expect("inverse");
        assert_eq!(inv.price, SCALE_FACTOR / 50_000);
        assert!(inv.is_inverse);

        assert!(!o.prices_cache(USDC, BTC).expect("raw").exists);
    }

    #[test]
    fn test_update_emits_price_updated() {
        let mut o = oracle();
        o.update_price(BTC, USDC, &update(50_000, NOW), NOW)
            .expect("update");
        assert_eq!(
            o.drain_events(),
            vec![OracleEvent::PriceUpdated {
                base: BTC,
                quote: USDC,
                price: 50_000,
                expiration: NOW + HOUR_MS,
            }]
        );
        assert!(o.drain_events().is_empty());
    }

    #[test]
    fn test_registration_errors() {
        let mut o = oracle();
        let err = o
            .update_price(UNREGISTERED, USDC, &update(1000, NOW), NOW)
            .expect_err("base");
        assert!(matches!(err, OracleError::BaseNotRegistered(_)));

        let err = o
            .update_price(BTC, UNREGISTERED, &update(1000, NOW), NOW)
            .expect_err("quote");
        assert!(matches!(err, OracleError::QuoteNotRegistered(_)));
    }

    #[test]
    fn test_registration_checked_before_freshness() {
        let mut o = oracle();
        let err = o
            .update_price(UNREGISTERED, USDC, &update(1000, NOW - 2 * HOUR_MS), NOW)
            .expect_err("unregistered and expired");
        assert!(matches!(err, OracleError::BaseNotRegistered(_)));
    }

    #[test]
    fn test_future_proof_cannot_lock_pair() {
        let mut o = oracle();
        let ten_years = 10 * 365 * 24 * HOUR_MS;
        let err = o
            .update_price(BTC, USDC, &update(1, NOW + ten_years), NOW)
            .expect_err("future proof");
        assert!(matches!(err, OracleError::ProofFromFuture { .. }));
        assert!(!o.prices_cache(BTC, USDC).expect("raw").exists);
        assert!(o.drain_events().is_empty());

        // An honest update for the same pair still goes through.
        o.update_price(BTC, USDC, &update(50_000, NOW), NOW)
            .expect("honest update");
        assert_eq!(o.get_price(BTC, USDC, NOW).expect("price").price, 50_000);
    }

    #[test]
    fn test_expired_proof_leaves_state_unchanged() {
        let mut o = oracle();
        let err = o
            .update_price(BTC, USDC, &update(1000, NOW - 2 * HOUR_MS), NOW)
            .expect_err("expired");
        assert!(matches!(err, OracleError::ProofExpired { .. }));
        assert!(!o.prices_cache(BTC, USDC).expect("raw").exists);
        assert!(o.drain_events().is_empty());
    }

    #[test]
    fn test_older_update_rejected() {
        let mut o = oracle();
        o.update_price(BTC, USDC, &update(1000, NOW), NOW)
            .expect("first");
        o.drain_events();

        let err = o
            .update_price(BTC, USDC, &update(2000, NOW - 60_000), NOW + 1)
            .expect_err("older");
        assert!(matches!(err, OracleError::StaleUpdate { .. }));

        let err = o
            .update_price(BTC, USDC, &update(2000, NOW), NOW + 1)
            .expect_err("same timestamp");
        assert!(matches!(err, OracleError::StaleUpdate { .. }));

        assert_eq!(o.get_price(BTC, USDC, NOW + 1).expect("price").price, 1000);
        assert!(o.drain_events().is_empty());
    }

    #[test]
    fn test_newer_update_replaces() {
        let mut o = oracle();
        o.update_price(BTC, USDC, &update(1000, NOW), NOW)
            .expect("first");
        o.update_price(BTC, USDC, &update(1100, NOW + 1), NOW + 1)
            .expect("newer");
        let entry = o.prices_cache(BTC, USDC).expect("raw");
        assert_eq!(entry, PriceCacheEntry::new(1100, NOW + 1 + HOUR_MS));
    }

    #[test]
    fn test_ordering_is_per_direction() {
        let mut o = oracle();
        o.update_price(BTC, USDC, &update(1000, NOW), NOW)
            .expect("forward");
        // The reverse direction has its own history.
        o.update_price(USDC, BTC, &update(5, NOW - 1), NOW)
            .expect("reverse");
        assert_eq!(o.get_price(USDC, BTC, NOW).expect("direct reverse").price, 5);
        assert!(!o.get_price(USDC, BTC, NOW).expect("direct reverse").is_inverse);
    }

    #[test]
    fn test_zero_price_rejected() {
        let mut o = oracle();
        let err = o
            .update_price(BTC, USDC, &update(0, NOW), NOW)
            .expect_err("zero");
        assert!(matches!(err, OracleError::InvalidPrice(_)));
        assert!(!o.prices_cache(BTC, USDC).expect("raw").exists);
    }

    #[test]
    fn test_expiry() {
        let mut o = oracle();
        o.update_price(BTC, USDC, &update(1000, NOW), NOW)
            .expect("update");
        assert!(o.get_price(BTC, USDC, NOW + HOUR_MS).is_ok());
        let err = o
            .get_price(BTC, USDC, NOW + HOUR_MS + 1)
            .expect_err("expired");
        assert!(matches!(err, OracleError::PriceExpired { .. }));
        // Expired entries are not removed.
        assert!(o.prices_cache(BTC, USDC).expect("raw").exists);
    }

    #[test]
    fn test_update_after_expiry_still_needs_newer_proof() {
        let mut o = oracle();
        o.update_price(BTC, USDC, &update(1000, NOW), NOW)
            .expect("update");
        let later = NOW + 2 * HOUR_MS;
        o.update_price(BTC, USDC, &update(1200, later), later)
            .expect("refresh");
        assert_eq!(o.get_price(BTC, USDC, later).expect("price").price, 1200);
    }

    #[test]
    fn test_price_in_bound() {
        let mut o = oracle();
        o.update_price(BTC, USDC, &update(50_000, NOW), NOW)
            .expect("update");
        assert!(o.price_in_bound(BTC, USDC, 50_000, NOW).expect("equal"));
        assert!(o.price_in_bound(BTC, USDC, 54_000, NOW).expect("inside"));

        let err = o
            .price_in_bound(BTC, USDC, 40_000, NOW)
            .expect_err("below");
        assert!(matches!(err, OracleError::BelowThreshold { .. }));
        assert_eq!(err.to_string(), "Price is below the acceptable threshold");

        let err = o
            .price_in_bound(BTC, USDC, 60_000, NOW)
            .expect_err("above");
        assert!(matches!(err, OracleError::AboveThreshold { .. }));
    }

    #[test]
    fn test_price_in_bound_propagates_lookup_errors() {
        let mut o = oracle();
        let err = o
            .price_in_bound(BTC, USDC, 1, NOW)
            .expect_err("missing");
        assert!(matches!(err, OracleError::PriceNotFound));

        o.update_price(BTC, USDC, &update(1000, NOW), NOW)
            .expect("update");
        let err = o
            .price_in_bound(BTC, USDC, 1000, NOW + HOUR_MS + 1)
            .expect_err("expired");
        assert!(matches!(err, OracleError::PriceExpired { .. }));
    }

    #[test]
    fn test_price_in_bound_on_inverse() {
        let mut o = oracle();
        o.update_price(BTC, USDC, &update(50_000, NOW), NOW)
            .expect("update");
        let inverse = SCALE_FACTOR / 50_000;
        assert!(o.price_in_bound(USDC, BTC, inverse, NOW).expect("inverse"));
    }

    #[test]
    fn test_quote_amount() {
        let mut o = oracle();
        o.update_price(BTC, USDT, &update(50_000, NOW), NOW)
            .expect("update");
        let usdt = o.quote_amount(BTC, USDT, 100_000_000, NOW).expect("forward");
        assert_eq!(usdt, 50_000_000_000);
        let btc = o.quote_amount(USDT, BTC, usdt, NOW).expect("inverse");
        assert_eq!(btc, 100_000_000);
    }

    #[test]
    fn test_admin_operations_journal_events() {
        let mut o = oracle();
        o.initialize(OTHER).expect("initialize");
        assert!(o.initialized());
        assert!(matches!(o.initialize(OWNER), Err(OracleError::AlreadyInitialized)));

        assert!(matches!(
            o.transfer_ownership(OTHER, OTHER),
            Err(OracleError::Unauthorized(_))
        ));
        o.transfer_ownership(OWNER, OTHER).expect("transfer");
        assert_eq!(o.owner(), OTHER);

        assert_eq!(
            o.drain_events(),
            vec![
                OracleEvent::OracleInitialized { initializer: OTHER },
                OracleEvent::OwnershipTransferred {
                    previous_owner: OWNER,
                    new_owner: OTHER
                },
            ]
        );
    }

    #[test]
    fn test_uninitialized_oracle_serves_prices() {
        let mut o = oracle();
        assert!(!o.initialized());
        o.update_price(BTC, USDC, &update(1000, NOW), NOW)
            .expect("update before initialize");
        assert!(o.get_price(BTC, USDC, NOW).is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = OracleConfig {
            scale_factor: 0,
            ..config()
        };
        let err = PriceOracle::new(&cfg, MemoryPriceStore::new()).expect_err("zero scale");
        assert!(matches!(err, OracleError::Config(_)));
    }
}
