//! SQLite-backed [`PriceStore`] and oracle bootstrap.
//!
//! The first open of a database records the construction parameters, the
//! owner and the asset registry. Later opens restore them from the database
//! and ignore whatever the configuration says, since those values are fixed
//! for the lifetime of an oracle.

use rusqlite::Connection;

use quoracle_core::cache::PriceStore;
use quoracle_core::config::OracleConfig;
use quoracle_core::access::AccessControl;
use quoracle_core::PriceOracle;
use quoracle_types::{AssetPair, PriceCacheEntry};

use crate::queries::{admin, assets, prices};
use crate::{DbError, Result};

/// [`PriceStore`] over a SQLite connection.
pub struct SqlitePriceStore {
    conn: Connection,
}

impl SqlitePriceStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Persist the administration state after an admin operation.
    pub fn save_access(&self, access: &AccessControl) -> Result<()> {
        admin::save_access(&self.conn, access)
    }

    /// Record construction-time state if this database has none yet.
    ///
    /// Returns `true` if the database was seeded by this call.
    pub fn bootstrap(&mut self, config: &OracleConfig) -> quoracle_core::Result<bool> {
        if admin::exists(&self.conn)? {
            let stored = admin::load_params(&self.conn)?;
            if stored != config.params() {
                tracing::warn!(
                    ?stored,
                    configured = ?config.params(),
                    "configured parameters differ from the persisted ones; keeping persisted"
                );
            }
            return Ok(false);
        }

        config.validate()?;
        let tx = self.conn.transaction().map_err(DbError::from)?;
        assets::insert_all(&tx, &config.assets)?;
        admin::insert(&tx, &config.params(), &AccessControl::new(config.owner))?;
        tx.commit().map_err(DbError::from)?;
        tracing::info!(
            assets = config.assets.len(),
            owner = %config.owner,
            "oracle state seeded"
        );
        Ok(true)
    }

    /// Bootstrap if needed, then rebuild the oracle from persisted state.
    pub fn into_oracle(mut self, config: &OracleConfig) -> quoracle_core::Result<PriceOracle<Self>> {
        self.bootstrap(config)?;
        let params = admin::load_params(&self.conn)?;
        let registry = assets::list(&self.conn)?;
        let access = admin::load_access(&self.conn)?;
        PriceOracle::from_parts(params, registry, access, self)
    }
}

impl std::fmt::Debug for SqlitePriceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlitePriceStore")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl PriceStore for SqlitePriceStore {
    fn get(&self, pair: &AssetPair) -> quoracle_core::Result<Option<PriceCacheEntry>> {
        Ok(prices::get(&self.conn, pair)?)
    }

    fn put(&mut self, pair: AssetPair, entry: PriceCacheEntry) -> quoracle_core::Result<()> {
        prices::upsert(&self.conn, &pair, &entry).map_err(|e: DbError| {
            tracing::error!(pair = %pair, error = %e, "price cache write failed");
            e.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quoracle_types::{Address, AssetInfo, PriceProof, PriceWithProof};

    const OWNER: Address = Address::repeat(0x01);
    const BTC: Address = Address::repeat(0x12);
    const USDC: Address = Address::repeat(0x21);
    const NOW: u64 = 1_700_000_000_000;

    fn config() -> OracleConfig {
        OracleConfig {
            owner: OWNER,
            assets: vec![AssetInfo::new(BTC, "btc", 8), AssetInfo::new(USDC, "usdc", 18)],
            ..OracleConfig::default()
        }
    }

    fn store() -> SqlitePriceStore {
        SqlitePriceStore::new(crate::open_memory().expect("open"))
    }

    #[test]
    fn test_bootstrap_once() {
        let mut s = store();
        assert!(s.bootstrap(&config()).expect("first"));
        assert!(!s.bootstrap(&config()).expect("second"));
        assert_eq!(assets::list(s.connection()).expect("assets").len(), 2);
    }

    #[test]
    fn test_bootstrap_rejects_invalid_config() {
        let mut s = store();
        let bad = OracleConfig {
            bound_threshold_percent: 500,
            ..config()
        };
        assert!(s.bootstrap(&bad).is_err());
        assert!(!admin::exists(s.connection()).expect("exists"));
    }

    #[test]
    fn test_bootstrap_rejects_overflowing_offset() {
        let mut s = store();
        let bad = OracleConfig {
            expiration_offset_sec: 1 << 62,
            ..config()
        };
        let err = s.bootstrap(&bad).expect_err("overflowing offset");
        assert!(matches!(err, quoracle_core::OracleError::Config(_)));
        assert!(!admin::exists(s.connection()).expect("exists"));

        // Nothing was persisted, so a corrected config still seeds the database.
        let oracle = s.into_oracle(&config()).expect("oracle");
        assert_eq!(oracle.expiration_offset_sec(), 3600);
    }

    #[test]
    fn test_failed_seed_leaves_no_assets() {
        let mut s = store();
        s.connection()
            .execute_batch(
                "CREATE TRIGGER reject_admin BEFORE INSERT ON oracle_admin
                 BEGIN SELECT RAISE(ABORT, 'admin insert rejected'); END;",
            )
            .expect("trigger");

        assert!(s.bootstrap(&config()).is_err());
        assert!(assets::list(s.connection()).expect("assets").is_empty());
        assert!(!admin::exists(s.connection()).expect("exists"));

        s.connection()
            .execute_batch("DROP TRIGGER reject_admin;")
            .expect("drop trigger");
        assert!(s.bootstrap(&config()).expect("retry"));
        assert_eq!(assets::list(s.connection()).expect("assets").len(), 2);
    }

    #[test]
    fn test_persisted_params_win() {
        let mut s = store();
        s.bootstrap(&config()).expect("seed");
        let changed = OracleConfig {
            expiration_offset_sec: 60,
            ..config()
        };
        let oracle = s.into_oracle(&changed).expect("oracle");
        assert_eq!(oracle.expiration_offset_sec(), 3600);
    }

    #[test]
    fn test_oracle_over_sqlite() {
        let mut oracle = store().into_oracle(&config()).expect("oracle");
        let update = PriceWithProof {
            price: 1000,
            proof: PriceProof {
                creation_height: 1,
                creation_time_unix_ms: NOW,
                height: 1,
                revision: 1,
                merkle_proof: vec![0x42],
            },
        };
        oracle.update_price(BTC, USDC, &update, NOW).expect("update");
        assert_eq!(oracle.get_price(BTC, USDC, NOW).expect("price").price, 1000);
        assert!(oracle.get_price(USDC, BTC, NOW).expect("inverse").is_inverse);
        assert_eq!(prices::count(oracle.store().connection()).expect("count"), 1);
    }

    #[test]
    fn test_admin_state_saved() {
        let mut oracle = store().into_oracle(&config()).expect("oracle");
        oracle.initialize(OWNER).expect("initialize");
        oracle.store().save_access(oracle.access()).expect("save");
        let access = admin::load_access(oracle.store().connection()).expect("load");
        assert!(access.initialized());
    }
}
