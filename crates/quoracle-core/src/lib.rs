//! # quoracle-core
//!
//! Registry-backed price oracle state machine.
//!
//! An update flows through the asset registry (both sides must be
//! registered), the proof validator (freshness and per-pair monotonicity),
//! the precision normalizer, and finally the price cache, which stores the
//! entry with its absolute expiration and emits a notification. Reads go
//! through the cache (forward or derived-inverse lookup with TTL check), and
//! the bound checker compares a candidate price against the cached one.
//!
//! Current time is always an explicit input; nothing here reads a clock.
//!
//! ## Modules
//!
//! - [`registry`]: immutable asset registry
//! - [`normalize`]: precision normalization and amount conversion
//! - [`proof`]: proof freshness and ordering checks
//! - [`cache`]: price cache over a pluggable [`cache::PriceStore`]
//! - [`bound`]: tolerance-band checks
//! - [`access`]: owner gate and initialization latch
//! - [`oracle`]: the [`oracle::PriceOracle`] facade
//! - [`config`]: TOML configuration
//! - [`events`]: broadcast event bus
//! - [`sequencer`]: serialized async handle

pub mod access;
pub mod bound;
pub mod cache;
pub mod config;
pub mod events;
pub mod math;
pub mod normalize;
pub mod oracle;
pub mod proof;
pub mod registry;
pub mod sequencer;

use quoracle_types::Address;

pub use oracle::PriceOracle;

/// Error types for oracle operations.
///
/// Every failing operation leaves the oracle state unchanged.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The base asset of a pair has no registry entry.
    #[error("PriceOracle: base denom not registered in local_network_to_oracle_network_denoms")]
    BaseNotRegistered(Address),

    /// The quote asset of a pair has no registry entry.
    #[error("PriceOracle: quote denom not registered in local_network_to_oracle_network_denoms")]
    QuoteNotRegistered(Address),

    /// The proof is older than the expiration offset at submission time.
    #[error("PriceOracle: price proof expired")]
    ProofExpired {
        /// Proof creation time (Unix ms).
        created_at: u64,
        /// Submission time (Unix ms).
        now: u64,
        /// Maximum allowed age (ms).
        max_age: u64,
    },

    /// The proof claims a creation time later than the submission time.
    #[error("PriceOracle: price proof created in the future")]
    ProofFromFuture {
        /// Proof creation time (Unix ms).
        created_at: u64,
        /// Submission time (Unix ms).
        now: u64,
    },

    /// The proof is not strictly newer than the cached entry's proof.
    #[error("PriceOracle: cannot update with an older price")]
    StaleUpdate {
        /// The rejected proof's creation time.
        new: u64,
        /// Creation time of the currently cached price.
        last: u64,
    },

    /// No cached entry in either direction.
    #[error("PriceOracle: price not found")]
    PriceNotFound,

    /// A cached entry exists but its expiration has passed.
    #[error("PriceOracle: price expired")]
    PriceExpired {
        /// Entry expiration (Unix ms).
        expiration: u64,
        /// Query time (Unix ms).
        now: u64,
    },

    /// Candidate price is under the lower edge of the tolerance band.
    #[error("Price is below the acceptable threshold")]
    BelowThreshold {
        price: u128,
        lower_bound: u128,
    },

    /// Candidate price is over the upper edge of the tolerance band.
    #[error("Price is above the acceptable threshold")]
    AboveThreshold {
        price: u128,
        upper_bound: u128,
    },

    /// Caller is not the owner.
    #[error("PriceOracle: caller is not the owner")]
    Unauthorized(Address),

    /// The submitted price cannot be used.
    #[error("PriceOracle: invalid price: {0}")]
    InvalidPrice(String),

    /// `initialize` was called a second time.
    #[error("PriceOracle: already initialized")]
    AlreadyInitialized,

    /// An address argument is not acceptable (e.g. zero address as owner).
    #[error("PriceOracle: invalid address {0}")]
    InvalidAddress(Address),

    /// Checked fixed-point arithmetic overflowed.
    #[error("arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The backing price store failed.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Convenience result type for oracle operations.
pub type Result<T> = std::result::Result<T, OracleError>;
