//! # quoracle-types
//!
//! Shared domain types for the quoracle price oracle.
//!
//! Every price held by the oracle is an unsigned fixed-point integer scaled by
//! a global scale factor ([`SCALE_FACTOR`] unless configured otherwise).
//! All timestamps are Unix epoch milliseconds.

pub mod address;
pub mod asset;
pub mod events;
pub mod price;

pub use address::Address;
pub use asset::{AssetInfo, AssetPair};
pub use events::OracleEvent;
pub use price::{PriceCacheEntry, PriceProof, PriceResponse, PriceWithProof};

/// Default fixed-point scale factor (10^18).
pub const SCALE_FACTOR: u128 = 1_000_000_000_000_000_000;

/// Milliseconds per second.
pub const MILLIS_PER_SECOND: u64 = 1000;

/// Error types for parsing shared domain values.
#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    /// An address string was not 20 bytes of hex.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}
