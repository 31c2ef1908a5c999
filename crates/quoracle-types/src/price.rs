//! Price updates, proofs, and cached price entries.

use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Freshness metadata attached to every price update.
///
/// Only `creation_time_unix_ms` takes part in freshness and ordering checks.
/// The remaining fields are carried for provenance.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceProof {
    /// Upstream chain height at which the price was produced.
    pub creation_height: u64,
    /// Upstream timestamp at which the price was produced (Unix ms).
    pub creation_time_unix_ms: u64,
    /// Upstream height the proof was taken at.
    pub height: u64,
    /// Upstream chain revision.
    pub revision: u64,
    /// Opaque proof payload, hex encoded on the wire.
    #[serde_as(as = "serde_with::hex::Hex")]
    pub merkle_proof: Vec<u8>,
}

/// A raw price together with its proof, as submitted by a relayer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceWithProof {
    /// Raw price in the upstream feed's units.
    pub price: u128,
    pub proof: PriceProof,
}

/// Answer to a price query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceResponse {
    /// Normalized price for the requested direction.
    pub price: u128,
    /// `true` when the price was derived by inverting the opposite pair.
    pub is_inverse: bool,
}

/// Stored state for one ordered asset pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceCacheEntry {
    /// Normalized price.
    pub price: u128,
    /// Absolute expiration time (Unix ms).
    pub expiration: u64,
    /// Presence marker. `false` only for the placeholder returned for absent pairs.
    pub exists: bool,
}

impl PriceCacheEntry {
    pub fn new(price: u128, expiration: u64) -> Self {
        Self {
            price,
            expiration,
            exists: true,
        }
    }

    /// Placeholder for a pair that has never been written.
    pub fn absent() -> Self {
        Self::default()
    }

    /// Whether the entry can no longer be read at `now_ms`.
    ///
    /// An entry is still valid at exactly its expiration time.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms > self.expiration
    }
}
