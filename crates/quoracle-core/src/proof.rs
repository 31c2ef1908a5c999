//! Proof freshness and ordering checks.
//!
//! Only the proof's `creation_time_unix_ms` is trusted for time. A proof must
//! not be older than the expiration offset when it is submitted, and for any
//! pair each accepted proof must be strictly newer than the previous one.

use quoracle_types::{PriceProof, MILLIS_PER_SECOND};

use crate::{OracleError, Result};

/// Validates price proofs against the current time and the last accepted proof.
#[derive(Debug, Clone, Copy)]
pub struct ProofValidator {
    /// Maximum proof age and cache TTL, in milliseconds.
    max_age_ms: u64,
}

impl ProofValidator {
    /// Create a validator for an expiration offset expressed in seconds.
    ///
    /// # Errors
    ///
    /// - [`OracleError::ArithmeticOverflow`] if the offset in ms overflows `u64`
    pub fn new(expiration_offset_sec: u64) -> Result<Self> {
        let max_age_ms = expiration_offset_sec
            .checked_mul(MILLIS_PER_SECOND)
            .ok_or(OracleError::ArithmeticOverflow("expiration offset"))?;
        Ok(Self { max_age_ms })
    }

    /// Maximum proof age in milliseconds.
    pub fn max_age_ms(&self) -> u64 {
        self.max_age_ms
    }

    /// Check a proof at `now_ms`.
    ///
    /// `last_created_at` is the creation time of the proof behind the entry
    /// currently cached for the same pair, if any. Freshness is checked first.
    ///
    /// A proof stamped after `now_ms` is rejected: it would otherwise stay
    /// readable past its real TTL and block every honest update for the pair.
    ///
    /// # Errors
    ///
    /// - [`OracleError::ProofFromFuture`] if the proof is dated after `now_ms`
    /// - [`OracleError::ProofExpired`] if the proof is older than the offset
    /// - [`OracleError::StaleUpdate`] if the proof is not strictly newer than
    ///   `last_created_at`
    pub fn validate(
        &self,
        proof: &PriceProof,
        last_created_at: Option<u64>,
        now_ms: u64,
    ) -> Result<()> {
        let created_at = proof.creation_time_unix_ms;

        let age = now_ms
            .checked_sub(created_at)
            .ok_or(OracleError::ProofFromFuture {
                created_at,
                now: now_ms,
            })?;
        if age > self.max_age_ms {
            return Err(OracleError::ProofExpired {
                created_at,
                now: now_ms,
                max_age: self.max_age_ms,
            });
        }

        if let Some(last) = last_created_at {
            if last >= created_at {
                return Err(OracleError::StaleUpdate {
                    new: created_at,
                    last,
                });
            }
        }

        Ok(())
    }

    /// Absolute expiration of a price whose proof was created at `created_at`.
    ///
    /// # Errors
    ///
    /// - [`OracleError::ArithmeticOverflow`] if the sum overflows `u64`
    pub fn expiration_for(&self, created_at: u64) -> Result<u64> {
        created_at
            .checked_add(self.max_age_ms)
            .ok_or(OracleError::ArithmeticOverflow("expiration"))
    }

    /// Creation time recovered from a stored expiration.
    ///
    /// The offset never changes after construction, so the entry's expiration
    /// fully determines the creation time of the proof behind it.
    pub fn created_at_for(&self, expiration: u64) -> u64 {
        expiration.saturating_sub(self.max_age_ms)
    }
}
