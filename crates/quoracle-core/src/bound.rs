//! Tolerance-band checks against the cached price.

use crate::math::mul_div;
use crate::{OracleError, Result};

/// Percentage denominator.
pub const PERCENT: u128 = 100;

/// Checks a candidate price against `oracle_price ± threshold%`.
#[derive(Debug, Clone, Copy)]
pub struct BoundChecker {
    threshold_percent: u32,
}

impl BoundChecker {
    /// # Errors
    ///
    /// - [`OracleError::Config`] if `threshold_percent` exceeds 100
    pub fn new(threshold_percent: u32) -> Result<Self> {
        if u128::from(threshold_percent) > PERCENT {
            return Err(crate::config::ConfigError::Invalid(format!(
                "bound threshold {threshold_percent}% exceeds 100%"
            ))
            .into());
        }
        Ok(Self { threshold_percent })
    }

    pub fn threshold_percent(&self) -> u32 {
        self.threshold_percent
    }

    /// Inclusive `(lower, upper)` band around `oracle_price`, truncating.
    pub fn band(&self, oracle_price: u128) -> Result<(u128, u128)> {
        let t = u128::from(self.threshold_percent);
        let lower = mul_div(oracle_price, PERCENT - t, PERCENT)?;
        let upper = mul_div(oracle_price, PERCENT + t, PERCENT)?;
        Ok((lower, upper))
    }

    /// Returns `true` if `candidate` lies inside the band.
    ///
    /// # Errors
    ///
    /// - [`OracleError::BelowThreshold`] if `candidate` is under the band
    /// - [`OracleError::AboveThreshold`] if `candidate` is over the band
    pub fn check(&self, oracle_price: u128, candidate: u128) -> Result<bool> {
        let (lower_bound, upper_bound) = self.band(oracle_price)?;
        if candidate < lower_bound {
            return Err(OracleError::BelowThreshold {
                price: candidate,
                lower_bound,
            });
        }
        if candidate > upper_bound {
            return Err(OracleError::AboveThreshold {
                price: candidate,
                upper_bound,
            });
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> BoundChecker {
        BoundChecker::new(10).expect("checker")
    }

    #[test]
    fn test_band() {
        assert_eq!(checker().band(50_000).expect("band"), (45_000, 55_000));
        // Truncation on both edges.
        assert_eq!(checker().band(1_005).expect("band"), (904, 1_105));
    }

    #[test]
    fn test_equal_and_edges_in_bound() {
        let c = checker();
        assert!(c.check(1_000, 1_000).expect("equal"));
        assert!(c.check(1_000, 900).expect("lower edge"));
        assert!(c.check(1_000, 1_100).expect("upper edge"));
        assert!(c.check(1_000, 1_080).expect("inside"));
    }

    #[test]
    fn test_below_threshold() {
        let err = checker().check(50_000, 40_000).expect_err("below");
        assert!(matches!(err, OracleError::BelowThreshold { lower_bound: 45_000, .. }));
        assert!(checker().check(1_000, 899).is_err());
    }

    #[test]
    fn test_above_threshold() {
        let err = checker().check(1_000, 1_200).expect_err("above");
        assert!(matches!(err, OracleError::AboveThreshold { upper_bound: 1_100, .. }));
        assert!(checker().check(1_000, 1_101).is_err());
    }

    #[test]
    fn test_zero_threshold_is_exact_match() {
        let c = BoundChecker::new(0).expect("checker");
        assert!(c.check(777, 777).expect("exact"));
        assert!(c.check(777, 778).is_err());
        assert!(c.check(777, 776).is_err());
    }

    #[test]
    fn test_threshold_over_hundred_rejected() {
        assert!(BoundChecker::new(101).is_err());
        assert!(BoundChecker::new(100).is_ok());
    }

    #[test]
    fn test_large_price_does_not_overflow() {
        let (_, upper) = checker().band(u128::MAX / 2).expect("band");
        assert!(upper > u128::MAX / 2);
    }
}
