//! Precision normalization.
//!
//! The upstream feed publishes a rate per *whole* unit of each asset, which is
//! independent of how many decimals either asset uses locally. The canonical
//! cached value is therefore the published rate itself, and registered
//! precisions only come into play when an amount of atomic units is converted
//! (see [`convert_amount`]).
//!
//! Direct quotes are plain rates. Derived inverse quotes are
//! `scale_factor / price`, i.e. fixed-point scaled by the scale factor, and
//! are flagged with `is_inverse` so consumers apply the scale.

use quoracle_types::{AssetInfo, PriceResponse};

use crate::math::{narrow, pow10, U256};
use crate::{OracleError, Result};

/// Normalize a raw submitted price for `(base, quote)`.
///
/// # Errors
///
/// - [`OracleError::InvalidPrice`] if `raw_price` is zero, since a zero rate
///   has no inverse
/// - [`OracleError::ArithmeticOverflow`] if either precision cannot be
///   represented
pub fn normalize_price(raw_price: u128, base: &AssetInfo, quote: &AssetInfo) -> Result<u128> {
    if raw_price == 0 {
        return Err(OracleError::InvalidPrice(format!(
            "zero price for {}/{}",
            base.oracle_denom, quote.oracle_denom
        )));
    }
    pow10(base.precision)?;
    pow10(quote.precision)?;
    Ok(raw_price)
}

/// Inverse of a normalized price: `scale_factor / price`, truncating.
///
/// # Errors
///
/// - [`OracleError::InvalidPrice`] if `price` is zero
pub fn invert(price: u128, scale_factor: u128) -> Result<u128> {
    if price == 0 {
        return Err(OracleError::InvalidPrice("cannot invert zero price".to_string()));
    }
    Ok(scale_factor / price)
}

/// Convert `amount` atomic units of the base asset into atomic units of the
/// quote asset using a price answer for `(base, quote)`.
///
/// ```text
/// direct:  amount * price * 10^quote_precision / 10^base_precision
/// inverse: amount * price * 10^quote_precision / (10^base_precision * scale_factor)
/// ```
///
/// # Errors
///
/// - [`OracleError::ArithmeticOverflow`] if the result does not fit in `u128`
pub fn convert_amount(
    amount: u128,
    response: PriceResponse,
    base_precision: u32,
    quote_precision: u32,
    scale_factor: u128,
) -> Result<u128> {
    let numerator = U256::from(amount)
        .checked_mul(U256::from(response.price))
        .and_then(|v| v.checked_mul(U256::from(pow10(quote_precision).ok()?)))
        .ok_or(OracleError::ArithmeticOverflow("convert_amount"))?;

    let mut denominator = U256::from(pow10(base_precision)?);
    if response.is_inverse {
        denominator = denominator
            .checked_mul(U256::from(scale_factor))
            .ok_or(OracleError::ArithmeticOverflow("convert_amount"))?;
    }
    if denominator.is_zero() {
        return Err(OracleError::ArithmeticOverflow("convert_amount: zero scale"));
    }

    narrow(numerator / denominator, "convert_amount")
}
