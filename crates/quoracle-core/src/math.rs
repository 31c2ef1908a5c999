//! Checked fixed-point helpers.
//!
//! Products of a scaled price and a scaled amount do not fit in `u128`, so
//! intermediate values are widened to 256 bits before dividing back down.

use crate::{OracleError, Result};

pub use wide::U256;

/// Kept apart so the macro expansion sees `core::result::Result`, not the
/// crate's one-parameter alias.
mod wide {
    #![allow(clippy::assign_op_pattern)]
    #![allow(clippy::ptr_offset_with_cast)]
    #![allow(clippy::manual_range_contains)]

    use uint::construct_uint;

    construct_uint! {
        /// 256-bit unsigned integer.
        pub struct U256(4);
    }
}

/// Largest exponent for which `10^exp` fits in a `u128`.
pub const MAX_DECIMALS: u32 = 38;

/// `10^exp` as a `u128`.
pub fn pow10(exp: u32) -> Result<u128> {
    10u128
        .checked_pow(exp)
        .ok_or(OracleError::ArithmeticOverflow("pow10"))
}

/// `a * b / denominator`, truncating, with a 256-bit intermediate.
///
/// # Errors
///
/// - [`OracleError::ArithmeticOverflow`] if `denominator` is zero or the
///   quotient does not fit in a `u128`
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128> {
    if denominator == 0 {
        return Err(OracleError::ArithmeticOverflow("mul_div: zero denominator"));
    }
    let product = U256::from(a)
        .checked_mul(U256::from(b))
        .ok_or(OracleError::ArithmeticOverflow("mul_div"))?;
    narrow(product / U256::from(denominator), "mul_div")
}

/// Convert a 256-bit value back to `u128`.
pub fn narrow(value: U256, context: &'static str) -> Result<u128> {
    if value.bits() > 128 {
        return Err(OracleError::ArithmeticOverflow(context));
    }
    Ok(value.low_u128())
}
