//! 18-decimal fixed-point helpers.
//!
//! A real number `r` is stored as the integer `r · 10^18`. Products and
//! quotients truncate toward zero:
//!
//! ```text
//! mul(a, b) = ⌊a · b / 10^18⌋
//! div(a, b) = ⌊a · 10^18 / b⌋
//! ```

use primitive_types::U256;

use super::CheckedArithmetic;
use crate::error::AmmError;

/// One unit in 18-decimal fixed point.
pub const PRECISION: U256 = U256([1_000_000_000_000_000_000, 0, 0, 0]);

/// Scale applied to the amplification coefficient `A`.
pub const A_MULTIPLIER: U256 = U256([10_000, 0, 0, 0]);

/// Fixed-point multiplication.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if `a · b` exceeds 256 bits.
pub fn mul(a: U256, b: U256) -> Result<U256, AmmError> {
    a.safe_mul(&b)?.safe_div(&PRECISION)
}

/// Fixed-point division.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `b` is zero.
/// - [`AmmError::Overflow`] if `a · 10^18` exceeds 256 bits.
pub fn div(a: U256, b: U256) -> Result<U256, AmmError> {
    a.safe_mul(&PRECISION)?.safe_div(&b)
}

/// Fixed-point power by repeated [`mul`].
///
/// Truncation happens after every factor, so `pow(a, 3)` equals
/// `mul(mul(a, a), a)` and not `⌊a³ / 10^36⌋`.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if an intermediate product overflows.
pub fn pow(a: U256, exponent: u32) -> Result<U256, AmmError> {
    let mut result = PRECISION;
    for _ in 0..exponent {
        result = mul(result, a)?;
    }
    Ok(result)
}

/// Absolute difference of two unsigned values.
#[must_use]
pub fn abs_diff(a: U256, b: U256) -> U256 {
    if a > b {
        a - b
    } else {
        b - a
    }
}
