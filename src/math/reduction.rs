//! Basket imbalance metric `K0` and the smoothed reduction coefficient.
//!
//! ```text
//! K0 = N^N · ∏ x_i / denom^N
//! K  = fee_gamma / (fee_gamma + 1 − K0)
//! ```
//!
//! `K0` is `1.0` for a perfectly balanced basket and falls toward zero as
//! one coin dominates. The invariant solver evaluates it against `D`,
//! the fee curve against `S = Σ x_i`. Both go through [`k0`] so the two
//! call sites cannot drift apart.

use primitive_types::U256;

use super::fixed_point::PRECISION;
use super::CheckedArithmetic;
use crate::error::AmmError;

/// Raw imbalance ratio `N^N · ∏ x_i / denom^N` in 18-decimal fixed point.
///
/// Two-coin baskets use `(4e18 · x0 / denom) · x1 / denom`; larger
/// baskets fold `K0 ← K0 · x_i · N / denom` left to right.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `denom` is zero.
/// - [`AmmError::Overflow`] on arithmetic overflow.
pub(crate) fn k0(x: &[U256], denom: U256) -> Result<U256, AmmError> {
    if denom.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    let n = x.len() as u64;
    if x.len() == 2 {
        return PRECISION
            .safe_mul_u64(4)?
            .safe_mul(&x[0])?
            .safe_div(&denom)?
            .safe_mul(&x[1])?
            .safe_div(&denom);
    }
    let mut k = PRECISION;
    for xi in x {
        k = k.safe_mul(xi)?.safe_mul_u64(n)?.safe_div(&denom)?;
    }
    Ok(k)
}

/// Smoothed imbalance coefficient used by the dynamic fee.
///
/// Returns a value in `(0, 1e18]`: `1e18` for a balanced basket,
/// approaching zero as the basket skews. With `fee_gamma == 0` the raw
/// `K0` is returned.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if the basket sums to zero.
/// - [`AmmError::Overflow`] on arithmetic overflow.
pub fn reduction_coefficient(x: &[U256], fee_gamma: U256) -> Result<U256, AmmError> {
    let mut s = U256::zero();
    for xi in x {
        s = s.safe_add(xi)?;
    }
    let k = k0(x, s)?;
    if fee_gamma.is_zero() {
        return Ok(k);
    }
    fee_gamma
        .safe_mul(&PRECISION)?
        .safe_div(&fee_gamma.safe_add(&PRECISION)?.safe_sub(&k)?)
}
