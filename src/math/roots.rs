//! Iterative roots: N-th root of a product and fixed-point square root.
//!
//! There is no native N-th root on 256-bit integers, so the geometric
//! mean is found by Newton iteration on `D^N = ∏ x_i`. Two-coin baskets
//! use the closed Heron step `D ← (D + x0·x1/D) / 2`, which truncates
//! differently from the general form and must be kept distinct.

use primitive_types::U256;
use tracing::warn;

use super::fixed_point::PRECISION;
use super::CheckedArithmetic;
use crate::error::AmmError;

/// Iteration cap for the geometric mean.
const MAX_ITERATIONS: usize = 255;

/// Iteration cap for the integer square root.
const SQRT_MAX_ITERATIONS: usize = 256;

/// Returns a copy of `values` sorted in descending order.
pub(crate) fn sorted_desc(values: &[U256]) -> Vec<U256> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted
}

/// Geometric mean of a basket, `(∏ x_i)^(1/N)`.
///
/// Entries are sorted in descending order first and the iteration starts
/// from the largest entry.
///
/// # Errors
///
/// - [`AmmError::InvalidQuantity`] if `values` is empty.
/// - [`AmmError::ZeroReserve`] if any entry is zero.
/// - [`AmmError::NewtonRaphsonNonConvergence`] after 255 iterations.
/// - [`AmmError::Overflow`] if an intermediate product overflows.
pub fn geometric_mean(values: &[U256]) -> Result<U256, AmmError> {
    if values.is_empty() {
        return Err(AmmError::InvalidQuantity("geometric mean of empty basket"));
    }
    if values.iter().any(U256::is_zero) {
        return Err(AmmError::ZeroReserve);
    }
    let x = sorted_desc(values);
    let n = x.len() as u64;

    let mut d = x[0];
    for _ in 0..MAX_ITERATIONS {
        let d_prev = d;
        d = if x.len() == 2 {
            d.safe_add(&x[0].safe_mul(&x[1])?.safe_div(&d)?)?
                .safe_div_u64(2)?
        } else {
            let mut tmp = PRECISION;
            for xi in &x {
                tmp = tmp.safe_mul(xi)?.safe_div(&d)?;
            }
            let numerator = PRECISION.safe_mul_u64(n - 1)?.safe_add(&tmp)?;
            d.safe_mul(&numerator)?
                .safe_div(&PRECISION.safe_mul_u64(n)?)?
        };
        if d.is_zero() {
            return Err(AmmError::DivisionByZero);
        }
        let diff = super::abs_diff(d, d_prev);
        if diff <= U256::one() || diff.safe_mul(&PRECISION)? < d {
            return Ok(d);
        }
    }

    warn!(n_coins = n, "geometric mean did not converge");
    Err(AmmError::NewtonRaphsonNonConvergence(
        "geometric mean did not converge within 255 iterations",
    ))
}

/// Fixed-point square root: `⌊√(x · 10^18)⌋`.
///
/// The input and output are both 18-decimal numbers, so
/// `sqrt_int(4e18) == 2e18`.
///
/// # Errors
///
/// - [`AmmError::Overflow`] if `x · 10^18` exceeds 256 bits.
/// - [`AmmError::NewtonRaphsonNonConvergence`] after 256 iterations.
pub fn sqrt_int(x: U256) -> Result<U256, AmmError> {
    if x.is_zero() {
        return Ok(U256::zero());
    }

    let mut z = x.safe_add(&PRECISION)?.safe_div_u64(2)?;
    let mut y = x;
    for _ in 0..SQRT_MAX_ITERATIONS {
        if z == y {
            return Ok(y);
        }
        y = z;
        z = x.safe_mul(&PRECISION)?.safe_div(&z)?.safe_add(&z)?.safe_div_u64(2)?;
    }

    Err(AmmError::NewtonRaphsonNonConvergence(
        "sqrt did not converge within 256 iterations",
    ))
}
