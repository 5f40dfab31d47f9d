//! Newton-Raphson solvers for the volatile (cryptoswap) invariant.
//!
//! # Invariant
//!
//! For a basket `x` of `N` price-normalized balances with sum `S`:
//!
//! ```text
//! K0 = N^N · ∏ x_i / D^N
//! K  = A · K0 · γ² / (γ + 1 − K0)²
//! K · D^(N−1) · S + ∏ x_i = K · D^N + (D/N)^N
//! ```
//!
//! where `A` is the amplification (supplied pre-multiplied as
//! `ann = A · N^N · A_MULTIPLIER`) and `γ` controls how quickly the curve
//! relaxes from stableswap-like to constant-product-like as `K0` drops.
//!
//! # Solvers
//!
//! | Function | Solves for | Start |
//! |----------|------------|-------|
//! | [`compute_d`] | `D` given all balances | `N · geometric_mean(x)` |
//! | [`compute_y`] | `x_i` given `D` and the other balances | `D/N` scaled by the other balances |
//!
//! Both sort the basket in descending order before iterating. Sorting
//! only affects conditioning, not the root. Both reject inputs outside
//! the range where the iteration is known to be well behaved
//! ([`AmmError::UnsafeValue`]) rather than risk a wrong root.

use primitive_types::U256;
use tracing::warn;

use super::fixed_point::{A_MULTIPLIER, PRECISION};
use super::reduction::k0;
use super::roots::{geometric_mean, sorted_desc};
use super::CheckedArithmetic;
use crate::error::AmmError;

/// Smallest accepted `gamma`.
pub const MIN_GAMMA: U256 = U256([10_000_000_000, 0, 0, 0]);

/// Largest accepted `gamma`.
pub const MAX_GAMMA: U256 = U256([50_000_000_000_000_000, 0, 0, 0]);

/// Iteration cap shared by both solvers.
const MAX_ITERATIONS: usize = 255;

// ---------------------------------------------------------------------------
// Parameter bounds
// ---------------------------------------------------------------------------

/// Accepted range of `ann` for an `n_coins` basket:
/// `[N^N · A_MULTIPLIER / 100, N^N · A_MULTIPLIER · 1000]`.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] for absurd coin counts.
pub fn ann_bounds(n_coins: usize) -> Result<(U256, U256), AmmError> {
    let n = n_coins as u64;
    let mut nn = U256::one();
    for _ in 0..n_coins {
        nn = nn.safe_mul_u64(n)?;
    }
    let scaled = nn.safe_mul(&A_MULTIPLIER)?;
    Ok((scaled.safe_div_u64(100)?, scaled.safe_mul_u64(1_000)?))
}

fn check_params(ann: U256, gamma: U256, n_coins: usize) -> Result<(), AmmError> {
    if n_coins < 2 {
        return Err(AmmError::InvalidQuantity("basket needs at least two coins"));
    }
    let (min_a, max_a) = ann_bounds(n_coins)?;
    if ann < min_a || ann > max_a {
        return Err(AmmError::UnsafeValue("A outside safe range"));
    }
    if gamma < MIN_GAMMA || gamma > MAX_GAMMA {
        return Err(AmmError::UnsafeValue("gamma outside safe range"));
    }
    Ok(())
}

/// `x · 1e18 / d` must lie in `[1e16, 1e20]`.
fn check_ratio(x: U256, d: U256, what: &'static str) -> Result<(), AmmError> {
    let frac = x.safe_mul(&PRECISION)?.safe_div(&d)?;
    if frac < U256::exp10(16) || frac > U256::exp10(20) {
        warn!(%x, %d, "{what}");
        return Err(AmmError::UnsafeValue(what));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared Newton terms
// ---------------------------------------------------------------------------

/// `|γ + 1 − K0| + 1`, kept strictly positive.
fn g1k0(gamma: U256, k0: U256) -> Result<U256, AmmError> {
    let g = gamma.safe_add(&PRECISION)?;
    let diff = if g > k0 { g - k0 } else { k0 - g };
    diff.safe_add(&U256::one())
}

/// `1e18 · D / γ · g1k0 / γ · g1k0 · A_MULTIPLIER / ann`
fn mul1(d: U256, gamma: U256, g1k0: U256, ann: U256) -> Result<U256, AmmError> {
    PRECISION
        .safe_mul(&d)?
        .safe_div(&gamma)?
        .safe_mul(&g1k0)?
        .safe_div(&gamma)?
        .safe_mul(&g1k0)?
        .safe_mul(&A_MULTIPLIER)?
        .safe_div(&ann)
}

fn sum(x: &[U256]) -> Result<U256, AmmError> {
    x.iter().try_fold(U256::zero(), |acc, xi| acc.safe_add(xi))
}

// ---------------------------------------------------------------------------
// compute_d
// ---------------------------------------------------------------------------

/// Solves the invariant for `D` given every balance.
///
/// # Arguments
///
/// - `ann`: amplification, `A · N^N · A_MULTIPLIER`.
/// - `gamma`: curve relaxation parameter (18 decimals).
/// - `x`: price-normalized balances (18 decimals), any order.
///
/// # Errors
///
/// - [`AmmError::ZeroReserve`] if any balance is zero.
/// - [`AmmError::UnsafeValue`] if `ann`, `gamma` or the basket shape is
///   outside the safe range, before or after solving.
/// - [`AmmError::NewtonRaphsonNonConvergence`] after 255 iterations.
/// - [`AmmError::Overflow`] / [`AmmError::Underflow`] /
///   [`AmmError::DivisionByZero`] on degenerate intermediates.
pub fn compute_d(ann: U256, gamma: U256, x: &[U256]) -> Result<U256, AmmError> {
    check_params(ann, gamma, x.len())?;
    if x.iter().any(U256::is_zero) {
        return Err(AmmError::ZeroReserve);
    }
    let x = sorted_desc(x);
    if x[0] < U256::exp10(9) || x[0] > U256::exp10(33) {
        warn!(x0 = %x[0], "largest balance outside safe range");
        return Err(AmmError::UnsafeValue("largest balance outside safe range"));
    }
    for xi in &x[1..] {
        if xi.safe_mul(&PRECISION)?.safe_div(&x[0])? < U256::exp10(11) {
            warn!(x0 = %x[0], xi = %xi, "basket too skewed");
            return Err(AmmError::UnsafeValue("basket too skewed"));
        }
    }

    let n = x.len() as u64;
    let s = sum(&x)?;
    let mut d = geometric_mean(&x)?.safe_mul_u64(n)?;

    for _ in 0..MAX_ITERATIONS {
        let d_prev = d;

        let k0 = k0(&x, d)?;
        let g1k0 = g1k0(gamma, k0)?;
        let mul1 = mul1(d, gamma, g1k0, ann)?;
        let mul2 = PRECISION
            .safe_mul_u64(2)?
            .safe_mul_u64(n)?
            .safe_mul(&k0)?
            .safe_div(&g1k0)?;

        let neg_fprime = s
            .safe_add(&s.safe_mul(&mul2)?.safe_div(&PRECISION)?)?
            .safe_add(&mul1.safe_mul_u64(n)?.safe_div(&k0)?)?
            .safe_sub(&mul2.safe_mul(&d)?.safe_div(&PRECISION)?)?;

        let d_plus = d.safe_mul(&neg_fprime.safe_add(&s)?)?.safe_div(&neg_fprime)?;
        let mut d_minus = d.safe_mul(&d)?.safe_div(&neg_fprime)?;
        let correction = |delta: U256| -> Result<U256, AmmError> {
            d.safe_mul(&mul1.safe_div(&neg_fprime)?)?
                .safe_div(&PRECISION)?
                .safe_mul(&delta)?
                .safe_div(&k0)
        };
        if PRECISION > k0 {
            d_minus = d_minus.safe_add(&correction(PRECISION - k0)?)?;
        } else {
            d_minus = d_minus.safe_sub(&correction(k0 - PRECISION)?)?;
        }

        d = if d_plus > d_minus {
            d_plus - d_minus
        } else {
            (d_minus - d_plus) / U256::from(2u8)
        };

        let diff = super::abs_diff(d, d_prev);
        if diff.safe_mul(&U256::exp10(14))? < U256::exp10(16).max(d) {
            for xi in &x {
                check_ratio(*xi, d, "balance to D ratio outside safe range")?;
            }
            return Ok(d);
        }
    }

    warn!(n_coins = n, "D did not converge");
    Err(AmmError::NewtonRaphsonNonConvergence(
        "D did not converge within 255 iterations",
    ))
}

// ---------------------------------------------------------------------------
// compute_y
// ---------------------------------------------------------------------------

/// Solves the invariant for balance `i` given `D` and every other
/// balance. The current value of `x[i]` is ignored.
///
/// # Errors
///
/// - [`AmmError::InvalidCoin`] if `i` is out of range.
/// - [`AmmError::UnsafeValue`] if `D`, the other balances or the result
///   fall outside the safe range.
/// - [`AmmError::NewtonRaphsonNonConvergence`] after 255 iterations.
/// - Arithmetic errors on degenerate intermediates.
pub fn compute_y(ann: U256, gamma: U256, x: &[U256], d: U256, i: usize) -> Result<U256, AmmError> {
    check_params(ann, gamma, x.len())?;
    if i >= x.len() {
        return Err(AmmError::InvalidCoin {
            index: i,
            n_coins: x.len(),
        });
    }
    if d < U256::exp10(17) || d > U256::exp10(33) {
        warn!(%d, "D outside safe range");
        return Err(AmmError::UnsafeValue("D outside safe range"));
    }
    for (k, xk) in x.iter().enumerate() {
        if k != i {
            check_ratio(*xk, d, "balance to D ratio outside safe range")?;
        }
    }

    let n = x.len() as u64;
    let (mut y, k0_i, s_i, convergence_limit) = if x.len() == 2 {
        let x_j = x[1 - i];
        let y = d.safe_mul(&d)?.safe_div(&x_j.safe_mul_u64(4)?)?;
        let k0_i = PRECISION.safe_mul_u64(2)?.safe_mul(&x_j)?.safe_div(&d)?;
        let limit = (x_j / U256::exp10(14))
            .max(d / U256::exp10(14))
            .max(U256::from(100u8));
        (y, k0_i, x_j, limit)
    } else {
        let mut others = x.to_vec();
        others[i] = U256::zero();
        let others = sorted_desc(&others);
        let limit = (others[0] / U256::exp10(14))
            .max(d / U256::exp10(14))
            .max(U256::from(100u8));

        // smallest balances first keeps the running quotient large
        let mut y = d.safe_div_u64(n)?;
        let mut s_i = U256::zero();
        for xj in others[..others.len() - 1].iter().rev() {
            y = y.safe_mul(&d)?.safe_div(&xj.safe_mul_u64(n)?)?;
            s_i = s_i.safe_add(xj)?;
        }
        let mut k0_i = PRECISION;
        for xj in &others[..others.len() - 1] {
            k0_i = k0_i.safe_mul(xj)?.safe_mul_u64(n)?.safe_div(&d)?;
        }
        (y, k0_i, s_i, limit)
    };

    for _ in 0..MAX_ITERATIONS {
        let y_prev = y;

        let k0 = k0_i.safe_mul(&y)?.safe_mul_u64(n)?.safe_div(&d)?;
        let s = s_i.safe_add(&y)?;

        let g1k0 = g1k0(gamma, k0)?;
        let mul1 = mul1(d, gamma, g1k0, ann)?;
        let mul2 = PRECISION.safe_add(
            &PRECISION
                .safe_mul_u64(2)?
                .safe_mul(&k0)?
                .safe_div(&g1k0)?,
        )?;

        let yfprime = PRECISION
            .safe_mul(&y)?
            .safe_add(&s.safe_mul(&mul2)?)?
            .safe_add(&mul1)?;
        let dyfprime = d.safe_mul(&mul2)?;
        if yfprime < dyfprime {
            y = y_prev / U256::from(2u8);
            continue;
        }
        let yfprime = yfprime - dyfprime;
        let fprime = yfprime.safe_div(&y)?;

        let mut y_minus = mul1.safe_div(&fprime)?;
        let y_plus = yfprime
            .safe_add(&PRECISION.safe_mul(&d)?)?
            .safe_div(&fprime)?
            .safe_add(&y_minus.safe_mul(&PRECISION)?.safe_div(&k0)?)?;
        y_minus = y_minus.safe_add(&PRECISION.safe_mul(&s)?.safe_div(&fprime)?)?;

        y = if y_plus < y_minus {
            y_prev / U256::from(2u8)
        } else {
            y_plus - y_minus
        };

        let diff = super::abs_diff(y, y_prev);
        if diff < convergence_limit.max(y / U256::exp10(14)) {
            check_ratio(y, d, "solved balance to D ratio outside safe range")?;
            return Ok(y);
        }
    }

    warn!(n_coins = n, coin = i, "y did not converge");
    Err(AmmError::NewtonRaphsonNonConvergence(
        "y did not converge within 255 iterations",
    ))
}
