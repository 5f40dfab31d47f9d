//! Fixed-point `0.5^x`, the decay factor of the price oracle.
//!
//! The integer part of the exponent is a right shift. The fractional
//! part `f` uses the binomial series of `(1 − 1/2)^f`:
//!
//! ```text
//! 0.5^f = Σ_k C(f, k) · (−1/2)^k
//! ```
//!
//! summed until a term drops below [`EXP_PRECISION`].

use primitive_types::U256;

use super::fixed_point::PRECISION;
use super::CheckedArithmetic;
use crate::error::AmmError;

/// Series terms below this magnitude end the expansion.
pub const EXP_PRECISION: U256 = U256([10_000_000_000, 0, 0, 0]);

/// Integer exponents above this underflow to zero.
const MAX_INT_POW: u64 = 59;

const MAX_ITERATIONS: u64 = 255;

/// Computes `0.5^(power / 10^18)` in 18-decimal fixed point.
///
/// # Errors
///
/// - [`AmmError::NewtonRaphsonNonConvergence`] if the series does not
///   settle within 255 terms.
/// - [`AmmError::Overflow`] on arithmetic overflow.
pub fn halfpow(power: U256) -> Result<U256, AmmError> {
    let intpow = power / PRECISION;
    let otherpow = power - intpow * PRECISION;
    if intpow > U256::from(MAX_INT_POW) {
        return Ok(U256::zero());
    }
    let result = PRECISION >> (intpow.low_u64() as usize);
    if otherpow.is_zero() {
        return Ok(result);
    }

    let half = PRECISION / U256::from(2u8);
    let mut term = PRECISION;
    let mut sum = PRECISION;
    let mut negative = false;

    for i in 1..=MAX_ITERATIONS {
        let k = PRECISION.safe_mul_u64(i)?;
        let mut c = k.safe_sub(&PRECISION)?;
        if otherpow > c {
            c = otherpow - c;
            negative = !negative;
        } else {
            c -= otherpow;
        }
        term = term
            .safe_mul(&c.safe_mul(&half)?.safe_div(&PRECISION)?)?
            .safe_div(&k)?;
        sum = if negative {
            sum.safe_sub(&term)?
        } else {
            sum.safe_add(&term)?
        };
        if term < EXP_PRECISION {
            return result.safe_mul(&sum)?.safe_div(&PRECISION);
        }
    }

    Err(AmmError::NewtonRaphsonNonConvergence(
        "halfpow did not converge within 255 terms",
    ))
}
