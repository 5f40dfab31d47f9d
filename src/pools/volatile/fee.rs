//! Dynamic fee.
//!
//! ```text
//! fee(xp) = (mid_fee · K + out_fee · (1 − K)) / 1e18
//! K       = fee_gamma / (fee_gamma + 1 − K0(xp))
//! ```
//!
//! A balanced basket pays close to `mid_fee`; the fee rises toward
//! `out_fee` as the basket skews. Deposits pay a share of that fee
//! proportional to how far the deposit itself deviates from balance.

use primitive_types::U256;

use super::VolatilePool;
use crate::domain::{FeeRate, FEE_DENOMINATOR};
use crate::error::AmmError;
use crate::math::{abs_diff, reduction_coefficient, CheckedArithmetic, PRECISION};

/// Flat surcharge on every deposit fee.
const NOISE_FEE: U256 = U256([100_000, 0, 0, 0]);

impl VolatilePool {
    /// Fee in `1e-10` units for the working basket `xp`.
    pub(crate) fn fee(&self, xp: &[U256]) -> Result<U256, AmmError> {
        let fees = self.config.fees();
        let f = reduction_coefficient(xp, fees.fee_gamma)?;
        fees.mid_fee
            .as_u256()
            .safe_mul(&f)?
            .safe_add(&fees.out_fee.as_u256().safe_mul(&PRECISION.safe_sub(&f)?)?)?
            .safe_div(&PRECISION)
    }

    /// Imbalance fee of a deposit whose working-precision deltas are
    /// `amounts`, in `1e-10` units.
    pub(crate) fn calc_token_fee(&self, amounts: &[U256], xp: &[U256]) -> Result<U256, AmmError> {
        let n = self.n() as u64;
        let fee = self
            .fee(xp)?
            .safe_mul_u64(n)?
            .safe_div_u64(4 * (n - 1))?;

        let mut sum = U256::zero();
        for a in amounts {
            sum = sum.safe_add(a)?;
        }
        let avg = sum.safe_div_u64(n)?;
        let mut sdiff = U256::zero();
        for a in amounts {
            sdiff = sdiff.safe_add(&abs_diff(*a, avg))?;
        }

        fee.safe_mul(&sdiff)?.safe_div(&sum)?.safe_add(&NOISE_FEE)
    }

    /// [`fee`](Self::fee) as a [`FeeRate`].
    pub(crate) fn fee_rate(&self, xp: &[U256]) -> Result<FeeRate, AmmError> {
        let fee = self.fee(xp)?;
        if fee > U256::from(FEE_DENOMINATOR) {
            return Err(AmmError::InvalidFee("dynamic fee above 100%"));
        }
        Ok(FeeRate::new(fee.low_u64()))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::super::fixtures::{eth_pool, tri_pool, wad};
    use super::*;

    #[test]
    fn balanced_basket_pays_mid_fee() {
        let pool = eth_pool();
        assert_eq!(pool.fee(&[wad(1), wad(1)]), Ok(U256::from(4_000_000u64)));
        let pool = tri_pool();
        assert_eq!(
            pool.fee(&[wad(7), wad(7), wad(7)]),
            Ok(U256::from(4_000_000u64))
        );
    }

    #[test]
    fn skew_raises_fee_toward_out_fee() {
        let pool = eth_pool();
        assert_eq!(pool.fee(&[wad(2), wad(1)]), Ok(U256::from(37_027_522u64)));
        assert_eq!(pool.fee(&[wad(10), wad(1)]), Ok(U256::from(39_470_137u64)));
    }

    #[test]
    fn balanced_deposit_pays_noise_only() {
        let pool = eth_pool();
        let Ok(fee) = pool.calc_token_fee(&[wad(5), wad(5)], &[wad(10), wad(10)]) else {
            panic!("expected Ok");
        };
        assert_eq!(fee, NOISE_FEE);
    }

    #[test]
    fn one_sided_deposit_pays_half_fee() {
        // pair: fee · 2/4 · (|a − a/2| + |0 − a/2|)/a = fee / 2
        let pool = eth_pool();
        let Ok(fee) = pool.calc_token_fee(&[wad(4), U256::zero()], &[wad(10), wad(10)]) else {
            panic!("expected Ok");
        };
        assert_eq!(fee, U256::from(2_000_000u64) + NOISE_FEE);
    }

    #[test]
    fn zero_deposit_rejected() {
        let pool = eth_pool();
        assert_eq!(
            pool.calc_token_fee(&[U256::zero(), U256::zero()], &[wad(1), wad(1)]),
            Err(AmmError::DivisionByZero)
        );
    }

    #[test]
    fn fee_rate_charges_through_apply() {
        let pool = eth_pool();
        let Ok(rate) = pool.fee_rate(&[wad(2), wad(1)]) else {
            panic!("expected Ok");
        };
        assert_eq!(rate, FeeRate::new(37_027_522));
        assert_eq!(rate.apply(wad(1)), Ok(U256::from(3_702_752_200_000_000u64)));
    }
}
