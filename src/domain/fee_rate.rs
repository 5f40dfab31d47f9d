//! Fee rates in units of `1e-10`.

use core::fmt;

use primitive_types::U256;

use crate::error::AmmError;
use crate::math::CheckedArithmetic;

/// Denominator of every fee rate: `1e10` is 100 %.
pub const FEE_DENOMINATOR: u64 = 10_000_000_000;

/// A fraction expressed in units of `1e-10` (`10_000_000_000` = 100 %).
///
/// Swap fees, the admin share and the intermediate fee values of the
/// dynamic fee curve all use this scale. Values above
/// [`FEE_DENOMINATOR`] are representable but are rejected by
/// configuration validation.
///
/// # Examples
///
/// ```
/// use primitive_types::U256;
/// use volatile_amm::domain::FeeRate;
///
/// let fee = FeeRate::new(4_000_000); // 0.04 %
/// assert_eq!(fee.apply(U256::from(1_000_000_000u64)), Ok(U256::from(400_000u64)));
/// assert_eq!(fee.to_string(), "0.04%");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeeRate(u64);

impl FeeRate {
    /// Zero fee.
    pub const ZERO: Self = Self(0);

    /// 100 %.
    pub const FULL: Self = Self(FEE_DENOMINATOR);

    /// Creates a rate from raw `1e-10` units.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value in `1e-10` units.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns the raw value widened to `U256`.
    #[must_use]
    pub fn as_u256(&self) -> U256 {
        U256::from(self.0)
    }

    /// Returns `true` if the rate is at most 100 %.
    #[must_use]
    pub const fn is_valid_fraction(&self) -> bool {
        self.0 <= FEE_DENOMINATOR
    }

    /// Computes `⌊amount · rate / 1e10⌋`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if `amount · rate` exceeds 256 bits.
    pub fn apply(&self, amount: U256) -> Result<U256, AmmError> {
        amount.safe_mul_u64(self.0)?.safe_div_u64(FEE_DENOMINATOR)
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // one percent is 1e8 units
        let whole = self.0 / 100_000_000;
        let frac = self.0 % 100_000_000;
        if frac == 0 {
            return write!(f, "{whole}%");
        }
        let digits = format!("{frac:08}");
        write!(f, "{whole}.{}%", digits.trim_end_matches('0'))
    }
}
