//! Token decimal places and the multiplier into working precision.

use primitive_types::U256;

use crate::error::AmmError;

/// Working precision of every pool quantity.
const MAX_DECIMALS: u8 = 18;

/// Number of decimal places of one pool coin.
///
/// Valid range is `0..=18`. A coin with `d` decimals is lifted into the
/// pool's 18-decimal working precision by multiplying raw amounts with
/// [`precision_multiplier`](Self::precision_multiplier) `= 10^(18 − d)`.
///
/// # Examples
///
/// ```
/// use primitive_types::U256;
/// use volatile_amm::domain::Decimals;
///
/// let usdc = Decimals::new(6).expect("6 is valid");
/// assert_eq!(usdc.precision_multiplier(), U256::exp10(12));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decimals(u8);

impl Default for Decimals {
    fn default() -> Self {
        Self::MAX
    }
}

impl Decimals {
    /// Zero decimal places.
    pub const ZERO: Self = Self(0);

    /// Full working precision (18).
    pub const MAX: Self = Self(MAX_DECIMALS);

    /// Creates a new `Decimals` value after validating the range.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPrecision`] if `value` exceeds 18.
    pub const fn new(value: u8) -> Result<Self, AmmError> {
        if value > MAX_DECIMALS {
            return Err(AmmError::InvalidPrecision("decimals must be 0..=18"));
        }
        Ok(Self(value))
    }

    /// Returns the raw decimal count.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Returns `10^(18 − decimals)`.
    #[must_use]
    pub fn precision_multiplier(&self) -> U256 {
        U256::exp10(usize::from(MAX_DECIMALS - self.0))
    }
}
