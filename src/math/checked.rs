//! Checked arithmetic for 256-bit fixed-point quantities.
//!
//! The [`CheckedArithmetic`] trait provides fallible arithmetic operations
//! that return [`Result<Self, AmmError>`](crate::error::AmmError) instead
//! of panicking on overflow, underflow, or division by zero.
//!
//! Division always truncates toward zero. The pool formulas depend on
//! the exact operation order, so callers chain these methods in the
//! order the formula is written rather than simplifying.
//!
//! # Examples
//!
//! ```
//! use primitive_types::U256;
//! use volatile_amm::math::CheckedArithmetic;
//!
//! let a = U256::from(7u8);
//! let q = a.safe_mul(&U256::from(3u8)).and_then(|v| v.safe_div(&U256::from(2u8)));
//! assert_eq!(q, Ok(U256::from(10u8)));
//! ```

use primitive_types::U256;

use crate::error::AmmError;

/// Fallible arithmetic for 256-bit quantities.
///
/// # Contract
///
/// - **No panics**: all error conditions produce `Err`.
/// - **No saturation**: saturation hides bugs; errors propagate instead.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds 256 bits.
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked multiplication.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds 256 bits.
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked floor division.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if `other` is zero.
    fn safe_div(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked multiplication by a small machine integer.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds 256 bits.
    fn safe_mul_u64(&self, value: u64) -> Result<Self, AmmError>;

    /// Checked floor division by a small machine integer.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if `value` is zero.
    fn safe_div_u64(&self, value: u64) -> Result<Self, AmmError>;
}

impl CheckedArithmetic for U256 {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_add(*other)
            .ok_or(AmmError::Overflow("u256 addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_sub(*other)
            .ok_or(AmmError::Underflow("u256 subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_mul(*other)
            .ok_or(AmmError::Overflow("u256 multiplication overflow"))
    }

    #[inline]
    fn safe_div(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_div(*other).ok_or(AmmError::DivisionByZero)
    }

    #[inline]
    fn safe_mul_u64(&self, value: u64) -> Result<Self, AmmError> {
        self.safe_mul(&U256::from(value))
    }

    #[inline]
    fn safe_div_u64(&self, value: u64) -> Result<Self, AmmError> {
        self.safe_div(&U256::from(value))
    }
}
