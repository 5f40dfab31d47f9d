//! Unified error types for the volatile AMM core.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type, so a caller can tell a solver failure from a slippage
//! rejection without string matching.
//!
//! # Taxonomy
//!
//! | Class | Variants | Meaning |
//! |-------|----------|---------|
//! | Convergence | [`NewtonRaphsonNonConvergence`](AmmError::NewtonRaphsonNonConvergence) | An iterative solver hit its iteration cap |
//! | Domain | [`ZeroReserve`](AmmError::ZeroReserve), [`UnsafeValue`](AmmError::UnsafeValue), [`DivisionByZero`](AmmError::DivisionByZero), [`Overflow`](AmmError::Overflow), [`Underflow`](AmmError::Underflow) | Inputs outside the range where the math is defined |
//! | Slippage | [`Slippage`](AmmError::Slippage) | Output below the caller's minimum |
//! | Usage | [`InvalidCoin`](AmmError::InvalidCoin), [`InvalidQuantity`](AmmError::InvalidQuantity), [`InsufficientLiquidity`](AmmError::InsufficientLiquidity), [`NonMonotonicTime`](AmmError::NonMonotonicTime) | Malformed request |
//! | Configuration | [`InvalidConfiguration`](AmmError::InvalidConfiguration), [`InvalidFee`](AmmError::InvalidFee), [`InvalidPrecision`](AmmError::InvalidPrecision) | Rejected pool parameters |
//!
//! Every error aborts the whole operation. Because operations take the
//! pool state by reference and return a successor, an `Err` never leaves
//! a partially updated state behind.

use primitive_types::U256;

/// Errors produced by the volatile AMM core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmmError {
    /// An intermediate value exceeded 256 bits.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// A subtraction would have gone below zero.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// A divisor was zero.
    #[error("division by zero")]
    DivisionByZero,

    /// An iterative solver exceeded its iteration cap.
    #[error("{0}")]
    NewtonRaphsonNonConvergence(&'static str),

    /// A balance that must be positive was zero.
    #[error("zero reserve")]
    ZeroReserve,

    /// A value fell outside the range where the invariant is well
    /// conditioned.
    #[error("unsafe value: {0}")]
    UnsafeValue(&'static str),

    /// A coin index was out of range for the pool.
    #[error("coin index {index} out of range for a {n_coins}-coin pool")]
    InvalidCoin {
        /// The offending index.
        index: usize,
        /// Number of coins in the pool.
        n_coins: usize,
    },

    /// A requested amount was malformed (zero, wrong arity, …).
    #[error("invalid quantity: {0}")]
    InvalidQuantity(&'static str),

    /// The pool cannot honour the request with its current supply.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// The computed output is below the caller's guard.
    #[error("slippage: got {actual}, wanted at least {minimum}")]
    Slippage {
        /// Amount the operation would have produced.
        actual: U256,
        /// Minimum the caller accepts.
        minimum: U256,
    },

    /// The operation would reduce the virtual price.
    #[error("virtual price would decrease")]
    Loss,

    /// The supplied timestamp is earlier than the last oracle update.
    #[error("timestamp {now} precedes last oracle update at {last}")]
    NonMonotonicTime {
        /// Timestamp supplied by the caller.
        now: u64,
        /// Timestamp of the last oracle update.
        last: u64,
    },

    /// Pool parameters failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// A fee parameter failed validation.
    #[error("invalid fee: {0}")]
    InvalidFee(&'static str),

    /// Token decimals failed validation.
    #[error("invalid precision: {0}")]
    InvalidPrecision(&'static str),
}

impl AmmError {
    /// Returns `true` for solver non-convergence.
    #[must_use]
    pub const fn is_convergence(&self) -> bool {
        matches!(self, Self::NewtonRaphsonNonConvergence(_))
    }

    /// Returns `true` for inputs outside the domain of the math.
    #[must_use]
    pub const fn is_domain(&self) -> bool {
        matches!(
            self,
            Self::ZeroReserve
                | Self::UnsafeValue(_)
                | Self::DivisionByZero
                | Self::Overflow(_)
                | Self::Underflow(_)
        )
    }

    /// Returns `true` when a caller-supplied minimum was not met.
    #[must_use]
    pub const fn is_slippage(&self) -> bool {
        matches!(self, Self::Slippage { .. })
    }
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, AmmError>;
