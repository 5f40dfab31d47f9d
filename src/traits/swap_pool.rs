//! Core exchange trait.
//!
//! [`SwapPool`] is the foundational abstraction of a multi-coin pool. It
//! covers the full lifecycle of an exchange:
//!
//! 1. **Inspect**: [`SwapPool::n_coins`] and [`SwapPool::current_fee`].
//! 2. **Preview**: [`SwapPool::get_dy`] prices an exchange without
//!    producing a successor state.
//! 3. **Execute**: [`SwapPool::quote_exchange`] prices the exchange,
//!    updates the oracle and returns the successor state.
//!
//! # Value-Passing Model
//!
//! Pools are immutable descriptions. Every method borrows a
//! [`PoolState`] and none mutates it; state transitions are returned
//! inside a quote. Callers commit a quote by persisting its state and
//! settling its amounts, or drop it. An `Err` therefore never leaves a
//! partially updated state behind.
//!
//! # Fee Deduction
//!
//! The fee is taken from the output side:
//!
//! ```text
//! dy_gross = xp_j − y(x + dx) − 1         (rescaled to coin j)
//! fee      = dy_gross · fee(xp_after) / 1e10
//! dy       = dy_gross − fee
//! ```

use primitive_types::U256;

use crate::domain::{ExchangeQuote, FeeRate, PoolState};
use crate::error::AmmError;

/// Exchange operations of a multi-coin pool.
///
/// # Errors
///
/// Methods that can fail return [`Result<T, AmmError>`]. Common error
/// variants include:
///
/// - [`AmmError::InvalidCoin`]: a coin index is out of range.
/// - [`AmmError::InsufficientLiquidity`]: the pool is empty.
/// - [`AmmError::UnsafeValue`]: the trade would push the basket outside
///   the solver's safe range.
/// - [`AmmError::Slippage`]: the output is below the caller's minimum.
pub trait SwapPool {
    /// Number of coins in the basket.
    #[must_use]
    fn n_coins(&self) -> usize;

    /// Fee currently charged on exchanges, derived from the basket's
    /// imbalance.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientLiquidity`] if the pool is empty.
    /// - Arithmetic errors on malformed state.
    fn current_fee(&self, state: &PoolState) -> Result<FeeRate, AmmError>;

    /// Amount of coin `j` received for `dx` of coin `i`, net of fees.
    ///
    /// # Errors
    ///
    /// Same as [`quote_exchange`](Self::quote_exchange), minus the
    /// slippage and timestamp checks.
    fn get_dy(&self, state: &PoolState, i: usize, j: usize, dx: U256) -> Result<U256, AmmError>;

    /// Exchanges `dx` of coin `i` for coin `j`.
    ///
    /// # Arguments
    ///
    /// - `min_dy`: smallest acceptable output.
    /// - `now`: current timestamp in seconds, used for the oracle decay.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidCoin`] if `i` or `j` is out of range.
    /// - [`AmmError::InvalidQuantity`] if `i == j` or `dx` is zero.
    /// - [`AmmError::InsufficientLiquidity`] if the pool is empty.
    /// - [`AmmError::NonMonotonicTime`] if `now` precedes the last
    ///   oracle update.
    /// - [`AmmError::Slippage`] if the output is below `min_dy`.
    /// - [`AmmError::Loss`] if the trade would lower the virtual price.
    /// - Solver and arithmetic errors from the invariant.
    fn quote_exchange(
        &self,
        state: &PoolState,
        i: usize,
        j: usize,
        dx: U256,
        min_dy: U256,
        now: u64,
    ) -> Result<ExchangeQuote, AmmError>;
}
