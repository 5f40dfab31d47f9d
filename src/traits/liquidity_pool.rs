//! Liquidity management trait extending [`SwapPool`].
//!
//! [`LiquidityPool`] adds LP share accounting on top of the exchange
//! operations of [`SwapPool`]: deposits, proportional and single-coin
//! withdrawals, their read-only previews, and the admin-fee claim.
//!
//! # Share Accounting
//!
//! LP shares track the pool's invariant `D` at the current price scale.
//! A deposit that grows `D` by a factor `r` mints `supply · (r − 1)`
//! shares, less an imbalance fee. The very first deposit (and the first
//! deposit after every share has been burned) mints the constant-product
//! value of the basket, `xcp(D) = geometric_mean(D/N, D/(N·p_k)…)`.
//!
//! # Virtual Price
//!
//! ```text
//! virtual_price = 1e18 · xcp(D) / total_supply
//! ```
//!
//! It only rises through fees and only falls through admin-fee
//! realization, which mints new shares.

use primitive_types::U256;

use super::SwapPool;
use crate::domain::{ClaimQuote, DepositQuote, PoolState, WithdrawOneQuote, WithdrawQuote};
use crate::error::AmmError;

/// Liquidity provision for multi-coin pools.
///
/// # Errors
///
/// Methods that can fail return [`Result<T, AmmError>`]. Common error
/// variants include:
///
/// - [`AmmError::InvalidQuantity`]: wrong amount vector length, a zero
///   deposit or a zero burn.
/// - [`AmmError::InsufficientLiquidity`]: burning more than the supply.
/// - [`AmmError::Slippage`]: output below the caller's minimum.
pub trait LiquidityPool: SwapPool {
    /// Deposits `amounts` (one entry per coin, native decimals).
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] if `amounts` has the wrong length,
    ///   is all zero, or mints no shares.
    /// - [`AmmError::ZeroReserve`] if the first deposit leaves a coin
    ///   empty.
    /// - [`AmmError::NonMonotonicTime`] if `now` precedes the last
    ///   oracle update.
    /// - [`AmmError::Slippage`] if fewer than `min_mint` shares result.
    fn quote_deposit(
        &self,
        state: &PoolState,
        amounts: &[U256],
        min_mint: U256,
        now: u64,
    ) -> Result<DepositQuote, AmmError>;

    /// Burns `burn` shares for a pro-rata slice of every balance.
    ///
    /// Leaves the oracle untouched.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] if `burn` is zero or
    ///   `min_amounts` has the wrong length.
    /// - [`AmmError::InsufficientLiquidity`] if `burn` exceeds the supply.
    /// - [`AmmError::Slippage`] if any payout is below its minimum.
    fn quote_withdraw(
        &self,
        state: &PoolState,
        burn: U256,
        min_amounts: &[U256],
    ) -> Result<WithdrawQuote, AmmError>;

    /// Burns `burn` shares for coin `i` only.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidCoin`] if `i` is out of range.
    /// - [`AmmError::InvalidQuantity`] if `burn` is zero.
    /// - [`AmmError::InsufficientLiquidity`] unless `burn` is below the
    ///   supply.
    /// - [`AmmError::NonMonotonicTime`] if `now` precedes the last
    ///   oracle update.
    /// - [`AmmError::Slippage`] if the payout is below `min_amount`.
    fn quote_withdraw_one(
        &self,
        state: &PoolState,
        burn: U256,
        i: usize,
        min_amount: U256,
        now: u64,
    ) -> Result<WithdrawOneQuote, AmmError>;

    /// Shares a deposit of `amounts` would mint, net of fees.
    ///
    /// # Errors
    ///
    /// Same as [`quote_deposit`](Self::quote_deposit), minus the
    /// slippage and timestamp checks.
    fn calc_token_amount(&self, state: &PoolState, amounts: &[U256]) -> Result<U256, AmmError>;

    /// Payout of burning `burn` shares for coin `i`.
    ///
    /// # Errors
    ///
    /// Same as [`quote_withdraw_one`](Self::quote_withdraw_one), minus
    /// the slippage and timestamp checks.
    fn calc_withdraw_one_coin(
        &self,
        state: &PoolState,
        burn: U256,
        i: usize,
    ) -> Result<U256, AmmError>;

    /// Realizes outstanding admin fees and pays out every pending admin
    /// share.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientLiquidity`] if the pool is empty.
    /// - Solver errors from recomputing `D`.
    fn claim_admin_fees(&self, state: &PoolState) -> Result<ClaimQuote, AmmError>;

    /// Virtual price recomputed from the stored `D` and price scale.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientLiquidity`] if the pool is empty.
    fn current_virtual_price(&self, state: &PoolState) -> Result<U256, AmmError>;
}
