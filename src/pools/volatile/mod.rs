//! Volatile (cryptoswap) pool for baskets of freely floating assets.
//!
//! Unlike a stableswap pool, a volatile pool does not assume its coins
//! trade at par. Balances are first normalized by an internal
//! `price_scale`, and the invariant is concentrated around that scale.
//! The scale follows an EMA of observed prices, but only when the pool
//! has earned enough fee profit to pay for the move.
//!
//! # Invariant
//!
//! ```text
//! K0 = N^N · ∏ x_i / D^N
//! K  = A · K0 · γ² / (γ + 1 − K0)²
//! K · D^(N−1) · Σ x_i + ∏ x_i = K · D^N + (D/N)^N
//! ```
//!
//! where `x_0 = b_0 · prec_0` and `x_k = b_k · prec_k · price_scale_{k−1}`.
//!
//! # Operation Pipeline
//!
//! 1. Validate indices, amounts and the timestamp.
//! 2. Solve for `D` or `y` on the normalized basket.
//! 3. Apply the dynamic fee.
//! 4. Update the oracle, record the observed price and the profit, and
//!    attempt a repeg (`tweak_price`).
//! 5. Return the amounts together with the successor state.
//!
//! # Modules
//!
//! | File | Concern |
//! |------|---------|
//! | `fee.rs` | Dynamic fee and deposit imbalance fee |
//! | `oracle.rs` | EMA, observed prices, profit tracking and repeg |
//! | `exchange.rs` | [`SwapPool`](crate::traits::SwapPool) |
//! | `liquidity.rs` | [`LiquidityPool`](crate::traits::LiquidityPool) |
//! | `admin.rs` | Admin-fee realization |

mod admin;
mod exchange;
mod fee;
mod liquidity;
mod oracle;

#[cfg(test)]
pub(crate) mod fixtures;

use primitive_types::U256;

use crate::config::{InvariantParams, VolatileConfig};
use crate::domain::PoolState;
use crate::error::AmmError;
use crate::math::{
    compute_d, compute_y, div, geometric_mean, mul, CheckedArithmetic, PRECISION,
};
use crate::traits::FromConfig;

/// Immutable description of a volatile pool.
///
/// Holds the validated configuration and the per-coin precision
/// multipliers. All mutable data lives in [`PoolState`].
///
/// # Examples
///
/// ```
/// use primitive_types::U256;
/// use volatile_amm::config::{FeeParams, InvariantParams, RepegParams, VolatileConfig};
/// use volatile_amm::domain::{Decimals, FeeRate};
/// use volatile_amm::pools::VolatilePool;
/// use volatile_amm::traits::{FromConfig, LiquidityPool};
///
/// let config = VolatileConfig::new(
///     vec![Decimals::new(6).expect("valid"), Decimals::new(18).expect("valid")],
///     vec![U256::from(1_500u64) * U256::exp10(18)],
///     InvariantParams { ann: U256::from(36_450_000u64), gamma: U256::from(70_000_000_000_000u64) },
///     FeeParams {
///         mid_fee: FeeRate::new(4_000_000),
///         out_fee: FeeRate::new(40_000_000),
///         fee_gamma: U256::exp10(16),
///         admin_fee: FeeRate::new(2_000_000_000),
///     },
///     RepegParams {
///         allowed_extra_profit: U256::from(2_000_000_000_000u64),
///         adjustment_step: U256::from(1_500_000_000_000_000u64),
///         ma_half_time: 600_000,
///     },
/// )
/// .expect("valid config");
///
/// let pool = VolatilePool::from_config(&config).expect("valid pool");
/// let state = pool.genesis(100);
/// let amounts = [U256::from(4_500_000_000u64), U256::from(3u64) * U256::exp10(18)];
/// let quote = pool.quote_deposit(&state, &amounts, U256::zero(), 100).expect("deposit");
/// assert_eq!(quote.minted, U256::from_dec_str("116189500386222506555").expect("number"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolatilePool {
    config: VolatileConfig,
    precisions: Vec<U256>,
}

impl FromConfig<VolatileConfig> for VolatilePool {
    /// Builds the pool after revalidating the configuration.
    ///
    /// # Errors
    ///
    /// Any error of [`VolatileConfig::validate`].
    fn from_config(config: &VolatileConfig) -> Result<Self, AmmError> {
        config.validate()?;
        let precisions = config
            .coins()
            .iter()
            .map(|d| d.precision_multiplier())
            .collect();
        Ok(Self {
            config: config.clone(),
            precisions,
        })
    }
}

impl VolatilePool {
    /// The pool configuration.
    #[must_use]
    pub const fn config(&self) -> &VolatileConfig {
        &self.config
    }

    /// Per-coin multipliers `10^(18 − decimals)`.
    #[must_use]
    pub fn precisions(&self) -> &[U256] {
        &self.precisions
    }

    /// Empty state for a freshly created pool.
    ///
    /// Price scale, oracle and last prices start at the configured
    /// initial prices; both profit counters start at `1e18`.
    #[must_use]
    pub fn genesis(&self, now: u64) -> PoolState {
        PoolState::empty(self.n(), self.config.initial_prices(), now)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    fn n(&self) -> usize {
        self.precisions.len()
    }

    fn invariant(&self) -> InvariantParams {
        self.config.invariant()
    }

    /// Rejects a state whose vectors do not match the basket.
    pub(crate) fn check_state(&self, state: &PoolState) -> Result<(), AmmError> {
        let n = self.n();
        if state.balances.len() != n
            || state.price_scale.len() != n - 1
            || state.price_oracle.len() != n - 1
            || state.last_prices.len() != n - 1
        {
            return Err(AmmError::InvalidQuantity("state does not match pool arity"));
        }
        Ok(())
    }

    pub(crate) fn check_coin(&self, i: usize) -> Result<(), AmmError> {
        if i >= self.n() {
            return Err(AmmError::InvalidCoin {
                index: i,
                n_coins: self.n(),
            });
        }
        Ok(())
    }

    pub(crate) fn check_amounts(&self, amounts: &[U256]) -> Result<(), AmmError> {
        if amounts.len() != self.n() {
            return Err(AmmError::InvalidQuantity("expected one amount per coin"));
        }
        Ok(())
    }

    pub(crate) fn check_time(state: &PoolState, now: u64) -> Result<(), AmmError> {
        if now < state.last_prices_timestamp {
            return Err(AmmError::NonMonotonicTime {
                now,
                last: state.last_prices_timestamp,
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Normalization
    // -----------------------------------------------------------------------

    /// Lifts native balances into the price-scaled working basket.
    pub(crate) fn xp(&self, price_scale: &[U256], balances: &[U256]) -> Result<Vec<U256>, AmmError> {
        let mut xp = Vec::with_capacity(balances.len());
        for (k, (b, prec)) in balances.iter().zip(&self.precisions).enumerate() {
            if k == 0 {
                xp.push(b.safe_mul(prec)?);
            } else {
                xp.push(mul(b.safe_mul(&price_scale[k - 1])?, *prec)?);
            }
        }
        Ok(xp)
    }

    /// Constant-product value of a balanced basket of size `d` at
    /// `price_scale`.
    pub(crate) fn get_xcp(&self, price_scale: &[U256], d: U256) -> Result<U256, AmmError> {
        let n = self.n() as u64;
        let mut x = Vec::with_capacity(self.n());
        x.push(d.safe_div_u64(n)?);
        for p in price_scale {
            x.push(div(d, p.safe_mul_u64(n)?)?);
        }
        geometric_mean(&x)
    }

    /// `1e18 · xcp(d) / supply`.
    pub(crate) fn virtual_price_at(
        &self,
        price_scale: &[U256],
        d: U256,
        supply: U256,
    ) -> Result<U256, AmmError> {
        PRECISION
            .safe_mul(&self.get_xcp(price_scale, d)?)?
            .safe_div(&supply)
    }

    pub(crate) fn solve_d(&self, xp: &[U256]) -> Result<U256, AmmError> {
        let inv = self.invariant();
        compute_d(inv.ann, inv.gamma, xp)
    }

    pub(crate) fn solve_y(&self, xp: &[U256], d: U256, i: usize) -> Result<U256, AmmError> {
        let inv = self.invariant();
        compute_y(inv.ann, inv.gamma, xp, d, i)
    }
}
