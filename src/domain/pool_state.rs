//! Mutable state of a volatile pool.

use primitive_types::U256;

/// Everything a volatile pool persists between calls.
///
/// A `PoolState` is a plain value. Pool operations borrow it and return a
/// successor inside their quote, so a failed call cannot leave a half
/// updated state behind: the caller still holds the original.
///
/// All quantities are raw `U256` integers:
///
/// | Field | Unit |
/// |-------|------|
/// | `balances` | each coin's own decimals |
/// | `d`, `price_scale`, `price_oracle`, `last_prices` | 18-decimal working precision |
/// | `total_supply`, `pending_admin_shares` | LP shares (18 decimals) |
/// | `xcp_profit`, `xcp_profit_a`, `virtual_price` | 18-decimal ratios |
///
/// Price vectors hold `N − 1` entries: the price of coin `k + 1` in units
/// of coin 0.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolState {
    pub(crate) balances: Vec<U256>,
    pub(crate) d: U256,
    pub(crate) total_supply: U256,
    pub(crate) price_scale: Vec<U256>,
    pub(crate) price_oracle: Vec<U256>,
    pub(crate) last_prices: Vec<U256>,
    pub(crate) last_prices_timestamp: u64,
    pub(crate) xcp_profit: U256,
    pub(crate) xcp_profit_a: U256,
    pub(crate) virtual_price: U256,
    pub(crate) not_adjusted: bool,
    pub(crate) pending_admin_shares: U256,
}

impl PoolState {
    /// Empty state with every price vector set to `initial_prices`.
    pub(crate) fn empty(n_coins: usize, initial_prices: &[U256], now: u64) -> Self {
        let one = crate::math::PRECISION;
        Self {
            balances: vec![U256::zero(); n_coins],
            d: U256::zero(),
            total_supply: U256::zero(),
            price_scale: initial_prices.to_vec(),
            price_oracle: initial_prices.to_vec(),
            last_prices: initial_prices.to_vec(),
            last_prices_timestamp: now,
            xcp_profit: one,
            xcp_profit_a: one,
            virtual_price: U256::zero(),
            not_adjusted: false,
            pending_admin_shares: U256::zero(),
        }
    }

    /// Number of coins.
    #[must_use]
    pub fn n_coins(&self) -> usize {
        self.balances.len()
    }

    /// Coin balances in native decimals.
    #[must_use]
    pub fn balances(&self) -> &[U256] {
        &self.balances
    }

    /// Invariant `D` at the current price scale.
    #[must_use]
    pub const fn d(&self) -> U256 {
        self.d
    }

    /// Outstanding LP shares.
    #[must_use]
    pub const fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Internal reference prices used to normalize balances.
    #[must_use]
    pub fn price_scale(&self) -> &[U256] {
        &self.price_scale
    }

    /// EMA of `last_prices`.
    #[must_use]
    pub fn price_oracle(&self) -> &[U256] {
        &self.price_oracle
    }

    /// Most recently observed marginal prices.
    #[must_use]
    pub fn last_prices(&self) -> &[U256] {
        &self.last_prices
    }

    /// Timestamp of the last oracle update.
    #[must_use]
    pub const fn last_prices_timestamp(&self) -> u64 {
        self.last_prices_timestamp
    }

    /// Cumulative profit per share, starting at `1e18`.
    #[must_use]
    pub const fn xcp_profit(&self) -> U256 {
        self.xcp_profit
    }

    /// Profit checkpoint at the last admin-fee realization.
    #[must_use]
    pub const fn xcp_profit_a(&self) -> U256 {
        self.xcp_profit_a
    }

    /// Stored virtual price; zero before the first deposit.
    #[must_use]
    pub const fn virtual_price(&self) -> U256 {
        self.virtual_price
    }

    /// `true` while the pool has profit headroom to repeg.
    #[must_use]
    pub const fn not_adjusted(&self) -> bool {
        self.not_adjusted
    }

    /// LP shares minted for the admin and not yet claimed.
    #[must_use]
    pub const fn pending_admin_shares(&self) -> U256 {
        self.pending_admin_shares
    }

    /// `true` if no LP shares are outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_supply.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::PRECISION;

    #[test]
    fn empty_state() {
        let price = U256::from(1_500u64) * PRECISION;
        let st = PoolState::empty(2, &[price], 42);
        assert_eq!(st.n_coins(), 2);
        assert!(st.is_empty());
        assert!(st.balances().iter().all(U256::is_zero));
        assert_eq!(st.price_scale(), &[price]);
        assert_eq!(st.price_oracle(), &[price]);
        assert_eq!(st.last_prices(), &[price]);
        assert_eq!(st.last_prices_timestamp(), 42);
        assert_eq!(st.xcp_profit(), PRECISION);
        assert_eq!(st.xcp_profit_a(), PRECISION);
        assert!(st.virtual_price().is_zero());
        assert!(!st.not_adjusted());
        assert!(st.pending_admin_shares().is_zero());
    }
}
