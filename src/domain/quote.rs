//! Results of pool operations.
//!
//! Every state-changing operation returns one of these quotes. The quote
//! carries the amounts the custody layer must settle and the successor
//! [`PoolState`] the storage layer must persist; nothing is applied
//! until the caller does both.

use primitive_types::U256;

use super::PoolState;

/// Outcome of an exchange of coin `i` for coin `j`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExchangeQuote {
    /// Amount of coin `j` paid out, net of the fee.
    pub dy: U256,
    /// Fee withheld, in coin `j`.
    pub fee: U256,
    /// State after the exchange.
    pub state: PoolState,
}

/// Outcome of a deposit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DepositQuote {
    /// LP shares minted to the depositor.
    pub minted: U256,
    /// LP shares withheld as the imbalance fee. Zero on the first deposit.
    pub fee: U256,
    /// State after the deposit.
    pub state: PoolState,
}

/// Outcome of a proportional withdrawal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WithdrawQuote {
    /// Per-coin payouts in native decimals.
    pub amounts: Vec<U256>,
    /// State after the withdrawal.
    pub state: PoolState,
}

/// Outcome of a single-coin withdrawal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WithdrawOneQuote {
    /// Payout of the chosen coin.
    pub amount: U256,
    /// State after the withdrawal.
    pub state: PoolState,
}

/// Outcome of an admin-fee claim.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClaimQuote {
    /// LP shares owed to the admin.
    pub payout: U256,
    /// State after the claim.
    pub state: PoolState,
}
