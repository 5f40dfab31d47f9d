//! Value types shared by the pool, its configuration and its callers.
//!
//! - [`Decimals`] lifts native coin amounts into working precision.
//! - [`FeeRate`] expresses fees in `1e-10` units.
//! - [`PoolState`] is the persisted pool value.
//! - The quote types pair settlement amounts with a successor state.

mod decimals;
mod fee_rate;
mod pool_state;
mod quote;

pub use decimals::Decimals;
pub use fee_rate::{FeeRate, FEE_DENOMINATOR};
pub use pool_state::PoolState;
pub use quote::{ClaimQuote, DepositQuote, ExchangeQuote, WithdrawOneQuote, WithdrawQuote};
