//! Convenience re-exports for common types and traits.
//!
//! The prelude provides a single import to bring all commonly used items
//! into scope:
//!
//! ```rust
//! use volatile_amm::prelude::*;
//! ```

pub use crate::domain::{
    ClaimQuote, Decimals, DepositQuote, ExchangeQuote, FeeRate, PoolState, WithdrawOneQuote,
    WithdrawQuote,
};

pub use crate::traits::{FromConfig, LiquidityPool, SwapPool};

pub use crate::math::CheckedArithmetic;

pub use crate::config::{
    AdminFeeSettlement, FeeParams, InvariantParams, RepegParams, VolatileConfig,
};

pub use crate::error::{AmmError, Result};

pub use crate::pools::VolatilePool;
