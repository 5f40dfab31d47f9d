//! Pool configuration.
//!
//! [`VolatileConfig`] is the declarative blueprint of a volatile pool:
//! the coin basket, the initial prices and the four parameter groups.
//! It is validated on construction and immutable afterwards.

mod volatile;

pub use volatile::{
    AdminFeeSettlement, FeeParams, InvariantParams, RepegParams, VolatileConfig, MAX_COINS,
    MAX_FEE, MAX_MA_HALF_TIME, MIN_FEE,
};
