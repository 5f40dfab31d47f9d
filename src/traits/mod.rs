//! Core trait abstractions for pool operations.
//!
//! This module defines the traits a pool satisfies: [`SwapPool`] for
//! exchanges, [`LiquidityPool`] for LP share accounting, and
//! [`FromConfig`] for configuration-driven construction.

mod from_config;
mod liquidity_pool;
mod swap_pool;

pub use from_config::FromConfig;
pub use liquidity_pool::LiquidityPool;
pub use swap_pool::SwapPool;
