//! # Volatile AMM
//!
//! Fixed-point core of a multi-asset AMM for volatile assets in the
//! Curve tricrypto style.
//!
//! This crate provides the invariant solver, the dynamic fee, an EMA price
//! oracle and profit-gated repegging for pools of 2 to 8 coins. All
//! quantities are [`U256`](primitive_types::U256) with 18-decimal fixed
//! point, and every operation is a pure function of an immutable pool and
//! a [`PoolState`](domain::PoolState) value.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `serde` | no | `Serialize`/`Deserialize` for configs, states and quotes |
//!
//! # Quick Start
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! volatile-amm = "0.1"
//! ```
//!
//! ## Create a pool, seed it and swap
//!
//! ```rust
//! use primitive_types::U256;
//! use volatile_amm::config::{FeeParams, InvariantParams, RepegParams, VolatileConfig};
//! use volatile_amm::domain::{Decimals, FeeRate};
//! use volatile_amm::pools::VolatilePool;
//! use volatile_amm::traits::{FromConfig, LiquidityPool, SwapPool};
//!
//! let wad = |v: u64| U256::from(v) * U256::exp10(18);
//! let usdc = |v: u64| U256::from(v) * U256::exp10(6);
//!
//! // 1. USDC / ETH pool, ETH starting at 1500 USDC
//! let config = VolatileConfig::new(
//!     vec![Decimals::new(6).expect("valid"), Decimals::new(18).expect("valid")],
//!     vec![wad(1_500)],
//!     InvariantParams { ann: U256::from(36_450_000u64), gamma: U256::from(70_000_000_000_000u64) },
//!     FeeParams {
//!         mid_fee: FeeRate::new(4_000_000),  // 0.04%
//!         out_fee: FeeRate::new(40_000_000), // 0.4%
//!         fee_gamma: U256::exp10(16),
//!         admin_fee: FeeRate::new(2_000_000_000),
//!     },
//!     RepegParams {
//!         allowed_extra_profit: U256::from(2_000_000_000_000u64),
//!         adjustment_step: U256::from(1_500_000_000_000_000u64),
//!         ma_half_time: 600_000,
//!     },
//! )
//! .expect("valid config");
//! let pool = VolatilePool::from_config(&config).expect("pool created");
//!
//! // 2. Seed it
//! let seeded = pool
//!     .quote_deposit(&pool.genesis(100), &[usdc(4_500), wad(3)], U256::zero(), 100)
//!     .expect("deposit");
//!
//! // 3. Sell 500 USDC for ETH
//! let quote = pool
//!     .quote_exchange(&seeded.state, 0, 1, usdc(500), U256::zero(), 101)
//!     .expect("swap");
//!
//! assert!(!quote.dy.is_zero());
//! assert!(quote.state.virtual_price() >= seeded.state.virtual_price());
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Consumer    │  holds PoolState, applies quotes it accepts
//! └──────┬───────┘
//!        │ quote_*(&state, …)
//!        ▼
//! ┌──────────────┐
//! │ VolatilePool  │  immutable config + precisions
//! └──────┬───────┘
//!        │ fee, oracle, repeg, admin settlement
//!        ▼
//! ┌──────────────┐
//! │     Math      │  compute_d, compute_y, geometric_mean, halfpow
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`PoolState`](domain::PoolState), [`FeeRate`](domain::FeeRate), [`Decimals`](domain::Decimals) and quotes |
//! | [`traits`] | Core abstractions: [`SwapPool`](traits::SwapPool), [`LiquidityPool`](traits::LiquidityPool), [`FromConfig`](traits::FromConfig) |
//! | [`config`] | Validated pool blueprint: [`VolatileConfig`](config::VolatileConfig) |
//! | [`pools`]  | [`VolatilePool`](pools::VolatilePool) |
//! | [`math`]   | Checked `U256` arithmetic and the invariant solvers |
//! | [`error`]  | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |

pub mod config;
pub mod domain;
pub mod error;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod traits;
