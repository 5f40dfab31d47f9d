//! Shared pool builders for unit and property tests.

#![allow(clippy::panic)]

use primitive_types::U256;

use super::VolatilePool;
use crate::config::{AdminFeeSettlement, FeeParams, InvariantParams, RepegParams, VolatileConfig};
use crate::domain::{Decimals, FeeRate, PoolState};
use crate::math::PRECISION;
use crate::traits::{FromConfig, LiquidityPool, SwapPool};

pub(crate) fn u(s: &str) -> U256 {
    let Ok(v) = U256::from_dec_str(s) else {
        panic!("bad decimal literal {s}");
    };
    v
}

pub(crate) fn wad(units: u64) -> U256 {
    U256::from(units) * PRECISION
}

/// `units` of a 6-decimal coin.
pub(crate) fn usdc(units: u64) -> U256 {
    U256::from(units) * U256::exp10(6)
}

fn decimals(d: &[u8]) -> Vec<Decimals> {
    d.iter()
        .map(|&v| {
            let Ok(dec) = Decimals::new(v) else {
                panic!("valid decimals");
            };
            dec
        })
        .collect()
}

fn build(coins: &[u8], prices: Vec<U256>, settlement: AdminFeeSettlement) -> VolatilePool {
    let Ok(cfg) = VolatileConfig::new(
        decimals(coins),
        prices,
        InvariantParams {
            ann: U256::from(36_450_000u64),
            gamma: U256::from(70_000_000_000_000u64),
        },
        FeeParams {
            mid_fee: FeeRate::new(4_000_000),
            out_fee: FeeRate::new(40_000_000),
            fee_gamma: U256::exp10(16),
            admin_fee: FeeRate::new(2_000_000_000),
        },
        RepegParams {
            allowed_extra_profit: U256::from(2_000_000_000_000u64),
            adjustment_step: U256::from(1_500_000_000_000_000u64),
            ma_half_time: 600_000,
        },
    ) else {
        panic!("valid config");
    };
    let Ok(pool) = VolatilePool::from_config(&cfg.with_admin_fee_settlement(settlement)) else {
        panic!("valid pool");
    };
    pool
}

/// USDC / ETH at 1500.
pub(crate) fn eth_pool() -> VolatilePool {
    build(&[6, 18], vec![wad(1_500)], AdminFeeSettlement::OnRepeg)
}

pub(crate) fn eth_pool_on_claim() -> VolatilePool {
    build(&[6, 18], vec![wad(1_500)], AdminFeeSettlement::OnClaim)
}

/// USDC / BTC / ETH at 47 500 and 1500.
pub(crate) fn tri_pool() -> VolatilePool {
    build(
        &[6, 18, 18],
        vec![wad(47_500), wad(1_500)],
        AdminFeeSettlement::OnRepeg,
    )
}

pub(crate) fn tri_pool_on_claim() -> VolatilePool {
    build(
        &[6, 18, 18],
        vec![wad(47_500), wad(1_500)],
        AdminFeeSettlement::OnClaim,
    )
}

pub(crate) fn deposit(pool: &VolatilePool, st: &PoolState, amounts: &[U256], now: u64) -> PoolState {
    let Ok(q) = pool.quote_deposit(st, amounts, U256::zero(), now) else {
        panic!("deposit failed");
    };
    q.state
}

pub(crate) fn exchange(
    pool: &VolatilePool,
    st: &PoolState,
    i: usize,
    j: usize,
    dx: U256,
    now: u64,
) -> PoolState {
    let Ok(q) = pool.quote_exchange(st, i, j, dx, U256::zero(), now) else {
        panic!("exchange failed");
    };
    q.state
}

/// 2-coin pool after `[4500 USDC, 3 ETH]` at t = 100.
pub(crate) fn seeded_eth_pool(pool: &VolatilePool) -> PoolState {
    deposit(pool, &pool.genesis(100), &[usdc(4_500), wad(3)], 100)
}

/// 3-coin pool after `[150 000 USDC, 3 BTC, 100 ETH]` at t = 100.
pub(crate) fn seeded_tri_pool(pool: &VolatilePool) -> PoolState {
    deposit(
        pool,
        &pool.genesis(100),
        &[usdc(150_000), wad(3), wad(100)],
        100,
    )
}
