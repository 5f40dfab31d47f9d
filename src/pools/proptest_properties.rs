//! Property-based tests using `proptest` for pool invariant validation.
//!
//! 1. **Invariant bounds**: `D` converges between the constant-product
//!    and constant-sum values of the basket.
//! 2. **Fee bounds**: the dynamic fee stays within `[mid_fee, out_fee]`.
//! 3. **Liquidity conservation**: a proportional deposit burned straight
//!    back returns what went in, less the deposit fee and rounding.
//! 4. **Virtual price monotonicity**: swaps never lower the virtual price
//!    while `price_scale` stays put.
//! 5. **Repeg profit gate**: every accepted repeg keeps half the profit.
//! 6. **Atomicity**: a rejected quote leaves the input state untouched.

use primitive_types::U256;
use proptest::prelude::*;

use crate::domain::{FeeRate, PoolState, FEE_DENOMINATOR};
use crate::math::{compute_d, geometric_mean, PRECISION};
use crate::pools::volatile::fixtures::{
    eth_pool, eth_pool_on_claim, seeded_eth_pool, seeded_tri_pool, tri_pool, usdc, wad,
};
use crate::pools::VolatilePool;
use crate::traits::{LiquidityPool, SwapPool};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const ANN: u64 = 36_450_000;
const GAMMA: u64 = 70_000_000_000_000;

/// Basket of `n` coins whose entries are `x0 · r / 100`.
fn basket(x0: u64, ratios: &[u64]) -> Vec<U256> {
    let x0 = wad(x0);
    let mut xs = vec![x0];
    xs.extend(ratios.iter().map(|r| x0 * U256::from(*r) / U256::from(100u8)));
    xs
}

/// One leg of a swing: USDC in when `buy` is set, ETH in otherwise.
///
/// Once either side holds more than twice the value of the other the
/// leg is turned around, so long runs cannot drain the pool.
fn swing_leg(st: &PoolState, buy: bool, size: u64) -> (usize, usize, U256) {
    let usd = st.balances()[0] * U256::exp10(12);
    let eth = st.balances()[1] * st.price_scale()[0] / PRECISION;
    let two = U256::from(2u8);
    let buy = if usd > eth * two {
        false
    } else if eth > usd * two {
        true
    } else {
        buy
    };
    if buy {
        (0, 1, usdc(size))
    } else {
        (1, 0, wad(size) / U256::from(1_000u16))
    }
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// First entry of a working basket, in whole units.
fn x0_strategy() -> impl Strategy<Value = u64> {
    1u64..=1_000_000u64
}

/// Ratio of another entry to the first, in percent: 10x either way.
fn ratio_strategy() -> impl Strategy<Value = u64> {
    10u64..=1_000u64
}

/// Sequence of `(buy, size, gap)` swing legs.
fn swings_strategy() -> impl Strategy<Value = Vec<(bool, u64, u64)>> {
    prop::collection::vec((any::<bool>(), 100u64..=3_000u64, 1u64..=3_000u64), 5..40)
}

// ---------------------------------------------------------------------------
// Property 1: Invariant bounds
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_d_between_product_and_sum(
        x0 in x0_strategy(),
        ratios in prop::collection::vec(ratio_strategy(), 1..=2),
    ) {
        let xs = basket(x0, &ratios);
        let n = U256::from(xs.len());
        let Ok(d) = compute_d(U256::from(ANN), U256::from(GAMMA), &xs) else {
            return Err(TestCaseError::fail("D did not converge"));
        };
        let Ok(gm) = geometric_mean(&xs) else {
            return Err(TestCaseError::fail("geometric mean failed"));
        };
        let sum = xs.iter().fold(U256::zero(), |acc, x| acc + *x);
        let slack = U256::exp10(6);

        prop_assert!(!d.is_zero());
        prop_assert!(d >= n * gm - n * gm / slack, "D={} below product bound", d);
        prop_assert!(d <= sum + sum / slack, "D={} above sum={}", d, sum);
    }
}

// ---------------------------------------------------------------------------
// Property 2: Fee bounds
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_fee_within_bounds(
        x0 in x0_strategy(),
        ratios in prop::collection::vec(ratio_strategy(), 1..=2),
    ) {
        let pool = if ratios.len() == 1 { eth_pool() } else { tri_pool() };
        let xs = basket(x0, &ratios);
        let Ok(fee) = pool.fee(&xs) else {
            return Err(TestCaseError::fail("fee failed"));
        };
        let fees = pool.config().fees();
        prop_assert!(fee >= fees.mid_fee.as_u256(), "fee={} below mid", fee);
        prop_assert!(fee <= fees.out_fee.as_u256(), "fee={} above out", fee);
    }
}

// ---------------------------------------------------------------------------
// Property 3: Liquidity conservation
// ---------------------------------------------------------------------------

fn assert_roundtrip(pool: &VolatilePool, st: &PoolState, pct: u64) -> Result<(), TestCaseError> {
    let amounts: Vec<U256> = st
        .balances()
        .iter()
        .map(|b| *b * U256::from(pct) / U256::from(100u8))
        .collect();
    let balances: Vec<U256> = st.balances().iter().zip(&amounts).map(|(b, a)| *b + *a).collect();
    let (Ok(xp), Ok(xp_old)) = (
        pool.xp(st.price_scale(), &balances),
        pool.xp(st.price_scale(), st.balances()),
    ) else {
        return Err(TestCaseError::fail("xp failed"));
    };
    let deltas: Vec<U256> = xp.iter().zip(&xp_old).map(|(new, old)| *new - *old).collect();
    let Ok(rate) = pool.calc_token_fee(&deltas, &xp) else {
        return Err(TestCaseError::fail("deposit fee failed"));
    };

    let Ok(dep) = pool.quote_deposit(st, &amounts, U256::zero(), 101) else {
        return Err(TestCaseError::fail("deposit failed"));
    };
    let zeros = vec![U256::zero(); amounts.len()];
    let Ok(wd) = pool.quote_withdraw(&dep.state, dep.minted, &zeros) else {
        return Err(TestCaseError::fail("withdraw failed"));
    };
    let fee_unit = U256::from(FEE_DENOMINATOR);
    for (out, put) in wd.amounts.iter().zip(&amounts) {
        prop_assert!(out <= put, "withdrew {} after depositing {}", out, put);
        // lost at most the deposit fee plus rounding
        let tolerance = *put * (rate + U256::one()) / fee_unit + U256::from(2u8);
        prop_assert!(
            *put - *out <= tolerance,
            "withdrew {} after depositing {} (fee rate {})",
            out,
            put,
            rate
        );
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_deposit_withdraw_roundtrip_pair(pct in 1u64..=1_000u64) {
        let pool = eth_pool();
        assert_roundtrip(&pool, &seeded_eth_pool(&pool), pct)?;
    }

    #[test]
    fn prop_deposit_withdraw_roundtrip_triple(pct in 1u64..=1_000u64) {
        let pool = tri_pool();
        assert_roundtrip(&pool, &seeded_tri_pool(&pool), pct)?;
    }
}

// ---------------------------------------------------------------------------
// Property 4 and 5: Virtual price and repeg gate under swings
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_virtual_price_monotone_between_repegs(swings in swings_strategy()) {
        let pool = eth_pool();
        let mut st = seeded_eth_pool(&pool);
        let mut t = 100u64;
        for (buy, size, gap) in swings {
            t += gap;
            let (i, j, dx) = swing_leg(&st, buy, size);
            let Ok(q) = pool.quote_exchange(&st, i, j, dx, U256::zero(), t) else {
                return Err(TestCaseError::fail("swap failed"));
            };
            if q.state.price_scale() == st.price_scale() {
                prop_assert!(
                    q.state.virtual_price() >= st.virtual_price(),
                    "vp fell from {} to {}",
                    st.virtual_price(),
                    q.state.virtual_price()
                );
            }
            st = q.state;
        }
    }

    #[test]
    fn prop_accepted_repeg_keeps_half_profit(swings in swings_strategy()) {
        // settlement on claim leaves the post-repeg counters untouched
        let pool = eth_pool_on_claim();
        let mut st = seeded_eth_pool(&pool);
        let mut t = 100u64;
        for (buy, size, gap) in swings {
            t += gap;
            let (i, j, dx) = swing_leg(&st, buy, size);
            let Ok(q) = pool.quote_exchange(&st, i, j, dx, U256::zero(), t) else {
                return Err(TestCaseError::fail("swap failed"));
            };
            if q.state.price_scale() != st.price_scale() {
                let vp = q.state.virtual_price();
                prop_assert!(vp > PRECISION);
                prop_assert!(vp * U256::from(2u8) - PRECISION > q.state.xcp_profit());
            }
            st = q.state;
        }
    }
}

// ---------------------------------------------------------------------------
// Property 6: Atomicity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_rejected_quote_is_atomic(size in 1u64..=3_000u64) {
        let pool = eth_pool();
        let st = seeded_eth_pool(&pool);
        let before = st.clone();

        let Ok(dy) = pool.get_dy(&st, 0, 1, usdc(size)) else {
            return Err(TestCaseError::fail("get_dy failed"));
        };
        let result = pool.quote_exchange(&st, 0, 1, usdc(size), dy + U256::one(), 101);
        prop_assert!(result.is_err());
        prop_assert_eq!(&st, &before);

        let result = pool.quote_withdraw_one(&st, st.total_supply(), 0, U256::zero(), 101);
        prop_assert!(result.is_err());
        prop_assert_eq!(&st, &before);
        prop_assert_eq!(pool.current_fee(&st), Ok(FeeRate::new(4_000_000)));
    }
}
