//! Repegging and admin-fee example.
//!
//! Swings the price of ETH back and forth through a USDC / ETH pool until
//! the accumulated profit pays for moving `price_scale` toward the oracle,
//! then claims the admin fees. The same run is replayed with admin fees
//! realized on every repeg and with fees left unrealized until the claim.
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=volatile_amm=info cargo run --example repeg_walkthrough
//! ```

use primitive_types::U256;
use tracing_subscriber::EnvFilter;
use volatile_amm::config::{
    AdminFeeSettlement, FeeParams, InvariantParams, RepegParams, VolatileConfig,
};
use volatile_amm::domain::{Decimals, FeeRate, PoolState};
use volatile_amm::pools::VolatilePool;
use volatile_amm::traits::{FromConfig, LiquidityPool, SwapPool};

const ROUNDS: usize = 1_000;

fn wad(v: u64) -> U256 {
    U256::from(v) * U256::exp10(18)
}

fn usdc(v: u64) -> U256 {
    U256::from(v) * U256::exp10(6)
}

fn build(settlement: AdminFeeSettlement) -> Result<VolatilePool, Box<dyn std::error::Error>> {
    let config = VolatileConfig::new(
        vec![Decimals::new(6)?, Decimals::new(18)?],
        vec![wad(1_500)],
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
    )?
    .with_admin_fee_settlement(settlement);
    Ok(VolatilePool::from_config(&config)?)
}

fn report(label: &str, state: &PoolState) {
    println!("  {label}");
    println!("    price_scale  = {}", state.price_scale()[0]);
    println!("    price_oracle = {}", state.price_oracle()[0]);
    println!("    virtual      = {}", state.virtual_price());
    println!("    xcp_profit   = {}", state.xcp_profit());
    println!("    xcp_profit_a = {}", state.xcp_profit_a());
    println!("    pending LP   = {}", state.pending_admin_shares());
}

fn run(settlement: AdminFeeSettlement) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n=== Admin fees settled {settlement:?} ===");
    let pool = build(settlement)?;

    let seed = pool.quote_deposit(&pool.genesis(100), &[usdc(4_500), wad(3)], U256::zero(), 100)?;
    let mut state = seed.state;
    let mut t = 100u64;

    // ── Swing: sell 5 ETH, then buy it back with 6700 USDC ─────────────
    for round in 0..ROUNDS {
        for (i, j, dx) in [(1, 0, wad(5)), (0, 1, usdc(6_700))] {
            t += 1;
            let q = pool.quote_exchange(&state, i, j, dx, U256::zero(), t)?;
            if q.state.price_scale() != state.price_scale() {
                println!(
                    "  round {round:>4}: repeg {} → {}",
                    state.price_scale()[0],
                    q.state.price_scale()[0]
                );
            }
            state = q.state;
            t += 21;
        }
    }
    report("after swings:", &state);

    // ── Claim ───────────────────────────────────────────────────────────
    let claim = pool.claim_admin_fees(&state)?;
    println!("  claimed {} LP for the admin", claim.payout);
    report("after claim:", &claim.state);

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    run(AdminFeeSettlement::OnRepeg)?;
    run(AdminFeeSettlement::OnClaim)?;
    Ok(())
}
