//! Volatile pool example (Curve tricrypto style).
//!
//! Demonstrates building a USDC / ETH pool, seeding it, trading against it,
//! and adding and removing liquidity, including single-sided moves.
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=volatile_amm=debug cargo run --example volatile_pool
//! ```

use primitive_types::U256;
use tracing_subscriber::EnvFilter;
use volatile_amm::config::{FeeParams, InvariantParams, RepegParams, VolatileConfig};
use volatile_amm::domain::{Decimals, FeeRate};
use volatile_amm::pools::VolatilePool;
use volatile_amm::traits::{FromConfig, LiquidityPool, SwapPool};

fn wad(v: u64) -> U256 {
    U256::from(v) * U256::exp10(18)
}

fn usdc(v: u64) -> U256 {
    U256::from(v) * U256::exp10(6)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Volatile Pool (USDC / ETH) ===\n");

    // ── 1. Configure the pool ───────────────────────────────────────────
    //    Coin 0 is the quote coin; ETH starts at 1500 USDC.
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
    )?;
    let pool = VolatilePool::from_config(&config)?;
    println!(
        "Fees: mid {} / out {}, admin share {}",
        config.fees().mid_fee,
        config.fees().out_fee,
        config.fees().admin_fee
    );

    // ── 2. Seed with 4500 USDC + 3 ETH ──────────────────────────────────
    let seed = pool.quote_deposit(&pool.genesis(100), &[usdc(4_500), wad(3)], U256::zero(), 100)?;
    let mut state = seed.state;
    println!("\nSeeded: minted {} LP, D = {}", seed.minted, state.d());
    println!("Current fee: {}", pool.current_fee(&state)?);

    // ── 3. Swap 500 USDC for ETH ────────────────────────────────────────
    let preview = pool.get_dy(&state, 0, 1, usdc(500))?;
    let swap = pool.quote_exchange(&state, 0, 1, usdc(500), preview, 101)?;
    state = swap.state;
    println!(
        "\nSwap 500 USDC → {} wei ETH (fee {} wei)",
        swap.dy, swap.fee
    );
    println!("Last trade price: {}", state.last_prices()[0]);
    println!("Virtual price:    {}", state.virtual_price());

    // ── 4. Single-sided deposit ─────────────────────────────────────────
    let amounts = [usdc(1_000), U256::zero()];
    let expected = pool.calc_token_amount(&state, &amounts)?;
    let dep = pool.quote_deposit(&state, &amounts, expected, 102)?;
    state = dep.state;
    println!(
        "\nDeposit 1000 USDC only: minted {} LP (imbalance fee {} LP)",
        dep.minted, dep.fee
    );

    // ── 5. Withdraw one coin ────────────────────────────────────────────
    let burn = dep.minted / U256::from(2u8);
    let out = pool.calc_withdraw_one_coin(&state, burn, 1)?;
    let w1 = pool.quote_withdraw_one(&state, burn, 1, out, 103)?;
    state = w1.state;
    println!("\nBurn {burn} LP for ETH only: {} wei", w1.amount);

    // ── 6. Proportional withdrawal ──────────────────────────────────────
    let burn = state.total_supply() / U256::from(4u8);
    let wd = pool.quote_withdraw(&state, burn, &[U256::zero(), U256::zero()])?;
    state = wd.state;
    println!(
        "\nBurn a quarter of supply: {} USDC units, {} wei ETH",
        wd.amounts[0], wd.amounts[1]
    );

    // ── 7. Summary ──────────────────────────────────────────────────────
    println!("\n--- Final state ---");
    println!("Balances:      {:?}", state.balances());
    println!("LP supply:     {}", state.total_supply());
    println!("Price scale:   {}", state.price_scale()[0]);
    println!("Price oracle:  {}", state.price_oracle()[0]);
    println!("LP price:      {}", pool.lp_price(&state)?);

    Ok(())
}
