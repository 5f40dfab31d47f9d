//! Admin-fee realization.
//!
//! The admin is owed `admin_fee` of the profit accrued since the last
//! checkpoint, `xcp_profit − xcp_profit_a`. Half of that profit backs the
//! LPs' virtual price and half is headroom for repegging, so the admin
//! share is taken as
//!
//! ```text
//! fees   = (xcp_profit − xcp_profit_a) · admin_fee / 2e10
//! minted = supply · (vp / (vp − fees) − 1)
//! ```
//!
//! LP shares worth `fees` of virtual price are minted for the admin and
//! `xcp_profit` drops by `2 · fees`.

use primitive_types::U256;
use tracing::info;

use super::VolatilePool;
use crate::domain::{ClaimQuote, PoolState, FEE_DENOMINATOR};
use crate::error::AmmError;
use crate::math::{div, mul, CheckedArithmetic, PRECISION};

impl VolatilePool {
    /// Mints the admin share of unrealized profit, stores `d` and the
    /// resulting virtual price, and moves the checkpoint up to
    /// `xcp_profit`. Returns the shares minted.
    pub(super) fn settle_admin(&self, st: &mut PoolState, d: U256) -> Result<U256, AmmError> {
        let mut minted = U256::zero();
        if st.xcp_profit > st.xcp_profit_a {
            let fees = (st.xcp_profit - st.xcp_profit_a)
                .safe_mul(&self.config.fees().admin_fee.as_u256())?
                .safe_div_u64(2 * FEE_DENOMINATOR)?;
            if !fees.is_zero() {
                let frac = div(st.virtual_price, st.virtual_price.safe_sub(&fees)?)?
                    .safe_sub(&PRECISION)?;
                minted = mul(st.total_supply, frac)?;
                st.total_supply = st.total_supply.safe_add(&minted)?;
                st.xcp_profit = st.xcp_profit.safe_sub(&fees.safe_mul_u64(2)?)?;
                info!(%minted, %fees, xcp_profit = %st.xcp_profit, "admin fees realized");
            }
        }

        st.d = d;
        st.virtual_price = self.virtual_price_at(&st.price_scale, d, st.total_supply)?;
        if st.xcp_profit > st.xcp_profit_a {
            st.xcp_profit_a = st.xcp_profit;
        }
        Ok(minted)
    }

    /// Realizes outstanding fees against the current balances and pays
    /// out everything pending.
    pub(super) fn claim(&self, state: &PoolState) -> Result<ClaimQuote, AmmError> {
        self.check_state(state)?;
        if state.is_empty() {
            return Err(AmmError::InsufficientLiquidity);
        }
        let mut st = state.clone();
        let xp = self.xp(&st.price_scale, &st.balances)?;
        let d = self.solve_d(&xp)?;
        let minted = self.settle_admin(&mut st, d)?;
        let payout = st.pending_admin_shares.safe_add(&minted)?;
        st.pending_admin_shares = U256::zero();
        info!(%payout, "admin fees claimed");
        Ok(ClaimQuote { payout, state: st })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::super::fixtures::{
        eth_pool, eth_pool_on_claim, exchange, seeded_eth_pool, seeded_tri_pool, tri_pool_on_claim, u,
        usdc, wad,
    };
    use super::*;
    use crate::traits::LiquidityPool;

    #[test]
    fn nothing_to_claim_on_fresh_pool() {
        let pool = eth_pool();
        let st = seeded_eth_pool(&pool);
        let Ok(q) = pool.claim_admin_fees(&st) else {
            panic!("expected Ok");
        };
        assert!(q.payout.is_zero());
        assert_eq!(q.state.total_supply(), st.total_supply());
        assert_eq!(q.state.xcp_profit_a(), PRECISION);
    }

    #[test]
    fn claim_on_empty_pool_rejected() {
        let pool = eth_pool();
        assert_eq!(
            pool.claim_admin_fees(&pool.genesis(0)),
            Err(AmmError::InsufficientLiquidity)
        );
    }

    #[test]
    fn claim_mints_share_of_profit() {
        let pool = eth_pool_on_claim();
        let mut st = seeded_eth_pool(&pool);
        for round in 0..20u64 {
            let t = 101 + 44 * round;
            st = exchange(&pool, &st, 1, 0, wad(5), t);
            st = exchange(&pool, &st, 0, 1, usdc(6_700), t + 22);
        }
        assert!(st.xcp_profit() > st.xcp_profit_a());

        let Ok(q) = pool.claim_admin_fees(&st) else {
            panic!("expected Ok");
        };
        assert!(!q.payout.is_zero());
        assert_eq!(q.state.total_supply(), st.total_supply() + q.payout);
        assert_eq!(q.state.xcp_profit(), q.state.xcp_profit_a());
        assert!(q.state.xcp_profit() < st.xcp_profit());
        assert!(q.state.virtual_price() < st.virtual_price());
        assert!(q.state.pending_admin_shares().is_zero());

        // a second claim has nothing left to realize
        let Ok(again) = pool.claim_admin_fees(&q.state) else {
            panic!("expected Ok");
        };
        assert!(again.payout.is_zero());
    }

    #[test]
    fn claim_keeps_balances() {
        let pool = eth_pool_on_claim();
        let st = exchange(&pool, &seeded_eth_pool(&pool), 0, 1, usdc(500), 101);
        let Ok(q) = pool.claim_admin_fees(&st) else {
            panic!("expected Ok");
        };
        assert_eq!(q.state.balances(), st.balances());
        assert_eq!(q.state.price_scale(), st.price_scale());
    }

    #[test]
    fn triple_claim_matches_reference() {
        let pool = tri_pool_on_claim();
        let mut st = seeded_tri_pool(&pool);
        for k in 0..5u64 {
            st = exchange(&pool, &st, 2, 0, wad(40), 101 + 23 * k);
        }
        let Ok(q) = pool.claim_admin_fees(&st) else {
            panic!("expected Ok");
        };
        assert_eq!(q.payout, u("57424578068191008"));
        assert_eq!(q.state.total_supply(), u("355839009027928510369"));
        assert_eq!(q.state.xcp_profit(), u("1001293110581377344"));
        assert_eq!(q.state.virtual_price(), u("1001454749404049511"));
    }
}
