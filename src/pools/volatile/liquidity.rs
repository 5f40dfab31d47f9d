//! [`LiquidityPool`] for [`VolatilePool`].
//!
//! # Deposits
//!
//! ```text
//! minted = supply · D_new / D_old − supply
//! fee    = deposit_fee(Δxp) · minted / 1e10 + 1
//! ```
//!
//! An empty pool (fresh, or fully burned) mints `xcp(D_new)` and resets
//! the profit counters instead.
//!
//! # Withdrawals
//!
//! A proportional withdrawal pays `balance · (burn − 1) / supply` of every
//! coin and does not touch the oracle. A single-coin withdrawal shrinks
//! `D` by the burned share less half the current fee and solves for the
//! one balance that restores it.

use primitive_types::U256;
use tracing::debug;

use super::oracle::{Observed, MIN_OBSERVABLE};
use super::VolatilePool;
use crate::domain::{ClaimQuote, DepositQuote, PoolState, WithdrawOneQuote, WithdrawQuote, FEE_DENOMINATOR};
use crate::error::AmmError;
use crate::math::{CheckedArithmetic, PRECISION};
use crate::traits::LiquidityPool;

/// Priced deposit before the oracle update.
struct DepositPlan {
    minted: U256,
    fee: U256,
    d: U256,
    balances: Vec<U256>,
    xp: Vec<U256>,
    /// Index of the only non-zero amount, if exactly one.
    single: Option<usize>,
}

/// Priced single-coin withdrawal before the oracle update.
struct WithdrawOnePlan {
    dy: U256,
    d: U256,
    /// `D` drop attributed to the burned shares, before fees.
    d_share: U256,
    xp: Vec<U256>,
}

impl VolatilePool {
    fn plan_deposit(&self, st: &PoolState, amounts: &[U256]) -> Result<DepositPlan, AmmError> {
        self.check_state(st)?;
        self.check_amounts(amounts)?;
        if amounts.iter().all(U256::is_zero) {
            return Err(AmmError::InvalidQuantity("deposit must include at least one coin"));
        }

        let mut balances = Vec::with_capacity(self.n());
        for (b, a) in st.balances.iter().zip(amounts) {
            balances.push(b.safe_add(a)?);
        }
        let xp = self.xp(&st.price_scale, &balances)?;
        let xp_old = self.xp(&st.price_scale, &st.balances)?;
        let mut deltas = Vec::with_capacity(self.n());
        for (new, old) in xp.iter().zip(&xp_old) {
            deltas.push(new.safe_sub(old)?);
        }

        let mut nonzero = amounts.iter().enumerate().filter(|(_, a)| !a.is_zero());
        let single = match (nonzero.next(), nonzero.next()) {
            (Some((ix, _)), None) => Some(ix),
            _ => None,
        };

        let d = self.solve_d(&xp)?;

        if st.is_empty() {
            let minted = self.get_xcp(&st.price_scale, d)?;
            return Ok(DepositPlan {
                minted,
                fee: U256::zero(),
                d,
                balances,
                xp,
                single,
            });
        }

        let gross = st
            .total_supply
            .safe_mul(&d)?
            .safe_div(&st.d)?
            .safe_sub(&st.total_supply)?;
        let fee = self
            .calc_token_fee(&deltas, &xp)?
            .safe_mul(&gross)?
            .safe_div_u64(FEE_DENOMINATOR)?
            .safe_add(&U256::one())?;
        if gross <= fee {
            return Err(AmmError::InvalidQuantity("deposit too small to mint shares"));
        }
        Ok(DepositPlan {
            minted: gross - fee,
            fee,
            d,
            balances,
            xp,
            single,
        })
    }

    fn check_burn(st: &PoolState, burn: U256) -> Result<(), AmmError> {
        if burn.is_zero() {
            return Err(AmmError::InvalidQuantity("burn amount must be positive"));
        }
        if burn > st.total_supply {
            return Err(AmmError::InsufficientLiquidity);
        }
        Ok(())
    }

    fn plan_withdraw_one(
        &self,
        st: &PoolState,
        burn: U256,
        i: usize,
    ) -> Result<WithdrawOnePlan, AmmError> {
        self.check_state(st)?;
        self.check_coin(i)?;
        Self::check_burn(st, burn)?;
        if burn == st.total_supply {
            // the last shares can only leave proportionally
            return Err(AmmError::InsufficientLiquidity);
        }

        let mut xp = self.xp(&st.price_scale, &st.balances)?;
        let price_scale_i = if i == 0 {
            PRECISION.safe_mul(&self.precisions[0])?
        } else {
            st.price_scale[i - 1].safe_mul(&self.precisions[i])?
        };

        let fee = self.fee(&xp)?;
        let d_share = burn.safe_mul(&st.d)?.safe_div(&st.total_supply)?;
        let retained = fee
            .safe_mul(&d_share)?
            .safe_div_u64(2 * FEE_DENOMINATOR)?
            .safe_add(&U256::one())?;
        let d = st.d.safe_sub(&d_share.safe_sub(&retained)?)?;

        let y = self.solve_y(&xp, d, i)?;
        let dy = xp[i]
            .safe_sub(&y)?
            .safe_mul(&PRECISION)?
            .safe_div(&price_scale_i)?;
        xp[i] = y;

        Ok(WithdrawOnePlan { dy, d, d_share, xp })
    }
}

impl LiquidityPool for VolatilePool {
    fn quote_deposit(
        &self,
        state: &PoolState,
        amounts: &[U256],
        min_mint: U256,
        now: u64,
    ) -> Result<DepositQuote, AmmError> {
        Self::check_time(state, now)?;
        let plan = self.plan_deposit(state, amounts)?;
        if plan.minted < min_mint {
            return Err(AmmError::Slippage {
                actual: plan.minted,
                minimum: min_mint,
            });
        }

        let mut st = state.clone();
        st.balances = plan.balances;

        if st.is_empty() {
            st.d = plan.d;
            st.total_supply = plan.minted;
            st.virtual_price = PRECISION;
            st.xcp_profit = PRECISION;
            st.xcp_profit_a = PRECISION;
            st.not_adjusted = false;
            debug!(minted = %plan.minted, d = %plan.d, "initial deposit");
            return Ok(DepositQuote {
                minted: plan.minted,
                fee: U256::zero(),
                state: st,
            });
        }

        st.total_supply = st.total_supply.safe_add(&plan.minted)?;
        let observed: Option<Observed> = match plan.single {
            Some(ix) if plan.minted > MIN_OBSERVABLE => self.single_sided_price(
                &st,
                &st.balances,
                amounts[ix],
                plan.minted,
                st.total_supply,
                ix,
            )?,
            _ => None,
        };
        self.tweak_price(&mut st, &plan.xp, observed, Some(plan.d), now)?;

        debug!(minted = %plan.minted, fee = %plan.fee, "deposit");
        Ok(DepositQuote {
            minted: plan.minted,
            fee: plan.fee,
            state: st,
        })
    }

    fn quote_withdraw(
        &self,
        state: &PoolState,
        burn: U256,
        min_amounts: &[U256],
    ) -> Result<WithdrawQuote, AmmError> {
        self.check_state(state)?;
        self.check_amounts(min_amounts)?;
        Self::check_burn(state, burn)?;

        let mut st = state.clone();
        let total = st.total_supply;
        let share = burn - U256::one();

        let mut amounts = Vec::with_capacity(self.n());
        for (b, minimum) in st.balances.iter_mut().zip(min_amounts) {
            let out = b.safe_mul(&share)?.safe_div(&total)?;
            if out < *minimum {
                return Err(AmmError::Slippage {
                    actual: out,
                    minimum: *minimum,
                });
            }
            *b = b.safe_sub(&out)?;
            amounts.push(out);
        }
        st.total_supply = total - burn;
        st.d = st.d.safe_sub(&st.d.safe_mul(&share)?.safe_div(&total)?)?;

        debug!(%burn, ?amounts, "withdraw");
        Ok(WithdrawQuote { amounts, state: st })
    }

    fn quote_withdraw_one(
        &self,
        state: &PoolState,
        burn: U256,
        i: usize,
        min_amount: U256,
        now: u64,
    ) -> Result<WithdrawOneQuote, AmmError> {
        Self::check_time(state, now)?;
        let plan = self.plan_withdraw_one(state, burn, i)?;
        if plan.dy < min_amount {
            return Err(AmmError::Slippage {
                actual: plan.dy,
                minimum: min_amount,
            });
        }

        let mut st = state.clone();
        let observed = if plan.dy > MIN_OBSERVABLE && burn > MIN_OBSERVABLE {
            self.single_sided_price(&st, &st.balances, plan.dy, plan.d_share, st.d, i)?
        } else {
            None
        };
        st.balances[i] = st.balances[i].safe_sub(&plan.dy)?;
        st.total_supply = st.total_supply.safe_sub(&burn)?;
        self.tweak_price(&mut st, &plan.xp, observed, Some(plan.d), now)?;

        debug!(%burn, coin = i, amount = %plan.dy, "withdraw one coin");
        Ok(WithdrawOneQuote {
            amount: plan.dy,
            state: st,
        })
    }

    fn calc_token_amount(&self, state: &PoolState, amounts: &[U256]) -> Result<U256, AmmError> {
        Ok(self.plan_deposit(state, amounts)?.minted)
    }

    fn calc_withdraw_one_coin(
        &self,
        state: &PoolState,
        burn: U256,
        i: usize,
    ) -> Result<U256, AmmError> {
        Ok(self.plan_withdraw_one(state, burn, i)?.dy)
    }

    fn claim_admin_fees(&self, state: &PoolState) -> Result<ClaimQuote, AmmError> {
        self.claim(state)
    }

    fn current_virtual_price(&self, state: &PoolState) -> Result<U256, AmmError> {
        self.check_state(state)?;
        if state.is_empty() {
            return Err(AmmError::InsufficientLiquidity);
        }
        self.virtual_price_at(&state.price_scale, state.d, state.total_supply)
    }
}
