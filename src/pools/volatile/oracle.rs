//! Price oracle, profit tracking and repegging.
//!
//! # Oracle
//!
//! `price_oracle` is an exponential moving average of `last_prices`
//! with half-life `ma_half_time`:
//!
//! ```text
//! α            = 0.5 ^ (elapsed / ma_half_time)
//! price_oracle = last_prices · (1 − α) + price_oracle · α
//! ```
//!
//! The update reads `last_prices` from *before* the current operation,
//! so a single trade cannot move the oracle it is judged against.
//!
//! # Observed prices
//!
//! After each operation `last_prices` is refreshed from, in order of
//! preference: the executed trade price, the price implied by a
//! single-sided deposit or withdrawal, or a numerical derivative of the
//! invariant.
//!
//! # Repeg
//!
//! Once `2·virtual_price − 1 > xcp_profit + 2·allowed_extra_profit`, the
//! pool may move `price_scale` one `adjustment_step` toward the oracle.
//! The move is kept only if the virtual price at the new scale still
//! leaves half of the profit intact:
//!
//! ```text
//! vp' > 1  and  2·vp' − 1 > xcp_profit
//! ```

use primitive_types::U256;
use tracing::{debug, info, trace, warn};

use super::VolatilePool;
use crate::config::AdminFeeSettlement;
use crate::domain::PoolState;
use crate::error::AmmError;
use crate::math::{
    abs_diff, div, geometric_mean, halfpow, mul, sqrt_int, CheckedArithmetic, PRECISION,
};

/// Legs smaller than this are too noisy to observe a price from.
pub(super) const MIN_OBSERVABLE: U256 = U256([100_000, 0, 0, 0]);

/// Relative size of the bump used to differentiate the invariant.
const DERIVATIVE_BUMP: u64 = 1_000_000;

/// A price observed during an operation.
///
/// `coin == 0` means the price of coin 0 in units of the others, which
/// rescales every entry of `last_prices`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Observed {
    pub(super) coin: usize,
    pub(super) price: U256,
}

impl VolatilePool {
    /// Decays the oracle toward `last_prices` up to `now`.
    ///
    /// This is what every state-changing operation does first; it is
    /// exposed for callers that want to refresh the oracle without
    /// trading.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NonMonotonicTime`] if `now` precedes the last update.
    /// - [`AmmError::InvalidQuantity`] if the state does not match the
    ///   pool.
    pub fn update_oracle(&self, state: &PoolState, now: u64) -> Result<PoolState, AmmError> {
        self.check_state(state)?;
        let mut st = state.clone();
        self.apply_oracle(&mut st, now)?;
        Ok(st)
    }

    /// LP token price in units of coin 0:
    /// `N · virtual_price · geometric_mean(1, price_oracle…)`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] if the state does not match the
    ///   pool.
    /// - [`AmmError::InsufficientLiquidity`] if the pool is empty.
    pub fn lp_price(&self, state: &PoolState) -> Result<U256, AmmError> {
        self.check_state(state)?;
        if state.is_empty() {
            return Err(AmmError::InsufficientLiquidity);
        }
        let mut prices = Vec::with_capacity(self.n());
        prices.push(PRECISION);
        prices.extend_from_slice(&state.price_oracle);
        mul(
            state.virtual_price.safe_mul_u64(self.n() as u64)?,
            geometric_mean(&prices)?,
        )
    }

    pub(super) fn apply_oracle(&self, st: &mut PoolState, now: u64) -> Result<(), AmmError> {
        Self::check_time(st, now)?;
        if st.last_prices_timestamp == now {
            return Ok(());
        }
        let elapsed = U256::from(now - st.last_prices_timestamp);
        let alpha = halfpow(
            elapsed
                .safe_mul(&PRECISION)?
                .safe_div_u64(self.config.repeg().ma_half_time)?,
        )?;
        let complement = PRECISION.safe_sub(&alpha)?;
        for (oracle, last) in st.price_oracle.iter_mut().zip(&st.last_prices) {
            *oracle = last
                .safe_mul(&complement)?
                .safe_add(&oracle.safe_mul(&alpha)?)?
                .safe_div(&PRECISION)?;
        }
        trace!(now, %alpha, oracle = ?st.price_oracle, "oracle updated");
        st.last_prices_timestamp = now;
        Ok(())
    }

    /// Price of coin `ix` implied by moving `amount` of it in or out of
    /// the pool for `share / whole` of its size.
    ///
    /// `balances` are native balances on the side of the move where the
    /// pool holds them. Returns `None` when the move is too lopsided to
    /// read a positive price from.
    pub(super) fn single_sided_price(
        &self,
        st: &PoolState,
        balances: &[U256],
        amount: U256,
        share: U256,
        whole: U256,
        ix: usize,
    ) -> Result<Option<Observed>, AmmError> {
        let prec = &self.precisions;
        let moved = amount.safe_mul(&prec[ix])?;
        let proportional = share
            .safe_mul(&balances[ix])?
            .safe_mul(&prec[ix])?
            .safe_div(&whole)?;
        if moved <= proportional {
            debug!(coin = ix, "single-sided move too small to price");
            return Ok(None);
        }
        let denom = moved - proportional;

        let observed = if self.n() == 2 {
            let o = 1 - ix;
            let s = balances[o]
                .safe_mul(&prec[o])?
                .safe_mul(&share)?
                .safe_div(&whole)?;
            let mut price = div(s, denom)?;
            if price.is_zero() {
                return Ok(None);
            }
            if ix == 0 {
                price = div(PRECISION, price)?;
            }
            Observed { coin: 1, price }
        } else {
            let mut s = U256::zero();
            for (k, b) in balances.iter().enumerate() {
                if k == ix {
                    continue;
                }
                let value = if k == 0 {
                    b.safe_mul(&prec[0])?
                } else {
                    b.safe_mul(&st.last_prices[k - 1])?
                        .safe_mul(&prec[k])?
                        .safe_div(&PRECISION)?
                };
                s = s.safe_add(&value)?;
            }
            let s = s.safe_mul(&share)?.safe_div(&whole)?;
            let price = div(s, denom)?;
            if price.is_zero() {
                return Ok(None);
            }
            Observed { coin: ix, price }
        };
        debug!(coin = observed.coin, price = %observed.price, "single-sided price");
        Ok(Some(observed))
    }

    /// Refreshes the oracle, `last_prices` and the profit counters, then
    /// attempts a repeg.
    ///
    /// `xp` is the working basket after the operation. `new_d` is the
    /// invariant when the caller already solved it.
    pub(super) fn tweak_price(
        &self,
        st: &mut PoolState,
        xp: &[U256],
        observed: Option<Observed>,
        new_d: Option<U256>,
        now: u64,
    ) -> Result<(), AmmError> {
        let n = self.n();
        let repeg = self.config.repeg();

        self.apply_oracle(st, now)?;

        let d_unadjusted = match new_d {
            Some(d) => d,
            None => self.solve_d(xp)?,
        };

        match observed {
            Some(Observed { coin: 0, price }) => {
                for last in &mut st.last_prices {
                    *last = div(*last, price)?;
                }
            }
            Some(Observed { coin, price }) => st.last_prices[coin - 1] = price,
            None => {
                let mut bumped = xp.to_vec();
                let dx = bumped[0].safe_div_u64(DERIVATIVE_BUMP)?;
                bumped[0] = bumped[0].safe_add(&dx)?;
                for k in 0..n - 1 {
                    let y = self.solve_y(&bumped, d_unadjusted, k + 1)?;
                    st.last_prices[k] = st.price_scale[k]
                        .safe_mul(&dx)?
                        .safe_div(&xp[k + 1].safe_sub(&y)?)?;
                }
            }
        }

        let old_virtual_price = st.virtual_price;
        let (xcp_profit, virtual_price) = if old_virtual_price.is_zero() {
            (PRECISION, PRECISION)
        } else {
            let vp = self.virtual_price_at(&st.price_scale, d_unadjusted, st.total_supply)?;
            if vp < old_virtual_price {
                warn!(%vp, old = %old_virtual_price, "virtual price would decrease");
                return Err(AmmError::Loss);
            }
            let xcp = st
                .xcp_profit
                .safe_mul(&vp)?
                .safe_div(&old_virtual_price)?;
            (xcp, vp)
        };
        st.xcp_profit = xcp_profit;

        let two_aep = repeg.allowed_extra_profit.safe_mul_u64(2)?;
        if !st.not_adjusted
            && virtual_price.safe_mul_u64(2)? > xcp_profit.safe_add(&two_aep)?.safe_add(&PRECISION)?
        {
            st.not_adjusted = true;
        }

        let distance = if st.not_adjusted && !old_virtual_price.is_zero() {
            self.scale_distance(st)?
        } else {
            None
        };

        if let Some(norm) = distance {
            let (p_new, d, candidate_vp) = self.repeg_candidate(st, xp, norm)?;
            debug!(%candidate_vp, %xcp_profit, "repeg attempt");

            if keeps_half_profit(candidate_vp, xcp_profit)? {
                info!(price_scale = ?p_new, %candidate_vp, "repeg accepted");
                st.price_scale = p_new;
                st.d = d;
                st.virtual_price = candidate_vp;
                if self.config.admin_fee_settlement() == AdminFeeSettlement::OnRepeg {
                    let minted = self.settle_admin(st, d)?;
                    st.pending_admin_shares = st.pending_admin_shares.safe_add(&minted)?;
                }
                return Ok(());
            }
            debug!(%candidate_vp, "repeg rejected by profit gate");
            st.not_adjusted = false;
        }

        st.d = d_unadjusted;
        st.virtual_price = virtual_price;
        Ok(())
    }

    /// Scale one `adjustment_step` toward the oracle, with the invariant
    /// and virtual price it would produce.
    fn repeg_candidate(
        &self,
        st: &PoolState,
        xp: &[U256],
        norm: U256,
    ) -> Result<(Vec<U256>, U256, U256), AmmError> {
        let step = self.config.repeg().adjustment_step;
        let mut p_new = Vec::with_capacity(self.n() - 1);
        for (scale, oracle) in st.price_scale.iter().zip(&st.price_oracle) {
            p_new.push(
                scale
                    .safe_mul(&norm.safe_sub(&step)?)?
                    .safe_add(&step.safe_mul(oracle)?)?
                    .safe_div(&norm)?,
            );
        }

        let mut xp_new = Vec::with_capacity(self.n());
        xp_new.push(xp[0]);
        for (k, p) in p_new.iter().enumerate() {
            xp_new.push(xp[k + 1].safe_mul(p)?.safe_div(&st.price_scale[k])?);
        }
        let d = self.solve_d(&xp_new)?;
        let vp = self.virtual_price_at(&p_new, d, st.total_supply)?;
        Ok((p_new, d, vp))
    }

    /// Relative distance between oracle and scale, or `None` if it is
    /// within `adjustment_step`.
    ///
    /// Pairs use `|oracle/scale − 1|`; larger baskets the Euclidean norm
    /// of the per-coin distances.
    fn scale_distance(&self, st: &PoolState) -> Result<Option<U256>, AmmError> {
        let step = self.config.repeg().adjustment_step;
        let mut ratios = Vec::with_capacity(self.n() - 1);
        for (oracle, scale) in st.price_oracle.iter().zip(&st.price_scale) {
            let r = div(*oracle, *scale)?;
            ratios.push(abs_diff(r, PRECISION));
        }

        if self.n() == 2 {
            let norm = ratios[0];
            return Ok((norm > step).then_some(norm));
        }

        let mut sum_sq = U256::zero();
        for r in &ratios {
            sum_sq = sum_sq.safe_add(&r.safe_mul(r)?)?;
        }
        if sum_sq <= step.safe_mul(&step)? {
            return Ok(None);
        }
        let norm = sqrt_int(sum_sq.safe_div(&PRECISION)?)?;
        Ok((norm > step).then_some(norm))
    }
}

/// Repeg gate: `vp' > 1` and `2·vp' − 1 > xcp_profit`, both strict.
fn keeps_half_profit(candidate_vp: U256, xcp_profit: U256) -> Result<bool, AmmError> {
    Ok(candidate_vp > PRECISION
        && candidate_vp.safe_mul_u64(2)? > xcp_profit.safe_add(&PRECISION)?)
}
