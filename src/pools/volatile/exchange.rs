//! [`SwapPool`] for [`VolatilePool`].

use primitive_types::U256;
use tracing::debug;

use super::oracle::{Observed, MIN_OBSERVABLE};
use super::VolatilePool;
use crate::domain::{ExchangeQuote, FeeRate, PoolState};
use crate::error::AmmError;
use crate::math::{div, mul, CheckedArithmetic};
use crate::traits::SwapPool;

/// Priced exchange before it is applied to a state.
struct ExchangeOutput {
    dy: U256,
    fee: U256,
    /// Working basket with coin `j` at the solved `y`.
    xp: Vec<U256>,
}

impl VolatilePool {
    fn check_exchange(&self, state: &PoolState, i: usize, j: usize, dx: U256) -> Result<(), AmmError> {
        self.check_state(state)?;
        self.check_coin(i)?;
        self.check_coin(j)?;
        if i == j {
            return Err(AmmError::InvalidQuantity("cannot exchange a coin for itself"));
        }
        if dx.is_zero() {
            return Err(AmmError::InvalidQuantity("exchange amount must be positive"));
        }
        if state.is_empty() {
            return Err(AmmError::InsufficientLiquidity);
        }
        Ok(())
    }

    fn exchange_output(
        &self,
        st: &PoolState,
        i: usize,
        j: usize,
        dx: U256,
    ) -> Result<ExchangeOutput, AmmError> {
        let mut balances = st.balances.clone();
        balances[i] = balances[i].safe_add(&dx)?;
        let mut xp = self.xp(&st.price_scale, &balances)?;

        let y = self.solve_y(&xp, st.d, j)?;
        let mut dy = xp[j].safe_sub(&y)?.safe_sub(&U256::one())?;
        xp[j] = y;
        if j > 0 {
            dy = div(dy, st.price_scale[j - 1])?;
        }
        dy = dy.safe_div(&self.precisions[j])?;

        let fee = self.fee_rate(&xp)?.apply(dy)?;
        Ok(ExchangeOutput {
            dy: dy.safe_sub(&fee)?,
            fee,
            xp,
        })
    }

    /// Executed trade price, written to the non-quote leg.
    fn trade_price(
        &self,
        st: &PoolState,
        i: usize,
        j: usize,
        dx: U256,
        dy: U256,
    ) -> Result<Option<Observed>, AmmError> {
        if dx <= MIN_OBSERVABLE || dy <= MIN_OBSERVABLE {
            return Ok(None);
        }
        let dx = dx.safe_mul(&self.precisions[i])?;
        let dy = dy.safe_mul(&self.precisions[j])?;
        let observed = if i != 0 && j != 0 {
            Observed {
                coin: j,
                price: st.last_prices[i - 1].safe_mul(&dx)?.safe_div(&dy)?,
            }
        } else if i == 0 {
            Observed {
                coin: j,
                price: div(dx, dy)?,
            }
        } else {
            Observed {
                coin: i,
                price: div(dy, dx)?,
            }
        };
        Ok((!observed.price.is_zero()).then_some(observed))
    }
}

impl SwapPool for VolatilePool {
    fn n_coins(&self) -> usize {
        self.n()
    }

    fn current_fee(&self, state: &PoolState) -> Result<FeeRate, AmmError> {
        self.check_state(state)?;
        if state.is_empty() {
            return Err(AmmError::InsufficientLiquidity);
        }
        self.fee_rate(&self.xp(&state.price_scale, &state.balances)?)
    }

    fn get_dy(&self, state: &PoolState, i: usize, j: usize, dx: U256) -> Result<U256, AmmError> {
        self.check_exchange(state, i, j, dx)?;
        Ok(self.exchange_output(state, i, j, dx)?.dy)
    }

    fn quote_exchange(
        &self,
        state: &PoolState,
        i: usize,
        j: usize,
        dx: U256,
        min_dy: U256,
        now: u64,
    ) -> Result<ExchangeQuote, AmmError> {
        self.check_exchange(state, i, j, dx)?;
        Self::check_time(state, now)?;

        let ExchangeOutput { dy, fee, mut xp } = self.exchange_output(state, i, j, dx)?;
        if dy < min_dy {
            return Err(AmmError::Slippage {
                actual: dy,
                minimum: min_dy,
            });
        }

        let mut st = state.clone();
        st.balances[i] = st.balances[i].safe_add(&dx)?;
        st.balances[j] = st.balances[j].safe_sub(&dy)?;

        let mut y = st.balances[j].safe_mul(&self.precisions[j])?;
        if j > 0 {
            y = mul(y, st.price_scale[j - 1])?;
        }
        xp[j] = y;

        let observed = self.trade_price(&st, i, j, dx, dy)?;
        self.tweak_price(&mut st, &xp, observed, None, now)?;

        debug!(i, j, %dx, %dy, %fee, "exchange");
        Ok(ExchangeQuote { dy, fee, state: st })
    }
}
