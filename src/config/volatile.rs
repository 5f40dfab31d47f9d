//! Configuration for volatile (cryptoswap) pools.

use primitive_types::U256;

use crate::domain::{Decimals, FeeRate};
use crate::error::AmmError;
use crate::math::{ann_bounds, MAX_GAMMA, MIN_GAMMA, PRECISION};

/// Largest supported basket.
pub const MAX_COINS: usize = 8;

/// Smallest accepted swap fee (0.005 %).
pub const MIN_FEE: FeeRate = FeeRate::new(500_000);

/// Largest accepted swap fee (100 %).
pub const MAX_FEE: FeeRate = FeeRate::FULL;

/// Oracle half-life must stay below one week.
pub const MAX_MA_HALF_TIME: u64 = 7 * 86_400;

/// Shape of the invariant curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InvariantParams {
    /// Amplification pre-multiplied as `A · N^N · 10_000`.
    pub ann: U256,
    /// Curve relaxation, 18 decimals.
    pub gamma: U256,
}

/// Dynamic fee curve and admin share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeeParams {
    /// Fee charged on a balanced basket.
    pub mid_fee: FeeRate,
    /// Fee approached as the basket skews.
    pub out_fee: FeeRate,
    /// How quickly the fee moves from `mid_fee` to `out_fee`, 18 decimals.
    pub fee_gamma: U256,
    /// Admin share of realized profit.
    pub admin_fee: FeeRate,
}

/// Price oracle and repeg tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepegParams {
    /// Profit headroom, 18 decimals, that must accrue before a repeg is
    /// attempted.
    pub allowed_extra_profit: U256,
    /// Minimum relative distance between oracle and scale, and the step
    /// size of one repeg, 18 decimals.
    pub adjustment_step: U256,
    /// Oracle half-life in seconds.
    pub ma_half_time: u64,
}

/// When the admin share of profit is minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AdminFeeSettlement {
    /// Realize at every accepted repeg and accrue the minted shares until
    /// the next claim.
    #[default]
    OnRepeg,
    /// Realize only when the admin claims.
    OnClaim,
}

/// Immutable parameters of a volatile pool.
///
/// # Basket
///
/// `coins` lists the decimals of each coin; coin 0 is the quote asset.
/// `initial_prices` holds `N − 1` prices (18 decimals): entry `k` is the
/// price of coin `k + 1` in units of coin 0. They seed the price scale,
/// the oracle and the last observed prices.
///
/// # Validation
///
/// | Parameter | Accepted range |
/// |-----------|----------------|
/// | coin count | `2..=8` |
/// | `initial_prices` | `N − 1` non-zero entries |
/// | `ann` | `[N^N · 10^4 / 100, N^N · 10^4 · 1000]` |
/// | `gamma` | `[1e10, 5e16]` |
/// | `mid_fee`, `out_fee` | `5e5 ≤ mid_fee ≤ out_fee ≤ 1e10` |
/// | `admin_fee` | `≤ 1e10` |
/// | `fee_gamma` | `(0, 1e18]` |
/// | `allowed_extra_profit`, `adjustment_step` | `≤ 1e18` |
/// | `ma_half_time` | `(0, 604 800)` seconds |
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolatileConfig {
    coins: Vec<Decimals>,
    initial_prices: Vec<U256>,
    invariant: InvariantParams,
    fees: FeeParams,
    repeg: RepegParams,
    #[cfg_attr(feature = "serde", serde(default))]
    admin_fee_settlement: AdminFeeSettlement,
}

impl VolatileConfig {
    /// Creates a validated configuration with
    /// [`AdminFeeSettlement::OnRepeg`].
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] for a bad coin count, price
    ///   vector, invariant or repeg parameter.
    /// - [`AmmError::InvalidFee`] for a fee outside its range.
    pub fn new(
        coins: Vec<Decimals>,
        initial_prices: Vec<U256>,
        invariant: InvariantParams,
        fees: FeeParams,
        repeg: RepegParams,
    ) -> Result<Self, AmmError> {
        let config = Self {
            coins,
            initial_prices,
            invariant,
            fees,
            repeg,
            admin_fee_settlement: AdminFeeSettlement::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Replaces the admin-fee settlement mode.
    #[must_use]
    pub fn with_admin_fee_settlement(mut self, settlement: AdminFeeSettlement) -> Self {
        self.admin_fee_settlement = settlement;
        self
    }

    /// Validates all configuration invariants.
    ///
    /// Public so that a deserialized configuration can be rechecked.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn validate(&self) -> Result<(), AmmError> {
        let n = self.coins.len();
        if !(2..=MAX_COINS).contains(&n) {
            return Err(AmmError::InvalidConfiguration(
                "pool must hold between 2 and 8 coins",
            ));
        }
        if self.initial_prices.len() != n - 1 {
            return Err(AmmError::InvalidConfiguration(
                "expected one initial price per non-quote coin",
            ));
        }
        if self.initial_prices.iter().any(U256::is_zero) {
            return Err(AmmError::InvalidConfiguration(
                "initial prices must be non-zero",
            ));
        }

        let (min_a, max_a) = ann_bounds(n)?;
        if self.invariant.ann < min_a || self.invariant.ann > max_a {
            return Err(AmmError::InvalidConfiguration("A out of range"));
        }
        if self.invariant.gamma < MIN_GAMMA || self.invariant.gamma > MAX_GAMMA {
            return Err(AmmError::InvalidConfiguration("gamma out of range"));
        }

        if self.fees.mid_fee < MIN_FEE {
            return Err(AmmError::InvalidFee("mid_fee below minimum"));
        }
        if self.fees.out_fee < self.fees.mid_fee {
            return Err(AmmError::InvalidFee("out_fee below mid_fee"));
        }
        if self.fees.out_fee > MAX_FEE {
            return Err(AmmError::InvalidFee("out_fee above 100%"));
        }
        if !self.fees.admin_fee.is_valid_fraction() {
            return Err(AmmError::InvalidFee("admin_fee above 100%"));
        }
        if self.fees.fee_gamma.is_zero() || self.fees.fee_gamma > PRECISION {
            return Err(AmmError::InvalidFee("fee_gamma must be in (0, 1e18]"));
        }

        if self.repeg.allowed_extra_profit > PRECISION {
            return Err(AmmError::InvalidConfiguration(
                "allowed_extra_profit above 1e18",
            ));
        }
        if self.repeg.adjustment_step > PRECISION {
            return Err(AmmError::InvalidConfiguration("adjustment_step above 1e18"));
        }
        if self.repeg.ma_half_time == 0 || self.repeg.ma_half_time >= MAX_MA_HALF_TIME {
            return Err(AmmError::InvalidConfiguration(
                "ma_half_time must be in (0, 604800)",
            ));
        }
        Ok(())
    }

    /// Number of coins.
    #[must_use]
    pub fn n_coins(&self) -> usize {
        self.coins.len()
    }

    /// Decimals of each coin.
    #[must_use]
    pub fn coins(&self) -> &[Decimals] {
        &self.coins
    }

    /// Initial prices of coins `1..N` in units of coin 0.
    #[must_use]
    pub fn initial_prices(&self) -> &[U256] {
        &self.initial_prices
    }

    /// Invariant parameters.
    #[must_use]
    pub const fn invariant(&self) -> InvariantParams {
        self.invariant
    }

    /// Fee parameters.
    #[must_use]
    pub const fn fees(&self) -> FeeParams {
        self.fees
    }

    /// Oracle and repeg parameters.
    #[must_use]
    pub const fn repeg(&self) -> RepegParams {
        self.repeg
    }

    /// Admin-fee settlement mode.
    #[must_use]
    pub const fn admin_fee_settlement(&self) -> AdminFeeSettlement {
        self.admin_fee_settlement
    }
}
