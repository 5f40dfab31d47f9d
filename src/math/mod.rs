//! Fixed-point math for the volatile invariant.
//!
//! Every quantity is a [`U256`](primitive_types::U256) in 18-decimal
//! fixed point and every division truncates. The pool formulas are
//! written against the exact operation order of these helpers, so
//! results are reproducible bit for bit.
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`CheckedArithmetic`] | Overflow-safe `U256` operations |
//! | [`mul`], [`div`], [`pow`] | 18-decimal products and quotients |
//! | [`geometric_mean`], [`sqrt_int`] | Iterative roots |
//! | [`halfpow`] | `0.5^x`, the oracle decay |
//! | [`reduction_coefficient`] | Imbalance metric driving the dynamic fee |
//! | [`compute_d`], [`compute_y`] | Newton solvers for the invariant |

mod checked;
mod fixed_point;
mod halfpow;
mod invariant;
mod reduction;
mod roots;

pub use checked::CheckedArithmetic;
pub use fixed_point::{abs_diff, div, mul, pow, A_MULTIPLIER, PRECISION};
pub use halfpow::{halfpow, EXP_PRECISION};
pub use invariant::{ann_bounds, compute_d, compute_y, MAX_GAMMA, MIN_GAMMA};
pub use reduction::reduction_coefficient;
pub use roots::{geometric_mean, sqrt_int};
