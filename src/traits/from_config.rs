//! Generic construction trait for building pools from configuration.
//!
//! [`FromConfig`] provides a uniform interface for creating pool
//! descriptions from their configuration structs.
//!
//! # Validation Contract
//!
//! Implementations **must** revalidate the configuration during
//! construction, since a configuration may have been deserialized rather
//! than built through its checked constructor. A successfully
//! constructed pool is guaranteed to hold parameters inside the ranges
//! its solvers are safe for.
//!
//! ```text
//! VolatilePool::from_config(&volatile_config)?.genesis(now)
//! ```

use crate::error::AmmError;

/// Construction of a pool from its configuration.
///
/// # Type Parameters
///
/// - `C`: the configuration type that fully describes the pool's
///   immutable parameters.
///
/// # Implementors
///
/// - `impl FromConfig<VolatileConfig> for VolatilePool`
pub trait FromConfig<C> {
    /// Creates a pool from the given configuration.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if any pool parameter is out
    ///   of range or inconsistent.
    /// - [`AmmError::InvalidFee`] if a fee parameter is out of range.
    fn from_config(config: &C) -> Result<Self, AmmError>
    where
        Self: Sized;
}
