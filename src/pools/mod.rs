//! Pool implementations.
//!
//! | Pool | Style |
//! |------|-------|
//! | [`VolatilePool`] | Curve tricrypto: N-coin volatile assets with internal repegging |

pub mod volatile;

pub use volatile::VolatilePool;

#[cfg(test)]
mod proptest_properties;
