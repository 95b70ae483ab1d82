//! Market engine error taxonomy.
//!
//! Every variant is caused by caller input, never by a transient
//! condition, so nothing here is retryable inside the engine.

use thiserror::Error;

/// Errors raised by the LMSR engine.
///
/// A rejected call always leaves the market state untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketError {
    /// A numeric argument is outside its admissible domain.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// An outcome tag other than YES/NO reached the engine boundary.
    #[error("invalid outcome `{0}`: expected YES or NO")]
    InvalidOutcome(String),

    /// Bias seeding was attempted after the first trade.
    #[error("cannot seed price after trading has started")]
    SeedAfterTrade,
}

impl MarketError {
    pub(crate) const fn invalid(
        name: &'static str,
        value: f64,
        reason: &'static str,
    ) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}
