//! Error types for engine configuration.

use thiserror::Error;

/// Errors raised when an [`EngineConfig`](super::EngineConfig) is inconsistent.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The minimum gap cannot admit an integer between two neighbours.
    #[error("min_gap must be at least 2, got {min_gap}")]
    MinGapTooSmall { min_gap: i64 },

    /// The renumbering span is smaller than the minimum gap.
    #[error("gap {gap} is smaller than min_gap {min_gap}")]
    GapBelowMinimum { gap: i64, min_gap: i64 },

    /// The ceiling leaves no room for even one tail insertion.
    #[error("ceiling {ceiling} is smaller than gap {gap}")]
    CeilingBelowGap { ceiling: i64, gap: i64 },

    /// A local rebalance window must be able to hold both bounding siblings.
    #[error("max_window must be at least 2 when set, got {max_window}")]
    WindowTooSmall { max_window: usize },
}

impl ConfigError {
    /// Check if this error concerns the position space rather than the policy.
    pub fn is_space_error(&self) -> bool {
        matches!(
            self,
            ConfigError::MinGapTooSmall { .. }
                | ConfigError::GapBelowMinimum { .. }
                | ConfigError::CeilingBelowGap { .. }
        )
    }
}

// Conversion from ConfigError to the main Error type
impl From<ConfigError> for crate::Error {
    fn from(err: ConfigError) -> Self {
        crate::Error::Config(err)
    }
}
