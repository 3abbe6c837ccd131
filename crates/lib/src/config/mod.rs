//! Engine configuration.
//!
//! The position space and the rebalance policy are plain values handed to an
//! [`Engine`](crate::Engine), so tests and callers can run several span sizes
//! side by side.

mod errors;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use errors::ConfigError;

use crate::Result;
use crate::constants::{DEFAULT_CEILING, DEFAULT_GAP, MIN_GAP};

/// The integer domain positions live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionSpace {
    /// Span used for fresh renumbering and the tail increment.
    pub gap: i64,
    /// Smallest adjacent distance a rebalance may produce.
    pub min_gap: i64,
    /// Largest value the engine will assign.
    pub ceiling: i64,
}

impl PositionSpace {
    /// Creates a space with the given gap and default minimum and ceiling.
    pub fn with_gap(gap: i64) -> Self {
        Self {
            gap,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.min_gap < MIN_GAP {
            return Err(ConfigError::MinGapTooSmall {
                min_gap: self.min_gap,
            });
        }
        if self.gap < self.min_gap {
            return Err(ConfigError::GapBelowMinimum {
                gap: self.gap,
                min_gap: self.min_gap,
            });
        }
        if self.ceiling < self.gap {
            return Err(ConfigError::CeilingBelowGap {
                ceiling: self.ceiling,
                gap: self.gap,
            });
        }
        Ok(())
    }
}

impl Default for PositionSpace {
    fn default() -> Self {
        Self {
            gap: DEFAULT_GAP,
            min_gap: MIN_GAP,
            ceiling: DEFAULT_CEILING,
        }
    }
}

/// Limits on how far a local rebalance may spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RebalancePolicy {
    /// Maximum number of existing siblings a local rebalance may reposition.
    ///
    /// `None` lets the window grow to the whole scope. With a cap, a local
    /// rebalance that cannot reach `min_gap` fails with
    /// [`EngineError::WindowExhausted`](crate::engine::EngineError::WindowExhausted)
    /// and the caller decides whether to renumber the scope.
    pub max_window: Option<usize>,
}

/// Complete configuration for an [`Engine`](crate::Engine).
///
/// Deserializes from JSON with every field optional:
///
/// ```
/// use positionable::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{"space": {"gap": 1024}}"#).unwrap();
/// assert_eq!(config.space.gap, 1024);
/// assert_eq!(config.space.min_gap, 2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub space: PositionSpace,
    pub rebalance: RebalancePolicy,
}

impl EngineConfig {
    pub fn with_space(space: PositionSpace) -> Self {
        Self {
            space,
            ..Self::default()
        }
    }

    /// Caps the number of siblings a local rebalance may touch.
    pub fn with_max_window(mut self, max_window: usize) -> Self {
        self.rebalance.max_window = Some(max_window);
        self
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.space.validate()?;
        if let Some(max_window) = self.rebalance.max_window
            && max_window < 2
        {
            return Err(ConfigError::WindowTooSmall { max_window });
        }
        Ok(())
    }

    /// Loads and validates a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: EngineConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        tracing::debug!(
            path = %path.as_ref().display(),
            gap = config.space.gap,
            max_window = ?config.rebalance.max_window,
            "Loaded engine configuration"
        );
        Ok(config)
    }
}
