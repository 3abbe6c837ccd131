//! Constants used throughout the Positionable library.
//!
//! This module provides the central defaults for the position space. Engines
//! never read these directly; they are only the defaults of
//! [`PositionSpace`](crate::config::PositionSpace).

/// Span used whenever a scope (or a window within it) is freshly renumbered,
/// and the increment used when appending at the tail of a scope.
pub const DEFAULT_GAP: i64 = 65536;

/// Smallest distance between two adjacent positions that still admits an
/// integer strictly between them.
pub const MIN_GAP: i64 = 2;

/// Largest position value the engine will hand out.
///
/// 2^50 stays exactly representable for consumers that carry positions as
/// IEEE-754 doubles (JSON, JavaScript clients).
pub const DEFAULT_CEILING: i64 = 1 << 50;
