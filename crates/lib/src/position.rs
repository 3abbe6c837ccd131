//! Integer position values for ordered siblings.
//!
//! A [`Position`] is a plain 64-bit integer. Siblings are ordered by
//! `(position, id)`; the engine keeps positions spread out so that a new
//! record can almost always be placed between two neighbours without touching
//! any other row.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric position of a record within its scope.
///
/// # Examples
///
/// ```
/// use positionable::Position;
///
/// let prev = Position::new(1000);
/// let next = Position::new(2000);
/// assert_eq!(prev.midpoint(next), Some(Position::new(1500)));
/// assert_eq!(prev.distance_to(next), 1000);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Position(i64);

impl Position {
    /// The lowest possible value, used as the implicit lower bound of a scope.
    pub const ZERO: Position = Position(0);

    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns true if this value can appear in a valid snapshot.
    pub const fn is_valid(self) -> bool {
        self.0 >= 0
    }

    /// Signed distance from `self` up to `other`.
    ///
    /// Saturates rather than wrapping; snapshot validation keeps both values
    /// non-negative so the subtraction cannot overflow in practice.
    pub fn distance_to(self, other: Position) -> i64 {
        other.0.saturating_sub(self.0)
    }

    pub fn checked_add(self, delta: i64) -> Option<Position> {
        self.0.checked_add(delta).map(Position)
    }

    /// Integer midpoint between `self` and `other`, or `None` if no integer
    /// lies strictly between them.
    pub fn midpoint(self, other: Position) -> Option<Position> {
        let (low, high) = if self <= other {
            (self, other)
        } else {
            (other, self)
        };
        let mid = low.0 + (high.0 - low.0) / 2;
        (mid > low.0 && mid < high.0).then_some(Position(mid))
    }

    /// Converts a value from legacy or external data.
    ///
    /// Returns `None` for non-finite input or values outside the `i64` range.
    /// Fractional values are floored; callers that need to preserve the
    /// relative order of fractional siblings go through
    /// [`Snapshot::from_legacy`](crate::snapshot::Snapshot::from_legacy),
    /// which renumbers such scopes instead.
    pub fn from_f64(value: f64) -> Option<Position> {
        if !value.is_finite() {
            return None;
        }
        let floored = value.floor();
        // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
        if floored < i64::MIN as f64 || floored >= i64::MAX as f64 {
            return None;
        }
        Some(Position(floored as i64))
    }
}

impl From<i64> for Position {
    fn from(value: i64) -> Self {
        Position(value)
    }
}

// Unsuffixed integer literals default to i32.
impl From<i32> for Position {
    fn from(value: i32) -> Self {
        Position(i64::from(value))
    }
}

impl From<Position> for i64 {
    fn from(position: Position) -> Self {
        position.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
