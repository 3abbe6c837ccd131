//! Error types for sibling snapshots.
//!
//! A snapshot that violates the input contract is rejected when it is built,
//! never coerced into something the engine could silently mis-order.

use thiserror::Error;

use crate::id::RecordId;
use crate::position::Position;

/// Errors raised while building or updating a [`Snapshot`](super::Snapshot).
#[non_exhaustive]
#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    /// A sibling carries a negative position.
    #[error("Record {id} has negative position {position}")]
    NegativePosition { id: RecordId, position: Position },

    /// A legacy value is NaN or infinite.
    #[error("Record {id} has a non-finite position")]
    NonFinitePosition { id: RecordId },

    /// A legacy value does not fit the position space.
    #[error("Record {id} has position {value} outside the representable range")]
    OutOfRange { id: RecordId, value: f64 },

    /// The same record appears twice in one scope.
    #[error("Duplicate record id in scope: {id}")]
    DuplicateId { id: RecordId },

    /// Siblings are not sorted by `(position, id)`.
    #[error("Sibling {id} at index {index} is out of (position, id) order")]
    Unsorted { index: usize, id: RecordId },

    /// A reposition names a record the snapshot does not contain.
    #[error("Record not found in scope: {id}")]
    UnknownRecord { id: RecordId },
}

impl SnapshotError {
    /// Check if this error comes from an invalid position value.
    pub fn is_position_error(&self) -> bool {
        matches!(
            self,
            SnapshotError::NegativePosition { .. }
                | SnapshotError::NonFinitePosition { .. }
                | SnapshotError::OutOfRange { .. }
        )
    }

    /// Check if this error indicates a record was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SnapshotError::UnknownRecord { .. })
    }

    /// Get the offending record id.
    pub fn record_id(&self) -> &RecordId {
        match self {
            SnapshotError::NegativePosition { id, .. }
            | SnapshotError::NonFinitePosition { id }
            | SnapshotError::OutOfRange { id, .. }
            | SnapshotError::DuplicateId { id }
            | SnapshotError::Unsorted { id, .. }
            | SnapshotError::UnknownRecord { id } => id,
        }
    }
}

// Conversion from SnapshotError to the main Error type
impl From<SnapshotError> for crate::Error {
    fn from(err: SnapshotError) -> Self {
        crate::Error::Snapshot(err)
    }
}
