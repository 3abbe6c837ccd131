//! Error types for the reference store.

use thiserror::Error;

use super::ScopeVersion;
use crate::id::{RecordId, ScopeKey};

/// Errors raised when committing engine results to an [`InMemoryStore`](super::InMemoryStore).
///
/// Engine and snapshot failures surface through their own variants of
/// [`crate::Error`]; these cover only what the store itself checks.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The scope changed between reading the snapshot and committing.
    #[error("Scope {scope} is at version {actual}, commit expected {expected}")]
    VersionConflict {
        scope: ScopeKey,
        expected: ScopeVersion,
        actual: ScopeVersion,
    },

    /// An insert named a record that already lives in the scope.
    #[error("Record {id} already exists in scope {scope}")]
    RecordExists { scope: ScopeKey, id: RecordId },

    /// A move or removal named a record the scope does not contain.
    #[error("Record {id} not found in scope {scope}")]
    UnknownRecord { scope: ScopeKey, id: RecordId },

    /// Every attempt lost the race against a concurrent writer.
    #[error("Gave up on scope {scope} after {attempts} conflicting attempts")]
    RetriesExhausted { scope: ScopeKey, attempts: u32 },
}

impl StoreError {
    /// Check if this error indicates a record was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::UnknownRecord { .. })
    }

    /// Check if this error indicates a conflict with the stored state.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::VersionConflict { .. }
                | StoreError::RecordExists { .. }
                | StoreError::RetriesExhausted { .. }
        )
    }

    /// Check if re-reading the scope and trying again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::VersionConflict { .. })
    }

    /// Get the scope this error concerns.
    pub fn scope(&self) -> &ScopeKey {
        match self {
            StoreError::VersionConflict { scope, .. }
            | StoreError::RecordExists { scope, .. }
            | StoreError::UnknownRecord { scope, .. }
            | StoreError::RetriesExhausted { scope, .. } => scope,
        }
    }
}

// Conversion from StoreError to the main Error type
impl From<StoreError> for crate::Error {
    fn from(err: StoreError) -> Self {
        crate::Error::Store(err)
    }
}
