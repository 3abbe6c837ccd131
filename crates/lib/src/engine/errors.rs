//! Error types for the ordering engine.
//!
//! Every engine failure is local to the call that produced it. The caller
//! decides whether to retry on a fresh snapshot, escalate to a full-scope
//! renumber, or surface the error to a user.

use thiserror::Error;

use crate::id::RecordId;

/// Errors returned by [`Engine`](super::Engine) operations.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A hint or move names a record that is not in the snapshot.
    #[error("Sibling not found in scope: {id}")]
    UnknownSibling { id: RecordId },

    /// A move was asked to land relative to the record being moved.
    #[error("Cannot place record {id} relative to itself")]
    SelfReference { id: RecordId },

    /// A local rebalance hit the configured window cap before it could
    /// create the minimum gap.
    #[error(
        "Local rebalance exhausted after {window} siblings (step {step}); renumber the scope"
    )]
    WindowExhausted { window: usize, step: i64 },

    /// The scope cannot be laid out without exceeding the position ceiling.
    #[error("Position {required} would exceed the ceiling {ceiling}")]
    CeilingExceeded { required: i128, ceiling: i64 },
}

impl EngineError {
    /// Check if this error indicates a record was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::UnknownSibling { .. })
    }

    /// Check if the caller should escalate to a full-scope renumber.
    pub fn requires_renumber(&self) -> bool {
        matches!(self, EngineError::WindowExhausted { .. })
    }

    /// Check if this error is caused by running out of numeric range.
    pub fn is_capacity_error(&self) -> bool {
        matches!(
            self,
            EngineError::WindowExhausted { .. } | EngineError::CeilingExceeded { .. }
        )
    }

    /// Check if this error is a violation of the caller's input contract.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            EngineError::UnknownSibling { .. } | EngineError::SelfReference { .. }
        )
    }
}

// Conversion from EngineError to the main Error type
impl From<EngineError> for crate::Error {
    fn from(err: EngineError) -> Self {
        crate::Error::Engine(err)
    }
}
