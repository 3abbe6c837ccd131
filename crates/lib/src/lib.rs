//!
//! Positionable: integer ordering for records inside sibling scopes.
//! This library assigns the position of a record that is inserted into, or moved
//! within, an ordered group of siblings, touching as few siblings as possible.
//!
//! ## Core Concepts
//!
//! * **Positions (`position::Position`)**: Non-negative integers. Siblings sort by
//!   `(position, id)`, so equal positions still have a stable order.
//! * **Position space (`config::PositionSpace`)**: The `gap` left between records,
//!   the `min_gap` below which a slot is considered crowded, and the ceiling no
//!   position may pass.
//! * **Snapshots (`snapshot::Snapshot`)**: A validated, ordered view of one scope.
//!   The engine reads nothing else.
//! * **Engine (`engine::Engine`)**: Resolves a `TargetHint` to a slot, inserts
//!   directly when the gap allows it, and otherwise renumbers the smallest window
//!   of siblings that restores `min_gap`.
//! * **Store (`store::InMemoryStore`)**: A reference collaborator that keeps scopes
//!   in memory, commits assignments atomically with optimistic version checks, and
//!   persists to JSON.

pub mod config;
pub mod constants;
pub mod engine;
pub mod id;
pub mod position;
pub mod snapshot;
pub mod store;

pub use config::{ConfigError, EngineConfig, PositionSpace, RebalancePolicy};
pub use engine::{
    Assignment, CrowdedPair, Engine, EngineError, Placement, Reposition, ScopeHealth, TargetHint,
    Window,
};
pub use id::{RecordId, ScopeKey};
pub use position::Position;
pub use snapshot::{LegacyImport, Sibling, Snapshot, SnapshotError};
pub use store::{InMemoryStore, RetryPolicy, ScopeVersion, StoreError, VersionedSnapshot};

/// Result type used throughout the Positionable library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Positionable library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured configuration errors from the config module
    #[error(transparent)]
    Config(config::ConfigError),

    /// Structured input errors from the snapshot module
    #[error(transparent)]
    Snapshot(snapshot::SnapshotError),

    /// Structured placement errors from the engine module
    #[error(transparent)]
    Engine(engine::EngineError),

    /// Structured commit errors from the store module
    #[error(transparent)]
    Store(store::StoreError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::Snapshot(_) => "snapshot",
            Error::Engine(_) => "engine",
            Error::Store(_) => "store",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a record or scope was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Snapshot(snapshot_err) => snapshot_err.is_not_found(),
            Error::Engine(engine_err) => engine_err.is_not_found(),
            Error::Store(store_err) => store_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates a conflict (stale snapshot or existing record).
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_conflict(),
            _ => false,
        }
    }

    /// Check if the caller should escalate to a full-scope renumber.
    pub fn requires_renumber(&self) -> bool {
        match self {
            Error::Engine(engine_err) => engine_err.requires_renumber(),
            _ => false,
        }
    }

    /// Check if this error is caused by running out of numeric range.
    pub fn is_capacity_error(&self) -> bool {
        match self {
            Error::Engine(engine_err) => engine_err.is_capacity_error(),
            _ => false,
        }
    }

    /// Check if this error is configuration-related.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Check if this error comes from malformed snapshot input.
    pub fn is_snapshot_error(&self) -> bool {
        matches!(self, Error::Snapshot(_))
    }

    /// Check if this error is engine-related.
    pub fn is_engine_error(&self) -> bool {
        matches!(self, Error::Engine(_))
    }

    /// Check if this error is store-related.
    pub fn is_store_error(&self) -> bool {
        matches!(self, Error::Store(_))
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}
