//! Reference in-memory store.
//!
//! The engine is pure and leaves persistence to its caller. `InMemoryStore`
//! is that caller in its simplest form: it keeps every scope in memory,
//! versions each scope independently, and commits an assignment together with
//! its repositions as one atomic write. Writers read a versioned snapshot,
//! plan without holding any lock, then commit with the version they read. A
//! commit against a stale version is refused and the operation re-runs on a
//! fresh snapshot.
//!
//! The whole state can be saved to and loaded from a JSON file.

mod errors;
mod persistence;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

pub use errors::StoreError;

use crate::engine::{Assignment, Engine, Reposition, ScopeHealth, TargetHint};
use crate::id::{RecordId, ScopeKey};
use crate::snapshot::Snapshot;
use crate::{Error, Result};

/// Monotonic per-scope version, bumped by every committed write.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ScopeVersion(u64);

impl ScopeVersion {
    pub fn new(version: u64) -> Self {
        Self(version)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ScopeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A snapshot together with the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedSnapshot {
    pub snapshot: Snapshot,
    pub version: ScopeVersion,
}

/// How often a store operation re-reads the scope after losing a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 8 }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ScopeState {
    pub(crate) version: ScopeVersion,
    pub(crate) snapshot: Snapshot,
}

/// An in-memory, versioned collection of scopes.
///
/// # Examples
///
/// ```
/// use positionable::{InMemoryStore, RecordId, ScopeKey, TargetHint};
///
/// let store = InMemoryStore::default();
/// let scope = ScopeKey::from("todo");
///
/// store.insert(&scope, &RecordId::from("milk"), &TargetHint::Tail).unwrap();
/// store.insert(&scope, &RecordId::from("eggs"), &TargetHint::Head).unwrap();
///
/// let current = store.snapshot(&scope);
/// let order: Vec<&str> = current.snapshot.ids().map(|id| id.as_str()).collect();
/// assert_eq!(order, vec!["eggs", "milk"]);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    engine: Engine,
    retry: RetryPolicy,
    pub(crate) scopes: RwLock<HashMap<ScopeKey, ScopeState>>,
}

impl InMemoryStore {
    /// Creates an empty store that plans with `engine`.
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            retry: RetryPolicy::default(),
            scopes: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Reads the current state of a scope. Unknown scopes read as empty at
    /// version zero.
    pub fn snapshot(&self, scope: &ScopeKey) -> VersionedSnapshot {
        let scopes = self.read();
        match scopes.get(scope) {
            Some(state) => VersionedSnapshot {
                snapshot: state.snapshot.clone(),
                version: state.version,
            },
            None => VersionedSnapshot {
                snapshot: Snapshot::empty(scope.clone()),
                version: ScopeVersion::default(),
            },
        }
    }

    /// Returns the keys of every scope that has ever been written, sorted.
    pub fn scopes(&self) -> Vec<ScopeKey> {
        let mut keys: Vec<ScopeKey> = self.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Commits the insertion of `id` if the scope is still at `expected`.
    pub fn commit(
        &self,
        scope: &ScopeKey,
        id: &RecordId,
        expected: ScopeVersion,
        assignment: &Assignment,
    ) -> Result<ScopeVersion> {
        self.write_scope(scope, expected, |snapshot| {
            if snapshot.contains(id) {
                return Err(StoreError::RecordExists {
                    scope: scope.clone(),
                    id: id.clone(),
                }
                .into());
            }
            Ok(snapshot.apply(id, assignment)?)
        })
    }

    /// Commits a move of `id` if the scope is still at `expected`.
    pub fn commit_move(
        &self,
        scope: &ScopeKey,
        id: &RecordId,
        expected: ScopeVersion,
        assignment: &Assignment,
    ) -> Result<ScopeVersion> {
        self.write_scope(scope, expected, |snapshot| {
            if !snapshot.contains(id) {
                return Err(StoreError::UnknownRecord {
                    scope: scope.clone(),
                    id: id.clone(),
                }
                .into());
            }
            Ok(snapshot.apply(id, assignment)?)
        })
    }

    /// Commits a renumber if the scope is still at `expected`.
    pub fn commit_repositions(
        &self,
        scope: &ScopeKey,
        expected: ScopeVersion,
        repositions: &[Reposition],
    ) -> Result<ScopeVersion> {
        self.write_scope(scope, expected, |snapshot| {
            Ok(snapshot.apply_repositions(repositions)?)
        })
    }

    /// Inserts a new record, retrying on conflicts with the store's policy.
    pub fn insert(
        &self,
        scope: &ScopeKey,
        id: &RecordId,
        hint: &TargetHint,
    ) -> Result<Assignment> {
        self.insert_with_retry(scope, id, hint, &self.retry)
    }

    /// Inserts a new record, retrying on conflicts up to `policy.max_attempts`.
    ///
    /// A local rebalance that hits the window cap is escalated to a renumber
    /// of the whole scope.
    pub fn insert_with_retry(
        &self,
        scope: &ScopeKey,
        id: &RecordId,
        hint: &TargetHint,
        policy: &RetryPolicy,
    ) -> Result<Assignment> {
        self.retrying(scope, policy, "insert", |current| {
            if current.snapshot.contains(id) {
                return Err(StoreError::RecordExists {
                    scope: scope.clone(),
                    id: id.clone(),
                }
                .into());
            }
            let assignment = match self.engine.assign(&current.snapshot, hint) {
                Err(err) if err.requires_renumber() => {
                    tracing::info!(
                        scope = %scope,
                        error = %err,
                        "Escalating insert to full renumber"
                    );
                    self.engine.assign_with_renumber(&current.snapshot, hint)?
                }
                other => other?,
            };
            self.commit(scope, id, current.version, &assignment)?;
            Ok(assignment)
        })
    }

    /// Moves an existing record, retrying on conflicts with the store's policy.
    pub fn move_record(
        &self,
        scope: &ScopeKey,
        id: &RecordId,
        hint: &TargetHint,
    ) -> Result<Assignment> {
        self.move_with_retry(scope, id, hint, &self.retry)
    }

    /// Moves an existing record, retrying on conflicts up to `policy.max_attempts`.
    pub fn move_with_retry(
        &self,
        scope: &ScopeKey,
        id: &RecordId,
        hint: &TargetHint,
        policy: &RetryPolicy,
    ) -> Result<Assignment> {
        self.retrying(scope, policy, "move", |current| {
            let assignment = match self.engine.assign_move(&current.snapshot, id, hint) {
                Err(err) if err.requires_renumber() => {
                    tracing::info!(
                        scope = %scope,
                        error = %err,
                        "Escalating move to full renumber"
                    );
                    self.engine
                        .assign_move_with_renumber(&current.snapshot, id, hint)?
                }
                other => other?,
            };
            self.commit_move(scope, id, current.version, &assignment)?;
            Ok(assignment)
        })
    }

    /// Spreads every record of a scope evenly across the position space.
    pub fn renumber(&self, scope: &ScopeKey) -> Result<Vec<Reposition>> {
        self.retrying(scope, &self.retry, "renumber", |current| {
            let repositions = self.engine.renumber(&current.snapshot)?;
            if !repositions.is_empty() {
                self.commit_repositions(scope, current.version, &repositions)?;
            }
            Ok(repositions)
        })
    }

    /// Deletes a record. The remaining siblings keep their positions.
    pub fn remove(&self, scope: &ScopeKey, id: &RecordId) -> Result<ScopeVersion> {
        let mut scopes = self.write();
        let state = scopes
            .get_mut(scope)
            .filter(|state| state.snapshot.contains(id))
            .ok_or_else(|| StoreError::UnknownRecord {
                scope: scope.clone(),
                id: id.clone(),
            })?;
        if let Some(rest) = state.snapshot.without(id) {
            state.snapshot = rest;
        }
        state.version = state.version.next();
        tracing::debug!(
            scope = %scope,
            id = %id,
            version = %state.version,
            "Removed record"
        );
        Ok(state.version)
    }

    /// Measures spacing in a scope.
    pub fn health(&self, scope: &ScopeKey) -> ScopeHealth {
        self.engine.health(&self.snapshot(scope).snapshot)
    }

    /// Saves every scope to `path` as JSON.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save_to_file(self, path)
    }

    /// Loads scopes from `path`. A missing file yields an empty store.
    pub fn load_from_file<P: AsRef<Path>>(path: P, engine: Engine) -> Result<Self> {
        persistence::load_from_file(path, engine)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<ScopeKey, ScopeState>> {
        self.scopes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ScopeKey, ScopeState>> {
        self.scopes.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces a scope's snapshot under the write lock if its version still
    /// matches `expected`. An unknown scope is at version zero and is only
    /// created once `update` succeeds.
    fn write_scope<F>(
        &self,
        scope: &ScopeKey,
        expected: ScopeVersion,
        update: F,
    ) -> Result<ScopeVersion>
    where
        F: FnOnce(&Snapshot) -> Result<Snapshot>,
    {
        let mut scopes = self.write();
        let actual = scopes
            .get(scope)
            .map_or(ScopeVersion::default(), |state| state.version);
        if actual != expected {
            return Err(StoreError::VersionConflict {
                scope: scope.clone(),
                expected,
                actual,
            }
            .into());
        }
        let snapshot = match scopes.get(scope) {
            Some(state) => update(&state.snapshot)?,
            None => update(&Snapshot::empty(scope.clone()))?,
        };
        let version = actual.next();
        scopes.insert(scope.clone(), ScopeState { version, snapshot });
        Ok(version)
    }

    fn retrying<T, F>(
        &self,
        scope: &ScopeKey,
        policy: &RetryPolicy,
        operation: &str,
        mut attempt: F,
    ) -> Result<T>
    where
        F: FnMut(&VersionedSnapshot) -> Result<T>,
    {
        let attempts = policy.max_attempts.max(1);
        for round in 1..=attempts {
            let current = self.snapshot(scope);
            match attempt(&current) {
                Err(Error::Store(err)) if err.is_retryable() => {
                    tracing::debug!(
                        scope = %scope,
                        operation,
                        attempt = round,
                        error = %err,
                        "Commit lost a race, retrying on a fresh snapshot"
                    );
                }
                result => return result,
            }
        }
        tracing::warn!(scope = %scope, operation, attempts, "Retries exhausted");
        Err(StoreError::RetriesExhausted {
            scope: scope.clone(),
            attempts,
        }
        .into())
    }
}
