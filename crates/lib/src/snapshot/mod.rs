//! Validated views of one sibling scope.
//!
//! A [`Snapshot`] is the engine's only input about existing records: the
//! siblings of a single scope, sorted by `(position, id)`. Construction
//! checks the whole contract up front so the engine itself never has to
//! guess at malformed data.

mod errors;
mod legacy;


use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub use errors::SnapshotError;
pub use legacy::LegacyImport;

use crate::engine::{Assignment, Reposition};
use crate::id::{RecordId, ScopeKey};
use crate::position::Position;

/// A record as seen by the engine: an identifier and its current position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sibling {
    pub id: RecordId,
    pub position: Position,
}

impl Sibling {
    pub fn new(id: impl Into<RecordId>, position: impl Into<Position>) -> Self {
        Self {
            id: id.into(),
            position: position.into(),
        }
    }

    /// Sort key used for every ordering decision.
    fn key(&self) -> (Position, &RecordId) {
        (self.position, &self.id)
    }
}

/// The ordered siblings of one scope.
///
/// # Examples
///
/// ```
/// use positionable::{ScopeKey, Sibling, Snapshot};
///
/// let snapshot = Snapshot::new(
///     ScopeKey::from("list-1"),
///     vec![Sibling::new("a", 1000), Sibling::new("b", 2000)],
/// )
/// .unwrap();
/// assert_eq!(snapshot.len(), 2);
///
/// // Unsorted input is rejected rather than reordered.
/// let unsorted = Snapshot::new(
///     ScopeKey::from("list-1"),
///     vec![Sibling::new("b", 2000), Sibling::new("a", 1000)],
/// );
/// assert!(unsorted.is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot")]
pub struct Snapshot {
    scope: ScopeKey,
    siblings: Vec<Sibling>,
}

/// Unvalidated wire shape; every deserialized snapshot goes through
/// [`Snapshot::new`].
#[derive(Deserialize)]
struct RawSnapshot {
    scope: ScopeKey,
    #[serde(default)]
    siblings: Vec<Sibling>,
}

impl TryFrom<RawSnapshot> for Snapshot {
    type Error = SnapshotError;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        Snapshot::new(raw.scope, raw.siblings)
    }
}

impl Snapshot {
    /// Validates and wraps siblings already sorted by `(position, id)`.
    ///
    /// Equal positions with distinct ids are accepted. The next insert or move
    /// in the scope spreads every such pair apart.
    pub fn new(scope: ScopeKey, siblings: Vec<Sibling>) -> Result<Self, SnapshotError> {
        let mut seen = HashSet::with_capacity(siblings.len());
        for (index, sibling) in siblings.iter().enumerate() {
            if !sibling.position.is_valid() {
                return Err(SnapshotError::NegativePosition {
                    id: sibling.id.clone(),
                    position: sibling.position,
                });
            }
            if !seen.insert(&sibling.id) {
                return Err(SnapshotError::DuplicateId {
                    id: sibling.id.clone(),
                });
            }
            if index > 0 && siblings[index - 1].key() >= sibling.key() {
                return Err(SnapshotError::Unsorted {
                    index,
                    id: sibling.id.clone(),
                });
            }
        }
        Ok(Self { scope, siblings })
    }

    /// Creates a snapshot of a scope with no records.
    pub fn empty(scope: ScopeKey) -> Self {
        Self {
            scope,
            siblings: Vec::new(),
        }
    }

    /// Sorts arbitrary records by `(position, id)` before validating them.
    ///
    /// For collaborators that cannot guarantee ordering on read.
    pub fn from_unsorted(
        scope: ScopeKey,
        mut siblings: Vec<Sibling>,
    ) -> Result<Self, SnapshotError> {
        siblings.sort_by(|a, b| a.key().cmp(&b.key()));
        Self::new(scope, siblings)
    }

    pub fn scope(&self) -> &ScopeKey {
        &self.scope
    }

    pub fn siblings(&self) -> &[Sibling] {
        &self.siblings
    }

    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    /// Index of a record in `(position, id)` order.
    pub fn index_of(&self, id: &RecordId) -> Option<usize> {
        self.siblings.iter().position(|s| &s.id == id)
    }

    pub fn get(&self, id: &RecordId) -> Option<&Sibling> {
        self.siblings.iter().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the ids in scope order.
    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.siblings.iter().map(|s| &s.id)
    }

    /// Returns a copy of this snapshot with one record taken out.
    ///
    /// Removing a record never changes the relative order of the rest, so no
    /// revalidation is needed.
    pub fn without(&self, id: &RecordId) -> Option<Snapshot> {
        let index = self.index_of(id)?;
        let mut siblings = self.siblings.clone();
        siblings.remove(index);
        Some(Snapshot {
            scope: self.scope.clone(),
            siblings,
        })
    }

    /// Applies an engine result, producing the snapshot a collaborator would
    /// read back after committing it.
    ///
    /// `id` is the inserted record, or the moved one if it already exists in
    /// this snapshot.
    pub fn apply(&self, id: &RecordId, assignment: &Assignment) -> Result<Snapshot, SnapshotError> {
        let mut siblings = self.siblings.clone();
        for Reposition { id, position } in &assignment.repositions {
            let sibling = siblings
                .iter_mut()
                .find(|s| &s.id == id)
                .ok_or_else(|| SnapshotError::UnknownRecord { id: id.clone() })?;
            sibling.position = *position;
        }
        match siblings.iter_mut().find(|s| &s.id == id) {
            Some(existing) => existing.position = assignment.position,
            None => siblings.push(Sibling::new(id.clone(), assignment.position)),
        }
        Snapshot::from_unsorted(self.scope.clone(), siblings)
    }

    /// Applies a bare list of repositions, as produced by a renumber.
    pub fn apply_repositions(&self, repositions: &[Reposition]) -> Result<Snapshot, SnapshotError> {
        let mut siblings = self.siblings.clone();
        for Reposition { id, position } in repositions {
            let sibling = siblings
                .iter_mut()
                .find(|s| &s.id == id)
                .ok_or_else(|| SnapshotError::UnknownRecord { id: id.clone() })?;
            sibling.position = *position;
        }
        Snapshot::from_unsorted(self.scope.clone(), siblings)
    }

    /// Returns true if no two siblings share a position.
    pub fn has_unique_positions(&self) -> bool {
        self.siblings
            .windows(2)
            .all(|pair| pair[0].position < pair[1].position)
    }
}
