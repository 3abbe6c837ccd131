//! Neighbor resolution.
//!
//! Turns a [`TargetHint`] into the insertion rank within a sorted sibling
//! list and the two siblings bounding it. Resolution looks only at `position`
//! and `id`.

use serde::{Deserialize, Serialize};

use super::EngineError;
use crate::id::RecordId;
use crate::position::Position;
use crate::snapshot::Sibling;

/// Where the caller wants a record to land.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "target")]
pub enum TargetHint {
    /// Before every sibling.
    Head,
    /// After every sibling.
    Tail,
    /// Immediately after the named sibling.
    After(RecordId),
    /// Immediately before the named sibling.
    Before(RecordId),
    /// At an explicit position value. A record requested onto an occupied
    /// value ranks before the sibling holding it.
    At(Position),
}

impl TargetHint {
    pub fn after(id: impl Into<RecordId>) -> Self {
        TargetHint::After(id.into())
    }

    pub fn before(id: impl Into<RecordId>) -> Self {
        TargetHint::Before(id.into())
    }

    pub fn at(position: impl Into<Position>) -> Self {
        TargetHint::At(position.into())
    }

    /// The sibling this hint is anchored on, if any.
    pub fn anchor(&self) -> Option<&RecordId> {
        match self {
            TargetHint::After(id) | TargetHint::Before(id) => Some(id),
            _ => None,
        }
    }

    /// The explicit value requested, if any.
    pub fn explicit(&self) -> Option<Position> {
        match self {
            TargetHint::At(position) => Some(*position),
            _ => None,
        }
    }
}

/// The insertion point resolved against a sibling list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Neighbors<'a> {
    /// Rank the new record takes; siblings at `index..` follow it.
    pub index: usize,
    pub prev: Option<&'a Sibling>,
    pub next: Option<&'a Sibling>,
}

impl<'a> Neighbors<'a> {
    fn at_index(siblings: &'a [Sibling], index: usize) -> Self {
        Self {
            index,
            prev: index.checked_sub(1).and_then(|i| siblings.get(i)),
            next: siblings.get(index),
        }
    }
}

/// Finds the bounding siblings for `hint`.
pub(crate) fn resolve<'a>(
    siblings: &'a [Sibling],
    hint: &TargetHint,
) -> Result<Neighbors<'a>, EngineError> {
    let index = match hint {
        TargetHint::Head => 0,
        TargetHint::Tail => siblings.len(),
        TargetHint::After(id) => find(siblings, id)? + 1,
        TargetHint::Before(id) => find(siblings, id)?,
        TargetHint::At(position) => siblings.partition_point(|s| s.position < *position),
    };
    Ok(Neighbors::at_index(siblings, index))
}

fn find(siblings: &[Sibling], id: &RecordId) -> Result<usize, EngineError> {
    siblings
        .iter()
        .position(|s| &s.id == id)
        .ok_or_else(|| EngineError::UnknownSibling { id: id.clone() })
}
