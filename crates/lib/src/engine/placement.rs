//! Engine results.
//!
//! [`Placement`] is the engine's decision; [`Assignment`] is the flat shape
//! handed to the data-access layer. Both carry the same writes: the new
//! record's position plus every sibling that must move with it, all of which
//! have to be committed in one atomic unit of work.

use serde::{Deserialize, Serialize};

use crate::id::RecordId;
use crate::position::Position;

/// An instruction to update one existing sibling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reposition {
    pub id: RecordId,
    pub position: Position,
}

impl Reposition {
    pub fn new(id: impl Into<RecordId>, position: impl Into<Position>) -> Self {
        Self {
            id: id.into(),
            position: position.into(),
        }
    }
}

/// The run of siblings a rebalance renumbered.
///
/// `start..end` indexes the snapshot's siblings (with a moved record already
/// taken out). The new record sits at `insert_rank` within the window, and
/// slot `k` of the window (1-based) received `lower + k * step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: usize,
    pub end: usize,
    pub insert_rank: usize,
    pub lower: Position,
    pub step: i64,
    /// True if the window spans every sibling in the scope.
    pub full_scope: bool,
}

impl Window {
    /// Number of existing siblings inside the window.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Number of slots laid out, including the new record.
    pub fn slots(&self) -> usize {
        self.len() + 1
    }
}

/// Where a record lands, and what else has to move for it to land there.
#[must_use = "a placement carries repositions that must be persisted with the record"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// The requested slot has room; nothing else changes.
    DirectInsert(Position),
    /// A window of siblings was renumbered to make room.
    Rebalance {
        window: Window,
        position: Position,
        repositions: Vec<Reposition>,
    },
}

impl Placement {
    /// The position assigned to the inserted or moved record.
    pub fn position(&self) -> Position {
        match self {
            Placement::DirectInsert(position) => *position,
            Placement::Rebalance { position, .. } => *position,
        }
    }

    pub fn repositions(&self) -> &[Reposition] {
        match self {
            Placement::DirectInsert(_) => &[],
            Placement::Rebalance { repositions, .. } => repositions,
        }
    }

    pub fn is_rebalance(&self) -> bool {
        matches!(self, Placement::Rebalance { .. })
    }

    pub fn window(&self) -> Option<&Window> {
        match self {
            Placement::DirectInsert(_) => None,
            Placement::Rebalance { window, .. } => Some(window),
        }
    }

    pub fn into_assignment(self) -> Assignment {
        match self {
            Placement::DirectInsert(position) => Assignment {
                position,
                repositions: Vec::new(),
            },
            Placement::Rebalance {
                position,
                repositions,
                ..
            } => Assignment {
                position,
                repositions,
            },
        }
    }
}

impl From<Placement> for Assignment {
    fn from(placement: Placement) -> Self {
        placement.into_assignment()
    }
}

/// The writes a caller persists atomically: `{ position, repositions }`.
#[must_use = "an assignment carries repositions that must be persisted with the record"]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub position: Position,
    #[serde(default)]
    pub repositions: Vec<Reposition>,
}

impl Assignment {
    /// Total number of rows the caller has to write.
    pub fn write_count(&self) -> usize {
        1 + self.repositions.len()
    }
}
