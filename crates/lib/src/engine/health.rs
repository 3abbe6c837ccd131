//! Scope health reporting.
//!
//! The engine never renumbers a scope on its own initiative. [`ScopeHealth`]
//! gives the caller what it needs to apply its own policy.

use serde::Serialize;

use crate::config::PositionSpace;
use crate::id::{RecordId, ScopeKey};
use crate::position::Position;
use crate::snapshot::Snapshot;

/// Two adjacent siblings too close to insert between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrowdedPair {
    pub first: RecordId,
    pub second: RecordId,
    pub gap: i64,
}

/// Spacing statistics for one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeHealth {
    pub scope: ScopeKey,
    pub len: usize,
    /// Smallest distance between adjacent siblings, if there are two or more.
    pub min_gap: Option<i64>,
    pub max_position: Option<Position>,
    /// Adjacent pairs closer than the configured `min_gap`.
    pub crowded: Vec<CrowdedPair>,
    /// True if the largest position is within one `gap` of the ceiling.
    pub near_ceiling: bool,
}

impl ScopeHealth {
    pub(crate) fn measure(space: &PositionSpace, snapshot: &Snapshot) -> Self {
        let siblings = snapshot.siblings();
        let mut min_gap: Option<i64> = None;
        let mut crowded = Vec::new();

        for pair in siblings.windows(2) {
            let gap = pair[0].position.distance_to(pair[1].position);
            min_gap = Some(min_gap.map_or(gap, |current| current.min(gap)));
            if gap < space.min_gap {
                crowded.push(CrowdedPair {
                    first: pair[0].id.clone(),
                    second: pair[1].id.clone(),
                    gap,
                });
            }
        }

        let max_position = siblings.last().map(|s| s.position);
        let near_ceiling =
            max_position.is_some_and(|max| max.get() > space.ceiling.saturating_sub(space.gap));

        Self {
            scope: snapshot.scope().clone(),
            len: siblings.len(),
            min_gap,
            max_position,
            crowded,
            near_ceiling,
        }
    }

    /// Returns true if every adjacent pair still admits a direct insertion.
    pub fn has_headroom(&self) -> bool {
        self.crowded.is_empty()
    }

    /// Convenience predicate for callers without their own renumber policy.
    pub fn needs_renumber(&self) -> bool {
        !self.has_headroom() || self.near_ceiling
    }
}
