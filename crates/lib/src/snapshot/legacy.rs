//! Import of scopes whose positions come from legacy or external data.
//!
//! Older rows may carry fractional positions. Flooring them could merge two
//! distinct values and silently reorder siblings by id, so a scope with any
//! fractional value is renumbered as a whole, preserving its fractional order,
//! and the resulting writes are handed back to the caller.

use std::collections::HashSet;

use super::{Sibling, Snapshot, SnapshotError};
use crate::Result;
use crate::config::PositionSpace;
use crate::engine::Reposition;
use crate::engine::rebalance::{self, Layout};
use crate::id::{RecordId, ScopeKey};
use crate::position::Position;

/// A snapshot built from legacy values, plus the writes needed to make the
/// stored rows match it.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyImport {
    pub snapshot: Snapshot,
    /// Records whose stored value differs from the snapshot. Empty when
    /// every legacy value was already an integer.
    pub repositions: Vec<Reposition>,
}

impl LegacyImport {
    /// Returns true if the caller must persist repositions before using the
    /// snapshot.
    pub fn needs_write(&self) -> bool {
        !self.repositions.is_empty()
    }
}

impl Snapshot {
    /// Builds a snapshot from records whose positions may be fractional.
    ///
    /// Records may arrive in any order; they are sorted by `(value, id)`.
    /// Non-finite, negative, and above-ceiling values are rejected.
    pub fn from_legacy<I>(
        scope: ScopeKey,
        records: I,
        space: &PositionSpace,
    ) -> Result<LegacyImport>
    where
        I: IntoIterator<Item = (RecordId, f64)>,
    {
        let mut records: Vec<(RecordId, f64)> = records.into_iter().collect();

        let mut seen = HashSet::with_capacity(records.len());
        for (id, value) in &records {
            if !value.is_finite() {
                return Err(SnapshotError::NonFinitePosition { id: id.clone() }.into());
            }
            if *value < 0.0 {
                return Err(SnapshotError::NegativePosition {
                    id: id.clone(),
                    position: Position::from_f64(*value).unwrap_or(Position::new(-1)),
                }
                .into());
            }
            if *value > space.ceiling as f64 {
                return Err(SnapshotError::OutOfRange {
                    id: id.clone(),
                    value: *value,
                }
                .into());
            }
            if !seen.insert(id.clone()) {
                return Err(SnapshotError::DuplicateId { id: id.clone() }.into());
            }
        }

        records.sort_by(|(a_id, a), (b_id, b)| a.total_cmp(b).then_with(|| a_id.cmp(b_id)));

        if records.iter().all(|(_, value)| value.fract() == 0.0) {
            let siblings = records
                .into_iter()
                .map(|(id, value)| Sibling::new(id, value as i64))
                .collect();
            return Ok(LegacyImport {
                snapshot: Snapshot::new(scope, siblings)?,
                repositions: Vec::new(),
            });
        }

        let layout: Layout = rebalance::layout(space, records.len(), Position::ZERO, None)?;
        let mut siblings = Vec::with_capacity(records.len());
        let mut repositions = Vec::new();
        for (slot, (id, value)) in records.into_iter().enumerate() {
            let position = layout.slot(slot + 1);
            if position.get() as f64 != value {
                repositions.push(Reposition {
                    id: id.clone(),
                    position,
                });
            }
            siblings.push(Sibling { id, position });
        }

        tracing::info!(
            scope = %scope,
            records = siblings.len(),
            rewritten = repositions.len(),
            step = layout.step(),
            "Renumbered legacy scope with fractional positions"
        );

        Ok(LegacyImport {
            snapshot: Snapshot::new(scope, siblings)?,
            repositions,
        })
    }
}
