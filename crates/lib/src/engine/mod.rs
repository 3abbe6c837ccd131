//! The positionable ordering engine.
//!
//! Given a validated [`Snapshot`] of one scope and a [`TargetHint`], the
//! engine computes the position for an inserted or moved record and the
//! minimal set of sibling repositions that must be committed with it.
//!
//! The pipeline is:
//!
//! 1. **Neighbor resolution** - find the insertion rank and the siblings on
//!    either side of it.
//! 2. **Gap evaluation** - if a value fits strictly between them, that is the
//!    whole answer ([`Placement::DirectInsert`]).
//! 3. **Rebalancing** - otherwise renumber the smallest window around the
//!    insertion point that restores `min_gap` between every slot
//!    ([`Placement::Rebalance`]).
//!
//! The engine is pure: no I/O, no locking, no hidden state. Retrying against
//! a fresh snapshot after a commit conflict is always safe.

mod errors;
mod gap;
mod health;
mod neighbors;
mod placement;
pub(crate) mod rebalance;


use std::collections::HashMap;

pub use errors::EngineError;
pub use health::{CrowdedPair, ScopeHealth};
pub use neighbors::TargetHint;
pub use placement::{Assignment, Placement, Reposition, Window};

use crate::config::{ConfigError, EngineConfig, PositionSpace};
use crate::id::RecordId;
use crate::position::Position;
use crate::snapshot::{Sibling, Snapshot};

use gap::GapVerdict;

/// Assigns positions within sibling scopes.
///
/// # Examples
///
/// ```
/// use positionable::{Engine, Position, ScopeKey, Sibling, Snapshot, TargetHint};
///
/// let engine = Engine::default();
/// let snapshot = Snapshot::new(
///     ScopeKey::from("list-1"),
///     vec![Sibling::new("a", 1000), Sibling::new("b", 2000)],
/// )
/// .unwrap();
///
/// let assignment = engine.assign(&snapshot, &TargetHint::at(1500)).unwrap();
/// assert_eq!(assignment.position, Position::new(1500));
/// assert!(assignment.repositions.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine, rejecting inconsistent configuration.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn space(&self) -> &PositionSpace {
        &self.config.space
    }

    /// Decides where a new record lands.
    pub fn plan(&self, snapshot: &Snapshot, hint: &TargetHint) -> Result<Placement, EngineError> {
        self.place(snapshot.siblings(), hint, None)
    }

    /// Computes the writes for inserting a new record.
    pub fn assign(
        &self,
        snapshot: &Snapshot,
        hint: &TargetHint,
    ) -> Result<Assignment, EngineError> {
        self.plan(snapshot, hint).map(Placement::into_assignment)
    }

    /// Decides where an existing record lands when moved.
    ///
    /// The record is taken out of the scope before resolving `hint`, so the
    /// returned window indexes the remaining siblings. A relative move that
    /// leaves the record between the same two neighbours keeps its current
    /// value.
    pub fn plan_move(
        &self,
        snapshot: &Snapshot,
        id: &RecordId,
        hint: &TargetHint,
    ) -> Result<Placement, EngineError> {
        let (rest, current) = Self::detach(snapshot, id, hint)?;
        self.place(&rest, hint, Some(current))
    }

    /// Computes the writes for moving an existing record.
    pub fn assign_move(
        &self,
        snapshot: &Snapshot,
        id: &RecordId,
        hint: &TargetHint,
    ) -> Result<Assignment, EngineError> {
        self.plan_move(snapshot, id, hint)
            .map(Placement::into_assignment)
    }

    /// Inserts a record by renumbering the whole scope.
    ///
    /// This is the escalation path after [`EngineError::WindowExhausted`].
    pub fn assign_with_renumber(
        &self,
        snapshot: &Snapshot,
        hint: &TargetHint,
    ) -> Result<Assignment, EngineError> {
        self.place_full(snapshot.siblings(), hint)
            .map(Placement::into_assignment)
    }

    /// Moves a record by renumbering the whole scope.
    pub fn assign_move_with_renumber(
        &self,
        snapshot: &Snapshot,
        id: &RecordId,
        hint: &TargetHint,
    ) -> Result<Assignment, EngineError> {
        let (rest, _) = Self::detach(snapshot, id, hint)?;
        self.place_full(&rest, hint)
            .map(Placement::into_assignment)
    }

    /// Renumbers every existing sibling evenly, inserting nothing.
    pub fn renumber(&self, snapshot: &Snapshot) -> Result<Vec<Reposition>, EngineError> {
        let repositions = rebalance::renumber_all(self.space(), snapshot.siblings())?;
        tracing::info!(
            scope = %snapshot.scope(),
            siblings = snapshot.len(),
            rewritten = repositions.len(),
            "Renumbered scope"
        );
        Ok(repositions)
    }

    /// Measures spacing in a scope.
    pub fn health(&self, snapshot: &Snapshot) -> ScopeHealth {
        let health = ScopeHealth::measure(self.space(), snapshot);
        if health.near_ceiling {
            tracing::warn!(
                scope = %snapshot.scope(),
                max_position = ?health.max_position,
                ceiling = self.space().ceiling,
                "Scope is approaching the position ceiling"
            );
        }
        health
    }

    /// Takes the moved record out of the sibling list.
    fn detach(
        snapshot: &Snapshot,
        id: &RecordId,
        hint: &TargetHint,
    ) -> Result<(Vec<Sibling>, Position), EngineError> {
        if hint.anchor() == Some(id) {
            return Err(EngineError::SelfReference { id: id.clone() });
        }
        let index = snapshot
            .index_of(id)
            .ok_or_else(|| EngineError::UnknownSibling { id: id.clone() })?;
        let current = snapshot.siblings()[index].position;
        let mut rest = snapshot.siblings().to_vec();
        rest.remove(index);
        Ok((rest, current))
    }

    fn place(
        &self,
        siblings: &[Sibling],
        hint: &TargetHint,
        current: Option<Position>,
    ) -> Result<Placement, EngineError> {
        let space = self.space();
        let neighbors = neighbors::resolve(siblings, hint)?;
        let index = neighbors.index;
        let shared = rebalance::duplicate_span(siblings);

        if let Some(current) = current
            && shared.is_none()
            && hint.explicit().is_none()
            && current > neighbors.prev.map_or(Position::ZERO, |s| s.position)
            && neighbors.next.is_none_or(|s| current < s.position)
        {
            tracing::debug!(position = %current, "Move keeps its current position");
            return Ok(Placement::DirectInsert(current));
        }

        let verdict = match shared {
            None => gap::evaluate(space, &neighbors, hint),
            Some((first, last)) => {
                tracing::debug!(first, last, "Siblings share a value, forcing a rebalance");
                GapVerdict::Crowded
            }
        };

        let placement = match verdict {
            GapVerdict::Accept(position) => {
                tracing::debug!(position = %position, index, "Direct insert");
                Placement::DirectInsert(position)
            }
            GapVerdict::Crowded => {
                let window =
                    rebalance::local_window(space, &self.config.rebalance, siblings, index)?;
                let (position, repositions) = rebalance::apply(siblings, &window);
                tracing::debug!(
                    position = %position,
                    index,
                    window = window.len(),
                    step = window.step,
                    full_scope = window.full_scope,
                    rewritten = repositions.len(),
                    "Rebalanced window"
                );
                Placement::Rebalance {
                    window,
                    position,
                    repositions,
                }
            }
        };

        debug_assert!(
            is_consistent(siblings, index, &placement),
            "placement breaks ordering: {placement:?}"
        );
        Ok(placement)
    }

    fn place_full(
        &self,
        siblings: &[Sibling],
        hint: &TargetHint,
    ) -> Result<Placement, EngineError> {
        let index = neighbors::resolve(siblings, hint)?.index;
        let window = rebalance::full_window(self.space(), siblings, index)?;
        let (position, repositions) = rebalance::apply(siblings, &window);
        tracing::info!(
            position = %position,
            siblings = siblings.len(),
            step = window.step,
            rewritten = repositions.len(),
            "Renumbered scope around new record"
        );
        let placement = Placement::Rebalance {
            window,
            position,
            repositions,
        };
        debug_assert!(is_consistent(siblings, index, &placement));
        Ok(placement)
    }
}

/// Checks that applying `placement` leaves the scope strictly increasing, so
/// every value is unique.
fn is_consistent(siblings: &[Sibling], index: usize, placement: &Placement) -> bool {
    let moved: HashMap<&RecordId, Position> = placement
        .repositions()
        .iter()
        .map(|r| (&r.id, r.position))
        .collect();
    let mut values: Vec<Position> = siblings
        .iter()
        .map(|s| moved.get(&s.id).copied().unwrap_or(s.position))
        .collect();
    let position = placement.position();
    values.insert(index, position);

    values.windows(2).all(|pair| pair[0] < pair[1]) && position > Position::ZERO
}
