//! Gap evaluation: can the new record take a value without moving anyone?

use super::neighbors::{Neighbors, TargetHint};
use crate::config::PositionSpace;
use crate::position::Position;

/// Outcome of checking a resolved slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GapVerdict {
    /// The value fits strictly between the neighbours.
    Accept(Position),
    /// No usable value exists; a window must be renumbered.
    Crowded,
}

/// Decides whether the slot described by `neighbors` is directly insertable.
///
/// An explicit value is kept when it lies strictly inside the slot (the
/// implicit lower bound of a scope is zero, exclusive). An explicit value
/// equal to an occupied position always forces a rebalance. Otherwise the
/// candidate depends on which neighbours exist: `gap` for an empty scope,
/// half of the first position at the head, `prev + gap` at the tail, and the
/// integer midpoint between two neighbours.
pub(crate) fn evaluate(
    space: &PositionSpace,
    neighbors: &Neighbors<'_>,
    hint: &TargetHint,
) -> GapVerdict {
    let prev = neighbors.prev.map(|s| s.position);
    let next = neighbors.next.map(|s| s.position);

    if let Some(requested) = hint.explicit() {
        if next == Some(requested) || prev == Some(requested) {
            return GapVerdict::Crowded;
        }
        let lower = prev.unwrap_or(Position::ZERO);
        let fits = requested > lower
            && next.is_none_or(|next| requested < next)
            && requested.get() <= space.ceiling;
        if fits {
            return GapVerdict::Accept(requested);
        }
    }

    match (prev, next) {
        (None, None) => GapVerdict::Accept(Position::new(space.gap)),
        (None, Some(next)) => {
            let candidate = Position::new(next.get() / 2);
            if candidate > Position::ZERO && candidate < next {
                GapVerdict::Accept(candidate)
            } else {
                GapVerdict::Crowded
            }
        }
        (Some(prev), None) => match prev.checked_add(space.gap) {
            Some(candidate) if candidate.get() <= space.ceiling => GapVerdict::Accept(candidate),
            _ => {
                tracing::warn!(
                    prev = %prev,
                    ceiling = space.ceiling,
                    "Tail insert would pass the position ceiling"
                );
                GapVerdict::Crowded
            }
        },
        (Some(prev), Some(next)) => match prev.midpoint(next) {
            Some(candidate) => GapVerdict::Accept(candidate),
            None => GapVerdict::Crowded,
        },
    }
}
