//! Window rebalancing.
//!
//! A window of existing siblings plus the new record has `slots` entries.
//! They are spread evenly over the span between the sibling just before the
//! window (or zero) and the sibling just after it: `step = span / (slots + 1)`
//! and slot `k` receives `lower + k * step`. A window that reaches the tail of
//! the scope has no upper neighbour and uses `gap` as its span, or `gap` per
//! slot when `gap` alone is too small to keep `min_gap` between slots.
//!
//! The window starts at the two siblings bounding the insertion point, grown
//! to take in every pair of siblings sharing a value, and widens by one
//! sibling on each side until the step reaches `min_gap`.

use super::EngineError;
use super::placement::{Reposition, Window};
use crate::config::{PositionSpace, RebalancePolicy};
use crate::position::Position;
use crate::snapshot::Sibling;

/// Evenly spaced values starting above `lower`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Layout {
    lower: Position,
    step: i64,
}

impl Layout {
    /// Value of slot `k`, counting from 1.
    pub(crate) fn slot(&self, k: usize) -> Position {
        Position::new(self.lower.get() + k as i64 * self.step)
    }

    pub(crate) fn step(&self) -> i64 {
        self.step
    }
}

enum Fit {
    Fits(Layout),
    TooNarrow { step: i64 },
    PastCeiling { required: i128 },
}

fn fit(space: &PositionSpace, slots: usize, lower: Position, upper: Option<Position>) -> Fit {
    let divisor = slots as i128 + 1;
    let gap = i128::from(space.gap);
    let min_gap = i128::from(space.min_gap);

    let span = match upper {
        Some(upper) => i128::from(upper.get()) - i128::from(lower.get()),
        None if gap / divisor >= min_gap => gap,
        None => gap * divisor,
    };
    let step = span / divisor;
    if step < min_gap {
        return Fit::TooNarrow {
            step: step as i64,
        };
    }

    let last = i128::from(lower.get()) + slots as i128 * step;
    if last > i128::from(space.ceiling) {
        return Fit::PastCeiling { required: last };
    }

    Fit::Fits(Layout {
        lower,
        step: step as i64,
    })
}

/// Lays out `slots` values above `lower`, failing instead of widening.
pub(crate) fn layout(
    space: &PositionSpace,
    slots: usize,
    lower: Position,
    upper: Option<Position>,
) -> Result<Layout, EngineError> {
    match fit(space, slots, lower, upper) {
        Fit::Fits(layout) => Ok(layout),
        Fit::TooNarrow { step } => Err(EngineError::WindowExhausted {
            window: slots,
            step,
        }),
        Fit::PastCeiling { required } => Err(EngineError::CeilingExceeded {
            required,
            ceiling: space.ceiling,
        }),
    }
}

/// Range `[first, last)` covering every run of siblings that share a value.
///
/// Siblings are sorted, so equal values are always adjacent.
pub(crate) fn duplicate_span(siblings: &[Sibling]) -> Option<(usize, usize)> {
    let mut pairs = siblings
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0].position == pair[1].position)
        .map(|(i, _)| i);
    let first = pairs.next()?;
    let last = pairs.last().unwrap_or(first);
    Some((first, last + 2))
}

/// Finds the smallest window around `index` that leaves `min_gap` between
/// every pair of slots and covers every sibling sharing a value.
pub(crate) fn local_window(
    space: &PositionSpace,
    policy: &RebalancePolicy,
    siblings: &[Sibling],
    index: usize,
) -> Result<Window, EngineError> {
    let len = siblings.len();
    let mut start = index.saturating_sub(1);
    let mut end = (index + 1).min(len);
    if let Some((first, last)) = duplicate_span(siblings) {
        start = start.min(first);
        end = end.max(last);
    }

    if let Some(max_window) = policy.max_window
        && end - start > max_window
    {
        tracing::warn!(
            window = end - start,
            max_window,
            "Siblings sharing a value lie outside the local window cap"
        );
        return Err(EngineError::WindowExhausted {
            window: end - start,
            step: 0,
        });
    }

    loop {
        let lower = match start {
            0 => Position::ZERO,
            _ => siblings[start - 1].position,
        };
        let upper = siblings.get(end).map(|s| s.position);
        let full_scope = start == 0 && end == len;

        let failure = match fit(space, end - start + 1, lower, upper) {
            Fit::Fits(layout) => {
                return Ok(Window {
                    start,
                    end,
                    insert_rank: index - start,
                    lower,
                    step: layout.step,
                    full_scope,
                });
            }
            Fit::TooNarrow { step } => EngineError::WindowExhausted {
                window: end - start,
                step,
            },
            Fit::PastCeiling { required } => EngineError::CeilingExceeded {
                required,
                ceiling: space.ceiling,
            },
        };

        if full_scope {
            return Err(failure);
        }

        let wider_start = start.saturating_sub(1);
        let wider_end = (end + 1).min(len);
        if let Some(max_window) = policy.max_window
            && wider_end - wider_start > max_window
        {
            tracing::warn!(
                window = end - start,
                max_window,
                error = %failure,
                "Local rebalance window exhausted"
            );
            return Err(match failure {
                EngineError::CeilingExceeded { .. } => EngineError::WindowExhausted {
                    window: end - start,
                    step: 0,
                },
                other => other,
            });
        }
        start = wider_start;
        end = wider_end;
    }
}

/// Lays out the whole scope plus a new record at `index`.
pub(crate) fn full_window(
    space: &PositionSpace,
    siblings: &[Sibling],
    index: usize,
) -> Result<Window, EngineError> {
    let layout = layout(space, siblings.len() + 1, Position::ZERO, None)?;
    Ok(Window {
        start: 0,
        end: siblings.len(),
        insert_rank: index,
        lower: Position::ZERO,
        step: layout.step,
        full_scope: true,
    })
}

/// Assigns every slot of `window`, returning the new record's value and the
/// siblings whose value changed.
pub(crate) fn apply(siblings: &[Sibling], window: &Window) -> (Position, Vec<Reposition>) {
    let layout = Layout {
        lower: window.lower,
        step: window.step,
    };
    let position = layout.slot(window.insert_rank + 1);
    let mut repositions = Vec::new();

    for slot in 0..window.slots() {
        if slot == window.insert_rank {
            continue;
        }
        let value = layout.slot(slot + 1);
        let sibling = &siblings[window.start + slot - usize::from(slot > window.insert_rank)];
        if sibling.position != value {
            repositions.push(Reposition {
                id: sibling.id.clone(),
                position: value,
            });
        }
    }

    (position, repositions)
}

/// Renumbers every sibling of a scope without inserting anything.
pub(crate) fn renumber_all(
    space: &PositionSpace,
    siblings: &[Sibling],
) -> Result<Vec<Reposition>, EngineError> {
    if siblings.is_empty() {
        return Ok(Vec::new());
    }
    let layout = layout(space, siblings.len(), Position::ZERO, None)?;
    Ok(siblings
        .iter()
        .enumerate()
        .filter_map(|(slot, sibling)| {
            let value = layout.slot(slot + 1);
            (sibling.position != value).then(|| Reposition {
                id: sibling.id.clone(),
                position: value,
            })
        })
        .collect())
}
