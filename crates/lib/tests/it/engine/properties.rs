//! Property tests: random insert and move sequences must keep positions
//! unique and produce exactly the order the hints ask for.

use positionable::{
    Engine, EngineConfig, Position, PositionSpace, RecordId, Sibling, Snapshot, TargetHint,
};
use proptest::prelude::*;

use crate::helpers::*;

#[derive(Debug, Clone)]
enum Hint {
    Head,
    Tail,
    After(usize),
    Before(usize),
    At(i64),
}

#[derive(Debug, Clone)]
enum Op {
    Insert(Hint),
    Move(usize, Hint),
}

fn hint_strategy() -> impl Strategy<Value = Hint> {
    prop_oneof![
        Just(Hint::Head),
        Just(Hint::Tail),
        any::<usize>().prop_map(Hint::After),
        any::<usize>().prop_map(Hint::Before),
        (0i64..300_000).prop_map(Hint::At),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => hint_strategy().prop_map(Op::Insert),
        1 => (any::<usize>(), hint_strategy()).prop_map(|(i, h)| Op::Move(i, h)),
    ]
}

/// Scopes packed into a narrow range, so many siblings share a value.
fn crowded_snapshot_strategy() -> impl Strategy<Value = Snapshot> {
    prop::collection::vec(0i64..16, 0..12).prop_map(|positions| {
        let siblings = positions
            .iter()
            .enumerate()
            .map(|(i, p)| Sibling::new(format!("s{i:02}"), *p))
            .collect();
        Snapshot::from_unsorted(test_scope(), siblings).expect("generated ids are distinct")
    })
}

/// Resolves a generated hint against `order` (the scope without the record
/// being placed), returning the engine hint and the rank it must land at.
fn resolve(hint: &Hint, order: &[String], snapshot: &Snapshot) -> (TargetHint, usize) {
    match hint {
        Hint::Head => (TargetHint::Head, 0),
        Hint::Tail => (TargetHint::Tail, order.len()),
        Hint::After(k) if !order.is_empty() => {
            let k = k % order.len();
            (TargetHint::after(order[k].as_str()), k + 1)
        }
        Hint::Before(k) if !order.is_empty() => {
            let k = k % order.len();
            (TargetHint::before(order[k].as_str()), k)
        }
        Hint::At(p) => {
            let rank = snapshot
                .siblings()
                .partition_point(|s| s.position < Position::new(*p));
            (TargetHint::at(*p), rank)
        }
        Hint::After(_) | Hint::Before(_) => (TargetHint::Tail, order.len()),
    }
}

fn run(engine: &Engine, mut snapshot: Snapshot, ops: &[Op]) -> Result<(), TestCaseError> {
    let mut model = ids(&snapshot);

    for (n, op) in ops.iter().enumerate() {
        match op {
            Op::Insert(hint) => {
                let id = format!("r{n}");
                let (target, rank) = resolve(hint, &model, &snapshot);
                snapshot = insert(engine, &snapshot, &id, &target);
                model.insert(rank, id);
            }
            Op::Move(_, _) if model.is_empty() => continue,
            Op::Move(i, hint) => {
                let id = model.remove(i % model.len());
                let rest = snapshot
                    .without(&RecordId::from(id.as_str()))
                    .expect("model and snapshot agree");
                let (target, rank) = resolve(hint, &model, &rest);
                snapshot = move_to(engine, &snapshot, &id, &target);
                model.insert(rank, id);
            }
        }
        prop_assert!(snapshot.has_unique_positions());
        prop_assert_eq!(ids(&snapshot), model.clone());
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_default_space_keeps_order(ops in prop::collection::vec(op_strategy(), 1..60)) {
        run(&Engine::default(), Snapshot::empty(test_scope()), &ops)?;
    }

    #[test]
    fn prop_small_gap_keeps_order(ops in prop::collection::vec(op_strategy(), 1..80)) {
        // A tiny gap forces frequent rebalancing and window widening.
        let engine = Engine::new(EngineConfig::with_space(PositionSpace::with_gap(16))).unwrap();
        run(&engine, Snapshot::empty(test_scope()), &ops)?;
    }

    #[test]
    fn prop_shared_values_are_spread_by_first_op(
        snapshot in crowded_snapshot_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..30),
    ) {
        run(&Engine::default(), snapshot, &ops)?;
    }

    #[test]
    fn prop_shared_values_with_small_gap(
        snapshot in crowded_snapshot_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..30),
    ) {
        let engine = Engine::new(EngineConfig::with_space(PositionSpace::with_gap(16))).unwrap();
        run(&engine, snapshot, &ops)?;
    }

    #[test]
    fn prop_capped_window_with_escalation_keeps_order(
        ops in prop::collection::vec(op_strategy(), 1..60),
    ) {
        let engine = Engine::new(
            EngineConfig::with_space(PositionSpace::with_gap(16)).with_max_window(4),
        )
        .unwrap();

        let mut snapshot = Snapshot::empty(test_scope());
        let mut model: Vec<String> = Vec::new();
        for (n, op) in ops.iter().enumerate() {
            let Op::Insert(hint) = op else { continue };
            let id = format!("r{n}");
            let (target, rank) = resolve(hint, &model, &snapshot);
            let assignment = match engine.assign(&snapshot, &target) {
                Err(err) if err.requires_renumber() => {
                    engine.assign_with_renumber(&snapshot, &target).unwrap()
                }
                other => other.unwrap(),
            };
            snapshot = apply(&snapshot, &id, &assignment);
            model.insert(rank, id);
            prop_assert!(snapshot.has_unique_positions());
            prop_assert_eq!(ids(&snapshot), model.clone());
        }
    }

    #[test]
    fn prop_renumber_is_idempotent(positions in prop::collection::vec(0i64..1_000, 0..50)) {
        let engine = Engine::default();
        let siblings = positions
            .iter()
            .enumerate()
            .map(|(i, p)| Sibling::new(format!("s{i:03}"), *p))
            .collect();
        let snapshot = Snapshot::from_unsorted(test_scope(), siblings).unwrap();

        let first = engine.renumber(&snapshot).unwrap();
        let renumbered = snapshot.apply_repositions(&first).unwrap();
        prop_assert_eq!(ids(&renumbered), ids(&snapshot));
        prop_assert!(renumbered.has_unique_positions());
        prop_assert!(engine.renumber(&renumbered).unwrap().is_empty());
        prop_assert!(!engine.health(&renumbered).needs_renumber());
    }

    #[test]
    fn prop_direct_insert_touches_nothing(p in 1i64..65_536) {
        let engine = Engine::default();
        let snapshot = snapshot_of(&[("a", 0), ("b", 65_536)]);
        let assignment = engine.assign(&snapshot, &TargetHint::at(p)).unwrap();
        prop_assert_eq!(assignment.position, Position::new(p));
        prop_assert!(assignment.repositions.is_empty());
    }
}
