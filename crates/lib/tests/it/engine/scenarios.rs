use positionable::{Engine, Position, Reposition, Snapshot, TargetHint};

use crate::helpers::*;

#[test]
fn test_direct_insert_between_distant_siblings() {
    let engine = Engine::default();
    let snapshot = snapshot_of(&[("a", 1000), ("b", 2000)]);

    let assignment = engine.assign(&snapshot, &TargetHint::at(1500)).unwrap();
    assert_eq!(assignment.position, Position::new(1500));
    assert!(assignment.repositions.is_empty());
}

#[test]
fn test_collision_splits_gap_evenly() {
    let engine = Engine::default();
    let snapshot = snapshot_of(&[("first", 1000), ("second", 1001)]);

    let assignment = engine.assign(&snapshot, &TargetHint::at(1001)).unwrap();
    assert_eq!(assignment.position, Position::new(32768));
    assert_eq!(
        assignment.repositions,
        vec![
            Reposition::new("first", 16384),
            Reposition::new("second", 49152),
        ]
    );
}

#[test]
fn test_insert_elsewhere_spreads_shared_values() {
    let engine = Engine::default();
    let snapshot = snapshot_of(&[("a", 1000), ("b", 2000), ("c", 2000)]);

    // 1500 is free, but "b" and "c" share a value and must be pulled apart.
    let assignment = engine.assign(&snapshot, &TargetHint::at(1500)).unwrap();
    assert_eq!(assignment.position, Position::new(26214));
    assert_eq!(
        assignment.repositions,
        vec![
            Reposition::new("a", 13107),
            Reposition::new("b", 39321),
            Reposition::new("c", 52428),
        ]
    );

    let after = apply(&snapshot, "new", &assignment);
    assert_eq!(ids(&after), vec!["a", "new", "b", "c"]);
    assert_well_formed(&after);
}

#[test]
fn test_move_repairs_distant_shared_values() {
    let engine = Engine::default();
    let snapshot = snapshot_of(&[
        ("a", 1000),
        ("b", 50000),
        ("c", 90000),
        ("d", 90000),
        ("e", 200000),
    ]);

    let after = move_to(&engine, &snapshot, "a", &TargetHint::after("b"));
    assert_eq!(ids(&after), vec!["b", "a", "c", "d", "e"]);
    assert_well_formed(&after);
}

#[test]
fn test_first_insert_gets_gap() {
    let engine = Engine::default();
    let snapshot = Snapshot::empty(test_scope());

    let assignment = engine.assign(&snapshot, &TargetHint::Tail).unwrap();
    assert_eq!(assignment.position, Position::new(65536));
    assert!(assignment.repositions.is_empty());
}

#[test]
fn test_tail_insert_after_single_sibling() {
    let engine = Engine::default();
    let snapshot = snapshot_of(&[("only", 12345)]);

    let assignment = engine.assign(&snapshot, &TargetHint::Tail).unwrap();
    assert_eq!(assignment.position, Position::new(12345 + 65536));
    assert!(assignment.repositions.is_empty());
}

#[test]
fn test_building_a_list_with_mixed_hints() {
    let engine = Engine::default();
    let mut snapshot = Snapshot::empty(test_scope());

    snapshot = insert(&engine, &snapshot, "b", &TargetHint::Tail);
    snapshot = insert(&engine, &snapshot, "d", &TargetHint::Tail);
    snapshot = insert(&engine, &snapshot, "a", &TargetHint::Head);
    snapshot = insert(&engine, &snapshot, "c", &TargetHint::after("b"));
    snapshot = insert(&engine, &snapshot, "e", &TargetHint::Tail);
    snapshot = insert(&engine, &snapshot, "c2", &TargetHint::before("d"));

    assert_eq!(ids(&snapshot), vec!["a", "b", "c", "c2", "d", "e"]);
    assert_well_formed(&snapshot);
}

#[test]
fn test_repeated_inserts_at_same_slot_stay_ordered() {
    let engine = Engine::default();
    let mut snapshot = snapshot_of(&[("left", 65536), ("right", 131072)]);

    // Each insert lands directly before "right", halving the same gap until it
    // runs out and a rebalance kicks in.
    for i in 0..40 {
        snapshot = insert(&engine, &snapshot, &format!("n{i}"), &TargetHint::before("right"));
        assert_well_formed(&snapshot);
    }

    let order = ids(&snapshot);
    assert_eq!(order.first().map(String::as_str), Some("left"));
    assert_eq!(order.last().map(String::as_str), Some("right"));
    let expected: Vec<String> = (0..40).map(|i| format!("n{i}")).collect();
    assert_eq!(&order[1..41], expected.as_slice());
}

#[test]
fn test_repeated_head_inserts_stay_ordered() {
    let engine = Engine::default();
    let mut snapshot = Snapshot::empty(test_scope());

    for i in 0..40 {
        snapshot = insert(&engine, &snapshot, &format!("h{i}"), &TargetHint::Head);
        assert_well_formed(&snapshot);
    }

    let expected: Vec<String> = (0..40).rev().map(|i| format!("h{i}")).collect();
    assert_eq!(ids(&snapshot), expected);
}

#[test]
fn test_rebalance_leaves_far_siblings_untouched() {
    let engine = Engine::default();
    let snapshot = snapshot_of(&[
        ("a", 65536),
        ("b", 131072),
        ("c", 131073),
        ("d", 196608),
    ]);

    let placement = engine.plan(&snapshot, &TargetHint::before("c")).unwrap();
    assert!(placement.is_rebalance());
    let touched: Vec<&str> = placement
        .repositions()
        .iter()
        .map(|r| r.id.as_str())
        .collect();
    assert!(!touched.contains(&"a"));
    assert!(!touched.contains(&"d"));
}

#[test]
fn test_assignment_serializes_to_wire_shape() {
    let engine = Engine::default();
    let snapshot = snapshot_of(&[("first", 1000), ("second", 2000)]);

    let assignment = engine.assign(&snapshot, &TargetHint::Tail).unwrap();
    let json = serde_json::to_value(&assignment).unwrap();
    assert_eq!(json["position"], 2000 + 65536);
    assert_eq!(json["repositions"], serde_json::json!([]));
}

#[test]
fn test_health_flags_crowded_scope() {
    let engine = Engine::default();
    let crowded = snapshot_of(&[("a", 5), ("b", 6), ("c", 100000)]);

    let health = engine.health(&crowded);
    assert!(health.needs_renumber());
    assert_eq!(health.crowded.len(), 1);

    let repositions = engine.renumber(&crowded).unwrap();
    let renumbered = crowded.apply_repositions(&repositions).unwrap();
    assert_eq!(ids(&renumbered), ids(&crowded));
    assert!(!engine.health(&renumbered).needs_renumber());
}
