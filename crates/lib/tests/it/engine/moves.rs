use positionable::{Engine, EngineConfig, EngineError, RecordId, TargetHint};

use crate::helpers::*;

#[test]
fn test_move_to_tail_and_back() {
    let engine = Engine::default();
    let mut snapshot = snapshot_of(&[("a", 65536), ("b", 131072), ("c", 196608)]);

    snapshot = move_to(&engine, &snapshot, "a", &TargetHint::Tail);
    assert_eq!(ids(&snapshot), vec!["b", "c", "a"]);

    snapshot = move_to(&engine, &snapshot, "a", &TargetHint::Head);
    assert_eq!(ids(&snapshot), vec!["a", "b", "c"]);
    assert_well_formed(&snapshot);
}

#[test]
fn test_move_between_crowded_neighbours_rebalances() {
    let engine = Engine::default();
    let snapshot = snapshot_of(&[("a", 100), ("b", 101), ("c", 5000)]);

    let after = move_to(&engine, &snapshot, "c", &TargetHint::after("a"));
    assert_eq!(ids(&after), vec!["a", "c", "b"]);
    assert_well_formed(&after);
}

#[test]
fn test_move_to_explicit_position() {
    let engine = Engine::default();
    let snapshot = snapshot_of(&[("a", 1000), ("b", 2000), ("c", 3000)]);

    let assignment = engine
        .assign_move(&snapshot, &RecordId::from("a"), &TargetHint::at(2500))
        .unwrap();
    assert_eq!(assignment.position.get(), 2500);
    let after = apply(&snapshot, "a", &assignment);
    assert_eq!(ids(&after), vec!["b", "a", "c"]);
}

#[test]
fn test_move_onto_itself_is_a_contract_violation() {
    let engine = Engine::default();
    let snapshot = snapshot_of(&[("a", 1000), ("b", 2000)]);

    let err = engine
        .assign_move(&snapshot, &RecordId::from("b"), &TargetHint::after("b"))
        .unwrap_err();
    assert!(matches!(err, EngineError::SelfReference { .. }));
    assert!(err.is_contract_violation());
}

#[test]
fn test_capped_move_escalates() {
    let engine = Engine::new(EngineConfig::default().with_max_window(2)).unwrap();
    let snapshot = snapshot_of(&[("a", 10), ("b", 11), ("c", 12), ("d", 13), ("e", 14), ("f", 15)]);
    let id = RecordId::from("f");

    let err = engine
        .assign_move(&snapshot, &id, &TargetHint::after("b"))
        .unwrap_err();
    assert!(err.requires_renumber());

    let assignment = engine
        .assign_move_with_renumber(&snapshot, &id, &TargetHint::after("b"))
        .unwrap();
    let after = apply(&snapshot, "f", &assignment);
    assert_eq!(ids(&after), vec!["a", "b", "f", "c", "d", "e"]);
    assert_well_formed(&after);
}
