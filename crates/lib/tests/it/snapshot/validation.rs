use positionable::{Error, ScopeKey, Sibling, Snapshot, SnapshotError};

use crate::helpers::*;

#[test]
fn test_malformed_snapshots_are_rejected() {
    let negative = Snapshot::new(test_scope(), vec![Sibling::new("a", -5)]);
    assert!(matches!(
        negative,
        Err(SnapshotError::NegativePosition { .. })
    ));

    let duplicate = Snapshot::new(
        test_scope(),
        vec![Sibling::new("a", 1), Sibling::new("a", 2)],
    );
    assert!(matches!(duplicate, Err(SnapshotError::DuplicateId { .. })));

    let unsorted = Snapshot::new(
        test_scope(),
        vec![Sibling::new("a", 2), Sibling::new("b", 1)],
    );
    assert!(matches!(unsorted, Err(SnapshotError::Unsorted { .. })));
}

#[test]
fn test_snapshot_error_converts_into_crate_error() {
    let err: Error = Snapshot::new(ScopeKey::from("s"), vec![Sibling::new("a", -1)])
        .unwrap_err()
        .into();
    assert_eq!(err.module(), "snapshot");
    assert!(err.is_snapshot_error());
    assert!(!err.is_not_found());
}

#[test]
fn test_equal_positions_order_by_id() {
    let snapshot = Snapshot::from_unsorted(
        test_scope(),
        vec![
            Sibling::new("charlie", 10),
            Sibling::new("alpha", 10),
            Sibling::new("bravo", 10),
        ],
    )
    .unwrap();
    assert_eq!(ids(&snapshot), vec!["alpha", "bravo", "charlie"]);
    assert!(!snapshot.has_unique_positions());
}

#[test]
fn test_snapshot_json_round_trip() {
    let snapshot = snapshot_of(&[("a", 1), ("b", 2)]);
    let json = serde_json::to_string(&snapshot).unwrap();
    let decoded: Snapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, snapshot);
}
