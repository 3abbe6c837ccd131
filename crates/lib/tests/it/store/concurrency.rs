use std::sync::Arc;
use std::thread;

use positionable::{
    Engine, EngineConfig, Error, InMemoryStore, PositionSpace, RecordId, RetryPolicy, ScopeKey,
    StoreError, TargetHint,
};

use crate::helpers::*;

#[test]
fn test_concurrent_inserts_never_collide() {
    let store = Arc::new(InMemoryStore::new(
        Engine::new(EngineConfig::with_space(PositionSpace::with_gap(64))).unwrap(),
    ));
    let scope = test_scope();
    store
        .insert(&scope, &RecordId::from("anchor"), &TargetHint::Tail)
        .unwrap();

    let policy = RetryPolicy::new(10_000);
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            let scope = scope.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    let id = RecordId::from(format!("t{t}-{i}"));
                    let hint = match i % 3 {
                        0 => TargetHint::Head,
                        1 => TargetHint::Tail,
                        _ => TargetHint::after("anchor"),
                    };
                    store
                        .insert_with_retry(&scope, &id, &hint, &policy)
                        .expect("insert should succeed after retries");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let current = store.snapshot(&scope);
    assert_eq!(current.snapshot.len(), 1 + 8 * 25);
    assert_well_formed(&current.snapshot);
}

#[test]
fn test_each_thread_keeps_its_own_order() {
    let store = Arc::new(InMemoryStore::default());
    let policy = RetryPolicy::new(10_000);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let scope = ScopeKey::from(format!("scope-{t}"));
                for i in 0..50 {
                    store
                        .insert_with_retry(
                            &scope,
                            &RecordId::from(format!("{i:03}")),
                            &TargetHint::Tail,
                            &policy,
                        )
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.scopes().len(), 4);
    for scope in store.scopes() {
        let snapshot = store.snapshot(&scope).snapshot;
        let expected: Vec<String> = (0..50).map(|i| format!("{i:03}")).collect();
        assert_eq!(ids(&snapshot), expected);
    }
}

#[test]
fn test_single_attempt_surfaces_conflict_as_exhausted() {
    let store = InMemoryStore::default().with_retry_policy(RetryPolicy::new(1));
    let scope = test_scope();
    let stale = store.snapshot(&scope);
    store
        .insert(&scope, &RecordId::from("a"), &TargetHint::Tail)
        .unwrap();

    let assignment = store
        .engine()
        .assign(&stale.snapshot, &TargetHint::Tail)
        .unwrap();
    let err = store
        .commit(&scope, &RecordId::from("b"), stale.version, &assignment)
        .unwrap_err();
    match err {
        Error::Store(StoreError::VersionConflict {
            expected, actual, ..
        }) => assert!(actual > expected),
        other => panic!("expected a version conflict, got {other:?}"),
    }
}
