//! Property-based tests for snapshot stacks and the JSON codec.
//!
//! These tests verify the laws the engine relies on:
//!  - N organic records grow past to N+1 and leave future empty
//!  - step_back followed by step_forward restores the current snapshot
//!  - any organic record after stepping back empties future
//!  - decode(encode(s)) == s for plain data

use proptest::prelude::*;
use rewind_core::{HistoryStore, JsonCodec, Snapshot, SnapshotCodec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Line {
    name: String,
    quantity: u32,
    price: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct State {
    lines: Vec<Line>,
    labels: BTreeMap<String, String>,
    discount: Option<i64>,
    open: bool,
}

fn line_strategy() -> impl Strategy<Value = Line> {
    ("[a-zA-Z ]{0,12}", 0u32..50, -1.0e6f64..1.0e6).prop_map(|(name, quantity, price)| Line {
        name,
        quantity,
        price,
    })
}

fn state_strategy() -> impl Strategy<Value = State> {
    (
        prop::collection::vec(line_strategy(), 0..8),
        prop::collection::btree_map("[a-z]{1,6}", "\\PC{0,10}", 0..5),
        prop::option::of(any::<i64>()),
        any::<bool>(),
    )
        .prop_map(|(lines, labels, discount, open)| State {
            lines,
            labels,
            discount,
            open,
        })
}

fn snapshots_strategy() -> impl Strategy<Value = Vec<Snapshot>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..16), 0..30)
        .prop_map(|payloads| payloads.into_iter().map(Snapshot::from_bytes).collect())
}

// ============================================================================
// History store properties
// ============================================================================

proptest! {
    #[test]
    fn organic_records_grow_past(records in snapshots_strategy()) {
        let n = records.len();
        let mut store = HistoryStore::seed(Snapshot::from_bytes(b"seed".to_vec()));
        for snapshot in records {
            store.record_organic(snapshot);
        }

        prop_assert_eq!(store.past_len(), n + 1);
        prop_assert_eq!(store.future_len(), 0);
    }

    #[test]
    fn step_back_then_forward_restores_current(
        records in snapshots_strategy(),
        undos in 0usize..10
    ) {
        let mut store = HistoryStore::seed(Snapshot::from_bytes(b"seed".to_vec()));
        for snapshot in records {
            store.record_organic(snapshot);
        }
        for _ in 0..undos {
            store.step_back();
        }

        let before = store.current().clone();
        let past_len = store.past_len();
        if store.step_back().is_some() {
            let redone = store.step_forward().cloned();
            prop_assert_eq!(redone, Some(before.clone()));
        }

        prop_assert_eq!(store.current(), &before);
        prop_assert_eq!(store.past_len(), past_len);
    }

    #[test]
    fn record_after_undo_clears_future(
        records in snapshots_strategy(),
        undos in 1usize..10,
        fresh in prop::collection::vec(any::<u8>(), 0..16)
    ) {
        let mut store = HistoryStore::seed(Snapshot::from_bytes(b"seed".to_vec()));
        for snapshot in records {
            store.record_organic(snapshot);
        }
        for _ in 0..undos {
            store.step_back();
        }

        store.record_organic(Snapshot::from_bytes(fresh));

        prop_assert!(!store.can_redo());
        prop_assert!(store.step_forward().is_none());
    }

    #[test]
    fn past_never_empties(
        records in snapshots_strategy(),
        steps in prop::collection::vec(any::<bool>(), 0..40)
    ) {
        let mut store = HistoryStore::seed(Snapshot::from_bytes(b"seed".to_vec()));
        for snapshot in records {
            store.record_organic(snapshot);
        }
        for back in steps {
            if back {
                store.step_back();
            } else {
                store.step_forward();
            }
            prop_assert!(store.past_len() >= 1);
        }
    }

    #[test]
    fn max_history_bounds_past(
        records in snapshots_strategy(),
        max in 0usize..8
    ) {
        let mut store = HistoryStore::with_max_history(Snapshot::from_bytes(b"seed".to_vec()), max);
        for snapshot in records {
            store.record_organic(snapshot);
            prop_assert!(store.past_len() <= max + 1);
            prop_assert!(store.past_len() >= 1);
        }
    }
}

// ============================================================================
// Codec properties
// ============================================================================

proptest! {
    #[test]
    fn json_round_trip(state in state_strategy()) {
        let codec = JsonCodec::new();
        let snapshot = codec.encode(&state).unwrap();
        let restored: State = codec.decode(&snapshot).unwrap();

        prop_assert_eq!(restored, state);
    }

    #[test]
    fn equal_states_encode_equal(state in state_strategy()) {
        let codec = JsonCodec::new();
        let a = codec.encode(&state).unwrap();
        let b = codec.encode(&state.clone()).unwrap();

        prop_assert_eq!(a, b);
    }
}
