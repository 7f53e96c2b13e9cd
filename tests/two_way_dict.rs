// TwoWayDict integration tests.
//
// Invariants exercised:
// - Mirroring: `get(a) == Some(b)` implies `get(b) == Some(a)`.
// - One partner: re-pairing either side unpairs the old partner.
// - Compaction is shared with GraphDict: unpaired nodes are purged.
use graph_dict::{GraphError, TwoWayDict};
use std::collections::HashMap;

// Test: re-pairing through `extend` and compaction.
// Assumes: "key" starts paired with "value".
// Verifies: the old partner is left unpaired, then purged by reindex, and
// the snapshot holds every pair in both directions.
#[test]
fn update_then_reindex() {
    let mut d = TwoWayDict::new();
    d.insert("key", "value");
    assert_eq!(d.get("value"), Ok(Some(&"key")));

    let pairs = HashMap::from([("key", "value2"), ("key2", "value3"), ("key3", "value4")]);
    d.extend(pairs.clone());
    assert_eq!(d.get("value"), Ok(None));
    assert_eq!(d.get("value2"), Ok(Some(&"key")));

    assert_eq!(d.reindex(), 1);
    assert_eq!(d.get("value"), Err(GraphError::NodeNotFound));

    let mut expected = pairs.clone();
    expected.extend(pairs.iter().map(|(k, v)| (*v, *k)));
    assert_eq!(d.get_dict(), expected);
}

// Test: a chain of re-pairings.
// Assumes: each insert tears down both sides before pairing.
// Verifies: only the latest pair survives among the touched nodes.
#[test]
fn chain_of_repairs() {
    let mut d: TwoWayDict<u8> = [(1, 2), (3, 4)].into_iter().collect();
    d.insert(2, 3);
    assert_eq!(d.get(&1), Ok(None));
    assert_eq!(d.get(&4), Ok(None));
    assert_eq!(d.get(&2), Ok(Some(&3)));
    assert_eq!(d.get(&3), Ok(Some(&2)));

    d.insert(4, 1);
    assert_eq!(d.get(&1), Ok(Some(&4)));
    assert_eq!(d.reindex(), 0);
    assert_eq!(d.len(), 4);
}

// Test: equality, clone and Debug delegate to the underlying graph.
#[test]
fn equality_and_debug() {
    let a = TwoWayDict::from([("x", "y")]);
    let mut b = a.clone();
    assert_eq!(a, b);
    b.insert("y", "z");
    assert_ne!(a, b);
    assert_eq!(format!("{:?}", a), r#"{"y": Some("x"), "x": Some("y")}"#);
}

mod prop {
    use graph_dict::TwoWayDict;
    use proptest::prelude::*;

    // Property: for any sequence of inserts and removals over a small pool,
    // every live partner relation is mirrored and no node has more than one
    // partner. Survives compaction at arbitrary points.
    proptest! {
        #[test]
        fn prop_two_way_mirrored(ops in proptest::collection::vec((0u8..=3u8, 0u8..8, 0u8..8), 1..80)) {
            let mut d: TwoWayDict<u8> = TwoWayDict::new();
            for (op, a, b) in ops {
                match op {
                    0 | 1 => d.insert(a, b),
                    2 => { let _ = d.remove(&a); }
                    3 => { d.reindex(); }
                    _ => unreachable!(),
                }

                if op <= 1 {
                    prop_assert_eq!(d.get(&a), Ok(Some(&b)));
                    prop_assert_eq!(d.get(&b), Ok(Some(&a)));
                }
                for (k, partner) in d.iter() {
                    if let Some(p) = partner {
                        prop_assert_eq!(d.get(p), Ok(Some(k)));
                    }
                }
                prop_assert_eq!(d.keys().count(), d.values().count());
            }
        }
    }
}
