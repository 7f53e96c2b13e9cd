#![cfg(test)]

// Property tests for GraphDict kept inside the crate so they can check the
// internal NodeIndex invariants after every step.

use crate::error::GraphError;
use crate::graph_dict::GraphDict;
use crate::targets::Targets;
use proptest::prelude::*;
use std::collections::HashSet;

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// nodes, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, usize),
    InsertNode(usize),
    Remove(usize),
    DeleteLink(usize, usize),
    Disconnect(usize, usize),
    MakeLoop(usize),
    Reindex,
    Pop(usize),
    PopItem,
}

// Reference model: nodes in insertion order plus edges by value.
#[derive(Default)]
struct Model {
    order: Vec<String>,
    edges: HashSet<(String, String)>,
}

impl Model {
    fn intern(&mut self, k: &str) {
        if !self.order.iter().any(|o| o == k) {
            self.order.push(k.to_string());
        }
    }

    fn contains(&self, k: &str) -> bool {
        self.order.iter().any(|o| o == k)
    }

    fn targets(&self, k: &str) -> Targets<String> {
        self.edges
            .iter()
            .filter(|(a, _)| a == k)
            .map(|(_, b)| b.clone())
            .collect()
    }

    fn detach(&mut self, k: &str) {
        self.edges.retain(|(a, b)| a != k && b != k);
    }

    fn reindex(&mut self) {
        let edges = &self.edges;
        self.order
            .retain(|k| edges.iter().any(|(a, b)| a == k || b == k));
    }
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::hash_set("[a-z]{1,3}", 1..=8).prop_flat_map(|pool| {
        let pool: Vec<String> = pool.into_iter().collect();
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), idx.clone()).prop_map(|(i, j)| OpI::Insert(i, j)),
            1 => idx.clone().prop_map(OpI::InsertNode),
            1 => idx.clone().prop_map(OpI::Remove),
            1 => (idx.clone(), idx.clone()).prop_map(|(i, j)| OpI::DeleteLink(i, j)),
            1 => (idx.clone(), idx.clone()).prop_map(|(i, j)| OpI::Disconnect(i, j)),
            1 => idx.clone().prop_map(OpI::MakeLoop),
            1 => Just(OpI::Reindex),
            1 => idx.clone().prop_map(OpI::Pop),
            1 => Just(OpI::PopItem),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Property: state-machine equivalence against a by-value model.
// Invariants exercised across random operation sequences:
// - `get` matches the model's targets for present nodes; absent nodes fail.
// - Positions equal the model's insertion rank and stay contiguous.
// - Targets and sources stay mirrored; no edge points past the end.
// - `pop` returns the pre-call `get`; `reindex` is idempotent.
// - After `reindex`, `get_dict()[k] == get(k)` for every key.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: GraphDict<String> = GraphDict::new();
        let mut model = Model::default();

        for op in ops {
            match op {
                OpI::Insert(i, j) => {
                    let (k, v) = (&pool[i], &pool[j]);
                    sut.insert(k.clone(), v.clone());
                    model.intern(v);
                    model.intern(k);
                    model.edges.insert((k.clone(), v.clone()));
                }
                OpI::InsertNode(i) => {
                    sut.insert_node(pool[i].clone());
                    model.intern(&pool[i]);
                }
                OpI::Remove(i) => {
                    let k = &pool[i];
                    let res = sut.remove(k.as_str());
                    if model.contains(k) {
                        prop_assert_eq!(res, Ok(()));
                        model.detach(k);
                    } else {
                        prop_assert_eq!(res, Err(GraphError::NodeNotFound));
                    }
                }
                OpI::DeleteLink(i, j) => {
                    let (k, v) = (&pool[i], &pool[j]);
                    let removed = sut.delete_link(k.as_str(), v.as_str());
                    let expected = model.edges.remove(&(k.clone(), v.clone()));
                    prop_assert_eq!(removed, expected);
                }
                OpI::Disconnect(i, j) => {
                    let (a, b) = (&pool[i], &pool[j]);
                    let removed = sut.disconnect(a.as_str(), b.as_str());
                    let fwd = model.edges.remove(&(a.clone(), b.clone()));
                    let bwd = model.edges.remove(&(b.clone(), a.clone()));
                    prop_assert_eq!(removed, fwd || bwd);
                }
                OpI::MakeLoop(i) => {
                    let k = &pool[i];
                    sut.make_loops_for([k.clone()]);
                    model.intern(k);
                    model.edges.insert((k.clone(), k.clone()));
                }
                OpI::Reindex => {
                    let before = sut.len();
                    let purged = sut.reindex();
                    model.reindex();
                    prop_assert_eq!(before - purged, model.order.len());
                    prop_assert_eq!(sut.reindex(), 0, "reindex must be idempotent");
                    let snapshot = sut.get_dict();
                    for (k, targets) in &snapshot {
                        let live = sut.get(k.as_str()).map(|t| t.cloned());
                        prop_assert_eq!(live.as_ref(), Ok(targets));
                    }
                }
                OpI::Pop(i) => {
                    let k = &pool[i];
                    let res = sut.pop(k.as_str());
                    if model.contains(k) {
                        prop_assert_eq!(res, Ok(model.targets(k)));
                        model.detach(k);
                        model.reindex();
                        prop_assert!(!sut.contains_key(k.as_str()));
                    } else {
                        prop_assert_eq!(res, Err(GraphError::NodeNotFound));
                    }
                }
                OpI::PopItem => {
                    let res = sut.popitem();
                    match model.order.pop() {
                        Some(last) => {
                            let expected = model.targets(&last);
                            model.detach(&last);
                            prop_assert_eq!(res, Ok((last, expected)));
                        }
                        None => prop_assert_eq!(res, Err(GraphError::Empty)),
                    }
                }
            }

            // Post-conditions after each op
            sut.nodes.assert_consistent();
            prop_assert_eq!(sut.len(), model.order.len());
            for (p, k) in model.order.iter().enumerate() {
                prop_assert_eq!(sut.position(k.as_str()), Some(p));
                let got = sut.get(k.as_str()).map(|t| t.cloned());
                prop_assert_eq!(got, Ok(model.targets(k)));
            }
            for k in &pool {
                if !model.contains(k) {
                    prop_assert_eq!(sut.get(k.as_str()), Err(GraphError::NodeNotFound));
                }
            }
        }
    }
}
