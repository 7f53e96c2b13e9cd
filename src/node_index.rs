//! NodeIndex: node storage with stable slot keys and a position table.
//!
//! Each node lives in a `SlotMap` slot. A `HashTable` indexes slots by the
//! precomputed hash of the node, and `order` maps positions to slots. Every
//! slot records its own position, so node -> position, position -> node and
//! node -> slot are all O(1).
//!
//! Edges are sets of positions. Each node keeps both directions: `targets`
//! (outgoing) and `sources` (incoming). The two are kept mirrored:
//! `b in targets(a)` iff `a in sources(b)`.

use crate::compaction;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashTable;
use slotmap::SlotMap;
use std::collections::hash_map::RandomState;

slotmap::new_key_type! {
    /// Stable identifier of a node slot. Unlike a position, it survives
    /// compaction and is never reused for a different node.
    pub(crate) struct NodeId;
}

pub(crate) type EdgeSet = hashbrown::HashSet<usize>;

#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    hash: u64,
    position: usize,
    pub(crate) targets: EdgeSet,
    pub(crate) sources: EdgeSet,
}

impl<K> Node<K> {
    fn new(key: K, hash: u64, position: usize) -> Self {
        Self {
            key,
            hash,
            position,
            targets: EdgeSet::new(),
            sources: EdgeSet::new(),
        }
    }

    /// No outgoing and no incoming edges.
    pub(crate) fn is_lone(&self) -> bool {
        self.targets.is_empty() && self.sources.is_empty()
    }
}

#[derive(Clone)]
pub(crate) struct NodeIndex<K, S = RandomState> {
    hasher: S,
    index: HashTable<NodeId>,
    slots: SlotMap<NodeId, Node<K>>,
    order: Vec<NodeId>, // position -> slot
}

impl<K, S> NodeIndex<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub(crate) fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::with_capacity(capacity),
            slots: SlotMap::with_capacity_and_key(capacity),
            order: Vec::with_capacity(capacity),
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    pub(crate) fn hasher(&self) -> &S {
        &self.hasher
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    fn find<Q>(&self, q: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        self.index
            .find(hash, |&id| {
                self.slots
                    .get(id)
                    .map(|n| n.key.borrow() == q)
                    .unwrap_or(false)
            })
            .copied()
    }

    pub(crate) fn position<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).map(|id| self.slots[id].position)
    }

    /// Position of `key`, appending it as a new edgeless node if absent.
    pub(crate) fn intern(&mut self, key: K) -> usize {
        let hash = self.make_hash(&key);
        match self.index.entry(
            hash,
            |&id| self.slots.get(id).map(|n| n.key == key).unwrap_or(false),
            |&id| self.slots.get(id).map(|n| n.hash).unwrap_or(0),
        ) {
            hashbrown::hash_table::Entry::Occupied(o) => self.slots[*o.get()].position,
            hashbrown::hash_table::Entry::Vacant(v) => {
                let position = self.order.len();
                let id = self.slots.insert(Node::new(key, hash, position));
                let _ = v.insert(id);
                self.order.push(id);
                position
            }
        }
    }

    pub(crate) fn node(&self, position: usize) -> &Node<K> {
        &self.slots[self.order[position]]
    }

    fn node_mut(&mut self, position: usize) -> &mut Node<K> {
        &mut self.slots[self.order[position]]
    }

    pub(crate) fn key_at(&self, position: usize) -> &K {
        &self.node(position).key
    }

    /// Add `from -> to`. Returns false if the edge already existed.
    pub(crate) fn link(&mut self, from: usize, to: usize) -> bool {
        if !self.node_mut(from).targets.insert(to) {
            return false;
        }
        self.node_mut(to).sources.insert(from);
        true
    }

    /// Remove `from -> to`. Returns false if there was no such edge.
    pub(crate) fn unlink(&mut self, from: usize, to: usize) -> bool {
        if !self.node_mut(from).targets.remove(&to) {
            return false;
        }
        self.node_mut(to).sources.remove(&from);
        true
    }

    /// Drop every outgoing edge of `position`, returning the old targets.
    pub(crate) fn clear_targets(&mut self, position: usize) -> EdgeSet {
        let targets = core::mem::take(&mut self.node_mut(position).targets);
        for &t in &targets {
            self.node_mut(t).sources.remove(&position);
        }
        targets
    }

    /// Drop every incoming edge of `position`.
    pub(crate) fn clear_sources(&mut self, position: usize) {
        let sources = core::mem::take(&mut self.node_mut(position).sources);
        for &s in &sources {
            self.node_mut(s).targets.remove(&position);
        }
    }

    /// Remove the node at the last position along with all of its edges.
    /// Removing the last position shifts nobody, so no remapping is needed.
    pub(crate) fn pop_last(&mut self) -> Option<K> {
        let position = self.order.len().checked_sub(1)?;
        self.clear_targets(position);
        self.clear_sources(position);
        let id = self.order.pop()?;
        self.unlink_slot(id).map(|n| n.key)
    }

    fn unlink_slot(&mut self, id: NodeId) -> Option<Node<K>> {
        let node = self.slots.remove(id)?;
        if let Ok(entry) = self.index.find_entry(node.hash, |&other| other == id) {
            let _ = entry.remove();
        }
        Some(node)
    }

    /// Purge lone nodes and renumber the survivors. Returns the number of
    /// purged nodes.
    pub(crate) fn compact(&mut self) -> usize {
        let lone: Vec<usize> = self
            .order
            .iter()
            .enumerate()
            .filter(|&(_, &id)| self.slots[id].is_lone())
            .map(|(p, _)| p)
            .collect();
        if lone.is_empty() {
            return 0;
        }

        let shifts = compaction::shift_table(self.order.len(), &lone);
        for node in self.slots.values_mut() {
            if node.is_lone() {
                continue;
            }
            node.targets = compaction::remap(&node.targets, &shifts);
            node.sources = compaction::remap(&node.sources, &shifts);
        }

        for &p in lone.iter().rev() {
            let id = self.order[p];
            let _ = self.unlink_slot(id);
        }
        self.order.retain(|&id| self.slots.contains_key(id));
        for (p, &id) in self.order.iter().enumerate() {
            let node = &mut self.slots[id];
            debug_assert_eq!(node.position - shifts[node.position], p);
            node.position = p;
        }
        lone.len()
    }

    pub(crate) fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.order.clear();
    }

    /// Nodes in position order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Node<K>> + '_ {
        self.order.iter().map(move |&id| &self.slots[id])
    }

    /// Panics if the mirrored-edge or position invariants do not hold.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.order.len(), self.slots.len());
        assert_eq!(self.index.len(), self.slots.len());
        for (p, &id) in self.order.iter().enumerate() {
            let node = &self.slots[id];
            assert_eq!(node.position, p, "slot position out of sync");
            assert_eq!(self.find(&node.key), Some(id), "index out of sync");
            for &t in &node.targets {
                assert!(t < self.order.len(), "dangling target {t}");
                assert!(self.node(t).sources.contains(&p), "missing source");
            }
            for &s in &node.sources {
                assert!(s < self.order.len(), "dangling source {s}");
                assert!(self.node(s).targets.contains(&p), "missing target");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::Hasher;

    fn index() -> NodeIndex<String> {
        NodeIndex::with_capacity_and_hasher(0, RandomState::new())
    }

    /// Invariant: interning the same key twice yields the same position and
    /// does not grow the index.
    #[test]
    fn intern_is_idempotent() {
        let mut ix = index();
        let a = ix.intern("a".to_string());
        let b = ix.intern("b".to_string());
        assert_eq!((a, b), (0, 1));
        assert_eq!(ix.intern("a".to_string()), 0);
        assert_eq!(ix.len(), 2);
        assert_eq!(ix.position("b"), Some(1));
        assert_eq!(ix.position("zz"), None);
        ix.assert_consistent();
    }

    /// Invariant: link/unlink keep targets and sources mirrored.
    #[test]
    fn link_and_unlink_mirror_edges() {
        let mut ix = index();
        let a = ix.intern("a".to_string());
        let b = ix.intern("b".to_string());
        assert!(ix.link(a, b));
        assert!(!ix.link(a, b), "duplicate edge is a no-op");
        assert!(ix.node(b).sources.contains(&a));
        assert!(ix.unlink(a, b));
        assert!(!ix.unlink(a, b));
        assert!(ix.node(a).is_lone() && ix.node(b).is_lone());
        ix.assert_consistent();
    }

    /// Invariant: clearing a self-loop touches the node only once.
    #[test]
    fn clear_targets_handles_self_loop() {
        let mut ix = index();
        let a = ix.intern("a".to_string());
        ix.link(a, a);
        let old = ix.clear_targets(a);
        assert!(old.contains(&a));
        assert!(ix.node(a).is_lone());
        ix.assert_consistent();
    }

    /// Invariant: compaction removes only lone nodes and renumbers the
    /// survivors contiguously while edges keep pointing at the same keys.
    #[test]
    fn compact_renumbers_survivors() {
        let mut ix = index();
        for k in ["x", "a", "y", "z", "b", "c"] {
            ix.intern(k.to_string());
        }
        ix.link(1, 4); // a -> b
        ix.link(4, 5); // b -> c
        assert_eq!(ix.compact(), 3);
        assert_eq!(ix.len(), 3);
        assert_eq!(ix.position("a"), Some(0));
        assert_eq!(ix.position("b"), Some(1));
        assert_eq!(ix.position("c"), Some(2));
        assert_eq!(ix.position("x"), None);
        let a_targets: Vec<&String> = ix.node(0).targets.iter().map(|&t| ix.key_at(t)).collect();
        assert_eq!(a_targets, vec![&"b".to_string()]);
        ix.assert_consistent();

        assert_eq!(ix.compact(), 0, "compaction is idempotent");
    }

    /// Invariant: the last node can be removed without disturbing others.
    #[test]
    fn pop_last_detaches_edges() {
        let mut ix = index();
        let a = ix.intern("a".to_string());
        let b = ix.intern("b".to_string());
        ix.link(a, b);
        ix.link(b, a);
        assert_eq!(ix.pop_last(), Some("b".to_string()));
        assert!(ix.node(a).is_lone());
        assert_eq!(ix.pop_last(), Some("a".to_string()));
        assert_eq!(ix.pop_last(), None);
        ix.assert_consistent();
    }

    /// Invariant: lookups resolve by equality under total hash collision,
    /// and purging one colliding node leaves the other reachable.
    #[test]
    fn collisions_resolve_by_equality() {
        #[derive(Clone, Default)]
        struct ConstBuildHasher;
        struct ConstHasher;
        impl BuildHasher for ConstBuildHasher {
            type Hasher = ConstHasher;
            fn build_hasher(&self) -> Self::Hasher {
                ConstHasher
            }
        }
        impl Hasher for ConstHasher {
            fn write(&mut self, _bytes: &[u8]) {}
            fn finish(&self) -> u64 {
                0
            }
        }

        let mut ix: NodeIndex<String, ConstBuildHasher> =
            NodeIndex::with_capacity_and_hasher(0, ConstBuildHasher);
        let a = ix.intern("a".to_string());
        let b = ix.intern("b".to_string());
        let c = ix.intern("c".to_string());
        ix.link(b, c);
        assert_ne!(a, b);
        assert_eq!(ix.compact(), 1);
        assert_eq!(ix.position("a"), None);
        assert_eq!(ix.position("b"), Some(0));
        assert_eq!(ix.position("c"), Some(1));
        ix.assert_consistent();
    }
}
