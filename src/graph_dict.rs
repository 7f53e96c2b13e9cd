//! GraphDict: a dictionary where every key and every value is a node of a
//! directed graph.

use crate::error::{GraphError, Result};
use crate::node_index::{Node, NodeIndex};
use crate::targets::Targets;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use tracing::{debug, trace};

/// A directed graph exposed through a mapping interface.
///
/// `insert(a, b)` adds the edge `a -> b`, creating either node if needed,
/// and `get(a)` returns everything `a` points to as a [`Targets`]. Nodes are
/// numbered by position (their rank in insertion order) and edges are
/// stored as positions. Positions never move on insertion or [`remove`];
/// they only shift down when [`reindex`] purges isolated nodes.
///
/// [`remove`]: GraphDict::remove
/// [`reindex`]: GraphDict::reindex
#[derive(Clone)]
pub struct GraphDict<K, S = RandomState> {
    pub(crate) nodes: NodeIndex<K, S>,
}

impl<K> GraphDict<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, S> GraphDict<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            nodes: NodeIndex::with_capacity_and_hasher(capacity, hasher),
        }
    }

    pub fn hasher(&self) -> &S {
        self.nodes.hasher()
    }

    /// Number of nodes, including edgeless ones awaiting [`reindex`].
    ///
    /// [`reindex`]: GraphDict::reindex
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.nodes.position(q).is_some()
    }

    /// Current position of a node.
    pub fn position<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.nodes.position(q)
    }

    /// Add the edge `key -> value`.
    ///
    /// Missing nodes are appended, `value` first. Inserting an existing edge
    /// is a no-op, and `key == value` makes a self-loop.
    pub fn insert(&mut self, key: K, value: K) {
        let to = self.nodes.intern(value);
        let from = self.nodes.intern(key);
        self.nodes.link(from, to);
    }

    /// Make sure `key` exists; a new node starts without edges.
    pub fn insert_node(&mut self, key: K) {
        self.nodes.intern(key);
    }

    /// Everything `q` points to.
    ///
    /// Fails with [`GraphError::NodeNotFound`] if `q` was never inserted or
    /// was purged by [`reindex`](GraphDict::reindex).
    pub fn get<Q>(&self, q: &Q) -> Result<Targets<&K>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let p = self.nodes.position(q).ok_or(GraphError::NodeNotFound)?;
        Ok(self.targets_of(self.nodes.node(p)))
    }

    fn targets_of<'a>(&'a self, node: &'a Node<K>) -> Targets<&'a K> {
        node.targets.iter().map(|&t| self.nodes.key_at(t)).collect()
    }

    /// Soft delete: drop every edge into and out of `q` but keep the node,
    /// so no other position moves. The node is purged by the next
    /// [`reindex`](GraphDict::reindex).
    pub fn remove<Q>(&mut self, q: &Q) -> Result<()>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let p = self.nodes.position(q).ok_or(GraphError::NodeNotFound)?;
        self.nodes.clear_targets(p);
        self.nodes.clear_sources(p);
        Ok(())
    }

    /// Remove the edge `key -> value`. Returns whether an edge was removed.
    pub fn delete_link<Q>(&mut self, key: &Q, value: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match (self.nodes.position(key), self.nodes.position(value)) {
            (Some(from), Some(to)) => self.nodes.unlink(from, to),
            _ => false,
        }
    }

    /// Remove the edges between `a` and `b` in both directions.
    pub fn disconnect<Q>(&mut self, a: &Q, b: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match (self.nodes.position(a), self.nodes.position(b)) {
            (Some(a), Some(b)) => self.disconnect_at(a, b),
            _ => false,
        }
    }

    pub(crate) fn disconnect_at(&mut self, a: usize, b: usize) -> bool {
        let forward = self.nodes.unlink(a, b);
        let backward = self.nodes.unlink(b, a);
        forward || backward
    }

    /// Give every node a self-loop.
    pub fn make_loops(&mut self) {
        for p in 0..self.nodes.len() {
            self.nodes.link(p, p);
        }
    }

    /// Give each of `keys` a self-loop, creating nodes that do not exist.
    pub fn make_loops_for<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
    {
        for key in keys {
            let p = self.nodes.intern(key);
            self.nodes.link(p, p);
        }
    }

    /// Copy every edge of `other` into `self`. Nodes are matched by value;
    /// edgeless nodes of `other` are not copied.
    pub fn merge<S2>(&mut self, other: &GraphDict<K, S2>)
    where
        K: Clone,
        S2: BuildHasher,
    {
        for node in other.nodes.iter() {
            for &t in &node.targets {
                self.insert(node.key.clone(), other.nodes.key_at(t).clone());
            }
        }
    }

    /// Purge nodes with no outgoing and no incoming edges and renumber the
    /// remaining positions. Returns the number of purged nodes.
    pub fn reindex(&mut self) -> usize {
        let purged = self.nodes.compact();
        if purged > 0 {
            debug!(purged, remaining = self.nodes.len(), "compacted graph");
        }
        purged
    }

    /// Nodes with at least one outgoing edge.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.nodes
            .iter()
            .filter(|n| !n.targets.is_empty())
            .map(|n| &n.key)
    }

    /// Nodes with at least one incoming edge.
    pub fn values(&self) -> impl Iterator<Item = &K> + '_ {
        self.nodes
            .iter()
            .filter(|n| !n.sources.is_empty())
            .map(|n| &n.key)
    }

    /// One `(node, Some(target))` per edge, plus `(node, None)` for nodes
    /// that are only ever pointed at. Isolated nodes are skipped.
    pub fn items(&self) -> impl Iterator<Item = (&K, Option<&K>)> + '_ {
        self.nodes
            .iter()
            .filter(|n| !n.is_lone())
            .flat_map(move |n| {
                let edges = n
                    .targets
                    .iter()
                    .map(move |&t| (&n.key, Some(self.nodes.key_at(t))));
                let bare = n.targets.is_empty().then_some((&n.key, None));
                edges.chain(bare)
            })
    }

    /// Every node with its targets, in position order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, Targets<&K>)> + '_ {
        self.nodes.iter().map(move |n| (&n.key, self.targets_of(n)))
    }

    /// Read, soft delete and then [`reindex`](GraphDict::reindex).
    ///
    /// This is O(n) because of the compaction; prefer
    /// [`delete_link`](GraphDict::delete_link) or
    /// [`remove`](GraphDict::remove) in loops.
    pub fn pop<Q>(&mut self, q: &Q) -> Result<Targets<K>>
    where
        K: Borrow<Q> + Clone,
        Q: ?Sized + Hash + Eq,
    {
        let prior = self.get(q)?.cloned();
        self.remove(q)?;
        let purged = self.reindex();
        trace!(purged, "popped node");
        Ok(prior)
    }

    /// Remove the most recently inserted node with all of its edges and
    /// return it with its former targets. Unlike [`pop`](GraphDict::pop)
    /// this does not compact.
    pub fn popitem(&mut self) -> Result<(K, Targets<K>)>
    where
        K: Clone,
    {
        let last = self.nodes.len().checked_sub(1).ok_or(GraphError::Empty)?;
        let prior = self.targets_of(self.nodes.node(last)).cloned();
        let key = self.nodes.pop_last().ok_or(GraphError::Empty)?;
        trace!(remaining = self.nodes.len(), "popped last node");
        Ok((key, prior))
    }

    /// Snapshot of every node that has at least one outgoing edge.
    pub fn get_dict(&self) -> HashMap<K, Targets<K>>
    where
        K: Clone,
    {
        self.nodes
            .iter()
            .filter(|n| !n.targets.is_empty())
            .map(|n| (n.key.clone(), self.targets_of(n).cloned()))
            .collect()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

impl<K, S> Default for GraphDict<K, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, S> fmt::Debug for GraphDict<K, S>
where
    K: Eq + Hash + fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Equal when both hold the same nodes with the same edges, compared by
/// value. Positions are not compared.
impl<K, S> PartialEq for GraphDict<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, targets)| other.get(k).map_or(false, |t| t == targets))
    }
}

impl<K, S> Eq for GraphDict<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
}

impl<K, S> Extend<(K, K)> for GraphDict<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, K)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, S> FromIterator<(K, K)> for GraphDict<K, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, K)>>(iter: I) -> Self {
        let mut g = Self::default();
        g.extend(iter);
        g
    }
}

impl<K, const N: usize> From<[(K, K); N]> for GraphDict<K>
where
    K: Eq + Hash,
{
    fn from(pairs: [(K, K); N]) -> Self {
        pairs.into_iter().collect()
    }
}
