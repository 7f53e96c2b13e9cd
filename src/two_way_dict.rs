//! TwoWayDict: a one-to-one dictionary built on `GraphDict`.

use crate::error::{GraphError, Result};
use crate::graph_dict::GraphDict;
use crate::targets::Targets;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use tracing::trace;

/// A dictionary that can be read in both directions.
///
/// Every edge is mirrored: after `insert(a, b)`, `get(a)` is `b` and `get(b)`
/// is `a`, and each node has at most one partner. Storage and compaction
/// are those of [`GraphDict`]; only mutation and lookup differ. Self-loops
/// and merging are not offered because either would break the one-partner
/// rule.
#[derive(Clone)]
pub struct TwoWayDict<K, S = RandomState> {
    graph: GraphDict<K, S>,
}

impl<K> TwoWayDict<K>
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

impl<K, S> TwoWayDict<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            graph: GraphDict::with_capacity_and_hasher(capacity, hasher),
        }
    }

    pub fn hasher(&self) -> &S {
        self.graph.hasher()
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.graph.contains_key(q)
    }

    pub fn position<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.graph.position(q)
    }

    /// Pair `key` with `value`.
    ///
    /// Any previous partner of either node is disconnected first and left in
    /// place without edges until the next [`reindex`](TwoWayDict::reindex).
    pub fn insert(&mut self, key: K, value: K) {
        let mut torn = 0;
        for p in [self.graph.position(&key), self.graph.position(&value)]
            .into_iter()
            .flatten()
        {
            torn += self.detach(p);
        }
        if torn > 0 {
            trace!(torn, "dropped previous partners");
        }

        let to = self.graph.nodes.intern(value);
        let from = self.graph.nodes.intern(key);
        self.graph.nodes.link(from, to);
        self.graph.nodes.link(to, from);
    }

    /// Disconnect `p` from everything it is linked with.
    fn detach(&mut self, p: usize) -> usize {
        let node = self.graph.nodes.node(p);
        let linked: Vec<usize> = node
            .targets
            .iter()
            .chain(node.sources.iter())
            .copied()
            .collect();
        linked
            .into_iter()
            .filter(|&other| self.graph.disconnect_at(p, other))
            .count()
    }

    /// The partner of `q`, or `None` if it has none.
    pub fn get<Q>(&self, q: &Q) -> Result<Option<&K>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let targets = self.graph.get(q)?;
        debug_assert!(targets.len() <= 1, "two-way node with several partners");
        Ok(targets.one().copied())
    }

    /// Unpair `q` from its partner. Both nodes stay until the next
    /// [`reindex`](TwoWayDict::reindex).
    pub fn remove<Q>(&mut self, q: &Q) -> Result<()>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let p = self.graph.position(q).ok_or(GraphError::NodeNotFound)?;
        self.detach(p);
        Ok(())
    }

    /// Read the partner, unpair, then [`reindex`](TwoWayDict::reindex).
    /// O(n) because of the compaction.
    pub fn pop<Q>(&mut self, q: &Q) -> Result<Option<K>>
    where
        K: Borrow<Q> + Clone,
        Q: ?Sized + Hash + Eq,
    {
        let prior = self.get(q)?.cloned();
        self.remove(q)?;
        self.graph.reindex();
        Ok(prior)
    }

    /// Remove the most recently inserted node; its partner is left unpaired.
    pub fn popitem(&mut self) -> Result<(K, Option<K>)>
    where
        K: Clone,
    {
        let (key, prior) = self.graph.popitem()?;
        let partner = match prior {
            Targets::One(p) => Some(p),
            _ => None,
        };
        Ok((key, partner))
    }

    /// See [`GraphDict::reindex`].
    pub fn reindex(&mut self) -> usize {
        self.graph.reindex()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.graph.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &K> + '_ {
        self.graph.values()
    }

    pub fn items(&self) -> impl Iterator<Item = (&K, Option<&K>)> + '_ {
        self.graph.items()
    }

    /// Every node with its partner, in position order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, Option<&K>)> + '_ {
        self.graph
            .iter()
            .map(|(k, targets)| (k, targets.one().copied()))
    }

    /// Snapshot of every paired node, both directions included.
    pub fn get_dict(&self) -> HashMap<K, K>
    where
        K: Clone,
    {
        self.iter()
            .filter_map(|(k, partner)| partner.map(|p| (k.clone(), p.clone())))
            .collect()
    }

    pub fn clear(&mut self) {
        self.graph.clear();
    }
}

impl<K, S> Default for TwoWayDict<K, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, S> fmt::Debug for TwoWayDict<K, S>
where
    K: Eq + Hash + fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, S> PartialEq for TwoWayDict<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.graph == other.graph
    }
}

impl<K, S> Eq for TwoWayDict<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
}

impl<K, S> Extend<(K, K)> for TwoWayDict<K, S>
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

impl<K, S> FromIterator<(K, K)> for TwoWayDict<K, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, K)>>(iter: I) -> Self {
        let mut d = Self::default();
        d.extend(iter);
        d
    }
}

impl<K, const N: usize> From<[(K, K); N]> for TwoWayDict<K>
where
    K: Eq + Hash,
{
    fn from(pairs: [(K, K); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: a pair reads the same in both directions.
    #[test]
    fn insert_pairs_both_ways() {
        let mut d = TwoWayDict::new();
        d.insert("key", "value");
        assert_eq!(d.get("key"), Ok(Some(&"value")));
        assert_eq!(d.get("value"), Ok(Some(&"key")));
        d.graph.nodes.assert_consistent();
    }

    /// Invariant: re-pairing a key leaves its old partner unpaired.
    #[test]
    fn repairing_key_drops_old_partner() {
        let mut d = TwoWayDict::from([("key", "value")]);
        d.extend([("key", "value2")]);
        assert_eq!(d.get("value"), Ok(None));
        assert_eq!(d.get("value2"), Ok(Some(&"key")));
        assert_eq!(d.get("key"), Ok(Some(&"value2")));
        d.graph.nodes.assert_consistent();
    }

    /// Invariant: pairing two already-paired nodes unpairs both old partners.
    #[test]
    fn repairing_both_sides() {
        let mut d = TwoWayDict::from([("a", "b"), ("c", "d")]);
        d.insert("a", "c");
        assert_eq!(d.get("a"), Ok(Some(&"c")));
        assert_eq!(d.get("c"), Ok(Some(&"a")));
        assert_eq!(d.get("b"), Ok(None));
        assert_eq!(d.get("d"), Ok(None));
        d.graph.nodes.assert_consistent();
    }

    /// Invariant: inserting an existing pair again, or reversed, is stable.
    #[test]
    fn reinsert_same_pair() {
        let mut d = TwoWayDict::from([("a", "b")]);
        d.insert("b", "a");
        d.insert("a", "b");
        assert_eq!(d.len(), 2);
        assert_eq!(d.get("a"), Ok(Some(&"b")));
        assert_eq!(d.get("b"), Ok(Some(&"a")));
    }

    /// Invariant: removal unpairs both sides and keeps the nodes.
    #[test]
    fn remove_unpairs_symmetrically() {
        let mut d = TwoWayDict::from([("a", "b"), ("c", "d")]);
        d.remove("b").unwrap();
        assert_eq!(d.get("a"), Ok(None));
        assert_eq!(d.get("b"), Ok(None));
        assert_eq!(d.get("c"), Ok(Some(&"d")));
        assert!(d.contains_key("a"));
        assert_eq!(d.remove("zz"), Err(GraphError::NodeNotFound));

        assert_eq!(d.reindex(), 2);
        assert_eq!(d.get("a"), Err(GraphError::NodeNotFound));
        assert_eq!(d.position("d"), Some(0));
        d.graph.nodes.assert_consistent();
    }

    /// Invariant: pop returns the partner and purges both; popitem leaves
    /// the partner present but unpaired.
    #[test]
    fn pop_and_popitem() {
        let mut d = TwoWayDict::from([("a", "b"), ("c", "d")]);
        assert_eq!(d.pop("a"), Ok(Some("b")));
        assert!(!d.contains_key("a"));
        assert!(!d.contains_key("b"));

        assert_eq!(d.popitem(), Ok(("c", Some("d"))));
        assert_eq!(d.get("d"), Ok(None));
        assert_eq!(d.len(), 1);

        d.clear();
        assert_eq!(d.popitem(), Err(GraphError::Empty));
    }

    #[test]
    fn get_dict_has_both_directions() {
        let d = TwoWayDict::from([("a", "b"), ("c", "d")]);
        let expected: HashMap<&str, &str> =
            HashMap::from([("a", "b"), ("b", "a"), ("c", "d"), ("d", "c")]);
        assert_eq!(d.get_dict(), expected);
        assert_eq!(d.keys().count(), 4);
        assert_eq!(d.values().count(), 4);
        assert_eq!(d.items().count(), 4);
    }
}
