//! Targets: the tagged result of reading a node's outgoing edges.

use core::hash::Hash;
use std::collections::HashSet;

/// What a node points to.
///
/// Reads distinguish "no edges", "exactly one edge" and "several edges" so
/// callers have to handle each shape. `Many` always holds at least two
/// elements.
#[derive(Clone, Debug)]
pub enum Targets<T> {
    Empty,
    One(T),
    Many(HashSet<T>),
}

impl<T> Targets<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Targets::Empty)
    }

    pub fn len(&self) -> usize {
        match self {
            Targets::Empty => 0,
            Targets::One(_) => 1,
            Targets::Many(set) => set.len(),
        }
    }

    /// The single target, if there is exactly one.
    pub fn one(&self) -> Option<&T> {
        match self {
            Targets::One(t) => Some(t),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (one, many) = match self {
            Targets::Empty => (None, None),
            Targets::One(t) => (Some(t), None),
            Targets::Many(set) => (None, Some(set.iter())),
        };
        one.into_iter().chain(many.into_iter().flatten())
    }
}

impl<T: Eq + Hash> Targets<T> {
    pub fn contains(&self, t: &T) -> bool {
        match self {
            Targets::Empty => false,
            Targets::One(x) => x == t,
            Targets::Many(set) => set.contains(t),
        }
    }

    /// Flatten into a set regardless of shape.
    pub fn into_set(self) -> HashSet<T> {
        match self {
            Targets::Empty => HashSet::new(),
            Targets::One(t) => HashSet::from([t]),
            Targets::Many(set) => set,
        }
    }
}

impl<T: Clone + Eq + Hash> Targets<&T> {
    /// Clone borrowed targets into owned ones.
    pub fn cloned(&self) -> Targets<T> {
        match self {
            Targets::Empty => Targets::Empty,
            Targets::One(t) => Targets::One((*t).clone()),
            Targets::Many(set) => Targets::Many(set.iter().map(|t| (*t).clone()).collect()),
        }
    }
}

impl<T: Eq + Hash> PartialEq for Targets<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Targets::Empty, Targets::Empty) => true,
            (Targets::One(a), Targets::One(b)) => a == b,
            (Targets::Many(a), Targets::Many(b)) => a == b,
            _ => false,
        }
    }
}

impl<T: Eq + Hash> Eq for Targets<T> {}

impl<T: Eq + Hash> FromIterator<T> for Targets<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set: HashSet<T> = iter.into_iter().collect();
        match set.len() {
            0 => Targets::Empty,
            1 => match set.drain().next() {
                Some(t) => Targets::One(t),
                None => Targets::Empty,
            },
            _ => Targets::Many(set),
        }
    }
}
