//! Offset table used by compaction.
//!
//! Given the sorted positions of lone nodes, every surviving position `p`
//! moves down by the number of lone positions strictly below it. The table
//! is computed once and applied to every edge set, so edges are rewritten
//! in a single pass rather than node by node.

use crate::node_index::EdgeSet;

/// `shifts[p]` is the number of entries of `lone` smaller than `p`.
///
/// `lone` must be sorted ascending and every entry must be `< len`.
pub(crate) fn shift_table(len: usize, lone: &[usize]) -> Vec<usize> {
    debug_assert!(lone.windows(2).all(|w| w[0] < w[1]));
    let mut shifts = Vec::with_capacity(len);
    let mut passed = 0;
    let mut next = lone.iter().peekable();
    for p in 0..len {
        shifts.push(passed);
        if next.peek() == Some(&&p) {
            next.next();
            passed += 1;
        }
    }
    shifts
}

/// Rewrite an edge set through the shift table.
pub(crate) fn remap(edges: &EdgeSet, shifts: &[usize]) -> EdgeSet {
    edges.iter().map(|&p| p - shifts[p]).collect()
}
