//! graph-dict: dictionaries whose keys and values are nodes of one
//! directed graph.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a mapping interface over a directed graph where `insert(a, b)`
//!   adds the edge `a -> b` and `get(a)` returns everything `a` points to.
//! - Layers:
//!   - NodeIndex<K, S>: node storage. A `HashTable` indexes generational
//!     `SlotMap` keys by node hash; a position table maps positions to
//!     slots; each slot records its own position. Edges are position sets,
//!     kept in both directions (targets and sources).
//!   - GraphDict<K, S>: public directed-graph dictionary with soft delete,
//!     link removal, self-loops, merge and compaction (`reindex`).
//!   - TwoWayDict<K, S>: wraps GraphDict and keeps every edge mirrored with
//!     at most one partner per node.
//!
//! Positions
//! - A node's position is its rank in insertion order. Insertions append,
//!   and soft deletion (`remove`) only clears edges, so positions held in
//!   other nodes' edge sets stay valid.
//! - `reindex` purges lone nodes (no outgoing and no incoming edges). It
//!   builds one offset table (`compaction::shift_table`) and rewrites every
//!   edge set through it before dropping the purged slots.
//! - `popitem` removes the last position only, which shifts nobody, so it
//!   does not compact. `pop` compacts.
//!
//! Reads
//! - `GraphDict::get` returns a [`Targets`]: `Empty`, `One` or `Many`.
//! - `TwoWayDict::get` returns the single partner or `None`.
//! - Reading an absent node is [`GraphError::NodeNotFound`].
//!
//! Constraints
//! - Single-threaded; mutation goes through `&mut self`.
//! - Keys are immutable post-insert.
//! - Operations that would break the one-partner rule (`make_loops`,
//!   `merge`) exist on GraphDict only.
//!
//! Logging
//! - Compaction emits a `tracing` debug event; pops emit trace events. No
//!   subscriber is installed by the crate.

mod compaction;
pub mod error;
mod graph_dict;
mod graph_dict_proptest;
mod node_index;
mod targets;
mod two_way_dict;

// Public surface
pub use error::{GraphError, Result};
pub use graph_dict::GraphDict;
pub use targets::Targets;
pub use two_way_dict::TwoWayDict;
