// ========================================================================================
//
//                    THE COVERAGE NETWORK AND ITS LAZY PRIORITY LIST
//
// ========================================================================================
//
// This module owns the two mutable data structures at the heart of the engine:
//
// 1.  **The node arena.** Every tract is a slot in a flat `Vec<Node>`, and
//     neighbor lists are arena indices rather than shared references. Coverage
//     graphs are full of cycles (A overlaps B, B overlaps A), so owning-pointer
//     representations are a non-starter; the arena gives each node exactly one
//     owner while still allowing arbitrary cross-references.
//
// 2.  **The priority list.** An ascending-sorted `Vec` of `(node, total)`
//     entries supporting tail extraction and binary-search reinsertion. Entries
//     are allowed to go stale: a recorded total is always an *upper bound* on
//     the node's true current total, because takes can only deactivate nodes,
//     never restore them. `sort_single` corrects the ordering lazily, one tail
//     entry at a time, which is what makes the selection loop cheap.
//
//     The upper-bound property requires every node value to be non-negative,
//     so `add_node` floors incoming values at zero (a tract already richer
//     than the reference salary earns no credit, not negative credit).
//
// A node that has been credited (taken directly, or covered by a taken
// neighbor) is marked inactive via an explicit `active` flag rather than by
// zeroing its value. This keeps "already counted" distinct from "legitimately
// worth nothing", and makes the no-double-count invariant directly inspectable.
//
// ### Direction is preserved ###
//
// Neighbor lists are stored exactly as the upstream adjacency supplies them; the
// network never symmetrizes. No entity can be credited twice even under
// asymmetric input: a node's total sums only its own out-neighbors, a take
// deactivates exactly that same out-neighborhood, and totals only ever count
// active nodes.

use ahash::AHashMap;
use std::cmp::Ordering;

/// One tract in the arena: its id, current benefit value, credit flag, and the
/// arena indices of the tracts it covers.
#[derive(Debug, Clone)]
pub struct Node {
    geo_id: String,
    value: f64,
    active: bool,
    neighbors: Vec<u32>,
}

/// A priority-list entry. `total` is the total value recorded when the entry
/// was last sorted, and may exceed (never undershoot) the live total.
#[derive(Debug, Clone, Copy)]
struct ListEntry {
    node: u32,
    total: f64,
}

/// The coverage network: exclusive owner of the node arena and priority list.
#[derive(Debug, Clone, Default)]
pub struct Network {
    nodes: Vec<Node>,
    index_of: AHashMap<String, u32>,
    list: Vec<ListEntry>,
}

/// Ascending entry order: by recorded total, ties broken by `geo_id`
/// *descending*, so among equal totals the lexicographically smallest id sits
/// at the tail and is picked first. This rule is load-bearing for reproducible
/// output; tests depend on it.
fn cmp_entries(nodes: &[Node], a: &ListEntry, b: &ListEntry) -> Ordering {
    a.total.total_cmp(&b.total).then_with(|| {
        nodes[b.node as usize]
            .geo_id
            .cmp(&nodes[a.node as usize].geo_id)
    })
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The number of entries still awaiting extraction.
    pub fn list_len(&self) -> usize {
        self.list.len()
    }

    pub fn has_node(&self, geo_id: &str) -> bool {
        self.index_of.contains_key(geo_id)
    }

    pub fn index_of(&self, geo_id: &str) -> Option<u32> {
        self.index_of.get(geo_id).copied()
    }

    pub fn is_active(&self, idx: u32) -> bool {
        self.nodes[idx as usize].active
    }

    pub fn value_of(&self, idx: u32) -> f64 {
        self.nodes[idx as usize].value
    }

    /// Interns `geo_id`, creating an active placeholder node with value 0 on
    /// first sight. Referenced ids that never appear as adjacency keys exist in
    /// the arena only through this path.
    fn intern(&mut self, geo_id: &str) -> u32 {
        if let Some(&idx) = self.index_of.get(geo_id) {
            return idx;
        }
        let idx = self.nodes.len() as u32;
        self.nodes.push(Node {
            geo_id: geo_id.to_string(),
            value: 0.0,
            active: true,
            neighbors: Vec::new(),
        });
        self.index_of.insert(geo_id.to_string(), idx);
        idx
    }

    /// Adds a node with the given benefit value, or assigns the value to the
    /// existing placeholder if the id was already referenced as a neighbor.
    ///
    /// The value is floored at zero. Every node value must be non-negative:
    /// retiring a negative-valued neighbor would *raise* other nodes' live
    /// totals, recorded entries would stop being upper bounds, and the tail
    /// confirmation in `sort_single` would no longer identify the maximum.
    pub fn add_node(&mut self, geo_id: &str, value: f64) -> u32 {
        let idx = self.intern(geo_id);
        self.nodes[idx as usize].value = value.max(0.0);
        idx
    }

    /// Appends neighbor references in the order given. Direction is preserved:
    /// this records `geo_id` covering each neighbor, nothing more.
    pub fn add_neighbors(&mut self, geo_id: &str, neighbor_ids: &[String]) {
        let idx = self.intern(geo_id);
        let mut resolved = Vec::with_capacity(neighbor_ids.len());
        for neighbor in neighbor_ids {
            resolved.push(self.intern(neighbor));
        }
        self.nodes[idx as usize].neighbors.extend(resolved);
    }

    /// The live total value of a node: its own value plus every direct
    /// neighbor's, counting only nodes that have not yet been credited.
    pub fn total_value(&self, node: u32) -> f64 {
        let n = &self.nodes[node as usize];
        let mut total = if n.active { n.value } else { 0.0 };
        for &neighbor in &n.neighbors {
            let neighbor = &self.nodes[neighbor as usize];
            if neighbor.active {
                total += neighbor.value;
            }
        }
        total
    }

    /// Computes every node's total exactly once and builds the ascending
    /// priority list from scratch. O(n·d + n log n); called once per selection.
    pub fn initial_sort(&mut self) {
        let mut list: Vec<ListEntry> = (0..self.nodes.len() as u32)
            .map(|node| ListEntry {
                node,
                total: self.total_value(node),
            })
            .collect();
        let nodes = &self.nodes;
        list.sort_unstable_by(|a, b| cmp_entries(nodes, a, b));
        self.list = list;
    }

    /// The recorded total of the current tail entry, if any.
    pub fn peek_total(&self) -> Option<f64> {
        self.list.last().map(|entry| entry.total)
    }

    /// Removes and returns the tail (maximum) entry, crediting its recorded
    /// total, and permanently deactivates the node and its entire direct
    /// neighborhood so that no covered tract can ever be credited again.
    pub fn take(&mut self) -> Option<(String, f64)> {
        let entry = self.list.pop()?;
        let idx = entry.node as usize;
        self.nodes[idx].active = false;
        for i in 0..self.nodes[idx].neighbors.len() {
            let neighbor = self.nodes[idx].neighbors[i] as usize;
            self.nodes[neighbor].active = false;
        }
        Some((self.nodes[idx].geo_id.clone(), entry.total))
    }

    /// Refreshes the tail entry against live node state and reinserts it at its
    /// correct ascending position via binary search. Returns `true` iff the
    /// entry is still the tail afterwards; in that case its recorded total is
    /// exact and, because every other entry is an upper bound on its own node,
    /// provably the global maximum. Returns `true` on an empty list.
    pub fn sort_single(&mut self) -> bool {
        let Some(mut entry) = self.list.pop() else {
            return true;
        };
        entry.total = self.total_value(entry.node);
        let nodes = &self.nodes;
        let pos = self
            .list
            .partition_point(|e| cmp_entries(nodes, e, &entry) == Ordering::Less);
        let still_tail = pos == self.list.len();
        self.list.insert(pos, entry);
        still_tail
    }
}
