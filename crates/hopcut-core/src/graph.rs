//! Attributed directed graph with symmetric forward/reverse adjacency.
//!
//! # Overview
//!
//! This module provides the mutable adjacency structure the contraction
//! engine rewrites in place. Nodes are string identifiers and exist only
//! implicitly, as endpoints of at least one edge (or transiently as orphans
//! awaiting cleanup). Each edge carries an insertion [`Rank`] that is opaque
//! at this layer — only the contractor's output stage interprets it.
//!
//! ## Data Model
//!
//! Every node owns an [`Adjacency`] record with two views:
//!
//! - `outgoing: HashMap<String, Rank>` — destination → edge rank
//! - `incoming: HashSet<String>` — origins of edges into this node
//!
//! The two views are kept symmetric at all times: for every edge `(a, b)`,
//! `b` is a key in `a`'s outgoing map and `a` is a member of `b`'s incoming
//! set. The reverse index makes incoming-neighbor queries O(1) amortized;
//! a linear reverse scan would make the contraction loop quadratic.
//!
//! Self-loop edges (`a == b`) are rejected and never enter the structure.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};

/// Insertion rank attached to each edge.
///
/// Unique and strictly increasing in edge-creation order. Opaque here; the
/// contractor sorts its final output by this value.
pub type Rank = u64;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from graph mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An edge must start and end at different nodes.
    #[error("self-loop edge rejected: '{node}' → '{node}'")]
    SelfLoop {
        /// The node that appears on both ends of the offending edge.
        node: String,
    },
}

// ---------------------------------------------------------------------------
// DiGraph
// ---------------------------------------------------------------------------

/// Per-node adjacency record: forward map and reverse set.
#[derive(Debug, Clone, Default)]
struct Adjacency {
    /// destination → rank of the edge from this node.
    outgoing: HashMap<String, Rank>,
    /// Origins of edges into this node.
    incoming: HashSet<String>,
}

/// A mutable, unweighted, directed graph with ranked edges.
///
/// Nodes are created implicitly the first time they appear as an edge
/// endpoint and destroyed by [`DiGraph::remove_node`] together with every
/// edge touching them. Re-adding an existing edge overwrites its rank; it
/// never duplicates the edge.
#[derive(Debug, Clone, Default)]
pub struct DiGraph {
    nodes: HashMap<String, Adjacency>,
}

impl DiGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the edge `origin → destination` with the given rank.
    ///
    /// Creates either endpoint node if absent. If the edge already exists,
    /// its rank is overwritten and no new edge is created. Both adjacency
    /// views are updated together, so the symmetry invariant holds on
    /// return.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::SelfLoop`] if `origin == destination`. The
    /// graph is not mutated in that case.
    pub fn add_edge(
        &mut self,
        origin: &str,
        destination: &str,
        rank: Rank,
    ) -> Result<(), GraphError> {
        if origin == destination {
            return Err(GraphError::SelfLoop {
                node: origin.to_string(),
            });
        }

        self.nodes
            .entry(origin.to_string())
            .or_default()
            .outgoing
            .insert(destination.to_string(), rank);
        self.nodes
            .entry(destination.to_string())
            .or_default()
            .incoming
            .insert(origin.to_string());

        Ok(())
    }

    /// Return `true` if the edge `origin → destination` is present.
    ///
    /// O(1): two hash lookups, no scanning.
    #[must_use]
    pub fn edge_exists(&self, origin: &str, destination: &str) -> bool {
        self.nodes
            .get(origin)
            .is_some_and(|adj| adj.outgoing.contains_key(destination))
    }

    /// Return the rank of the edge `origin → destination`, if present.
    #[must_use]
    pub fn edge_rank(&self, origin: &str, destination: &str) -> Option<Rank> {
        self.nodes
            .get(origin)
            .and_then(|adj| adj.outgoing.get(destination).copied())
    }

    /// Return `true` if the node is present (with any degree, including zero).
    #[must_use]
    pub fn contains_node(&self, node: &str) -> bool {
        self.nodes.contains_key(node)
    }

    /// Iterate over all node identifiers, in unspecified order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Number of nodes currently present.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges currently present.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|adj| adj.outgoing.len()).sum()
    }

    /// Return `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes with an edge into `node`.
    ///
    /// Returns an empty vec for an absent node — absence is not exceptional.
    /// Order is unspecified.
    #[must_use]
    pub fn in_neighbors(&self, node: &str) -> Vec<&str> {
        self.nodes
            .get(node)
            .map(|adj| adj.incoming.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Nodes with an edge from `node`.
    ///
    /// Returns an empty vec for an absent node. Order is unspecified.
    #[must_use]
    pub fn out_neighbors(&self, node: &str) -> Vec<&str> {
        self.nodes
            .get(node)
            .map(|adj| adj.outgoing.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Remove a node and every edge touching it, as origin or destination.
    ///
    /// Repairs the symmetric view on the far side of each removed edge.
    /// No-op if the node is absent.
    pub fn remove_node(&mut self, node: &str) {
        let Some(adj) = self.nodes.remove(node) else {
            return;
        };

        for destination in adj.outgoing.keys() {
            if let Some(far) = self.nodes.get_mut(destination) {
                far.incoming.remove(node);
            }
        }
        for origin in &adj.incoming {
            if let Some(far) = self.nodes.get_mut(origin) {
                far.outgoing.remove(node);
            }
        }
    }

    /// Iterate over all edges as `(origin, destination, rank)`, each exactly
    /// once, in unspecified order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, Rank)> {
        self.nodes.iter().flat_map(move |(origin, adj)| {
            adj.outgoing.iter().map(move |(destination, rank)| {
                debug_assert!(
                    self.nodes[destination].incoming.contains(origin),
                    "adjacency views out of sync for ({origin}, {destination})"
                );
                (origin.as_str(), destination.as_str(), *rank)
            })
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(edges: &[(&str, &str)]) -> DiGraph {
        let mut g = DiGraph::new();
        for (rank, (a, b)) in edges.iter().enumerate() {
            g.add_edge(a, b, rank as Rank).expect("valid edge");
        }
        g
    }

    /// Check the symmetry invariant across the whole graph, both directions.
    fn assert_symmetric(g: &DiGraph) {
        for (a, b, _) in g.edges() {
            assert!(
                g.in_neighbors(b).contains(&a),
                "missing reverse entry for ({a}, {b})"
            );
        }
        for node in g.nodes() {
            for origin in g.in_neighbors(node) {
                assert!(
                    g.edge_exists(origin, node),
                    "stale reverse entry ({origin}, {node})"
                );
            }
        }
    }

    // -----------------------------------------------------------------------
    // Edge insertion
    // -----------------------------------------------------------------------

    #[test]
    fn add_edge_creates_both_endpoints() {
        let g = graph_with(&[("A", "B")]);

        assert!(g.contains_node("A"));
        assert!(g.contains_node("B"));
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert!(g.edge_exists("A", "B"));
        assert!(!g.edge_exists("B", "A"), "direction matters");
        assert_symmetric(&g);
    }

    #[test]
    fn self_loop_rejected_without_mutation() {
        let mut g = DiGraph::new();
        let err = g.add_edge("A", "A", 0).expect_err("self-loop must fail");

        assert_eq!(err, GraphError::SelfLoop { node: "A".to_string() });
        assert!(g.is_empty(), "rejected edge must not create the node");
    }

    #[test]
    fn readd_overwrites_rank_without_duplicating() {
        let mut g = DiGraph::new();
        g.add_edge("A", "B", 0).expect("valid edge");
        g.add_edge("A", "B", 7).expect("valid edge");

        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edge_rank("A", "B"), Some(7));
        assert_symmetric(&g);
    }

    #[test]
    fn parallel_reverse_edges_are_distinct() {
        let g = graph_with(&[("A", "B"), ("B", "A")]);

        assert_eq!(g.edge_count(), 2);
        assert!(g.edge_exists("A", "B"));
        assert!(g.edge_exists("B", "A"));
        assert_symmetric(&g);
    }

    // -----------------------------------------------------------------------
    // Degree queries
    // -----------------------------------------------------------------------

    #[test]
    fn neighbor_queries_reflect_direction() {
        let g = graph_with(&[("A", "B"), ("C", "B"), ("B", "D")]);

        let mut ins = g.in_neighbors("B");
        ins.sort_unstable();
        assert_eq!(ins, vec!["A", "C"]);
        assert_eq!(g.out_neighbors("B"), vec!["D"]);
        assert!(g.in_neighbors("A").is_empty());
    }

    #[test]
    fn absent_node_queries_return_empty() {
        let g = graph_with(&[("A", "B")]);

        assert!(g.in_neighbors("Z").is_empty());
        assert!(g.out_neighbors("Z").is_empty());
        assert!(!g.contains_node("Z"));
        assert!(!g.edge_exists("Z", "A"));
        assert_eq!(g.edge_rank("Z", "A"), None);
    }

    // -----------------------------------------------------------------------
    // Node removal
    // -----------------------------------------------------------------------

    #[test]
    fn remove_node_cleans_edges_on_both_sides() {
        let g = {
            let mut g = graph_with(&[("A", "B"), ("B", "C"), ("D", "B")]);
            g.remove_node("B");
            g
        };

        assert!(!g.contains_node("B"));
        assert!(g.contains_node("A"), "far endpoints survive");
        assert!(g.contains_node("C"));
        assert!(g.contains_node("D"));
        assert_eq!(g.edge_count(), 0);
        assert!(g.out_neighbors("A").is_empty());
        assert!(g.in_neighbors("C").is_empty());
        assert_symmetric(&g);
    }

    #[test]
    fn remove_node_keeps_unrelated_edges() {
        let mut g = graph_with(&[("A", "B"), ("C", "D")]);
        g.remove_node("A");

        assert!(g.edge_exists("C", "D"));
        assert_eq!(g.edge_count(), 1);
        assert_symmetric(&g);
    }

    #[test]
    fn remove_absent_node_is_noop() {
        let mut g = graph_with(&[("A", "B")]);
        g.remove_node("Z");

        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
    }

    // -----------------------------------------------------------------------
    // Edge enumeration
    // -----------------------------------------------------------------------

    #[test]
    fn edges_enumerates_each_edge_once() {
        let g = graph_with(&[("A", "B"), ("B", "C"), ("A", "C")]);

        let mut seen: Vec<(String, String, Rank)> = g
            .edges()
            .map(|(a, b, r)| (a.to_string(), b.to_string(), r))
            .collect();
        seen.sort();

        assert_eq!(
            seen,
            vec![
                ("A".to_string(), "B".to_string(), 0),
                ("A".to_string(), "C".to_string(), 2),
                ("B".to_string(), "C".to_string(), 1),
            ]
        );
    }

    #[test]
    fn empty_graph_has_no_edges() {
        let g = DiGraph::new();
        assert!(g.is_empty());
        assert_eq!(g.edges().count(), 0);
    }
}
