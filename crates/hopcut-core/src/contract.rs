//! Worklist-driven path contraction to a fixed point.
//!
//! # Overview
//!
//! The contractor reduces a [`DiGraph`] under two rewrite rules, applied per
//! node until no node triggers either:
//!
//! 1. **Orphan elimination** — a node with zero incoming and zero outgoing
//!    edges is removed.
//! 2. **Pass-through contraction** — a node with exactly one incoming edge
//!    (from `origin`) and exactly one outgoing edge (to `destination`) is
//!    removed along with both edges, and `origin → destination` is spliced
//!    in its place. Three reconciliation cases:
//!    - `origin == destination`: the spliced edge would be a self-loop, so
//!      nothing is re-added; `origin` is rescheduled (it may now be an
//!      orphan or a pass-through itself).
//!    - `origin → destination` already exists: the contraction is absorbed
//!      into the pre-existing edge; both endpoints are rescheduled because
//!      their degree counts just dropped.
//!    - otherwise: a fresh edge `origin → destination` is created with the
//!      next insertion rank. The endpoints keep their degree counts, so no
//!      rescheduling is needed.
//!
//! A contraction can cascade — create a new pass-through, a new self-loop
//! splice, or a newly-duplicated edge — so removed rule targets reschedule
//! their affected neighbors instead of the loop rescanning the whole graph.
//! Every firing strictly decreases the node count, or (in the absorb case)
//! the edge count, so the loop terminates in at most O(initial node count)
//! firings.
//!
//! # Determinism
//!
//! The worklist is a `BTreeSet` popped smallest-first, so the visitation
//! order — and with it the rank assignment of contraction-created edges and
//! the final output byte stream — is reproducible across runs. Edges never
//! touched by a contraction keep their relative input order; created edges
//! sort after every edge that existed at the moment of their creation.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::graph::{DiGraph, GraphError, Rank};

// ---------------------------------------------------------------------------
// ContractionStats
// ---------------------------------------------------------------------------

/// Summary of one contraction run.
///
/// Returned by [`Contractor::run`]. All counters are per-run: a second run
/// on an already-contracted graph reports zero firings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContractionStats {
    /// Nodes removed by orphan elimination.
    pub orphans_removed: usize,
    /// Nodes removed by pass-through contraction.
    pub pass_throughs_contracted: usize,
    /// Fresh `origin → destination` edges created by contraction.
    pub edges_created: usize,
    /// Contractions absorbed into a pre-existing `origin → destination` edge.
    pub edges_absorbed: usize,
    /// Worklist pops, including pops where no rule matched.
    pub steps: usize,
}

// ---------------------------------------------------------------------------
// Contractor
// ---------------------------------------------------------------------------

/// Path-contraction engine owning the graph and the insertion-rank counter.
///
/// Feed edges in input order with [`Contractor::add_edge`], run the fixed
/// point with [`Contractor::run`], then take the surviving edges in rank
/// order with [`Contractor::into_sorted_edges`].
///
/// The rank counter lives here, not in ambient global state: each edge —
/// whether fed in or created by a contraction — gets a rank strictly greater
/// than every rank issued before it.
#[derive(Debug, Clone, Default)]
pub struct Contractor {
    graph: DiGraph,
    next_rank: Rank,
}

impl Contractor {
    /// Create a contractor with an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an input edge, stamping it with the next insertion rank.
    ///
    /// Re-inserting an existing edge re-stamps it with a fresh rank, which
    /// moves it after every earlier edge in the final output order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::SelfLoop`] if `origin == destination`; no rank
    /// is consumed and the graph is unchanged.
    pub fn add_edge(&mut self, origin: &str, destination: &str) -> Result<(), GraphError> {
        self.graph.add_edge(origin, destination, self.next_rank)?;
        self.next_rank += 1;
        Ok(())
    }

    /// Read access to the underlying graph.
    #[must_use]
    pub fn graph(&self) -> &DiGraph {
        &self.graph
    }

    /// Run the contraction to a fixed point.
    ///
    /// Blocking and single-threaded; the graph and worklist are exclusively
    /// owned for the duration of the call. Idempotent: running again on the
    /// contracted graph fires no rules.
    #[instrument(skip(self), fields(nodes = self.graph.node_count(), edges = self.graph.edge_count()))]
    pub fn run(&mut self) -> ContractionStats {
        let mut pending: BTreeSet<String> =
            self.graph.nodes().map(ToString::to_string).collect();
        let mut stats = ContractionStats::default();

        while let Some(node) = pending.pop_first() {
            stats.steps += 1;
            self.evaluate(&node, &mut pending, &mut stats);
        }

        debug!(
            orphans = stats.orphans_removed,
            pass_throughs = stats.pass_throughs_contracted,
            created = stats.edges_created,
            absorbed = stats.edges_absorbed,
            steps = stats.steps,
            "contraction reached fixed point"
        );
        stats
    }

    /// Consume the contractor and return the surviving edges sorted by
    /// insertion rank ascending.
    #[must_use]
    pub fn into_sorted_edges(self) -> Vec<(String, String)> {
        let mut edges: Vec<(Rank, String, String)> = self
            .graph
            .edges()
            .map(|(a, b, rank)| (rank, a.to_string(), b.to_string()))
            .collect();
        edges.sort_unstable_by_key(|(rank, _, _)| *rank);
        edges.into_iter().map(|(_, a, b)| (a, b)).collect()
    }

    /// Evaluate one node against the rewrite rules, mutating the graph and
    /// rescheduling affected neighbors.
    fn evaluate(
        &mut self,
        node: &str,
        pending: &mut BTreeSet<String>,
        stats: &mut ContractionStats,
    ) {
        let ins = self.graph.in_neighbors(node);
        let outs = self.graph.out_neighbors(node);

        match (ins.len(), outs.len()) {
            (0, 0) => {
                // Rule 1: orphan elimination. Nodes already gone from the
                // graph also land here; removing them is a no-op and they
                // are not counted.
                if self.graph.contains_node(node) {
                    trace!(node, "removing orphan");
                    self.graph.remove_node(node);
                    stats.orphans_removed += 1;
                }
            }
            (1, 1) => {
                // Rule 2: pass-through contraction.
                let origin = ins[0].to_string();
                let destination = outs[0].to_string();
                trace!(node, %origin, %destination, "contracting pass-through");

                self.graph.remove_node(node);
                stats.pass_throughs_contracted += 1;

                if origin == destination {
                    // The spliced edge would be a self-loop; drop it and
                    // re-evaluate the endpoint, whose degree just fell.
                    pending.insert(origin);
                } else if self.graph.edge_exists(&origin, &destination) {
                    // Absorbed into the pre-existing edge. Both endpoints
                    // lost an edge with no replacement, so both go back on
                    // the worklist.
                    stats.edges_absorbed += 1;
                    pending.insert(origin);
                    pending.insert(destination);
                } else {
                    // Splice in the replacement edge with a fresh rank. The
                    // endpoints' degree counts are unchanged — one edge out,
                    // one edge in — so neither needs re-evaluation.
                    // `origin != destination` here, so the insert succeeds.
                    if self
                        .graph
                        .add_edge(&origin, &destination, self.next_rank)
                        .is_ok()
                    {
                        self.next_rank += 1;
                        stats.edges_created += 1;
                    }
                }
            }
            _ => {} // No rule matches; the node stays as-is.
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
