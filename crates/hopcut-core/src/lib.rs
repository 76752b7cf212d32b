#![forbid(unsafe_code)]
//! hopcut-core library.
//!
//! # Overview
//!
//! Directed-graph path contraction: pass-through nodes (exactly one incoming
//! and one outgoing edge) are eliminated by splicing their two edges into
//! one, and orphan nodes (no edges at all) are dropped. The result keeps the
//! same reachability-through-chains structure without the intermediate hops.
//!
//! ## Pipeline
//!
//! ```text
//! origin \t destination records
//!        ↓  tsv::parse_record()
//! Contractor::add_edge() — each edge stamped with a strictly increasing rank
//!        ↓  Contractor::run()
//! worklist fixed point (orphan elimination + pass-through contraction)
//!        ↓  Contractor::into_sorted_edges()
//! surviving edges, ordered by insertion rank
//!        ↓  tsv::write_record()
//! origin \t destination records
//! ```
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums at the graph and codec boundaries;
//!   `anyhow::Result` belongs to binary crates, not this one.
//! - **Logging**: `tracing` macros (`debug!`, `trace!`, `warn!`).

pub mod contract;
pub mod graph;
pub mod tsv;

// Re-export primary types at crate level for convenience.
pub use contract::{ContractionStats, Contractor};
pub use graph::{DiGraph, GraphError, Rank};
pub use tsv::{ParseError, parse_record, write_record};
