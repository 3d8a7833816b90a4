//! homealog-graph: Neo4j gateway and operations for the inventory graph.
//!
//! This crate is the single mutation point for the inventory graph. Every
//! read and write is a single parametrized statement executed through a
//! [`GraphStore`], so that uniqueness and idempotent linking rest on the
//! store's own atomicity.

pub mod actions;
pub mod client;
pub mod mutations;
pub mod operations;
pub mod queries;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use actions::{Action, ActionOutcome};
pub use client::{GraphConfig, GraphError, GraphStore, Neo4jStore, Row, Statement};
pub use operations::GraphOperations;
