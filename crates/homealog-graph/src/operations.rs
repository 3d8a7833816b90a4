//! The operations layer: domain-level creation, linking, and lookup.
//!
//! `GraphOperations` owns its store. Each public operation issues exactly
//! one statement; see `mutations` and `queries` for the operation set.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::{GraphConfig, GraphError, GraphStore, Neo4jStore, Row};

/// Inventory operations over an injected [`GraphStore`].
pub struct GraphOperations<S> {
    store: S,
}

impl<S: GraphStore> GraphOperations<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl GraphOperations<Neo4jStore> {
    /// Operations over a Neo4j store that connects on first use.
    pub fn from_config(config: GraphConfig) -> Self {
        Self::new(Neo4jStore::new(config))
    }
}

// ── Row Shaping ──────────────────────────────────────────────────

/// Deserialize a property-map column into a domain record.
pub(crate) fn column_as<T: DeserializeOwned>(row: &Row, column: &str) -> Result<T, GraphError> {
    let value = row.get(column).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value)
        .map_err(|e| GraphError::Serialization(format!("Failed to deserialize {column}: {e}")))
}

/// Read an optional string column; `null` and missing both map to `None`.
pub(crate) fn optional_string(row: &Row, column: &str) -> Option<String> {
    row.get(column)
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

pub(crate) fn rows_as<T: DeserializeOwned>(rows: Vec<Row>, column: &str) -> Result<Vec<T>, GraphError> {
    rows.iter().map(|row| column_as(row, column)).collect()
}
