//! Store gateway: parametrized statements, the `GraphStore` seam, and the
//! Neo4j-backed implementation.

use async_trait::async_trait;
use neo4rs::{BoltNull, BoltType, ConfigBuilder, Graph, Query};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::OnceCell;

use homealog_core::{HomealogError, NodeKind};

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Schema rule already exists: {0}")]
    SchemaRuleExists(String),

    #[error("Neo4j query error: {0}")]
    Query(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Invalid(#[from] HomealogError),
}

impl GraphError {
    /// Classify a driver failure into the gateway's error taxonomy.
    fn from_driver(err: neo4rs::Error) -> Self {
        match err {
            neo4rs::Error::IOError { .. }
            | neo4rs::Error::ConnectionError
            | neo4rs::Error::AuthenticationError(_) => Self::Connection(format!("{err}: {err:?}")),
            other => classify_message(format!("{other} {other:?}")),
        }
    }
}

/// Map a server-side failure message onto the error taxonomy by its Neo4j status code.
fn classify_message(text: String) -> GraphError {
    if text.contains("ConstraintValidationFailed") || text.contains("already exists with label") {
        GraphError::ConstraintViolation(text)
    } else if text.contains("EquivalentSchemaRuleAlreadyExists")
        || text.contains("ConstraintAlreadyExists")
        || text.contains("equivalent constraint already exists")
    {
        GraphError::SchemaRuleExists(text)
    } else if text.contains("Security.Unauthorized") || text.contains("AuthenticationRateLimit") {
        GraphError::Connection(text)
    } else {
        GraphError::Query(text)
    }
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            max_connections: 16,
            fetch_size: 256,
        }
    }
}

// ── Statements ───────────────────────────────────────────────────

/// One result row: declared column name to store value.
pub type Row = serde_json::Map<String, Value>;

/// A parametrized Cypher statement plus the result columns it declares.
///
/// Parameters are JSON scalars; `Value::Null` binds an explicit absent value.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    text: String,
    params: serde_json::Map<String, Value>,
    columns: Vec<&'static str>,
}

impl Statement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: serde_json::Map::new(),
            columns: Vec::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Declare the columns of the `RETURN` clause to read back.
    pub fn returns(mut self, columns: &[&'static str]) -> Self {
        self.columns = columns.to_vec();
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &serde_json::Map<String, Value> {
        &self.params
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    fn to_query(&self) -> Query {
        self.params
            .iter()
            .fold(neo4rs::query(&self.text), |q, (key, value)| bind(q, key, value))
    }
}

fn bind(q: Query, key: &str, value: &Value) -> Query {
    match value {
        Value::Null => q.param(key, BoltType::Null(BoltNull)),
        Value::Bool(b) => q.param(key, *b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => q.param(key, i),
            None => q.param(key, n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => q.param(key, s.as_str()),
        other => q.param(key, other.to_string()),
    }
}

/// The uniqueness constraint statement for a node kind's key property.
pub fn constraint_statement(kind: NodeKind) -> Statement {
    Statement::new(format!(
        "CREATE CONSTRAINT {name} IF NOT EXISTS FOR (n:{label}) REQUIRE n.{key} IS UNIQUE",
        name = kind.constraint_name(),
        label = kind.label(),
        key = kind.key_property(),
    ))
}

// ── Store Seam ───────────────────────────────────────────────────

/// Single point of access to the persistent graph store.
///
/// Implementations must be safe to call concurrently; each `execute`
/// acquires and releases its own session before returning.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Execute one statement and collect every row it returns.
    async fn execute(&self, statement: Statement) -> Result<Vec<Row>, GraphError>;

    /// Ensure a uniqueness constraint on `name` exists for every node kind.
    ///
    /// A pre-existing equivalent constraint is logged and ignored; any other
    /// failure is returned.
    async fn initialize_constraints(&self) -> Result<(), GraphError> {
        for kind in NodeKind::ALL {
            match self.execute(constraint_statement(kind)).await {
                Ok(_) => {
                    tracing::info!(constraint = kind.constraint_name(), "Ensured uniqueness constraint");
                }
                Err(GraphError::SchemaRuleExists(detail)) => {
                    tracing::warn!(
                        constraint = kind.constraint_name(),
                        %detail,
                        "Constraint may already exist"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

// ── Neo4j ────────────────────────────────────────────────────────

/// Neo4j-backed store with a lazily opened connection pool.
///
/// The pool is opened on first use and released by [`Neo4jStore::close`];
/// a later call opens it again.
pub struct Neo4jStore {
    config: GraphConfig,
    graph: OnceCell<Graph>,
}

impl Neo4jStore {
    /// Create a store that connects on first use.
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            graph: OnceCell::new(),
        }
    }

    /// Create a store and connect immediately.
    pub async fn connect(config: GraphConfig) -> Result<Self, GraphError> {
        let store = Self::new(config);
        store.graph().await?;
        Ok(store)
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.graph.initialized()
    }

    /// Release the connection pool.
    pub fn close(&mut self) {
        if self.graph.take().is_some() {
            tracing::info!(uri = %self.config.uri, "Closed Neo4j connection");
        }
    }

    async fn graph(&self) -> Result<&Graph, GraphError> {
        self.graph.get_or_try_init(|| open_graph(&self.config)).await
    }
}

async fn open_graph(config: &GraphConfig) -> Result<Graph, GraphError> {
    let neo_config = ConfigBuilder::default()
        .uri(&config.uri)
        .user(&config.user)
        .password(&config.password)
        .max_connections(config.max_connections as usize)
        .fetch_size(config.fetch_size)
        .build()
        .map_err(|e| GraphError::Connection(e.to_string()))?;

    let graph = Graph::connect(neo_config)
        .await
        .map_err(|e| GraphError::Connection(e.to_string()))?;

    tracing::info!(uri = %config.uri, "Connected to Neo4j");
    Ok(graph)
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn execute(&self, statement: Statement) -> Result<Vec<Row>, GraphError> {
        let graph = self.graph().await?;
        let mut stream = graph
            .execute(statement.to_query())
            .await
            .map_err(GraphError::from_driver)?;

        // Drain the stream so the session is released before returning.
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await.map_err(GraphError::from_driver)? {
            rows.push(read_row(&row, statement.columns())?);
        }
        Ok(rows)
    }
}

fn read_row(row: &neo4rs::Row, columns: &[&'static str]) -> Result<Row, GraphError> {
    let mut out = Row::new();
    for column in columns {
        let value: Option<Value> = row.get(column).map_err(|e| {
            GraphError::Serialization(format!("Failed to read column {column}: {e}"))
        })?;
        out.insert((*column).to_string(), value.unwrap_or(Value::Null));
    }
    Ok(out)
}
