//! Scripted in-memory store for unit tests.
//!
//! Records every statement it receives and replays queued responses in
//! order. An empty queue answers with zero rows.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{GraphError, GraphStore, Row, Statement};

#[derive(Default)]
pub struct ScriptedStore {
    responses: Mutex<VecDeque<Result<Vec<Row>, GraphError>>>,
    statements: Mutex<Vec<Statement>>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_rows(&self, rows: Vec<Value>) {
        let rows = rows
            .into_iter()
            .map(|v| match v {
                Value::Object(map) => map,
                other => panic!("scripted row must be an object, got {other}"),
            })
            .collect();
        self.responses.lock().unwrap().push_back(Ok(rows));
    }

    pub fn push_err(&self, err: GraphError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.statements.lock().unwrap().clone()
    }

    pub fn last_statement(&self) -> Statement {
        self.statements
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no statement was executed")
    }
}

#[async_trait]
impl GraphStore for ScriptedStore {
    async fn execute(&self, statement: Statement) -> Result<Vec<Row>, GraphError> {
        self.statements.lock().unwrap().push(statement);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
