//! Mock database clients for testing.
//!
//! Provides in-memory implementations of `DatabaseClient` so the pipeline
//! can be tested without a live database.

use super::{ColumnInfo, DatabaseClient, QueryResult, Value};
use crate::error::{AuditError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Scripted outcome for one SQL text.
#[derive(Debug, Clone)]
enum ScriptedResponse {
    Rows(QueryResult),
    Error(String),
}

/// A mock database client that returns predefined results.
///
/// Responses are keyed on the exact SQL text. Unscripted SELECT statements
/// return a single mock row; anything else returns an empty result.
#[derive(Debug, Default)]
pub struct MockDatabaseClient {
    responses: HashMap<String, ScriptedResponse>,
}

impl MockDatabaseClient {
    /// Creates a new mock database client with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a successful result for the given SQL text.
    pub fn with_result(mut self, sql: impl Into<String>, result: QueryResult) -> Self {
        self.responses
            .insert(sql.into(), ScriptedResponse::Rows(result));
        self
    }

    /// Scripts a query failure for the given SQL text.
    pub fn with_failure(mut self, sql: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses
            .insert(sql.into(), ScriptedResponse::Error(message.into()));
        self
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        if let Some(response) = self.responses.get(sql) {
            return match response {
                ScriptedResponse::Rows(result) => Ok(result.clone()),
                ScriptedResponse::Error(message) => Err(AuditError::query(message.clone())),
            };
        }

        let sql_upper = sql.to_uppercase();

        if sql_upper.trim_start().starts_with("SELECT") {
            // Return a simple result with one row
            let columns = vec![ColumnInfo::new("result", "text")];
            let rows = vec![vec![Value::String(format!("Mock result for: {}", sql))]];

            Ok(QueryResult {
                columns,
                rows,
                execution_time: Duration::from_millis(1),
                row_count: 1,
            })
        } else {
            // For non-SELECT statements, return an empty result
            Ok(QueryResult {
                columns: vec![],
                rows: vec![],
                execution_time: Duration::from_millis(1),
                row_count: 0,
            })
        }
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A mock database client where every query fails.
#[derive(Debug)]
pub struct FailingDatabaseClient {
    message: String,
}

impl FailingDatabaseClient {
    /// Creates a failing client that reports the given driver message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for FailingDatabaseClient {
    fn default() -> Self {
        Self::new("ERROR: relation does not exist")
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        Err(AuditError::query(self.message.clone()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
