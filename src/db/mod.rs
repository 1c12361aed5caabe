//! Database abstraction layer.
//!
//! Provides a trait-based interface for the single database session used by
//! the execution pipeline, with one concrete PostgreSQL implementation.

mod mock;
mod postgres;
mod types;

pub use mock::{FailingDatabaseClient, MockDatabaseClient};
pub use postgres::PostgresClient;
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Opens the database session for a run.
///
/// This is the central factory function for database connections. The run
/// targets a single PostgreSQL database; the pipeline depends only on the
/// `DatabaseClient` trait returned here.
pub async fn connect(config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
    let client = PostgresClient::connect(config).await?;
    Ok(Box::new(client))
}

/// Trait defining the interface for database clients.
///
/// All database operations are async and return Results with AuditError.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes a SQL script and returns the fetched rows.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}
