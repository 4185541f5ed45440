//! Database abstraction layer
//!
//! A small trait-based abstraction over the two operations the pipeline
//! needs from a database, allowing tests to substitute mock backends.

pub mod catalog;
pub mod postgres;
pub mod types;

use crate::error::DbResult;

// Re-export main types
pub use catalog::{ColumnSchema, SchemaCatalog, TableSchema};
pub use postgres::PostgresBackend;
pub use types::{CellValue, ColumnDef, QueryResults, Row};

/// Operations the pipeline needs from a database backend
pub trait Database: Send + Sync {
    /// Execute a SQL statement and materialize all result rows.
    ///
    /// # Errors
    /// Returns `DbError::QueryFailed` if execution fails, `DbError::Timeout`
    /// if the configured statement timeout elapses first.
    fn run_sql(&self, sql: &str) -> impl Future<Output = DbResult<QueryResults>> + Send;

    /// Introspect all visible user tables into a schema catalog.
    ///
    /// Either the full catalog is built or the call fails with
    /// `DbError::SchemaLoadFailed`; no partial catalog is ever returned.
    fn introspect(&self) -> impl Future<Output = DbResult<SchemaCatalog>> + Send;
}

impl<T: Database> Database for &T {
    fn run_sql(&self, sql: &str) -> impl Future<Output = DbResult<QueryResults>> + Send {
        T::run_sql(*self, sql)
    }

    fn introspect(&self) -> impl Future<Output = DbResult<SchemaCatalog>> + Send {
        T::introspect(*self)
    }
}
