//! PostgreSQL backend
//!
//! Concrete implementation of [`Database`] using tokio-postgres. Statements
//! are prepared first so column names and types are known even for queries
//! that return zero rows, then all rows are materialized before returning.

use crate::config::{DatabaseConfig, SslMode};
use crate::db::Database;
use crate::db::catalog::{ColumnSchema, SchemaCatalog, TableSchema};
use crate::db::types::{CellValue, ColumnDef, QueryResults, Row};
use crate::error::{DbError, DbResult};
use rust_decimal::Decimal;
use std::time::Duration;
use tokio_postgres::Client;
use tokio_postgres::types::Type;
use tracing::{debug, warn};

/// Lists every user table column with its reported type. Namespaces are
/// included so same-named tables in different schemas stay distinct.
const CATALOG_SQL: &str = "SELECT n.nspname, c.relname, \
        a.attname, format_type(a.atttypid, a.atttypmod) \
 FROM pg_class c \
 JOIN pg_namespace n ON n.oid = c.relnamespace \
 JOIN pg_attribute a ON a.attrelid = c.oid \
 WHERE c.relkind = 'r' \
   AND n.nspname NOT LIKE 'pg_%' \
   AND n.nspname != 'information_schema' \
   AND a.attnum > 0 AND NOT a.attisdropped \
 ORDER BY n.nspname, c.relname, a.attnum";

/// PostgreSQL database backend
pub struct PostgresBackend {
    /// The tokio-postgres client
    client: Client,
    /// Per-statement execution timeout
    query_timeout: Duration,
}

impl PostgresBackend {
    /// Connect to a PostgreSQL database.
    ///
    /// The background connection task is spawned here; if the connection is
    /// later lost (server restart, idle timeout), subsequent statements fail
    /// and the loss is logged.
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        let conn_string = config.connection_string_with_password();

        let client = match config.ssl_mode {
            SslMode::Disable => {
                let (client, connection) =
                    tokio_postgres::connect(&conn_string, tokio_postgres::NoTls)
                        .await
                        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        warn!("connection lost: {}", e);
                    }
                });
                client
            }
            SslMode::Prefer | SslMode::Require => {
                let tls_config = make_tls_config();
                let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);
                let (client, connection) = tokio_postgres::connect(&conn_string, tls)
                    .await
                    .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        warn!("connection lost: {}", e);
                    }
                });
                client
            }
        };

        Ok(Self {
            client,
            query_timeout: Duration::from_secs(config.query_timeout_secs),
        })
    }

    async fn run_sql_inner(&self, sql: &str) -> DbResult<QueryResults> {
        let start = std::time::Instant::now();
        let query_failed = |e: tokio_postgres::Error| DbError::QueryFailed {
            statement: sql.to_string(),
            message: e.to_string(),
        };

        let stmt = self.client.prepare(sql).await.map_err(query_failed)?;

        let columns: Vec<ColumnDef> = stmt
            .columns()
            .iter()
            .map(|col| ColumnDef {
                name: col.name().to_string(),
                type_name: col.type_().name().to_string(),
            })
            .collect();

        let pg_rows = self.client.query(&stmt, &[]).await.map_err(query_failed)?;

        let mut rows = Vec::with_capacity(pg_rows.len());
        for pg_row in &pg_rows {
            let values = (0..columns.len())
                .map(|i| extract_cell_value(pg_row, i))
                .collect();
            rows.push(Row { values });
        }

        let results = QueryResults::new(columns, rows, start.elapsed());
        debug!(
            rows = results.row_count,
            elapsed_ms = results.execution_time.as_millis() as u64,
            "statement executed"
        );
        Ok(results)
    }
}

impl Database for PostgresBackend {
    async fn run_sql(&self, sql: &str) -> DbResult<QueryResults> {
        match tokio::time::timeout(self.query_timeout, self.run_sql_inner(sql)).await {
            Ok(result) => result,
            Err(_) => Err(DbError::Timeout),
        }
    }

    async fn introspect(&self) -> DbResult<SchemaCatalog> {
        let rows = self
            .client
            .query(CATALOG_SQL, &[])
            .await
            .map_err(|e| DbError::SchemaLoadFailed(e.to_string()))?;

        // Rows arrive ordered by (schema, table, ordinal), so each table's
        // columns are contiguous.
        let mut tables: Vec<TableSchema> = Vec::new();
        for row in &rows {
            let schema: String = row.get(0);
            let relname: String = row.get(1);
            let table_name = if schema == "public" {
                relname
            } else {
                format!("{}.{}", schema, relname)
            };
            let column = ColumnSchema {
                name: row.get(2),
                type_name: row.get(3),
            };

            match tables.last_mut() {
                Some(t) if t.name == table_name => t.columns.push(column),
                _ => tables.push(TableSchema {
                    name: table_name,
                    columns: vec![column],
                }),
            }
        }

        Ok(SchemaCatalog::new(tables))
    }
}

/// Build a rustls ClientConfig that trusts OS certificates (with Mozilla roots as fallback)
fn make_tls_config() -> rustls::ClientConfig {
    let mut root_store = rustls::RootCertStore::empty();

    let native_certs = rustls_native_certs::load_native_certs();
    let mut loaded = 0;
    for cert in native_certs.certs {
        if root_store.add(cert).is_ok() {
            loaded += 1;
        }
    }
    if loaded == 0 {
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }

    rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth()
}

/// Decode one cell into a [`CellValue`] based on the column's wire type.
///
/// Types without a direct variant (numeric, uuid, date/time, ...) go through
/// their text representation. When even the string fallback fails, an opaque
/// marker naming the postgres type is returned instead of an error: one odd
/// column must not sink a whole result set.
fn extract_cell_value(row: &tokio_postgres::Row, idx: usize) -> CellValue {
    let col_type = row.columns()[idx].type_();
    match *col_type {
        Type::INT2 => match row.try_get::<_, Option<i16>>(idx) {
            Ok(Some(v)) => CellValue::Integer(v as i64),
            Ok(None) => CellValue::Null,
            Err(_) => try_as_string(row, idx),
        },
        Type::INT4 => match row.try_get::<_, Option<i32>>(idx) {
            Ok(Some(v)) => CellValue::Integer(v as i64),
            Ok(None) => CellValue::Null,
            Err(_) => try_as_string(row, idx),
        },
        Type::INT8 => match row.try_get::<_, Option<i64>>(idx) {
            Ok(Some(v)) => CellValue::Integer(v),
            Ok(None) => CellValue::Null,
            Err(_) => try_as_string(row, idx),
        },
        Type::FLOAT4 => match row.try_get::<_, Option<f32>>(idx) {
            Ok(Some(v)) => CellValue::Float(v as f64),
            Ok(None) => CellValue::Null,
            Err(_) => try_as_string(row, idx),
        },
        Type::FLOAT8 => match row.try_get::<_, Option<f64>>(idx) {
            Ok(Some(v)) => CellValue::Float(v),
            Ok(None) => CellValue::Null,
            Err(_) => try_as_string(row, idx),
        },
        Type::BOOL => match row.try_get::<_, Option<bool>>(idx) {
            Ok(Some(v)) => CellValue::Boolean(v),
            Ok(None) => CellValue::Null,
            Err(_) => try_as_string(row, idx),
        },
        Type::NUMERIC => match row.try_get::<_, Option<Decimal>>(idx) {
            Ok(Some(v)) => CellValue::Text(v.to_string()),
            Ok(None) => CellValue::Null,
            Err(_) => try_as_string(row, idx),
        },
        Type::JSON | Type::JSONB => match row.try_get::<_, Option<serde_json::Value>>(idx) {
            Ok(Some(v)) => CellValue::Json(v),
            Ok(None) => CellValue::Null,
            Err(_) => try_as_string(row, idx),
        },
        Type::BYTEA => match row.try_get::<_, Option<Vec<u8>>>(idx) {
            Ok(Some(v)) => CellValue::Binary(v),
            Ok(None) => CellValue::Null,
            Err(_) => try_as_string(row, idx),
        },
        Type::UUID => match row.try_get::<_, Option<uuid::Uuid>>(idx) {
            Ok(Some(v)) => CellValue::Text(v.to_string()),
            Ok(None) => CellValue::Null,
            Err(_) => try_as_string(row, idx),
        },
        Type::TIMESTAMP => match row.try_get::<_, Option<chrono::NaiveDateTime>>(idx) {
            Ok(Some(v)) => CellValue::Text(v.to_string()),
            Ok(None) => CellValue::Null,
            Err(_) => try_as_string(row, idx),
        },
        Type::TIMESTAMPTZ => match row.try_get::<_, Option<chrono::DateTime<chrono::Utc>>>(idx) {
            Ok(Some(v)) => CellValue::Text(v.to_string()),
            Ok(None) => CellValue::Null,
            Err(_) => try_as_string(row, idx),
        },
        Type::DATE => match row.try_get::<_, Option<chrono::NaiveDate>>(idx) {
            Ok(Some(v)) => CellValue::Text(v.to_string()),
            Ok(None) => CellValue::Null,
            Err(_) => try_as_string(row, idx),
        },
        Type::TIME => match row.try_get::<_, Option<chrono::NaiveTime>>(idx) {
            Ok(Some(v)) => CellValue::Text(v.to_string()),
            Ok(None) => CellValue::Null,
            Err(_) => try_as_string(row, idx),
        },
        // Text types and fallback for everything else
        _ => try_as_string(row, idx),
    }
}

/// Try to extract a value as a string (fallback for type mismatches).
///
/// When even the string fallback fails, includes the postgres type name
/// in the marker so the user knows what type couldn't be decoded.
fn try_as_string(row: &tokio_postgres::Row, idx: usize) -> CellValue {
    match row.try_get::<_, Option<String>>(idx) {
        Ok(Some(v)) => CellValue::Text(v),
        Ok(None) => CellValue::Null,
        Err(_) => {
            let type_name = row
                .columns()
                .get(idx)
                .map_or("unknown", |c| c.type_().name());
            CellValue::Text(format!("<unable to display: {}>", type_name))
        }
    }
}
