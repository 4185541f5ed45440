//! Database type definitions
//!
//! Core data structures for representing query results. Rows are decoded
//! into a small tagged scalar type; column order comes from the statement's
//! metadata and is identical for every row of one result set.

use std::time::Duration;

/// Query execution results
#[derive(Debug, Clone)]
pub struct QueryResults {
    /// Column definitions, in the order reported by the statement
    pub columns: Vec<ColumnDef>,
    /// Result rows, each holding one value per column in column order
    pub rows: Vec<Row>,
    /// Query execution time
    pub execution_time: Duration,
    /// Number of rows returned
    pub row_count: usize,
}

impl QueryResults {
    pub fn new(columns: Vec<ColumnDef>, rows: Vec<Row>, execution_time: Duration) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            execution_time,
            row_count,
        }
    }

    /// True when the query returned no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Column definition in query results
#[derive(Debug, Clone)]
pub struct ColumnDef {
    /// Column name
    pub name: String,
    /// Type name as reported by the driver (not normalized)
    pub type_name: String,
}

/// A single row of query results
#[derive(Debug, Clone)]
pub struct Row {
    /// Cell values in column order
    pub values: Vec<CellValue>,
}

/// A cell value (single column value in a row)
///
/// Database types without a direct variant (numeric, uuid, date/time,
/// arrays, enums, ...) are decoded through their text representation.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// NULL value
    Null,

    /// Integer value
    Integer(i64),

    /// Floating point value
    Float(f64),

    /// Text/string value
    Text(String),

    /// Boolean value
    Boolean(bool),

    /// JSON value (parsed)
    Json(serde_json::Value),

    /// Binary data
    Binary(Vec<u8>),
}

impl CellValue {
    /// Check if this is a NULL value
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_is_null() {
        assert!(CellValue::Null.is_null());
        assert!(!CellValue::Integer(42).is_null());
        assert!(!CellValue::Text(String::new()).is_null());
    }

    #[test]
    fn test_row_count_matches_rows() {
        let results = QueryResults::new(
            vec![ColumnDef {
                name: "n".to_string(),
                type_name: "integer".to_string(),
            }],
            vec![
                Row {
                    values: vec![CellValue::Integer(1)],
                },
                Row {
                    values: vec![CellValue::Integer(2)],
                },
            ],
            Duration::from_millis(5),
        );
        assert_eq!(results.row_count, 2);
        assert!(!results.is_empty());
    }

    #[test]
    fn test_empty_results() {
        let results = QueryResults::new(
            vec![ColumnDef {
                name: "n".to_string(),
                type_name: "integer".to_string(),
            }],
            vec![],
            Duration::from_millis(1),
        );
        assert_eq!(results.row_count, 0);
        assert!(results.is_empty());
    }
}
