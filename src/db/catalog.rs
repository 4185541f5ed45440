//! Schema catalog
//!
//! An immutable snapshot of the user tables visible to the connection,
//! built once at startup and shared read-only for the life of the process.
//! Its `describe()` rendering is injected verbatim into generation prompts,
//! so it must be deterministic: tables are sorted by name on construction.

/// Snapshot of tables and columns available for query generation
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    /// Tables, sorted by name
    pub tables: Vec<TableSchema>,
}

/// A table and its columns, in ordinal order
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Table name
    pub name: String,
    /// Columns in ordinal position order
    pub columns: Vec<ColumnSchema>,
}

/// A table column
#[derive(Debug, Clone)]
pub struct ColumnSchema {
    /// Column name
    pub name: String,
    /// Type name as reported by the catalog (not normalized)
    pub type_name: String,
}

impl SchemaCatalog {
    /// Build a catalog from introspected tables. Sorts by table name so the
    /// prompt rendering does not depend on backend enumeration order.
    pub fn new(mut tables: Vec<TableSchema>) -> Self {
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        Self { tables }
    }

    /// Number of tables in the catalog
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Look up a column's type name by its table-qualified name
    /// (`"table.column"`, or `"schema.table.column"` for tables outside
    /// `public`). Qualification avoids collisions between same-named
    /// columns of different tables.
    pub fn column_type(&self, qualified: &str) -> Option<&str> {
        let (table, column) = qualified.rsplit_once('.')?;
        self.tables
            .iter()
            .find(|t| t.name == table)?
            .columns
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.type_name.as_str())
    }

    /// Render the catalog as a model-readable schema description, one block
    /// per table. The output is stable for a given catalog and is embedded
    /// verbatim in the SQL generation prompt.
    pub fn describe(&self) -> String {
        let mut out = String::from("Database Schema:\n");
        for table in &self.tables {
            out.push_str("Table: ");
            out.push_str(&table.name);
            out.push_str("\nColumns:\n");
            for column in &table.columns {
                out.push_str("  - ");
                out.push_str(&column.name);
                out.push_str(" (");
                out.push_str(&column.type_name);
                out.push_str(")\n");
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, type_name: &str) -> ColumnSchema {
        ColumnSchema {
            name: name.to_string(),
            type_name: type_name.to_string(),
        }
    }

    fn sample_catalog() -> SchemaCatalog {
        SchemaCatalog::new(vec![
            TableSchema {
                name: "users".to_string(),
                columns: vec![column("id", "integer"), column("name", "character varying")],
            },
            TableSchema {
                name: "orders".to_string(),
                columns: vec![column("id", "bigint"), column("user_id", "integer")],
            },
        ])
    }

    #[test]
    fn test_tables_sorted_by_name() {
        let catalog = sample_catalog();
        assert_eq!(catalog.tables[0].name, "orders");
        assert_eq!(catalog.tables[1].name, "users");
    }

    #[test]
    fn test_describe_rendering() {
        let catalog = sample_catalog();
        let description = catalog.describe();
        assert!(description.starts_with("Database Schema:\n"));
        assert!(description.contains("Table: users\nColumns:\n  - id (integer)\n"));
        assert!(description.contains("  - name (character varying)\n"));
        // orders sorts before users
        let orders_pos = description.find("Table: orders").unwrap();
        let users_pos = description.find("Table: users").unwrap();
        assert!(orders_pos < users_pos);
    }

    #[test]
    fn test_describe_is_deterministic() {
        let a = SchemaCatalog::new(vec![
            TableSchema {
                name: "b".to_string(),
                columns: vec![column("x", "text")],
            },
            TableSchema {
                name: "a".to_string(),
                columns: vec![column("y", "text")],
            },
        ]);
        let b = SchemaCatalog::new(vec![
            TableSchema {
                name: "a".to_string(),
                columns: vec![column("y", "text")],
            },
            TableSchema {
                name: "b".to_string(),
                columns: vec![column("x", "text")],
            },
        ]);
        assert_eq!(a.describe(), b.describe());
    }

    #[test]
    fn test_qualified_column_lookup() {
        let catalog = sample_catalog();
        assert_eq!(catalog.column_type("users.id"), Some("integer"));
        assert_eq!(catalog.column_type("orders.id"), Some("bigint"));
        assert_eq!(catalog.column_type("users.user_id"), None);
        assert_eq!(catalog.column_type("unqualified"), None);
    }

    #[test]
    fn test_empty_catalog_describe() {
        let catalog = SchemaCatalog::new(vec![]);
        assert_eq!(catalog.describe(), "Database Schema:\n");
        assert_eq!(catalog.table_count(), 0);
    }
}
