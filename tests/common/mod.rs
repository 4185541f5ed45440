//! Common test utilities and helpers
//!
//! Scripted mock implementations of the model and database traits, plus
//! builders for the fixtures the pipeline tests share.

use askgres::db::Database;
use askgres::db::catalog::{ColumnSchema, SchemaCatalog, TableSchema};
use askgres::db::types::{CellValue, ColumnDef, QueryResults, Row};
use askgres::error::{DbResult, LlmResult};
use askgres::llm::CompletionModel;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Completion model that replays scripted replies and records every prompt
pub struct ScriptedModel {
    replies: Mutex<VecDeque<LlmResult<String>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<LlmResult<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl CompletionModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted model ran out of replies")
    }
}

/// Database that replays scripted results and records every statement
pub struct ScriptedDb {
    replies: Mutex<VecDeque<DbResult<QueryResults>>>,
    pub statements: Mutex<Vec<String>>,
    catalog: SchemaCatalog,
}

impl ScriptedDb {
    pub fn new(replies: Vec<DbResult<QueryResults>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            statements: Mutex::new(Vec::new()),
            catalog: users_catalog(),
        }
    }
}

impl Database for ScriptedDb {
    async fn run_sql(&self, sql: &str) -> DbResult<QueryResults> {
        self.statements.lock().unwrap().push(sql.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted db ran out of replies")
    }

    async fn introspect(&self) -> DbResult<SchemaCatalog> {
        Ok(self.catalog.clone())
    }
}

/// A two-table catalog for consistent testing
pub fn users_catalog() -> SchemaCatalog {
    SchemaCatalog::new(vec![
        TableSchema {
            name: "users".to_string(),
            columns: vec![
                column("id", "integer"),
                column("name", "character varying"),
            ],
        },
        TableSchema {
            name: "orders".to_string(),
            columns: vec![
                column("id", "bigint"),
                column("user_id", "integer"),
                column("total", "numeric"),
            ],
        },
    ])
}

pub fn column(name: &str, type_name: &str) -> ColumnSchema {
    ColumnSchema {
        name: name.to_string(),
        type_name: type_name.to_string(),
    }
}

/// Build a result set from column names and rows of cell values
pub fn results(columns: &[&str], rows: Vec<Vec<CellValue>>) -> QueryResults {
    QueryResults::new(
        columns
            .iter()
            .map(|name| ColumnDef {
                name: name.to_string(),
                type_name: "text".to_string(),
            })
            .collect(),
        rows.into_iter().map(|values| Row { values }).collect(),
        Duration::from_millis(1),
    )
}
