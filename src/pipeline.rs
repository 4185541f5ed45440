//! Question-to-answer pipeline
//!
//! Composes the schema catalog, language model, sanitizer, executor and
//! formatter into the end-to-end flow:
//!
//! ```text
//! question -> P1 (schema + question) -> model -> sanitize -> execute
//!          -> P2 (question + results) -> model -> answer
//! ```
//!
//! The flow is modeled as explicit stages so each transition gets its own
//! log line and failures carry the stage they happened in. The public
//! [`QueryPipeline::answer`] contract never fails: every error becomes an
//! apologetic answer string, and the next question starts fresh.

use crate::db::Database;
use crate::db::catalog::SchemaCatalog;
use crate::error::{AskgresError, DbError};
use crate::format::format_results;
use crate::llm::CompletionModel;
use crate::sanitize::{StatementPolicy, sanitize};
use std::fmt;
use tracing::{debug, info, warn};

/// Pipeline stages, in order. Failure is reachable from every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PromptingForSql,
    Sanitizing,
    Executing,
    PromptingForAnswer,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::PromptingForSql => "prompting-for-sql",
            Stage::Sanitizing => "sanitizing",
            Stage::Executing => "executing",
            Stage::PromptingForAnswer => "prompting-for-answer",
        };
        f.write_str(name)
    }
}

/// End-to-end question -> answer orchestrator
pub struct QueryPipeline<M, D> {
    model: M,
    db: D,
    catalog: SchemaCatalog,
    policy: StatementPolicy,
    /// Rendered once; identical for every question this process answers
    schema_description: String,
}

impl<M: CompletionModel, D: Database> QueryPipeline<M, D> {
    pub fn new(model: M, db: D, catalog: SchemaCatalog, policy: StatementPolicy) -> Self {
        let schema_description = catalog.describe();
        Self {
            model,
            db,
            catalog,
            policy,
            schema_description,
        }
    }

    /// The schema snapshot this pipeline was built with
    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// Answer a natural-language question about the database.
    ///
    /// Never fails: model and execution errors are converted into an
    /// apologetic answer string and do not affect later questions.
    pub async fn answer(&self, question: &str) -> String {
        match self.run(question).await {
            Ok(answer) => answer,
            Err(err) => {
                warn!(error = %err, "question failed");
                format!(
                    "Sorry, I encountered an error while processing your question: {}",
                    err
                )
            }
        }
    }

    async fn run(&self, question: &str) -> Result<String, AskgresError> {
        self.enter(Stage::PromptingForSql);
        let raw = self.model.complete(&self.sql_prompt(question)).await?;

        self.enter(Stage::Sanitizing);
        let statement = sanitize(&raw);
        info!(%statement, "generated statement");
        if !self.policy.allows(&statement) {
            return Err(DbError::RejectedByPolicy(statement).into());
        }

        self.enter(Stage::Executing);
        let results = self.db.run_sql(&statement).await?;

        self.enter(Stage::PromptingForAnswer);
        let table = format_results(&results);
        let answer = self
            .model
            .complete(&self.answer_prompt(question, &table))
            .await?;
        Ok(answer)
    }

    fn enter(&self, stage: Stage) {
        debug!(%stage, "entering stage");
    }

    fn sql_prompt(&self, question: &str) -> String {
        format!(
            "Based on the following database schema:\n\n{}\n\n\
             Generate a SQL query to answer this question: {}\n\n\
             Return ONLY the SQL query, without any markdown formatting, \
             explanations or additional text.",
            self.schema_description, question
        )
    }

    fn answer_prompt(&self, question: &str, table: &str) -> String {
        format!(
            "Based on the question: {}\n\n\
             And the query results:\n{}\n\n\
             Please provide a natural language answer to the question.",
            question, table
        )
    }
}
