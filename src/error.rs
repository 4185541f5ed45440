//! Error types for askgres
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors with clear error chains.

use std::io;

/// Main error type for the askgres application
#[derive(Debug, thiserror::Error)]
pub enum AskgresError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Language model errors
    #[error("Language model error: {0}")]
    Llm(#[from] LlmError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Database operation errors
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Failed to establish connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed. Carries the statement that was run so the
    /// user can see what the model actually produced.
    #[error("Query execution failed for `{statement}`: {message}")]
    QueryFailed { statement: String, message: String },

    /// Schema introspection failed
    #[error("Schema loading failed: {0}")]
    SchemaLoadFailed(String),

    /// Statement refused by the configured statement policy
    #[error("Statement rejected by read-only policy: `{0}`")]
    RejectedByPolicy(String),

    /// Operation timed out
    #[error("Operation timed out")]
    Timeout,
}

/// Language model invocation errors
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Transport-level failure (DNS, TLS, connection reset, ...)
    #[error("Request failed: {0}")]
    Request(String),

    /// The API answered with a non-success status
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// The API answered 200 but the completion had no usable text
    #[error("Completion contained no content")]
    EmptyCompletion,

    /// The request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
}

/// Configuration loading/parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Home directory not found
    #[error("Could not determine home directory")]
    NoHomeDir,

    /// Config file not found
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Specialized Result type for askgres operations
pub type Result<T> = std::result::Result<T, AskgresError>;

/// Specialized Result type for database operations
pub type DbResult<T> = std::result::Result<T, DbError>;

/// Specialized Result type for language model operations
pub type LlmResult<T> = std::result::Result<T, LlmError>;

/// Specialized Result type for config operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
