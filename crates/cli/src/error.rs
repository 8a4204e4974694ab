use fql_engine::{FilterError, SchemaError};
use fql_syntax::SyntaxError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid schema configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse query: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("Invalid record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
}
