use fql_syntax::{Operator, OperatorSet, SyntaxError};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("invalid filter expression: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("unknown field in query: {field}")]
    UnknownField { field: String },

    #[error("operator not allowed for field {field}: '{operator}'")]
    OperatorNotAllowed { field: String, operator: Operator },

    #[error("invalid value for field {field}: {literal}: {reason}")]
    ValueDecode {
        field: String,
        literal: String,
        reason: String,
    },

    #[error("required filter missing in query: {field}")]
    RequiredFieldMissing { field: String },

    #[error("cannot use operator '{operator}' of field {field} in SQL conditions")]
    UnsupportedOperatorForSql { field: String, operator: Operator },

    #[error("record has no value for field {field}")]
    MissingRecordField { field: String },

    #[error("incompatible value for field {field}: expected {expected}, got {found}")]
    IncompatibleValue {
        field: String,
        expected: &'static str,
        found: String,
    },
}

impl FilterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FilterError::Syntax(err) if err.is_lex() => ErrorKind::Lex,
            FilterError::Syntax(_) => ErrorKind::Parse,
            FilterError::UnknownField { .. } => ErrorKind::UnknownField,
            FilterError::OperatorNotAllowed { .. } => ErrorKind::OperatorNotAllowed,
            FilterError::ValueDecode { .. } => ErrorKind::ValueDecode,
            FilterError::RequiredFieldMissing { .. } => ErrorKind::RequiredFieldMissing,
            FilterError::UnsupportedOperatorForSql { .. } => ErrorKind::UnsupportedOperatorForSql,
            FilterError::MissingRecordField { .. } => ErrorKind::MissingRecordField,
            FilterError::IncompatibleValue { .. } => ErrorKind::IncompatibleValue,
        }
    }

    pub(crate) fn decode(field: &str, literal: impl fmt::Display, reason: impl Into<String>) -> Self {
        FilterError::ValueDecode {
            field: field.to_string(),
            literal: literal.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn incompatible(field: &str, expected: &'static str, found: &fql_model::Value) -> Self {
        FilterError::IncompatibleValue {
            field: field.to_string(),
            expected,
            found: format!("{} {}", found.type_name(), found),
        }
    }
}

/// Coarse classification of [`FilterError`] for callers that map errors onto
/// their own transport codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lex,
    Parse,
    UnknownField,
    OperatorNotAllowed,
    ValueDecode,
    RequiredFieldMissing,
    UnsupportedOperatorForSql,
    MissingRecordField,
    IncompatibleValue,
}

impl ErrorKind {
    /// True for errors caused by the query text itself rather than by the
    /// record being evaluated.
    pub fn is_invalid_query(self) -> bool {
        !matches!(
            self,
            ErrorKind::MissingRecordField | ErrorKind::IncompatibleValue
        )
    }
}

/// Errors raised while declaring a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("duplicate field in schema: {0}")]
    DuplicateField(String),

    #[error("field {0} has no permitted operators")]
    EmptyOperatorSet(String),

    #[error("field {field} of kind {kind} cannot support operators: {operators}")]
    UnsupportedOperators {
        field: String,
        kind: &'static str,
        operators: OperatorSet,
    },
}

pub type Result<T> = std::result::Result<T, FilterError>;
