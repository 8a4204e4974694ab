pub mod bind;
pub mod error;
pub mod eval;
pub mod schema;
pub mod sql;

pub use bind::{BoundExpression, BoundQuery, bind, bind_conjunction};
pub use error::{ErrorKind, FilterError, Result, SchemaError};
pub use schema::{
    BooleanKind, DEFAULT_UNKNOWN_SUFFIX, EnumValues, EnumerationKind, FieldKind, FieldSpec,
    IdentifierKind, Schema, TextKind, TimestampKind, sql_identifier,
};
pub use sql::SqlCondition;

pub use fql_model::{Record, Value};
pub use fql_syntax::{Operator, OperatorSet};
