use crate::{bind::BoundQuery, error::Result};
use fql_model::Value;
use serde::Serialize;
use std::fmt;

/// Parameterized SQL condition: `?` placeholders in `sql`, bound positionally
/// from `values`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SqlCondition {
    sql: String,
    values: Vec<Value>,
}

impl SqlCondition {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// An empty condition places no restriction; callers omit the WHERE clause.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

impl fmt::Display for SqlCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

impl BoundQuery<'_> {
    /// Renders every expression as a parenthesized clause joined by `AND`.
    pub fn to_sql_condition(&self) -> Result<SqlCondition> {
        let mut clauses = Vec::with_capacity(self.len());
        let mut values = Vec::with_capacity(self.len());

        for expr in self.expressions() {
            let spec = expr.spec();
            let clause = spec.kind().render_sql(
                spec.name(),
                &spec.sql_identifier(),
                expr.operator(),
                expr.is_negated(),
            )?;
            clauses.push(clause);
            if let Some(value) = expr.value() {
                values.push(value.clone());
            }
        }

        Ok(SqlCondition {
            sql: clauses.join(" AND "),
            values,
        })
    }
}
