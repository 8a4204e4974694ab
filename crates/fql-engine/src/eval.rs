use crate::{
    bind::{BoundExpression, BoundQuery},
    error::{FilterError, Result},
};
use fql_model::{Record, Value};
use fql_syntax::Operator;
use tracing::debug;

impl BoundQuery<'_> {
    /// Whether `record` satisfies every expression.
    ///
    /// Evaluation stops at the first expression that does not match, so errors
    /// from later expressions are not reported.
    pub fn matches(&self, record: &Record) -> Result<bool> {
        for expr in self.expressions() {
            if !expr.matches(record)? {
                debug!("Record rejected by {}", expr);
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl BoundExpression<'_> {
    pub fn matches(&self, record: &Record) -> Result<bool> {
        let matched = self.evaluate(record)?;
        Ok(matched != self.is_negated())
    }

    fn evaluate(&self, record: &Record) -> Result<bool> {
        let candidate = record.get(self.field());
        if self.operator() == Operator::Exists {
            return Ok(candidate.is_some());
        }

        let candidate = candidate.ok_or_else(|| FilterError::MissingRecordField {
            field: self.field().to_string(),
        })?;
        let decoded = self.value().unwrap_or(&Value::Null);

        self.spec()
            .kind()
            .compare(self.field(), decoded, self.operator(), candidate)
    }
}
