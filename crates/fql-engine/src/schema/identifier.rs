use crate::{
    error::{FilterError, Result},
    schema::{FieldKind, compare_values},
};
use fql_model::Value;
use fql_syntax::{Operator, OperatorSet, ValueNode};

/// Non-negative numeric identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierKind;

impl FieldKind for IdentifierKind {
    fn name(&self) -> &'static str {
        "identifier"
    }

    fn operators(&self) -> OperatorSet {
        OperatorSet::EQUALITY
    }

    fn decode(&self, field: &str, value: &ValueNode) -> Result<Value> {
        match value {
            ValueNode::Number(n) if *n < 0 => Err(FilterError::decode(
                field,
                n,
                "id fields cannot be negative",
            )),
            ValueNode::Number(n) => Ok(Value::Int(*n)),
            other => Err(FilterError::decode(
                field,
                other,
                "id fields require numeric filters",
            )),
        }
    }

    fn compare(
        &self,
        field: &str,
        decoded: &Value,
        op: Operator,
        candidate: &Value,
    ) -> Result<bool> {
        compare_values(field, "integer", decoded, op, candidate)
    }
}
