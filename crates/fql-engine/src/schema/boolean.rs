use crate::{
    error::{FilterError, Result},
    schema::{FieldKind, compare_values},
};
use fql_model::Value;
use fql_syntax::{Operator, OperatorSet, ValueNode};

/// Flags filtered by the `true`/`false` constants, in any letter case.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanKind;

impl FieldKind for BooleanKind {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn operators(&self) -> OperatorSet {
        OperatorSet::EQUALITY
    }

    fn decode(&self, field: &str, value: &ValueNode) -> Result<Value> {
        match value {
            ValueNode::Constant(name) if name.eq_ignore_ascii_case("true") => Ok(Value::Boolean(true)),
            ValueNode::Constant(name) if name.eq_ignore_ascii_case("false") => Ok(Value::Boolean(false)),
            other => Err(FilterError::decode(
                field,
                other,
                "bool fields must be either true or false",
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
        compare_values(field, "boolean", decoded, op, candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_any_case() {
        let kind = BooleanKind;
        for (literal, expected) in [("true", true), ("TRUE", true), ("False", false), ("false", false)] {
            assert_eq!(
                kind.decode("flag", &ValueNode::Constant(literal.into())).unwrap(),
                Value::Boolean(expected)
            );
        }
    }

    #[test]
    fn test_decode_rejects_other_literals() {
        let kind = BooleanKind;
        let err = kind.decode("flag", &ValueNode::Constant("yes".into())).unwrap_err();
        assert!(err.to_string().contains("either true or false"));
        assert!(kind.decode("flag", &ValueNode::Number(1)).is_err());
    }

    #[test]
    fn test_compare() {
        let kind = BooleanKind;
        let want = Value::Boolean(true);
        assert!(kind.compare("flag", &want, Operator::Equal, &Value::Boolean(true)).unwrap());
        assert!(kind.compare("flag", &want, Operator::NotEqual, &Value::Boolean(false)).unwrap());
        assert!(matches!(
            kind.compare("flag", &want, Operator::Equal, &Value::Int(1)),
            Err(FilterError::IncompatibleValue { expected: "boolean", .. })
        ));
    }
}
