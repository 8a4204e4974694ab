use crate::{
    error::{FilterError, Result},
    schema::{FieldKind, compare_values},
};
use fql_model::Value;
use fql_syntax::{Operator, OperatorSet, ValueNode};

/// Free-form strings. Accepts both bare constants and quoted strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextKind;

impl FieldKind for TextKind {
    fn name(&self) -> &'static str {
        "text"
    }

    fn operators(&self) -> OperatorSet {
        OperatorSet::EQUALITY | OperatorSet::CONTAINS
    }

    fn decode(&self, field: &str, value: &ValueNode) -> Result<Value> {
        match value {
            ValueNode::Constant(name) => Ok(Value::String(name.clone())),
            ValueNode::QuotedString(quoted) => quoted
                .unquoted()
                .map(Value::String)
                .map_err(|reason| FilterError::decode(field, quoted, reason)),
            ValueNode::Number(_) => Err(FilterError::decode(
                field,
                value,
                "text fields require string filters",
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
        if op != Operator::Contains {
            return compare_values(field, "string", decoded, op, candidate);
        }

        let (Some(want), Some(got)) = (decoded.as_str(), candidate.as_str()) else {
            return Err(FilterError::incompatible(field, "string", candidate));
        };
        Ok(got.contains(want))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fql_syntax::QuotedString;

    #[test]
    fn test_decode() {
        assert_eq!(
            TextKind.decode("name", &ValueNode::Constant("alice".into())).unwrap(),
            Value::from("alice")
        );
        assert_eq!(
            TextKind
                .decode("name", &ValueNode::QuotedString(QuotedString::new(r#""a \"b\"""#)))
                .unwrap(),
            Value::from(r#"a "b""#)
        );
        assert!(TextKind.decode("name", &ValueNode::Number(3)).is_err());
    }

    #[test]
    fn test_compare() {
        let want = Value::from("lic");
        assert!(TextKind.compare("name", &want, Operator::Contains, &Value::from("alice")).unwrap());
        assert!(!TextKind.compare("name", &want, Operator::Equal, &Value::from("alice")).unwrap());
        assert!(TextKind.compare("name", &want, Operator::NotEqual, &Value::from("alice")).unwrap());
        assert!(TextKind.compare("name", &want, Operator::Equal, &Value::Int(1)).is_err());
    }
}
