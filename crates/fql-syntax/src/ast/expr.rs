use crate::ast::{operator::Operator, value::ValueNode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single field comparison, e.g. `-status=DELETED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    pub field: String,
    pub operator: Operator,
    /// Absent exactly when the operator is [`Operator::Exists`].
    pub value: Option<ValueNode>,
    pub negated: bool,
}

impl Expression {
    pub fn new(field: &str, operator: Operator, value: Option<ValueNode>, negated: bool) -> Self {
        Expression {
            field: field.to_string(),
            operator,
            value,
            negated,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "-")?;
        }
        write!(f, "{}{}", self.field, self.operator)?;
        if let Some(value) = &self.value {
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

/// Root of a parsed query: every expression must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conjunction {
    pub expressions: Vec<Expression>,
}

impl Conjunction {
    pub fn new(expressions: Vec<Expression>) -> Self {
        Conjunction { expressions }
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expression> {
        self.expressions.iter()
    }

    /// Whether any expression references `field`.
    pub fn mentions(&self, field: &str) -> bool {
        self.expressions.iter().any(|e| e.field == field)
    }
}

impl<'a> IntoIterator for &'a Conjunction {
    type Item = &'a Expression;
    type IntoIter = std::slice::Iter<'a, Expression>;

    fn into_iter(self) -> Self::IntoIter {
        self.expressions.iter()
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.expressions.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::value::QuotedString;

    #[test]
    fn test_expression_display() {
        let expr = Expression::new("id", Operator::NotEqual, Some(ValueNode::Number(4)), false);
        assert_eq!(expr.to_string(), "id!=4");

        let expr = Expression::new("ts", Operator::Exists, None, true);
        assert_eq!(expr.to_string(), "-ts:*");
    }

    #[test]
    fn test_conjunction_display() {
        let conj = Conjunction::new(vec![
            Expression::new(
                "name",
                Operator::Contains,
                Some(ValueNode::QuotedString(QuotedString::new(r#""a b""#))),
                false,
            ),
            Expression::new("status", Operator::Equal, Some(ValueNode::Constant("ON".into())), true),
        ]);
        assert_eq!(conj.to_string(), r#"name:"a b" -status=ON"#);
        assert!(conj.mentions("status"));
        assert!(!conj.mentions("id"));
    }
}
