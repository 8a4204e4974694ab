use crate::{
    error::{FilterError, Result},
    schema::{FieldSpec, Schema},
};
use fql_model::Value;
use fql_syntax::{Conjunction, Expression, Operator};
use std::fmt;
use tracing::debug;

/// An expression resolved against its field declaration, with the literal
/// decoded into a typed [`Value`].
#[derive(Debug, Clone)]
pub struct BoundExpression<'s> {
    expression: Expression,
    spec: &'s FieldSpec,
    value: Option<Value>,
}

impl<'s> BoundExpression<'s> {
    pub fn field(&self) -> &str {
        &self.expression.field
    }

    pub fn operator(&self) -> Operator {
        self.expression.operator
    }

    pub fn is_negated(&self) -> bool {
        self.expression.negated
    }

    pub fn spec(&self) -> &'s FieldSpec {
        self.spec
    }

    /// Decoded literal; `None` only for the existence operator.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

impl fmt::Display for BoundExpression<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

/// A validated query, ready for SQL rendering or record matching.
///
/// Borrows the schema it was bound against, and can be shared across threads.
#[derive(Debug, Clone)]
pub struct BoundQuery<'s> {
    expressions: Vec<BoundExpression<'s>>,
}

impl<'s> BoundQuery<'s> {
    pub fn expressions(&self) -> &[BoundExpression<'s>] {
        &self.expressions
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.expressions.len()
    }
}

impl fmt::Display for BoundQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.expressions.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Parses `query` and binds it against `schema`.
pub fn bind<'s>(schema: &'s Schema, query: &str) -> Result<BoundQuery<'s>> {
    let conjunction = fql_syntax::parse(query)
        .inspect_err(|e| debug!("Failed to parse filter {:?}: {}", query, e))?;
    bind_conjunction(schema, conjunction)
}

/// Binds an already parsed conjunction.
///
/// Expressions are checked in query order and the first failure wins. Required
/// fields are checked afterwards, in declaration order.
pub fn bind_conjunction(schema: &Schema, conjunction: Conjunction) -> Result<BoundQuery<'_>> {
    let missing = schema
        .fields()
        .iter()
        .find(|spec| spec.is_required() && !conjunction.mentions(spec.name()));
    let mut expressions = Vec::with_capacity(conjunction.len());

    for expression in conjunction.expressions {
        let spec = schema
            .field(&expression.field)
            .ok_or_else(|| FilterError::UnknownField {
                field: expression.field.clone(),
            })?;

        if !spec.allows(expression.operator) {
            return Err(FilterError::OperatorNotAllowed {
                field: expression.field.clone(),
                operator: expression.operator,
            });
        }

        let value = match &expression.value {
            Some(node) => Some(spec.kind().decode(spec.name(), node)?),
            None => None,
        };

        expressions.push(BoundExpression {
            expression,
            spec,
            value,
        });
    }

    if let Some(spec) = missing {
        debug!("Filter is missing required field {}", spec.name());
        return Err(FilterError::RequiredFieldMissing {
            field: spec.name().to_string(),
        });
    }

    debug!("Bound filter with {} expression(s)", expressions.len());
    Ok(BoundQuery { expressions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        schema::{EnumValues, FieldSpec},
    };
    use fql_syntax::OperatorSet;
    use tracing_test::traced_test;

    fn schema() -> Schema {
        Schema::new(vec![
            FieldSpec::identifier("id"),
            FieldSpec::enumeration(
                "enum",
                EnumValues::new([("FOOENUM_UNKNOWN", 0), ("FOOENUM_FIRST", 1)]),
            ),
            FieldSpec::timestamp("ts"),
            FieldSpec::text("name").with_operators(OperatorSet::EQUAL),
        ])
        .unwrap()
    }

    #[test]
    fn test_binds_in_query_order() {
        let schema = schema();
        let query = bind(&schema, "enum=FOOENUM_FIRST -id=3 ts:*").unwrap();

        let fields: Vec<&str> = query.expressions().iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["enum", "id", "ts"]);
        assert_eq!(query.expressions()[1].value(), Some(&Value::Int(3)));
        assert!(query.expressions()[1].is_negated());
        assert_eq!(query.expressions()[2].value(), None);
        assert_eq!(query.to_string(), "enum=FOOENUM_FIRST -id=3 ts:*");
    }

    #[test]
    fn test_empty_query_binds() {
        let schema = schema();
        assert!(bind(&schema, "").unwrap().is_empty());
        assert!(bind(&schema, "   ").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_field() {
        let schema = schema();
        let err = bind(&schema, "id=1 zzz=3").unwrap_err();
        assert_eq!(
            err,
            FilterError::UnknownField {
                field: "zzz".to_string()
            }
        );
        assert_eq!(err.to_string(), "unknown field in query: zzz");
    }

    #[test]
    fn test_operator_not_allowed() {
        let schema = schema();
        let err = bind(&schema, "name!=bob").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OperatorNotAllowed);
        assert_eq!(err.to_string(), "operator not allowed for field name: '!='");

        assert_eq!(bind(&schema, "id>3").unwrap_err().kind(), ErrorKind::OperatorNotAllowed);
        assert_eq!(bind(&schema, "ts=\"2019-03-02\"").unwrap_err().kind(), ErrorKind::OperatorNotAllowed);
    }

    #[test]
    fn test_first_failure_wins() {
        let schema = schema();
        let err = bind(&schema, "id=-1 zzz=3").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueDecode);
    }

    #[test]
    fn test_syntax_errors_propagate() {
        let schema = schema();
        assert_eq!(bind(&schema, "id=x!").unwrap_err().kind(), ErrorKind::Lex);
        assert!(bind(&schema, "id=3 \"").unwrap_err().kind().is_invalid_query());
    }

    #[test]
    fn test_required_fields_in_declaration_order() {
        let schema = Schema::new(vec![
            FieldSpec::identifier("id"),
            FieldSpec::text("owner").required(),
            FieldSpec::identifier("tenant").required(),
        ])
        .unwrap();

        assert_eq!(
            bind(&schema, "id=1").unwrap_err(),
            FilterError::RequiredFieldMissing {
                field: "owner".to_string()
            }
        );
        assert_eq!(
            bind(&schema, "owner=bob").unwrap_err(),
            FilterError::RequiredFieldMissing {
                field: "tenant".to_string()
            }
        );
        assert_eq!(
            bind(&schema, "").unwrap_err().to_string(),
            "required filter missing in query: owner"
        );
        assert!(bind(&schema, "tenant=2 -owner=bob").is_ok());
    }

    #[test]
    fn test_expression_errors_precede_required_check() {
        let schema = Schema::new(vec![FieldSpec::identifier("tenant").required()]).unwrap();
        assert_eq!(bind(&schema, "zzz=1").unwrap_err().kind(), ErrorKind::UnknownField);
    }

    #[test]
    fn test_schema_bind_shorthand() {
        let schema = schema();
        assert_eq!(schema.bind("id=3").unwrap().len(), 1);
    }

    #[traced_test]
    #[test]
    fn test_logs_binding() {
        let schema = schema();
        bind(&schema, "id=3").unwrap();
        assert!(logs_contain("Bound filter with 1 expression(s)"));

        let _ = bind(&schema, "id=3 ?");
        assert!(logs_contain("Failed to parse filter"));
    }
}
