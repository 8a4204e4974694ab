use crate::error::{FilterError, Result, SchemaError};
use fql_model::Value;
use fql_syntax::{Operator, OperatorSet, ValueNode};
use std::{cmp::Ordering, collections::HashMap, fmt};

pub mod boolean;
pub mod enumeration;
pub mod identifier;
pub mod text;
pub mod timestamp;

pub use boolean::BooleanKind;
pub use enumeration::{DEFAULT_UNKNOWN_SUFFIX, EnumValues, EnumerationKind};
pub use identifier::IdentifierKind;
pub use text::TextKind;
pub use timestamp::TimestampKind;

/// Type-specific behaviour of a filterable field.
///
/// Implementations decide which literals a field accepts, how a decoded literal
/// compares against a record value, and how the field renders in SQL.
pub trait FieldKind: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Every operator this kind can evaluate.
    fn operators(&self) -> OperatorSet;

    fn decode(&self, field: &str, value: &ValueNode) -> Result<Value>;

    /// Compares the decoded literal against a record value under `op`.
    ///
    /// The existence operator is never passed here; presence is decided by the
    /// evaluator before a comparison happens.
    fn compare(
        &self,
        field: &str,
        decoded: &Value,
        op: Operator,
        candidate: &Value,
    ) -> Result<bool>;

    fn render_sql(&self, field: &str, column: &str, op: Operator, negated: bool) -> Result<String> {
        if op == Operator::Exists {
            let not = if negated { "" } else { "NOT " };
            return Ok(format!("({column} IS {not}NULL)"));
        }

        let symbol = op
            .sql_symbol()
            .ok_or_else(|| FilterError::UnsupportedOperatorForSql {
                field: field.to_string(),
                operator: op,
            })?;
        let not = if negated { "NOT " } else { "" };
        Ok(format!("({not}{column} {symbol} ?)"))
    }
}

/// Applies an equality or ordering operator to the result of a comparison.
pub(crate) fn apply_ordering(field: &str, op: Operator, ordering: Ordering) -> Result<bool> {
    match op {
        Operator::Equal => Ok(ordering == Ordering::Equal),
        Operator::NotEqual => Ok(ordering != Ordering::Equal),
        Operator::GreaterThan => Ok(ordering == Ordering::Greater),
        Operator::GreaterOrEqual => Ok(ordering != Ordering::Less),
        Operator::LessThan => Ok(ordering == Ordering::Less),
        Operator::LessOrEqual => Ok(ordering != Ordering::Greater),
        Operator::Contains | Operator::Exists => Err(FilterError::OperatorNotAllowed {
            field: field.to_string(),
            operator: op,
        }),
    }
}

/// Orders `candidate` against the decoded literal with [`Value::compare`] and
/// applies `op`. Values of another variant are incompatible.
pub(crate) fn compare_values(
    field: &str,
    expected: &'static str,
    decoded: &Value,
    op: Operator,
    candidate: &Value,
) -> Result<bool> {
    let ordering = candidate
        .compare(decoded)
        .ok_or_else(|| FilterError::incompatible(field, expected, candidate))?;
    apply_ordering(field, op, ordering)
}

/// Converts a mixed-case field name into its underscore-lowercase SQL form,
/// e.g. `boolUppercase` becomes `bool_uppercase`.
pub fn sql_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Declaration of a single filterable field.
#[derive(Debug)]
pub struct FieldSpec {
    name: String,
    required: bool,
    operators: OperatorSet,
    column: Option<String>,
    kind: Box<dyn FieldKind>,
}

impl FieldSpec {
    pub fn new(name: &str, kind: impl FieldKind + 'static) -> Self {
        FieldSpec {
            name: name.to_string(),
            required: false,
            operators: kind.operators(),
            column: None,
            kind: Box::new(kind),
        }
    }

    pub fn identifier(name: &str) -> Self {
        FieldSpec::new(name, IdentifierKind)
    }

    pub fn enumeration(name: &str, values: EnumValues) -> Self {
        FieldSpec::new(name, EnumerationKind::new(values))
    }

    pub fn boolean(name: &str) -> Self {
        FieldSpec::new(name, BooleanKind)
    }

    pub fn timestamp(name: &str) -> Self {
        FieldSpec::new(name, TimestampKind)
    }

    pub fn text(name: &str) -> Self {
        FieldSpec::new(name, TextKind)
    }

    /// Queries fail to bind unless they mention this field.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Renders the field as `column` in SQL instead of the snake-cased name.
    pub fn with_column(mut self, column: &str) -> Self {
        self.column = Some(column.to_string());
        self
    }

    /// Narrows the operators accepted for this field.
    pub fn with_operators(mut self, operators: OperatorSet) -> Self {
        self.operators = operators;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn operators(&self) -> OperatorSet {
        self.operators
    }

    pub fn allows(&self, op: Operator) -> bool {
        self.operators.allows(op)
    }

    pub fn kind(&self) -> &dyn FieldKind {
        self.kind.as_ref()
    }

    pub fn sql_identifier(&self) -> String {
        match &self.column {
            Some(column) => column.clone(),
            None => sql_identifier(&self.name),
        }
    }

    fn validate(&self) -> std::result::Result<(), SchemaError> {
        if self.operators.is_empty() {
            return Err(SchemaError::EmptyOperatorSet(self.name.clone()));
        }

        let unsupported = self.operators - self.kind.operators();
        if !unsupported.is_empty() {
            return Err(SchemaError::UnsupportedOperators {
                field: self.name.clone(),
                kind: self.kind.name(),
                operators: unsupported,
            });
        }

        Ok(())
    }
}

/// Immutable collection of field declarations, built once and shared.
#[derive(Debug)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
}

impl Schema {
    pub fn new(fields: Vec<FieldSpec>) -> std::result::Result<Self, SchemaError> {
        let mut index = HashMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            field.validate()?;
            if index.insert(field.name.clone(), i).is_some() {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }

        Ok(Schema { fields, index })
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn bind(&self, query: &str) -> Result<crate::bind::BoundQuery<'_>> {
        crate::bind::bind(self, query)
    }
}
