use crate::{
    error::{FilterError, Result},
    schema::{FieldKind, compare_values},
};
use fql_model::Value;
use fql_syntax::{Operator, OperatorSet, ValueNode};
use std::{borrow::Cow, collections::HashMap};

/// Suffix marking the placeholder member of an enumeration, which can never be
/// used as a filter value.
pub const DEFAULT_UNKNOWN_SUFFIX: &str = "_UNKNOWN";

/// Bidirectional name/code table of an enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumValues {
    by_name: HashMap<String, i32>,
    by_code: HashMap<i32, String>,
}

impl EnumValues {
    pub fn new<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        pairs.into_iter().collect()
    }

    pub fn name_of(&self, code: i32) -> Option<&str> {
        self.by_code.get(&code).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }
}

impl<S: Into<String>> FromIterator<(S, i32)> for EnumValues {
    fn from_iter<T: IntoIterator<Item = (S, i32)>>(iter: T) -> Self {
        let mut values = EnumValues::default();
        for (name, code) in iter {
            let name = name.into();
            values.by_code.insert(code, name.clone());
            values.by_name.insert(name, code);
        }
        values
    }
}

#[derive(Debug, Clone)]
pub struct EnumerationKind {
    values: EnumValues,
    unknown_suffix: String,
}

impl EnumerationKind {
    pub fn new(values: EnumValues) -> Self {
        EnumerationKind {
            values,
            unknown_suffix: DEFAULT_UNKNOWN_SUFFIX.to_string(),
        }
    }

    pub fn with_unknown_suffix(mut self, suffix: &str) -> Self {
        self.unknown_suffix = suffix.to_string();
        self
    }

    /// Record values may carry either the member name or its numeric code.
    fn normalize<'a>(&self, field: &str, candidate: &'a Value) -> Result<Cow<'a, Value>> {
        match candidate {
            Value::String(_) => Ok(Cow::Borrowed(candidate)),
            Value::Int(code) => i32::try_from(*code)
                .ok()
                .and_then(|code| self.values.name_of(code))
                .map(|name| Cow::Owned(Value::from(name)))
                .ok_or_else(|| FilterError::incompatible(field, "enumeration member", candidate)),
            other => Err(FilterError::incompatible(field, "enumeration member", other)),
        }
    }
}

impl FieldKind for EnumerationKind {
    fn name(&self) -> &'static str {
        "enumeration"
    }

    fn operators(&self) -> OperatorSet {
        OperatorSet::EQUALITY
    }

    fn decode(&self, field: &str, value: &ValueNode) -> Result<Value> {
        let ValueNode::Constant(name) = value else {
            return Err(FilterError::decode(
                field,
                value,
                "enum fields require constant filters",
            ));
        };

        if !self.unknown_suffix.is_empty() && name.ends_with(&self.unknown_suffix) {
            return Err(FilterError::decode(
                field,
                name,
                "enum fields cannot be filtered by the unknown value",
            ));
        }
        if !self.values.contains(name) {
            return Err(FilterError::decode(field, name, "unknown enum value"));
        }

        Ok(Value::String(name.clone()))
    }

    fn compare(
        &self,
        field: &str,
        decoded: &Value,
        op: Operator,
        candidate: &Value,
    ) -> Result<bool> {
        let got = self.normalize(field, candidate)?;
        match op {
            Operator::Equal | Operator::NotEqual => {
                compare_values(field, "enumeration member", decoded, op, &got)
            }
            _ => Err(FilterError::OperatorNotAllowed {
                field: field.to_string(),
                operator: op,
            }),
        }
    }
}
