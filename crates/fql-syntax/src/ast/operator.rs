use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Comparison operators of the filter language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ":")]
    Contains,
    #[serde(rename = ":*")]
    Exists,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessOrEqual,
}

impl Operator {
    pub const ALL: [Operator; 8] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::Contains,
        Operator::Exists,
        Operator::GreaterThan,
        Operator::GreaterOrEqual,
        Operator::LessThan,
        Operator::LessOrEqual,
    ];

    pub fn from_lexeme(lexeme: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.lexeme() == lexeme)
    }

    pub fn lexeme(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::Contains => ":",
            Operator::Exists => ":*",
            Operator::GreaterThan => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessOrEqual => "<=",
        }
    }

    /// Whether the operator takes a value on its right-hand side.
    pub fn has_value(self) -> bool {
        self != Operator::Exists
    }

    /// SQL comparison symbol, if the operator has a direct SQL counterpart.
    pub fn sql_symbol(self) -> Option<&'static str> {
        match self {
            Operator::Equal => Some("="),
            Operator::NotEqual => Some("!="),
            Operator::GreaterThan => Some(">"),
            Operator::GreaterOrEqual => Some(">="),
            Operator::LessThan => Some("<"),
            Operator::LessOrEqual => Some("<="),
            Operator::Contains | Operator::Exists => None,
        }
    }

    pub fn flag(self) -> OperatorSet {
        match self {
            Operator::Equal => OperatorSet::EQUAL,
            Operator::NotEqual => OperatorSet::NOT_EQUAL,
            Operator::Contains => OperatorSet::CONTAINS,
            Operator::Exists => OperatorSet::EXISTS,
            Operator::GreaterThan => OperatorSet::GREATER_THAN,
            Operator::GreaterOrEqual => OperatorSet::GREATER_OR_EQUAL,
            Operator::LessThan => OperatorSet::LESS_THAN,
            Operator::LessOrEqual => OperatorSet::LESS_OR_EQUAL,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.lexeme())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::from_lexeme(s).ok_or_else(|| format!("unknown operator: {s}"))
    }
}

bitflags! {
    /// Set of operators a field accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct OperatorSet: u8 {
        const EQUAL = 1 << 0;
        const NOT_EQUAL = 1 << 1;
        const CONTAINS = 1 << 2;
        const EXISTS = 1 << 3;
        const GREATER_THAN = 1 << 4;
        const GREATER_OR_EQUAL = 1 << 5;
        const LESS_THAN = 1 << 6;
        const LESS_OR_EQUAL = 1 << 7;

        const EQUALITY = Self::EQUAL.bits() | Self::NOT_EQUAL.bits();
        const ORDERING = Self::GREATER_THAN.bits()
            | Self::GREATER_OR_EQUAL.bits()
            | Self::LESS_THAN.bits()
            | Self::LESS_OR_EQUAL.bits();
    }
}

impl OperatorSet {
    pub fn allows(self, op: Operator) -> bool {
        self.contains(op.flag())
    }

    pub fn operators(self) -> impl Iterator<Item = Operator> {
        Operator::ALL.into_iter().filter(move |op| self.allows(*op))
    }
}

impl FromIterator<Operator> for OperatorSet {
    fn from_iter<T: IntoIterator<Item = Operator>>(iter: T) -> Self {
        iter.into_iter()
            .fold(OperatorSet::empty(), |set, op| set | op.flag())
    }
}

impl fmt::Display for OperatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lexemes: Vec<&str> = self.operators().map(Operator::lexeme).collect();
        write!(f, "{}", lexemes.join(" "))
    }
}
