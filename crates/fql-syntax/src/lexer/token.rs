use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token. For [`TokenKind::Error`] this is the error message.
    pub lexeme: String,
    /// Character offset of the first character of the token.
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: usize) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structure
    And, // implicit conjunction, emitted once at stream start
    Not, // -
    End,

    Field,
    Operator,

    // Values
    Number,
    String,
    Constant,

    Error,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::And => write!(f, "conjunction"),
            TokenKind::Not => write!(f, "negation"),
            TokenKind::End => write!(f, "end of input"),
            TokenKind::Field => write!(f, "field"),
            TokenKind::Operator => write!(f, "operator"),
            TokenKind::Number => write!(f, "number"),
            TokenKind::String => write!(f, "string"),
            TokenKind::Constant => write!(f, "constant"),
            TokenKind::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::And => write!(f, " AND "),
            TokenKind::Not => write!(f, "NOT "),
            TokenKind::End => write!(f, "EOF"),
            TokenKind::Error => write!(f, "{}", self.lexeme),
            TokenKind::Field => write!(f, "field:{:?}", self.lexeme),
            TokenKind::Operator => write!(f, "op:{:?}", self.lexeme),
            TokenKind::Number => write!(f, "number:{:?}", self.lexeme),
            TokenKind::String => write!(f, "string:{:?}", self.lexeme),
            TokenKind::Constant => write!(f, "const:{:?}", self.lexeme),
        }
    }
}
