use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// The lexer rejected the input.
    #[error("invalid filter at position {position}: {message}")]
    Lex { message: String, position: usize },

    #[error("unexpected {token} in {context} at position {position}")]
    UnexpectedToken {
        token: String,
        context: &'static str,
        position: usize,
    },

    #[error("unexpected end of token stream in {context}")]
    UnexpectedEnd { context: &'static str },

    #[error("unknown operator '{lexeme}' at position {position}")]
    UnknownOperator { lexeme: String, position: usize },

    #[error("cannot parse number '{lexeme}' at position {position}: {reason}")]
    InvalidNumber {
        lexeme: String,
        reason: String,
        position: usize,
    },
}

impl SyntaxError {
    /// True when the failure was detected by the lexer rather than the grammar.
    pub fn is_lex(&self) -> bool {
        matches!(self, SyntaxError::Lex { .. })
    }

    pub fn position(&self) -> Option<usize> {
        match self {
            SyntaxError::Lex { position, .. }
            | SyntaxError::UnexpectedToken { position, .. }
            | SyntaxError::UnknownOperator { position, .. }
            | SyntaxError::InvalidNumber { position, .. } => Some(*position),
            SyntaxError::UnexpectedEnd { .. } => None,
        }
    }
}
