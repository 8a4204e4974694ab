pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{
    expr::{Conjunction, Expression},
    operator::{Operator, OperatorSet},
    value::{QuotedString, ValueNode},
};
pub use error::SyntaxError;
pub use lexer::{
    Lexer,
    token::{Token, TokenKind},
};
pub use parser::{Parser, parse};
