use crate::{
    ast::{
        expr::{Conjunction, Expression},
        operator::Operator,
        value::{QuotedString, ValueNode},
    },
    error::SyntaxError,
    lexer::{
        Lexer,
        token::{Token, TokenKind},
    },
};
use tracing::debug;

/// Parses a filter query into its conjunction of expressions.
pub fn parse(input: &str) -> Result<Conjunction, SyntaxError> {
    Parser::new(Lexer::new(input)).parse()
}

/// Recursive-descent parser with a single token of lookahead.
///
/// ```text
/// query    := AND expr* END
/// expr     := "-"? FIELD operator value?
/// value    := NUMBER | STRING | CONSTANT   (omitted iff operator is ":*")
/// ```
pub struct Parser<I>
where
    I: Iterator<Item = Token>,
{
    tokens: I,
    pushed_back: Option<Token>,
}

impl<I> Parser<I>
where
    I: Iterator<Item = Token>,
{
    pub fn new<T>(tokens: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Parser {
            tokens: tokens.into_iter(),
            pushed_back: None,
        }
    }

    /// Parses the whole token stream. On failure the remaining tokens are
    /// drained and no partial tree is returned.
    pub fn parse(mut self) -> Result<Conjunction, SyntaxError> {
        match self.parse_query() {
            Ok(conjunction) => {
                debug!(expressions = conjunction.len(), "parsed filter: {}", conjunction);
                Ok(conjunction)
            }
            Err(err) => {
                self.drain();
                debug!("filter parse failed: {}", err);
                Err(err)
            }
        }
    }

    fn drain(&mut self) {
        self.pushed_back = None;
        for _ in self.tokens.by_ref() {}
    }

    fn next(&mut self, context: &'static str) -> Result<Token, SyntaxError> {
        let token = match self.pushed_back.take() {
            Some(token) => token,
            None => self
                .tokens
                .next()
                .ok_or(SyntaxError::UnexpectedEnd { context })?,
        };

        if token.kind == TokenKind::Error {
            return Err(SyntaxError::Lex {
                message: token.lexeme,
                position: token.position,
            });
        }

        Ok(token)
    }

    fn backup(&mut self, token: Token) {
        debug_assert!(self.pushed_back.is_none(), "only one token of lookahead");
        self.pushed_back = Some(token);
    }

    fn peek_kind(&mut self, context: &'static str) -> Result<TokenKind, SyntaxError> {
        let token = self.next(context)?;
        let kind = token.kind;
        self.backup(token);
        Ok(kind)
    }

    fn unexpected(token: &Token, context: &'static str) -> SyntaxError {
        SyntaxError::UnexpectedToken {
            token: token.to_string(),
            context,
            position: token.position,
        }
    }

    fn parse_query(&mut self) -> Result<Conjunction, SyntaxError> {
        let mut conjunction = Conjunction::default();

        let first = self.next("query")?;
        match first.kind {
            TokenKind::And => {}
            TokenKind::End => return Ok(conjunction),
            _ => return Err(Self::unexpected(&first, "query")),
        }

        while self.peek_kind("query")? != TokenKind::End {
            conjunction.expressions.push(self.parse_expr()?);
        }

        Ok(conjunction)
    }

    fn parse_expr(&mut self) -> Result<Expression, SyntaxError> {
        let mut negated = false;
        let mut token = self.next("expression field")?;
        if token.kind == TokenKind::Not {
            negated = true;
            token = self.next("expression field")?;
        }
        if token.kind != TokenKind::Field {
            return Err(Self::unexpected(&token, "expression field"));
        }

        let operator = self.parse_operator()?;

        // Only the type-free syntax is checked here; the schema decides later
        // whether the value fits the field.
        let value = if operator.has_value() {
            Some(self.parse_value()?)
        } else {
            None
        };

        Ok(Expression {
            field: token.lexeme,
            operator,
            value,
            negated,
        })
    }

    fn parse_operator(&mut self) -> Result<Operator, SyntaxError> {
        let token = self.next("expression operator")?;
        if token.kind != TokenKind::Operator {
            return Err(Self::unexpected(&token, "expression operator"));
        }

        Operator::from_lexeme(&token.lexeme).ok_or(SyntaxError::UnknownOperator {
            lexeme: token.lexeme,
            position: token.position,
        })
    }

    fn parse_value(&mut self) -> Result<ValueNode, SyntaxError> {
        let token = self.next("expression value")?;
        match token.kind {
            TokenKind::Number => {
                token
                    .lexeme
                    .parse::<i64>()
                    .map(ValueNode::Number)
                    .map_err(|err| SyntaxError::InvalidNumber {
                        reason: err.to_string(),
                        position: token.position,
                        lexeme: token.lexeme.clone(),
                    })
            }
            TokenKind::String => Ok(ValueNode::QuotedString(QuotedString::new(token.lexeme))),
            TokenKind::Constant => Ok(ValueNode::Constant(token.lexeme)),
            _ => Err(Self::unexpected(&token, "expression value")),
        }
    }
}
