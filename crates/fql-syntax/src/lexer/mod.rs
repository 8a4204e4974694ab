use crate::{
    ast::operator::Operator,
    lexer::token::{Token, TokenKind},
};
use tracing::trace;

pub mod token;

const OPERATOR_CHARS: &[char] = &[':', '<', '=', '!', '>', '*'];

/// Where the lexer resumes on the next call to [`Iterator::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    End,
    Field,
    FieldName,
    Operator,
    Value,
    Separator,
}

/// Pull-based tokenizer for filter expressions.
///
/// Every call to `next` scans exactly one token. The stream always starts with a
/// [`TokenKind::And`] marker and finishes with either [`TokenKind::End`] or a single
/// [`TokenKind::Error`]; nothing is produced after that.
pub struct Lexer {
    input: Vec<char>,
    start: usize,
    pos: usize,
    state: Option<State>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            start: 0,
            pos: 0,
            state: Some(State::Start),
        }
    }

    /// Consumes the rest of the stream without inspecting it.
    pub fn drain(&mut self) {
        for _ in self.by_ref() {}
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn accept_while<F>(&mut self, predicate: F)
    where
        F: Fn(char) -> bool,
    {
        while self.peek().is_some_and(&predicate) {
            self.pos += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        self.accept_while(char::is_whitespace);
        self.start = self.pos;
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn emit(&mut self, kind: TokenKind, next: State) -> Token {
        let lexeme: String = self.input[self.start..self.pos].iter().collect();
        let token = Token::new(kind, lexeme, self.start);
        self.start = self.pos;
        self.state = Some(next);
        token
    }

    fn error(&mut self, message: String) -> Token {
        let token = Token::new(TokenKind::Error, message, self.start);
        self.start = self.pos;
        self.state = None;
        token
    }

    fn rest(&self) -> String {
        self.input[self.start..].iter().collect()
    }

    fn lex_start(&mut self) -> Token {
        let token = self.emit(TokenKind::And, State::Field);
        self.skip_whitespace();
        if self.at_end() {
            self.state = Some(State::End);
        }
        token
    }

    fn lex_end(&mut self) -> Token {
        let token = Token::new(TokenKind::End, "", self.pos);
        self.state = None;
        token
    }

    fn lex_field(&mut self) -> Token {
        self.skip_whitespace();

        // A leading '-' negates the expression; inside the name it is a plain character.
        if self.peek() == Some('-') {
            self.advance();
            return self.emit(TokenKind::Not, State::FieldName);
        }

        self.lex_field_name()
    }

    fn lex_field_name(&mut self) -> Token {
        self.accept_while(is_field_char);
        if self.start == self.pos {
            return self.error(format!("field name: {:?}", self.rest()));
        }

        self.emit(TokenKind::Field, State::Operator)
    }

    fn lex_operator(&mut self) -> Token {
        self.skip_whitespace();
        self.accept_while(|c| OPERATOR_CHARS.contains(&c));

        if self.start == self.pos {
            return self.error("empty operator".to_string());
        }

        let lexeme: String = self.input[self.start..self.pos].iter().collect();
        match Operator::from_lexeme(&lexeme) {
            Some(op) if op.has_value() => self.emit(TokenKind::Operator, State::Value),
            Some(_) => self.emit(TokenKind::Operator, State::Separator),
            None => self.error(format!("unknown operator: {:?}", lexeme)),
        }
    }

    fn lex_value(&mut self) -> Token {
        self.skip_whitespace();

        match self.peek() {
            Some('"') => self.lex_string(),
            Some(c) if c.is_ascii_digit() || c == '+' || c == '-' => self.lex_number(),
            _ => self.lex_constant(),
        }
    }

    fn lex_string(&mut self) -> Token {
        self.advance();

        loop {
            match self.advance() {
                Some('\\') => {
                    if self.advance().is_none() {
                        break;
                    }
                }
                Some('"') => return self.emit(TokenKind::String, State::Separator),
                Some(_) => {}
                None => break,
            }
        }

        self.error(format!("unterminated quoted string: {}", self.rest()))
    }

    fn lex_number(&mut self) -> Token {
        if matches!(self.peek(), Some('+' | '-')) {
            self.advance();
        }
        let digits_start = self.pos;
        self.accept_while(|c| c.is_ascii_digit());

        if digits_start == self.pos {
            return self.error(format!("unknown number: {:?}", self.rest()));
        }

        self.emit(TokenKind::Number, State::Separator)
    }

    fn lex_constant(&mut self) -> Token {
        if self
            .peek()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        {
            self.accept_while(|c| c.is_ascii_alphanumeric() || c == '_');
        }

        if self.start == self.pos {
            return self.error(format!("unknown constant: {:?}", self.rest()));
        }

        self.emit(TokenKind::Constant, State::Separator)
    }

    fn lex_separator(&mut self) -> Token {
        match self.peek() {
            None => self.lex_end(),
            Some(c) if c.is_whitespace() => {
                self.skip_whitespace();
                if self.at_end() {
                    self.lex_end()
                } else {
                    self.lex_field()
                }
            }
            Some(c) => {
                self.start = self.pos;
                self.error(format!("unknown character: {}", c))
            }
        }
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = match self.state.take()? {
            State::Start => self.lex_start(),
            State::End => self.lex_end(),
            State::Field => self.lex_field(),
            State::FieldName => self.lex_field_name(),
            State::Operator => self.lex_operator(),
            State::Value => self.lex_value(),
            State::Separator => self.lex_separator(),
        };

        trace!(kind = %token.kind, position = token.position, "{}", token);
        Some(token)
    }
}

impl std::iter::FusedIterator for Lexer {}

fn is_field_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-'
}
