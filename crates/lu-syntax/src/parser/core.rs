use super::*;
use crate::token::{Operator, Word};

impl Parser {
    pub(super) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            line: self.current().line,
            message: message.into(),
        }
    }

    pub(super) fn current(&self) -> &Token {
        self.peek(0)
    }

    pub(super) fn peek(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).unwrap_or(&self.eof)
    }

    pub(super) fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(super) fn line(&self) -> usize {
        self.current().line
    }

    pub(super) fn check_op(&self, op: Operator) -> bool {
        self.current().is_operator(op)
    }

    pub(super) fn check_word(&self, word: Word) -> bool {
        self.current().is_word(word)
    }

    pub(super) fn eat_op(&mut self, op: Operator) -> bool {
        let found = self.check_op(op);
        if found {
            self.advance();
        }
        found
    }

    pub(super) fn eat_word(&mut self, word: Word) -> bool {
        let found = self.check_word(word);
        if found {
            self.advance();
        }
        found
    }

    /// `Expected 'then', got Name near 'x'`
    pub(super) fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.current();
        if self.is_eof() {
            self.error(format!("Expected {expected}, got <eof>"))
        } else {
            self.error(format!(
                "Expected {expected}, got {} near '{}'",
                token.kind.class(),
                token.kind
            ))
        }
    }

    pub(super) fn expect_op(&mut self, op: Operator) -> Result<(), ParseError> {
        if self.eat_op(op) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", op.as_str())))
        }
    }

    pub(super) fn expect_word(&mut self, word: Word) -> Result<(), ParseError> {
        if self.eat_word(word) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", word.as_str())))
        }
    }

    pub(super) fn expect_name(&mut self) -> Result<String, ParseError> {
        match &self.current().kind {
            TokenKind::Name(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("name")),
        }
    }

    /// Comma-separated names up to (not including) the first non-comma.
    pub(super) fn name_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut names = vec![self.expect_name()?];
        while self.eat_op(Operator::Comma) {
            names.push(self.expect_name()?);
        }
        Ok(names)
    }

    /// Parameter list between `open` and `close`; returns names and whether
    /// a trailing `...` was present.
    pub(super) fn parameters(
        &mut self,
        open: Operator,
        close: Operator,
    ) -> Result<(Vec<String>, bool), ParseError> {
        self.expect_op(open)?;
        let mut params = Vec::new();
        let mut variadic = false;
        if self.eat_op(close) {
            return Ok((params, variadic));
        }
        loop {
            if self.eat_op(Operator::Ellipsis) {
                variadic = true;
                self.expect_op(close)?;
                break;
            }
            params.push(self.expect_name()?);
            if self.eat_op(close) {
                break;
            }
            self.expect_op(Operator::Comma)?;
        }
        Ok((params, variadic))
    }
}
