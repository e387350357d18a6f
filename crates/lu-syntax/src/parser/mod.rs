//! Recursive-descent parser with precedence climbing for binary operators.

use crate::ast::*;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("script:{line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    eof: Token,
    arena: Arena,
}

mod core;
mod element;
mod expr;
mod stmt;

/// Parse a token stream into a chunk. Trivia tokens are skipped.
pub fn parse(tokens: Vec<Token>) -> Result<Chunk, ParseError> {
    Parser::new(tokens).parse_chunk()
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let tokens = crate::lexer::significant(tokens);
        let last_line = tokens.last().map_or(1, |t| t.line);
        Parser {
            tokens,
            pos: 0,
            eof: Token::new(TokenKind::Invalid, last_line),
            arena: Arena::new(),
        }
    }

    pub fn parse_chunk(mut self) -> Result<Chunk, ParseError> {
        let body = self.block(stmt::BlockEnd::Eof)?;
        Ok(Chunk {
            arena: self.arena,
            body,
        })
    }
}

#[cfg(test)]
mod tests;
