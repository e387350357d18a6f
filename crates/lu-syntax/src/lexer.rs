//! Byte-oriented lexer producing a flat token stream.
//!
//! Whitespace and comments are kept as tokens so that callers can
//! reconstruct the source; [`significant`] drops them for the parser.

use crate::token::{Operator, SYMBOLS, StringAnnotation, Token, TokenKind, Word};
use bstr::BString;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("script:{line}: {message}")]
pub struct LexError {
    pub line: usize,
    pub message: String,
}

/// Tokenize a whole source text.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).run()
}

/// Drop whitespace and comment tokens.
pub fn significant(tokens: Vec<Token>) -> Vec<Token> {
    tokens.into_iter().filter(|t| !t.is_trivia()).collect()
}

/// Tokenize and keep only the tokens the parser consumes.
pub fn tokenize_significant(source: &str) -> Result<Vec<Token>, LexError> {
    tokenize(source).map(significant)
}

struct Lexer<'a> {
    src: &'a [u8],
    text: &'a str,
    pos: usize,
    line: usize,
    tokens: Vec<Token>,
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c)
}

fn is_word_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_word_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            src: text.as_bytes(),
            text,
            pos: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(b) = self.peek(0) {
            if is_space(b) {
                self.whitespace();
            } else if b.is_ascii_digit()
                || (b == b'.' && self.peek(1).is_some_and(|n| n.is_ascii_digit()))
            {
                self.number()?;
            } else if is_word_start(b) {
                self.word();
            } else if b == b'-' && self.peek(1) == Some(b'-') {
                self.comment()?;
            } else if b == b'"' || b == b'\'' {
                self.quoted_string(b)?;
            } else if b == b'[' && matches!(self.peek(1), Some(b'[' | b'=')) {
                let line = self.line;
                let (body, level) = self.long_bracket("string")?;
                self.push_annotated(
                    TokenKind::String(BString::from(body)),
                    line,
                    StringAnnotation::Long { level },
                );
            } else {
                self.operator()?;
            }
        }
        Ok(self.tokens)
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn error(&self, message: impl Into<String>) -> LexError {
        LexError {
            line: self.line,
            message: message.into(),
        }
    }

    fn push(&mut self, kind: TokenKind, line: usize) {
        self.tokens.push(Token::new(kind, line));
    }

    fn push_annotated(&mut self, kind: TokenKind, line: usize, annotation: StringAnnotation) {
        let mut token = Token::new(kind, line);
        token.annotations = Some(annotation);
        self.tokens.push(token);
    }

    fn whitespace(&mut self) {
        let start = self.pos;
        let line = self.line;
        while let Some(b) = self.peek(0).filter(|b| is_space(*b)) {
            if b == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
        let text = self.text[start..self.pos].to_string();
        self.push(TokenKind::Whitespace(text), line);
    }

    fn word(&mut self) {
        let start = self.pos;
        while self.peek(0).is_some_and(is_word_char) {
            self.pos += 1;
        }
        let name = &self.text[start..self.pos];
        let kind = match name {
            "and" => TokenKind::Operator(Operator::And),
            "or" => TokenKind::Operator(Operator::Or),
            "not" => TokenKind::Operator(Operator::Not),
            _ => match Word::from_name(name) {
                Some(word) => TokenKind::Word(word),
                None => TokenKind::Name(name.to_string()),
            },
        };
        self.push(kind, self.line);
    }

    fn number(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let radix = match (self.peek(0), self.peek(1)) {
            (Some(b'0'), Some(b'x' | b'X')) => Some(16),
            (Some(b'0'), Some(b'b' | b'B')) => Some(2),
            _ => None,
        };

        let value = if let Some(radix) = radix {
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek(0).is_some_and(is_word_char) {
                self.pos += 1;
            }
            let digits: String = self.text[digits_start..self.pos]
                .chars()
                .filter(|c| *c != '_')
                .collect();
            u64::from_str_radix(&digits, radix)
                .map(|n| n as f64)
                .map_err(|_| self.malformed_number(start))?
        } else {
            self.decimal_digits();
            if self.peek(0) == Some(b'.') && self.peek(1) != Some(b'.') {
                self.pos += 1;
                self.decimal_digits();
            }
            if matches!(self.peek(0), Some(b'e' | b'E')) {
                self.pos += 1;
                if matches!(self.peek(0), Some(b'+' | b'-')) {
                    self.pos += 1;
                }
                self.decimal_digits();
            }
            if self.peek(0).is_some_and(is_word_char) {
                while self.peek(0).is_some_and(is_word_char) {
                    self.pos += 1;
                }
                return Err(self.malformed_number(start));
            }
            let literal: String = self.text[start..self.pos]
                .chars()
                .filter(|c| *c != '_')
                .collect();
            literal
                .parse::<f64>()
                .map_err(|_| self.malformed_number(start))?
        };

        self.push(TokenKind::Number(value), self.line);
        Ok(())
    }

    fn decimal_digits(&mut self) {
        while self
            .peek(0)
            .is_some_and(|b| b.is_ascii_digit() || b == b'_')
        {
            self.pos += 1;
        }
    }

    fn malformed_number(&self, start: usize) -> LexError {
        self.error(format!(
            "malformed number near '{}'",
            &self.text[start..self.pos]
        ))
    }

    fn comment(&mut self) -> Result<(), LexError> {
        let line = self.line;
        self.pos += 2;
        if self.peek(0) == Some(b'[') && self.long_bracket_level().is_some() {
            let (body, level) = self.long_bracket("comment")?;
            let text = String::from_utf8_lossy(&body).into_owned();
            self.push_annotated(
                TokenKind::Comment(text),
                line,
                StringAnnotation::Long { level },
            );
            return Ok(());
        }
        let start = self.pos;
        while self.peek(0).is_some_and(|b| b != b'\n') {
            self.pos += 1;
        }
        let text = self.text[start..self.pos].to_string();
        self.push(TokenKind::Comment(text), line);
        Ok(())
    }

    /// Level of a `[=*[` opener at the cursor, if there is one.
    fn long_bracket_level(&self) -> Option<usize> {
        let mut offset = 1;
        while self.peek(offset) == Some(b'=') {
            offset += 1;
        }
        (self.peek(offset) == Some(b'[')).then_some(offset - 1)
    }

    fn long_bracket(&mut self, what: &str) -> Result<(Vec<u8>, usize), LexError> {
        let level = self
            .long_bracket_level()
            .ok_or_else(|| self.error(format!("invalid long {what} delimiter")))?;
        self.pos += level + 2;

        // A newline directly after the opener is not part of the body.
        if self.peek(0) == Some(b'\r') {
            self.pos += 1;
        }
        if self.peek(0) == Some(b'\n') {
            self.pos += 1;
            self.line += 1;
        }

        let start = self.pos;
        loop {
            match self.peek(0) {
                None => return Err(self.error(format!("unfinished long {what}"))),
                Some(b']') if self.closes_long_bracket(level) => {
                    let body = self.src[start..self.pos].to_vec();
                    self.pos += level + 2;
                    return Ok((body, level));
                }
                Some(b'\n') => {
                    self.line += 1;
                    self.pos += 1;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn closes_long_bracket(&self, level: usize) -> bool {
        (1..=level).all(|i| self.peek(i) == Some(b'=')) && self.peek(level + 1) == Some(b']')
    }

    fn quoted_string(&mut self, quote: u8) -> Result<(), LexError> {
        let line = self.line;
        self.pos += 1;
        let mut value = Vec::new();
        loop {
            match self.peek(0) {
                // A raw newline ends the literal early; it is lexed as whitespace.
                None | Some(b'\n') => break,
                Some(b) if b == quote => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    self.pos += 1;
                    self.escape(&mut value)?;
                }
                Some(b) => {
                    value.push(b);
                    self.pos += 1;
                }
            }
        }
        self.push_annotated(
            TokenKind::String(BString::from(value)),
            line,
            StringAnnotation::Quoted {
                quote: quote as char,
            },
        );
        Ok(())
    }

    fn escape(&mut self, value: &mut Vec<u8>) -> Result<(), LexError> {
        let Some(b) = self.peek(0) else {
            return Ok(());
        };
        self.pos += 1;
        match b {
            b'n' => value.push(b'\n'),
            b't' => value.push(b'\t'),
            b'r' => value.push(b'\r'),
            b'a' => value.push(0x07),
            b'b' => value.push(0x08),
            b'f' => value.push(0x0c),
            b'v' => value.push(0x0b),
            b'\n' => {
                self.line += 1;
                value.push(b'\n');
            }
            b'\r' => {
                if self.peek(0) == Some(b'\n') {
                    self.pos += 1;
                }
                self.line += 1;
                value.push(b'\n');
            }
            b'z' => {
                while let Some(b) = self.peek(0).filter(|b| is_space(*b)) {
                    if b == b'\n' {
                        self.line += 1;
                    }
                    self.pos += 1;
                }
            }
            b'x' => {
                let hex = self
                    .peek(0)
                    .zip(self.peek(1))
                    .and_then(|(hi, lo)| Some(hex_value(hi)? * 16 + hex_value(lo)?))
                    .ok_or_else(|| self.error("hexadecimal digit expected"))?;
                self.pos += 2;
                value.push(hex);
            }
            b'u' => {
                if self.peek(0) != Some(b'{') {
                    return Err(self.error("missing '{' in \\u{xxxx}"));
                }
                self.pos += 1;
                let mut code: u32 = 0;
                let mut digits = 0;
                while let Some(digit) = self.peek(0).and_then(hex_value) {
                    code = code
                        .checked_mul(16)
                        .and_then(|c| c.checked_add(u32::from(digit)))
                        .ok_or_else(|| self.error("UTF-8 value too large"))?;
                    digits += 1;
                    self.pos += 1;
                }
                if digits == 0 {
                    return Err(self.error("hexadecimal digit expected"));
                }
                if self.peek(0) != Some(b'}') {
                    return Err(self.error("missing '}' in \\u{xxxx}"));
                }
                self.pos += 1;
                let ch = char::from_u32(code).ok_or_else(|| self.error("UTF-8 value too large"))?;
                let mut buf = [0; 4];
                value.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
            b'0'..=b'9' => {
                let mut code = u32::from(b - b'0');
                for _ in 0..2 {
                    match self.peek(0).filter(u8::is_ascii_digit) {
                        Some(d) => {
                            code = code * 10 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        None => break,
                    }
                }
                let byte = u8::try_from(code).map_err(|_| self.error("decimal escape too large"))?;
                value.push(byte);
            }
            // `\\`, quotes, brackets and anything unknown stand for themselves.
            other => value.push(other),
        }
        Ok(())
    }

    fn operator(&mut self) -> Result<(), LexError> {
        let rest = &self.src[self.pos..];
        let (text, op) = SYMBOLS
            .iter()
            .find(|(text, _)| rest.starts_with(text.as_bytes()))
            .copied()
            .ok_or_else(|| {
                let ch = self.text[self.pos..].chars().next().unwrap_or('?');
                self.error(format!("unexpected symbol '{ch}'"))
            })?;
        self.pos += text.len();
        self.push(TokenKind::Operator(op), self.line);
        Ok(())
    }
}

fn hex_value(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}
