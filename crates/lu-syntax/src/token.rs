//! Token model shared by the lexer and the parser.

use bstr::BString;
use serde::Serialize;
use std::fmt;

/// Reserved words. `and`, `or` and `not` lex as [`Operator`]s instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Word {
    Break,
    Do,
    Else,
    Elseif,
    End,
    False,
    For,
    Function,
    If,
    Import,
    In,
    Local,
    Nil,
    Repeat,
    Return,
    Then,
    True,
    Until,
    While,
}

impl Word {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "break" => Word::Break,
            "do" => Word::Do,
            "else" => Word::Else,
            "elseif" => Word::Elseif,
            "end" => Word::End,
            "false" => Word::False,
            "for" => Word::For,
            "function" => Word::Function,
            "if" => Word::If,
            "import" => Word::Import,
            "in" => Word::In,
            "local" => Word::Local,
            "nil" => Word::Nil,
            "repeat" => Word::Repeat,
            "return" => Word::Return,
            "then" => Word::Then,
            "true" => Word::True,
            "until" => Word::Until,
            "while" => Word::While,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Word::Break => "break",
            Word::Do => "do",
            Word::Else => "else",
            Word::Elseif => "elseif",
            Word::End => "end",
            Word::False => "false",
            Word::For => "for",
            Word::Function => "function",
            Word::If => "if",
            Word::Import => "import",
            Word::In => "in",
            Word::Local => "local",
            Word::Nil => "nil",
            Word::Repeat => "repeat",
            Word::Return => "return",
            Word::Then => "then",
            Word::True => "true",
            Word::Until => "until",
            Word::While => "while",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Hash,
    EqEq,
    NotEq,
    LtEq,
    GtEq,
    Lt,
    Gt,
    Assign,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Colon,
    Comma,
    Dot,
    DotDot,
    Ellipsis,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    CaretAssign,
    ConcatAssign,
    At,
    Pipe,
    And,
    Or,
    Not,
}

/// Punctuation operators in longest-match order.
pub(crate) const SYMBOLS: &[(&str, Operator)] = &[
    ("...", Operator::Ellipsis),
    ("..=", Operator::ConcatAssign),
    ("==", Operator::EqEq),
    ("~=", Operator::NotEq),
    ("<=", Operator::LtEq),
    (">=", Operator::GtEq),
    ("..", Operator::DotDot),
    ("+=", Operator::PlusAssign),
    ("-=", Operator::MinusAssign),
    ("*=", Operator::StarAssign),
    ("/=", Operator::SlashAssign),
    ("%=", Operator::PercentAssign),
    ("^=", Operator::CaretAssign),
    ("+", Operator::Plus),
    ("-", Operator::Minus),
    ("*", Operator::Star),
    ("/", Operator::Slash),
    ("%", Operator::Percent),
    ("^", Operator::Caret),
    ("#", Operator::Hash),
    ("<", Operator::Lt),
    (">", Operator::Gt),
    ("=", Operator::Assign),
    ("(", Operator::LParen),
    (")", Operator::RParen),
    ("{", Operator::LBrace),
    ("}", Operator::RBrace),
    ("[", Operator::LBracket),
    ("]", Operator::RBracket),
    (";", Operator::Semicolon),
    (":", Operator::Colon),
    (",", Operator::Comma),
    (".", Operator::Dot),
    ("@", Operator::At),
    ("|", Operator::Pipe),
];

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
            other => SYMBOLS
                .iter()
                .find(|(_, op)| *op == other)
                .map(|(text, _)| *text)
                .unwrap_or("?"),
        }
    }

    /// Binding power when the operator continues an expression.
    ///
    /// `@` carries a precedence but is never accepted as a binary
    /// continuation; it only starts intrinsic statements.
    pub fn precedence(self) -> Option<u8> {
        Some(match self {
            Operator::Caret => 8,
            Operator::Star | Operator::Slash | Operator::Percent => 6,
            Operator::Plus | Operator::Minus => 5,
            Operator::DotDot => 4,
            Operator::Lt
            | Operator::Gt
            | Operator::LtEq
            | Operator::GtEq
            | Operator::NotEq
            | Operator::EqEq
            | Operator::At => 3,
            Operator::And => 2,
            Operator::Or => 1,
            _ => return None,
        })
    }

    pub fn is_right_associative(self) -> bool {
        matches!(self, Operator::Caret | Operator::DotDot)
    }

    /// Operators that terminate the binary-operator loop.
    pub fn ends_expression(self) -> bool {
        matches!(
            self,
            Operator::LBrace
                | Operator::RBrace
                | Operator::LBracket
                | Operator::RBracket
                | Operator::LParen
                | Operator::RParen
                | Operator::Assign
                | Operator::Comma
                | Operator::Semicolon
                | Operator::At
                | Operator::Pipe
        ) || self.is_compound_assignment()
    }

    pub fn is_compound_assignment(self) -> bool {
        matches!(
            self,
            Operator::PlusAssign
                | Operator::MinusAssign
                | Operator::StarAssign
                | Operator::SlashAssign
                | Operator::PercentAssign
                | Operator::CaretAssign
                | Operator::ConcatAssign
        )
    }

    pub fn is_unary(self) -> bool {
        matches!(self, Operator::Not | Operator::Hash | Operator::Minus)
    }
}

/// How a string or comment literal was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StringAnnotation {
    Quoted { quote: char },
    Long { level: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TokenKind {
    Comment(String),
    Operator(Operator),
    Word(Word),
    Name(String),
    Number(f64),
    String(BString),
    Whitespace(String),
    /// End-of-input sentinel handed out by the parser.
    Invalid,
}

impl TokenKind {
    pub fn class(&self) -> &'static str {
        match self {
            TokenKind::Comment(_) => "Comment",
            TokenKind::Operator(_) => "Operator",
            TokenKind::Word(_) => "Word",
            TokenKind::Name(_) => "Name",
            TokenKind::Number(_) => "Number",
            TokenKind::String(_) => "String",
            TokenKind::Whitespace(_) => "Whitespace",
            TokenKind::Invalid => "Invalid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub annotations: Option<StringAnnotation>,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize) -> Self {
        Self {
            kind,
            line,
            annotations: None,
        }
    }

    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Comment(_) | TokenKind::Whitespace(_))
    }

    pub fn is_operator(&self, op: Operator) -> bool {
        self.kind == TokenKind::Operator(op)
    }

    pub fn is_word(&self, word: Word) -> bool {
        self.kind == TokenKind::Word(word)
    }

    pub fn is_name(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::Name(n) if n == name)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Comment(text) | TokenKind::Name(text) | TokenKind::Whitespace(text) => {
                f.write_str(text)
            }
            TokenKind::Operator(op) => f.write_str(op.as_str()),
            TokenKind::Word(word) => f.write_str(word.as_str()),
            TokenKind::Number(n) => write!(f, "{n}"),
            TokenKind::String(s) => write!(f, "{s}"),
            TokenKind::Invalid => f.write_str("<eof>"),
        }
    }
}
