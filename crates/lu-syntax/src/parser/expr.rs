use super::*;
use crate::token::{Operator, Word};

/// Operand binding power for `not`, `#` and unary `-`: only `^` binds tighter.
const UNARY_OPERAND_PRECEDENCE: u8 = 8;

impl Parser {
    pub(super) fn expression(&mut self, min_precedence: u8) -> Result<ExprId, ParseError> {
        let mut left = self.unary()?;
        loop {
            let TokenKind::Operator(op) = self.current().kind else {
                break;
            };
            if op.ends_expression() {
                break;
            }
            let Some(precedence) = op.precedence() else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            let Some(binary) = binary_op(op) else {
                break;
            };
            self.advance();
            let next = if op.is_right_associative() {
                precedence
            } else {
                precedence + 1
            };
            let right = self.expression(next)?;
            left = self.arena.binary(binary, left, right);
        }
        Ok(left)
    }

    pub(super) fn expression_list(&mut self) -> Result<Vec<ExprId>, ParseError> {
        let mut exprs = vec![self.expression(1)?];
        while self.eat_op(Operator::Comma) {
            exprs.push(self.expression(1)?);
        }
        Ok(exprs)
    }

    fn unary(&mut self) -> Result<ExprId, ParseError> {
        let op = match self.current().kind {
            TokenKind::Operator(Operator::Not) => UnaryOp::Not,
            TokenKind::Operator(Operator::Hash) => UnaryOp::Len,
            TokenKind::Operator(Operator::Minus) => UnaryOp::Neg,
            _ => return self.suffixed(true),
        };
        self.advance();
        let operand = self.expression(UNARY_OPERAND_PRECEDENCE)?;
        Ok(self.arena.alloc(Expr::Arith(Arith::Unary { op, operand })))
    }

    /// A primary expression followed by any number of `.name`, `[key]`,
    /// `:method(args)` and call suffixes. Calls are disabled for the head of
    /// an intrinsic, whose argument list belongs to the intrinsic itself.
    pub(super) fn suffixed(&mut self, allow_calls: bool) -> Result<ExprId, ParseError> {
        let mut expr = self.primary()?;
        loop {
            match &self.current().kind {
                TokenKind::Operator(Operator::Dot) => {
                    self.advance();
                    let name = self.expect_name()?;
                    expr = self.arena.member(expr, name);
                }
                TokenKind::Operator(Operator::LBracket) => {
                    self.advance();
                    let key = self.expression(1)?;
                    self.expect_op(Operator::RBracket)?;
                    expr = self.arena.subscript(expr, key);
                }
                TokenKind::Operator(Operator::Colon) if allow_calls => {
                    self.advance();
                    let method = self.expect_name()?;
                    let args = self.call_arguments()?;
                    expr = self.arena.alloc(Expr::Arith(Arith::Call {
                        target: expr,
                        method: Some(method),
                        args,
                    }));
                }
                TokenKind::Operator(Operator::LParen | Operator::LBrace)
                | TokenKind::String(_)
                    if allow_calls =>
                {
                    let args = self.call_arguments()?;
                    expr = self.arena.call(expr, args);
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// `(a, b)`, a single string literal, or a single table constructor.
    fn call_arguments(&mut self) -> Result<Vec<ExprId>, ParseError> {
        match &self.current().kind {
            TokenKind::String(value) => {
                let value = value.clone();
                self.advance();
                Ok(vec![self.arena.string(value)])
            }
            TokenKind::Operator(Operator::LBrace) => Ok(vec![self.table()?]),
            _ => self.parenthesized_arguments(),
        }
    }

    pub(super) fn parenthesized_arguments(&mut self) -> Result<Vec<ExprId>, ParseError> {
        self.expect_op(Operator::LParen)?;
        if self.eat_op(Operator::RParen) {
            return Ok(Vec::new());
        }
        let args = self.expression_list()?;
        self.expect_op(Operator::RParen)?;
        Ok(args)
    }

    fn primary(&mut self) -> Result<ExprId, ParseError> {
        let line = self.line();
        let atom = match &self.current().kind {
            TokenKind::Operator(Operator::LParen) => {
                self.advance();
                let inner = self.assignment_expression()?;
                self.expect_op(Operator::RParen)?;
                return Ok(inner);
            }
            TokenKind::Operator(Operator::LBrace) => return self.table(),
            TokenKind::Operator(Operator::Lt) => {
                let element = self.element()?;
                return Ok(self.arena.alloc(Expr::Atom(Atom::Element(element))));
            }
            TokenKind::Operator(Operator::Pipe) => return self.lambda(line),
            TokenKind::Operator(Operator::Ellipsis) => Atom::Vararg,
            TokenKind::Number(n) => Atom::Number(*n),
            TokenKind::String(s) => Atom::String(s.clone()),
            TokenKind::Name(name) => Atom::Name(name.clone()),
            TokenKind::Word(Word::True) => Atom::Boolean(true),
            TokenKind::Word(Word::False) => Atom::Boolean(false),
            TokenKind::Word(Word::Nil) => Atom::Nil,
            TokenKind::Word(Word::Function) => {
                self.advance();
                let func = self.function_body()?;
                return Ok(self.arena.alloc(Expr::Atom(Atom::Func(func))));
            }
            TokenKind::Invalid => return Err(self.error("Expression ended unexpectedly")),
            other => {
                return Err(self.error(format!(
                    "Unexpected {} '{}' in expression",
                    other.class(),
                    other
                )));
            }
        };
        self.advance();
        Ok(self.arena.alloc(Expr::Atom(atom)))
    }

    /// Inside parentheses an assignment may be used as a value:
    /// `(a = b = 1)` assigns right to left and yields `a`.
    fn assignment_expression(&mut self) -> Result<ExprId, ParseError> {
        let target = self.expression(1)?;
        let op = match self.current().kind {
            TokenKind::Operator(Operator::Assign) => AssignOp::Set,
            TokenKind::Operator(op) if op.is_compound_assignment() => match compound_op(op) {
                Some(op) => AssignOp::Compound(op),
                None => return Ok(target),
            },
            _ => return Ok(target),
        };
        self.advance();
        let value = self.assignment_expression()?;
        Ok(self
            .arena
            .alloc(Expr::Arith(Arith::Assign { op, target, value })))
    }

    /// `(params) body end`, after the `function` keyword and optional name.
    pub(super) fn function_body(&mut self) -> Result<Function, ParseError> {
        let (params, variadic) = self.parameters(Operator::LParen, Operator::RParen)?;
        let body = self.block(super::stmt::BlockEnd::End)?;
        Ok(Function {
            params,
            variadic,
            body,
        })
    }

    /// `|a, b| a + b` is shorthand for `function(a, b) return a + b end`.
    fn lambda(&mut self, line: usize) -> Result<ExprId, ParseError> {
        let (params, variadic) = self.parameters(Operator::Pipe, Operator::Pipe)?;
        let value = self.expression(1)?;
        let func = Function {
            params,
            variadic,
            body: vec![Stmt::ret(vec![value], line)],
        };
        Ok(self.arena.alloc(Expr::Atom(Atom::Func(func))))
    }

    pub(super) fn table(&mut self) -> Result<ExprId, ParseError> {
        self.expect_op(Operator::LBrace)?;
        let mut table = TableConstructor::new();
        loop {
            if self.eat_op(Operator::RBrace) {
                break;
            }
            let named = matches!(self.current().kind, TokenKind::Name(_))
                && self.peek(1).is_operator(Operator::Assign);
            let method = self.check_word(Word::Function)
                && matches!(self.peek(1).kind, TokenKind::Name(_));

            if named {
                let name = self.expect_name()?;
                self.advance();
                let value = self.expression(1)?;
                table.push_named(&mut self.arena, &name, value);
            } else if self.eat_op(Operator::LBracket) {
                let key = self.expression(1)?;
                self.expect_op(Operator::RBracket)?;
                self.expect_op(Operator::Assign)?;
                let value = self.expression(1)?;
                table.push_keyed(key, value);
            } else if method {
                self.advance();
                let name = self.expect_name()?;
                let func = self.function_body()?;
                let value = self.arena.alloc(Expr::Atom(Atom::Func(func)));
                table.push_named(&mut self.arena, &name, value);
            } else {
                let value = self.expression(1)?;
                table.push_positional(value);
            }

            if !self.eat_op(Operator::Comma) && !self.eat_op(Operator::Semicolon) {
                self.expect_op(Operator::RBrace)?;
                break;
            }
        }
        Ok(self.arena.table(table))
    }
}

pub(super) fn binary_op(op: Operator) -> Option<BinaryOp> {
    Some(match op {
        Operator::Plus => BinaryOp::Add,
        Operator::Minus => BinaryOp::Sub,
        Operator::Star => BinaryOp::Mul,
        Operator::Slash => BinaryOp::Div,
        Operator::Percent => BinaryOp::Mod,
        Operator::Caret => BinaryOp::Pow,
        Operator::DotDot => BinaryOp::Concat,
        Operator::EqEq => BinaryOp::Eq,
        Operator::NotEq => BinaryOp::Ne,
        Operator::Lt => BinaryOp::Lt,
        Operator::LtEq => BinaryOp::Le,
        Operator::Gt => BinaryOp::Gt,
        Operator::GtEq => BinaryOp::Ge,
        Operator::And => BinaryOp::And,
        Operator::Or => BinaryOp::Or,
        _ => return None,
    })
}

/// The arithmetic behind a compound assignment operator such as `+=`.
pub(super) fn compound_op(op: Operator) -> Option<BinaryOp> {
    Some(match op {
        Operator::PlusAssign => BinaryOp::Add,
        Operator::MinusAssign => BinaryOp::Sub,
        Operator::StarAssign => BinaryOp::Mul,
        Operator::SlashAssign => BinaryOp::Div,
        Operator::PercentAssign => BinaryOp::Mod,
        Operator::CaretAssign => BinaryOp::Pow,
        Operator::ConcatAssign => BinaryOp::Concat,
        _ => return None,
    })
}
