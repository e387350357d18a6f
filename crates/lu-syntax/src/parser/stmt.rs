use super::expr::compound_op;
use super::*;
use crate::token::{Operator, Word};

/// What terminates the block being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BlockEnd {
    Eof,
    /// Consumes `end`.
    End,
    /// Consumes `until`.
    Until,
    /// Stops before `elseif`, `else` or `end` without consuming it.
    IfArm,
}

impl Parser {
    pub(super) fn block(&mut self, end: BlockEnd) -> Result<Block, ParseError> {
        let mut body = Vec::new();
        loop {
            while self.eat_op(Operator::Semicolon) {}
            if self.is_eof() {
                return match end {
                    BlockEnd::Eof => Ok(body),
                    BlockEnd::Until => Err(self.unexpected("'until'")),
                    BlockEnd::End | BlockEnd::IfArm => Err(self.unexpected("'end'")),
                };
            }
            match end {
                BlockEnd::End if self.eat_word(Word::End) => return Ok(body),
                BlockEnd::Until if self.eat_word(Word::Until) => return Ok(body),
                BlockEnd::IfArm
                    if self.check_word(Word::End)
                        || self.check_word(Word::Else)
                        || self.check_word(Word::Elseif) =>
                {
                    return Ok(body);
                }
                _ => {}
            }
            body.push(self.statement()?);
        }
    }

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        let line = self.line();
        let kind = match self.current().kind {
            TokenKind::Word(Word::Do) => {
                self.advance();
                StmtKind::Do(self.block(BlockEnd::End)?)
            }
            TokenKind::Word(Word::Break) => {
                self.advance();
                StmtKind::Break
            }
            TokenKind::Word(Word::If) => {
                self.advance();
                StmtKind::If(self.if_arm(line)?)
            }
            TokenKind::Word(Word::Return) => {
                self.advance();
                if self.return_is_empty() {
                    StmtKind::Return(Vec::new())
                } else {
                    StmtKind::Return(self.expression_list()?)
                }
            }
            TokenKind::Word(Word::While) => {
                self.advance();
                let condition = self.expression(1)?;
                self.expect_word(Word::Do)?;
                let body = self.block(BlockEnd::End)?;
                StmtKind::While { condition, body }
            }
            TokenKind::Word(Word::Repeat) => {
                self.advance();
                let body = self.block(BlockEnd::Until)?;
                let condition = self.expression(1)?;
                StmtKind::Repeat { body, condition }
            }
            TokenKind::Word(Word::For) => {
                self.advance();
                self.for_loop()?
            }
            TokenKind::Word(Word::Function) => {
                self.advance();
                let path = self.function_path()?;
                let func = self.function_body()?;
                StmtKind::Function { path, func }
            }
            TokenKind::Word(Word::Local) => {
                self.advance();
                self.local()?
            }
            TokenKind::Word(Word::Import) => {
                self.advance();
                self.import()?
            }
            TokenKind::Word(word) => {
                return Err(self.error(format!("Unexpected '{}' in statement", word.as_str())));
            }
            TokenKind::Operator(Operator::At) => {
                self.advance();
                let expr = self.suffixed(false)?;
                let args = if self.check_op(Operator::LParen) {
                    self.parenthesized_arguments()?
                } else {
                    Vec::new()
                };
                StmtKind::Intrinsic { expr, args }
            }
            _ => self.expression_statement()?,
        };
        Ok(Stmt::new(kind, line))
    }

    /// A bare `return` is followed by the end of input, `;`, or a keyword
    /// that cannot start an expression.
    fn return_is_empty(&self) -> bool {
        match self.current().kind {
            TokenKind::Invalid | TokenKind::Operator(Operator::Semicolon) => true,
            TokenKind::Word(word) => {
                !matches!(word, Word::True | Word::False | Word::Nil | Word::Function)
            }
            _ => false,
        }
    }

    fn if_arm(&mut self, line: usize) -> Result<IfArm, ParseError> {
        let condition = self.expression(1)?;
        self.expect_word(Word::Then)?;
        let body = self.block(BlockEnd::IfArm)?;
        let else_line = self.line();
        let otherwise = if self.eat_word(Word::Elseif) {
            Some(Box::new(ElseArm::ElseIf(self.if_arm(else_line)?)))
        } else if self.eat_word(Word::Else) {
            let body = self.block(BlockEnd::End)?;
            Some(Box::new(ElseArm::Else {
                body,
                line: else_line,
            }))
        } else {
            self.expect_word(Word::End)?;
            None
        };
        Ok(IfArm {
            condition,
            body,
            line,
            otherwise,
        })
    }

    fn for_loop(&mut self) -> Result<StmtKind, ParseError> {
        let first = self.expect_name()?;
        if self.eat_op(Operator::Assign) {
            let start = self.expression(1)?;
            self.expect_op(Operator::Comma)?;
            let limit = self.expression(1)?;
            let step = if self.eat_op(Operator::Comma) {
                Some(self.expression(1)?)
            } else {
                None
            };
            self.expect_word(Word::Do)?;
            let body = self.block(BlockEnd::End)?;
            return Ok(StmtKind::ForNumeric {
                var: first,
                start,
                limit,
                step,
                body,
            });
        }

        let mut names = vec![first];
        while self.eat_op(Operator::Comma) {
            names.push(self.expect_name()?);
        }
        self.expect_word(Word::In)?;
        let iterators = self.expression_list()?;
        self.expect_word(Word::Do)?;
        let body = self.block(BlockEnd::End)?;
        Ok(StmtKind::ForGeneric {
            names,
            iterators,
            body,
        })
    }

    fn function_path(&mut self) -> Result<FunctionPath, ParseError> {
        let mut segments = vec![self.expect_name()?];
        let mut method = false;
        loop {
            if self.eat_op(Operator::Dot) {
                segments.push(self.expect_name()?);
            } else if self.eat_op(Operator::Colon) {
                segments.push(self.expect_name()?);
                method = true;
                break;
            } else {
                break;
            }
        }
        Ok(FunctionPath { segments, method })
    }

    fn local(&mut self) -> Result<StmtKind, ParseError> {
        if self.eat_word(Word::Function) {
            let name = self.expect_name()?;
            let func = self.function_body()?;
            return Ok(StmtKind::LocalFunction { name, func });
        }
        let names = self.name_list()?;
        let values = if self.eat_op(Operator::Assign) {
            self.expression_list()?
        } else {
            Vec::new()
        };
        Ok(StmtKind::Local { names, values })
    }

    /// `import name from src` or `import { a, b } from src`; `from` is only
    /// a keyword here.
    fn import(&mut self) -> Result<StmtKind, ParseError> {
        let binding = if self.eat_op(Operator::LBrace) {
            let names = self.name_list()?;
            self.expect_op(Operator::RBrace)?;
            ImportBinding::Named(names)
        } else {
            ImportBinding::Default(self.expect_name()?)
        };
        if !self.current().is_name("from") {
            return Err(self.unexpected("'from'"));
        }
        self.advance();
        let source = self.expression(1)?;
        Ok(StmtKind::Import { binding, source })
    }

    fn expression_statement(&mut self) -> Result<StmtKind, ParseError> {
        let first = self.suffixed(true)?;

        if self.check_op(Operator::Assign) || self.check_op(Operator::Comma) {
            let mut targets = vec![first];
            while self.eat_op(Operator::Comma) {
                targets.push(self.suffixed(true)?);
            }
            for target in &targets {
                self.check_assignable(*target)?;
            }
            self.expect_op(Operator::Assign)?;
            let values = self.expression_list()?;
            return Ok(StmtKind::Assign { targets, values });
        }

        if let TokenKind::Operator(op) = self.current().kind {
            if let Some(op) = compound_op(op) {
                self.check_assignable(first)?;
                self.advance();
                let value = self.expression(1)?;
                return Ok(StmtKind::CompoundAssign {
                    target: first,
                    op,
                    value,
                });
            }
        }

        match self.arena.get(first) {
            Expr::Arith(Arith::Call { .. }) => Ok(StmtKind::Call(first)),
            _ => Err(self.error("Syntax error: expression is not a statement")),
        }
    }

    fn check_assignable(&self, target: ExprId) -> Result<(), ParseError> {
        match self.arena.get(target) {
            Expr::Atom(Atom::Name(_))
            | Expr::Arith(Arith::Member { .. } | Arith::Index { .. }) => Ok(()),
            _ => Err(self.error("Syntax error: cannot assign to this expression")),
        }
    }
}
