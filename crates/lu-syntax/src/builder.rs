//! Shorthand constructors used by the passes and the bundler.

use crate::ast::*;
use bstr::BString;

impl Arena {
    pub fn name(&mut self, name: impl Into<String>) -> ExprId {
        self.alloc(Expr::Atom(Atom::Name(name.into())))
    }

    pub fn string(&mut self, value: impl Into<BString>) -> ExprId {
        self.alloc(Expr::Atom(Atom::String(value.into())))
    }

    pub fn number(&mut self, value: f64) -> ExprId {
        self.alloc(Expr::Atom(Atom::Number(value)))
    }

    pub fn boolean(&mut self, value: bool) -> ExprId {
        self.alloc(Expr::Atom(Atom::Boolean(value)))
    }

    pub fn nil(&mut self) -> ExprId {
        self.alloc(Expr::Atom(Atom::Nil))
    }

    pub fn table(&mut self, table: TableConstructor) -> ExprId {
        self.alloc(Expr::Atom(Atom::Table(table)))
    }

    pub fn closure(&mut self, params: Vec<String>, body: Block) -> ExprId {
        self.alloc(Expr::Atom(Atom::Func(Function {
            params,
            variadic: false,
            body,
        })))
    }

    /// `function(...) body end`
    pub fn vararg_closure(&mut self, body: Block) -> ExprId {
        self.alloc(Expr::Atom(Atom::Func(Function {
            params: Vec::new(),
            variadic: true,
            body,
        })))
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.alloc(Expr::Arith(Arith::Binary { op, left, right }))
    }

    pub fn member(&mut self, object: ExprId, name: impl Into<String>) -> ExprId {
        self.alloc(Expr::Arith(Arith::Member {
            object,
            name: name.into(),
        }))
    }

    pub fn subscript(&mut self, object: ExprId, key: ExprId) -> ExprId {
        self.alloc(Expr::Arith(Arith::Index { object, key }))
    }

    pub fn call(&mut self, target: ExprId, args: Vec<ExprId>) -> ExprId {
        self.alloc(Expr::call(target, args))
    }

    /// `a.b.c` from its segments.
    pub fn path(&mut self, segments: &[String]) -> Option<ExprId> {
        let (first, rest) = segments.split_first()?;
        let root = self.name(first.as_str());
        Some(
            rest.iter()
                .fold(root, |object, segment| self.member(object, segment.as_str())),
        )
    }
}

impl Expr {
    pub fn call(target: ExprId, args: Vec<ExprId>) -> Self {
        Expr::Arith(Arith::Call {
            target,
            method: None,
            args,
        })
    }
}

impl TableConstructor {
    /// Add a `name = value` entry.
    pub fn push_named(&mut self, arena: &mut Arena, name: &str, value: ExprId) {
        let key = arena.string(name);
        self.push_keyed(key, value);
    }
}

impl Stmt {
    pub fn local(names: Vec<String>, values: Vec<ExprId>, line: usize) -> Self {
        Stmt::new(StmtKind::Local { names, values }, line)
    }

    pub fn assign(targets: Vec<ExprId>, values: Vec<ExprId>, line: usize) -> Self {
        Stmt::new(StmtKind::Assign { targets, values }, line)
    }

    pub fn call(call: ExprId, line: usize) -> Self {
        Stmt::new(StmtKind::Call(call), line)
    }

    pub fn ret(values: Vec<ExprId>, line: usize) -> Self {
        Stmt::new(StmtKind::Return(values), line)
    }

    pub fn ignore(line: usize) -> Self {
        Stmt::new(StmtKind::Ignore, line)
    }
}
