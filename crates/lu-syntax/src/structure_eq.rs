//! Structural equality for syntax trees.
//!
//! `structure_eq` compares trees that may live in different arenas, ignoring
//! "surface hints": details that change when a chunk is rendered and parsed
//! again without changing what it means.
//!
//! # Hint Fields (ignored during comparison)
//!
//! - `Stmt::line` - rendering moves statements between lines
//! - `StmtKind::Ignore` placeholders - deletions are not rendered
//! - `ExprId` values - only the nodes they point at are compared
//! - Interleaving of keyed and positional table entries - renderers emit
//!   the keyed part first
//!
//! # Core Fields (must match exactly)
//!
//! - All names, literal values, operators
//! - Control flow structure
//! - Expression trees

use crate::ast::*;

/// Trait for structural equality comparison.
pub trait StructureEq {
    /// Compare two values for structural equality.
    fn structure_eq(&self, other: &Self) -> bool;
}

impl StructureEq for Chunk {
    fn structure_eq(&self, other: &Self) -> bool {
        Comparison {
            left: &self.arena,
            right: &other.arena,
        }
        .blocks(&self.body, &other.body)
    }
}

struct Comparison<'a> {
    left: &'a Arena,
    right: &'a Arena,
}

impl Comparison<'_> {
    fn blocks(&self, a: &[Stmt], b: &[Stmt]) -> bool {
        let a: Vec<&Stmt> = a.iter().filter(|s| !s.is_ignored()).collect();
        let b: Vec<&Stmt> = b.iter().filter(|s| !s.is_ignored()).collect();
        a.len() == b.len() && a.iter().zip(&b).all(|(a, b)| self.stmt(&a.kind, &b.kind))
    }

    fn exprs(&self, a: &[ExprId], b: &[ExprId]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(a, b)| self.expr(*a, *b))
    }

    fn func(&self, a: &Function, b: &Function) -> bool {
        a.params == b.params && a.variadic == b.variadic && self.blocks(&a.body, &b.body)
    }

    fn if_arm(&self, a: &IfArm, b: &IfArm) -> bool {
        self.expr(a.condition, b.condition)
            && self.blocks(&a.body, &b.body)
            && match (a.otherwise.as_deref(), b.otherwise.as_deref()) {
                (None, None) => true,
                (Some(ElseArm::ElseIf(a)), Some(ElseArm::ElseIf(b))) => self.if_arm(a, b),
                (Some(ElseArm::Else { body: a, .. }), Some(ElseArm::Else { body: b, .. })) => {
                    self.blocks(a, b)
                }
                _ => false,
            }
    }

    fn stmt(&self, a: &StmtKind, b: &StmtKind) -> bool {
        use StmtKind as S;
        match (a, b) {
            (S::Return(a), S::Return(b)) => self.exprs(a, b),
            (
                S::LocalFunction { name: n1, func: f1 },
                S::LocalFunction { name: n2, func: f2 },
            ) => n1 == n2 && self.func(f1, f2),
            (S::Function { path: p1, func: f1 }, S::Function { path: p2, func: f2 }) => {
                p1 == p2 && self.func(f1, f2)
            }
            (
                S::Local {
                    names: n1,
                    values: v1,
                },
                S::Local {
                    names: n2,
                    values: v2,
                },
            ) => n1 == n2 && self.exprs(v1, v2),
            (
                S::CompoundAssign {
                    target: t1,
                    op: o1,
                    value: v1,
                },
                S::CompoundAssign {
                    target: t2,
                    op: o2,
                    value: v2,
                },
            ) => o1 == o2 && self.expr(*t1, *t2) && self.expr(*v1, *v2),
            (
                S::Assign {
                    targets: t1,
                    values: v1,
                },
                S::Assign {
                    targets: t2,
                    values: v2,
                },
            ) => self.exprs(t1, t2) && self.exprs(v1, v2),
            (S::Call(a), S::Call(b)) => self.expr(*a, *b),
            (S::Break, S::Break) => true,
            (S::Do(a), S::Do(b)) => self.blocks(a, b),
            (
                S::While {
                    condition: c1,
                    body: b1,
                },
                S::While {
                    condition: c2,
                    body: b2,
                },
            )
            | (
                S::Repeat {
                    condition: c1,
                    body: b1,
                },
                S::Repeat {
                    condition: c2,
                    body: b2,
                },
            ) => self.expr(*c1, *c2) && self.blocks(b1, b2),
            (S::If(a), S::If(b)) => self.if_arm(a, b),
            (
                S::ForNumeric {
                    var: n1,
                    start: s1,
                    limit: l1,
                    step: st1,
                    body: b1,
                },
                S::ForNumeric {
                    var: n2,
                    start: s2,
                    limit: l2,
                    step: st2,
                    body: b2,
                },
            ) => {
                n1 == n2
                    && self.expr(*s1, *s2)
                    && self.expr(*l1, *l2)
                    && match (st1, st2) {
                        (None, None) => true,
                        (Some(a), Some(b)) => self.expr(*a, *b),
                        _ => false,
                    }
                    && self.blocks(b1, b2)
            }
            (
                S::ForGeneric {
                    names: n1,
                    iterators: i1,
                    body: b1,
                },
                S::ForGeneric {
                    names: n2,
                    iterators: i2,
                    body: b2,
                },
            ) => n1 == n2 && self.exprs(i1, i2) && self.blocks(b1, b2),
            (
                S::Import {
                    binding: b1,
                    source: s1,
                },
                S::Import {
                    binding: b2,
                    source: s2,
                },
            ) => b1 == b2 && self.expr(*s1, *s2),
            (S::Intrinsic { expr: e1, args: a1 }, S::Intrinsic { expr: e2, args: a2 }) => {
                self.expr(*e1, *e2) && self.exprs(a1, a2)
            }
            _ => false,
        }
    }

    fn expr(&self, a: ExprId, b: ExprId) -> bool {
        match (self.left.get(a), self.right.get(b)) {
            (Expr::Atom(a), Expr::Atom(b)) => self.atom(a, b),
            (Expr::Arith(a), Expr::Arith(b)) => self.arith(a, b),
            _ => false,
        }
    }

    fn atom(&self, a: &Atom, b: &Atom) -> bool {
        match (a, b) {
            (Atom::Number(a), Atom::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Atom::String(a), Atom::String(b)) => a == b,
            (Atom::Boolean(a), Atom::Boolean(b)) => a == b,
            (Atom::Nil, Atom::Nil) | (Atom::Vararg, Atom::Vararg) => true,
            (Atom::Name(a), Atom::Name(b)) => a == b,
            (Atom::Table(a), Atom::Table(b)) => {
                let (keyed_a, positional_a) = split_entries(a);
                let (keyed_b, positional_b) = split_entries(b);
                self.exprs(&positional_a, &positional_b)
                    && keyed_a.len() == keyed_b.len()
                    && keyed_a
                        .iter()
                        .zip(&keyed_b)
                        .all(|((k1, v1), (k2, v2))| self.expr(*k1, *k2) && self.expr(*v1, *v2))
            }
            (Atom::Element(a), Atom::Element(b)) => {
                a.name == b.name
                    && a.properties.len() == b.properties.len()
                    && a
                        .properties
                        .iter()
                        .zip(&b.properties)
                        .all(|((n1, v1), (n2, v2))| n1 == n2 && self.expr(*v1, *v2))
                    && match (&a.children, &b.children) {
                        (None, None) => true,
                        (Some(a), Some(b)) => self.exprs(a, b),
                        _ => false,
                    }
            }
            (Atom::Func(a), Atom::Func(b)) => self.func(a, b),
            _ => false,
        }
    }

    fn arith(&self, a: &Arith, b: &Arith) -> bool {
        match (a, b) {
            (
                Arith::Binary {
                    op: o1,
                    left: l1,
                    right: r1,
                },
                Arith::Binary {
                    op: o2,
                    left: l2,
                    right: r2,
                },
            ) => o1 == o2 && self.expr(*l1, *l2) && self.expr(*r1, *r2),
            (
                Arith::Unary {
                    op: o1,
                    operand: e1,
                },
                Arith::Unary {
                    op: o2,
                    operand: e2,
                },
            ) => o1 == o2 && self.expr(*e1, *e2),
            (
                Arith::Member {
                    object: o1,
                    name: n1,
                },
                Arith::Member {
                    object: o2,
                    name: n2,
                },
            ) => n1 == n2 && self.expr(*o1, *o2),
            (Arith::Index { object: o1, key: k1 }, Arith::Index { object: o2, key: k2 }) => {
                self.expr(*o1, *o2) && self.expr(*k1, *k2)
            }
            (
                Arith::Call {
                    target: t1,
                    method: m1,
                    args: a1,
                },
                Arith::Call {
                    target: t2,
                    method: m2,
                    args: a2,
                },
            ) => m1 == m2 && self.expr(*t1, *t2) && self.exprs(a1, a2),
            (
                Arith::Assign {
                    op: o1,
                    target: t1,
                    value: v1,
                },
                Arith::Assign {
                    op: o2,
                    target: t2,
                    value: v2,
                },
            ) => o1 == o2 && self.expr(*t1, *t2) && self.expr(*v1, *v2),
            _ => false,
        }
    }
}

/// Keyed entries and positional values, each in source order.
fn split_entries(table: &TableConstructor) -> (Vec<(ExprId, ExprId)>, Vec<ExprId>) {
    let mut keyed = Vec::new();
    let mut positional = Vec::new();
    for (key, value) in &table.entries {
        match key {
            TableKey::Expr(key) => keyed.push((*key, *value)),
            TableKey::Positional(_) => positional.push(*value),
        }
    }
    (keyed, positional)
}
