//! Syntax tree for the lu dialect.
//!
//! Expressions live in an [`Arena`] and refer to each other by [`ExprId`].
//! Rewrites replace arena slots in place, so every parent that holds an id
//! observes the new node without a tree walk. Statements own their nested
//! blocks directly.

use bstr::BString;
use serde::Serialize;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ExprId(u32);

impl ExprId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    fn shifted(self, offset: u32) -> Self {
        ExprId(self.0 + offset)
    }
}

/// Owns every expression node of a chunk.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Arena {
    nodes: Vec<Expr>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, expr: Expr) -> ExprId {
        let id = ExprId(self.nodes.len() as u32);
        self.nodes.push(expr);
        id
    }

    pub fn get(&self, id: ExprId) -> &Expr {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: ExprId) -> &mut Expr {
        &mut self.nodes[id.index()]
    }

    /// Swap the node stored at `id`, returning the previous one.
    pub fn replace(&mut self, id: ExprId, expr: Expr) -> Expr {
        std::mem::replace(&mut self.nodes[id.index()], expr)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node reachable from `root`, children before parents.
    ///
    /// Function bodies are statements, not expressions, and are not entered.
    pub fn descendants(&self, root: ExprId) -> Vec<ExprId> {
        let mut out = Vec::new();
        self.collect_post_order(root, &mut out);
        out
    }

    fn collect_post_order(&self, id: ExprId, out: &mut Vec<ExprId>) {
        for child in self.get(id).children() {
            self.collect_post_order(child, out);
        }
        out.push(id);
    }

    /// Atom nodes reachable from `root`, children before parents.
    pub fn leaves(&self, root: ExprId) -> Vec<ExprId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| matches!(self.get(*id), Expr::Atom(_)))
            .collect()
    }

    /// Move another chunk's nodes into this arena and return its body with
    /// ids rewritten to point at the moved nodes.
    pub fn graft(&mut self, chunk: Chunk) -> Block {
        let offset = self.nodes.len() as u32;
        let Chunk { arena, mut body } = chunk;
        for mut node in arena.nodes {
            node.for_each_id_mut(&mut |id| *id = id.shifted(offset));
            self.nodes.push(node);
        }
        for stmt in &mut body {
            stmt.kind.for_each_id_mut(&mut |id| *id = id.shifted(offset));
        }
        body
    }
}

impl Index<ExprId> for Arena {
    type Output = Expr;

    fn index(&self, id: ExprId) -> &Expr {
        self.get(id)
    }
}

impl IndexMut<ExprId> for Arena {
    fn index_mut(&mut self, id: ExprId) -> &mut Expr {
        self.get_mut(id)
    }
}

/// A parsed source file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Chunk {
    pub arena: Arena,
    pub body: Block,
}

pub type Block = Vec<Stmt>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Atom(Atom),
    Arith(Arith),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Atom {
    Number(f64),
    String(BString),
    Boolean(bool),
    Nil,
    Name(String),
    Vararg,
    Table(TableConstructor),
    Element(Element),
    Func(Function),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Arith {
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    /// `object.name`
    Member { object: ExprId, name: String },
    /// `object[key]`
    Index { object: ExprId, key: ExprId },
    Call {
        target: ExprId,
        /// Set for `target:method(args)`.
        method: Option<String>,
        args: Vec<ExprId>,
    },
    /// An assignment used as a value, `(target = value)`.
    Assign {
        op: AssignOp,
        target: ExprId,
        value: ExprId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Concat,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "^",
            BinaryOp::Concat => "..",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "~=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOp {
    Not,
    Len,
    Neg,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "not",
            UnaryOp::Len => "#",
            UnaryOp::Neg => "-",
        }
    }
}

/// `=` or one of the compound forms such as `+=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssignOp {
    Set,
    Compound(BinaryOp),
}

impl AssignOp {
    pub fn as_str(self) -> String {
        match self {
            AssignOp::Set => "=".to_string(),
            AssignOp::Compound(op) => format!("{}=", op.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TableKey {
    /// 1-based array position.
    Positional(usize),
    Expr(ExprId),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableConstructor {
    pub entries: Vec<(TableKey, ExprId)>,
}

impl TableConstructor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_positional(&mut self, value: ExprId) {
        let position = self.positional_len() + 1;
        self.entries.push((TableKey::Positional(position), value));
    }

    pub fn push_keyed(&mut self, key: ExprId, value: ExprId) {
        self.entries.push((TableKey::Expr(key), value));
    }

    pub fn positional_len(&self) -> usize {
        self.entries
            .iter()
            .filter(|(key, _)| matches!(key, TableKey::Positional(_)))
            .count()
    }
}

/// `<Name prop="v" other={expr}>{child}<Nested/></Name>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub name: String,
    pub properties: Vec<(String, ExprId)>,
    /// `None` for a self-closing element.
    pub children: Option<Vec<ExprId>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Function {
    pub params: Vec<String>,
    pub variadic: bool,
    pub body: Block,
}

impl Function {
    /// Parameter list as written, including a trailing `...`.
    pub fn signature(&self) -> String {
        let mut params = self.params.clone();
        if self.variadic {
            params.push("...".to_string());
        }
        params.join(", ")
    }
}

impl Expr {
    /// Direct child expressions, in source order.
    pub fn children(&self) -> Vec<ExprId> {
        match self {
            Expr::Atom(Atom::Table(table)) => table
                .entries
                .iter()
                .flat_map(|(key, value)| match key {
                    TableKey::Expr(key) => vec![*key, *value],
                    TableKey::Positional(_) => vec![*value],
                })
                .collect(),
            Expr::Atom(Atom::Element(element)) => element
                .properties
                .iter()
                .map(|(_, value)| *value)
                .chain(element.children.iter().flatten().copied())
                .collect(),
            Expr::Atom(_) => Vec::new(),
            Expr::Arith(arith) => match arith {
                Arith::Binary { left, right, .. } => vec![*left, *right],
                Arith::Unary { operand, .. } => vec![*operand],
                Arith::Member { object, .. } => vec![*object],
                Arith::Index { object, key } => vec![*object, *key],
                Arith::Call { target, args, .. } => {
                    std::iter::once(*target).chain(args.iter().copied()).collect()
                }
                Arith::Assign { target, value, .. } => vec![*target, *value],
            },
        }
    }

    /// Visit every id stored in this node, including ids inside function
    /// bodies.
    fn for_each_id_mut(&mut self, f: &mut impl FnMut(&mut ExprId)) {
        match self {
            Expr::Atom(Atom::Table(table)) => {
                for (key, value) in &mut table.entries {
                    if let TableKey::Expr(key) = key {
                        f(key);
                    }
                    f(value);
                }
            }
            Expr::Atom(Atom::Element(element)) => {
                for (_, value) in &mut element.properties {
                    f(value);
                }
                for child in element.children.iter_mut().flatten() {
                    f(child);
                }
            }
            Expr::Atom(Atom::Func(func)) => {
                for stmt in &mut func.body {
                    stmt.kind.for_each_id_mut(f);
                }
            }
            Expr::Atom(_) => {}
            Expr::Arith(arith) => match arith {
                Arith::Binary { left, right, .. } => {
                    f(left);
                    f(right);
                }
                Arith::Unary { operand, .. } => f(operand),
                Arith::Member { object, .. } => f(object),
                Arith::Index { object, key } => {
                    f(object);
                    f(key);
                }
                Arith::Call { target, args, .. } => {
                    f(target);
                    args.iter_mut().for_each(&mut *f);
                }
                Arith::Assign { target, value, .. } => {
                    f(target);
                    f(value);
                }
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub line: usize,
}

/// `a.b.c` or `a.b:c` in `function a.b:c() end`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionPath {
    pub segments: Vec<String>,
    /// The last segment was introduced with `:`.
    pub method: bool,
}

impl FunctionPath {
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }
}

impl std::fmt::Display for FunctionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.segments.split_last() {
            Some((last, init)) if self.method && !init.is_empty() => {
                write!(f, "{}:{}", init.join("."), last)
            }
            _ => f.write_str(&self.dotted()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ImportBinding {
    /// `import name from src`
    Default(String),
    /// `import { a, b } from src`
    Named(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfArm {
    pub condition: ExprId,
    pub body: Block,
    pub line: usize,
    pub otherwise: Option<Box<ElseArm>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ElseArm {
    ElseIf(IfArm),
    Else { body: Block, line: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StmtKind {
    Return(Vec<ExprId>),
    LocalFunction {
        name: String,
        func: Function,
    },
    Function {
        path: FunctionPath,
        func: Function,
    },
    Local {
        names: Vec<String>,
        values: Vec<ExprId>,
    },
    CompoundAssign {
        target: ExprId,
        op: BinaryOp,
        value: ExprId,
    },
    Assign {
        targets: Vec<ExprId>,
        values: Vec<ExprId>,
    },
    Call(ExprId),
    Break,
    Do(Block),
    While {
        condition: ExprId,
        body: Block,
    },
    Repeat {
        body: Block,
        condition: ExprId,
    },
    If(IfArm),
    ForNumeric {
        var: String,
        start: ExprId,
        limit: ExprId,
        step: Option<ExprId>,
        body: Block,
    },
    ForGeneric {
        names: Vec<String>,
        iterators: Vec<ExprId>,
        body: Block,
    },
    Import {
        binding: ImportBinding,
        source: ExprId,
    },
    /// `@expr(args)` attached to the following declaration.
    Intrinsic {
        expr: ExprId,
        args: Vec<ExprId>,
    },
    /// Placeholder left behind by a deletion; never rendered.
    Ignore,
}

impl StmtKind {
    /// Expressions owned directly by this statement, excluding nested blocks.
    pub fn roots(&self) -> Vec<ExprId> {
        match self {
            StmtKind::Return(values) => values.clone(),
            StmtKind::Local { values, .. } => values.clone(),
            StmtKind::CompoundAssign { target, value, .. } => vec![*target, *value],
            StmtKind::Assign { targets, values } => {
                targets.iter().chain(values.iter()).copied().collect()
            }
            StmtKind::Call(call) => vec![*call],
            StmtKind::While { condition, .. } | StmtKind::Repeat { condition, .. } => {
                vec![*condition]
            }
            StmtKind::If(arm) => {
                let mut roots = Vec::new();
                let mut next = Some(arm);
                while let Some(arm) = next {
                    roots.push(arm.condition);
                    next = match arm.otherwise.as_deref() {
                        Some(ElseArm::ElseIf(arm)) => Some(arm),
                        _ => None,
                    };
                }
                roots
            }
            StmtKind::ForNumeric {
                start, limit, step, ..
            } => std::iter::once(*start)
                .chain(std::iter::once(*limit))
                .chain(*step)
                .collect(),
            StmtKind::ForGeneric { iterators, .. } => iterators.clone(),
            StmtKind::Import { source, .. } => vec![*source],
            StmtKind::Intrinsic { expr, args } => {
                std::iter::once(*expr).chain(args.iter().copied()).collect()
            }
            StmtKind::LocalFunction { .. }
            | StmtKind::Function { .. }
            | StmtKind::Break
            | StmtKind::Do(_)
            | StmtKind::Ignore => Vec::new(),
        }
    }

    /// Nested statement lists, in source order.
    pub fn blocks_mut(&mut self) -> Vec<&mut Block> {
        match self {
            StmtKind::LocalFunction { func, .. } | StmtKind::Function { func, .. } => {
                vec![&mut func.body]
            }
            StmtKind::Do(body)
            | StmtKind::While { body, .. }
            | StmtKind::Repeat { body, .. }
            | StmtKind::ForNumeric { body, .. }
            | StmtKind::ForGeneric { body, .. } => vec![body],
            StmtKind::If(arm) => {
                let mut blocks = Vec::new();
                let mut next = Some(arm);
                while let Some(arm) = next {
                    blocks.push(&mut arm.body);
                    next = match arm.otherwise.as_deref_mut() {
                        Some(ElseArm::ElseIf(arm)) => Some(arm),
                        Some(ElseArm::Else { body, .. }) => {
                            blocks.push(body);
                            None
                        }
                        None => None,
                    };
                }
                blocks
            }
            _ => Vec::new(),
        }
    }

    /// Short description used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            StmtKind::Return(_) => "return statement",
            StmtKind::LocalFunction { .. } => "local function",
            StmtKind::Function { .. } => "function definition",
            StmtKind::Local { .. } => "local declaration",
            StmtKind::CompoundAssign { .. } => "compound assignment",
            StmtKind::Assign { .. } => "assignment",
            StmtKind::Call(_) => "call",
            StmtKind::Break => "break",
            StmtKind::Do(_) => "do block",
            StmtKind::While { .. } => "while loop",
            StmtKind::Repeat { .. } => "repeat loop",
            StmtKind::If(_) => "if statement",
            StmtKind::ForNumeric { .. } | StmtKind::ForGeneric { .. } => "for loop",
            StmtKind::Import { .. } => "import",
            StmtKind::Intrinsic { .. } => "intrinsic",
            StmtKind::Ignore => "nothing",
        }
    }

    fn for_each_id_mut(&mut self, f: &mut impl FnMut(&mut ExprId)) {
        match self {
            StmtKind::Return(values) | StmtKind::Local { values, .. } => {
                values.iter_mut().for_each(&mut *f)
            }
            StmtKind::CompoundAssign { target, value, .. } => {
                f(target);
                f(value);
            }
            StmtKind::Assign { targets, values } => {
                targets.iter_mut().chain(values.iter_mut()).for_each(&mut *f)
            }
            StmtKind::Call(call) => f(call),
            StmtKind::While { condition, .. } | StmtKind::Repeat { condition, .. } => f(condition),
            StmtKind::If(arm) => {
                let mut next = Some(arm);
                while let Some(arm) = next {
                    f(&mut arm.condition);
                    next = match arm.otherwise.as_deref_mut() {
                        Some(ElseArm::ElseIf(arm)) => Some(arm),
                        _ => None,
                    };
                }
            }
            StmtKind::ForNumeric {
                start, limit, step, ..
            } => {
                f(start);
                f(limit);
                if let Some(step) = step {
                    f(step);
                }
            }
            StmtKind::ForGeneric { iterators, .. } => iterators.iter_mut().for_each(&mut *f),
            StmtKind::Import { source, .. } => f(source),
            StmtKind::Intrinsic { expr, args } => {
                f(expr);
                args.iter_mut().for_each(&mut *f);
            }
            StmtKind::LocalFunction { .. }
            | StmtKind::Function { .. }
            | StmtKind::Break
            | StmtKind::Do(_)
            | StmtKind::Ignore => {}
        }
        for block in self.blocks_mut() {
            for stmt in block {
                stmt.kind.for_each_id_mut(f);
            }
        }
    }
}

impl Stmt {
    pub fn new(kind: StmtKind, line: usize) -> Self {
        Self { kind, line }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self.kind, StmtKind::Ignore)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descendants_are_post_order() {
        let mut arena = Arena::new();
        let a = arena.alloc(Expr::Atom(Atom::Name("a".into())));
        let b = arena.alloc(Expr::Atom(Atom::Number(1.0)));
        let sum = arena.alloc(Expr::Arith(Arith::Binary {
            op: BinaryOp::Add,
            left: a,
            right: b,
        }));
        assert_eq!(arena.descendants(sum), vec![a, b, sum]);
        assert_eq!(arena.leaves(sum), vec![a, b]);
    }

    #[test]
    fn positional_keys_count_up() {
        let mut arena = Arena::new();
        let one = arena.alloc(Expr::Atom(Atom::Number(1.0)));
        let key = arena.alloc(Expr::Atom(Atom::String("k".into())));
        let mut table = TableConstructor::new();
        table.push_positional(one);
        table.push_keyed(key, one);
        table.push_positional(one);
        let keys: Vec<_> = table.entries.iter().map(|(key, _)| *key).collect();
        assert_eq!(
            keys,
            vec![
                TableKey::Positional(1),
                TableKey::Expr(key),
                TableKey::Positional(2)
            ]
        );
    }

    #[test]
    fn graft_shifts_ids() {
        let mut host = Arena::new();
        host.alloc(Expr::Atom(Atom::Nil));

        let mut arena = Arena::new();
        let f = arena.alloc(Expr::Atom(Atom::Name("f".into())));
        let call = arena.alloc(Expr::Arith(Arith::Call {
            target: f,
            method: None,
            args: vec![],
        }));
        let chunk = Chunk {
            arena,
            body: vec![Stmt::new(StmtKind::Call(call), 1)],
        };

        let body = host.graft(chunk);
        let StmtKind::Call(moved) = body[0].kind else {
            panic!("expected call");
        };
        assert_eq!(moved.index(), 2);
        match host.get(moved) {
            Expr::Arith(Arith::Call { target, .. }) => {
                assert_eq!(host.get(*target), &Expr::Atom(Atom::Name("f".into())));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn method_path_display() {
        let path = FunctionPath {
            segments: vec!["a".into(), "b".into(), "c".into()],
            method: true,
        };
        assert_eq!(path.to_string(), "a.b:c");
        assert_eq!(path.dotted(), "a.b.c");
    }
}
