//! `@intrinsic(args)` statements decorate the declaration that follows.
//!
//! ```text
//! @watch(1)                  local x, y = 1, 2
//! local x, y = 1, 2     =>   watch(1, {name = "x"; get = ...; set = ...}, {name = "y"; ...})
//!
//! @memo                      M.f = memo("M.f(self, a)", function(self, a) ... end)
//! function M:f(a) end   =>
//!
//! @memo                      local f
//! local function f(a) end => f = memo("f(a)", function(a) ... end)
//! ```
//!
//! Any other following statement is an error.

use crate::ast::*;
use crate::transform::{Rewrite, StmtCursor, TransformError, traverse};

pub fn lower_intrinsics(chunk: &mut Chunk) -> Result<(), TransformError> {
    traverse(chunk, &mut IntrinsicLowering)
}

struct IntrinsicLowering;

impl Rewrite for IntrinsicLowering {
    fn statement(&mut self, cursor: &mut StmtCursor<'_>) -> Result<(), TransformError> {
        let StmtKind::Intrinsic { expr, args } = &cursor.statement().kind else {
            return Ok(());
        };
        let (expr, args) = (*expr, args.clone());
        let line = cursor.line();
        let Some(mut next) = cursor.next() else {
            return Err(TransformError::DanglingIntrinsic { line });
        };

        match &next.statement().kind {
            StmtKind::Local { names, .. } => {
                let names = names.clone();
                let decl_line = next.line();
                let arena = next.arena_mut();
                let mut call_args = args;
                call_args.extend(names.iter().map(|name| descriptor(arena, name, decl_line)));
                let call = arena.call(expr, call_args);
                next.insert_after(Stmt::call(call, decl_line));
                cursor.remove();
            }
            StmtKind::Function { .. } => {
                let decl_line = next.line();
                let StmtKind::Function { path, mut func } = next.take().kind else {
                    return Ok(());
                };
                if path.method {
                    func.params.insert(0, "self".to_string());
                }
                let signature = format!("{}({})", path.dotted(), func.signature());
                let arena = next.arena_mut();
                let Some(target) = arena.path(&path.segments) else {
                    return Ok(());
                };
                let call = decorate(arena, expr, args, signature, func);
                next.replace(Stmt::assign(vec![target], vec![call], decl_line));
                cursor.remove();
            }
            StmtKind::LocalFunction { .. } => {
                let decl_line = next.line();
                let StmtKind::LocalFunction { name, func } = next.take().kind else {
                    return Ok(());
                };
                let signature = format!("{name}({})", func.signature());
                let arena = next.arena_mut();
                let target = arena.name(name.as_str());
                let call = decorate(arena, expr, args, signature, func);
                next.replace(Stmt::assign(vec![target], vec![call], decl_line));
                cursor.replace(Stmt::local(vec![name], Vec::new(), line));
            }
            other => {
                return Err(TransformError::IntrinsicTarget {
                    line,
                    found: other.describe(),
                });
            }
        }
        Ok(())
    }
}

/// `intrinsic(args..., "signature", function ... end)`
fn decorate(
    arena: &mut Arena,
    intrinsic: ExprId,
    mut args: Vec<ExprId>,
    signature: String,
    func: Function,
) -> ExprId {
    args.push(arena.string(signature));
    args.push(arena.alloc(Expr::Atom(Atom::Func(func))));
    arena.call(intrinsic, args)
}

/// `{name = "x"; get = function() return x end; set = function(v) x = v end}`
fn descriptor(arena: &mut Arena, name: &str, line: usize) -> ExprId {
    let read = arena.name(name);
    let getter = arena.closure(Vec::new(), vec![Stmt::ret(vec![read], line)]);

    let write = arena.name(name);
    let incoming = arena.name("v");
    let setter = arena.closure(
        vec!["v".to_string()],
        vec![Stmt::assign(vec![write], vec![incoming], line)],
    );

    let label = arena.string(name);
    let mut table = TableConstructor::new();
    table.push_named(arena, "name", label);
    table.push_named(arena, "get", getter);
    table.push_named(arena, "set", setter);
    arena.table(table)
}
