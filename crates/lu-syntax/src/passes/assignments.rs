//! Assignment expressions become immediately-invoked closures.
//!
//! `print((a = 1))` turns into
//! `print((function() a = 1 return a end)())`. A compound form such as
//! `(a += 1)` becomes a compound-assignment statement inside the closure.

use crate::ast::*;
use crate::transform::{ExprCursor, Rewrite, TransformError, traverse};

pub fn hoist_assignment_expressions(chunk: &mut Chunk) -> Result<(), TransformError> {
    traverse(chunk, &mut AssignmentHoisting)
}

struct AssignmentHoisting;

impl Rewrite for AssignmentHoisting {
    fn expression(&mut self, cursor: &mut ExprCursor<'_>) -> Result<(), TransformError> {
        let line = cursor.owner().line;
        // Post-order: inner assignments are rewritten before the ones
        // holding them.
        for id in cursor.descendants() {
            let Expr::Arith(Arith::Assign { op, target, value }) = *cursor.arena().get(id) else {
                continue;
            };
            let assignment = match op {
                AssignOp::Set => Stmt::assign(vec![target], vec![value], line),
                AssignOp::Compound(op) => {
                    Stmt::new(StmtKind::CompoundAssign { target, op, value }, line)
                }
            };
            let closure = cursor
                .arena_mut()
                .closure(Vec::new(), vec![assignment, Stmt::ret(vec![target], line)]);
            cursor.replace(id, Expr::call(closure, Vec::new()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    #[test]
    fn assignment_value_becomes_closure_call() {
        let mut chunk = parse(tokenize("print((a = 1))").unwrap()).unwrap();
        hoist_assignment_expressions(&mut chunk).unwrap();

        let StmtKind::Call(call) = chunk.body[0].kind else {
            panic!("expected call");
        };
        let Expr::Arith(Arith::Call { args, .. }) = chunk.arena.get(call) else {
            panic!("expected call");
        };
        let Expr::Arith(Arith::Call { target, args: inner_args, .. }) = chunk.arena.get(args[0]) else {
            panic!("expected closure call");
        };
        assert!(inner_args.is_empty());
        let Expr::Atom(Atom::Func(func)) = chunk.arena.get(*target) else {
            panic!("expected closure");
        };
        assert!(matches!(func.body[0].kind, StmtKind::Assign { .. }));
        assert!(matches!(func.body[1].kind, StmtKind::Return(ref values) if values.len() == 1));
    }

    #[test]
    fn compound_form_keeps_operator() {
        let mut chunk = parse(tokenize("f((n ..= 'x'))").unwrap()).unwrap();
        hoist_assignment_expressions(&mut chunk).unwrap();

        let StmtKind::Call(call) = chunk.body[0].kind else {
            panic!("expected call");
        };
        let closure = chunk
            .arena
            .descendants(call)
            .into_iter()
            .find_map(|id| match chunk.arena.get(id) {
                Expr::Atom(Atom::Func(func)) => Some(func),
                _ => None,
            })
            .expect("closure");
        assert!(matches!(
            closure.body[0].kind,
            StmtKind::CompoundAssign {
                op: BinaryOp::Concat,
                ..
            }
        ));
    }
}
