//! `a += b` becomes `a = a + b` for every compound operator.
//!
//! The target node is shared between both sides, so an indexed target such
//! as `t[f()] += 1` evaluates its key twice, as plain Lua would.

use crate::ast::*;
use crate::transform::{Rewrite, StmtCursor, TransformError, traverse};

pub fn lower_compound_assignments(chunk: &mut Chunk) -> Result<(), TransformError> {
    traverse(chunk, &mut CompoundLowering)
}

struct CompoundLowering;

impl Rewrite for CompoundLowering {
    fn statement(&mut self, cursor: &mut StmtCursor<'_>) -> Result<(), TransformError> {
        let StmtKind::CompoundAssign { target, op, value } = cursor.statement().kind else {
            return Ok(());
        };
        let line = cursor.line();
        let sum = cursor.arena_mut().binary(op, target, value);
        cursor.replace(Stmt::assign(vec![target], vec![sum], line));
        Ok(())
    }
}
