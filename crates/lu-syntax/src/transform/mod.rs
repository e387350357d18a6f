//! Generic tree rewriter.
//!
//! [`traverse`] walks every statement list of a chunk, including the bodies
//! of function literals found inside expressions. For each statement it
//! first descends into nested blocks, then hands every root expression to
//! [`Rewrite::expression`], and finally hands the statement itself to
//! [`Rewrite::statement`]. Statements inserted through a [`StmtCursor`] are
//! not visited by the same traversal.

mod cursor;

pub use cursor::{ExprCursor, StmtCursor};

use crate::ast::*;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    #[error(
        "script:{line}: intrinsic must precede a local declaration or a function definition, found {found}"
    )]
    IntrinsicTarget { line: usize, found: &'static str },

    #[error("script:{line}: intrinsic is not followed by a statement")]
    DanglingIntrinsic { line: usize },
}

/// Callbacks invoked by [`traverse`]. Both default to doing nothing.
pub trait Rewrite {
    fn statement(&mut self, cursor: &mut StmtCursor<'_>) -> Result<(), TransformError> {
        let _ = cursor;
        Ok(())
    }

    fn expression(&mut self, cursor: &mut ExprCursor<'_>) -> Result<(), TransformError> {
        let _ = cursor;
        Ok(())
    }
}

pub fn traverse<R: Rewrite + ?Sized>(
    chunk: &mut Chunk,
    rewrite: &mut R,
) -> Result<(), TransformError> {
    let Chunk { arena, body } = chunk;
    let mut walker = Walker {
        rewrite,
        seen_functions: HashSet::new(),
    };
    walker.block(arena, body)
}

struct Walker<'r, R: ?Sized> {
    rewrite: &'r mut R,
    /// Function literals whose bodies were already walked. A shared subtree
    /// can be reachable from more than one root.
    seen_functions: HashSet<ExprId>,
}

impl<R: Rewrite + ?Sized> Walker<'_, R> {
    fn block(&mut self, arena: &mut Arena, block: &mut Block) -> Result<(), TransformError> {
        let mut fresh = vec![false; block.len()];
        let mut index = 0;
        while index < block.len() {
            if fresh[index] {
                index += 1;
                continue;
            }

            for nested in block[index].kind.blocks_mut() {
                self.block(arena, nested)?;
            }
            let stmt = &block[index];
            for root in stmt.kind.roots() {
                self.function_literals(arena, root)?;
                let mut cursor = ExprCursor::new(arena, root, stmt);
                self.rewrite.expression(&mut cursor)?;
            }

            let mut cursor = StmtCursor::new(arena, block, &mut fresh, index);
            self.rewrite.statement(&mut cursor)?;
            index = cursor.index() + 1;
        }
        Ok(())
    }

    fn function_literals(&mut self, arena: &mut Arena, root: ExprId) -> Result<(), TransformError> {
        for id in arena.descendants(root) {
            if !matches!(arena.get(id), Expr::Atom(Atom::Func(_))) || !self.seen_functions.insert(id) {
                continue;
            }
            let mut body = match arena.get_mut(id) {
                Expr::Atom(Atom::Func(func)) => std::mem::take(&mut func.body),
                _ => continue,
            };
            let walked = self.block(arena, &mut body);
            if let Expr::Atom(Atom::Func(func)) = arena.get_mut(id) {
                func.body = body;
            }
            walked?;
        }
        Ok(())
    }
}
