use crate::ast::*;

/// Position of a statement inside the list being traversed.
pub struct StmtCursor<'a> {
    arena: &'a mut Arena,
    block: &'a mut Block,
    fresh: &'a mut Vec<bool>,
    index: usize,
}

impl<'a> StmtCursor<'a> {
    pub(super) fn new(
        arena: &'a mut Arena,
        block: &'a mut Block,
        fresh: &'a mut Vec<bool>,
        index: usize,
    ) -> Self {
        Self {
            arena,
            block,
            fresh,
            index,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn statement(&self) -> &Stmt {
        &self.block[self.index]
    }

    pub fn line(&self) -> usize {
        self.statement().line
    }

    pub fn arena(&self) -> &Arena {
        self.arena
    }

    pub fn arena_mut(&mut self) -> &mut Arena {
        self.arena
    }

    /// Swap in a new statement, returning the old one.
    pub fn replace(&mut self, stmt: Stmt) -> Stmt {
        std::mem::replace(&mut self.block[self.index], stmt)
    }

    /// Take the statement out, leaving an ignored placeholder.
    pub fn take(&mut self) -> Stmt {
        let line = self.line();
        self.replace(Stmt::ignore(line))
    }

    /// Insert before the current statement. The cursor keeps pointing at the
    /// same statement.
    pub fn insert_before(&mut self, stmt: Stmt) {
        self.block.insert(self.index, stmt);
        self.fresh.insert(self.index, true);
        self.index += 1;
    }

    pub fn insert_after(&mut self, stmt: Stmt) {
        self.block.insert(self.index + 1, stmt);
        self.fresh.insert(self.index + 1, true);
    }

    /// Mark the statement as deleted; it is skipped when rendering.
    pub fn remove(&mut self) {
        self.take();
    }

    /// Cursor on the following statement, if any.
    pub fn next(&mut self) -> Option<StmtCursor<'_>> {
        let index = self.index + 1;
        if index >= self.block.len() {
            return None;
        }
        Some(StmtCursor {
            arena: &mut *self.arena,
            block: &mut *self.block,
            fresh: &mut *self.fresh,
            index,
        })
    }
}

/// A root expression of a statement and its owner.
pub struct ExprCursor<'a> {
    arena: &'a mut Arena,
    root: ExprId,
    owner: &'a Stmt,
}

impl<'a> ExprCursor<'a> {
    pub(super) fn new(arena: &'a mut Arena, root: ExprId, owner: &'a Stmt) -> Self {
        Self { arena, root, owner }
    }

    pub fn id(&self) -> ExprId {
        self.root
    }

    pub fn expression(&self) -> &Expr {
        self.arena.get(self.root)
    }

    pub fn owner(&self) -> &Stmt {
        self.owner
    }

    pub fn arena(&self) -> &Arena {
        self.arena
    }

    pub fn arena_mut(&mut self) -> &mut Arena {
        self.arena
    }

    /// Replace the root node in place.
    pub fn mutate(&mut self, expr: Expr) -> Expr {
        self.arena.replace(self.root, expr)
    }

    /// Replace any node, typically one found through [`Self::descendants`].
    pub fn replace(&mut self, id: ExprId, expr: Expr) -> Expr {
        self.arena.replace(id, expr)
    }

    pub fn descendants(&self) -> Vec<ExprId> {
        self.arena.descendants(self.root)
    }

    pub fn leaves(&self) -> Vec<ExprId> {
        self.arena.leaves(self.root)
    }
}
