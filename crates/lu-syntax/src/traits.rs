//! Renderer trait implemented by the output styles.

use crate::ast::{Arena, Chunk, ExprId, Function, FunctionPath, Stmt};

/// A renderer turns syntax back into Lua source text.
pub trait Renderer: Send + Sync {
    /// Style identifier (e.g., "pretty", "minify").
    fn style(&self) -> &'static str;

    /// Render a statement list.
    fn render(&self, arena: &Arena, block: &[Stmt]) -> String;

    fn statement(&self, arena: &Arena, stmt: &Stmt) -> String;

    fn expression(&self, arena: &Arena, expr: ExprId) -> String;

    /// Render a function literal, or a named function when `path` is given.
    fn closure(&self, arena: &Arena, func: &Function, path: Option<&FunctionPath>) -> String;

    /// Render a whole chunk, ending with a newline unless it is empty.
    fn render_chunk(&self, chunk: &Chunk) -> String {
        let mut out = self.render(&chunk.arena, &chunk.body);
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}
