//! Lua renderers.

pub mod lua;

pub use lua::{Layout, LuaEmitter, format_number, quote_string};

use crate::ast::{Arena, ExprId, Function, FunctionPath, Stmt};
use crate::traits::Renderer;

/// Static instance of the indented renderer for the registry.
pub static PRETTY_RENDERER: LuaRenderer = LuaRenderer::new(Layout::Pretty);

/// Static instance of the single-line renderer for the registry.
pub static MINIFY_RENDERER: LuaRenderer = LuaRenderer::new(Layout::Minify);

/// Lua renderer implementing the Renderer trait.
pub struct LuaRenderer {
    layout: Layout,
}

impl LuaRenderer {
    pub const fn new(layout: Layout) -> Self {
        Self { layout }
    }
}

impl Renderer for LuaRenderer {
    fn style(&self) -> &'static str {
        match self.layout {
            Layout::Pretty => "pretty",
            Layout::Minify => "minify",
        }
    }

    fn render(&self, arena: &Arena, block: &[Stmt]) -> String {
        LuaEmitter::new(arena, self.layout).block(block, 0)
    }

    fn statement(&self, arena: &Arena, stmt: &Stmt) -> String {
        LuaEmitter::new(arena, self.layout).statement(stmt, 0)
    }

    fn expression(&self, arena: &Arena, expr: ExprId) -> String {
        LuaEmitter::new(arena, self.layout).expression(expr, 0)
    }

    fn closure(&self, arena: &Arena, func: &Function, path: Option<&FunctionPath>) -> String {
        let name = path.map(|path| path.to_string());
        LuaEmitter::new(arena, self.layout).closure(func, name.as_deref(), 0)
    }
}
