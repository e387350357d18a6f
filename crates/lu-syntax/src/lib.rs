//! Source-to-source compiler for lu, a Lua dialect.
//!
//! `lu-syntax` turns dialect source into plain Lua text. The dialect adds
//! compound assignment, assignment expressions, `import` statements,
//! `@intrinsic` decorators, pipe lambdas and element literals on top of
//! Lua 5.1 syntax.
//!
//! # Architecture
//!
//! ```text
//! source ─> lexer ─> parser ─> Chunk ─> passes ─> Chunk ─> renderer ─> Lua
//!           (tokens)          (arena AST)       (desugared)  (pretty/minify)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use lu_syntax::{compile, output::PRETTY_RENDERER, Renderer};
//!
//! let chunk = compile("local x = 1\nx += 2", &Default::default())?;
//! let lua = PRETTY_RENDERER.render_chunk(&chunk);
//! // => "local x = 1\nx = (x + 2)\n"
//! ```
//!
//! # Desugaring order
//!
//! Assignment expressions are hoisted first, then compound assignments,
//! imports, intrinsics and element literals are lowered, each as its own
//! traversal of the chunk.

pub mod ast;
pub mod builder;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod passes;
pub mod registry;
pub mod structure_eq;
pub mod token;
pub mod traits;
pub mod transform;

// Re-exports: AST types
pub use ast::{
    Arena, Arith, AssignOp, Atom, BinaryOp, Block, Chunk, Element, ElseArm, Expr, ExprId,
    Function, FunctionPath, IfArm, ImportBinding, Stmt, StmtKind, TableConstructor, TableKey,
    UnaryOp,
};
pub use structure_eq::StructureEq;

// Re-exports: Pipeline stages
pub use lexer::{LexError, tokenize, tokenize_significant};
pub use parser::{ParseError, parse};
pub use passes::{DEFAULT_ELEMENT_CONSTRUCTOR, DesugarOptions, desugar};
pub use transform::{ExprCursor, Rewrite, StmtCursor, TransformError, traverse};

// Re-exports: Rendering
pub use output::{Layout, LuaRenderer, MINIFY_RENDERER, PRETTY_RENDERER};
pub use registry::{register_renderer, renderer_for_style, renderers};
pub use traits::Renderer;

/// Error from any stage of [`compile`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl CompileError {
    /// Source line the error points at.
    pub fn line(&self) -> usize {
        match self {
            CompileError::Lex(e) => e.line,
            CompileError::Parse(e) => e.line,
            CompileError::Transform(
                TransformError::IntrinsicTarget { line, .. }
                | TransformError::DanglingIntrinsic { line },
            ) => *line,
        }
    }
}

/// Lex and parse without desugaring.
pub fn parse_source(source: &str) -> Result<Chunk, CompileError> {
    let tokens = tokenize_significant(source)?;
    Ok(parse(tokens)?)
}

/// Lex, parse and desugar a source text.
pub fn compile(source: &str, options: &DesugarOptions) -> Result<Chunk, CompileError> {
    let mut chunk = parse_source(source)?;
    desugar(&mut chunk, options)?;
    Ok(chunk)
}

/// Compile and render in one step.
pub fn compile_to_lua(
    source: &str,
    options: &DesugarOptions,
    layout: Layout,
) -> Result<String, CompileError> {
    let chunk = compile(source, options)?;
    Ok(LuaRenderer::new(layout).render_chunk(&chunk))
}
