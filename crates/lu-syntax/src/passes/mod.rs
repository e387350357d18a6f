//! Desugaring passes that lower dialect extensions to plain Lua.
//!
//! Each pass is a [`Rewrite`](crate::transform::Rewrite) run over the whole
//! chunk. They are order dependent: hoisted assignment expressions produce
//! compound-assignment statements, which the next pass lowers.

pub mod assignments;
pub mod compound;
pub mod elements;
pub mod imports;
pub mod intrinsics;

use crate::ast::Chunk;
use crate::transform::TransformError;

/// Default constructor used to lower element literals.
pub const DEFAULT_ELEMENT_CONSTRUCTOR: &str = "h";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesugarOptions {
    /// Function called as `ctor(tag, props, children)` for each element.
    pub element_constructor: String,
}

impl Default for DesugarOptions {
    fn default() -> Self {
        Self {
            element_constructor: DEFAULT_ELEMENT_CONSTRUCTOR.to_string(),
        }
    }
}

/// Run every pass in order.
pub fn desugar(chunk: &mut Chunk, options: &DesugarOptions) -> Result<(), TransformError> {
    assignments::hoist_assignment_expressions(chunk)?;
    compound::lower_compound_assignments(chunk)?;
    imports::lower_imports(chunk)?;
    intrinsics::lower_intrinsics(chunk)?;
    elements::lower_elements(chunk, &options.element_constructor)?;
    tracing::trace!(nodes = chunk.arena.len(), "desugared chunk");
    Ok(())
}
