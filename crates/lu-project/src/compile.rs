//! Per-file compilation inside a project.

use crate::project::Project;
use lu_syntax::{
    Atom, Chunk, CompileError, Expr, ExprCursor, Rewrite, TransformError, compile, traverse,
};

/// Name replaced by the project name string.
pub const PROJECT_MACRO: &str = "__LU_PROJECT__";

/// Lex, parse and desugar `source`, then expand project macros.
pub fn compile_module(source: &str, project: &Project) -> Result<Chunk, CompileError> {
    let mut chunk = compile(source, &project.config.desugar_options())?;
    expand_project_macro(&mut chunk, &project.config.name)?;
    Ok(chunk)
}

/// Replace every `__LU_PROJECT__` reference with the string `name`.
pub fn expand_project_macro(chunk: &mut Chunk, name: &str) -> Result<(), TransformError> {
    traverse(chunk, &mut ProjectMacro { name })
}

struct ProjectMacro<'a> {
    name: &'a str,
}

impl Rewrite for ProjectMacro<'_> {
    fn expression(&mut self, cursor: &mut ExprCursor<'_>) -> Result<(), TransformError> {
        for leaf in cursor.leaves() {
            if matches!(cursor.arena().get(leaf), Expr::Atom(Atom::Name(n)) if n == PROJECT_MACRO)
            {
                cursor.replace(leaf, Expr::Atom(Atom::String(self.name.into())));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use lu_syntax::{PRETTY_RENDERER, Renderer};

    fn project() -> Project {
        Project {
            root: "/p".into(),
            config: ProjectConfig::named("demo"),
        }
    }

    #[test]
    fn test_project_macro_expanded() {
        let chunk = compile_module(
            "print(__LU_PROJECT__)\nlocal f = function() return __LU_PROJECT__ .. \"!\" end",
            &project(),
        )
        .unwrap();
        let lua = PRETTY_RENDERER.render_chunk(&chunk);
        assert!(!lua.contains(PROJECT_MACRO), "{lua}");
        assert!(lua.starts_with("print(\"demo\")"), "{lua}");
        assert!(lua.contains("(\"demo\" .. \"!\")"), "{lua}");
    }

    #[test]
    fn test_constructor_from_config() {
        let mut project = project();
        project.config.jsx_constructor = "el".into();
        let chunk = compile_module("local e = <div/>", &project).unwrap();
        let lua = PRETTY_RENDERER.render_chunk(&chunk);
        assert_eq!(lua, "local e = el(\"div\", {}, {})\n");
    }
}
