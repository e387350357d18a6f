//! Import statements become `require` calls.
//!
//! ```text
//! import a from "m"        =>  local a = require("m")
//! import { b, c } from "m" =>  local __import0 = require("m")
//!                              local b, c = __import0.b, __import0.c
//! ```

use crate::ast::*;
use crate::transform::{Rewrite, StmtCursor, TransformError, traverse};

pub fn lower_imports(chunk: &mut Chunk) -> Result<(), TransformError> {
    traverse(chunk, &mut ImportLowering { count: 0 })
}

struct ImportLowering {
    /// Suffix for the next temporary holding a destructured module.
    count: usize,
}

impl Rewrite for ImportLowering {
    fn statement(&mut self, cursor: &mut StmtCursor<'_>) -> Result<(), TransformError> {
        if !matches!(cursor.statement().kind, StmtKind::Import { .. }) {
            return Ok(());
        }
        let line = cursor.line();
        let StmtKind::Import { binding, source } = cursor.take().kind else {
            return Ok(());
        };

        let arena = cursor.arena_mut();
        let require = arena.name("require");
        let module = arena.call(require, vec![source]);

        match binding {
            ImportBinding::Default(name) => {
                cursor.replace(Stmt::local(vec![name], vec![module], line));
            }
            ImportBinding::Named(names) => {
                let holder = format!("__import{}", self.count);
                self.count += 1;
                let values = names
                    .iter()
                    .map(|name| {
                        let object = arena.name(holder.as_str());
                        arena.member(object, name.as_str())
                    })
                    .collect();
                cursor.insert_before(Stmt::local(vec![holder], vec![module], line));
                cursor.replace(Stmt::local(names, values, line));
            }
        }
        Ok(())
    }
}
