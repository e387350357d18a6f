//! Walking the module graph from the entry file.

use crate::compile::compile_module;
use crate::error::BuildError;
use crate::fs::FileSystem;
use crate::notice::Notices;
use crate::project::Project;
use crate::trace::{RequireTrace, trace_requires};
use lu_syntax::Chunk;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Every local module reachable from the entry, compiled.
#[derive(Debug, Clone)]
pub struct ModuleGraph {
    pub entry: PathBuf,
    /// Compiled chunks by file.
    pub chunks: BTreeMap<PathBuf, Chunk>,
    /// Merged trace of all modules.
    pub trace: RequireTrace,
}

impl ModuleGraph {
    /// Depth-first walk from `entry`. Each file is compiled and traced once.
    pub fn walk(
        project: &Project,
        entry: &Path,
        fs: &dyn FileSystem,
        notices: &mut Notices,
    ) -> Result<Self, BuildError> {
        let mut chunks = BTreeMap::new();
        let mut trace = RequireTrace::default();
        let mut stack = vec![entry.to_path_buf()];

        while let Some(path) = stack.pop() {
            if chunks.contains_key(&path) {
                continue;
            }
            tracing::debug!(file = %path.display(), "compiling module");
            let source = fs
                .read_to_string(&path)
                .map_err(BuildError::io(path.clone()))?;
            let mut chunk =
                compile_module(&source, project).map_err(|source| BuildError::Compile {
                    path: path.clone(),
                    source,
                })?;
            let found = trace_requires(&mut chunk, &path, project, fs, notices);
            chunks.insert(path, chunk);

            // Reversed so modules are compiled in require-string order.
            let discovered: Vec<PathBuf> = found
                .modules
                .values()
                .filter(|p| !chunks.contains_key(*p))
                .cloned()
                .collect();
            stack.extend(discovered.into_iter().rev());
            trace.merge(found, notices);
        }

        tracing::info!(modules = chunks.len(), "walked module graph");
        Ok(Self {
            entry: entry.to_path_buf(),
            chunks,
            trace,
        })
    }

    /// Require strings and chunks of every module except the entry.
    pub fn dependencies(&self) -> impl Iterator<Item = (&str, &Chunk)> {
        self.trace
            .modules
            .iter()
            .filter(|(_, path)| **path != self.entry)
            .filter_map(|(key, path)| Some((key.as_str(), self.chunks.get(path)?)))
    }
}
