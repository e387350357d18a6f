//! Building a project: trace, fetch, bundle and write outputs.

use crate::bundle::bundle;
use crate::deps::{Fetcher, RemoteModule, UreqFetcher, resolve_dependencies};
use crate::error::BuildError;
use crate::fs::{Disk, FileSystem};
use crate::graph::ModuleGraph;
use crate::notice::Notices;
use crate::project::Project;
use lu_syntax::{PRETTY_RENDERER, Renderer, renderer_for_style};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Outcome of a successful build.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    /// Files written, in order.
    pub written: Vec<PathBuf>,
    pub notices: Notices,
}

/// Build `project` from disk, fetching remote modules over HTTP.
pub fn build(project: &Project) -> Result<BuildReport, BuildError> {
    let fetcher = UreqFetcher::new(Duration::from_secs(project.config.fetch_timeout_secs));
    build_with(project, &Disk, &fetcher)
}

/// Build with explicit collaborators.
pub fn build_with(
    project: &Project,
    fs: &dyn FileSystem,
    fetcher: &dyn Fetcher,
) -> Result<BuildReport, BuildError> {
    let mut report = BuildReport::default();
    let renderer = renderer_for_style(project.config.style()).unwrap_or(&PRETTY_RENDERER);

    let entry = project.entry_path();
    tracing::info!(project = %project.config.name, entry = %entry.display(), "building");
    let mut graph = ModuleGraph::walk(project, &entry, fs, &mut report.notices)?;

    let remote = if graph.trace.has_remote() {
        resolve_dependencies(
            project,
            &graph.trace,
            fetcher,
            renderer,
            &mut report.notices,
        )?
    } else {
        Vec::new()
    };

    let config = &project.config;
    match (&config.out_file, &config.out_dir) {
        (Some(out_file), _) if config.bundle => {
            let path = project.output_path(out_file);
            let chunk = bundled_entry(&mut graph, remote);
            write(&path, &renderer.render_chunk(&chunk), &mut report)?;
        }
        (_, Some(out_dir)) => {
            let out_dir = project.output_path(out_dir);
            for (source, chunk) in &graph.chunks {
                let relative = source
                    .strip_prefix(&project.root)
                    .map_err(|_| BuildError::OutsideRoot {
                        path: source.clone(),
                    })?;
                let path = out_dir.join(relative).with_extension("lua");
                write(&path, &renderer.render_chunk(chunk), &mut report)?;
            }
        }
        (Some(out_file), None) => {
            // A single file without bundling: requires stay runtime calls.
            let path = project.output_path(out_file);
            let chunk = graph.chunks.remove(&graph.entry).unwrap_or_default();
            write(&path, &renderer.render_chunk(&chunk), &mut report)?;
        }
        (None, None) => {
            return Err(crate::error::ConfigError::Invalid {
                path: project.root.clone(),
                message: "no output configured".to_string(),
            }
            .into());
        }
    }

    tracing::info!(
        written = report.written.len(),
        notices = report.notices.len(),
        "build complete"
    );
    Ok(report)
}

/// The entry chunk with every traced module bundled into it. Without any
/// modules the entry is returned unchanged.
fn bundled_entry(graph: &mut ModuleGraph, remote: Vec<RemoteModule>) -> lu_syntax::Chunk {
    let mut modules: Vec<(String, lu_syntax::Chunk)> = graph
        .dependencies()
        .map(|(key, chunk)| (key.to_string(), chunk.clone()))
        .collect();
    modules.extend(remote.into_iter().map(|m| (m.specifier, m.chunk)));

    let mut entry = graph.chunks.remove(&graph.entry).unwrap_or_default();
    if !modules.is_empty() {
        bundle(&mut entry, modules);
    }
    entry
}

fn write(path: &Path, content: &str, report: &mut BuildReport) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(BuildError::io(parent))?;
    }
    std::fs::write(path, content).map_err(BuildError::io(path))?;
    tracing::debug!(path = %path.display(), "wrote output");
    report.written.push(path.to_path_buf());
    Ok(())
}
