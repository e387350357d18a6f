//! Remote dependencies.
//!
//! URI imports are fetched directly. Package imports are turned into URIs
//! through the project's registry templates. Every fetched module is
//! compiled, traced for its own remote imports, and written as Lua under
//! `.lu-modules/` in the project root.

use crate::compile::compile_module;
use crate::error::{BuildError, FetchError};
use crate::notice::Notices;
use crate::project::Project;
use crate::trace::{Import, PackageImport, RequireTrace, classify, require_calls};
use lu_syntax::{Chunk, Renderer};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

/// Directory under the project root holding fetched modules.
pub const MODULES_DIR: &str = ".lu-modules";

/// Retrieves the source of a remote module.
pub trait Fetcher {
    fn fetch(&self, uri: &str) -> Result<String, FetchError>;
}

/// HTTP fetcher backed by a `ureq` agent.
pub struct UreqFetcher {
    agent: ureq::Agent,
}

impl UreqFetcher {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("lu/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }
}

impl Fetcher for UreqFetcher {
    fn fetch(&self, uri: &str) -> Result<String, FetchError> {
        let response = match self.agent.get(uri).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => {
                return Err(FetchError::Status {
                    uri: uri.to_string(),
                    status,
                });
            }
            Err(err) => {
                return Err(FetchError::Transport {
                    uri: uri.to_string(),
                    message: err.to_string(),
                });
            }
        };
        response.into_string().map_err(|source| FetchError::Body {
            uri: uri.to_string(),
            source,
        })
    }
}

/// A fetched and compiled module.
#[derive(Debug, Clone)]
pub struct RemoteModule {
    /// The string passed to `require`.
    pub specifier: String,
    pub uri: String,
    pub chunk: Chunk,
    /// Compiled Lua written under [`MODULES_DIR`].
    pub path: PathBuf,
}

/// Fill in a registry template for `package`.
pub fn package_uri(template: &str, package: &PackageImport) -> String {
    template
        .replace("{name}", &package.name)
        .replace("{version}", package.version.as_deref().unwrap_or("latest"))
}

/// File name a module is materialized under.
fn materialized_name(specifier: &str) -> String {
    let mut name: String = specifier
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    name.push_str(".lua");
    name
}

/// Fetch, compile and materialize every remote import in `trace`, then
/// the remote imports of what was fetched.
///
/// Failures to fetch or compile a module are recorded as notices. The
/// modules directory is removed again when nothing was written to it.
pub fn resolve_dependencies(
    project: &Project,
    trace: &RequireTrace,
    fetcher: &dyn Fetcher,
    renderer: &dyn Renderer,
    notices: &mut Notices,
) -> Result<Vec<RemoteModule>, BuildError> {
    let dir = project.modules_dir();
    std::fs::create_dir_all(&dir).map_err(BuildError::io(dir.clone()))?;

    let mut pending: Vec<Import> = trace.uris.iter().cloned().map(Import::Uri).collect();
    pending.extend(
        trace
            .packages
            .values()
            .flatten()
            .cloned()
            .map(Import::Package),
    );
    pending.reverse();

    let mut seen = BTreeSet::new();
    let mut resolved = Vec::new();
    while let Some(import) = pending.pop() {
        let (specifier, uri) = match import {
            Import::Uri(uri) => (uri.clone(), uri),
            Import::Package(package) => {
                let Some(template) = project.config.registries.get(&package.protocol) else {
                    notices.warning(format!(
                        "No registry configured for \"{}\", skipping package \"{}\"",
                        package.protocol, package.specifier
                    ));
                    continue;
                };
                (package.specifier.clone(), package_uri(template, &package))
            }
            Import::Local(_) => continue,
        };
        if !seen.insert(specifier.clone()) {
            continue;
        }

        tracing::info!(%uri, "fetching remote dependency");
        let source = match fetcher.fetch(&uri) {
            Ok(source) => source,
            Err(err) => {
                notices.warning(format!("Could not fetch \"{specifier}\": {err}"));
                continue;
            }
        };
        let mut chunk = match compile_module(&source, project) {
            Ok(chunk) => chunk,
            Err(err) => {
                notices.warning(format!("Could not compile \"{specifier}\": {err}"));
                continue;
            }
        };

        let mut nested = Vec::new();
        for call in require_calls(&mut chunk) {
            match classify(&call.specifier) {
                Ok(Import::Local(name)) if !project.config.is_runtime_module(&name) => {
                    notices.info(format!(
                        "Remote module \"{specifier}\" requires \"{name}\", left to the runtime"
                    ));
                }
                Ok(Import::Local(_)) => {}
                Ok(import) => nested.push(import),
                Err(err) => notices.warning(format!("Skipping {err} in \"{specifier}\"")),
            }
        }
        pending.extend(nested.into_iter().rev());

        let path = dir.join(materialized_name(&specifier));
        std::fs::write(&path, renderer.render_chunk(&chunk)).map_err(BuildError::io(path.clone()))?;
        tracing::debug!(path = %path.display(), "materialized dependency");
        resolved.push(RemoteModule {
            specifier,
            uri,
            chunk,
            path,
        });
    }

    if resolved.is_empty() && is_empty_dir(&dir) {
        std::fs::remove_dir(&dir).map_err(BuildError::io(dir.clone()))?;
    }
    tracing::info!(count = resolved.len(), "resolved remote dependencies");
    Ok(resolved)
}

fn is_empty_dir(dir: &std::path::Path) -> bool {
    std::fs::read_dir(dir).is_ok_and(|mut entries| entries.next().is_none())
}
