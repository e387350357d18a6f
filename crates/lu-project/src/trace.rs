//! Finding and classifying `require` calls.
//!
//! Only calls of the bare name `require` with exactly one string literal
//! argument are traced. The argument is classified as:
//!
//! - a URI import (`http:`/`https:`), fetched remotely
//! - a package import (`protocol:name[@version]`), resolved through a registry
//! - a local module, resolved against the filesystem

use crate::fs::FileSystem;
use crate::notice::Notices;
use crate::project::Project;
use bstr::ByteSlice;
use lu_syntax::{Arith, Atom, Chunk, Expr, ExprCursor, Rewrite, TransformError, traverse};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// A `require("...")` call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireCall {
    pub specifier: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PackageImport {
    pub protocol: String,
    pub name: String,
    pub version: Option<String>,
    /// The string passed to `require`.
    pub specifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Import {
    Uri(String),
    Package(PackageImport),
    Local(String),
}

/// A `protocol:` specifier without a package name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed package reference {0:?}")]
pub struct MalformedImport(pub String);

/// Classify a `require` argument.
pub fn classify(specifier: &str) -> Result<Import, MalformedImport> {
    if specifier.starts_with("http:") || specifier.starts_with("https:") {
        return Ok(Import::Uri(specifier.to_string()));
    }
    let Some((protocol, rest)) = specifier.split_once(':') else {
        return Ok(Import::Local(specifier.to_string()));
    };
    let (name, version) = match rest.split_once('@') {
        Some((name, version)) => (name, Some(version)),
        None => (rest, None),
    };
    if protocol.is_empty() || name.is_empty() || version.is_some_and(str::is_empty) {
        return Err(MalformedImport(specifier.to_string()));
    }
    Ok(Import::Package(PackageImport {
        protocol: protocol.to_string(),
        name: name.to_string(),
        version: version.map(str::to_string),
        specifier: specifier.to_string(),
    }))
}

/// Every traceable `require` call in `chunk`, in source order.
pub fn require_calls(chunk: &mut Chunk) -> Vec<RequireCall> {
    let mut collector = RequireCollector::default();
    // The collector never fails.
    let _ = traverse(chunk, &mut collector);
    collector.calls.sort_by_key(|call| call.line);
    collector.calls
}

#[derive(Default)]
struct RequireCollector {
    calls: Vec<RequireCall>,
}

impl Rewrite for RequireCollector {
    fn expression(&mut self, cursor: &mut ExprCursor<'_>) -> Result<(), TransformError> {
        let arena = cursor.arena();
        for id in cursor.descendants() {
            let Expr::Arith(Arith::Call {
                target,
                method: None,
                args,
            }) = arena.get(id)
            else {
                continue;
            };
            let [arg] = args.as_slice() else { continue };
            if !matches!(arena.get(*target), Expr::Atom(Atom::Name(n)) if n == "require") {
                continue;
            }
            if let Expr::Atom(Atom::String(value)) = arena.get(*arg) {
                let Ok(specifier) = value.to_str() else {
                    continue;
                };
                self.calls.push(RequireCall {
                    specifier: specifier.to_string(),
                    line: cursor.owner().line,
                });
            }
        }
        Ok(())
    }
}

/// Imports found in one or more modules.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequireTrace {
    /// Require string to resolved file.
    pub modules: BTreeMap<String, PathBuf>,
    /// Package imports grouped by protocol.
    pub packages: BTreeMap<String, BTreeSet<PackageImport>>,
    pub uris: BTreeSet<String>,
}

impl RequireTrace {
    /// Register a local module. The first file registered under a require
    /// string wins.
    pub fn add_module(&mut self, key: &str, path: PathBuf, notices: &mut Notices) -> bool {
        match self.modules.get(key) {
            Some(existing) if *existing == path => false,
            Some(existing) => {
                notices.warning(format!(
                    "Module \"{key}\" resolves to both {} and {}, using the first",
                    existing.display(),
                    path.display()
                ));
                false
            }
            None => {
                self.modules.insert(key.to_string(), path);
                true
            }
        }
    }

    pub fn add_package(&mut self, package: PackageImport) {
        self.packages
            .entry(package.protocol.clone())
            .or_default()
            .insert(package);
    }

    /// Fold another trace into this one.
    pub fn merge(&mut self, other: RequireTrace, notices: &mut Notices) {
        for (key, path) in other.modules {
            self.add_module(&key, path, notices);
        }
        for package in other.packages.into_values().flatten() {
            self.add_package(package);
        }
        self.uris.extend(other.uris);
    }

    pub fn has_remote(&self) -> bool {
        !self.uris.is_empty() || !self.packages.is_empty()
    }
}

/// Trace the requires of `file`, already compiled into `chunk`.
pub fn trace_requires(
    chunk: &mut Chunk,
    file: &Path,
    project: &Project,
    fs: &dyn FileSystem,
    notices: &mut Notices,
) -> RequireTrace {
    let mut trace = RequireTrace::default();
    let mut unresolved = BTreeSet::new();
    for call in require_calls(chunk) {
        match classify(&call.specifier) {
            Ok(Import::Uri(uri)) => {
                trace.uris.insert(uri);
            }
            Ok(Import::Package(package)) => trace.add_package(package),
            Ok(Import::Local(reference)) => {
                match resolve_local(&reference, file, &project.root, fs) {
                    Some(path) => {
                        trace.add_module(&reference, path, notices);
                    }
                    None if project.config.is_runtime_module(&reference) => {}
                    None => {
                        if unresolved.insert(reference.clone()) {
                            notices.warning(format!(
                                "Unresolved module \"{reference}\" required by {} (line {})",
                                project.display_path(file),
                                call.line
                            ));
                        }
                    }
                }
            }
            Err(err) => notices.warning(format!(
                "Skipping {err} in {} (line {})",
                project.display_path(file),
                call.line
            )),
        }
    }
    tracing::debug!(
        file = %file.display(),
        modules = trace.modules.len(),
        uris = trace.uris.len(),
        "traced requires"
    );
    trace
}

/// Resolve a local module reference to a file.
///
/// `./x` and `../x` are relative to the directory of `from`, anything else to
/// `root`. Dots in the rest of the reference separate directories, and a
/// `.lu` file is preferred over a `.lua` one.
pub fn resolve_local(
    reference: &str,
    from: &Path,
    root: &Path,
    fs: &dyn FileSystem,
) -> Option<PathBuf> {
    let mut base;
    let mut rest = reference;
    if rest.starts_with("./") || rest.starts_with("../") {
        base = from.parent()?.to_path_buf();
        loop {
            if let Some(tail) = rest.strip_prefix("./") {
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("../") {
                if !base.pop() {
                    return None;
                }
                rest = tail;
            } else {
                break;
            }
        }
    } else {
        base = root.to_path_buf();
    }

    let stem = rest
        .strip_suffix(".lua")
        .or_else(|| rest.strip_suffix(".lu"))
        .unwrap_or(rest);
    if stem.is_empty() {
        return None;
    }
    let relative: PathBuf = stem.split(['.', '/']).collect();
    ["lu", "lua"]
        .iter()
        .map(|ext| base.join(&relative).with_extension(ext))
        .find(|candidate| fs.is_file(candidate))
}
