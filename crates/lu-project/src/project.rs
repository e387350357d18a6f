//! A project instance: a root directory plus its configuration.

use crate::config::ProjectConfig;
use crate::error::{BuildError, ConfigError};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Project {
    /// Absolute project root.
    pub root: PathBuf,
    pub config: ProjectConfig,
}

impl Project {
    /// Open the project whose descriptor lives in `root`.
    pub fn open(root: &Path) -> Result<Self, BuildError> {
        let root = root
            .canonicalize()
            .map_err(BuildError::io(root.to_path_buf()))?;
        let (config, path) = ProjectConfig::load(&root)?;
        tracing::info!(name = %config.name, descriptor = %path.display(), "loaded project");
        Ok(Self { root, config })
    }

    /// A project made of a single source file and no descriptor.
    ///
    /// Named and rooted after `input`. With `out_file` set the output goes
    /// there; bundling is only possible with an output file.
    pub fn single_file(
        input: &Path,
        out_file: Option<PathBuf>,
        bundle: bool,
        minify: bool,
    ) -> Result<Self, BuildError> {
        let input = input
            .canonicalize()
            .map_err(BuildError::io(input.to_path_buf()))?;
        let invalid = |message: &str| ConfigError::Invalid {
            path: input.clone(),
            message: message.to_string(),
        };
        let entrypoint = input
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| invalid("input must name a file"))?
            .to_string();
        let root = input
            .parent()
            .ok_or_else(|| invalid("input has no parent directory"))?
            .to_path_buf();
        if bundle && out_file.is_none() {
            return Err(invalid("bundling needs an output file").into());
        }

        let mut config = ProjectConfig::named(entrypoint.clone());
        config.entrypoint = entrypoint;
        config.bundle = bundle;
        config.minify = minify;
        config.out_file = out_file;
        Ok(Self { root, config })
    }

    pub fn entry_path(&self) -> PathBuf {
        self.root.join(&self.config.entrypoint)
    }

    /// Resolve a configured output path against the root.
    pub fn output_path(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// Where fetched dependencies are materialized.
    pub fn modules_dir(&self) -> PathBuf {
        self.root.join(crate::deps::MODULES_DIR)
    }

    /// `path` relative to the project root, for messages.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
