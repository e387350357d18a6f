//! Project descriptor.
//!
//! Loaded from the project root, trying in order:
//! 1. `lu.toml`
//! 2. `luconfig.json` (legacy, camelCase keys)
//!
//! Both formats accept camelCase and snake_case keys.
//!
//! Example lu.toml:
//! ```toml
//! name = "game"
//! entrypoint = "init.lu"
//! bundle = true
//! out_file = "dist/game.lua"
//! modules = ["love"]
//!
//! [registries]
//! gh = "https://raw.githubusercontent.com/{name}/{version}/init.lu"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const TOML_DESCRIPTOR: &str = "lu.toml";
pub const JSON_DESCRIPTOR: &str = "luconfig.json";

/// Descriptor file names, in lookup order.
pub const DESCRIPTORS: &[&str] = &[TOML_DESCRIPTOR, JSON_DESCRIPTOR];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Substituted for `__LU_PROJECT__`.
    pub name: String,

    #[serde(default = "default_entrypoint")]
    pub entrypoint: String,

    /// Bundle every traced module into `out_file`.
    #[serde(default)]
    pub bundle: bool,

    #[serde(default, alias = "out_file", skip_serializing_if = "Option::is_none")]
    pub out_file: Option<PathBuf>,

    #[serde(default, alias = "out_dir", skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,

    #[serde(default = "default_jsx_constructor", alias = "jsx_constructor")]
    pub jsx_constructor: String,

    /// Modules provided by the host runtime.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<String>,

    #[serde(default)]
    pub minify: bool,

    /// Package protocol to URL template with `{name}` and `{version}`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub registries: BTreeMap<String, String>,

    #[serde(default = "default_fetch_timeout", alias = "fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_entrypoint() -> String {
    "init.lua".to_string()
}

fn default_jsx_constructor() -> String {
    lu_syntax::DEFAULT_ELEMENT_CONSTRUCTOR.to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

impl ProjectConfig {
    /// Defaults for a project with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entrypoint: default_entrypoint(),
            bundle: false,
            out_file: None,
            out_dir: None,
            jsx_constructor: default_jsx_constructor(),
            modules: Vec::new(),
            minify: false,
            registries: BTreeMap::new(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }

    /// Find and parse the descriptor in `root`.
    pub fn load(root: &Path) -> Result<(Self, PathBuf), ConfigError> {
        let path = DESCRIPTORS
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| ConfigError::Missing {
                root: root.to_path_buf(),
            })?;
        let config = Self::load_file(&path)?;
        config.validate(&path)?;
        Ok((config, path))
    }

    /// Parse a descriptor, choosing the format by extension.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
        } else {
            toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Check option combinations. `path` names the descriptor in errors.
    pub fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::Invalid {
            path: path.to_path_buf(),
            message,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty".to_string()));
        }
        if self.entrypoint.trim().is_empty() {
            return Err(invalid("entrypoint must not be empty".to_string()));
        }
        if self.bundle {
            if self.out_dir.is_some() {
                return Err(invalid(
                    "outDir cannot be used with bundle, set outFile instead".to_string(),
                ));
            }
            if self.out_file.is_none() {
                return Err(invalid("bundle requires outFile".to_string()));
            }
        } else {
            if self.out_file.is_some() {
                return Err(invalid(
                    "outFile requires bundle, set outDir instead".to_string(),
                ));
            }
            if self.out_dir.is_none() {
                return Err(invalid("outDir is required unless bundle is set".to_string()));
            }
        }
        if !is_identifier(&self.jsx_constructor) {
            return Err(invalid(format!(
                "jsxConstructor must be an identifier, got {:?}",
                self.jsx_constructor
            )));
        }
        for (protocol, template) in &self.registries {
            if !template.contains("{name}") {
                return Err(invalid(format!(
                    "registry {protocol:?} must contain a {{name}} placeholder"
                )));
            }
        }
        Ok(())
    }

    /// Whether `module` is provided by the runtime.
    pub fn is_runtime_module(&self, module: &str) -> bool {
        self.modules.iter().any(|m| m == module)
    }

    /// Renderer style name for the output.
    pub fn style(&self) -> &'static str {
        if self.minify { "minify" } else { "pretty" }
    }

    pub fn desugar_options(&self) -> lu_syntax::DesugarOptions {
        lu_syntax::DesugarOptions {
            element_constructor: self.jsx_constructor.clone(),
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
