//! Error types for project loading, fetching and building.

use lu_syntax::CompileError;
use std::path::PathBuf;

/// The project descriptor is missing or unusable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no lu.toml or luconfig.json found in {}", root.display())]
    Missing { root: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },
}

/// A build could not complete.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to compile {}: {source}", path.display())]
    Compile {
        path: PathBuf,
        source: CompileError,
    },

    #[error("{} is outside the project root", path.display())]
    OutsideRoot { path: PathBuf },
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| BuildError::Io { path, source }
    }
}

/// A remote module could not be retrieved.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {uri} failed: {message}")]
    Transport { uri: String, message: String },

    #[error("{uri} answered with HTTP {status}")]
    Status { uri: String, status: u16 },

    #[error("failed to read response from {uri}: {source}")]
    Body {
        uri: String,
        source: std::io::Error,
    },
}
