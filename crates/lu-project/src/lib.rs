//! Project builds for lu.
//!
//! A project is a directory with a descriptor (`lu.toml` or
//! `luconfig.json`) and an entry script. Building it:
//!
//! 1. compiles the entry and every local module it requires, once each
//! 2. fetches and compiles remote modules (URIs and registry packages)
//! 3. writes one Lua file per module, or a single bundle
//!
//! Unresolvable modules do not fail a build; they are reported as
//! [`Notice`]s in the returned [`BuildReport`].

pub mod build;
pub mod bundle;
pub mod compile;
pub mod config;
pub mod deps;
pub mod error;
pub mod fs;
pub mod graph;
pub mod notice;
pub mod project;
pub mod trace;

pub use build::{BuildReport, build, build_with};
pub use compile::{PROJECT_MACRO, compile_module};
pub use config::ProjectConfig;
pub use deps::{Fetcher, MODULES_DIR, UreqFetcher};
pub use error::{BuildError, ConfigError, FetchError};
pub use fs::{Disk, FileSystem};
pub use graph::ModuleGraph;
pub use notice::{Notice, Notices, Severity};
pub use project::Project;
pub use trace::{Import, RequireTrace, classify};
