//! Filesystem access used while tracing modules.

use std::io;
use std::path::Path;

/// Read-only view of the files a build can see.
pub trait FileSystem {
    fn is_file(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disk;

impl FileSystem for Disk {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// In-memory files keyed by path.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryFs {
    files: std::collections::HashMap<std::path::PathBuf, String>,
}

#[cfg(test)]
impl MemoryFs {
    pub(crate) fn with(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.into(), content.to_string());
        self
    }
}

#[cfg(test)]
impl FileSystem for MemoryFs {
    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }
}
