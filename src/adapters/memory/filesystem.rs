//! In-memory adapter for the `FileSystem` port.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::ports::filesystem::FileSystem;

/// Filesystem held entirely in memory.
///
/// Paths are compared verbatim; directories exist implicitly whenever a file
/// lives beneath them.
#[derive(Default)]
pub struct MemoryFileSystem {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    /// Creates an empty in-memory filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the paths of all stored files in sorted order.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.lock().expect("memory fs lock poisoned").keys().cloned().collect()
    }

    /// Returns the contents of a stored file, if any.
    #[must_use]
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files.lock().expect("memory fs lock poisoned").get(path).cloned()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.contents(path).ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut files = self.files.lock().expect("memory fs lock poisoned");
        files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().expect("memory fs lock poisoned");
        files.contains_key(path) || files.keys().any(|k| k.starts_with(path) && k != path)
    }

    fn remove_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.files.lock().expect("memory fs lock poisoned").remove(path);
        Ok(())
    }
}
