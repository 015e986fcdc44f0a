use crudgen_core::{ErrorCode, GeneratorError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// The filesystem seam the generator writes through.
///
/// Injected into [`crate::Generator`] so generation logic never touches
/// `std::fs` directly; tests swap in [`MemoryFilesystem`].
pub trait Filesystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    fn read(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    fn remove(&self, path: &Path) -> Result<()>;

    /// Removes a directory created as a side effect of `write`, during
    /// rollback. Must refuse non-empty directories. Implementations without
    /// real directories can leave the default no-op.
    fn remove_dir(&self, path: &Path) -> Result<()> {
        let _ = path;
        Ok(())
    }
}

/// The real thing.
#[derive(Debug, Default)]
pub struct StdFilesystem;

impl Filesystem for StdFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|err| {
            GeneratorError::with_message(
                ErrorCode::ReadFailed,
                format!("failed to read `{}`: {err}", path.display()),
            )
        })
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(std::fs::write(path, content)?)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        Ok(std::fs::remove_file(path)?)
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        // remove_dir errors on non-empty directories, which is exactly the
        // guard rollback relies on.
        Ok(std::fs::remove_dir(path)?)
    }
}

/// In-memory filesystem used by tests, so generation tests never touch disk.
#[derive(Debug, Default)]
pub struct MemoryFilesystem {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a file, e.g. to simulate a pre-existing target.
    pub fn seed(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.lock().insert(path.into(), content.into());
    }

    /// Snapshot of all files, sorted by path.
    pub fn files(&self) -> Vec<(PathBuf, String)> {
        self.lock()
            .iter()
            .map(|(path, content)| (path.clone(), content.clone()))
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<PathBuf, String>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    fn read(&self, path: &Path) -> Result<String> {
        self.lock().get(path).cloned().ok_or_else(|| {
            GeneratorError::with_message(
                ErrorCode::ReadFailed,
                format!("failed to read `{}`: no such file", path.display()),
            )
        })
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.lock().insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        self.lock().remove(path);
        Ok(())
    }
}
