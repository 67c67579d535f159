//! Temporary files owned by a smoke-test run.
//!
//! Each type here removes what it owns when dropped, so teardown happens on
//! success, on a failed stage, and while unwinding from a panic.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Random bytes in a workspace name suffix.
const SUFFIX_BYTES: usize = 20;

/// A fresh hex suffix from the OS random source.
pub fn random_suffix() -> Result<String> {
    let mut bytes = [0u8; SUFFIX_BYTES];
    getrandom::getrandom(&mut bytes).map_err(|e| io::Error::other(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// A uniquely named directory, removed with everything in it on drop.
#[derive(Debug)]
pub struct TempWorkspace {
    path: PathBuf,
}

impl TempWorkspace {
    /// Create `<base>/<prefix><random hex>`.
    pub fn create(base: &Path, prefix: &str) -> Result<Self> {
        Self::create_with(base, prefix, random_suffix)
    }

    /// Create `<base>/<prefix><suffix>`, asking `suffix` for a new name
    /// until one is free.
    pub fn create_with(
        base: &Path,
        prefix: &str,
        mut suffix: impl FnMut() -> Result<String>,
    ) -> Result<Self> {
        loop {
            let path = base.join(format!("{}{}", prefix, suffix()?));
            if path.symlink_metadata().is_ok() {
                tracing::debug!("{} already exists, picking another name", path.display());
                continue;
            }
            match fs::create_dir(&path) {
                Ok(()) => {
                    tracing::debug!("Created workspace {}", path.display());
                    return Ok(Self { path });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// The workspace directory.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempWorkspace {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_dir_all(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove {}: {}", self.path.display(), e);
            }
        }
    }
}

/// A file removed on drop, if `owned`.
///
/// Used for the packed artifact (always owned) and the user credential file
/// (owned only when this run wrote it).
#[derive(Debug)]
pub struct FileGuard {
    path: PathBuf,
    owned: bool,
}

impl FileGuard {
    /// Remove `path` on drop.
    pub fn owned(path: PathBuf) -> Self {
        Self { path, owned: true }
    }

    /// Remove `path` on drop only if `owned`.
    pub fn new(path: PathBuf, owned: bool) -> Self {
        Self { path, owned }
    }

    /// The guarded path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileGuard {
    fn drop(&mut self) {
        if !self.owned {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("Removed {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}
