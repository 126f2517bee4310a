//! Repository directory layout.

use crate::error::{Error, Result};
use crate::store::Store;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default repository directory name.
pub const DEFAULT_GIT_DIR: &str = ".git";

/// Contents written to `HEAD` on init.
pub const DEFAULT_HEAD: &str = "ref: refs/heads/main\n";

/// A repository directory holding `objects/`, `refs/` and `HEAD`.
#[derive(Debug, Clone)]
pub struct Repository {
    git_dir: PathBuf,
    store: Store,
}

impl Repository {
    /// Initialize a repository at the given path.
    ///
    /// Creates the directory structure:
    /// - `objects/` for storing objects
    /// - `refs/` for branch pointers
    /// - `HEAD` pointing at `refs/heads/main`
    ///
    /// Re-running on an existing repository keeps its objects and rewrites `HEAD`.
    pub fn init<P: AsRef<Path>>(git_dir: P) -> Result<Self> {
        let git_dir = git_dir.as_ref().to_path_buf();

        fs::create_dir_all(git_dir.join("objects"))?;
        fs::create_dir_all(git_dir.join("refs"))?;
        fs::write(git_dir.join("HEAD"), DEFAULT_HEAD)?;

        debug!(git_dir = %git_dir.display(), "initialized repository");
        Ok(Self::from_git_dir(git_dir))
    }

    /// Open an existing repository at the given path.
    pub fn open<P: AsRef<Path>>(git_dir: P) -> Result<Self> {
        let git_dir = git_dir.as_ref().to_path_buf();

        if !git_dir.is_dir() {
            return Err(Error::invalid_repository(
                &git_dir,
                "directory does not exist",
            ));
        }

        if !git_dir.join("objects").is_dir() {
            return Err(Error::invalid_repository(
                &git_dir,
                "objects directory missing",
            ));
        }

        Ok(Self::from_git_dir(git_dir))
    }

    fn from_git_dir(git_dir: PathBuf) -> Self {
        let store = Store::new(git_dir.join("objects"));
        Self { git_dir, store }
    }

    /// Get the repository directory.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Get the object store for this repository.
    pub fn objects(&self) -> &Store {
        &self.store
    }
}
