mod diff;
mod tag;

use std::path::{Path, PathBuf};

use crate::{GitError, Result};

/// A work tree opened from any path inside it.
pub struct Repository {
    pub(crate) inner: git2::Repository,
    root: PathBuf,
}

impl Repository {
    /// # Errors
    ///
    /// Returns [`GitError::NotARepository`] if no work tree contains `path`
    /// (bare repositories have none).
    pub fn open(path: &Path) -> Result<Self> {
        let not_a_repository = || GitError::NotARepository {
            path: path.to_path_buf(),
        };

        let inner = git2::Repository::discover(path).map_err(|_| not_a_repository())?;
        let root = inner
            .workdir()
            .map(|workdir| dunce::simplified(workdir).to_path_buf())
            .ok_or_else(not_a_repository)?;

        Ok(Self { inner, root })
    }

    /// The work tree root; changed paths are relative to it.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}
