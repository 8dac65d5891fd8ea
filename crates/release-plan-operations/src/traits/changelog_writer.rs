use std::path::{Path, PathBuf};

use semver::Version;

use crate::Result;

pub trait ChangelogWriter: Send + Sync {
    /// Records `version` as released in the changelog of the package at
    /// `package_dir`. Returns the changelog path if it changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the changelog cannot be read or written.
    fn write_release(&self, package_dir: &Path, version: &Version) -> Result<Option<PathBuf>>;
}
