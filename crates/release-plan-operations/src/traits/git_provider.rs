use std::path::{Path, PathBuf};

use crate::Result;

pub trait GitProvider: Send + Sync {
    /// Absolute paths of files changed between `tag` and `HEAD`; `None` if
    /// the tag does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or the diff fails.
    fn changed_files_since(&self, project_root: &Path, tag: &str) -> Result<Option<Vec<PathBuf>>>;
}
