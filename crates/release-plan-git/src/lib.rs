mod error;
mod repository;
mod types;

pub use error::GitError;
pub use repository::Repository;
pub use types::{FileChange, FileStatus};

use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, GitError>;

/// Absolute paths of files that differ between `tag` and `HEAD`, or `None`
/// when the tag does not exist.
///
/// # Errors
///
/// Returns an error if the path is not a git repository or the diff fails.
pub fn changed_files_since(path: &Path, tag: &str) -> Result<Option<Vec<PathBuf>>> {
    let repo = Repository::open(path)?;
    let Some(changes) = repo.changed_files_since_tag(tag)? else {
        return Ok(None);
    };

    Ok(Some(
        changes
            .iter()
            .flat_map(FileChange::paths)
            .map(|relative| repo.root().join(relative))
            .collect(),
    ))
}
