use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error(transparent)]
    Git(#[from] git2::Error),

    #[error("'{path}' is not inside a git work tree")]
    NotARepository { path: PathBuf },

    #[error("release tag '{tag}' does not point at a commit")]
    TagNotACommit { tag: String },

    #[error("HEAD does not point at a commit; commit something before releasing")]
    UnbornHead,

    #[error("git reported a change without a file path")]
    MissingDeltaPath,
}
