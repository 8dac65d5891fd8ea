use std::path::PathBuf;

use thiserror::Error;

use crate::operations::ReleaseSpecificationError;

/// A child process that could not be started or did not exit cleanly.
#[derive(Debug, Error)]
pub enum SubprocessError {
    #[error("failed to start '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with code {code}{}", stderr_suffix(stderr))]
    Exited {
        program: String,
        code: i32,
        stderr: String,
    },

    #[error("'{program}' was terminated by a signal")]
    Terminated { program: String },
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Core(#[from] release_plan_core::CoreError),

    #[error(transparent)]
    Project(#[from] release_plan_project::ProjectError),

    #[error(transparent)]
    Git(#[from] release_plan_git::GitError),

    #[error(transparent)]
    Manifest(#[from] release_plan_manifest::ManifestError),

    #[error(transparent)]
    Template(#[from] release_plan_spec::TemplateError),

    #[error("release specification at '{path}' is malformed; fix it and run `cargo release-plan apply`")]
    MalformedDocument {
        path: PathBuf,
        #[source]
        source: release_plan_spec::DocumentError,
    },

    #[error(transparent)]
    Validation(#[from] ReleaseSpecificationError),

    #[error("{context}")]
    Subprocess {
        context: String,
        #[source]
        source: SubprocessError,
    },

    #[error("no editor configured; set $VISUAL or $EDITOR, or pass --editor")]
    EditorUnavailable,

    #[error("no release specification found at '{path}'; run `cargo release-plan prepare` first")]
    SpecificationMissing { path: PathBuf },

    #[error("failed to read release specification at '{path}'")]
    SpecificationRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write release specification at '{path}'")]
    SpecificationWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove release specification at '{path}'")]
    SpecificationRemove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to update changelog at '{path}'")]
    Changelog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("single-package projects need a version: pass --bump <major|minor|patch|X.Y.Z>")]
    RootBumpRequired,

    #[error("--bump only applies to single-package projects; this is a workspace at '{0}'")]
    RootBumpNotApplicable(PathBuf),

    #[error("package '{0}' is not part of this project")]
    UnknownPackage(String),

    #[error("confirmation required but no terminal is attached; pass --yes to release")]
    ConfirmationRequired,

    #[error("failed to read confirmation")]
    Prompt(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OperationError>;
