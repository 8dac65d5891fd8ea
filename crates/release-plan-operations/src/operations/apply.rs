use std::path::Path;

use tracing::info_span;

use super::project_builder::ProjectBuilder;
use super::release_executor::{ReleaseExecutor, ReleaseOutcome};
use crate::Result;
use crate::error::OperationError;
use crate::traits::{
    ChangelogWriter, GitProvider, ManifestWriter, ProjectProvider, ReleaseConfirmation,
    SpecificationStore,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyInput {
    pub dry_run: bool,
}

/// Releases according to a document the user edited outside of `prepare`.
pub struct ApplyOperation<P, G, S, M, C, K> {
    builder: ProjectBuilder<P, G>,
    executor: ReleaseExecutor<S, M, C, K>,
}

impl<P, G, S, M, C, K> ApplyOperation<P, G, S, M, C, K>
where
    P: ProjectProvider,
    G: GitProvider,
    S: SpecificationStore,
    M: ManifestWriter,
    C: ChangelogWriter,
    K: ReleaseConfirmation,
{
    pub fn new(
        project_provider: P,
        git_provider: G,
        store: S,
        manifest_writer: M,
        changelog_writer: C,
        confirmation: K,
    ) -> Self {
        Self {
            builder: ProjectBuilder::new(project_provider, git_provider),
            executor: ReleaseExecutor::new(store, manifest_writer, changelog_writer, confirmation),
        }
    }

    /// # Errors
    ///
    /// Returns `OperationError::SpecificationMissing` if there is no document,
    /// or an error if it is malformed, invalid, or cannot be applied.
    pub fn execute(&self, start_path: &Path, input: ApplyInput) -> Result<ReleaseOutcome> {
        let context = self.builder.build(start_path)?;

        let span = info_span!("apply", root = %context.project.root().display());
        let _guard = span.enter();

        let path = context.spec_path();
        if !self.executor.store().exists(&path) {
            return Err(OperationError::SpecificationMissing { path });
        }

        self.executor
            .release_document(&context, &path, input.dry_run)
    }
}
