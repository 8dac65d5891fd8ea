use std::path::{Path, PathBuf};

use release_plan_core::VersionSpecifier;
use release_plan_project::ProjectKind;
use release_plan_spec::{TemplateOptions, generate_template};
use tracing::{info, info_span};

use super::project_builder::{ProjectBuilder, ProjectContext};
use super::release_executor::{ReleaseExecutor, ReleaseOutcome};
use super::release_validator::ReleaseValidator;
use crate::Result;
use crate::error::OperationError;
use crate::traits::{
    ChangelogWriter, DocumentEditor, GitProvider, ManifestWriter, ProjectProvider,
    ReleaseConfirmation, SpecificationStore,
};

#[derive(Debug, Clone, Default)]
pub struct PrepareInput {
    /// Open the document in an editor when one is available.
    pub edit: bool,
    /// The release of a single-package project, which has no document.
    pub root_bump: Option<VersionSpecifier>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrepareOutcome {
    /// The document was written and waits for the user; run `apply` next.
    AwaitingEdit(PathBuf),
    Finished(ReleaseOutcome),
}

pub struct PrepareOperation<P, G, S, E, M, C, K> {
    builder: ProjectBuilder<P, G>,
    editor: E,
    executor: ReleaseExecutor<S, M, C, K>,
}

impl<P, G, S, E, M, C, K> PrepareOperation<P, G, S, E, M, C, K>
where
    P: ProjectProvider,
    G: GitProvider,
    S: SpecificationStore,
    E: DocumentEditor,
    M: ManifestWriter,
    C: ChangelogWriter,
    K: ReleaseConfirmation,
{
    pub fn new(
        project_provider: P,
        git_provider: G,
        store: S,
        editor: E,
        manifest_writer: M,
        changelog_writer: C,
        confirmation: K,
    ) -> Self {
        Self {
            builder: ProjectBuilder::new(project_provider, git_provider),
            editor,
            executor: ReleaseExecutor::new(store, manifest_writer, changelog_writer, confirmation),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the project cannot be built, no package changed,
    /// the editor fails, or the edited document is malformed or invalid.
    pub fn execute(&self, start_path: &Path, input: &PrepareInput) -> Result<PrepareOutcome> {
        let context = self.builder.build(start_path)?;

        let span = info_span!("prepare", root = %context.project.root().display());
        let _guard = span.enter();

        if context.project.kind() == ProjectKind::SinglePackage {
            return self.prepare_single_package(&context, input);
        }
        if input.root_bump.is_some() {
            return Err(OperationError::RootBumpNotApplicable(
                context.project.root().to_path_buf(),
            ));
        }

        let path = context.spec_path();
        let editing = input.edit && self.editor.is_available();

        if self.executor.store().exists(&path) {
            info!(path = %path.display(), "reusing existing release specification");
        } else {
            let template = generate_template(
                context.project.changed_packages().map(|p| p.name.as_str()),
                &TemplateOptions {
                    editor_available: editing,
                },
            )?;
            self.executor.store().write(&path, &template)?;
            info!(path = %path.display(), "wrote release specification template");
        }

        if !editing {
            return Ok(PrepareOutcome::AwaitingEdit(path));
        }

        self.editor.edit(&path)?;

        self.executor
            .release_document(&context, &path, input.dry_run)
            .map(PrepareOutcome::Finished)
    }

    fn prepare_single_package(
        &self,
        context: &ProjectContext,
        input: &PrepareInput,
    ) -> Result<PrepareOutcome> {
        let root = context.project.root().to_path_buf();
        let Some(package) = context.project.root_package() else {
            return Err(OperationError::RootBumpNotApplicable(root));
        };
        let Some(bump) = &input.root_bump else {
            return Err(OperationError::RootBumpRequired);
        };

        if !package.has_changes_since_latest_release {
            info!(package = %package.name, "no changes since latest release");
        }

        let spec =
            ReleaseValidator::validate_root_bump(package, bump, &context.manifest_path(package))?;

        self.executor
            .release(context, &spec, None, input.dry_run)
            .map(PrepareOutcome::Finished)
    }
}
