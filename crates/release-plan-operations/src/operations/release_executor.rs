use std::path::Path;

use release_plan_spec::parse_document;
use tracing::info;

use super::plan_applier::{AppliedRelease, PlanApplier};
use super::project_builder::ProjectContext;
use super::release_validator::{ReleaseSpecification, ReleaseValidator};
use super::version_planner::{ResolvedPlan, VersionPlanner};
use crate::Result;
use crate::error::OperationError;
use crate::traits::{ChangelogWriter, ManifestWriter, ReleaseConfirmation, SpecificationStore};

/// How a release run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The plan was resolved but nothing was written.
    DryRun(ResolvedPlan),
    Applied(AppliedRelease),
    /// The user turned the plan down; the document is kept.
    Declined(ResolvedPlan),
    /// Every entry was left as `null` or skipped.
    NothingToRelease,
}

/// Takes an edited document, or a ready specification, through validation,
/// resolution, confirmation and application.
pub(crate) struct ReleaseExecutor<S, M, C, K> {
    store: S,
    applier: PlanApplier<M, C>,
    confirmation: K,
}

impl<S, M, C, K> ReleaseExecutor<S, M, C, K>
where
    S: SpecificationStore,
    M: ManifestWriter,
    C: ChangelogWriter,
    K: ReleaseConfirmation,
{
    pub(crate) fn new(store: S, manifest_writer: M, changelog_writer: C, confirmation: K) -> Self {
        Self {
            store,
            applier: PlanApplier::new(manifest_writer, changelog_writer),
            confirmation,
        }
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    /// A malformed or invalid document is left on disk for the user to fix.
    pub(crate) fn release_document(
        &self,
        context: &ProjectContext,
        path: &Path,
        dry_run: bool,
    ) -> Result<ReleaseOutcome> {
        let text = self.store.read(path)?;
        let document =
            parse_document(&text).map_err(|source| OperationError::MalformedDocument {
                path: path.to_path_buf(),
                source,
            })?;
        let spec = ReleaseValidator::validate(&context.project, &document, path)?;

        self.release(context, &spec, Some(path), dry_run)
    }

    pub(crate) fn release(
        &self,
        context: &ProjectContext,
        spec: &ReleaseSpecification,
        document: Option<&Path>,
        dry_run: bool,
    ) -> Result<ReleaseOutcome> {
        let plan = VersionPlanner::resolve(context, spec)?;

        if plan.is_empty() {
            info!("no package selected for release");
            if !dry_run {
                self.remove_document(document)?;
            }
            return Ok(ReleaseOutcome::NothingToRelease);
        }

        if dry_run {
            return Ok(ReleaseOutcome::DryRun(plan));
        }

        if !self.confirmation.confirm(&plan)? {
            info!("release declined");
            return Ok(ReleaseOutcome::Declined(plan));
        }

        let applied = self.applier.apply(context, plan)?;
        self.remove_document(document)?;
        info!(
            packages = applied.plan.releases.len(),
            "release applied"
        );

        Ok(ReleaseOutcome::Applied(applied))
    }

    fn remove_document(&self, document: Option<&Path>) -> Result<()> {
        match document {
            Some(path) => self.store.remove(path),
            None => Ok(()),
        }
    }
}
