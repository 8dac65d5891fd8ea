use std::path::PathBuf;

use tracing::{debug, info};

use super::project_builder::ProjectContext;
use super::version_planner::ResolvedPlan;
use crate::Result;
use crate::traits::{ChangelogWriter, ManifestWriter};

/// What was written while applying a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedRelease {
    pub plan: ResolvedPlan,
    /// Manifests whose version or dependency requirements changed.
    pub updated_manifests: Vec<PathBuf>,
    pub changelogs: Vec<PathBuf>,
}

/// Writes a resolved plan to disk: package versions, dependency requirements
/// on released packages, and changelog sections.
pub struct PlanApplier<M, C> {
    manifest_writer: M,
    changelog_writer: C,
}

impl<M, C> PlanApplier<M, C>
where
    M: ManifestWriter,
    C: ChangelogWriter,
{
    pub fn new(manifest_writer: M, changelog_writer: C) -> Self {
        Self {
            manifest_writer,
            changelog_writer,
        }
    }

    /// # Errors
    ///
    /// Returns an error if a manifest or changelog cannot be written, or if a
    /// written version does not read back as expected.
    pub fn apply(&self, context: &ProjectContext, plan: ResolvedPlan) -> Result<AppliedRelease> {
        let mut updated_manifests = Vec::new();
        let mut released_manifests = Vec::with_capacity(plan.releases.len());

        for release in &plan.releases {
            let manifest_path = context.format.manifest_path(&release.path);
            self.manifest_writer
                .write_version(&manifest_path, &release.new_version)?;
            info!(
                package = %release.name,
                from = %release.current_version,
                to = %release.new_version,
                "wrote new version"
            );
            released_manifests.push(manifest_path.clone());
            updated_manifests.push(manifest_path);
        }

        let mut targets: Vec<PathBuf> = context
            .all_packages()
            .map(|package| context.manifest_path(package))
            .collect();
        let root_manifest = context.root_manifest_path();
        if !targets.contains(&root_manifest) {
            targets.push(root_manifest);
        }

        for target in &targets {
            for (release, own_manifest) in plan.releases.iter().zip(&released_manifests) {
                if target == own_manifest {
                    continue;
                }
                let changed = self.manifest_writer.update_dependency(
                    target,
                    &release.name,
                    &release.new_version,
                )?;
                if changed {
                    debug!(manifest = %target.display(), dependency = %release.name, "updated requirement");
                    if !updated_manifests.contains(target) {
                        updated_manifests.push(target.clone());
                    }
                }
            }
        }

        let mut changelogs = Vec::new();
        if context.config.update_changelogs() {
            for release in &plan.releases {
                if let Some(path) = self
                    .changelog_writer
                    .write_release(&release.path, &release.new_version)?
                {
                    changelogs.push(path);
                }
            }
        }

        for (release, manifest_path) in plan.releases.iter().zip(&released_manifests) {
            self.manifest_writer
                .verify_version(manifest_path, &release.new_version)?;
        }

        Ok(AppliedRelease {
            plan,
            updated_manifests,
            changelogs,
        })
    }
}
