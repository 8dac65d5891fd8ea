use std::path::Path;

use release_plan_core::Package;

use super::project_builder::ProjectBuilder;
use crate::Result;
use crate::traits::{GitProvider, ProjectProvider};

pub struct ChangedOutput {
    pub changed: Vec<Package>,
    pub unchanged: Vec<Package>,
}

/// Lists packages by whether anything changed since their latest release.
pub struct ChangedOperation<P, G> {
    builder: ProjectBuilder<P, G>,
}

impl<P, G> ChangedOperation<P, G>
where
    P: ProjectProvider,
    G: GitProvider,
{
    pub fn new(project_provider: P, git_provider: G) -> Self {
        Self {
            builder: ProjectBuilder::new(project_provider, git_provider),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the project cannot be discovered or git cannot be
    /// queried.
    pub fn execute(&self, start_path: &Path) -> Result<ChangedOutput> {
        let context = self.builder.build(start_path)?;

        let (changed, unchanged) = context
            .all_packages()
            .cloned()
            .partition(|package| package.has_changes_since_latest_release);

        Ok(ChangedOutput { changed, unchanged })
    }
}
