use std::path::Path;

use release_plan_project::{DiscoveredWorkspace, ReleasePlanConfig, discover_workspace, load_config};

use crate::Result;
use crate::traits::ProjectProvider;

pub struct FileSystemProjectProvider;

impl FileSystemProjectProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemProjectProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectProvider for FileSystemProjectProvider {
    fn discover_workspace(&self, start_path: &Path) -> Result<DiscoveredWorkspace> {
        Ok(discover_workspace(start_path)?)
    }

    fn load_config(&self, workspace: &DiscoveredWorkspace) -> Result<ReleasePlanConfig> {
        Ok(load_config(workspace)?)
    }
}
