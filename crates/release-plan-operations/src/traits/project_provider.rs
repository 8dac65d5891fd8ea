use std::path::Path;

use release_plan_project::{DiscoveredWorkspace, ReleasePlanConfig};

use crate::Result;

pub trait ProjectProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if no project can be found from the given path or a
    /// manifest is invalid.
    fn discover_workspace(&self, start_path: &Path) -> Result<DiscoveredWorkspace>;

    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    fn load_config(&self, workspace: &DiscoveredWorkspace) -> Result<ReleasePlanConfig>;
}
