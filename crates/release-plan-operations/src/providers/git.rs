use std::path::{Path, PathBuf};

use crate::Result;
use crate::traits::GitProvider;

pub struct Git2Provider;

impl Git2Provider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for Git2Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl GitProvider for Git2Provider {
    fn changed_files_since(&self, project_root: &Path, tag: &str) -> Result<Option<Vec<PathBuf>>> {
        Ok(release_plan_git::changed_files_since(project_root, tag)?)
    }
}
