use std::path::Path;

use semver::Version;

use crate::Result;
use crate::traits::ManifestWriter;

pub struct FileSystemManifestWriter;

impl FileSystemManifestWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemManifestWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestWriter for FileSystemManifestWriter {
    fn write_version(&self, manifest_path: &Path, new_version: &Version) -> Result<()> {
        Ok(release_plan_manifest::write_version(
            manifest_path,
            new_version,
        )?)
    }

    fn update_dependency(
        &self,
        manifest_path: &Path,
        dependency: &str,
        new_version: &Version,
    ) -> Result<bool> {
        Ok(release_plan_manifest::update_dependency(
            manifest_path,
            dependency,
            new_version,
        )?)
    }

    fn verify_version(&self, manifest_path: &Path, expected: &Version) -> Result<()> {
        Ok(release_plan_manifest::verify_version(manifest_path, expected)?)
    }
}
