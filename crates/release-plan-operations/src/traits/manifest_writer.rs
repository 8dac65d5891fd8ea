use std::path::Path;

use semver::Version;

use crate::Result;

pub trait ManifestWriter: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or written.
    fn write_version(&self, manifest_path: &Path, new_version: &Version) -> Result<()>;

    /// Returns whether the manifest changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or written.
    fn update_dependency(
        &self,
        manifest_path: &Path,
        dependency: &str,
        new_version: &Version,
    ) -> Result<bool>;

    /// # Errors
    ///
    /// Returns an error if the version does not match the expected value.
    fn verify_version(&self, manifest_path: &Path, expected: &Version) -> Result<()>;
}
