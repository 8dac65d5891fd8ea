mod cargo;
mod error;
mod npm;

use std::path::Path;

use semver::Version;

pub use error::ManifestError;

const NPM_MANIFEST: &str = "package.json";

const REQUIREMENT_OPERATORS: [&str; 4] = [">=", "^", "~", "="];

fn is_npm_manifest(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == NPM_MANIFEST)
}

/// Rewrites a version requirement to target `version`, keeping its leading
/// operator. Requirements that do not name a version (`*`, `workspace:^`,
/// tags, paths) are left alone.
pub(crate) fn rewrite_requirement(existing: &str, version: &Version) -> Option<String> {
    let existing = existing.trim();
    let operator = REQUIREMENT_OPERATORS
        .iter()
        .find(|op| existing.starts_with(**op))
        .copied()
        .unwrap_or("");

    let rest = existing[operator.len()..].trim_start();
    if !rest.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    Some(format!("{operator}{version}"))
}

/// Reads the package version from a `Cargo.toml` or `package.json`.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed, or has no valid version.
pub fn read_version(path: &Path) -> Result<Version, ManifestError> {
    if is_npm_manifest(path) {
        npm::read_version(path)
    } else {
        cargo::read_version(path)
    }
}

/// Sets the package version, preserving the rest of the file. An inherited
/// Cargo version (`version.workspace = true`) is replaced by a literal one.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read, parsed, or written.
pub fn write_version(path: &Path, version: &Version) -> Result<(), ManifestError> {
    if is_npm_manifest(path) {
        npm::write_version(path, version)
    } else {
        cargo::write_version(path, version)
    }
}

/// Points every requirement on `dependency` at `version`. Returns whether
/// the file changed.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read, parsed, or written.
pub fn update_dependency(
    path: &Path,
    dependency: &str,
    version: &Version,
) -> Result<bool, ManifestError> {
    if is_npm_manifest(path) {
        npm::update_dependency(path, dependency, version)
    } else {
        cargo::update_dependency(path, dependency, version)
    }
}

/// # Errors
///
/// Returns `ManifestError::VerificationFailed` if the version in the manifest
/// does not match the expected version.
pub fn verify_version(path: &Path, expected: &Version) -> Result<(), ManifestError> {
    let actual = read_version(path)?;

    if actual != *expected {
        return Err(ManifestError::VerificationFailed {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }

    Ok(())
}
