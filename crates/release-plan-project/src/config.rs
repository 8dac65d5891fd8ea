use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use semver::Version;
use serde::Deserialize;

use crate::error::ProjectError;
use crate::manifest::{ManifestFormat, ReleasePlanMetadata, read_cargo_manifest, read_npm_manifest};
use crate::workspace::{DiscoveredWorkspace, ProjectKind};

/// How the tag marking a package's latest release is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagFormat {
    #[default]
    VersionOnly,
    CratePrefixed,
}

impl TagFormat {
    #[must_use]
    pub fn tag_name(self, package_name: &str, version: &Version) -> String {
        match self {
            Self::VersionOnly => format!("v{version}"),
            Self::CratePrefixed => format!("{package_name}-v{version}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReleasePlanConfig {
    ignored_files: GlobSet,
    tag_format: TagFormat,
    spec_dir: PathBuf,
    update_changelogs: bool,
}

impl Default for ReleasePlanConfig {
    fn default() -> Self {
        Self {
            ignored_files: GlobSet::empty(),
            tag_format: TagFormat::default(),
            spec_dir: PathBuf::from(crate::DEFAULT_SPEC_DIR),
            update_changelogs: true,
        }
    }
}

impl ReleasePlanConfig {
    #[must_use]
    pub fn ignored_files(&self) -> &GlobSet {
        &self.ignored_files
    }

    /// `path` is relative to the project root.
    #[must_use]
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.ignored_files.is_match(path)
    }

    #[must_use]
    pub fn tag_format(&self) -> TagFormat {
        self.tag_format
    }

    #[must_use]
    pub fn spec_dir(&self) -> &Path {
        &self.spec_dir
    }

    #[must_use]
    pub fn spec_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.spec_dir).join(crate::SPEC_FILE_NAME)
    }

    #[must_use]
    pub fn update_changelogs(&self) -> bool {
        self.update_changelogs
    }

    #[must_use]
    pub fn with_tag_format(mut self, tag_format: TagFormat) -> Self {
        self.tag_format = tag_format;
        self
    }

    /// `spec_dir` is relative to the project root.
    #[must_use]
    pub fn with_spec_dir(mut self, spec_dir: impl Into<PathBuf>) -> Self {
        self.spec_dir = spec_dir.into();
        self
    }

    #[must_use]
    pub fn with_changelog_updates(mut self, enabled: bool) -> Self {
        self.update_changelogs = enabled;
        self
    }

    /// # Errors
    ///
    /// Returns `ProjectError::GlobPattern` if any pattern is invalid.
    pub fn with_ignored_files(mut self, patterns: &[String]) -> Result<Self, ProjectError> {
        self.ignored_files = build_glob_set(patterns)?;
        Ok(self)
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet, ProjectError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ProjectError::GlobPattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ProjectError::GlobPattern {
        pattern: patterns.join(", "),
        source,
    })
}

fn config_from_metadata(
    metadata: Option<ReleasePlanMetadata>,
) -> Result<ReleasePlanConfig, ProjectError> {
    let defaults = ReleasePlanConfig::default();
    let Some(metadata) = metadata else {
        return Ok(defaults);
    };

    Ok(ReleasePlanConfig {
        ignored_files: build_glob_set(&metadata.ignored_files)?,
        tag_format: metadata.tag_format.unwrap_or(defaults.tag_format),
        spec_dir: metadata
            .spec_dir
            .map_or(defaults.spec_dir, PathBuf::from),
        update_changelogs: metadata.changelog.unwrap_or(defaults.update_changelogs),
    })
}

/// Loads the release-plan settings from the root manifest.
///
/// Cargo workspaces read `[workspace.metadata.release-plan]`, single Cargo
/// packages read `[package.metadata.release-plan]`, npm projects read the
/// `"release-plan"` key of the root `package.json`.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed, or if glob patterns are invalid.
pub fn load_config(workspace: &DiscoveredWorkspace) -> Result<ReleasePlanConfig, ProjectError> {
    let manifest_path = workspace.format.manifest_path(&workspace.root);

    let metadata = match workspace.format {
        ManifestFormat::Cargo => {
            let manifest = read_cargo_manifest(&manifest_path)?;
            match workspace.kind {
                ProjectKind::SinglePackage => manifest.package.and_then(|pkg| pkg.metadata),
                ProjectKind::VirtualWorkspace | ProjectKind::WorkspaceWithRoot => {
                    manifest.workspace.and_then(|ws| ws.metadata)
                }
            }
            .and_then(|meta| meta.release_plan)
        }
        ManifestFormat::Npm => read_npm_manifest(&manifest_path)?.release_plan,
    };

    config_from_metadata(metadata)
}
