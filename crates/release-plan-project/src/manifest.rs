use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use release_plan_core::Package;
use semver::Version;
use serde::Deserialize;

use crate::error::ProjectError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Cargo,
    Npm,
}

impl ManifestFormat {
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Cargo => "Cargo.toml",
            Self::Npm => "package.json",
        }
    }

    #[must_use]
    pub fn manifest_path(self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

/// What a package declares about itself on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManifest {
    pub name: String,
    pub version: Version,
    pub path: PathBuf,
    pub format: ManifestFormat,
    pub dependencies: IndexMap<String, String>,
    pub peer_dependencies: IndexMap<String, String>,
}

impl PackageManifest {
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.format.manifest_path(&self.path)
    }

    #[must_use]
    pub fn into_package(self, has_changes_since_latest_release: bool) -> Package {
        Package {
            name: self.name,
            version: self.version,
            path: self.path,
            dependencies: self.dependencies,
            peer_dependencies: self.peer_dependencies,
            has_changes_since_latest_release,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CargoManifest {
    pub(crate) package: Option<CargoPackage>,
    pub(crate) workspace: Option<CargoWorkspace>,
    #[serde(default)]
    pub(crate) dependencies: IndexMap<String, CargoDependency>,
    #[serde(default, rename = "build-dependencies")]
    pub(crate) build_dependencies: IndexMap<String, CargoDependency>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CargoPackage {
    pub(crate) name: Option<String>,
    pub(crate) version: Option<VersionField>,
    pub(crate) metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum VersionField {
    Literal(String),
    Inherited(InheritedVersion),
}

#[derive(Debug, Deserialize)]
pub(crate) struct InheritedVersion {
    pub(crate) workspace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CargoDependency {
    Requirement(String),
    Detailed(DetailedDependency),
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetailedDependency {
    pub(crate) version: Option<String>,
    pub(crate) package: Option<String>,
    #[serde(default)]
    pub(crate) workspace: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CargoWorkspace {
    pub(crate) members: Option<Vec<String>>,
    pub(crate) exclude: Option<Vec<String>>,
    pub(crate) package: Option<WorkspacePackage>,
    pub(crate) metadata: Option<Metadata>,
    #[serde(default)]
    pub(crate) dependencies: IndexMap<String, CargoDependency>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkspacePackage {
    pub(crate) version: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct Metadata {
    #[serde(rename = "release-plan")]
    pub(crate) release_plan: Option<ReleasePlanMetadata>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct ReleasePlanMetadata {
    pub(crate) tag_format: Option<crate::config::TagFormat>,
    #[serde(default)]
    pub(crate) ignored_files: Vec<String>,
    pub(crate) spec_dir: Option<String>,
    pub(crate) changelog: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NpmManifest {
    pub(crate) name: Option<String>,
    pub(crate) version: Option<String>,
    #[serde(default)]
    pub(crate) dependencies: IndexMap<String, String>,
    #[serde(default)]
    pub(crate) peer_dependencies: IndexMap<String, String>,
    pub(crate) workspaces: Option<NpmWorkspaces>,
    #[serde(rename = "release-plan")]
    pub(crate) release_plan: Option<ReleasePlanMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum NpmWorkspaces {
    Patterns(Vec<String>),
    Detailed { packages: Vec<String> },
}

impl NpmWorkspaces {
    pub(crate) fn patterns(&self) -> &[String] {
        match self {
            Self::Patterns(patterns) | Self::Detailed { packages: patterns } => patterns,
        }
    }
}

fn read_to_string(path: &Path) -> Result<String, ProjectError> {
    std::fs::read_to_string(path).map_err(|source| ProjectError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn read_cargo_manifest(path: &Path) -> Result<CargoManifest, ProjectError> {
    let content = read_to_string(path)?;
    toml::from_str(&content).map_err(|source| ProjectError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn read_npm_manifest(path: &Path) -> Result<NpmManifest, ProjectError> {
    let content = read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| ProjectError::JsonManifestParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the manifest of the package in `dir`, preferring `Cargo.toml`.
///
/// # Errors
///
/// Returns `ProjectError` if no manifest exists, it cannot be parsed, or it
/// lacks a name or a valid version.
pub fn read_package_manifest(dir: &Path) -> Result<PackageManifest, ProjectError> {
    let cargo_path = ManifestFormat::Cargo.manifest_path(dir);
    if cargo_path.exists() {
        let manifest = read_cargo_manifest(&cargo_path)?;
        return cargo_package(dir, &manifest, None, None);
    }

    let npm_path = ManifestFormat::Npm.manifest_path(dir);
    if npm_path.exists() {
        let manifest = read_npm_manifest(&npm_path)?;
        return npm_package(dir, manifest);
    }

    Err(ProjectError::MissingManifest {
        path: dir.to_path_buf(),
    })
}

/// Builds a package from a Cargo manifest. Workspace-level version and
/// dependency tables are consulted for inherited fields.
pub(crate) fn cargo_package(
    dir: &Path,
    manifest: &CargoManifest,
    workspace_version: Option<&str>,
    workspace_dependencies: Option<&IndexMap<String, CargoDependency>>,
) -> Result<PackageManifest, ProjectError> {
    let manifest_path = ManifestFormat::Cargo.manifest_path(dir);
    let package = manifest
        .package
        .as_ref()
        .ok_or_else(|| ProjectError::MissingField {
            path: manifest_path.clone(),
            field: "package",
        })?;

    let name = package
        .name
        .clone()
        .ok_or_else(|| ProjectError::MissingField {
            path: manifest_path.clone(),
            field: "package.name",
        })?;

    let version_str = match &package.version {
        Some(VersionField::Literal(v)) => v.clone(),
        Some(VersionField::Inherited(inherited)) if inherited.workspace => workspace_version
            .ok_or_else(|| ProjectError::MissingField {
                path: manifest_path.clone(),
                field: "workspace.package.version",
            })?
            .to_string(),
        Some(VersionField::Inherited(_)) | None => {
            return Err(ProjectError::MissingField {
                path: manifest_path,
                field: "package.version",
            });
        }
    };
    let version = parse_version(&version_str, &manifest_path)?;

    let mut dependencies = IndexMap::new();
    for (key, dependency) in manifest
        .dependencies
        .iter()
        .chain(&manifest.build_dependencies)
    {
        let (dep_name, requirement) =
            resolve_cargo_dependency(key, dependency, workspace_dependencies);
        dependencies.entry(dep_name).or_insert(requirement);
    }

    Ok(PackageManifest {
        name,
        version,
        path: dir.to_path_buf(),
        format: ManifestFormat::Cargo,
        dependencies,
        peer_dependencies: IndexMap::new(),
    })
}

fn resolve_cargo_dependency(
    key: &str,
    dependency: &CargoDependency,
    workspace_dependencies: Option<&IndexMap<String, CargoDependency>>,
) -> (String, String) {
    match dependency {
        CargoDependency::Requirement(requirement) => (key.to_string(), requirement.clone()),
        CargoDependency::Detailed(detailed) if detailed.workspace => {
            match workspace_dependencies.and_then(|deps| deps.get(key)) {
                // Cargo rejects `workspace = true` inside `[workspace.dependencies]`,
                // so a nested lookup cannot recurse further.
                Some(inherited) => resolve_cargo_dependency(key, inherited, None),
                None => (key.to_string(), "*".to_string()),
            }
        }
        CargoDependency::Detailed(detailed) => (
            detailed.package.clone().unwrap_or_else(|| key.to_string()),
            detailed.version.clone().unwrap_or_else(|| "*".to_string()),
        ),
    }
}

pub(crate) fn npm_package(dir: &Path, manifest: NpmManifest) -> Result<PackageManifest, ProjectError> {
    let manifest_path = ManifestFormat::Npm.manifest_path(dir);

    let name = manifest.name.ok_or_else(|| ProjectError::MissingField {
        path: manifest_path.clone(),
        field: "name",
    })?;
    let version_str = manifest.version.ok_or_else(|| ProjectError::MissingField {
        path: manifest_path.clone(),
        field: "version",
    })?;
    let version = parse_version(&version_str, &manifest_path)?;

    Ok(PackageManifest {
        name,
        version,
        path: dir.to_path_buf(),
        format: ManifestFormat::Npm,
        dependencies: manifest.dependencies,
        peer_dependencies: manifest.peer_dependencies,
    })
}

fn parse_version(version: &str, manifest_path: &Path) -> Result<Version, ProjectError> {
    version
        .parse()
        .map_err(|source| ProjectError::InvalidVersion {
            path: manifest_path.to_path_buf(),
            version: version.to_string(),
            source,
        })
}
