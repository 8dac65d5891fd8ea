use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};

use crate::error::ProjectError;
use crate::manifest::{
    CargoManifest, ManifestFormat, NpmManifest, PackageManifest, cargo_package, npm_package,
    read_cargo_manifest, read_npm_manifest,
};

/// Directories never searched for workspace members.
const SKIPPED_DIRS: [&str; 2] = ["target", "node_modules"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    /// The root manifest only declares the workspace; its package (if any) is not released.
    VirtualWorkspace,
    /// The root package is itself a workspace member.
    WorkspaceWithRoot,
    SinglePackage,
}

/// Manifests found on disk, before any change detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredWorkspace {
    pub root: PathBuf,
    pub kind: ProjectKind,
    pub format: ManifestFormat,
    pub root_package: Option<PackageManifest>,
    /// Workspace members in discovery order. Includes the root package for
    /// [`ProjectKind::WorkspaceWithRoot`].
    pub members: Vec<PackageManifest>,
}

enum RootManifest {
    Cargo(CargoManifest),
    Npm(NpmManifest),
}

impl RootManifest {
    fn is_workspace(&self) -> bool {
        match self {
            Self::Cargo(manifest) => manifest.workspace.is_some(),
            Self::Npm(manifest) => manifest.workspaces.is_some(),
        }
    }
}

/// # Errors
///
/// Returns `ProjectError` if no project root can be found or if any manifest
/// is missing, malformed, or lacks a name or valid version.
pub fn discover_workspace(start_dir: &Path) -> Result<DiscoveredWorkspace, ProjectError> {
    let start_dir = start_dir
        .canonicalize()
        .map_err(|source| ProjectError::StartDir {
            path: start_dir.to_path_buf(),
            source,
        })?;

    let (root, manifest) = find_project_root(&start_dir)?;

    match manifest {
        RootManifest::Cargo(manifest) => collect_cargo_workspace(root, &manifest),
        RootManifest::Npm(manifest) => collect_npm_workspace(root, manifest),
    }
}

fn read_root_manifest(dir: &Path) -> Result<Option<RootManifest>, ProjectError> {
    let cargo_path = ManifestFormat::Cargo.manifest_path(dir);
    if cargo_path.exists() {
        return read_cargo_manifest(&cargo_path).map(|m| Some(RootManifest::Cargo(m)));
    }

    let npm_path = ManifestFormat::Npm.manifest_path(dir);
    if npm_path.exists() {
        return read_npm_manifest(&npm_path).map(|m| Some(RootManifest::Npm(m)));
    }

    Ok(None)
}

fn find_project_root(start_dir: &Path) -> Result<(PathBuf, RootManifest), ProjectError> {
    let mut current = start_dir.to_path_buf();
    let mut fallback_single_package: Option<(PathBuf, RootManifest)> = None;

    loop {
        if let Some(manifest) = read_root_manifest(&current)? {
            if manifest.is_workspace() {
                return Ok((current, manifest));
            }

            if fallback_single_package.is_none() {
                fallback_single_package = Some((current.clone(), manifest));
            }
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => {
                return fallback_single_package.ok_or_else(|| ProjectError::NotFound {
                    start_dir: start_dir.to_path_buf(),
                });
            }
        }
    }
}

fn collect_cargo_workspace(
    root: PathBuf,
    manifest: &CargoManifest,
) -> Result<DiscoveredWorkspace, ProjectError> {
    let Some(workspace) = &manifest.workspace else {
        let package = cargo_package(&root, manifest, None, None)?;
        return Ok(DiscoveredWorkspace {
            root,
            kind: ProjectKind::SinglePackage,
            format: ManifestFormat::Cargo,
            root_package: Some(package),
            members: Vec::new(),
        });
    };

    let workspace_version = workspace
        .package
        .as_ref()
        .and_then(|pkg| pkg.version.as_deref());
    let workspace_dependencies = Some(&workspace.dependencies);

    let root_package = manifest
        .package
        .as_ref()
        .map(|_| cargo_package(&root, manifest, workspace_version, workspace_dependencies))
        .transpose()?;

    let mut members = Vec::new();
    if let Some(root_package) = &root_package {
        members.push(root_package.clone());
    }

    let patterns = workspace.members.as_deref().unwrap_or(&[]);
    let excludes = workspace.exclude.as_deref().unwrap_or(&[]);

    for member_dir in expand_member_patterns(&root, patterns, excludes)? {
        let member_manifest_path = ManifestFormat::Cargo.manifest_path(&member_dir);
        if !member_manifest_path.exists() {
            continue;
        }

        let member_manifest = read_cargo_manifest(&member_manifest_path)?;
        if member_manifest.package.is_none() {
            continue;
        }

        members.push(cargo_package(
            &member_dir,
            &member_manifest,
            workspace_version,
            workspace_dependencies,
        )?);
    }

    let kind = if root_package.is_some() {
        ProjectKind::WorkspaceWithRoot
    } else {
        ProjectKind::VirtualWorkspace
    };

    Ok(DiscoveredWorkspace {
        root,
        kind,
        format: ManifestFormat::Cargo,
        root_package,
        members,
    })
}

fn collect_npm_workspace(
    root: PathBuf,
    manifest: NpmManifest,
) -> Result<DiscoveredWorkspace, ProjectError> {
    let Some(workspaces) = &manifest.workspaces else {
        let package = npm_package(&root, manifest)?;
        return Ok(DiscoveredWorkspace {
            root,
            kind: ProjectKind::SinglePackage,
            format: ManifestFormat::Npm,
            root_package: Some(package),
            members: Vec::new(),
        });
    };

    let (excludes, patterns): (Vec<String>, Vec<String>) = workspaces
        .patterns()
        .iter()
        .cloned()
        .partition(|pattern| pattern.starts_with('!'));
    let excludes: Vec<String> = excludes
        .into_iter()
        .map(|pattern| pattern.trim_start_matches('!').to_string())
        .collect();

    let mut members = Vec::new();
    for member_dir in expand_member_patterns(&root, &patterns, &excludes)? {
        let member_manifest_path = ManifestFormat::Npm.manifest_path(&member_dir);
        if !member_manifest_path.exists() {
            continue;
        }
        let member_manifest = read_npm_manifest(&member_manifest_path)?;
        members.push(npm_package(&member_dir, member_manifest)?);
    }

    // A private monorepo root commonly has no version; it is never released.
    let root_is_package = manifest.name.is_some() && manifest.version.is_some();
    let root_package = if root_is_package {
        Some(npm_package(&root, manifest)?)
    } else {
        None
    };

    Ok(DiscoveredWorkspace {
        root,
        kind: ProjectKind::VirtualWorkspace,
        format: ManifestFormat::Npm,
        root_package,
        members,
    })
}

fn compile_glob(pattern: &str) -> Result<GlobMatcher, ProjectError> {
    let normalized = pattern.trim_start_matches("./").trim_end_matches('/');
    GlobBuilder::new(normalized)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| ProjectError::GlobPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Expands member patterns into a sorted, de-duplicated list of directories.
fn expand_member_patterns(
    root: &Path,
    patterns: &[String],
    excludes: &[String],
) -> Result<Vec<PathBuf>, ProjectError> {
    let globs = patterns
        .iter()
        .map(|pattern| compile_glob(pattern))
        .collect::<Result<Vec<_>, _>>()?;
    let exclude_matchers = excludes
        .iter()
        .map(|pattern| compile_glob(pattern))
        .collect::<Result<Vec<_>, _>>()?;

    let mut dirs = Vec::new();
    collect_matching_dirs(root, root, &globs, &exclude_matchers, &mut dirs)?;
    Ok(dirs)
}

fn collect_matching_dirs(
    base: &Path,
    current: &Path,
    globs: &[GlobMatcher],
    excludes: &[GlobMatcher],
    results: &mut Vec<PathBuf>,
) -> Result<(), ProjectError> {
    let read_error = |source| ProjectError::ReadDirectory {
        path: current.to_path_buf(),
        source,
    };
    let mut entries = std::fs::read_dir(current)
        .map_err(read_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error)?;
    entries.sort();

    for path in entries {
        if !path.is_dir() {
            continue;
        }

        let Some(dir_name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if dir_name.starts_with('.') || SKIPPED_DIRS.contains(&dir_name) {
            continue;
        }

        let relative = path.strip_prefix(base).unwrap_or(&path);

        if excludes.iter().any(|ex| ex.is_match(relative)) {
            continue;
        }

        if globs.iter().any(|glob| glob.is_match(relative)) {
            results.push(path.clone());
        }

        collect_matching_dirs(base, &path, globs, excludes, results)?;
    }

    Ok(())
}
