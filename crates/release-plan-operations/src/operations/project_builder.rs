use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use release_plan_core::Package;
use release_plan_project::{
    ManifestFormat, PackageLocator, PackageManifest, Project, ReleasePlanConfig,
};
use tracing::{debug, info, info_span};

use crate::Result;
use crate::traits::{GitProvider, ProjectProvider};

/// A built project together with the settings it was built under.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub project: Project,
    pub config: ReleasePlanConfig,
    pub format: ManifestFormat,
}

impl ProjectContext {
    #[must_use]
    pub fn manifest_path(&self, package: &Package) -> PathBuf {
        self.format.manifest_path(&package.path)
    }

    #[must_use]
    pub fn root_manifest_path(&self) -> PathBuf {
        self.format.manifest_path(self.project.root())
    }

    /// Where the release specification document lives.
    #[must_use]
    pub fn spec_path(&self) -> PathBuf {
        self.config.spec_path(self.project.root())
    }

    /// Looks up a workspace package, then the root package.
    #[must_use]
    pub fn find_package(&self, name: &str) -> Option<&Package> {
        self.project.package(name).or_else(|| {
            self.project
                .root_package()
                .filter(|package| package.name == name)
        })
    }

    /// Every package with a manifest of its own: workspace packages plus a
    /// root package that is not also a member.
    pub fn all_packages(&self) -> impl Iterator<Item = &Package> {
        let extra_root = self
            .project
            .root_package()
            .filter(|root| self.project.package(&root.name).is_none());
        self.project.workspace_packages().values().chain(extra_root)
    }
}

/// Packages owning at least one changed file since a given tag; `None` when
/// the tag does not exist.
type ChangedOwners = Option<HashSet<String>>;

struct ChangeDetector<'a, G> {
    root: &'a Path,
    config: &'a ReleasePlanConfig,
    git_provider: &'a G,
    locator: PackageLocator,
    by_tag: HashMap<String, ChangedOwners>,
}

impl<G: GitProvider> ChangeDetector<'_, G> {
    fn has_changes(&mut self, manifest: &PackageManifest) -> Result<bool> {
        let tag = self
            .config
            .tag_format()
            .tag_name(&manifest.name, &manifest.version);

        if !self.by_tag.contains_key(&tag) {
            let owners = self.changed_owners(&tag)?;
            self.by_tag.insert(tag.clone(), owners);
        }

        let changed = match self.by_tag.get(&tag) {
            Some(Some(owners)) => owners.contains(&manifest.name),
            Some(None) | None => true,
        };

        debug!(package = %manifest.name, %tag, changed, "checked for changes since latest release");
        Ok(changed)
    }

    fn changed_owners(&self, tag: &str) -> Result<ChangedOwners> {
        let Some(files) = self.git_provider.changed_files_since(self.root, tag)? else {
            info!(%tag, "release tag not found; treating as unreleased");
            return Ok(None);
        };

        let owners = files
            .iter()
            .filter(|file| {
                let relative = file.strip_prefix(self.root).unwrap_or(file);
                !self.config.is_ignored(relative)
            })
            .filter_map(|file| self.locator.owner_of(file))
            .map(str::to_string)
            .collect();

        Ok(Some(owners))
    }
}

/// Discovers the project and works out which packages changed since their
/// latest release tag.
pub struct ProjectBuilder<P, G> {
    project_provider: P,
    git_provider: G,
}

impl<P, G> ProjectBuilder<P, G>
where
    P: ProjectProvider,
    G: GitProvider,
{
    pub fn new(project_provider: P, git_provider: G) -> Self {
        Self {
            project_provider,
            git_provider,
        }
    }

    /// # Errors
    ///
    /// Returns an error if discovery fails, configuration cannot be loaded,
    /// git cannot be queried, or two packages share a name.
    pub fn build(&self, start_path: &Path) -> Result<ProjectContext> {
        let workspace = self.project_provider.discover_workspace(start_path)?;
        let config = self.project_provider.load_config(&workspace)?;

        let span = info_span!("build_project", root = %workspace.root.display());
        let _guard = span.enter();

        let located = workspace
            .members
            .iter()
            .chain(workspace.root_package.as_ref())
            .map(|manifest| (manifest.name.as_str(), manifest.path.as_path()));
        let locator = PackageLocator::new(located);

        let mut detector = ChangeDetector {
            root: &workspace.root,
            config: &config,
            git_provider: &self.git_provider,
            locator,
            by_tag: HashMap::new(),
        };

        let mut members = Vec::with_capacity(workspace.members.len());
        for manifest in &workspace.members {
            let changed = detector.has_changes(manifest)?;
            members.push(manifest.clone().into_package(changed));
        }

        let root_package = match &workspace.root_package {
            Some(manifest) => {
                let changed = detector.has_changes(manifest)?;
                Some(manifest.clone().into_package(changed))
            }
            None => None,
        };

        let project = Project::new(&workspace.root, workspace.kind, root_package, members)?;

        info!(
            packages = project.workspace_packages().len(),
            changed = project.changed_packages().count(),
            "built project"
        );

        Ok(ProjectContext {
            project,
            config,
            format: workspace.format,
        })
    }
}
