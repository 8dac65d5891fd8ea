use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use release_plan_project::{
    DiscoveredWorkspace, ManifestFormat, PackageManifest, ProjectKind, ReleasePlanConfig,
};
use semver::Version;

use crate::error::OperationError;
use crate::operations::ResolvedPlan;
use crate::traits::{
    ChangelogWriter, DocumentEditor, GitProvider, ManifestWriter, ProcessOutput, ProcessRunner,
    ProjectProvider, ReleaseConfirmation, SpecificationStore,
};
use crate::{Result, SubprocessError};

pub const MOCK_ROOT: &str = "/mock/project";

/// # Panics
///
/// Panics if the version string is not valid semver.
#[must_use]
pub fn manifest(name: &str, version: &str, path: impl Into<PathBuf>) -> PackageManifest {
    PackageManifest {
        name: name.to_string(),
        version: version.parse().expect("valid version"),
        path: path.into(),
        format: ManifestFormat::Cargo,
        dependencies: IndexMap::new(),
        peer_dependencies: IndexMap::new(),
    }
}

#[must_use]
pub fn member(name: &str, version: &str) -> PackageManifest {
    manifest(name, version, Path::new(MOCK_ROOT).join("crates").join(name))
}

#[must_use]
pub fn depending_on(mut package: PackageManifest, dependencies: &[&str]) -> PackageManifest {
    for dependency in dependencies {
        package
            .dependencies
            .insert((*dependency).to_string(), "1.0.0".to_string());
    }
    package
}

#[must_use]
pub fn peer_depending_on(mut package: PackageManifest, peers: &[&str]) -> PackageManifest {
    for peer in peers {
        package
            .peer_dependencies
            .insert((*peer).to_string(), "^1.0.0".to_string());
    }
    package
}

pub struct MockProjectProvider {
    workspace: DiscoveredWorkspace,
    config: ReleasePlanConfig,
}

impl MockProjectProvider {
    #[must_use]
    pub fn new(workspace: DiscoveredWorkspace) -> Self {
        Self {
            workspace,
            config: ReleasePlanConfig::default(),
        }
    }

    #[must_use]
    pub fn workspace(members: Vec<PackageManifest>) -> Self {
        Self::new(DiscoveredWorkspace {
            root: PathBuf::from(MOCK_ROOT),
            kind: ProjectKind::VirtualWorkspace,
            format: ManifestFormat::Cargo,
            root_package: None,
            members,
        })
    }

    #[must_use]
    pub fn single_package(name: &str, version: &str) -> Self {
        Self::new(DiscoveredWorkspace {
            root: PathBuf::from(MOCK_ROOT),
            kind: ProjectKind::SinglePackage,
            format: ManifestFormat::Cargo,
            root_package: Some(manifest(name, version, MOCK_ROOT)),
            members: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_config(mut self, config: ReleasePlanConfig) -> Self {
        self.config = config;
        self
    }
}

impl ProjectProvider for MockProjectProvider {
    fn discover_workspace(&self, _start_path: &Path) -> Result<DiscoveredWorkspace> {
        Ok(self.workspace.clone())
    }

    fn load_config(&self, _workspace: &DiscoveredWorkspace) -> Result<ReleasePlanConfig> {
        Ok(self.config.clone())
    }
}

/// Tags not registered here do not exist.
#[derive(Clone, Default)]
pub struct MockGitProvider {
    tags: Arc<Mutex<HashMap<String, Vec<PathBuf>>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockGitProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `tag` with files (relative to the mock root) changed since it.
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[must_use]
    pub fn with_tag(self, tag: &str, changed: &[&str]) -> Self {
        let files = changed
            .iter()
            .map(|file| Path::new(MOCK_ROOT).join(file))
            .collect();
        self.tags
            .lock()
            .expect("lock poisoned")
            .insert(tag.to_string(), files);
        self
    }

    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("lock poisoned").clone()
    }
}

impl GitProvider for MockGitProvider {
    fn changed_files_since(&self, _project_root: &Path, tag: &str) -> Result<Option<Vec<PathBuf>>> {
        self.queries
            .lock()
            .expect("lock poisoned")
            .push(tag.to_string());
        Ok(self.tags.lock().expect("lock poisoned").get(tag).cloned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCall {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub attached: bool,
}

#[derive(Clone, Default)]
pub struct MockProcessRunner {
    output: ProcessOutput,
    failure: Arc<Mutex<Option<SubprocessError>>>,
    calls: Arc<Mutex<Vec<ProcessCall>>>,
}

impl MockProcessRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_output(mut self, output: ProcessOutput) -> Self {
        self.output = output;
        self
    }

    /// The next call fails with `error`.
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[must_use]
    pub fn failing_with(self, error: SubprocessError) -> Self {
        *self.failure.lock().expect("lock poisoned") = Some(error);
        self
    }

    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<ProcessCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    fn record(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
        attached: bool,
    ) -> std::result::Result<(), SubprocessError> {
        self.calls.lock().expect("lock poisoned").push(ProcessCall {
            program: program.to_string(),
            args: args.to_vec(),
            cwd: cwd.to_path_buf(),
            attached,
        });
        match self.failure.lock().expect("lock poisoned").take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl ProcessRunner for MockProcessRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> std::result::Result<ProcessOutput, SubprocessError> {
        self.record(program, args, cwd, false)?;
        Ok(self.output.clone())
    }

    fn run_attached(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> std::result::Result<(), SubprocessError> {
        self.record(program, args, cwd, true)
    }
}

/// In-memory documents shared between clones.
#[derive(Clone, Default)]
pub struct MockSpecificationStore {
    documents: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl MockSpecificationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[must_use]
    pub fn with_document(self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.documents
            .lock()
            .expect("lock poisoned")
            .insert(path.into(), content.to_string());
        self
    }

    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[must_use]
    pub fn document(&self, path: &Path) -> Option<String> {
        self.documents.lock().expect("lock poisoned").get(path).cloned()
    }
}

impl SpecificationStore for MockSpecificationStore {
    fn exists(&self, path: &Path) -> bool {
        self.document(path).is_some()
    }

    fn read(&self, path: &Path) -> Result<String> {
        self.document(path)
            .ok_or_else(|| OperationError::SpecificationRead {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.documents
            .lock()
            .expect("lock poisoned")
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        self.documents.lock().expect("lock poisoned").remove(path);
        Ok(())
    }
}

/// Stands in for the user: replaces the document with fixed content, or
/// with the result of a function of the generated template.
#[derive(Clone)]
pub struct MockDocumentEditor {
    store: MockSpecificationStore,
    available: bool,
    edit: Arc<dyn Fn(&str) -> String + Send + Sync>,
    opened: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockDocumentEditor {
    #[must_use]
    pub fn replacing_with(store: &MockSpecificationStore, content: &str) -> Self {
        let content = content.to_string();
        Self::editing_with(store, move |_| content.clone())
    }

    #[must_use]
    pub fn editing_with(
        store: &MockSpecificationStore,
        edit: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            store: store.clone(),
            available: true,
            edit: Arc::new(edit),
            opened: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[must_use]
    pub fn unavailable(store: &MockSpecificationStore) -> Self {
        Self {
            available: false,
            ..Self::replacing_with(store, "")
        }
    }

    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[must_use]
    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.lock().expect("lock poisoned").clone()
    }
}

impl DocumentEditor for MockDocumentEditor {
    fn is_available(&self) -> bool {
        self.available
    }

    fn edit(&self, path: &Path) -> Result<()> {
        if !self.available {
            return Err(OperationError::EditorUnavailable);
        }
        self.opened
            .lock()
            .expect("lock poisoned")
            .push(path.to_path_buf());
        let current = self.store.read(path)?;
        self.store.write(path, &(self.edit)(&current))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestCall {
    WriteVersion { path: PathBuf, version: Version },
    UpdateDependency {
        path: PathBuf,
        dependency: String,
        version: Version,
    },
}

/// Records writes; every dependency update reports a change.
#[derive(Clone, Default)]
pub struct MockManifestWriter {
    calls: Arc<Mutex<Vec<ManifestCall>>>,
}

impl MockManifestWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<ManifestCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    #[must_use]
    pub fn written_versions(&self) -> Vec<(PathBuf, Version)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ManifestCall::WriteVersion { path, version } => Some((path, version)),
                ManifestCall::UpdateDependency { .. } => None,
            })
            .collect()
    }
}

impl ManifestWriter for MockManifestWriter {
    fn write_version(&self, manifest_path: &Path, new_version: &Version) -> Result<()> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .push(ManifestCall::WriteVersion {
                path: manifest_path.to_path_buf(),
                version: new_version.clone(),
            });
        Ok(())
    }

    fn update_dependency(
        &self,
        manifest_path: &Path,
        dependency: &str,
        new_version: &Version,
    ) -> Result<bool> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .push(ManifestCall::UpdateDependency {
                path: manifest_path.to_path_buf(),
                dependency: dependency.to_string(),
                version: new_version.clone(),
            });
        Ok(true)
    }

    fn verify_version(&self, _manifest_path: &Path, _expected: &Version) -> Result<()> {
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockChangelogWriter {
    releases: Arc<Mutex<Vec<(PathBuf, Version)>>>,
}

impl MockChangelogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[must_use]
    pub fn releases(&self) -> Vec<(PathBuf, Version)> {
        self.releases.lock().expect("lock poisoned").clone()
    }
}

impl ChangelogWriter for MockChangelogWriter {
    fn write_release(&self, package_dir: &Path, version: &Version) -> Result<Option<PathBuf>> {
        self.releases
            .lock()
            .expect("lock poisoned")
            .push((package_dir.to_path_buf(), version.clone()));
        Ok(Some(package_dir.join("CHANGELOG.md")))
    }
}

#[derive(Clone)]
pub struct MockConfirmation {
    answer: bool,
    asked: Arc<Mutex<usize>>,
}

impl MockConfirmation {
    #[must_use]
    pub fn accepting() -> Self {
        Self {
            answer: true,
            asked: Arc::new(Mutex::new(0)),
        }
    }

    #[must_use]
    pub fn declining() -> Self {
        Self {
            answer: false,
            asked: Arc::new(Mutex::new(0)),
        }
    }

    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[must_use]
    pub fn times_asked(&self) -> usize {
        *self.asked.lock().expect("lock poisoned")
    }
}

impl ReleaseConfirmation for MockConfirmation {
    fn confirm(&self, _plan: &ResolvedPlan) -> Result<bool> {
        *self.asked.lock().expect("lock poisoned") += 1;
        Ok(self.answer)
    }
}
