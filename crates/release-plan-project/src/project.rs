use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use release_plan_core::Package;

use crate::error::ProjectError;
use crate::workspace::ProjectKind;

/// Snapshot of a project's packages and the "depends on" graph between its
/// workspace packages.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    kind: ProjectKind,
    root_package: Option<Package>,
    workspace_packages: IndexMap<String, Package>,
    graph: DiGraph<String, ()>,
    nodes: HashMap<String, NodeIndex>,
}

impl Project {
    /// Builds the project and its dependency graph. Edges only connect
    /// workspace packages; dependencies on anything else are kept on the
    /// package but not graphed. Cycles are allowed.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::DuplicatePackage` if two workspace packages share a name.
    pub fn new(
        root: impl Into<PathBuf>,
        kind: ProjectKind,
        root_package: Option<Package>,
        packages: impl IntoIterator<Item = Package>,
    ) -> Result<Self, ProjectError> {
        let mut workspace_packages: IndexMap<String, Package> = IndexMap::new();
        for package in packages {
            if let Some(existing) = workspace_packages.get(&package.name) {
                return Err(ProjectError::DuplicatePackage {
                    name: package.name.clone(),
                    first: existing.path.clone(),
                    second: package.path,
                });
            }
            workspace_packages.insert(package.name.clone(), package);
        }

        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();
        for name in workspace_packages.keys() {
            nodes.insert(name.clone(), graph.add_node(name.clone()));
        }

        for package in workspace_packages.values() {
            let from = nodes[&package.name];
            for dependency in package.dependency_names() {
                if let Some(&to) = nodes.get(dependency) {
                    if !graph.contains_edge(from, to) {
                        graph.add_edge(from, to, ());
                    }
                }
            }
        }

        Ok(Self {
            root: root.into(),
            kind,
            root_package,
            workspace_packages,
            graph,
            nodes,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn kind(&self) -> ProjectKind {
        self.kind
    }

    #[must_use]
    pub fn root_package(&self) -> Option<&Package> {
        self.root_package.as_ref()
    }

    #[must_use]
    pub fn workspace_packages(&self) -> &IndexMap<String, Package> {
        &self.workspace_packages
    }

    #[must_use]
    pub fn package(&self, name: &str) -> Option<&Package> {
        self.workspace_packages.get(name)
    }

    pub fn changed_packages(&self) -> impl Iterator<Item = &Package> {
        self.workspace_packages
            .values()
            .filter(|pkg| pkg.has_changes_since_latest_release)
    }

    /// Other workspace packages that depend (normally or as a peer) on `name`,
    /// in workspace order.
    #[must_use]
    pub fn dependents_of(&self, name: &str) -> Vec<&Package> {
        self.neighbors(name, Direction::Incoming)
    }

    /// Workspace packages that `name` depends on (normally or as a peer), in
    /// workspace order.
    #[must_use]
    pub fn workspace_dependencies_of(&self, name: &str) -> Vec<&Package> {
        self.neighbors(name, Direction::Outgoing)
    }

    fn neighbors(&self, name: &str, direction: Direction) -> Vec<&Package> {
        let Some(&node) = self.nodes.get(name) else {
            return Vec::new();
        };

        let mut neighbors: Vec<(usize, &Package)> = self
            .graph
            .neighbors_directed(node, direction)
            .filter(|&other| other != node)
            .filter_map(|other| self.workspace_packages.get_full(&self.graph[other]))
            .map(|(index, _, package)| (index, package))
            .collect();

        neighbors.sort_by_key(|(index, _)| *index);
        neighbors.into_iter().map(|(_, package)| package).collect()
    }
}
