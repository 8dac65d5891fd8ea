use std::path::PathBuf;

use indexmap::IndexMap;
use release_plan_version::resolve_version;
use semver::Version;

use super::project_builder::ProjectContext;
use super::release_validator::ReleaseSpecification;
use crate::Result;
use crate::error::OperationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRelease {
    pub name: String,
    pub current_version: Version,
    pub new_version: Version,
    /// Package directory.
    pub path: PathBuf,
}

/// Concrete target versions, in specification order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPlan {
    pub releases: Vec<PlannedRelease>,
}

impl ResolvedPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    #[must_use]
    pub fn versions(&self) -> IndexMap<&str, &Version> {
        self.releases
            .iter()
            .map(|release| (release.name.as_str(), &release.new_version))
            .collect()
    }
}

pub struct VersionPlanner;

impl VersionPlanner {
    /// Turns each specifier into an absolute version. Pure; performs no I/O.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::UnknownPackage` if the specification names a
    /// package the project does not have, or `OperationError::Core` if a bump
    /// overflows a version component.
    pub fn resolve(context: &ProjectContext, spec: &ReleaseSpecification) -> Result<ResolvedPlan> {
        let releases = spec
            .packages
            .iter()
            .map(|(name, specifier)| {
                let package = context
                    .find_package(name)
                    .ok_or_else(|| OperationError::UnknownPackage(name.clone()))?;

                Ok(PlannedRelease {
                    name: name.clone(),
                    current_version: package.version.clone(),
                    new_version: resolve_version(&package.version, specifier)?,
                    path: package.path.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ResolvedPlan { releases })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::mocks::{MOCK_ROOT, member};
    use release_plan_core::{CoreError, VersionSpecifier};
    use release_plan_project::{ManifestFormat, Project, ProjectKind, ReleasePlanConfig};

    fn context(version: &str) -> ProjectContext {
        let project = Project::new(
            MOCK_ROOT,
            ProjectKind::VirtualWorkspace,
            None,
            vec![
                member("a", version).into_package(true),
                member("b", version).into_package(true),
            ],
        )
        .expect("valid project");
        ProjectContext {
            project,
            config: ReleasePlanConfig::default(),
            format: ManifestFormat::Cargo,
        }
    }

    fn spec(entries: &[(&str, &str)]) -> ReleaseSpecification {
        ReleaseSpecification {
            packages: entries
                .iter()
                .map(|(name, specifier)| {
                    (
                        (*name).to_string(),
                        specifier.parse::<VersionSpecifier>().expect("specifier"),
                    )
                })
                .collect(),
            path: PathBuf::from("RELEASE_SPEC.yml"),
        }
    }

    #[test]
    fn resolution_arithmetic() {
        let context = context("2.3.4");

        for (directive, expected) in [
            ("major", "3.0.0"),
            ("minor", "2.4.0"),
            ("patch", "2.3.5"),
            ("9.9.9", "9.9.9"),
        ] {
            let plan = VersionPlanner::resolve(&context, &spec(&[("a", directive)]))
                .expect("should resolve");

            assert_eq!(plan.releases[0].new_version.to_string(), expected);
            assert_eq!(plan.releases[0].current_version, Version::new(2, 3, 4));
        }
    }

    #[test]
    fn keeps_specification_order() {
        let context = context("1.0.0");

        let plan = VersionPlanner::resolve(&context, &spec(&[("b", "patch"), ("a", "minor")]))
            .expect("should resolve");

        let versions: Vec<(&str, String)> = plan
            .versions()
            .into_iter()
            .map(|(name, version)| (name, version.to_string()))
            .collect();
        assert_eq!(
            versions,
            vec![("b", "1.0.1".to_string()), ("a", "1.1.0".to_string())]
        );
        assert_eq!(plan.releases[0].path, Path::new(MOCK_ROOT).join("crates/b"));
    }

    #[test]
    fn empty_specification_gives_empty_plan() {
        let plan = VersionPlanner::resolve(&context("1.0.0"), &spec(&[])).expect("should resolve");

        assert!(plan.is_empty());
    }

    #[test]
    fn unknown_package_is_an_error() {
        let result = VersionPlanner::resolve(&context("1.0.0"), &spec(&[("zzz", "patch")]));

        assert!(matches!(result, Err(OperationError::UnknownPackage(name)) if name == "zzz"));
    }

    #[test]
    fn overflowing_bump_is_an_error() {
        let context = context(&format!("1.{}.0", u64::MAX));

        let result = VersionPlanner::resolve(&context, &spec(&[("a", "minor")]));

        assert!(matches!(
            result,
            Err(OperationError::Core(CoreError::VersionOverflow { .. }))
        ));
        VersionPlanner::resolve(&context, &spec(&[("a", "major")])).expect("major still fits");
    }
}
