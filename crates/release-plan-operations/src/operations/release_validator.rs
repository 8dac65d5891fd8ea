use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use release_plan_core::{Package, ReleaseDirective, VersionSpecifier};
use release_plan_project::Project;
use release_plan_spec::{RawDirective, RawEntry, RawReleaseDocument};
use release_plan_version::is_major_release;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    UnknownPackage,
    InvalidDirective,
    VersionNotIncreasing,
    MissingMajorBumpDependents,
    MissingChangedDependencies,
}

/// A single problem found in the release specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    /// May span several lines.
    pub message: String,
    pub line: Option<usize>,
}

impl ValidationError {
    fn at(entry: &RawEntry, kind: ValidationErrorKind, message: String) -> Self {
        Self {
            kind,
            message,
            line: Some(entry.line),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Collection of validation errors (guaranteed non-empty when constructed).
///
/// Use `ValidationErrorCollector` while validating, then convert to this type
/// only when errors are present.
#[derive(Debug, Clone)]
#[allow(clippy::len_without_is_empty)]
pub struct ValidationErrors {
    first: ValidationError,
    rest: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Returns `None` if `errors` is empty.
    #[must_use]
    pub fn try_from_vec(mut errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            return None;
        }
        let first = errors.remove(0);
        Some(Self {
            first,
            rest: errors,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        let mut errors = vec![self.first];
        errors.extend(self.rest);
        errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = Box<dyn Iterator<Item = &'a ValidationError> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[derive(Debug, Default)]
pub(crate) struct ValidationErrorCollector {
    errors: Vec<ValidationError>,
}

impl ValidationErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn into_errors(self) -> Option<ValidationErrors> {
        ValidationErrors::try_from_vec(self.errors)
    }
}

/// Renders errors as a bullet list, one bullet per error, prefixed with the
/// document line when known.
#[must_use]
pub fn render_errors<'a>(errors: impl IntoIterator<Item = &'a ValidationError>) -> String {
    let mut output = String::new();
    for error in errors {
        let mut lines = error.message.lines();
        output.push_str("* ");
        if let Some(line) = error.line {
            output.push_str(&format!("Line {line}: "));
        }
        output.push_str(lines.next().unwrap_or_default());
        output.push('\n');
        for continuation in lines {
            output.push_str("  ");
            output.push_str(continuation);
            output.push('\n');
        }
    }
    output
}

/// The release specification could not be accepted; carries every problem
/// found and the document they were found in.
#[derive(Debug, Clone)]
pub struct ReleaseSpecificationError {
    pub path: PathBuf,
    pub errors: ValidationErrors,
}

impl fmt::Display for ReleaseSpecificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "release specification at '{}' has {} problem(s):",
            self.path.display(),
            self.errors.len()
        )?;
        write!(f, "{}", render_errors(&self.errors).trim_end())
    }
}

impl std::error::Error for ReleaseSpecificationError {}

/// Packages to release and how, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSpecification {
    pub packages: IndexMap<String, VersionSpecifier>,
    pub path: PathBuf,
}

impl ReleaseSpecification {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

fn bullet_list<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names
        .into_iter()
        .map(|name| format!("\n  - {name}"))
        .collect()
}

/// Checks a release specification document against the project.
pub struct ReleaseValidator;

impl ReleaseValidator {
    /// Validates every entry of `document`, collecting all problems.
    ///
    /// # Errors
    ///
    /// Returns `ReleaseSpecificationError` listing every problem, in document
    /// order, if any rule fails.
    pub fn validate(
        project: &Project,
        document: &RawReleaseDocument,
        path: &Path,
    ) -> Result<ReleaseSpecification, ReleaseSpecificationError> {
        let mut collector = ValidationErrorCollector::new();
        let mut packages = IndexMap::new();

        for entry in &document.entries {
            let Some(package) = project.package(&entry.name) else {
                collector.push(ValidationError::at(
                    entry,
                    ValidationErrorKind::UnknownPackage,
                    format!("'{}' is not a package in this workspace", entry.name),
                ));
                continue;
            };

            let Some(directive) = Self::parse_directive(entry, &mut collector) else {
                continue;
            };

            if let ReleaseDirective::Release(specifier) = &directive {
                let not_increasing = Self::check_increasing(package, specifier);
                let moves_forward = not_increasing.is_none();
                if let Some(error) = not_increasing {
                    collector.push(ValidationError {
                        line: Some(entry.line),
                        ..error
                    });
                }
                if moves_forward && is_major_release(&package.version, specifier) {
                    Self::check_major_dependents(project, document, entry, &mut collector);
                }
                Self::check_changed_dependencies(project, document, entry, &mut collector);
                packages.insert(entry.name.clone(), specifier.clone());
            }
        }

        match collector.into_errors() {
            Some(errors) => Err(ReleaseSpecificationError {
                path: path.to_path_buf(),
                errors,
            }),
            None => Ok(ReleaseSpecification {
                packages,
                path: path.to_path_buf(),
            }),
        }
    }

    /// Checks the version requested for a single-package project, which has
    /// no document; `manifest_path` stands in as the specification origin.
    ///
    /// # Errors
    ///
    /// Returns `ReleaseSpecificationError` if an exact version does not move
    /// the package forward.
    pub fn validate_root_bump(
        package: &Package,
        specifier: &VersionSpecifier,
        manifest_path: &Path,
    ) -> Result<ReleaseSpecification, ReleaseSpecificationError> {
        let mut collector = ValidationErrorCollector::new();
        if let Some(error) = Self::check_increasing(package, specifier) {
            collector.push(error);
        }

        if let Some(errors) = collector.into_errors() {
            return Err(ReleaseSpecificationError {
                path: manifest_path.to_path_buf(),
                errors,
            });
        }

        let mut packages = IndexMap::new();
        packages.insert(package.name.clone(), specifier.clone());
        Ok(ReleaseSpecification {
            packages,
            path: manifest_path.to_path_buf(),
        })
    }

    fn parse_directive(
        entry: &RawEntry,
        collector: &mut ValidationErrorCollector,
    ) -> Option<ReleaseDirective> {
        let parsed = match &entry.value {
            RawDirective::Null => ReleaseDirective::parse(None).ok(),
            RawDirective::Text(text) => ReleaseDirective::parse(Some(text.as_str())).ok(),
            RawDirective::Other(_) => None,
        };

        if parsed.is_none() {
            let value = entry.value.as_text().unwrap_or_default();
            collector.push(ValidationError::at(
                entry,
                ValidationErrorKind::InvalidDirective,
                format!(
                    "'{value}' is not a valid directive for '{}'\n\
                     Use null, intentionally-skip, major, minor, patch or an exact version such as 1.2.3",
                    entry.name
                ),
            ));
        }
        parsed
    }

    fn check_increasing(package: &Package, specifier: &VersionSpecifier) -> Option<ValidationError> {
        let VersionSpecifier::Exact(target) = specifier else {
            return None;
        };

        // Precedence ignores build metadata: 1.2.3+build.7 is still 1.2.3.
        let message = match target.cmp_precedence(&package.version) {
            std::cmp::Ordering::Greater => return None,
            std::cmp::Ordering::Equal => {
                format!("'{}' is already at version {target}", package.name)
            }
            std::cmp::Ordering::Less => format!(
                "'{}' is currently at a greater version ({}) than {target}",
                package.name, package.version
            ),
        };

        Some(ValidationError {
            kind: ValidationErrorKind::VersionNotIncreasing,
            message,
            line: None,
        })
    }

    fn check_major_dependents(
        project: &Project,
        document: &RawReleaseDocument,
        entry: &RawEntry,
        collector: &mut ValidationErrorCollector,
    ) {
        let missing: Vec<&str> = project
            .dependents_of(&entry.name)
            .into_iter()
            .filter(|dependent| dependent.has_changes_since_latest_release)
            .filter(|dependent| !document.has_directive_for(&dependent.name))
            .map(|dependent| dependent.name.as_str())
            .collect();

        if missing.is_empty() {
            return;
        }

        collector.push(ValidationError::at(
            entry,
            ValidationErrorKind::MissingMajorBumpDependents,
            format!(
                "'{}' gets a major release, but these changed packages depend on it and are not released:{}\n\
                 Release them as well, or mark them `intentionally-skip`",
                entry.name,
                bullet_list(missing)
            ),
        ));
    }

    fn check_changed_dependencies(
        project: &Project,
        document: &RawReleaseDocument,
        entry: &RawEntry,
        collector: &mut ValidationErrorCollector,
    ) {
        let missing: Vec<&str> = project
            .workspace_dependencies_of(&entry.name)
            .into_iter()
            .filter(|dependency| dependency.has_changes_since_latest_release)
            .filter(|dependency| !document.has_directive_for(&dependency.name))
            .map(|dependency| dependency.name.as_str())
            .collect();

        if missing.is_empty() {
            return;
        }

        collector.push(ValidationError::at(
            entry,
            ValidationErrorKind::MissingChangedDependencies,
            format!(
                "'{}' is released, but these changed dependencies of it are not:{}\n\
                 Release them as well, or mark them `intentionally-skip`",
                entry.name,
                bullet_list(missing)
            ),
        ));
    }
}
