use std::path::Path;

use semver::Version;
use toml_edit::{DocumentMut, Item, TableLike, value};

use crate::error::ManifestError;
use crate::rewrite_requirement;

const DEPENDENCY_SECTIONS: [&str; 3] = ["dependencies", "dev-dependencies", "build-dependencies"];

pub(crate) fn read_document(path: &Path) -> Result<DocumentMut, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    content
        .parse::<DocumentMut>()
        .map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn write_document(path: &Path, doc: &DocumentMut) -> Result<(), ManifestError> {
    std::fs::write(path, doc.to_string()).map_err(|source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn read_version(path: &Path) -> Result<Version, ManifestError> {
    let doc = read_document(path)?;

    let version_str = doc
        .get("package")
        .and_then(|package| package.get("version"))
        .and_then(Item::as_str)
        .ok_or_else(|| ManifestError::MissingField {
            path: path.to_path_buf(),
            field: "package.version".to_string(),
        })?;

    Version::parse(version_str).map_err(|source| ManifestError::InvalidVersion {
        path: path.to_path_buf(),
        version: version_str.to_string(),
        source,
    })
}

pub(crate) fn write_version(path: &Path, version: &Version) -> Result<(), ManifestError> {
    let mut doc = read_document(path)?;

    let package_table = doc
        .get_mut("package")
        .and_then(Item::as_table_like_mut)
        .ok_or_else(|| ManifestError::MissingField {
            path: path.to_path_buf(),
            field: "package".to_string(),
        })?;

    package_table.insert("version", value(version.to_string()));

    write_document(path, &doc)
}

pub(crate) fn update_dependency(
    path: &Path,
    dependency: &str,
    version: &Version,
) -> Result<bool, ManifestError> {
    let mut doc = read_document(path)?;
    let mut changed = false;

    if let Some(deps) = doc
        .get_mut("workspace")
        .and_then(|workspace| workspace.get_mut("dependencies"))
        .and_then(Item::as_table_like_mut)
    {
        changed |= update_section(deps, dependency, version);
    }

    for section in &DEPENDENCY_SECTIONS {
        if let Some(deps) = doc.get_mut(section).and_then(Item::as_table_like_mut) {
            changed |= update_section(deps, dependency, version);
        }
    }

    if let Some(targets) = doc.get_mut("target").and_then(Item::as_table_like_mut) {
        for (_, target) in targets.iter_mut() {
            for section in &DEPENDENCY_SECTIONS {
                if let Some(deps) = target.get_mut(section).and_then(Item::as_table_like_mut) {
                    changed |= update_section(deps, dependency, version);
                }
            }
        }
    }

    if changed {
        write_document(path, &doc)?;
    }

    Ok(changed)
}

/// Entries are matched by key or, for renamed dependencies, by `package`.
fn update_section(deps: &mut dyn TableLike, dependency: &str, version: &Version) -> bool {
    let mut changed = false;

    for (key, entry) in deps.iter_mut() {
        if let Some(table) = entry.as_table_like_mut() {
            let package = table
                .get("package")
                .and_then(Item::as_str)
                .unwrap_or(key.get());
            if package != dependency {
                continue;
            }

            let inherits = table
                .get("workspace")
                .and_then(Item::as_bool)
                .unwrap_or(false);
            if inherits {
                continue;
            }

            if let Some(slot) = table.get_mut("version").and_then(Item::as_value_mut) {
                changed |= replace_requirement(slot, version);
            }
        } else if key.get() == dependency {
            if let Some(slot) = entry.as_value_mut() {
                changed |= replace_requirement(slot, version);
            }
        }
    }

    changed
}

fn replace_requirement(slot: &mut toml_edit::Value, version: &Version) -> bool {
    let Some(requirement) = slot.as_str().and_then(|req| rewrite_requirement(req, version))
    else {
        return false;
    };
    if slot.as_str() == Some(requirement.as_str()) {
        return false;
    }

    let decor = slot.decor().clone();
    *slot = toml_edit::Value::from(requirement);
    *slot.decor_mut() = decor;
    true
}
