use std::path::Path;

use semver::Version;
use serde_json::{Map, Value};

use crate::error::ManifestError;
use crate::rewrite_requirement;

const DEPENDENCY_SECTIONS: [&str; 4] = [
    "dependencies",
    "devDependencies",
    "peerDependencies",
    "optionalDependencies",
];

struct JsonManifest {
    root: Map<String, Value>,
    trailing_newline: bool,
}

fn read_manifest(path: &Path) -> Result<JsonManifest, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let root: Map<String, Value> =
        serde_json::from_str(&content).map_err(|source| ManifestError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(JsonManifest {
        root,
        trailing_newline: content.ends_with('\n'),
    })
}

fn write_manifest(path: &Path, manifest: &JsonManifest) -> Result<(), ManifestError> {
    let mut content =
        serde_json::to_string_pretty(&manifest.root).map_err(|source| ManifestError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    if manifest.trailing_newline {
        content.push('\n');
    }

    std::fs::write(path, content).map_err(|source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn read_version(path: &Path) -> Result<Version, ManifestError> {
    let manifest = read_manifest(path)?;

    let version_str = manifest
        .root
        .get("version")
        .and_then(Value::as_str)
        .ok_or_else(|| ManifestError::MissingField {
            path: path.to_path_buf(),
            field: "version".to_string(),
        })?;

    Version::parse(version_str).map_err(|source| ManifestError::InvalidVersion {
        path: path.to_path_buf(),
        version: version_str.to_string(),
        source,
    })
}

pub(crate) fn write_version(path: &Path, version: &Version) -> Result<(), ManifestError> {
    let mut manifest = read_manifest(path)?;

    manifest
        .root
        .insert("version".to_string(), Value::String(version.to_string()));

    write_manifest(path, &manifest)
}

pub(crate) fn update_dependency(
    path: &Path,
    dependency: &str,
    version: &Version,
) -> Result<bool, ManifestError> {
    let mut manifest = read_manifest(path)?;
    let mut changed = false;

    for section in DEPENDENCY_SECTIONS {
        let Some(slot) = manifest
            .root
            .get_mut(section)
            .and_then(Value::as_object_mut)
            .and_then(|deps| deps.get_mut(dependency))
        else {
            continue;
        };

        let Some(requirement) = slot.as_str().and_then(|req| rewrite_requirement(req, version))
        else {
            continue;
        };
        if slot.as_str() != Some(requirement.as_str()) {
            *slot = Value::String(requirement);
            changed = true;
        }
    }

    if changed {
        write_manifest(path, &manifest)?;
    }

    Ok(changed)
}
