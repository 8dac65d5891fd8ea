use indexmap::IndexMap;
use serde::Deserialize;
use serde_with::{MapPreventDuplicates, serde_as};
use serde_yml::Value;

use crate::error::DocumentError;

pub(crate) const PACKAGES_KEY: &str = "packages";

#[serde_as]
#[derive(Deserialize)]
struct PackagesSection {
    #[serde_as(as = "MapPreventDuplicates<_, _>")]
    packages: IndexMap<String, Value>,
}

/// The value written next to a package name, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDirective {
    Null,
    Text(String),
    /// Any non-string scalar or collection, rendered back to YAML.
    Other(String),
}

impl RawDirective {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::String(text) => Self::Text(text.clone()),
            other => Self::Other(
                serde_yml::to_string(other)
                    .map(|rendered| rendered.trim_end().to_string())
                    .unwrap_or_else(|_| format!("{other:?}")),
            ),
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The directive as text; `None` only for `Null`.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Null => None,
            Self::Text(text) | Self::Other(text) => Some(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub name: String,
    pub value: RawDirective,
    /// 1-based line in the edited document, assuming one entry per line
    /// directly below the `packages:` key.
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawReleaseDocument {
    pub entries: Vec<RawEntry>,
}

impl RawReleaseDocument {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RawEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Whether `name` is listed with anything other than `null`.
    #[must_use]
    pub fn has_directive_for(&self, name: &str) -> bool {
        self.get(name).is_some_and(|entry| !entry.value.is_null())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_comment_or_blank(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn first_data_line_index(content: &str) -> usize {
    content
        .lines()
        .position(|line| !is_comment_or_blank(line))
        .unwrap_or(0)
}

fn describe_key(key: &Value) -> String {
    serde_yml::to_string(key)
        .map(|rendered| rendered.trim_end().to_string())
        .unwrap_or_else(|_| format!("{key:?}"))
}

/// Parses an edited release specification into raw entries, in document
/// order. Directive values are not interpreted here.
///
/// # Errors
///
/// Returns `DocumentError` if the content is not YAML, lacks a `packages`
/// mapping, uses a non-string package name, or repeats a package name.
#[must_use = "parsing result should be handled"]
pub fn parse_document(content: &str) -> Result<RawReleaseDocument, DocumentError> {
    let document: Value = serde_yml::from_str(content)?;

    let Value::Mapping(root) = &document else {
        return Err(DocumentError::NotAMapping);
    };
    let Some(packages) = root.get(PACKAGES_KEY) else {
        return Err(DocumentError::MissingPackages);
    };
    let Value::Mapping(packages) = packages else {
        return Err(DocumentError::PackagesNotAMapping);
    };
    if let Some(key) = packages.keys().find(|key| !key.is_string()) {
        return Err(DocumentError::NonStringPackageName {
            key: describe_key(key),
        });
    }

    let section: PackagesSection = serde_yml::from_str(content)?;

    let offset = first_data_line_index(content);
    let entries = section
        .packages
        .iter()
        .enumerate()
        .map(|(ordinal, (name, value))| RawEntry {
            name: name.clone(),
            value: RawDirective::from_value(value),
            line: offset + ordinal + 2,
        })
        .collect();

    Ok(RawReleaseDocument { entries })
}
