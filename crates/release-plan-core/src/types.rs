use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;
use semver::Version;

use crate::error::CoreError;

/// Directive keyword that defers a package on purpose.
pub const INTENTIONALLY_SKIP: &str = "intentionally-skip";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BumpType {
    Patch,
    Minor,
    Major,
}

impl BumpType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }

    /// Matches the exact lowercase keyword; no trimming or case folding.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "patch" => Some(Self::Patch),
            "minor" => Some(Self::Minor),
            "major" => Some(Self::Major),
            _ => None,
        }
    }
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Either a relative bump or an absolute target version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpecifier {
    Bump(BumpType),
    Exact(Version),
}

impl VersionSpecifier {
    #[must_use]
    pub fn is_major_bump(&self) -> bool {
        matches!(self, Self::Bump(BumpType::Major))
    }
}

impl fmt::Display for VersionSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bump(bump) => write!(f, "{bump}"),
            Self::Exact(version) => write!(f, "{version}"),
        }
    }
}

impl FromStr for VersionSpecifier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(bump) = BumpType::from_keyword(s) {
            return Ok(Self::Bump(bump));
        }

        Version::parse(s)
            .map(Self::Exact)
            .map_err(|_| CoreError::InvalidVersionSpecifier {
                value: s.to_string(),
            })
    }
}

/// What the user asked for a single package in the release specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseDirective {
    Skip,
    IntentionallySkip,
    Release(VersionSpecifier),
}

impl ReleaseDirective {
    /// Parses a directive value; `None` stands for an explicit YAML `null`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDirective` if the value is neither a known
    /// keyword nor a valid semantic version.
    pub fn parse(value: Option<&str>) -> Result<Self, CoreError> {
        let Some(value) = value else {
            return Ok(Self::Skip);
        };

        if value == INTENTIONALLY_SKIP {
            return Ok(Self::IntentionallySkip);
        }

        value
            .parse::<VersionSpecifier>()
            .map(Self::Release)
            .map_err(|_| CoreError::InvalidDirective {
                value: value.to_string(),
            })
    }

    #[must_use]
    pub fn specifier(&self) -> Option<&VersionSpecifier> {
        match self {
            Self::Release(specifier) => Some(specifier),
            Self::Skip | Self::IntentionallySkip => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub version: Version,
    pub path: PathBuf,
    pub dependencies: IndexMap<String, String>,
    pub peer_dependencies: IndexMap<String, String>,
    pub has_changes_since_latest_release: bool,
}

impl Package {
    #[must_use]
    pub fn new(name: impl Into<String>, version: Version, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            version,
            path: path.into(),
            dependencies: IndexMap::new(),
            peer_dependencies: IndexMap::new(),
            has_changes_since_latest_release: false,
        }
    }

    /// Names of all regular and peer dependencies, without duplicates.
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies.keys().map(String::as_str).chain(
            self.peer_dependencies
                .keys()
                .filter(|name| !self.dependencies.contains_key(*name))
                .map(String::as_str),
        )
    }

    #[must_use]
    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies.contains_key(name) || self.peer_dependencies.contains_key(name)
    }
}
