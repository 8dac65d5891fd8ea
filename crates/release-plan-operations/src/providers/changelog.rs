use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use semver::Version;
use tracing::debug;

use crate::Result;
use crate::error::OperationError;
use crate::traits::ChangelogWriter;

const CHANGELOG_FILE: &str = "CHANGELOG.md";
const UNRELEASED_HEADING: &str = "## [Unreleased]";

/// Promotes the `## [Unreleased]` section of a keep-a-changelog style
/// `CHANGELOG.md` to a dated release heading.
pub struct FileSystemChangelogWriter {
    date: Option<NaiveDate>,
}

impl FileSystemChangelogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self { date: None }
    }

    /// Uses a fixed release date instead of today.
    #[must_use]
    pub fn with_date(date: NaiveDate) -> Self {
        Self { date: Some(date) }
    }

    fn release_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }
}

impl Default for FileSystemChangelogWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn is_unreleased_heading(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(UNRELEASED_HEADING)
}

fn has_release_heading(content: &str, version: &Version) -> bool {
    let heading = format!("## [{version}]");
    content.lines().any(|line| line.trim_start().starts_with(&heading))
}

fn promote_unreleased(content: &str, version: &Version, date: NaiveDate) -> Option<String> {
    if has_release_heading(content, version) {
        return None;
    }

    let mut promoted = false;
    let mut output = String::with_capacity(content.len() + 32);
    for line in content.split_inclusive('\n') {
        if !promoted && is_unreleased_heading(line) {
            output.push_str(UNRELEASED_HEADING);
            output.push_str("\n\n");
            output.push_str(&format!("## [{version}] - {}", date.format("%Y-%m-%d")));
            output.push('\n');
            promoted = true;
        } else {
            output.push_str(line);
        }
    }

    promoted.then_some(output)
}

impl ChangelogWriter for FileSystemChangelogWriter {
    fn write_release(&self, package_dir: &Path, version: &Version) -> Result<Option<PathBuf>> {
        let path = package_dir.join(CHANGELOG_FILE);
        if !path.is_file() {
            debug!(path = %path.display(), "no changelog to update");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|source| OperationError::Changelog {
            path: path.clone(),
            source,
        })?;

        let Some(updated) = promote_unreleased(&content, version, self.release_date()) else {
            debug!(path = %path.display(), %version, "changelog already up to date");
            return Ok(None);
        };

        std::fs::write(&path, updated).map_err(|source| OperationError::Changelog {
            path: path.clone(),
            source,
        })?;

        Ok(Some(path))
    }
}
