use release_plan_core::{BumpType, CoreError, Result, VersionSpecifier};
use semver::{BuildMetadata, Prerelease, Version};

/// Applies a relative bump, clearing pre-release and build metadata.
///
/// # Errors
///
/// Returns `CoreError::VersionOverflow` if the bumped component is already
/// `u64::MAX`.
pub fn bump_version(version: &Version, bump_type: BumpType) -> Result<Version> {
    let overflow = || CoreError::VersionOverflow {
        version: version.to_string(),
        bump: bump_type,
    };

    let mut new_version = version.clone();
    new_version.pre = Prerelease::EMPTY;
    new_version.build = BuildMetadata::EMPTY;

    match bump_type {
        BumpType::Major => {
            new_version.major = version.major.checked_add(1).ok_or_else(overflow)?;
            new_version.minor = 0;
            new_version.patch = 0;
        }
        BumpType::Minor => {
            new_version.minor = version.minor.checked_add(1).ok_or_else(overflow)?;
            new_version.patch = 0;
        }
        BumpType::Patch => {
            new_version.patch = version.patch.checked_add(1).ok_or_else(overflow)?;
        }
    }

    Ok(new_version)
}

/// Returns the most significant numeric component that differs between two
/// versions. Pre-release and build metadata are not considered, nor is the
/// direction of the change.
#[must_use]
pub fn classify_change(from: &Version, to: &Version) -> Option<BumpType> {
    if from.major != to.major {
        Some(BumpType::Major)
    } else if from.minor != to.minor {
        Some(BumpType::Minor)
    } else if from.patch != to.patch {
        Some(BumpType::Patch)
    } else {
        None
    }
}

#[must_use]
pub fn is_major_change(from: &Version, to: &Version) -> bool {
    classify_change(from, to) == Some(BumpType::Major)
}

/// Computes the concrete target version for a specifier.
///
/// # Errors
///
/// Propagates overflow from [`bump_version`].
pub fn resolve_version(current: &Version, specifier: &VersionSpecifier) -> Result<Version> {
    match specifier {
        VersionSpecifier::Bump(bump_type) => bump_version(current, *bump_type),
        VersionSpecifier::Exact(version) => Ok(version.clone()),
    }
}

/// Whether applying the specifier to `current` amounts to a major release.
#[must_use]
pub fn is_major_release(current: &Version, specifier: &VersionSpecifier) -> bool {
    match specifier {
        VersionSpecifier::Bump(bump_type) => *bump_type == BumpType::Major,
        VersionSpecifier::Exact(version) => is_major_change(current, version),
    }
}
