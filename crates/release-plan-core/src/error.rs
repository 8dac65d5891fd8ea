use thiserror::Error;

use crate::types::BumpType;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(
        "'{value}' is not a version specifier (expected major, minor, patch or an exact version such as 1.2.3)"
    )]
    InvalidVersionSpecifier { value: String },

    #[error(
        "'{value}' is not a release directive (expected null, intentionally-skip, major, minor, patch or an exact version such as 1.2.3)"
    )]
    InvalidDirective { value: String },

    #[error("cannot apply a {bump} bump to {version}: the version component would overflow")]
    VersionOverflow { version: String, bump: BumpType },
}

pub type Result<T> = std::result::Result<T, CoreError>;
