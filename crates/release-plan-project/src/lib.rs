mod config;
mod error;
mod manifest;
mod mapping;
mod project;
mod workspace;

pub const DEFAULT_SPEC_DIR: &str = ".release-plan";
pub const SPEC_FILE_NAME: &str = "RELEASE_SPEC.yml";

pub use config::{ReleasePlanConfig, TagFormat, load_config};
pub use error::ProjectError;
pub use manifest::{ManifestFormat, PackageManifest, read_package_manifest};
pub use mapping::PackageLocator;
pub use project::Project;
pub use workspace::{DiscoveredWorkspace, ProjectKind, discover_workspace};

pub type Result<T> = std::result::Result<T, ProjectError>;
