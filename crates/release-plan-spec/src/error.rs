use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to parse YAML")]
    Yaml(#[from] serde_yml::Error),

    #[error("document must be a mapping with a top-level 'packages' key")]
    NotAMapping,

    #[error("document has no top-level 'packages' key")]
    MissingPackages,

    #[error("'packages' must be a mapping of package names to directives")]
    PackagesNotAMapping,

    #[error("package name {key} is not a string")]
    NonStringPackageName { key: String },
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("no package has changed since its latest release; there is nothing to release")]
    EmptyReleaseSet,
}
