mod changelog;
mod editor;
mod git;
mod manifest;
mod process;
mod project;
mod store;

pub use changelog::FileSystemChangelogWriter;
pub use editor::ExternalEditor;
pub use git::Git2Provider;
pub use manifest::FileSystemManifestWriter;
pub use process::SystemProcessRunner;
pub use project::FileSystemProjectProvider;
pub use store::FileSystemSpecificationStore;
