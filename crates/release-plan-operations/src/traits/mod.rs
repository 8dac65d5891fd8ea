mod changelog_writer;
mod confirmation;
mod document_editor;
mod git_provider;
mod manifest_writer;
mod process_runner;
mod project_provider;
mod specification_store;

pub use changelog_writer::ChangelogWriter;
pub use confirmation::ReleaseConfirmation;
pub use document_editor::DocumentEditor;
pub use git_provider::GitProvider;
pub use manifest_writer::ManifestWriter;
pub use process_runner::{ProcessOutput, ProcessRunner};
pub use project_provider::ProjectProvider;
pub use specification_store::SpecificationStore;
