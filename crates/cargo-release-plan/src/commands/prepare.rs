use std::path::Path;

use clap::Args;
use release_plan_core::VersionSpecifier;
use release_plan_operations::operations::{PrepareInput, PrepareOperation, PrepareOutcome};
use release_plan_operations::providers::{
    ExternalEditor, FileSystemChangelogWriter, FileSystemManifestWriter,
    FileSystemProjectProvider, FileSystemSpecificationStore, Git2Provider, SystemProcessRunner,
};

use super::print_release_outcome;
use crate::error::Result;
use crate::interaction::TerminalConfirmation;

#[derive(Args)]
pub(crate) struct PrepareArgs {
    /// Editor command used to edit the release specification
    #[arg(long)]
    editor: Option<String>,

    /// Write the release specification without opening an editor
    #[arg(long)]
    pub(crate) no_edit: bool,

    /// Version for a single-package project (major, minor, patch or X.Y.Z)
    #[arg(long, value_name = "BUMP")]
    pub(crate) bump: Option<VersionSpecifier>,

    /// Show the release plan without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Release without asking for confirmation
    #[arg(long, short = 'y')]
    yes: bool,
}

pub(crate) fn run(args: PrepareArgs, start_path: &Path) -> Result<()> {
    let editor = ExternalEditor::from_env(SystemProcessRunner::new(), start_path)
        .with_command(args.editor);

    let operation = PrepareOperation::new(
        FileSystemProjectProvider::new(),
        Git2Provider::new(),
        FileSystemSpecificationStore::new(),
        editor,
        FileSystemManifestWriter::new(),
        FileSystemChangelogWriter::new(),
        TerminalConfirmation::new(args.yes),
    );

    let input = PrepareInput {
        edit: !args.no_edit,
        root_bump: args.bump,
        dry_run: args.dry_run,
    };

    let outcome = operation.execute(start_path, &input)?;
    print_outcome(&outcome);

    Ok(())
}

fn print_outcome(outcome: &PrepareOutcome) {
    match outcome {
        PrepareOutcome::AwaitingEdit(path) => {
            println!("Release specification written to {}", path.display());
            println!("Edit it, then run `cargo release-plan apply`.");
        }
        PrepareOutcome::Finished(outcome) => print_release_outcome(outcome),
    }
}
