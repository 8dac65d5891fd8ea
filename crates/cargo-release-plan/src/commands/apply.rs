use std::path::Path;

use clap::Args;
use release_plan_operations::operations::{ApplyInput, ApplyOperation};
use release_plan_operations::providers::{
    FileSystemChangelogWriter, FileSystemManifestWriter, FileSystemProjectProvider,
    FileSystemSpecificationStore, Git2Provider,
};

use super::print_release_outcome;
use crate::error::Result;
use crate::interaction::TerminalConfirmation;

#[derive(Args)]
pub(crate) struct ApplyArgs {
    /// Show the release plan without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Release without asking for confirmation
    #[arg(long, short = 'y')]
    yes: bool,
}

pub(crate) fn run(args: ApplyArgs, start_path: &Path) -> Result<()> {
    let operation = ApplyOperation::new(
        FileSystemProjectProvider::new(),
        Git2Provider::new(),
        FileSystemSpecificationStore::new(),
        FileSystemManifestWriter::new(),
        FileSystemChangelogWriter::new(),
        TerminalConfirmation::new(args.yes),
    );

    let outcome = operation.execute(
        start_path,
        ApplyInput {
            dry_run: args.dry_run,
        },
    )?;
    print_release_outcome(&outcome);

    Ok(())
}
