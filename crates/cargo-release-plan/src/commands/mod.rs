mod apply;
mod changed;
mod prepare;

use std::path::Path;

use clap::Subcommand;
use release_plan_operations::operations::{ReleaseOutcome, ResolvedPlan};

use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Write a release specification for changed packages and release it
    Prepare(prepare::PrepareArgs),
    /// Release according to an edited release specification
    Apply(apply::ApplyArgs),
    /// List packages with changes since their latest release
    Changed,
}

impl Commands {
    pub(crate) fn execute(self, start_path: &Path) -> Result<()> {
        match self {
            Self::Prepare(args) => prepare::run(args, start_path),
            Self::Apply(args) => apply::run(args, start_path),
            Self::Changed => changed::run(start_path),
        }
    }
}

pub(crate) fn print_plan(plan: &ResolvedPlan) {
    println!("Planned releases:");
    for release in &plan.releases {
        println!(
            "  {} {} -> {}",
            release.name, release.current_version, release.new_version
        );
    }
}

fn print_release_outcome(outcome: &ReleaseOutcome) {
    match outcome {
        ReleaseOutcome::DryRun(plan) => {
            println!("Dry run - no changes will be made.\n");
            print_plan(plan);
        }
        ReleaseOutcome::Applied(applied) => {
            println!("Released:");
            for release in &applied.plan.releases {
                println!("  {} {}", release.name, release.new_version);
            }
            if !applied.updated_manifests.is_empty() {
                println!("\nUpdated manifests:");
                for path in &applied.updated_manifests {
                    println!("  {}", path.display());
                }
            }
            if !applied.changelogs.is_empty() {
                println!("\nUpdated changelogs:");
                for path in &applied.changelogs {
                    println!("  {}", path.display());
                }
            }
        }
        ReleaseOutcome::Declined(_) => {
            println!("Release cancelled. The release specification was kept.");
        }
        ReleaseOutcome::NothingToRelease => {
            println!("No packages selected for release.");
        }
    }
}
