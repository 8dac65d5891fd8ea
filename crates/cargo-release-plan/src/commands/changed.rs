use std::path::Path;

use release_plan_operations::operations::{ChangedOperation, ChangedOutput};
use release_plan_operations::providers::{FileSystemProjectProvider, Git2Provider};

use crate::error::Result;

pub(crate) fn run(start_path: &Path) -> Result<()> {
    let operation = ChangedOperation::new(FileSystemProjectProvider::new(), Git2Provider::new());
    let output = operation.execute(start_path)?;

    print_changed(&output);

    Ok(())
}

fn print_changed(output: &ChangedOutput) {
    if output.changed.is_empty() {
        println!("No packages changed since their latest release.");
    } else {
        println!("Changed since latest release:");
        for pkg in &output.changed {
            println!("  {} ({})", pkg.name, pkg.version);
        }
    }

    if !output.unchanged.is_empty() {
        println!("\nUnchanged:");
        for pkg in &output.unchanged {
            println!("  {} ({})", pkg.name, pkg.version);
        }
    }
}
