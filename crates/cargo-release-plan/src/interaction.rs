use dialoguer::Confirm;
use release_plan_operations::operations::ResolvedPlan;
use release_plan_operations::traits::ReleaseConfirmation;
use release_plan_operations::{OperationError, Result};
use tracing::debug;

use crate::commands::print_plan;
use crate::environment::non_interactive_reason;

/// Asks on the terminal before a plan is written. `--yes` skips the prompt;
/// without it a non-interactive session refuses to release.
pub struct TerminalConfirmation {
    assume_yes: bool,
}

impl TerminalConfirmation {
    #[must_use]
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl ReleaseConfirmation for TerminalConfirmation {
    fn confirm(&self, plan: &ResolvedPlan) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }

        if let Some(reason) = non_interactive_reason() {
            debug!(%reason, "cannot prompt for confirmation");
            return Err(OperationError::ConfirmationRequired);
        }

        print_plan(plan);
        println!();

        let answer = Confirm::new()
            .with_prompt(release_prompt(plan))
            .default(false)
            .interact_opt()
            .map_err(|e| match e {
                dialoguer::Error::IO(io_err) => OperationError::Prompt(io_err),
            })?;

        Ok(answer.unwrap_or(false))
    }
}

fn release_prompt(plan: &ResolvedPlan) -> String {
    match plan.releases.as_slice() {
        [single] => format!("Release {} {}?", single.name, single.new_version),
        releases => format!("Release {} packages?", releases.len()),
    }
}
