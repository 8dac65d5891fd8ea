use std::path::Path;

use crate::SubprocessError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

pub trait ProcessRunner: Send + Sync {
    /// Runs `program` to completion with captured output.
    ///
    /// # Errors
    ///
    /// Returns `SubprocessError` if the process cannot be started or exits unsuccessfully.
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<ProcessOutput, SubprocessError>;

    /// Runs `program` attached to the current terminal and blocks until it exits.
    ///
    /// # Errors
    ///
    /// Returns `SubprocessError` if the process cannot be started or exits unsuccessfully.
    fn run_attached(&self, program: &str, args: &[String], cwd: &Path) -> Result<(), SubprocessError>;
}
