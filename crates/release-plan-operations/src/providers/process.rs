use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use crate::SubprocessError;
use crate::traits::{ProcessOutput, ProcessRunner};

pub struct SystemProcessRunner;

impl SystemProcessRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn check_status(program: &str, status: ExitStatus, stderr: &str) -> Result<(), SubprocessError> {
    if status.success() {
        return Ok(());
    }

    match status.code() {
        Some(code) => Err(SubprocessError::Exited {
            program: program.to_string(),
            code,
            stderr: stderr.to_string(),
        }),
        None => Err(SubprocessError::Terminated {
            program: program.to_string(),
        }),
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<ProcessOutput, SubprocessError> {
        debug!(program, ?args, cwd = %cwd.display(), "running process");

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| SubprocessError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        check_status(program, output.status, &stderr)?;

        Ok(ProcessOutput { stdout, stderr })
    }

    fn run_attached(&self, program: &str, args: &[String], cwd: &Path) -> Result<(), SubprocessError> {
        debug!(program, ?args, cwd = %cwd.display(), "running attached process");

        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .status()
            .map_err(|source| SubprocessError::Spawn {
                program: program.to_string(),
                source,
            })?;

        check_status(program, status, "")
    }
}
