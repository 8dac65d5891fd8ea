use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::{debug, info};

use crate::Result;
use crate::error::OperationError;
use crate::traits::{DocumentEditor, ProcessRunner};

/// Opens documents in the user's editor, resolved from an explicit command,
/// then `$VISUAL`, then `$EDITOR`, then `git var GIT_EDITOR`.
pub struct ExternalEditor<R> {
    runner: R,
    command: Option<String>,
    visual: Option<String>,
    editor: Option<String>,
    working_dir: PathBuf,
    resolved: OnceLock<Option<String>>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl<R: ProcessRunner> ExternalEditor<R> {
    /// `working_dir` is where `git var` runs, normally the project root.
    #[must_use]
    pub fn new(runner: R, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            command: None,
            visual: None,
            editor: None,
            working_dir: working_dir.into(),
            resolved: OnceLock::new(),
        }
    }

    /// Reads `$VISUAL` and `$EDITOR` from the process environment.
    #[must_use]
    pub fn from_env(runner: R, working_dir: impl Into<PathBuf>) -> Self {
        Self::new(runner, working_dir).with_environment(
            std::env::var("VISUAL").ok(),
            std::env::var("EDITOR").ok(),
        )
    }

    #[must_use]
    pub fn with_command(mut self, command: Option<String>) -> Self {
        self.command = non_empty(command);
        self
    }

    #[must_use]
    pub fn with_environment(mut self, visual: Option<String>, editor: Option<String>) -> Self {
        self.visual = non_empty(visual);
        self.editor = non_empty(editor);
        self
    }

    /// The editor command line, if any can be found.
    pub fn resolve(&self) -> Option<&str> {
        self.resolved
            .get_or_init(|| {
                self.command
                    .clone()
                    .or_else(|| self.visual.clone())
                    .or_else(|| self.editor.clone())
                    .or_else(|| self.git_editor())
            })
            .as_deref()
    }

    fn git_editor(&self) -> Option<String> {
        let args = ["var".to_string(), "GIT_EDITOR".to_string()];
        match self.runner.run("git", &args, &self.working_dir) {
            Ok(output) => non_empty(Some(output.stdout.trim().to_string())),
            Err(err) => {
                debug!(error = %err, "git has no editor configured");
                None
            }
        }
    }
}

impl<R: ProcessRunner> DocumentEditor for ExternalEditor<R> {
    fn is_available(&self) -> bool {
        self.resolve().is_some()
    }

    fn edit(&self, path: &Path) -> Result<()> {
        let command = self.resolve().ok_or(OperationError::EditorUnavailable)?;

        let mut parts = command.split_whitespace();
        let program = parts.next().ok_or(OperationError::EditorUnavailable)?;
        let mut args: Vec<String> = parts.map(str::to_string).collect();
        args.push(path.display().to_string());

        info!(editor = command, path = %path.display(), "waiting for editor to close");

        let cwd = path.parent().unwrap_or(self.working_dir.as_path());
        self.runner
            .run_attached(program, &args, cwd)
            .map_err(|source| OperationError::Subprocess {
                context: format!("editor '{command}' failed while editing '{}'", path.display()),
                source,
            })
    }
}
