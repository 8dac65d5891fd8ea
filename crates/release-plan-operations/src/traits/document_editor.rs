use std::path::Path;

use crate::Result;

pub trait DocumentEditor: Send + Sync {
    fn is_available(&self) -> bool;

    /// Opens `path` for editing and returns once the user is done.
    ///
    /// # Errors
    ///
    /// Returns an error if no editor is available or the editor fails.
    fn edit(&self, path: &Path) -> Result<()>;
}
