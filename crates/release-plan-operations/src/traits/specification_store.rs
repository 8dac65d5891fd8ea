use std::path::Path;

use crate::Result;

pub trait SpecificationStore: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    /// # Errors
    ///
    /// Returns an error if the document cannot be read.
    fn read(&self, path: &Path) -> Result<String>;

    /// Creates parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be removed.
    fn remove(&self, path: &Path) -> Result<()>;
}
