use std::path::Path;

use crate::Result;
use crate::error::OperationError;
use crate::traits::SpecificationStore;

pub struct FileSystemSpecificationStore;

impl FileSystemSpecificationStore {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemSpecificationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecificationStore for FileSystemSpecificationStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|source| OperationError::SpecificationRead {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        let to_error = |source| OperationError::SpecificationWrite {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(to_error)?;
        }
        std::fs::write(path, content).map_err(to_error)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(OperationError::SpecificationRemove {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}
