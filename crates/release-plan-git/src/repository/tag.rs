use crate::Result;

use super::Repository;

impl Repository {
    /// # Errors
    ///
    /// Returns an error if the reference database cannot be read.
    pub fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.find_tag_ref(name)?.is_some())
    }

    pub(crate) fn find_tag_ref(&self, name: &str) -> Result<Option<git2::Reference<'_>>> {
        match self.inner.find_reference(&format!("refs/tags/{name}")) {
            Ok(reference) => Ok(Some(reference)),
            Err(err) if err.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
