use std::path::PathBuf;

use crate::{FileChange, FileStatus, GitError, Result};

use super::Repository;

impl Repository {
    /// Files changed between the commit `tag` points at and `HEAD`. Returns
    /// `None` if the tag does not exist. Work tree and index changes are not
    /// included.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag does not point at a commit, `HEAD` is
    /// unborn, or the diff fails.
    pub fn changed_files_since_tag(&self, tag: &str) -> Result<Option<Vec<FileChange>>> {
        let Some(reference) = self.find_tag_ref(tag)? else {
            return Ok(None);
        };

        let tag_tree = reference
            .peel_to_commit()
            .and_then(|commit| commit.tree())
            .map_err(|_| GitError::TagNotACommit {
                tag: tag.to_string(),
            })?;
        let head_tree = self.head_tree()?;

        self.diff_trees(&tag_tree, &head_tree).map(Some)
    }

    fn diff_trees(
        &self,
        base_tree: &git2::Tree<'_>,
        head_tree: &git2::Tree<'_>,
    ) -> Result<Vec<FileChange>> {
        let mut diff = self
            .inner
            .diff_tree_to_tree(Some(base_tree), Some(head_tree), None)?;

        let mut find_opts = git2::DiffFindOptions::new();
        find_opts.renames(true);
        diff.find_similar(Some(&mut find_opts))?;

        let mut changes = Vec::new();

        for delta in diff.deltas() {
            let status = match delta.status() {
                git2::Delta::Added => FileStatus::Added,
                git2::Delta::Deleted => FileStatus::Deleted,
                git2::Delta::Modified => FileStatus::Modified,
                git2::Delta::Renamed => FileStatus::Renamed,
                git2::Delta::Copied => FileStatus::Copied,
                _ => continue,
            };

            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(PathBuf::from)
                .ok_or(GitError::MissingDeltaPath)?;

            let mut change = FileChange::new(path, status);

            if matches!(status, FileStatus::Renamed | FileStatus::Copied) {
                if let Some(old_path) = delta.old_file().path() {
                    change = change.with_old_path(old_path.to_path_buf());
                }
            }

            changes.push(change);
        }

        Ok(changes)
    }

    fn head_tree(&self) -> Result<git2::Tree<'_>> {
        let head = self.inner.head().map_err(|err| match err.code() {
            git2::ErrorCode::UnbornBranch | git2::ErrorCode::NotFound => GitError::UnbornHead,
            _ => GitError::Git(err),
        })?;

        Ok(head.peel_to_commit()?.tree()?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{commit_file, create_tag, setup_test_repo};
    use crate::{FileStatus, GitError};
    use std::fs;
    use std::path::{Path, PathBuf};

    #[test]
    fn detect_added_and_modified_files() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        commit_file(&repo, "a.txt", "initial")?;
        create_tag(&repo, "v1.0.0")?;

        commit_file(&repo, "a.txt", "modified")?;
        commit_file(&repo, "b.txt", "new")?;

        let mut changes = repo.changed_files_since_tag("v1.0.0")?.expect("tag exists");
        changes.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].path, PathBuf::from("a.txt"));
        assert_eq!(changes[0].status, FileStatus::Modified);
        assert_eq!(changes[1].path, PathBuf::from("b.txt"));
        assert_eq!(changes[1].status, FileStatus::Added);
        Ok(())
    }

    #[test]
    fn nothing_changed_since_tag_on_head() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        commit_file(&repo, "a.txt", "initial")?;
        create_tag(&repo, "v1.0.0")?;

        let changes = repo.changed_files_since_tag("v1.0.0")?.expect("tag exists");

        assert!(changes.is_empty());
        Ok(())
    }

    #[test]
    fn uncommitted_changes_are_not_reported() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;
        commit_file(&repo, "a.txt", "initial")?;
        create_tag(&repo, "v1.0.0")?;

        fs::write(dir.path().join("a.txt"), "dirty")?;

        let changes = repo.changed_files_since_tag("v1.0.0")?.expect("tag exists");
        assert!(changes.is_empty());
        Ok(())
    }

    #[test]
    fn renamed_file_keeps_old_path() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;
        commit_file(&repo, "crates/old/src/lib.rs", "pub fn content() {}\n")?;
        create_tag(&repo, "v1.0.0")?;

        fs::create_dir_all(dir.path().join("crates/new/src"))?;
        fs::rename(
            dir.path().join("crates/old/src/lib.rs"),
            dir.path().join("crates/new/src/lib.rs"),
        )?;
        let mut index = repo.inner.index()?;
        index.remove_path(Path::new("crates/old/src/lib.rs"))?;
        index.add_path(Path::new("crates/new/src/lib.rs"))?;
        index.write()?;
        let sig = git2::Signature::now("Test", "test@example.com")?;
        let tree = repo.inner.find_tree(index.write_tree()?)?;
        let parent = repo.inner.head()?.peel_to_commit()?;
        repo.inner
            .commit(Some("HEAD"), &sig, &sig, "Move file", &tree, &[&parent])?;

        let changes = repo.changed_files_since_tag("v1.0.0")?.expect("tag exists");

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].status, FileStatus::Renamed);
        let paths: Vec<&Path> = changes[0].paths().collect();
        assert_eq!(
            paths,
            vec![
                Path::new("crates/new/src/lib.rs"),
                Path::new("crates/old/src/lib.rs")
            ]
        );
        Ok(())
    }

    #[test]
    fn missing_tag_is_none() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;

        assert!(repo.changed_files_since_tag("v0.1.0")?.is_none());
        Ok(())
    }

    #[test]
    fn tag_on_a_tree_is_an_error() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let tree = repo.inner.head()?.peel_to_tree()?;
        repo.inner.tag_lightweight("v1.0.0", tree.as_object(), false)?;

        let result = repo.changed_files_since_tag("v1.0.0");

        assert!(matches!(result, Err(GitError::TagNotACommit { tag }) if tag == "v1.0.0"));
        Ok(())
    }

    #[test]
    fn unborn_head_is_reported() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let raw = git2::Repository::init(dir.path())?;
        let sig = git2::Signature::now("Test", "test@example.com")?;
        let tree = raw.find_tree(raw.index()?.write_tree()?)?;
        let commit = raw.commit(None, &sig, &sig, "Detached", &tree, &[])?;
        raw.tag_lightweight("v1.0.0", &raw.find_object(commit, None)?, false)?;

        let repo = crate::Repository::open(dir.path())?;
        let result = repo.changed_files_since_tag("v1.0.0");

        assert!(matches!(result, Err(GitError::UnbornHead)));
        Ok(())
    }
}
