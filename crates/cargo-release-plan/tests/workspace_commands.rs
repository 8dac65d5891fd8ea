use std::fs;
use std::path::{Path, PathBuf};

use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, content).expect("write file");
}

fn commit_all(repo: &git2::Repository, message: &str) {
    let mut index = repo.index().expect("open index");
    index
        .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
        .expect("stage files");
    index.write().expect("write index");
    let tree = repo
        .find_tree(index.write_tree().expect("write tree"))
        .expect("find tree");
    let sig = git2::Signature::now("Test", "test@example.com").expect("signature");
    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("commit");
}

/// Workspace released as `v1.0.0`; only `core` changed since.
fn create_workspace() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    let root = dir.path();

    write(
        root,
        "Cargo.toml",
        r#"[workspace]
members = ["crates/*"]
resolver = "2"
"#,
    );
    write(
        root,
        "crates/core/Cargo.toml",
        r#"[package]
name = "core"
version = "1.0.0"
edition = "2021"
"#,
    );
    write(root, "crates/core/src/lib.rs", "pub fn answer() -> u32 { 41 }\n");
    write(
        root,
        "crates/cli/Cargo.toml",
        r#"[package]
name = "cli"
version = "1.0.0"
edition = "2021"

[dependencies]
core = { path = "../core", version = "1.0.0" }
"#,
    );
    write(root, "crates/cli/src/main.rs", "fn main() {}\n");

    let repo = git2::Repository::init(root).expect("init repository");
    commit_all(&repo, "Initial release");
    let head = repo
        .head()
        .and_then(|head| head.peel_to_commit())
        .expect("head commit");
    repo.tag_lightweight("v1.0.0", head.as_object(), false)
        .expect("create tag");

    write(root, "crates/core/src/lib.rs", "pub fn answer() -> u32 { 42 }\n");
    commit_all(&repo, "Fix the answer");

    dir
}

fn spec_path(root: &Path) -> PathBuf {
    root.join(".release-plan").join("RELEASE_SPEC.yml")
}

fn cmd(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cargo-release-plan");
    cmd.current_dir(dir.path())
        .env_remove("VISUAL")
        .env_remove("EDITOR")
        .env_remove("RELEASE_PLAN_FORCE_TTY")
        .env("RELEASE_PLAN_NO_TTY", "1");
    cmd
}

fn manifest(dir: &TempDir, package: &str) -> String {
    fs::read_to_string(dir.path().join(format!("crates/{package}/Cargo.toml")))
        .expect("read manifest")
}

mod changed {
    use super::*;

    #[test]
    fn lists_changed_and_unchanged_packages() {
        let dir = create_workspace();

        cmd(&dir)
            .arg("changed")
            .assert()
            .success()
            .stdout(contains("Changed since latest release:\n  core (1.0.0)"))
            .stdout(contains("Unchanged:\n  cli (1.0.0)"));
    }

    #[test]
    fn path_flag_selects_the_project() {
        let dir = create_workspace();
        let elsewhere = TempDir::new().expect("create temp dir");

        assert_cmd::cargo::cargo_bin_cmd!("cargo-release-plan")
            .current_dir(elsewhere.path())
            .arg("release-plan")
            .arg("-C")
            .arg(dir.path())
            .arg("changed")
            .assert()
            .success()
            .stdout(contains("core (1.0.0)"));
    }
}

mod prepare {
    use super::*;

    #[test]
    fn no_edit_writes_template() {
        let dir = create_workspace();

        cmd(&dir)
            .args(["prepare", "--no-edit"])
            .assert()
            .success()
            .stdout(contains("Release specification written to"))
            .stdout(contains("cargo release-plan apply"));

        let template = fs::read_to_string(spec_path(dir.path())).expect("read template");
        assert!(template.contains("packages:\n  core: null\n"));
        assert!(!template.contains("cli: null"));
    }

    #[test]
    fn bump_is_rejected_for_workspaces() {
        let dir = create_workspace();

        cmd(&dir)
            .args(["prepare", "--no-edit", "--bump", "minor"])
            .assert()
            .failure()
            .stderr(contains("error: --bump only applies to single-package projects"));
    }

    #[cfg(unix)]
    #[test]
    fn editor_result_is_released_with_yes() {
        let dir = create_workspace();

        cmd(&dir)
            .args(["prepare", "--yes", "--editor", "sed -i s/null$/minor/"])
            .assert()
            .success()
            .stdout(contains("Released:\n  core 1.1.0"));

        assert!(manifest(&dir, "core").contains(r#"version = "1.1.0""#));
        assert!(manifest(&dir, "cli").contains(r#"core = { path = "../core", version = "1.1.0" }"#));
        assert!(!spec_path(dir.path()).exists());
    }

    #[cfg(unix)]
    #[test]
    fn non_interactive_release_requires_yes() {
        let dir = create_workspace();

        cmd(&dir)
            .args(["prepare", "--editor", "sed -i s/null$/patch/"])
            .assert()
            .failure()
            .stderr(contains("pass --yes"));

        assert!(manifest(&dir, "core").contains(r#"version = "1.0.0""#));
        assert!(spec_path(dir.path()).exists());
    }
}

mod apply {
    use super::*;

    #[test]
    fn fails_without_specification() {
        let dir = create_workspace();

        cmd(&dir)
            .arg("apply")
            .assert()
            .failure()
            .stderr(contains("no release specification found"))
            .stderr(contains("cargo release-plan prepare"));
    }

    #[test]
    fn releases_edited_specification() {
        let dir = create_workspace();
        write(dir.path(), ".release-plan/RELEASE_SPEC.yml", "packages:\n  core: patch\n");

        cmd(&dir)
            .args(["apply", "--yes"])
            .assert()
            .success()
            .stdout(contains("core 1.0.1"));

        assert!(manifest(&dir, "core").contains(r#"version = "1.0.1""#));
        assert!(!spec_path(dir.path()).exists());
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = create_workspace();
        write(dir.path(), ".release-plan/RELEASE_SPEC.yml", "packages:\n  core: 2.0.0\n  cli: major\n");

        cmd(&dir)
            .args(["apply", "--dry-run"])
            .assert()
            .success()
            .stdout(contains("Dry run"))
            .stdout(contains("core 1.0.0 -> 2.0.0"))
            .stdout(contains("cli 1.0.0 -> 2.0.0"));

        assert!(manifest(&dir, "core").contains(r#"version = "1.0.0""#));
        assert!(spec_path(dir.path()).exists());
    }

    #[test]
    fn reports_every_validation_error() {
        let dir = create_workspace();
        write(dir.path(), "crates/cli/src/main.rs", "fn main() { println!(\"42\"); }\n");
        let repo = git2::Repository::open(dir.path()).expect("open repository");
        commit_all(&repo, "Use the answer");
        write(
            dir.path(),
            ".release-plan/RELEASE_SPEC.yml",
            "packages:\n  core: major\n  nope: patch\n",
        );

        cmd(&dir)
            .args(["apply", "--yes"])
            .assert()
            .failure()
            .stderr(contains("has 2 problem"))
            .stderr(contains("'nope' is not a package in this workspace"))
            .stderr(contains("  - cli"))
            .stdout(contains("Released").not());

        assert!(spec_path(dir.path()).exists());
    }

    #[test]
    fn comment_only_specification_is_malformed_and_kept() {
        let dir = create_workspace();
        write(dir.path(), ".release-plan/RELEASE_SPEC.yml", "# nothing here\n\n");

        cmd(&dir)
            .arg("apply")
            .assert()
            .failure()
            .stderr(contains("is malformed"))
            .stderr(contains("top-level 'packages' key"));

        assert!(spec_path(dir.path()).exists());
        assert!(manifest(&dir, "core").contains(r#"version = "1.0.0""#));
    }
}
