use std::fs;
use std::path::Path;

use predicates::str::contains;
use tempfile::TempDir;

fn create_single_package_project() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");

    fs::write(
        dir.path().join("Cargo.toml"),
        r#"[package]
name = "my-crate"
version = "0.1.0"
edition = "2021"
"#,
    )
    .expect("write Cargo.toml");
    fs::create_dir_all(dir.path().join("src")).expect("create src dir");
    fs::write(dir.path().join("src/lib.rs"), "").expect("write lib.rs");
    fs::write(
        dir.path().join("CHANGELOG.md"),
        "# Changelog\n\n## [Unreleased]\n\n- First feature\n",
    )
    .expect("write CHANGELOG.md");

    let repo = git2::Repository::init(dir.path()).expect("init repository");
    let mut index = repo.index().expect("open index");
    index
        .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
        .expect("stage files");
    index.write().expect("write index");
    let tree = repo
        .find_tree(index.write_tree().expect("write tree"))
        .expect("find tree");
    let sig = git2::Signature::now("Test", "test@example.com").expect("signature");
    repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
        .expect("commit");

    dir
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).expect("read file")
}

fn cmd(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cargo-release-plan");
    cmd.current_dir(dir.path()).env("RELEASE_PLAN_NO_TTY", "1");
    cmd
}

#[test]
fn bump_releases_the_package() {
    let dir = create_single_package_project();

    cmd(&dir)
        .args(["prepare", "--bump", "minor", "--yes"])
        .assert()
        .success()
        .stdout(contains("my-crate 0.2.0"));

    assert!(read(dir.path(), "Cargo.toml").contains(r#"version = "0.2.0""#));
    assert!(read(dir.path(), "CHANGELOG.md").contains("## [0.2.0] - "));
}

#[test]
fn exact_version_must_increase() {
    let dir = create_single_package_project();

    cmd(&dir)
        .args(["prepare", "--bump", "0.1.0", "--yes"])
        .assert()
        .failure()
        .stderr(contains("already at version 0.1.0"));

    assert!(read(dir.path(), "Cargo.toml").contains(r#"version = "0.1.0""#));
}

#[test]
fn bump_is_required() {
    let dir = create_single_package_project();

    cmd(&dir)
        .arg("prepare")
        .assert()
        .failure()
        .stderr(contains("pass --bump"));
}

#[test]
fn dry_run_shows_plan() {
    let dir = create_single_package_project();

    cmd(&dir)
        .args(["prepare", "--bump", "major", "--dry-run"])
        .assert()
        .success()
        .stdout(contains("my-crate 0.1.0 -> 1.0.0"));

    assert!(read(dir.path(), "Cargo.toml").contains(r#"version = "0.1.0""#));
}
