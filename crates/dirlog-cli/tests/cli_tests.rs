//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn dirlog(root: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("dirlog").unwrap();
    cmd.env("HOME", root)
        .env("DIRLOG_EXPERIMENTS_DIRECTORY", root)
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

fn make_runs(root: &Path, project: &str, names: &[&str]) {
    for name in names {
        std::fs::create_dir_all(root.join(project).join(name)).unwrap();
    }
}

#[test]
fn no_arguments_prints_help() {
    let root = TempDir::new().unwrap();
    dirlog(root.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--create"));
}

#[test]
fn help_output() {
    let root = TempDir::new().unwrap();
    dirlog(root.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Directory logging utility"));
}

#[test]
fn version_output() {
    let root = TempDir::new().unwrap();
    dirlog(root.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dirlog"));
}

#[test]
fn create_prints_new_directory() {
    let root = TempDir::new().unwrap();
    let printed = stdout_of(dirlog(root.path()).args(["--create", "My Experiment!"]));
    let path = Path::new(printed.trim());

    assert!(path.is_dir());
    assert_eq!(path.parent().unwrap(), root.path().join("MyExperiment"));
    let leaf = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(leaf.ends_with("_My Experiment!"));
    assert_eq!(leaf.len(), "2024-01-01-00-00-00_My Experiment!".len());
}

#[test]
fn create_twice_never_reuses_a_directory() {
    let root = TempDir::new().unwrap();
    let first = stdout_of(dirlog(root.path()).args(["-c", "exp"]));
    let second = stdout_of(dirlog(root.path()).args(["-c", "exp"]));
    assert_ne!(first, second);
}

#[test]
fn dev_mode_is_stable_across_processes() {
    let root = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();
    let first = stdout_of(
        dirlog(root.path())
            .current_dir(cwd.path())
            .args(["--create", "exp", "--dev"]),
    );
    let second = stdout_of(
        dirlog(root.path())
            .current_dir(cwd.path())
            .args(["--create", "exp", "--dev"]),
    );

    assert_eq!(first, second);
    let expected = Path::new("exp").join("dev_exp");
    assert_eq!(first.trim(), expected.display().to_string());
    assert!(cwd.path().join(&expected).is_dir());
    assert!(!root.path().join("exp").exists());
}

#[test]
fn create_reads_root_from_global_config() {
    let home = TempDir::new().unwrap();
    let root = home.path().join("runs");
    std::fs::write(
        home.path().join(".dirlog"),
        format!("experiments_directory = {:?}\n", root.display().to_string()),
    )
    .unwrap();

    #[allow(deprecated)]
    let printed = stdout_of(
        Command::cargo_bin("dirlog")
            .unwrap()
            .env("HOME", home.path())
            .env_remove("DIRLOG_EXPERIMENTS_DIRECTORY")
            .args(["--create", "exp"]),
    );
    let path = Path::new(printed.trim());
    assert!(path.is_dir());
    assert_eq!(path.parent().unwrap(), root.join("exp"));
}

#[test]
fn dev_mode_ignores_configured_root() {
    let home = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();
    let root = home.path().join("runs");
    std::fs::write(
        home.path().join(".dirlog"),
        format!("experiments_directory = {:?}\n", root.display().to_string()),
    )
    .unwrap();

    #[allow(deprecated)]
    let printed = stdout_of(
        Command::cargo_bin("dirlog")
            .unwrap()
            .env("HOME", home.path())
            .env_remove("DIRLOG_EXPERIMENTS_DIRECTORY")
            .current_dir(cwd.path())
            .args(["--create", "exp", "--dev"]),
    );
    assert_eq!(
        printed.trim(),
        Path::new("exp").join("dev_exp").display().to_string()
    );
    assert!(cwd.path().join("exp").join("dev_exp").is_dir());
    assert!(!root.exists());
}

#[test]
fn malformed_global_config_fails() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join(".dirlog"), "experiments_directory = [").unwrap();

    #[allow(deprecated)]
    Command::cargo_bin("dirlog")
        .unwrap()
        .env("HOME", home.path())
        .env_remove("DIRLOG_EXPERIMENTS_DIRECTORY")
        .args(["--create", "exp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn list_filters_by_time_window() {
    let root = TempDir::new().unwrap();
    make_runs(
        root.path(),
        "MyProject",
        &[
            "2024-01-01-00-00-00_x",
            "2024-06-01-00-00-00_y",
            "2025-01-01-00-00-00_z",
        ],
    );

    let printed = stdout_of(dirlog(root.path()).args([
        "--list",
        "My Project",
        "--since",
        "2024-01-01",
        "--before",
        "2024-12-31",
    ]));

    let lines: Vec<&str> = printed.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("2024-06-01-00-00-00_y"));
}

#[test]
fn list_missing_project_is_empty() {
    let root = TempDir::new().unwrap();
    dirlog(root.path())
        .args(["--list", "ghost"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "Project experiment directory not found",
        ));
}

#[test]
fn list_rejects_bad_time() {
    let root = TempDir::new().unwrap();
    dirlog(root.path())
        .args(["--list", "p", "--since", "last week"])
        .assert()
        .failure();
}

#[test]
fn list_csv_includes_documents() {
    let root = TempDir::new().unwrap();
    make_runs(root.path(), "sweep", &["2024-02-01-00-00-00_sweep"]);
    let run = root.path().join("sweep").join("2024-02-01-00-00-00_sweep");
    std::fs::write(run.join("configs.toml"), "lr = 0.1\n").unwrap();
    std::fs::write(run.join("results.toml"), "acc = 0.9\n").unwrap();

    let printed = stdout_of(dirlog(root.path()).args(["--list", "sweep", "--csv"]));
    let mut lines = printed.lines();
    assert_eq!(lines.next(), Some("experiment_path,acc,lr"));
    assert!(lines.next().unwrap().ends_with(",0.9,0.1"));
}

#[test]
fn list_table_skips_malformed_runs() {
    let root = TempDir::new().unwrap();
    make_runs(
        root.path(),
        "sweep",
        &["2024-02-01-00-00-00_sweep", "2024-02-02-00-00-00_sweep"],
    );
    let good = root.path().join("sweep").join("2024-02-01-00-00-00_sweep");
    let bad = root.path().join("sweep").join("2024-02-02-00-00-00_sweep");
    std::fs::write(good.join("results.toml"), "acc = 0.9\n").unwrap();
    std::fs::write(bad.join("results.toml"), "acc = = 0.9\n").unwrap();

    dirlog(root.path())
        .args(["--list", "sweep", "--table"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error decoding file in"))
        .stdout(predicate::str::contains("acc"))
        .stdout(predicate::str::contains("0.9"));
}
