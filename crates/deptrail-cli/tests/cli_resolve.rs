use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn deptrail_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("deptrail").unwrap();
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

fn write_project(root: &Path, name: &str, body: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("project.toml"), body).unwrap();
}

fn workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_project(
        tmp.path(),
        "App",
        "[package]\nname = \"App\"\nversion = \"1.0.0\"\n[dependencies]\nLib = \"*\"\nUtil = \">=2.0\"\n",
    );
    write_project(
        tmp.path(),
        "Lib",
        "[package]\nname = \"Lib\"\nversion = \"1.5.0\"\n[dependencies]\nUtil = \"^1\"\n",
    );
    write_project(
        tmp.path(),
        "Util",
        "[package]\nname = \"Util\"\nversion = \"2.1.0\"\n",
    );
    tmp
}

#[test]
fn test_resolve_from_workspace_directory() {
    let tmp = workspace();

    deptrail_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["resolve", "App"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Resolved 3 libraries for App (DNXCore,Version=v5.0)",
        ))
        .stdout(predicate::str::contains("Lib@1.5.0 [project]"))
        .stdout(predicate::str::contains("  -> Util@2.1.0"));
}

#[test]
fn test_resolve_from_inside_a_project() {
    let tmp = workspace();

    deptrail_cmd(tmp.path())
        .current_dir(tmp.path().join("App"))
        .args(["resolve", "App"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Util@2.1.0 [project]"));
}

#[test]
fn test_resolve_with_explicit_search_path_and_framework() {
    let tmp = workspace();
    let elsewhere = TempDir::new().unwrap();

    deptrail_cmd(tmp.path())
        .current_dir(elsewhere.path())
        .args(["resolve", "App", "--framework", ".NETFramework,Version=v4.5", "-p"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(.NETFramework,Version=v4.5)"))
        .stdout(predicate::str::contains("mscorlib").not());
}

#[test]
fn test_resolve_json() {
    let tmp = workspace();

    let output = deptrail_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["resolve", "App", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.trim_start().starts_with('{'), "got: {stdout}");
    assert!(stdout.contains("\"root\": \"App\""));
    assert!(stdout.contains("\"type\": \"project\""));
    assert!(stdout.contains("eclipsed by Util >=2.0 at App -> Util"));
}

#[test]
fn test_resolve_reads_global_config() {
    let tmp = workspace();
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".deptrail");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        format!(
            "[resolve]\nsearch-paths = [{:?}]\ndefault-framework = \"DNX,Version=v4.5.1\"\n",
            tmp.path().display().to_string()
        ),
    )
    .unwrap();

    deptrail_cmd(home.path())
        .current_dir(home.path())
        .args(["resolve", "App"])
        .assert()
        .success()
        .stdout(predicate::str::contains("for App (DNX,Version=v4.5.1)"));
}

#[test]
fn test_resolve_missing_project_fails() {
    let tmp = workspace();

    deptrail_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["resolve", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("project 'Nope' not found"));
}

#[test]
fn test_resolve_circular_dependency_fails() {
    let tmp = TempDir::new().unwrap();
    write_project(
        tmp.path(),
        "A",
        "[package]\nname = \"A\"\nversion = \"1.0.0\"\n[dependencies]\nB = \"*\"\n",
    );
    write_project(
        tmp.path(),
        "B",
        "[package]\nname = \"B\"\nversion = \"1.0.0\"\n[dependencies]\nA = \"*\"\n",
    );

    deptrail_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["resolve", "A"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Circular dependency detected A -> B -> A.",
        ));
}

#[test]
fn test_verbose_logs_go_to_stderr() {
    let tmp = workspace();

    deptrail_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["-v", "resolve", "App", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"))
        .stderr(predicate::str::contains("graph walk stage 1 finished"));
}
