use actionflow::io::WORKFLOWS_DIR_ENV;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{tempdir, TempDir};

const BUILD: &str = r#"# ---
# name: Build
# description: Compile and test on every push
# type: set
# triggers: [push, pull_request]
# secrets:
#   - name: CACHE_TOKEN
#     description: Token for the build cache
#     required: true
# ---
name: Build
on: [push, pull_request]
"#;

const RELEASE: &str =
    "# name: Release\n# type: template\n# description: Publish a release\non: workflow_dispatch\n";

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn catalog() -> TempDir {
    let temp = tempdir().unwrap();
    write(temp.path(), "ci/build/build.yml", BUILD);
    write(temp.path(), "ci/build/build-nix.yml", "name: Build (nix)\n");
    write(temp.path(), "ci/templates/ci-release.yml", RELEASE);
    temp
}

fn actionflow(catalog: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_actionflow"))
        .arg("--workflows-dir")
        .arg(catalog)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute actionflow")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn test_cli_help_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_actionflow"))
        .arg("--help")
        .output()
        .expect("Failed to execute actionflow --help");

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("list"));
    assert!(stdout.contains("inspect"));
    assert!(stdout.contains("install"));
}

#[test]
fn test_list_table() {
    let catalog = catalog();
    let output = actionflow(catalog.path(), &["list"]);

    assert!(output.status.success(), "{}", stderr(&output));
    let stdout = stdout(&output);
    assert!(stdout.contains("ci/build"));
    assert!(stdout.contains("ci/release"));
    assert!(stdout.contains("standard, nix"));
    assert!(stdout.contains("Total: 2 workflow(s)"));
}

#[test]
fn test_list_json_with_filters() {
    let catalog = catalog();
    let output = actionflow(catalog.path(), &["list", "--type", "template", "--json"]);

    assert!(output.status.success(), "{}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let workflows = json.as_array().unwrap();
    assert_eq!(workflows.len(), 1);
    assert_eq!(workflows[0]["id"], "ci/release");
    assert_eq!(workflows[0]["type"], "template");
    assert_eq!(workflows[0]["workflowType"], "release");
}

#[test]
fn test_list_json_no_matches() {
    let catalog = catalog();
    let output = actionflow(catalog.path(), &["list", "--category", "docs", "--json"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json, serde_json::json!([]));
}

#[test]
fn test_list_no_matches_message() {
    let catalog = catalog();
    let output = actionflow(catalog.path(), &["list", "--variant", "docker"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("No workflows found matching the criteria."));
}

#[test]
fn test_inspect_details() {
    let catalog = catalog();
    let output = actionflow(catalog.path(), &["inspect", "ci/build"]);

    assert!(output.status.success(), "{}", stderr(&output));
    let stdout = stdout(&output);
    assert!(stdout.contains("Build"));
    assert!(stdout.contains("ID:       ci/build"));
    assert!(stdout.contains("Compile and test on every push"));
    assert!(stdout.contains("→ standard"));
    assert!(stdout.contains("nix: Uses Nix for reproducible environment"));
    assert!(stdout.contains("CACHE_TOKEN (required)"));
    assert!(stdout.contains("• pull_request"));
}

#[test]
fn test_inspect_raw_variant() {
    let catalog = catalog();
    let output = actionflow(catalog.path(), &["inspect", "ci/build", "--variant", "nix", "--raw"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "name: Build (nix)\n");
}

#[test]
fn test_inspect_json() {
    let catalog = catalog();
    let output = actionflow(catalog.path(), &["inspect", "ci/build", "--json"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["metadata"]["name"], "Build");
    assert_eq!(json["metadata"]["secrets"][0]["required"], true);
    assert_eq!(json["variants"][1]["name"], "nix");
}

#[test]
fn test_inspect_unknown_workflow() {
    let catalog = catalog();
    let output = actionflow(catalog.path(), &["inspect", "ci/nope"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("ci/nope"));
}

#[test]
fn test_install_and_refuse_overwrite() {
    let catalog = catalog();
    let target = tempdir().unwrap();
    let target_arg = target.path().to_str().unwrap();

    let first = actionflow(catalog.path(), &["install", "ci/build", "--target", target_arg]);
    assert!(first.status.success(), "{}", stderr(&first));
    assert!(stdout(&first).contains("Successfully installed Build (standard)"));
    assert!(stdout(&first).contains("CACHE_TOKEN"));

    let installed = target.path().join(".github/workflows/build.yml");
    assert_eq!(fs::read_to_string(&installed).unwrap(), BUILD);

    let second = actionflow(catalog.path(), &["install", "ci/build", "--target", target_arg]);
    assert!(!second.status.success());
    assert!(stderr(&second).contains("Use --force to overwrite."));

    let forced = actionflow(
        catalog.path(),
        &["install", "ci/build", "--force", "--target", target_arg],
    );
    assert!(forced.status.success());
}

#[test]
fn test_install_dry_run() {
    let catalog = catalog();
    let target = tempdir().unwrap();

    let output = actionflow(
        catalog.path(),
        &[
            "install",
            "ci/build",
            "ci/release",
            "--dry-run",
            "--target",
            target.path().to_str().unwrap(),
        ],
    );

    assert!(output.status.success(), "{}", stderr(&output));
    let stdout = stdout(&output);
    assert!(stdout.contains("Would install Build (standard)"));
    assert!(stdout.contains("Would install Release (standard)"));
    assert!(!target.path().join(".github").exists());
}

#[test]
fn test_install_unknown_variant_installs_nothing() {
    let catalog = catalog();
    let target = tempdir().unwrap();

    let output = actionflow(
        catalog.path(),
        &[
            "install",
            "ci/build",
            "ci/release",
            "--variant",
            "nix",
            "--target",
            target.path().to_str().unwrap(),
        ],
    );

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Available variants for 'ci/release'"));
    assert!(!target.path().join(".github").exists());
}

#[test]
fn test_workflows_dir_from_environment() {
    let catalog = catalog();
    let output = Command::new(env!("CARGO_BIN_EXE_actionflow"))
        .args(["list", "--json"])
        .env(WORKFLOWS_DIR_ENV, catalog.path())
        .output()
        .expect("Failed to execute actionflow");

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[test]
fn test_logs_stay_off_stdout() {
    let catalog = catalog();
    let output = actionflow(catalog.path(), &["--log-level", "debug", "list", "--json"]);

    assert!(output.status.success());
    assert!(serde_json::from_str::<serde_json::Value>(&stdout(&output)).is_ok());
    assert!(stderr(&output).contains("Loaded 2 workflow(s)"));
}

#[test]
fn test_missing_workflows_dir_gives_empty_catalog() {
    let temp = tempdir().unwrap();
    let output = actionflow(&temp.path().join("not-here"), &["list", "--json"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json, serde_json::json!([]));
    assert!(stderr(&output).contains("does not exist"));
}
