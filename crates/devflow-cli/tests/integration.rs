use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn devflow(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("devflow").unwrap();
    cmd.current_dir(dir.path()).env("DEVFLOW_ROOT", dir.path());
    cmd
}

fn init_workspace(dir: &TempDir) {
    devflow(dir)
        .args(["init", "--name", "test-workspace"])
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// devflow init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_directory_tree() {
    let dir = TempDir::new().unwrap();
    devflow(&dir).arg("init").assert().success();

    assert!(dir.path().join(".devflow").is_dir());
    assert!(dir.path().join(".devflow/projects").is_dir());
    assert!(dir.path().join(".devflow/config.yaml").exists());
    assert!(dir.path().join(".devflow/state.yaml").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    devflow(&dir).arg("init").assert().success();
    devflow(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already initialized"));
}

#[test]
fn state_before_init_fails() {
    let dir = TempDir::new().unwrap();
    devflow(&dir)
        .arg("state")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

// ---------------------------------------------------------------------------
// devflow project
// ---------------------------------------------------------------------------

#[test]
fn project_create_and_list() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    devflow(&dir)
        .args(["project", "create", "shop-api", "--name", "Shop API"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created project: shop-api"));

    devflow(&dir)
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shop-api"))
        .stdout(predicate::str::contains("requirements"));
}

#[test]
fn project_create_rejects_bad_slug() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    devflow(&dir)
        .args(["project", "create", "Bad Slug"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid slug"));
}

#[test]
fn project_show_json() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    devflow(&dir)
        .args(["project", "create", "shop", "--name", "Shop"])
        .assert()
        .success();

    let output = devflow(&dir)
        .args(["--json", "project", "show", "shop"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["slug"], "shop");
    assert_eq!(json["stage"], "requirements");
}

#[test]
fn project_advance_forward_only() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    devflow(&dir)
        .args(["project", "create", "shop"])
        .assert()
        .success();

    devflow(&dir)
        .args(["project", "advance", "shop", "specification"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Advanced 'shop' to specification"));

    devflow(&dir)
        .args(["project", "advance", "shop", "requirements"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("forward-only"));
}

// ---------------------------------------------------------------------------
// devflow req
// ---------------------------------------------------------------------------

#[test]
fn requirement_add_list_done() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    devflow(&dir)
        .args(["project", "create", "shop"])
        .assert()
        .success();

    devflow(&dir)
        .args(["req", "add", "shop", "Users can log in", "--priority", "must"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added requirement R1"));

    devflow(&dir)
        .args(["req", "list", "shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Users can log in"))
        .stdout(predicate::str::contains("0/1 done"));

    devflow(&dir)
        .args(["req", "done", "shop", "R1"])
        .assert()
        .success();

    devflow(&dir)
        .args(["req", "list", "shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1/1 done"));
}

#[test]
fn requirement_unknown_priority_fails() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    devflow(&dir)
        .args(["project", "create", "shop"])
        .assert()
        .success();

    devflow(&dir)
        .args(["req", "add", "shop", "X", "--priority", "urgent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown priority"));
}

// ---------------------------------------------------------------------------
// devflow spec
// ---------------------------------------------------------------------------

#[test]
fn spec_set_and_show() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    devflow(&dir)
        .args(["project", "create", "shop"])
        .assert()
        .success();

    devflow(&dir)
        .args([
            "spec",
            "set",
            "shop",
            "functional_requirements",
            "Login and checkout.",
        ])
        .assert()
        .success();

    devflow(&dir)
        .args(["spec", "show", "shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Login and checkout."))
        .stdout(predicate::str::contains("== User Stories =="));
}

#[test]
fn spec_set_unknown_section_fails() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    devflow(&dir)
        .args(["project", "create", "shop"])
        .assert()
        .success();

    devflow(&dir)
        .args(["spec", "set", "shop", "appendix", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown section"));
}

#[test]
fn spec_show_without_spec_fails() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    devflow(&dir)
        .args(["project", "create", "shop"])
        .assert()
        .success();

    devflow(&dir)
        .args(["spec", "show", "shop"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no specification"));
}

// ---------------------------------------------------------------------------
// devflow design
// ---------------------------------------------------------------------------

#[test]
fn design_add_from_file_sanitizes() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    devflow(&dir)
        .args(["project", "create", "shop"])
        .assert()
        .success();

    let diagram_file = dir.path().join("diagram.mmd");
    std::fs::write(
        &diagram_file,
        "```mermaid\ngraph TD\n  A --> B\n```",
    )
    .unwrap();

    devflow(&dir)
        .args([
            "design",
            "add",
            "shop",
            "Service layout",
            "--file",
            diagram_file.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added design D1"));

    devflow(&dir)
        .args(["design", "show", "shop", "D1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("graph TD"))
        .stdout(predicate::str::contains("A --> B").and(predicate::str::contains("```").not()));
}

#[test]
fn design_generate_without_spec_fails() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    devflow(&dir)
        .args(["project", "create", "shop"])
        .assert()
        .success();

    devflow(&dir)
        .args(["design", "generate", "shop"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("generate the specification first"));
}

// ---------------------------------------------------------------------------
// devflow config
// ---------------------------------------------------------------------------

#[test]
fn config_show_and_validate() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    devflow(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Workspace:   test-workspace"));

    devflow(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration OK"));
}
