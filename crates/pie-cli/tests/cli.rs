//! CLI command integration tests.
//! Each test points HOME at a temp directory so no user config leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pie_cmd(home: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("pie").unwrap();
    cmd.env("HOME", home.path()).env_remove("PIE_CONFIG");
    cmd
}

fn write_script(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("session.pie");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn play_script_adds_fractions() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        "# one half plus one quarter\n\
         add\n\
         divide 1 +1\n\
         add\n\
         divide 2 +3\n\
         mode drag\n\
         handle 1\n\
         container 2\n\
         show\n",
    );
    pie_cmd(&dir)
        .arg("play")
        .arg("--script")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("[ok] Fractions added!"))
        .stdout(predicate::str::contains("3/4"))
        .stdout(predicate::str::contains("Cleaning up empty circles"));
}

#[test]
fn play_reads_stdin() {
    let dir = TempDir::new().unwrap();
    pie_cmd(&dir)
        .arg("play")
        .write_stdin("add\nadd\ndup 2\nshow\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Circle duplicated"))
        .stdout(predicate::str::contains("[3]"));
}

#[test]
fn play_json_snapshot() {
    let dir = TempDir::new().unwrap();
    let output = pie_cmd(&dir)
        .arg("play")
        .write_stdin("add\ndivide 1 +2\njson\n")
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["mode"], "select");
    assert_eq!(json["groups"][0]["fraction"]["denominator"], 3);
    assert_eq!(json["totals"]["activeSlices"], 1);
}

#[test]
fn play_bad_line_fails_but_runs_rest() {
    let dir = TempDir::new().unwrap();
    pie_cmd(&dir)
        .arg("play")
        .write_stdin("add\nslice 9 1 1\nshow\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("[1]"))
        .stderr(predicate::str::contains("line 2: no group at position 9"))
        .stderr(predicate::str::contains("1 command(s) failed"));
}

#[test]
fn play_missing_script() {
    let dir = TempDir::new().unwrap();
    pie_cmd(&dir)
        .args(["play", "--script"])
        .arg(dir.path().join("nope.pie"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open script"));
}

#[test]
fn group_uses_default_total() {
    let dir = TempDir::new().unwrap();
    pie_cmd(&dir)
        .args(["group", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("40 ÷ 6 = 6 remainder 4"))
        .stdout(predicate::str::contains("remainder"));
}

#[test]
fn group_rejects_oversized_groups() {
    let dir = TempDir::new().unwrap();
    pie_cmd(&dir)
        .args(["group", "13", "--total", "12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot group blocks"));
}

#[test]
fn rect_fits_and_misses() {
    let dir = TempDir::new().unwrap();
    pie_cmd(&dir)
        .args(["rect", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success! 5 is a factor of 40"))
        .stdout(predicate::str::contains("5 columns × 8 rows = 40 total blocks."));

    pie_cmd(&dir)
        .args(["rect", "5", "--total", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5 is not a factor of 12."))
        .stdout(predicate::str::contains("Try: 1, 2, 3, 4, 6, 12"));
}

#[test]
fn factors_lists_divisors() {
    let dir = TempDir::new().unwrap();
    pie_cmd(&dir)
        .args(["factors", "--total", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("factors of 12: 1, 2, 3, 4, 6, 12"));
}

#[test]
fn config_flag_sets_total() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("pie.toml");
    std::fs::write(&config, "total_blocks = 24\n").unwrap();
    pie_cmd(&dir)
        .arg("--config")
        .arg(&config)
        .arg("factors")
        .assert()
        .success()
        .stdout(predicate::str::contains("factors of 24:"));
}

#[test]
fn config_env_and_home_fallback() {
    let dir = TempDir::new().unwrap();
    let home_config = dir.path().join(".config").join("pie");
    std::fs::create_dir_all(&home_config).unwrap();
    std::fs::write(home_config.join("pie.toml"), "total_blocks = 18\n").unwrap();
    pie_cmd(&dir)
        .arg("factors")
        .assert()
        .success()
        .stdout(predicate::str::contains("factors of 18:"));

    let env_config = dir.path().join("env.toml");
    std::fs::write(&env_config, "total_blocks = 30\n").unwrap();
    pie_cmd(&dir)
        .env("PIE_CONFIG", &env_config)
        .arg("factors")
        .assert()
        .success()
        .stdout(predicate::str::contains("factors of 30:"));
}

#[test]
fn config_max_divisions_caps_divide() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("pie.toml");
    std::fs::write(&config, "max_divisions = 4\n").unwrap();
    pie_cmd(&dir)
        .arg("--config")
        .arg(&config)
        .arg("play")
        .write_stdin("add\ndivide 1 +10\njson\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"maxDivisions\": 4"))
        .stdout(predicate::str::contains("\"denominator\": 4"));
}

#[test]
fn bad_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("pie.toml");
    std::fs::write(&config, "max_divisions = 0\n").unwrap();
    pie_cmd(&dir)
        .arg("--config")
        .arg(&config)
        .arg("factors")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"))
        .stderr(predicate::str::contains("max_divisions must be at least 1"));
}
