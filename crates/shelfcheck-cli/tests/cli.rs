//! End-to-end tests of the `shelfcheck` binary for everything that does not
//! need a browser.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn shelfcheck(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("shelfcheck").unwrap();
    cmd.current_dir(dir.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("SHELFCHECK_TARGET_URL")
        .env_remove("SHELFCHECK_TIMEOUT_MINUTES");
    cmd
}

#[test]
fn init_then_check() {
    let temp = TempDir::new().unwrap();

    shelfcheck(&temp)
        .arg("init")
        .assert()
        .success()
        .stderr(predicate::str::contains("Created"));
    assert!(temp.path().join("shelfcheck.json").is_file());

    shelfcheck(&temp)
        .arg("check")
        .assert()
        .success()
        .stderr(predicate::str::contains("Configuration is valid"))
        .stderr(predicate::str::contains("Цена [10000..=90000]"))
        .stderr(predicate::str::contains("Производитель {HUAWEI, Lenovo}"))
        .stderr(predicate::str::contains("Scenario 'Smartphones': Электроника / Смартфоны"))
        .stderr(predicate::str::contains("Производитель {Apple}"));
}

#[test]
fn init_refuses_to_overwrite() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("shelfcheck.json"), "{}").unwrap();

    shelfcheck(&temp)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    assert_eq!(fs::read_to_string(temp.path().join("shelfcheck.json")).unwrap(), "{}");

    shelfcheck(&temp).args(["init", "--force"]).assert().success();
    assert!(fs::read_to_string(temp.path().join("shelfcheck.json"))
        .unwrap()
        .contains("targetUrl"));
}

#[test]
fn toml_config_is_discovered() {
    let temp = TempDir::new().unwrap();

    shelfcheck(&temp).args(["init", "--format", "toml"]).assert().success();
    assert!(temp.path().join("shelfcheck.toml").is_file());

    shelfcheck(&temp)
        .arg("check")
        .assert()
        .success()
        .stderr(predicate::str::contains("shelfcheck.toml"));
}

#[test]
fn schema_goes_to_stdout() {
    let temp = TempDir::new().unwrap();

    shelfcheck(&temp)
        .args(["check", "--schema"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"targetUrl\""))
        .stdout(predicate::str::contains("\"multiValue\""));
}

#[test]
fn missing_explicit_config_fails() {
    let temp = TempDir::new().unwrap();

    shelfcheck(&temp)
        .args(["check", "--config", "nowhere.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn config_without_filters_is_invalid() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("shelfcheck.json"),
        r#"{
            "targetUrl": "https://market.example",
            "scenarios": [{ "name": "Smartphones", "catalogSection": "Электроника", "sectionItem": "Смартфоны" }]
        }"#,
    )
    .unwrap();

    shelfcheck(&temp)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("filters"));
}

#[test]
fn environment_overrides_file() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("shelfcheck.json"),
        r#"{
            "targetUrl": "not a url",
            "scenarios": [{
                "name": "Smartphones",
                "catalogSection": "Электроника",
                "sectionItem": "Смартфоны",
                "filters": [{ "kind": "multiValue", "name": "Производитель", "values": ["Apple"] }]
            }]
        }"#,
    )
    .unwrap();

    shelfcheck(&temp).arg("check").assert().failure();

    shelfcheck(&temp)
        .arg("check")
        .env("SHELFCHECK_TARGET_URL", "https://market.example")
        .assert()
        .success()
        .stderr(predicate::str::contains("https://market.example"));
}

#[test]
fn verify_fails_before_launching_without_config() {
    let temp = TempDir::new().unwrap();

    shelfcheck(&temp)
        .arg("verify")
        .assert()
        .failure()
        .stderr(predicate::str::contains("targetUrl").or(predicate::str::contains("target_url")));
}

#[test]
fn unknown_scenario_fails_before_launching() {
    let temp = TempDir::new().unwrap();
    shelfcheck(&temp).arg("init").assert().success();

    shelfcheck(&temp)
        .args(["verify", "--scenario", "Tablets"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no scenario named 'Tablets'"))
        .stderr(predicate::str::contains("Notebooks, Smartphones"));
}

#[test]
fn verbose_and_quiet_conflict() {
    let temp = TempDir::new().unwrap();

    shelfcheck(&temp)
        .args(["--verbose", "--quiet", "check"])
        .assert()
        .failure();
}
