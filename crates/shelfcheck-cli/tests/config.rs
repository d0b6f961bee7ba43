//! Configuration loading with priority ordering:
//! CLI > Environment > File > Defaults

use serial_test::serial;
use shelfcheck_cli::config::{ConfigOverrides, ShelfConfig};
use shelfcheck_cli::{CliError, ConfigError};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const FILE_CONFIG: &str = r#"{
    "targetUrl": "https://file.example",
    "timeoutMinutes": 5,
    "scenarios": [{
        "name": "Smartphones",
        "catalogSection": "Электроника",
        "sectionItem": "Смартфоны",
        "filters": [
            { "kind": "range", "name": "Цена", "min": 10000, "max": 90000 },
            { "kind": "multiValue", "name": "Производитель", "values": ["Apple"] }
        ]
    }]
}"#;

fn project(content: &str, name: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(name), content).unwrap();
    temp
}

fn clear_env() {
    unsafe {
        std::env::remove_var("SHELFCHECK_TARGET_URL");
        std::env::remove_var("SHELFCHECK_TIMEOUT_MINUTES");
        std::env::remove_var("SHELFCHECK_HEADLESS");
    }
}

#[test]
#[serial]
fn file_values_over_defaults() {
    clear_env();
    let temp = project(FILE_CONFIG, "shelfcheck.json");

    let config = ShelfConfig::load_from(temp.path(), None, &ConfigOverrides::default()).unwrap();

    assert_eq!(config.target_url, "https://file.example");
    assert_eq!(config.timeout_minutes, 5);
    assert_eq!(config.min_products, 12);
    assert_eq!(config.scenarios.len(), 1);
    assert_eq!(config.scenarios[0].filters.len(), 2);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn environment_over_file() {
    clear_env();
    let temp = project(FILE_CONFIG, "shelfcheck.json");
    unsafe {
        std::env::set_var("SHELFCHECK_TIMEOUT_MINUTES", "3");
        std::env::set_var("SHELFCHECK_HEADLESS", "false");
    }

    let config = ShelfConfig::load_from(temp.path(), None, &ConfigOverrides::default());
    clear_env();
    let config = config.unwrap();

    assert_eq!(config.timeout_minutes, 3);
    assert!(!config.headless);
    assert_eq!(config.target_url, "https://file.example");
}

#[test]
#[serial]
fn cli_over_environment() {
    clear_env();
    let temp = project(FILE_CONFIG, "shelfcheck.json");
    unsafe {
        std::env::set_var("SHELFCHECK_TIMEOUT_MINUTES", "3");
    }

    let overrides = ConfigOverrides {
        target_url: Some("https://cli.example".to_string()),
        timeout_minutes: Some(1),
        headless: None,
        evidence_dir: Some(PathBuf::from("shots")),
    };
    let config = ShelfConfig::load_from(temp.path(), None, &overrides);
    clear_env();
    let config = config.unwrap();

    assert_eq!(config.target_url, "https://cli.example");
    assert_eq!(config.timeout_minutes, 1);
    assert_eq!(config.evidence_dir, Some(PathBuf::from("shots")));
}

#[test]
#[serial]
fn explicit_toml_file() {
    clear_env();
    let temp = project(
        r#"
targetUrl = "https://toml.example"

[[scenarios]]
name = "Notebooks"
catalogSection = "Ноутбуки и компьютеры"
sectionItem = "Ноутбуки"

[[scenarios.filters]]
kind = "range"
name = "Цена"
min = 10000
max = 90000

[[scenarios]]
name = "Smartphones"
catalogSection = "Электроника"
sectionItem = "Смартфоны"

[[scenarios.filters]]
kind = "multiValue"
name = "Производитель"
values = ["Apple"]

[locators]
nextPage = "//a[@rel='next']"
"#,
        "notebooks.toml",
    );

    let path = temp.path().join("notebooks.toml");
    let config =
        ShelfConfig::load_from(temp.path(), Some(&path), &ConfigOverrides::default()).unwrap();

    assert_eq!(config.target_url, "https://toml.example");
    let names: Vec<&str> = config.scenarios.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Notebooks", "Smartphones"]);
    assert_eq!(config.scenarios[1].filters.len(), 1);
    assert!(config.validate().is_ok());
    assert_eq!(config.locators.next_page, "//a[@rel='next']");
    assert_eq!(
        config.locators.product_list,
        shelfcheck_browser::CatalogLocators::default().product_list
    );
}

#[test]
#[serial]
fn missing_explicit_file() {
    clear_env();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.json");

    let err = ShelfConfig::load_from(temp.path(), Some(&path), &ConfigOverrides::default())
        .unwrap_err();
    assert!(matches!(err, CliError::Config(ConfigError::NotFound(p)) if p == path));
}

#[test]
#[serial]
fn unsupported_extension() {
    clear_env();
    let temp = project("targetUrl: x", "shelfcheck.yaml");
    let path = temp.path().join("shelfcheck.yaml");

    let err = ShelfConfig::load_from(temp.path(), Some(&path), &ConfigOverrides::default())
        .unwrap_err();
    assert!(matches!(err, CliError::Config(ConfigError::UnsupportedFormat(_))));
}

#[test]
#[serial]
fn typo_in_field_name_is_reported() {
    clear_env();
    let temp = project(
        r#"{
            "targetUrl": "https://file.example",
            "timeoutMinute": 5
        }"#,
        "shelfcheck.json",
    );

    let err = ShelfConfig::load_from(temp.path(), None, &ConfigOverrides::default()).unwrap_err();
    assert!(matches!(err, CliError::Config(ConfigError::Load(ref msg)) if msg.contains("timeoutMinute")));
}
