#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::error::{CliError, ConfigError};
    use shelfcheck_core::FilterSpec;
    use std::path::PathBuf;

    fn minimal() -> ShelfConfig {
        serde_json::from_str(
            r#"{
                "targetUrl": "https://market.example",
                "scenarios": [{
                    "name": "Smartphones",
                    "catalogSection": "Электроника",
                    "sectionItem": "Смартфоны",
                    "filters": [{ "kind": "multiValue", "name": "Производитель", "values": ["Apple"] }]
                }]
            }"#,
        )
        .unwrap()
    }

    fn with_scenario(edit: impl FnOnce(&mut Scenario)) -> ShelfConfig {
        let mut config = minimal();
        edit(&mut config.scenarios[0]);
        config
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let config = minimal();
        assert_eq!(config.expected_title, "Яндекс Маркет");
        assert_eq!(config.timeout_minutes, 10);
        assert_eq!(config.min_products, 12);
        assert_eq!((config.window_width, config.window_height), (1920, 1080));
        assert_eq!(config.wait_timeout_secs, 60);
        assert!(config.evidence_dir.is_none());
        assert_eq!(config.locators, shelfcheck_browser::CatalogLocators::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn serialization_is_camel_case_and_sparse() {
        let json = serde_json::to_value(minimal()).unwrap();
        assert!(json.get("targetUrl").is_some());
        assert!(json.get("timeoutMinutes").is_some());
        assert!(json.get("target_url").is_none());
        assert!(json.get("chromePath").is_none());
        assert!(json.get("evidenceDir").is_none());
        assert!(json.get("locators").is_none());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<ShelfConfig, _> = serde_json::from_str(
            r#"{
                "targetUrl": "https://market.example",
                "timeout": 5
            }"#,
        );
        assert!(result.is_err());

        let result: Result<ShelfConfig, _> = serde_json::from_str(
            r#"{
                "targetUrl": "https://market.example",
                "scenarios": [{ "name": "a", "catalogSection": "b", "sectionItem": "c", "filter": [] }]
            }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn example_is_valid() {
        let example = ShelfConfig::example();
        assert!(example.validate().is_ok());
        let names: Vec<&str> = example.scenarios.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Notebooks", "Smartphones"]);

        let parsed: ShelfConfig =
            serde_json::from_str(&ShelfConfig::example_config().unwrap()).unwrap();
        assert_eq!(parsed, example);

        let parsed: ShelfConfig =
            toml::from_str(&ShelfConfig::example_config_toml().unwrap()).unwrap();
        assert_eq!(parsed, example);
    }

    #[test]
    fn validation_rejects_missing_pieces() {
        let no_scenarios = ShelfConfig {
            scenarios: vec![],
            ..minimal()
        };
        assert!(matches!(
            no_scenarios.validate(),
            Err(CliError::Config(ConfigError::MissingField { ref field, .. })) if field == "scenarios"
        ));

        let no_filters = with_scenario(|s| s.filters.clear());
        assert!(matches!(
            no_filters.validate(),
            Err(CliError::Config(ConfigError::MissingField { ref field, .. }))
                if field == "scenarios.Smartphones.filters"
        ));

        let relative = ShelfConfig {
            target_url: "market.example".to_string(),
            ..minimal()
        };
        assert!(relative.validate().is_err());

        let blank_section = with_scenario(|s| s.section_item = "  ".to_string());
        assert!(blank_section.validate().is_err());

        let unnamed = with_scenario(|s| s.name = String::new());
        assert!(unnamed.validate().is_err());

        let no_window = ShelfConfig {
            window_height: 0,
            ..minimal()
        };
        assert!(no_window.validate().is_err());

        let no_wait = ShelfConfig {
            wait_timeout_secs: 0,
            ..minimal()
        };
        assert!(no_wait.validate().is_err());
    }

    #[test]
    fn validation_reports_bad_filter() {
        let inverted = with_scenario(|s| {
            s.filters = vec![FilterSpec::Range {
                name: "Цена".to_string(),
                min: 90_000,
                max: 10_000,
            }];
        });
        let err = inverted.validate().unwrap_err();
        assert!(matches!(
            err,
            CliError::Config(ConfigError::InvalidValue { ref value, .. }) if value == "Цена"
        ));
    }

    #[test]
    fn duplicate_scenario_names_are_rejected() {
        let mut config = minimal();
        config.scenarios.push(config.scenarios[0].clone());
        assert!(matches!(
            config.validate(),
            Err(CliError::Config(ConfigError::InvalidValue { ref value, .. })) if value == "Smartphones"
        ));
    }

    #[test]
    fn scenarios_are_selected_by_name_in_config_order() {
        let example = ShelfConfig::example();

        assert_eq!(example.select_scenarios(&[]).unwrap().len(), 2);

        let picked = example
            .select_scenarios(&["Smartphones".to_string(), "Notebooks".to_string()])
            .unwrap();
        assert_eq!(picked[0].name, "Notebooks");
        assert_eq!(picked[1].name, "Smartphones");

        let err = example.select_scenarios(&["Tablets".to_string()]).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(ref msg) if msg.contains("Notebooks, Smartphones")));
    }

    #[test]
    fn zero_timeout_is_allowed() {
        let config = ShelfConfig {
            timeout_minutes: 0,
            ..minimal()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn browser_config_follows_settings() {
        let config = ShelfConfig {
            headless: false,
            window_width: 1280,
            window_height: 720,
            chrome_path: Some(PathBuf::from("/usr/bin/chromium")),
            wait_timeout_secs: 15,
            ..minimal()
        };
        let browser = config.browser_config();
        assert!(!browser.headless);
        assert_eq!(browser.window_size, (1280, 720));
        assert_eq!(browser.chrome_path, Some(PathBuf::from("/usr/bin/chromium")));
        assert_eq!(browser.wait.timeout.as_secs(), 15);
    }

    #[test]
    fn schema_describes_fields() {
        let schema = ShelfConfig::json_schema();
        let properties = schema.get("properties").unwrap();
        assert!(properties.get("targetUrl").is_some());
        assert!(properties.get("scenarios").is_some());
        assert!(properties.get("locators").is_some());

        let required = schema.get("required").unwrap().as_array().unwrap();
        assert!(required.iter().any(|v| v == "targetUrl"));
        assert!(!required.iter().any(|v| v == "timeoutMinutes"));
    }
}
