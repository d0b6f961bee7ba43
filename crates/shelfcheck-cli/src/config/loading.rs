use crate::config::ShelfConfig;
use crate::error::{ConfigError, Result};
use figment::{
    providers::{Env, Format as _, Json, Serialized, Toml},
    Figment,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Config files looked up in the working directory, in order.
pub const CONFIG_FILES: [&str; 2] = ["shelfcheck.json", "shelfcheck.toml"];

/// Prefix of environment overrides (`SHELFCHECK_TIMEOUT_MINUTES`, ...).
pub const ENV_PREFIX: &str = "SHELFCHECK_";

// Scalar fields only; scenarios and locators come from files.
const ENV_KEYS: [&str; 10] = [
    "target_url",
    "expected_title",
    "timeout_minutes",
    "min_products",
    "headless",
    "window_width",
    "window_height",
    "chrome_path",
    "wait_timeout_secs",
    "evidence_dir",
];

/// Values given on the command line. Unset fields leave lower-priority
/// sources alone.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    /// `--target-url`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    /// `--timeout-minutes`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_minutes: Option<u64>,
    /// `--headed` sets this to false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headless: Option<bool>,
    /// `--evidence-dir`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_dir: Option<PathBuf>,
}

/// Finds the default config file in `dir`.
#[must_use]
pub fn discover_config(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

impl ShelfConfig {
    /// Load configuration from the current directory.
    /// Priority: CLI args > environment variables > config file > defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the file is missing or malformed.
    pub fn load(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        Self::load_from(Path::new("."), config_path, overrides)
    }

    /// Like [`ShelfConfig::load`], looking for the default file in `dir`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the file is missing or malformed.
    pub fn load_from(
        dir: &Path,
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let mut figment = Figment::new();

        let config_file = match config_path {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            Some(path) => Some(path.to_path_buf()),
            None => discover_config(dir),
        };

        if let Some(path) = config_file {
            tracing::debug!(path = %path.display(), "Loading config file");
            figment = merge_file(figment, &path)?;
        }

        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .only(&ENV_KEYS)
                .map(|key| env_key(key.as_str()).into()),
        );

        figment = figment.merge(Serialized::defaults(overrides));

        figment
            .extract()
            .map_err(|e| ConfigError::Load(e.to_string()).into())
    }
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(figment.merge(Json::file(path))),
        Some("toml") => Ok(figment.merge(Toml::file(path))),
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf()).into()),
    }
}

/// `TIMEOUT_MINUTES` -> `timeoutMinutes`
fn env_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}
