//! Settings file loading
//!
//! The suite is configured by a YAML file with a `settings` section (target
//! URL, browser engine, timeouts, artifact flags) and a `users` section
//! mapping named user types to credential pairs. The file is parsed once at
//! startup and read-only afterwards; a missing or malformed file aborts the
//! run before any browser is launched.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Credential pair for a named user type. Built per run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

/// Browser engine selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl FromStr for BrowserKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "chromium" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" => Ok(BrowserKind::Webkit),
            other => anyhow::bail!("Unknown browser engine: {}", other),
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no credentials configured for user type {0:?}")]
    UnknownUserType(String),
}

/// Runtime settings section of the config file.
///
/// Every field except `random_seed` is required; defaults are not filled in
/// for missing keys.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub browser: BrowserKind,
    pub headless: bool,
    pub slow_mo_ms: u64,
    pub timeout_ms: u64,
    pub implicit_wait_ms: u64,
    pub screenshot_on_failure: bool,
    pub video_on_failure: bool,
    pub trace_on_failure: bool,
    /// Seed for fixture random selection. Unset means a fresh seed per run.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

/// Parsed configuration, loaded once per run.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub settings: Settings,
    pub users: HashMap<String, Credentials>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&raw)
            .with_context(|| format!("Malformed config file: {}", path.display()))?;
        Ok(config)
    }

    /// Credentials for a named user type (e.g. "StandardUser").
    pub fn credentials(&self, user_type: &str) -> Result<&Credentials, ConfigError> {
        self.users
            .get(user_type)
            .ok_or_else(|| ConfigError::UnknownUserType(user_type.to_string()))
    }

    /// Absolute URL for a path on the application under test.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
settings:
  base_url: "https://shop.example.com/"
  browser: firefox
  headless: true
  slow_mo_ms: 50
  timeout_ms: 30000
  implicit_wait_ms: 500
  screenshot_on_failure: true
  video_on_failure: false
  trace_on_failure: false
users:
  StandardUser:
    username: standard_user
    password: secret_sauce
"#;

    #[test]
    fn parses_settings_and_users() {
        let config: Config = serde_yaml::from_str(SAMPLE).expect("sample config parses");
        assert_eq!(config.settings.browser, BrowserKind::Firefox);
        assert!(config.settings.headless);
        assert_eq!(config.settings.slow_mo_ms, 50);
        assert_eq!(config.settings.random_seed, None);

        let creds = config.credentials("StandardUser").expect("user exists");
        assert_eq!(creds.username, "standard_user");
        assert_eq!(creds.password, "secret_sauce");
    }

    #[test]
    fn unknown_user_type_is_an_error() {
        let config: Config = serde_yaml::from_str(SAMPLE).expect("sample config parses");
        let err = config.credentials("NoSuchUser").unwrap_err();
        assert!(err.to_string().contains("NoSuchUser"));
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let broken = SAMPLE.replace("  timeout_ms: 30000\n", "");
        assert!(serde_yaml::from_str::<Config>(&broken).is_err());
    }

    #[test]
    fn unknown_browser_is_an_error() {
        let broken = SAMPLE.replace("firefox", "netscape");
        assert!(serde_yaml::from_str::<Config>(&broken).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::load(Path::new("/nonexistent/config.yaml")).is_err());
    }

    #[test]
    fn url_for_joins_without_double_slash() {
        let config: Config = serde_yaml::from_str(SAMPLE).expect("sample config parses");
        assert_eq!(
            config.url_for("/inventory.html"),
            "https://shop.example.com/inventory.html"
        );
        assert_eq!(config.url_for("cart.html"), "https://shop.example.com/cart.html");
    }

    #[test]
    fn shipped_sample_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.yaml");
        let config = Config::load(&path).expect("shipped config.yaml parses");
        assert_eq!(config.settings.browser, BrowserKind::Chromium);
        assert!(config.credentials("StandardUser").is_ok());
        assert!(config.credentials("LockedOutUser").is_ok());
    }

    #[test]
    fn browser_kind_round_trips_from_str() {
        assert_eq!("Chromium".parse::<BrowserKind>().unwrap(), BrowserKind::Chromium);
        assert_eq!("webkit".parse::<BrowserKind>().unwrap(), BrowserKind::Webkit);
        assert!("netscape".parse::<BrowserKind>().is_err());
    }
}
