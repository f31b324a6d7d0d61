//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/favsites/config.toml)
//! 3. Environment variables (FAVSITES_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
const ENV_PREFIX: &str = "FAVSITES";

/// Default link-preview endpoint
pub const DEFAULT_PREVIEW_ENDPOINT: &str = "https://api.linkpreview.net/";

/// Default number of cards per page
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Default preview request timeout in seconds
pub const DEFAULT_PREVIEW_TIMEOUT: u64 = 10;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Directory for data storage (bookmarks.json, debug.log)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Link-preview service endpoint
    #[serde(default = "default_preview_endpoint")]
    pub preview_endpoint: String,

    /// API key for the link-preview service
    #[serde(default)]
    pub preview_api_key: Option<String>,

    /// Preview request timeout in seconds
    #[serde(default = "default_preview_timeout")]
    pub preview_timeout_secs: u64,

    /// Cards per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Log file for TUI mode (defaults to {data_dir}/debug.log)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            preview_endpoint: default_preview_endpoint(),
            preview_api_key: None,
            preview_timeout_secs: DEFAULT_PREVIEW_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (FAVSITES_DATA_DIR, FAVSITES_PREVIEW_API_KEY, ...)
    /// 2. Config file (~/.config/favsites/config.toml or FAVSITES_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = Self::read_file(path)?;
        config.apply_env_overrides();
        config.sanitize();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load only what the config file itself says
    ///
    /// No environment overrides are applied, so the result is safe to edit
    /// and write back with `save_to_path`.
    pub fn load_file_only(path: &Path) -> Result<Self> {
        let mut config = Self::read_file(path)?;
        config.sanitize();
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        config.sanitize();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // FAVSITES_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // FAVSITES_PREVIEW_ENDPOINT
        if let Ok(val) = std::env::var(format!("{}_PREVIEW_ENDPOINT", ENV_PREFIX)) {
            if !val.is_empty() {
                self.preview_endpoint = val;
            }
        }

        // FAVSITES_PREVIEW_API_KEY
        if let Ok(val) = std::env::var(format!("{}_PREVIEW_API_KEY", ENV_PREFIX)) {
            self.preview_api_key = if val.is_empty() { None } else { Some(val) };
        }

        // FAVSITES_PAGE_SIZE
        if let Ok(val) = std::env::var(format!("{}_PAGE_SIZE", ENV_PREFIX)) {
            if let Ok(size) = val.parse() {
                self.page_size = size;
            }
        }
    }

    /// Replace values that would break pagination or lookups
    fn sanitize(&mut self) {
        if self.page_size == 0 {
            self.page_size = DEFAULT_PAGE_SIZE;
        }
        if self.preview_timeout_secs == 0 {
            self.preview_timeout_secs = DEFAULT_PREVIEW_TIMEOUT;
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with FAVSITES_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("favsites")
            .join("config.toml")
    }

    /// Get the path to the bookmarks slot
    pub fn bookmarks_path(&self) -> PathBuf {
        self.data_dir.join("bookmarks.json")
    }

    /// Get the path malformed slot contents are moved to
    pub fn corrupt_backup_path(&self) -> PathBuf {
        self.data_dir.join("bookmarks.json.corrupt")
    }

    /// Get the TUI log file path
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("debug.log"))
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("favsites")
}

fn default_preview_endpoint() -> String {
    DEFAULT_PREVIEW_ENDPOINT.to_string()
}

fn default_preview_timeout() -> u64 {
    DEFAULT_PREVIEW_TIMEOUT
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            // Clear all the vars
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "FAVSITES_DATA_DIR",
        "FAVSITES_PREVIEW_ENDPOINT",
        "FAVSITES_PREVIEW_API_KEY",
        "FAVSITES_PAGE_SIZE",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.preview_api_key.is_none());
        assert_eq!(config.preview_endpoint, DEFAULT_PREVIEW_ENDPOINT);
        assert_eq!(config.page_size, 8);
        assert_eq!(config.preview_timeout_secs, 10);
        assert!(config.data_dir.ends_with("favsites"));
    }

    #[test]
    fn test_file_paths() {
        let config = Config::default();
        assert!(config.bookmarks_path().ends_with("bookmarks.json"));
        assert!(config.corrupt_backup_path().ends_with("bookmarks.json.corrupt"));
        assert!(config.log_path().ends_with("debug.log"));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("FAVSITES_DATA_DIR", "/tmp/favsites-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/favsites-test"));
    }

    #[test]
    fn test_env_override_api_key() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("FAVSITES_PREVIEW_API_KEY", "secret");
        config.apply_env_overrides();
        assert_eq!(config.preview_api_key, Some("secret".to_string()));

        // Empty string clears it
        env::set_var("FAVSITES_PREVIEW_API_KEY", "");
        config.apply_env_overrides();
        assert!(config.preview_api_key.is_none());
    }

    #[test]
    fn test_env_override_page_size() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("FAVSITES_PAGE_SIZE", "12");
        config.apply_env_overrides();
        assert_eq!(config.page_size, 12);

        // Garbage is ignored
        env::set_var("FAVSITES_PAGE_SIZE", "many");
        config.apply_env_overrides();
        assert_eq!(config.page_size, 12);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config::load_from_str("page_size = 0").unwrap();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            data_dir: PathBuf::from("/data/favsites"),
            preview_api_key: Some("key".to_string()),
            page_size: 4,
            ..Config::default()
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("preview_api_key"));
        assert!(toml_str.contains("page_size"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            preview_endpoint = "http://localhost:9000/"
            preview_api_key = "abc"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.preview_endpoint, "http://localhost:9000/");
        assert_eq!(config.preview_api_key, Some("abc".to_string()));
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        env::set_var("FAVSITES_DATA_DIR", temp_dir.path().join("data"));

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        // Should return defaults when file doesn't exist
        assert!(config.preview_api_key.is_none());
        assert!(config.data_dir.exists());
    }

    #[test]
    fn test_save_to_path_roundtrip() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            page_size: 6,
            ..Config::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.page_size, 6);
        assert_eq!(loaded.data_dir, config.data_dir);
    }

    #[test]
    fn test_load_file_only_ignores_env() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "page_size = 6\n").unwrap();

        env::set_var("FAVSITES_PREVIEW_API_KEY", "from-env");
        env::set_var("FAVSITES_PAGE_SIZE", "20");
        env::set_var("FAVSITES_DATA_DIR", temp_dir.path().join("env-data"));

        let config = Config::load_file_only(&path).unwrap();
        assert!(config.preview_api_key.is_none());
        assert_eq!(config.page_size, 6);
        assert_eq!(config.data_dir, default_data_dir());

        // Missing file yields defaults
        let missing = Config::load_file_only(&temp_dir.path().join("none.toml")).unwrap();
        assert_eq!(missing, Config::default());
    }
}
