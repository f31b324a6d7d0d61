//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use favsites_core::Config;

use crate::output::{Output, OutputFormat};

const VALID_KEYS: &str =
    "data_dir, preview_endpoint, preview_api_key, preview_timeout_secs, page_size, log_file";

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "preview_endpoint": config.preview_endpoint,
                    "preview_api_key": config.preview_api_key.as_deref().map(mask_key),
                    "preview_timeout_secs": config.preview_timeout_secs,
                    "page_size": config.page_size,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:             {}", config.data_dir.display());
            println!("  preview_endpoint:     {}", config.preview_endpoint);
            println!(
                "  preview_api_key:      {}",
                config
                    .preview_api_key
                    .as_deref()
                    .map(mask_key)
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!("  preview_timeout_secs: {}", config.preview_timeout_secs);
            println!("  page_size:            {}", config.page_size);
            println!(
                "  log_file:             {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);

    // Environment overrides must not end up in the file
    let mut config =
        Config::load_file_only(&save_path).context("Failed to load configuration")?;

    apply_setting(&mut config, &key, &value)?;

    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    let shown = if key == "preview_api_key" {
        mask_key(&value)
    } else {
        value
    };
    output.success(&format!("Set {} = {}", key, shown));

    Ok(())
}

/// Update one field of `config` from its string form
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "preview_endpoint" => {
            if value.is_empty() {
                bail!("preview_endpoint cannot be empty");
            }
            config.preview_endpoint = value.to_string();
        }
        "preview_api_key" => {
            config.preview_api_key = optional(value);
        }
        "preview_timeout_secs" => {
            let secs: u64 = value
                .parse()
                .context("Invalid value for preview_timeout_secs. Use a number of seconds.")?;
            if secs == 0 {
                bail!("preview_timeout_secs must be at least 1");
            }
            config.preview_timeout_secs = secs;
        }
        "page_size" => {
            let size: usize = value
                .parse()
                .context("Invalid value for page_size. Use a positive number.")?;
            if size == 0 {
                bail!("page_size must be at least 1");
            }
            config.page_size = size;
        }
        "log_file" => {
            config.log_file = optional(value).map(Into::into);
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\nValid keys: {}",
                key,
                VALID_KEYS
            );
        }
    }
    Ok(())
}

/// Empty or "none" clears an optional setting
fn optional(value: &str) -> Option<String> {
    if value.is_empty() || value == "none" {
        None
    } else {
        Some(value.to_string())
    }
}

/// Show only the last four characters of an API key
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_apply_setting_page_size() {
        let mut config = Config::default();
        apply_setting(&mut config, "page_size", "12").unwrap();
        assert_eq!(config.page_size, 12);

        assert!(apply_setting(&mut config, "page_size", "0").is_err());
        assert!(apply_setting(&mut config, "page_size", "many").is_err());
        assert_eq!(config.page_size, 12);
    }

    #[test]
    fn test_apply_setting_optional_values() {
        let mut config = Config::default();
        apply_setting(&mut config, "preview_api_key", "abc123").unwrap();
        assert_eq!(config.preview_api_key.as_deref(), Some("abc123"));

        apply_setting(&mut config, "preview_api_key", "none").unwrap();
        assert!(config.preview_api_key.is_none());

        apply_setting(&mut config, "log_file", "/tmp/favsites.log").unwrap();
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/favsites.log")));
    }

    #[test]
    fn test_apply_setting_unknown_key() {
        let mut config = Config::default();
        let err = apply_setting(&mut config, "sync_url", "x").unwrap_err();
        assert!(err.to_string().contains("Unknown configuration key"));
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("abcdef123456"), "****3456");
        assert_eq!(mask_key("abc"), "****");
    }

    #[test]
    fn test_set_does_not_persist_env_overrides() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "preview_endpoint = \"http://localhost:9000/\"\n").unwrap();

        env::set_var("FAVSITES_PREVIEW_API_KEY", "env-only-secret-1234");
        env::set_var("FAVSITES_DATA_DIR", temp_dir.path().join("env-data"));
        let result = set(
            "page_size".into(),
            "4".into(),
            Some(&path),
            &Output::new(OutputFormat::Quiet),
        );
        env::remove_var("FAVSITES_PREVIEW_API_KEY");
        env::remove_var("FAVSITES_DATA_DIR");
        result.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("env-only-secret-1234"));
        assert!(!written.contains("env-data"));

        let saved = Config::load_file_only(&path).unwrap();
        assert_eq!(saved.page_size, 4);
        assert_eq!(saved.preview_endpoint, "http://localhost:9000/");
        assert!(saved.preview_api_key.is_none());
    }
}
