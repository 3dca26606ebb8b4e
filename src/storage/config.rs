//! Configuration management

use crate::error::Result;
use crate::types::Config;
use crate::utils::paths::{ensure_dir, get_config_path};
use std::env;
use std::path::Path;
use tokio::fs;
use tokio::process::Command;
use tracing::debug;

/// Environment variable that overrides the configured API key
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// Load configuration from the default location
pub async fn load_config() -> Result<Config> {
    load_config_from(&get_config_path()).await
}

/// Load configuration from file. Missing fields fall back to defaults.
pub async fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).await?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub async fn save_config_to(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content).await?;
    Ok(())
}

/// Pick the API key: CLI flag, then environment, then config file
pub fn resolve_api_key(cli_key: Option<&str>, config: &Config) -> Option<String> {
    let env_key = env::var(API_KEY_ENV).ok();
    pick_api_key(cli_key, env_key.as_deref(), &config.api_key)
}

fn pick_api_key(cli_key: Option<&str>, env_key: Option<&str>, file_key: &str) -> Option<String> {
    [cli_key, env_key, Some(file_key)]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|key| !key.is_empty())
        .map(str::to_string)
}

/// Open config file in editor
pub async fn edit_config(editor: &str) -> Result<()> {
    let config_path = get_config_path();

    // Ensure config file exists
    if !config_path.exists() {
        save_config_to(&config_path, &Config::default()).await?;
    }

    Command::new(editor).arg(&config_path).status().await?;

    Ok(())
}
