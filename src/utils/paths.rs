//! Path utilities for yt-focus
//!
//! Respects XDG Base Directory Specification

use crate::error::Result;
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;

const APP_NAME: &str = "yt-focus";

/// Get config directory path
/// Respects XDG_CONFIG_HOME, defaults to ~/.config/yt-focus
pub fn get_config_dir() -> PathBuf {
    let base = env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .unwrap_or_else(|| home_dir().join(".config"));

    base.join(APP_NAME)
}

/// Get config file path
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.json")
}

/// Ensure a directory exists
pub async fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await?;
    Ok(())
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}
