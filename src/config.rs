//! Configuration handling for the TUI

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default server address, matching the server's default listen port
pub const DEFAULT_SERVER_ADDRESS: &str = "http://127.0.0.1:1233";
/// Environment variable overriding the configured server address
pub const SERVER_ADDRESS_ENV: &str = "TTS_SERVER_ADDRESS";

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TuiConfig {
    /// Base URL of the TTS model server
    pub server_address: Option<String>,
    /// Token passed as `-token` to the server
    pub token: Option<String>,
    /// Pre-filled test text
    pub test_text: Option<String>,
}

impl TuiConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "chasemao", "tts-model-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Path of the log file
    pub fn log_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().join("tts-model-tui.log"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from a specific file, falling back to defaults when it is absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Server address: environment, then config file, then the default
    pub fn resolve_server_address(&self) -> String {
        Self::pick_server_address(std::env::var(SERVER_ADDRESS_ENV).ok(), self)
    }

    fn pick_server_address(env: Option<String>, config: &TuiConfig) -> String {
        env.filter(|s| !s.trim().is_empty())
            .or_else(|| config.server_address.clone())
            .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string())
    }
}
