//! Settings file support.
//!
//! Reads `$HOME/.aicommit/settings.json`. Every field is optional; the `env`
//! map acts as a fallback for environment variables that are not set.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Settings loaded from $HOME/.aicommit/settings.json.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Environment variable fallbacks.
    #[serde(default)]
    pub env: HashMap<String, String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub locale: Option<String>,
    /// Commit type name (`conventional`, `gitmoji`, or empty).
    #[serde(rename = "type")]
    pub commit_type: Option<String>,
    pub generate: Option<usize>,
    pub max_length: Option<usize>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Request timeout in milliseconds.
    pub timeout: Option<u64>,
    pub include_body: Option<bool>,
    pub logging: Option<bool>,
    /// Validation policy name (`advisory` or `strict`).
    pub validation: Option<String>,
    pub system_prompt: Option<String>,
    pub system_prompt_path: Option<PathBuf>,
    pub base_url: Option<String>,
    /// Glob patterns of staged files left out of the diff.
    pub exclude: Option<Vec<String>>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // A missing file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Self>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".aicommit").join("settings.json"))
    }

    /// Looks `key` up in `env`, falling back to the settings `env` map.
    pub fn lookup_env<F>(&self, key: &str, env: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        env(key).or_else(|| self.env.get(key).cloned())
    }
}
