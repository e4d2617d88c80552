use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::RaceContext;

pub const DEFAULT_MODEL: &str = "models/gemini-3-flash-preview";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Everything the remote advisor needs. No key means mock mode.
#[derive(Debug, Clone)]
pub struct AdvisorSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

impl AdvisorSettings {
    pub fn is_mock(&self) -> bool {
        self.api_key.as_deref().map_or(true, |k| k.trim().is_empty())
    }
}

/// Load a race context from a JSON file. Missing keys keep their defaults.
pub fn load_race_context(path: &Path) -> Result<RaceContext, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| ConfigError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Show only the first ten characters of a credential.
pub fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(10).collect();
    format!("{}...", visible)
}
