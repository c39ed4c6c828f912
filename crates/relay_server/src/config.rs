use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use assistant_core::completion::{DEFAULT_API_URL, DEFAULT_MODEL};
use config::{Config, Environment, File};
use serde::Deserialize;
use url::Url;

const SETTINGS_FILE: &str = "relay.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bind_addr: String,
    /// Unix socket to listen on instead of `bind_addr`.
    pub socket_path: Option<PathBuf>,
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8787".into(),
            socket_path: None,
            api_url: DEFAULT_API_URL.into(),
            api_key: String::new(),
            model: DEFAULT_MODEL.into(),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Defaults, then `relay.toml` if present, then `APP__*` variables.
/// `OPENAI_API_KEY` fills the key when nothing else set it.
pub fn load_settings() -> anyhow::Result<Settings> {
    settings_from_sources(Path::new(SETTINGS_FILE), std::env::vars().collect())
}

fn settings_from_sources(
    file: &Path,
    env: HashMap<String, String>,
) -> anyhow::Result<Settings> {
    let openai_api_key = env.get("OPENAI_API_KEY").cloned();

    let mut settings: Settings = Config::builder()
        .add_source(File::from(file).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true)
                .source(Some(env)),
        )
        .build()
        .with_context(|| format!("failed to read relay settings from '{}'", file.display()))?
        .try_deserialize()
        .context("invalid relay settings")?;

    if settings.api_key.trim().is_empty() {
        if let Some(key) = openai_api_key {
            settings.api_key = key;
        }
    }

    Url::parse(&settings.api_url)
        .with_context(|| format!("api_url '{}' is not a valid url", settings.api_url))?;

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
