/*
 * Botdesk - Admin Console for a Discord Bot
 * File Path: src/config.rs
 * Responsibility: YAML configuration structure and loading
 */
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub commands: CommandsConfig,
    pub parameters: ParametersConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 3001 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CommandsConfig {
    pub path: PathBuf, // The bot's commands.js
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("commands.js") }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ParametersConfig {
    pub path: PathBuf,
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("parameters.yml") }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file at {:?}", path.as_ref()))?;
        let config: Config = serde_yaml::from_str(&content)
            .context("Failed to parse config file")?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    /// Relative paths in a loaded file are anchored at its directory; defaults stay relative
    /// to the working directory. `PORT` overrides the port.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let mut loaded = Self::load(path)?;
            if let Some(base) = path.parent() {
                loaded.commands.path = anchor(base, &loaded.commands.path);
                loaded.parameters.path = anchor(base, &loaded.parameters.path);
            }
            loaded
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {}", port))?;
        }

        Ok(config)
    }
}

fn anchor(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
