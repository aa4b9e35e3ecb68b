/*
 * Botdesk - Admin Console for a Discord Bot
 * File Path: src/init.rs
 * Responsibility: Config discovery and logging bootstrap
 */

use std::path::PathBuf;
use dirs::home_dir;
use tracing_subscriber::EnvFilter;

const CONFIG_FILE: &str = "botdesk.yml";

/// Resolve the config file path
/// Priority: CLI > Environment Variable > Local file > Default (~/.botdesk/botdesk.yml)
pub fn resolve_config_path(cli_config: Option<PathBuf>) -> PathBuf {
    // 1. CLI takes highest priority
    if let Some(path) = cli_config {
        return path;
    }

    // 2. Environment variable
    if let Ok(env_path) = std::env::var("BOTDESK_CONFIG") {
        return PathBuf::from(env_path);
    }

    // 3. Local config next to the working directory
    if let Ok(cwd) = std::env::current_dir() {
        let local = cwd.join(CONFIG_FILE);
        if local.is_file() {
            return local;
        }
    }

    // 4. Default path
    match home_dir() {
        Some(home) => home.join(".botdesk").join(CONFIG_FILE),
        None => PathBuf::from(CONFIG_FILE),
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the default `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
