//! File-based configuration loading

use super::client_config::ClientConfig;
use super::env_loader::apply_env;
use crate::error::{SbercloudError, SbercloudResult};
use std::env;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load configuration from a TOML file
pub fn load_from_file(path: &Path) -> SbercloudResult<ClientConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        SbercloudError::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    toml::from_str(&content).map_err(|e| {
        SbercloudError::config(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Load configuration with default sources
///
/// Loads configuration in this order:
/// 1. Default configuration
/// 2. Config file (if given and present)
/// 3. Environment variables
pub fn load_config(path: Option<&Path>) -> SbercloudResult<ClientConfig> {
    let mut config = match path {
        Some(path) if path.exists() => {
            debug!("Loading configuration from {}", path.display());
            load_from_file(path)?
        }
        _ => ClientConfig::default(),
    };

    apply_env(&mut config, |key| env::var(key).ok())?;
    Ok(config)
}
