//! Layered configuration loading.
//!
//! Each layer file is deserialized into a [`PermissionConfig`] under
//! the `command_permissions` key, then folded over the hardcoded
//! [`crate::permissions::base::base_config`] with
//! [`crate::permissions::merge_configs`]. The loader sniffs format
//! from the file extension; unknown extensions are an error rather
//! than a silent guess.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::permissions::base::base_config;
use crate::permissions::{merge_configs, CommandPattern, PermissionConfig};

#[derive(Debug, Clone, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    command_permissions: RawPermissionConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawPermissionConfig {
    #[serde(default)]
    auto_approve: Vec<CommandPattern>,
    #[serde(default)]
    require_approval: Vec<CommandPattern>,
    #[serde(default)]
    deny: Vec<CommandPattern>,
    #[serde(default)]
    reset_auto_approve: bool,
    #[serde(default)]
    reset_require_approval: bool,
}

impl From<RawPermissionConfig> for PermissionConfig {
    fn from(raw: RawPermissionConfig) -> Self {
        PermissionConfig {
            auto_approve: raw.auto_approve,
            require_approval: raw.require_approval,
            deny: raw.deny,
            reset_auto_approve: raw.reset_auto_approve,
            reset_require_approval: raw.reset_require_approval,
        }
    }
}

/// Reads and parses a single config layer from `path`.
pub fn load_layer(path: &Path) -> Result<PermissionConfig, ConfigError> {
    tracing::debug!(path = %path.display(), "loading permission config layer");

    let contents =
        fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

    let raw: RawConfig = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)
            .map_err(|source| ConfigError::Yaml { path: path.to_path_buf(), source })?,
        Some("toml") => {
            toml::from_str(&contents).map_err(|source| ConfigError::Toml { path: path.to_path_buf(), source })?
        },
        Some("json") => serde_json::from_str(&contents)
            .map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })?,
        _ => return Err(ConfigError::UnknownFormat { path: path.to_path_buf() }),
    };

    Ok(raw.command_permissions.into())
}

/// Loads the base ruleset plus every layer in `paths`, in order
/// (typically repo config, then workspace config, then a
/// per-invocation override).
pub fn load_layered<P: AsRef<Path>>(paths: &[P]) -> Result<PermissionConfig, ConfigError> {
    let mut layers = vec![base_config()];
    for path in paths {
        layers.push(load_layer(path.as_ref())?);
    }
    tracing::info!(layers = layers.len(), "merged permission config");
    Ok(merge_configs(&layers))
}
