//! Error types for the ambient layers (config loading, CLI). The core
//! extractor/evaluator never returns a `Result` — see module docs on
//! [`crate::permissions`] and [`crate::extractor`] for why.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not determine config format for {path} (expected .yaml, .yml, .toml, or .json)")]
    UnknownFormat { path: PathBuf },

    #[error("failed to parse {path} as YAML")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse {path} as TOML")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse {path} as JSON")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
