//! Shell-command permission engine for an LLM-driven coding agent.
//!
//! Two pieces, composed bottom-up: [`extractor`] decomposes a shell
//! script into the ordered list of commands it will actually run,
//! [`permissions`] matches each command against a layered
//! [`permissions::PermissionConfig`] and returns one of
//! [`permissions::PermissionResult`]. [`config`] loads those configs
//! from YAML/TOML/JSON; [`logging`] wires up `tracing` for callers
//! that want it. Both core modules are pure: no I/O, no shared mutable
//! state, safe to call from any number of threads over an immutable
//! config.

pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod permissions;

pub use error::ConfigError;
pub use extractor::extract_commands;
pub use permissions::{evaluate_command, evaluate_script, merge_configs, EvaluateOptions, PermissionConfig, PermissionResult};
