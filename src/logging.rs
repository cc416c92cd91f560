//! Ambient logging setup.
//!
//! The permission engine itself never logs (it is a pure function);
//! this initializes `tracing` for the CLI front end and anything
//! embedding this crate that wants visibility into config loading and
//! evaluation decisions.

use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "SHELL_PERMIT_LOG";

/// Installs a `tracing_subscriber::fmt` subscriber.
///
/// Verbosity from repeated `-v` flags maps to a default filter level
/// when `SHELL_PERMIT_LOG` is unset; when set, the env var always
/// wins.
pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
