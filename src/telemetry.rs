//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::{Environment, ServerConfig};

/// Installs the global subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from
/// `server.log_level`. Development gets human-readable output; test and
/// production emit JSON lines. Calling this twice leaves the first
/// subscriber in place.
pub fn init(server: &ServerConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = match server.environment {
        Environment::Development => tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .try_init(),
        Environment::Test | Environment::Production => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .try_init(),
    };

    if installed.is_ok() {
        tracing::info!(
            environment = ?server.environment,
            log_level = %server.log_level,
            "Logging initialized"
        );
    }
}
