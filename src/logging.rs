//! Subscriber setup for the crate's `tracing` events.
//!
//! The dispatcher only emits events; nothing is printed until the host
//! application installs a subscriber. [`init_tracing`] is a convenience for
//! applications and tests that do not bring their own.

use crate::runtime_config::{LogFormat, RuntimeConfig};
use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Install a global fmt subscriber filtered by `config.log_filter`.
///
/// `RUST_LOG` takes precedence over the configured filter when set. Fails if
/// the filter does not parse or a global subscriber is already installed.
pub fn init_tracing(config: &RuntimeConfig) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_filter)
            .with_context(|| format!("Invalid log filter `{}`", config.log_filter))?,
    };

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")
}
