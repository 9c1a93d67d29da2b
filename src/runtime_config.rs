//! # Runtime Configuration Module
//!
//! Settings that change how a [`RouteCollection`](crate::RouteCollection)
//! builds its dispatcher and how the crate logs, loaded from environment
//! variables or a TOML document.
//!
//! ## Environment Variables
//!
//! ### `SWITCHYARD_DEFAULT_STRATEGY`
//!
//! Collection-wide strategy for routes that do not set their own:
//! `restful`, `uri`, `method_argument` or `request_response`.
//! Unset means the built-in fallback (`request_response`).
//!
//! ### `SWITCHYARD_HEAD_FALLBACK`
//!
//! Whether `HEAD` requests without a `HEAD` route use the `GET` route.
//! Default: `true`
//!
//! ### `SWITCHYARD_SLOW_MATCH_US`
//!
//! Route matches slower than this many microseconds are logged at `warn`.
//! Default: `1000`
//!
//! ### `SWITCHYARD_LOG` / `SWITCHYARD_LOG_FORMAT`
//!
//! `tracing` filter directive (default `info`) and output format
//! (`pretty` or `json`, default `pretty`), used by
//! [`init_tracing`](crate::logging::init_tracing).
//!
//! ## Usage
//!
//! ```rust
//! use switchyard::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_toml_str(r#"
//!     default_strategy = "restful"
//!     slow_match_us = 250
//! "#).unwrap();
//! assert!(config.head_fallback);
//! assert_eq!(config.slow_match_us, 250);
//! ```

use crate::strategy::BuiltinStrategy;
use serde::Deserialize;
use std::env;
use tracing::warn;

const DEFAULT_SLOW_MATCH_US: u64 = 1000;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Runtime configuration for route collections and logging.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Strategy for routes without their own (default: none, i.e. request/response)
    pub default_strategy: Option<BuiltinStrategy>,
    /// Serve `HEAD` from the `GET` route when no `HEAD` route exists (default: true)
    pub head_fallback: bool,
    /// Slow route match threshold in microseconds (default: 1000)
    pub slow_match_us: u64,
    /// `tracing` filter directive (default: `info`)
    pub log_filter: String,
    pub log_format: LogFormat,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_strategy: None,
            head_fallback: true,
            slow_match_us: DEFAULT_SLOW_MATCH_US,
            log_filter: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    ///
    /// Unparseable values are logged and replaced by their default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source using the
    /// `SWITCHYARD_*` variable names.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let default_strategy = lookup("SWITCHYARD_DEFAULT_STRATEGY").and_then(|val| {
            val.parse::<BuiltinStrategy>()
                .map_err(|e| warn!(value = %val, error = %e, "Ignoring SWITCHYARD_DEFAULT_STRATEGY"))
                .ok()
        });

        let head_fallback = match lookup("SWITCHYARD_HEAD_FALLBACK") {
            Some(val) => parse_bool(&val).unwrap_or_else(|| {
                warn!(value = %val, "Ignoring SWITCHYARD_HEAD_FALLBACK");
                defaults.head_fallback
            }),
            None => defaults.head_fallback,
        };

        let slow_match_us = match lookup("SWITCHYARD_SLOW_MATCH_US") {
            Some(val) => val.trim().parse().unwrap_or_else(|_| {
                warn!(value = %val, "Ignoring SWITCHYARD_SLOW_MATCH_US");
                defaults.slow_match_us
            }),
            None => defaults.slow_match_us,
        };

        let log_filter = lookup("SWITCHYARD_LOG").unwrap_or(defaults.log_filter);

        let log_format = match lookup("SWITCHYARD_LOG_FORMAT").as_deref().map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        RuntimeConfig {
            default_strategy,
            head_fallback,
            slow_match_us,
            log_filter,
            log_format,
        }
    }

    /// Parse a TOML document. Missing keys take their default.
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
