// ABOUTME: Structured logging setup for the coach services and the CLI
// ABOUTME: Reads RUST_LOG, LOG_FORMAT and ENVIRONMENT and installs a stderr tracing subscriber
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! Structured logging configuration
//!
//! Everything is written to stderr; stdout belongs to CLI output.

use crate::config::Environment;
use anyhow::Result;
use std::env;
use std::io;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default service name in structured logs
pub const SERVICE_NAME: &str = "macrocoach";

/// Crates whose level follows `LoggingConfig::level`
const OWN_TARGETS: [&str; 3] = ["macrocoach", "macrocoach_intelligence", "macrocoach_cli"];

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event
    Json,
    /// Multi-field human readable output
    #[default]
    Pretty,
    /// Single line per event, no target or location
    Compact,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value; anything unknown is pretty
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level directive for our own crates
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Source file and line on every event
    pub include_location: bool,
    /// Thread ids and names on every event
    pub include_thread: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Deployment environment
    pub environment: Environment,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::default(),
            include_location: false,
            include_thread: false,
            service_name: SERVICE_NAME.into(),
            environment: Environment::default(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    ///
    /// Production turns on location and thread fields regardless of the
    /// `LOG_INCLUDE_*` flags.
    #[must_use]
    pub fn from_env() -> Self {
        let environment = env::var("ENVIRONMENT")
            .map(|v| Environment::from_str_or_default(&v))
            .unwrap_or_default();
        let verbose = environment.is_production();

        Self {
            level: env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
            format: env::var("LOG_FORMAT")
                .map(|v| LogFormat::from_str_or_default(&v))
                .unwrap_or_default(),
            include_location: verbose || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: verbose || env::var("LOG_INCLUDE_THREAD").is_ok(),
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| SERVICE_NAME.into()),
            environment,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        OWN_TARGETS
            .iter()
            .fold(EnvFilter::new(&self.level), |filter, target| {
                match format!("{target}={}", self.level).parse() {
                    Ok(directive) => filter.add_directive(directive),
                    // RUST_LOG holds a full directive list, already applied above
                    Err(_) => filter,
                }
            })
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let json = (self.format == LogFormat::Json).then(|| {
            fmt::layer()
                .json()
                .with_file(self.include_location)
                .with_line_number(self.include_location)
                .with_thread_ids(self.include_thread)
                .with_thread_names(self.include_thread)
                .with_writer(io::stderr)
        });
        let pretty = (self.format == LogFormat::Pretty).then(|| {
            fmt::layer()
                .with_file(self.include_location)
                .with_line_number(self.include_location)
                .with_thread_ids(self.include_thread)
                .with_thread_names(self.include_thread)
                .with_writer(io::stderr)
        });
        let compact = (self.format == LogFormat::Compact).then(|| {
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(io::stderr)
        });

        tracing_subscriber::registry()
            .with(self.env_filter())
            .with(json)
            .with(pretty)
            .with(compact)
            .try_init()?;

        info!(
            service.name = %self.service_name,
            service.version = env!("CARGO_PKG_VERSION"),
            environment = %self.environment,
            format = ?self.format,
            level = %self.level,
            "Logging initialized"
        );
        Ok(())
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_production_enables_location_and_threads() {
        env::set_var("ENVIRONMENT", "production");
        env::set_var("LOG_FORMAT", "JSON");
        let config = LoggingConfig::from_env();
        env::remove_var("ENVIRONMENT");
        env::remove_var("LOG_FORMAT");

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.environment, Environment::Production);
        assert!(config.include_location);
        assert!(config.include_thread);
    }

    #[test]
    #[serial]
    fn test_defaults_without_environment() {
        for key in ["ENVIRONMENT", "LOG_FORMAT", "LOG_INCLUDE_LOCATION", "LOG_INCLUDE_THREAD"] {
            env::remove_var(key);
        }
        let config = LoggingConfig::from_env();
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.environment, Environment::Development);
        assert!(!config.include_location);
    }

    #[test]
    fn test_unknown_format_falls_back_to_pretty() {
        assert_eq!(LogFormat::from_str_or_default("xml"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str_or_default("compact"), LogFormat::Compact);
    }
}
