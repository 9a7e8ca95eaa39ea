// ABOUTME: Environment configuration for the orchestration layer
// ABOUTME: Deployment mode plus service defaults such as meals per day and the fallback split
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! Environment-based configuration for the service layer

use anyhow::{Context, Result};
use macrocoach_core::constants::limits::{MEALS_PER_DAY_MAX, MEALS_PER_DAY_MIN, SUPPORTED_SPLITS};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use tracing::info;

/// Meals per day when a caller does not specify one
pub const DEFAULT_MEALS_PER_DAY: u8 = 3;

/// Split length used to start a session before a profile exists
pub const DEFAULT_SPLIT_DAYS: u8 = 5;

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Service-layer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoachConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Meals per generated plan when unspecified (3)
    pub default_meals_per_day: u8,
    /// Split used by `start_session` without a profile (5)
    pub default_split_days: u8,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            default_meals_per_day: DEFAULT_MEALS_PER_DAY,
            default_split_days: DEFAULT_SPLIT_DAYS,
        }
    }
}

impl CoachConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable does not parse or a value is out of range
    pub fn from_env() -> Result<Self> {
        info!("Loading service configuration from environment variables");

        let config = Self {
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            default_meals_per_day: env_var_or(
                "MACROCOACH_DEFAULT_MEALS_PER_DAY",
                &DEFAULT_MEALS_PER_DAY.to_string(),
            )
            .parse()
            .context("Invalid MACROCOACH_DEFAULT_MEALS_PER_DAY value")?,
            default_split_days: env_var_or(
                "MACROCOACH_DEFAULT_SPLIT_DAYS",
                &DEFAULT_SPLIT_DAYS.to_string(),
            )
            .parse()
            .context("Invalid MACROCOACH_DEFAULT_SPLIT_DAYS value")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid setting
    pub fn validate(&self) -> Result<()> {
        if !(MEALS_PER_DAY_MIN..=MEALS_PER_DAY_MAX).contains(&self.default_meals_per_day) {
            return Err(anyhow::anyhow!(
                "MACROCOACH_DEFAULT_MEALS_PER_DAY must be between {MEALS_PER_DAY_MIN} and {MEALS_PER_DAY_MAX}"
            ));
        }
        if !SUPPORTED_SPLITS.contains(&self.default_split_days) {
            return Err(anyhow::anyhow!(
                "MACROCOACH_DEFAULT_SPLIT_DAYS must be one of {SUPPORTED_SPLITS:?}"
            ));
        }
        Ok(())
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
