// ABOUTME: Configuration management module for the Macrocoach service layer
// ABOUTME: Environment settings here; engine tuning lives in macrocoach-intelligence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

/// Environment and service configuration
pub mod environment;

pub use environment::{CoachConfig, Environment};
pub use macrocoach_intelligence::config::{ConfigError, IntelligenceConfig};
