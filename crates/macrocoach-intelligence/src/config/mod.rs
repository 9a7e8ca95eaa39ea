// ABOUTME: Configuration module for macrocoach-intelligence crate
// ABOUTME: Re-exports intelligence configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

/// Engine tuning (activity factors, tolerance bands, progression increments)
pub mod intelligence;

pub use intelligence::{ConfigError, IntelligenceConfig};
