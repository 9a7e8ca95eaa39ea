// ABOUTME: Decision engine for nutrition targets, meal planning and strength progression
// ABOUTME: Pure synchronous algorithms plus their tunable configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

#![deny(unsafe_code)]

//! # Macrocoach Intelligence
//!
//! Every function here is deterministic over its inputs. Nothing touches
//! storage: operations that imply writes return the intended changes and the
//! caller persists them.
//!
//! ## Modules
//!
//! - **algorithms**: Unit conversion and Navy-method body-fat estimation
//! - **`nutrition_calculator`**: BMR, TDEE, goal calories and macro split
//! - **`weight_trend`**: Windowed weight trend and body composition history
//! - **recalibration**: Trend-driven calorie target adjustment
//! - **`meal_planner`**: Greedy pantry-constrained meal plan allocation
//! - **progression**: Set-by-set load recommendations
//! - **priority**: Lagging-muscle propagation into template priority flags
//! - **`intake_review`**: Goal-aware warnings for the day's food diary
//! - **config**: `IntelligenceConfig` with environment overrides

/// Measurement algorithms used at the input boundary
pub mod algorithms;

/// Engine configuration
pub mod config;

/// Shared half-away-from-zero rounding helpers
pub mod rounding;

/// Calorie and macro targets
pub mod nutrition_calculator;

/// Weight trend extraction
pub mod weight_trend;

/// Calorie target recalibration
pub mod recalibration;

/// Pantry meal plan allocator
pub mod meal_planner;

/// Load progression state machine
pub mod progression;

/// Muscle priority propagation
pub mod priority;

/// Food diary warnings
pub mod intake_review;

pub use config::{ConfigError, IntelligenceConfig};
