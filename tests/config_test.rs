// ABOUTME: Tests for environment-driven service configuration loading and validation
// ABOUTME: Serialized because they mutate process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors
#![allow(clippy::unwrap_used)]

use macrocoach::config::{CoachConfig, Environment, IntelligenceConfig};
use serial_test::serial;
use std::env;

const VARS: [&str; 4] = [
    "ENVIRONMENT",
    "MACROCOACH_DEFAULT_MEALS_PER_DAY",
    "MACROCOACH_DEFAULT_SPLIT_DAYS",
    "MACROCOACH_TREND_WINDOW_DAYS",
];

fn clear_env() {
    for key in VARS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();
    let config = CoachConfig::from_env().unwrap();
    assert_eq!(config, CoachConfig::default());
    assert_eq!(config.default_meals_per_day, 3);
    assert_eq!(config.default_split_days, 5);
    assert!(!config.environment.is_production());
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_env();
    env::set_var("ENVIRONMENT", "prod");
    env::set_var("MACROCOACH_DEFAULT_MEALS_PER_DAY", "5");
    env::set_var("MACROCOACH_DEFAULT_SPLIT_DAYS", "4");

    let config = CoachConfig::from_env().unwrap();
    assert_eq!(config.environment, Environment::Production);
    assert_eq!(config.default_meals_per_day, 5);
    assert_eq!(config.default_split_days, 4);
    clear_env();
}

#[test]
#[serial]
fn test_invalid_values_are_rejected() {
    clear_env();
    env::set_var("MACROCOACH_DEFAULT_MEALS_PER_DAY", "many");
    let err = CoachConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("MACROCOACH_DEFAULT_MEALS_PER_DAY"));

    env::set_var("MACROCOACH_DEFAULT_MEALS_PER_DAY", "9");
    assert!(CoachConfig::from_env().is_err());

    env::set_var("MACROCOACH_DEFAULT_MEALS_PER_DAY", "3");
    env::set_var("MACROCOACH_DEFAULT_SPLIT_DAYS", "2");
    let err = CoachConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("MACROCOACH_DEFAULT_SPLIT_DAYS"));
    clear_env();
}

#[test]
#[serial]
fn test_engine_config_loads_through_service_reexport() {
    clear_env();
    env::set_var("MACROCOACH_TREND_WINDOW_DAYS", "10");
    let config = IntelligenceConfig::load().unwrap();
    assert_eq!(config.trend.window_days, 10);

    env::set_var("MACROCOACH_TREND_WINDOW_DAYS", "0");
    assert!(IntelligenceConfig::load().is_err());
    clear_env();
}
