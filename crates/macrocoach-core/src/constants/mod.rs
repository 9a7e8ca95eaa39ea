// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Energy densities, unit factors and inclusive validation ranges for Macrocoach
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! Constants module
//!
//! Fixed values that are facts rather than tuning knobs. Tunable thresholds
//! (activity factors, tolerance bands, progression increments) live in the
//! intelligence crate's configuration instead.

/// Energy density of macronutrients
pub mod energy {
    /// Kilocalories per gram of protein
    pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
    /// Kilocalories per gram of carbohydrate
    pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
    /// Kilocalories per gram of fat
    pub const KCAL_PER_GRAM_FAT: f64 = 9.0;
}

/// Metric/imperial conversion factors
pub mod units {
    /// Kilograms per pound
    pub const KG_PER_LB: f64 = 0.453_592;
    /// Centimetres per inch
    pub const CM_PER_INCH: f64 = 2.54;
    /// Inches per foot
    pub const INCHES_PER_FOOT: f64 = 12.0;
}

/// Inclusive legal ranges for user-supplied values
pub mod limits {
    /// Minimum age in years
    pub const AGE_MIN: u32 = 16;
    /// Maximum age in years
    pub const AGE_MAX: u32 = 100;
    /// Minimum training days per week
    pub const TRAINING_DAYS_MIN: u8 = 3;
    /// Maximum training days per week
    pub const TRAINING_DAYS_MAX: u8 = 6;
    /// Minimum height in centimetres
    pub const HEIGHT_CM_MIN: f64 = 100.0;
    /// Maximum height in centimetres
    pub const HEIGHT_CM_MAX: f64 = 250.0;
    /// Minimum body weight in kilograms
    pub const WEIGHT_KG_MIN: f64 = 30.0;
    /// Maximum body weight in kilograms
    pub const WEIGHT_KG_MAX: f64 = 300.0;
    /// Minimum waist girth in centimetres
    pub const WAIST_CM_MIN: f64 = 40.0;
    /// Maximum waist girth in centimetres
    pub const WAIST_CM_MAX: f64 = 200.0;
    /// Minimum neck girth in centimetres
    pub const NECK_CM_MIN: f64 = 20.0;
    /// Maximum neck girth in centimetres
    pub const NECK_CM_MAX: f64 = 60.0;
    /// Minimum hip girth in centimetres
    pub const HIPS_CM_MIN: f64 = 60.0;
    /// Maximum hip girth in centimetres
    pub const HIPS_CM_MAX: f64 = 200.0;
    /// Maximum macro grams in 100 g of a custom food
    pub const MACRO_PER_100G_MAX: f64 = 100.0;
    /// Maximum kilocalories in 100 g of a custom food (pure fat)
    pub const KCAL_PER_100G_MAX: f64 = 900.0;
    /// Minimum rate of perceived exertion
    pub const RPE_MIN: f64 = 1.0;
    /// Maximum rate of perceived exertion
    pub const RPE_MAX: f64 = 10.0;
    /// Minimum meals per generated plan
    pub const MEALS_PER_DAY_MIN: u8 = 1;
    /// Maximum meals per generated plan
    pub const MEALS_PER_DAY_MAX: u8 = 6;
    /// Supported training splits
    pub const SUPPORTED_SPLITS: [u8; 4] = [3, 4, 5, 6];
}

/// Query defaults
pub mod queries {
    /// Recent completed sessions returned by default
    pub const RECENT_SESSIONS_LIMIT: usize = 10;
    /// Default window for weight log listings in days
    pub const WEIGHT_LOG_DAYS: i64 = 30;
    /// Default window for body composition trends in days
    pub const BODY_COMPOSITION_DAYS: i64 = 90;
    /// Days covered by the weekly food summary, today included
    pub const WEEKLY_SUMMARY_DAYS: i64 = 7;
}
