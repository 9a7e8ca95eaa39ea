// ABOUTME: Nutrition configuration for target calculation, trend analysis and meal planning
// ABOUTME: Configures BMR coefficients, activity factors, macro ratios, trend windows, tolerances and intake review
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! Nutrition Configuration
//!
//! # Scientific References
//!
//! - BMR: Mifflin et al. (1990) DOI: 10.1093/ajcn/51.2.241
//! - Body fat: Hodgdon & Beckett (1984), Naval Health Research Center Report 84-11

use serde::{Deserialize, Serialize};

/// Nutrition Configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NutritionConfig {
    /// Basal Metabolic Rate (BMR) calculation settings
    pub bmr: BmrConfig,
    /// Activity factor multipliers keyed by training days
    pub activity_factors: ActivityFactorsConfig,
    /// Calorie offsets per goal
    pub goal_adjustments: GoalAdjustmentConfig,
    /// Protein and fat grams per kilogram of bodyweight
    pub macronutrients: MacronutrientConfig,
}

/// BMR (Basal Metabolic Rate) calculation configuration
///
/// Reference: Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
/// American Journal of Clinical Nutrition, 51(2), 241-247. DOI: 10.1093/ajcn/51.2.241
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmrConfig {
    /// Mifflin-St Jeor weight coefficient (10.0)
    pub msj_weight_coef: f64,
    /// Mifflin-St Jeor height coefficient (6.25)
    pub msj_height_coef: f64,
    /// Mifflin-St Jeor age coefficient (-5.0)
    pub msj_age_coef: f64,
    /// Mifflin-St Jeor male constant (+5)
    pub msj_male_constant: f64,
    /// Mifflin-St Jeor female constant (-161)
    pub msj_female_constant: f64,
}

impl Default for BmrConfig {
    fn default() -> Self {
        Self {
            msj_weight_coef: 10.0,
            msj_height_coef: 6.25,
            msj_age_coef: -5.0,
            msj_male_constant: 5.0,
            msj_female_constant: -161.0,
        }
    }
}

/// Activity factor multipliers for TDEE calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityFactorsConfig {
    /// Three training days per week: 1.375
    pub three_days: f64,
    /// Four training days per week: 1.465
    pub four_days: f64,
    /// Five training days per week: 1.55
    pub five_days: f64,
    /// Six training days per week: 1.635
    pub six_days: f64,
    /// Any other day count: 1.55
    pub fallback: f64,
}

impl ActivityFactorsConfig {
    /// Multiplier for a weekly training frequency
    #[must_use]
    pub const fn for_training_days(&self, days: u8) -> f64 {
        match days {
            3 => self.three_days,
            4 => self.four_days,
            5 => self.five_days,
            6 => self.six_days,
            _ => self.fallback,
        }
    }
}

impl Default for ActivityFactorsConfig {
    fn default() -> Self {
        Self {
            three_days: 1.375,
            four_days: 1.465,
            five_days: 1.55,
            six_days: 1.635,
            fallback: 1.55,
        }
    }
}

/// Calorie offsets applied to TDEE per goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalAdjustmentConfig {
    /// Cut offset (-500)
    pub cut_kcal: i64,
    /// Lean bulk offset (+300)
    pub lean_bulk_kcal: i64,
    /// Maintain offset (0)
    pub maintain_kcal: i64,
}

impl Default for GoalAdjustmentConfig {
    fn default() -> Self {
        Self {
            cut_kcal: -500,
            lean_bulk_kcal: 300,
            maintain_kcal: 0,
        }
    }
}

/// Macronutrient ratios; carbohydrates absorb the remaining energy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacronutrientConfig {
    /// Protein grams per kg bodyweight (2.1)
    pub protein_g_per_kg: f64,
    /// Fat grams per kg bodyweight (0.8)
    pub fat_g_per_kg: f64,
}

impl Default for MacronutrientConfig {
    fn default() -> Self {
        Self {
            protein_g_per_kg: 2.1,
            fat_g_per_kg: 0.8,
        }
    }
}

/// Weight trend windowing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Days of history considered (7)
    pub window_days: i64,
    /// Minimum entries in the window (3)
    pub min_entries: usize,
    /// Entries averaged at each end of the window (3)
    pub sample_size: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            window_days: 7,
            min_entries: 3,
            sample_size: 3,
        }
    }
}

/// Target recalibration safeguards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecalibrationConfig {
    /// Targets below this raise a drift warning (1200 kcal); never clamped
    pub low_kcal_warning_threshold: i64,
}

impl Default for RecalibrationConfig {
    fn default() -> Self {
        Self {
            low_kcal_warning_threshold: 1200,
        }
    }
}

/// Pantry allocator thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlannerConfig {
    /// Protein source must have more than this many grams left (50)
    pub protein_min_stock_g: f64,
    /// Carb source must have more than this many grams left (30)
    pub carb_min_stock_g: f64,
    /// Fat source must have more than this many grams left (5)
    pub fat_min_stock_g: f64,
    /// Allowed daily protein deviation in grams (5)
    pub protein_tolerance_g: i64,
    /// Allowed daily carbohydrate deviation in grams (10)
    pub carbs_tolerance_g: i64,
    /// Allowed daily fat deviation in grams (3); also gates the per-meal fat pick
    pub fat_tolerance_g: i64,
}

impl Default for MealPlannerConfig {
    fn default() -> Self {
        Self {
            protein_min_stock_g: 50.0,
            carb_min_stock_g: 30.0,
            fat_min_stock_g: 5.0,
            protein_tolerance_g: 5,
            carbs_tolerance_g: 10,
            fat_tolerance_g: 3,
        }
    }
}

/// Daily intake review thresholds
///
/// Percentages compare eaten energy or protein against the day's target.
/// "Day progress" is the hour of the day divided by 24.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeReviewConfig {
    /// Cut: over warning above this share of the kcal target (100 %)
    pub cut_over_percent: f64,
    /// Cut: pacing info above this share of the kcal target (90 %)
    pub cut_pacing_percent: f64,
    /// Cut: pacing info only before this hour (18)
    pub cut_pacing_before_hour: u32,
    /// Lean bulk: under warning below this share of the pro-rata kcal (0.7)
    pub bulk_behind_fraction: f64,
    /// Lean bulk: under warning only after this hour (14)
    pub bulk_behind_after_hour: u32,
    /// Lean bulk: over warning above this share of the kcal target (120 %)
    pub bulk_over_percent: f64,
    /// Protein percent expected per unit of day progress (80)
    pub protein_pace_percent: f64,
    /// Maintain: allowed kcal deviation before warning (300)
    pub maintain_band_kcal: i64,
    /// Maintain: deviation checked only after this hour (20)
    pub maintain_after_hour: u32,
}

impl Default for IntakeReviewConfig {
    fn default() -> Self {
        Self {
            cut_over_percent: 100.0,
            cut_pacing_percent: 90.0,
            cut_pacing_before_hour: 18,
            bulk_behind_fraction: 0.7,
            bulk_behind_after_hour: 14,
            bulk_over_percent: 120.0,
            protein_pace_percent: 80.0,
            maintain_band_kcal: 300,
            maintain_after_hour: 20,
        }
    }
}
