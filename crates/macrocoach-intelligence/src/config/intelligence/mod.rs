// ABOUTME: Intelligence configuration for the nutrition and training decision engine
// ABOUTME: Orchestrates domain-specific configs and provides unified validation and loading
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! Intelligence Configuration Module
//!
//! Every tunable constant used by the engine lives here with its documented
//! default. Configuration is loaded once: defaults, then `MACROCOACH_*`
//! environment overrides, then validation. An invalid environment falls back
//! to defaults with a warning.
//!
//! # Module Structure
//!
//! - `nutrition` - BMR, activity factors, goal offsets, macro ratios, trend, meal planner, intake review
//! - `training` - Progression increments, RPE ceilings, stall and deload rules

pub mod error;
pub mod nutrition;
pub mod training;

pub use error::ConfigError;
pub use nutrition::{
    ActivityFactorsConfig, BmrConfig, GoalAdjustmentConfig, IntakeReviewConfig,
    MacronutrientConfig, MealPlannerConfig, NutritionConfig, RecalibrationConfig, TrendConfig,
};
pub use training::ProgressionConfig;

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::warn;

/// Global configuration singleton
static INTELLIGENCE_CONFIG: OnceLock<IntelligenceConfig> = OnceLock::new();

/// Main intelligence configuration container
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntelligenceConfig {
    /// Target calculation settings
    pub nutrition: NutritionConfig,
    /// Weight trend windowing
    pub trend: TrendConfig,
    /// Recalibration safeguards
    pub recalibration: RecalibrationConfig,
    /// Pantry allocator thresholds
    pub meal_planner: MealPlannerConfig,
    /// Food diary warning thresholds
    pub intake_review: IntakeReviewConfig,
    /// Progression engine rules
    pub progression: ProgressionConfig,
}

impl IntelligenceConfig {
    /// Get the global configuration instance
    pub fn global() -> &'static Self {
        INTELLIGENCE_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                warn!("Failed to load intelligence config: {}, using defaults", e);
                Self::default()
            })
        })
    }

    /// Load configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_nutrition()?;
        self.validate_trend()?;
        self.validate_meal_planner()?;
        self.validate_intake_review()?;
        self.validate_progression()?;
        Ok(())
    }

    fn validate_nutrition(&self) -> Result<(), ConfigError> {
        let nutr = &self.nutrition;

        if nutr.bmr.msj_weight_coef <= 0.0 || nutr.bmr.msj_height_coef <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "BMR weight and height coefficients must be positive",
            ));
        }

        let factors = &nutr.activity_factors;
        let all = [
            factors.three_days,
            factors.four_days,
            factors.five_days,
            factors.six_days,
            factors.fallback,
        ];
        if all.iter().any(|f| !(1.0..=2.5).contains(f)) {
            return Err(ConfigError::ValueOutOfRange(
                "Activity factors must be between 1.0 and 2.5",
            ));
        }
        if factors.three_days >= factors.four_days
            || factors.four_days >= factors.five_days
            || factors.five_days >= factors.six_days
        {
            return Err(ConfigError::InvalidRange(
                "Activity factors must ascend with training days",
            ));
        }

        if nutr.goal_adjustments.cut_kcal >= 0 || nutr.goal_adjustments.lean_bulk_kcal <= 0 {
            return Err(ConfigError::InvalidRange(
                "Cut offset must be negative and lean bulk offset positive",
            ));
        }

        if !(0.5..=3.5).contains(&nutr.macronutrients.protein_g_per_kg) {
            return Err(ConfigError::ValueOutOfRange(
                "Protein must be between 0.5 and 3.5 g/kg",
            ));
        }
        if !(0.3..=2.0).contains(&nutr.macronutrients.fat_g_per_kg) {
            return Err(ConfigError::ValueOutOfRange(
                "Fat must be between 0.3 and 2.0 g/kg",
            ));
        }

        if self.recalibration.low_kcal_warning_threshold <= 0 {
            return Err(ConfigError::ValueOutOfRange(
                "Low kcal warning threshold must be positive",
            ));
        }

        Ok(())
    }

    fn validate_trend(&self) -> Result<(), ConfigError> {
        if self.trend.window_days < 1 {
            return Err(ConfigError::ValueOutOfRange(
                "Trend window must be at least one day",
            ));
        }
        if self.trend.sample_size == 0 || self.trend.min_entries < self.trend.sample_size {
            return Err(ConfigError::InvalidRange(
                "Trend sample size must be positive and no larger than min_entries",
            ));
        }
        Ok(())
    }

    fn validate_meal_planner(&self) -> Result<(), ConfigError> {
        let planner = &self.meal_planner;
        if planner.protein_min_stock_g < 0.0
            || planner.carb_min_stock_g < 0.0
            || planner.fat_min_stock_g < 0.0
        {
            return Err(ConfigError::ValueOutOfRange(
                "Minimum stock thresholds cannot be negative",
            ));
        }
        if planner.protein_tolerance_g < 0
            || planner.carbs_tolerance_g < 0
            || planner.fat_tolerance_g < 0
        {
            return Err(ConfigError::ValueOutOfRange(
                "Tolerance bands cannot be negative",
            ));
        }
        Ok(())
    }

    fn validate_intake_review(&self) -> Result<(), ConfigError> {
        let review = &self.intake_review;
        if review.cut_pacing_percent > review.cut_over_percent
            || review.cut_over_percent > review.bulk_over_percent
        {
            return Err(ConfigError::InvalidRange(
                "Intake pacing percent must not exceed the over percents",
            ));
        }
        if !(0.0..=1.0).contains(&review.bulk_behind_fraction)
            || review.protein_pace_percent < 0.0
            || review.maintain_band_kcal < 0
        {
            return Err(ConfigError::ValueOutOfRange(
                "Intake review fractions and bands cannot be negative",
            ));
        }
        if [
            review.cut_pacing_before_hour,
            review.bulk_behind_after_hour,
            review.maintain_after_hour,
        ]
        .iter()
        .any(|hour| *hour > 23)
        {
            return Err(ConfigError::ValueOutOfRange(
                "Intake review hours must be between 0 and 23",
            ));
        }
        Ok(())
    }

    fn validate_progression(&self) -> Result<(), ConfigError> {
        let prog = &self.progression;
        if prog.heavy_increment_kg <= 0.0
            || prog.pump_increment_kg <= 0.0
            || prog.isolation_increment_kg <= 0.0
            || prog.micro_increment_kg <= 0.0
            || prog.plate_step_kg <= 0.0
        {
            return Err(ConfigError::ValueOutOfRange(
                "Weight increments and plate step must be positive",
            ));
        }
        if !(0.0..1.0).contains(&prog.pain_reduction_factor)
            || !(0.0..1.0).contains(&prog.deload_factor)
        {
            return Err(ConfigError::ValueOutOfRange(
                "Pain and deload factors must be between 0 and 1",
            ));
        }
        if prog.heavy_rpe_ceiling > prog.rpe_decrease_above
            || prog.pump_rpe_ceiling > prog.rpe_decrease_above
            || prog.rpe_decrease_above > 10.0
        {
            return Err(ConfigError::InvalidRange(
                "Progression RPE ceilings must not exceed the decrease threshold",
            ));
        }
        if prog.history_sessions == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "Progression history must include at least one session",
            ));
        }
        Ok(())
    }

    /// Helper function to parse and apply an environment variable override
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Target calculation
        Self::apply_env_var(
            "MACROCOACH_PROTEIN_G_PER_KG",
            &mut self.nutrition.macronutrients.protein_g_per_kg,
        )?;
        Self::apply_env_var(
            "MACROCOACH_FAT_G_PER_KG",
            &mut self.nutrition.macronutrients.fat_g_per_kg,
        )?;
        Self::apply_env_var(
            "MACROCOACH_CUT_KCAL_ADJUSTMENT",
            &mut self.nutrition.goal_adjustments.cut_kcal,
        )?;
        Self::apply_env_var(
            "MACROCOACH_LEAN_BULK_KCAL_ADJUSTMENT",
            &mut self.nutrition.goal_adjustments.lean_bulk_kcal,
        )?;

        // Trend and recalibration
        Self::apply_env_var("MACROCOACH_TREND_WINDOW_DAYS", &mut self.trend.window_days)?;
        Self::apply_env_var("MACROCOACH_TREND_MIN_ENTRIES", &mut self.trend.min_entries)?;
        Self::apply_env_var(
            "MACROCOACH_LOW_KCAL_WARNING",
            &mut self.recalibration.low_kcal_warning_threshold,
        )?;

        // Meal planner tolerance bands
        Self::apply_env_var(
            "MACROCOACH_PROTEIN_TOLERANCE_G",
            &mut self.meal_planner.protein_tolerance_g,
        )?;
        Self::apply_env_var(
            "MACROCOACH_CARBS_TOLERANCE_G",
            &mut self.meal_planner.carbs_tolerance_g,
        )?;
        Self::apply_env_var(
            "MACROCOACH_FAT_TOLERANCE_G",
            &mut self.meal_planner.fat_tolerance_g,
        )?;

        // Food diary review
        Self::apply_env_var(
            "MACROCOACH_MAINTAIN_INTAKE_BAND_KCAL",
            &mut self.intake_review.maintain_band_kcal,
        )?;

        // Progression
        Self::apply_env_var(
            "MACROCOACH_HEAVY_INCREMENT_KG",
            &mut self.progression.heavy_increment_kg,
        )?;
        Self::apply_env_var(
            "MACROCOACH_PUMP_INCREMENT_KG",
            &mut self.progression.pump_increment_kg,
        )?;
        Self::apply_env_var(
            "MACROCOACH_ISOLATION_INCREMENT_KG",
            &mut self.progression.isolation_increment_kg,
        )?;
        Self::apply_env_var(
            "MACROCOACH_DELOAD_FACTOR",
            &mut self.progression.deload_factor,
        )?;

        Ok(self)
    }
}
