// ABOUTME: Calorie and macro target calculation from body metrics and goal
// ABOUTME: Mifflin-St Jeor BMR, training-day activity factor TDEE, goal offset and macro split
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! Nutrition Calculator Module
//!
//! `BMR -> TDEE -> goal-adjusted kcal -> macros`. Protein and fat scale with
//! bodyweight; carbohydrates absorb whatever energy is left and never go
//! negative.
//!
//! # Scientific References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
//!   *American Journal of Clinical Nutrition*, 51(2), 241-247.
//!   <https://doi.org/10.1093/ajcn/51.2.241>

use macrocoach_core::constants::energy::{
    KCAL_PER_GRAM_CARBS, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN,
};
use macrocoach_core::constants::limits::{
    AGE_MAX, AGE_MIN, HEIGHT_CM_MAX, HEIGHT_CM_MIN, TRAINING_DAYS_MAX, TRAINING_DAYS_MIN,
    WEIGHT_KG_MAX, WEIGHT_KG_MIN,
};
use macrocoach_core::errors::{AppError, AppResult};
use macrocoach_core::models::{Goal, MacroTargets, Sex};
use serde::{Deserialize, Serialize};

use crate::config::intelligence::{
    ActivityFactorsConfig, BmrConfig, GoalAdjustmentConfig, MacronutrientConfig, NutritionConfig,
};
use crate::rounding::round_to_int;

/// Metric inputs for target calculation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TargetInputs {
    /// Sex
    pub sex: Sex,
    /// Body weight in kg
    pub weight_kg: f64,
    /// Height in cm
    pub height_cm: f64,
    /// Age in years
    pub age: u32,
    /// Training days per week
    pub training_days_per_week: u8,
    /// Goal
    pub goal: Goal,
}

/// Result of a full target calculation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NutritionTargets {
    /// Basal metabolic rate in kcal
    pub bmr: f64,
    /// Maintenance energy in kcal
    pub tdee: i64,
    /// Goal-adjusted daily kcal
    pub kcal_target: i64,
    /// Macro grams for `kcal_target`
    pub macros: MacroTargets,
}

/// Check every input against its inclusive legal range
///
/// # Errors
///
/// Returns a `ValueOutOfRange` error naming the first offending field and its bounds
pub fn validate_inputs(inputs: &TargetInputs) -> AppResult<()> {
    if !(AGE_MIN..=AGE_MAX).contains(&inputs.age) {
        return Err(AppError::out_of_range("age", AGE_MIN, AGE_MAX));
    }
    if !(TRAINING_DAYS_MIN..=TRAINING_DAYS_MAX).contains(&inputs.training_days_per_week) {
        return Err(AppError::out_of_range(
            "training_days_per_week",
            TRAINING_DAYS_MIN,
            TRAINING_DAYS_MAX,
        ));
    }
    if !(HEIGHT_CM_MIN..=HEIGHT_CM_MAX).contains(&inputs.height_cm) {
        return Err(AppError::out_of_range("height_cm", HEIGHT_CM_MIN, HEIGHT_CM_MAX));
    }
    if !(WEIGHT_KG_MIN..=WEIGHT_KG_MAX).contains(&inputs.weight_kg) {
        return Err(AppError::out_of_range("weight_kg", WEIGHT_KG_MIN, WEIGHT_KG_MAX));
    }
    Ok(())
}

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor equation (1990)
///
/// Formula: BMR = (10 x `weight_kg`) + (6.25 x `height_cm`) - (5 x age) + `sex_constant`
/// - Men: +5
/// - Women: -161
#[must_use]
pub fn calculate_mifflin_st_jeor(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    sex: Sex,
    config: &BmrConfig,
) -> f64 {
    let weight_component = config.msj_weight_coef * weight_kg;
    let height_component = config.msj_height_coef * height_cm;
    let age_component = config.msj_age_coef * f64::from(age);

    let sex_constant = match sex {
        Sex::Male => config.msj_male_constant,
        Sex::Female => config.msj_female_constant,
    };

    weight_component + height_component + age_component + sex_constant
}

/// Total Daily Energy Expenditure, rounded to whole kcal
///
/// Unsupported day counts use the fallback factor.
#[must_use]
pub fn calculate_tdee(bmr: f64, training_days_per_week: u8, config: &ActivityFactorsConfig) -> i64 {
    round_to_int(bmr * config.for_training_days(training_days_per_week))
}

/// Apply the goal offset to maintenance calories
#[must_use]
pub const fn adjust_for_goal(tdee: i64, goal: Goal, config: &GoalAdjustmentConfig) -> i64 {
    match goal {
        Goal::Cut => tdee + config.cut_kcal,
        Goal::LeanBulk => tdee + config.lean_bulk_kcal,
        Goal::Maintain => tdee + config.maintain_kcal,
    }
}

/// Split a calorie target into macro grams
///
/// Carbs take the remainder after protein and fat and are floored at zero
/// even when protein and fat alone exceed the target.
#[must_use]
pub fn calculate_macro_targets(
    weight_kg: f64,
    kcal_target: i64,
    config: &MacronutrientConfig,
) -> MacroTargets {
    let protein_g = round_to_int(weight_kg * config.protein_g_per_kg).max(0);
    let fat_g = round_to_int(weight_kg * config.fat_g_per_kg).max(0);

    let protein_kcal = protein_g as f64 * KCAL_PER_GRAM_PROTEIN;
    let fat_kcal = fat_g as f64 * KCAL_PER_GRAM_FAT;
    let remaining_kcal = (kcal_target as f64 - protein_kcal - fat_kcal).max(0.0);
    let carbs_g = round_to_int(remaining_kcal / KCAL_PER_GRAM_CARBS);

    MacroTargets {
        protein_g: u32::try_from(protein_g).unwrap_or(u32::MAX),
        carbs_g: u32::try_from(carbs_g).unwrap_or(u32::MAX),
        fat_g: u32::try_from(fat_g).unwrap_or(u32::MAX),
    }
}

/// Validate inputs and compute BMR, TDEE, goal calories and macros
///
/// # Errors
///
/// Returns a `ValueOutOfRange` error when an input is outside its legal range
pub fn calculate_targets(inputs: &TargetInputs, config: &NutritionConfig) -> AppResult<NutritionTargets> {
    validate_inputs(inputs)?;

    let bmr = calculate_mifflin_st_jeor(
        inputs.weight_kg,
        inputs.height_cm,
        inputs.age,
        inputs.sex,
        &config.bmr,
    );
    let tdee = calculate_tdee(bmr, inputs.training_days_per_week, &config.activity_factors);
    let kcal_target = adjust_for_goal(tdee, inputs.goal, &config.goal_adjustments);
    let macros = calculate_macro_targets(inputs.weight_kg, kcal_target, &config.macronutrients);

    Ok(NutritionTargets {
        bmr,
        tdee,
        kcal_target,
        macros,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(goal: Goal) -> TargetInputs {
        TargetInputs {
            sex: Sex::Male,
            weight_kg: 80.0,
            height_cm: 180.0,
            age: 25,
            training_days_per_week: 4,
            goal,
        }
    }

    #[test]
    fn test_reference_maintenance_targets() {
        let targets = calculate_targets(&inputs(Goal::Maintain), &NutritionConfig::default()).unwrap();

        assert!((targets.bmr - 1805.0).abs() < f64::EPSILON);
        assert_eq!(targets.tdee, 2644);
        assert_eq!(targets.kcal_target, 2644);
        assert_eq!(targets.macros.protein_g, 168);
        assert_eq!(targets.macros.fat_g, 64);
        assert_eq!(targets.macros.carbs_g, 349);
    }

    #[test]
    fn test_goal_offsets() {
        let config = NutritionConfig::default();
        let cut = calculate_targets(&inputs(Goal::Cut), &config).unwrap();
        let bulk = calculate_targets(&inputs(Goal::LeanBulk), &config).unwrap();

        assert_eq!(cut.tdee, 2644);
        assert_eq!(cut.kcal_target, 2144);
        assert_eq!(bulk.kcal_target, 2944);
    }

    #[test]
    fn test_carbs_floor_at_zero() {
        let macros = calculate_macro_targets(150.0, 1000, &MacronutrientConfig::default());
        assert_eq!(macros.carbs_g, 0);
        assert_eq!(macros.protein_g, 315);
    }

    #[test]
    fn test_unsupported_day_count_uses_fallback_factor() {
        let factors = ActivityFactorsConfig::default();
        assert_eq!(calculate_tdee(2000.0, 7, &factors), 3100);
    }

    #[test]
    fn test_validation_names_field_and_range() {
        let mut young = inputs(Goal::Cut);
        young.age = 15;
        let error = calculate_targets(&young, &NutritionConfig::default()).unwrap_err();
        assert_eq!(error.message, "age must be between 16 and 100");

        let mut light = inputs(Goal::Cut);
        light.weight_kg = 29.9;
        let error = calculate_targets(&light, &NutritionConfig::default()).unwrap_err();
        assert_eq!(error.context.details["field"], "weight_kg");
    }
}
