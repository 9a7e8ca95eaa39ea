// ABOUTME: Meal plan generation and lookup services
// ABOUTME: Joins the pantry with the catalogue, runs the allocator and replaces the day's plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

use crate::auth::Identity;
use crate::resources::CoachResources;
use crate::services::profiles::require_profile;
use chrono::NaiveDate;
use macrocoach_core::errors::AppResult;
use macrocoach_core::models::{MacroTotals, MealPlan, PlanStatus, Profile};
use macrocoach_intelligence::meal_planner::{generate_meal_plan, PantryEntry};
use tracing::{info, warn};
use uuid::Uuid;

/// Meal plan request options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MealPlanRequest {
    /// Day to plan, today when absent
    pub date: Option<NaiveDate>,
    /// Meals to split the day into, configured default when absent
    pub meals_per_day: Option<u8>,
}

/// Daily targets of a profile as whole-number totals
#[must_use]
pub fn profile_targets(profile: &Profile) -> MacroTotals {
    MacroTotals {
        kcal: profile.kcal_target,
        protein: i64::from(profile.macros.protein_g),
        carbs: i64::from(profile.macros.carbs_g),
        fat: i64::from(profile.macros.fat_g),
    }
}

async fn pantry_entries(resources: &CoachResources, user_id: Uuid) -> AppResult<Vec<PantryEntry>> {
    let rows = resources.database.pantry_for_user(user_id).await?;
    let mut entries = Vec::with_capacity(rows.len());
    for stock in rows {
        if let Some(food) = resources.database.get_food(stock.food_id).await? {
            entries.push(PantryEntry {
                food,
                grams_available: stock.grams_available,
            });
        }
    }
    Ok(entries)
}

/// Generate a plan from the caller's pantry and replace any plan for the day
///
/// Pantry stock is read, never decremented.
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers, `ResourceNotFound` without a
/// profile, `ValueOutOfRange` for a bad meal count and `PlanningFailed` when
/// the pantry cannot cover protein and carbs
pub async fn generate(
    resources: &CoachResources,
    identity: Identity,
    request: MealPlanRequest,
) -> AppResult<MealPlan> {
    let user_id = identity.require_user_to("Please sign in to generate a meal plan")?;
    let profile = require_profile(resources, user_id).await?;
    let meals_per_day = request
        .meals_per_day
        .unwrap_or(resources.config.default_meals_per_day);
    let date = request.date.unwrap_or_else(|| resources.today());

    let pantry = pantry_entries(resources, user_id).await?;
    let generated = generate_meal_plan(
        &pantry,
        &profile_targets(&profile),
        meals_per_day,
        &resources.intelligence.meal_planner,
    )
    .map_err(|e| e.with_user_id(user_id))?;

    let plan = MealPlan {
        id: Uuid::new_v4(),
        user_id,
        date,
        status: generated.status,
        warning_text: generated.warning_text(),
        warnings: generated.warnings,
        target: generated.target,
        actual: generated.actual,
        meals: generated.meals,
    };
    resources.database.replace_meal_plan(plan.clone()).await?;

    if plan.status == PlanStatus::Warning {
        warn!(
            user_id = %user_id,
            date = %date,
            warnings = plan.warnings.len(),
            "Meal plan generated with warnings"
        );
    } else {
        info!(user_id = %user_id, date = %date, meals_per_day, "Meal plan generated");
    }
    Ok(plan)
}

/// The caller's plan for a day, today when absent
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers
pub async fn meal_plan_for(
    resources: &CoachResources,
    identity: Identity,
    date: Option<NaiveDate>,
) -> AppResult<Option<MealPlan>> {
    let user_id = identity.require_user()?;
    let date = date.unwrap_or_else(|| resources.today());
    resources.database.get_meal_plan(user_id, date).await
}
