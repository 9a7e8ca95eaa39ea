// ABOUTME: Food diary services for manual, quick and photo entries with daily and weekly totals
// ABOUTME: Recomputes entry totals on every write and reviews today's intake against targets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! # Food Diary
//!
//! Entries are dated with the clock's current day. Totals are always derived
//! from the items (kcal whole, macros to one decimal); callers never supply
//! them. Photo entries start unverified because their numbers are AI
//! estimates.

use crate::auth::Identity;
use crate::resources::CoachResources;
use crate::services::meal_plans::profile_targets;
use chrono::{Duration, NaiveDate, Timelike};
use macrocoach_core::constants::queries::WEEKLY_SUMMARY_DAYS;
use macrocoach_core::errors::{AppError, AppResult, ErrorCode};
use macrocoach_core::models::{
    FoodLog, FoodLogSource, IntakeTotals, LoggedFood, MacroTotals, MealEstimate, MealType,
};
use macrocoach_intelligence::intake_review::{
    review_intake, IntakeWarning, DEFAULT_INTAKE_TARGETS,
};
use macrocoach_intelligence::rounding::{round_to_int, round_to_tenth};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// Message for a missing or foreign diary entry
pub const FOOD_LOG_NOT_FOUND_MESSAGE: &str = "Food log not found";

/// Ingredients entered by hand
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManualLogInput {
    /// Meal slot
    pub meal_type: MealType,
    /// At least one food
    pub items: Vec<LoggedFood>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Bare totals under one name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuickLogInput {
    /// Meal slot
    pub meal_type: MealType,
    /// What was eaten
    pub name: String,
    /// Kilocalories
    pub calories: f64,
    /// Protein grams
    pub protein: f64,
    /// Carbohydrate grams
    pub carbs: f64,
    /// Fat grams
    pub fat: f64,
    /// Free-text notes
    pub notes: Option<String>,
}

/// A meal photo together with its AI estimate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhotoLogInput {
    /// Meal slot
    pub meal_type: MealType,
    /// Opaque storage id of the photo
    pub storage_id: String,
    /// Estimate from `food_estimates::estimate_meal`, possibly edited
    pub estimate: MealEstimate,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Partial edit of a diary entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FoodLogUpdate {
    /// Replacement items; totals are recomputed
    pub items: Option<Vec<LoggedFood>>,
    /// Mark an estimate as checked
    pub is_verified: Option<bool>,
    /// Replacement notes
    pub notes: Option<String>,
}

/// A diary entry with its photo URL resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodLogView {
    /// Stored entry
    pub log: FoodLog,
    /// Retrievable photo URL for photo entries
    pub photo_url: Option<String>,
}

/// Today's diary with totals, targets and warnings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyFoodLog {
    /// Day covered
    pub date: NaiveDate,
    /// Entries in insertion order
    pub logs: Vec<FoodLogView>,
    /// Sum of the entries
    pub totals: IntakeTotals,
    /// Profile targets, or defaults without a profile
    pub targets: MacroTotals,
    /// Goal-aware intake warnings, empty without a profile
    pub warnings: Vec<IntakeWarning>,
}

/// One day of the weekly summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyIntakeSummary {
    /// Day
    pub date: NaiveDate,
    /// Sum of the day's entries
    pub totals: IntakeTotals,
    /// Calorie target
    pub kcal_target: i64,
}

fn validate_amount(field: &'static str, value: f64) -> AppResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(
            AppError::new(ErrorCode::InvalidInput, format!("{field} cannot be negative"))
                .with_details(serde_json::json!({ "field": field })),
        )
    }
}

fn validate_items(items: &[LoggedFood]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::missing_field("items", "Add at least one food to log"));
    }
    for item in items {
        if item.name.trim().is_empty() {
            return Err(AppError::missing_field("name", "Every food needs a name"));
        }
        validate_amount("grams", item.grams)?;
        validate_amount("calories", item.calories)?;
        validate_amount("protein", item.protein)?;
        validate_amount("carbs", item.carbs)?;
        validate_amount("fat", item.fat)?;
    }
    Ok(())
}

/// Totals of a set of foods, kcal whole and macros to one decimal
#[must_use]
pub fn item_totals(items: &[LoggedFood]) -> IntakeTotals {
    let (calories, protein, carbs, fat) = items.iter().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(kcal, p, c, f), item| {
            (
                kcal + item.calories,
                p + item.protein,
                c + item.carbs,
                f + item.fat,
            )
        },
    );
    IntakeTotals {
        calories: round_to_int(calories),
        protein: round_to_tenth(protein),
        carbs: round_to_tenth(carbs),
        fat: round_to_tenth(fat),
    }
}

/// Sum of several entries' totals
#[must_use]
pub fn day_totals(logs: &[FoodLog]) -> IntakeTotals {
    let sum = logs.iter().fold(IntakeTotals::default(), |acc, log| IntakeTotals {
        calories: acc.calories + log.totals.calories,
        protein: acc.protein + log.totals.protein,
        carbs: acc.carbs + log.totals.carbs,
        fat: acc.fat + log.totals.fat,
    });
    IntakeTotals {
        protein: round_to_tenth(sum.protein),
        carbs: round_to_tenth(sum.carbs),
        fat: round_to_tenth(sum.fat),
        ..sum
    }
}

fn trimmed_notes(notes: Option<&str>) -> Option<String> {
    notes
        .map(|n| n.trim().to_owned())
        .filter(|n| !n.is_empty())
}

fn new_entry(
    resources: &CoachResources,
    user_id: Uuid,
    meal_type: MealType,
    source: FoodLogSource,
    items: Vec<LoggedFood>,
    notes: Option<&str>,
) -> FoodLog {
    FoodLog {
        id: Uuid::new_v4(),
        user_id,
        date: resources.today(),
        meal_type,
        logged_at: resources.clock.now(),
        source,
        photo_storage_id: None,
        photo_description: None,
        totals: item_totals(&items),
        items,
        confidence: None,
        is_verified: true,
        notes: trimmed_notes(notes),
    }
}

async fn store(resources: &CoachResources, log: FoodLog) -> AppResult<FoodLog> {
    resources.database.insert_food_log(log.clone()).await?;
    info!(
        user_id = %log.user_id,
        log_id = %log.id,
        meal_type = %log.meal_type,
        source = ?log.source,
        calories = log.totals.calories,
        "Food logged"
    );
    Ok(log)
}

/// Log a meal from hand-entered ingredients
///
/// # Errors
///
/// - `AuthRequired` for anonymous callers
/// - `MissingRequiredField` for no items or a blank food name
/// - `InvalidInput` for negative or non-finite amounts
pub async fn log_food_manual(
    resources: &CoachResources,
    identity: Identity,
    input: &ManualLogInput,
) -> AppResult<FoodLog> {
    let user_id = identity.require_user_to("Please sign in to log food")?;
    validate_items(&input.items)?;
    let log = new_entry(
        resources,
        user_id,
        input.meal_type,
        FoodLogSource::Manual,
        input.items.clone(),
        input.notes.as_deref(),
    );
    store(resources, log).await
}

/// Log bare calorie and macro totals as a single 0 g item
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers and a validation error for a
/// blank name or negative amounts
pub async fn log_food_quick(
    resources: &CoachResources,
    identity: Identity,
    input: &QuickLogInput,
) -> AppResult<FoodLog> {
    let user_id = identity.require_user_to("Please sign in to log food")?;
    let item = LoggedFood {
        name: input.name.trim().to_owned(),
        grams: 0.0,
        calories: input.calories,
        protein: input.protein,
        carbs: input.carbs,
        fat: input.fat,
    };
    validate_items(std::slice::from_ref(&item))?;
    let log = new_entry(
        resources,
        user_id,
        input.meal_type,
        FoodLogSource::Quick,
        vec![item],
        input.notes.as_deref(),
    );
    store(resources, log).await
}

/// Save an AI-estimated meal photo as an unverified diary entry
///
/// Totals come from the estimate's items, not its reported totals.
///
/// # Errors
///
/// - `AuthRequired` for anonymous callers
/// - `ResourceNotFound` when the photo is not in storage
/// - `MissingRequiredField` when the estimate has no items
pub async fn save_meal_photo_log(
    resources: &CoachResources,
    identity: Identity,
    input: &PhotoLogInput,
) -> AppResult<FoodLog> {
    let user_id = identity.require_user_to("Please sign in to log food")?;
    if resources
        .storage
        .resolve_url(&input.storage_id)
        .await?
        .is_none()
    {
        return Err(AppError::new(ErrorCode::ResourceNotFound, "Photo not found")
            .with_resource_id(input.storage_id.clone()));
    }
    let items: Vec<LoggedFood> = input.estimate.items.iter().map(LoggedFood::from).collect();
    validate_items(&items)?;

    let mut log = new_entry(
        resources,
        user_id,
        input.meal_type,
        FoodLogSource::Photo,
        items,
        input.notes.as_deref(),
    );
    log.photo_storage_id = Some(input.storage_id.clone());
    log.photo_description = Some(input.estimate.description.clone());
    log.confidence = Some(input.estimate.confidence);
    log.is_verified = false;
    store(resources, log).await
}

async fn owned_log(resources: &CoachResources, user_id: Uuid, log_id: Uuid) -> AppResult<FoodLog> {
    resources
        .database
        .get_food_log(log_id)
        .await?
        .filter(|log| log.user_id == user_id)
        .ok_or_else(|| {
            AppError::new(ErrorCode::ResourceNotFound, FOOD_LOG_NOT_FOUND_MESSAGE)
                .with_resource_id(log_id.to_string())
        })
}

/// Edit or verify an owned diary entry
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown or foreign entry and a
/// validation error for invalid replacement items
pub async fn update_food_log(
    resources: &CoachResources,
    identity: Identity,
    log_id: Uuid,
    update: &FoodLogUpdate,
) -> AppResult<FoodLog> {
    let user_id = identity.require_user_to("Please sign in to update food logs")?;
    let mut log = owned_log(resources, user_id, log_id).await?;

    if let Some(items) = &update.items {
        validate_items(items)?;
        log.totals = item_totals(items);
        log.items.clone_from(items);
    }
    if let Some(is_verified) = update.is_verified {
        log.is_verified = is_verified;
    }
    if update.notes.is_some() {
        log.notes = trimmed_notes(update.notes.as_deref());
    }

    resources.database.update_food_log(log.clone()).await?;
    debug!(user_id = %user_id, log_id = %log_id, verified = log.is_verified, "Food log updated");
    Ok(log)
}

/// Delete an owned diary entry and its stored photo
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown or foreign entry
pub async fn delete_food_log(
    resources: &CoachResources,
    identity: Identity,
    log_id: Uuid,
) -> AppResult<()> {
    let user_id = identity.require_user_to("Please sign in to delete food logs")?;
    let log = owned_log(resources, user_id, log_id).await?;
    if let Some(storage_id) = &log.photo_storage_id {
        resources.storage.delete(storage_id).await?;
    }
    resources.database.delete_food_log(log_id).await?;
    debug!(user_id = %user_id, log_id = %log_id, "Food log deleted");
    Ok(())
}

/// The caller's entries for one day in insertion order
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers
pub async fn food_logs_for_date(
    resources: &CoachResources,
    identity: Identity,
    date: NaiveDate,
) -> AppResult<Vec<FoodLog>> {
    let user_id = identity.require_user()?;
    resources.database.food_logs_between(user_id, date, date).await
}

/// Today's entries with totals, targets and intake warnings
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers
pub async fn todays_food_logs(
    resources: &CoachResources,
    identity: Identity,
) -> AppResult<DailyFoodLog> {
    let user_id = identity.require_user()?;
    let today = resources.today();
    let logs = resources
        .database
        .food_logs_between(user_id, today, today)
        .await?;
    let totals = day_totals(&logs);

    let profile = resources.database.get_profile(user_id).await?;
    let targets = profile
        .as_ref()
        .map_or(DEFAULT_INTAKE_TARGETS, profile_targets);
    let warnings = profile.as_ref().map_or_else(Vec::new, |profile| {
        review_intake(
            profile.goal,
            &totals,
            &targets,
            resources.clock.now().hour(),
            &resources.intelligence.intake_review,
        )
    });

    let mut views = Vec::with_capacity(logs.len());
    for log in logs {
        let photo_url = match &log.photo_storage_id {
            Some(storage_id) => resources.storage.resolve_url(storage_id).await?,
            None => None,
        };
        views.push(FoodLogView { log, photo_url });
    }

    Ok(DailyFoodLog {
        date: today,
        logs: views,
        totals,
        targets,
        warnings,
    })
}

/// Daily totals for the last seven days, oldest first
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers
pub async fn weekly_food_summary(
    resources: &CoachResources,
    identity: Identity,
) -> AppResult<Vec<DailyIntakeSummary>> {
    let user_id = identity.require_user()?;
    let today = resources.today();
    let first_day = today - Duration::days(WEEKLY_SUMMARY_DAYS - 1);
    let logs = resources
        .database
        .food_logs_between(user_id, first_day, today)
        .await?;
    let kcal_target = resources
        .database
        .get_profile(user_id)
        .await?
        .map_or(DEFAULT_INTAKE_TARGETS.kcal, |profile| profile.kcal_target);

    Ok(first_day
        .iter_days()
        .take_while(|date| *date <= today)
        .map(|date| {
            let day: Vec<FoodLog> = logs.iter().filter(|l| l.date == date).cloned().collect();
            DailyIntakeSummary {
                date,
                totals: day_totals(&day),
                kcal_target,
            }
        })
        .collect())
}
