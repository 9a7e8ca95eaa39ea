// ABOUTME: Personal custom food library services with per-100g macro densities
// ABOUTME: Save merges by case-insensitive name; update and delete check ownership
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

use crate::auth::{ensure_owner, Identity};
use crate::resources::CoachResources;
use macrocoach_core::constants::limits::{KCAL_PER_100G_MAX, MACRO_PER_100G_MAX};
use macrocoach_core::errors::{AppError, AppResult, ErrorCode};
use macrocoach_core::models::{CustomFood, CustomFoodSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// A custom food as entered
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomFoodInput {
    /// Display name
    pub name: String,
    /// Protein grams per 100 g
    pub protein_per_100g: f64,
    /// Carbohydrate grams per 100 g
    pub carbs_per_100g: f64,
    /// Fat grams per 100 g
    pub fat_per_100g: f64,
    /// Kilocalories per 100 g
    pub calories_per_100g: f64,
    /// Origin of the numbers
    pub source: CustomFoodSource,
}

/// Partial edit of a custom food
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomFoodUpdate {
    /// New name
    pub name: Option<String>,
    /// New protein density
    pub protein_per_100g: Option<f64>,
    /// New carbohydrate density
    pub carbs_per_100g: Option<f64>,
    /// New fat density
    pub fat_per_100g: Option<f64>,
    /// New energy density
    pub calories_per_100g: Option<f64>,
}

fn validate_density(field: &'static str, value: f64, max: f64) -> AppResult<()> {
    if value.is_finite() && (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(AppError::out_of_range(field, 0, max))
    }
}

fn validate_food(food: &CustomFood) -> AppResult<()> {
    if food.name.is_empty() {
        return Err(AppError::missing_field("name", "Please name your food"));
    }
    validate_density("protein_per_100g", food.protein_per_100g, MACRO_PER_100G_MAX)?;
    validate_density("carbs_per_100g", food.carbs_per_100g, MACRO_PER_100G_MAX)?;
    validate_density("fat_per_100g", food.fat_per_100g, MACRO_PER_100G_MAX)?;
    validate_density("calories_per_100g", food.calories_per_100g, KCAL_PER_100G_MAX)
}

async fn owned_food(
    resources: &CoachResources,
    user_id: Uuid,
    food_id: Uuid,
    message: &str,
) -> AppResult<CustomFood> {
    let food = resources
        .database
        .get_custom_food(food_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::ResourceNotFound, "Custom food not found")
                .with_resource_id(food_id.to_string())
        })?;
    ensure_owner(food.user_id, user_id, message)?;
    Ok(food)
}

/// Save a food to the caller's library
///
/// A food with the same name (ignoring case) is updated in place and keeps
/// its original name.
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers, `MissingRequiredField` for a
/// blank name and `ValueOutOfRange` for an implausible density
pub async fn save_custom_food(
    resources: &CoachResources,
    identity: Identity,
    input: &CustomFoodInput,
) -> AppResult<CustomFood> {
    let user_id = identity.require_user_to("Please sign in to save custom foods")?;
    let food = CustomFood {
        id: Uuid::new_v4(),
        user_id,
        name: input.name.trim().to_owned(),
        protein_per_100g: input.protein_per_100g,
        carbs_per_100g: input.carbs_per_100g,
        fat_per_100g: input.fat_per_100g,
        calories_per_100g: input.calories_per_100g,
        source: input.source,
    };
    validate_food(&food)?;

    let saved = resources.database.upsert_custom_food(food).await?;
    info!(user_id = %user_id, food_id = %saved.id, name = %saved.name, "Custom food saved");
    Ok(saved)
}

/// The caller's custom foods in insertion order
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers
pub async fn list_custom_foods(
    resources: &CoachResources,
    identity: Identity,
) -> AppResult<Vec<CustomFood>> {
    let user_id = identity.require_user()?;
    resources.database.custom_foods_for_user(user_id).await
}

/// Patch an owned custom food
///
/// # Errors
///
/// - `ResourceNotFound` for an unknown food
/// - `PermissionDenied` for another user's food
/// - `InvalidInput` when the new name belongs to another of the caller's foods
/// - `ValueOutOfRange` for an implausible density
pub async fn update_custom_food(
    resources: &CoachResources,
    identity: Identity,
    food_id: Uuid,
    update: &CustomFoodUpdate,
) -> AppResult<CustomFood> {
    let user_id = identity.require_user_to("Please sign in to manage custom foods")?;
    let mut food = owned_food(
        resources,
        user_id,
        food_id,
        "You don't have permission to update this food",
    )
    .await?;

    if let Some(name) = &update.name {
        let name = name.trim();
        let taken = resources
            .database
            .custom_foods_for_user(user_id)
            .await?
            .iter()
            .any(|other| other.id != food_id && other.has_name(name));
        if taken {
            return Err(AppError::invalid_input(format!(
                "You already have a custom food named '{name}'"
            )));
        }
        name.clone_into(&mut food.name);
    }
    if let Some(value) = update.protein_per_100g {
        food.protein_per_100g = value;
    }
    if let Some(value) = update.carbs_per_100g {
        food.carbs_per_100g = value;
    }
    if let Some(value) = update.fat_per_100g {
        food.fat_per_100g = value;
    }
    if let Some(value) = update.calories_per_100g {
        food.calories_per_100g = value;
    }
    validate_food(&food)?;

    resources.database.update_custom_food(food.clone()).await?;
    debug!(user_id = %user_id, food_id = %food_id, "Custom food updated");
    Ok(food)
}

/// Remove an owned custom food
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown food and `PermissionDenied` for
/// another user's food
pub async fn delete_custom_food(
    resources: &CoachResources,
    identity: Identity,
    food_id: Uuid,
) -> AppResult<()> {
    let user_id = identity.require_user_to("Please sign in to manage custom foods")?;
    owned_food(
        resources,
        user_id,
        food_id,
        "You don't have permission to delete this food",
    )
    .await?;
    resources.database.delete_custom_food(food_id).await?;
    debug!(user_id = %user_id, food_id = %food_id, "Custom food deleted");
    Ok(())
}
