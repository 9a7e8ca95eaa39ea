// ABOUTME: Pantry stock management and food catalogue listing services
// ABOUTME: Enforces non-negative stock and ownership of pantry rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

use crate::auth::{ensure_owner, Identity};
use crate::resources::CoachResources;
use macrocoach_core::errors::{AppError, AppResult, ErrorCode};
use macrocoach_core::models::{FoodGroup, FoodItem, PantryStock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// A pantry row joined with its catalogue food
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PantryItem {
    /// Pantry row
    pub stock: PantryStock,
    /// Catalogue food
    pub food: FoodItem,
}

/// Catalogue foods of one group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodGroupListing {
    /// Group
    pub group: FoodGroup,
    /// Foods in catalogue order
    pub foods: Vec<FoodItem>,
}

fn validate_grams(grams_available: f64) -> AppResult<()> {
    if grams_available.is_finite() && grams_available >= 0.0 {
        Ok(())
    } else {
        Err(AppError::new(
            ErrorCode::InvalidInput,
            "Grams available cannot be negative",
        )
        .with_details(serde_json::json!({ "field": "grams_available" })))
    }
}

async fn owned_stock(
    resources: &CoachResources,
    user_id: Uuid,
    stock_id: Uuid,
) -> AppResult<PantryStock> {
    let stock = resources
        .database
        .get_pantry_stock(stock_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::ResourceNotFound, "Pantry item not found")
                .with_resource_id(stock_id.to_string())
        })?;
    ensure_owner(
        stock.user_id,
        user_id,
        "You don't have permission to modify this pantry item",
    )?;
    Ok(stock)
}

/// Set the stock of a food, adding it to the pantry when missing
///
/// # Errors
///
/// Returns `InvalidInput` for negative grams and `ResourceNotFound` for an
/// unknown food
pub async fn add_pantry_item(
    resources: &CoachResources,
    identity: Identity,
    food_id: Uuid,
    grams_available: f64,
) -> AppResult<PantryStock> {
    let user_id = identity.require_user_to("Please sign in to manage your pantry")?;
    validate_grams(grams_available)?;
    if resources.database.get_food(food_id).await?.is_none() {
        return Err(
            AppError::new(ErrorCode::ResourceNotFound, "Food item not found")
                .with_resource_id(food_id.to_string()),
        );
    }

    let stock = resources
        .database
        .upsert_pantry_stock(user_id, food_id, grams_available)
        .await?;
    info!(user_id = %user_id, food_id = %food_id, grams_available, "Pantry stock set");
    Ok(stock)
}

/// Overwrite the grams of an owned pantry row
///
/// # Errors
///
/// Returns `InvalidInput` for negative grams, `ResourceNotFound` for an
/// unknown row and `PermissionDenied` for another user's row
pub async fn update_pantry_item(
    resources: &CoachResources,
    identity: Identity,
    stock_id: Uuid,
    grams_available: f64,
) -> AppResult<()> {
    let user_id = identity.require_user_to("Please sign in to manage your pantry")?;
    validate_grams(grams_available)?;
    owned_stock(resources, user_id, stock_id).await?;
    resources
        .database
        .update_pantry_stock(stock_id, grams_available)
        .await?;
    debug!(user_id = %user_id, stock_id = %stock_id, grams_available, "Pantry stock updated");
    Ok(())
}

/// Remove an owned pantry row
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown row and `PermissionDenied` for
/// another user's row
pub async fn remove_pantry_item(
    resources: &CoachResources,
    identity: Identity,
    stock_id: Uuid,
) -> AppResult<()> {
    let user_id = identity.require_user_to("Please sign in to manage your pantry")?;
    owned_stock(resources, user_id, stock_id).await?;
    resources.database.delete_pantry_stock(stock_id).await?;
    debug!(user_id = %user_id, stock_id = %stock_id, "Pantry stock removed");
    Ok(())
}

/// The caller's pantry in insertion order with food details
///
/// Rows whose food has left the catalogue are skipped.
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers
pub async fn list_pantry(
    resources: &CoachResources,
    identity: Identity,
) -> AppResult<Vec<PantryItem>> {
    let user_id = identity.require_user()?;
    let rows = resources.database.pantry_for_user(user_id).await?;
    let mut items = Vec::with_capacity(rows.len());
    for stock in rows {
        if let Some(food) = resources.database.get_food(stock.food_id).await? {
            items.push(PantryItem { stock, food });
        }
    }
    Ok(items)
}

/// The food catalogue grouped by food group, groups without foods omitted
///
/// # Errors
///
/// Returns an error if the catalogue cannot be read
pub async fn food_catalogue(resources: &CoachResources) -> AppResult<Vec<FoodGroupListing>> {
    let foods = resources.database.list_foods().await?;
    Ok(FoodGroup::ALL
        .iter()
        .map(|&group| FoodGroupListing {
            group,
            foods: foods.iter().filter(|f| f.group == group).cloned().collect(),
        })
        .filter(|listing| !listing.foods.is_empty())
        .collect())
}
