// ABOUTME: AI meal estimate service for photos and free-text descriptions
// ABOUTME: Resolves photo storage ids, calls the vision collaborator and coerces its output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

use crate::auth::Identity;
use crate::external::MealEstimateRequest;
use crate::resources::CoachResources;
use macrocoach_core::errors::{AppError, AppResult, ErrorCode};
use macrocoach_core::models::MealEstimate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// What the caller wants estimated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MealInput {
    /// An uploaded meal photo
    Photo {
        /// Opaque storage id
        storage_id: String,
    },
    /// What the user ate, in words
    Description {
        /// Free text
        text: String,
    },
}

impl MealInput {
    const fn failure_message(&self) -> &'static str {
        match self {
            Self::Photo { .. } => "Failed to analyze meal photo. Please try again or log manually.",
            Self::Description { .. } => "Failed to analyze meal description",
        }
    }
}

async fn to_request(
    resources: &CoachResources,
    input: &MealInput,
) -> AppResult<MealEstimateRequest> {
    match input {
        MealInput::Photo { storage_id } => {
            let image_url = resources
                .storage
                .resolve_url(storage_id)
                .await?
                .ok_or_else(|| {
                    AppError::new(ErrorCode::ResourceNotFound, "Photo not found")
                        .with_resource_id(storage_id.clone())
                })?;
            Ok(MealEstimateRequest::Photo { image_url })
        }
        MealInput::Description { text } => {
            let text = text.trim();
            if text.is_empty() {
                return Err(AppError::missing_field(
                    "text",
                    "Please describe what you ate",
                ));
            }
            Ok(MealEstimateRequest::Description {
                text: text.to_owned(),
            })
        }
    }
}

/// Estimate the foods and macros of a meal
///
/// The collaborator is called once. Its output is coerced: garbage numbers
/// become 0, grams and kcal are whole numbers, macros have one decimal and
/// an unknown confidence becomes medium.
///
/// # Errors
///
/// - `AuthRequired` for anonymous callers
/// - `MissingRequiredField` for an empty description
/// - `ResourceNotFound` for an unknown photo
/// - `ExternalServiceError` when the vision collaborator fails
pub async fn estimate_meal(
    resources: &CoachResources,
    identity: Identity,
    input: &MealInput,
) -> AppResult<MealEstimate> {
    let user_id = identity.require_user_to("Please sign in to estimate meals")?;
    let request = to_request(resources, input).await?;

    let payload = resources
        .vision
        .estimate_meal(&request)
        .await
        .map_err(|cause| {
            warn!(user_id = %user_id, error = %cause, "Meal estimate failed");
            AppError::new(ErrorCode::ExternalServiceError, input.failure_message())
                .with_user_id(user_id)
                .with_source(cause)
        })?;

    let estimate = MealEstimate::from_untrusted(&payload);
    info!(
        user_id = %user_id,
        items = estimate.items.len(),
        total_calories = estimate.total_calories,
        "Meal estimated"
    );
    Ok(estimate)
}
