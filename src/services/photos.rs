// ABOUTME: Progress photo recording, AI physique analysis and training priority services
// ABOUTME: Coerces untrusted vision output and propagates lagging muscles into the user's split
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

use crate::auth::{ensure_owner, Identity};
use crate::resources::CoachResources;
use chrono::NaiveDate;
use macrocoach_core::errors::{AppError, AppResult, ErrorCode};
use macrocoach_core::models::{AnalysisStatus, Exercise, ProgressPhoto, ProgressPhotoAnalysis};
use macrocoach_intelligence::priority::{
    exercises_for_muscles, plan_priority_changes, plan_priority_reset, PriorityChange,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{error, info};
use uuid::Uuid;

/// Shown to the caller when the vision collaborator fails
pub const ANALYSIS_FAILED_MESSAGE: &str = "Photo analysis failed. Please try again later.";

/// Outcome of a priority propagation or reset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriorityUpdate {
    /// Labels the update was computed from
    pub lagging_muscles: Vec<String>,
    /// Exercises now flagged
    pub exercises_prioritized: Vec<String>,
    /// Template rows written
    pub updated_count: usize,
}

/// A completed analysis and the priority update it caused
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhotoAnalysisOutcome {
    /// Photo with its saved analysis
    pub photo: ProgressPhoto,
    /// Template changes
    pub priorities: PriorityUpdate,
}

/// Upload target for a new photo
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers or the storage failure
pub async fn upload_url(resources: &CoachResources, identity: Identity) -> AppResult<String> {
    identity.require_user_to("Please sign in to upload photos")?;
    resources.storage.generate_upload_url().await
}

/// Record an uploaded photo, pending analysis
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers
pub async fn record_photo(
    resources: &CoachResources,
    identity: Identity,
    storage_id: &str,
    date: Option<NaiveDate>,
) -> AppResult<ProgressPhoto> {
    let user_id = identity.require_user_to("Please sign in to save photos")?;
    let photo = ProgressPhoto {
        id: Uuid::new_v4(),
        user_id,
        date: date.unwrap_or_else(|| resources.today()),
        storage_id: storage_id.to_owned(),
        analysis_status: AnalysisStatus::Pending,
        analysis: None,
    };
    resources.database.insert_photo(photo.clone()).await?;
    info!(user_id = %user_id, photo_id = %photo.id, "Progress photo recorded");
    Ok(photo)
}

async fn owned_photo(
    resources: &CoachResources,
    user_id: Uuid,
    photo_id: Uuid,
) -> AppResult<ProgressPhoto> {
    let photo = resources
        .database
        .get_photo(photo_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::ResourceNotFound, "Photo not found")
                .with_resource_id(photo_id.to_string())
        })?;
    ensure_owner(
        photo.user_id,
        user_id,
        "You don't have permission to analyze this photo",
    )?;
    Ok(photo)
}

async fn mark_failed(
    resources: &CoachResources,
    mut photo: ProgressPhoto,
    cause: AppError,
) -> AppError {
    error!(
        photo_id = %photo.id,
        error = %cause,
        "Progress photo analysis failed"
    );
    photo.analysis_status = AnalysisStatus::Failed;
    if let Err(e) = resources.database.update_photo(photo).await {
        return e;
    }
    AppError::new(ErrorCode::ExternalServiceError, ANALYSIS_FAILED_MESSAGE).with_source(cause)
}

/// Analyze a photo once and steer the user's training priorities
///
/// A collaborator failure marks the photo as failed and is not retried.
///
/// # Errors
///
/// - `ResourceNotFound` for an unknown photo or a user without a profile
/// - `PermissionDenied` for another user's photo
/// - `ExternalServiceError` when storage or vision fails
pub async fn analyze_photo(
    resources: &CoachResources,
    identity: Identity,
    photo_id: Uuid,
) -> AppResult<PhotoAnalysisOutcome> {
    let user_id = identity.require_user_to("Please sign in to analyze photos")?;
    let mut photo = owned_photo(resources, user_id, photo_id).await?;

    let image_url = match resources.storage.resolve_url(&photo.storage_id).await {
        Ok(Some(url)) => url,
        Ok(None) => {
            let cause = AppError::external_service("storage", "Could not get image URL");
            return Err(mark_failed(resources, photo, cause).await);
        }
        Err(cause) => return Err(mark_failed(resources, photo, cause).await),
    };

    let payload = match resources.vision.analyze_physique(&image_url).await {
        Ok(payload) => payload,
        Err(cause) => return Err(mark_failed(resources, photo, cause).await),
    };

    let analysis = ProgressPhotoAnalysis::from_untrusted(&payload);
    photo.analysis_status = AnalysisStatus::Complete;
    photo.analysis = Some(analysis.clone());
    resources.database.update_photo(photo.clone()).await?;

    info!(
        user_id = %user_id,
        photo_id = %photo.id,
        overall_score = analysis.overall_score,
        lagging = analysis.lagging_muscles.len(),
        "Progress photo analyzed"
    );

    let priorities = adjust_priorities(resources, user_id, &analysis.lagging_muscles).await?;
    Ok(PhotoAnalysisOutcome { photo, priorities })
}

/// Reset a photo to pending and analyze it again
///
/// # Errors
///
/// Same as [`analyze_photo`]
pub async fn retry_analysis(
    resources: &CoachResources,
    identity: Identity,
    photo_id: Uuid,
) -> AppResult<PhotoAnalysisOutcome> {
    let user_id = identity.require_user_to("Please sign in to analyze photos")?;
    let mut photo = owned_photo(resources, user_id, photo_id).await?;
    photo.analysis_status = AnalysisStatus::Pending;
    photo.analysis = None;
    resources.database.update_photo(photo).await?;
    analyze_photo(resources, identity, photo_id).await
}

async fn split_for(resources: &CoachResources, user_id: Uuid) -> AppResult<u8> {
    resources
        .database
        .get_profile(user_id)
        .await?
        .map(|p| p.training_days_per_week)
        .ok_or_else(|| {
            AppError::new(ErrorCode::ResourceNotFound, "User profile not found")
                .with_user_id(user_id)
        })
}

async fn write_changes(resources: &CoachResources, changes: &[PriorityChange]) -> AppResult<()> {
    for change in changes {
        resources
            .database
            .set_template_priority(change.entry_id, change.is_priority)
            .await?;
    }
    Ok(())
}

/// Flag exercises that train `lagging_muscles` across the user's split
///
/// Only entries whose flag changes are written.
///
/// # Errors
///
/// Returns `ResourceNotFound` when the user has no profile
pub async fn adjust_priorities(
    resources: &CoachResources,
    user_id: Uuid,
    lagging_muscles: &[String],
) -> AppResult<PriorityUpdate> {
    let total_days = split_for(resources, user_id).await?;
    let entries = resources.database.template_for_split(total_days).await?;
    let names: HashMap<Uuid, String> = resources
        .database
        .list_exercises()
        .await?
        .into_iter()
        .map(|e| (e.id, e.name))
        .collect();

    let plan = plan_priority_changes(&entries, &names, lagging_muscles);
    write_changes(resources, &plan.changes).await?;

    info!(
        user_id = %user_id,
        total_days,
        updated = plan.changes.len(),
        "Training priorities adjusted"
    );
    Ok(PriorityUpdate {
        lagging_muscles: lagging_muscles.to_vec(),
        exercises_prioritized: plan.exercises_prioritized,
        updated_count: plan.changes.len(),
    })
}

/// Clear every priority flag in the caller's split
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers and `ResourceNotFound` without
/// a profile
pub async fn reset_priorities(
    resources: &CoachResources,
    identity: Identity,
) -> AppResult<PriorityUpdate> {
    let user_id = identity.require_user_to("Please sign in to reset priorities")?;
    let total_days = split_for(resources, user_id).await?;
    let entries = resources.database.template_for_split(total_days).await?;
    let changes = plan_priority_reset(&entries);
    write_changes(resources, &changes).await?;

    info!(user_id = %user_id, total_days, "Training priorities reset");
    Ok(PriorityUpdate {
        lagging_muscles: Vec::new(),
        exercises_prioritized: Vec::new(),
        updated_count: changes.len(),
    })
}

/// Catalogue exercises training a muscle group or specific muscle
///
/// # Errors
///
/// Returns an error if the catalogue cannot be read
pub async fn exercises_for_muscle(
    resources: &CoachResources,
    label: &str,
) -> AppResult<Vec<Exercise>> {
    let wanted: HashSet<&str> = exercises_for_muscles(&[label]).into_iter().collect();
    Ok(resources
        .database
        .list_exercises()
        .await?
        .into_iter()
        .filter(|e| wanted.contains(e.name.as_str()))
        .collect())
}
