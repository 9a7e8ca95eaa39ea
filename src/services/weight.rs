// ABOUTME: Weight logging, trend queries and calorie target recalibration services
// ABOUTME: Converts weigh-ins to metric, keeps the profile current and persists recalibrated targets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

use crate::auth::Identity;
use crate::resources::CoachResources;
use crate::services::profiles::{require_profile, validate_waist_cm};
use chrono::{Duration, NaiveDate};
use macrocoach_core::constants::limits::{WEIGHT_KG_MAX, WEIGHT_KG_MIN};
use macrocoach_core::constants::queries::{BODY_COMPOSITION_DAYS, WEIGHT_LOG_DAYS};
use macrocoach_core::errors::{AppError, AppResult, ErrorCode};
use macrocoach_core::models::{Profile, UnitSystem, WeightLogEntry};
use macrocoach_intelligence::algorithms::{estimate_body_fat, inches_to_cm, lbs_to_kg};
use macrocoach_intelligence::recalibration::{recalibrate_from_logs, Recalibration};
use macrocoach_intelligence::weight_trend::{
    body_composition_trend as summarise_composition, weight_trend as summarise_trend,
    BodyCompositionTrend, WeightTrend,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// A weigh-in in the user's units
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightInput {
    /// Day of the weigh-in, today when absent
    pub date: Option<NaiveDate>,
    /// Weight in kg or lbs
    pub weight: f64,
    /// Waist in cm or inches
    pub waist: Option<f64>,
}

/// Validate a body weight in kilograms
///
/// # Errors
///
/// Returns `ValueOutOfRange` outside 30 to 300 kg
pub fn validate_weight_kg(weight_kg: f64) -> AppResult<()> {
    if (WEIGHT_KG_MIN..=WEIGHT_KG_MAX).contains(&weight_kg) {
        Ok(())
    } else {
        Err(AppError::new(
            ErrorCode::ValueOutOfRange,
            "Weight must be between 30-300 kg",
        )
        .with_details(serde_json::json!({
            "field": "weight_kg",
            "min": WEIGHT_KG_MIN.to_string(),
            "max": WEIGHT_KG_MAX.to_string(),
        })))
    }
}

fn body_fat_for(profile: &Profile, waist_cm: f64) -> Option<f64> {
    profile.neck_cm.map(|neck| {
        estimate_body_fat(profile.sex, waist_cm, neck, profile.height_cm, profile.hips_cm)
    })
}

/// Record or replace the weigh-in for a day
///
/// Units follow the caller's profile, metric without one. The profile's
/// current weight and waist are patched to the new values.
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers and `ValueOutOfRange` for an
/// implausible weight or waist
pub async fn log_weight(
    resources: &CoachResources,
    identity: Identity,
    input: &WeightInput,
) -> AppResult<WeightLogEntry> {
    let user_id = identity.require_user_to("Please sign in to log your weight")?;
    let profile = resources.database.get_profile(user_id).await?;
    let units = profile
        .as_ref()
        .map_or(UnitSystem::Metric, |p| p.unit_system);

    let (weight_kg, waist_cm) = match units {
        UnitSystem::Metric => (input.weight, input.waist),
        UnitSystem::Imperial => (lbs_to_kg(input.weight), input.waist.map(inches_to_cm)),
    };
    validate_weight_kg(weight_kg)?;
    if let Some(waist) = waist_cm {
        validate_waist_cm(waist)?;
    }

    let estimated_body_fat_percent = match (&profile, waist_cm) {
        (Some(profile), Some(waist)) => body_fat_for(profile, waist),
        _ => None,
    };

    let entry = resources
        .database
        .upsert_weight_log(WeightLogEntry {
            id: Uuid::new_v4(),
            user_id,
            date: input.date.unwrap_or_else(|| resources.today()),
            weight_kg,
            waist_cm,
            estimated_body_fat_percent,
        })
        .await?;

    if let Some(mut profile) = profile {
        profile.current_weight_kg = weight_kg;
        if waist_cm.is_some() {
            profile.waist_cm = waist_cm;
            profile.estimated_body_fat_percent = estimated_body_fat_percent;
        }
        resources.database.upsert_profile(profile).await?;
    }

    info!(
        user_id = %user_id,
        date = %entry.date,
        weight_kg = entry.weight_kg,
        "Weight logged"
    );
    Ok(entry)
}

async fn logs_since(
    resources: &CoachResources,
    user_id: Uuid,
    days: i64,
) -> AppResult<Vec<WeightLogEntry>> {
    let since = resources.today() - Duration::days(days);
    resources.database.weight_logs_since(user_id, since).await
}

/// Weigh-ins of the last `days` days (30 by default), oldest first
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers
pub async fn weight_logs(
    resources: &CoachResources,
    identity: Identity,
    days: Option<i64>,
) -> AppResult<Vec<WeightLogEntry>> {
    let user_id = identity.require_user()?;
    logs_since(resources, user_id, days.unwrap_or(WEIGHT_LOG_DAYS)).await
}

/// Short-window weight trend
///
/// Too little data is reported through `has_enough_data`, not as an error.
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers
pub async fn weight_trend(resources: &CoachResources, identity: Identity) -> AppResult<WeightTrend> {
    let user_id = identity.require_user()?;
    let config = &resources.intelligence.trend;
    let logs = logs_since(resources, user_id, config.window_days).await?;
    Ok(summarise_trend(&logs, resources.today(), config))
}

/// Weight and body-fat change over `days` days (90 by default)
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers
pub async fn body_composition_trend(
    resources: &CoachResources,
    identity: Identity,
    days: Option<i64>,
) -> AppResult<BodyCompositionTrend> {
    let user_id = identity.require_user()?;
    let days = days.unwrap_or(BODY_COMPOSITION_DAYS);
    let units = resources
        .database
        .get_profile(user_id)
        .await?
        .map_or(UnitSystem::Metric, |p| p.unit_system);
    let logs = logs_since(resources, user_id, days).await?;
    Ok(summarise_composition(&logs, resources.today(), days, units))
}

/// Adjust the calorie target from the last week's weight trend and persist it
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers, `ResourceNotFound` without a
/// profile and `InsufficientData` with fewer than three recent weigh-ins
pub async fn recalculate_targets(
    resources: &CoachResources,
    identity: Identity,
) -> AppResult<Recalibration> {
    let user_id = identity.require_user_to("Please sign in to recalculate targets")?;
    let mut profile = require_profile(resources, user_id).await?;
    let config = &resources.intelligence;
    let logs = logs_since(resources, user_id, config.trend.window_days).await?;

    let recalibration = recalibrate_from_logs(&profile, &logs, resources.today(), config)
        .map_err(|e| e.with_user_id(user_id))?;

    profile.kcal_target = recalibration.new_kcal_target;
    profile.macros = recalibration.macros;
    resources.database.upsert_profile(profile).await?;

    info!(
        user_id = %user_id,
        previous_kcal = recalibration.previous_kcal,
        new_kcal_target = recalibration.new_kcal_target,
        drift_warning = recalibration.drift_warning,
        "Targets recalculated"
    );
    Ok(recalibration)
}
