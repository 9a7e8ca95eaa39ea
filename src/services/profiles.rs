// ABOUTME: Profile setup and display services with unit conversion at the boundary
// ABOUTME: Validates body metrics, estimates body fat and stores calculated nutrition targets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

use crate::auth::Identity;
use crate::resources::CoachResources;
use macrocoach_core::constants::limits::{
    HIPS_CM_MAX, HIPS_CM_MIN, NECK_CM_MAX, NECK_CM_MIN, WAIST_CM_MAX, WAIST_CM_MIN,
};
use macrocoach_core::errors::{AppError, AppResult, ErrorCode};
use macrocoach_core::models::{Goal, Profile, Sex, UnitSystem};
use macrocoach_intelligence::algorithms::{
    cm_to_feet_inches, cm_to_inches, estimate_body_fat, feet_inches_to_cm, inches_to_cm,
    kg_to_lbs, lbs_to_kg,
};
use macrocoach_intelligence::nutrition_calculator::{calculate_targets, TargetInputs};
use macrocoach_intelligence::rounding::round_to_tenth;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Message when a service needs a completed profile
pub const PROFILE_REQUIRED_MESSAGE: &str = "Please complete your profile setup first";

/// Height as entered
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "unit", rename_all = "snake_case")]
pub enum HeightInput {
    /// Centimetres
    Centimeters {
        /// Height in cm
        value: f64,
    },
    /// Feet plus inches
    FeetInches {
        /// Whole feet
        feet: f64,
        /// Remaining inches
        inches: f64,
    },
}

impl HeightInput {
    fn to_cm(self) -> f64 {
        match self {
            Self::Centimeters { value } => value,
            Self::FeetInches { feet, inches } => feet_inches_to_cm(feet, inches),
        }
    }
}

/// Profile form in the user's units
///
/// Weight is kilograms for metric and pounds for imperial; girths are
/// centimetres or inches likewise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileInput {
    /// Units used by the numbers below
    pub unit_system: UnitSystem,
    /// Sex
    pub sex: Sex,
    /// Age in years
    pub age: u32,
    /// Height
    pub height: HeightInput,
    /// Body weight
    pub weight: f64,
    /// Waist girth
    pub waist: Option<f64>,
    /// Neck girth
    pub neck: Option<f64>,
    /// Hip girth
    pub hips: Option<f64>,
    /// Training days per week
    pub training_days_per_week: u8,
    /// Goal
    pub goal: Goal,
}

fn girth_to_cm(value: Option<f64>, units: UnitSystem) -> Option<f64> {
    value.map(|v| match units {
        UnitSystem::Metric => v,
        UnitSystem::Imperial => inches_to_cm(v),
    })
}

/// Validate a waist girth in centimetres
///
/// # Errors
///
/// Returns `ValueOutOfRange` outside 40 to 200 cm
pub fn validate_waist_cm(waist_cm: f64) -> AppResult<()> {
    validate_girth("waist_cm", waist_cm, WAIST_CM_MIN, WAIST_CM_MAX)
}

/// Validate a neck girth in centimetres
///
/// # Errors
///
/// Returns `ValueOutOfRange` outside 20 to 60 cm
pub fn validate_neck_cm(neck_cm: f64) -> AppResult<()> {
    validate_girth("neck_cm", neck_cm, NECK_CM_MIN, NECK_CM_MAX)
}

/// Validate a hip girth in centimetres
///
/// # Errors
///
/// Returns `ValueOutOfRange` outside 60 to 200 cm
pub fn validate_hips_cm(hips_cm: f64) -> AppResult<()> {
    validate_girth("hips_cm", hips_cm, HIPS_CM_MIN, HIPS_CM_MAX)
}

fn validate_girth(field: &'static str, value_cm: f64, min: f64, max: f64) -> AppResult<()> {
    if (min..=max).contains(&value_cm) {
        Ok(())
    } else {
        Err(AppError::out_of_range(field, min, max))
    }
}

/// Create or replace the caller's profile and compute their targets
///
/// An existing profile keeps its id.
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers and `ValueOutOfRange` naming
/// the first invalid metric
pub async fn create_profile(
    resources: &CoachResources,
    identity: Identity,
    input: &ProfileInput,
) -> AppResult<Profile> {
    let user_id = identity.require_user_to("Please sign in to set up your profile")?;

    let weight_kg = match input.unit_system {
        UnitSystem::Metric => input.weight,
        UnitSystem::Imperial => lbs_to_kg(input.weight),
    };
    let height_cm = input.height.to_cm();
    let waist_cm = girth_to_cm(input.waist, input.unit_system);
    let neck_cm = girth_to_cm(input.neck, input.unit_system);
    let hips_cm = girth_to_cm(input.hips, input.unit_system);

    let targets = calculate_targets(
        &TargetInputs {
            sex: input.sex,
            weight_kg,
            height_cm,
            age: input.age,
            training_days_per_week: input.training_days_per_week,
            goal: input.goal,
        },
        &resources.intelligence.nutrition,
    )?;
    if let Some(waist) = waist_cm {
        validate_waist_cm(waist)?;
    }
    if let Some(neck) = neck_cm {
        validate_neck_cm(neck)?;
    }
    if let Some(hips) = hips_cm {
        validate_hips_cm(hips)?;
    }

    let estimated_body_fat_percent = match (waist_cm, neck_cm) {
        (Some(waist), Some(neck)) => Some(estimate_body_fat(
            input.sex, waist, neck, height_cm, hips_cm,
        )),
        _ => None,
    };

    let profile = resources
        .database
        .upsert_profile(Profile {
            id: Uuid::new_v4(),
            user_id,
            unit_system: input.unit_system,
            sex: input.sex,
            height_cm,
            current_weight_kg: weight_kg,
            age: input.age,
            waist_cm,
            neck_cm,
            hips_cm,
            estimated_body_fat_percent,
            training_days_per_week: input.training_days_per_week,
            goal: input.goal,
            tdee: targets.tdee,
            kcal_target: targets.kcal_target,
            macros: targets.macros,
            setup_complete: true,
        })
        .await?;

    info!(
        user_id = %user_id,
        goal = %profile.goal,
        tdee = profile.tdee,
        kcal_target = profile.kcal_target,
        "Profile saved"
    );
    Ok(profile)
}

/// The caller's profile, if set up
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers
pub async fn get_profile(
    resources: &CoachResources,
    identity: Identity,
) -> AppResult<Option<Profile>> {
    let user_id = identity.require_user()?;
    resources.database.get_profile(user_id).await
}

/// Load the caller's profile or fail with the setup message
pub(crate) async fn require_profile(
    resources: &CoachResources,
    user_id: Uuid,
) -> AppResult<Profile> {
    resources
        .database
        .get_profile(user_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::ResourceNotFound, PROFILE_REQUIRED_MESSAGE)
                .with_user_id(user_id)
        })
}

/// Height in the user's units
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "unit", rename_all = "snake_case")]
pub enum HeightDisplay {
    /// Centimetres
    Centimeters {
        /// Height in cm
        value: f64,
    },
    /// Feet plus rounded inches
    FeetInches {
        /// Whole feet
        feet: f64,
        /// Rounded inches
        inches: f64,
    },
}

/// Stored metrics converted back to the user's units
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileDisplay {
    /// Units below
    pub unit_system: UnitSystem,
    /// Weight in kg, or lbs to 1 decimal
    pub weight: f64,
    /// "kg" or "lbs"
    pub weight_unit: String,
    /// Height
    pub height: HeightDisplay,
    /// Waist in cm, or inches to 1 decimal
    pub waist: Option<f64>,
    /// Neck in cm, or inches to 1 decimal
    pub neck: Option<f64>,
    /// Hips in cm, or inches to 1 decimal
    pub hips: Option<f64>,
    /// "cm" or "in"
    pub girth_unit: String,
}

/// A profile with its display conversion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileWithUnits {
    /// Stored metric profile
    pub profile: Profile,
    /// Values in the user's units
    pub display: ProfileDisplay,
}

/// Convert stored metric values to the profile's unit system
#[must_use]
pub fn display_in_units(profile: &Profile) -> ProfileDisplay {
    match profile.unit_system {
        UnitSystem::Metric => ProfileDisplay {
            unit_system: UnitSystem::Metric,
            weight: profile.current_weight_kg,
            weight_unit: "kg".into(),
            height: HeightDisplay::Centimeters {
                value: profile.height_cm,
            },
            waist: profile.waist_cm,
            neck: profile.neck_cm,
            hips: profile.hips_cm,
            girth_unit: "cm".into(),
        },
        UnitSystem::Imperial => {
            let height = cm_to_feet_inches(profile.height_cm);
            let inches = |cm: Option<f64>| cm.map(|v| round_to_tenth(cm_to_inches(v)));
            ProfileDisplay {
                unit_system: UnitSystem::Imperial,
                weight: round_to_tenth(kg_to_lbs(profile.current_weight_kg)),
                weight_unit: "lbs".into(),
                height: HeightDisplay::FeetInches {
                    feet: height.feet,
                    inches: height.inches,
                },
                waist: inches(profile.waist_cm),
                neck: inches(profile.neck_cm),
                hips: inches(profile.hips_cm),
                girth_unit: "in".into(),
            }
        }
    }
}

/// The caller's profile together with unit-converted display values
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers
pub async fn get_profile_with_units(
    resources: &CoachResources,
    identity: Identity,
) -> AppResult<Option<ProfileWithUnits>> {
    Ok(get_profile(resources, identity)
        .await?
        .map(|profile| ProfileWithUnits {
            display: display_in_units(&profile),
            profile,
        }))
}
