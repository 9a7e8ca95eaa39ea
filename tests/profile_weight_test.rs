// ABOUTME: Integration tests for profile setup, weight logging, trends and target recalibration
// ABOUTME: Exercises the profile and weight services against the seeded in-memory store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors
#![allow(clippy::unwrap_used, clippy::float_cmp)]

mod common;

use common::{days_later, metric_input, new_user, seeded_resources, user_with_profile};
use macrocoach::auth::Identity;
use macrocoach::services::profiles::{self, HeightDisplay, HeightInput, ProfileInput};
use macrocoach::services::weight::{self, WeightInput};
use macrocoach_core::errors::ErrorCode;
use macrocoach_core::models::{Goal, Sex, UnitSystem};
use macrocoach_intelligence::recalibration::RecalibrationReason;

fn weigh_in(day: i64, weight: f64) -> WeightInput {
    WeightInput {
        date: Some(days_later(day)),
        weight,
        waist: None,
    }
}

#[tokio::test]
async fn test_profile_targets_for_four_day_cut() {
    let resources = seeded_resources().await;
    let (_, profile) = user_with_profile(&resources, 4, Goal::Cut).await;

    // BMR 1780 x 1.465 rounds to 2608, minus 500 for the cut
    assert_eq!(profile.tdee, 2608);
    assert_eq!(profile.kcal_target, 2108);
    assert_eq!(profile.macros.protein_g, 168);
    assert_eq!(profile.macros.fat_g, 64);
    assert_eq!(profile.macros.carbs_g, 215);
    assert!(profile.setup_complete);
    assert!(profile.estimated_body_fat_percent.is_none());
}

#[tokio::test]
async fn test_imperial_profile_is_stored_metric_and_displayed_imperial() {
    let resources = seeded_resources().await;
    let identity = new_user();
    let input = ProfileInput {
        unit_system: UnitSystem::Imperial,
        sex: Sex::Male,
        age: 35,
        height: HeightInput::FeetInches {
            feet: 5.0,
            inches: 11.0,
        },
        weight: 180.0,
        waist: Some(34.0),
        neck: Some(15.0),
        hips: None,
        training_days_per_week: 5,
        goal: Goal::Maintain,
    };

    let profile = profiles::create_profile(&resources, identity, &input)
        .await
        .unwrap();
    assert!((profile.height_cm - 180.34).abs() < 0.01);
    assert!((profile.current_weight_kg - 81.646_6).abs() < 0.01);
    assert!(profile.estimated_body_fat_percent.is_some());

    let shown = profiles::get_profile_with_units(&resources, identity)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(shown.display.weight_unit, "lbs");
    assert_eq!(shown.display.weight, 180.0);
    assert_eq!(
        shown.display.height,
        HeightDisplay::FeetInches {
            feet: 5.0,
            inches: 11.0
        }
    );
}

#[tokio::test]
async fn test_profile_rejects_out_of_range_metrics() {
    let resources = seeded_resources().await;

    let mut input = metric_input(4, Goal::Cut);
    input.age = 12;
    let err = profiles::create_profile(&resources, new_user(), &input)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);

    let input = metric_input(7, Goal::Cut);
    let err = profiles::create_profile(&resources, new_user(), &input)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);

    let mut input = metric_input(4, Goal::Cut);
    input.waist = Some(20.0);
    let err = profiles::create_profile(&resources, new_user(), &input)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);
}

#[tokio::test]
async fn test_profile_rejects_implausible_neck_and_hips() {
    let resources = seeded_resources().await;

    let mut input = metric_input(4, Goal::Cut);
    input.waist = Some(85.0);
    input.neck = Some(75.0);
    let err = profiles::create_profile(&resources, new_user(), &input)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    assert_eq!(err.context.details["field"], "neck_cm");

    let mut input = metric_input(4, Goal::Cut);
    input.sex = Sex::Female;
    input.neck = Some(33.0);
    input.hips = Some(250.0);
    let err = profiles::create_profile(&resources, new_user(), &input)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    assert_eq!(err.context.details["field"], "hips_cm");

    // 15 in converts to 38.1 cm before the range check
    let mut input = metric_input(4, Goal::Cut);
    input.unit_system = UnitSystem::Imperial;
    input.height = HeightInput::FeetInches {
        feet: 5.0,
        inches: 11.0,
    };
    input.weight = 180.0;
    input.neck = Some(15.0);
    let profile = profiles::create_profile(&resources, new_user(), &input)
        .await
        .unwrap();
    assert!((profile.neck_cm.unwrap() - 38.1).abs() < 1e-9);
}

#[tokio::test]
async fn test_anonymous_callers_are_rejected() {
    let resources = seeded_resources().await;
    let err = profiles::create_profile(&resources, Identity::Anonymous, &metric_input(4, Goal::Cut))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthRequired);

    let err = weight::log_weight(&resources, Identity::Anonymous, &weigh_in(0, 80.0))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthRequired);
}

#[tokio::test]
async fn test_weight_log_replaces_same_day_and_patches_profile() {
    let resources = seeded_resources().await;
    let (identity, _) = user_with_profile(&resources, 4, Goal::Cut).await;

    weight::log_weight(&resources, identity, &weigh_in(0, 80.4))
        .await
        .unwrap();
    weight::log_weight(&resources, identity, &weigh_in(0, 79.9))
        .await
        .unwrap();

    let logs = weight::weight_logs(&resources, identity, None).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].weight_kg, 79.9);

    let profile = profiles::get_profile(&resources, identity)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.current_weight_kg, 79.9);
}

#[tokio::test]
async fn test_weight_outside_plausible_range_is_rejected() {
    let resources = seeded_resources().await;
    let err = weight::log_weight(&resources, new_user(), &weigh_in(0, 12.0))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    assert_eq!(err.message, "Weight must be between 30-300 kg");
}

#[tokio::test]
async fn test_trend_needs_three_recent_entries() {
    let resources = seeded_resources().await;
    let (identity, _) = user_with_profile(&resources, 4, Goal::Cut).await;
    for (day, weight) in [(-1, 80.0), (0, 79.8)] {
        weight::log_weight(&resources, identity, &weigh_in(day, weight))
            .await
            .unwrap();
    }

    let trend = weight::weight_trend(&resources, identity).await.unwrap();
    assert!(!trend.has_enough_data);
    assert_eq!(trend.entries_count, 2);
    assert!(trend.message.is_some());

    let err = weight::recalculate_targets(&resources, identity)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientData);
}

#[tokio::test]
async fn test_flat_cut_recalibrates_down_and_persists() {
    let resources = seeded_resources().await;
    let (identity, profile) = user_with_profile(&resources, 4, Goal::Cut).await;
    for day in -6..=0 {
        weight::log_weight(&resources, identity, &weigh_in(day, 80.0))
            .await
            .unwrap();
    }

    let result = weight::recalculate_targets(&resources, identity)
        .await
        .unwrap();
    assert_eq!(result.reason, RecalibrationReason::CutFlat);
    assert_eq!(result.previous_kcal, profile.kcal_target);
    assert_eq!(result.new_kcal_target, profile.kcal_target - 100);
    assert_eq!(result.macros.carbs_g, 190);
    assert!(!result.drift_warning);

    let stored = profiles::get_profile(&resources, identity)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.kcal_target, 2008);
    assert_eq!(stored.macros, result.macros);
    assert_eq!(stored.tdee, profile.tdee);
}

#[tokio::test]
async fn test_gaining_on_a_cut_cuts_harder() {
    let resources = seeded_resources().await;
    let (identity, _) = user_with_profile(&resources, 4, Goal::Cut).await;
    for (offset, day) in (-6..=0).enumerate() {
        let weight = 0.1_f64.mul_add(offset as f64, 80.0);
        weight::log_weight(&resources, identity, &weigh_in(day, weight))
            .await
            .unwrap();
    }

    let trend = weight::weight_trend(&resources, identity).await.unwrap();
    assert!(trend.has_enough_data);
    assert_eq!(trend.avg_first_kg, Some(80.1));
    assert_eq!(trend.avg_last_kg, Some(80.5));

    let result = weight::recalculate_targets(&resources, identity)
        .await
        .unwrap();
    assert_eq!(result.reason, RecalibrationReason::CutGaining);
    assert_eq!(result.kcal_adjustment, -150);
}

#[tokio::test]
async fn test_recalculate_without_profile() {
    let resources = seeded_resources().await;
    let err = weight::recalculate_targets(&resources, new_user())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert_eq!(err.message, profiles::PROFILE_REQUIRED_MESSAGE);
}

#[tokio::test]
async fn test_body_composition_in_imperial_units() {
    let resources = seeded_resources().await;
    let identity = new_user();
    let mut input = metric_input(4, Goal::Cut);
    input.unit_system = UnitSystem::Imperial;
    input.height = HeightInput::Centimeters { value: 180.0 };
    input.weight = 176.0;
    input.neck = Some(15.0);
    profiles::create_profile(&resources, identity, &input)
        .await
        .unwrap();

    for (day, lbs, waist) in [(-20, 176.0, 34.0), (-10, 174.0, 33.5), (0, 172.0, 33.0)] {
        weight::log_weight(
            &resources,
            identity,
            &WeightInput {
                date: Some(days_later(day)),
                weight: lbs,
                waist: Some(waist),
            },
        )
        .await
        .unwrap();
    }

    let history = weight::body_composition_trend(&resources, identity, None)
        .await
        .unwrap();
    assert_eq!(history.data_points.len(), 3);
    assert_eq!(history.data_points[0].weight_unit, "lbs");
    assert_eq!(history.data_points[0].weight, 176.0);
    let weight_change = history.weight_trend.unwrap();
    assert_eq!(weight_change.change, -4.0);
    let body_fat = history.body_fat_trend.unwrap();
    assert!(body_fat.change < 0.0);
}
