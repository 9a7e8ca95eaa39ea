// ABOUTME: Integration tests for split templates, workout sessions, set logging and load progression
// ABOUTME: Drives multi-day training histories through the workout service with shifted clocks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors
#![allow(clippy::unwrap_used, clippy::float_cmp)]

mod common;

use common::{at_day, days_later, new_user, seeded_resources, user_with_profile};
use macrocoach::auth::Identity;
use macrocoach::database_plugins::memory::{SESSION_IN_PROGRESS_MESSAGE, SWAP_AFTER_LOGGING_MESSAGE};
use macrocoach::resources::CoachResources;
use macrocoach::services::workouts::{
    self, SessionDetail, SessionExerciseDetail, SetInput, SetUpdate, StartSessionRequest,
};
use macrocoach_core::errors::ErrorCode;
use macrocoach_core::models::{Goal, ProgressionAction, SessionStatus};

const LEGS_DAY: u8 = 3;

fn legs() -> StartSessionRequest {
    StartSessionRequest {
        day_index: LEGS_DAY,
        is_deload: false,
    }
}

fn set(set_number: u32, weight: f64, reps: u32, rpe: f64) -> SetInput {
    SetInput {
        set_number,
        weight,
        reps,
        rpe: Some(rpe),
        pain_flag: false,
    }
}

fn squat(detail: &SessionDetail) -> &SessionExerciseDetail {
    detail
        .exercises
        .iter()
        .find(|e| e.exercise.exercise_name == "Barbell Squat")
        .unwrap()
}

/// Start a legs session on `day`, log four squat sets and finish it
async fn squat_session(
    resources: &CoachResources,
    identity: Identity,
    day: i64,
    weight: f64,
    reps: u32,
    rpe: f64,
) -> SessionDetail {
    let resources = at_day(resources, days_later(day));
    let detail = workouts::start_session(&resources, identity, legs())
        .await
        .unwrap();
    let squat_id = squat(&detail).exercise.id;
    for number in 1..=4 {
        workouts::log_set(&resources, identity, squat_id, set(number, weight, reps, rpe))
            .await
            .unwrap();
    }
    workouts::finish_session(&resources, identity, detail.session.id)
        .await
        .unwrap();
    detail
}

#[tokio::test]
async fn test_weekly_plan_follows_profile_split() {
    let resources = seeded_resources().await;
    let (identity, _) = user_with_profile(&resources, 4, Goal::Cut).await;

    let plan = workouts::weekly_plan(&resources, identity)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(plan.total_days, 4);
    let names: Vec<&str> = plan.days.iter().map(|d| d.day_name.as_str()).collect();
    assert_eq!(names, ["Upper A", "Lower A", "Upper B", "Lower B"]);
    assert_eq!(plan.days[0].formatted_name, "Day 1 - Upper A - Mar 14, 2025");
    assert_eq!(plan.days[1].date, days_later(1));
    assert_eq!(plan.priority_count, 0);

    let sequences: Vec<u32> = plan.days[0]
        .exercises
        .iter()
        .map(|e| e.entry.sequence)
        .collect();
    assert_eq!(sequences, (1..=7).collect::<Vec<_>>());

    assert!(workouts::weekly_plan(&resources, new_user())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_first_session_has_no_history() {
    let resources = seeded_resources().await;
    let (identity, _) = user_with_profile(&resources, 5, Goal::Maintain).await;

    let detail = workouts::start_session(&resources, identity, legs())
        .await
        .unwrap();
    assert_eq!(detail.session.day_name, "Day 3 - Legs - Mar 14, 2025");
    assert_eq!(detail.session.status, SessionStatus::InProgress);
    assert_eq!(detail.exercises.len(), 6);
    for exercise in &detail.exercises {
        assert_eq!(exercise.exercise.recommended_weight, None);
        assert_eq!(exercise.exercise.action, ProgressionAction::Hold);
        assert_eq!(exercise.exercise.reason, "No history - pick your starting weight");
    }

    let active = workouts::active_session(&resources, identity)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.id, detail.session.id);
}

#[tokio::test]
async fn test_only_one_session_in_progress() {
    let resources = seeded_resources().await;
    let (identity, _) = user_with_profile(&resources, 5, Goal::Maintain).await;

    let first = workouts::start_session(&resources, identity, legs())
        .await
        .unwrap();
    let err = workouts::start_session(
        &resources,
        identity,
        StartSessionRequest {
            day_index: 1,
            is_deload: false,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);
    assert_eq!(err.message, SESSION_IN_PROGRESS_MESSAGE);

    workouts::skip_session(&resources, identity, first.session.id)
        .await
        .unwrap();
    workouts::start_session(&resources, identity, legs())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_in_range_heavy_sets_increase_load() {
    let resources = seeded_resources().await;
    let (identity, _) = user_with_profile(&resources, 5, Goal::Maintain).await;
    squat_session(&resources, identity, 0, 100.0, 8, 7.0).await;

    let next = workouts::start_session(&at_day(&resources, days_later(7)), identity, legs())
        .await
        .unwrap();
    let squat = &squat(&next).exercise;
    assert_eq!(squat.recommended_weight, Some(102.5));
    assert_eq!(squat.action, ProgressionAction::Increase);
    assert_eq!(squat.reason, "All sets in range with good RPE - increasing weight");

    let leg_press = next
        .exercises
        .iter()
        .find(|e| e.exercise.exercise_name == "Leg Press")
        .unwrap();
    assert_eq!(leg_press.exercise.recommended_weight, None);
    assert_eq!(
        leg_press.exercise.reason,
        "No completed sets found - pick your starting weight"
    );
}

#[tokio::test]
async fn test_three_identical_sessions_trigger_micro_progression() {
    let resources = seeded_resources().await;
    let (identity, _) = user_with_profile(&resources, 5, Goal::Maintain).await;
    for week in 0..3 {
        squat_session(&resources, identity, week * 7, 100.0, 8, 8.0).await;
    }

    let next = workouts::start_session(&at_day(&resources, days_later(21)), identity, legs())
        .await
        .unwrap();
    let squat = &squat(&next).exercise;
    assert_eq!(squat.action, ProgressionAction::MicroProgress);
    assert_eq!(squat.recommended_weight, Some(101.25));
    assert_eq!(squat.reason, "Stalled for 3 sessions - micro progression (+1.25kg)");
}

#[tokio::test]
async fn test_pain_reduces_load_and_deload_scales_it() {
    let resources = seeded_resources().await;
    let (identity, _) = user_with_profile(&resources, 5, Goal::Maintain).await;

    let first = workouts::start_session(&resources, identity, legs())
        .await
        .unwrap();
    let squat_id = squat(&first).exercise.id;
    workouts::log_set(&resources, identity, squat_id, set(1, 100.0, 8, 7.0))
        .await
        .unwrap();
    workouts::log_set(
        &resources,
        identity,
        squat_id,
        SetInput {
            pain_flag: true,
            ..set(2, 100.0, 6, 8.0)
        },
    )
    .await
    .unwrap();
    workouts::finish_session(&resources, identity, first.session.id)
        .await
        .unwrap();

    let later = at_day(&resources, days_later(7));
    let deload = workouts::start_session(
        &later,
        identity,
        StartSessionRequest {
            day_index: LEGS_DAY,
            is_deload: true,
        },
    )
    .await
    .unwrap();
    let squat_snapshot = &squat(&deload).exercise;
    assert_eq!(squat_snapshot.action, ProgressionAction::Decrease);
    // 90 kg after the pain reduction, then 60 % rounded to the plate step
    assert_eq!(squat_snapshot.recommended_weight, Some(55.0));
    assert!(deload.session.is_deload);
    workouts::finish_session(&later, identity, deload.session.id)
        .await
        .unwrap();

    // deload sessions do not count as history
    let after = workouts::start_session(&at_day(&resources, days_later(14)), identity, legs())
        .await
        .unwrap();
    assert_eq!(squat(&after).exercise.recommended_weight, Some(90.0));
}

#[tokio::test]
async fn test_set_logging_rules() {
    let resources = seeded_resources().await;
    let (identity, _) = user_with_profile(&resources, 5, Goal::Maintain).await;
    let detail = workouts::start_session(&resources, identity, legs())
        .await
        .unwrap();
    let squat_id = squat(&detail).exercise.id;

    let err = workouts::log_set(&resources, identity, squat_id, set(5, 100.0, 8, 7.0))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);

    let err = workouts::log_set(&resources, identity, squat_id, set(1, 100.0, 8, 11.0))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);

    let logged = workouts::log_set(&resources, identity, squat_id, set(1, 100.0, 8, 7.0))
        .await
        .unwrap();
    let err = workouts::log_set(&resources, identity, squat_id, set(1, 105.0, 6, 8.0))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);
    assert_eq!(err.message, "Set 1 already logged. Use update_set to modify it.");

    let updated = workouts::update_set(
        &resources,
        identity,
        logged.id,
        SetUpdate {
            reps: Some(9),
            ..SetUpdate::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.reps, 9);
    assert_eq!(updated.weight, 100.0);
    assert_eq!(updated.rpe, Some(7.0));

    workouts::finish_session(&resources, identity, detail.session.id)
        .await
        .unwrap();
    let err = workouts::log_set(&resources, identity, squat_id, set(2, 100.0, 8, 7.0))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);
    assert_eq!(err.message, "This session is no longer active");

    let view = workouts::session_detail(&resources, identity, detail.session.id)
        .await
        .unwrap();
    assert_eq!(squat(&view).sets.len(), 1);
    assert_eq!(view.session.status, SessionStatus::Completed);
}

#[tokio::test]
async fn test_swap_only_to_registered_alternative_before_logging() {
    let resources = seeded_resources().await;
    let (identity, _) = user_with_profile(&resources, 5, Goal::Maintain).await;
    let detail = workouts::start_session(&resources, identity, legs())
        .await
        .unwrap();
    let squat_snapshot = squat(&detail).exercise.clone();

    let alternatives = workouts::exercise_alternatives(&resources, squat_snapshot.exercise_id)
        .await
        .unwrap();
    let names: Vec<String> = alternatives
        .iter()
        .filter_map(|a| a.exercise.as_ref().map(|e| e.name.clone()))
        .collect();
    assert_eq!(names, ["Leg Press", "Hack Squat", "Goblet Squat"]);

    let lat_pulldown = resources
        .database
        .find_exercise_by_name("Lat Pulldown")
        .await
        .unwrap()
        .unwrap();
    let err = workouts::swap_exercise(&resources, identity, squat_snapshot.id, lat_pulldown.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let goblet = alternatives[2].alternative.alternative_exercise_id;
    let swapped = workouts::swap_exercise(&resources, identity, squat_snapshot.id, goblet)
        .await
        .unwrap();
    assert_eq!(swapped.id, squat_snapshot.id);
    assert_eq!(swapped.exercise_name, "Goblet Squat");
    assert_eq!(swapped.sequence, squat_snapshot.sequence);
    assert_eq!(swapped.action, ProgressionAction::Hold);
    assert_eq!(swapped.recommended_weight, None);

    let view = workouts::session_detail(&resources, identity, detail.session.id)
        .await
        .unwrap();
    assert_eq!(view.exercises[0].exercise.exercise_name, "Goblet Squat");
}

#[tokio::test]
async fn test_swap_after_logging_is_refused() {
    let resources = seeded_resources().await;
    let (identity, _) = user_with_profile(&resources, 5, Goal::Maintain).await;
    let detail = workouts::start_session(&resources, identity, legs())
        .await
        .unwrap();
    let squat_snapshot = squat(&detail).exercise.clone();
    workouts::log_set(&resources, identity, squat_snapshot.id, set(1, 100.0, 8, 7.0))
        .await
        .unwrap();

    let leg_press = resources
        .database
        .find_exercise_by_name("Leg Press")
        .await
        .unwrap()
        .unwrap();
    let err = workouts::swap_exercise(&resources, identity, squat_snapshot.id, leg_press.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);
    assert_eq!(err.message, SWAP_AFTER_LOGGING_MESSAGE);
}

#[tokio::test]
async fn test_other_users_cannot_touch_a_session() {
    let resources = seeded_resources().await;
    let (owner, _) = user_with_profile(&resources, 5, Goal::Maintain).await;
    let stranger = new_user();
    let detail = workouts::start_session(&resources, owner, legs())
        .await
        .unwrap();
    let squat_id = squat(&detail).exercise.id;

    let err = workouts::log_set(&resources, stranger, squat_id, set(1, 100.0, 8, 7.0))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    let err = workouts::finish_session(&resources, stranger, detail.session.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    let err = workouts::session_detail(&resources, stranger, detail.session.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    let err = workouts::finish_session(&resources, Identity::Anonymous, detail.session.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthRequired);
}

#[tokio::test]
async fn test_closed_sessions_cannot_transition_again() {
    let resources = seeded_resources().await;
    let (identity, _) = user_with_profile(&resources, 5, Goal::Maintain).await;
    let detail = workouts::start_session(&resources, identity, legs())
        .await
        .unwrap();

    let skipped = workouts::skip_session(&resources, identity, detail.session.id)
        .await
        .unwrap();
    assert_eq!(skipped.status, SessionStatus::Skipped);
    assert!(skipped.completed_at.is_some());

    let err = workouts::finish_session(&resources, identity, detail.session.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);
    assert_eq!(err.message, "This session is not in progress");

    assert!(workouts::recent_sessions(&resources, identity, None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_recent_sessions_newest_first() {
    let resources = seeded_resources().await;
    let (identity, _) = user_with_profile(&resources, 5, Goal::Maintain).await;
    let first = squat_session(&resources, identity, 0, 100.0, 8, 7.0).await;
    let second = squat_session(&resources, identity, 2, 102.5, 8, 7.0).await;

    let recent = workouts::recent_sessions(&resources, identity, Some(5))
        .await
        .unwrap();
    let ids: Vec<_> = recent.iter().map(|s| s.id).collect();
    assert_eq!(ids, [second.session.id, first.session.id]);
}

#[tokio::test]
async fn test_missing_template_day_without_profile() {
    let resources = seeded_resources().await;
    let err = workouts::start_session(
        &resources,
        new_user(),
        StartSessionRequest {
            day_index: 6,
            is_deload: false,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert_eq!(err.message, "No template found for day 6 in 5-day split");
}
