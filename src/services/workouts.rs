// ABOUTME: Workout template, weekly plan and session lifecycle services
// ABOUTME: Starts sessions with per-exercise progression, logs sets and closes sessions atomically
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! Training session entry points.
//!
//! Starting a session snapshots the split day's template together with a
//! progression recommendation per exercise. The snapshot is then mutated
//! independently (swaps, logged sets) until the session is completed or
//! skipped, after which it is immutable.

use crate::auth::{ensure_owner, Identity};
use crate::resources::CoachResources;
use chrono::{Duration, NaiveDate};
use macrocoach_core::constants::limits::{RPE_MAX, RPE_MIN};
use macrocoach_core::constants::queries::RECENT_SESSIONS_LIMIT;
use macrocoach_core::errors::{AppError, AppResult, ErrorCode};
use macrocoach_core::models::{
    Exercise, ExerciseAlternative, ProgressionAction, SessionExercise, SessionStatus, SetLog,
    TrainingTemplateEntry, WorkoutSession,
};
use macrocoach_intelligence::progression::{
    apply_deload, recommend, ExerciseHistory, ProgressionReason, RepRange,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A template entry with its catalogue exercise
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateExercise {
    /// Template slot
    pub entry: TrainingTemplateEntry,
    /// Catalogue exercise, absent if it was removed
    pub exercise: Option<Exercise>,
}

/// One day of the weekly plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannedDay {
    /// 1-based day of the split
    pub day_index: u8,
    /// Template day name, "Day N" when the day has no entries
    pub day_name: String,
    /// "Day N - Name - Mon D, YYYY"
    pub formatted_name: String,
    /// Calendar day, counting from today
    pub date: NaiveDate,
    /// Exercises ordered by sequence
    pub exercises: Vec<TemplateExercise>,
    /// Entries flagged as priority
    pub priority_count: usize,
}

/// The user's split laid out from today
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyPlan {
    /// Days in the split
    pub total_days: u8,
    /// Days in order
    pub days: Vec<PlannedDay>,
    /// Priority entries across the split
    pub priority_count: usize,
}

/// A session snapshot with its logged sets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionExerciseDetail {
    /// Snapshot
    pub exercise: SessionExercise,
    /// Sets ordered by set number
    pub sets: Vec<SetLog>,
}

/// A session with every exercise and set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionDetail {
    /// Session
    pub session: WorkoutSession,
    /// Exercises ordered by sequence
    pub exercises: Vec<SessionExerciseDetail>,
}

/// An alternative edge with its exercise
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlternativeExercise {
    /// Edge
    pub alternative: ExerciseAlternative,
    /// The exercise the edge points to
    pub exercise: Option<Exercise>,
}

/// Options for starting a session
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StartSessionRequest {
    /// 1-based day of the split
    pub day_index: u8,
    /// Run the session at deload loads
    pub is_deload: bool,
}

/// A new set
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SetInput {
    /// 1-based set number
    pub set_number: u32,
    /// Load used
    pub weight: f64,
    /// Reps completed
    pub reps: u32,
    /// Effort, 1 to 10
    pub rpe: Option<f64>,
    /// Pain felt during the set
    #[serde(default)]
    pub pain_flag: bool,
}

/// A partial edit of a logged set
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SetUpdate {
    /// New load
    pub weight: Option<f64>,
    /// New reps
    pub reps: Option<u32>,
    /// New effort
    pub rpe: Option<f64>,
    /// New pain flag
    pub pain_flag: Option<bool>,
}

/// "Day N - Name - Mon D, YYYY"
#[must_use]
pub fn format_session_name(day_index: u8, day_name: &str, date: NaiveDate) -> String {
    format!("Day {day_index} - {day_name} - {}", date.format("%b %-d, %Y"))
}

fn validate_rpe(rpe: Option<f64>) -> AppResult<()> {
    match rpe {
        Some(value) if !(RPE_MIN..=RPE_MAX).contains(&value) => {
            Err(AppError::out_of_range("RPE", RPE_MIN, RPE_MAX))
        }
        _ => Ok(()),
    }
}

fn validate_load(weight: f64) -> AppResult<()> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(AppError::invalid_input("Weight cannot be negative")
            .with_details(serde_json::json!({ "field": "weight" })))
    }
}

async fn with_exercises(
    resources: &CoachResources,
    mut entries: Vec<TrainingTemplateEntry>,
) -> AppResult<Vec<TemplateExercise>> {
    entries.sort_by_key(|e| e.sequence);
    let mut result = Vec::with_capacity(entries.len());
    for entry in entries {
        let exercise = resources.database.get_exercise(entry.exercise_id).await?;
        result.push(TemplateExercise { entry, exercise });
    }
    Ok(result)
}

/// Template of one split day ordered by sequence
///
/// # Errors
///
/// Returns an error if the template cannot be read
pub async fn template_for_day(
    resources: &CoachResources,
    day_index: u8,
    total_days: u8,
) -> AppResult<Vec<TemplateExercise>> {
    let entries = resources
        .database
        .template_for_day(day_index, total_days)
        .await?;
    with_exercises(resources, entries).await
}

/// The caller's split laid out day by day from today
///
/// Returns `None` until a profile exists.
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers
pub async fn weekly_plan(
    resources: &CoachResources,
    identity: Identity,
) -> AppResult<Option<WeeklyPlan>> {
    let user_id = identity.require_user()?;
    let Some(profile) = resources.database.get_profile(user_id).await? else {
        return Ok(None);
    };
    let total_days = profile.training_days_per_week;
    let entries = resources.database.template_for_split(total_days).await?;

    let mut by_day: HashMap<u8, Vec<TrainingTemplateEntry>> = HashMap::new();
    for entry in entries {
        by_day.entry(entry.day_index).or_default().push(entry);
    }

    let today = resources.today();
    let mut days = Vec::with_capacity(usize::from(total_days));
    for day_index in 1..=total_days {
        let exercises =
            with_exercises(resources, by_day.remove(&day_index).unwrap_or_default()).await?;
        let day_name = exercises
            .first()
            .map_or_else(|| format!("Day {day_index}"), |e| e.entry.day_name.clone());
        let date = today + Duration::days(i64::from(day_index) - 1);
        let priority_count = exercises.iter().filter(|e| e.entry.is_priority).count();

        days.push(PlannedDay {
            day_index,
            formatted_name: format_session_name(day_index, &day_name, date),
            day_name,
            date,
            exercises,
            priority_count,
        });
    }

    Ok(Some(WeeklyPlan {
        total_days,
        priority_count: days.iter().map(|d| d.priority_count).sum(),
        days,
    }))
}

/// Set logs per recent session, keyed by exercise, newest session first
struct RecentPerformance {
    sessions: Vec<HashMap<Uuid, Vec<SetLog>>>,
}

impl RecentPerformance {
    async fn load(
        resources: &CoachResources,
        user_id: Uuid,
        day_index: u8,
        limit: usize,
    ) -> AppResult<Self> {
        let recent: Vec<WorkoutSession> = resources
            .database
            .sessions_for_user(user_id)
            .await?
            .into_iter()
            .filter(|s| {
                s.status == SessionStatus::Completed && !s.is_deload && s.day_index == day_index
            })
            .take(limit)
            .collect();

        let mut sessions = Vec::with_capacity(recent.len());
        for session in recent {
            let mut logged = HashMap::new();
            for snapshot in resources.database.session_exercises(session.id).await? {
                let sets = resources.database.set_logs_for(snapshot.id).await?;
                // first snapshot of an exercise wins
                logged.entry(snapshot.exercise_id).or_insert(sets);
            }
            sessions.push(logged);
        }
        Ok(Self { sessions })
    }

    fn history(&self, exercise_id: Uuid) -> ExerciseHistory {
        ExerciseHistory::from_sessions(
            self.sessions
                .iter()
                .map(|logged| logged.get(&exercise_id).cloned()),
        )
    }
}

/// Start a session for a split day
///
/// # Errors
///
/// - `AuthRequired` for anonymous callers
/// - `ResourceNotFound` when the split has no template for the day
/// - `InvalidState` when a session is already in progress
pub async fn start_session(
    resources: &CoachResources,
    identity: Identity,
    request: StartSessionRequest,
) -> AppResult<SessionDetail> {
    let user_id = identity.require_user_to("Please sign in to start a workout")?;
    let total_days = resources
        .database
        .get_profile(user_id)
        .await?
        .map_or(resources.config.default_split_days, |p| {
            p.training_days_per_week
        });

    let template = template_for_day(resources, request.day_index, total_days).await?;
    let Some(first) = template.first() else {
        return Err(AppError::new(
            ErrorCode::ResourceNotFound,
            format!(
                "No template found for day {} in {total_days}-day split",
                request.day_index
            ),
        ));
    };

    let now = resources.clock.now();
    let date = now.date_naive();
    let session = WorkoutSession {
        id: Uuid::new_v4(),
        user_id,
        date,
        day_index: request.day_index,
        day_name: format_session_name(request.day_index, &first.entry.day_name, date),
        is_deload: request.is_deload,
        status: SessionStatus::InProgress,
        started_at: now,
        completed_at: None,
    };

    let progression = &resources.intelligence.progression;
    let recent = RecentPerformance::load(
        resources,
        user_id,
        request.day_index,
        progression.history_sessions,
    )
    .await?;

    let mut exercises = Vec::with_capacity(template.len());
    for TemplateExercise { entry, exercise } in template {
        let Some(exercise) = exercise else {
            warn!(entry_id = %entry.id, "Template entry references a missing exercise");
            continue;
        };
        let recommendation = recommend(
            &recent.history(exercise.id),
            exercise.exercise_type,
            RepRange {
                min: entry.target_reps_min,
                max: entry.target_reps_max,
            },
            progression,
        );
        let recommended_weight = if request.is_deload {
            apply_deload(recommendation.recommended_weight, progression)
        } else {
            recommendation.recommended_weight
        };

        debug!(
            exercise = %exercise.name,
            action = %recommendation.action,
            reason = %recommendation.reason,
            "Progression recommendation"
        );
        exercises.push(SessionExercise {
            id: Uuid::new_v4(),
            session_id: session.id,
            exercise_id: exercise.id,
            exercise_name: exercise.name,
            exercise_type: exercise.exercise_type,
            sequence: entry.sequence,
            sets_count: entry.sets_count,
            target_reps_min: entry.target_reps_min,
            target_reps_max: entry.target_reps_max,
            recommended_weight,
            action: recommendation.action,
            reason: recommendation.reason.to_string(),
        });
    }

    resources
        .database
        .create_session(session.clone(), exercises.clone())
        .await
        .map_err(|e| e.with_user_id(user_id))?;

    info!(
        user_id = %user_id,
        session_id = %session.id,
        day_index = session.day_index,
        is_deload = session.is_deload,
        exercises = exercises.len(),
        "Workout session started"
    );
    Ok(SessionDetail {
        session,
        exercises: exercises
            .into_iter()
            .map(|exercise| SessionExerciseDetail {
                exercise,
                sets: Vec::new(),
            })
            .collect(),
    })
}

/// Load a snapshot and its session, checking ownership and that it is active
async fn active_snapshot(
    resources: &CoachResources,
    user_id: Uuid,
    session_exercise_id: Uuid,
    permission_message: &str,
) -> AppResult<SessionExercise> {
    let snapshot = resources
        .database
        .get_session_exercise(session_exercise_id)
        .await?
        .ok_or_else(|| {
            AppError::new(
                ErrorCode::ResourceNotFound,
                "Exercise not found in this session",
            )
            .with_resource_id(session_exercise_id.to_string())
        })?;
    let session = resources
        .database
        .get_session(snapshot.session_id)
        .await?
        .ok_or_else(|| AppError::permission_denied(permission_message))?;
    ensure_owner(session.user_id, user_id, permission_message)?;
    if session.status != SessionStatus::InProgress {
        return Err(AppError::invalid_state("This session is no longer active")
            .with_resource_id(session.id.to_string()));
    }
    Ok(snapshot)
}

/// Replace an exercise with one of its registered alternatives
///
/// Only allowed while the session is in progress and before any set is
/// logged against the exercise. The recommendation resets to hold with no load.
///
/// # Errors
///
/// Returns `ResourceNotFound`, `PermissionDenied`, `InvalidState` or
/// `InvalidInput` naming the failed condition
pub async fn swap_exercise(
    resources: &CoachResources,
    identity: Identity,
    session_exercise_id: Uuid,
    new_exercise_id: Uuid,
) -> AppResult<SessionExercise> {
    let user_id = identity.require_user_to("Please sign in to swap exercises")?;
    let snapshot = active_snapshot(
        resources,
        user_id,
        session_exercise_id,
        "You don't have permission to modify this session",
    )
    .await?;

    let replacement = resources
        .database
        .get_exercise(new_exercise_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::ResourceNotFound, "New exercise not found")
                .with_resource_id(new_exercise_id.to_string())
        })?;

    let is_alternative = resources
        .database
        .alternatives_for(snapshot.exercise_id)
        .await?
        .iter()
        .any(|alt| alt.alternative_exercise_id == new_exercise_id);
    if !is_alternative {
        return Err(AppError::invalid_input(
            "This exercise is not a valid alternative",
        ));
    }

    let swapped = SessionExercise {
        exercise_id: replacement.id,
        exercise_name: replacement.name,
        exercise_type: replacement.exercise_type,
        recommended_weight: None,
        action: ProgressionAction::Hold,
        reason: ProgressionReason::NoHistory.to_string(),
        ..snapshot
    };
    resources
        .database
        .replace_unlogged_session_exercise(swapped.clone())
        .await?;

    info!(
        user_id = %user_id,
        session_exercise_id = %session_exercise_id,
        exercise = %swapped.exercise_name,
        "Exercise swapped"
    );
    Ok(swapped)
}

/// Log one set of an exercise in an active session
///
/// # Errors
///
/// - `ValueOutOfRange` for a set number outside the prescribed sets or an
///   RPE outside 1 to 10
/// - `InvalidState` when the session is not active or the set number is
///   already logged
pub async fn log_set(
    resources: &CoachResources,
    identity: Identity,
    session_exercise_id: Uuid,
    input: SetInput,
) -> AppResult<SetLog> {
    let user_id = identity.require_user_to("Please sign in to log sets")?;
    let snapshot = active_snapshot(
        resources,
        user_id,
        session_exercise_id,
        "You don't have permission to log sets for this session",
    )
    .await?;

    if !(1..=snapshot.sets_count).contains(&input.set_number) {
        return Err(AppError::out_of_range("Set number", 1, snapshot.sets_count));
    }
    validate_rpe(input.rpe)?;
    validate_load(input.weight)?;

    let set = SetLog {
        id: Uuid::new_v4(),
        session_exercise_id,
        set_number: input.set_number,
        weight: input.weight,
        reps: input.reps,
        rpe: input.rpe,
        pain_flag: input.pain_flag,
    };
    resources.database.insert_set_log(set.clone()).await?;

    debug!(
        user_id = %user_id,
        exercise = %snapshot.exercise_name,
        set_number = set.set_number,
        weight = set.weight,
        reps = set.reps,
        pain = set.pain_flag,
        "Set logged"
    );
    Ok(set)
}

/// Edit fields of a logged set
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown set, `PermissionDenied` for
/// another user's set and `ValueOutOfRange` for a bad RPE
pub async fn update_set(
    resources: &CoachResources,
    identity: Identity,
    set_id: Uuid,
    update: SetUpdate,
) -> AppResult<SetLog> {
    let user_id = identity.require_user_to("Please sign in to update sets")?;
    let set = resources
        .database
        .get_set_log(set_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::ResourceNotFound, "Set not found")
                .with_resource_id(set_id.to_string())
        })?;
    let snapshot = resources
        .database
        .get_session_exercise(set.session_exercise_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ResourceNotFound, "Exercise not found"))?;

    let permission_message = "You don't have permission to update this set";
    let session = resources
        .database
        .get_session(snapshot.session_id)
        .await?
        .ok_or_else(|| AppError::permission_denied(permission_message))?;
    ensure_owner(session.user_id, user_id, permission_message)?;

    validate_rpe(update.rpe)?;
    if let Some(weight) = update.weight {
        validate_load(weight)?;
    }

    let updated = SetLog {
        weight: update.weight.unwrap_or(set.weight),
        reps: update.reps.unwrap_or(set.reps),
        rpe: update.rpe.or(set.rpe),
        pain_flag: update.pain_flag.unwrap_or(set.pain_flag),
        ..set
    };
    resources.database.update_set_log(updated.clone()).await?;
    Ok(updated)
}

async fn close_session(
    resources: &CoachResources,
    user_id: Uuid,
    session_id: Uuid,
    to: SessionStatus,
    verb: &str,
) -> AppResult<WorkoutSession> {
    let session = resources
        .database
        .get_session(session_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::ResourceNotFound, "Session not found")
                .with_resource_id(session_id.to_string())
        })?;
    ensure_owner(
        session.user_id,
        user_id,
        &format!("You don't have permission to {verb} this session"),
    )?;

    let closed = resources
        .database
        .transition_session(session_id, SessionStatus::InProgress, to, resources.clock.now())
        .await?;
    info!(user_id = %user_id, session_id = %session_id, status = %closed.status, "Workout session closed");
    Ok(closed)
}

/// Mark an in-progress session as completed
///
/// # Errors
///
/// Returns `ResourceNotFound`, `PermissionDenied`, or `InvalidState` when the
/// session is not in progress
pub async fn finish_session(
    resources: &CoachResources,
    identity: Identity,
    session_id: Uuid,
) -> AppResult<WorkoutSession> {
    let user_id = identity.require_user_to("Please sign in to finish a workout")?;
    close_session(resources, user_id, session_id, SessionStatus::Completed, "finish").await
}

/// Mark an in-progress session as skipped
///
/// # Errors
///
/// Returns `ResourceNotFound`, `PermissionDenied`, or `InvalidState` when the
/// session is not in progress
pub async fn skip_session(
    resources: &CoachResources,
    identity: Identity,
    session_id: Uuid,
) -> AppResult<WorkoutSession> {
    let user_id = identity.require_user_to("Please sign in to skip a workout")?;
    close_session(resources, user_id, session_id, SessionStatus::Skipped, "skip").await
}

/// The caller's in-progress session, if any
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers
pub async fn active_session(
    resources: &CoachResources,
    identity: Identity,
) -> AppResult<Option<WorkoutSession>> {
    let user_id = identity.require_user()?;
    resources.database.in_progress_session(user_id).await
}

/// A session with its exercises by sequence and sets by set number
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown session and `PermissionDenied`
/// for another user's session
pub async fn session_detail(
    resources: &CoachResources,
    identity: Identity,
    session_id: Uuid,
) -> AppResult<SessionDetail> {
    let user_id = identity.require_user()?;
    let session = resources
        .database
        .get_session(session_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::ResourceNotFound, "Session not found")
                .with_resource_id(session_id.to_string())
        })?;
    ensure_owner(
        session.user_id,
        user_id,
        "You don't have permission to view this session",
    )?;

    let mut snapshots = resources.database.session_exercises(session_id).await?;
    snapshots.sort_by_key(|e| e.sequence);

    let mut exercises = Vec::with_capacity(snapshots.len());
    for exercise in snapshots {
        let mut sets = resources.database.set_logs_for(exercise.id).await?;
        sets.sort_by_key(|s| s.set_number);
        exercises.push(SessionExerciseDetail { exercise, sets });
    }
    Ok(SessionDetail { session, exercises })
}

/// The caller's most recent completed sessions, newest first
///
/// # Errors
///
/// Returns `AuthRequired` for anonymous callers
pub async fn recent_sessions(
    resources: &CoachResources,
    identity: Identity,
    limit: Option<usize>,
) -> AppResult<Vec<WorkoutSession>> {
    let user_id = identity.require_user()?;
    Ok(resources
        .database
        .sessions_for_user(user_id)
        .await?
        .into_iter()
        .filter(|s| s.status == SessionStatus::Completed)
        .take(limit.unwrap_or(RECENT_SESSIONS_LIMIT))
        .collect())
}

/// Registered alternatives of an exercise
///
/// # Errors
///
/// Returns an error if the catalogue cannot be read
pub async fn exercise_alternatives(
    resources: &CoachResources,
    exercise_id: Uuid,
) -> AppResult<Vec<AlternativeExercise>> {
    let edges = resources.database.alternatives_for(exercise_id).await?;
    let mut result = Vec::with_capacity(edges.len());
    for alternative in edges {
        let exercise = resources
            .database
            .get_exercise(alternative.alternative_exercise_id)
            .await?;
        result.push(AlternativeExercise {
            alternative,
            exercise,
        });
    }
    Ok(result)
}
