// ABOUTME: Strength training models for exercises, split templates, sessions and set logs
// ABOUTME: Session exercises are snapshots of a template entry taken when the session starts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::AppError;

/// Exercise category deciding the progression rules and increment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    /// Low-rep compound lift
    CompoundHeavy,
    /// Higher-rep compound movement
    CompoundPump,
    /// Single-joint movement
    Isolation,
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompoundHeavy => write!(f, "compound_heavy"),
            Self::CompoundPump => write!(f, "compound_pump"),
            Self::Isolation => write!(f, "isolation"),
        }
    }
}

impl FromStr for ExerciseType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compound_heavy" | "heavy" => Ok(Self::CompoundHeavy),
            "compound_pump" | "pump" => Ok(Self::CompoundPump),
            "isolation" | "iso" => Ok(Self::Isolation),
            other => Err(AppError::invalid_input(format!("Unknown exercise type '{other}'"))),
        }
    }
}

/// Catalogue exercise
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exercise {
    /// Exercise identifier
    pub id: Uuid,
    /// Unique display name
    pub name: String,
    /// Coarse muscle group ("Chest", "Back")
    pub muscle_group: String,
    /// Specific muscle code ("chest_upper", "triceps_long_head")
    pub primary_muscle: String,
    /// Progression category
    pub exercise_type: ExerciseType,
    /// Equipment tags
    pub equipment_required: Vec<String>,
}

/// Why an alternative exists
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlternativeReason {
    /// No barbell available
    NoBarbell,
    /// No squat rack available
    NoSquatRack,
    /// No cable station available
    NoCable,
    /// Home gym without machines
    HomeGym,
    /// No pull-up bar available
    NoPullupBar,
}

/// Directed substitution edge, primary to alternative
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseAlternative {
    /// Edge identifier
    pub id: Uuid,
    /// Exercise being replaced
    pub primary_exercise_id: Uuid,
    /// Replacement
    pub alternative_exercise_id: Uuid,
    /// Reason tag
    pub reason: AlternativeReason,
}

/// One exercise slot of a split day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainingTemplateEntry {
    /// Entry identifier
    pub id: Uuid,
    /// Day within the split, 1-based
    pub day_index: u8,
    /// Split length: 3, 4, 5 or 6
    pub total_days: u8,
    /// Day label ("Push", "Upper A")
    pub day_name: String,
    /// Catalogue exercise
    pub exercise_id: Uuid,
    /// Order within the day
    pub sequence: u32,
    /// Working sets
    pub sets_count: u32,
    /// Lower bound of the rep range
    pub target_reps_min: u32,
    /// Upper bound of the rep range
    pub target_reps_max: u32,
    /// Flagged by photo analysis
    pub is_priority: bool,
}

/// Workout session lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Started and accepting sets
    InProgress,
    /// Finished; terminal
    Completed,
    /// Abandoned; terminal
    Skipped,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// A training session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutSession {
    /// Session identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Calendar day
    pub date: NaiveDate,
    /// Day within the split
    pub day_index: u8,
    /// "Day N - Name - Mon D, YYYY"
    pub day_name: String,
    /// Reduced-intensity session
    pub is_deload: bool,
    /// Lifecycle state
    pub status: SessionStatus,
    /// Start timestamp
    pub started_at: DateTime<Utc>,
    /// Set when the session reaches a terminal state
    pub completed_at: Option<DateTime<Utc>>,
}

/// Next-session load decision
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionAction {
    /// Add the type increment
    Increase,
    /// Keep the weight
    #[default]
    Hold,
    /// Reduce the weight
    Decrease,
    /// Add the smallest plate increment to break a stall
    MicroProgress,
}

impl fmt::Display for ProgressionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increase => write!(f, "increase"),
            Self::Hold => write!(f, "hold"),
            Self::Decrease => write!(f, "decrease"),
            Self::MicroProgress => write!(f, "micro_progress"),
        }
    }
}

/// Exercise snapshot inside a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionExercise {
    /// Snapshot identifier
    pub id: Uuid,
    /// Owning session
    pub session_id: Uuid,
    /// Catalogue exercise (changes on swap)
    pub exercise_id: Uuid,
    /// Exercise name at snapshot time
    pub exercise_name: String,
    /// Exercise type at snapshot time
    pub exercise_type: ExerciseType,
    /// Order within the session
    pub sequence: u32,
    /// Working sets
    pub sets_count: u32,
    /// Lower bound of the rep range
    pub target_reps_min: u32,
    /// Upper bound of the rep range
    pub target_reps_max: u32,
    /// Suggested load, absent without history
    pub recommended_weight: Option<f64>,
    /// Suggested action
    pub action: ProgressionAction,
    /// Why the engine chose the action
    pub reason: String,
}

/// One logged set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetLog {
    /// Set identifier
    pub id: Uuid,
    /// Owning session exercise
    pub session_exercise_id: Uuid,
    /// 1-based, unique per session exercise
    pub set_number: u32,
    /// Load
    pub weight: f64,
    /// Completed reps
    pub reps: u32,
    /// Rate of perceived exertion, 1 to 10
    pub rpe: Option<f64>,
    /// Pain reported during the set
    pub pain_flag: bool,
}
