// ABOUTME: Database abstraction layer for Macrocoach
// ABOUTME: Provider trait with indexed lookups and transactional check-then-write operations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! Persistence contract consumed by the service layer.
//!
//! Queries return rows in insertion order unless a method says otherwise.
//! The meal planner's first-fit picks depend on this for pantry rows.
//!
//! Operations that guard an invariant (one in-progress session per user, one
//! set log per set number, one meal plan per day, swaps only before logging)
//! perform their check and their write as a single atomic step inside the
//! provider, never as a read followed by a separate write in the caller.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use macrocoach_core::errors::AppResult;
use macrocoach_core::models::{
    CustomFood, Exercise, ExerciseAlternative, FoodItem, FoodLog, MealPlan, PantryStock, Profile,
    ProgressPhoto, SessionExercise, SessionStatus, SetLog, TrainingTemplateEntry,
    WeightLogEntry, WorkoutSession,
};
use uuid::Uuid;

/// In-memory provider backed by a single lock
pub mod memory;

pub use memory::InMemoryDatabase;

/// Core database abstraction trait
///
/// All database implementations must implement this trait to provide
/// a consistent interface for the service layer.
#[async_trait]
pub trait DatabaseProvider: Send + Sync {
    // ================================
    // Profiles & Body Metrics
    // ================================

    /// Get the profile owned by a user
    async fn get_profile(&self, user_id: Uuid) -> AppResult<Option<Profile>>;

    /// Insert or replace the user's single profile, keeping an existing id
    async fn upsert_profile(&self, profile: Profile) -> AppResult<Profile>;

    /// Insert or replace the weigh-in for `(user, date)`, keeping an existing id
    async fn upsert_weight_log(&self, entry: WeightLogEntry) -> AppResult<WeightLogEntry>;

    /// Weigh-ins dated on or after `since`, oldest first
    async fn weight_logs_since(
        &self,
        user_id: Uuid,
        since: NaiveDate,
    ) -> AppResult<Vec<WeightLogEntry>>;

    // ================================
    // Food Catalogue & Pantry
    // ================================

    /// Add a catalogue food
    async fn insert_food(&self, food: FoodItem) -> AppResult<()>;

    /// Catalogue in insertion order
    async fn list_foods(&self) -> AppResult<Vec<FoodItem>>;

    /// Get a catalogue food by id
    async fn get_food(&self, food_id: Uuid) -> AppResult<Option<FoodItem>>;

    /// Get a catalogue food by its unique name
    async fn find_food_by_name(&self, name: &str) -> AppResult<Option<FoodItem>>;

    /// Set the stock for `(user, food)`, inserting a row if none exists
    async fn upsert_pantry_stock(
        &self,
        user_id: Uuid,
        food_id: Uuid,
        grams_available: f64,
    ) -> AppResult<PantryStock>;

    /// Get a pantry row by id
    async fn get_pantry_stock(&self, stock_id: Uuid) -> AppResult<Option<PantryStock>>;

    /// Overwrite the grams of an existing pantry row
    async fn update_pantry_stock(&self, stock_id: Uuid, grams_available: f64) -> AppResult<()>;

    /// Delete a pantry row
    async fn delete_pantry_stock(&self, stock_id: Uuid) -> AppResult<()>;

    /// The user's pantry rows in insertion order
    async fn pantry_for_user(&self, user_id: Uuid) -> AppResult<Vec<PantryStock>>;

    // ================================
    // Meal Plans
    // ================================

    /// Atomically drop any plan for `(user, date)` and store this one
    async fn replace_meal_plan(&self, plan: MealPlan) -> AppResult<()>;

    /// Plan for `(user, date)`
    async fn get_meal_plan(&self, user_id: Uuid, date: NaiveDate) -> AppResult<Option<MealPlan>>;

    // ================================
    // Food Diary & Custom Foods
    // ================================

    /// Store a diary entry
    async fn insert_food_log(&self, log: FoodLog) -> AppResult<()>;

    /// Get a diary entry by id
    async fn get_food_log(&self, log_id: Uuid) -> AppResult<Option<FoodLog>>;

    /// Overwrite an existing diary entry
    async fn update_food_log(&self, log: FoodLog) -> AppResult<()>;

    /// Delete a diary entry
    async fn delete_food_log(&self, log_id: Uuid) -> AppResult<()>;

    /// Diary entries dated within `[from, to]`, by date then insertion order
    async fn food_logs_between(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<FoodLog>>;

    /// Store a custom food, or update the user's food with the same name
    ///
    /// Names match ignoring case. A match keeps its id and name and takes
    /// the new densities and source. The match and the write are one atomic
    /// step.
    async fn upsert_custom_food(&self, food: CustomFood) -> AppResult<CustomFood>;

    /// Get a custom food by id
    async fn get_custom_food(&self, food_id: Uuid) -> AppResult<Option<CustomFood>>;

    /// Overwrite an existing custom food
    async fn update_custom_food(&self, food: CustomFood) -> AppResult<()>;

    /// Delete a custom food
    async fn delete_custom_food(&self, food_id: Uuid) -> AppResult<()>;

    /// The user's custom foods in insertion order
    async fn custom_foods_for_user(&self, user_id: Uuid) -> AppResult<Vec<CustomFood>>;

    // ================================
    // Exercise Catalogue & Templates
    // ================================

    /// Add a catalogue exercise
    async fn insert_exercise(&self, exercise: Exercise) -> AppResult<()>;

    /// Catalogue in insertion order
    async fn list_exercises(&self) -> AppResult<Vec<Exercise>>;

    /// Get an exercise by id
    async fn get_exercise(&self, exercise_id: Uuid) -> AppResult<Option<Exercise>>;

    /// Get an exercise by its unique name
    async fn find_exercise_by_name(&self, name: &str) -> AppResult<Option<Exercise>>;

    /// Add a substitution edge
    async fn insert_alternative(&self, alternative: ExerciseAlternative) -> AppResult<()>;

    /// Edges whose primary is `exercise_id`
    async fn alternatives_for(&self, exercise_id: Uuid) -> AppResult<Vec<ExerciseAlternative>>;

    /// Add a template entry
    async fn insert_template_entry(&self, entry: TrainingTemplateEntry) -> AppResult<()>;

    /// Entries of one split day
    async fn template_for_day(
        &self,
        day_index: u8,
        total_days: u8,
    ) -> AppResult<Vec<TrainingTemplateEntry>>;

    /// Every entry of a split
    async fn template_for_split(&self, total_days: u8) -> AppResult<Vec<TrainingTemplateEntry>>;

    /// Patch the priority flag of one entry
    async fn set_template_priority(&self, entry_id: Uuid, is_priority: bool) -> AppResult<()>;

    // ================================
    // Workout Sessions
    // ================================

    /// Store a new in-progress session and its exercise snapshots
    ///
    /// Fails with `InvalidState` when the user already has a session in
    /// progress. The check and the insert are one atomic step.
    async fn create_session(
        &self,
        session: WorkoutSession,
        exercises: Vec<SessionExercise>,
    ) -> AppResult<()>;

    /// Get a session by id
    async fn get_session(&self, session_id: Uuid) -> AppResult<Option<WorkoutSession>>;

    /// The user's in-progress session, if any
    async fn in_progress_session(&self, user_id: Uuid) -> AppResult<Option<WorkoutSession>>;

    /// Every session of a user, newest first by date then start time
    async fn sessions_for_user(&self, user_id: Uuid) -> AppResult<Vec<WorkoutSession>>;

    /// Compare-and-set the status of a session
    ///
    /// Fails with `InvalidState` when the current status is not `from`.
    async fn transition_session(
        &self,
        session_id: Uuid,
        from: SessionStatus,
        to: SessionStatus,
        at: DateTime<Utc>,
    ) -> AppResult<WorkoutSession>;

    /// Exercise snapshots of a session
    async fn session_exercises(&self, session_id: Uuid) -> AppResult<Vec<SessionExercise>>;

    /// Get one exercise snapshot
    async fn get_session_exercise(&self, id: Uuid) -> AppResult<Option<SessionExercise>>;

    /// Replace a snapshot, failing with `InvalidState` if any set is logged against it
    async fn replace_unlogged_session_exercise(&self, exercise: SessionExercise) -> AppResult<()>;

    /// Insert a set log, failing with `InvalidState` on a duplicate set number
    async fn insert_set_log(&self, set: SetLog) -> AppResult<()>;

    /// Get a set log by id
    async fn get_set_log(&self, set_id: Uuid) -> AppResult<Option<SetLog>>;

    /// Overwrite an existing set log
    async fn update_set_log(&self, set: SetLog) -> AppResult<()>;

    /// Set logs of one exercise snapshot in insertion order
    async fn set_logs_for(&self, session_exercise_id: Uuid) -> AppResult<Vec<SetLog>>;

    // ================================
    // Progress Photos
    // ================================

    /// Store a photo record
    async fn insert_photo(&self, photo: ProgressPhoto) -> AppResult<()>;

    /// Get a photo record
    async fn get_photo(&self, photo_id: Uuid) -> AppResult<Option<ProgressPhoto>>;

    /// Overwrite a photo record
    async fn update_photo(&self, photo: ProgressPhoto) -> AppResult<()>;
}
