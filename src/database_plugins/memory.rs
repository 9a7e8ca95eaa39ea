// ABOUTME: In-memory DatabaseProvider implementation used by the CLI and tests
// ABOUTME: All tables sit behind one RwLock so guarded check-then-write operations are atomic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

use super::DatabaseProvider;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use macrocoach_core::errors::{AppError, AppResult};
use macrocoach_core::models::{
    CustomFood, Exercise, ExerciseAlternative, FoodItem, FoodLog, MealPlan, PantryStock, Profile,
    ProgressPhoto, SessionExercise, SessionStatus, SetLog, TrainingTemplateEntry,
    WeightLogEntry, WorkoutSession,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Message for a second concurrent session
pub const SESSION_IN_PROGRESS_MESSAGE: &str =
    "You already have a workout in progress. Please finish or skip it first.";

/// Message for a swap after sets were logged
pub const SWAP_AFTER_LOGGING_MESSAGE: &str =
    "Cannot swap exercise after logging sets. Delete sets first or continue with current exercise.";

/// Rows are kept in `Vec`s so every query sees insertion order
#[derive(Debug, Default)]
struct Tables {
    profiles: Vec<Profile>,
    weight_logs: Vec<WeightLogEntry>,
    foods: Vec<FoodItem>,
    pantry: Vec<PantryStock>,
    meal_plans: Vec<MealPlan>,
    food_logs: Vec<FoodLog>,
    custom_foods: Vec<CustomFood>,
    exercises: Vec<Exercise>,
    alternatives: Vec<ExerciseAlternative>,
    templates: Vec<TrainingTemplateEntry>,
    sessions: Vec<WorkoutSession>,
    session_exercises: Vec<SessionExercise>,
    set_logs: Vec<SetLog>,
    photos: Vec<ProgressPhoto>,
}

/// In-memory document store
///
/// Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn session_status_conflict(from: SessionStatus) -> AppError {
    match from {
        SessionStatus::InProgress => AppError::invalid_state("This session is not in progress"),
        other => AppError::invalid_state(format!("This session is not {other}")),
    }
}

#[async_trait]
impl DatabaseProvider for InMemoryDatabase {
    async fn get_profile(&self, user_id: Uuid) -> AppResult<Option<Profile>> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn upsert_profile(&self, mut profile: Profile) -> AppResult<Profile> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables
            .profiles
            .iter_mut()
            .find(|p| p.user_id == profile.user_id)
        {
            profile.id = existing.id;
            existing.clone_from(&profile);
        } else {
            tables.profiles.push(profile.clone());
        }
        Ok(profile)
    }

    async fn upsert_weight_log(&self, mut entry: WeightLogEntry) -> AppResult<WeightLogEntry> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables
            .weight_logs
            .iter_mut()
            .find(|e| e.user_id == entry.user_id && e.date == entry.date)
        {
            entry.id = existing.id;
            existing.clone_from(&entry);
        } else {
            tables.weight_logs.push(entry.clone());
        }
        Ok(entry)
    }

    async fn weight_logs_since(
        &self,
        user_id: Uuid,
        since: NaiveDate,
    ) -> AppResult<Vec<WeightLogEntry>> {
        let tables = self.tables.read().await;
        let mut logs: Vec<WeightLogEntry> = tables
            .weight_logs
            .iter()
            .filter(|e| e.user_id == user_id && e.date >= since)
            .cloned()
            .collect();
        logs.sort_by_key(|e| e.date);
        Ok(logs)
    }

    async fn insert_food(&self, food: FoodItem) -> AppResult<()> {
        self.tables.write().await.foods.push(food);
        Ok(())
    }

    async fn list_foods(&self) -> AppResult<Vec<FoodItem>> {
        Ok(self.tables.read().await.foods.clone())
    }

    async fn get_food(&self, food_id: Uuid) -> AppResult<Option<FoodItem>> {
        let tables = self.tables.read().await;
        Ok(tables.foods.iter().find(|f| f.id == food_id).cloned())
    }

    async fn find_food_by_name(&self, name: &str) -> AppResult<Option<FoodItem>> {
        let tables = self.tables.read().await;
        Ok(tables.foods.iter().find(|f| f.name == name).cloned())
    }

    async fn upsert_pantry_stock(
        &self,
        user_id: Uuid,
        food_id: Uuid,
        grams_available: f64,
    ) -> AppResult<PantryStock> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables
            .pantry
            .iter_mut()
            .find(|s| s.user_id == user_id && s.food_id == food_id)
        {
            existing.grams_available = grams_available;
            return Ok(existing.clone());
        }
        let stock = PantryStock {
            id: Uuid::new_v4(),
            user_id,
            food_id,
            grams_available,
        };
        tables.pantry.push(stock.clone());
        Ok(stock)
    }

    async fn get_pantry_stock(&self, stock_id: Uuid) -> AppResult<Option<PantryStock>> {
        let tables = self.tables.read().await;
        Ok(tables.pantry.iter().find(|s| s.id == stock_id).cloned())
    }

    async fn update_pantry_stock(&self, stock_id: Uuid, grams_available: f64) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let stock = tables
            .pantry
            .iter_mut()
            .find(|s| s.id == stock_id)
            .ok_or_else(|| AppError::not_found("Pantry item"))?;
        stock.grams_available = grams_available;
        Ok(())
    }

    async fn delete_pantry_stock(&self, stock_id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.pantry.len();
        tables.pantry.retain(|s| s.id != stock_id);
        if tables.pantry.len() == before {
            return Err(AppError::not_found("Pantry item"));
        }
        Ok(())
    }

    async fn pantry_for_user(&self, user_id: Uuid) -> AppResult<Vec<PantryStock>> {
        let tables = self.tables.read().await;
        Ok(tables
            .pantry
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn replace_meal_plan(&self, plan: MealPlan) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.meal_plans.len();
        tables
            .meal_plans
            .retain(|p| !(p.user_id == plan.user_id && p.date == plan.date));
        debug!(
            user_id = %plan.user_id,
            date = %plan.date,
            replaced = before - tables.meal_plans.len(),
            "Replacing meal plan"
        );
        tables.meal_plans.push(plan);
        Ok(())
    }

    async fn get_meal_plan(&self, user_id: Uuid, date: NaiveDate) -> AppResult<Option<MealPlan>> {
        let tables = self.tables.read().await;
        Ok(tables
            .meal_plans
            .iter()
            .find(|p| p.user_id == user_id && p.date == date)
            .cloned())
    }

    async fn insert_food_log(&self, log: FoodLog) -> AppResult<()> {
        self.tables.write().await.food_logs.push(log);
        Ok(())
    }

    async fn get_food_log(&self, log_id: Uuid) -> AppResult<Option<FoodLog>> {
        let tables = self.tables.read().await;
        Ok(tables.food_logs.iter().find(|l| l.id == log_id).cloned())
    }

    async fn update_food_log(&self, log: FoodLog) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .food_logs
            .iter_mut()
            .find(|l| l.id == log.id)
            .ok_or_else(|| AppError::not_found("Food log"))?;
        *slot = log;
        Ok(())
    }

    async fn delete_food_log(&self, log_id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.food_logs.len();
        tables.food_logs.retain(|l| l.id != log_id);
        if tables.food_logs.len() == before {
            return Err(AppError::not_found("Food log"));
        }
        Ok(())
    }

    async fn food_logs_between(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<FoodLog>> {
        let tables = self.tables.read().await;
        let mut logs: Vec<FoodLog> = tables
            .food_logs
            .iter()
            .filter(|l| l.user_id == user_id && (from..=to).contains(&l.date))
            .cloned()
            .collect();
        // stable, so insertion order holds within a day
        logs.sort_by_key(|l| l.date);
        Ok(logs)
    }

    async fn upsert_custom_food(&self, mut food: CustomFood) -> AppResult<CustomFood> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables
            .custom_foods
            .iter_mut()
            .find(|f| f.user_id == food.user_id && f.has_name(&food.name))
        {
            food.id = existing.id;
            food.name.clone_from(&existing.name);
            existing.clone_from(&food);
        } else {
            tables.custom_foods.push(food.clone());
        }
        Ok(food)
    }

    async fn get_custom_food(&self, food_id: Uuid) -> AppResult<Option<CustomFood>> {
        let tables = self.tables.read().await;
        Ok(tables.custom_foods.iter().find(|f| f.id == food_id).cloned())
    }

    async fn update_custom_food(&self, food: CustomFood) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .custom_foods
            .iter_mut()
            .find(|f| f.id == food.id)
            .ok_or_else(|| AppError::not_found("Custom food"))?;
        *slot = food;
        Ok(())
    }

    async fn delete_custom_food(&self, food_id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.custom_foods.len();
        tables.custom_foods.retain(|f| f.id != food_id);
        if tables.custom_foods.len() == before {
            return Err(AppError::not_found("Custom food"));
        }
        Ok(())
    }

    async fn custom_foods_for_user(&self, user_id: Uuid) -> AppResult<Vec<CustomFood>> {
        let tables = self.tables.read().await;
        Ok(tables
            .custom_foods
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_exercise(&self, exercise: Exercise) -> AppResult<()> {
        self.tables.write().await.exercises.push(exercise);
        Ok(())
    }

    async fn list_exercises(&self) -> AppResult<Vec<Exercise>> {
        Ok(self.tables.read().await.exercises.clone())
    }

    async fn get_exercise(&self, exercise_id: Uuid) -> AppResult<Option<Exercise>> {
        let tables = self.tables.read().await;
        Ok(tables.exercises.iter().find(|e| e.id == exercise_id).cloned())
    }

    async fn find_exercise_by_name(&self, name: &str) -> AppResult<Option<Exercise>> {
        let tables = self.tables.read().await;
        Ok(tables.exercises.iter().find(|e| e.name == name).cloned())
    }

    async fn insert_alternative(&self, alternative: ExerciseAlternative) -> AppResult<()> {
        self.tables.write().await.alternatives.push(alternative);
        Ok(())
    }

    async fn alternatives_for(&self, exercise_id: Uuid) -> AppResult<Vec<ExerciseAlternative>> {
        let tables = self.tables.read().await;
        Ok(tables
            .alternatives
            .iter()
            .filter(|a| a.primary_exercise_id == exercise_id)
            .cloned()
            .collect())
    }

    async fn insert_template_entry(&self, entry: TrainingTemplateEntry) -> AppResult<()> {
        self.tables.write().await.templates.push(entry);
        Ok(())
    }

    async fn template_for_day(
        &self,
        day_index: u8,
        total_days: u8,
    ) -> AppResult<Vec<TrainingTemplateEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .templates
            .iter()
            .filter(|t| t.day_index == day_index && t.total_days == total_days)
            .cloned()
            .collect())
    }

    async fn template_for_split(&self, total_days: u8) -> AppResult<Vec<TrainingTemplateEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .templates
            .iter()
            .filter(|t| t.total_days == total_days)
            .cloned()
            .collect())
    }

    async fn set_template_priority(&self, entry_id: Uuid, is_priority: bool) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let entry = tables
            .templates
            .iter_mut()
            .find(|t| t.id == entry_id)
            .ok_or_else(|| AppError::not_found("Template entry"))?;
        entry.is_priority = is_priority;
        Ok(())
    }

    async fn create_session(
        &self,
        session: WorkoutSession,
        exercises: Vec<SessionExercise>,
    ) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let busy = tables
            .sessions
            .iter()
            .any(|s| s.user_id == session.user_id && s.status == SessionStatus::InProgress);
        if busy {
            return Err(AppError::invalid_state(SESSION_IN_PROGRESS_MESSAGE)
                .with_user_id(session.user_id));
        }
        tables.sessions.push(session);
        tables.session_exercises.extend(exercises);
        Ok(())
    }

    async fn get_session(&self, session_id: Uuid) -> AppResult<Option<WorkoutSession>> {
        let tables = self.tables.read().await;
        Ok(tables.sessions.iter().find(|s| s.id == session_id).cloned())
    }

    async fn in_progress_session(&self, user_id: Uuid) -> AppResult<Option<WorkoutSession>> {
        let tables = self.tables.read().await;
        Ok(tables
            .sessions
            .iter()
            .find(|s| s.user_id == user_id && s.status == SessionStatus::InProgress)
            .cloned())
    }

    async fn sessions_for_user(&self, user_id: Uuid) -> AppResult<Vec<WorkoutSession>> {
        let tables = self.tables.read().await;
        let mut sessions: Vec<WorkoutSession> = tables
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.started_at.cmp(&a.started_at))
        });
        Ok(sessions)
    }

    async fn transition_session(
        &self,
        session_id: Uuid,
        from: SessionStatus,
        to: SessionStatus,
        at: DateTime<Utc>,
    ) -> AppResult<WorkoutSession> {
        let mut tables = self.tables.write().await;
        let session = tables
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| AppError::not_found("Session"))?;
        if session.status != from {
            return Err(session_status_conflict(from).with_resource_id(session_id.to_string()));
        }
        session.status = to;
        session.completed_at = Some(at);
        Ok(session.clone())
    }

    async fn session_exercises(&self, session_id: Uuid) -> AppResult<Vec<SessionExercise>> {
        let tables = self.tables.read().await;
        Ok(tables
            .session_exercises
            .iter()
            .filter(|e| e.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn get_session_exercise(&self, id: Uuid) -> AppResult<Option<SessionExercise>> {
        let tables = self.tables.read().await;
        Ok(tables.session_exercises.iter().find(|e| e.id == id).cloned())
    }

    async fn replace_unlogged_session_exercise(&self, exercise: SessionExercise) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables
            .set_logs
            .iter()
            .any(|s| s.session_exercise_id == exercise.id)
        {
            return Err(AppError::invalid_state(SWAP_AFTER_LOGGING_MESSAGE)
                .with_resource_id(exercise.id.to_string()));
        }
        let slot = tables
            .session_exercises
            .iter_mut()
            .find(|e| e.id == exercise.id)
            .ok_or_else(|| AppError::not_found("Exercise"))?;
        *slot = exercise;
        Ok(())
    }

    async fn insert_set_log(&self, set: SetLog) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let duplicate = tables.set_logs.iter().any(|s| {
            s.session_exercise_id == set.session_exercise_id && s.set_number == set.set_number
        });
        if duplicate {
            return Err(AppError::invalid_state(format!(
                "Set {} already logged. Use update_set to modify it.",
                set.set_number
            )));
        }
        tables.set_logs.push(set);
        Ok(())
    }

    async fn get_set_log(&self, set_id: Uuid) -> AppResult<Option<SetLog>> {
        let tables = self.tables.read().await;
        Ok(tables.set_logs.iter().find(|s| s.id == set_id).cloned())
    }

    async fn update_set_log(&self, set: SetLog) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .set_logs
            .iter_mut()
            .find(|s| s.id == set.id)
            .ok_or_else(|| AppError::not_found("Set"))?;
        *slot = set;
        Ok(())
    }

    async fn set_logs_for(&self, session_exercise_id: Uuid) -> AppResult<Vec<SetLog>> {
        let tables = self.tables.read().await;
        Ok(tables
            .set_logs
            .iter()
            .filter(|s| s.session_exercise_id == session_exercise_id)
            .cloned()
            .collect())
    }

    async fn insert_photo(&self, photo: ProgressPhoto) -> AppResult<()> {
        self.tables.write().await.photos.push(photo);
        Ok(())
    }

    async fn get_photo(&self, photo_id: Uuid) -> AppResult<Option<ProgressPhoto>> {
        let tables = self.tables.read().await;
        Ok(tables.photos.iter().find(|p| p.id == photo_id).cloned())
    }

    async fn update_photo(&self, photo: ProgressPhoto) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .photos
            .iter_mut()
            .find(|p| p.id == photo.id)
            .ok_or_else(|| AppError::not_found("Photo"))?;
        *slot = photo;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(user_id: Uuid) -> WorkoutSession {
        WorkoutSession {
            id: Uuid::new_v4(),
            user_id,
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            day_index: 1,
            day_name: "Day 1 - Push - Jun 2, 2025".into(),
            is_deload: false,
            status: SessionStatus::InProgress,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    #[tokio::test]
    async fn test_concurrent_session_creation_admits_one() {
        let db = InMemoryDatabase::new();
        let user = Uuid::new_v4();
        let (a, b) = tokio::join!(
            db.create_session(session(user), Vec::new()),
            db.create_session(session(user), Vec::new())
        );
        assert!(a.is_ok() ^ b.is_ok());
        assert_eq!(db.sessions_for_user(user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transition_is_compare_and_set() {
        let db = InMemoryDatabase::new();
        let s = session(Uuid::new_v4());
        let id = s.id;
        db.create_session(s, Vec::new()).await.unwrap();

        db.transition_session(id, SessionStatus::InProgress, SessionStatus::Completed, Utc::now())
            .await
            .unwrap();
        let error = db
            .transition_session(id, SessionStatus::InProgress, SessionStatus::Skipped, Utc::now())
            .await
            .unwrap_err();
        assert_eq!(error.message, "This session is not in progress");
    }

    #[tokio::test]
    async fn test_pantry_upsert_keeps_row() {
        let db = InMemoryDatabase::new();
        let user = Uuid::new_v4();
        let mut stock = db.upsert_pantry_stock(user, Uuid::new_v4(), 100.0).await.unwrap();
        let again = db
            .upsert_pantry_stock(user, stock.food_id, 250.0)
            .await
            .unwrap();
        assert_eq!(again.id, stock.id);
        stock.grams_available = 250.0;
        assert_eq!(db.pantry_for_user(user).await.unwrap(), vec![stock]);
    }

    #[tokio::test]
    async fn test_custom_food_upsert_matches_name_ignoring_case() {
        use macrocoach_core::models::CustomFoodSource;

        let db = InMemoryDatabase::new();
        let user = Uuid::new_v4();
        let food = |name: &str, protein: f64| CustomFood {
            id: Uuid::new_v4(),
            user_id: user,
            name: name.into(),
            protein_per_100g: protein,
            carbs_per_100g: 3.6,
            fat_per_100g: 0.4,
            calories_per_100g: 59.0,
            source: CustomFoodSource::Manual,
        };
        let first = db.upsert_custom_food(food("Greek Yogurt", 10.0)).await.unwrap();
        let second = db.upsert_custom_food(food("GREEK YOGURT", 9.0)).await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.name, "Greek Yogurt");
        let stored = db.custom_foods_for_user(user).await.unwrap();
        assert_eq!(stored, vec![second]);
    }
}
