// ABOUTME: Reference data seeding for the food catalogue, exercises, alternatives and split templates
// ABOUTME: Idempotent; each catalogue is only written when it is empty
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! Reference data seeding.
//!
//! Exercises are inserted first because alternatives and templates refer to
//! them by name. Template sequences are 1-based in declaration order.

use crate::database_plugins::DatabaseProvider;
use macrocoach_core::errors::{AppError, AppResult};
use macrocoach_core::models::{
    AlternativeReason, Exercise, ExerciseAlternative, ExerciseType, FoodGroup, FoodItem,
    TrainingTemplateEntry,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

use ExerciseType::{CompoundHeavy as Heavy, CompoundPump as Pump, Isolation as Iso};

/// (name, muscle group, primary muscle, type, equipment)
type ExerciseRow = (&'static str, &'static str, &'static str, ExerciseType, &'static [&'static str]);

const EXERCISES: &[ExerciseRow] = &[
    // Chest
    ("Flat Barbell Bench Press", "Chest", "chest_mid", Heavy, &["barbell", "bench"]),
    ("Incline Barbell Press", "Chest", "chest_upper", Heavy, &["barbell", "incline_bench"]),
    ("Dumbbell Bench Press", "Chest", "chest_mid", Heavy, &["dumbbells", "bench"]),
    ("Incline Dumbbell Press", "Chest", "chest_upper", Heavy, &["dumbbells", "incline_bench"]),
    ("Incline DB Fly", "Chest", "chest_upper", Pump, &["dumbbells", "incline_bench"]),
    ("Cable Crossover", "Chest", "chest_inner", Pump, &["cable"]),
    ("Weighted Dips", "Triceps", "triceps_all", Pump, &["dip_station", "weight_belt"]),
    ("Machine Chest Press", "Chest", "chest_mid", Pump, &["chest_press_machine"]),
    ("Pec Deck Fly", "Chest", "chest_inner", Iso, &["pec_deck"]),
    // Shoulders
    ("DB Shoulder Press", "Shoulders", "delts_front", Heavy, &["dumbbells"]),
    ("Barbell Overhead Press", "Shoulders", "delts_front", Heavy, &["barbell"]),
    ("Lateral Raises", "Shoulders", "delts_side", Iso, &["dumbbells"]),
    ("Cable Lateral Raises", "Shoulders", "delts_side", Iso, &["cable"]),
    ("Face Pulls", "Rear Delts", "delts_rear", Iso, &["cable"]),
    ("Rear Delt Fly", "Rear Delts", "delts_rear", Iso, &["dumbbells"]),
    ("Machine Shoulder Press", "Shoulders", "delts_front", Pump, &["shoulder_press_machine"]),
    // Back
    ("Lat Pulldown", "Back", "lats", Pump, &["cable"]),
    ("Pullups", "Back", "lats", Pump, &["pullup_bar"]),
    ("Seated Cable Row", "Back", "mid_back", Pump, &["cable"]),
    ("Single Arm DB Row", "Back", "lats", Pump, &["dumbbells", "bench"]),
    ("Barbell Row", "Back", "mid_back", Heavy, &["barbell"]),
    ("Deadlift", "Back", "lower_back", Heavy, &["barbell"]),
    ("T-Bar Row", "Back", "mid_back", Heavy, &["t_bar", "barbell"]),
    ("Machine Row", "Back", "mid_back", Pump, &["row_machine"]),
    // Arms
    ("Barbell Curl", "Biceps", "biceps", Iso, &["barbell"]),
    ("Dumbbell Curl", "Biceps", "biceps", Iso, &["dumbbells"]),
    ("Hammer Curl", "Biceps", "brachialis", Iso, &["dumbbells"]),
    ("Preacher Curl", "Biceps", "biceps_short_head", Iso, &["preacher_bench", "barbell"]),
    ("Cable Curl", "Biceps", "biceps", Iso, &["cable"]),
    ("Tricep Pushdown", "Triceps", "triceps_lateral", Iso, &["cable"]),
    ("Overhead Tricep Extension", "Triceps", "triceps_long_head", Iso, &["cable"]),
    ("Skull Crushers", "Triceps", "triceps_all", Iso, &["barbell", "bench"]),
    ("Dumbbell Tricep Extension", "Triceps", "triceps_long_head", Iso, &["dumbbells"]),
    // Legs
    ("Barbell Squat", "Quads", "quads", Heavy, &["barbell", "squat_rack"]),
    ("Leg Press", "Quads", "quads", Pump, &["leg_press"]),
    ("Hack Squat", "Quads", "quads", Heavy, &["hack_squat"]),
    ("Goblet Squat", "Quads", "quads", Pump, &["dumbbells"]),
    ("Leg Extension", "Quads", "quads", Iso, &["leg_extension"]),
    ("Romanian Deadlift", "Hamstrings", "hamstrings", Heavy, &["barbell"]),
    ("Dumbbell RDL", "Hamstrings", "hamstrings", Heavy, &["dumbbells"]),
    ("Leg Curl", "Hamstrings", "hamstrings", Iso, &["leg_curl_machine"]),
    ("Bulgarian Split Squat", "Quads", "quads", Pump, &["dumbbells", "bench"]),
    ("Walking Lunges", "Quads", "quads", Pump, &["dumbbells"]),
    ("Hip Thrust", "Glutes", "glutes", Heavy, &["barbell", "bench"]),
    ("Calf Raises", "Calves", "calves", Iso, &["calf_raise_machine"]),
    ("Seated Calf Raises", "Calves", "calves_soleus", Iso, &["seated_calf_machine"]),
    // Core
    ("Cable Crunch", "Abs", "abs", Iso, &["cable"]),
    ("Hanging Leg Raise", "Abs", "abs_lower", Iso, &["pullup_bar"]),
    ("Ab Wheel Rollout", "Abs", "abs", Iso, &["ab_wheel"]),
];

use AlternativeReason::{HomeGym, NoBarbell, NoCable, NoPullupBar, NoSquatRack};

const ALTERNATIVES: &[(&str, &str, AlternativeReason)] = &[
    ("Flat Barbell Bench Press", "Dumbbell Bench Press", NoBarbell),
    ("Incline Barbell Press", "Incline Dumbbell Press", NoBarbell),
    ("Barbell Overhead Press", "DB Shoulder Press", NoBarbell),
    ("Barbell Row", "Single Arm DB Row", NoBarbell),
    ("Barbell Curl", "Dumbbell Curl", NoBarbell),
    ("Romanian Deadlift", "Dumbbell RDL", NoBarbell),
    ("Skull Crushers", "Dumbbell Tricep Extension", NoBarbell),
    ("Barbell Squat", "Leg Press", NoSquatRack),
    ("Barbell Squat", "Hack Squat", NoSquatRack),
    ("Barbell Squat", "Goblet Squat", NoSquatRack),
    ("Lat Pulldown", "Pullups", NoCable),
    ("Seated Cable Row", "Single Arm DB Row", NoCable),
    ("Seated Cable Row", "Machine Row", NoCable),
    ("Cable Crossover", "Incline DB Fly", NoCable),
    ("Cable Crossover", "Pec Deck Fly", NoCable),
    ("Face Pulls", "Rear Delt Fly", NoCable),
    ("Tricep Pushdown", "Dumbbell Tricep Extension", NoCable),
    ("Overhead Tricep Extension", "Dumbbell Tricep Extension", NoCable),
    ("Cable Curl", "Dumbbell Curl", NoCable),
    ("Cable Lateral Raises", "Lateral Raises", NoCable),
    ("Cable Crunch", "Hanging Leg Raise", NoCable),
    ("Leg Press", "Bulgarian Split Squat", HomeGym),
    ("Leg Extension", "Walking Lunges", HomeGym),
    ("Leg Curl", "Dumbbell RDL", HomeGym),
    ("Machine Chest Press", "Dumbbell Bench Press", HomeGym),
    ("Machine Shoulder Press", "DB Shoulder Press", HomeGym),
    ("Machine Row", "Single Arm DB Row", HomeGym),
    ("Pullups", "Single Arm DB Row", NoPullupBar),
];

/// One split day: (day index, total days, name, [(exercise, sets, reps min, reps max)])
type DayTemplate = (u8, u8, &'static str, &'static [(&'static str, u32, u32, u32)]);

const TEMPLATES: &[DayTemplate] = &[
    // 3-day full body
    (1, 3, "Full Body A", &[
        ("Barbell Squat", 4, 6, 10),
        ("Flat Barbell Bench Press", 4, 6, 10),
        ("Barbell Row", 4, 8, 12),
        ("DB Shoulder Press", 3, 8, 12),
        ("Barbell Curl", 3, 10, 15),
        ("Tricep Pushdown", 3, 10, 15),
    ]),
    (2, 3, "Full Body B", &[
        ("Deadlift", 4, 5, 8),
        ("Incline Dumbbell Press", 4, 8, 12),
        ("Lat Pulldown", 4, 8, 12),
        ("Lateral Raises", 3, 12, 20),
        ("Leg Curl", 3, 10, 15),
        ("Calf Raises", 3, 12, 20),
    ]),
    (3, 3, "Full Body C", &[
        ("Leg Press", 4, 10, 15),
        ("Dumbbell Bench Press", 4, 8, 12),
        ("Seated Cable Row", 4, 8, 12),
        ("Face Pulls", 3, 12, 20),
        ("Hammer Curl", 3, 10, 15),
        ("Overhead Tricep Extension", 3, 10, 15),
    ]),
    // 4-day upper/lower
    (1, 4, "Upper A", &[
        ("Flat Barbell Bench Press", 4, 6, 10),
        ("Barbell Row", 4, 6, 10),
        ("DB Shoulder Press", 3, 8, 12),
        ("Lat Pulldown", 3, 8, 12),
        ("Incline DB Fly", 3, 10, 15),
        ("Barbell Curl", 3, 10, 15),
        ("Tricep Pushdown", 3, 10, 15),
    ]),
    (2, 4, "Lower A", &[
        ("Barbell Squat", 4, 6, 10),
        ("Romanian Deadlift", 4, 8, 12),
        ("Leg Press", 3, 10, 15),
        ("Leg Curl", 3, 10, 15),
        ("Calf Raises", 4, 12, 20),
        ("Cable Crunch", 3, 12, 20),
    ]),
    (3, 4, "Upper B", &[
        ("Barbell Row", 4, 6, 10),
        ("Incline Barbell Press", 4, 8, 12),
        ("Lat Pulldown", 3, 8, 12),
        ("Lateral Raises", 4, 12, 20),
        ("Face Pulls", 3, 12, 20),
        ("Hammer Curl", 3, 10, 15),
        ("Overhead Tricep Extension", 3, 10, 15),
    ]),
    (4, 4, "Lower B", &[
        ("Romanian Deadlift", 4, 6, 10),
        ("Leg Press", 4, 10, 15),
        ("Bulgarian Split Squat", 3, 8, 12),
        ("Leg Curl", 3, 10, 15),
        ("Hip Thrust", 3, 10, 15),
        ("Seated Calf Raises", 4, 12, 20),
    ]),
    // 5-day push/pull/legs + upper/lower
    (1, 5, "Push", &[
        ("Flat Barbell Bench Press", 4, 6, 10),
        ("DB Shoulder Press", 4, 8, 12),
        ("Incline Dumbbell Press", 3, 8, 12),
        ("Lateral Raises", 4, 12, 20),
        ("Cable Crossover", 3, 10, 15),
        ("Tricep Pushdown", 3, 10, 15),
        ("Overhead Tricep Extension", 3, 10, 15),
    ]),
    (2, 5, "Pull", &[
        ("Deadlift", 4, 5, 8),
        ("Lat Pulldown", 4, 8, 12),
        ("Barbell Row", 4, 8, 12),
        ("Seated Cable Row", 3, 10, 15),
        ("Face Pulls", 3, 12, 20),
        ("Barbell Curl", 3, 10, 15),
        ("Hammer Curl", 3, 10, 15),
    ]),
    (3, 5, "Legs", &[
        ("Barbell Squat", 4, 6, 10),
        ("Romanian Deadlift", 4, 8, 12),
        ("Leg Press", 4, 10, 15),
        ("Leg Curl", 3, 10, 15),
        ("Leg Extension", 3, 12, 15),
        ("Calf Raises", 4, 12, 20),
    ]),
    (4, 5, "Upper", &[
        ("Incline Barbell Press", 4, 8, 12),
        ("Pullups", 4, 6, 12),
        ("DB Shoulder Press", 3, 8, 12),
        ("Single Arm DB Row", 3, 8, 12),
        ("Lateral Raises", 3, 12, 20),
        ("Dumbbell Curl", 3, 10, 15),
        ("Weighted Dips", 3, 8, 12),
    ]),
    (5, 5, "Lower", &[
        ("Leg Press", 4, 10, 15),
        ("Romanian Deadlift", 4, 8, 12),
        ("Bulgarian Split Squat", 3, 8, 12),
        ("Leg Curl", 3, 10, 15),
        ("Hip Thrust", 3, 10, 15),
        ("Calf Raises", 4, 12, 20),
        ("Hanging Leg Raise", 3, 10, 15),
    ]),
    // 6-day push/pull/legs twice
    (1, 6, "Push A", &[
        ("Flat Barbell Bench Press", 4, 5, 8),
        ("Barbell Overhead Press", 4, 6, 10),
        ("Incline Dumbbell Press", 3, 8, 12),
        ("Lateral Raises", 4, 12, 20),
        ("Weighted Dips", 3, 8, 12),
        ("Tricep Pushdown", 3, 10, 15),
    ]),
    (2, 6, "Pull A", &[
        ("Deadlift", 4, 4, 6),
        ("Barbell Row", 4, 6, 10),
        ("Lat Pulldown", 4, 8, 12),
        ("Face Pulls", 3, 12, 20),
        ("Barbell Curl", 3, 8, 12),
        ("Hammer Curl", 3, 10, 15),
    ]),
    (3, 6, "Legs A", &[
        ("Barbell Squat", 4, 5, 8),
        ("Romanian Deadlift", 4, 8, 12),
        ("Leg Press", 3, 10, 15),
        ("Leg Extension", 3, 12, 15),
        ("Leg Curl", 3, 10, 15),
        ("Calf Raises", 4, 12, 20),
    ]),
    (4, 6, "Push B", &[
        ("Incline Barbell Press", 4, 8, 12),
        ("DB Shoulder Press", 4, 10, 15),
        ("Cable Crossover", 4, 12, 15),
        ("Lateral Raises", 4, 15, 20),
        ("Incline DB Fly", 3, 12, 15),
        ("Overhead Tricep Extension", 3, 12, 15),
    ]),
    (5, 6, "Pull B", &[
        ("Pullups", 4, 8, 12),
        ("Seated Cable Row", 4, 10, 15),
        ("Single Arm DB Row", 3, 10, 15),
        ("Rear Delt Fly", 4, 12, 20),
        ("Cable Curl", 3, 12, 15),
        ("Preacher Curl", 3, 10, 15),
    ]),
    (6, 6, "Legs B", &[
        ("Romanian Deadlift", 4, 8, 12),
        ("Leg Press", 4, 12, 15),
        ("Bulgarian Split Squat", 3, 10, 15),
        ("Leg Curl", 4, 12, 15),
        ("Hip Thrust", 3, 10, 15),
        ("Seated Calf Raises", 4, 15, 20),
    ]),
];

use FoodGroup::{FatSource, FattierProtein, LeanProtein, StarchyCarb};

/// (name, group, protein, carbs, fat per 100 g)
const FOODS: &[(&str, FoodGroup, f64, f64, f64)] = &[
    ("Chicken Breast", LeanProtein, 31.0, 0.0, 3.6),
    ("Ground Beef 93%", FattierProtein, 26.0, 0.0, 7.0),
    ("Eggs", FattierProtein, 13.0, 1.0, 11.0),
    ("Greek Yogurt", LeanProtein, 10.0, 4.0, 0.7),
    ("Salmon", FattierProtein, 20.0, 0.0, 13.0),
    ("Tuna", LeanProtein, 29.0, 0.0, 1.0),
    ("Rice", StarchyCarb, 7.0, 78.0, 0.6),
    ("Oats", StarchyCarb, 13.0, 66.0, 7.0),
    ("Potatoes", StarchyCarb, 2.0, 17.0, 0.1),
    ("Sweet Potatoes", StarchyCarb, 2.0, 20.0, 0.1),
    ("Pasta", StarchyCarb, 5.0, 75.0, 1.0),
    ("Bread", StarchyCarb, 9.0, 49.0, 3.0),
    ("Banana", StarchyCarb, 1.0, 23.0, 0.3),
    ("Olive Oil", FatSource, 0.0, 0.0, 100.0),
    ("Peanut Butter", FatSource, 25.0, 20.0, 50.0),
    ("Almonds", FatSource, 21.0, 22.0, 49.0),
    ("Avocado", FatSource, 2.0, 9.0, 15.0),
];

/// Rows written per catalogue, zero when it was already populated
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct SeedReport {
    /// Exercises inserted
    pub exercises: usize,
    /// Alternative edges inserted
    pub alternatives: usize,
    /// Template entries inserted
    pub template_entries: usize,
    /// Foods inserted
    pub foods: usize,
}

impl SeedReport {
    /// True when nothing was written
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.exercises == 0 && self.alternatives == 0 && self.template_entries == 0 && self.foods == 0
    }
}

async fn seed_exercises(db: &dyn DatabaseProvider) -> AppResult<usize> {
    if !db.list_exercises().await?.is_empty() {
        return Ok(0);
    }
    for &(name, muscle_group, primary_muscle, exercise_type, equipment) in EXERCISES {
        db.insert_exercise(Exercise {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            muscle_group: muscle_group.to_owned(),
            primary_muscle: primary_muscle.to_owned(),
            exercise_type,
            equipment_required: equipment.iter().map(|&e| e.to_owned()).collect(),
        })
        .await?;
    }
    Ok(EXERCISES.len())
}

async fn exercise_ids(db: &dyn DatabaseProvider) -> AppResult<HashMap<String, Uuid>> {
    Ok(db
        .list_exercises()
        .await?
        .into_iter()
        .map(|e| (e.name, e.id))
        .collect())
}

async fn seed_alternatives(
    db: &dyn DatabaseProvider,
    ids: &HashMap<String, Uuid>,
) -> AppResult<usize> {
    let mut count = 0;
    for &(primary, alternative, reason) in ALTERNATIVES {
        let (Some(&primary_id), Some(&alternative_id)) = (ids.get(primary), ids.get(alternative))
        else {
            warn!(primary, alternative, "Skipping alternative with unknown exercise");
            continue;
        };
        if db
            .alternatives_for(primary_id)
            .await?
            .iter()
            .any(|edge| edge.alternative_exercise_id == alternative_id)
        {
            continue;
        }
        db.insert_alternative(ExerciseAlternative {
            id: Uuid::new_v4(),
            primary_exercise_id: primary_id,
            alternative_exercise_id: alternative_id,
            reason,
        })
        .await?;
        count += 1;
    }
    Ok(count)
}

async fn seed_templates(
    db: &dyn DatabaseProvider,
    ids: &HashMap<String, Uuid>,
) -> AppResult<usize> {
    let mut count = 0;
    for &(day_index, total_days, day_name, slots) in TEMPLATES {
        if !db.template_for_day(day_index, total_days).await?.is_empty() {
            continue;
        }
        for (position, &(exercise, sets_count, reps_min, reps_max)) in slots.iter().enumerate() {
            let exercise_id = *ids.get(exercise).ok_or_else(|| {
                AppError::internal(format!("Exercise not found: {exercise}"))
            })?;
            db.insert_template_entry(TrainingTemplateEntry {
                id: Uuid::new_v4(),
                day_index,
                total_days,
                day_name: day_name.to_owned(),
                exercise_id,
                sequence: position as u32 + 1,
                sets_count,
                target_reps_min: reps_min,
                target_reps_max: reps_max,
                is_priority: false,
            })
            .await?;
            count += 1;
        }
    }
    Ok(count)
}

async fn seed_foods(db: &dyn DatabaseProvider) -> AppResult<usize> {
    if !db.list_foods().await?.is_empty() {
        return Ok(0);
    }
    for &(name, group, protein, carbs, fat) in FOODS {
        db.insert_food(FoodItem {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            group,
            protein_per_100g: protein,
            carbs_per_100g: carbs,
            fat_per_100g: fat,
        })
        .await?;
    }
    Ok(FOODS.len())
}

/// Seed every reference catalogue
///
/// # Errors
///
/// Returns an error if the store fails or a template names an unknown exercise
pub async fn seed_all(db: &dyn DatabaseProvider) -> AppResult<SeedReport> {
    let exercises = seed_exercises(db).await?;
    let ids = exercise_ids(db).await?;
    let report = SeedReport {
        exercises,
        alternatives: seed_alternatives(db, &ids).await?,
        template_entries: seed_templates(db, &ids).await?,
        foods: seed_foods(db).await?,
    };

    if report.is_noop() {
        info!("Reference data already seeded");
    } else {
        info!(
            exercises = report.exercises,
            alternatives = report.alternatives,
            template_entries = report.template_entries,
            foods = report.foods,
            "Reference data seeded"
        );
    }
    Ok(report)
}
