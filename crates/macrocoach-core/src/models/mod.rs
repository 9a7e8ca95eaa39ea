// ABOUTME: Core data models for the Macrocoach engine
// ABOUTME: Re-exports profile, nutrition, training and AI analysis types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! # Data Models
//!
//! Stored values are always metric (kg, cm). Identifiers are `Uuid`s and
//! calendar days are `NaiveDate`s, so date windows compare chronologically.
//!
//! ## Core Models
//!
//! - `Profile` / `WeightLogEntry`: body metrics and current targets
//! - `FoodItem` / `PantryStock` / `MealPlan`: catalogue, inventory and plans
//! - `FoodLog` / `CustomFood`: food diary and personal food library
//! - `Exercise` / `TrainingTemplateEntry` / `WorkoutSession` / `SetLog`: training
//! - `ProgressPhotoAnalysis` / `MealEstimate`: coerced AI output

mod analysis;
mod food_log;
mod nutrition;
mod profile;
mod training;

// Profile domain
pub use profile::{Goal, Profile, Sex, UnitSystem, WeightLogEntry};

// Nutrition domain
pub use nutrition::{
    FoodGroup, FoodItem, Macro, MacroTargets, MacroTotals, MealPlan, MealPlanItem, PantryStock,
    PlanStatus, PlannedMeal,
};

// Food diary domain
pub use food_log::{
    CustomFood, CustomFoodSource, FoodLog, FoodLogSource, IntakeTotals, LoggedFood, MealType,
};

// Training domain
pub use training::{
    AlternativeReason, Exercise, ExerciseAlternative, ExerciseType, ProgressionAction,
    SessionExercise, SessionStatus, SetLog, TrainingTemplateEntry, WorkoutSession,
};

// AI analysis domain
pub use analysis::{
    AnalysisStatus, Confidence, EstimatedFood, MealEstimate, ProgressPhoto, ProgressPhotoAnalysis,
    SCORE_MAX, SCORE_MIN,
};
