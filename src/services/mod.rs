// ABOUTME: Service layer entry points for every mutation and query of the coach
// ABOUTME: Each function gates on identity, calls the engine and persists through the provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! # Services
//!
//! Thin async orchestration over the pure engine in `macrocoach_intelligence`.
//! Every entry point takes the shared [`CoachResources`](crate::resources::CoachResources)
//! and the caller's [`Identity`](crate::auth::Identity).

/// Personal custom food library
pub mod custom_foods;
/// AI meal estimates
pub mod food_estimates;
/// Food diary entries and daily/weekly totals
pub mod food_logs;
/// Meal plan generation
pub mod meal_plans;
/// Pantry and food catalogue
pub mod pantry;
/// Progress photos and training priorities
pub mod photos;
/// Profile setup
pub mod profiles;
/// Weight logs, trends and recalibration
pub mod weight;
/// Templates and workout sessions
pub mod workouts;
