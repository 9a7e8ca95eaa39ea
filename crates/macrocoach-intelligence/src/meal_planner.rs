// ABOUTME: Greedy pantry-constrained meal plan construction with macro tolerance checks
// ABOUTME: First-fit protein, carb and fat picks per meal over a call-local stock map
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! # Pantry Allocator
//!
//! Builds a day of meals from what the user actually has. For each meal:
//!
//! 1. the first lean protein with more than the protein stock threshold left
//!    (fattier proteins only if no lean one qualifies), sized to the per-meal
//!    protein target
//! 2. the first carb source above the carb threshold, sized to the carbs
//!    still missing from the meal
//! 3. a fat source, only when the meal is short on fat by more than the fat
//!    tolerance
//!
//! Pools are scanned in pantry order and the first item with enough stock
//! wins. This is a fixed heuristic, not an optimiser, and identical input
//! always yields an identical plan.
//!
//! Remaining stock lives in a map owned by a single call and is never shared.

use std::collections::HashMap;

use macrocoach_core::constants::energy::{
    KCAL_PER_GRAM_CARBS, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN,
};
use macrocoach_core::constants::limits::{MEALS_PER_DAY_MAX, MEALS_PER_DAY_MIN};
use macrocoach_core::errors::{AppError, AppResult};
use macrocoach_core::models::{
    FoodGroup, FoodItem, Macro, MacroTotals, MealPlanItem, PlanStatus, PlannedMeal,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::intelligence::MealPlannerConfig;
use crate::rounding::{round_to_int, round_to_tenth};

/// Planning failure messages
pub mod messages {
    /// Pantry has no rows at all
    pub const EMPTY_PANTRY: &str = "Your pantry is empty. Add some food items first.";
    /// Every pantry row is at zero grams
    pub const NO_AVAILABLE_STOCK: &str = "No food items with available quantity in your pantry";
    /// No protein pool items
    pub const NO_PROTEIN: &str = "No protein sources in your pantry. Add chicken, beef, eggs, etc.";
    /// No carb pool items
    pub const NO_CARBS: &str = "No carb sources in your pantry. Add rice, oats, potatoes, etc.";
}

/// A pantry row joined with its catalogue food
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PantryEntry {
    /// Catalogue food
    pub food: FoodItem,
    /// Grams on hand
    pub grams_available: f64,
}

/// Per-meal macro goals in whole grams
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PerMealTargets {
    /// Protein grams
    pub protein: i64,
    /// Carbohydrate grams
    pub carbs: i64,
    /// Fat grams
    pub fat: i64,
}

impl PerMealTargets {
    /// Split daily targets evenly, rounding each macro independently
    ///
    /// The per-meal values need not sum back to the daily totals.
    #[must_use]
    pub fn split(daily: &MacroTotals, meals_per_day: u8) -> Self {
        let meals = f64::from(meals_per_day.max(1));
        Self {
            protein: round_to_int(daily.protein as f64 / meals),
            carbs: round_to_int(daily.carbs as f64 / meals),
            fat: round_to_int(daily.fat as f64 / meals),
        }
    }
}

/// A generated but not yet persisted plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedPlan {
    /// Meals in order, `meal_index` starting at 1
    pub meals: Vec<PlannedMeal>,
    /// Goals each meal was built against
    pub per_meal_targets: PerMealTargets,
    /// Daily targets the plan was checked against
    pub target: MacroTotals,
    /// Totals recomputed from the allocated whole grams
    pub actual: MacroTotals,
    /// Verdict
    pub status: PlanStatus,
    /// Allocation shortfalls followed by tolerance violations
    pub warnings: Vec<String>,
}

impl GeneratedPlan {
    /// Warnings joined for storage, absent when there are none
    #[must_use]
    pub fn warning_text(&self) -> Option<String> {
        if self.warnings.is_empty() {
            None
        } else {
            Some(self.warnings.join("; "))
        }
    }
}

/// Macros of one allocation, each rounded to 1 decimal
#[derive(Debug, Clone, Copy, PartialEq)]
struct ItemMacros {
    protein: f64,
    carbs: f64,
    fat: f64,
}

impl ItemMacros {
    fn for_grams(food: &FoodItem, grams: f64) -> Self {
        let multiplier = grams / 100.0;
        Self {
            protein: round_to_tenth(food.protein_per_100g * multiplier),
            carbs: round_to_tenth(food.carbs_per_100g * multiplier),
            fat: round_to_tenth(food.fat_per_100g * multiplier),
        }
    }
}

fn kcal_for(protein: f64, carbs: f64, fat: f64) -> f64 {
    let protein_kcal = protein * KCAL_PER_GRAM_PROTEIN;
    let carbs_kcal = carbs * KCAL_PER_GRAM_CARBS;
    let fat_kcal = fat * KCAL_PER_GRAM_FAT;
    protein_kcal + carbs_kcal + fat_kcal
}

/// Grams of `food` needed to supply `target_grams` of one macro
///
/// Zero when the food contains none of that macro.
#[must_use]
pub fn grams_for_macro(food: &FoodItem, nutrient: Macro, target_grams: f64) -> f64 {
    let per_100g = food.per_100g(nutrient);
    if per_100g == 0.0 {
        return 0.0;
    }
    (target_grams / per_100g * 100.0).round()
}

/// Pantry rows split by allocation pool, each in pantry order
struct Pools<'a> {
    lean_protein: Vec<&'a PantryEntry>,
    fattier_protein: Vec<&'a PantryEntry>,
    carbs: Vec<&'a PantryEntry>,
    fats: Vec<&'a PantryEntry>,
}

impl<'a> Pools<'a> {
    fn from_entries(entries: &[&'a PantryEntry]) -> Self {
        let of = |group: FoodGroup| {
            entries
                .iter()
                .copied()
                .filter(|entry| entry.food.group == group)
                .collect::<Vec<_>>()
        };
        Self {
            lean_protein: of(FoodGroup::LeanProtein),
            fattier_protein: of(FoodGroup::FattierProtein),
            carbs: of(FoodGroup::StarchyCarb),
            fats: of(FoodGroup::FatSource),
        }
    }
}

/// Allocation state for one `generate_meal_plan` call
struct Allocator {
    remaining: HashMap<Uuid, f64>,
}

impl Allocator {
    fn available(&self, food_id: Uuid) -> f64 {
        self.remaining.get(&food_id).copied().unwrap_or(0.0)
    }

    fn first_with_stock<'a>(&self, pool: &[&'a PantryEntry], min_stock: f64) -> Option<&'a PantryEntry> {
        pool.iter()
            .copied()
            .find(|entry| self.available(entry.food.id) > min_stock)
    }

    /// Allocate enough of `entry` to cover `target_grams` of a macro, capped by stock
    fn take(&mut self, entry: &PantryEntry, nutrient: Macro, target_grams: f64) -> Option<(f64, ItemMacros)> {
        let needed = grams_for_macro(&entry.food, nutrient, target_grams);
        let available = self.available(entry.food.id);
        let grams = needed.min(available);
        if grams <= 0.0 {
            return None;
        }
        self.remaining.insert(entry.food.id, available - grams);
        Some((grams, ItemMacros::for_grams(&entry.food, grams)))
    }
}

/// Running totals of the meal being built
#[derive(Default)]
struct MealBuilder {
    items: Vec<(FoodItem, f64)>,
    protein: f64,
    carbs: f64,
    fat: f64,
}

impl MealBuilder {
    fn add(&mut self, food: &FoodItem, grams: f64, macros: ItemMacros) {
        self.items.push((food.clone(), grams));
        self.protein += macros.protein;
        self.carbs += macros.carbs;
        self.fat += macros.fat;
    }

    fn finish(self, meal_index: u8) -> PlannedMeal {
        PlannedMeal {
            meal_index,
            items: self
                .items
                .into_iter()
                .map(|(food, grams)| MealPlanItem {
                    food_id: food.id,
                    food_name: food.name,
                    grams: grams.round().max(0.0) as u32,
                })
                .collect(),
        }
    }
}

/// Tolerance-band warnings comparing achieved totals to targets
///
/// A macro warns only when the absolute difference exceeds its band.
#[must_use]
pub fn tolerance_warnings(
    actual: &MacroTotals,
    target: &MacroTotals,
    config: &MealPlannerConfig,
) -> Vec<String> {
    let checks = [
        ("Protein is", actual.protein, target.protein, config.protein_tolerance_g),
        ("Carbs are", actual.carbs, target.carbs, config.carbs_tolerance_g),
        ("Fat is", actual.fat, target.fat, config.fat_tolerance_g),
    ];

    checks
        .into_iter()
        .filter_map(|(label, actual, target, tolerance)| {
            let diff = actual - target;
            (diff.abs() > tolerance).then(|| {
                let sign = if diff > 0 { "+" } else { "" };
                format!("{label} {actual}g (target: {target}g, diff: {sign}{diff}g)")
            })
        })
        .collect()
}

/// Recompute daily totals from whole-gram allocations via the food table
fn actual_totals(meals: &[PlannedMeal], foods: &HashMap<Uuid, &FoodItem>) -> MacroTotals {
    let (protein, carbs, fat) = meals
        .iter()
        .flat_map(|meal| meal.items.iter())
        .filter_map(|item| {
            foods
                .get(&item.food_id)
                .map(|food| ItemMacros::for_grams(food, f64::from(item.grams)))
        })
        .fold((0.0, 0.0, 0.0), |(p, c, f), m| (p + m.protein, c + m.carbs, f + m.fat));

    MacroTotals {
        kcal: round_to_int(kcal_for(protein, carbs, fat)),
        protein: round_to_int(protein),
        carbs: round_to_int(carbs),
        fat: round_to_int(fat),
    }
}

/// Build a day of meals from pantry stock
///
/// `pantry` order is significant: it is the scan order of every pool.
///
/// # Errors
///
/// - `ValueOutOfRange` when `meals_per_day` is outside 1 to 6
/// - `PlanningFailed` when the pantry is empty, fully depleted, or lacks a
///   protein or carb source
pub fn generate_meal_plan(
    pantry: &[PantryEntry],
    target: &MacroTotals,
    meals_per_day: u8,
    config: &MealPlannerConfig,
) -> AppResult<GeneratedPlan> {
    if !(MEALS_PER_DAY_MIN..=MEALS_PER_DAY_MAX).contains(&meals_per_day) {
        return Err(AppError::out_of_range(
            "meals_per_day",
            MEALS_PER_DAY_MIN,
            MEALS_PER_DAY_MAX,
        ));
    }
    if pantry.is_empty() {
        return Err(AppError::planning(messages::EMPTY_PANTRY));
    }

    let stocked: Vec<&PantryEntry> = pantry.iter().filter(|e| e.grams_available > 0.0).collect();
    if stocked.is_empty() {
        return Err(AppError::planning(messages::NO_AVAILABLE_STOCK));
    }

    let pools = Pools::from_entries(&stocked);
    if pools.lean_protein.is_empty() && pools.fattier_protein.is_empty() {
        return Err(AppError::planning(messages::NO_PROTEIN));
    }
    if pools.carbs.is_empty() {
        return Err(AppError::planning(messages::NO_CARBS));
    }

    let per_meal = PerMealTargets::split(target, meals_per_day);
    let mut allocator = Allocator {
        remaining: stocked
            .iter()
            .map(|entry| (entry.food.id, entry.grams_available))
            .collect(),
    };
    let mut meals = Vec::with_capacity(usize::from(meals_per_day));
    let mut warnings = Vec::new();

    for meal_index in 1..=meals_per_day {
        let mut meal = MealBuilder::default();

        let protein_source = allocator
            .first_with_stock(&pools.lean_protein, config.protein_min_stock_g)
            .or_else(|| allocator.first_with_stock(&pools.fattier_protein, config.protein_min_stock_g));
        match protein_source {
            Some(entry) => {
                if let Some((grams, macros)) =
                    allocator.take(entry, Macro::Protein, per_meal.protein as f64)
                {
                    meal.add(&entry.food, grams, macros);
                }
            }
            None => warnings.push(format!("Meal {meal_index}: Not enough protein sources available")),
        }

        match allocator.first_with_stock(&pools.carbs, config.carb_min_stock_g) {
            Some(entry) => {
                let missing_carbs = (per_meal.carbs as f64 - meal.carbs).max(0.0);
                if let Some((grams, macros)) = allocator.take(entry, Macro::Carbs, missing_carbs) {
                    meal.add(&entry.food, grams, macros);
                }
            }
            None => warnings.push(format!("Meal {meal_index}: Not enough carb sources available")),
        }

        let missing_fat = per_meal.fat as f64 - meal.fat;
        if missing_fat > config.fat_tolerance_g as f64 {
            if let Some(entry) = allocator.first_with_stock(&pools.fats, config.fat_min_stock_g) {
                if let Some((grams, macros)) = allocator.take(entry, Macro::Fat, missing_fat) {
                    meal.add(&entry.food, grams, macros);
                }
            }
        }

        meals.push(meal.finish(meal_index));
    }

    let foods: HashMap<Uuid, &FoodItem> = stocked.iter().map(|e| (e.food.id, &e.food)).collect();
    let actual = actual_totals(&meals, &foods);
    warnings.extend(tolerance_warnings(&actual, target, config));

    let status = if warnings.is_empty() {
        PlanStatus::Ok
    } else {
        debug!(warnings = warnings.len(), "Meal plan generated with warnings");
        PlanStatus::Warning
    };

    Ok(GeneratedPlan {
        meals,
        per_meal_targets: per_meal,
        target: *target,
        actual,
        status,
        warnings,
    })
}
