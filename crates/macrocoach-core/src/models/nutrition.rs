// ABOUTME: Nutrition models for the food catalogue, pantry stock and generated meal plans
// ABOUTME: FoodItem, FoodGroup, PantryStock, MacroTargets, MacroTotals and MealPlan definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::constants::energy::{KCAL_PER_GRAM_CARBS, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN};
use crate::errors::AppError;

/// Allocation pool a food belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FoodGroup {
    /// Low-fat protein (chicken breast, tuna)
    LeanProtein,
    /// Protein with meaningful fat (beef, eggs, salmon)
    FattierProtein,
    /// Starchy carbohydrate (rice, oats, potatoes)
    StarchyCarb,
    /// Fat source (oils, nuts, avocado)
    FatSource,
}

impl FoodGroup {
    /// Every group in catalogue order
    pub const ALL: [Self; 4] = [
        Self::LeanProtein,
        Self::FattierProtein,
        Self::StarchyCarb,
        Self::FatSource,
    ];

    /// Stable snake-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LeanProtein => "lean_protein",
            Self::FattierProtein => "fattier_protein",
            Self::StarchyCarb => "starchy_carb",
            Self::FatSource => "fat_source",
        }
    }
}

impl fmt::Display for FoodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FoodGroup {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|group| group.as_str() == s)
            .ok_or_else(|| AppError::invalid_input(format!("Unknown food group '{s}'")))
    }
}

/// Macronutrient selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Macro {
    /// Protein
    Protein,
    /// Carbohydrate
    Carbs,
    /// Fat
    Fat,
}

/// Reference food with macro densities per 100 g
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodItem {
    /// Food identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Allocation pool
    pub group: FoodGroup,
    /// Protein grams per 100 g
    pub protein_per_100g: f64,
    /// Carbohydrate grams per 100 g
    pub carbs_per_100g: f64,
    /// Fat grams per 100 g
    pub fat_per_100g: f64,
}

impl FoodItem {
    /// Density of one macro per 100 g
    #[must_use]
    pub const fn per_100g(&self, nutrient: Macro) -> f64 {
        match nutrient {
            Macro::Protein => self.protein_per_100g,
            Macro::Carbs => self.carbs_per_100g,
            Macro::Fat => self.fat_per_100g,
        }
    }
}

/// Grams of a food the user has on hand
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PantryStock {
    /// Pantry row identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Referenced catalogue food
    pub food_id: Uuid,
    /// Grams available, never negative
    pub grams_available: f64,
}

/// Daily macro targets in whole grams
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MacroTargets {
    /// Protein grams
    pub protein_g: u32,
    /// Carbohydrate grams
    pub carbs_g: u32,
    /// Fat grams
    pub fat_g: u32,
}

impl MacroTargets {
    /// Energy implied by the macro grams
    #[must_use]
    pub fn kcal(&self) -> f64 {
        let fat_kcal = f64::from(self.fat_g) * KCAL_PER_GRAM_FAT;
        let carbs_and_fat = f64::from(self.carbs_g).mul_add(KCAL_PER_GRAM_CARBS, fat_kcal);
        f64::from(self.protein_g).mul_add(KCAL_PER_GRAM_PROTEIN, carbs_and_fat)
    }
}

/// Daily energy and macro totals (targets or achieved)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MacroTotals {
    /// Kilocalories
    pub kcal: i64,
    /// Protein grams
    pub protein: i64,
    /// Carbohydrate grams
    pub carbs: i64,
    /// Fat grams
    pub fat: i64,
}

/// Overall plan verdict
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Every macro within its tolerance band
    Ok,
    /// At least one warning was raised
    Warning,
}

/// One allocated food in a planned meal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MealPlanItem {
    /// Catalogue food
    pub food_id: Uuid,
    /// Food name at planning time
    pub food_name: String,
    /// Whole grams
    pub grams: u32,
}

/// One meal of a plan, `meal_index` is 1-based
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannedMeal {
    /// Position in the day starting at 1
    pub meal_index: u8,
    /// Allocated foods in pick order
    pub items: Vec<MealPlanItem>,
}

/// A persisted daily meal plan, one per user and date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MealPlan {
    /// Plan identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Day the plan is for
    pub date: NaiveDate,
    /// Verdict
    pub status: PlanStatus,
    /// All warnings joined with "; "
    pub warning_text: Option<String>,
    /// Individual warnings
    pub warnings: Vec<String>,
    /// Daily targets copied from the profile
    pub target: MacroTotals,
    /// Totals recomputed from the allocated grams
    pub actual: MacroTotals,
    /// Meals in order
    pub meals: Vec<PlannedMeal>,
}
