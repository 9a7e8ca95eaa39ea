// ABOUTME: Food diary models for logged meals and the user's custom food library
// ABOUTME: FoodLog entries with per-item macros and totals, plus CustomFood definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::analysis::{Confidence, EstimatedFood};
use crate::errors::AppError;

/// Meal slot a diary entry belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    /// Breakfast
    Breakfast,
    /// Lunch
    Lunch,
    /// Dinner
    Dinner,
    /// Anything between meals
    Snack,
}

impl MealType {
    /// Every meal type in day order
    pub const ALL: [Self; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

    /// Stable snake-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|meal| meal.as_str() == s)
            .ok_or_else(|| AppError::invalid_input(format!("Unknown meal type '{s}'")))
    }
}

/// How a diary entry was created
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FoodLogSource {
    /// Ingredients entered by hand
    Manual,
    /// AI estimate from a meal photo
    Photo,
    /// Bare calorie and macro totals
    Quick,
}

/// One food inside a diary entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggedFood {
    /// Food name
    pub name: String,
    /// Portion in grams, 0 for quick entries
    pub grams: f64,
    /// Kilocalories
    pub calories: f64,
    /// Protein grams
    pub protein: f64,
    /// Carbohydrate grams
    pub carbs: f64,
    /// Fat grams
    pub fat: f64,
}

impl From<&EstimatedFood> for LoggedFood {
    fn from(food: &EstimatedFood) -> Self {
        Self {
            name: food.name.clone(),
            grams: food.grams as f64,
            calories: food.calories as f64,
            protein: food.protein,
            carbs: food.carbs,
            fat: food.fat,
        }
    }
}

/// Energy and macros eaten, kcal whole and macros to one decimal
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct IntakeTotals {
    /// Kilocalories
    pub calories: i64,
    /// Protein grams
    pub protein: f64,
    /// Carbohydrate grams
    pub carbs: f64,
    /// Fat grams
    pub fat: f64,
}

/// A food diary entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodLog {
    /// Entry identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Day the food was eaten
    pub date: NaiveDate,
    /// Meal slot
    pub meal_type: MealType,
    /// When the entry was written
    pub logged_at: DateTime<Utc>,
    /// Creation path
    pub source: FoodLogSource,
    /// Stored meal photo for photo entries
    pub photo_storage_id: Option<String>,
    /// Model description of the photographed meal
    pub photo_description: Option<String>,
    /// Foods eaten
    pub items: Vec<LoggedFood>,
    /// Totals recomputed from `items`
    pub totals: IntakeTotals,
    /// Model confidence for photo entries
    pub confidence: Option<Confidence>,
    /// False until the user confirms an AI estimate
    pub is_verified: bool,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Where a custom food's numbers came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CustomFoodSource {
    /// Looked up by the AI collaborator
    AiLookup,
    /// Typed in by the user
    Manual,
}

/// A food in a user's personal library, densities per 100 g
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomFood {
    /// Food identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Display name, unique per user ignoring case
    pub name: String,
    /// Protein grams per 100 g
    pub protein_per_100g: f64,
    /// Carbohydrate grams per 100 g
    pub carbs_per_100g: f64,
    /// Fat grams per 100 g
    pub fat_per_100g: f64,
    /// Kilocalories per 100 g
    pub calories_per_100g: f64,
    /// Origin of the numbers
    pub source: CustomFoodSource,
}

impl CustomFood {
    /// Case-insensitive name comparison used for library de-duplication
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_type_parses_snake_case() {
        assert_eq!("snack".parse::<MealType>().unwrap(), MealType::Snack);
        assert!("brunch".parse::<MealType>().is_err());
    }

    #[test]
    fn test_custom_food_name_match_ignores_case() {
        let food = CustomFood {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Greek Yogurt".into(),
            protein_per_100g: 10.0,
            carbs_per_100g: 3.6,
            fat_per_100g: 0.4,
            calories_per_100g: 59.0,
            source: CustomFoodSource::Manual,
        };
        assert!(food.has_name("greek yogurt"));
        assert!(!food.has_name("yogurt"));
    }
}
