// ABOUTME: Body metrics profile and weight log models
// ABOUTME: Profile stores metric values only, WeightLogEntry is unique per user and date
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::nutrition::MacroTargets;
use crate::errors::AppError;

/// Biological sex used by the BMR and body-fat formulas
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Male
    Male,
    /// Female
    Female,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

impl FromStr for Sex {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            other => Err(AppError::invalid_input(format!(
                "Unknown sex '{other}'. Expected male or female"
            ))),
        }
    }
}

/// Body composition goal driving the calorie adjustment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    /// Caloric deficit
    Cut,
    /// Small caloric surplus
    LeanBulk,
    /// Eat at maintenance
    Maintain,
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cut => write!(f, "cut"),
            Self::LeanBulk => write!(f, "lean_bulk"),
            Self::Maintain => write!(f, "maintain"),
        }
    }
}

impl FromStr for Goal {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "cut" => Ok(Self::Cut),
            "lean_bulk" | "bulk" => Ok(Self::LeanBulk),
            "maintain" => Ok(Self::Maintain),
            other => Err(AppError::invalid_input(format!(
                "Unknown goal '{other}'. Expected cut, lean_bulk or maintain"
            ))),
        }
    }
}

/// Unit system the user enters and reads values in
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    /// Kilograms and centimetres
    #[default]
    Metric,
    /// Pounds, feet and inches
    Imperial,
}

impl FromStr for UnitSystem {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" => Ok(Self::Metric),
            "imperial" => Ok(Self::Imperial),
            other => Err(AppError::invalid_input(format!(
                "Unknown unit system '{other}'. Expected metric or imperial"
            ))),
        }
    }
}

/// A user's body metrics and current nutrition targets
///
/// One profile per user. All lengths are centimetres and all weights
/// kilograms regardless of `unit_system`, which only affects presentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    /// Profile identifier, stable across re-creation
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Presentation units
    pub unit_system: UnitSystem,
    /// Sex
    pub sex: Sex,
    /// Height in cm
    pub height_cm: f64,
    /// Most recent body weight in kg
    pub current_weight_kg: f64,
    /// Age in years
    pub age: u32,
    /// Waist girth in cm
    pub waist_cm: Option<f64>,
    /// Neck girth in cm
    pub neck_cm: Option<f64>,
    /// Hip girth in cm
    pub hips_cm: Option<f64>,
    /// Navy-method estimate
    pub estimated_body_fat_percent: Option<f64>,
    /// Training days per week, 3 through 6
    pub training_days_per_week: u8,
    /// Goal
    pub goal: Goal,
    /// Maintenance energy expenditure in kcal
    pub tdee: i64,
    /// Goal-adjusted daily calories; may drift through recalibration
    pub kcal_target: i64,
    /// Daily macro grams
    pub macros: MacroTargets,
    /// Setup finished
    pub setup_complete: bool,
}

/// A daily body weight entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightLogEntry {
    /// Entry identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Calendar day, unique per user
    pub date: NaiveDate,
    /// Weight in kg
    pub weight_kg: f64,
    /// Waist girth in cm
    pub waist_cm: Option<f64>,
    /// Navy-method estimate at the time of logging
    pub estimated_body_fat_percent: Option<f64>,
}
