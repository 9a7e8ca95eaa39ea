// ABOUTME: Subcommand arguments and handlers for the Macrocoach CLI
// ABOUTME: Each handler returns a JSON value that main prints to stdout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

use anyhow::{anyhow, Context, Result};
use clap::{Args, ValueEnum};
use macrocoach::auth::Identity;
use macrocoach::config::{CoachConfig, IntelligenceConfig};
use macrocoach::database_plugins::InMemoryDatabase;
use macrocoach::external::{MockFileStorage, MockVisionAnalyzer};
use macrocoach::resources::CoachResources;
use macrocoach::seed;
use macrocoach::services::meal_plans::{self, MealPlanRequest};
use macrocoach::services::pantry;
use macrocoach::services::profiles::{self, HeightInput, ProfileInput};
use macrocoach_core::models::{Goal, Sex, UnitSystem};
use macrocoach_intelligence::algorithms::{
    cm_to_feet_inches, cm_to_inches, estimate_body_fat, inches_to_cm, kg_to_lbs, lbs_to_kg,
};
use macrocoach_intelligence::nutrition_calculator::{calculate_targets, TargetInputs};
use macrocoach_intelligence::rounding::round_to_tenth;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Args)]
pub struct TargetArgs {
    /// male or female
    #[arg(long)]
    sex: Sex,
    /// Age in years
    #[arg(long)]
    age: u32,
    /// Height in centimetres
    #[arg(long)]
    height_cm: f64,
    /// Body weight in kilograms
    #[arg(long)]
    weight_kg: f64,
    /// Training days per week (3-6)
    #[arg(long)]
    training_days: u8,
    /// cut, lean_bulk or maintain
    #[arg(long)]
    goal: Goal,
}

impl TargetArgs {
    const fn inputs(&self) -> TargetInputs {
        TargetInputs {
            sex: self.sex,
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            age: self.age,
            training_days_per_week: self.training_days,
            goal: self.goal,
        }
    }
}

#[derive(Args)]
pub struct BodyFatArgs {
    /// male or female
    #[arg(long)]
    sex: Sex,
    /// Height in centimetres
    #[arg(long)]
    height_cm: f64,
    /// Waist girth at the navel in centimetres
    #[arg(long)]
    waist_cm: f64,
    /// Neck girth in centimetres
    #[arg(long)]
    neck_cm: f64,
    /// Hip girth in centimetres, required for an estimate for women
    #[arg(long)]
    hips_cm: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Conversion {
    /// Pounds to kilograms
    LbsToKg,
    /// Kilograms to pounds
    KgToLbs,
    /// Inches to centimetres
    InToCm,
    /// Centimetres to inches
    CmToIn,
    /// Centimetres to feet and inches
    CmToFtIn,
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Direction of the conversion
    #[arg(value_enum)]
    conversion: Conversion,
    /// Value to convert
    value: f64,
}

#[derive(Args)]
pub struct MealPlanArgs {
    #[command(flatten)]
    profile: TargetArgs,
    /// Meals to split the day into (1-6)
    #[arg(long)]
    meals: Option<u8>,
    /// Pantry stock as "Food Name=grams", repeatable
    #[arg(long = "pantry", value_name = "FOOD=GRAMS")]
    pantry: Vec<String>,
}

pub fn targets(args: &TargetArgs, intelligence: &IntelligenceConfig) -> Result<Value> {
    let targets = calculate_targets(&args.inputs(), &intelligence.nutrition)?;
    Ok(serde_json::to_value(targets)?)
}

pub fn body_fat(args: &BodyFatArgs) -> Value {
    let percent = estimate_body_fat(
        args.sex,
        args.waist_cm,
        args.neck_cm,
        args.height_cm,
        args.hips_cm,
    );
    json!({ "sex": args.sex, "estimated_body_fat_percent": percent })
}

pub fn convert(args: &ConvertArgs) -> Value {
    let value = args.value;
    match args.conversion {
        Conversion::LbsToKg => json!({ "kg": round_to_tenth(lbs_to_kg(value)) }),
        Conversion::KgToLbs => json!({ "lbs": round_to_tenth(kg_to_lbs(value)) }),
        Conversion::InToCm => json!({ "cm": round_to_tenth(inches_to_cm(value)) }),
        Conversion::CmToIn => json!({ "inches": round_to_tenth(cm_to_inches(value)) }),
        Conversion::CmToFtIn => {
            let height = cm_to_feet_inches(value);
            json!({ "feet": height.feet, "inches": height.inches })
        }
    }
}

fn parse_pantry_entry(raw: &str) -> Result<(&str, f64)> {
    let (name, grams) = raw
        .rsplit_once('=')
        .ok_or_else(|| anyhow!("Pantry entry '{raw}' must look like FOOD=GRAMS"))?;
    let grams = grams
        .trim()
        .parse()
        .with_context(|| format!("Invalid grams in pantry entry '{raw}'"))?;
    Ok((name.trim(), grams))
}

pub async fn meal_plan(
    args: &MealPlanArgs,
    config: CoachConfig,
    intelligence: IntelligenceConfig,
) -> Result<Value> {
    let resources = CoachResources::new(
        Arc::new(InMemoryDatabase::new()),
        Arc::new(MockVisionAnalyzer::default()),
        Arc::new(MockFileStorage::new()),
        config,
        intelligence,
    );
    seed::seed_all(resources.database.as_ref()).await?;

    let identity = Identity::user(Uuid::new_v4());
    let input = &args.profile;
    profiles::create_profile(
        &resources,
        identity,
        &ProfileInput {
            unit_system: UnitSystem::Metric,
            sex: input.sex,
            age: input.age,
            height: HeightInput::Centimeters {
                value: input.height_cm,
            },
            weight: input.weight_kg,
            waist: None,
            neck: None,
            hips: None,
            training_days_per_week: input.training_days,
            goal: input.goal,
        },
    )
    .await?;

    for raw in &args.pantry {
        let (name, grams) = parse_pantry_entry(raw)?;
        let food = resources
            .database
            .find_food_by_name(name)
            .await?
            .ok_or_else(|| anyhow!("Unknown food '{name}'"))?;
        pantry::add_pantry_item(&resources, identity, food.id, grams).await?;
    }
    info!(items = args.pantry.len(), "Pantry stocked");

    let plan = meal_plans::generate(
        &resources,
        identity,
        MealPlanRequest {
            date: None,
            meals_per_day: args.meals,
        },
    )
    .await?;
    Ok(serde_json::to_value(plan)?)
}
