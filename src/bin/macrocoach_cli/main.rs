// ABOUTME: Macrocoach CLI - command-line access to the decision engine
// ABOUTME: Computes targets, body fat and unit conversions, and plans meals from a pantry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors
//!
//! Usage:
//! ```bash
//! # Daily calorie and macro targets
//! macrocoach-cli targets --sex male --age 30 --height-cm 180 --weight-kg 80 --training-days 4 --goal cut
//!
//! # Navy-method body fat estimate
//! macrocoach-cli body-fat --sex female --height-cm 165 --waist-cm 75 --neck-cm 33 --hips-cm 98
//!
//! # Unit conversion
//! macrocoach-cli convert lbs-to-kg 180
//!
//! # Meal plan from a pantry, by food name
//! macrocoach-cli meal-plan --sex male --age 30 --height-cm 180 --weight-kg 80 \
//!     --training-days 4 --goal cut --pantry "Chicken Breast=800" --pantry "Rice=600" \
//!     --pantry "Olive Oil=100"
//! ```
//!
//! Results are printed to stdout as JSON; logs go to stderr.

mod commands;

use clap::{Parser, Subcommand};
use macrocoach::config::{CoachConfig, IntelligenceConfig};
use macrocoach::logging;
use tracing::info;

use commands::{BodyFatArgs, ConvertArgs, MealPlanArgs, TargetArgs};

#[derive(Parser)]
#[command(
    name = "macrocoach-cli",
    about = "Macrocoach nutrition and training engine",
    long_about = "Command-line access to the Macrocoach engine: nutrition targets, body-fat estimates, unit conversion and pantry meal planning."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Calculate BMR, TDEE, calorie target and macros
    Targets(TargetArgs),
    /// Estimate body fat with the Navy method
    BodyFat(BodyFatArgs),
    /// Convert between metric and imperial units
    Convert(ConvertArgs),
    /// Seed an in-memory store, stock a pantry and generate a day's meal plan
    MealPlan(MealPlanArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_from_env()?;
    let config = CoachConfig::from_env()?;
    // invalid engine overrides fall back to defaults with a warning
    let intelligence = IntelligenceConfig::global().clone();
    info!(environment = %config.environment, "Configuration loaded");

    let output = match cli.command {
        Command::Targets(args) => commands::targets(&args, &intelligence)?,
        Command::BodyFat(args) => commands::body_fat(&args),
        Command::Convert(args) => commands::convert(&args),
        Command::MealPlan(args) => commands::meal_plan(&args, config, intelligence).await?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
