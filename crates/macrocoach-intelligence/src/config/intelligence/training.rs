// ABOUTME: Strength training configuration for the set-by-set progression engine
// ABOUTME: Weight increments per exercise type, RPE ceilings, stall detection and deload scaling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

use macrocoach_core::models::ExerciseType;
use serde::{Deserialize, Serialize};

/// Progression engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// Heavy compound increment in kg (2.5)
    pub heavy_increment_kg: f64,
    /// Pump compound increment in kg (5.0)
    pub pump_increment_kg: f64,
    /// Isolation increment in kg (2.5)
    pub isolation_increment_kg: f64,
    /// Stall-breaking increment in kg (1.25)
    pub micro_increment_kg: f64,
    /// Load multiplier after reported pain (0.9)
    pub pain_reduction_factor: f64,
    /// Load multiplier for deload sessions (0.6)
    pub deload_factor: f64,
    /// Plate rounding step in kg (2.5)
    pub plate_step_kg: f64,
    /// Average RPE above which load decreases (9.0)
    pub rpe_decrease_above: f64,
    /// Heavy compounds progress only at or below this RPE (7.5)
    pub heavy_rpe_ceiling: f64,
    /// Pump and isolation progress only at or below this RPE (8.0)
    pub pump_rpe_ceiling: f64,
    /// Largest total-rep spread that still counts as a stall (2)
    pub stall_rep_spread: u32,
    /// Completed sessions inspected (3)
    pub history_sessions: usize,
    /// Sets below the minimum that force a decrease (2)
    pub below_min_sets_for_decrease: usize,
}

impl ProgressionConfig {
    /// Load increment for an exercise type
    #[must_use]
    pub const fn increment_for(&self, exercise_type: ExerciseType) -> f64 {
        match exercise_type {
            ExerciseType::CompoundHeavy => self.heavy_increment_kg,
            ExerciseType::CompoundPump => self.pump_increment_kg,
            ExerciseType::Isolation => self.isolation_increment_kg,
        }
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            heavy_increment_kg: 2.5,
            pump_increment_kg: 5.0,
            isolation_increment_kg: 2.5,
            micro_increment_kg: 1.25,
            pain_reduction_factor: 0.9,
            deload_factor: 0.6,
            plate_step_kg: 2.5,
            rpe_decrease_above: 9.0,
            heavy_rpe_ceiling: 7.5,
            pump_rpe_ceiling: 8.0,
            stall_rep_spread: 2,
            history_sessions: 3,
            below_min_sets_for_decrease: 2,
        }
    }
}
