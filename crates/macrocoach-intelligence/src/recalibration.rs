// ABOUTME: Rule-based calorie target recalibration from the weekly weight trend
// ABOUTME: Ordered first-match decision table per goal, then macros recomputed at the current weight
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! # Target Recalibration
//!
//! The decision table is evaluated top to bottom for the profile's goal and
//! the first matching row wins. Bands overlap at some edges (for example a
//! lean bulk gaining exactly 0.25 %/week is "on track", not "flat"), so row
//! order is part of the behaviour.
//!
//! The new target is never clamped. Targets that drop below the configured
//! threshold are flagged with `drift_warning` instead.

use chrono::NaiveDate;
use macrocoach_core::errors::{AppError, AppResult};
use macrocoach_core::models::{Goal, MacroTargets, Profile, WeightLogEntry};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::intelligence::IntelligenceConfig;
use crate::nutrition_calculator::calculate_macro_targets;
use crate::rounding::round_to_hundredth;
use crate::weight_trend::{compute_trend, window_logs};

/// Error message when the trend window is too sparse
pub const INSUFFICIENT_RECALIBRATION_MESSAGE: &str =
    "Need at least 3 weight entries in the last 7 days to recalculate";

/// Outcome tag of a recalibration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecalibrationReason {
    /// Cut losing 0.5 to 1 %/week
    CutOnTrack,
    /// Cut with under 0.25 %/week movement
    CutFlat,
    /// Cut gaining weight
    CutGaining,
    /// Cut losing over 1 %/week
    CutLosingTooFast,
    /// Lean bulk gaining 0.25 to 0.5 %/week
    BulkOnTrack,
    /// Lean bulk with under 0.25 %/week movement
    BulkFlat,
    /// Lean bulk gaining over 0.75 %/week
    BulkGainingTooFast,
    /// Lean bulk losing weight
    BulkLosing,
    /// Maintain with under 0.25 %/week movement
    MaintainStable,
    /// Maintain gaining over 0.25 %/week
    MaintainGaining,
    /// Maintain losing
    MaintainLosing,
    /// Trend fell between bands
    NoChange,
}

impl RecalibrationReason {
    /// Human readable explanation
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::CutOnTrack => "On track - losing 0.5-1% per week",
            Self::CutFlat => "Weight flat - reducing 100 kcal",
            Self::CutGaining => "Gaining weight - reducing 150 kcal",
            Self::CutLosingTooFast => "Losing faster than target - consider adding calories",
            Self::BulkOnTrack => "On track - gaining 0.25-0.5% per week",
            Self::BulkFlat => "Weight flat - increasing 100 kcal",
            Self::BulkGainingTooFast => "Gaining too fast - reducing 100 kcal",
            Self::BulkLosing => "Losing weight - increasing 150 kcal",
            Self::MaintainStable => "Weight stable - maintaining",
            Self::MaintainGaining => "Gaining weight - reducing 100 kcal",
            Self::MaintainLosing => "Losing weight - increasing 100 kcal",
            Self::NoChange => "Trend between bands - no change",
        }
    }
}

/// One row of the decision table
struct Rule {
    goal: Goal,
    applies: fn(f64) -> bool,
    kcal_adjustment: i64,
    reason: RecalibrationReason,
}

const RULES: &[Rule] = &[
    Rule {
        goal: Goal::Cut,
        applies: |w| (-1.0..=-0.5).contains(&w),
        kcal_adjustment: 0,
        reason: RecalibrationReason::CutOnTrack,
    },
    Rule {
        goal: Goal::Cut,
        applies: |w| w.abs() < 0.25,
        kcal_adjustment: -100,
        reason: RecalibrationReason::CutFlat,
    },
    Rule {
        goal: Goal::Cut,
        applies: |w| w > 0.0,
        kcal_adjustment: -150,
        reason: RecalibrationReason::CutGaining,
    },
    Rule {
        goal: Goal::Cut,
        applies: |w| w < -1.0,
        kcal_adjustment: 0,
        reason: RecalibrationReason::CutLosingTooFast,
    },
    Rule {
        goal: Goal::LeanBulk,
        applies: |w| (0.25..=0.5).contains(&w),
        kcal_adjustment: 0,
        reason: RecalibrationReason::BulkOnTrack,
    },
    Rule {
        goal: Goal::LeanBulk,
        applies: |w| w.abs() < 0.25,
        kcal_adjustment: 100,
        reason: RecalibrationReason::BulkFlat,
    },
    Rule {
        goal: Goal::LeanBulk,
        applies: |w| w > 0.75,
        kcal_adjustment: -100,
        reason: RecalibrationReason::BulkGainingTooFast,
    },
    Rule {
        goal: Goal::LeanBulk,
        applies: |w| w < 0.0,
        kcal_adjustment: 150,
        reason: RecalibrationReason::BulkLosing,
    },
    Rule {
        goal: Goal::Maintain,
        applies: |w| w.abs() < 0.25,
        kcal_adjustment: 0,
        reason: RecalibrationReason::MaintainStable,
    },
    Rule {
        goal: Goal::Maintain,
        applies: |w| w > 0.25,
        kcal_adjustment: -100,
        reason: RecalibrationReason::MaintainGaining,
    },
    Rule {
        goal: Goal::Maintain,
        applies: |_| true,
        kcal_adjustment: 100,
        reason: RecalibrationReason::MaintainLosing,
    },
];

/// Pick the first matching row for a goal and weekly change
///
/// Returns `(0, NoChange)` when the trend falls between bands (e.g. a cut
/// losing 0.3 %/week).
#[must_use]
pub fn select_adjustment(goal: Goal, weekly_change_percent: f64) -> (i64, RecalibrationReason) {
    RULES
        .iter()
        .filter(|rule| rule.goal == goal)
        .find(|rule| (rule.applies)(weekly_change_percent))
        .map_or((0, RecalibrationReason::NoChange), |rule| {
            (rule.kcal_adjustment, rule.reason)
        })
}

/// Result of a recalibration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recalibration {
    /// Target before the adjustment
    pub previous_kcal: i64,
    /// Target after the adjustment
    pub new_kcal_target: i64,
    /// Signed adjustment
    pub kcal_adjustment: i64,
    /// Outcome tag
    pub reason: RecalibrationReason,
    /// Weekly change used, 2 decimals
    pub weekly_change_percent: f64,
    /// Macros at the current weight and new target
    pub macros: MacroTargets,
    /// New target is below the low-calorie threshold
    pub drift_warning: bool,
}

/// Recalibrate a profile from an already computed weekly change
#[must_use]
pub fn recalibrate(
    profile: &Profile,
    weekly_change_percent: f64,
    config: &IntelligenceConfig,
) -> Recalibration {
    let (kcal_adjustment, reason) = select_adjustment(profile.goal, weekly_change_percent);
    let new_kcal_target = profile.kcal_target + kcal_adjustment;
    let macros = calculate_macro_targets(
        profile.current_weight_kg,
        new_kcal_target,
        &config.nutrition.macronutrients,
    );
    let drift_warning = new_kcal_target < config.recalibration.low_kcal_warning_threshold;

    if drift_warning {
        warn!(
            user_id = %profile.user_id,
            new_kcal_target,
            threshold = config.recalibration.low_kcal_warning_threshold,
            "Recalibrated calorie target is below the low-calorie threshold"
        );
    }
    info!(
        user_id = %profile.user_id,
        goal = %profile.goal,
        weekly_change_percent,
        kcal_adjustment,
        reason = reason.message(),
        "Recalibrated calorie target"
    );

    Recalibration {
        previous_kcal: profile.kcal_target,
        new_kcal_target,
        kcal_adjustment,
        reason,
        weekly_change_percent: round_to_hundredth(weekly_change_percent),
        macros,
        drift_warning,
    }
}

/// Window the weight logs, compute the trend and recalibrate
///
/// # Errors
///
/// Returns `InsufficientData` when the trend window holds too few entries
pub fn recalibrate_from_logs(
    profile: &Profile,
    logs: &[WeightLogEntry],
    today: NaiveDate,
    config: &IntelligenceConfig,
) -> AppResult<Recalibration> {
    let recent = window_logs(logs, today, config.trend.window_days);
    let trend = compute_trend(&recent, &config.trend)
        .ok_or_else(|| AppError::insufficient_data(INSUFFICIENT_RECALIBRATION_MESSAGE))?;
    Ok(recalibrate(profile, trend.weekly_change_percent, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cut_bands() {
        assert_eq!(select_adjustment(Goal::Cut, -0.75), (0, RecalibrationReason::CutOnTrack));
        assert_eq!(select_adjustment(Goal::Cut, -1.0), (0, RecalibrationReason::CutOnTrack));
        assert_eq!(select_adjustment(Goal::Cut, 0.1), (-100, RecalibrationReason::CutFlat));
        assert_eq!(select_adjustment(Goal::Cut, 0.4), (-150, RecalibrationReason::CutGaining));
        assert_eq!(
            select_adjustment(Goal::Cut, -1.6),
            (0, RecalibrationReason::CutLosingTooFast)
        );
        assert_eq!(select_adjustment(Goal::Cut, -0.3), (0, RecalibrationReason::NoChange));
    }

    #[test]
    fn test_lean_bulk_band_edges_follow_row_order() {
        assert_eq!(select_adjustment(Goal::LeanBulk, 0.25), (0, RecalibrationReason::BulkOnTrack));
        assert_eq!(select_adjustment(Goal::LeanBulk, 0.2), (100, RecalibrationReason::BulkFlat));
        assert_eq!(
            select_adjustment(Goal::LeanBulk, 0.9),
            (-100, RecalibrationReason::BulkGainingTooFast)
        );
        assert_eq!(select_adjustment(Goal::LeanBulk, -0.5), (150, RecalibrationReason::BulkLosing));
        assert_eq!(select_adjustment(Goal::LeanBulk, 0.6), (0, RecalibrationReason::NoChange));
    }

    #[test]
    fn test_maintain_else_branch_catches_exact_quarter() {
        assert_eq!(select_adjustment(Goal::Maintain, 0.0), (0, RecalibrationReason::MaintainStable));
        assert_eq!(
            select_adjustment(Goal::Maintain, 0.3),
            (-100, RecalibrationReason::MaintainGaining)
        );
        assert_eq!(
            select_adjustment(Goal::Maintain, 0.25),
            (100, RecalibrationReason::MaintainLosing)
        );
        assert_eq!(
            select_adjustment(Goal::Maintain, -0.4),
            (100, RecalibrationReason::MaintainLosing)
        );
    }
}
