// ABOUTME: Goal-aware review of the food eaten so far today against the daily targets
// ABOUTME: Produces under/over/info warnings paced by the hour of the day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! # Intake Review
//!
//! Compares the day's diary totals with the profile targets. Expectations
//! scale with day progress (`hour / 24`): by noon half the day's protein pace
//! is expected, by midnight all of it.

use macrocoach_core::models::{Goal, IntakeTotals, MacroTotals};
use serde::{Deserialize, Serialize};

use crate::config::intelligence::IntakeReviewConfig;
use crate::rounding::round_to_int;

/// Targets used when the user has no profile yet
pub const DEFAULT_INTAKE_TARGETS: MacroTotals = MacroTotals {
    kcal: 2000,
    protein: 150,
    carbs: 250,
    fat: 70,
};

/// Direction of an intake warning
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IntakeWarningKind {
    /// Eating too little
    Under,
    /// Eating too much
    Over,
    /// Pacing hint
    Info,
}

/// One diary warning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntakeWarning {
    /// Direction
    pub kind: IntakeWarningKind,
    /// User-facing text
    pub message: String,
}

impl IntakeWarning {
    fn new(kind: IntakeWarningKind, message: String) -> Self {
        Self { kind, message }
    }
}

fn percent_of(eaten: f64, target: f64) -> f64 {
    if target > 0.0 {
        eaten / target * 100.0
    } else if eaten > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// Review the day's intake for one goal at `hour` (0-23)
#[must_use]
pub fn review_intake(
    goal: Goal,
    totals: &IntakeTotals,
    targets: &MacroTotals,
    hour: u32,
    config: &IntakeReviewConfig,
) -> Vec<IntakeWarning> {
    let day_progress = f64::from(hour) / 24.0;
    let eaten_kcal = totals.calories as f64;
    let target_kcal = targets.kcal as f64;
    let kcal_percent = percent_of(eaten_kcal, target_kcal);
    let protein_percent = percent_of(totals.protein, targets.protein as f64);
    let protein_behind = protein_percent < day_progress * config.protein_pace_percent;

    let mut warnings = Vec::new();
    match goal {
        Goal::Cut => {
            if kcal_percent > config.cut_over_percent {
                warnings.push(IntakeWarning::new(
                    IntakeWarningKind::Over,
                    format!(
                        "You're {} calories over your cut target. Consider lighter meals for the rest of the day.",
                        totals.calories - targets.kcal
                    ),
                ));
            } else if kcal_percent > config.cut_pacing_percent
                && hour < config.cut_pacing_before_hour
            {
                warnings.push(IntakeWarning::new(
                    IntakeWarningKind::Info,
                    format!(
                        "You've used {}% of your calories. Plan your remaining meals carefully.",
                        round_to_int(kcal_percent)
                    ),
                ));
            }
            if protein_behind {
                warnings.push(IntakeWarning::new(
                    IntakeWarningKind::Under,
                    format!(
                        "Protein intake is low ({}g). Prioritize protein in your next meal to preserve muscle.",
                        round_to_int(totals.protein)
                    ),
                ));
            }
        }
        Goal::LeanBulk => {
            let expected_kcal = target_kcal * day_progress;
            if eaten_kcal < expected_kcal * config.bulk_behind_fraction
                && hour > config.bulk_behind_after_hour
            {
                warnings.push(IntakeWarning::new(
                    IntakeWarningKind::Under,
                    format!(
                        "You're behind on calories for a bulk. You need {} more calories today.",
                        targets.kcal - totals.calories
                    ),
                ));
            }
            if kcal_percent > config.bulk_over_percent {
                warnings.push(IntakeWarning::new(
                    IntakeWarningKind::Over,
                    format!(
                        "You're {}% over target. Too much surplus leads to excess fat gain.",
                        round_to_int(kcal_percent - 100.0)
                    ),
                ));
            }
            if protein_behind {
                warnings.push(IntakeWarning::new(
                    IntakeWarningKind::Under,
                    format!(
                        "Increase protein intake ({}g/{}g) to maximize muscle growth.",
                        round_to_int(totals.protein),
                        targets.protein
                    ),
                ));
            }
        }
        Goal::Maintain => {
            let difference = totals.calories - targets.kcal;
            if difference.abs() > config.maintain_band_kcal && hour > config.maintain_after_hour {
                let warning = if difference > 0 {
                    IntakeWarning::new(
                        IntakeWarningKind::Over,
                        format!("You're {difference} calories over maintenance."),
                    )
                } else {
                    IntakeWarning::new(
                        IntakeWarningKind::Under,
                        format!("You're {} calories under maintenance.", -difference),
                    )
                };
                warnings.push(warning);
            }
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eaten(calories: i64, protein: f64) -> IntakeTotals {
        IntakeTotals {
            calories,
            protein,
            carbs: 0.0,
            fat: 0.0,
        }
    }

    fn targets() -> MacroTotals {
        MacroTotals {
            kcal: 2000,
            protein: 160,
            carbs: 200,
            fat: 60,
        }
    }

    fn kinds(warnings: &[IntakeWarning]) -> Vec<IntakeWarningKind> {
        warnings.iter().map(|w| w.kind).collect()
    }

    #[test]
    fn test_cut_over_target() {
        let config = IntakeReviewConfig::default();
        let warnings = review_intake(Goal::Cut, &eaten(2150, 160.0), &targets(), 20, &config);
        assert_eq!(kinds(&warnings), vec![IntakeWarningKind::Over]);
        assert!(warnings[0].message.starts_with("You're 150 calories over"));
    }

    #[test]
    fn test_cut_pacing_only_before_evening() {
        let config = IntakeReviewConfig::default();
        let afternoon = review_intake(Goal::Cut, &eaten(1900, 150.0), &targets(), 15, &config);
        assert_eq!(kinds(&afternoon), vec![IntakeWarningKind::Info]);
        assert!(afternoon[0].message.contains("95%"));

        let evening = review_intake(Goal::Cut, &eaten(1900, 150.0), &targets(), 18, &config);
        assert!(evening.is_empty());
    }

    #[test]
    fn test_protein_pace_scales_with_hour() {
        let config = IntakeReviewConfig::default();
        // 48 g is 30 % of 160 g; at noon 40 % is expected
        let noon = review_intake(Goal::Cut, &eaten(800, 48.0), &targets(), 12, &config);
        assert_eq!(kinds(&noon), vec![IntakeWarningKind::Under]);
        assert!(noon[0].message.contains("(48g)"));

        let morning = review_intake(Goal::Cut, &eaten(800, 48.0), &targets(), 6, &config);
        assert!(morning.is_empty());
    }

    #[test]
    fn test_bulk_behind_after_afternoon() {
        let config = IntakeReviewConfig::default();
        // at 18:00 the pro-rata target is 1500 kcal, 70 % of that is 1050
        let warnings = review_intake(Goal::LeanBulk, &eaten(1000, 160.0), &targets(), 18, &config);
        assert_eq!(kinds(&warnings), vec![IntakeWarningKind::Under]);
        assert!(warnings[0].message.contains("1000 more calories"));

        let early = review_intake(Goal::LeanBulk, &eaten(300, 160.0), &targets(), 14, &config);
        assert!(early.is_empty());
    }

    #[test]
    fn test_bulk_surplus_and_protein() {
        let config = IntakeReviewConfig::default();
        let warnings = review_intake(Goal::LeanBulk, &eaten(2500, 40.0), &targets(), 12, &config);
        assert_eq!(
            kinds(&warnings),
            vec![IntakeWarningKind::Over, IntakeWarningKind::Under]
        );
        assert!(warnings[0].message.starts_with("You're 25% over target"));
        assert!(warnings[1].message.contains("(40g/160g)"));
    }

    #[test]
    fn test_maintain_band_checked_late_only() {
        let config = IntakeReviewConfig::default();
        let late = review_intake(Goal::Maintain, &eaten(1600, 0.0), &targets(), 21, &config);
        assert_eq!(late[0].message, "You're 400 calories under maintenance.");

        let edge = review_intake(Goal::Maintain, &eaten(2300, 0.0), &targets(), 21, &config);
        assert!(edge.is_empty());

        let early = review_intake(Goal::Maintain, &eaten(1600, 0.0), &targets(), 20, &config);
        assert!(early.is_empty());
    }

    #[test]
    fn test_zero_target_never_divides() {
        let config = IntakeReviewConfig::default();
        let zero = MacroTotals::default();
        let warnings = review_intake(Goal::Cut, &eaten(100, 0.0), &zero, 10, &config);
        assert_eq!(warnings[0].kind, IntakeWarningKind::Over);
    }
}
