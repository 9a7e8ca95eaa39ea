// ABOUTME: Set-by-set load progression state machine over recent completed sessions
// ABOUTME: Pain override, stall detection, forced decreases and type-specific increase rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! # Progression Engine
//!
//! Rules are evaluated in strict priority order and the first that fires
//! decides the recommendation:
//!
//! 1. no history
//! 2. pain in the most recent session
//! 3. stall over the full history window
//! 4. too many sets below the rep floor, or average RPE too high
//! 5. type-specific increase
//! 6. hold
//!
//! Deload scaling is not part of the state machine. Session creation applies
//! [`apply_deload`] to whatever the engine recommends.

use std::fmt;

use macrocoach_core::models::{ExerciseType, ProgressionAction, SetLog};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::intelligence::ProgressionConfig;
use crate::rounding::round_to_step;

/// Sets logged for one exercise in one completed session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPerformance {
    sets: Vec<SetLog>,
}

impl SessionPerformance {
    /// Wrap non-empty set logs, ordered by set number
    ///
    /// Returns `None` when no sets were logged.
    #[must_use]
    pub fn new(mut sets: Vec<SetLog>) -> Option<Self> {
        if sets.is_empty() {
            return None;
        }
        sets.sort_by_key(|set| set.set_number);
        Some(Self { sets })
    }

    /// Working weight: the load of the first set
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.sets.first().map_or(0.0, |set| set.weight)
    }

    /// Sum of reps across all sets
    #[must_use]
    pub fn total_reps(&self) -> u32 {
        self.sets.iter().map(|set| set.reps).sum()
    }

    /// Mean RPE over sets that recorded one
    #[must_use]
    pub fn average_rpe(&self) -> Option<f64> {
        let rated: Vec<f64> = self.sets.iter().filter_map(|set| set.rpe).collect();
        if rated.is_empty() {
            None
        } else {
            Some(rated.iter().sum::<f64>() / rated.len() as f64)
        }
    }

    fn has_pain(&self) -> bool {
        self.sets.iter().any(|set| set.pain_flag)
    }

    fn sets_below(&self, reps_min: u32) -> usize {
        self.sets.iter().filter(|set| set.reps < reps_min).count()
    }
}

/// What was found for an exercise in the recent completed sessions
#[derive(Debug, Clone, PartialEq)]
pub enum ExerciseHistory {
    /// No completed non-deload session for this split day
    NoSessions,
    /// Sessions exist but none logged a set for the exercise
    NoSets,
    /// Performances, newest first
    Performed(Vec<SessionPerformance>),
}

impl ExerciseHistory {
    /// Build from per-session set logs, newest session first
    ///
    /// Sessions where the exercise was absent or nothing was logged are skipped.
    #[must_use]
    pub fn from_sessions<I>(sessions: I) -> Self
    where
        I: IntoIterator<Item = Option<Vec<SetLog>>>,
    {
        let mut seen_any = false;
        let performances: Vec<SessionPerformance> = sessions
            .into_iter()
            .inspect(|_| seen_any = true)
            .filter_map(|sets| sets.and_then(SessionPerformance::new))
            .collect();

        if !seen_any {
            Self::NoSessions
        } else if performances.is_empty() {
            Self::NoSets
        } else {
            Self::Performed(performances)
        }
    }
}

/// Why the engine chose its action
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ProgressionReason {
    /// Nothing to base a load on
    NoHistory,
    /// Sessions found but no sets for the exercise
    NoCompletedSets,
    /// Pain flagged in the last session
    PainReported,
    /// Same weight and near-identical reps across the history window
    Stalled {
        /// Sessions compared
        sessions: usize,
        /// Increment applied
        increment_kg: f64,
    },
    /// Too many sets under the rep floor
    RepsBelowMinimum {
        /// Rep floor
        reps_min: u32,
    },
    /// Average RPE above the decrease threshold
    RpeTooHigh,
    /// Heavy compound: every set in range with manageable effort
    AllSetsInRange,
    /// Pump or isolation: every set reached the rep ceiling
    AllSetsAtMaxReps,
    /// Default outcome
    NotReady,
}

impl fmt::Display for ProgressionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoHistory => write!(f, "No history - pick your starting weight"),
            Self::NoCompletedSets => {
                write!(f, "No completed sets found - pick your starting weight")
            }
            Self::PainReported => write!(f, "Pain reported - reducing weight by 10%"),
            Self::Stalled {
                sessions,
                increment_kg,
            } => write!(
                f,
                "Stalled for {sessions} sessions - micro progression (+{increment_kg}kg)"
            ),
            Self::RepsBelowMinimum { reps_min } => {
                write!(f, "Multiple sets below {reps_min} reps - reducing weight")
            }
            Self::RpeTooHigh => write!(f, "Average RPE too high (>9) - reducing weight"),
            Self::AllSetsInRange => {
                write!(f, "All sets in range with good RPE - increasing weight")
            }
            Self::AllSetsAtMaxReps => {
                write!(f, "All sets at max reps with good RPE - increasing weight")
            }
            Self::NotReady => write!(f, "Keep current weight - not yet ready to progress"),
        }
    }
}

/// Engine output for one exercise
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProgressionRecommendation {
    /// Suggested load, absent without history
    pub recommended_weight: Option<f64>,
    /// Suggested action
    pub action: ProgressionAction,
    /// Explanation
    pub reason: ProgressionReason,
}

impl ProgressionRecommendation {
    const fn without_weight(reason: ProgressionReason) -> Self {
        Self {
            recommended_weight: None,
            action: ProgressionAction::Hold,
            reason,
        }
    }

    const fn with_weight(weight: f64, action: ProgressionAction, reason: ProgressionReason) -> Self {
        Self {
            recommended_weight: Some(weight),
            action,
            reason,
        }
    }
}

/// Target rep range for the exercise slot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepRange {
    /// Inclusive floor
    pub min: u32,
    /// Inclusive ceiling
    pub max: u32,
}

fn is_stalled(window: &[SessionPerformance], required: usize, max_spread: u32) -> bool {
    if required == 0 || window.len() < required {
        return false;
    }
    let window = &window[..required];
    let weight = window[0].weight();
    let same_weight = window
        .iter()
        .all(|session| (session.weight() - weight).abs() < f64::EPSILON);

    let totals = window.iter().map(SessionPerformance::total_reps);
    let (min_total, max_total) = totals.fold((u32::MAX, u32::MIN), |(lo, hi), total| {
        (lo.min(total), hi.max(total))
    });

    same_weight && max_total - min_total <= max_spread
}

/// Recommend the next load for one exercise
#[must_use]
pub fn recommend(
    history: &ExerciseHistory,
    exercise_type: ExerciseType,
    reps: RepRange,
    config: &ProgressionConfig,
) -> ProgressionRecommendation {
    let sessions = match history {
        ExerciseHistory::NoSessions => {
            return ProgressionRecommendation::without_weight(ProgressionReason::NoHistory)
        }
        ExerciseHistory::NoSets => {
            return ProgressionRecommendation::without_weight(ProgressionReason::NoCompletedSets)
        }
        ExerciseHistory::Performed(sessions) => sessions,
    };
    let Some(last) = sessions.first() else {
        return ProgressionRecommendation::without_weight(ProgressionReason::NoCompletedSets);
    };

    let last_weight = last.weight();
    let increment = config.increment_for(exercise_type);
    let decreased = (last_weight - increment).max(0.0);

    if last.has_pain() {
        return ProgressionRecommendation::with_weight(
            round_to_step(last_weight * config.pain_reduction_factor, config.plate_step_kg),
            ProgressionAction::Decrease,
            ProgressionReason::PainReported,
        );
    }

    if is_stalled(sessions, config.history_sessions, config.stall_rep_spread) {
        debug!(last_weight, sessions = config.history_sessions, "Stall detected");
        return ProgressionRecommendation::with_weight(
            last_weight + config.micro_increment_kg,
            ProgressionAction::MicroProgress,
            ProgressionReason::Stalled {
                sessions: config.history_sessions,
                increment_kg: config.micro_increment_kg,
            },
        );
    }

    if last.sets_below(reps.min) >= config.below_min_sets_for_decrease {
        return ProgressionRecommendation::with_weight(
            decreased,
            ProgressionAction::Decrease,
            ProgressionReason::RepsBelowMinimum { reps_min: reps.min },
        );
    }

    let average_rpe = last.average_rpe();
    if average_rpe.is_some_and(|rpe| rpe > config.rpe_decrease_above) {
        return ProgressionRecommendation::with_weight(
            decreased,
            ProgressionAction::Decrease,
            ProgressionReason::RpeTooHigh,
        );
    }

    let increased = last_weight + increment;
    match exercise_type {
        ExerciseType::CompoundHeavy => {
            let in_range = last
                .sets
                .iter()
                .all(|set| (reps.min..=reps.max).contains(&set.reps));
            let effort_ok = average_rpe.is_none_or(|rpe| rpe <= config.heavy_rpe_ceiling);
            if in_range && effort_ok {
                return ProgressionRecommendation::with_weight(
                    increased,
                    ProgressionAction::Increase,
                    ProgressionReason::AllSetsInRange,
                );
            }
        }
        ExerciseType::CompoundPump | ExerciseType::Isolation => {
            let at_max = last.sets.iter().all(|set| set.reps >= reps.max);
            let effort_ok = average_rpe.is_none_or(|rpe| rpe <= config.pump_rpe_ceiling);
            if at_max && effort_ok {
                return ProgressionRecommendation::with_weight(
                    increased,
                    ProgressionAction::Increase,
                    ProgressionReason::AllSetsAtMaxReps,
                );
            }
        }
    }

    ProgressionRecommendation::with_weight(
        last_weight,
        ProgressionAction::Hold,
        ProgressionReason::NotReady,
    )
}

/// Scale a recommended load for a deload session, re-rounded to the plate step
#[must_use]
pub fn apply_deload(weight: Option<f64>, config: &ProgressionConfig) -> Option<f64> {
    weight.map(|w| round_to_step(w * config.deload_factor, config.plate_step_kg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn set(number: u32, weight: f64, reps: u32, rpe: Option<f64>) -> SetLog {
        SetLog {
            id: Uuid::new_v4(),
            session_exercise_id: Uuid::nil(),
            set_number: number,
            weight,
            reps,
            rpe,
            pain_flag: false,
        }
    }

    fn session(weight: f64, reps: &[u32], rpe: Option<f64>) -> SessionPerformance {
        let sets = reps
            .iter()
            .zip(1..)
            .map(|(r, n)| set(n, weight, *r, rpe))
            .collect();
        SessionPerformance::new(sets).unwrap()
    }

    const HEAVY: RepRange = RepRange { min: 6, max: 10 };

    fn run(history: Vec<SessionPerformance>, exercise_type: ExerciseType) -> ProgressionRecommendation {
        recommend(
            &ExerciseHistory::Performed(history),
            exercise_type,
            HEAVY,
            &ProgressionConfig::default(),
        )
    }

    #[test]
    fn test_no_history_variants() {
        let config = ProgressionConfig::default();
        let none = ExerciseHistory::from_sessions(Vec::new());
        assert_eq!(none, ExerciseHistory::NoSessions);
        let rec = recommend(&none, ExerciseType::Isolation, HEAVY, &config);
        assert_eq!(rec.recommended_weight, None);
        assert_eq!(rec.reason.to_string(), "No history - pick your starting weight");

        let empty = ExerciseHistory::from_sessions(vec![None, Some(Vec::new())]);
        assert_eq!(empty, ExerciseHistory::NoSets);
        let rec = recommend(&empty, ExerciseType::Isolation, HEAVY, &config);
        assert_eq!(rec.action, ProgressionAction::Hold);
        assert_eq!(rec.reason, ProgressionReason::NoCompletedSets);
    }

    #[test]
    fn test_pain_rounds_to_plate() {
        let mut sets = vec![set(1, 60.0, 8, None), set(2, 60.0, 8, None)];
        sets[1].pain_flag = true;
        let history = vec![SessionPerformance::new(sets).unwrap()];
        let rec = run(history, ExerciseType::CompoundHeavy);
        assert_eq!(rec.recommended_weight, Some(55.0));
        assert_eq!(rec.action, ProgressionAction::Decrease);
    }

    #[test]
    fn test_stall_beats_increase() {
        let history = vec![
            session(60.0, &[8, 8, 8], None),
            session(60.0, &[8, 8, 7], None),
            session(60.0, &[9, 8, 8], None),
        ];
        let rec = run(history, ExerciseType::CompoundHeavy);
        assert_eq!(rec.recommended_weight, Some(61.25));
        assert_eq!(rec.action, ProgressionAction::MicroProgress);
        assert_eq!(
            rec.reason.to_string(),
            "Stalled for 3 sessions - micro progression (+1.25kg)"
        );
    }

    #[test]
    fn test_two_sessions_never_stall() {
        let history = vec![session(60.0, &[8, 8, 8], None), session(60.0, &[8, 8, 8], None)];
        let rec = run(history, ExerciseType::CompoundHeavy);
        assert_eq!(rec.action, ProgressionAction::Increase);
        assert_eq!(rec.recommended_weight, Some(62.5));
    }

    #[test]
    fn test_below_minimum_decreases_and_clamps() {
        let rec = run(vec![session(2.0, &[5, 4, 8], None)], ExerciseType::CompoundHeavy);
        assert_eq!(rec.recommended_weight, Some(0.0));
        assert_eq!(rec.reason.to_string(), "Multiple sets below 6 reps - reducing weight");
    }

    #[test]
    fn test_high_rpe_decreases() {
        let rec = run(vec![session(40.0, &[10, 10, 10], Some(9.5))], ExerciseType::CompoundPump);
        assert_eq!(rec.recommended_weight, Some(35.0));
        assert_eq!(rec.reason, ProgressionReason::RpeTooHigh);
    }

    #[test]
    fn test_pump_needs_max_reps() {
        let at_max = run(vec![session(40.0, &[10, 11, 10], Some(8.0))], ExerciseType::CompoundPump);
        assert_eq!(at_max.recommended_weight, Some(45.0));

        let short = run(vec![session(40.0, &[10, 9, 10], None)], ExerciseType::Isolation);
        assert_eq!(short.action, ProgressionAction::Hold);
        assert_eq!(short.recommended_weight, Some(40.0));
    }

    #[test]
    fn test_heavy_rpe_ceiling_blocks_increase() {
        let rec = run(vec![session(100.0, &[8, 8, 8], Some(8.0))], ExerciseType::CompoundHeavy);
        assert_eq!(rec.reason, ProgressionReason::NotReady);
    }

    #[test]
    fn test_deload_scaling() {
        let config = ProgressionConfig::default();
        assert_eq!(apply_deload(Some(100.0), &config), Some(60.0));
        assert_eq!(apply_deload(Some(62.5), &config), Some(37.5));
        assert_eq!(apply_deload(None, &config), None);
    }
}
