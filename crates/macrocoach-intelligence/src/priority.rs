// ABOUTME: Propagates lagging-muscle labels from photo analysis into training template priority flags
// ABOUTME: Fixed group-to-muscle and muscle-to-exercise tables with change-only patch planning
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! # Priority Propagation
//!
//! Labels arrive either as coarse groups (`"chest"`) or as specific muscle
//! codes (`"chest_upper"`). Groups expand through [`MUSCLE_GROUP_MAPPING`],
//! anything else is treated as a specific muscle and looked up directly in
//! [`MUSCLE_TO_EXERCISES`]. Unknown labels contribute nothing.
//!
//! Planning returns only the entries whose flag actually changes, so applying
//! the same labels twice patches nothing the second time.

use std::collections::{HashMap, HashSet};

use macrocoach_core::models::TrainingTemplateEntry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Specific muscle code to the exercises that train it
pub const MUSCLE_TO_EXERCISES: &[(&str, &[&str])] = &[
    (
        "chest_mid",
        &["Flat Barbell Bench Press", "Dumbbell Bench Press", "Machine Chest Press"],
    ),
    (
        "chest_upper",
        &["Incline Barbell Press", "Incline Dumbbell Press", "Incline DB Fly"],
    ),
    ("chest_inner", &["Cable Crossover", "Pec Deck Fly"]),
    (
        "delts_front",
        &["DB Shoulder Press", "Barbell Overhead Press", "Machine Shoulder Press"],
    ),
    ("delts_side", &["Lateral Raises", "Cable Lateral Raises"]),
    ("delts_rear", &["Face Pulls", "Rear Delt Fly"]),
    ("lats", &["Lat Pulldown", "Pullups", "Single Arm DB Row"]),
    (
        "mid_back",
        &["Barbell Row", "Seated Cable Row", "T-Bar Row", "Machine Row"],
    ),
    ("lower_back", &["Deadlift", "Romanian Deadlift"]),
    ("biceps", &["Barbell Curl", "Dumbbell Curl", "Cable Curl"]),
    ("biceps_short_head", &["Preacher Curl"]),
    ("brachialis", &["Hammer Curl"]),
    ("triceps_all", &["Weighted Dips", "Skull Crushers"]),
    ("triceps_lateral", &["Tricep Pushdown"]),
    (
        "triceps_long_head",
        &["Overhead Tricep Extension", "Dumbbell Tricep Extension"],
    ),
    (
        "quads",
        &[
            "Barbell Squat",
            "Leg Press",
            "Hack Squat",
            "Goblet Squat",
            "Leg Extension",
            "Bulgarian Split Squat",
            "Walking Lunges",
        ],
    ),
    ("hamstrings", &["Romanian Deadlift", "Dumbbell RDL", "Leg Curl"]),
    ("glutes", &["Hip Thrust", "Bulgarian Split Squat"]),
    ("calves", &["Calf Raises"]),
    ("calves_soleus", &["Seated Calf Raises"]),
    ("abs", &["Cable Crunch", "Ab Wheel Rollout"]),
    ("abs_lower", &["Hanging Leg Raise"]),
];

/// Coarse group label to specific muscle codes
pub const MUSCLE_GROUP_MAPPING: &[(&str, &[&str])] = &[
    ("chest", &["chest_mid", "chest_upper", "chest_inner"]),
    ("shoulders", &["delts_front", "delts_side"]),
    ("rear_delts", &["delts_rear"]),
    ("back", &["lats", "mid_back", "lower_back"]),
    ("biceps", &["biceps", "biceps_short_head", "brachialis"]),
    ("triceps", &["triceps_all", "triceps_lateral", "triceps_long_head"]),
    ("quads", &["quads"]),
    ("hamstrings", &["hamstrings"]),
    ("glutes", &["glutes"]),
    ("calves", &["calves", "calves_soleus"]),
    ("abs", &["abs", "abs_lower"]),
];

type LabelTable = &'static [(&'static str, &'static [&'static str])];

fn lookup(table: LabelTable, key: &str) -> Option<&'static [&'static str]> {
    table
        .iter()
        .find(|(label, _)| *label == key)
        .map(|(_, values)| *values)
}

/// Expand a label into specific muscle codes
///
/// Group labels expand to their members. Anything else is returned as-is.
#[must_use]
pub fn expand_muscle_label(label: &str) -> Vec<&str> {
    lookup(MUSCLE_GROUP_MAPPING, label).map_or_else(|| vec![label], <[&str]>::to_vec)
}

/// Exercise names for a set of labels, in table order, without duplicates
#[must_use]
pub fn exercises_for_muscles<S: AsRef<str>>(labels: &[S]) -> Vec<&'static str> {
    let mut seen = HashSet::new();
    let mut exercises = Vec::new();
    for label in labels {
        for muscle in expand_muscle_label(label.as_ref()) {
            for name in lookup(MUSCLE_TO_EXERCISES, muscle).unwrap_or_default() {
                if seen.insert(*name) {
                    exercises.push(*name);
                }
            }
        }
    }
    exercises
}

/// A single template flag write
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriorityChange {
    /// Template entry to patch
    pub entry_id: Uuid,
    /// New flag value
    pub is_priority: bool,
}

/// Intended template writes for one propagation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriorityPlan {
    /// Exercises flagged, in table order
    pub exercises_prioritized: Vec<String>,
    /// Entries whose flag changes
    pub changes: Vec<PriorityChange>,
}

/// Compute the flag changes needed for `lagging_muscles` over one split
///
/// `exercise_names` resolves entry exercise ids to catalogue names. Entries
/// whose exercise is unknown are left untouched.
#[must_use]
pub fn plan_priority_changes<S: AsRef<str>>(
    entries: &[TrainingTemplateEntry],
    exercise_names: &HashMap<Uuid, String>,
    lagging_muscles: &[S],
) -> PriorityPlan {
    let prioritized = exercises_for_muscles(lagging_muscles);
    let wanted: HashSet<&str> = prioritized.iter().copied().collect();

    let changes = entries
        .iter()
        .filter_map(|entry| {
            let name = exercise_names.get(&entry.exercise_id)?;
            let should_prioritize = wanted.contains(name.as_str());
            (entry.is_priority != should_prioritize).then_some(PriorityChange {
                entry_id: entry.id,
                is_priority: should_prioritize,
            })
        })
        .collect();

    PriorityPlan {
        exercises_prioritized: prioritized.into_iter().map(str::to_owned).collect(),
        changes,
    }
}

/// Clear every flag in a split unconditionally
#[must_use]
pub fn plan_priority_reset(entries: &[TrainingTemplateEntry]) -> Vec<PriorityChange> {
    entries
        .iter()
        .map(|entry| PriorityChange {
            entry_id: entry.id,
            is_priority: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(exercise_id: Uuid, is_priority: bool) -> TrainingTemplateEntry {
        TrainingTemplateEntry {
            id: Uuid::new_v4(),
            day_index: 1,
            total_days: 5,
            day_name: "Push".into(),
            exercise_id,
            sequence: 1,
            sets_count: 3,
            target_reps_min: 8,
            target_reps_max: 12,
            is_priority,
        }
    }

    #[test]
    fn test_group_and_specific_labels_expand() {
        assert_eq!(expand_muscle_label("rear_delts"), vec!["delts_rear"]);
        assert_eq!(expand_muscle_label("chest_upper"), vec!["chest_upper"]);
        assert_eq!(
            exercises_for_muscles(&["chest_upper", "rear_delts"]),
            vec![
                "Incline Barbell Press",
                "Incline Dumbbell Press",
                "Incline DB Fly",
                "Face Pulls",
                "Rear Delt Fly"
            ]
        );
        assert!(exercises_for_muscles(&["forearms"]).is_empty());
    }

    #[test]
    fn test_overlapping_muscles_deduplicate() {
        let names = exercises_for_muscles(&["hamstrings", "back"]);
        let rdl = names.iter().filter(|n| **n == "Romanian Deadlift").count();
        assert_eq!(rdl, 1);
    }

    #[test]
    fn test_only_changed_entries_are_patched() {
        let face_pulls = Uuid::new_v4();
        let bench = Uuid::new_v4();
        let names = HashMap::from([
            (face_pulls, "Face Pulls".to_owned()),
            (bench, "Flat Barbell Bench Press".to_owned()),
        ]);
        let already = entry(face_pulls, true);
        let stale = entry(bench, true);
        let plan = plan_priority_changes(&[already, stale.clone()], &names, &["rear_delts"]);

        assert_eq!(
            plan.changes,
            vec![PriorityChange {
                entry_id: stale.id,
                is_priority: false
            }]
        );
    }

    #[test]
    fn test_entries_with_unknown_exercises_are_skipped() {
        let face_pulls = Uuid::new_v4();
        let names = HashMap::from([(face_pulls, "Face Pulls".to_owned())]);
        let orphan = entry(Uuid::new_v4(), true);
        let wanted = entry(face_pulls, false);
        let plan = plan_priority_changes(&[orphan, wanted.clone()], &names, &["rear_delts"]);

        assert_eq!(
            plan.changes,
            vec![PriorityChange {
                entry_id: wanted.id,
                is_priority: true
            }]
        );
    }
}
