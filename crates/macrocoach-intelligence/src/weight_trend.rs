// ABOUTME: Weight history windowing and percent-change trend extraction
// ABOUTME: Compares the average of the first and last entries in a trailing window of days
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! # Weight Trend Analysis
//!
//! Daily weigh-ins are noisy, so the trend compares the mean of the first
//! `sample_size` entries in the window against the mean of the last
//! `sample_size`. The two samples overlap when the window holds fewer than
//! `2 * sample_size` entries.
//!
//! The weekly rate extrapolates the measured change by entry count rather than
//! calendar days: `change% / max(1, n - 1) * 7`.

use chrono::{Duration, NaiveDate};
use macrocoach_core::models::{UnitSystem, WeightLogEntry};
use serde::{Deserialize, Serialize};

use crate::algorithms::units::{cm_to_inches, kg_to_lbs};
use crate::config::intelligence::TrendConfig;
use crate::rounding::{round_to_hundredth, round_to_tenth};

/// Message returned when the window holds too few entries
pub const INSUFFICIENT_TREND_MESSAGE: &str = "Need at least 3 weight entries in the last 7 days";

/// Entries dated on or after `today - days`, sorted oldest first
#[must_use]
pub fn window_logs(logs: &[WeightLogEntry], today: NaiveDate, days: i64) -> Vec<WeightLogEntry> {
    let start = today - Duration::days(days);
    let mut recent: Vec<WeightLogEntry> = logs
        .iter()
        .filter(|log| log.date >= start)
        .cloned()
        .collect();
    recent.sort_by_key(|log| log.date);
    recent
}

/// Unrounded trend figures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawTrend {
    /// Mean of the earliest sample
    pub avg_first: f64,
    /// Mean of the latest sample
    pub avg_last: f64,
    /// `avg_last - avg_first`
    pub change_kg: f64,
    /// Change relative to `avg_first`, in percent
    pub change_percent: f64,
    /// Change extrapolated to one week, in percent
    pub weekly_change_percent: f64,
    /// Entries in the window
    pub entries_count: usize,
}

fn mean_weight(entries: &[WeightLogEntry]) -> f64 {
    let total: f64 = entries.iter().map(|e| e.weight_kg).sum();
    total / entries.len() as f64
}

/// Compute the trend over already windowed, date-sorted entries
///
/// Returns `None` when fewer than `min_entries` are present.
#[must_use]
pub fn compute_trend(recent: &[WeightLogEntry], config: &TrendConfig) -> Option<RawTrend> {
    let count = recent.len();
    if count < config.min_entries || count == 0 {
        return None;
    }

    let sample = config.sample_size.min(count);
    let avg_first = mean_weight(&recent[..sample]);
    let avg_last = mean_weight(&recent[count - sample..]);
    let change_kg = avg_last - avg_first;
    let change_percent = change_kg / avg_first * 100.0;
    let elapsed = count.saturating_sub(1).max(1) as f64;
    let weekly_change_percent = change_percent / elapsed * 7.0;

    Some(RawTrend {
        avg_first,
        avg_last,
        change_kg,
        change_percent,
        weekly_change_percent,
        entries_count: count,
    })
}

/// Caller-facing weight trend with rounded figures
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightTrend {
    /// Whether the window held enough entries
    pub has_enough_data: bool,
    /// Mean of the first sample, kg to 1 decimal
    pub avg_first_kg: Option<f64>,
    /// Mean of the last sample, kg to 1 decimal
    pub avg_last_kg: Option<f64>,
    /// Change in kg, 2 decimals
    pub change_kg: Option<f64>,
    /// Change in percent, 2 decimals
    pub change_percent: Option<f64>,
    /// Weekly change in percent, 2 decimals
    pub weekly_change_percent: Option<f64>,
    /// Entries in the window
    pub entries_count: usize,
    /// Explanation when data is insufficient
    pub message: Option<String>,
}

impl WeightTrend {
    fn insufficient(entries_count: usize) -> Self {
        Self {
            has_enough_data: false,
            avg_first_kg: None,
            avg_last_kg: None,
            change_kg: None,
            change_percent: None,
            weekly_change_percent: None,
            entries_count,
            message: Some(INSUFFICIENT_TREND_MESSAGE.to_owned()),
        }
    }
}

impl From<RawTrend> for WeightTrend {
    fn from(raw: RawTrend) -> Self {
        Self {
            has_enough_data: true,
            avg_first_kg: Some(round_to_tenth(raw.avg_first)),
            avg_last_kg: Some(round_to_tenth(raw.avg_last)),
            change_kg: Some(round_to_hundredth(raw.change_kg)),
            change_percent: Some(round_to_hundredth(raw.change_percent)),
            weekly_change_percent: Some(round_to_hundredth(raw.weekly_change_percent)),
            entries_count: raw.entries_count,
            message: None,
        }
    }
}

/// Window the logs and summarise the trend
#[must_use]
pub fn weight_trend(logs: &[WeightLogEntry], today: NaiveDate, config: &TrendConfig) -> WeightTrend {
    let recent = window_logs(logs, today, config.window_days);
    compute_trend(&recent, config)
        .map_or_else(|| WeightTrend::insufficient(recent.len()), WeightTrend::from)
}

/// One weigh-in expressed in the user's units
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompositionPoint {
    /// Day
    pub date: NaiveDate,
    /// Weight in `weight_unit`
    pub weight: f64,
    /// "kg" or "lbs"
    pub weight_unit: &'static str,
    /// Waist in `waist_unit`
    pub waist: Option<f64>,
    /// "cm" or "in"
    pub waist_unit: &'static str,
    /// Body fat estimate
    pub body_fat_percent: Option<f64>,
}

/// Start, end and change of one series, 1 decimal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SeriesChange {
    /// First value in the window
    pub start: f64,
    /// Last value in the window
    pub end: f64,
    /// `end - start`
    pub change: f64,
}

/// Weight and body-fat history over a longer window
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BodyCompositionTrend {
    /// Weigh-ins, oldest first
    pub data_points: Vec<CompositionPoint>,
    /// Present with at least two weigh-ins
    pub weight_trend: Option<SeriesChange>,
    /// Present with at least two body-fat estimates
    pub body_fat_trend: Option<SeriesChange>,
}

/// Summarise weight and body-fat change over `days`, in the user's units
#[must_use]
pub fn body_composition_trend(
    logs: &[WeightLogEntry],
    today: NaiveDate,
    days: i64,
    units: UnitSystem,
) -> BodyCompositionTrend {
    let recent = window_logs(logs, today, days);
    let imperial = units == UnitSystem::Imperial;
    let weight_in_units = |kg: f64| {
        if imperial {
            round_to_tenth(kg_to_lbs(kg))
        } else {
            kg
        }
    };

    let data_points = recent
        .iter()
        .map(|log| CompositionPoint {
            date: log.date,
            weight: weight_in_units(log.weight_kg),
            weight_unit: if imperial { "lbs" } else { "kg" },
            waist: log.waist_cm.map(|cm| {
                if imperial {
                    round_to_tenth(cm_to_inches(cm))
                } else {
                    cm
                }
            }),
            waist_unit: if imperial { "in" } else { "cm" },
            body_fat_percent: log.estimated_body_fat_percent,
        })
        .collect();

    let weight_trend = match (recent.first(), recent.last()) {
        (Some(first), Some(last)) if recent.len() >= 2 => {
            let change = last.weight_kg - first.weight_kg;
            let convert = |kg: f64| {
                if imperial {
                    round_to_tenth(kg_to_lbs(kg))
                } else {
                    round_to_tenth(kg)
                }
            };
            Some(SeriesChange {
                start: convert(first.weight_kg),
                end: convert(last.weight_kg),
                change: convert(change),
            })
        }
        _ => None,
    };

    let body_fat: Vec<f64> = recent
        .iter()
        .filter_map(|log| log.estimated_body_fat_percent)
        .collect();
    let body_fat_trend = match body_fat.as_slice() {
        [first, .., last] => Some(SeriesChange {
            start: round_to_tenth(*first),
            end: round_to_tenth(*last),
            change: round_to_tenth(last - first),
        }),
        _ => None,
    };

    BodyCompositionTrend {
        data_points,
        weight_trend,
        body_fat_trend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn entry(date: NaiveDate, weight_kg: f64) -> WeightLogEntry {
        WeightLogEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            date,
            weight_kg,
            waist_cm: None,
            estimated_body_fat_percent: None,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_window_excludes_older_entries_and_sorts() {
        let logs = vec![entry(day(10), 80.0), entry(day(2), 82.0), entry(day(3), 81.0)];
        let recent = window_logs(&logs, day(10), 7);
        let dates: Vec<_> = recent.iter().map(|l| l.date).collect();
        assert_eq!(dates, vec![day(3), day(10)]);
    }

    #[test]
    fn test_overlapping_samples_with_three_entries() {
        let logs = vec![entry(day(8), 80.0), entry(day(9), 79.7), entry(day(10), 79.4)];
        let trend = weight_trend(&logs, day(10), &TrendConfig::default());

        assert!(trend.has_enough_data);
        assert_eq!(trend.entries_count, 3);
        // identical samples when only three entries exist
        assert_eq!(trend.change_kg, Some(0.0));
        assert_eq!(trend.weekly_change_percent, Some(0.0));
    }

    #[test]
    fn test_weekly_extrapolation() {
        let weights = [80.0, 80.0, 80.0, 79.2, 79.2, 79.2];
        let logs: Vec<_> = weights
            .iter()
            .enumerate()
            .map(|(i, w)| entry(day(5 + u32::try_from(i).unwrap()), *w))
            .collect();
        let raw = compute_trend(&window_logs(&logs, day(10), 7), &TrendConfig::default()).unwrap();

        assert!((raw.change_percent - -1.0).abs() < 1e-9);
        assert!((raw.weekly_change_percent - -1.4).abs() < 1e-9);
    }

    #[test]
    fn test_insufficient_data_message() {
        let logs = vec![entry(day(9), 80.0), entry(day(10), 80.1)];
        let trend = weight_trend(&logs, day(10), &TrendConfig::default());
        assert!(!trend.has_enough_data);
        assert_eq!(trend.message.as_deref(), Some(INSUFFICIENT_TREND_MESSAGE));
    }
}
