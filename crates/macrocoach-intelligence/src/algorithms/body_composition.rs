// ABOUTME: Navy-method body-fat estimation from circumference measurements
// ABOUTME: Closed-form estimate with fixed fallbacks for unusable inputs and sex-specific clamps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! # U.S. Navy Circumference Method
//!
//! - Male: `495 / (1.0324 - 0.19077 log10(waist - neck) + 0.15456 log10(height)) - 450`
//! - Female: `495 / (1.29579 - 0.35004 log10(waist + hips - neck) + 0.22100 log10(height)) - 450`
//!
//! Reference: Hodgdon, J.A. & Beckett, M.B. (1984). Prediction of percent body fat
//! for U.S. Navy men and women from body circumferences and height.
//! Naval Health Research Center Report No. 84-11.

use macrocoach_core::models::Sex;

use crate::rounding::round_to_tenth;

/// Returned for men when waist does not exceed neck
pub const MALE_FALLBACK_PERCENT: f64 = 15.0;
/// Returned for women without hips or with a non-positive girth sum
pub const FEMALE_FALLBACK_PERCENT: f64 = 25.0;
/// Male result bounds
pub const MALE_RANGE: (f64, f64) = (3.0, 50.0);
/// Female result bounds
pub const FEMALE_RANGE: (f64, f64) = (8.0, 55.0);

/// Estimate body fat percentage, rounded to one decimal
///
/// Never fails: inputs the formula cannot use yield the documented fallback.
#[must_use]
pub fn estimate_body_fat(
    sex: Sex,
    waist_cm: f64,
    neck_cm: f64,
    height_cm: f64,
    hips_cm: Option<f64>,
) -> f64 {
    match sex {
        Sex::Male => {
            let girth = waist_cm - neck_cm;
            if girth <= 0.0 {
                return MALE_FALLBACK_PERCENT;
            }
            let girth_term = 0.190_77 * girth.log10();
            let height_term = 0.154_56 * height_cm.log10();
            let density = 1.0324 - girth_term + height_term;
            clamp_and_round(495.0 / density - 450.0, MALE_RANGE)
        }
        Sex::Female => {
            let Some(hips) = hips_cm else {
                return FEMALE_FALLBACK_PERCENT;
            };
            let girth = waist_cm + hips - neck_cm;
            if girth <= 0.0 {
                return FEMALE_FALLBACK_PERCENT;
            }
            let girth_term = 0.350_04 * girth.log10();
            let height_term = 0.221_00 * height_cm.log10();
            let density = 1.295_79 - girth_term + height_term;
            clamp_and_round(495.0 / density - 450.0, FEMALE_RANGE)
        }
    }
}

fn clamp_and_round(percent: f64, (min, max): (f64, f64)) -> f64 {
    let rounded = round_to_tenth(percent);
    if rounded.is_nan() {
        return min;
    }
    rounded.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_male_estimate_in_expected_band() {
        // 85 cm waist, 38 cm neck, 180 cm tall is roughly 17-18 %
        let bf = estimate_body_fat(Sex::Male, 85.0, 38.0, 180.0, None);
        assert!((15.0..=20.0).contains(&bf), "got {bf}");
    }

    #[test]
    fn test_male_fallback_when_neck_exceeds_waist() {
        let bf = estimate_body_fat(Sex::Male, 38.0, 40.0, 180.0, None);
        assert!((bf - MALE_FALLBACK_PERCENT).abs() < f64::EPSILON);
    }

    #[test]
    fn test_female_fallback_without_hips() {
        let bf = estimate_body_fat(Sex::Female, 75.0, 32.0, 165.0, None);
        assert!((bf - FEMALE_FALLBACK_PERCENT).abs() < f64::EPSILON);
    }

    #[test]
    fn test_results_are_clamped() {
        let lean = estimate_body_fat(Sex::Male, 60.0, 59.0, 200.0, None);
        assert!((lean - MALE_RANGE.0).abs() < f64::EPSILON);

        let high = estimate_body_fat(Sex::Female, 190.0, 25.0, 100.0, Some(190.0));
        assert!((high - FEMALE_RANGE.1).abs() < f64::EPSILON);
    }
}
