// ABOUTME: Stateless metric/imperial unit conversions applied at the input boundary
// ABOUTME: Pounds to kilograms, feet and inches to centimetres, inches to centimetres and back
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! Everything is stored metric. Imperial input is converted here before it
//! reaches any other component, and converted back only for display.

use macrocoach_core::constants::units::{CM_PER_INCH, INCHES_PER_FOOT, KG_PER_LB};
use serde::{Deserialize, Serialize};

/// Height expressed in feet and inches
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FeetInches {
    /// Whole feet
    pub feet: f64,
    /// Remaining inches
    pub inches: f64,
}

/// Pounds to kilograms
#[must_use]
pub fn lbs_to_kg(lbs: f64) -> f64 {
    lbs * KG_PER_LB
}

/// Kilograms to pounds
#[must_use]
pub fn kg_to_lbs(kg: f64) -> f64 {
    kg / KG_PER_LB
}

/// Feet and inches to centimetres
#[must_use]
pub fn feet_inches_to_cm(feet: f64, inches: f64) -> f64 {
    feet.mul_add(INCHES_PER_FOOT, inches) * CM_PER_INCH
}

/// Centimetres to whole feet and rounded inches
///
/// Inches are rounded after splitting off the feet, so values just below a
/// foot boundary can report 12 inches (e.g. 5 ft 12 in).
#[must_use]
pub fn cm_to_feet_inches(cm: f64) -> FeetInches {
    let total_inches = cm / CM_PER_INCH;
    FeetInches {
        feet: (total_inches / INCHES_PER_FOOT).floor(),
        inches: (total_inches % INCHES_PER_FOOT).round(),
    }
}

/// Inches to centimetres
#[must_use]
pub fn inches_to_cm(inches: f64) -> f64 {
    inches * CM_PER_INCH
}

/// Centimetres to inches
#[must_use]
pub fn cm_to_inches(cm: f64) -> f64 {
    cm / CM_PER_INCH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feet_inches_to_cm() {
        assert!((feet_inches_to_cm(5.0, 11.0) - 180.34).abs() < 1e-9);
        assert!((feet_inches_to_cm(6.0, 0.0) - 182.88).abs() < 1e-9);
    }

    #[test]
    fn test_cm_to_feet_inches_splits_and_rounds() {
        let height = cm_to_feet_inches(180.0);
        assert!((height.feet - 5.0).abs() < f64::EPSILON);
        assert!((height.inches - 11.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pound_conversion_matches_factor() {
        assert!((lbs_to_kg(100.0) - 45.3592).abs() < 1e-9);
        assert!((kg_to_lbs(45.3592) - 100.0).abs() < 1e-9);
    }
}
