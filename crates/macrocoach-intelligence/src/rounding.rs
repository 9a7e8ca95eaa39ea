// ABOUTME: Rounding helpers shared by the decision engine
// ABOUTME: Half-away-from-zero rounding to tenths, hundredths and arbitrary plate steps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! All engine rounding is half away from zero (`f64::round`), so `388.5`
//! rounds to `389` and `-0.125` to `-0.13` at two decimals.

/// Round to one decimal place
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places
#[must_use]
pub fn round_to_hundredth(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to the nearest multiple of `step`
///
/// A non-positive step returns the value unchanged.
#[must_use]
pub fn round_to_step(value: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}

/// Round to the nearest whole number as an integer
#[must_use]
pub fn round_to_int(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_away_from_zero() {
        assert_eq!(round_to_int(388.5), 389);
        assert_eq!(round_to_int(-2.5), -3);
        assert!((round_to_tenth(12.25) - 12.3).abs() < 1e-9);
    }

    #[test]
    fn test_round_to_plate_step() {
        assert!((round_to_step(54.0, 2.5) - 55.0).abs() < f64::EPSILON);
        assert!((round_to_step(36.0, 2.5) - 35.0).abs() < f64::EPSILON);
        assert!((round_to_step(36.0, 0.0) - 36.0).abs() < f64::EPSILON);
    }
}
