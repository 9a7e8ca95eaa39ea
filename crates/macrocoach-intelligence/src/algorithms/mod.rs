// ABOUTME: Closed-form measurement algorithms used at the input boundary
// ABOUTME: Metric/imperial unit conversion and Navy-method body-fat estimation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

/// Stateless metric/imperial conversions
pub mod units;

/// Navy-method body-fat estimation
pub mod body_composition;

pub use body_composition::estimate_body_fat;
pub use units::{
    cm_to_feet_inches, cm_to_inches, feet_inches_to_cm, inches_to_cm, kg_to_lbs, lbs_to_kg,
    FeetInches,
};
