// ABOUTME: Core types and constants for the Macrocoach decision engine
// ABOUTME: Foundation crate with error handling, domain models, validation limits, and coercion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

#![deny(unsafe_code)]

//! # Macrocoach Core
//!
//! Foundation crate providing shared types and constants for the Macrocoach
//! nutrition and strength-training engine. This crate is designed to change
//! infrequently, enabling incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `ErrorKind`
//! - **constants**: Energy densities, validation ranges and other fixed values
//! - **models**: Profiles, pantry, meal plans, exercises, sessions and AI analyses
//! - **coercion**: Defensive conversion of untrusted JSON produced by AI collaborators

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Profile, `FoodItem`, `WorkoutSession`, etc.)
pub mod models;

/// Defensive numeric and string coercion for untrusted external payloads
pub mod coercion;
