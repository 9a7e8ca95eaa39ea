// ABOUTME: Main library entry point for the Macrocoach service layer
// ABOUTME: Wires persistence, AI collaborators and the decision engine behind async service calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

#![deny(unsafe_code)]

//! # Macrocoach
//!
//! A fitness and nutrition decision engine. Users set up a profile and get
//! calorie and macro targets, log their weight and have those targets
//! recalibrated from the trend, plan meals from what is in their pantry and
//! train through split templates with set-by-set load progression. Progress
//! photos are scored by an AI collaborator and lagging muscles steer which
//! exercises are flagged as priorities.
//!
//! ## Architecture
//!
//! - **`macrocoach_core`**: Models, constants and the unified `AppError`
//! - **`macrocoach_intelligence`**: Pure, synchronous algorithms and their tuning
//! - **services**: Async entry points gating on [`auth::Identity`]
//! - **`database_plugins`**: The `DatabaseProvider` contract and an in-memory store
//! - **external**: Vision and storage collaborator contracts
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use macrocoach::auth::Identity;
//! use macrocoach::resources::CoachResources;
//! use macrocoach::services::profiles;
//! use macrocoach_core::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let resources = CoachResources::in_memory();
//!     macrocoach::seed::seed_all(resources.database.as_ref()).await?;
//!
//!     let profile = profiles::get_profile(&resources, Identity::user(uuid::Uuid::new_v4())).await?;
//!     println!("Profile present: {}", profile.is_some());
//!     Ok(())
//! }
//! ```

/// Caller identity and ownership checks
pub mod auth;

/// Environment configuration
pub mod config;

/// Persistence contract and providers
pub mod database_plugins;

/// AI vision and file storage collaborators
pub mod external;

/// Structured logging setup
pub mod logging;

/// Shared resources passed to services
pub mod resources;

/// Reference data seeding
pub mod seed;

/// Service entry points
pub mod services;

pub use macrocoach_core::errors;
pub use macrocoach_core::models;
