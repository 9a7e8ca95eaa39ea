// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides seeded in-memory resources, fixed clocks and profile fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `macrocoach`

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use macrocoach::auth::Identity;
use macrocoach::config::{CoachConfig, IntelligenceConfig};
use macrocoach::database_plugins::InMemoryDatabase;
use macrocoach::external::{MockFileStorage, MockVisionAnalyzer};
use macrocoach::resources::{Clock, CoachResources};
use macrocoach::seed;
use macrocoach::services::profiles::{self, HeightInput, ProfileInput};
use macrocoach_core::models::{Goal, Profile, Sex, UnitSystem};
use std::sync::{Arc, Once};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Noon UTC on a calendar day
pub fn noon(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
}

/// Reference "today" used by every test
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

/// Shift the clock of shared resources without copying the store
pub fn at_day(resources: &CoachResources, date: NaiveDate) -> CoachResources {
    resources.clone().with_clock(Clock::Fixed(noon(date)))
}

/// `days` after `test_today`
pub fn days_later(days: i64) -> NaiveDate {
    test_today() + Duration::days(days)
}

/// Seeded in-memory resources with a fixed clock and mock collaborators
pub async fn seeded_resources() -> CoachResources {
    let (resources, _, _) = seeded_resources_with_mocks().await;
    resources
}

/// Seeded resources plus handles to the collaborator doubles
pub async fn seeded_resources_with_mocks(
) -> (CoachResources, Arc<MockVisionAnalyzer>, Arc<MockFileStorage>) {
    init_test_logging();
    let vision = Arc::new(MockVisionAnalyzer::default());
    let storage = Arc::new(MockFileStorage::new());
    let resources = CoachResources::new(
        Arc::new(InMemoryDatabase::new()),
        vision.clone(),
        storage.clone(),
        CoachConfig::default(),
        IntelligenceConfig::default(),
    )
    .with_clock(Clock::Fixed(noon(test_today())));
    seed::seed_all(resources.database.as_ref()).await.unwrap();
    (resources, vision, storage)
}

/// A fresh signed-in user
pub fn new_user() -> Identity {
    Identity::user(Uuid::new_v4())
}

/// Metric profile form for a 30 year old man, 180 cm, 80 kg
pub fn metric_input(training_days_per_week: u8, goal: Goal) -> ProfileInput {
    ProfileInput {
        unit_system: UnitSystem::Metric,
        sex: Sex::Male,
        age: 30,
        height: HeightInput::Centimeters { value: 180.0 },
        weight: 80.0,
        waist: None,
        neck: None,
        hips: None,
        training_days_per_week,
        goal,
    }
}

/// Create a profile for a new user and return both
pub async fn user_with_profile(
    resources: &CoachResources,
    training_days_per_week: u8,
    goal: Goal,
) -> (Identity, Profile) {
    let identity = new_user();
    let profile = profiles::create_profile(
        resources,
        identity,
        &metric_input(training_days_per_week, goal),
    )
    .await
    .unwrap();
    (identity, profile)
}
