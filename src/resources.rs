// ABOUTME: Shared service resources bundling storage, collaborators, configuration and clock
// ABOUTME: Created once and passed by reference to every service entry point
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

use crate::config::CoachConfig;
use crate::database_plugins::{DatabaseProvider, InMemoryDatabase};
use crate::external::{FileStorage, MockFileStorage, MockVisionAnalyzer, VisionAnalyzer};
use chrono::{DateTime, NaiveDate, Utc};
use macrocoach_intelligence::IntelligenceConfig;
use std::sync::Arc;

/// Source of "now" for services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Wall clock
    System,
    /// Frozen instant
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Current instant
    #[must_use]
    pub fn now(self) -> DateTime<Utc> {
        match self {
            Self::System => Utc::now(),
            Self::Fixed(at) => at,
        }
    }

    /// Current calendar day in UTC
    #[must_use]
    pub fn today(self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Everything a service call needs besides its arguments
#[derive(Clone)]
pub struct CoachResources {
    /// Persistence
    pub database: Arc<dyn DatabaseProvider>,
    /// AI vision and text collaborator
    pub vision: Arc<dyn VisionAnalyzer>,
    /// Photo storage collaborator
    pub storage: Arc<dyn FileStorage>,
    /// Service defaults
    pub config: Arc<CoachConfig>,
    /// Engine tuning
    pub intelligence: Arc<IntelligenceConfig>,
    /// Time source
    pub clock: Clock,
}

impl CoachResources {
    /// Bundle resources with the system clock
    #[must_use]
    pub fn new(
        database: Arc<dyn DatabaseProvider>,
        vision: Arc<dyn VisionAnalyzer>,
        storage: Arc<dyn FileStorage>,
        config: CoachConfig,
        intelligence: IntelligenceConfig,
    ) -> Self {
        Self {
            database,
            vision,
            storage,
            config: Arc::new(config),
            intelligence: Arc::new(intelligence),
            clock: Clock::System,
        }
    }

    /// In-memory store with mock collaborators and default configuration
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryDatabase::new()),
            Arc::new(MockVisionAnalyzer::default()),
            Arc::new(MockFileStorage::new()),
            CoachConfig::default(),
            IntelligenceConfig::default(),
        )
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Current calendar day
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
