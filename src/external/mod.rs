// ABOUTME: External collaborator contracts for AI vision analysis and file storage
// ABOUTME: Async traits consumed by the photo and meal estimate services, plus test doubles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! External Collaborators
//!
//! The vision collaborator returns loosely typed JSON. Services never trust
//! its shape and always coerce it through the `from_untrusted` constructors
//! in `macrocoach_core::models`. Collaborator calls are single bounded
//! requests; failures surface as `ExternalServiceError` and are not retried.

use async_trait::async_trait;
use macrocoach_core::errors::AppResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canned collaborators for tests and offline runs
pub mod mock;

pub use mock::{MockFileStorage, MockVisionAnalyzer};

/// What the meal estimator is asked to look at
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MealEstimateRequest {
    /// A stored meal photo
    Photo {
        /// Resolved image URL
        image_url: String,
    },
    /// A free-text meal description
    Description {
        /// What the user ate
        text: String,
    },
}

/// AI vision and text model
#[async_trait]
pub trait VisionAnalyzer: Send + Sync {
    /// Assess a progress photo; expected keys include `overallScore` and `laggingMuscles`
    async fn analyze_physique(&self, image_url: &str) -> AppResult<Value>;

    /// Estimate foods and macros in a meal; expected keys include `items` and `totalCalories`
    async fn estimate_meal(&self, request: &MealEstimateRequest) -> AppResult<Value>;
}

/// Object storage for uploaded photos
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Create a one-time upload URL
    async fn generate_upload_url(&self) -> AppResult<String>;

    /// Resolve an opaque storage id to a retrievable URL
    async fn resolve_url(&self, storage_id: &str) -> AppResult<Option<String>>;

    /// Remove a stored object; unknown ids are ignored
    async fn delete(&self, storage_id: &str) -> AppResult<()>;
}
