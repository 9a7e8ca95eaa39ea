// ABOUTME: Deterministic collaborator doubles with canned responses and switchable failure
// ABOUTME: Used by integration tests and the CLI when no AI backend is configured
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

use super::{FileStorage, MealEstimateRequest, VisionAnalyzer};
use async_trait::async_trait;
use macrocoach_core::errors::{AppError, AppResult};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Mock vision collaborator (no model calls)
#[derive(Debug)]
pub struct MockVisionAnalyzer {
    physique: RwLock<Value>,
    meal: RwLock<Value>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockVisionAnalyzer {
    /// Create a mock answering with `physique` and `meal` payloads
    #[must_use]
    pub fn new(physique: Value, meal: Value) -> Self {
        Self {
            physique: RwLock::new(physique),
            meal: RwLock::new(meal),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Replace the physique payload
    pub async fn set_physique(&self, payload: Value) {
        *self.physique.write().await = payload;
    }

    /// Make every subsequent call fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of calls received
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::external_service("vision", "model unavailable"));
        }
        Ok(())
    }
}

impl Default for MockVisionAnalyzer {
    fn default() -> Self {
        Self::new(
            json!({
                "overallScore": 6.5,
                "laggingMuscles": ["rear_delts", "calves"],
                "strongMuscles": ["quads"],
                "recommendations": ["Add rear delt volume"]
            }),
            json!({
                "description": "Chicken and rice",
                "items": [
                    {"name": "Chicken Breast", "grams": 150, "calories": 248,
                     "protein": 46.5, "carbs": 0, "fat": 5.4},
                    {"name": "Rice", "grams": 200, "calories": 260,
                     "protein": 5.4, "carbs": 56.0, "fat": 0.6}
                ],
                "totalCalories": 508,
                "totalProtein": 51.9,
                "totalCarbs": 56.0,
                "totalFat": 6.0,
                "confidence": "high"
            }),
        )
    }
}

#[async_trait]
impl VisionAnalyzer for MockVisionAnalyzer {
    async fn analyze_physique(&self, _image_url: &str) -> AppResult<Value> {
        self.record_call()?;
        Ok(self.physique.read().await.clone())
    }

    async fn estimate_meal(&self, _request: &MealEstimateRequest) -> AppResult<Value> {
        self.record_call()?;
        Ok(self.meal.read().await.clone())
    }
}

/// Mock storage resolving registered ids to fake URLs
#[derive(Debug, Clone, Default)]
pub struct MockFileStorage {
    urls: Arc<RwLock<HashMap<String, String>>>,
}

impl MockFileStorage {
    /// Create an empty storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stored object and return its storage id
    pub async fn store(&self, file_name: &str) -> String {
        let storage_id = Uuid::new_v4().to_string();
        self.urls.write().await.insert(
            storage_id.clone(),
            format!("https://storage.invalid/{storage_id}/{file_name}"),
        );
        storage_id
    }
}

#[async_trait]
impl FileStorage for MockFileStorage {
    async fn generate_upload_url(&self) -> AppResult<String> {
        Ok(format!("https://storage.invalid/upload/{}", Uuid::new_v4()))
    }

    async fn resolve_url(&self, storage_id: &str) -> AppResult<Option<String>> {
        Ok(self.urls.read().await.get(storage_id).cloned())
    }

    async fn delete(&self, storage_id: &str) -> AppResult<()> {
        self.urls.write().await.remove(storage_id);
        Ok(())
    }
}
