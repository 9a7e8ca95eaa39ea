// ABOUTME: Models for AI-produced progress photo analyses and meal estimates
// ABOUTME: Built only through from_untrusted constructors that coerce loosely typed JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::coercion::{label_list, number, number_field, string_list, text_field};

/// Lowest overall physique score
pub const SCORE_MIN: f64 = 1.0;
/// Highest overall physique score
pub const SCORE_MAX: f64 = 10.0;

/// State of the vision analysis attached to a photo
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// Awaiting (re)analysis
    #[default]
    Pending,
    /// Analysis stored
    Complete,
    /// Collaborator failed; no analysis stored
    Failed,
}

/// Muscle assessment produced by the vision collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressPhotoAnalysis {
    /// Overall score in [1, 10]
    pub overall_score: f64,
    /// Normalised labels of muscles needing work
    pub lagging_muscles: Vec<String>,
    /// Normalised labels of well developed muscles
    pub strong_muscles: Vec<String>,
    /// Free-text advice
    pub recommendations: Vec<String>,
}

impl ProgressPhotoAnalysis {
    /// Coerce an untrusted vision payload
    ///
    /// Accepts both `camelCase` and `snake_case` keys. A missing or garbage
    /// score becomes 0 and is then clamped into range.
    #[must_use]
    pub fn from_untrusted(payload: &Value) -> Self {
        let score = payload
            .get("overallScore")
            .or_else(|| payload.get("overall_score"))
            .map_or(0.0, number);
        let labels = |camel: &str, snake: &str| {
            let found = label_list(payload, camel);
            if found.is_empty() {
                label_list(payload, snake)
            } else {
                found
            }
        };

        Self {
            overall_score: score.clamp(SCORE_MIN, SCORE_MAX),
            lagging_muscles: labels("laggingMuscles", "lagging_muscles"),
            strong_muscles: labels("strongMuscles", "strong_muscles"),
            recommendations: string_list(payload, "recommendations"),
        }
    }
}

/// An uploaded progress photo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressPhoto {
    /// Photo identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Day the photo was taken
    pub date: NaiveDate,
    /// Opaque file-storage reference
    pub storage_id: String,
    /// Analysis lifecycle
    pub analysis_status: AnalysisStatus,
    /// Present once analysis completed
    pub analysis: Option<ProgressPhotoAnalysis>,
}

/// Estimate confidence reported by the text/vision model
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Well known foods
    High,
    /// Reasonable guess; used for anything unrecognised
    #[default]
    Medium,
    /// Vague input
    Low,
}

impl Confidence {
    /// Parse a model-reported label, defaulting to `Medium`
    #[must_use]
    pub fn from_label(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("high") => Self::High,
            Some("low") => Self::Low,
            _ => Self::Medium,
        }
    }
}

/// One food inside a meal estimate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstimatedFood {
    /// Food name
    pub name: String,
    /// Whole grams
    pub grams: i64,
    /// Whole kilocalories
    pub calories: i64,
    /// Protein grams, one decimal
    pub protein: f64,
    /// Carbohydrate grams, one decimal
    pub carbs: f64,
    /// Fat grams, one decimal
    pub fat: f64,
}

/// A coerced meal estimate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealEstimate {
    /// Short description
    pub description: String,
    /// Foods identified
    pub items: Vec<EstimatedFood>,
    /// Whole kilocalories
    pub total_calories: i64,
    /// Protein grams, one decimal
    pub total_protein: f64,
    /// Carbohydrate grams, one decimal
    pub total_carbs: f64,
    /// Fat grams, one decimal
    pub total_fat: f64,
    /// Model confidence
    pub confidence: Confidence,
    /// Optional advice
    pub tips: Option<String>,
}

fn whole(value: f64) -> i64 {
    value.round() as i64
}

fn tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl EstimatedFood {
    /// Coerce one untrusted food object
    #[must_use]
    pub fn from_untrusted(item: &Value) -> Self {
        Self {
            name: text_field(item, "name").unwrap_or_else(|| "Unknown".to_owned()),
            grams: whole(number_field(item, "grams")),
            calories: whole(number_field(item, "calories")),
            protein: tenth(number_field(item, "protein")),
            carbs: tenth(number_field(item, "carbs")),
            fat: tenth(number_field(item, "fat")),
        }
    }
}

impl MealEstimate {
    /// Coerce an untrusted meal payload
    #[must_use]
    pub fn from_untrusted(payload: &Value) -> Self {
        let items = payload
            .get("items")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(EstimatedFood::from_untrusted).collect())
            .unwrap_or_default();

        Self {
            description: text_field(payload, "description")
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "Meal".to_owned()),
            items,
            total_calories: whole(number_field(payload, "totalCalories")),
            total_protein: tenth(number_field(payload, "totalProtein")),
            total_carbs: tenth(number_field(payload, "totalCarbs")),
            total_fat: tenth(number_field(payload, "totalFat")),
            confidence: Confidence::from_label(payload.get("confidence")),
            tips: text_field(payload, "tips").filter(|t| !t.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_photo_analysis_clamps_garbage_score() {
        let analysis = ProgressPhotoAnalysis::from_untrusted(&json!({
            "overallScore": "NaN",
            "laggingMuscles": ["Biceps", 3],
        }));
        assert!((analysis.overall_score - SCORE_MIN).abs() < f64::EPSILON);
        assert_eq!(analysis.lagging_muscles, vec!["biceps".to_owned()]);

        let high = ProgressPhotoAnalysis::from_untrusted(&json!({ "overallScore": 42 }));
        assert!((high.overall_score - SCORE_MAX).abs() < f64::EPSILON);
    }

    #[test]
    fn test_meal_estimate_defaults() {
        let estimate = MealEstimate::from_untrusted(&json!({
            "items": [{ "name": "Rice", "grams": "150.6", "calories": null, "protein": 3.44 }],
            "totalCalories": 199.5,
            "confidence": "certain",
        }));

        assert_eq!(estimate.description, "Meal");
        assert_eq!(estimate.confidence, Confidence::Medium);
        assert_eq!(estimate.total_calories, 200);
        assert_eq!(estimate.items[0].grams, 151);
        assert_eq!(estimate.items[0].calories, 0);
        assert!((estimate.items[0].protein - 3.4).abs() < 1e-9);
    }
}
