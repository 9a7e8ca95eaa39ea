// ABOUTME: Integration tests for pantry management and pantry-constrained meal plan generation
// ABOUTME: Covers ownership checks, deterministic allocation, depletion warnings and plan replacement
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors
#![allow(clippy::unwrap_used, clippy::float_cmp)]

mod common;

use common::{new_user, seeded_resources, test_today, user_with_profile};
use macrocoach::auth::Identity;
use macrocoach::resources::CoachResources;
use macrocoach::services::meal_plans::{self, MealPlanRequest};
use macrocoach::services::pantry;
use macrocoach::services::profiles::PROFILE_REQUIRED_MESSAGE;
use macrocoach_core::errors::ErrorCode;
use macrocoach_core::models::{FoodGroup, Goal, PlanStatus};
use macrocoach_intelligence::meal_planner::messages;
use uuid::Uuid;

async fn stock(resources: &CoachResources, identity: Identity, name: &str, grams: f64) -> Uuid {
    let food = resources
        .database
        .find_food_by_name(name)
        .await
        .unwrap()
        .unwrap();
    pantry::add_pantry_item(resources, identity, food.id, grams)
        .await
        .unwrap()
        .id
}

fn three_meals() -> MealPlanRequest {
    MealPlanRequest {
        date: None,
        meals_per_day: Some(3),
    }
}

#[tokio::test]
async fn test_catalogue_is_grouped_in_fixed_order() {
    let resources = seeded_resources().await;
    let catalogue = pantry::food_catalogue(&resources).await.unwrap();

    let groups: Vec<FoodGroup> = catalogue.iter().map(|g| g.group).collect();
    assert_eq!(groups, FoodGroup::ALL.to_vec());
    let total: usize = catalogue.iter().map(|g| g.foods.len()).sum();
    assert_eq!(total, 17);
}

#[tokio::test]
async fn test_adding_the_same_food_twice_overwrites_stock() {
    let resources = seeded_resources().await;
    let identity = new_user();
    let first = stock(&resources, identity, "Rice", 500.0).await;
    let second = stock(&resources, identity, "Rice", 750.0).await;
    assert_eq!(first, second);

    let items = pantry::list_pantry(&resources, identity).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].food.name, "Rice");
    assert_eq!(items[0].stock.grams_available, 750.0);
}

#[tokio::test]
async fn test_pantry_validation_and_ownership() {
    let resources = seeded_resources().await;
    let owner = new_user();
    let stranger = new_user();

    let err = pantry::add_pantry_item(&resources, owner, Uuid::new_v4(), 100.0)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert_eq!(err.message, "Food item not found");

    let stock_id = stock(&resources, owner, "Oats", 400.0).await;
    let err = pantry::update_pantry_item(&resources, owner, stock_id, -1.0)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let err = pantry::update_pantry_item(&resources, stranger, stock_id, 10.0)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);
    let err = pantry::remove_pantry_item(&resources, stranger, stock_id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    pantry::update_pantry_item(&resources, owner, stock_id, 0.0)
        .await
        .unwrap();
    pantry::remove_pantry_item(&resources, owner, stock_id)
        .await
        .unwrap();
    assert!(pantry::list_pantry(&resources, owner).await.unwrap().is_empty());

    let err = pantry::remove_pantry_item(&resources, owner, stock_id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_plan_uses_first_fit_sources_per_meal() {
    let resources = seeded_resources().await;
    let (identity, _) = user_with_profile(&resources, 4, Goal::Cut).await;
    stock(&resources, identity, "Chicken Breast", 2000.0).await;
    stock(&resources, identity, "Tuna", 2000.0).await;
    stock(&resources, identity, "Rice", 2000.0).await;
    stock(&resources, identity, "Olive Oil", 500.0).await;

    let plan = meal_plans::generate(&resources, identity, three_meals())
        .await
        .unwrap();

    assert_eq!(plan.date, test_today());
    assert_eq!(plan.meals.len(), 3);
    for (index, meal) in plan.meals.iter().enumerate() {
        assert_eq!(usize::from(meal.meal_index), index + 1);
        let names: Vec<&str> = meal.items.iter().map(|i| i.food_name.as_str()).collect();
        assert_eq!(names, ["Chicken Breast", "Rice", "Olive Oil"]);
        // 56 g protein per meal at 31 g per 100 g
        assert_eq!(meal.items[0].grams, 181);
        assert_eq!(meal.items[1].grams, 92);
        assert_eq!(meal.items[2].grams, 14);
    }
    assert_eq!(plan.target.kcal, 2108);
    assert_eq!(plan.actual.carbs, 215);
}

#[tokio::test]
async fn test_identical_input_yields_identical_meals() {
    let resources = seeded_resources().await;
    let (identity, _) = user_with_profile(&resources, 5, Goal::LeanBulk).await;
    stock(&resources, identity, "Eggs", 900.0).await;
    stock(&resources, identity, "Greek Yogurt", 1000.0).await;
    stock(&resources, identity, "Oats", 600.0).await;
    stock(&resources, identity, "Potatoes", 3000.0).await;
    stock(&resources, identity, "Almonds", 300.0).await;

    let first = meal_plans::generate(&resources, identity, three_meals())
        .await
        .unwrap();
    let second = meal_plans::generate(&resources, identity, three_meals())
        .await
        .unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.meals, second.meals);
    assert_eq!(first.actual, second.actual);
    assert_eq!(first.warnings, second.warnings);
}

#[tokio::test]
async fn test_regenerating_replaces_the_days_plan() {
    let resources = seeded_resources().await;
    let (identity, _) = user_with_profile(&resources, 4, Goal::Maintain).await;
    stock(&resources, identity, "Chicken Breast", 2000.0).await;
    stock(&resources, identity, "Rice", 2000.0).await;

    meal_plans::generate(&resources, identity, three_meals())
        .await
        .unwrap();
    let latest = meal_plans::generate(
        &resources,
        identity,
        MealPlanRequest {
            date: None,
            meals_per_day: Some(4),
        },
    )
    .await
    .unwrap();

    let stored = meal_plans::meal_plan_for(&resources, identity, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, latest.id);
    assert_eq!(stored.meals.len(), 4);
}

#[tokio::test]
async fn test_depleted_protein_produces_meal_warnings() {
    let resources = seeded_resources().await;
    let (identity, _) = user_with_profile(&resources, 4, Goal::Cut).await;
    stock(&resources, identity, "Chicken Breast", 200.0).await;
    stock(&resources, identity, "Rice", 2000.0).await;

    let plan = meal_plans::generate(&resources, identity, three_meals())
        .await
        .unwrap();

    assert_eq!(plan.status, PlanStatus::Warning);
    assert!(plan
        .warnings
        .iter()
        .any(|w| w == "Meal 2: Not enough protein sources available"));
    assert!(plan
        .warnings
        .iter()
        .any(|w| w == "Meal 3: Not enough protein sources available"));
    assert!(plan.warnings.iter().any(|w| w.starts_with("Protein is")));
    assert_eq!(plan.warning_text, Some(plan.warnings.join("; ")));
    assert!(plan.meals[1].items.iter().all(|i| i.food_name != "Chicken Breast"));
}

#[tokio::test]
async fn test_planning_failures() {
    let resources = seeded_resources().await;

    let err = meal_plans::generate(&resources, new_user(), three_meals())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert_eq!(err.message, PROFILE_REQUIRED_MESSAGE);

    let (identity, _) = user_with_profile(&resources, 4, Goal::Cut).await;
    let err = meal_plans::generate(&resources, identity, three_meals())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PlanningFailed);
    assert_eq!(err.message, messages::EMPTY_PANTRY);

    stock(&resources, identity, "Chicken Breast", 1000.0).await;
    let err = meal_plans::generate(&resources, identity, three_meals())
        .await
        .unwrap_err();
    assert_eq!(err.message, messages::NO_CARBS);

    stock(&resources, identity, "Rice", 1000.0).await;
    let err = meal_plans::generate(
        &resources,
        identity,
        MealPlanRequest {
            date: None,
            meals_per_day: Some(7),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);

    assert!(meal_plans::meal_plan_for(&resources, identity, None)
        .await
        .unwrap()
        .is_none());
}
