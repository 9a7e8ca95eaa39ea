// ABOUTME: Integration tests for the personal custom food library
// ABOUTME: Covers name de-duplication, density limits, renames and ownership checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors
#![allow(clippy::unwrap_used, clippy::float_cmp)]

mod common;

use common::{new_user, seeded_resources};
use macrocoach::services::custom_foods::{self, CustomFoodInput, CustomFoodUpdate};
use macrocoach_core::errors::ErrorCode;
use macrocoach_core::models::CustomFoodSource;
use uuid::Uuid;

fn yogurt(name: &str, protein: f64) -> CustomFoodInput {
    CustomFoodInput {
        name: name.to_owned(),
        protein_per_100g: protein,
        carbs_per_100g: 3.6,
        fat_per_100g: 0.4,
        calories_per_100g: 59.0,
        source: CustomFoodSource::Manual,
    }
}

#[tokio::test]
async fn test_saving_same_name_updates_in_place() {
    let resources = seeded_resources().await;
    let identity = new_user();

    let first = custom_foods::save_custom_food(&resources, identity, &yogurt("Greek Yogurt", 10.0))
        .await
        .unwrap();
    let again = custom_foods::save_custom_food(&resources, identity, &yogurt(" greek yogurt ", 9.0))
        .await
        .unwrap();
    assert_eq!(again.id, first.id);
    assert_eq!(again.name, "Greek Yogurt");
    assert_eq!(again.protein_per_100g, 9.0);

    let mut tofu = yogurt("Tofu", 8.0);
    tofu.source = CustomFoodSource::AiLookup;
    custom_foods::save_custom_food(&resources, identity, &tofu)
        .await
        .unwrap();

    let names: Vec<_> = custom_foods::list_custom_foods(&resources, identity)
        .await
        .unwrap()
        .into_iter()
        .map(|food| food.name)
        .collect();
    assert_eq!(names, ["Greek Yogurt", "Tofu"]);

    // libraries are per user
    let other = new_user();
    let theirs = custom_foods::save_custom_food(&resources, other, &yogurt("Greek Yogurt", 10.0))
        .await
        .unwrap();
    assert_ne!(theirs.id, first.id);
}

#[tokio::test]
async fn test_invalid_foods_are_rejected() {
    let resources = seeded_resources().await;
    let identity = new_user();

    let err = custom_foods::save_custom_food(&resources, identity, &yogurt("   ", 10.0))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);

    let err = custom_foods::save_custom_food(&resources, identity, &yogurt("Whey", 120.0))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    assert_eq!(err.context.details["field"], "protein_per_100g");

    let mut oil = yogurt("Oil", 0.0);
    oil.calories_per_100g = 950.0;
    let err = custom_foods::save_custom_food(&resources, identity, &oil)
        .await
        .unwrap_err();
    assert_eq!(err.context.details["field"], "calories_per_100g");

    assert!(custom_foods::list_custom_foods(&resources, identity)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_update_patches_fields_and_guards_names() {
    let resources = seeded_resources().await;
    let identity = new_user();
    let yog = custom_foods::save_custom_food(&resources, identity, &yogurt("Greek Yogurt", 10.0))
        .await
        .unwrap();
    custom_foods::save_custom_food(&resources, identity, &yogurt("Skyr", 11.0))
        .await
        .unwrap();

    let updated = custom_foods::update_custom_food(
        &resources,
        identity,
        yog.id,
        &CustomFoodUpdate {
            calories_per_100g: Some(97.0),
            ..CustomFoodUpdate::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.calories_per_100g, 97.0);
    assert_eq!(updated.protein_per_100g, 10.0);

    // renaming to its own name in another case is allowed
    let renamed = custom_foods::update_custom_food(
        &resources,
        identity,
        yog.id,
        &CustomFoodUpdate {
            name: Some("GREEK YOGURT".to_owned()),
            ..CustomFoodUpdate::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(renamed.name, "GREEK YOGURT");

    let err = custom_foods::update_custom_food(
        &resources,
        identity,
        yog.id,
        &CustomFoodUpdate {
            name: Some("skyr".to_owned()),
            ..CustomFoodUpdate::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert!(err.message.contains("'skyr'"));

    let err = custom_foods::update_custom_food(
        &resources,
        identity,
        yog.id,
        &CustomFoodUpdate {
            fat_per_100g: Some(-1.0),
            ..CustomFoodUpdate::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);

    let stored = custom_foods::list_custom_foods(&resources, identity)
        .await
        .unwrap();
    assert_eq!(stored[0].name, "GREEK YOGURT");
    assert_eq!(stored[0].fat_per_100g, 0.4);
}

#[tokio::test]
async fn test_only_the_owner_can_change_a_food() {
    let resources = seeded_resources().await;
    let owner = new_user();
    let intruder = new_user();
    let food = custom_foods::save_custom_food(&resources, owner, &yogurt("Greek Yogurt", 10.0))
        .await
        .unwrap();

    let err = custom_foods::update_custom_food(
        &resources,
        intruder,
        food.id,
        &CustomFoodUpdate {
            protein_per_100g: Some(50.0),
            ..CustomFoodUpdate::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    let err = custom_foods::delete_custom_food(&resources, intruder, food.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    custom_foods::delete_custom_food(&resources, owner, food.id)
        .await
        .unwrap();
    assert!(custom_foods::list_custom_foods(&resources, owner)
        .await
        .unwrap()
        .is_empty());

    let err = custom_foods::delete_custom_food(&resources, owner, food.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    let err = custom_foods::update_custom_food(
        &resources,
        owner,
        Uuid::new_v4(),
        &CustomFoodUpdate::default(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}
