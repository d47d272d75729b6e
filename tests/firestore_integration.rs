// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (`FIRESTORE_EMULATOR_HOST`). Each test uses fresh user IDs, so a shared
//! emulator needs no reset between runs.

use serde_json::json;
use std::sync::Arc;
use vitals_tracker::db::RemoteStore;
use vitals_tracker::models::{GymEntry, ProfileUpdate, SessionUser, StepsEntry, WaterUnit};

mod common;
use common::{test_db, test_repository, unique_id};

fn session() -> SessionUser {
    let id = unique_id("user");
    SessionUser::new(id.clone(), format!("{}@example.com", id))
}

// ═══════════════════════════════════════════════════════════════════════════
// USER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_ensure_user_creates_then_reuses() {
    require_emulator!();

    let db = Arc::new(test_db().await);
    let repo = test_repository(db.clone());
    let user = session();

    assert!(db.get_user(&user.id).await.unwrap().is_none());

    let created = repo.ensure_user(&user).await.unwrap();
    assert_eq!(created.email, user.email);

    // A second insert would fail; ensure_user must find the row instead.
    let again = repo.ensure_user(&user).await.unwrap();
    assert_eq!(again, created);
    assert!(db.insert_user(&user.to_user()).await.is_err());
}

#[tokio::test]
async fn test_update_profile_merges_fields() {
    require_emulator!();

    let db = Arc::new(test_db().await);
    let repo = test_repository(db.clone());
    let user = SessionUser {
        picture: Some("https://example.com/p.png".to_string()),
        ..session()
    };
    repo.ensure_user(&user).await.unwrap();

    let profile = ProfileUpdate {
        full_name: "Agus Salim".to_string(),
        birthplace: "Medan".to_string(),
        birthdate: "1988-03-21".to_string(),
        blood_type: "AB".to_string(),
        height_cm: 172,
        weight_kg: 74.0,
        phone: "+628777".to_string(),
        has_completed_data: true,
    };
    repo.update_profile(&user.id, &profile).await.unwrap();

    let row = repo.get_profile(&user.id).await.unwrap();
    assert_eq!(row.full_name.as_deref(), Some("Agus Salim"));
    assert_eq!(row.picture.as_deref(), Some("https://example.com/p.png"));
    assert!(row.has_completed_data);
}

#[tokio::test]
async fn test_update_profile_missing_user_is_not_found() {
    require_emulator!();

    let repo = test_repository(Arc::new(test_db().await));
    let profile = ProfileUpdate {
        full_name: "Nobody".to_string(),
        birthplace: "-".to_string(),
        birthdate: "2000-01-01".to_string(),
        blood_type: "O".to_string(),
        height_cm: 1,
        weight_kg: 1.0,
        phone: "0".to_string(),
        has_completed_data: true,
    };

    let err = repo
        .update_profile(&unique_id("missing"), &profile)
        .await
        .unwrap_err();
    assert!(matches!(err, vitals_tracker::error::AppError::NotFound(_)));
}

// ═══════════════════════════════════════════════════════════════════════════
// ACTIVITY TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_activity_rows_round_trip() {
    require_emulator!();

    let repo = test_repository(Arc::new(test_db().await));
    let user = session();

    assert!(repo.save_steps(&user, 1200).await.remote_saved);
    assert!(repo.save_steps(&user, 800).await.remote_saved);
    assert!(repo.save_water(&user, 4.0, WaterUnit::Glass).await.remote_saved);

    let steps = repo.get_range::<StepsEntry>(&user.id, Some(1)).await;
    assert!(steps.success);
    assert_eq!(steps.data.len(), 2);
    assert!(steps.data[0].date >= steps.data[1].date);

    assert_eq!(repo.get_today_steps(&user.id).await.data, 2000);
    assert_eq!(repo.get_today_water(&user.id).await.data, 1.0);
}

#[tokio::test]
async fn test_gym_rows_are_isolated_per_user() {
    require_emulator!();

    let repo = test_repository(Arc::new(test_db().await));
    let alice = session();
    let bob = session();

    let input = vitals_tracker::models::input::GymInput {
        category: "Strength".to_string(),
        exercise_type: "Deadlift".to_string(),
        duration: 45,
    };
    repo.save_gym(&alice, &input).await;
    repo.save_gym(&bob, &input).await;

    let rows: Vec<GymEntry> = repo.get_range::<GymEntry>(&alice.id, None).await.data;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].exercise_type, "Deadlift");
}

// ═══════════════════════════════════════════════════════════════════════════
// DAILY SUMMARY TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_daily_summary_upsert_merges_in_place() {
    require_emulator!();

    let db = Arc::new(test_db().await);
    let repo = test_repository(db.clone());
    let user_id = unique_id("summary");

    let first = json!({"total_steps": 1000, "total_water": 1.5});
    let second = json!({"total_steps": 9000});
    repo.upsert_daily_summary(&user_id, "2026-10-15", first.as_object().unwrap().clone())
        .await
        .unwrap();
    repo.upsert_daily_summary(&user_id, "2026-10-15", second.as_object().unwrap().clone())
        .await
        .unwrap();

    let row = db
        .get_daily_summary(&user_id, "2026-10-15")
        .await
        .unwrap()
        .expect("summary row should exist");
    assert_eq!(row.user_id, user_id);
    assert_eq!(row.fields["total_steps"], 9000);
    assert_eq!(row.fields["total_water"], 1.5);
}
