// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::Arc;
use vitals_tracker::config::Config;
use vitals_tracker::db::{FirestoreDb, RemoteStore};
use vitals_tracker::middleware::auth::create_jwt;
use vitals_tracker::mirror::LocalMirror;
use vitals_tracker::models::SessionUser;
use vitals_tracker::repository::ActivityRepository;
use vitals_tracker::routes::create_router;
use vitals_tracker::services::{ActivityTracker, NoopObserver};
use vitals_tracker::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Unique suffix for test isolation against a shared emulator.
#[allow(dead_code)]
pub fn unique_id(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

/// Repository over `store` with an in-memory mirror.
#[allow(dead_code)]
pub fn test_repository(store: Arc<dyn RemoteStore>) -> ActivityRepository {
    ActivityRepository::new(
        store,
        Arc::new(LocalMirror::in_memory()),
        vitals_tracker::config::DEFAULT_HISTORY_DAYS,
    )
}

/// Create a test app over `store`.
#[allow(dead_code)]
pub fn create_test_app_with_store(store: Arc<dyn RemoteStore>) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let tracker = ActivityTracker::new(test_repository(store), None, Arc::new(NoopObserver));

    let state = Arc::new(AppState { config, tracker });
    (create_router(state.clone()), state)
}

/// Create a test app with the offline Firestore mock.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_store(Arc::new(FirestoreDb::new_mock()))
}

#[allow(dead_code)]
pub fn test_user() -> SessionUser {
    SessionUser {
        name: Some("Dewi".to_string()),
        ..SessionUser::new("user-123", "dewi@example.com")
    }
}

/// Session token for `test_user()`.
#[allow(dead_code)]
pub fn create_test_jwt(signing_key: &[u8]) -> String {
    create_jwt(&test_user(), signing_key).expect("Failed to create JWT")
}
