// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Remote store layer.
//!
//! `RemoteStore` is the boundary the repository talks to. Production uses
//! Firestore; `MemoryStore` backs local development and tests.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{ActivityEntry, ActivityKind, DailySummary, ProfileUpdate, User};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const STEPS: &str = "steps_activity";
    pub const RUNNING: &str = "running_activity";
    pub const WATER: &str = "water_consumption";
    pub const SLEEP: &str = "sleep_records";
    pub const GYM: &str = "gym_sessions";
    pub const FOOD: &str = "food_intake";
    /// One document per user per day, keyed `{user_id}_{date}`
    pub const DAILY_SUMMARY: &str = "daily_activity_summary";
}

/// Document ID of a daily summary row.
pub fn daily_summary_id(user_id: &str, date: &str) -> String {
    format!("{}_{}", urlencoding::encode(user_id), date)
}

/// Request/response operations against the remote store.
///
/// Every method is a single exchange; none retries or times out.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Cheap read used to verify connectivity.
    async fn ping(&self) -> Result<(), AppError>;

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError>;

    /// Insert a new user row. Fails if the row already exists.
    async fn insert_user(&self, user: &User) -> Result<User, AppError>;

    /// Create or replace a user row (conflict key = id).
    async fn upsert_user(&self, user: &User) -> Result<(), AppError>;

    /// Merge profile fields into an existing user row.
    async fn update_profile(&self, user_id: &str, profile: &ProfileUpdate)
        -> Result<(), AppError>;

    /// Append one activity row to its kind's table.
    async fn insert_entry(&self, entry: &ActivityEntry) -> Result<(), AppError>;

    /// Rows of `kind` for `user_id` with `date >= since`, newest first.
    async fn entries_since(
        &self,
        kind: ActivityKind,
        user_id: &str,
        since: &str,
    ) -> Result<Vec<ActivityEntry>, AppError>;

    async fn get_daily_summary(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<Option<DailySummary>, AppError>;

    /// Insert-or-merge the summary row for `(summary.user_id, summary.date)`
    /// in one atomic store operation.
    async fn upsert_daily_summary(&self, summary: &DailySummary) -> Result<(), AppError>;
}
