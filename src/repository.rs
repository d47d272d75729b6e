// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity repository: dual writes to the remote store and the local mirror.
//!
//! Writes are local-authoritative and remote-eventual. A remote failure is
//! logged and reported in the `SaveReceipt` but never prevents the mirror
//! write, and nothing here retries.

use chrono::{Local, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::db::RemoteStore;
use crate::error::{AppError, Result};
use crate::mirror::{FoodMirrorEntry, GymMirrorEntry, LocalMirror};
use crate::models::{
    summary, ActivityEntry, ActivityKind, ActivityRecord, DailySummary, FoodEntry, FoodTotals,
    GymEntry, ProfileUpdate, RunningEntry, SessionUser, SleepEntry, StepsEntry, TodaySnapshot,
    User, WaterEntry, WaterUnit,
};
use crate::models::input::{FoodInput, GymInput};
use crate::time_utils::{
    calendar_day, format_utc_rfc3339, start_of_local_day, water_day_key, window_start,
};

/// Outcome of one dual write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveReceipt {
    pub kind: ActivityKind,
    /// Instant stored on both copies
    pub recorded_at: String,
    pub remote_saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror_error: Option<String>,
}

/// Result of a remote read. Failures carry the zero value of `T`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loaded<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Default> Loaded<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    fn failed(error: &AppError) -> Self {
        Self {
            success: false,
            data: T::default(),
            error: Some(error.to_string()),
        }
    }

    fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::failed(&e),
        }
    }
}

/// Keys a summary field may use: identifier-like and not reserved.
fn is_summary_field(key: &str) -> bool {
    let mut chars = key.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !DailySummary::RESERVED.contains(&key)
}

pub struct ActivityRepository {
    store: Arc<dyn RemoteStore>,
    mirror: Arc<LocalMirror>,
    history_days: u32,
}

impl ActivityRepository {
    pub fn new(store: Arc<dyn RemoteStore>, mirror: Arc<LocalMirror>, history_days: u32) -> Self {
        Self {
            store,
            mirror,
            history_days,
        }
    }

    pub fn mirror(&self) -> &LocalMirror {
        &self.mirror
    }

    // ─── Users ───────────────────────────────────────────────────

    /// Make sure a user row exists before activity rows reference it.
    ///
    /// An existing row is returned unchanged.
    pub async fn ensure_user(&self, user: &SessionUser) -> Result<User> {
        if user.id.trim().is_empty() || user.email.trim().is_empty() {
            tracing::error!("Cannot ensure user without id and email");
            return Err(AppError::BadRequest(
                "session user requires id and email".to_string(),
            ));
        }

        match self.store.get_user(&user.id).await {
            Ok(Some(existing)) => return Ok(existing),
            Ok(None) => {}
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "Failed to look up user");
                return Err(e);
            }
        }

        match self.store.insert_user(&user.to_user()).await {
            Ok(created) => {
                tracing::info!(user_id = %user.id, "Created user row");
                Ok(created)
            }
            Err(e) => {
                // A concurrent request may have created the row first.
                if let Ok(Some(existing)) = self.store.get_user(&user.id).await {
                    return Ok(existing);
                }
                tracing::error!(user_id = %user.id, error = %e, "Failed to create user row");
                Err(e)
            }
        }
    }

    // ─── Activity writes ─────────────────────────────────────────

    /// `ensure_user` then insert. Errors are logged and returned as text.
    async fn insert_remote(&self, user: &SessionUser, entry: ActivityEntry) -> Option<String> {
        let kind = entry.kind();
        if let Err(e) = self.ensure_user(user).await {
            tracing::warn!(
                user_id = %user.id,
                kind = %kind,
                error = %e,
                "Skipping remote insert: user row unavailable"
            );
            return Some(e.to_string());
        }

        match self.store.insert_entry(&entry).await {
            Ok(()) => {
                tracing::info!(user_id = %user.id, kind = %kind, "Saved activity to remote store");
                None
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %user.id,
                    kind = %kind,
                    error = %e,
                    "Remote insert failed; keeping local copy"
                );
                Some(e.to_string())
            }
        }
    }

    /// Run a mirror mutation on the blocking pool; sinks may do file I/O.
    async fn write_mirror<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&LocalMirror) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let mirror = Arc::clone(&self.mirror);
        tokio::task::spawn_blocking(move || f(&mirror))
            .await
            .map_err(|e| AppError::Mirror(format!("mirror task failed: {}", e)))?
    }

    fn receipt(
        kind: ActivityKind,
        recorded_at: String,
        remote_error: Option<String>,
        mirror: Result<()>,
    ) -> SaveReceipt {
        let mirror_error = match mirror {
            Ok(()) => None,
            Err(e) => {
                tracing::error!(kind = %kind, error = %e, "Local mirror write failed");
                Some(e.to_string())
            }
        };
        SaveReceipt {
            kind,
            recorded_at,
            remote_saved: remote_error.is_none(),
            remote_error,
            mirror_error,
        }
    }

    pub async fn save_steps(&self, user: &SessionUser, steps: i64) -> SaveReceipt {
        let date = format_utc_rfc3339(Utc::now());
        let entry = StepsEntry {
            user_id: user.id.clone(),
            steps,
            date: date.clone(),
        };

        let remote_error = self.insert_remote(user, entry.into_entry()).await;
        let (email, stamp) = (user.email.clone(), date.clone());
        let mirror = self
            .write_mirror(move |m| m.append_steps(&email, steps, &stamp))
            .await;
        Self::receipt(ActivityKind::Steps, date, remote_error, mirror)
    }

    pub async fn save_running(&self, user: &SessionUser, distance: f64) -> SaveReceipt {
        let date = format_utc_rfc3339(Utc::now());
        let entry = RunningEntry {
            user_id: user.id.clone(),
            distance,
            date: date.clone(),
        };

        let remote_error = self.insert_remote(user, entry.into_entry()).await;
        let (email, stamp) = (user.email.clone(), date.clone());
        let mirror = self
            .write_mirror(move |m| m.append_running(&email, distance, &stamp))
            .await;
        Self::receipt(ActivityKind::Running, date, remote_error, mirror)
    }

    /// Glass amounts are normalized to liters before either write.
    pub async fn save_water(&self, user: &SessionUser, amount: f64, unit: WaterUnit) -> SaveReceipt {
        let now = Utc::now();
        let date = format_utc_rfc3339(now);
        let liters = unit.to_liters(amount);
        let entry = WaterEntry {
            user_id: user.id.clone(),
            amount: liters,
            date: date.clone(),
        };

        let remote_error = self.insert_remote(user, entry.into_entry()).await;
        let day_key = water_day_key(now.with_timezone(&Local).date_naive());
        let email = user.email.clone();
        let mirror = self
            .write_mirror(move |m| m.add_water(&email, liters, &day_key).map(|_| ()))
            .await;
        Self::receipt(ActivityKind::Water, date, remote_error, mirror)
    }

    pub async fn save_sleep(&self, user: &SessionUser, hours: f64) -> SaveReceipt {
        let date = format_utc_rfc3339(Utc::now());
        let entry = SleepEntry {
            user_id: user.id.clone(),
            hours,
            date: date.clone(),
        };

        let remote_error = self.insert_remote(user, entry.into_entry()).await;
        let (email, stamp) = (user.email.clone(), date.clone());
        let mirror = self
            .write_mirror(move |m| m.append_sleep(&email, hours, &stamp))
            .await;
        Self::receipt(ActivityKind::Sleep, date, remote_error, mirror)
    }

    pub async fn save_gym(&self, user: &SessionUser, input: &GymInput) -> SaveReceipt {
        let date = format_utc_rfc3339(Utc::now());
        let entry = GymEntry {
            user_id: user.id.clone(),
            category: input.category.clone(),
            exercise_type: input.exercise_type.clone(),
            duration: input.duration,
            date: date.clone(),
        };

        let remote_error = self.insert_remote(user, entry.into_entry()).await;
        let email = user.email.clone();
        let mirrored = GymMirrorEntry {
            category: input.category.clone(),
            exercise_type: input.exercise_type.clone(),
            duration: input.duration,
            date: date.clone(),
        };
        let mirror = self
            .write_mirror(move |m| m.append_gym(&email, mirrored))
            .await;
        Self::receipt(ActivityKind::Gym, date, remote_error, mirror)
    }

    pub async fn save_food(&self, user: &SessionUser, input: &FoodInput) -> SaveReceipt {
        let date = format_utc_rfc3339(Utc::now());
        let name = input.name.trim().to_string();
        let entry = FoodEntry {
            user_id: user.id.clone(),
            food_name: name.clone(),
            calories: input.calories,
            carbs: input.carbs,
            protein: input.protein,
            fat: input.fat,
            date: date.clone(),
        };

        let remote_error = self.insert_remote(user, entry.into_entry()).await;
        let email = user.email.clone();
        let mirrored = FoodMirrorEntry {
            name,
            calories: input.calories,
            carbs: input.carbs,
            protein: input.protein,
            fat: input.fat,
            date: date.clone(),
        };
        let mirror = self
            .write_mirror(move |m| m.append_food(&email, mirrored))
            .await;
        Self::receipt(ActivityKind::Food, date, remote_error, mirror)
    }

    // ─── Activity reads ──────────────────────────────────────────

    async fn rows_since<T: ActivityRecord>(&self, user_id: &str, since: &str) -> Result<Vec<T>> {
        let rows = self.store.entries_since(T::KIND, user_id, since).await?;
        Ok(rows.into_iter().filter_map(T::from_entry).collect())
    }

    /// Rows from the last `days` days (default window when `None`), newest first.
    pub async fn get_range<T: ActivityRecord>(
        &self,
        user_id: &str,
        days: Option<u32>,
    ) -> Loaded<Vec<T>> {
        let days = days.unwrap_or(self.history_days);
        let since = format_utc_rfc3339(window_start(Utc::now(), days));

        match self.rows_since::<T>(user_id, &since).await {
            Ok(rows) => {
                tracing::debug!(user_id, kind = %T::KIND, days, count = rows.len(), "Loaded history");
                Loaded::ok(rows)
            }
            Err(e) => {
                tracing::error!(user_id, kind = %T::KIND, error = %e, "Failed to load history");
                Loaded::failed(&e)
            }
        }
    }

    async fn today_rows<T: ActivityRecord>(&self, user_id: &str) -> Result<Vec<T>> {
        let since = format_utc_rfc3339(start_of_local_day(Local::now()));
        self.rows_since::<T>(user_id, &since).await.inspect_err(|e| {
            tracing::error!(user_id, kind = %T::KIND, error = %e, "Failed to load today's rows");
        })
    }

    pub async fn get_today_steps(&self, user_id: &str) -> Loaded<i64> {
        Loaded::from_result(
            self.today_rows::<StepsEntry>(user_id)
                .await
                .map(|rows| summary::total_steps(&rows)),
        )
    }

    pub async fn get_today_running(&self, user_id: &str) -> Loaded<f64> {
        Loaded::from_result(
            self.today_rows::<RunningEntry>(user_id)
                .await
                .map(|rows| summary::total_distance(&rows)),
        )
    }

    pub async fn get_today_water(&self, user_id: &str) -> Loaded<f64> {
        Loaded::from_result(
            self.today_rows::<WaterEntry>(user_id)
                .await
                .map(|rows| summary::total_water(&rows)),
        )
    }

    pub async fn get_today_food(&self, user_id: &str) -> Loaded<FoodTotals> {
        Loaded::from_result(
            self.today_rows::<FoodEntry>(user_id)
                .await
                .map(|rows| FoodTotals::from_entries(&rows)),
        )
    }

    /// All four today totals, fetched concurrently.
    pub async fn load_today_snapshot(&self, user_id: &str) -> TodaySnapshot {
        let (steps, running, water, food) = tokio::join!(
            self.get_today_steps(user_id),
            self.get_today_running(user_id),
            self.get_today_water(user_id),
            self.get_today_food(user_id),
        );

        TodaySnapshot {
            steps: steps.data,
            running: running.data,
            water: water.data,
            food: food.data,
        }
    }

    // ─── Daily summary ───────────────────────────────────────────

    pub async fn upsert_daily_summary(
        &self,
        user_id: &str,
        date: &str,
        fields: Map<String, Value>,
    ) -> Result<()> {
        if let Some(bad) = fields.keys().find(|k| !is_summary_field(k)) {
            return Err(AppError::BadRequest(format!(
                "invalid summary field name: {}",
                bad
            )));
        }

        let summary = DailySummary {
            user_id: user_id.to_string(),
            date: date.to_string(),
            updated_at: format_utc_rfc3339(Utc::now()),
            fields,
        };

        self.store
            .upsert_daily_summary(&summary)
            .await
            .inspect(|_| tracing::info!(user_id, date, "Upserted daily summary"))
            .inspect_err(|e| {
                tracing::error!(user_id, date, error = %e, "Failed to upsert daily summary")
            })
    }

    /// Upsert the summary for the current local calendar day.
    pub async fn save_today_summary(&self, user_id: &str, fields: Map<String, Value>) -> Result<()> {
        let today = calendar_day(Local::now().date_naive());
        self.upsert_daily_summary(user_id, &today, fields).await
    }

    pub async fn get_daily_summary(&self, user_id: &str, date: &str) -> Result<Option<DailySummary>> {
        self.store.get_daily_summary(user_id, date).await
    }

    // ─── Profile ─────────────────────────────────────────────────

    pub async fn update_profile(&self, user_id: &str, profile: &ProfileUpdate) -> Result<()> {
        let profile = ProfileUpdate {
            has_completed_data: true,
            ..profile.clone()
        };
        self.store
            .update_profile(user_id, &profile)
            .await
            .inspect(|_| tracing::info!(user_id, "Updated profile"))
            .inspect_err(|e| tracing::error!(user_id, error = %e, "Failed to update profile"))
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<User> {
        self.store
            .get_user(user_id)
            .await
            .inspect_err(|e| tracing::error!(user_id, error = %e, "Failed to load profile"))?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }

    /// Write the full user row merged from the session and the profile form.
    pub async fn save_profile(&self, user: &SessionUser, profile: &ProfileUpdate) -> Result<User> {
        let mut row = match self.store.get_user(&user.id).await {
            Ok(Some(existing)) => existing,
            Ok(None) => user.to_user(),
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "Failed to load user for profile save");
                return Err(e);
            }
        };
        let merged = user.with_profile(profile);
        profile.apply(&mut row);
        row.name = merged.name;
        row.has_completed_data = true;
        if row.picture.is_none() {
            row.picture = merged.picture;
        }
        if row.google_id.is_none() {
            row.google_id = merged.google_id;
            row.is_google_user = merged.is_google_user;
        }

        self.store
            .upsert_user(&row)
            .await
            .inspect_err(|e| tracing::error!(user_id = %user.id, error = %e, "Failed to save profile"))?;
        tracing::info!(user_id = %user.id, "Saved profile");
        Ok(row)
    }

    // ─── Connectivity ────────────────────────────────────────────

    pub async fn check_connection(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => {
                tracing::info!("Remote store reachable");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Remote store unreachable; continuing with local mirror");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_field_names() {
        assert!(is_summary_field("total_steps"));
        assert!(is_summary_field("_internal2"));
        assert!(!is_summary_field(""));
        assert!(!is_summary_field("2fast"));
        assert!(!is_summary_field("a.b"));
        assert!(!is_summary_field("updated_at"));
    }

    #[test]
    fn test_loaded_failure_carries_zero_value() {
        let loaded: Loaded<FoodTotals> = Loaded::failed(&AppError::Database("down".to_string()));
        assert!(!loaded.success);
        assert_eq!(loaded.data, FoodTotals::default());
        assert!(loaded.error.unwrap().contains("down"));
    }
}
