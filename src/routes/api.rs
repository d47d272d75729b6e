// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::config::MAX_HISTORY_DAYS;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::mirror::UserActivityData;
use crate::models::input::{
    FoodInput, GymInput, ProfileInput, RunningInput, SleepInput, StepsInput, WaterInput,
};
use crate::models::{
    ActivityRecord, DailySummary, FoodEntry, GymEntry, RunningEntry, SleepEntry, StepsEntry,
    TodaySnapshot, User, WaterEntry,
};
use crate::repository::Loaded;
use crate::services::SaveResponse;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/steps", get(history::<StepsEntry>).post(save_steps))
        .route("/api/running", get(history::<RunningEntry>).post(save_running))
        .route("/api/water", get(history::<WaterEntry>).post(save_water))
        .route("/api/sleep", get(history::<SleepEntry>).post(save_sleep))
        .route("/api/gym", get(history::<GymEntry>).post(save_gym))
        .route("/api/food", get(history::<FoodEntry>).post(save_food))
        .route("/api/today", get(get_today))
        .route("/api/profile", get(get_profile).put(save_profile))
        .route("/api/summary/{date}", put(save_summary).get(get_summary))
        .route("/api/mirror", get(get_mirror))
}

// ─── Saves ───────────────────────────────────────────────────

async fn save_steps(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<StepsInput>,
) -> Result<Json<SaveResponse>> {
    let response = state.tracker.save_steps(&user.session(), input).await?;
    Ok(Json(response))
}

async fn save_running(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<RunningInput>,
) -> Result<Json<SaveResponse>> {
    let response = state.tracker.save_running(&user.session(), input).await?;
    Ok(Json(response))
}

async fn save_water(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<WaterInput>,
) -> Result<Json<SaveResponse>> {
    let response = state.tracker.save_water(&user.session(), input).await?;
    Ok(Json(response))
}

async fn save_sleep(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<SleepInput>,
) -> Result<Json<SaveResponse>> {
    let response = state.tracker.save_sleep(&user.session(), input).await?;
    Ok(Json(response))
}

async fn save_gym(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<GymInput>,
) -> Result<Json<SaveResponse>> {
    let response = state.tracker.save_gym(&user.session(), input).await?;
    Ok(Json(response))
}

async fn save_food(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<FoodInput>,
) -> Result<Json<SaveResponse>> {
    let response = state.tracker.save_food(&user.session(), input).await?;
    Ok(Json(response))
}

// ─── Reads ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct HistoryQuery {
    /// Window size in days; the configured default when absent
    days: Option<u32>,
}

/// Rows of one kind from the requested window, newest first.
async fn history<T>(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Loaded<Vec<T>>>>
where
    T: ActivityRecord + Serialize,
{
    let days = match params.days {
        Some(0) => return Err(AppError::BadRequest("days must be at least 1".to_string())),
        Some(days) => Some(days.min(MAX_HISTORY_DAYS)),
        None => None,
    };

    tracing::debug!(user_id = %user.user_id, kind = %T::KIND, ?days, "Fetching history");

    let loaded = state
        .tracker
        .repository()
        .get_range::<T>(&user.user_id, days)
        .await;
    Ok(Json(loaded))
}

async fn get_today(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<TodaySnapshot> {
    Json(
        state
            .tracker
            .repository()
            .load_today_snapshot(&user.user_id)
            .await,
    )
}

/// The caller's local mirror data.
async fn get_mirror(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<UserActivityData> {
    Json(state.tracker.repository().mirror().user_data(&user.email))
}

// ─── Profile ─────────────────────────────────────────────────

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<User>> {
    let profile = state.tracker.repository().get_profile(&user.user_id).await?;
    Ok(Json(profile))
}

async fn save_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<ProfileInput>,
) -> Result<Json<User>> {
    let saved = state.tracker.save_profile(&user.session(), input).await?;
    Ok(Json(saved))
}

// ─── Daily Summary ───────────────────────────────────────────

#[derive(Serialize)]
pub struct SummarySaved {
    pub success: bool,
    pub date: String,
}

async fn save_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<SummarySaved>> {
    state
        .tracker
        .save_summary(&user.user_id, &date, fields)
        .await?;
    Ok(Json(SummarySaved {
        success: true,
        date,
    }))
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> Result<Json<DailySummary>> {
    let summary = state.tracker.get_summary(&user.user_id, &date).await?;
    Ok(Json(summary))
}
