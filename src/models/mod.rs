// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod entry;
pub mod input;
pub mod summary;
pub mod user;

pub use entry::{
    ActivityEntry, ActivityKind, ActivityRecord, FoodEntry, GymEntry, RunningEntry, SleepEntry,
    StepsEntry, WaterEntry,
};
pub use input::WaterUnit;
pub use summary::{DailySummary, FoodTotals, TodaySnapshot};
pub use user::{ProfileUpdate, SessionUser, User};
