// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity entry models, one remote table per kind.
//!
//! Entries are append-only: written once at save time and never mutated.
//! `date` is always an RFC3339 UTC instant from `time_utils::format_utc_rfc3339`.

use crate::db::collections;
use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// The six tracked activity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Steps,
    Running,
    Water,
    Sleep,
    Gym,
    Food,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 6] = [
        ActivityKind::Steps,
        ActivityKind::Running,
        ActivityKind::Water,
        ActivityKind::Sleep,
        ActivityKind::Gym,
        ActivityKind::Food,
    ];

    /// Remote table holding entries of this kind.
    pub fn collection(self) -> &'static str {
        match self {
            ActivityKind::Steps => collections::STEPS,
            ActivityKind::Running => collections::RUNNING,
            ActivityKind::Water => collections::WATER,
            ActivityKind::Sleep => collections::SLEEP,
            ActivityKind::Gym => collections::GYM,
            ActivityKind::Food => collections::FOOD,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Steps => "steps",
            ActivityKind::Running => "running",
            ActivityKind::Water => "water",
            ActivityKind::Sleep => "sleep",
            ActivityKind::Gym => "gym",
            ActivityKind::Food => "food",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deserialize a numeric column, treating `null` as zero.
fn zero_if_null<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StepsEntry {
    pub user_id: String,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub steps: i64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RunningEntry {
    pub user_id: String,
    /// Kilometers
    #[serde(default, deserialize_with = "zero_if_null")]
    pub distance: f64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WaterEntry {
    pub user_id: String,
    /// Liters, already normalized from glasses
    #[serde(default, deserialize_with = "zero_if_null")]
    pub amount: f64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SleepEntry {
    pub user_id: String,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub hours: f64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GymEntry {
    pub user_id: String,
    /// Free-form category from the selection UI
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub exercise_type: String,
    /// Minutes
    #[serde(default, deserialize_with = "zero_if_null")]
    pub duration: i64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FoodEntry {
    pub user_id: String,
    #[serde(default)]
    pub food_name: String,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub calories: i64,
    /// Grams
    #[serde(default, deserialize_with = "zero_if_null")]
    pub carbs: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub protein: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub fat: f64,
    pub date: String,
}

/// Any activity row, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityEntry {
    Steps(StepsEntry),
    Running(RunningEntry),
    Water(WaterEntry),
    Sleep(SleepEntry),
    Gym(GymEntry),
    Food(FoodEntry),
}

impl ActivityEntry {
    pub fn kind(&self) -> ActivityKind {
        match self {
            ActivityEntry::Steps(_) => ActivityKind::Steps,
            ActivityEntry::Running(_) => ActivityKind::Running,
            ActivityEntry::Water(_) => ActivityKind::Water,
            ActivityEntry::Sleep(_) => ActivityKind::Sleep,
            ActivityEntry::Gym(_) => ActivityKind::Gym,
            ActivityEntry::Food(_) => ActivityKind::Food,
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            ActivityEntry::Steps(e) => &e.user_id,
            ActivityEntry::Running(e) => &e.user_id,
            ActivityEntry::Water(e) => &e.user_id,
            ActivityEntry::Sleep(e) => &e.user_id,
            ActivityEntry::Gym(e) => &e.user_id,
            ActivityEntry::Food(e) => &e.user_id,
        }
    }

    pub fn date(&self) -> &str {
        match self {
            ActivityEntry::Steps(e) => &e.date,
            ActivityEntry::Running(e) => &e.date,
            ActivityEntry::Water(e) => &e.date,
            ActivityEntry::Sleep(e) => &e.date,
            ActivityEntry::Gym(e) => &e.date,
            ActivityEntry::Food(e) => &e.date,
        }
    }
}

/// A typed activity row that can travel through the untyped store boundary.
pub trait ActivityRecord: Clone + Send + Sync + Sized + 'static {
    const KIND: ActivityKind;

    fn into_entry(self) -> ActivityEntry;

    /// `None` when the entry belongs to another kind.
    fn from_entry(entry: ActivityEntry) -> Option<Self>;
}

macro_rules! impl_activity_record {
    ($ty:ty, $variant:ident) => {
        impl ActivityRecord for $ty {
            const KIND: ActivityKind = ActivityKind::$variant;

            fn into_entry(self) -> ActivityEntry {
                ActivityEntry::$variant(self)
            }

            fn from_entry(entry: ActivityEntry) -> Option<Self> {
                match entry {
                    ActivityEntry::$variant(e) => Some(e),
                    _ => None,
                }
            }
        }
    };
}

impl_activity_record!(StepsEntry, Steps);
impl_activity_record!(RunningEntry, Running);
impl_activity_record!(WaterEntry, Water);
impl_activity_record!(SleepEntry, Sleep);
impl_activity_record!(GymEntry, Gym);
impl_activity_record!(FoodEntry, Food);
