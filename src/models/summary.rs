// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily aggregates: today's totals and the per-day summary row.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{FoodEntry, RunningEntry, StepsEntry, WaterEntry};

/// Summed macros for a set of food entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FoodTotals {
    pub calories: i64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
}

impl FoodTotals {
    /// Calories saturate; rows from other clients are not range checked.
    pub fn from_entries(entries: &[FoodEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut acc, e| {
            acc.calories = acc.calories.saturating_add(e.calories);
            acc.carbs += e.carbs;
            acc.protein += e.protein;
            acc.fat += e.fat;
            acc
        })
    }
}

pub fn total_steps(entries: &[StepsEntry]) -> i64 {
    entries.iter().map(|e| e.steps).fold(0i64, i64::saturating_add)
}

/// Kilometers.
pub fn total_distance(entries: &[RunningEntry]) -> f64 {
    entries.iter().map(|e| e.distance).sum()
}

/// Liters.
pub fn total_water(entries: &[WaterEntry]) -> f64 {
    entries.iter().map(|e| e.amount).sum()
}

/// Today's totals across the four summed kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TodaySnapshot {
    pub steps: i64,
    pub running: f64,
    pub water: f64,
    pub food: FoodTotals,
}

/// One row per user per calendar day.
///
/// Stored at: `daily_activity_summary/{user_id}_{date}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub user_id: String,
    /// Calendar day (`YYYY-MM-DD`)
    pub date: String,
    /// Last update timestamp (ISO 8601)
    #[serde(default)]
    pub updated_at: String,
    /// Caller-defined aggregate fields, stored at top level
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl DailySummary {
    /// Keys owned by the row itself; callers may not overwrite them.
    pub const RESERVED: [&'static str; 3] = ["user_id", "date", "updated_at"];

    /// Merge `fields` into this row; later values win.
    pub fn merge(&mut self, fields: &Map<String, Value>, updated_at: &str) {
        for (key, value) in fields {
            if !Self::RESERVED.contains(&key.as_str()) {
                self.fields.insert(key.clone(), value.clone());
            }
        }
        self.updated_at = updated_at.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn food(calories: i64, carbs: f64, protein: f64, fat: f64) -> FoodEntry {
        FoodEntry {
            user_id: "u".to_string(),
            food_name: "Tempe".to_string(),
            calories,
            carbs,
            protein,
            fat,
            date: "2026-10-15T02:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_food_totals_empty_is_zero() {
        assert_eq!(FoodTotals::from_entries(&[]), FoodTotals::default());
    }

    #[test]
    fn test_food_totals_sum_multiple_rows() {
        let totals = FoodTotals::from_entries(&[food(200, 10.0, 5.0, 2.5), food(350, 40.0, 0.0, 12.0)]);
        assert_eq!(totals.calories, 550);
        assert_eq!(totals.carbs, 50.0);
        assert_eq!(totals.protein, 5.0);
        assert_eq!(totals.fat, 14.5);
    }

    #[test]
    fn test_integer_totals_saturate() {
        let steps = |steps| StepsEntry {
            user_id: "u".to_string(),
            steps,
            date: "2026-10-15T02:00:00.000Z".to_string(),
        };
        assert_eq!(total_steps(&[steps(i64::MAX), steps(1)]), i64::MAX);

        let totals = FoodTotals::from_entries(&[food(i64::MAX, 0.0, 0.0, 0.0), food(5, 1.0, 0.0, 0.0)]);
        assert_eq!(totals.calories, i64::MAX);
        assert_eq!(totals.carbs, 1.0);
    }

    #[test]
    fn test_summary_merge_keeps_reserved_keys() {
        let mut summary = DailySummary {
            user_id: "u".to_string(),
            date: "2026-10-15".to_string(),
            updated_at: String::new(),
            fields: Map::new(),
        };
        let update = json!({"total_steps": 4000, "user_id": "someone-else"});
        summary.merge(update.as_object().unwrap(), "2026-10-15T10:00:00.000Z");

        assert_eq!(summary.user_id, "u");
        assert_eq!(summary.fields.get("total_steps"), Some(&json!(4000)));
        assert!(!summary.fields.contains_key("user_id"));
        assert_eq!(summary.updated_at, "2026-10-15T10:00:00.000Z");
    }

    #[test]
    fn test_summary_flattens_fields() {
        let mut fields = Map::new();
        fields.insert("water_liters".to_string(), json!(1.5));
        let summary = DailySummary {
            user_id: "u".to_string(),
            date: "2026-10-15".to_string(),
            updated_at: "t".to_string(),
            fields,
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["water_liters"], json!(1.5));
        assert_eq!(value["date"], json!("2026-10-15"));
    }
}
