// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shape of the persisted mirror document.
//!
//! One document per installation, keyed by user email. The JSON layout is
//! shared with the browser front end, hence the camelCase gym fields.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::ActivityKind;
use crate::time_utils::water_day_key;

/// A single scalar measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry<T> {
    pub value: T,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GymMirrorEntry {
    pub category: String,
    pub exercise_type: String,
    pub duration: i64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodMirrorEntry {
    pub name: String,
    pub calories: i64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
    pub date: String,
}

/// Everything mirrored for one user.
///
/// Collections missing from a stored document deserialize as empty, so a
/// user's data always carries all six.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserActivityData {
    #[serde(default)]
    pub steps: Vec<MetricEntry<i64>>,
    #[serde(default)]
    pub running: Vec<MetricEntry<f64>>,
    /// Cumulative liters per calendar day (`Thu Oct 15 2026`)
    #[serde(default)]
    pub water: BTreeMap<String, f64>,
    #[serde(default)]
    pub sleep: Vec<MetricEntry<f64>>,
    #[serde(default)]
    pub gym: Vec<GymMirrorEntry>,
    #[serde(default)]
    pub food: Vec<FoodMirrorEntry>,
}

fn on_day(date: &str, day: NaiveDate) -> bool {
    DateTime::parse_from_rfc3339(date)
        .map(|d| d.with_timezone(&Local).date_naive() == day)
        .unwrap_or(false)
}

impl UserActivityData {
    /// Local total for `kind` on the calendar day of `now`.
    ///
    /// Steps, running, sleep and gym sum values/minutes; water reads the day's
    /// bucket; food sums calories.
    pub fn today_total(&self, kind: ActivityKind, now: DateTime<Local>) -> f64 {
        let day = now.date_naive();
        match kind {
            ActivityKind::Steps => self
                .steps
                .iter()
                .filter(|e| on_day(&e.date, day))
                .map(|e| e.value as f64)
                .sum(),
            ActivityKind::Running => self
                .running
                .iter()
                .filter(|e| on_day(&e.date, day))
                .map(|e| e.value)
                .sum(),
            ActivityKind::Water => self.water.get(&water_day_key(day)).copied().unwrap_or(0.0),
            ActivityKind::Sleep => self
                .sleep
                .iter()
                .filter(|e| on_day(&e.date, day))
                .map(|e| e.value)
                .sum(),
            ActivityKind::Gym => self
                .gym
                .iter()
                .filter(|e| on_day(&e.date, day))
                .map(|e| e.duration as f64)
                .sum(),
            ActivityKind::Food => self
                .food
                .iter()
                .filter(|e| on_day(&e.date, day))
                .map(|e| e.calories as f64)
                .sum(),
        }
    }
}

/// The whole mirror, keyed by user email.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MirrorDocument {
    users: BTreeMap<String, UserActivityData>,
}

impl MirrorDocument {
    pub fn user(&self, email: &str) -> Option<&UserActivityData> {
        self.users.get(email)
    }

    /// Data for `email`, created empty on first touch.
    pub fn user_mut(&mut self, email: &str) -> &mut UserActivityData {
        self.users.entry(email.to_string()).or_default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_utils::format_utc_rfc3339;
    use chrono::Utc;

    #[test]
    fn test_partial_document_fills_missing_collections() {
        let json = r#"{"a@example.com": {"steps": [{"value": 500, "date": "2026-10-15T01:00:00.000Z"}]}}"#;
        let doc: MirrorDocument = serde_json::from_str(json).unwrap();
        let data = doc.user("a@example.com").unwrap();
        assert_eq!(data.steps.len(), 1);
        assert!(data.running.is_empty());
        assert!(data.water.is_empty());
        assert!(data.gym.is_empty());
        assert!(data.food.is_empty());
    }

    #[test]
    fn test_serialized_shape_matches_browser_layout() {
        let mut doc = MirrorDocument::default();
        doc.user_mut("a@example.com").gym.push(GymMirrorEntry {
            category: "Cardio".to_string(),
            exercise_type: "Rowing".to_string(),
            duration: 20,
            date: "2026-10-15T01:00:00.000Z".to_string(),
        });

        let value = serde_json::to_value(&doc).unwrap();
        let user = &value["a@example.com"];
        assert_eq!(user["gym"][0]["exerciseType"], "Rowing");
        assert!(user["water"].is_object());
        assert!(user["sleep"].is_array());
    }

    #[test]
    fn test_today_total_ignores_other_days() {
        let now = Local::now();
        let today = format_utc_rfc3339(now.with_timezone(&Utc));
        let mut data = UserActivityData::default();
        data.steps.push(MetricEntry { value: 1000, date: today.clone() });
        data.steps.push(MetricEntry { value: 2500, date: today });
        data.steps.push(MetricEntry {
            value: 9999,
            date: "2001-01-01T12:00:00.000Z".to_string(),
        });
        data.water.insert(water_day_key(now.date_naive()), 1.5);

        assert_eq!(data.today_total(ActivityKind::Steps, now), 3500.0);
        assert_eq!(data.today_total(ActivityKind::Water, now), 1.5);
        assert_eq!(data.today_total(ActivityKind::Running, now), 0.0);
    }
}
