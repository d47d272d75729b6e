// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Validated request payloads for the activity forms.
//!
//! Validation runs before any write; a failing payload never reaches the
//! repository.

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::ProfileUpdate;

/// One glass of water, in liters.
pub const LITERS_PER_GLASS: f64 = 0.25;

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StepsInput {
    #[validate(range(min = 1, max = 200_000))]
    pub steps: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RunningInput {
    /// Kilometers
    #[validate(range(exclusive_min = 0.0))]
    pub distance: f64,
}

/// Unit chosen on the water form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterUnit {
    #[default]
    Liter,
    #[serde(alias = "gelas")]
    Glass,
}

impl WaterUnit {
    /// Convert an amount in this unit to liters.
    pub fn to_liters(self, amount: f64) -> f64 {
        match self {
            WaterUnit::Liter => amount,
            WaterUnit::Glass => amount * LITERS_PER_GLASS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WaterInput {
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    #[serde(default)]
    pub unit: WaterUnit,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SleepInput {
    #[validate(range(exclusive_min = 0.0, max = 24.0))]
    pub hours: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GymInput {
    #[validate(custom(function = "non_blank"))]
    pub category: String,
    #[validate(custom(function = "non_blank"))]
    pub exercise_type: String,
    /// Minutes
    #[validate(range(min = 1, max = 1440))]
    pub duration: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FoodInput {
    #[validate(custom(function = "non_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(range(min = 0, max = 20_000))]
    pub calories: i64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub carbs: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub protein: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub fat: f64,
}

/// Onboarding/profile form. Every field is required.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProfileInput {
    #[validate(custom(function = "non_blank"))]
    pub full_name: String,
    #[validate(custom(function = "non_blank"))]
    pub birthplace: String,
    #[validate(custom(function = "non_blank"))]
    pub birthdate: String,
    #[validate(custom(function = "non_blank"))]
    pub blood_type: String,
    #[validate(range(min = 1))]
    pub height_cm: i32,
    #[validate(range(exclusive_min = 0.0))]
    pub weight_kg: f64,
    #[validate(custom(function = "non_blank"))]
    pub phone: String,
}

impl ProfileInput {
    pub fn into_update(self) -> ProfileUpdate {
        ProfileUpdate {
            full_name: self.full_name.trim().to_string(),
            birthplace: self.birthplace.trim().to_string(),
            birthdate: self.birthdate,
            blood_type: self.blood_type,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            phone: self.phone.trim().to_string(),
            has_completed_data: true,
        }
    }
}
