// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity tracker: the write workflow behind each form.
//!
//! For every save:
//! 1. Validate the payload (nothing is written on failure)
//! 2. Dual-write through the repository
//! 3. Ask the advisor for a tip (steps, running and water only)
//! 4. Notify the observer

use chrono::Local;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::input::{
    FoodInput, GymInput, ProfileInput, RunningInput, SleepInput, StepsInput, WaterInput,
};
use crate::models::{ActivityKind, DailySummary, SessionUser, User};
use crate::repository::{ActivityRepository, SaveReceipt};
use crate::services::advisor::{running_prompt, steps_prompt, water_prompt, Advisor};
use crate::services::observer::ActivityObserver;
use crate::time_utils::parse_calendar_day;

/// Response to a save: the receipt plus the advisor's tip, if any.
#[derive(Debug, Clone, Serialize)]
pub struct SaveResponse {
    #[serde(flatten)]
    pub receipt: SaveReceipt,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,
}

pub struct ActivityTracker {
    repository: ActivityRepository,
    advisor: Option<Arc<dyn Advisor>>,
    observer: Arc<dyn ActivityObserver>,
}

impl ActivityTracker {
    pub fn new(
        repository: ActivityRepository,
        advisor: Option<Arc<dyn Advisor>>,
        observer: Arc<dyn ActivityObserver>,
    ) -> Self {
        Self {
            repository,
            advisor,
            observer,
        }
    }

    pub fn repository(&self) -> &ActivityRepository {
        &self.repository
    }

    /// Ask the advisor about today's local total for `kind`.
    ///
    /// Failures are logged and produce no advice.
    async fn advise(&self, user: &SessionUser, kind: ActivityKind) -> Option<String> {
        let advisor = self.advisor.as_ref()?;

        let total = self
            .repository
            .mirror()
            .today_total(&user.email, kind, Local::now());

        let prompt = match kind {
            ActivityKind::Water => water_prompt(total),
            ActivityKind::Steps | ActivityKind::Running => {
                let profile = match self.repository.get_profile(&user.id).await {
                    Ok(row) => row,
                    Err(_) => user.to_user(),
                };
                if kind == ActivityKind::Steps {
                    steps_prompt(total as i64, &profile)
                } else {
                    running_prompt(total, &profile)
                }
            }
            _ => return None,
        };

        match advisor.advise(&prompt, kind).await {
            Ok(advice) => {
                tracing::debug!(user_id = %user.id, kind = %kind, "Advisor replied");
                self.observer.advice_ready(&user.id, kind, &advice);
                Some(advice)
            }
            Err(e) => {
                tracing::warn!(user_id = %user.id, kind = %kind, error = %e, "Advisor call failed");
                None
            }
        }
    }

    async fn finish(
        &self,
        user: &SessionUser,
        receipt: SaveReceipt,
        with_advice: bool,
    ) -> SaveResponse {
        self.observer.entry_saved(&user.id, &receipt);
        let advice = if with_advice {
            self.advise(user, receipt.kind).await
        } else {
            None
        };
        SaveResponse { receipt, advice }
    }

    pub async fn save_steps(&self, user: &SessionUser, input: StepsInput) -> Result<SaveResponse> {
        input.validate()?;
        let receipt = self.repository.save_steps(user, input.steps).await;
        Ok(self.finish(user, receipt, true).await)
    }

    pub async fn save_running(
        &self,
        user: &SessionUser,
        input: RunningInput,
    ) -> Result<SaveResponse> {
        input.validate()?;
        let receipt = self.repository.save_running(user, input.distance).await;
        Ok(self.finish(user, receipt, true).await)
    }

    pub async fn save_water(&self, user: &SessionUser, input: WaterInput) -> Result<SaveResponse> {
        input.validate()?;
        let receipt = self
            .repository
            .save_water(user, input.amount, input.unit)
            .await;
        Ok(self.finish(user, receipt, true).await)
    }

    pub async fn save_sleep(&self, user: &SessionUser, input: SleepInput) -> Result<SaveResponse> {
        input.validate()?;
        let receipt = self.repository.save_sleep(user, input.hours).await;
        Ok(self.finish(user, receipt, false).await)
    }

    pub async fn save_gym(&self, user: &SessionUser, input: GymInput) -> Result<SaveResponse> {
        input.validate()?;
        let receipt = self.repository.save_gym(user, &input).await;
        Ok(self.finish(user, receipt, false).await)
    }

    pub async fn save_food(&self, user: &SessionUser, input: FoodInput) -> Result<SaveResponse> {
        input.validate()?;
        let receipt = self.repository.save_food(user, &input).await;
        Ok(self.finish(user, receipt, false).await)
    }

    pub async fn save_profile(&self, user: &SessionUser, input: ProfileInput) -> Result<User> {
        input.validate()?;
        let saved = self
            .repository
            .save_profile(user, &input.into_update())
            .await?;
        self.observer.profile_saved(&saved);
        Ok(saved)
    }

    /// Upsert the summary for a `YYYY-MM-DD` calendar day.
    pub async fn save_summary(
        &self,
        user_id: &str,
        date: &str,
        fields: Map<String, Value>,
    ) -> Result<()> {
        require_calendar_day(date)?;
        self.repository
            .upsert_daily_summary(user_id, date, fields)
            .await
    }

    pub async fn get_summary(&self, user_id: &str, date: &str) -> Result<DailySummary> {
        require_calendar_day(date)?;
        self.repository
            .get_daily_summary(user_id, date)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No summary for {}", date)))
    }
}

fn require_calendar_day(date: &str) -> Result<()> {
    parse_calendar_day(date)
        .map(|_| ())
        .ok_or_else(|| AppError::BadRequest(format!("invalid date: {}", date)))
}
