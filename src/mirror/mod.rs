// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local per-installation mirror of activity data.
//!
//! `LocalMirror` owns the document behind a mutex. Every mutation is applied
//! in memory first and then the whole document is written through the
//! injected `MirrorSink`. The lock is never held across an await.

mod document;
mod sink;

pub use document::{FoodMirrorEntry, GymMirrorEntry, MetricEntry, MirrorDocument, UserActivityData};
pub use sink::{JsonFileSink, MemorySink, MirrorSink};

use chrono::{DateTime, Local};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::AppError;
use crate::models::ActivityKind;

pub struct LocalMirror {
    document: Mutex<MirrorDocument>,
    sink: Arc<dyn MirrorSink>,
}

impl LocalMirror {
    /// Read the persisted document; nothing persisted yet means empty.
    pub fn load(sink: Arc<dyn MirrorSink>) -> Result<Self, AppError> {
        let document = sink.load()?.unwrap_or_default();
        tracing::debug!(users = document.len(), "Loaded local mirror");
        Ok(Self {
            document: Mutex::new(document),
            sink,
        })
    }

    /// Empty mirror backed by a `MemorySink`.
    pub fn in_memory() -> Self {
        Self {
            document: Mutex::new(MirrorDocument::default()),
            sink: Arc::new(MemorySink::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MirrorDocument> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` to the user's data and persist. The in-memory change is kept
    /// even when the sink fails.
    fn mutate<R>(
        &self,
        email: &str,
        f: impl FnOnce(&mut UserActivityData) -> R,
    ) -> Result<R, AppError> {
        let mut document = self.lock();
        let result = f(document.user_mut(email));
        self.sink.save(&document)?;
        Ok(result)
    }

    pub fn append_steps(&self, email: &str, value: i64, date: &str) -> Result<(), AppError> {
        self.mutate(email, |data| {
            data.steps.push(MetricEntry {
                value,
                date: date.to_string(),
            })
        })
    }

    pub fn append_running(&self, email: &str, value: f64, date: &str) -> Result<(), AppError> {
        self.mutate(email, |data| {
            data.running.push(MetricEntry {
                value,
                date: date.to_string(),
            })
        })
    }

    pub fn append_sleep(&self, email: &str, value: f64, date: &str) -> Result<(), AppError> {
        self.mutate(email, |data| {
            data.sleep.push(MetricEntry {
                value,
                date: date.to_string(),
            })
        })
    }

    /// Add `liters` to the day's bucket and return the new cumulative total.
    pub fn add_water(&self, email: &str, liters: f64, day_key: &str) -> Result<f64, AppError> {
        self.mutate(email, |data| {
            let total = data.water.entry(day_key.to_string()).or_insert(0.0);
            *total += liters;
            *total
        })
    }

    pub fn append_gym(&self, email: &str, entry: GymMirrorEntry) -> Result<(), AppError> {
        self.mutate(email, |data| data.gym.push(entry))
    }

    pub fn append_food(&self, email: &str, entry: FoodMirrorEntry) -> Result<(), AppError> {
        self.mutate(email, |data| data.food.push(entry))
    }

    /// Snapshot of one user's data; empty collections if never touched.
    pub fn user_data(&self, email: &str) -> UserActivityData {
        self.lock().user(email).cloned().unwrap_or_default()
    }

    pub fn today_total(&self, email: &str, kind: ActivityKind, now: DateTime<Local>) -> f64 {
        self.lock()
            .user(email)
            .map(|data| data.today_total(kind, now))
            .unwrap_or(0.0)
    }

    pub fn document(&self) -> MirrorDocument {
        self.lock().clone()
    }
}
