// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process remote store.
//!
//! Used for local development (`REMOTE_STORE=memory`) and tests. Each map
//! entry is locked by its `DashMap` shard, so per-row operations are atomic.

use crate::db::{daily_summary_id, RemoteStore};
use crate::error::AppError;
use crate::models::{ActivityEntry, ActivityKind, DailySummary, ProfileUpdate, User};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<String, User>,
    entries: DashMap<ActivityKind, Vec<ActivityEntry>>,
    summaries: DashMap<String, DailySummary>,
    user_inserts: AtomicUsize,
    entry_inserts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `insert_user` calls.
    pub fn user_insert_count(&self) -> usize {
        self.user_inserts.load(Ordering::SeqCst)
    }

    /// Number of successful `insert_entry` calls.
    pub fn entry_insert_count(&self) -> usize {
        self.entry_inserts.load(Ordering::SeqCst)
    }

    /// All stored rows of one kind, in insertion order.
    pub fn entries(&self, kind: ActivityKind) -> Vec<ActivityEntry> {
        self.entries
            .get(&kind)
            .map(|rows| rows.clone())
            .unwrap_or_default()
    }

    pub fn summary_count(&self) -> usize {
        self.summaries.len()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(user_id).map(|u| u.clone()))
    }

    async fn insert_user(&self, user: &User) -> Result<User, AppError> {
        match self.users.entry(user.id.clone()) {
            Entry::Occupied(_) => Err(AppError::Database(format!(
                "duplicate key: users/{}",
                user.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                self.user_inserts.fetch_add(1, Ordering::SeqCst);
                Ok(user.clone())
            }
        }
    }

    async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn update_profile(
        &self,
        user_id: &str,
        profile: &ProfileUpdate,
    ) -> Result<(), AppError> {
        let mut user = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
        profile.apply(&mut user);
        Ok(())
    }

    async fn insert_entry(&self, entry: &ActivityEntry) -> Result<(), AppError> {
        self.entries
            .entry(entry.kind())
            .or_default()
            .push(entry.clone());
        self.entry_inserts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn entries_since(
        &self,
        kind: ActivityKind,
        user_id: &str,
        since: &str,
    ) -> Result<Vec<ActivityEntry>, AppError> {
        let mut rows: Vec<ActivityEntry> = self
            .entries(kind)
            .into_iter()
            .filter(|e| e.user_id() == user_id && e.date() >= since)
            .collect();
        rows.sort_by(|a, b| b.date().cmp(a.date()));
        Ok(rows)
    }

    async fn get_daily_summary(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<Option<DailySummary>, AppError> {
        Ok(self
            .summaries
            .get(&daily_summary_id(user_id, date))
            .map(|s| s.clone()))
    }

    async fn upsert_daily_summary(&self, summary: &DailySummary) -> Result<(), AppError> {
        self.summaries
            .entry(daily_summary_id(&summary.user_id, &summary.date))
            .and_modify(|row| row.merge(&summary.fields, &summary.updated_at))
            .or_insert_with(|| summary.clone());
        Ok(())
    }
}
