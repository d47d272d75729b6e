// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile storage)
//! - Activity entries (one collection per kind, append-only)
//! - Daily summaries (one document per user per day)

use crate::db::{collections, daily_summary_id, RemoteStore};
use crate::error::AppError;
use crate::models::{
    ActivityEntry, ActivityKind, ActivityRecord, DailySummary, FoodEntry, GymEntry, ProfileUpdate,
    RunningEntry, SleepEntry, StepsEntry, User, WaterEntry,
};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Insert a row under a generated document ID.
    async fn insert_row<T>(&self, collection: &str, row: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        let _: T = self
            .get_client()?
            .fluent()
            .insert()
            .into(collection)
            .generate_document_id()
            .object(row)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Query one kind's rows for a user since `since`, newest first.
    async fn query_since<T>(&self, user_id: &str, since: &str) -> Result<Vec<T>, AppError>
    where
        T: ActivityRecord + DeserializeOwned,
    {
        self.get_client()?
            .fluent()
            .select()
            .from(T::KIND.collection())
            .filter(|q| {
                q.for_all([
                    q.field("user_id").eq(user_id),
                    q.field("date").greater_than_or_equal(since),
                ])
            })
            .order_by([("date", firestore::FirestoreQueryDirection::Descending)])
            .obj::<T>()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn entries_of<T>(&self, user_id: &str, since: &str) -> Result<Vec<ActivityEntry>, AppError>
    where
        T: ActivityRecord + DeserializeOwned,
    {
        let rows: Vec<T> = self.query_since(user_id, since).await?;
        Ok(rows.into_iter().map(ActivityRecord::into_entry).collect())
    }
}

#[async_trait]
impl RemoteStore for FirestoreDb {
    async fn ping(&self) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .limit(1)
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── User Operations ─────────────────────────────────────────

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn insert_user(&self, user: &User) -> Result<User, AppError> {
        self.get_client()?
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn update_profile(
        &self,
        user_id: &str,
        profile: &ProfileUpdate,
    ) -> Result<(), AppError> {
        // A masked update would create the document; keep update-by-id semantics.
        if self.get_user(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(ProfileUpdate::FIELDS)
            .in_col(collections::USERS)
            .document_id(user_id)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Activity Operations ─────────────────────────────────────

    async fn insert_entry(&self, entry: &ActivityEntry) -> Result<(), AppError> {
        let collection = entry.kind().collection();
        match entry {
            ActivityEntry::Steps(row) => self.insert_row(collection, row).await,
            ActivityEntry::Running(row) => self.insert_row(collection, row).await,
            ActivityEntry::Water(row) => self.insert_row(collection, row).await,
            ActivityEntry::Sleep(row) => self.insert_row(collection, row).await,
            ActivityEntry::Gym(row) => self.insert_row(collection, row).await,
            ActivityEntry::Food(row) => self.insert_row(collection, row).await,
        }
    }

    async fn entries_since(
        &self,
        kind: ActivityKind,
        user_id: &str,
        since: &str,
    ) -> Result<Vec<ActivityEntry>, AppError> {
        match kind {
            ActivityKind::Steps => self.entries_of::<StepsEntry>(user_id, since).await,
            ActivityKind::Running => self.entries_of::<RunningEntry>(user_id, since).await,
            ActivityKind::Water => self.entries_of::<WaterEntry>(user_id, since).await,
            ActivityKind::Sleep => self.entries_of::<SleepEntry>(user_id, since).await,
            ActivityKind::Gym => self.entries_of::<GymEntry>(user_id, since).await,
            ActivityKind::Food => self.entries_of::<FoodEntry>(user_id, since).await,
        }
    }

    // ─── Daily Summary Operations ────────────────────────────────

    async fn get_daily_summary(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<Option<DailySummary>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::DAILY_SUMMARY)
            .obj()
            .one(&daily_summary_id(user_id, date))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Single masked write: Firestore creates the document if absent and
    /// otherwise merges only the masked fields, so concurrent callers for
    /// the same day cannot produce duplicate rows.
    async fn upsert_daily_summary(&self, summary: &DailySummary) -> Result<(), AppError> {
        let mut mask: Vec<&str> = DailySummary::RESERVED.to_vec();
        mask.extend(summary.fields.keys().map(String::as_str));

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(mask)
            .in_col(collections::DAILY_SUMMARY)
            .document_id(daily_summary_id(&summary.user_id, &summary.date))
            .object(summary)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
