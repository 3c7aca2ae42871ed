//! Typed repositories over the record store gateway
//!
//! One repository per collection. Each one applies the strict document
//! schema at the boundary: a stored document that fails to decode is a
//! schema error surfaced to the caller, never a silently-defaulted value
//! deep inside aggregation.

use crate::error::{Error, Result};
use crate::store::{Predicate, RecordStore, CONVERSATIONS, MOOD_ENTRIES, STREAKS};
use crate::types::{ConversationRecord, MoodEntry, StreakRecord};
use std::sync::Arc;

fn decode<T: serde::de::DeserializeOwned>(
    collection: &str,
    document: serde_json::Value,
) -> Result<T> {
    serde_json::from_value(document).map_err(|e| Error::schema(collection, e.to_string()))
}

// ============================================
// Conversations
// ============================================

/// Repository for completed conversation sessions.
#[derive(Clone)]
pub struct ConversationRepo {
    store: Arc<dyn RecordStore>,
}

impl ConversationRepo {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Every conversation the user has ever had, in store order.
    ///
    /// The store cannot filter by date or category, so this is the coarse
    /// fetch behind all conversation statistics.
    pub async fn fetch_all_for_user(&self, user_id: &str) -> Result<Vec<ConversationRecord>> {
        let documents = self
            .store
            .fetch_all(CONVERSATIONS, &Predicate::user(user_id), None)
            .await?;

        documents
            .into_iter()
            .map(|doc| decode(CONVERSATIONS, doc))
            .collect()
    }

    /// Insert or replace a conversation record by id.
    pub async fn upsert(&self, record: &ConversationRecord) -> Result<()> {
        self.store
            .upsert(CONVERSATIONS, &record.id, serde_json::to_value(record)?)
            .await
    }

    /// Find the conversation linked to an external provider session.
    pub async fn find_by_external_id(
        &self,
        user_id: &str,
        external_id: &str,
    ) -> Result<Option<ConversationRecord>> {
        let records = self.fetch_all_for_user(user_id).await?;
        Ok(records
            .into_iter()
            .find(|r| r.external_session_id.as_deref() == Some(external_id)))
    }
}

// ============================================
// Mood entries
// ============================================

/// Repository for daily mood snapshots.
#[derive(Clone)]
pub struct MoodRepo {
    store: Arc<dyn RecordStore>,
}

impl MoodRepo {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// A bounded sample of the user's entries.
    ///
    /// The limit is advisory at the store, so the bound is re-applied here.
    /// No ordering is guaranteed; callers treat the sample as "recent
    /// enough", not as the latest N.
    pub async fn fetch_sample(&self, user_id: &str, limit: usize) -> Result<Vec<MoodEntry>> {
        let documents = self
            .store
            .fetch_all(MOOD_ENTRIES, &Predicate::user(user_id), Some(limit))
            .await?;

        documents
            .into_iter()
            .take(limit)
            .map(|doc| decode(MOOD_ENTRIES, doc))
            .collect()
    }

    /// Every entry the user has recorded. Used when windowing must be
    /// exact and a capped sample would silently drop days.
    pub async fn fetch_all_for_user(&self, user_id: &str) -> Result<Vec<MoodEntry>> {
        let documents = self
            .store
            .fetch_all(MOOD_ENTRIES, &Predicate::user(user_id), None)
            .await?;

        documents
            .into_iter()
            .map(|doc| decode(MOOD_ENTRIES, doc))
            .collect()
    }

    /// Idempotent upsert keyed by `user_id + date`: at most one entry per
    /// user per calendar day, later writes replace earlier ones.
    pub async fn upsert(&self, entry: &MoodEntry) -> Result<()> {
        let key = format!("{}:{}", entry.user_id, entry.date.format("%Y-%m-%d"));
        self.store
            .upsert(MOOD_ENTRIES, &key, serde_json::to_value(entry)?)
            .await
    }
}

// ============================================
// Streaks
// ============================================

/// Repository for the per-user streak document.
#[derive(Clone)]
pub struct StreakRepo {
    store: Arc<dyn RecordStore>,
}

impl StreakRepo {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// The user's streak record, if any activity has ever been tracked.
    pub async fn get(&self, user_id: &str) -> Result<Option<StreakRecord>> {
        let documents = self
            .store
            .fetch_all(STREAKS, &Predicate::user(user_id), Some(1))
            .await?;

        documents
            .into_iter()
            .next()
            .map(|doc| decode(STREAKS, doc))
            .transpose()
    }

    /// Conditionally replace the streak record.
    ///
    /// The swap succeeds only if the stored `last_active_date` still equals
    /// `expected` (None for a missing record). Returns whether it did.
    pub async fn put_when(
        &self,
        record: &StreakRecord,
        expected_last_active: Option<&str>,
    ) -> Result<bool> {
        self.store
            .upsert_when(
                STREAKS,
                &record.user_id,
                serde_json::to_value(record)?,
                "last_active_date",
                expected_last_active,
            )
            .await
    }
}
