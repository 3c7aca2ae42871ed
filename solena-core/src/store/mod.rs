//! Record store gateway
//!
//! The backing store is a managed document database with a deliberately
//! narrow query surface: it can return all documents of a collection
//! matching ONE equality predicate, and it can replace a document by key.
//! No compound filters, no server-side date ranges, no ordering by
//! non-indexed fields. Everything richer (windowing, sorting, grouping,
//! gap-filling) happens in the aggregators after a coarse fetch.
//!
//! [`RecordStore`] is that contract as a seam; [`SqliteStore`] is the
//! local implementation backing it.

pub mod repo;
pub mod schema;
pub mod sqlite;

use crate::error::Result;
use async_trait::async_trait;

pub use repo::{ConversationRepo, MoodRepo, StreakRepo};
pub use sqlite::SqliteStore;

/// Collection holding [`crate::types::ConversationRecord`] documents, keyed by record id.
pub const CONVERSATIONS: &str = "conversations";
/// Collection holding [`crate::types::MoodEntry`] documents, keyed by `"{user_id}:{date}"`.
pub const MOOD_ENTRIES: &str = "mood_entries";
/// Collection holding [`crate::types::StreakRecord`] documents, keyed by user id.
pub const STREAKS: &str = "streaks";

/// A single equality predicate, the only filter the store understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    /// Document field to compare
    pub field: String,
    /// Value the field must equal
    pub equals: String,
}

impl Predicate {
    pub fn new(field: impl Into<String>, equals: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            equals: equals.into(),
        }
    }

    /// The predicate every aggregator uses: all documents owned by a user.
    pub fn user(user_id: &str) -> Self {
        Self::new("user_id", user_id)
    }
}

/// Gateway to the persisted record store.
///
/// Implementations must be `Send + Sync`; the facade shares one instance
/// across its concurrent aggregator reads.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch all documents in `collection` matching `predicate`.
    ///
    /// `limit` is advisory only: the store may return more rows than
    /// requested, and callers needing an exact bound must truncate
    /// themselves. No ordering is guaranteed.
    async fn fetch_all(
        &self,
        collection: &str,
        predicate: &Predicate,
        limit: Option<usize>,
    ) -> Result<Vec<serde_json::Value>>;

    /// Insert or fully replace the document at `key`.
    ///
    /// Full-document replace semantics, not a partial patch.
    async fn upsert(&self, collection: &str, key: &str, record: serde_json::Value) -> Result<()>;

    /// Conditionally replace the document at `key`.
    ///
    /// The write happens only when the stored document's `guard_field`
    /// currently equals `expected`; `None` matches a missing document or a
    /// null field. Returns whether the swap took place. This is the
    /// primitive that makes the streak read-modify-write race-free.
    async fn upsert_when(
        &self,
        collection: &str,
        key: &str,
        record: serde_json::Value,
        guard_field: &str,
        expected: Option<&str>,
    ) -> Result<bool>;
}
