//! Core domain types for solena
//!
//! These types are the persisted record model shared by the aggregators.
//! Records live in an opaque document store (see [`crate::store`]); the
//! structs here are the strict schema applied at that boundary.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Conversation** | One completed session with the companion avatar |
//! | **Category** | Which of the three session tracks a conversation belongs to |
//! | **MoodEntry** | One self-reported snapshot, at most one per calendar day |
//! | **Streak** | Consecutive calendar days with at least one conversation |
//!
//! Required fields are plain; genuinely optional fields are `Option`. A
//! missing score and a score of exactly 0 are therefore distinguishable,
//! and a document missing a required field fails decoding instead of being
//! silently defaulted inside aggregation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Neutral mood used when no data exists (score default and gap-fill).
pub const NEUTRAL_MOOD: f64 = 7.0;
/// Neutral energy for synthesized entries.
pub const NEUTRAL_ENERGY: f64 = 7.0;
/// Neutral stress for synthesized entries.
pub const NEUTRAL_STRESS: f64 = 3.0;
/// Neutral anxiety for synthesized entries.
pub const NEUTRAL_ANXIETY: f64 = 3.0;
/// Neutral sleep for synthesized entries.
pub const NEUTRAL_SLEEP: f64 = 7.0;
/// Satisfaction assumed for sessions where the user skipped the rating.
pub const DEFAULT_SATISFACTION: f64 = 4.0;

// ============================================
// Conversation category
// ============================================

/// The fixed set of session tracks a conversation can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConversationCategory {
    MentalHealth,
    Learning,
    Wellness,
}

impl ConversationCategory {
    /// All categories, in display order. Distribution reports always carry
    /// one bucket per entry here, even at zero.
    pub const ALL: [ConversationCategory; 3] = [
        ConversationCategory::MentalHealth,
        ConversationCategory::Learning,
        ConversationCategory::Wellness,
    ];

    /// Returns the identifier used in stored documents
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationCategory::MentalHealth => "mental-health",
            ConversationCategory::Learning => "learning",
            ConversationCategory::Wellness => "wellness",
        }
    }

    /// Returns the display name for this category
    pub fn display_name(&self) -> &'static str {
        match self {
            ConversationCategory::MentalHealth => "Mental Health",
            ConversationCategory::Learning => "Learning",
            ConversationCategory::Wellness => "Wellness",
        }
    }
}

impl std::fmt::Display for ConversationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ConversationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mental-health" => Ok(ConversationCategory::MentalHealth),
            "learning" => Ok(ConversationCategory::Learning),
            "wellness" => Ok(ConversationCategory::Wellness),
            _ => Err(format!("unknown category: {}", s)),
        }
    }
}

// ============================================
// Conversation records
// ============================================

/// One completed interaction session with the companion.
///
/// Written once when a session ends; immutable afterwards except for
/// late-arriving provider enrichment merged in by [`merge_detail`].
///
/// [`merge_detail`]: ConversationRecord::merge_detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Unique identifier (uuid v4)
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Session track
    pub category: ConversationCategory,
    /// When the session started
    pub started_at: DateTime<Utc>,
    /// When the session ended (>= started_at)
    pub ended_at: DateTime<Utc>,
    /// Whole minutes, always >= 1
    pub duration_minutes: i64,
    /// Self-reported mood before the session (0-10)
    pub mood_before: Option<f64>,
    /// Self-reported mood after the session (0-10)
    pub mood_after: Option<f64>,
    /// Topics touched during the session
    #[serde(default)]
    pub topics: Vec<String>,
    /// Post-session satisfaction rating (0-5)
    pub satisfaction: Option<f64>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Linkage to the video-avatar provider's session
    pub external_session_id: Option<String>,
    /// Recording reference delivered by the provider after the fact
    pub recording_url: Option<String>,
    /// Transcript delivered by the provider after the fact
    pub transcript: Option<String>,
    /// Opaque provider metadata blob
    pub provider_metadata: Option<serde_json::Value>,
}

/// Input payload for recording a completed conversation.
///
/// The engine derives the id and duration; everything else is supplied by
/// the session flow.
#[derive(Debug, Clone)]
pub struct NewConversation {
    pub user_id: String,
    pub category: ConversationCategory,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub mood_before: Option<f64>,
    pub mood_after: Option<f64>,
    pub topics: Vec<String>,
    pub satisfaction: Option<f64>,
    pub notes: Option<String>,
    pub external_session_id: Option<String>,
}

impl ConversationRecord {
    /// Build a record from a completed session, deriving id and duration.
    ///
    /// Duration is `max(1, round(elapsed minutes))`: a session always
    /// counts as at least one minute, even with near-equal timestamps.
    pub fn from_new(input: NewConversation) -> crate::error::Result<Self> {
        if input.ended_at < input.started_at {
            return Err(crate::error::Error::InvalidRecord(format!(
                "ended_at {} precedes started_at {}",
                input.ended_at, input.started_at
            )));
        }

        let elapsed_secs = (input.ended_at - input.started_at).num_seconds();
        let duration_minutes = ((elapsed_secs as f64 / 60.0).round() as i64).max(1);

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: input.user_id,
            category: input.category,
            started_at: input.started_at,
            ended_at: input.ended_at,
            duration_minutes,
            mood_before: input.mood_before,
            mood_after: input.mood_after,
            topics: input.topics,
            satisfaction: input.satisfaction,
            notes: input.notes,
            external_session_id: input.external_session_id,
            recording_url: None,
            transcript: None,
            provider_metadata: None,
        })
    }

    /// Merge late-arriving provider detail into this record.
    ///
    /// An absent field never overwrites an already-stored value.
    pub fn merge_detail(&mut self, detail: crate::external::SessionDetail) {
        if detail.recording_url.is_some() {
            self.recording_url = detail.recording_url;
        }
        if detail.transcript.is_some() {
            self.transcript = detail.transcript;
        }
        if detail.metadata.is_some() {
            self.provider_metadata = detail.metadata;
        }
    }
}

// ============================================
// Mood entries
// ============================================

/// One self-reported daily snapshot.
///
/// Natural key is `user_id + date`; writes are idempotent upserts, at most
/// one entry per user per calendar day. The five scores are conventionally
/// 0-10 but the engine averages whatever the forms stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodEntry {
    /// Owning user
    pub user_id: String,
    /// Calendar date (day granularity)
    pub date: NaiveDate,
    pub mood: f64,
    pub energy: f64,
    pub stress: f64,
    pub anxiety: f64,
    pub sleep: f64,
    /// True for gap-fill placeholders synthesized by the engine
    #[serde(default)]
    pub synthetic: bool,
}

impl MoodEntry {
    /// Synthesized placeholder for a day with no real entry.
    pub fn neutral(user_id: &str, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.to_string(),
            date,
            mood: NEUTRAL_MOOD,
            energy: NEUTRAL_ENERGY,
            stress: NEUTRAL_STRESS,
            anxiety: NEUTRAL_ANXIETY,
            sleep: NEUTRAL_SLEEP,
            synthetic: true,
        }
    }
}

// ============================================
// Streak records
// ============================================

/// Per-user day-streak document.
///
/// `last_active_date` is a calendar date, never a timestamp. Only
/// [`StreakTracker::update_streak`] mutates this record.
///
/// [`StreakTracker::update_streak`]: crate::analytics::StreakTracker::update_streak
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakRecord {
    /// Owning user
    pub user_id: String,
    /// Current consecutive days with a conversation
    pub current_streak: i64,
    /// Longest streak ever observed (>= current_streak)
    pub longest_streak: i64,
    /// Most recent active calendar day, None before first activity
    pub last_active_date: Option<NaiveDate>,
}

impl StreakRecord {
    /// Empty record for a user with no activity yet.
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            current_streak: 0,
            longest_streak: 0,
            last_active_date: None,
        }
    }

    /// `last_active_date` in the stored `YYYY-MM-DD` form, empty before
    /// first activity. Used as the compare-and-swap guard value.
    pub fn last_active_str(&self) -> String {
        self.last_active_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}
