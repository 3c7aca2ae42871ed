//! Analytics facade
//!
//! One engine instance per authenticated user: it owns the aggregators,
//! the UI-visible snapshot, and the mutation entry points. Constructed at
//! login with its dependencies injected, dropped at logout. No ambient
//! singletons, so multiple users and test fixtures can coexist.
//!
//! ## Refresh model
//!
//! ```text
//!            ┌────────────────────────────────────────────┐
//!            │              AnalyticsEngine               │
//!            │                                            │
//!  refresh() │  tokio::join! ──┬─ StreakTracker           │
//!            │                 ├─ MoodAggregator (score)  │
//!            │                 ├─ MoodAggregator (series) │
//!            │                 ├─ ConversationStats       │
//!            │                 └─ WellnessMetrics         │
//!            │        fan-in → snapshot (atomic update)   │
//!            └────────────────────────────────────────────┘
//! ```
//!
//! Every mutation re-runs the full fan-out rather than patching one
//! metric; per-user data volumes are small and the simplicity wins.

use crate::analytics::conversation::ConversationStatsAggregator;
use crate::analytics::dashboard::DashboardMetrics;
use crate::analytics::mood::MoodAggregator;
use crate::analytics::streak::StreakTracker;
use crate::analytics::wellness::{WellnessMetrics, WellnessMetricsCalculator};
use crate::analytics::window::TimeWindow;
use crate::analytics::UsageDistribution;
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::external::SessionProvider;
use crate::store::{ConversationRepo, MoodRepo, RecordStore, StreakRepo};
use crate::types::{ConversationRecord, MoodEntry, NewConversation};
use std::sync::Arc;

/// Days covered by the facade's mood series (one chart point per day).
pub const MOOD_SERIES_DAYS: u32 = 7;

/// Per-user analytics service.
///
/// All reads go through the snapshot accessors; `loading` and `error`
/// describe the snapshot's freshness. While `loading` is true the
/// previous (or default) snapshot stays visible; a non-empty `error` is
/// advisory; the snapshot still holds usable values.
pub struct AnalyticsEngine {
    user_id: String,

    streaks: StreakTracker,
    mood: MoodAggregator,
    conversations: ConversationStatsAggregator,
    conversation_repo: ConversationRepo,
    mood_repo: MoodRepo,
    provider: Arc<dyn SessionProvider>,

    dashboard: DashboardMetrics,
    mood_series: Vec<MoodEntry>,
    usage: UsageDistribution,
    wellness: WellnessMetrics,
    recent_conversations: Vec<ConversationRecord>,
    loading: bool,
    error: Option<String>,
}

impl AnalyticsEngine {
    /// Build an engine for one user with injected dependencies.
    ///
    /// The snapshot starts at the documented defaults; call [`refresh`]
    /// to populate it.
    ///
    /// [`refresh`]: AnalyticsEngine::refresh
    pub fn new(
        user_id: impl Into<String>,
        store: Arc<dyn RecordStore>,
        provider: Arc<dyn SessionProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let user_id = user_id.into();
        Self {
            streaks: StreakTracker::new(StreakRepo::new(store.clone()), clock.clone()),
            mood: MoodAggregator::new(MoodRepo::new(store.clone()), clock.clone()),
            conversations: ConversationStatsAggregator::new(
                ConversationRepo::new(store.clone()),
                clock,
            ),
            conversation_repo: ConversationRepo::new(store.clone()),
            mood_repo: MoodRepo::new(store),
            provider,
            user_id,
            dashboard: DashboardMetrics::default(),
            mood_series: Vec::new(),
            usage: UsageDistribution::default(),
            wellness: WellnessMetrics::default(),
            recent_conversations: Vec::new(),
            loading: false,
            error: None,
        }
    }

    // ============================================
    // Snapshot accessors
    // ============================================

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn dashboard(&self) -> &DashboardMetrics {
        &self.dashboard
    }

    pub fn mood_series(&self) -> &[MoodEntry] {
        &self.mood_series
    }

    pub fn usage(&self) -> &UsageDistribution {
        &self.usage
    }

    pub fn wellness(&self) -> &WellnessMetrics {
        &self.wellness
    }

    pub fn recent_conversations(&self) -> &[ConversationRecord] {
        &self.recent_conversations
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // ============================================
    // Refresh
    // ============================================

    /// Recompute the whole snapshot.
    ///
    /// The four aggregator reads run concurrently; the snapshot updates
    /// only once all of them have settled, so the caller sees a single
    /// loading transition. If any read fails, the previous snapshot stays
    /// in place and `error` carries a human-readable message; a
    /// successful prior load is never destroyed by a failing refresh.
    pub async fn refresh(&mut self) {
        self.loading = true;
        tracing::debug!(user_id = %self.user_id, "refreshing analytics snapshot");

        let wellness_calc = WellnessMetricsCalculator::new(&self.mood, &self.conversations);
        let (streak, mood_score, mood_series, week_stats, wellness) = tokio::join!(
            self.streaks.get_streak(&self.user_id),
            self.mood.calculate_mood_score(&self.user_id),
            self.mood.mood_series(&self.user_id, MOOD_SERIES_DAYS),
            self.conversations
                .conversation_stats(&self.user_id, TimeWindow::Week),
            wellness_calc.wellness_metrics(&self.user_id),
        );

        match streak {
            Ok(streak) => {
                self.dashboard = DashboardMetrics {
                    mood_score,
                    sessions_this_week: week_stats.total_sessions,
                    total_minutes: week_stats.total_minutes,
                    streak_days: streak.current_streak,
                    goals_completed: 0,
                    goals_total: 0,
                };
                self.mood_series = mood_series;
                self.usage = week_stats.usage;
                self.wellness = wellness;
                self.recent_conversations = week_stats.recent_conversations;
                self.error = None;

                tracing::info!(
                    user_id = %self.user_id,
                    sessions = self.dashboard.sessions_this_week,
                    streak = self.dashboard.streak_days,
                    "analytics snapshot refreshed"
                );
            }
            Err(e) => {
                tracing::error!(user_id = %self.user_id, error = %e, "analytics refresh failed");
                self.error = Some(format!("failed to load analytics: {}", e));
            }
        }

        self.loading = false;
    }

    // ============================================
    // Mutation entry points
    // ============================================

    /// Record a completed conversation session.
    ///
    /// Writes the record, advances the streak, then re-runs the fan-out.
    /// A streak failure is surfaced through `error` but never fails the
    /// conversation write that triggered it.
    pub async fn record_conversation(
        &mut self,
        mut input: NewConversation,
    ) -> Result<ConversationRecord> {
        input.user_id = self.user_id.clone();
        let record = ConversationRecord::from_new(input)?;
        self.conversation_repo.upsert(&record).await?;

        let streak_result = self.streaks.update_streak(&self.user_id).await;

        self.refresh().await;

        // Surface the streak failure after the refresh so a clean fan-in
        // does not hide it; the conversation write itself stands either way.
        if let Err(e) = streak_result {
            tracing::warn!(
                user_id = %self.user_id,
                error = %e,
                "streak update failed after conversation write"
            );
            self.error = Some(format!("failed to update streak: {}", e));
        }

        Ok(record)
    }

    /// Record (or overwrite) today's mood entry.
    ///
    /// Idempotent per calendar day. Mood entries do not touch the streak.
    pub async fn record_mood_entry(&mut self, mut entry: MoodEntry) -> Result<()> {
        entry.user_id = self.user_id.clone();
        entry.synthetic = false;
        self.mood_repo.upsert(&entry).await?;

        self.refresh().await;
        Ok(())
    }

    /// Pull late-arriving provider detail and merge it into the matching
    /// conversation.
    ///
    /// Returns whether anything was merged. Absent provider fields never
    /// overwrite stored values. A sync failure becomes a facade-level
    /// error; the snapshot keeps its prior state.
    pub async fn sync_external_conversation(&mut self, external_id: &str) -> Result<bool> {
        match self.try_sync(external_id).await {
            Ok(merged) => Ok(merged),
            Err(e) => {
                tracing::warn!(external_id, error = %e, "provider sync failed");
                self.error = Some(format!("failed to sync session {}: {}", external_id, e));
                Err(e)
            }
        }
    }

    async fn try_sync(&mut self, external_id: &str) -> Result<bool> {
        let Some(detail) = self.provider.session_detail(external_id).await? else {
            tracing::debug!(external_id, "provider has no detail yet");
            return Ok(false);
        };

        let mut record = self
            .conversation_repo
            .find_by_external_id(&self.user_id, external_id)
            .await?
            .ok_or_else(|| Error::ConversationNotFound(external_id.to_string()))?;

        record.merge_detail(detail);
        self.conversation_repo.upsert(&record).await?;

        self.refresh().await;
        Ok(true)
    }
}
