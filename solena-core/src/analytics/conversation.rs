//! Conversation statistics over a trailing window
//!
//! The store can only answer "all conversations for this user", so every
//! statistic here starts from that coarse fetch and narrows in memory via
//! the [`window`] combinators.
//!
//! [`window`]: crate::analytics::window

use crate::analytics::window::{filter_by_window, sort_by_started_desc, TimeWindow};
use crate::analytics::round1;
use crate::clock::Clock;
use crate::store::ConversationRepo;
use crate::types::{ConversationCategory, ConversationRecord, DEFAULT_SATISFACTION};
use std::sync::Arc;

/// How many conversations the "recent" slice carries.
pub const RECENT_LIMIT: usize = 10;

/// Usage share for one category bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryUsage {
    /// Sessions in this category within the window
    pub count: i64,
    /// Share of the window's sessions, independently rounded (0-100)
    pub percent: i64,
}

/// Per-category usage shares within a window.
///
/// Every category bucket is always present, even at zero. Percentages are
/// rounded independently and need not sum to exactly 100.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageDistribution {
    pub mental_health: CategoryUsage,
    pub learning: CategoryUsage,
    pub wellness: CategoryUsage,
}

impl UsageDistribution {
    /// The bucket for a category.
    pub fn get(&self, category: ConversationCategory) -> CategoryUsage {
        match category {
            ConversationCategory::MentalHealth => self.mental_health,
            ConversationCategory::Learning => self.learning,
            ConversationCategory::Wellness => self.wellness,
        }
    }

    fn bucket_mut(&mut self, category: ConversationCategory) -> &mut CategoryUsage {
        match category {
            ConversationCategory::MentalHealth => &mut self.mental_health,
            ConversationCategory::Learning => &mut self.learning,
            ConversationCategory::Wellness => &mut self.wellness,
        }
    }

    /// Build the distribution from windowed records.
    pub fn from_records(records: &[ConversationRecord]) -> Self {
        let mut distribution = Self::default();
        for record in records {
            distribution.bucket_mut(record.category).count += 1;
        }

        let total = records.len() as i64;
        for category in ConversationCategory::ALL {
            let bucket = distribution.bucket_mut(category);
            // Guard: an empty window reports 0%, not NaN.
            bucket.percent = if total == 0 {
                0
            } else {
                ((bucket.count as f64 / total as f64) * 100.0).round() as i64
            };
        }
        distribution
    }
}

/// Windowed conversation statistics.
#[derive(Debug, Clone, Default)]
pub struct ConversationStats {
    /// Sessions inside the window
    pub total_sessions: i64,
    /// Sum of their durations in minutes
    pub total_minutes: i64,
    /// Mean satisfaction, one decimal; unrated sessions count at 4.0
    pub avg_satisfaction: f64,
    /// Per-category shares
    pub usage: UsageDistribution,
    /// Up to the 10 most recent sessions, newest first
    pub recent_conversations: Vec<ConversationRecord>,
}

/// Computes windowed statistics from the user's full conversation history.
pub struct ConversationStatsAggregator {
    repo: ConversationRepo,
    clock: Arc<dyn Clock>,
}

impl ConversationStatsAggregator {
    pub fn new(repo: ConversationRepo, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Statistics for the trailing window.
    ///
    /// Never fails: any store error degrades to the all-zero default
    /// object so the dashboard still renders.
    pub async fn conversation_stats(&self, user_id: &str, window: TimeWindow) -> ConversationStats {
        let records = match self.repo.fetch_all_for_user(user_id).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    user_id,
                    window = %window,
                    error = %e,
                    "conversation fetch failed, using default stats"
                );
                return ConversationStats::default();
            }
        };

        Self::compute(records, window, self.clock.now())
    }

    fn compute(
        records: Vec<ConversationRecord>,
        window: TimeWindow,
        now: chrono::DateTime<chrono::Utc>,
    ) -> ConversationStats {
        let mut retained = filter_by_window(records, window, now);

        let total_sessions = retained.len() as i64;
        let total_minutes: i64 = retained.iter().map(|r| r.duration_minutes).sum();

        let avg_satisfaction = if retained.is_empty() {
            0.0
        } else {
            let sum: f64 = retained
                .iter()
                .map(|r| r.satisfaction.unwrap_or(DEFAULT_SATISFACTION))
                .sum();
            round1(sum / retained.len() as f64)
        };

        let usage = UsageDistribution::from_records(&retained);

        sort_by_started_desc(&mut retained);
        retained.truncate(RECENT_LIMIT);

        ConversationStats {
            total_sessions,
            total_minutes,
            avg_satisfaction,
            usage,
            recent_conversations: retained,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::{RecordStore, SqliteStore};
    use crate::types::NewConversation;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    fn fixture() -> (Arc<dyn RecordStore>, ConversationStatsAggregator) {
        let store = SqliteStore::open_in_memory().unwrap();
        store.migrate().unwrap();
        let store: Arc<dyn RecordStore> = Arc::new(store);
        let aggregator = ConversationStatsAggregator::new(
            ConversationRepo::new(store.clone()),
            Arc::new(FixedClock(now())),
        );
        (store, aggregator)
    }

    async fn seed(
        store: &Arc<dyn RecordStore>,
        days_ago: i64,
        category: ConversationCategory,
        minutes: i64,
        satisfaction: Option<f64>,
    ) {
        let started = now() - Duration::days(days_ago);
        let record = ConversationRecord::from_new(NewConversation {
            user_id: "u1".to_string(),
            category,
            started_at: started,
            ended_at: started + Duration::minutes(minutes),
            mood_before: None,
            mood_after: None,
            topics: vec![],
            satisfaction,
            notes: None,
            external_session_id: None,
        })
        .unwrap();
        ConversationRepo::new(store.clone())
            .upsert(&record)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_window_is_all_zero_with_buckets_present() {
        let (_store, aggregator) = fixture();
        let stats = aggregator.conversation_stats("u1", TimeWindow::Week).await;

        assert_eq!(stats.total_sessions, 0);
        assert_eq!(stats.total_minutes, 0);
        assert_eq!(stats.avg_satisfaction, 0.0);
        for category in ConversationCategory::ALL {
            assert_eq!(stats.usage.get(category).count, 0);
            assert_eq!(stats.usage.get(category).percent, 0);
        }
        assert!(stats.recent_conversations.is_empty());
    }

    #[tokio::test]
    async fn test_window_filtering_excludes_old_records() {
        let (store, aggregator) = fixture();
        seed(&store, 40, ConversationCategory::Learning, 30, None).await;

        let week = aggregator.conversation_stats("u1", TimeWindow::Week).await;
        let month = aggregator.conversation_stats("u1", TimeWindow::Month).await;
        let quarter = aggregator
            .conversation_stats("u1", TimeWindow::Quarter)
            .await;

        assert_eq!(week.total_sessions, 0);
        assert_eq!(month.total_sessions, 0);
        assert_eq!(quarter.total_sessions, 1);
        assert_eq!(quarter.total_minutes, 30);
    }

    #[tokio::test]
    async fn test_satisfaction_defaults_into_the_mean() {
        let (store, aggregator) = fixture();
        seed(&store, 1, ConversationCategory::Wellness, 10, Some(5.0)).await;
        seed(&store, 2, ConversationCategory::Wellness, 10, None).await;

        let stats = aggregator.conversation_stats("u1", TimeWindow::Week).await;
        // (5.0 + 4.0) / 2
        assert_eq!(stats.avg_satisfaction, 4.5);
    }

    #[tokio::test]
    async fn test_usage_distribution_percentages() {
        let (store, aggregator) = fixture();
        seed(&store, 1, ConversationCategory::Learning, 10, None).await;
        seed(&store, 2, ConversationCategory::Learning, 10, None).await;
        seed(&store, 3, ConversationCategory::Wellness, 10, None).await;

        let stats = aggregator.conversation_stats("u1", TimeWindow::Week).await;
        assert_eq!(stats.usage.learning.count, 2);
        assert_eq!(stats.usage.learning.percent, 67);
        assert_eq!(stats.usage.wellness.percent, 33);
        assert_eq!(stats.usage.mental_health.count, 0);
        assert_eq!(stats.usage.mental_health.percent, 0);
    }

    #[tokio::test]
    async fn test_recent_slice_is_bounded_and_newest_first() {
        let (store, aggregator) = fixture();
        for days_ago in 1..=12 {
            seed(&store, days_ago, ConversationCategory::MentalHealth, 5, None).await;
        }

        let stats = aggregator.conversation_stats("u1", TimeWindow::Month).await;
        assert_eq!(stats.total_sessions, 12);
        assert_eq!(stats.recent_conversations.len(), RECENT_LIMIT);
        let starts: Vec<_> = stats
            .recent_conversations
            .iter()
            .map(|r| r.started_at)
            .collect();
        let mut sorted = starts.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(starts, sorted);
    }
}
