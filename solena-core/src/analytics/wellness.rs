//! Multi-dimensional wellness score
//!
//! Five named dimensions plus an overall score, heuristically combining
//! the rolling mood score with the month-window usage mix. The formulas
//! are compatibility-frozen: they are heuristics, not a clinical model,
//! and downstream cards render them as-is.

use crate::analytics::conversation::{ConversationStats, ConversationStatsAggregator};
use crate::analytics::mood::MoodAggregator;
use crate::analytics::round1;
use crate::analytics::window::TimeWindow;
use crate::types::{ConversationCategory, NEUTRAL_MOOD};

/// Derived wellness snapshot. Not persisted; recomputed on demand.
///
/// Every field is rounded to one decimal and capped at 10.0. No floor is
/// applied: an out-of-range negative mood input flows through unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WellnessMetrics {
    pub overall: f64,
    pub emotional: f64,
    pub physical: f64,
    pub social: f64,
    pub mental: f64,
    pub spiritual: f64,
}

impl Default for WellnessMetrics {
    /// Neutral snapshot shown before the first load and on failure.
    fn default() -> Self {
        Self {
            overall: NEUTRAL_MOOD,
            emotional: NEUTRAL_MOOD,
            physical: NEUTRAL_MOOD,
            social: NEUTRAL_MOOD,
            mental: NEUTRAL_MOOD,
            spiritual: NEUTRAL_MOOD,
        }
    }
}

impl WellnessMetrics {
    /// Derive the snapshot from a mood score and month-window stats.
    pub fn derive(mood_score: f64, stats: &ConversationStats) -> Self {
        let wellness_pct = stats.usage.get(ConversationCategory::Wellness).percent as f64;
        let learning_pct = stats.usage.get(ConversationCategory::Learning).percent as f64;
        let social_bonus = if stats.total_sessions > 10 { 1.0 } else { 0.0 };

        let emotional = round1(mood_score);
        let physical = round1((mood_score + wellness_pct / 10.0).min(10.0));
        let social = round1((mood_score + social_bonus).min(10.0));
        let mental = round1((mood_score + learning_pct / 10.0).min(10.0));
        let spiritual = round1(mood_score * 0.9);
        let overall = round1((emotional + physical + social + mental + spiritual) / 5.0);

        Self {
            overall,
            emotional,
            physical,
            social,
            mental,
            spiritual,
        }
    }
}

/// Combines the mood and conversation aggregators into wellness metrics.
pub struct WellnessMetricsCalculator<'a> {
    mood: &'a MoodAggregator,
    conversations: &'a ConversationStatsAggregator,
}

impl<'a> WellnessMetricsCalculator<'a> {
    pub fn new(mood: &'a MoodAggregator, conversations: &'a ConversationStatsAggregator) -> Self {
        Self {
            mood,
            conversations,
        }
    }

    /// Wellness snapshot for a user.
    ///
    /// A store failure, and a brand-new user with no mood entries and no
    /// sessions, both yield the flat neutral snapshot, so the wellness
    /// card always has something plausible to render. With any data
    /// present the formulas apply, using the neutral mood when only
    /// conversations exist.
    pub async fn wellness_metrics(&self, user_id: &str) -> WellnessMetrics {
        let stats = self
            .conversations
            .conversation_stats(user_id, TimeWindow::Month)
            .await;

        match self.mood.try_mood_score(user_id).await {
            Err(e) => {
                tracing::warn!(user_id, error = %e, "wellness inputs unavailable, using defaults");
                WellnessMetrics::default()
            }
            Ok(None) if stats.total_sessions == 0 => WellnessMetrics::default(),
            Ok(mood_score) => {
                WellnessMetrics::derive(mood_score.unwrap_or(NEUTRAL_MOOD), &stats)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::conversation::{CategoryUsage, UsageDistribution};

    fn stats(total: i64, wellness_pct: i64, learning_pct: i64) -> ConversationStats {
        ConversationStats {
            total_sessions: total,
            total_minutes: 0,
            avg_satisfaction: 0.0,
            usage: UsageDistribution {
                mental_health: CategoryUsage::default(),
                learning: CategoryUsage {
                    count: 0,
                    percent: learning_pct,
                },
                wellness: CategoryUsage {
                    count: 0,
                    percent: wellness_pct,
                },
            },
            recent_conversations: vec![],
        }
    }

    #[test]
    fn test_neutral_inputs_give_neutral_overall() {
        let metrics = WellnessMetrics::derive(7.0, &stats(0, 0, 0));
        assert_eq!(metrics.emotional, 7.0);
        assert_eq!(metrics.physical, 7.0);
        assert_eq!(metrics.social, 7.0);
        assert_eq!(metrics.mental, 7.0);
        assert_eq!(metrics.spiritual, 6.3);
        // (7 + 7 + 7 + 7 + 6.3) / 5
        assert_eq!(metrics.overall, 6.9);
    }

    #[test]
    fn test_category_mix_lifts_physical_and_mental() {
        let metrics = WellnessMetrics::derive(6.0, &stats(5, 40, 60));
        assert_eq!(metrics.physical, 10.0); // min(10, 6 + 4)
        assert_eq!(metrics.mental, 10.0); // min(10, 6 + 6)
        assert_eq!(metrics.social, 6.0); // 5 sessions, no bonus
    }

    #[test]
    fn test_session_volume_bonus() {
        let metrics = WellnessMetrics::derive(6.0, &stats(11, 0, 0));
        assert_eq!(metrics.social, 7.0);
    }

    #[test]
    fn test_upper_clamp_holds_for_any_valid_mood() {
        for mood_tenths in 0..=100 {
            let mood = f64::from(mood_tenths) / 10.0;
            let metrics = WellnessMetrics::derive(mood, &stats(50, 100, 100));
            for value in [
                metrics.overall,
                metrics.emotional,
                metrics.physical,
                metrics.social,
                metrics.mental,
                metrics.spiritual,
            ] {
                assert!(value <= 10.0, "mood {} produced {}", mood, value);
            }
        }
    }

    #[test]
    fn test_no_lower_clamp_is_applied() {
        // Out-of-range input is passed through, not floored at 0.
        let metrics = WellnessMetrics::derive(-5.0, &stats(0, 0, 0));
        assert_eq!(metrics.emotional, -5.0);
        assert_eq!(metrics.spiritual, -4.5);
    }

    #[test]
    fn test_default_is_flat_neutral() {
        let metrics = WellnessMetrics::default();
        assert_eq!(metrics.overall, 7.0);
        assert_eq!(metrics.spiritual, 7.0);
    }

    mod calculator {
        use super::super::*;
        use crate::analytics::conversation::ConversationStatsAggregator;
        use crate::analytics::mood::MoodAggregator;
        use crate::clock::FixedClock;
        use crate::store::{ConversationRepo, MoodRepo, RecordStore, SqliteStore};
        use crate::types::MoodEntry;
        use chrono::{NaiveDate, TimeZone, Utc};
        use std::sync::Arc;

        fn aggregators() -> (Arc<dyn RecordStore>, MoodAggregator, ConversationStatsAggregator)
        {
            let store = SqliteStore::open_in_memory().unwrap();
            store.migrate().unwrap();
            let store: Arc<dyn RecordStore> = Arc::new(store);
            let clock = Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap(),
            ));
            let mood = MoodAggregator::new(MoodRepo::new(store.clone()), clock.clone());
            let conversations =
                ConversationStatsAggregator::new(ConversationRepo::new(store.clone()), clock);
            (store, mood, conversations)
        }

        #[tokio::test]
        async fn test_user_with_no_records_gets_flat_default() {
            let (_store, mood, conversations) = aggregators();
            let calculator = WellnessMetricsCalculator::new(&mood, &conversations);

            let metrics = calculator.wellness_metrics("u1").await;
            assert_eq!(metrics, WellnessMetrics::default());
            assert_eq!(metrics.overall, 7.0);
        }

        #[tokio::test]
        async fn test_user_with_mood_data_gets_derived_metrics() {
            let (store, mood, conversations) = aggregators();
            let entry = MoodEntry {
                user_id: "u1".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
                mood: 8.0,
                energy: 7.0,
                stress: 3.0,
                anxiety: 3.0,
                sleep: 7.0,
                synthetic: false,
            };
            MoodRepo::new(store).upsert(&entry).await.unwrap();

            let calculator = WellnessMetricsCalculator::new(&mood, &conversations);
            let metrics = calculator.wellness_metrics("u1").await;
            assert_eq!(metrics.emotional, 8.0);
            assert_eq!(metrics.spiritual, 7.2);
        }
    }
}
