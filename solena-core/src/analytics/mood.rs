//! Mood score and mood series aggregation
//!
//! Feeds the mood card and the mood chart, so nothing here ever fails:
//! any store trouble degrades to the neutral defaults and a warning in
//! the log.

use crate::analytics::round1;
use crate::clock::Clock;
use crate::store::MoodRepo;
use crate::types::{MoodEntry, NEUTRAL_MOOD};
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use std::sync::Arc;

/// How many entries the rolling mood score samples.
pub const MOOD_SAMPLE_SIZE: usize = 7;

/// Aggregates daily mood entries into chart-ready outputs.
pub struct MoodAggregator {
    repo: MoodRepo,
    clock: Arc<dyn Clock>,
}

impl MoodAggregator {
    pub fn new(repo: MoodRepo, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Rolling mood score: mean `mood` over a bounded sample of entries,
    /// rounded to one decimal.
    ///
    /// The store gives no ordering guarantee, so the sample is treated as
    /// "recent enough" rather than the strictly latest entries. Zero
    /// entries (or a store failure) yield the neutral 7.0.
    pub async fn calculate_mood_score(&self, user_id: &str) -> f64 {
        match self.try_mood_score(user_id).await {
            Ok(Some(score)) => score,
            Ok(None) => NEUTRAL_MOOD,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "mood sample fetch failed, using neutral score");
                NEUTRAL_MOOD
            }
        }
    }

    /// Like [`calculate_mood_score`], but distinguishes "no entries"
    /// (`Ok(None)`) and store failure (`Err`) from a computed score.
    /// The wellness calculator needs that distinction for its no-data
    /// default.
    ///
    /// [`calculate_mood_score`]: MoodAggregator::calculate_mood_score
    pub async fn try_mood_score(&self, user_id: &str) -> crate::error::Result<Option<f64>> {
        let entries = self.repo.fetch_sample(user_id, MOOD_SAMPLE_SIZE).await?;
        if entries.is_empty() {
            return Ok(None);
        }

        let sum: f64 = entries.iter().map(|e| e.mood).sum();
        Ok(Some(round1(sum / entries.len() as f64)))
    }

    /// Gap-filled mood series: exactly `days` entries, one per calendar
    /// day, oldest first, ending today.
    ///
    /// Days without a real entry get a synthesized neutral placeholder.
    /// The chart depends on a fixed-length, contiguous series, so gaps are
    /// filled rather than interpolated or omitted.
    pub async fn mood_series(&self, user_id: &str, days: u32) -> Vec<MoodEntry> {
        let today = self.clock.today();

        let entries = match self.repo.fetch_all_for_user(user_id).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "mood series fetch failed, synthesizing");
                Vec::new()
            }
        };

        Self::fill_series(user_id, entries, days, today)
    }

    fn fill_series(
        user_id: &str,
        entries: Vec<MoodEntry>,
        days: u32,
        today: NaiveDate,
    ) -> Vec<MoodEntry> {
        let window_start = today - Duration::days(i64::from(days) - 1);

        let mut by_date: HashMap<NaiveDate, MoodEntry> = entries
            .into_iter()
            .filter(|e| e.date >= window_start && e.date <= today)
            .map(|e| (e.date, e))
            .collect();

        (0..days)
            .map(|offset| {
                let date = window_start + Duration::days(i64::from(offset));
                by_date
                    .remove(&date)
                    .unwrap_or_else(|| MoodEntry::neutral(user_id, date))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::{RecordStore, SqliteStore};
    use chrono::{TimeZone, Utc};

    fn fixture() -> (Arc<dyn RecordStore>, MoodAggregator) {
        let store = SqliteStore::open_in_memory().unwrap();
        store.migrate().unwrap();
        let store: Arc<dyn RecordStore> = Arc::new(store);
        let clock = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap(),
        ));
        let aggregator = MoodAggregator::new(MoodRepo::new(store.clone()), clock);
        (store, aggregator)
    }

    async fn seed_mood(store: &Arc<dyn RecordStore>, day: u32, mood: f64) {
        let date = NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        let entry = MoodEntry {
            user_id: "u1".to_string(),
            date,
            mood,
            energy: 6.0,
            stress: 4.0,
            anxiety: 2.0,
            sleep: 7.0,
            synthetic: false,
        };
        MoodRepo::new(store.clone()).upsert(&entry).await.unwrap();
    }

    #[tokio::test]
    async fn test_score_defaults_to_neutral_with_no_entries() {
        let (_store, aggregator) = fixture();
        assert_eq!(aggregator.calculate_mood_score("u1").await, 7.0);
    }

    #[tokio::test]
    async fn test_score_is_one_decimal_mean() {
        let (store, aggregator) = fixture();
        seed_mood(&store, 12, 6.0).await;
        seed_mood(&store, 13, 8.0).await;
        seed_mood(&store, 14, 10.0).await;

        assert_eq!(aggregator.calculate_mood_score("u1").await, 8.0);
    }

    #[tokio::test]
    async fn test_score_rounds_to_one_decimal() {
        let (store, aggregator) = fixture();
        seed_mood(&store, 13, 7.0).await;
        seed_mood(&store, 14, 6.0).await;
        seed_mood(&store, 15, 7.0).await;

        // 20/3 = 6.666... -> 6.7
        assert_eq!(aggregator.calculate_mood_score("u1").await, 6.7);
    }

    #[tokio::test]
    async fn test_series_has_fixed_length_when_empty() {
        let (_store, aggregator) = fixture();
        let series = aggregator.mood_series("u1", 7).await;
        assert_eq!(series.len(), 7);
        assert!(series.iter().all(|e| e.synthetic));
        assert!(series.iter().all(|e| e.mood == 7.0 && e.stress == 3.0));
    }

    #[tokio::test]
    async fn test_series_has_fixed_length_with_partial_data() {
        let (store, aggregator) = fixture();
        seed_mood(&store, 14, 9.0).await;
        seed_mood(&store, 15, 4.0).await;

        let series = aggregator.mood_series("u1", 7).await;
        assert_eq!(series.len(), 7);
        // Oldest first, ending today.
        assert_eq!(
            series[0].date,
            NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
        );
        assert_eq!(
            series[6].date,
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
        );
        assert_eq!(series[5].mood, 9.0);
        assert!(!series[5].synthetic);
        assert_eq!(series[6].mood, 4.0);
        assert_eq!(series.iter().filter(|e| e.synthetic).count(), 5);
    }

    #[tokio::test]
    async fn test_series_length_holds_with_more_entries_than_days() {
        let (store, aggregator) = fixture();
        for day in 1..=15 {
            seed_mood(&store, day, 5.0).await;
        }

        let series = aggregator.mood_series("u1", 7).await;
        assert_eq!(series.len(), 7);
        assert!(series.iter().all(|e| !e.synthetic));
        assert!(series.iter().all(|e| e.mood == 5.0));
    }

    #[tokio::test]
    async fn test_series_discards_entries_outside_window() {
        let (store, aggregator) = fixture();
        seed_mood(&store, 1, 2.0).await; // 14 days before today

        let series = aggregator.mood_series("u1", 7).await;
        assert_eq!(series.len(), 7);
        assert!(series.iter().all(|e| e.synthetic));
    }
}
