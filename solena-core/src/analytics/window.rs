//! Time windows and in-memory record combinators
//!
//! The store cannot filter by date or sort by start time, so every
//! windowed statistic is "fetch everything, then narrow here". These
//! combinators make that pattern one visible, testable seam instead of
//! ad-hoc loops inside each aggregator.

use crate::types::ConversationRecord;
use chrono::{DateTime, Duration, Utc};

/// Trailing time range used to scope conversation statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    /// Trailing 7 days
    Week,
    /// Trailing 30 days
    Month,
    /// Trailing 90 days
    Quarter,
}

impl TimeWindow {
    /// Number of trailing days this window covers.
    pub fn days(&self) -> i64 {
        match self {
            TimeWindow::Week => 7,
            TimeWindow::Month => 30,
            TimeWindow::Quarter => 90,
        }
    }

    /// The window's start instant, relative to `now`.
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.days())
    }

    /// Returns the identifier used for logging and display
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Quarter => "quarter",
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Retain only records whose start instant falls inside the window.
pub fn filter_by_window(
    records: Vec<ConversationRecord>,
    window: TimeWindow,
    now: DateTime<Utc>,
) -> Vec<ConversationRecord> {
    let start = window.start(now);
    records
        .into_iter()
        .filter(|r| r.started_at >= start)
        .collect()
}

/// Sort records by start time, most recent first.
pub fn sort_by_started_desc(records: &mut [ConversationRecord]) {
    records.sort_by(|a, b| b.started_at.cmp(&a.started_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConversationCategory, NewConversation};
    use chrono::TimeZone;

    fn record_started_days_ago(now: DateTime<Utc>, days: i64) -> ConversationRecord {
        let started = now - Duration::days(days);
        ConversationRecord::from_new(NewConversation {
            user_id: "u1".to_string(),
            category: ConversationCategory::Wellness,
            started_at: started,
            ended_at: started + Duration::minutes(10),
            mood_before: None,
            mood_after: None,
            topics: vec![],
            satisfaction: None,
            notes: None,
            external_session_id: None,
        })
        .unwrap()
    }

    #[test]
    fn test_window_boundaries() {
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
        // 40 days old: outside week and month, inside quarter.
        let records = vec![record_started_days_ago(now, 40)];

        assert!(filter_by_window(records.clone(), TimeWindow::Week, now).is_empty());
        assert!(filter_by_window(records.clone(), TimeWindow::Month, now).is_empty());
        assert_eq!(filter_by_window(records, TimeWindow::Quarter, now).len(), 1);
    }

    #[test]
    fn test_sort_most_recent_first() {
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
        let mut records = vec![
            record_started_days_ago(now, 3),
            record_started_days_ago(now, 1),
            record_started_days_ago(now, 2),
        ];
        sort_by_started_desc(&mut records);

        let days: Vec<i64> = records
            .iter()
            .map(|r| (now - r.started_at).num_days())
            .collect();
        assert_eq!(days, vec![1, 2, 3]);
    }
}
