//! Dashboard metrics for the companion home view
//!
//! The compact header numbers: mood, this week's sessions and minutes,
//! and the day streak. Recomputed on every facade refresh.

use crate::types::NEUTRAL_MOOD;

/// Presentation-facing aggregate for the dashboard header.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardMetrics {
    /// Rolling mood score (0-10, one decimal)
    pub mood_score: f64,
    /// Completed sessions in the trailing week
    pub sessions_this_week: i64,
    /// Minutes spent in those sessions
    pub total_minutes: i64,
    /// Current day streak
    pub streak_days: i64,
    /// Goals placeholder. The goals feature ships later; the card slot
    /// already exists
    pub goals_completed: i64,
    /// Goals placeholder
    pub goals_total: i64,
}

impl Default for DashboardMetrics {
    fn default() -> Self {
        Self {
            mood_score: NEUTRAL_MOOD,
            sessions_this_week: 0,
            total_minutes: 0,
            streak_days: 0,
            goals_completed: 0,
            goals_total: 0,
        }
    }
}

impl DashboardMetrics {
    /// Format total minutes for display (e.g., "1h 25m" or "45m").
    pub fn format_minutes(&self) -> String {
        let hours = self.total_minutes / 60;
        let mins = self.total_minutes % 60;
        if hours > 0 {
            format!("{}h {}m", hours, mins)
        } else {
            format!("{}m", mins)
        }
    }

    /// Format the streak for display (e.g., "5-day streak").
    pub fn format_streak(&self) -> String {
        match self.streak_days {
            0 => "No streak yet".to_string(),
            1 => "1-day streak".to_string(),
            n => format!("{}-day streak", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty_user_view() {
        let metrics = DashboardMetrics::default();
        assert_eq!(metrics.mood_score, 7.0);
        assert_eq!(metrics.sessions_this_week, 0);
        assert_eq!(metrics.total_minutes, 0);
        assert_eq!(metrics.streak_days, 0);
    }

    #[test]
    fn test_format_minutes() {
        let mut metrics = DashboardMetrics::default();
        metrics.total_minutes = 45;
        assert_eq!(metrics.format_minutes(), "45m");
        metrics.total_minutes = 85;
        assert_eq!(metrics.format_minutes(), "1h 25m");
    }

    #[test]
    fn test_format_streak() {
        let mut metrics = DashboardMetrics::default();
        assert_eq!(metrics.format_streak(), "No streak yet");
        metrics.streak_days = 1;
        assert_eq!(metrics.format_streak(), "1-day streak");
        metrics.streak_days = 12;
        assert_eq!(metrics.format_streak(), "12-day streak");
    }
}
