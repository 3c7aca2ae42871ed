//! Analytics module for solena
//!
//! Turns a user's raw interaction history into the derived metrics the
//! companion UI renders:
//! - Day-streak tracking
//! - Rolling mood score and gap-filled mood series
//! - Windowed conversation statistics and usage distribution
//! - Multi-dimensional wellness score
//! - The per-user facade orchestrating all of the above
//!
//! ## The coarse-fetch constraint
//!
//! The backing store answers exactly one kind of query: "all documents of
//! a collection matching one equality predicate". Every aggregator here
//! therefore fetches a user's full record set and does its filtering,
//! sorting, windowing, and gap-filling in memory. See [`window`] for the
//! shared combinators that keep that pattern in one place.

pub mod conversation;
pub mod dashboard;
pub mod engine;
pub mod mood;
pub mod streak;
pub mod wellness;
pub mod window;

pub use conversation::{
    CategoryUsage, ConversationStats, ConversationStatsAggregator, UsageDistribution, RECENT_LIMIT,
};
pub use dashboard::DashboardMetrics;
pub use engine::{AnalyticsEngine, MOOD_SERIES_DAYS};
pub use mood::{MoodAggregator, MOOD_SAMPLE_SIZE};
pub use streak::StreakTracker;
pub use wellness::{WellnessMetrics, WellnessMetricsCalculator};
pub use window::TimeWindow;

/// Round to one decimal place, the precision every displayed score uses.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
