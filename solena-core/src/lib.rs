//! # solena-core
//!
//! Analytics aggregation engine for the Solena wellbeing companion.
//!
//! This library provides:
//! - Domain types for conversations, mood entries, and streaks
//! - A record store gateway constrained to single-predicate queries
//! - Aggregators for mood, conversation, streak, and wellness metrics
//! - The per-user analytics facade consumed by the companion UI
//!
//! ## Architecture
//!
//! Data flows one direction:
//! - **Store gateway:** coarse fetches (one equality predicate) and keyed upserts
//! - **Aggregators:** in-memory filtering, windowing, and gap-filling
//! - **Facade:** concurrent fan-out, atomic snapshot, mutation entry points
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use solena_core::{AnalyticsEngine, Config, SqliteStore};
//! use solena_core::clock::SystemClock;
//! use solena_core::external::NullSessionProvider;
//!
//! # async fn example() -> solena_core::Result<()> {
//! let store = SqliteStore::open(&Config::database_path())?;
//! store.migrate()?;
//!
//! let mut engine = AnalyticsEngine::new(
//!     "user-123",
//!     Arc::new(store),
//!     Arc::new(NullSessionProvider),
//!     Arc::new(SystemClock),
//! );
//! engine.refresh().await;
//! println!("streak: {}", engine.dashboard().streak_days);
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{
    AnalyticsEngine, ConversationStats, DashboardMetrics, TimeWindow, UsageDistribution,
    WellnessMetrics,
};
pub use config::Config;
pub use error::{Error, Result};
pub use store::{RecordStore, SqliteStore};
pub use types::*;

// Public modules
pub mod analytics;
pub mod clock;
pub mod config;
pub mod error;
pub mod external;
pub mod logging;
pub mod store;
pub mod types;
