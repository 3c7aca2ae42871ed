//! Day-streak tracking
//!
//! One streak document per user: consecutive calendar days with at least
//! one completed conversation. Updated as a side effect of recording a
//! conversation; mood entries do not touch it.

use crate::clock::Clock;
use crate::error::Result;
use crate::store::StreakRepo;
use crate::types::StreakRecord;
use std::sync::Arc;

/// Maintains the per-user streak document.
///
/// `update_streak` is a conditional read-modify-write: the write back is
/// guarded on the `last_active_date` that was read, so two conversation
/// completions racing across a day boundary cannot both increment.
pub struct StreakTracker {
    repo: StreakRepo,
    clock: Arc<dyn Clock>,
}

impl StreakTracker {
    pub fn new(repo: StreakRepo, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// The user's streak record, defaulting to an empty one.
    ///
    /// Store failures propagate; the facade decides how to surface them.
    pub async fn get_streak(&self, user_id: &str) -> Result<StreakRecord> {
        Ok(self
            .repo
            .get(user_id)
            .await?
            .unwrap_or_else(|| StreakRecord::empty(user_id)))
    }

    /// Record activity for today and return the updated record.
    ///
    /// Same calendar day: no change. Yesterday active: streak continues.
    /// Anything older (or first-ever activity): streak resets to 1.
    /// `longest_streak` never decreases and always covers `current_streak`.
    ///
    /// Calling twice on the same day is a no-op after the first call.
    pub async fn update_streak(&self, user_id: &str) -> Result<StreakRecord> {
        let current = self.get_streak(user_id).await?;
        let updated = self.advance(&current);

        let guard = current.last_active_date.map(|_| current.last_active_str());
        if self.repo.put_when(&updated, guard.as_deref()).await? {
            return Ok(updated);
        }

        // Lost the swap to a concurrent update. Re-read once: if the fresh
        // record already shows today, the race was the idempotent same-day
        // case; otherwise recompute against the fresher state.
        tracing::warn!(user_id, "streak swap lost, re-reading");
        let fresh = self.get_streak(user_id).await?;
        if fresh.last_active_date == Some(self.clock.today()) {
            return Ok(fresh);
        }

        let updated = self.advance(&fresh);
        let guard = fresh.last_active_date.map(|_| fresh.last_active_str());
        self.repo.put_when(&updated, guard.as_deref()).await?;
        Ok(updated)
    }

    fn advance(&self, record: &StreakRecord) -> StreakRecord {
        let today = self.clock.today();
        let yesterday = self.clock.yesterday();

        let mut updated = record.clone();
        match record.last_active_date {
            Some(last) if last == today => {}
            Some(last) if last == yesterday => {
                updated.current_streak += 1;
                updated.last_active_date = Some(today);
            }
            _ => {
                updated.current_streak = 1;
                updated.last_active_date = Some(today);
            }
        }
        updated.longest_streak = updated.longest_streak.max(updated.current_streak);
        updated
    }
}
