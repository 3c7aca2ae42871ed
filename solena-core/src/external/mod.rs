//! External video-avatar session provider
//!
//! Conversations run through a third-party avatar provider. Recordings and
//! transcripts arrive on the provider's own schedule, after the session has
//! already been recorded locally, so the engine pulls them on demand and
//! merges them into the stored conversation by its external-id linkage.

pub mod http;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use http::HttpSessionProvider;

/// Late-arriving detail for one provider session.
///
/// Every field is optional; an absent field means "not ready yet" and must
/// never overwrite a value the engine already stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionDetail {
    /// URL of the session recording
    pub recording_url: Option<String>,
    /// Session transcript
    pub transcript: Option<String>,
    /// Opaque provider metadata blob
    pub metadata: Option<serde_json::Value>,
}

/// Gateway to the avatar provider's session API.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Fetch detail for an external session id.
    ///
    /// `None` means the provider knows nothing about the id (or nothing is
    /// ready yet); transport and API failures are errors.
    async fn session_detail(&self, external_id: &str) -> Result<Option<SessionDetail>>;
}

/// Provider used when no external provider is configured.
///
/// Always answers `None`, so syncs become no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSessionProvider;

#[async_trait]
impl SessionProvider for NullSessionProvider {
    async fn session_detail(&self, _external_id: &str) -> Result<Option<SessionDetail>> {
        Ok(None)
    }
}
