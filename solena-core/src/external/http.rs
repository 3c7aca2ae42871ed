//! HTTP client for the avatar provider's session API

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::external::{SessionDetail, SessionProvider};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

/// HTTP-backed [`SessionProvider`].
pub struct HttpSessionProvider {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpSessionProvider {
    /// Create a provider client from configuration.
    ///
    /// Returns an error if the configuration is invalid or missing
    /// required fields.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        let base_url = config
            .base_url
            .clone()
            .ok_or_else(|| Error::Config("provider.base_url is required".to_string()))?
            .trim_end_matches('/')
            .to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(api_key) = &config.api_key {
            let auth_value = format!("Bearer {}", api_key);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth_value)
                    .map_err(|e| Error::Config(format!("invalid api_key: {}", e)))?,
            );
        }

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    async fn session_detail(&self, external_id: &str) -> Result<Option<SessionDetail>> {
        let url = format!("{}/sessions/{}", self.base_url, external_id);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if status.is_success() {
            let detail: SessionDetail = response
                .json()
                .await
                .map_err(|e| Error::Provider(format!("failed to parse response: {}", e)))?;
            Ok(Some(detail))
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            Err(Error::Provider(format!(
                "API error ({}): {}",
                status, error_text
            )))
        }
    }
}
