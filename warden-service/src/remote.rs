//! Remote authority contract and HTTP client.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use warden_core::{AuthorityError, RecordId, RecordSnapshot};

/// The external system of record for counts and limits.
///
/// A single fallible call with no retry logic of its own; retries are the
/// caller's responsibility. `fetch` is idempotent from the caller's point
/// of view.
#[async_trait]
pub trait RemoteAuthority: Send + Sync {
    /// Fetch the authoritative snapshot for a record.
    ///
    /// # Returns
    /// * `Ok(RecordSnapshot)` - current count and limit, stamped on arrival
    /// * `Err(AuthorityError::NotFound)` - the record is unknown
    /// * `Err(AuthorityError::Unreachable)` - the authority cannot be contacted
    async fn fetch(&self, record_id: &RecordId) -> Result<RecordSnapshot, AuthorityError>;
}

/// Wire payload returned by the authority.
#[derive(Debug, Deserialize)]
struct RecordPayload {
    record_id: String,
    current_count: u32,
    limit: u32,
}

/// HTTP client for an authority exposing `GET {base_url}/records/{id}`.
pub struct HttpAuthorityClient {
    client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpAuthorityClient {
    /// Create a client with the default 10 s request timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(10))
    }

    /// Create a client with an explicit per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            request_timeout,
        }
    }
}

#[async_trait]
impl RemoteAuthority for HttpAuthorityClient {
    async fn fetch(&self, record_id: &RecordId) -> Result<RecordSnapshot, AuthorityError> {
        let url = format!(
            "{}/records/{}",
            self.base_url.trim_end_matches('/'),
            record_id
        );

        let response = self
            .client
            .get(&url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| AuthorityError::Unreachable {
                reason: format!("request failed: {e}"),
            })?;

        let status = response.status();
        if status.is_success() {
            let payload: RecordPayload =
                response
                    .json()
                    .await
                    .map_err(|e| AuthorityError::Unreachable {
                        reason: format!("invalid response body: {e}"),
                    })?;

            Ok(RecordSnapshot {
                record_id: RecordId::from(payload.record_id),
                current_count: payload.current_count,
                limit: payload.limit,
                fetched_at: Utc::now(),
            })
        } else if status == StatusCode::NOT_FOUND {
            Err(AuthorityError::NotFound {
                record_id: record_id.clone(),
            })
        } else {
            Err(AuthorityError::Unreachable {
                reason: format!("authority returned status {status}"),
            })
        }
    }
}

impl std::fmt::Debug for HttpAuthorityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAuthorityClient")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
