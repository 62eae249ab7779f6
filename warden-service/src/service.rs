//! The verification service: cache-aside orchestration of one compliance
//! check.

use std::sync::Arc;
use tracing::{debug, warn};
use warden_cache::{CacheBackend, CacheStats, InMemoryCacheBackend, RecordCache};
use warden_core::{
    AuthorityError, CancelToken, ComplianceChecker, RecordId, RetryError, VerificationResult,
    WardenConfig, WardenError, WardenResult,
};

use crate::remote::RemoteAuthority;
use crate::retry::RetryExecutor;

/// Checks a resource-limit rule against state owned by a remote authority,
/// through a cache that shields the verification path from repeated remote
/// calls and failures.
///
/// Collaborators are injected at construction; there are no hidden
/// singletons. The service is cheap to share: the cache is internally
/// reference-counted and the authority arrives in an `Arc`.
///
/// # Flow per call
///
/// cache hit → decide. Cache miss → fetch via the retry executor → update
/// the cache → decide. If the authority stays unreachable after retries the
/// verdict is a deny (`AuthorityUnreachable`): when authoritative state
/// cannot be consulted, wrongly allowing a unit past a hard limit is worse
/// than wrongly denying one request.
pub struct VerificationService<A, B>
where
    A: RemoteAuthority,
    B: CacheBackend,
{
    authority: Arc<A>,
    cache: RecordCache<B>,
    retry: RetryExecutor,
}

impl<A: RemoteAuthority> VerificationService<A, InMemoryCacheBackend> {
    /// Wire a service over an in-memory cache from a validated config.
    pub fn with_config(
        authority: Arc<A>,
        config: WardenConfig,
    ) -> WardenResult<Self> {
        config.validate()?;
        Ok(Self::new(
            authority,
            RecordCache::in_memory(config.cache),
            RetryExecutor::new(config.retry),
        ))
    }
}

impl<A, B> VerificationService<A, B>
where
    A: RemoteAuthority,
    B: CacheBackend,
{
    pub fn new(authority: Arc<A>, cache: RecordCache<B>, retry: RetryExecutor) -> Self {
        Self {
            authority,
            cache,
            retry,
        }
    }

    /// Decide whether one more unit may be added against the record's limit.
    ///
    /// A cache hit short-circuits: no remote call is made. On a miss, the
    /// fetch runs under the retry budget; a success populates the cache
    /// before deciding so the next caller benefits.
    ///
    /// # Errors
    ///
    /// Only `Cancelled` (the token fired) and cache-layer faults surface as
    /// errors. Remote failures become verdicts: `RecordNotFound` for an
    /// unknown id, `AuthorityUnreachable` after the retry budget is spent.
    pub async fn check_compliance(
        &self,
        record_id: &RecordId,
        cancel: &dyn CancelToken,
    ) -> WardenResult<VerificationResult> {
        if let Some(snapshot) = self.cache.get(record_id).await? {
            debug!(%record_id, "cache hit, deciding from cached snapshot");
            return Ok(ComplianceChecker::evaluate(snapshot));
        }

        debug!(%record_id, "cache miss, fetching from authority");
        match self
            .retry
            .run(cancel, || self.authority.fetch(record_id))
            .await
        {
            Ok(snapshot) => {
                self.cache.put(&snapshot).await?;
                Ok(ComplianceChecker::evaluate(snapshot))
            }
            Err(RetryError::Permanent(AuthorityError::NotFound { .. })) => {
                debug!(%record_id, "record unknown to authority");
                Ok(VerificationResult::record_not_found())
            }
            Err(RetryError::Permanent(err))
            | Err(RetryError::Exhausted {
                last_error: err, ..
            }) => {
                warn!(%record_id, error = %err, "authority unavailable, failing closed");
                Ok(VerificationResult::authority_unreachable())
            }
            Err(RetryError::Cancelled) => Err(WardenError::Cancelled),
        }
    }

    /// Drop the cached snapshot for a record. Callers invoke this after a
    /// local write that changed the count, so the next check re-fetches.
    pub async fn invalidate(&self, record_id: &RecordId) -> WardenResult<bool> {
        self.cache.invalidate(record_id).await
    }

    /// Cache usage statistics (hit rate, evictions).
    pub async fn cache_stats(&self) -> WardenResult<CacheStats> {
        self.cache.stats().await
    }
}
