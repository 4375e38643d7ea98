// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! ## Cache semantics
//!
//! - Keys are cached with a configurable TTL
//! - An unknown `kid` against a fresh cache triggers a refresh (key rotation)
//! - Fetches are limited to N per sliding minute; beyond that the cached
//!   set is served, even if stale
//! - Stale cache is used on fetch failure (fail-open for availability)
//! - Refreshes are single-flight: callers that miss the cache at the same
//!   time wait on one fetch instead of each issuing their own

use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet, PublicKeyUse};
use jsonwebtoken::DecodingKey;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};
use url::Url;

use super::error::AuthError;

/// Default JWKS cache TTL (10 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

/// Default JWKS fetch budget per minute.
pub const DEFAULT_REQUESTS_PER_MINUTE: NonZeroU32 = NonZeroU32::new(5).unwrap();

const RATE_WINDOW: Duration = Duration::from_secs(60);

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the key set comes from.
#[async_trait]
pub trait KeySetSource: Send + Sync {
    async fn fetch(&self) -> Result<JwkSet, AuthError>;
}

/// Fetches the key set over HTTPS from the issuer's well-known endpoint.
pub struct HttpKeySetSource {
    jwks_url: Url,
    client: reqwest::Client,
}

impl HttpKeySetSource {
    /// `jwks_url` is usually `https://<tenant>/.well-known/jwks.json`.
    pub fn new(jwks_url: Url) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Internal(format!("cannot build HTTP client: {e}")))?;

        Ok(Self { jwks_url, client })
    }

    pub fn jwks_url(&self) -> &Url {
        &self.jwks_url
    }
}

#[async_trait]
impl KeySetSource for HttpKeySetSource {
    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        let unavailable = |e: reqwest::Error| AuthError::KeySetUnavailable(e.to_string());

        self.client
            .get(self.jwks_url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(unavailable)?
            .json::<JwkSet>()
            .await
            .map_err(unavailable)
    }
}

/// JWKS cache entry.
struct CacheEntry {
    jwks: Arc<JwkSet>,
    fetched_at: Instant,
}

/// Sliding one-minute window of fetch timestamps.
struct FetchWindow {
    limit: usize,
    fetches: VecDeque<Instant>,
}

impl FetchWindow {
    fn new(limit: NonZeroU32) -> Self {
        Self {
            limit: limit.get() as usize,
            fetches: VecDeque::new(),
        }
    }

    /// Record a fetch at `now` if the budget allows it.
    fn try_acquire(&mut self, now: Instant) -> bool {
        while let Some(oldest) = self.fetches.front() {
            if now.saturating_duration_since(*oldest) >= RATE_WINDOW {
                self.fetches.pop_front();
            } else {
                break;
            }
        }

        if self.fetches.len() >= self.limit {
            return false;
        }
        self.fetches.push_back(now);
        true
    }
}

/// Guarded by the refresh lock.
struct RefreshState {
    window: FetchWindow,
    /// Outcome of the most recent fetch, if it failed.
    last_error: Option<AuthError>,
}

impl RefreshState {
    fn new(limit: NonZeroU32) -> Self {
        Self {
            window: FetchWindow::new(limit),
            last_error: None,
        }
    }
}

/// JWKS manager with caching, rate limiting and single-flight refresh.
pub struct JwksManager {
    source: Arc<dyn KeySetSource>,
    cache_ttl: Duration,
    cache: RwLock<Option<CacheEntry>>,
    /// Held for the whole duration of a refresh.
    refresh: Mutex<RefreshState>,
    /// Completed fetch attempts, bumped while the refresh lock is held.
    attempts: AtomicU64,
}

impl JwksManager {
    pub fn new(source: Arc<dyn KeySetSource>) -> Self {
        Self {
            source,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache: RwLock::new(None),
            refresh: Mutex::new(RefreshState::new(DEFAULT_REQUESTS_PER_MINUTE)),
            attempts: AtomicU64::new(0),
        }
    }

    /// Create with custom cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Create with a custom fetch budget.
    pub fn with_rate_limit(mut self, requests_per_minute: NonZeroU32) -> Self {
        self.refresh = Mutex::new(RefreshState::new(requests_per_minute));
        self
    }

    async fn snapshot(&self) -> Option<(Arc<JwkSet>, Instant)> {
        self.cache
            .read()
            .await
            .as_ref()
            .map(|entry| (entry.jwks.clone(), entry.fetched_at))
    }

    /// Get a decoding key for the given key ID, or the first usable
    /// signing key when the token carries no `kid`.
    pub async fn get_decoding_key(&self, kid: Option<&str>) -> Result<DecodingKey, AuthError> {
        let seen = self.snapshot().await;
        if let Some((jwks, fetched_at)) = &seen {
            if fetched_at.elapsed() < self.cache_ttl {
                if let Some(jwk) = select_jwk(jwks, kid) {
                    return jwk_to_decoding_key(jwk);
                }
                debug!(kid = ?kid, "Key not found in cached JWKS, refreshing");
            }
        }

        let jwks = self.refresh_after(seen.map(|(_, fetched_at)| fetched_at)).await?;
        let jwk = select_jwk(&jwks, kid).ok_or(AuthError::NoMatchingKey)?;
        jwk_to_decoding_key(jwk)
    }

    /// Refresh the cache unless the attempt we queued behind already
    /// settled it: a fresh entry other than the one fetched at `seen` is
    /// returned as is, and a failed attempt hands its error to every waiter.
    async fn refresh_after(&self, seen: Option<Instant>) -> Result<Arc<JwkSet>, AuthError> {
        let queued_at = self.attempts.load(Ordering::Acquire);
        let mut state = self.refresh.lock().await;

        if let Some((jwks, fetched_at)) = self.snapshot().await {
            if Some(fetched_at) != seen && fetched_at.elapsed() < self.cache_ttl {
                return Ok(jwks);
            }
        }

        if self.attempts.load(Ordering::Acquire) != queued_at {
            if let Some(err) = &state.last_error {
                debug!(error = %err, "Sharing outcome of the failed JWKS fetch");
                return self.cached_or(err.clone()).await;
            }
        }

        if !state.window.try_acquire(Instant::now()) {
            return match self.snapshot().await {
                Some((jwks, _)) => {
                    warn!("JWKS fetch rate limit reached, serving cached keys");
                    Ok(jwks)
                }
                None => Err(AuthError::KeySetRateLimited),
            };
        }

        let fetched = self.source.fetch().await;
        self.attempts.fetch_add(1, Ordering::AcqRel);

        match fetched {
            Ok(jwks) => {
                state.last_error = None;
                let jwks = Arc::new(jwks);
                *self.cache.write().await = Some(CacheEntry {
                    jwks: jwks.clone(),
                    fetched_at: Instant::now(),
                });
                debug!(keys = jwks.keys.len(), "JWKS refreshed");
                Ok(jwks)
            }
            Err(e) => {
                warn!(error = %e, "JWKS fetch failed");
                state.last_error = Some(e.clone());
                self.cached_or(e).await
            }
        }
    }

    async fn cached_or(&self, err: AuthError) -> Result<Arc<JwkSet>, AuthError> {
        match self.snapshot().await {
            Some((jwks, _)) => Ok(jwks),
            None => Err(err),
        }
    }

    /// Refresh the JWKS cache, subject to the fetch budget.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let seen = self.snapshot().await.map(|(_, fetched_at)| fetched_at);
        self.refresh_after(seen).await.map(|_| ())
    }

    /// Check if JWKS is currently cached and valid.
    pub async fn is_cached(&self) -> bool {
        match &*self.cache.read().await {
            Some(entry) => entry.fetched_at.elapsed() < self.cache_ttl,
            None => false,
        }
    }
}

fn select_jwk<'a>(jwks: &'a JwkSet, kid: Option<&str>) -> Option<&'a Jwk> {
    let mut signing_keys = jwks
        .keys
        .iter()
        .filter(|jwk| !matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption)));

    match kid {
        Some(kid) => signing_keys.find(|jwk| jwk.common.key_id.as_deref() == Some(kid)),
        None => signing_keys.find(|jwk| matches!(jwk.algorithm, AlgorithmParameters::RSA(_))),
    }
}

/// Convert a JWK to a DecodingKey.
fn jwk_to_decoding_key(jwk: &Jwk) -> Result<DecodingKey, AuthError> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
            .map_err(|e| AuthError::Internal(format!("unusable RSA key in JWKS: {e}"))),
        _ => Err(AuthError::Internal(
            "only RSA keys can verify RS256 tokens".to_string(),
        )),
    }
}
