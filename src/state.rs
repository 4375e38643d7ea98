// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::api::graphql::{build_schema, AppSchema};
use crate::auth::{AuthError, ClaimsVerifier, HttpKeySetSource, JwksManager, JwtVerifier};
use crate::config::Config;
use crate::identity::IdentityResolver;
use crate::store::InMemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn ClaimsVerifier>,
    pub jwks: Arc<JwksManager>,
    pub schema: AppSchema,
}

impl AppState {
    pub fn new(
        verifier: Arc<dyn ClaimsVerifier>,
        jwks: Arc<JwksManager>,
        resolver: IdentityResolver,
    ) -> Self {
        Self {
            verifier,
            jwks,
            schema: build_schema(resolver),
        }
    }

    /// Production wiring: remote JWKS, fixture user tables.
    pub fn from_config(config: &Config) -> Result<Self, AuthError> {
        let source = HttpKeySetSource::new(config.auth.jwks_url.clone())?;
        let jwks = Arc::new(
            JwksManager::new(Arc::new(source))
                .with_cache_ttl(config.jwks_cache_ttl)
                .with_rate_limit(config.jwks_requests_per_minute),
        );
        let verifier = JwtVerifier::new(
            jwks.clone(),
            config.auth.issuer.clone(),
            config.auth.audience.clone(),
        );
        let resolver = IdentityResolver::new(Arc::new(InMemoryStore::fixtures()))
            .with_policy(config.unknown_identity_policy);

        Ok(Self::new(Arc::new(verifier), jwks, resolver))
    }
}
