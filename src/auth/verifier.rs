// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token verification.
//!
//! [`ClaimsVerifier`] is the seam between the HTTP gate and whatever turns a
//! bearer token into [`VerifiedClaims`]. [`JwtVerifier`] is the production
//! implementation: it checks the signature against the issuer's JWKS and
//! validates `iss`, `aud`, `exp` and `nbf`.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

use super::claims::JwtClaims;
use super::jwks::JwksManager;
use super::{AuthError, VerifiedClaims};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Turns a raw bearer token into verified claims.
#[async_trait]
pub trait ClaimsVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedClaims, AuthError>;
}

/// JWKS-backed JWT verifier.
pub struct JwtVerifier {
    jwks: Arc<JwksManager>,
    issuer: String,
    audience: String,
    algorithms: Vec<Algorithm>,
}

impl JwtVerifier {
    /// Create a verifier accepting `RS256` tokens for `audience` from `issuer`.
    pub fn new(jwks: Arc<JwksManager>, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            jwks,
            issuer: issuer.into(),
            audience: audience.into(),
            algorithms: vec![Algorithm::RS256],
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.algorithms = self.algorithms.clone();
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_nbf = true;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation
    }
}

#[async_trait]
impl ClaimsVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedClaims, AuthError> {
        // Decode header to get kid and alg
        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;

        // Reject disallowed algorithms before touching the key set
        if !self.algorithms.contains(&header.alg) {
            return Err(AuthError::UnsupportedAlgorithm);
        }

        let decoding_key = self.jwks.get_decoding_key(header.kid.as_deref()).await?;

        let token_data = decode::<JwtClaims>(token, &decoding_key, &self.validation(header.alg))
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                ErrorKind::InvalidAudience => AuthError::InvalidAudience,
                ErrorKind::InvalidAlgorithm => AuthError::UnsupportedAlgorithm,
                _ => AuthError::MalformedToken,
            })?;

        if token_data.claims.sub.is_empty() {
            return Err(AuthError::MalformedToken);
        }

        Ok(VerifiedClaims::from_jwt(token_data.claims))
    }
}
