// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! This module provides Auth0 JWT authentication for the GraphQL endpoint.
//!
//! ## Auth Flow
//!
//! 1. Client obtains an access token from Auth0 (e.g. client-credentials grant)
//! 2. Client sends `Authorization: Bearer <JWT>`
//! 3. Server:
//!    - Fetches the tenant JWKS via HTTPS (cached, rate-limited)
//!    - Verifies JWT signature (RS256 only), expiry, issuer, audience
//!    - Stores the resulting `VerifiedClaims` in the request extensions
//!
//! Any failure produces a 401 with `WWW-Authenticate: Bearer realm="graphql"`.

pub mod claims;
pub mod error;
pub mod extractor;
pub mod jwks;
pub mod middleware;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testutil;

pub use claims::VerifiedClaims;
pub use error::AuthError;
pub use extractor::Auth;
pub use jwks::{HttpKeySetSource, JwksManager, KeySetSource};
pub use middleware::require_auth;
pub use verifier::{ClaimsVerifier, JwtVerifier};
