// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for verified claims.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(claims): Auth) -> impl IntoResponse {
//!     // claims is VerifiedClaims
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{AuthError, ClaimsVerifier, VerifiedClaims};
use crate::state::AppState;

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The header must have exactly two space-separated parts and the scheme
/// is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::CredentialsRequired)?
        .to_str()
        .map_err(|_| AuthError::BadFormat)?;

    let parts: Vec<&str> = value.split(' ').collect();
    let [scheme, token] = parts.as_slice() else {
        return Err(AuthError::BadFormat);
    };

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::BadScheme);
    }
    if token.is_empty() {
        return Err(AuthError::BadFormat);
    }

    Ok(*token)
}

/// Verify the bearer token carried by `headers`.
pub async fn authenticate(
    headers: &HeaderMap,
    verifier: &dyn ClaimsVerifier,
) -> Result<VerifiedClaims, AuthError> {
    let token = bearer_token(headers)?;
    verifier.verify(token).await
}

/// Extractor for verified claims.
///
/// Reuses the claims stored by the gate middleware when present, and
/// verifies the header itself otherwise.
///
/// # Example
///
/// ```rust,ignore
/// async fn graphql_handler(
///     State(state): State<AppState>,
///     Auth(claims): Auth,
///     request: GraphQLRequest,
/// ) -> GraphQLResponse {
///     // claims.subject() is the verified `sub`
/// }
/// ```
pub struct Auth(pub VerifiedClaims);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // First check if middleware already verified the token
        if let Some(claims) = parts.extensions.get::<VerifiedClaims>().cloned() {
            return Ok(Auth(claims));
        }

        let claims = authenticate(&parts.headers, state.verifier.as_ref()).await?;
        Ok(Auth(claims))
    }
}
