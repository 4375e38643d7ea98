// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gate rejections.
//!
//! Every variant is rendered as the same 401 response so that clients can
//! re-authenticate on status alone. The body mimics a GraphQL error
//! response and carries a machine-readable code under `extensions.code`.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Value of the `WWW-Authenticate` header on every rejection.
pub const WWW_AUTHENTICATE_VALUE: &str = r#"Bearer realm="graphql""#;

#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("no authorization header was sent")]
    CredentialsRequired,

    #[error("authorization scheme is not Bearer")]
    BadScheme,

    /// Not exactly `Bearer <token>`, or not valid header text.
    #[error("authorization header is not of the form 'Bearer <token>'")]
    BadFormat,

    #[error("token could not be decoded")]
    MalformedToken,

    /// `alg` outside the allow-list, including `none` and HMAC.
    #[error("token signing algorithm is not accepted")]
    UnsupportedAlgorithm,

    #[error("token signature does not verify")]
    InvalidSignature,

    #[error("token is expired")]
    TokenExpired,

    #[error("token is not valid yet")]
    TokenNotYetValid,

    #[error("token was issued by an unexpected issuer")]
    InvalidIssuer,

    #[error("token is not meant for this audience")]
    InvalidAudience,

    #[error("no signing key matches the token")]
    NoMatchingKey,

    /// Fetch failed and nothing is cached.
    #[error("signing keys unavailable: {0}")]
    KeySetUnavailable(String),

    /// Fetch budget exhausted and nothing is cached.
    #[error("signing key fetch budget exhausted")]
    KeySetRateLimited,

    #[error("authentication failed internally: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct UnauthorizedBody {
    errors: [UnauthorizedEntry; 1],
}

#[derive(Serialize)]
struct UnauthorizedEntry {
    message: &'static str,
    extensions: UnauthorizedExtensions,
}

#[derive(Serialize)]
struct UnauthorizedExtensions {
    code: &'static str,
}

impl AuthError {
    /// Code reported under `extensions.code`.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CredentialsRequired => "credentials_required",
            Self::BadScheme => "credentials_bad_scheme",
            Self::BadFormat => "credentials_bad_format",
            Self::MalformedToken => "malformed_token",
            Self::UnsupportedAlgorithm => "unsupported_algorithm",
            Self::InvalidSignature => "invalid_signature",
            Self::TokenExpired => "token_expired",
            Self::TokenNotYetValid => "token_not_yet_valid",
            Self::InvalidIssuer => "invalid_issuer",
            Self::InvalidAudience => "invalid_audience",
            Self::NoMatchingKey => "no_matching_key",
            Self::KeySetUnavailable(_) => "jwks_unavailable",
            Self::KeySetRateLimited => "jwks_rate_limited",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = UnauthorizedBody {
            errors: [UnauthorizedEntry {
                message: "Unauthorized",
                extensions: UnauthorizedExtensions {
                    code: self.error_code(),
                },
            }],
        };
        (
            StatusCode::UNAUTHORIZED,
            [(WWW_AUTHENTICATE, HeaderValue::from_static(WWW_AUTHENTICATE_VALUE))],
            Json(body),
        )
            .into_response()
    }
}
