// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the verified claim set handed to resolvers.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Claims decoded from an access token.
///
/// A client-credentials token from Auth0 looks like:
///
/// ```json
/// {
///   "iss": "https://dev-cc-example.us.auth0.com/",
///   "sub": "jMGqRLbIMYf9UQhZs6i5f9mgkiZpD0Yt@clients",
///   "aud": "https://graphqlauth.example/graphql",
///   "iat": 1626125839,
///   "exp": 1626212239,
///   "azp": "jMGqRLbIMYf9UQhZs6i5f9mgkiZpD0Yt",
///   "gty": "client-credentials"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub(super) struct JwtClaims {
    /// Subject (principal identifier, unique per issuer)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Audience (string or array)
    pub aud: Audience,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    #[serde(default)]
    pub iat: Option<i64>,
    /// Authorized party
    #[serde(default)]
    pub azp: Option<String>,
    /// Grant type
    #[serde(default)]
    pub gty: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    fn into_vec(self) -> Vec<String> {
        match self {
            Audience::Single(aud) => vec![aud],
            Audience::Multiple(auds) => auds,
        }
    }
}

/// Claims of a token whose signature, issuer, audience and expiry have been
/// checked.
///
/// Only the `auth` module can build this type, so holding one proves the
/// request went through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims {
    subject: String,
    issuer: String,
    audience: Vec<String>,
    expires_at: i64,
    issued_at: Option<i64>,
    authorized_party: Option<String>,
    grant_type: Option<String>,
}

impl VerifiedClaims {
    pub(super) fn from_jwt(claims: JwtClaims) -> Self {
        Self {
            subject: claims.sub,
            issuer: claims.iss,
            audience: claims.aud.into_vec(),
            expires_at: claims.exp,
            issued_at: claims.iat,
            authorized_party: claims.azp,
            grant_type: claims.gty,
        }
    }

    /// Subject (`sub`) of the token.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &[String] {
        &self.audience
    }

    /// Expiry as a timestamp, `None` if out of chrono's range.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires_at, 0)
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.issued_at.and_then(|iat| DateTime::from_timestamp(iat, 0))
    }

    pub fn authorized_party(&self) -> Option<&str> {
        self.authorized_party.as_deref()
    }

    pub fn grant_type(&self) -> Option<&str> {
        self.grant_type.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn for_subject(subject: &str) -> Self {
        Self {
            subject: subject.to_string(),
            issuer: super::testutil::TEST_ISSUER.to_string(),
            audience: vec![super::testutil::TEST_AUDIENCE.to_string()],
            expires_at: 1_900_000_000,
            issued_at: None,
            authorized_party: None,
            grant_type: None,
        }
    }
}
