// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use async_graphql::ErrorExtensions;

use crate::store::UserId;

/// Failures while mapping a verified subject to a user.
///
/// These surface as GraphQL execution errors; the message is not masked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Only raised under `UnknownIdentityPolicy::Reject`.
    #[error("no identity is registered for subject '{subject}'")]
    UnknownIdentity { subject: String },

    #[error("identity '{subject}' references missing user {user_id}")]
    DataIntegrity { subject: String, user_id: UserId },
}

impl ResolveError {
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::UnknownIdentity { .. } => "UNKNOWN_IDENTITY",
            ResolveError::DataIntegrity { .. } => "DATA_INTEGRITY",
        }
    }
}

impl ErrorExtensions for ResolveError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", code.to_string()))
    }
}
