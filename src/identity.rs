// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Maps verified token subjects to application users.
//!
//! The resolver only accepts [`VerifiedClaims`], which cannot be built
//! outside the auth gate, so every lookup is for an authenticated subject.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::auth::VerifiedClaims;
use crate::error::ResolveError;
use crate::store::{UserId, UserStore};

/// Display name given to subjects with no identity record.
pub const PLACEHOLDER_DISPLAY_NAME: &str = "New user";

/// What to do with a verified subject that has no identity record.
///
/// Provisioning an identity on first sight is left to a real datastore;
/// this server only answers with a placeholder or refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownIdentityPolicy {
    /// Resolve to an anonymous placeholder user.
    #[default]
    Placeholder,
    /// Fail resolution with [`ResolveError::UnknownIdentity`].
    Reject,
}

impl FromStr for UnknownIdentityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "placeholder" => Ok(Self::Placeholder),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown identity policy '{other}'")),
        }
    }
}

impl fmt::Display for UnknownIdentityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => write!(f, "placeholder"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// The user a request acts as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    /// `None` for the placeholder user.
    pub id: Option<UserId>,
    pub display_name: String,
}

impl UserView {
    fn placeholder() -> Self {
        Self {
            id: None,
            display_name: PLACEHOLDER_DISPLAY_NAME.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn UserStore>,
    policy: UnknownIdentityPolicy,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            policy: UnknownIdentityPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnknownIdentityPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> UnknownIdentityPolicy {
        self.policy
    }

    /// Resolve the user behind a verified token. Read-only.
    pub fn resolve_user(&self, claims: &VerifiedClaims) -> Result<UserView, ResolveError> {
        let subject = claims.subject();

        let Some(identity) = self.store.identity_by_subject(subject) else {
            return match self.policy {
                UnknownIdentityPolicy::Placeholder => Ok(UserView::placeholder()),
                UnknownIdentityPolicy::Reject => Err(ResolveError::UnknownIdentity {
                    subject: subject.to_string(),
                }),
            };
        };

        let user = self
            .store
            .user_by_id(identity.user_id)
            .ok_or_else(|| ResolveError::DataIntegrity {
                subject: subject.to_string(),
                user_id: identity.user_id,
            })?;

        Ok(UserView {
            id: Some(user.id),
            display_name: user.display_name,
        })
    }
}
