// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read-only user and identity tables.
//!
//! Users are linked to their authentication-provider identities through a
//! separate table, so one user can sign in through several identities (and
//! several issuers) without cluttering the user record.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Application user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
}

/// Link from an authentication-provider subject to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub user_id: UserId,
}

/// Data access for users and identities.
pub trait UserStore: Send + Sync {
    fn user_by_id(&self, id: UserId) -> Option<User>;

    /// Exact, case-sensitive lookup.
    fn identity_by_subject(&self, subject: &str) -> Option<Identity>;
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: HashMap<UserId, User>,
    identities: HashMap<String, Identity>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tables the server starts with.
    pub fn fixtures() -> Self {
        Self::new()
            .with_user(UserId(1), "Martin")
            .with_identity("jMGqRLbIMYf9UQhZs6i5f9mgkiZpD0Yt@clients", UserId(1))
    }

    pub fn with_user(mut self, id: UserId, display_name: impl Into<String>) -> Self {
        self.users.insert(
            id,
            User {
                id,
                display_name: display_name.into(),
            },
        );
        self
    }

    /// Referential integrity with the user table is not checked.
    pub fn with_identity(mut self, subject: impl Into<String>, user_id: UserId) -> Self {
        let subject = subject.into();
        self.identities
            .insert(subject.clone(), Identity { subject, user_id });
        self
    }
}

impl UserStore for InMemoryStore {
    fn user_by_id(&self, id: UserId) -> Option<User> {
        self.users.get(&id).cloned()
    }

    fn identity_by_subject(&self, subject: &str) -> Option<Identity> {
        self.identities.get(subject).cloned()
    }
}
