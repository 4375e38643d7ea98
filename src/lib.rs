// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! GraphQL Auth Gate - Auth0-protected GraphQL API
//!
//! Every `/graphql` request must carry an RS256 bearer token issued by the
//! configured Auth0 tenant. Verified claims are mapped to an application
//! user and exposed to resolvers.
//!
//! ## Modules
//!
//! - `api` - HTTP router, GraphQL schema and health probes (Axum)
//! - `auth` - Bearer token verification against the tenant JWKS
//! - `config` - Environment configuration
//! - `identity` - Subject to user resolution
//! - `store` - User and identity tables

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod identity;
pub mod state;
pub mod store;
