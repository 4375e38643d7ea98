// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! GraphQL endpoint.
//!
//! ```graphql
//! type Query {
//!   hello: String
//! }
//! ```

use async_graphql::{Context, EmptyMutation, EmptySubscription, ErrorExtensions, Object, Schema};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;

use crate::auth::{Auth, VerifiedClaims};
use crate::identity::IdentityResolver;
use crate::state::AppState;

pub type AppSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub fn build_schema(resolver: IdentityResolver) -> AppSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(resolver)
        .finish()
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Greets the caller by the display name of the user behind the token.
    async fn hello(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<String>> {
        let claims = ctx.data::<VerifiedClaims>()?;
        let resolver = ctx.data::<IdentityResolver>()?;

        let user = resolver.resolve_user(claims).map_err(|e| e.extend())?;
        Ok(Some(format!("Hello {}!", user.display_name)))
    }
}

/// `GET`/`POST /graphql`. The verified claims become per-request schema data.
pub async fn graphql_handler(
    State(state): State<AppState>,
    Auth(claims): Auth,
    request: GraphQLRequest,
) -> GraphQLResponse {
    state
        .schema
        .execute(request.into_inner().data(claims))
        .await
        .into()
}
