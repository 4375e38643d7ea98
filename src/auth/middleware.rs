// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! The gate runs before any handler on the routes it wraps. A request that
//! fails verification never reaches the handler; it gets the 401 rendered
//! by [`AuthError`]. On success the [`VerifiedClaims`] are stored in the
//! request extensions for the `Auth` extractor to pick up.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/graphql", post(graphql_handler))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_auth))
//!     .with_state(state);
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::extractor::authenticate;
use crate::state::AppState;

/// Authentication middleware function.
pub async fn require_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let verified = authenticate(request.headers(), state.verifier.as_ref()).await;
    match verified {
        Ok(claims) => {
            debug!(
                sub = claims.subject(),
                expires_at = ?claims.expires_at(),
                "Request authenticated"
            );
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            debug!(code = e.error_code(), error = %e, "Rejected unauthenticated request");
            e.into_response()
        }
    }
}
