// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Unauthenticated probes.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Degraded,
    Unavailable,
}

/// `GET /health` body.
#[derive(Debug, Serialize)]
pub struct Readiness {
    pub status: Status,
    /// Whether verification keys can be served right now.
    pub jwks: Status,
}

/// `GET /health/live` body.
#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: Status,
}

/// A fresh cache counts as ready; otherwise try one (budgeted) fetch.
async fn signing_keys_ready(state: &AppState) -> bool {
    state.jwks.is_cached().await || state.jwks.refresh().await.is_ok()
}

/// Readiness: 503 while the gate could not verify any token.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    if signing_keys_ready(&state).await {
        let body = Readiness {
            status: Status::Ok,
            jwks: Status::Ok,
        };
        (StatusCode::OK, Json(body))
    } else {
        let body = Readiness {
            status: Status::Degraded,
            jwks: Status::Unavailable,
        };
        (StatusCode::SERVICE_UNAVAILABLE, Json(body))
    }
}

pub async fn liveness() -> Json<Liveness> {
    Json(Liveness { status: Status::Ok })
}
