// ABOUTME: HTTP route composition and shared server resources
// ABOUTME: Thin boundary layer: authenticate, deserialize, delegate, serialize
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack

//! # HTTP Routes
//!
//! Route handlers are deliberately thin pass-throughs: each one
//! authenticates the request, parses inputs, and delegates to a store or
//! aggregator. All data-transformation logic lives below this layer.

pub mod dashboard;
pub mod goals;
pub mod progress;

use crate::auth::{AuthManager, AuthResult};
use crate::database::Database;
use crate::errors::AppError;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Request timeout for all routes
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared state handed to every route handler
pub struct ServerResources {
    /// Metric, goal, and activity storage
    pub database: Database,
    /// Bearer token validator
    pub auth: AuthManager,
}

impl ServerResources {
    /// Bundle the database and auth manager for route handlers
    #[must_use]
    pub fn new(database: Database, auth: AuthManager) -> Self {
        Self { database, auth }
    }
}

/// Extract and authenticate the user from the authorization header
pub(crate) fn authenticate(
    headers: &HeaderMap,
    resources: &Arc<ServerResources>,
) -> Result<AuthResult, AppError> {
    let auth_header = headers.get("authorization").and_then(|h| h.to_str().ok());
    resources.auth.authenticate_request(auth_header)
}

/// Build the full application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(progress::ProgressRoutes::routes(resources.clone()))
        .merge(goals::GoalRoutes::routes(resources.clone()))
        .merge(dashboard::DashboardRoutes::routes(resources))
        .route("/api/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CorsLayer::permissive())
}

/// Liveness probe
async fn handle_health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
