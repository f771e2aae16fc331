// ABOUTME: Dashboard route handlers for goal summaries and statistics
// ABOUTME: REST endpoints combining goal aggregation with the recent activity feed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack

//! Dashboard routes

use super::{authenticate, ServerResources};
use crate::database::{ActivityEntry, GoalFilter};
use crate::errors::AppError;
use crate::intelligence::{
    average_progress_by_type, monthly_completions, progress_distribution, summarize_goals,
    GoalOverview, MonthlyCompletions, ProgressBucket, TypeProgress,
};
use crate::pagination::Pagination;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How many events the dashboard summary shows
const RECENT_ACTIVITY_LIMIT: u32 = 5;

const fn default_page() -> u32 {
    1
}

const fn default_activity_limit() -> u32 {
    10
}

/// Query parameters for the activity feed
#[derive(Debug, Deserialize)]
struct ActivityFeedQuery {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_activity_limit")]
    limit: u32,
}

/// Dashboard summary: goal overview plus the most recent activity
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardSummaryResponse {
    #[serde(flatten)]
    overview: GoalOverview,
    recent_activities: Vec<ActivityEntry>,
}

/// Detailed goal statistics
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardStatsResponse {
    progress_distribution: Vec<ProgressBucket>,
    monthly_stats: Vec<MonthlyCompletions>,
    avg_progress_by_type: Vec<TypeProgress>,
}

/// Paginated activity feed
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActivityFeedResponse {
    activities: Vec<ActivityEntry>,
    current_page: u32,
    total_pages: i64,
    total_activities: i64,
}

/// Dashboard routes
pub struct DashboardRoutes;

impl DashboardRoutes {
    /// Create all dashboard routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/dashboard/summary", get(Self::handle_summary))
            .route("/api/dashboard/stats", get(Self::handle_stats))
            .route("/api/dashboard/activities", get(Self::handle_activities))
            .with_state(resources)
    }

    /// Goals overview with completion rate, per-type counts, and recent events
    async fn handle_summary(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let goals = resources
            .database
            .list_goals(auth.user_id, GoalFilter::default())
            .await?;
        let recent_activities = resources
            .database
            .recent_activity(auth.user_id, RECENT_ACTIVITY_LIMIT)
            .await?;

        let response = DashboardSummaryResponse {
            overview: summarize_goals(&goals),
            recent_activities,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Progress histogram, monthly completion counts, and per-type averages
    async fn handle_stats(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let goals = resources
            .database
            .list_goals(auth.user_id, GoalFilter::default())
            .await?;

        let response = DashboardStatsResponse {
            progress_distribution: progress_distribution(&goals),
            monthly_stats: monthly_completions(&goals),
            avg_progress_by_type: average_progress_by_type(&goals),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Paginated goal-related activity feed
    async fn handle_activities(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ActivityFeedQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let (activities, total) = resources
            .database
            .list_activity(auth.user_id, query.page, query.limit)
            .await?;

        let response = ActivityFeedResponse {
            activities,
            current_page: query.page,
            total_pages: Pagination::new(total, query.page, query.limit).pages,
            total_activities: total,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
