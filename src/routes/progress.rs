// ABOUTME: Progress metric route handlers for recording and querying samples
// ABOUTME: REST endpoints for metric CRUD, chronological series, and summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack

//! Progress metric routes
//!
//! `GET /api/progress/:metric` doubles as the series endpoint while
//! `PUT`/`DELETE` on the same path address a sample by id, mirroring the
//! public API shape; handlers parse the path segment accordingly.

use super::{authenticate, ServerResources};
use crate::database::{MetricFilter, RecordMetricRequest, UpdateMetricRequest};
use crate::errors::AppError;
use crate::intelligence::{summarize_metric, totals_by_metric, MetricSummary};
use crate::models::{MetricKind, MetricSample};
use crate::pagination::{Pagination, DEFAULT_PAGE_LIMIT};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

const fn default_page() -> u32 {
    1
}

const fn default_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

/// Query parameters for listing metric samples
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetricListQuery {
    #[serde(default)]
    metric: Option<MetricKind>,
    #[serde(default)]
    start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    end_date: Option<DateTime<Utc>>,
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_limit")]
    limit: u32,
}

/// Query parameters for the chronological series endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetricSeriesQuery {
    #[serde(default)]
    start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    end_date: Option<DateTime<Utc>>,
    #[serde(default = "default_limit")]
    limit: u32,
}

/// Paginated metric listing response
#[derive(Debug, Serialize)]
struct MetricListResponse {
    progress: Vec<MetricSample>,
    pagination: Pagination,
}

/// Per-kind value totals response
#[derive(Debug, Serialize)]
struct MetricTotalsResponse {
    totals: HashMap<MetricKind, f64>,
}

/// Progress metric routes
pub struct ProgressRoutes;

impl ProgressRoutes {
    /// Create all progress routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/progress",
                get(Self::handle_list).post(Self::handle_record),
            )
            .route("/api/progress/totals", get(Self::handle_totals))
            .route("/api/progress/summary/:metric", get(Self::handle_summary))
            .route(
                "/api/progress/:metric",
                get(Self::handle_series)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Record a new metric sample (upserts on timestamp collision)
    async fn handle_record(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<RecordMetricRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let sample = resources
            .database
            .record_metric(auth.user_id, request)
            .await?;
        tracing::info!(user_id = %auth.user_id, metric = %sample.metric, "recorded metric sample");

        Ok((StatusCode::OK, Json(sample)).into_response())
    }

    /// List samples newest-first with optional filters and pagination
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<MetricListQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let filter = MetricFilter {
            metric: query.metric,
            start_date: query.start_date,
            end_date: query.end_date,
        };
        let (samples, total) = resources
            .database
            .get_metrics(auth.user_id, filter, query.page, query.limit)
            .await?;

        let response = MetricListResponse {
            progress: samples,
            pagination: Pagination::new(total, query.page, query.limit),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Chronological series for one metric, for charting
    async fn handle_series(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(metric): Path<String>,
        Query(query): Query<MetricSeriesQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let metric = MetricKind::from_str(&metric)?;

        let samples = resources
            .database
            .get_metric_series(
                auth.user_id,
                metric,
                query.start_date,
                query.end_date,
                query.limit,
            )
            .await?;

        Ok((StatusCode::OK, Json(samples)).into_response())
    }

    /// Summary statistics for one metric
    async fn handle_summary(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(metric): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let metric = MetricKind::from_str(&metric)?;

        let samples = resources.database.metric_history(auth.user_id, metric).await?;
        let summary: MetricSummary = summarize_metric(metric, &samples, Utc::now())?;

        Ok((StatusCode::OK, Json(summary)).into_response())
    }

    /// Flat per-kind value totals across all of the user's samples
    async fn handle_totals(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let samples = resources.database.all_samples(auth.user_id).await?;
        let response = MetricTotalsResponse {
            totals: totals_by_metric(&samples),
        };

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Update a sample by id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(request): Json<UpdateMetricRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let sample_id = parse_sample_id(&id)?;

        let sample = resources
            .database
            .update_metric(sample_id, auth.user_id, request)
            .await?;

        Ok((StatusCode::OK, Json(sample)).into_response())
    }

    /// Delete a sample by id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let sample_id = parse_sample_id(&id)?;

        resources
            .database
            .delete_metric(sample_id, auth.user_id)
            .await?;
        tracing::info!(user_id = %auth.user_id, sample_id = %sample_id, "deleted metric sample");

        Ok((StatusCode::OK, Json(json!({ "message": "Progress metric removed" }))).into_response())
    }
}

/// A malformed id behaves like an unknown one
fn parse_sample_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found("Progress metric"))
}
