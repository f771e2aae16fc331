// ABOUTME: Goal route handlers for CRUD and progress updates
// ABOUTME: Applies the completion invariant via the store and appends activity events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack

//! Goal routes

use super::{authenticate, ServerResources};
use crate::database::{CreateGoalRequest, GoalFilter, UpdateGoalRequest};
use crate::errors::AppError;
use crate::models::{ActivityEventType, Goal, GoalType};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Query parameters for listing goals
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoalListQuery {
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    goal_type: Option<GoalType>,
}

/// Goal routes
pub struct GoalRoutes;

impl GoalRoutes {
    /// Create all goal routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/goals",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/goals/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Create a new goal
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateGoalRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let goal = resources.database.create_goal(auth.user_id, request).await?;
        tracing::info!(user_id = %auth.user_id, goal_id = %goal.id, "created goal");

        resources
            .database
            .record_activity(
                auth.user_id,
                goal.id,
                ActivityEventType::GoalCreated,
                format!("Created goal: {}", goal.title),
                None,
                None,
            )
            .await?;
        if goal.completed {
            Self::record_completion(&resources, &goal).await?;
        }

        Ok((StatusCode::OK, Json(goal)).into_response())
    }

    /// List the user's goals sorted by ascending target date
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<GoalListQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let filter = GoalFilter {
            completed: query.completed,
            goal_type: query.goal_type,
        };
        let goals = resources.database.list_goals(auth.user_id, filter).await?;

        Ok((StatusCode::OK, Json(goals)).into_response())
    }

    /// Fetch a single goal
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let goal_id = parse_goal_id(&id)?;

        let goal = resources.database.get_goal(goal_id, auth.user_id).await?;

        Ok((StatusCode::OK, Json(goal)).into_response())
    }

    /// Apply a partial update; progress changes re-derive the completion flag
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(request): Json<UpdateGoalRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let goal_id = parse_goal_id(&id)?;

        // Only used to pick the right activity event; the goal mutation
        // itself is a single guarded UPDATE in the store.
        let was_completed = resources
            .database
            .get_goal(goal_id, auth.user_id)
            .await
            .is_ok_and(|g| g.completed);
        let progress_update = request.progress;

        let goal = resources
            .database
            .update_goal(goal_id, auth.user_id, request)
            .await?;

        if goal.completed && !was_completed {
            Self::record_completion(&resources, &goal).await?;
        } else if let Some(progress) = progress_update {
            resources
                .database
                .record_activity(
                    auth.user_id,
                    goal.id,
                    ActivityEventType::ProgressUpdate,
                    format!("Updated progress to {progress:.0}%"),
                    Some(goal.progress),
                    Some("%"),
                )
                .await?;
        } else {
            resources
                .database
                .record_activity(
                    auth.user_id,
                    goal.id,
                    ActivityEventType::GoalUpdated,
                    format!("Updated goal: {}", goal.title),
                    None,
                    None,
                )
                .await?;
        }

        Ok((StatusCode::OK, Json(goal)).into_response())
    }

    /// Delete a goal
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let goal_id = parse_goal_id(&id)?;

        resources.database.delete_goal(goal_id, auth.user_id).await?;
        tracing::info!(user_id = %auth.user_id, goal_id = %goal_id, "deleted goal");

        Ok((StatusCode::OK, Json(json!({ "message": "Goal removed" }))).into_response())
    }

    async fn record_completion(
        resources: &Arc<ServerResources>,
        goal: &Goal,
    ) -> Result<(), AppError> {
        resources
            .database
            .record_activity(
                goal.user_id,
                goal.id,
                ActivityEventType::GoalCompleted,
                format!("Completed goal: {}", goal.title),
                Some(goal.progress),
                Some("%"),
            )
            .await?;
        Ok(())
    }
}

/// A malformed id behaves like an unknown one
fn parse_goal_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found("Goal"))
}
