// ABOUTME: Goal storage enforcing the progress/completion invariant on every write
// ABOUTME: Handles goal CRUD, partial updates, filtered listing, and ownership checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Goal, GoalType, ReminderFrequency, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

/// Request body for creating a goal
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    /// Goal title (max 100 chars)
    pub title: String,
    /// Goal description (max 500 chars)
    pub description: String,
    /// Goal category
    pub goal_type: GoalType,
    /// When the user wants to reach the goal
    pub target_date: DateTime<Utc>,
    /// Starting progress percentage; defaults to 0
    #[serde(default)]
    pub progress: Option<f64>,
    /// Optional numeric target
    #[serde(default)]
    pub target_value: Option<f64>,
    /// Optional current measurement
    #[serde(default)]
    pub current_value: Option<f64>,
    /// Unit for target/current values
    #[serde(default)]
    pub unit: Option<String>,
    /// Reminder schedule; defaults to none
    #[serde(default)]
    pub reminder_frequency: Option<ReminderFrequency>,
}

/// Partial update for an existing goal; absent fields are left untouched,
/// never overwritten with defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    /// New title
    #[serde(default)]
    pub title: Option<String>,
    /// New description
    #[serde(default)]
    pub description: Option<String>,
    /// New goal category
    #[serde(default)]
    pub goal_type: Option<GoalType>,
    /// New target date
    #[serde(default)]
    pub target_date: Option<DateTime<Utc>>,
    /// New progress percentage; re-applies the completion invariant
    #[serde(default)]
    pub progress: Option<f64>,
    /// New numeric target
    #[serde(default)]
    pub target_value: Option<f64>,
    /// New current measurement
    #[serde(default)]
    pub current_value: Option<f64>,
    /// New unit
    #[serde(default)]
    pub unit: Option<String>,
    /// New reminder schedule
    #[serde(default)]
    pub reminder_frequency: Option<ReminderFrequency>,
}

/// Filter constraints for goal listings
#[derive(Debug, Clone, Copy, Default)]
pub struct GoalFilter {
    /// Restrict to completed (true) or active (false) goals
    pub completed: Option<bool>,
    /// Restrict to one goal type
    pub goal_type: Option<GoalType>,
}

const GOAL_COLUMNS: &str = "id, user_id, title, description, goal_type, target_date, progress, \
     completed, target_value, current_value, unit, reminder_frequency, created_at, updated_at";

fn row_to_goal(row: &SqliteRow) -> AppResult<Goal> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let goal_type: String = row.try_get("goal_type")?;
    let reminder_frequency: String = row.try_get("reminder_frequency")?;

    Ok(Goal {
        id: Uuid::parse_str(&id).map_err(|e| AppError::database(e.to_string()))?,
        user_id: Uuid::parse_str(&user_id).map_err(|e| AppError::database(e.to_string()))?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        goal_type: GoalType::from_str(&goal_type)?,
        target_date: row.try_get("target_date")?,
        progress: row.try_get("progress")?,
        completed: row.try_get("completed")?,
        target_value: row.try_get("target_value")?,
        current_value: row.try_get("current_value")?,
        unit: row.try_get("unit")?,
        reminder_frequency: ReminderFrequency::from_str(&reminder_frequency)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn validate_title(title: &str) -> AppResult<()> {
    if title.trim().is_empty() {
        return Err(AppError::missing_field("Title"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::invalid_input(format!(
            "Goal title cannot be more than {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> AppResult<()> {
    if description.trim().is_empty() {
        return Err(AppError::missing_field("Description"));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(AppError::invalid_input(format!(
            "Description cannot be more than {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_progress(progress: f64) -> AppResult<()> {
    if !(0.0..=100.0).contains(&progress) {
        return Err(AppError::value_out_of_range(
            "Progress must be a number between 0 and 100",
        ));
    }
    Ok(())
}

impl Database {
    /// Create goal table and indexes
    pub(super) async fn migrate_goals(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS goals (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                goal_type TEXT NOT NULL DEFAULT 'other'
                    CHECK (goal_type IN ('weight', 'cardio', 'strength', 'water', 'health', 'other')),
                target_date DATETIME NOT NULL,
                progress REAL NOT NULL DEFAULT 0 CHECK (progress >= 0 AND progress <= 100),
                completed BOOLEAN NOT NULL DEFAULT 0,
                target_value REAL,
                current_value REAL,
                unit TEXT,
                reminder_frequency TEXT NOT NULL DEFAULT 'none'
                    CHECK (reminder_frequency IN ('daily', 'weekly', 'monthly', 'none')),
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_goals_user_target
             ON goals(user_id, target_date)",
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Create a goal, applying the completion invariant to the supplied
    /// progress (default 0) before persisting.
    ///
    /// # Errors
    ///
    /// Returns a validation error for missing/over-long fields or progress
    /// outside 0-100, or a `DatabaseError` if the write fails.
    pub async fn create_goal(&self, user_id: Uuid, request: CreateGoalRequest) -> AppResult<Goal> {
        validate_title(&request.title)?;
        validate_description(&request.description)?;
        let progress = request.progress.unwrap_or(0.0);
        validate_progress(progress)?;

        let now = Utc::now();
        let mut goal = Goal {
            id: Uuid::new_v4(),
            user_id,
            title: request.title,
            description: request.description,
            goal_type: request.goal_type,
            target_date: request.target_date,
            progress: 0.0,
            completed: false,
            target_value: request.target_value,
            current_value: request.current_value,
            unit: request.unit,
            reminder_frequency: request.reminder_frequency.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        goal.apply_progress(progress);

        sqlx::query(
            r"
            INSERT INTO goals
                (id, user_id, title, description, goal_type, target_date, progress, completed,
                 target_value, current_value, unit, reminder_frequency, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13)
            ",
        )
        .bind(goal.id.to_string())
        .bind(goal.user_id.to_string())
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(goal.goal_type.as_str())
        .bind(goal.target_date)
        .bind(goal.progress)
        .bind(goal.completed)
        .bind(goal.target_value)
        .bind(goal.current_value)
        .bind(&goal.unit)
        .bind(goal.reminder_frequency.as_str())
        .bind(now)
        .execute(self.pool())
        .await?;

        Ok(goal)
    }

    /// Fetch a single goal owned by the requesting user
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown id or `PermissionDenied`
    /// when the goal belongs to another user.
    pub async fn get_goal(&self, goal_id: Uuid, user_id: Uuid) -> AppResult<Goal> {
        let row = sqlx::query(&format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = $1"))
            .bind(goal_id.to_string())
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| AppError::not_found("Goal"))?;

        let goal = row_to_goal(&row)?;
        if goal.user_id != user_id {
            return Err(AppError::permission_denied());
        }

        Ok(goal)
    }

    /// Apply a partial update to a goal, re-deriving the completion flag
    /// whenever progress is part of the update.
    ///
    /// The mutation is a single UPDATE guarded by `id AND user_id`, so two
    /// concurrent progress writes cannot interleave into a lost update. On a
    /// miss the id is looked up once to distinguish `ResourceNotFound` from
    /// `PermissionDenied`.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound`, `PermissionDenied`, or a validation error.
    pub async fn update_goal(
        &self,
        goal_id: Uuid,
        user_id: Uuid,
        request: UpdateGoalRequest,
    ) -> AppResult<Goal> {
        if let Some(title) = &request.title {
            validate_title(title)?;
        }
        if let Some(description) = &request.description {
            validate_description(description)?;
        }
        if let Some(progress) = request.progress {
            validate_progress(progress)?;
        }

        // Invariant applied up front: >=100 clamps to exactly 100
        let progress = request.progress.map(|p| p.min(100.0));
        let completed = progress.map(Goal::completes);

        let row = sqlx::query(&format!(
            r"
            UPDATE goals SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                goal_type = COALESCE($5, goal_type),
                target_date = COALESCE($6, target_date),
                progress = COALESCE($7, progress),
                completed = COALESCE($8, completed),
                target_value = COALESCE($9, target_value),
                current_value = COALESCE($10, current_value),
                unit = COALESCE($11, unit),
                reminder_frequency = COALESCE($12, reminder_frequency),
                updated_at = $13
            WHERE id = $1 AND user_id = $2
            RETURNING {GOAL_COLUMNS}
            "
        ))
        .bind(goal_id.to_string())
        .bind(user_id.to_string())
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.goal_type.map(|t| t.as_str()))
        .bind(request.target_date)
        .bind(progress)
        .bind(completed)
        .bind(request.target_value)
        .bind(request.current_value)
        .bind(&request.unit)
        .bind(request.reminder_frequency.map(|r| r.as_str()))
        .bind(Utc::now())
        .fetch_optional(self.pool())
        .await?;

        match row {
            Some(row) => row_to_goal(&row),
            None => Err(self.goal_access_error(goal_id).await?),
        }
    }

    /// List a user's goals sorted by ascending target date, optionally
    /// filtered by completion state and goal type.
    ///
    /// # Errors
    ///
    /// Returns a `DatabaseError` if the query fails.
    pub async fn list_goals(&self, user_id: Uuid, filter: GoalFilter) -> AppResult<Vec<Goal>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {GOAL_COLUMNS} FROM goals
            WHERE user_id = $1
              AND ($2 IS NULL OR completed = $2)
              AND ($3 IS NULL OR goal_type = $3)
            ORDER BY target_date ASC
            "
        ))
        .bind(user_id.to_string())
        .bind(filter.completed)
        .bind(filter.goal_type.map(|t| t.as_str()))
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(row_to_goal).collect()
    }

    /// Delete a goal owned by the requesting user
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no such goal exists or
    /// `PermissionDenied` if it belongs to another user.
    pub async fn delete_goal(&self, goal_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
            .bind(goal_id.to_string())
            .bind(user_id.to_string())
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(self.goal_access_error(goal_id).await?);
        }

        Ok(())
    }

    /// Classify a guarded-write miss as not-found vs not-owned
    async fn goal_access_error(&self, goal_id: Uuid) -> AppResult<AppError> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM goals WHERE id = $1")
            .bind(goal_id.to_string())
            .fetch_optional(self.pool())
            .await?;

        Ok(if exists.is_some() {
            AppError::permission_denied()
        } else {
            AppError::not_found("Goal")
        })
    }
}
