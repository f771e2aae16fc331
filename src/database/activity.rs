// ABOUTME: Append-only activity log of goal-related events
// ABOUTME: Supports appending events and newest-first reads joined with goal titles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{ActivityEvent, ActivityEventType};
use crate::pagination::offset_for;
use chrono::Utc;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

/// An activity event decorated with the related goal's title for display.
/// The title is `None` when the goal has since been deleted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    /// The recorded event
    #[serde(flatten)]
    pub event: ActivityEvent,
    /// Title of the related goal, if it still exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_title: Option<String>,
}

const EVENT_COLUMNS: &str = "a.id, a.user_id, a.goal_id, a.event_type, a.description, \
     a.value, a.unit, a.created_at, g.title AS goal_title";

fn row_to_entry(row: &SqliteRow) -> AppResult<ActivityEntry> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let goal_id: String = row.try_get("goal_id")?;
    let event_type: String = row.try_get("event_type")?;

    Ok(ActivityEntry {
        event: ActivityEvent {
            id: Uuid::parse_str(&id).map_err(|e| AppError::database(e.to_string()))?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| AppError::database(e.to_string()))?,
            goal_id: Uuid::parse_str(&goal_id).map_err(|e| AppError::database(e.to_string()))?,
            event_type: ActivityEventType::from_str(&event_type)?,
            description: row.try_get("description")?,
            value: row.try_get("value")?,
            unit: row.try_get("unit")?,
            created_at: row.try_get("created_at")?,
        },
        goal_title: row.try_get("goal_title")?,
    })
}

impl Database {
    /// Create activity event table and indexes
    pub(super) async fn migrate_activity(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS activity_events (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                goal_id TEXT NOT NULL,
                event_type TEXT NOT NULL
                    CHECK (event_type IN ('progress_update', 'goal_created', 'goal_completed',
                                          'goal_updated', 'reminder_set')),
                description TEXT NOT NULL,
                value REAL,
                unit TEXT,
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_activity_events_user_created
             ON activity_events(user_id, created_at)",
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Append a goal-related event to the activity log.
    ///
    /// Events are never mutated or deleted; goal state stays authoritative in
    /// the goal row itself and is never rebuilt from this log.
    ///
    /// # Errors
    ///
    /// Returns a `DatabaseError` if the write fails.
    pub async fn record_activity(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        event_type: ActivityEventType,
        description: impl Into<String>,
        value: Option<f64>,
        unit: Option<&str>,
    ) -> AppResult<ActivityEvent> {
        let event = ActivityEvent {
            id: Uuid::new_v4(),
            user_id,
            goal_id,
            event_type,
            description: description.into(),
            value,
            unit: unit.map(Into::into),
            created_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO activity_events
                (id, user_id, goal_id, event_type, description, value, unit, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(event.id.to_string())
        .bind(event.user_id.to_string())
        .bind(event.goal_id.to_string())
        .bind(event.event_type.as_str())
        .bind(&event.description)
        .bind(event.value)
        .bind(&event.unit)
        .bind(event.created_at)
        .execute(self.pool())
        .await?;

        Ok(event)
    }

    /// The user's most recent events, newest first, with goal titles
    ///
    /// # Errors
    ///
    /// Returns a `DatabaseError` if the query fails.
    pub async fn recent_activity(&self, user_id: Uuid, limit: u32) -> AppResult<Vec<ActivityEntry>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {EVENT_COLUMNS}
            FROM activity_events a
            LEFT JOIN goals g ON g.id = a.goal_id
            WHERE a.user_id = $1
            ORDER BY a.created_at DESC
            LIMIT $2
            "
        ))
        .bind(user_id.to_string())
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(row_to_entry).collect()
    }

    /// A page of the user's activity feed plus the total event count
    ///
    /// # Errors
    ///
    /// Returns a `DatabaseError` if either query fails.
    pub async fn list_activity(
        &self,
        user_id: Uuid,
        page: u32,
        limit: u32,
    ) -> AppResult<(Vec<ActivityEntry>, i64)> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {EVENT_COLUMNS}
            FROM activity_events a
            LEFT JOIN goals g ON g.id = a.goal_id
            WHERE a.user_id = $1
            ORDER BY a.created_at DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(user_id.to_string())
        .bind(i64::from(limit))
        .bind(offset_for(page, limit))
        .fetch_all(self.pool())
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM activity_events WHERE user_id = $1")
                .bind(user_id.to_string())
                .fetch_one(self.pool())
                .await?;

        let entries = rows
            .iter()
            .map(row_to_entry)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((entries, total))
    }
}
