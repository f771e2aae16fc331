// ABOUTME: Metric sample storage with upsert-on-timestamp-collision semantics
// ABOUTME: Handles recording, filtered queries, chronological series, and deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{MetricKind, MetricSample, MAX_NOTES_LEN};
use crate::pagination::offset_for;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

/// Request body for recording a metric sample
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetricRequest {
    /// Metric category
    pub metric: MetricKind,
    /// Measured value
    pub value: f64,
    /// Unit the value was measured in
    pub unit: String,
    /// Measurement time; defaults to now
    #[serde(default, alias = "date")]
    pub recorded_at: Option<DateTime<Utc>>,
    /// Optional notes (max 200 chars)
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update for an existing metric sample; absent fields are untouched.
/// The metric kind itself is immutable once created.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMetricRequest {
    /// New value
    #[serde(default)]
    pub value: Option<f64>,
    /// New unit
    #[serde(default)]
    pub unit: Option<String>,
    /// New measurement time
    #[serde(default, alias = "date")]
    pub recorded_at: Option<DateTime<Utc>>,
    /// New notes
    #[serde(default)]
    pub notes: Option<String>,
}

/// Filter constraints for metric queries; all provided constraints are ANDed
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricFilter {
    /// Restrict to one metric kind
    pub metric: Option<MetricKind>,
    /// Inclusive lower bound on `recorded_at`
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `recorded_at`
    pub end_date: Option<DateTime<Utc>>,
}

const SAMPLE_COLUMNS: &str =
    "id, user_id, metric, value, unit, recorded_at, notes, created_at, updated_at";

fn row_to_sample(row: &SqliteRow) -> AppResult<MetricSample> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let metric: String = row.try_get("metric")?;

    Ok(MetricSample {
        id: Uuid::parse_str(&id).map_err(|e| AppError::database(e.to_string()))?,
        user_id: Uuid::parse_str(&user_id).map_err(|e| AppError::database(e.to_string()))?,
        metric: MetricKind::from_str(&metric)?,
        value: row.try_get("value")?,
        unit: row.try_get("unit")?,
        recorded_at: row.try_get("recorded_at")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn validate_notes(notes: Option<&str>) -> AppResult<()> {
    if notes.is_some_and(|n| n.chars().count() > MAX_NOTES_LEN) {
        return Err(AppError::invalid_input(format!(
            "Notes cannot be more than {MAX_NOTES_LEN} characters"
        )));
    }
    Ok(())
}

impl Database {
    /// Create metric sample table and indexes
    pub(super) async fn migrate_metrics(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS metric_samples (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                metric TEXT NOT NULL,
                value REAL NOT NULL,
                unit TEXT NOT NULL,
                recorded_at DATETIME NOT NULL,
                notes TEXT,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await?;

        // One sample per (user, metric, timestamp); collisions update in place
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_metric_samples_triple
             ON metric_samples(user_id, metric, recorded_at)",
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Record a metric sample, updating in place when one already exists for
    /// the same `(user, metric, timestamp)` triple.
    ///
    /// The upsert is a single conditional write, so concurrent writers on the
    /// same triple cannot lose updates. Notes are only overwritten when the
    /// request provides them.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty unit or over-long notes, or a
    /// `DatabaseError` if the write fails.
    pub async fn record_metric(
        &self,
        user_id: Uuid,
        request: RecordMetricRequest,
    ) -> AppResult<MetricSample> {
        if request.unit.trim().is_empty() {
            return Err(AppError::missing_field("Unit"));
        }
        validate_notes(request.notes.as_deref())?;

        let now = Utc::now();
        let recorded_at = request.recorded_at.unwrap_or(now);

        let row = sqlx::query(&format!(
            r"
            INSERT INTO metric_samples
                (id, user_id, metric, value, unit, recorded_at, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            ON CONFLICT(user_id, metric, recorded_at) DO UPDATE SET
                value = excluded.value,
                unit = excluded.unit,
                notes = COALESCE(excluded.notes, metric_samples.notes),
                updated_at = excluded.updated_at
            RETURNING {SAMPLE_COLUMNS}
            "
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(request.metric.as_str())
        .bind(request.value)
        .bind(&request.unit)
        .bind(recorded_at)
        .bind(&request.notes)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        row_to_sample(&row)
    }

    /// Query a user's samples newest-first with optional kind/date filters,
    /// returning the page of samples and the total match count.
    ///
    /// # Errors
    ///
    /// Returns a `DatabaseError` if either query fails.
    pub async fn get_metrics(
        &self,
        user_id: Uuid,
        filter: MetricFilter,
        page: u32,
        limit: u32,
    ) -> AppResult<(Vec<MetricSample>, i64)> {
        let metric = filter.metric.map(|m| m.as_str());

        let rows = sqlx::query(&format!(
            r"
            SELECT {SAMPLE_COLUMNS} FROM metric_samples
            WHERE user_id = $1
              AND ($2 IS NULL OR metric = $2)
              AND ($3 IS NULL OR recorded_at >= $3)
              AND ($4 IS NULL OR recorded_at <= $4)
            ORDER BY recorded_at DESC
            LIMIT $5 OFFSET $6
            "
        ))
        .bind(user_id.to_string())
        .bind(metric)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(i64::from(limit))
        .bind(offset_for(page, limit))
        .fetch_all(self.pool())
        .await?;

        let total: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM metric_samples
            WHERE user_id = $1
              AND ($2 IS NULL OR metric = $2)
              AND ($3 IS NULL OR recorded_at >= $3)
              AND ($4 IS NULL OR recorded_at <= $4)
            ",
        )
        .bind(user_id.to_string())
        .bind(metric)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_one(self.pool())
        .await?;

        let samples = rows
            .iter()
            .map(row_to_sample)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((samples, total))
    }

    /// Get the most recent `limit` samples for one metric in chronological
    /// order (oldest to newest), for charting.
    ///
    /// Fetches newest-first bounded by `limit`, then reverses.
    ///
    /// # Errors
    ///
    /// Returns a `DatabaseError` if the query fails.
    pub async fn get_metric_series(
        &self,
        user_id: Uuid,
        metric: MetricKind,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        limit: u32,
    ) -> AppResult<Vec<MetricSample>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {SAMPLE_COLUMNS} FROM metric_samples
            WHERE user_id = $1
              AND metric = $2
              AND ($3 IS NULL OR recorded_at >= $3)
              AND ($4 IS NULL OR recorded_at <= $4)
            ORDER BY recorded_at DESC
            LIMIT $5
            "
        ))
        .bind(user_id.to_string())
        .bind(metric.as_str())
        .bind(start_date)
        .bind(end_date)
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await?;

        let mut samples = rows
            .iter()
            .map(row_to_sample)
            .collect::<AppResult<Vec<_>>>()?;
        samples.reverse();

        Ok(samples)
    }

    /// All of a user's samples for one metric, newest first (summary input)
    ///
    /// # Errors
    ///
    /// Returns a `DatabaseError` if the query fails.
    pub async fn metric_history(
        &self,
        user_id: Uuid,
        metric: MetricKind,
    ) -> AppResult<Vec<MetricSample>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {SAMPLE_COLUMNS} FROM metric_samples
            WHERE user_id = $1 AND metric = $2
            ORDER BY recorded_at DESC
            "
        ))
        .bind(user_id.to_string())
        .bind(metric.as_str())
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(row_to_sample).collect()
    }

    /// All of a user's samples across every metric, newest first
    ///
    /// # Errors
    ///
    /// Returns a `DatabaseError` if the query fails.
    pub async fn all_samples(&self, user_id: Uuid) -> AppResult<Vec<MetricSample>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {SAMPLE_COLUMNS} FROM metric_samples
            WHERE user_id = $1
            ORDER BY recorded_at DESC
            "
        ))
        .bind(user_id.to_string())
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(row_to_sample).collect()
    }

    /// Update a sample's value, unit, timestamp, or notes in place.
    ///
    /// The write is guarded by `id AND user_id` in a single statement; on a
    /// miss the id is looked up once to distinguish `ResourceNotFound` from
    /// `PermissionDenied`.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound`, `PermissionDenied`, a validation error, or
    /// `InvalidInput` when moving the timestamp onto an existing triple.
    pub async fn update_metric(
        &self,
        sample_id: Uuid,
        user_id: Uuid,
        request: UpdateMetricRequest,
    ) -> AppResult<MetricSample> {
        if request.unit.as_deref().is_some_and(|u| u.trim().is_empty()) {
            return Err(AppError::missing_field("Unit"));
        }
        validate_notes(request.notes.as_deref())?;

        let result = sqlx::query(&format!(
            r"
            UPDATE metric_samples SET
                value = COALESCE($3, value),
                unit = COALESCE($4, unit),
                recorded_at = COALESCE($5, recorded_at),
                notes = COALESCE($6, notes),
                updated_at = $7
            WHERE id = $1 AND user_id = $2
            RETURNING {SAMPLE_COLUMNS}
            "
        ))
        .bind(sample_id.to_string())
        .bind(user_id.to_string())
        .bind(request.value)
        .bind(&request.unit)
        .bind(request.recorded_at)
        .bind(&request.notes)
        .bind(Utc::now())
        .fetch_optional(self.pool())
        .await;

        match result {
            Ok(Some(row)) => row_to_sample(&row),
            Ok(None) => Err(self.metric_access_error(sample_id).await?),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AppError::invalid_input(
                    "A sample already exists for this metric at that timestamp",
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a sample owned by the requesting user
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no such sample exists or
    /// `PermissionDenied` if it belongs to another user.
    pub async fn delete_metric(&self, sample_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM metric_samples WHERE id = $1 AND user_id = $2")
            .bind(sample_id.to_string())
            .bind(user_id.to_string())
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(self.metric_access_error(sample_id).await?);
        }

        Ok(())
    }

    /// Classify a guarded-write miss as not-found vs not-owned
    async fn metric_access_error(&self, sample_id: Uuid) -> AppResult<AppError> {
        let exists: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM metric_samples WHERE id = $1")
                .bind(sample_id.to_string())
                .fetch_optional(self.pool())
                .await?;

        Ok(if exists.is_some() {
            AppError::permission_denied()
        } else {
            AppError::not_found("Progress metric")
        })
    }
}
