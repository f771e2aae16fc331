// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, auth, and request-builder helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `fittrack_server`
//!
//! Common setup functions to reduce duplication across integration tests.

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use fittrack_server::{
    auth::AuthManager,
    database::{CreateGoalRequest, Database, RecordMetricRequest},
    models::{GoalType, MetricKind},
};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG environment variable controls test logging level
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    let database = Database::new("sqlite::memory:").await?;
    Ok(database)
}

/// Create test authentication manager with a fixed secret
pub fn create_test_auth_manager() -> AuthManager {
    AuthManager::new(b"integration-test-secret", 24)
}

/// Build a fixed UTC timestamp for deterministic assertions
pub fn ts(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .unwrap()
}

/// Metric sample request with an explicit timestamp and no notes
pub fn record_request(
    metric: MetricKind,
    value: f64,
    unit: &str,
    recorded_at: DateTime<Utc>,
) -> RecordMetricRequest {
    RecordMetricRequest {
        metric,
        value,
        unit: unit.into(),
        recorded_at: Some(recorded_at),
        notes: None,
    }
}

/// Goal creation request with sane defaults
pub fn goal_request(title: &str, goal_type: GoalType, progress: Option<f64>) -> CreateGoalRequest {
    CreateGoalRequest {
        title: title.into(),
        description: format!("{title} description"),
        goal_type,
        target_date: ts(2025, 12, 31, 0),
        progress,
        target_value: None,
        current_value: None,
        unit: None,
        reminder_frequency: None,
    }
}
