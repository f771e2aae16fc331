// ABOUTME: Database management for metric samples, goals, and the activity log
// ABOUTME: Owns the SQLite pool and runs per-domain schema migrations at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack

//! # Database Management
//!
//! Durable keyed storage for the tracking core. Each domain lives in its own
//! module with an `impl Database` block and a `migrate_*` function; all
//! mutations that must be atomic are single conditional statements rather
//! than read-then-write pairs.

mod activity;
mod goals;
mod metrics;

pub use activity::*;
pub use goals::*;
pub use metrics::*;

use crate::errors::AppResult;
use sqlx::{Pool, Sqlite, SqlitePool};

/// Database manager for metric, goal, and activity storage
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or a
    /// migration fails.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:")
            && !database_url.contains(":memory:")
            && !database_url.contains('?')
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options).await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_metrics().await?;
        self.migrate_goals().await?;
        self.migrate_activity().await?;

        Ok(())
    }
}
