// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses database URL, HTTP port, and JWT settings from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack

//! Environment-based configuration management

use crate::errors::{AppError, AppResult};
use std::env;

/// Default HTTP port when `HTTP_PORT` is unset
pub const DEFAULT_HTTP_PORT: u16 = 8081;
/// Default SQLite database location when `DATABASE_URL` is unset
pub const DEFAULT_DATABASE_URL: &str = "sqlite:data/fittrack.db";
/// Default JWT expiry in hours when `JWT_EXPIRY_HOURS` is unset
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// Server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port for the API server
    pub http_port: u16,
    /// Database connection URL
    pub database_url: String,
    /// Secret used to verify bearer tokens
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub jwt_expiry_hours: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `JWT_SECRET` is missing or a numeric
    /// variable fails to parse.
    pub fn from_env() -> AppResult<Self> {
        let http_port = match env::var("HTTP_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| AppError::config(format!("Invalid HTTP_PORT: {raw}")))?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let jwt_expiry_hours = match env::var("JWT_EXPIRY_HOURS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| AppError::config(format!("Invalid JWT_EXPIRY_HOURS: {raw}")))?,
            Err(_) => DEFAULT_JWT_EXPIRY_HOURS,
        };

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::config("JWT_SECRET environment variable is required"))?;

        Ok(Self {
            http_port,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.into()),
            jwt_secret,
            jwt_expiry_hours,
        })
    }

    /// One-line configuration summary for startup logging (no secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "http_port={} database_url={} jwt_expiry_hours={}",
            self.http_port, self.database_url, self.jwt_expiry_hours
        )
    }
}
