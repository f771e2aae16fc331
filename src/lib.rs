// ABOUTME: Main library entry point for the FitTrack fitness tracking API
// ABOUTME: Exposes metric/goal storage, aggregation, and the HTTP boundary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack

#![deny(unsafe_code)]

//! # FitTrack Server
//!
//! A personal fitness tracking backend: users log timestamped health metrics
//! (weight, steps, calories, water, heart rate, sleep, body fat), set goals
//! with progress percentages, and read aggregated dashboard summaries.
//!
//! ## Architecture
//!
//! - **Models**: closed metric/goal kind enums and entities carrying the
//!   goal completion invariant
//! - **Database**: SQLite-backed stores; metric writes upsert on the
//!   `(user, metric, timestamp)` triple in a single conditional statement
//! - **Intelligence**: pure aggregation of samples and goals into summaries
//! - **Routes**: thin `axum` handlers gluing auth, stores, and aggregators
//! - **Auth**: per-request JWT validation at the HTTP boundary; the core
//!   only ever sees an already-verified user id
//!
//! ## Example
//!
//! ```rust,no_run
//! use fittrack_server::config::ServerConfig;
//! use fittrack_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("FitTrack server configured for port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// JWT bearer token validation
pub mod auth;

/// Environment-based configuration
pub mod config;

/// Metric, goal, and activity storage
pub mod database;

/// Unified error handling
pub mod errors;

/// Pure aggregation over stored records
pub mod intelligence;

/// Structured logging setup
pub mod logging;

/// Core domain entities
pub mod models;

/// Offset pagination helpers
pub mod pagination;

/// HTTP route handlers
pub mod routes;
