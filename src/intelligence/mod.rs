// ABOUTME: Pure aggregation layer reducing stored records into summary statistics
// ABOUTME: No side effects; stores query, these modules reduce
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack

//! # Aggregation Intelligence
//!
//! Pure computation over store query results. Absence of data is never an
//! error here; every aggregate degrades to zero/`None` defaults. The only
//! failure these functions produce is an invalid metric kind, which is
//! screened before any reduction runs.

pub mod goal_stats;
pub mod progress_analyzer;

pub use goal_stats::{
    average_progress_by_type, monthly_completions, progress_distribution, summarize_goals,
    GoalOverview, GoalTypeBreakdown, MonthlyCompletions, ProgressBucket, TypeProgress,
};
pub use progress_analyzer::{summarize_metric, totals_by_metric, MetricSummary};
