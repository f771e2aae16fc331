// ABOUTME: Reduces goal collections into dashboard summaries and distributions
// ABOUTME: Pure functions: completion rates, progress buckets, monthly completions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack

//! Goal aggregation: totals, completion rate, per-type grouping, progress
//! histogram, and monthly completion counts

use crate::models::{Goal, GoalType};
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

/// Fixed progress-histogram bucket labels, in ascending threshold order
pub const PROGRESS_BUCKETS: [&str; 5] = ["0-25%", "25-50%", "50-75%", "75-99%", "100%"];

/// Number of monthly completion buckets returned
pub const MONTHLY_BUCKET_CAP: usize = 12;

/// Per-type goal counts
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalTypeBreakdown {
    /// Goal category
    pub goal_type: GoalType,
    /// Goals of this type
    pub count: u32,
    /// Completed goals of this type
    pub completed: u32,
}

/// Dashboard overview of a user's goals
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalOverview {
    /// Total number of goals
    pub total_goals: u32,
    /// Number of completed goals
    pub completed_goals: u32,
    /// `completed / total * 100`; 0 when the user has no goals
    pub completion_rate: f64,
    /// Counts grouped by goal type
    pub goals_by_type: Vec<GoalTypeBreakdown>,
}

/// One bar of the progress histogram
#[derive(Debug, Clone, Serialize)]
pub struct ProgressBucket {
    /// Bucket label (e.g. "25-50%")
    pub bucket: &'static str,
    /// Goals falling in this bucket
    pub count: u32,
}

/// Completed-goal count for one calendar month
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct MonthlyCompletions {
    /// Calendar year
    pub year: i32,
    /// Calendar month, 1-12
    pub month: u32,
    /// Goals completed that month
    pub count: u32,
}

/// Average progress for one goal type
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeProgress {
    /// Goal category
    pub goal_type: GoalType,
    /// Mean progress percentage across goals of this type
    pub avg_progress: f64,
    /// Goals of this type
    pub count: u32,
}

/// Reduce a user's goals into the dashboard overview.
///
/// Zero goals yields a 0 completion rate, never a division error.
#[must_use]
pub fn summarize_goals(goals: &[Goal]) -> GoalOverview {
    let total_goals = goals.len() as u32;
    let completed_goals = goals.iter().filter(|g| g.completed).count() as u32;

    let goals_by_type = GoalType::ALL
        .iter()
        .filter_map(|&goal_type| {
            let of_type: Vec<&Goal> = goals.iter().filter(|g| g.goal_type == goal_type).collect();
            if of_type.is_empty() {
                return None;
            }
            Some(GoalTypeBreakdown {
                goal_type,
                count: of_type.len() as u32,
                completed: of_type.iter().filter(|g| g.completed).count() as u32,
            })
        })
        .collect();

    GoalOverview {
        total_goals,
        completed_goals,
        completion_rate: if total_goals > 0 {
            f64::from(completed_goals) / f64::from(total_goals) * 100.0
        } else {
            0.0
        },
        goals_by_type,
    }
}

/// Which histogram bucket a progress percentage falls into,
/// first-matching ascending threshold
#[must_use]
pub fn bucket_for(progress: f64) -> &'static str {
    if progress < 25.0 {
        "0-25%"
    } else if progress < 50.0 {
        "25-50%"
    } else if progress < 75.0 {
        "50-75%"
    } else if progress < 100.0 {
        "75-99%"
    } else {
        "100%"
    }
}

/// Histogram of goals over the five fixed progress buckets.
///
/// All five buckets are always present; counts sum to the number of goals.
#[must_use]
pub fn progress_distribution(goals: &[Goal]) -> Vec<ProgressBucket> {
    PROGRESS_BUCKETS
        .iter()
        .map(|&bucket| ProgressBucket {
            bucket,
            count: goals.iter().filter(|g| bucket_for(g.progress) == bucket).count() as u32,
        })
        .collect()
}

/// Completed goals grouped by the `(year, month)` of their last update,
/// most recent first, capped to the 12 most recent months with completions.
#[must_use]
pub fn monthly_completions(goals: &[Goal]) -> Vec<MonthlyCompletions> {
    let mut by_month: BTreeMap<(i32, u32), u32> = BTreeMap::new();
    for goal in goals.iter().filter(|g| g.completed) {
        let key = (goal.updated_at.year(), goal.updated_at.month());
        *by_month.entry(key).or_insert(0) += 1;
    }

    by_month
        .into_iter()
        .rev()
        .take(MONTHLY_BUCKET_CAP)
        .map(|((year, month), count)| MonthlyCompletions { year, month, count })
        .collect()
}

/// Mean progress per goal type, with per-type goal counts
#[must_use]
pub fn average_progress_by_type(goals: &[Goal]) -> Vec<TypeProgress> {
    GoalType::ALL
        .iter()
        .filter_map(|&goal_type| {
            let of_type: Vec<&Goal> = goals.iter().filter(|g| g.goal_type == goal_type).collect();
            if of_type.is_empty() {
                return None;
            }
            let sum: f64 = of_type.iter().map(|g| g.progress).sum();
            Some(TypeProgress {
                goal_type,
                avg_progress: sum / of_type.len() as f64,
                count: of_type.len() as u32,
            })
        })
        .collect()
}
