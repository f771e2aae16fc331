// ABOUTME: Reduces metric samples into latest/average/trend summaries
// ABOUTME: Pure functions over newest-first sample slices; no storage access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack

//! Metric summary statistics: latest value, windowed averages, trend deltas

use crate::errors::{AppError, AppResult};
use crate::models::{MetricKind, MetricSample};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Lookback window for weekly statistics, in days
pub const WEEKLY_WINDOW_DAYS: i64 = 7;
/// Lookback window for monthly statistics, in days
pub const MONTHLY_WINDOW_DAYS: i64 = 30;

/// Summary statistics for one metric kind
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSummary {
    /// Which metric this summarizes
    pub metric: MetricKind,
    /// Most recent sample's value; `None` when no samples exist
    pub latest: Option<f64>,
    /// Most recent sample's unit
    pub unit: Option<String>,
    /// Mean of values recorded in the last 7 days; 0 when the window is empty
    pub weekly_avg: f64,
    /// Mean of values recorded in the last 30 days; 0 when the window is empty
    pub monthly_avg: f64,
    /// Latest value minus the oldest value in the 7-day window; 0 for <=1 sample
    pub weekly_trend: f64,
    /// Latest value minus the oldest value in the 30-day window; 0 for <=1 sample
    pub monthly_trend: f64,
    /// Number of samples in the 7-day window
    pub weekly_data_points: usize,
    /// Number of samples in the 30-day window
    pub monthly_data_points: usize,
}

/// Summarize a user's samples for one metric.
///
/// `samples` must be the user's full history for `metric`, ordered newest
/// first (the order stores return). `MetricKind::Other` is rejected: only the
/// seven concrete kinds have meaningful summaries.
///
/// Empty windows yield 0 averages rather than `None`; that zero-for-empty
/// policy is part of the API contract.
///
/// # Errors
///
/// Returns `InvalidMetricKind` for [`MetricKind::Other`].
pub fn summarize_metric(
    metric: MetricKind,
    samples: &[MetricSample],
    now: DateTime<Utc>,
) -> AppResult<MetricSummary> {
    if metric == MetricKind::Other {
        return Err(AppError::invalid_metric_kind(metric.as_str()));
    }

    let latest = samples.first();

    let week_start = now - Duration::days(WEEKLY_WINDOW_DAYS);
    let month_start = now - Duration::days(MONTHLY_WINDOW_DAYS);

    // Newest-first slices; the last element of each window is its oldest sample
    let weekly: Vec<&MetricSample> = samples
        .iter()
        .filter(|s| s.recorded_at >= week_start)
        .collect();
    let monthly: Vec<&MetricSample> = samples
        .iter()
        .filter(|s| s.recorded_at >= month_start)
        .collect();

    Ok(MetricSummary {
        metric,
        latest: latest.map(|s| s.value),
        unit: latest.map(|s| s.unit.clone()),
        weekly_avg: window_average(&weekly),
        monthly_avg: window_average(&monthly),
        weekly_trend: window_trend(latest, &weekly),
        monthly_trend: window_trend(latest, &monthly),
        weekly_data_points: weekly.len(),
        monthly_data_points: monthly.len(),
    })
}

fn window_average(window: &[&MetricSample]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    window.iter().map(|s| s.value).sum::<f64>() / window.len() as f64
}

fn window_trend(latest: Option<&MetricSample>, window: &[&MetricSample]) -> f64 {
    match (latest, window.last()) {
        (Some(latest), Some(oldest)) if window.len() > 1 => latest.value - oldest.value,
        _ => 0.0,
    }
}

/// Sum a user's sample values per metric kind.
///
/// Kinds with no samples are absent from the map; callers treat a missing
/// kind as 0.
#[must_use]
pub fn totals_by_metric(samples: &[MetricSample]) -> HashMap<MetricKind, f64> {
    let mut totals = HashMap::new();
    for sample in samples {
        *totals.entry(sample.metric).or_insert(0.0) += sample.value;
    }
    totals
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample(metric: MetricKind, value: f64, days_ago: i64, now: DateTime<Utc>) -> MetricSample {
        let recorded_at = now - Duration::days(days_ago);
        MetricSample {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            metric,
            value,
            unit: "kg".into(),
            recorded_at,
            notes: None,
            created_at: recorded_at,
            updated_at: recorded_at,
        }
    }

    #[test]
    fn test_empty_summary_is_all_zero() {
        let summary = summarize_metric(MetricKind::Weight, &[], Utc::now()).unwrap();
        assert_eq!(summary.latest, None);
        assert_eq!(summary.unit, None);
        assert!(summary.weekly_avg.abs() < f64::EPSILON);
        assert!(summary.monthly_avg.abs() < f64::EPSILON);
        assert!(summary.weekly_trend.abs() < f64::EPSILON);
        assert!(summary.monthly_trend.abs() < f64::EPSILON);
        assert_eq!(summary.weekly_data_points, 0);
        assert_eq!(summary.monthly_data_points, 0);
    }

    #[test]
    fn test_other_kind_rejected() {
        let err = summarize_metric(MetricKind::Other, &[], Utc::now()).unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::InvalidMetricKind);
    }

    #[test]
    fn test_single_sample_has_zero_trend() {
        let now = Utc::now();
        let samples = vec![sample(MetricKind::Weight, 75.0, 1, now)];
        let summary = summarize_metric(MetricKind::Weight, &samples, now).unwrap();

        assert_eq!(summary.latest, Some(75.0));
        assert!(summary.weekly_trend.abs() < f64::EPSILON);
        assert!(summary.monthly_trend.abs() < f64::EPSILON);
        assert_eq!(summary.weekly_data_points, 1);
    }

    #[test]
    fn test_windowed_averages_and_trends() {
        let now = Utc::now();
        // Newest first: 74 (1d ago), 76 (5d ago), 80 (20d ago)
        let samples = vec![
            sample(MetricKind::Weight, 74.0, 1, now),
            sample(MetricKind::Weight, 76.0, 5, now),
            sample(MetricKind::Weight, 80.0, 20, now),
        ];
        let summary = summarize_metric(MetricKind::Weight, &samples, now).unwrap();

        assert_eq!(summary.latest, Some(74.0));
        assert_eq!(summary.weekly_data_points, 2);
        assert_eq!(summary.monthly_data_points, 3);
        assert!((summary.weekly_avg - 75.0).abs() < 1e-9);
        assert!((summary.monthly_avg - (230.0 / 3.0)).abs() < 1e-9);
        // Trend is latest minus the oldest sample within each window
        assert!((summary.weekly_trend - (74.0 - 76.0)).abs() < 1e-9);
        assert!((summary.monthly_trend - (74.0 - 80.0)).abs() < 1e-9);
    }

    #[test]
    fn test_totals_by_metric() {
        let now = Utc::now();
        let samples = vec![
            sample(MetricKind::Steps, 8000.0, 1, now),
            sample(MetricKind::Steps, 10000.0, 2, now),
            sample(MetricKind::Water, 2.5, 1, now),
        ];
        let totals = totals_by_metric(&samples);

        assert!((totals[&MetricKind::Steps] - 18000.0).abs() < f64::EPSILON);
        assert!((totals[&MetricKind::Water] - 2.5).abs() < f64::EPSILON);
        assert!(!totals.contains_key(&MetricKind::Weight));
    }
}
