// ABOUTME: Core domain entities for metric samples, goals, and activity events
// ABOUTME: Enforces the goal completion invariant and closed metric/goal kind enums
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack

//! # Data Models
//!
//! Common data structures for tracked health metrics and fitness goals.
//! Metric and goal kinds are closed enums validated once at the boundary, so
//! an unrecognized kind can never reach store or aggregation logic.

use crate::errors::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

/// Maximum length of a goal title
pub const MAX_TITLE_LEN: usize = 100;
/// Maximum length of a goal description
pub const MAX_DESCRIPTION_LEN: usize = 500;
/// Maximum length of a metric sample's notes
pub const MAX_NOTES_LEN: usize = 200;

/// Category of a time-series health measurement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    /// Body weight
    Weight,
    /// Daily step count
    Steps,
    /// Calories burned or consumed
    Calories,
    /// Water intake
    Water,
    /// Heart rate
    HeartRate,
    /// Hours of sleep
    Sleep,
    /// Body fat percentage
    BodyFat,
    /// Anything that doesn't fit the concrete kinds
    Other,
}

impl MetricKind {
    /// All metric kinds, in wire order
    pub const ALL: [Self; 8] = [
        Self::Weight,
        Self::Steps,
        Self::Calories,
        Self::Water,
        Self::HeartRate,
        Self::Sleep,
        Self::BodyFat,
        Self::Other,
    ];

    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weight => "weight",
            Self::Steps => "steps",
            Self::Calories => "calories",
            Self::Water => "water",
            Self::HeartRate => "heartRate",
            Self::Sleep => "sleep",
            Self::BodyFat => "bodyFat",
            Self::Other => "other",
        }
    }
}

impl Display for MetricKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weight" => Ok(Self::Weight),
            "steps" => Ok(Self::Steps),
            "calories" => Ok(Self::Calories),
            "water" => Ok(Self::Water),
            "heartRate" => Ok(Self::HeartRate),
            "sleep" => Ok(Self::Sleep),
            "bodyFat" => Ok(Self::BodyFat),
            "other" => Ok(Self::Other),
            _ => Err(AppError::invalid_metric_kind(s)),
        }
    }
}

/// Category tag for a fitness goal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    /// Weight change goal
    Weight,
    /// Cardiovascular endurance goal
    Cardio,
    /// Strength training goal
    Strength,
    /// Hydration goal
    Water,
    /// General health goal
    Health,
    /// Anything else
    Other,
}

impl GoalType {
    /// All goal types, in wire order
    pub const ALL: [Self; 6] = [
        Self::Weight,
        Self::Cardio,
        Self::Strength,
        Self::Water,
        Self::Health,
        Self::Other,
    ];

    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weight => "weight",
            Self::Cardio => "cardio",
            Self::Strength => "strength",
            Self::Water => "water",
            Self::Health => "health",
            Self::Other => "other",
        }
    }
}

impl Display for GoalType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GoalType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weight" => Ok(Self::Weight),
            "cardio" => Ok(Self::Cardio),
            "strength" => Ok(Self::Strength),
            "water" => Ok(Self::Water),
            "health" => Ok(Self::Health),
            "other" => Ok(Self::Other),
            _ => Err(AppError::invalid_goal_type(s)),
        }
    }
}

/// How often the user wants to be reminded about a goal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReminderFrequency {
    /// Remind every day
    Daily,
    /// Remind every week
    Weekly,
    /// Remind every month
    Monthly,
    /// No reminders
    #[default]
    None,
}

impl ReminderFrequency {
    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::None => "none",
        }
    }
}

impl FromStr for ReminderFrequency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "none" => Ok(Self::None),
            _ => Err(AppError::invalid_input(format!(
                "Invalid reminder frequency: {s}"
            ))),
        }
    }
}

/// Kind of goal-related event recorded in the activity log
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityEventType {
    /// Goal progress percentage changed
    ProgressUpdate,
    /// A goal was created
    GoalCreated,
    /// A goal reached 100% progress
    GoalCompleted,
    /// A goal's fields were edited
    GoalUpdated,
    /// A goal reminder schedule was set
    ReminderSet,
}

impl ActivityEventType {
    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ProgressUpdate => "progress_update",
            Self::GoalCreated => "goal_created",
            Self::GoalCompleted => "goal_completed",
            Self::GoalUpdated => "goal_updated",
            Self::ReminderSet => "reminder_set",
        }
    }
}

impl FromStr for ActivityEventType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "progress_update" => Ok(Self::ProgressUpdate),
            "goal_created" => Ok(Self::GoalCreated),
            "goal_completed" => Ok(Self::GoalCompleted),
            "goal_updated" => Ok(Self::GoalUpdated),
            "reminder_set" => Ok(Self::ReminderSet),
            _ => Err(AppError::invalid_input(format!(
                "Invalid activity event type: {s}"
            ))),
        }
    }
}

/// A single timestamped health metric sample
///
/// At most one sample exists per `(user_id, metric, recorded_at)` triple; a
/// write targeting an existing triple updates the stored sample in place.
/// The timestamp is compared at full datetime precision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    /// Unique sample id
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Metric category; immutable once created
    pub metric: MetricKind,
    /// Measured value
    pub value: f64,
    /// Unit the value was measured in (kg, steps, bpm, ...)
    pub unit: String,
    /// When the measurement was taken
    pub recorded_at: DateTime<Utc>,
    /// Optional free-form notes (max 200 chars)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// A fitness goal with a progress percentage and derived completion flag
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Unique goal id
    pub id: Uuid,
    /// Owning user; immutable once created
    pub user_id: Uuid,
    /// Short goal title (max 100 chars)
    pub title: String,
    /// Longer description (max 500 chars)
    pub description: String,
    /// Goal category
    pub goal_type: GoalType,
    /// When the user wants to reach the goal
    pub target_date: DateTime<Utc>,
    /// Progress percentage, always within 0-100
    pub progress: f64,
    /// Derived flag; `completed == (progress >= 100)` at all times
    pub completed: bool,
    /// Optional numeric target (e.g. 70 kg)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
    /// Optional current measurement toward the target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    /// Unit for target/current values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Reminder schedule
    pub reminder_frequency: ReminderFrequency,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Apply a progress value while maintaining the completion invariant.
    ///
    /// Progress at or above 100 clamps to exactly 100 and marks the goal
    /// completed; anything below 100 clears the flag. Enforced on every
    /// write, never computed lazily on read. A completed goal is re-opened
    /// by a later write that lowers progress.
    pub fn apply_progress(&mut self, progress: f64) {
        if progress >= 100.0 {
            self.progress = 100.0;
            self.completed = true;
        } else {
            self.progress = progress;
            self.completed = false;
        }
    }

    /// Whether the given progress value marks a goal completed
    #[must_use]
    pub fn completes(progress: f64) -> bool {
        progress >= 100.0
    }
}

/// Append-only record of a goal-related event
///
/// Activity events are never mutated or deleted, and are consumed only for
/// read-side summaries. Goal state is authoritative in the [`Goal`] entity
/// itself; it is never reconstructed from the event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    /// Unique event id
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Goal the event relates to
    pub goal_id: Uuid,
    /// What happened
    #[serde(rename = "type")]
    pub event_type: ActivityEventType,
    /// Human-readable description
    pub description: String,
    /// Optional value associated with the event (e.g. new progress)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Unit for the value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// When the event was recorded
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_goal(progress: f64) -> Goal {
        let now = Utc::now();
        let mut goal = Goal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Run a 10k".into(),
            description: "Finish a 10k race".into(),
            goal_type: GoalType::Cardio,
            target_date: now,
            progress: 0.0,
            completed: false,
            target_value: None,
            current_value: None,
            unit: None,
            reminder_frequency: ReminderFrequency::default(),
            created_at: now,
            updated_at: now,
        };
        goal.apply_progress(progress);
        goal
    }

    #[test]
    fn test_progress_clamps_at_100() {
        let goal = test_goal(140.0);
        assert!((goal.progress - 100.0).abs() < f64::EPSILON);
        assert!(goal.completed);
    }

    #[test]
    fn test_completed_goal_reopens() {
        let mut goal = test_goal(100.0);
        assert!(goal.completed);

        goal.apply_progress(80.0);
        assert!(!goal.completed);
        assert!((goal.progress - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_metric_kind_round_trip() {
        for kind in MetricKind::ALL {
            assert_eq!(kind.as_str().parse::<MetricKind>().ok(), Some(kind));
        }
        assert!("stamina".parse::<MetricKind>().is_err());
        // Wire format is camelCase, same as storage
        assert!("heartrate".parse::<MetricKind>().is_err());
    }

    #[test]
    fn test_goal_type_round_trip() {
        for goal_type in GoalType::ALL {
            assert_eq!(goal_type.as_str().parse::<GoalType>().ok(), Some(goal_type));
        }
        assert!("flexibility".parse::<GoalType>().is_err());
    }
}
