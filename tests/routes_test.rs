// ABOUTME: End-to-end HTTP tests exercising the full router with real JWTs
// ABOUTME: Covers auth enforcement, metric and goal flows, and error status mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack
#![allow(clippy::unwrap_used)]

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, Utc};
use common::{create_test_auth_manager, create_test_database};
use fittrack_server::routes::{self, ServerResources};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

/// Router plus a bearer token for a fresh user
async fn test_app() -> (Router, String, Uuid) {
    let database = create_test_database().await.unwrap();
    let auth = create_test_auth_manager();

    let user_id = Uuid::new_v4();
    let token = auth.generate_token(user_id).unwrap();

    let app = routes::router(Arc::new(ServerResources::new(database, auth)));
    (app, token, user_id)
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint_is_public() {
    let (app, _, _) = test_app().await;

    let response = app
        .oneshot(request(Method::GET, "/api/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (app, _, _) = test_app().await;

    let response = app
        .oneshot(request(Method::GET, "/api/goals", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "AUTH_REQUIRED");
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let (app, _, _) = test_app().await;

    let response = app
        .oneshot(request(
            Method::GET,
            "/api/progress",
            Some("not.a.token"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "AUTH_INVALID");
}

#[tokio::test]
async fn test_record_metric_then_summary() {
    let (app, token, _) = test_app().await;

    let yesterday = Utc::now() - Duration::days(1);
    let payload = json!({
        "metric": "weight",
        "value": 80.5,
        "unit": "kg",
        "date": yesterday.to_rfc3339(),
    });
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/progress",
            Some(&token),
            Some(payload),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let sample = body_json(response).await;
    assert_eq!(sample["metric"], "weight");
    assert_eq!(sample["unit"], "kg");

    let response = app
        .oneshot(request(
            Method::GET,
            "/api/progress/summary/weight",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let summary = body_json(response).await;
    assert_eq!(summary["latest"], 80.5);
    assert_eq!(summary["unit"], "kg");
    assert_eq!(summary["weeklyDataPoints"], 1);
    // A single sample has no trend
    assert_eq!(summary["weeklyTrend"], 0.0);
}

#[tokio::test]
async fn test_summary_rejects_unknown_and_other_kinds() {
    let (app, token, _) = test_app().await;

    let response = app
        .clone()
        .oneshot(request(
            Method::GET,
            "/api/progress/summary/stamina",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_METRIC_KIND");

    // "other" parses but has no meaningful summary
    let response = app
        .oneshot(request(
            Method::GET,
            "/api/progress/summary/other",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metric_totals_accumulate() {
    let (app, token, _) = test_app().await;

    for (hours_ago, value) in [(2, 1.0), (1, 1.5)] {
        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/progress",
                Some(&token),
                Some(json!({
                    "metric": "water",
                    "value": value,
                    "unit": "L",
                    "date": (Utc::now() - Duration::hours(hours_ago)).to_rfc3339(),
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(request(
            Method::GET,
            "/api/progress/totals",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["totals"]["water"], 2.5);
}

#[tokio::test]
async fn test_goal_lifecycle_over_http() {
    let (app, token, _) = test_app().await;

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/goals",
            Some(&token),
            Some(json!({
                "title": "Run a 10k",
                "description": "Finish a 10k race",
                "goalType": "cardio",
                "targetDate": "2025-12-31T00:00:00Z",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let goal = body_json(response).await;
    assert_eq!(goal["progress"], 0.0);
    assert!(!goal["completed"].as_bool().unwrap());
    let goal_id = goal["id"].as_str().unwrap().to_owned();

    let response = app
        .clone()
        .oneshot(request(
            Method::PUT,
            &format!("/api/goals/{goal_id}"),
            Some(&token),
            Some(json!({ "progress": 100 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert!(updated["completed"].as_bool().unwrap());

    // Completion shows up on the dashboard with its activity trail
    let response = app
        .clone()
        .oneshot(request(
            Method::GET,
            "/api/dashboard/summary",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let summary = body_json(response).await;
    assert_eq!(summary["totalGoals"], 1);
    assert_eq!(summary["completedGoals"], 1);
    assert_eq!(summary["completionRate"], 100.0);
    assert!(!summary["recentActivities"].as_array().unwrap().is_empty());

    let response = app
        .clone()
        .oneshot(request(
            Method::DELETE,
            &format!("/api/goals/{goal_id}"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Goal removed");

    let response = app
        .oneshot(request(
            Method::GET,
            &format!("/api/goals/{goal_id}"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_goal_id_maps_to_not_found() {
    let (app, token, _) = test_app().await;

    let response = app
        .oneshot(request(
            Method::GET,
            "/api/goals/not-a-uuid",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_foreign_goal_access_is_unauthorized() {
    let database = create_test_database().await.unwrap();
    let auth = create_test_auth_manager();
    let owner_token = auth.generate_token(Uuid::new_v4()).unwrap();
    let intruder_token = auth.generate_token(Uuid::new_v4()).unwrap();
    let app = routes::router(Arc::new(ServerResources::new(database, auth)));

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/goals",
            Some(&owner_token),
            Some(json!({
                "title": "Private goal",
                "description": "Nobody else's business",
                "goalType": "health",
                "targetDate": "2025-12-31T00:00:00Z",
            })),
        ))
        .await
        .unwrap();
    let goal = body_json(response).await;
    let goal_id = goal["id"].as_str().unwrap().to_owned();

    let response = app
        .oneshot(request(
            Method::GET,
            &format!("/api/goals/{goal_id}"),
            Some(&intruder_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn test_dashboard_stats_buckets() {
    let (app, token, _) = test_app().await;

    for progress in [10, 60, 100] {
        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/goals",
                Some(&token),
                Some(json!({
                    "title": format!("Goal at {progress}"),
                    "description": "Bucket test goal",
                    "goalType": "strength",
                    "targetDate": "2025-12-31T00:00:00Z",
                    "progress": progress,
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(request(
            Method::GET,
            "/api/dashboard/stats",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stats = body_json(response).await;
    let distribution = stats["progressDistribution"].as_array().unwrap();
    assert_eq!(distribution.len(), 5);
    let counts: i64 = distribution
        .iter()
        .map(|b| b["count"].as_i64().unwrap())
        .sum();
    assert_eq!(counts, 3);

    let by_type = stats["avgProgressByType"].as_array().unwrap();
    assert_eq!(by_type.len(), 1);
    assert_eq!(by_type[0]["goalType"], "strength");
    assert!((by_type[0]["avgProgress"].as_f64().unwrap() - 56.666).abs() < 0.01);

    assert_eq!(stats["monthlyStats"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_activity_feed_pagination_over_http() {
    let (app, token, _) = test_app().await;

    // Each create appends one goal_created event
    for i in 0..4 {
        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/goals",
                Some(&token),
                Some(json!({
                    "title": format!("Goal {i}"),
                    "description": "Feed test goal",
                    "goalType": "other",
                    "targetDate": "2025-12-31T00:00:00Z",
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(request(
            Method::GET,
            "/api/dashboard/activities?page=2&limit=3",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let feed = body_json(response).await;
    assert_eq!(feed["totalActivities"], 4);
    assert_eq!(feed["totalPages"], 2);
    assert_eq!(feed["currentPage"], 2);
    assert_eq!(feed["activities"].as_array().unwrap().len(), 1);
}
