//! End-to-end tests for the goal service router.
//!
//! Each test builds a fresh router over its own store.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use health_goals::goals::{create_router, GoalStore};

struct TestResponse {
    status: StatusCode,
    content_type: Option<String>,
    body: Value,
}

fn app() -> Router {
    create_router(GoalStore::new())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        content_type,
        body,
    }
}

async fn create(app: &Router, goal: Value) -> Value {
    let res = send(app, Method::POST, "/resource", Some(goal)).await;
    assert_eq!(res.status, StatusCode::CREATED);
    res.body
}

fn error_text(res: &TestResponse) -> String {
    res.body["error"].as_str().unwrap_or_default().to_lowercase()
}

#[tokio::test]
async fn list_is_empty_initially() {
    let app = app();
    let res = send(&app, Method::GET, "/resource", None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!([]));
    assert!(res.content_type.unwrap().contains("json"));
}

#[tokio::test]
async fn create_then_list_returns_the_record() {
    let app = app();
    let created = create(
        &app,
        json!({
            "userId": "user-123",
            "title": "Lose Weight",
            "description": "Lose 10 pounds",
            "targetDate": "2025-12-31T00:00:00.000Z",
            "status": "active",
        }),
    )
    .await;

    let res = send(&app, Method::GET, "/resource", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!([created]));
}

#[tokio::test]
async fn minimal_create_fills_defaults() {
    let app = app();
    let res = send(
        &app,
        Method::POST,
        "/resource",
        Some(json!({
            "userId": "u1",
            "title": "Run 5K",
            "targetDate": "2025-05-15T00:00:00.000Z",
        })),
    )
    .await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert!(res.content_type.unwrap().contains("json"));
    let id = res.body["id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
    assert_eq!(
        res.body,
        json!({
            "id": id,
            "userId": "u1",
            "title": "Run 5K",
            "description": "",
            "targetDate": "2025-05-15T00:00:00.000Z",
            "status": "active",
        })
    );
}

#[tokio::test]
async fn every_status_value_is_accepted() {
    let app = app();
    for status in ["active", "completed", "abandoned"] {
        let created = create(
            &app,
            json!({
                "userId": "user-123",
                "title": "Status Test",
                "targetDate": "2025-12-31T00:00:00.000Z",
                "status": status,
            }),
        )
        .await;
        assert_eq!(created["status"], status);
    }
}

#[tokio::test]
async fn successive_creates_get_distinct_ids() {
    let app = app();
    let goal = |title: &str| {
        json!({"userId": "user-123", "title": title, "targetDate": "2025-12-31T00:00:00.000Z"})
    };

    let first = create(&app, goal("Goal 1")).await;
    let second = create(&app, goal("Goal 2")).await;

    assert_ne!(first["id"], second["id"]);
}

#[tokio::test]
async fn invalid_creates_name_the_offending_field() {
    let app = app();
    let cases = [
        (json!({"title": "Sleep 8 Hours", "targetDate": "2025-12-31T00:00:00.000Z"}), "userid"),
        (json!({"userId": "user-123", "targetDate": "2025-12-31T00:00:00.000Z"}), "title"),
        (json!({"userId": "user-123", "title": "Go", "targetDate": "2025-12-31T00:00:00.000Z"}), "title"),
        (json!({"userId": "user-123", "title": "Valid Title"}), "targetdate"),
        (
            json!({"userId": "user-123", "title": "Test Goal", "targetDate": "2025-12-31T00:00:00.000Z", "status": "invalid-status"}),
            "status",
        ),
    ];

    for (payload, field) in cases {
        let res = send(&app, Method::POST, "/resource", Some(payload)).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert!(error_text(&res).contains(field), "{:?} should mention {field}", res.body);
    }

    let res = send(&app, Method::GET, "/resource", None).await;
    assert_eq!(res.body, json!([]));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/resource")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn replace_overwrites_everything_but_id() {
    let app = app();
    let original = create(
        &app,
        json!({
            "userId": "user-123",
            "title": "Original Title",
            "description": "Original description",
            "targetDate": "2025-12-31T00:00:00.000Z",
            "status": "active",
        }),
    )
    .await;
    let id = original["id"].as_str().unwrap();

    let res = send(
        &app,
        Method::PUT,
        &format!("/resource/{id}"),
        Some(json!({
            "id": "something-else",
            "userId": "new-user",
            "title": "Completely New Goal",
            "description": "New description",
            "targetDate": "2025-01-01T00:00:00.000Z",
            "status": "completed",
        })),
    )
    .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.body,
        json!({
            "id": id,
            "userId": "new-user",
            "title": "Completely New Goal",
            "description": "New description",
            "targetDate": "2025-01-01T00:00:00.000Z",
            "status": "completed",
        })
    );

    let list = send(&app, Method::GET, "/resource", None).await;
    assert_eq!(list.body, json!([res.body]));
}

#[tokio::test]
async fn replace_without_description_resets_it() {
    let app = app();
    let original = create(
        &app,
        json!({
            "userId": "user-123",
            "title": "Has Description",
            "description": "to be dropped",
            "targetDate": "2025-12-31T00:00:00.000Z",
        }),
    )
    .await;
    let uri = format!("/resource/{}", original["id"].as_str().unwrap());

    let res = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"userId": "user-123", "title": "No Description", "targetDate": "2025-12-31"})),
    )
    .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["description"], "");
    assert_eq!(res.body["status"], "active");
    assert_eq!(res.body["targetDate"], "2025-12-31T00:00:00.000Z");
}

#[tokio::test]
async fn replace_unknown_id_is_not_found_even_when_invalid() {
    let app = app();
    for payload in [
        json!({"userId": "user-123", "title": "Updated Title", "targetDate": "2025-12-31T00:00:00.000Z"}),
        json!({"title": "x"}),
    ] {
        let res = send(&app, Method::PUT, "/resource/non-existent-id", Some(payload)).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert!(error_text(&res).contains("not found"));
    }
}

#[tokio::test]
async fn invalid_replace_leaves_record_unchanged() {
    let app = app();
    let original = create(
        &app,
        json!({"userId": "user-123", "title": "Original Title", "targetDate": "2025-12-31T00:00:00.000Z"}),
    )
    .await;
    let uri = format!("/resource/{}", original["id"].as_str().unwrap());

    let res = send(&app, Method::PUT, &uri, Some(json!({"userId": "user-123", "title": "Valid"}))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(error_text(&res).contains("targetdate"));

    let list = send(&app, Method::GET, "/resource", None).await;
    assert_eq!(list.body, json!([original]));
}

#[tokio::test]
async fn delete_returns_removed_goal_and_keeps_others() {
    let app = app();
    let doomed = create(
        &app,
        json!({"userId": "user-123", "title": "Goal to Delete", "targetDate": "2025-12-31T00:00:00.000Z"}),
    )
    .await;
    let other = create(
        &app,
        json!({"userId": "user-456", "title": "Other Goal", "targetDate": "2025-12-31T00:00:00.000Z"}),
    )
    .await;

    let uri = format!("/resource/{}", doomed["id"].as_str().unwrap());
    let res = send(&app, Method::DELETE, &uri, None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.body,
        json!({"message": "Health goal deleted", "deletedGoal": [doomed]})
    );

    let list = send(&app, Method::GET, "/resource", None).await;
    assert_eq!(list.body, json!([other]));

    let again = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
    let app = app();
    let res = send(&app, Method::DELETE, "/resource/non-existent-id", None).await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body, json!({"error": "Health goal not found"}));
}

#[tokio::test]
async fn routers_do_not_share_state() {
    let first = app();
    let second = app();
    create(
        &first,
        json!({"userId": "user-123", "title": "Isolated", "targetDate": "2025-12-31T00:00:00.000Z"}),
    )
    .await;

    let res = send(&second, Method::GET, "/resource", None).await;
    assert_eq!(res.body, json!([]));
}

#[tokio::test]
async fn health_reports_service_identity() {
    let app = app();
    let res = send(&app, Method::GET, "/health", None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "OK");
    assert_eq!(res.body["service"], "Health Goal Service");
    assert!(res.body["timestamp"].is_i64());
}
