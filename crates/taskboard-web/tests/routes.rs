use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use taskboard_web::create_router;
use taskboard_web::state::{AppState, WebSocketMessage};

async fn router() -> (Router, AppState) {
    let state = AppState::new().await.unwrap();
    (create_router(state.clone()), state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn create(app: &Router, title: &str) -> Value {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/projects",
            json!({ "title": title, "description": "Ship the thing", "people": 2 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    serde_json::from_str(&body).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = router().await;
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"ok\""));
}

#[tokio::test]
async fn index_renders_form_before_lists() {
    let (app, _) = router().await;
    let (status, body) = send(&app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    let form = body.find("id=\"user-input\"").unwrap();
    let active = body.find("id=\"active-projects\"").unwrap();
    let finished = body.find("id=\"finished-projects\"").unwrap();
    assert!(form < active && active < finished);
}

#[tokio::test]
async fn created_project_appears_in_active_list() {
    let (app, _) = router().await;
    let project = create(&app, "Build API").await;
    assert_eq!(project["status"], "active");
    assert_eq!(project["people"], 2);

    let (_, active) = send(&app, get("/lists/active")).await;
    let (_, finished) = send(&app, get("/lists/finished")).await;
    assert!(active.contains("<h2>Build API</h2>"));
    assert!(active.contains("2 persons assigned"));
    assert!(!finished.contains("Build API"));

    let (_, all) = send(&app, get("/api/projects")).await;
    let all: Vec<Value> = serde_json::from_str(&all).unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn invalid_project_is_rejected_with_message() {
    let (app, _) = router().await;
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/projects",
            json!({ "title": "X", "description": "tiny", "people": 6 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let failure: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(failure["message"], "Invalid input, please try again!");
    assert_eq!(failure["fields"].as_array().unwrap().len(), 2);

    let (_, all) = send(&app, get("/api/projects")).await;
    assert_eq!(all, "[]");
}

#[tokio::test]
async fn patch_moves_project_and_reports_unknown_ids() {
    let (app, _) = router().await;
    let project = create(&app, "A").await;
    let id = project["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        json_request("PATCH", &format!("/api/projects/{}", id), json!({ "status": "finished" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let outcome: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(outcome["outcome"], "moved");
    assert_eq!(outcome["to"], "finished");

    let (status, body) = send(
        &app,
        json_request("PATCH", "/api/projects/missing", json!({ "status": "finished" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("not_found"));
}

#[tokio::test]
async fn drop_moves_card_between_lists() {
    let (app, _) = router().await;
    let project = create(&app, "A").await;
    let id = project["id"].as_str().unwrap();

    let (status, body) = send(&app, form_request("/drop", &format!("project_id={}&target=finished", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"moved\""));

    let (_, finished) = send(&app, get("/lists/finished")).await;
    assert!(finished.contains(id));

    let (status, body) = send(&app, form_request("/drop", &format!("project_id={}&target=finished", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"unchanged\""));
}

#[tokio::test]
async fn drop_of_unknown_card_is_not_found() {
    let (app, _) = router().await;
    let (status, _) = send(&app, form_request("/drop", "project_id=missing&target=active")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn drop_of_non_card_element_is_not_found() {
    let (app, _) = router().await;
    create(&app, "A").await;

    for id in ["title", "user-input", "finished-projects-list"] {
        let (status, _) = send(&app, form_request("/drop", &format!("project_id={}&target=finished", id))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn form_submit_redirects_or_shows_notice() {
    let (app, _) = router().await;

    let (status, _) = send(
        &app,
        form_request("/projects", "title=Docs&description=Write+the+guide&people=1"),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let (status, body) = send(&app, form_request("/projects", "title=&description=short&people=0")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("Invalid input, please try again!"));
    // rejected values stay in the form
    assert!(body.contains("value=\"short\"") || body.contains(">short</textarea>"));
}

#[tokio::test]
async fn unknown_list_is_not_found() {
    let (app, _) = router().await;
    let (status, _) = send(&app, get("/lists/archived")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn store_changes_are_broadcast() {
    let (app, state) = router().await;
    let mut rx = state.tx.subscribe();

    create(&app, "A").await;

    let message = rx.recv().await.unwrap();
    assert_eq!(message, WebSocketMessage::BoardRefresh { active: 1, finished: 0 });
}
