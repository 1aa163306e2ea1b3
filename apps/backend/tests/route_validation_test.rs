mod common;

use actix_web::{test, App};
use backend::routes;
use serde_json::Value;

use common::{bearer_for, test_security, test_state};

// Handler-level validation runs before any database access, so these tests
// exercise the real route tree against a state with no database attached.

macro_rules! api_app {
    () => {
        test::init_service(
            App::new()
                .app_data(test_state())
                .configure(routes::configure),
        )
        .await
    };
}

fn auth() -> (&'static str, String) {
    ("Authorization", bearer_for("user-1", &test_security()))
}

#[actix_web::test]
async fn empty_project_patch_is_rejected() {
    let app = api_app!();

    let req = test::TestRequest::patch()
        .uri("/api/v1/projects/550e8400-e29b-41d4-a716-446655440000")
        .insert_header(auth())
        .insert_header(("content-type", "application/json"))
        .set_payload("{}")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "No fields to update");
}

#[actix_web::test]
async fn empty_task_patch_is_rejected() {
    let app = api_app!();

    let req = test::TestRequest::patch()
        .uri("/api/v1/tasks/550e8400-e29b-41d4-a716-446655440000")
        .insert_header(auth())
        .insert_header(("content-type", "application/json"))
        .set_payload("{}")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "No fields to update");
}

#[actix_web::test]
async fn oversized_project_name_is_rejected() {
    let app = api_app!();

    let payload = serde_json::json!({ "name": "x".repeat(256) });
    let req = test::TestRequest::post()
        .uri("/api/v1/projects")
        .insert_header(auth())
        .insert_header(("content-type", "application/json"))
        .set_payload(payload.to_string())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["detail"].as_str().unwrap().contains("name"));
}

#[actix_web::test]
async fn reminder_with_garbage_due_time_is_rejected() {
    let app = api_app!();

    let payload = serde_json::json!({
        "message": "water the plants",
        "due_time": "next tuesday"
    });
    let req = test::TestRequest::post()
        .uri("/api/v1/reminders")
        .insert_header(auth())
        .insert_header(("content-type", "application/json"))
        .set_payload(payload.to_string())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["detail"].as_str().unwrap().contains("due_time"));
}

#[actix_web::test]
async fn empty_note_content_is_rejected() {
    let app = api_app!();

    let payload = serde_json::json!({
        "project_id": "550e8400-e29b-41d4-a716-446655440000",
        "content": ""
    });
    let req = test::TestRequest::post()
        .uri("/api/v1/notes")
        .insert_header(auth())
        .insert_header(("content-type", "application/json"))
        .set_payload(payload.to_string())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["detail"].as_str().unwrap().contains("content"));
}

#[actix_web::test]
async fn resource_routes_require_authentication() {
    let app = api_app!();

    for uri in [
        "/api/v1/projects",
        "/api/v1/tasks",
        "/api/v1/ideas",
        "/api/v1/reminders",
        "/api/v1/notes",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 401, "expected 401 for {uri}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Authentication failed");
    }
}
