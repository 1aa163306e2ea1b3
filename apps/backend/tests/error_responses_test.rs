mod common;

use actix_web::{test, web, App};
use backend::extractors::ValidatedJson;
use backend::AppError;
use serde::Deserialize;
use serde_json::Value;

/// Each endpoint fails with one error variant so the outward mapping can be
/// asserted end to end.
async fn fail_authorization() -> Result<web::Json<Value>, AppError> {
    Err(AppError::authorization("row exists but caller does not own it"))
}

async fn fail_validation() -> Result<web::Json<Value>, AppError> {
    Err(AppError::validation("No fields to update"))
}

async fn fail_db() -> Result<web::Json<Value>, AppError> {
    Err(AppError::db("connection pool exhausted"))
}

async fn fail_config() -> Result<web::Json<Value>, AppError> {
    Err(AppError::config("JWT secret not configured"))
}

async fn fail_internal() -> Result<web::Json<Value>, AppError> {
    Err(AppError::internal("unclassified failure"))
}

#[derive(Debug, Deserialize)]
struct EchoBody {
    message: String,
}

async fn echo_json(body: ValidatedJson<EchoBody>) -> Result<web::Json<Value>, AppError> {
    Ok(web::Json(serde_json::json!({ "message": body.message })))
}

macro_rules! error_app {
    () => {
        test::init_service(
            App::new()
                .service(web::resource("/authorization").to(fail_authorization))
                .service(web::resource("/validation").to(fail_validation))
                .service(web::resource("/db").to(fail_db))
                .service(web::resource("/config").to(fail_config))
                .service(web::resource("/internal").to(fail_internal))
                .service(web::resource("/echo").route(web::post().to(echo_json))),
        )
        .await
    };
}

#[actix_web::test]
async fn authorization_failures_surface_as_404_not_403() {
    let app = error_app!();

    let req = test::TestRequest::get().uri("/authorization").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 404);
    let body: Value = test::read_body_json(resp).await;
    // The body never admits the row exists.
    assert_eq!(body["detail"], "Resource not found");
    assert!(body.get("errors").is_none());
}

#[actix_web::test]
async fn validation_failures_pass_their_message_through() {
    let app = error_app!();

    let req = test::TestRequest::get().uri("/validation").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "No fields to update");
}

#[actix_web::test]
async fn database_failures_are_opaque_500s() {
    let app = error_app!();

    let req = test::TestRequest::get().uri("/db").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Internal server error");
    let detail = body["detail"].as_str().unwrap();
    assert!(!detail.contains("pool"));
}

#[actix_web::test]
async fn config_failures_name_configuration_without_detail() {
    let app = error_app!();

    let req = test::TestRequest::get().uri("/config").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Server configuration error");
}

#[actix_web::test]
async fn internal_failures_are_opaque_500s() {
    let app = error_app!();

    let req = test::TestRequest::get().uri("/internal").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Internal server error");
}

#[actix_web::test]
async fn malformed_json_body_yields_invalid_request_shape() {
    let app = error_app!();

    let req = test::TestRequest::post()
        .uri("/echo")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json at all")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Invalid request");
    assert!(body["errors"].as_array().is_some_and(|e| !e.is_empty()));
}

#[actix_web::test]
async fn type_mismatch_in_json_body_yields_invalid_request_shape() {
    let app = error_app!();

    let req = test::TestRequest::post()
        .uri("/echo")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"message": 42}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Invalid request");
}

#[actix_web::test]
async fn well_formed_json_body_passes_through() {
    let app = error_app!();

    let req = test::TestRequest::post()
        .uri("/echo")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"message": "hello"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "hello");
}
