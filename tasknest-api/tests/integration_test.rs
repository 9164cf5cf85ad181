//! Integration tests for the API server.
//!
//! Router-only tests run against an app whose pool never connects, so they
//! cover everything that stays out of the database: static pages, security
//! headers, the session guard, and validation failures that short-circuit
//! before any query. The full account-and-task flow needs Postgres and is
//! skipped unless DATABASE_URL is set.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::json;
use tower::Service as _;
use uuid::Uuid;

use common::{body_json, offline_app, TestContext};

async fn send(app: &Router, request: Request<Body>) -> Response {
    let mut app = app.clone();
    app.call(request).await.expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request")
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn json_with_cookie(
    method: Method,
    uri: &str,
    cookie: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// Pulls the session cookie pair out of a response's Set-Cookie headers.
fn session_cookie(response: &Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("tasknest_session="))
        .expect("session cookie")
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}

#[tokio::test]
async fn test_home_page_renders_without_notices() {
    let app = offline_app();

    let response = send(&app, get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["title"], "TaskNest");
    assert_eq!(body["notices"], json!([]));
}

#[tokio::test]
async fn test_static_pages_render() {
    let app = offline_app();

    let response = send(&app, get("/about")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["title"], "About");

    let response = send(&app, get("/news")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["title"], "News");
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = offline_app();

    let response = send(&app, get("/about")).await;
    let headers = response.headers();

    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.contains_key("referrer-policy"));
    // HSTS only ships in production mode
    assert!(!headers.contains_key("strict-transport-security"));
}

#[tokio::test]
async fn test_tasks_require_session() {
    let app = offline_app();

    let response = send(&app, get("/tasks")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_register_rejects_blank_fields_in_order() {
    let app = offline_app();

    // Blank username keeps the uniqueness check (and the database) out of it.
    let response = send(
        &app,
        post_json(
            "/users",
            json!({
                "first_name": "",
                "last_name": "",
                "username": "",
                "password": "",
                "password_confirmation": "",
            }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");

    let details = body["details"].as_array().expect("details array");
    assert_eq!(details.len(), 4);
    assert_eq!(details[0]["field"], "first_name");
    assert_eq!(details[0]["message"], "First Name can not be blank.");
    assert_eq!(details[1]["field"], "last_name");
    assert_eq!(details[1]["message"], "Last Name can not be blank.");
    assert_eq!(details[2]["field"], "username");
    assert_eq!(details[2]["message"], "Username can not be blank.");
    assert_eq!(details[3]["field"], "password");
    assert_eq!(details[3]["message"], "Password can not be blank.");
}

#[tokio::test]
async fn test_register_rejects_mismatched_passwords() {
    let app = offline_app();

    let response = send(
        &app,
        post_json(
            "/users",
            json!({
                "first_name": "",
                "last_name": "",
                "username": "",
                "password": "hunter2hunter2",
                "password_confirmation": "something else",
            }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    let details = body["details"].as_array().expect("details array");
    let last = details.last().expect("at least one failure");
    assert_eq!(last["field"], "password_confirmation");
    assert_eq!(last["message"], "Passwords do not match.");
}

#[tokio::test]
async fn test_register_rejects_overlong_username() {
    let app = offline_app();

    let response = send(
        &app,
        post_json(
            "/users",
            json!({
                "first_name": "Wren",
                "last_name": "Sparrow",
                "username": "w".repeat(256),
                "password": "hunter2hunter2",
                "password_confirmation": "hunter2hunter2",
            }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    let details = body["details"].as_array().expect("details array");
    assert_eq!(details.len(), 1);
    assert_eq!(details[0]["field"], "username");
    assert_eq!(details[0]["message"], "Username is too long.");
}

#[tokio::test]
async fn test_full_account_and_task_flow() {
    let Some(ctx) = TestContext::new().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let username = format!("wren_{}", Uuid::new_v4().simple());
    let shouted = username.to_uppercase();

    // Register with a shouted username; the stored form is lowercase.
    let response = send(
        &ctx.app,
        post_json(
            "/users",
            json!({
                "first_name": "Wren",
                "last_name": "Sparrow",
                "username": &shouted,
                "password": "hunter2hunter2",
                "password_confirmation": "hunter2hunter2",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let user = body_json(response).await;
    assert_eq!(user["username"], username);
    assert!(user
        .as_object()
        .expect("user object")
        .get("password_hash")
        .is_none());

    // A second registration under any casing of the same name is rejected,
    // echoing the name as submitted.
    let response = send(
        &ctx.app,
        post_json(
            "/users",
            json!({
                "first_name": "Impostor",
                "last_name": "Sparrow",
                "username": &shouted,
                "password": "hunter2hunter2",
                "password_confirmation": "hunter2hunter2",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    let details = body["details"].as_array().expect("details array");
    assert_eq!(details[0]["field"], "username");
    assert_eq!(details[0]["message"], format!("{} already taken.", shouted));

    // Wrong password and unknown user come back indistinguishable.
    let wrong_password = send(
        &ctx.app,
        post_json(
            "/signin",
            json!({ "username": &username, "password": "not the password" }),
        ),
    )
    .await;
    assert_eq!(wrong_password.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let wrong_password_body = body_json(wrong_password).await;

    let unknown_user = send(
        &ctx.app,
        post_json(
            "/signin",
            json!({ "username": "nobody_nested_here", "password": "not the password" }),
        ),
    )
    .await;
    assert_eq!(unknown_user.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let unknown_user_body = body_json(unknown_user).await;

    assert_eq!(wrong_password_body, unknown_user_body);
    assert_eq!(
        wrong_password_body["details"][0]["field"], "username",
        "rejection pins the failure on the username field"
    );
    assert_eq!(
        wrong_password_body["details"][0]["message"],
        "invalid username/password"
    );

    // Correct credentials, shouted and padded, still sign in.
    let response = send(
        &ctx.app,
        post_json(
            "/signin",
            json!({
                "username": format!("  {}  ", shouted),
                "password": "hunter2hunter2",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/tasks");
    let cookie = session_cookie(&response);

    // The task list greets once, then the flash is gone.
    let response = send(&ctx.app, get_with_cookie("/tasks", &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["tasks"], json!([]));
    assert_eq!(body["notices"][0]["level"], "success");
    assert_eq!(body["notices"][0]["message"], "Welcome back!");

    let response = send(&ctx.app, get_with_cookie("/tasks", &cookie)).await;
    let body = body_json(response).await;
    assert_eq!(body["notices"], json!([]));

    // Create, read, update.
    let response = send(
        &ctx.app,
        json_with_cookie(
            Method::POST,
            "/tasks",
            &cookie,
            json!({ "title": "Feather the nest", "details": "twigs first" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let task = body_json(response).await;
    assert_eq!(task["title"], "Feather the nest");
    assert_eq!(task["completed"], false);
    let task_id = task["id"].as_str().expect("task id").to_string();

    let response = send(&ctx.app, get_with_cookie(&format!("/tasks/{task_id}"), &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &ctx.app,
        json_with_cookie(
            Method::PUT,
            &format!("/tasks/{task_id}"),
            &cookie,
            json!({ "title": "Feather the nest", "completed": true }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let task = body_json(response).await;
    assert_eq!(task["completed"], true);

    // A blank title never reaches the store.
    let response = send(
        &ctx.app,
        json_with_cookie(Method::POST, "/tasks", &cookie, json!({ "title": "   " })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["details"][0]["field"], "title");
    assert_eq!(body["details"][0]["message"], "Title can not be blank.");

    // Delete, then the id is gone.
    let response = send(
        &ctx.app,
        Request::builder()
            .method(Method::DELETE)
            .uri(format!("/tasks/{task_id}"))
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&ctx.app, get_with_cookie(&format!("/tasks/{task_id}"), &cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Sign out redirects home and the farewell rides a fresh session.
    let response = send(
        &ctx.app,
        Request::builder()
            .method(Method::POST)
            .uri("/signout")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    let fresh_cookie = session_cookie(&response);

    let response = send(&ctx.app, get_with_cookie("/", &fresh_cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["notices"][0]["message"], "You have been signed out.");

    // The pre-signout cookie no longer opens the task list.
    let response = send(&ctx.app, get_with_cookie("/tasks", &cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
