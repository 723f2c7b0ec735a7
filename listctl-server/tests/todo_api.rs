//! End-to-end API tests against an in-memory database

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use listctl_server::db::{create_memory_pool, migrations, UserRepo};
use listctl_server::http::{build_router, AppState};
use listctl_server::identity::{TrustedHeaderIdentity, DEFAULT_IDENTITY_HEADER};
use listctl_server::models::Username;

async fn app(users: &[&str]) -> Router {
    let pool = create_memory_pool().await.unwrap();
    migrations::run(&pool).await.unwrap();
    for name in users {
        UserRepo::new(&pool)
            .create(&Username::new(name).unwrap())
            .await
            .unwrap();
    }

    let identity = TrustedHeaderIdentity::with_default_header(pool.clone());
    build_router(AppState::new(pool, Arc::new(identity)))
}

struct Reply {
    status: StatusCode,
    location: Option<String>,
    body: Value,
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> Reply {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        req = req.header(DEFAULT_IDENTITY_HEADER, user);
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => req.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_owned());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    Reply {
        status,
        location,
        body,
    }
}

async fn get(app: &Router, uri: &str) -> Reply {
    call(app, Method::GET, uri, None, None).await
}

async fn post(app: &Router, uri: &str, user: Option<&str>, body: Value) -> Reply {
    call(app, Method::POST, uri, user, Some(body)).await
}

async fn put(app: &Router, uri: &str, user: Option<&str>, body: Value) -> Reply {
    call(app, Method::PUT, uri, user, Some(body)).await
}

/// Create a list as `user` and return its id
async fn new_list(app: &Router, user: &str, title: &str) -> i64 {
    let reply = post(app, "/todolists/", Some(user), json!({ "title": title })).await;
    assert_eq!(reply.status, StatusCode::CREATED);
    reply.body["id"].as_i64().unwrap()
}

fn item(title: &str, text: &str, deadline: &str) -> Value {
    json!({ "title": title, "text": text, "deadline": deadline })
}

#[tokio::test]
async fn groceries_scenario() {
    let app = app(&["alice", "bob"]).await;

    let created = post(&app, "/todolists/", Some("alice"), json!({ "title": "Groceries" })).await;
    assert_eq!(created.status, StatusCode::CREATED);
    let list_id = created.body["id"].as_i64().unwrap();
    assert_eq!(created.location, Some(format!("/todolists/{list_id}")));
    assert_eq!(created.body["todoUsers"], json!([{ "name": "alice" }]));
    assert_eq!(created.body["todoItems"], json!([]));

    let milk = item("Milk", "2%", "2025-01-01T00:00:00Z");
    let created = post(&app, &format!("/todoitems/{list_id}"), Some("alice"), milk).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["flag"], "Active");
    assert_eq!(created.body["createdBy"]["name"], "alice");
    let item_id = created.body["id"].as_i64().unwrap();
    assert_eq!(created.location, Some(format!("/todoitems/{item_id}")));

    let item_uri = format!("/todoitems/{item_id}");
    let mut update = item("Milk", "whole", "2025-01-02T00:00:00Z");
    update["flag"] = json!("Finished");

    let denied = put(&app, &item_uri, Some("bob"), update.clone()).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let adduser = format!("/todolists/{list_id}/adduser");
    let added = post(&app, &adduser, Some("alice"), json!({ "name": "bob" })).await;
    assert_eq!(added.status, StatusCode::OK);

    let updated = put(&app, &item_uri, Some("bob"), update).await;
    assert_eq!(updated.status, StatusCode::NO_CONTENT);

    let fetched = get(&app, &item_uri).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["text"], "whole");
    assert_eq!(fetched.body["flag"], "Finished");
    assert_eq!(fetched.body["deadline"], "2025-01-02T00:00:00Z");
    assert_eq!(fetched.body["createdBy"]["name"], "alice");
}

#[tokio::test]
async fn anonymous_writes_are_unauthorized() {
    let app = app(&["alice"]).await;
    let milk = item("Milk", "", "2025-01-01T00:00:00Z");

    let reply = post(&app, "/todolists/", None, json!({ "title": "x" })).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    // Target existence does not matter
    let reply = post(&app, "/todoitems/42", None, milk.clone()).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let mut update = milk;
    update["flag"] = json!("Active");
    let reply = put(&app, "/todoitems/42", None, update).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = post(&app, "/todolists/42/adduser", None, json!({ "name": "alice" })).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    // An unregistered name in the identity header is no identity at all
    let reply = post(&app, "/todolists/", Some("mallory"), json!({ "title": "x" })).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_members_are_forbidden() {
    let app = app(&["alice", "bob"]).await;
    let list_id = new_list(&app, "alice", "Groceries").await;
    let milk = item("Milk", "", "2025-01-01T00:00:00Z");

    let created = post(&app, &format!("/todoitems/{list_id}"), Some("alice"), milk.clone()).await;
    let item_id = created.body["id"].as_i64().unwrap();

    let reply = post(&app, &format!("/todoitems/{list_id}"), Some("bob"), milk.clone()).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let mut update = milk;
    update["flag"] = json!("Canceled");
    let reply = put(&app, &format!("/todoitems/{item_id}"), Some("bob"), update).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let adduser = format!("/todolists/{list_id}/adduser");
    let reply = post(&app, &adduser, Some("bob"), json!({ "name": "bob" })).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let list = get(&app, &format!("/todolists/{list_id}")).await;
    assert_eq!(list.body["todoUsers"], json!([{ "name": "alice" }]));
    assert_eq!(list.body["todoItems"][0]["flag"], "Active");
}

#[tokio::test]
async fn add_user_failures_name_the_missing_entity() {
    let app = app(&["alice", "bob"]).await;
    let list_id = new_list(&app, "alice", "Groceries").await;

    let reply = post(&app, "/todolists/999/adduser", Some("alice"), json!({ "name": "bob" })).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["message"], "list not found");

    let adduser = format!("/todolists/{list_id}/adduser");
    let reply = post(&app, &adduser, Some("alice"), json!({ "name": "zed" })).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["message"], "user not found");
}

#[tokio::test]
async fn adding_a_member_twice_is_idempotent() {
    let app = app(&["alice", "bob"]).await;
    let list_id = new_list(&app, "alice", "Groceries").await;
    let adduser = format!("/todolists/{list_id}/adduser");

    for _ in 0..2 {
        let reply = post(&app, &adduser, Some("alice"), json!({ "name": "bob" })).await;
        assert_eq!(reply.status, StatusCode::OK);
    }

    let fetched = get(&app, &format!("/todolists/{list_id}")).await;
    assert_eq!(
        fetched.body["todoUsers"],
        json!([{ "name": "alice" }, { "name": "bob" }])
    );
}

#[tokio::test]
async fn create_item_ignores_requested_flag() {
    let app = app(&["alice"]).await;
    let list_id = new_list(&app, "alice", "Groceries").await;

    let mut milk = item("Milk", "", "2025-01-01T00:00:00Z");
    milk["flag"] = json!("Canceled");
    let reply = post(&app, &format!("/todoitems/{list_id}"), Some("alice"), milk).await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["flag"], "Active");
}

#[tokio::test]
async fn reads_are_open_and_shaped() {
    let app = app(&["alice"]).await;
    new_list(&app, "alice", "Groceries").await;
    new_list(&app, "alice", "Garage").await;
    let milk = item("Milk", "2%", "2025-01-01T00:00:00Z");
    post(&app, "/todoitems/1", Some("alice"), milk).await;

    let all = get(&app, "/todolists/").await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(
        all.body,
        json!([{ "id": 1, "title": "Groceries" }, { "id": 2, "title": "Garage" }])
    );
    assert_eq!(get(&app, "/todolists").await.body, all.body);

    let one = get(&app, "/todolists/1").await;
    assert_eq!(one.status, StatusCode::OK);
    assert_eq!(one.body["todoItems"][0]["title"], "Milk");
    assert_eq!(one.body["todoItems"][0]["createdBy"]["name"], "alice");
    assert_eq!(one.body["todoUsers"], json!([{ "name": "alice" }]));

    assert_eq!(get(&app, "/todolists/3").await.status, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/todoitems/9").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_input_is_bad_request() {
    let app = app(&["alice"]).await;

    let reply = post(&app, "/todolists/", Some("alice"), json!({ "title": "   " })).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"], "validation_error");

    let reply = get(&app, "/todolists/abc").await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let list_id = new_list(&app, "alice", "Groceries").await;
    let milk = item("Milk", "", "2025-01-01T00:00:00Z");
    let created = post(&app, &format!("/todoitems/{list_id}"), Some("alice"), milk.clone()).await;
    let item_id = created.body["id"].as_i64().unwrap();

    let mut update = milk;
    update["flag"] = json!("Done");
    let reply = put(&app, &format!("/todoitems/{item_id}"), Some("alice"), update).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deadline_without_offset_is_read_as_utc() {
    let app = app(&["alice"]).await;
    let list_id = new_list(&app, "alice", "Groceries").await;

    let milk = item("Milk", "2%", "2025-01-01T00:00:00");
    let created = post(&app, &format!("/todoitems/{list_id}"), Some("alice"), milk).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["deadline"], "2025-01-01T00:00:00Z");

    let item_uri = format!("/todoitems/{}", created.body["id"]);
    let update = item("Milk", "2%", "2025-01-02T08:30:00");
    assert_eq!(put(&app, &item_uri, Some("alice"), update).await.status, StatusCode::NO_CONTENT);
    assert_eq!(get(&app, &item_uri).await.body["deadline"], "2025-01-02T08:30:00Z");
}

#[tokio::test]
async fn missing_list_wins_over_invalid_item() {
    let app = app(&["alice", "bob"]).await;
    let list_id = new_list(&app, "alice", "Groceries").await;
    let blank = item("  ", "", "2025-01-01T00:00:00Z");

    let reply = post(&app, "/todoitems/999", Some("alice"), blank.clone()).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["message"], "list not found");

    let reply = post(&app, &format!("/todoitems/{list_id}"), Some("bob"), blank.clone()).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = post(&app, &format!("/todoitems/{list_id}"), Some("alice"), blank).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_without_flag_resets_to_active() {
    let app = app(&["alice"]).await;
    let list_id = new_list(&app, "alice", "Groceries").await;
    let milk = item("Milk", "2%", "2025-01-01T00:00:00Z");
    let created = post(&app, &format!("/todoitems/{list_id}"), Some("alice"), milk.clone()).await;
    let item_uri = format!("/todoitems/{}", created.body["id"]);

    let mut finished = milk.clone();
    finished["flag"] = json!("Finished");
    put(&app, &item_uri, Some("alice"), finished).await;
    assert_eq!(get(&app, &item_uri).await.body["flag"], "Finished");

    // Anonymous callers get 401 even with a flag-less body
    assert_eq!(put(&app, &item_uri, None, milk.clone()).await.status, StatusCode::UNAUTHORIZED);

    assert_eq!(put(&app, &item_uri, Some("alice"), milk).await.status, StatusCode::NO_CONTENT);
    assert_eq!(get(&app, &item_uri).await.body["flag"], "Active");
}

#[tokio::test]
async fn malformed_bodies_use_the_error_envelope() {
    let app = app(&["alice"]).await;
    let list_id = new_list(&app, "alice", "Groceries").await;

    let send = |user: Option<&'static str>, body: &'static str| {
        let mut req = Request::post(format!("/todoitems/{list_id}"))
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(user) = user {
            req = req.header(DEFAULT_IDENTITY_HEADER, user);
        }
        app.clone().oneshot(req.body(Body::from(body)).unwrap())
    };

    let response = send(Some("alice"), "{not json").await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "invalid_body");

    let response = send(Some("alice"), r#"{"title":"Milk"}"#).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "invalid_body");

    let response = send(None, "{not json").await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_ok() {
    let app = app(&[]).await;
    let reply = get(&app, "/health").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "ok");
}
