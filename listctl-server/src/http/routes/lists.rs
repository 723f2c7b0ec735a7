//! List endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::items::{TodoItemResponse, TodoUserResponse};
use crate::db::{ListSummary, TodoList};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, Caller, ValidId};
use crate::http::routes::{created, Created};
use crate::http::server::AppState;
use crate::service::ListService;

/// Create list request
#[derive(Deserialize)]
pub struct CreateListRequest {
    pub title: String,
}

/// Add member request
#[derive(Deserialize)]
pub struct AddUserRequest {
    pub name: String,
}

/// List response. Items and users are left out of the overview.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoListResponse {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todo_items: Option<Vec<TodoItemResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todo_users: Option<Vec<TodoUserResponse>>,
}

impl From<ListSummary> for TodoListResponse {
    fn from(l: ListSummary) -> Self {
        Self {
            id: l.id,
            title: l.title,
            todo_items: None,
            todo_users: None,
        }
    }
}

impl From<TodoList> for TodoListResponse {
    fn from(l: TodoList) -> Self {
        Self {
            todo_users: Some(l.members.iter().map(TodoUserResponse::from).collect()),
            todo_items: Some(l.items.into_iter().map(TodoItemResponse::from).collect()),
            id: l.id,
            title: l.title,
        }
    }
}

/// GET /todolists - every list, id and title only
async fn list_lists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TodoListResponse>>, ApiError> {
    let lists = ListService::new(&state.pool, state.identity.as_ref())
        .list_all()
        .await?;

    Ok(Json(lists.into_iter().map(TodoListResponse::from).collect()))
}

/// GET /todolists/{id} - a list with its items and members
async fn get_list(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<TodoListResponse>, ApiError> {
    let list = ListService::new(&state.pool, state.identity.as_ref())
        .get(id)
        .await?;

    Ok(Json(TodoListResponse::from(list)))
}

/// POST /todolists - create a list owned by the caller
async fn create_list(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    body: Result<ApiJson<CreateListRequest>, ApiError>,
) -> Result<Created<TodoListResponse>, ApiError> {
    caller.require()?;
    let ApiJson(req) = body?;
    let list = ListService::new(&state.pool, state.identity.as_ref())
        .create(caller.user(), &req.title)
        .await?;

    let location = format!("/todolists/{}", list.id);
    Ok(created(location, TodoListResponse::from(list)))
}

/// POST /todolists/{id}/adduser - add an existing user as a member
async fn add_user(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    ValidId(id): ValidId,
    body: Result<ApiJson<AddUserRequest>, ApiError>,
) -> Result<StatusCode, ApiError> {
    caller.require()?;
    let ApiJson(req) = body?;
    ListService::new(&state.pool, state.identity.as_ref())
        .add_member(caller.user(), id, &req.name)
        .await?;

    Ok(StatusCode::OK)
}

/// List routes. The collection answers with and without a trailing slash.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/todolists", get(list_lists).post(create_list))
        .route("/todolists/", get(list_lists).post(create_list))
        .route("/todolists/{id}", get(get_list))
        .route("/todolists/{id}/adduser", post(add_user))
}
