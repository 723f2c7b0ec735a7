//! Item endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::db::{TodoItem, User};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, Caller, ValidId};
use crate::http::routes::{created, Created};
use crate::http::server::AppState;
use crate::models::ItemFlag;
use crate::service::{ItemInput, ItemService};

/// Create item request. Any `flag` sent along is ignored.
#[derive(Deserialize)]
pub struct CreateItemRequest {
    pub title: String,
    pub text: String,
    #[serde(deserialize_with = "deserialize_deadline")]
    pub deadline: DateTime<Utc>,
}

/// Update item request, every field is replaced. No flag means Active.
#[derive(Deserialize)]
pub struct UpdateItemRequest {
    pub title: String,
    pub text: String,
    #[serde(deserialize_with = "deserialize_deadline")]
    pub deadline: DateTime<Utc>,
    pub flag: Option<String>,
}

/// RFC 3339, or an ISO-8601 date-time without offset taken as UTC
fn deserialize_deadline<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(deadline) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(deadline.with_timezone(&Utc));
    }

    raw.parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(|err| serde::de::Error::custom(format!("invalid deadline '{raw}': {err}")))
}

/// User as shown to API clients
#[derive(Debug, Serialize)]
pub struct TodoUserResponse {
    pub name: String,
}

impl From<&User> for TodoUserResponse {
    fn from(u: &User) -> Self {
        Self {
            name: u.username.clone(),
        }
    }
}

/// Item response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItemResponse {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub deadline: DateTime<Utc>,
    pub flag: ItemFlag,
    pub created_by: TodoUserResponse,
}

impl From<TodoItem> for TodoItemResponse {
    fn from(i: TodoItem) -> Self {
        Self {
            created_by: TodoUserResponse::from(&i.created_by),
            id: i.id,
            title: i.title,
            text: i.text,
            deadline: i.deadline,
            flag: i.flag,
        }
    }
}

/// GET /todoitems/{id} - get a single item
async fn get_item(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<TodoItemResponse>, ApiError> {
    let item = ItemService::new(&state.pool).get(id).await?;
    Ok(Json(TodoItemResponse::from(item)))
}

/// POST /todoitems/{listId} - create an item in a list
async fn create_item(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    ValidId(list_id): ValidId,
    body: Result<ApiJson<CreateItemRequest>, ApiError>,
) -> Result<Created<TodoItemResponse>, ApiError> {
    caller.require()?;
    let ApiJson(req) = body?;
    let input = ItemInput {
        title: req.title,
        text: req.text,
        deadline: req.deadline,
    };
    let item = ItemService::new(&state.pool)
        .create(caller.user(), list_id, input)
        .await?;

    let location = format!("/todoitems/{}", item.id);
    Ok(created(location, TodoItemResponse::from(item)))
}

/// PUT /todoitems/{id} - replace an item's fields
async fn update_item(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    ValidId(id): ValidId,
    body: Result<ApiJson<UpdateItemRequest>, ApiError>,
) -> Result<StatusCode, ApiError> {
    caller.require()?;
    let ApiJson(req) = body?;
    let input = ItemInput {
        title: req.title,
        text: req.text,
        deadline: req.deadline,
    };
    ItemService::new(&state.pool)
        .update(caller.user(), id, input, req.flag.as_deref())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Item routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/todoitems/{id}",
        get(get_item).post(create_item).put(update_item),
    )
}
