//! Route handlers organized by resource

pub mod health;
pub mod items;
pub mod lists;

use axum::http::{header, HeaderName, StatusCode};
use axum::Json;

/// 201 with a Location header pointing at the new resource
pub type Created<T> = (StatusCode, [(HeaderName, String); 1], Json<T>);

pub(crate) fn created<T>(location: String, body: T) -> Created<T> {
    (StatusCode::CREATED, [(header::LOCATION, location)], Json(body))
}
