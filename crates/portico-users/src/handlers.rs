//! Users CRUD handlers.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Form, Path, Query, State, rejection::FormRejection},
};
use serde::Serialize;
use serde_json::Value;
use sqlx::{FromRow, SqlitePool};

use portico_core::page::{DEFAULT_PAGE_NUM, DEFAULT_PAGE_SIZE};
use portico_core::{Page, envelope, now_micros};

use crate::error::ServiceError;

#[derive(Debug, Serialize, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// GET /users/ping
pub async fn ping() -> &'static str {
    "pong!"
}

/// GET /users
///
/// Paginated, newest first.
pub async fn list_users(
    State(pool): State<SqlitePool>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ServiceError> {
    let mut errors = Vec::new();
    let page_num = int_param(&params, "page_num", DEFAULT_PAGE_NUM, &mut errors);
    let page_size = int_param(&params, "page_size", DEFAULT_PAGE_SIZE, &mut errors);
    if !errors.is_empty() {
        return Err(ServiceError::Invalid(errors));
    }

    let page = Page::new(page_num, page_size);
    let rows: Vec<UserRow> = sqlx::query_as(
        "SELECT id, name, created_at, updated_at FROM users \
         ORDER BY created_at DESC LIMIT ? OFFSET ?",
    )
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(&pool)
    .await?;

    Ok(Json(envelope::ok_with("users", to_json(rows)?)))
}

/// POST /users
///
/// Form-encoded create with a single required `name` field.
pub async fn create_user(
    State(pool): State<SqlitePool>,
    payload: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Json<Value>, ServiceError> {
    let Form(fields) = payload.map_err(|e| ServiceError::Invalid(vec![e.body_text()]))?;

    let name = match fields.get("name").map(|n| n.trim()) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            return Err(ServiceError::Invalid(vec![
                "invalid name. Must be a non-empty string".to_string(),
            ]));
        }
    };

    let time_now = now_micros();
    let result = sqlx::query(
        "INSERT INTO users (name, created_at, updated_at) VALUES (?, ?, ?)",
    )
    .bind(&name)
    .bind(time_now)
    .bind(time_now)
    .execute(&pool)
    .await?;

    let id = result.last_insert_rowid();
    if id <= 0 {
        return Err(ServiceError::Internal(
            "Error while adding user to db".to_string(),
        ));
    }

    let user = UserRow {
        id,
        name,
        created_at: time_now,
        updated_at: time_now,
    };
    Ok(Json(envelope::ok_with("user", to_json(user)?)))
}

/// GET /users/{id}
pub async fn get_user(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ServiceError> {
    let id: i64 = id
        .parse()
        .map_err(|_| ServiceError::Invalid(vec!["invalid user_id".to_string()]))?;

    let row: Option<UserRow> = sqlx::query_as(
        "SELECT id, name, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?;

    match row {
        Some(user) => Ok(Json(envelope::ok_with("users", to_json(vec![user])?))),
        None => Err(ServiceError::NotFound),
    }
}

fn int_param(
    params: &HashMap<String, String>,
    name: &str,
    default: i64,
    errors: &mut Vec<String>,
) -> i64 {
    match params.get(name) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            errors.push(format!("invalid {name}"));
            default
        }),
    }
}

fn to_json<T: Serialize>(value: T) -> Result<Value, ServiceError> {
    serde_json::to_value(value).map_err(|e| ServiceError::Internal(e.to_string()))
}
