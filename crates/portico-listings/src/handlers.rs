//! Listings CRUD handlers.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Form, Query, State, rejection::FormRejection},
};
use serde::Serialize;
use serde_json::Value;
use sqlx::{FromRow, SqlitePool};

use portico_core::page::{DEFAULT_PAGE_NUM, DEFAULT_PAGE_SIZE};
use portico_core::{Page, envelope, now_micros};

use crate::error::ServiceError;

const LISTING_TYPES: [&str; 2] = ["rent", "sale"];

#[derive(Debug, Serialize, FromRow)]
pub struct ListingRow {
    pub id: i64,
    pub user_id: i64,
    pub listing_type: String,
    pub price: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// GET /listings/ping
pub async fn ping() -> &'static str {
    "pong!"
}

/// GET /listings
///
/// Paginated, newest first; optionally filtered to one user's rows.
pub async fn list_listings(
    State(pool): State<SqlitePool>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ServiceError> {
    let mut errors = Vec::new();
    let page_num = int_param(&params, "page_num", DEFAULT_PAGE_NUM, &mut errors);
    let page_size = int_param(&params, "page_size", DEFAULT_PAGE_SIZE, &mut errors);
    let user_id = match params.get("user_id") {
        None => None,
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(v) => Some(v),
            Err(_) => {
                errors.push("invalid user_id".to_string());
                None
            }
        },
    };
    if !errors.is_empty() {
        return Err(ServiceError::Invalid(errors));
    }

    let page = Page::new(page_num, page_size);
    let rows: Vec<ListingRow> = match user_id {
        Some(user_id) => {
            sqlx::query_as(
                "SELECT id, user_id, listing_type, price, created_at, updated_at \
                 FROM listings WHERE user_id = ? \
                 ORDER BY created_at DESC LIMIT ? OFFSET ?",
            )
            .bind(user_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&pool)
            .await?
        }
        None => {
            sqlx::query_as(
                "SELECT id, user_id, listing_type, price, created_at, updated_at \
                 FROM listings \
                 ORDER BY created_at DESC LIMIT ? OFFSET ?",
            )
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&pool)
            .await?
        }
    };

    Ok(Json(envelope::ok_with("listings", to_json(rows)?)))
}

/// POST /listings
///
/// Form-encoded create: `user_id`, `listing_type`, `price`, all
/// required. Every failing field is reported, not just the first.
pub async fn create_listing(
    State(pool): State<SqlitePool>,
    payload: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Json<Value>, ServiceError> {
    let Form(fields) = payload.map_err(|e| ServiceError::Invalid(vec![e.body_text()]))?;

    let mut errors = Vec::new();
    let user_id = validate_user_id(fields.get("user_id"), &mut errors);
    let listing_type = validate_listing_type(fields.get("listing_type"), &mut errors);
    let price = validate_price(fields.get("price"), &mut errors);

    let (user_id, listing_type, price) = match (user_id, listing_type, price) {
        (Some(user_id), Some(listing_type), Some(price)) if errors.is_empty() => {
            (user_id, listing_type, price)
        }
        _ => return Err(ServiceError::Invalid(errors)),
    };

    let time_now = now_micros();
    let result = sqlx::query(
        "INSERT INTO listings (user_id, listing_type, price, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(&listing_type)
    .bind(price)
    .bind(time_now)
    .bind(time_now)
    .execute(&pool)
    .await?;

    let id = result.last_insert_rowid();
    if id <= 0 {
        return Err(ServiceError::Internal(
            "Error while adding listing to db".to_string(),
        ));
    }

    let listing = ListingRow {
        id,
        user_id,
        listing_type,
        price,
        created_at: time_now,
        updated_at: time_now,
    };
    Ok(Json(envelope::ok_with("listing", to_json(listing)?)))
}

fn validate_user_id(raw: Option<&String>, errors: &mut Vec<String>) -> Option<i64> {
    match raw.map(|r| r.trim().parse::<i64>()) {
        Some(Ok(user_id)) => Some(user_id),
        _ => {
            errors.push("invalid user_id".to_string());
            None
        }
    }
}

fn validate_listing_type(raw: Option<&String>, errors: &mut Vec<String>) -> Option<String> {
    match raw {
        Some(value) if LISTING_TYPES.contains(&value.as_str()) => Some(value.clone()),
        _ => {
            errors.push("invalid listing_type. Supported values: 'rent', 'sale'".to_string());
            None
        }
    }
}

fn validate_price(raw: Option<&String>, errors: &mut Vec<String>) -> Option<i64> {
    let price = match raw.map(|r| r.trim().parse::<i64>()) {
        Some(Ok(price)) => price,
        _ => {
            errors.push("invalid price. Must be an integer".to_string());
            return None;
        }
    };
    if price < 1 {
        errors.push("price must be greater than 0".to_string());
        return None;
    }
    Some(price)
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
