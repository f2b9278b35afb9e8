//! Parameter validation for the public surface.
//!
//! Pure helpers that turn raw request strings into typed values while
//! accumulating human-readable messages. A request is validated as a
//! whole: every failing field contributes its own message, and the
//! caller only forwards when the error list stays empty.

use std::collections::HashMap;

use serde_json::Value;

use portico_core::page::{DEFAULT_PAGE_NUM, DEFAULT_PAGE_SIZE};

/// Closed set of accepted listing types.
pub const LISTING_TYPES: [&str; 2] = ["rent", "sale"];

/// Parses a required base-10 integer; absence counts as invalid.
pub fn require_int(raw: Option<&str>, name: &str, errors: &mut Vec<String>) -> Option<i64> {
    match raw.map(str::trim).map(str::parse::<i64>) {
        Some(Ok(value)) => Some(value),
        _ => {
            errors.push(format!("invalid {name}"));
            None
        }
    }
}

/// Parses an optional integer; absence is fine, garbage is not.
pub fn optional_int(raw: Option<&str>, name: &str, errors: &mut Vec<String>) -> Option<i64> {
    raw?;
    require_int(raw, name, errors)
}

/// Parses an integer falling back to `default` when the parameter is
/// absent. An empty or non-numeric value is an error, not the default.
pub fn int_or_default(
    raw: Option<&str>,
    name: &str,
    default: i64,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match raw {
        None => Some(default),
        Some(_) => require_int(raw, name, errors),
    }
}

/// Validates `listing_type` against the closed set.
pub fn listing_type(raw: Option<&str>, errors: &mut Vec<String>) -> Option<String> {
    match raw {
        Some(value) if LISTING_TYPES.contains(&value) => Some(value.to_string()),
        _ => {
            errors.push("invalid listing_type. Supported values: 'rent', 'sale'".to_string());
            None
        }
    }
}

/// Validates `price`: an integer, and strictly positive. The two
/// failure modes carry distinct messages.
pub fn price(raw: Option<&str>, errors: &mut Vec<String>) -> Option<i64> {
    let value = match raw.map(str::trim).map(str::parse::<i64>) {
        Some(Ok(value)) => value,
        _ => {
            errors.push("invalid price. Must be an integer".to_string());
            return None;
        }
    };
    if value < 1 {
        errors.push("price must be greater than 0".to_string());
        return None;
    }
    Some(value)
}

/// Validates a user `name` taken from a JSON body.
pub fn user_name(raw: Option<&Value>, errors: &mut Vec<String>) -> Option<String> {
    match raw.and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => Some(name.to_string()),
        _ => {
            errors.push("invalid name. Must be a non-empty string".to_string());
            None
        }
    }
}

/// Validates the listings search query and builds the forwarded pairs:
/// `page_num` (default 1), `page_size` (default 10), optional
/// `user_id`. Absent `user_id` is simply left out of the result.
pub fn listings_query(
    params: &HashMap<String, String>,
) -> Result<Vec<(&'static str, String)>, Vec<String>> {
    let mut errors = Vec::new();
    let mut pairs = Vec::new();

    if let Some(page_num) = int_or_default(
        params.get("page_num").map(String::as_str),
        "page_num",
        DEFAULT_PAGE_NUM,
        &mut errors,
    ) {
        pairs.push(("page_num", page_num.to_string()));
    }
    if let Some(page_size) = int_or_default(
        params.get("page_size").map(String::as_str),
        "page_size",
        DEFAULT_PAGE_SIZE,
        &mut errors,
    ) {
        pairs.push(("page_size", page_size.to_string()));
    }
    if let Some(user_id) = optional_int(
        params.get("user_id").map(String::as_str),
        "user_id",
        &mut errors,
    ) {
        pairs.push(("user_id", user_id.to_string()));
    }

    if errors.is_empty() { Ok(pairs) } else { Err(errors) }
}

/// Validates a listing creation body and builds the form pairs the
/// listings backend expects: `user_id`, `listing_type`, `price`, all
/// required.
pub fn listing_form(body: &Value) -> Result<Vec<(&'static str, String)>, Vec<String>> {
    let mut errors = Vec::new();
    let mut pairs = Vec::new();

    let user_id_raw = json_field(body, "user_id");
    if let Some(user_id) = require_int(user_id_raw.as_deref(), "user_id", &mut errors) {
        pairs.push(("user_id", user_id.to_string()));
    }
    let listing_type_raw = json_field(body, "listing_type");
    if let Some(kind) = listing_type(listing_type_raw.as_deref(), &mut errors) {
        pairs.push(("listing_type", kind));
    }
    let price_raw = json_field(body, "price");
    if let Some(price) = price(price_raw.as_deref(), &mut errors) {
        pairs.push(("price", price.to_string()));
    }

    if errors.is_empty() { Ok(pairs) } else { Err(errors) }
}

/// Validates a user creation body and builds the form pairs the users
/// backend expects: a single required `name`.
pub fn user_form(body: &Value) -> Result<Vec<(&'static str, String)>, Vec<String>> {
    let mut errors = Vec::new();
    let mut pairs = Vec::new();

    if let Some(name) = user_name(body.get("name"), &mut errors) {
        pairs.push(("name", name));
    }

    if errors.is_empty() { Ok(pairs) } else { Err(errors) }
}

// JSON bodies carry numbers as numbers; the validators work on the raw
// string representation, so both `7` and `"7"` are accepted.
fn json_field(body: &Value, name: &str) -> Option<String> {
    match body.get(name)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
