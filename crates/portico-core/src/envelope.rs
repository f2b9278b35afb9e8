//! JSON response envelopes.
//!
//! Every portico response body is an object with a boolean `result`
//! field: `{"result": true, <key>: <payload>}` on success and
//! `{"result": false, "errors": [..]}` on failure. The gateway relays
//! backend envelopes verbatim; these constructors are for bodies the
//! services (or the gateway itself) synthesize.

use serde_json::{Map, Value};

/// Builds a success envelope carrying `value` under `key`.
pub fn ok_with(key: &str, value: Value) -> Value {
    let mut body = Map::new();
    body.insert("result".to_string(), Value::Bool(true));
    body.insert(key.to_string(), value);
    Value::Object(body)
}

/// Builds a failure envelope from a list of human-readable messages.
///
/// A failure envelope is never empty: an empty `errors` input still
/// produces `{"result": false, "errors": []}` rather than no body.
pub fn fail<I, S>(errors: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let errors: Vec<Value> = errors
        .into_iter()
        .map(|e| Value::String(e.into()))
        .collect();

    let mut body = Map::new();
    body.insert("result".to_string(), Value::Bool(false));
    body.insert("errors".to_string(), Value::Array(errors));
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_envelope_carries_payload_under_key() {
        let body = ok_with("users", json!([{"id": 1}]));
        assert_eq!(body["result"], json!(true));
        assert_eq!(body["users"], json!([{"id": 1}]));
    }

    #[test]
    fn fail_envelope_lists_errors_in_order() {
        let body = fail(vec!["invalid page_num", "invalid page_size"]);
        assert_eq!(body["result"], json!(false));
        assert_eq!(
            body["errors"],
            json!(["invalid page_num", "invalid page_size"])
        );
    }

    #[test]
    fn fail_envelope_is_never_bodyless() {
        let body = fail(Vec::<String>::new());
        assert_eq!(body["result"], json!(false));
        assert_eq!(body["errors"], json!([]));
    }
}
