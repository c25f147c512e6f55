use crate::ipc::error::err;
use crate::ipc::types::Request;
use rusqlite::Connection;
use serde::de::DeserializeOwned;

pub fn param_str<'a>(req: &'a Request, key: &str) -> Option<&'a str> {
    req.params.get(key).and_then(|v| v.as_str())
}

pub fn param_i64(req: &Request, key: &str) -> Option<i64> {
    req.params.get(key).and_then(|v| v.as_i64())
}

pub fn required_str<'a>(req: &'a Request, key: &str) -> Result<&'a str, serde_json::Value> {
    param_str(req, key).ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

pub fn parse_params<T: DeserializeOwned>(req: &Request) -> Result<T, serde_json::Value> {
    let params = if req.params.is_null() {
        serde_json::json!({})
    } else {
        req.params.clone()
    };
    serde_json::from_value(params).map_err(|e| err(&req.id, "bad_params", e.to_string(), None))
}

/// Takes the field rather than the whole state so callers can keep mutating
/// the wizard and visualizer while the connection is borrowed.
pub fn store<'a>(
    db: &'a Option<Connection>,
    req: &Request,
) -> Result<&'a Connection, serde_json::Value> {
    db.as_ref()
        .ok_or_else(|| err(&req.id, "no_store", "open a store first", None))
}
