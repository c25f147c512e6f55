use crate::error::LedgerError;
use serde_json::json;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

pub fn ledger_err(id: &str, e: &LedgerError) -> serde_json::Value {
    let mut details = json!({ "severity": e.severity() });
    if let LedgerError::Validation { missing } = e {
        details["missing"] = json!(missing);
    }
    match e.severity() {
        "warning" => tracing::warn!(code = e.code(), "{}", e),
        _ => tracing::error!(code = e.code(), "{}", e),
    }
    err(id, e.code(), e.to_string(), Some(details))
}
