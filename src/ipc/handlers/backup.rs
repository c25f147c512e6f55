use crate::backup;
use crate::ipc::error::{err, ok};
use crate::ipc::handlers::core::open_store_into;
use crate::ipc::helpers::required_str;
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::PathBuf;

fn handle_backup_export(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store_path) = state.store_path.clone() else {
        return err(&req.id, "no_store", "open a store first", None);
    };
    let out_path = match required_str(req, "outPath") {
        Ok(v) => PathBuf::from(v),
        Err(resp) => return resp,
    };
    match backup::export_store_bundle(&store_path, &out_path) {
        Ok(summary) => ok(
            &req.id,
            json!({
                "bundleFormat": summary.bundle_format,
                "bundleId": summary.bundle_id,
                "entryCount": summary.entry_count,
                "sha256": summary.sha256,
            }),
        ),
        Err(e) => err(&req.id, "backup_failed", format!("{e:#}"), None),
    }
}

fn handle_backup_import(state: &mut AppState, req: &Request) -> serde_json::Value {
    let in_path = match required_str(req, "inPath") {
        Ok(v) => PathBuf::from(v),
        Err(resp) => return resp,
    };
    let store_path = state
        .store_path
        .clone()
        .unwrap_or_else(|| state.config.store_path.clone());

    // Release the live handle before the file underneath it is replaced.
    state.db = None;
    let imported = backup::import_store_bundle(&in_path, &store_path);
    let reopened = open_store_into(state, &store_path);

    match (imported, reopened) {
        (Ok(summary), Ok(())) => ok(
            &req.id,
            json!({
                "bundleFormatDetected": summary.bundle_format_detected,
                "storePath": store_path.to_string_lossy(),
            }),
        ),
        (Err(e), _) => err(&req.id, "backup_failed", format!("{e:#}"), None),
        (_, Err(e)) => err(&req.id, "storage_error", format!("{e:#}"), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "backup.export" => Some(handle_backup_export(state, req)),
        "backup.import" => Some(handle_backup_import(state, req)),
        _ => None,
    }
}
