use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::param_str;
use crate::ipc::types::{AppState, Request};
use crate::viz::Visualizer;
use serde_json::json;
use std::path::{Path, PathBuf};

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "storePath": state.store_path.as_ref().map(|p| p.to_string_lossy().to_string()),
            "stage": state.wizard.stage(),
        }),
    )
}

/// Replaces the open store. The old connection is dropped before the new file
/// is opened so only one handle is ever live.
pub fn open_store_into(state: &mut AppState, path: &Path) -> anyhow::Result<()> {
    state.db = None;
    state.store_path = None;
    state.viz = Visualizer::new();
    let conn = db::open_store(path)?;
    state.db = Some(conn);
    state.store_path = Some(path.to_path_buf());
    Ok(())
}

fn handle_store_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let path = param_str(req, "path")
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| state.config.store_path.clone());

    if let Err(e) = open_store_into(state, &path) {
        tracing::error!(path = %path.display(), "store open failed: {e:#}");
        return err(&req.id, "storage_error", format!("{e:#}"), None);
    }
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_store", "open a store first", None);
    };
    let marks = db::table_columns(conn, "marks");
    let program = db::table_columns(conn, "program_info");
    match (marks, program) {
        (Ok(marks), Ok(program)) => ok(
            &req.id,
            json!({
                "storePath": path.to_string_lossy(),
                "columns": { "marks": marks, "programInfo": program },
            }),
        ),
        (Err(e), _) | (_, Err(e)) => err(&req.id, "storage_error", e.to_string(), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "store.open" => Some(handle_store_open(state, req)),
        _ => None,
    }
}
