use crate::ipc::error::{err, ledger_err, ok};
use crate::ipc::helpers::{param_str, store};
use crate::ipc::types::{AppState, Request};
use crate::viz::ChartKind;
use serde_json::json;

fn handle_viz_render(state: &mut AppState, req: &Request) -> serde_json::Value {
    let kind = match param_str(req, "kind") {
        None => ChartKind::Bar,
        Some(raw) => match ChartKind::parse(raw) {
            Some(k) => k,
            None => {
                return err(
                    &req.id,
                    "bad_params",
                    "kind must be one of: bar, line, scatter, pie",
                    Some(json!({ "kind": raw })),
                )
            }
        },
    };
    let conn = match store(&state.db, req) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let code = param_str(req, "moduleCode").unwrap_or("");
    match state.viz.render(conn, code, kind) {
        Ok(chart) => ok(&req.id, json!({ "chart": chart })),
        Err(e) => ledger_err(&req.id, &e),
    }
}

fn handle_viz_cycle(state: &mut AppState, req: &Request) -> serde_json::Value {
    match state.viz.cycle() {
        Ok(chart) => ok(&req.id, json!({ "chart": chart })),
        Err(e) => ledger_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "viz.render" => Some(handle_viz_render(state, req)),
        "viz.cycle" => Some(handle_viz_cycle(state, req)),
        _ => None,
    }
}
