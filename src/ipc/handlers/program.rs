use crate::ipc::error::{ledger_err, ok};
use crate::ipc::helpers::{param_i64, store};
use crate::ipc::types::{AppState, Request};
use crate::ledger;
use crate::wizard::Outcome;
use serde_json::json;

fn handle_program_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match store(&state.db, req) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let result = ledger::create_program_info(
        conn,
        param_i64(req, "numStudents"),
        param_i64(req, "numModules"),
        param_i64(req, "admissionYear"),
    );
    match result {
        Ok(id) => {
            state.wizard.record(Outcome::ProgramSaved);
            ok(
                &req.id,
                json!({
                    "id": id,
                    "message": "Records saved successfully!",
                    "stage": state.wizard.stage(),
                }),
            )
        }
        Err(e) => ledger_err(&req.id, &e),
    }
}

fn handle_program_latest(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match store(&state.db, req) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match ledger::latest_program_info(conn) {
        Ok(info) => ok(&req.id, json!({ "program": info })),
        Err(e) => ledger_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "program.create" => Some(handle_program_create(state, req)),
        "program.latest" => Some(handle_program_latest(state, req)),
        _ => None,
    }
}
