use crate::ipc::error::{ledger_err, ok};
use crate::ipc::helpers::{param_str, parse_params, store};
use crate::ipc::types::{AppState, Request};
use crate::ledger;
use crate::model::{MarkForm, MarkRecord, MarkUpdate};
use crate::wizard::Outcome;
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordRow<'a> {
    #[serde(flatten)]
    record: &'a MarkRecord,
    total: i64,
}

fn rows(records: &[MarkRecord]) -> Vec<RecordRow<'_>> {
    records
        .iter()
        .map(|record| RecordRow {
            record,
            total: record.total(),
        })
        .collect()
}

fn handle_marks_submit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let form: MarkForm = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let conn = match store(&state.db, req) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match ledger::submit_mark(conn, &form) {
        Ok(id) => {
            state.wizard.record(Outcome::MarkSubmitted);
            ok(
                &req.id,
                json!({
                    "id": id,
                    "message": "Marks submitted successfully!",
                    "stage": state.wizard.stage(),
                    "canAdvance": state.wizard.can_advance(),
                }),
            )
        }
        Err(e) => ledger_err(&req.id, &e),
    }
}

fn handle_marks_find_by_module(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match store(&state.db, req) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let code = param_str(req, "moduleCode").unwrap_or("");
    match ledger::find_by_module(conn, code) {
        Ok(records) => {
            state.wizard.record(Outcome::ModuleViewed {
                rows: records.len(),
            });
            let message = if records.is_empty() {
                "No matching records found."
            } else {
                "Records found and displayed!"
            };
            ok(
                &req.id,
                json!({
                    "records": rows(&records),
                    "message": message,
                    "canAdvance": state.wizard.can_advance(),
                }),
            )
        }
        Err(e) => ledger_err(&req.id, &e),
    }
}

fn handle_marks_find_by_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match store(&state.db, req) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let student_id = param_str(req, "studentId").unwrap_or("");
    match ledger::find_by_student(conn, student_id) {
        Ok(record) => ok(&req.id, json!({ "record": record })),
        Err(e) => ledger_err(&req.id, &e),
    }
}

fn handle_marks_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let update: MarkUpdate = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let conn = match store(&state.db, req) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match ledger::update_mark(conn, &update) {
        Ok(n) => {
            state.wizard.record(Outcome::MarksUpdated);
            ok(
                &req.id,
                json!({
                    "updated": n,
                    "message": "Marks updated successfully!",
                    "canAdvance": state.wizard.can_advance(),
                }),
            )
        }
        Err(e) => ledger_err(&req.id, &e),
    }
}

fn handle_marks_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match store(&state.db, req) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let student_id = param_str(req, "studentId").unwrap_or("");
    match ledger::delete_mark(conn, student_id) {
        Ok(n) => {
            state.wizard.record(Outcome::RecordDeleted);
            ok(
                &req.id,
                json!({
                    "deleted": n,
                    "message": format!("Student ID {} deleted successfully!", student_id.trim()),
                    "canAdvance": state.wizard.can_advance(),
                }),
            )
        }
        Err(e) => ledger_err(&req.id, &e),
    }
}

fn handle_marks_aggregate(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match store(&state.db, req) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let code = param_str(req, "moduleCode").unwrap_or("");
    match ledger::aggregate_module(conn, code) {
        Ok(agg) => ok(&req.id, json!(agg)),
        Err(e) => ledger_err(&req.id, &e),
    }
}

fn handle_marks_count(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match store(&state.db, req) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match ledger::count_marks(conn) {
        Ok(n) => ok(&req.id, json!({ "count": n })),
        Err(e) => ledger_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "marks.submit" => Some(handle_marks_submit(state, req)),
        "marks.findByModule" => Some(handle_marks_find_by_module(state, req)),
        "marks.findByStudent" => Some(handle_marks_find_by_student(state, req)),
        "marks.update" => Some(handle_marks_update(state, req)),
        "marks.delete" => Some(handle_marks_delete(state, req)),
        "marks.aggregate" => Some(handle_marks_aggregate(state, req)),
        "marks.count" => Some(handle_marks_count(state, req)),
        _ => None,
    }
}
