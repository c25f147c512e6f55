use crate::ipc::error::{err, ledger_err, ok};
use crate::ipc::helpers::required_str;
use crate::ipc::types::{AppState, Request};
use crate::wizard::{Stage, WizardContext};
use serde_json::json;

pub fn state_json(w: &WizardContext) -> serde_json::Value {
    let mut v = json!(w);
    v["canAdvance"] = json!(w.can_advance());
    v
}

fn handle_wizard_state(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, state_json(&state.wizard))
}

fn handle_wizard_enter(state: &mut AppState, req: &Request) -> serde_json::Value {
    let raw = match required_str(req, "stage") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(stage) = Stage::parse(raw) else {
        return err(
            &req.id,
            "bad_params",
            "stage must be one of: home, inputMarks, viewMarks, updateMarks, visualize",
            Some(json!({ "stage": raw })),
        );
    };
    state.wizard.enter(stage);
    tracing::debug!(?stage, "stage entered");
    ok(&req.id, state_json(&state.wizard))
}

fn handle_wizard_next(state: &mut AppState, req: &Request) -> serde_json::Value {
    match state.wizard.next() {
        Ok(stage) => {
            tracing::debug!(?stage, "advanced");
            ok(&req.id, state_json(&state.wizard))
        }
        Err(e) => ledger_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "wizard.state" => Some(handle_wizard_state(state, req)),
        "wizard.enter" => Some(handle_wizard_enter(state, req)),
        "wizard.next" => Some(handle_wizard_next(state, req)),
        _ => None,
    }
}
