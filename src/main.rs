mod backup;
mod calc;
mod config;
mod db;
mod error;
mod ipc;
mod ledger;
mod model;
mod validate;
mod viz;
mod wizard;

use std::io::{self, BufRead, Write};

fn main() {
    config::init_logging();
    let cfg = config::Config::from_env();
    let store_path = cfg.store_path.clone();
    let mut state = ipc::AppState::new(cfg);

    // A store that fails to open is reported, not fatal; the shell can retry
    // with store.open.
    if let Err(e) = ipc::open_default_store(&mut state, &store_path) {
        tracing::error!(path = %store_path.display(), "store open failed: {e:#}");
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for chunk in stdin.lock().split(b'\n') {
        let Ok(bytes) = chunk else {
            break;
        };
        let line = match String::from_utf8(bytes) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("dropping non-utf8 request: {e}");
                write_bad_json(&mut stdout, e.to_string());
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("dropping malformed request: {e}");
                write_bad_json(&mut stdout, e.to_string());
                continue;
            }
        };

        tracing::debug!(id = %req.id, method = %req.method, "request");
        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
}

fn write_bad_json(out: &mut impl Write, message: String) {
    let resp = serde_json::json!({
        "ok": false,
        "error": { "code": "bad_json", "message": message },
    });
    let _ = writeln!(out, "{}", resp);
    let _ = out.flush();
}
