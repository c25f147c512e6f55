use rusqlite::Connection;
use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar(store: &Path) -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_markregd");
    let mut child = Command::new(exe)
        .env("MARKREGD_DB", store)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn markregd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn columns(conn: &Connection, table: &str) -> Vec<String> {
    let sql = format!("PRAGMA table_info({})", table);
    let mut stmt = conn.prepare(&sql).expect("prepare pragma table_info");
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .expect("query pragma table_info")
        .collect::<Result<Vec<_>, _>>()
        .expect("column names");
    names
}

fn seed_pre_observation_store(path: &Path) {
    let conn = Connection::open(path).expect("create legacy store");
    conn.execute_batch(
        "CREATE TABLE program_info(id INTEGER PRIMARY KEY, num_students INTEGER, num_modules INTEGER);
         CREATE TABLE marks(
            id INTEGER PRIMARY KEY,
            module_code TEXT,
            module_name TEXT,
            coursework_1_mark INTEGER,
            coursework_2_mark INTEGER,
            coursework_3_mark INTEGER,
            student_id TEXT,
            student_name TEXT,
            gender TEXT,
            date_of_entry TEXT
         );
         INSERT INTO program_info(num_students, num_modules) VALUES(40, 5);
         INSERT INTO marks(module_code, module_name, coursework_1_mark, coursework_2_mark,
            coursework_3_mark, student_id, student_name, gender, date_of_entry)
         VALUES('CS101', 'Intro', 20, 20, 20, 'old1', 'Legacy Student', 'Male', '01/09/2023');",
    )
    .expect("seed legacy store");
}

#[test]
fn legacy_store_gains_optional_columns_and_stays_readable() {
    let workspace = temp_dir("markregd-migrate");
    let store = workspace.join("marks.db");
    seed_pre_observation_store(&store);

    let (mut child, mut stdin, mut reader) = spawn_sidecar(&store);
    let opened = request_ok(&mut stdin, &mut reader, "1", "store.open", json!({}));
    let marks_cols = opened
        .get("columns")
        .and_then(|c| c.get("marks"))
        .and_then(|v| v.as_array())
        .expect("marks columns");
    assert!(marks_cols.iter().any(|c| c.as_str() == Some("observation")));

    let found = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "marks.findByStudent",
        json!({ "studentId": "old1" }),
    );
    let record = found.get("record").cloned().expect("record");
    assert_eq!(record.get("observation"), Some(&serde_json::Value::Null));
    assert_eq!(record.get("coursework3Mark").and_then(|v| v.as_i64()), Some(20));

    let latest = request_ok(&mut stdin, &mut reader, "3", "program.latest", json!({}));
    assert_eq!(
        latest
            .get("program")
            .and_then(|p| p.get("numStudents"))
            .and_then(|v| v.as_i64()),
        Some(40)
    );
    drop(stdin);
    let _ = child.wait();

    let conn = Connection::open(&store).expect("open migrated store");
    assert!(columns(&conn, "marks").iter().any(|c| c == "observation"));
    assert!(columns(&conn, "program_info").iter().any(|c| c == "admission_year"));

    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn reopening_twice_leaves_schema_identical() {
    let workspace = temp_dir("markregd-idempotent");
    let store = workspace.join("nested").join("marks.db");

    let (mut child, mut stdin, mut reader) = spawn_sidecar(&store);
    let _ = request_ok(&mut stdin, &mut reader, "1", "store.open", json!({}));
    let conn = Connection::open(&store).expect("open store");
    let marks_first = columns(&conn, "marks");
    let program_first = columns(&conn, "program_info");
    drop(conn);

    let again = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "store.open",
        json!({ "path": store.to_string_lossy() }),
    );
    let expected = store.to_string_lossy().to_string();
    assert_eq!(
        again.get("storePath").and_then(|v| v.as_str()),
        Some(expected.as_str())
    );
    drop(stdin);
    let _ = child.wait();

    let conn = Connection::open(&store).expect("reopen store");
    assert_eq!(columns(&conn, "marks"), marks_first);
    assert_eq!(columns(&conn, "program_info"), program_first);
    assert_eq!(
        marks_first.iter().filter(|c| c.as_str() == "observation").count(),
        1
    );

    let _ = std::fs::remove_dir_all(workspace);
}
