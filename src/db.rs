use rusqlite::Connection;
use std::path::Path;

pub const DEFAULT_STORE_FILE: &str = "marks.db";

/// An additive schema change. Steps are only ever appended; a column is never
/// dropped or renamed once shipped.
pub struct ColumnStep {
    pub table: &'static str,
    pub column: &'static str,
    pub decl: &'static str,
}

pub const SCHEMA_STEPS: &[ColumnStep] = &[
    ColumnStep {
        table: "marks",
        column: "observation",
        decl: "TEXT",
    },
    ColumnStep {
        table: "program_info",
        column: "admission_year",
        decl: "INTEGER",
    },
];

pub fn open_store(path: &Path) -> anyhow::Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(path)?;
    ensure_schema(&conn)?;
    tracing::info!(path = %path.display(), "store opened");
    Ok(conn)
}

pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS program_info(
            id INTEGER PRIMARY KEY,
            num_students INTEGER,
            num_modules INTEGER
        )",
        [],
    )?;

    // student_id is not unique; the ledger keeps one row per submission.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS marks(
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
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_marks_student ON marks(student_id)",
        [],
    )?;

    for step in SCHEMA_STEPS {
        if table_has_column(conn, step.table, step.column)? {
            continue;
        }
        conn.execute(
            &format!(
                "ALTER TABLE {} ADD COLUMN {} {}",
                step.table, step.column, step.decl
            ),
            [],
        )?;
        tracing::info!(table = step.table, column = step.column, "added column");
    }

    Ok(())
}

pub fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let sql = format!("PRAGMA table_info({})", table);
    let mut stmt = conn.prepare(&sql)?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

pub fn table_has_column(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    Ok(table_columns(conn, table)?.iter().any(|c| c == column))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_schema_twice_is_stable() {
        let conn = Connection::open_in_memory().expect("open");
        ensure_schema(&conn).expect("first");
        let marks_before = table_columns(&conn, "marks").expect("cols");
        let program_before = table_columns(&conn, "program_info").expect("cols");
        ensure_schema(&conn).expect("second");
        assert_eq!(table_columns(&conn, "marks").expect("cols"), marks_before);
        assert_eq!(
            table_columns(&conn, "program_info").expect("cols"),
            program_before
        );
        assert!(marks_before.iter().any(|c| c == "observation"));
        assert!(program_before.iter().any(|c| c == "admission_year"));
    }

    #[test]
    fn steps_apply_to_pre_existing_tables() {
        let conn = Connection::open_in_memory().expect("open");
        conn.execute(
            "CREATE TABLE marks(id INTEGER PRIMARY KEY, module_code TEXT, module_name TEXT,
             coursework_1_mark INTEGER, coursework_2_mark INTEGER, coursework_3_mark INTEGER,
             student_id TEXT, student_name TEXT, gender TEXT, date_of_entry TEXT)",
            [],
        )
        .expect("legacy marks");
        conn.execute(
            "INSERT INTO marks(module_code, student_id) VALUES('CS101', 's1')",
            [],
        )
        .expect("seed");
        assert!(!table_has_column(&conn, "marks", "observation").expect("check"));

        ensure_schema(&conn).expect("migrate");
        assert!(table_has_column(&conn, "marks", "observation").expect("check"));
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM marks", [], |r| r.get(0))
            .expect("count");
        assert_eq!(n, 1);
    }
}
