//! Mark ledger operations. Each call runs one parameterized statement on the
//! caller's connection and reports a typed [`LedgerError`] on failure.

use crate::calc::{self, ModuleAggregate};
use crate::error::{LedgerError, Result};
use crate::model::{Gender, MarkForm, MarkRecord, MarkUpdate, ProgramInfo};
use crate::validate::{mark_form_fields, mark_update_fields, validate_presence, FieldValue};
use rusqlite::{Connection, OptionalExtension, Row};

const RECORD_COLUMNS: &str = "student_id, student_name, module_code, module_name, date_of_entry,
     coursework_1_mark, coursework_2_mark, coursework_3_mark, gender, observation";

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<MarkRecord> {
    Ok(MarkRecord {
        student_id: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
        student_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        module_code: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        module_name: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        date_of_entry: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        coursework_1_mark: row.get::<_, Option<i64>>(5)?.unwrap_or(0),
        coursework_2_mark: row.get::<_, Option<i64>>(6)?.unwrap_or(0),
        coursework_3_mark: row.get::<_, Option<i64>>(7)?.unwrap_or(0),
        gender: row
            .get::<_, Option<String>>(8)?
            .as_deref()
            .and_then(Gender::parse),
        observation: row.get(9)?,
    })
}

fn required_key<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    let v = value.trim();
    validate_presence(&[(name, FieldValue::Text(Some(v)))])?;
    Ok(v)
}

pub fn create_program_info(
    conn: &Connection,
    num_students: Option<i64>,
    num_modules: Option<i64>,
    admission_year: Option<i64>,
) -> Result<i64> {
    validate_presence(&[
        ("numStudents", FieldValue::Number(num_students)),
        ("numModules", FieldValue::Number(num_modules)),
    ])?;
    conn.execute(
        "INSERT INTO program_info(num_students, num_modules, admission_year) VALUES(?, ?, ?)",
        (num_students, num_modules, admission_year),
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, ?num_students, ?num_modules, "program info saved");
    Ok(id)
}

pub fn latest_program_info(conn: &Connection) -> Result<Option<ProgramInfo>> {
    let info = conn
        .query_row(
            "SELECT id, num_students, num_modules, admission_year
             FROM program_info ORDER BY id DESC LIMIT 1",
            [],
            |r| {
                Ok(ProgramInfo {
                    id: r.get(0)?,
                    num_students: r.get(1)?,
                    num_modules: r.get(2)?,
                    admission_year: r.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(info)
}

/// Inserts one ledger row. A student id that already exists gets another row.
pub fn submit_mark(conn: &Connection, form: &MarkForm) -> Result<i64> {
    validate_presence(&mark_form_fields(form))?;
    let gender = form
        .gender
        .as_deref()
        .and_then(Gender::parse)
        .ok_or_else(|| LedgerError::Validation {
            missing: vec!["gender".to_string()],
        })?;

    let text = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or("").to_string();
    let observation = form
        .observation
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    conn.execute(
        "INSERT INTO marks(
            module_code, module_name, coursework_1_mark, coursework_2_mark,
            coursework_3_mark, student_id, student_name, gender, date_of_entry, observation
         ) VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        rusqlite::params![
            text(&form.module_code),
            text(&form.module_name),
            form.coursework_1_mark,
            form.coursework_2_mark,
            form.coursework_3_mark,
            text(&form.student_id),
            text(&form.student_name),
            gender,
            text(&form.date_of_entry),
            observation,
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, student_id = %text(&form.student_id), "marks submitted");
    Ok(id)
}

pub fn find_by_module(conn: &Connection, module_code: &str) -> Result<Vec<MarkRecord>> {
    let code = required_key("moduleCode", module_code)?;
    let sql = format!(
        "SELECT {} FROM marks WHERE LOWER(module_code) = LOWER(?) ORDER BY id",
        RECORD_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let records = stmt
        .query_map([code], record_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}

/// First row for the id in insertion order; duplicates beyond it are ignored.
pub fn find_by_student(conn: &Connection, student_id: &str) -> Result<Option<MarkRecord>> {
    let id = required_key("studentId", student_id)?;
    let sql = format!(
        "SELECT {} FROM marks WHERE student_id = ? ORDER BY id LIMIT 1",
        RECORD_COLUMNS
    );
    let record = conn.query_row(&sql, [id], record_from_row).optional()?;
    Ok(record)
}

/// Rewrites module code, date and the three marks on every row for the student.
pub fn update_mark(conn: &Connection, update: &MarkUpdate) -> Result<usize> {
    validate_presence(&mark_update_fields(update))?;
    let student_id = update.student_id.as_deref().unwrap_or("").trim();
    let changed = conn.execute(
        "UPDATE marks
         SET module_code = ?, date_of_entry = ?,
             coursework_1_mark = ?, coursework_2_mark = ?, coursework_3_mark = ?
         WHERE student_id = ?",
        rusqlite::params![
            update.module_code.as_deref().map(str::trim),
            update.date_of_entry.as_deref().map(str::trim),
            update.coursework_1_mark,
            update.coursework_2_mark,
            update.coursework_3_mark,
            student_id,
        ],
    )?;
    if changed == 0 {
        tracing::warn!(student_id, "update target not found");
        return Err(LedgerError::NotFound(
            "Student ID not found in the database.".to_string(),
        ));
    }
    tracing::info!(student_id, rows = changed, "marks updated");
    Ok(changed)
}

pub fn delete_mark(conn: &Connection, student_id: &str) -> Result<usize> {
    let id = required_key("studentId", student_id)?;
    let removed = conn.execute("DELETE FROM marks WHERE student_id = ?", [id])?;
    if removed == 0 {
        tracing::warn!(student_id = id, "delete target not found");
        return Err(LedgerError::NotFound(
            "Student ID not found in the database.".to_string(),
        ));
    }
    tracing::info!(student_id = id, rows = removed, "records deleted");
    Ok(removed)
}

pub fn aggregate_module(conn: &Connection, module_code: &str) -> Result<ModuleAggregate> {
    let records = find_by_module(conn, module_code)?;
    if records.is_empty() {
        return Err(LedgerError::NoData(
            "No data found for the provided module code".to_string(),
        ));
    }
    Ok(calc::aggregate(module_code.trim(), &records))
}

pub fn count_marks(conn: &Connection) -> Result<i64> {
    let n = conn.query_row("SELECT COUNT(*) FROM marks", [], |r| r.get(0))?;
    Ok(n)
}
