use crate::error::{LedgerError, Result};
use crate::model::{MarkForm, MarkUpdate};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    Number(Option<i64>),
}

impl FieldValue<'_> {
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(v) => v.map(|s| !s.trim().is_empty()).unwrap_or(false),
            FieldValue::Number(v) => v.is_some(),
        }
    }
}

/// Checks that every field is filled in. Reports all missing names, in input
/// order. Presence only: no coercion, ranges or cross-field rules.
pub fn validate_presence(fields: &[(&str, FieldValue<'_>)]) -> Result<()> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, v)| !v.is_present())
        .map(|(name, _)| name.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(LedgerError::Validation { missing })
    }
}

pub fn mark_form_fields(form: &MarkForm) -> Vec<(&'static str, FieldValue<'_>)> {
    vec![
        ("moduleCode", FieldValue::Text(form.module_code.as_deref())),
        ("moduleName", FieldValue::Text(form.module_name.as_deref())),
        ("coursework1Mark", FieldValue::Number(form.coursework_1_mark)),
        ("coursework2Mark", FieldValue::Number(form.coursework_2_mark)),
        ("coursework3Mark", FieldValue::Number(form.coursework_3_mark)),
        ("studentId", FieldValue::Text(form.student_id.as_deref())),
        ("studentName", FieldValue::Text(form.student_name.as_deref())),
        ("gender", FieldValue::Text(form.gender.as_deref())),
        ("dateOfEntry", FieldValue::Text(form.date_of_entry.as_deref())),
    ]
}

pub fn mark_update_fields(update: &MarkUpdate) -> Vec<(&'static str, FieldValue<'_>)> {
    vec![
        ("studentId", FieldValue::Text(update.student_id.as_deref())),
        ("moduleCode", FieldValue::Text(update.module_code.as_deref())),
        ("dateOfEntry", FieldValue::Text(update.date_of_entry.as_deref())),
        ("coursework1Mark", FieldValue::Number(update.coursework_1_mark)),
        ("coursework2Mark", FieldValue::Number(update.coursework_2_mark)),
        ("coursework3Mark", FieldValue::Number(update.coursework_3_mark)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_form() -> MarkForm {
        MarkForm {
            module_code: Some("CS101".into()),
            module_name: Some("Programming".into()),
            coursework_1_mark: Some(20),
            coursework_2_mark: Some(30),
            coursework_3_mark: Some(35),
            student_id: Some("s001".into()),
            student_name: Some("Ada".into()),
            gender: Some("Female".into()),
            date_of_entry: Some("2024-01-10".into()),
            observation: None,
        }
    }

    #[test]
    fn full_form_passes() {
        let form = full_form();
        validate_presence(&mark_form_fields(&form)).expect("valid");
    }

    #[test]
    fn each_missing_field_is_reported() {
        let names: Vec<&str> = mark_form_fields(&full_form())
            .iter()
            .map(|(n, _)| *n)
            .collect();
        assert_eq!(names.len(), 9);

        for name in names {
            let mut form = full_form();
            match name {
                "moduleCode" => form.module_code = None,
                "moduleName" => form.module_name = Some("   ".into()),
                "coursework1Mark" => form.coursework_1_mark = None,
                "coursework2Mark" => form.coursework_2_mark = None,
                "coursework3Mark" => form.coursework_3_mark = None,
                "studentId" => form.student_id = Some(String::new()),
                "studentName" => form.student_name = None,
                "gender" => form.gender = None,
                "dateOfEntry" => form.date_of_entry = None,
                other => panic!("unexpected field {other}"),
            }
            match validate_presence(&mark_form_fields(&form)) {
                Err(LedgerError::Validation { missing }) => assert_eq!(missing, vec![name]),
                other => panic!("expected validation error for {name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn zero_mark_counts_as_present() {
        let mut form = full_form();
        form.coursework_2_mark = Some(0);
        validate_presence(&mark_form_fields(&form)).expect("zero is a mark");
    }

    #[test]
    fn missing_fields_keep_input_order() {
        let form = MarkForm {
            student_name: Some("Ada".into()),
            ..MarkForm::default()
        };
        let Err(LedgerError::Validation { missing }) = validate_presence(&mark_form_fields(&form))
        else {
            panic!("expected validation error");
        };
        assert_eq!(missing.first().map(String::as_str), Some("moduleCode"));
        assert_eq!(missing.last().map(String::as_str), Some("dateOfEntry"));
        assert_eq!(missing.len(), 8);
    }
}
