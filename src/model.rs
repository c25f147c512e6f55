use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramInfo {
    pub id: i64,
    pub num_students: Option<i64>,
    pub num_modules: Option<i64>,
    pub admission_year: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkRecord {
    pub student_id: String,
    pub student_name: String,
    pub module_code: String,
    pub module_name: String,
    pub date_of_entry: String,
    pub coursework_1_mark: i64,
    pub coursework_2_mark: i64,
    pub coursework_3_mark: i64,
    /// `None` for rows whose gender column is empty or unrecognised.
    pub gender: Option<Gender>,
    pub observation: Option<String>,
}

impl MarkRecord {
    /// Sum of the three coursework marks, clamped at the `i64` bounds.
    pub fn total(&self) -> i64 {
        self.coursework_1_mark
            .saturating_add(self.coursework_2_mark)
            .saturating_add(self.coursework_3_mark)
    }
}

/// The mark entry form as the UI shell submits it. Every field may be unset;
/// an unset mark is `None`, so a mark of 0 is a real value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkForm {
    pub module_code: Option<String>,
    pub module_name: Option<String>,
    pub coursework_1_mark: Option<i64>,
    pub coursework_2_mark: Option<i64>,
    pub coursework_3_mark: Option<i64>,
    pub student_id: Option<String>,
    pub student_name: Option<String>,
    pub gender: Option<String>,
    pub date_of_entry: Option<String>,
    #[serde(default)]
    pub observation: Option<String>,
}

/// Fields of the "Modify Marks" form. Name, gender and student id are fixed
/// after creation, so they are not part of it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkUpdate {
    pub student_id: Option<String>,
    pub module_code: Option<String>,
    pub date_of_entry: Option<String>,
    pub coursework_1_mark: Option<i64>,
    pub coursework_2_mark: Option<i64>,
    pub coursework_3_mark: Option<i64>,
}

impl rusqlite::types::ToSql for Gender {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}
