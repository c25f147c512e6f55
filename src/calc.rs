use crate::model::MarkRecord;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];

    /// Fixed bands over the coursework total; lower bounds are inclusive.
    pub fn for_total(total: i64) -> Self {
        if total >= 70 {
            Grade::A
        } else if total >= 60 {
            Grade::B
        } else if total >= 50 {
            Grade::C
        } else if total >= 40 {
            Grade::D
        } else {
            Grade::F
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GradeHistogram {
    #[serde(rename = "A")]
    pub a: usize,
    #[serde(rename = "B")]
    pub b: usize,
    #[serde(rename = "C")]
    pub c: usize,
    #[serde(rename = "D")]
    pub d: usize,
    #[serde(rename = "F")]
    pub f: usize,
}

impl GradeHistogram {
    pub fn from_totals<I>(totals: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let mut h = GradeHistogram::default();
        for t in totals {
            *h.slot(Grade::for_total(t)) += 1;
        }
        h
    }

    pub fn count(&self, grade: Grade) -> usize {
        match grade {
            Grade::A => self.a,
            Grade::B => self.b,
            Grade::C => self.c,
            Grade::D => self.d,
            Grade::F => self.f,
        }
    }

    fn slot(&mut self, grade: Grade) -> &mut usize {
        match grade {
            Grade::A => &mut self.a,
            Grade::B => &mut self.b,
            Grade::C => &mut self.c,
            Grade::D => &mut self.d,
            Grade::F => &mut self.f,
        }
    }

    pub fn total_count(&self) -> usize {
        self.a + self.b + self.c + self.d + self.f
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentTotal {
    pub student_id: String,
    pub student_name: String,
    pub total: i64,
    pub grade: Grade,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleAggregate {
    pub module_code: String,
    pub totals: Vec<StudentTotal>,
    pub histogram: GradeHistogram,
}

pub fn aggregate(module_code: &str, records: &[MarkRecord]) -> ModuleAggregate {
    let totals: Vec<StudentTotal> = records
        .iter()
        .map(|r| {
            let total = r.total();
            StudentTotal {
                student_id: r.student_id.clone(),
                student_name: r.student_name.clone(),
                total,
                grade: Grade::for_total(total),
            }
        })
        .collect();
    let histogram = GradeHistogram::from_totals(totals.iter().map(|t| t.total));
    ModuleAggregate {
        module_code: module_code.to_string(),
        totals,
        histogram,
    }
}
