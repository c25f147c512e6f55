//! Chart descriptions for the visualisation screen. Drawing is left to the
//! UI shell; this module only decides what goes on each chart.

use crate::calc::{Grade, GradeHistogram};
use crate::error::{LedgerError, Result};
use crate::ledger;
use crate::model::MarkRecord;
use rusqlite::Connection;
use serde::Serialize;

const PIE_COLORS: [&str; 5] = ["#2ecc71", "#3498db", "#f1c40f", "#e67e22", "#e74c3c"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Scatter,
    Pie,
}

impl ChartKind {
    pub const CYCLE: [ChartKind; 4] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Scatter,
        ChartKind::Pie,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Some(ChartKind::Bar),
            "line" => Some(ChartKind::Line),
            "scatter" => Some(ChartKind::Scatter),
            "pie" => Some(ChartKind::Pie),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        let i = Self::CYCLE.iter().position(|k| *k == self).unwrap_or(0);
        Self::CYCLE[(i + 1) % Self::CYCLE.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub percent: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub module_code: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    pub points: Vec<ChartPoint>,
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone)]
struct Dataset {
    module_code: String,
    names: Vec<String>,
    totals: Vec<i64>,
}

impl Dataset {
    fn from_records(module_code: &str, records: &[MarkRecord]) -> Self {
        Dataset {
            module_code: module_code.to_string(),
            names: records.iter().map(|r| r.student_name.clone()).collect(),
            totals: records.iter().map(MarkRecord::total).collect(),
        }
    }
}

/// Keeps the last dataset fetched so the "next graph" button can redraw
/// without going back to the store.
#[derive(Debug, Default)]
pub struct Visualizer {
    last: Option<(Dataset, ChartKind)>,
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        conn: &Connection,
        module_code: &str,
        kind: ChartKind,
    ) -> Result<ChartSpec> {
        let code = module_code.trim();
        let records = ledger::find_by_module(conn, code)?;
        if records.is_empty() {
            return Err(LedgerError::NoData(
                "No data found for the provided module code".to_string(),
            ));
        }
        let data = Dataset::from_records(code, &records);
        let spec = build(&data, kind);
        self.last = Some((data, kind));
        Ok(spec)
    }

    pub fn cycle(&mut self) -> Result<ChartSpec> {
        let Some((data, kind)) = self.last.as_mut() else {
            return Err(LedgerError::NoData(
                "No data available for visualization".to_string(),
            ));
        };
        *kind = kind.next();
        Ok(build(data, *kind))
    }
}

fn build(data: &Dataset, kind: ChartKind) -> ChartSpec {
    let points = || -> Vec<ChartPoint> {
        data.names
            .iter()
            .zip(&data.totals)
            .enumerate()
            .map(|(i, (name, total))| ChartPoint {
                label: name.clone(),
                x: i as f64,
                y: *total as f64,
            })
            .collect()
    };
    let axes = |title: &str, points: Vec<ChartPoint>| ChartSpec {
        kind,
        module_code: data.module_code.clone(),
        title: title.to_string(),
        x_label: Some("Student Name".to_string()),
        y_label: Some("Total Marks".to_string()),
        points,
        slices: Vec::new(),
    };

    match kind {
        ChartKind::Bar => axes("Total Marks by Student", points()),
        ChartKind::Line => axes("Marks Trend", points()),
        ChartKind::Scatter => axes("Marks Distribution", points()),
        ChartKind::Pie => ChartSpec {
            kind,
            module_code: data.module_code.clone(),
            title: "Grade Distribution".to_string(),
            x_label: None,
            y_label: None,
            points: Vec::new(),
            slices: pie_slices(&GradeHistogram::from_totals(data.totals.iter().copied())),
        },
    }
}

/// Empty grades are skipped; colours are handed out in order to the slices
/// that remain.
fn pie_slices(h: &GradeHistogram) -> Vec<PieSlice> {
    let total = h.total_count();
    Grade::ALL
        .iter()
        .filter(|g| h.count(**g) > 0)
        .zip(PIE_COLORS.iter())
        .map(|(g, color)| {
            let count = h.count(*g);
            PieSlice {
                label: format!("Grade {} ({})", g.letter(), count),
                count,
                percent: 100.0 * count as f64 / total as f64,
                color: color.to_string(),
            }
        })
        .collect()
}
