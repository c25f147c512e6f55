use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Home,
    InputMarks,
    ViewMarks,
    UpdateMarks,
    Visualize,
}

impl Stage {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "home" => Some(Stage::Home),
            "inputMarks" => Some(Stage::InputMarks),
            "viewMarks" => Some(Stage::ViewMarks),
            "updateMarks" => Some(Stage::UpdateMarks),
            "visualize" => Some(Stage::Visualize),
            _ => None,
        }
    }
}

/// Something that happened while the user was on a screen. Only outcomes that
/// belong to the current stage move its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    ProgramSaved,
    MarkSubmitted,
    ModuleViewed { rows: usize },
    MarksUpdated,
    RecordDeleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardContext {
    stage: Stage,
    submitted: bool,
    viewed: bool,
    updated: bool,
    forward_enabled: bool,
}

impl Default for WizardContext {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardContext {
    pub fn new() -> Self {
        WizardContext {
            stage: Stage::Home,
            submitted: false,
            viewed: false,
            updated: false,
            forward_enabled: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Navigation bar: always allowed, and the entered stage starts clean.
    pub fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        match stage {
            Stage::InputMarks => self.submitted = false,
            Stage::ViewMarks => self.viewed = false,
            Stage::UpdateMarks => {
                self.updated = false;
                self.forward_enabled = false;
            }
            Stage::Home | Stage::Visualize => {}
        }
    }

    pub fn record(&mut self, outcome: Outcome) {
        match (self.stage, outcome) {
            (Stage::Home, Outcome::ProgramSaved) => self.enter(Stage::InputMarks),
            (Stage::InputMarks, Outcome::MarkSubmitted) => self.submitted = true,
            (Stage::ViewMarks, Outcome::ModuleViewed { rows }) => self.viewed = rows > 0,
            (Stage::UpdateMarks, Outcome::MarksUpdated) => {
                self.updated = true;
                self.forward_enabled = true;
            }
            // Delete keeps `updated` but blocks forward until the next update.
            (Stage::UpdateMarks, Outcome::RecordDeleted) => self.forward_enabled = false,
            _ => {}
        }
    }

    pub fn can_advance(&self) -> bool {
        self.guard().is_ok()
    }

    fn guard(&self) -> Result<Stage> {
        let refused =
            |msg: &str| -> Result<Stage> { Err(LedgerError::GuardRefused(msg.to_string())) };
        match self.stage {
            Stage::Home => refused("save the program records to continue"),
            Stage::InputMarks if self.submitted => Ok(Stage::ViewMarks),
            Stage::InputMarks => refused("submit marks before proceeding"),
            Stage::ViewMarks if self.viewed => Ok(Stage::UpdateMarks),
            Stage::ViewMarks => refused("You must view the marks before proceeding!"),
            Stage::UpdateMarks if self.updated && self.forward_enabled => Ok(Stage::Visualize),
            Stage::UpdateMarks => {
                refused("Please update the marks before proceeding to the visualization.")
            }
            Stage::Visualize => refused("visualisation is the last stage"),
        }
    }

    /// The "Next" button. Refuses with `GuardRefused` when the current stage's
    /// action has not succeeded during this visit.
    pub fn next(&mut self) -> Result<Stage> {
        let to = self.guard()?;
        self.enter(to);
        Ok(to)
    }
}
