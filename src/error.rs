use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Failures of a single user action. None of them are retried and none of them
/// end the session; the caller reports and waits for corrected input.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Please fill in all fields! Missing: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Storage(#[from] rusqlite::Error),

    #[error("{0}")]
    NoData(String),

    #[error("{0}")]
    GuardRefused(String),
}

impl LedgerError {
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::Validation { .. } => "validation_error",
            LedgerError::NotFound(_) => "not_found",
            LedgerError::Storage(_) => "storage_error",
            LedgerError::NoData(_) => "no_data",
            LedgerError::GuardRefused(_) => "guard_refused",
        }
    }

    pub fn severity(&self) -> &'static str {
        match self {
            LedgerError::NotFound(_) | LedgerError::NoData(_) => "warning",
            _ => "error",
        }
    }
}
