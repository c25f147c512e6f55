use crate::db::DEFAULT_STORE_FILE;
use std::path::PathBuf;

pub const STORE_PATH_ENV: &str = "MARKREGD_DB";
pub const DEFAULT_LOG_FILTER: &str = "markregd=info";

#[derive(Debug, Clone)]
pub struct Config {
    pub store_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::resolve(std::env::var(STORE_PATH_ENV).ok())
    }

    /// Store path priority: environment override, then `marks.db` in the
    /// working directory.
    pub fn resolve(env_store_path: Option<String>) -> Self {
        let store_path = env_store_path
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE));
        Config { store_path }
    }
}

/// Logs go to stderr; stdout carries the IPC responses.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
