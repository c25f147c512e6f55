use crate::config::Config;
use crate::viz::Visualizer;
use crate::wizard::WizardContext;
use rusqlite::Connection;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub config: Config,
    pub store_path: Option<PathBuf>,
    pub db: Option<Connection>,
    pub wizard: WizardContext,
    pub viz: Visualizer,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            config,
            store_path: None,
            db: None,
            wizard: WizardContext::new(),
            viz: Visualizer::new(),
        }
    }
}
