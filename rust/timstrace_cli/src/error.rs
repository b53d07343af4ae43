use std::path::PathBuf;

use thiserror::Error;
use timstrace::TraceBuildError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Trace building error: {0}")]
    Build(#[from] TraceBuildError),

    #[error("Failed to set up logging: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("Data reading error: {0}")]
    DataReading(String),

    #[error("{} of {} inputs failed", .failed.len(), .total)]
    InputsFailed { failed: Vec<PathBuf>, total: usize },
}
