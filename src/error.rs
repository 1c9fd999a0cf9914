use std::path::PathBuf;
use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Activity source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Pointer injection failed: {0}")]
    Injection(String),

    #[error("Cannot open activity log at {}: {source}", path.display())]
    ActivityLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine project directories")]
    NoProjectDirs,

    #[error("Invalid settings file {}: {reason}", path.display())]
    Settings { path: PathBuf, reason: String },

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// True for errors raised while building the heartbeat stream or log sink.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            AppError::SourceUnavailable(_) | AppError::ActivityLog { .. } | AppError::Io(_)
        )
    }
}
