use thiserror::Error;

#[derive(Debug, Error)]
pub enum PushgateError {
    #[error("git {command} failed: {reason}")]
    Git { command: String, reason: String },

    #[error("unknown package manager: {0}")]
    UnknownPackageManager(String),

    #[error("unknown check: {0}")]
    UnknownCheck(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PushgateError>;
