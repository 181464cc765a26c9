use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed endpoint '{endpoint}': {reason}")]
    MalformedEndpoint { endpoint: String, reason: String },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("invalid scan pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("report serialization failed: {0}")]
    Report(#[from] serde_json::Error),
}

impl CodegenError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CodegenError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(endpoint: &str, reason: impl Into<String>) -> Self {
        CodegenError::MalformedEndpoint {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodegenError>;
