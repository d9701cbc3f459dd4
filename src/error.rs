use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No credential: {0}")]
    NoCredential(String),

    #[error("Remote operation failed: {0}")]
    RemoteOperationFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// What went wrong, as seen by a consumer of operation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NoCredential,
    RemoteOperationFailed,
    NotFound,
    DataIntegrity,
}

/// Cloneable projection of [`Error`] stored in operation state and rendered inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<&Error> for Failure {
    fn from(err: &Error) -> Self {
        let kind = match err {
            Error::NoCredential(_) => FailureKind::NoCredential,
            Error::NotFound(_) => FailureKind::NotFound,
            Error::DataIntegrity(_) => FailureKind::DataIntegrity,
            Error::Reqwest(err) if err.is_decode() => FailureKind::DataIntegrity,
            _ => FailureKind::RemoteOperationFailed,
        };
        let message = match err {
            Error::RemoteOperationFailed(msg) => msg.clone(),
            other => other.to_string(),
        };
        Self { kind, message }
    }
}

impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        Failure::from(&err)
    }
}
