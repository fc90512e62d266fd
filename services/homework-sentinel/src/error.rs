//! Error types for the homework sentinel service

/// Errors that can occur in the homework sentinel service
#[derive(Debug, thiserror::Error)]
pub enum SentinelError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Unexpected API response: {0}")]
    ResponseCode(String),

    #[error("API response is not an object")]
    NotAnObject,

    #[error("API response has no '{0}' key")]
    MissingData(&'static str),

    #[error("'homeworks' in API response is not a list")]
    HomeworksNotAList,

    #[error("Homework record has no '{0}' field")]
    MissingField(&'static str),

    #[error("Unknown homework status: {0}")]
    UnknownStatus(String),

    #[error("Telegram message not sent: {0}")]
    Telegram(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification the engine uses to decide how to react to a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Startup problems; never retried
    Fatal,
    Transport,
    Schema,
    Data,
    Notify,
}

impl SentinelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SentinelError::Config(_) | SentinelError::Json(_) => ErrorKind::Fatal,
            SentinelError::Http(_) | SentinelError::ResponseCode(_) => ErrorKind::Transport,
            SentinelError::NotAnObject
            | SentinelError::MissingData(_)
            | SentinelError::HomeworksNotAList => ErrorKind::Schema,
            SentinelError::MissingField(_) | SentinelError::UnknownStatus(_) => ErrorKind::Data,
            SentinelError::Telegram(_) => ErrorKind::Notify,
        }
    }
}

/// Result type alias for sentinel operations
pub type Result<T> = std::result::Result<T, SentinelError>;
