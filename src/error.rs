use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, Serialize, PartialEq, Eq)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    #[error("Thread panic: {0}")]
    ThreadPanic(String),

    #[error("Invalid operation: {reason}")]
    InvalidOperation { reason: String },

    #[error("Search space mismatch for {what}: expected {expected}, generated {actual}")]
    SearchSpaceMismatch {
        what: String,
        expected: u64,
        actual: u64,
    },
}

impl Error {
    pub fn error_code(&self) -> i32 {
        match self {
            Error::Io(_) => -1,
            Error::InvalidArgument(_) => -2,
            Error::Config(_) => -3,
            Error::Serialization(_) => -4,
            Error::WorkerPool(_) => -5,
            Error::ThreadPanic(_) => -6,
            Error::InvalidOperation { .. } => -7,
            Error::SearchSpaceMismatch { .. } => -8,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Error::WorkerPool(err.to_string())
    }
}
