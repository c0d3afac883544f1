use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    GitError,
    TeamFileError,
    InvalidWindow,
    InvalidRequest,
    IoError,
    ConfigError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitError => write!(f, "GIT_ERROR"),
            Self::TeamFileError => write!(f, "TEAM_FILE_ERROR"),
            Self::InvalidWindow => write!(f, "INVALID_WINDOW"),
            Self::InvalidRequest => write!(f, "INVALID_REQUEST"),
            Self::IoError => write!(f, "IO_ERROR"),
            Self::ConfigError => write!(f, "CONFIG_ERROR"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PairError {
    pub code: ErrorCode,
    pub message: String,
}

impl fmt::Display for PairError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for PairError {}

impl PairError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn git(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GitError, message)
    }

    pub fn team_file(line: usize, message: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::TeamFileError,
            format!("Team file line {line}: {message}"),
        )
    }

    pub fn invalid_window(spec: &str) -> Self {
        Self::new(
            ErrorCode::InvalidWindow,
            format!(
                "Invalid window '{spec}': expected <N>d, <N>w, <N>m, <N>y or YYYY-MM-DD..YYYY-MM-DD"
            ),
        )
    }
}

/// Split an error into its code string and message for JSON output.
pub fn classify_error(e: &anyhow::Error) -> (String, String) {
    if let Some(pe) = e.downcast_ref::<PairError>() {
        (pe.code.to_string(), pe.message.clone())
    } else {
        (ErrorCode::IoError.to_string(), e.to_string())
    }
}
