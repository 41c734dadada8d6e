use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppError {
    /// Required columns are missing from the uploaded table.
    Validation(String),
    /// The table parsed but contains zero data rows.
    EmptyInput,
    /// The file is structurally unusable (ragged rows, unreadable header).
    Malformed(String),
    /// The backend could not be reached at all.
    Unreachable(String),
    /// The backend did not answer within the request budget.
    Timeout(String),
    /// The backend answered with a non-success status; carries its message verbatim.
    Rejected(String),
    /// The selected file vanished between selection and read.
    FileNotFound(String),
    /// Any other client-side upload failure, original message attached.
    Upload(String),
    Config(String),
    IoError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::EmptyInput => write!(f, "CSV file is empty"),
            AppError::Malformed(msg) => write!(f, "Invalid CSV format: {}", msg),
            AppError::Unreachable(msg) => write!(f, "Cannot connect to backend server: {}", msg),
            AppError::Timeout(msg) => write!(f, "Backend server is not responding: {}", msg),
            AppError::Rejected(msg) => write!(f, "Backend error: {}", msg),
            AppError::FileNotFound(msg) => write!(f, "CSV file not found: {}", msg),
            AppError::Upload(msg) => write!(f, "Error uploading file: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl AppError {
    /// True for errors the user can fix by correcting the file,
    /// mapped to a 400-class response by the upload endpoint.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::EmptyInput | AppError::Malformed(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
