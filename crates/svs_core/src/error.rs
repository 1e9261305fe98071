use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    Io,
    Csv,
    Parse,
    MissingHeader,
    Spreadsheet,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code:?}: {message}")]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<io::Error> for CoreError {
    fn from(e: io::Error) -> Self {
        Self::new(CoreErrorCode::Io, e.to_string())
    }
}

impl From<csv::Error> for CoreError {
    fn from(e: csv::Error) -> Self {
        if e.is_io_error() {
            return Self::new(CoreErrorCode::Io, e.to_string());
        }
        Self::new(CoreErrorCode::Csv, e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(CoreErrorCode::Json, e.to_string())
    }
}

impl From<calamine::Error> for CoreError {
    fn from(e: calamine::Error) -> Self {
        Self::new(CoreErrorCode::Spreadsheet, e.to_string())
    }
}
