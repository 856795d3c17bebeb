use thiserror::Error;

use crate::sav4::FormatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    Io,
    Parse,
    UnresolvedVersion,
    InvalidLength,
    FlagLengthMismatch,
    SlabLengthMismatch,
    InvalidInput,
    UnsupportedOperation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
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

impl From<FormatError> for CoreError {
    fn from(err: FormatError) -> Self {
        let code = match &err {
            FormatError::InvalidLength { .. } => CoreErrorCode::InvalidLength,
            FormatError::UnresolvedVersion => CoreErrorCode::UnresolvedVersion,
            FormatError::FlagLengthMismatch { .. } => CoreErrorCode::FlagLengthMismatch,
            FormatError::SlabLengthMismatch { .. } => CoreErrorCode::SlabLengthMismatch,
            FormatError::InvalidIndex { .. } => CoreErrorCode::InvalidInput,
            FormatError::FieldUnavailable { .. } => CoreErrorCode::UnsupportedOperation,
            FormatError::OutOfBounds { .. } | FormatError::Layout(_) => CoreErrorCode::Parse,
        };
        Self::new(code, err.to_string())
    }
}
