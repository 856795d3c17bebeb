use thiserror::Error;

use super::version::Version;

/// Structural failures of the save codec. Data-quality anomalies are never
/// reported through this type; they surface as [`super::Diagnostic`]s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("save image must be {expected:#x} bytes, got {actual:#x}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("save image does not match any known layout; supply a version override")]
    UnresolvedVersion,

    #[error("gift flag sequence must hold exactly {expected} flags, got {actual}")]
    FlagLengthMismatch { expected: usize, actual: usize },

    #[error("gift slab must hold exactly {expected} records, got {actual}")]
    SlabLengthMismatch { expected: usize, actual: usize },

    #[error("{what} at {offset:#x} (+{len:#x}) lies outside the save image")]
    OutOfBounds {
        what: &'static str,
        offset: usize,
        len: usize,
    },

    #[error("{field} is not present in the {version} layout")]
    FieldUnavailable {
        field: &'static str,
        version: Version,
    },

    #[error("invalid {what} index {index}, expected 0..{limit}")]
    InvalidIndex {
        what: &'static str,
        index: usize,
        limit: usize,
    },

    #[error("invalid layout table: {0}")]
    Layout(String),
}
