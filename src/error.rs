use thiserror::Error;

use crate::draw::ValidationResult;

/// Failures of the key-value store backing assignment memory and saved inputs.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Errors that stop a draw before any operator is assigned.
#[derive(Debug, Error)]
pub enum DrawError {
    /// Empty required list, or a count mismatch in holiday mode.
    /// Assignment memory is untouched when this is returned.
    #[error("invalid input: {}", .0.errors.join("; "))]
    FatalInput(ValidationResult),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised while editing or persisting a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("type a value before adding it")]
    EmptyValue,

    #[error("unknown list: {0}")]
    UnknownList(String),

    #[error("index {index} out of range for {list} ({len} item(s))")]
    IndexOutOfRange {
        list: &'static str,
        index: usize,
        len: usize,
    },

    #[error("run a draw before printing")]
    NoDrawYet,

    #[error(transparent)]
    Draw(#[from] DrawError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
