use std::result::Result as StdResult;

use thiserror::Error;

use crate::domain::money::AMOUNT_ERROR_TAG;

/// Error type shared by the balance, statement, and installment services.
///
/// Missing foreign references are not errors: lookups resolve to `None` and
/// integrity is left to the remote API.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Malformed input to a core function, tied to the offending field.
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    /// An operation that would break a lifecycle or account-kind rule.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        LedgerError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        LedgerError::InvariantViolation(message.into())
    }

    /// Field name for validation failures, so callers can render inline errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            LedgerError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        let text = err.to_string();
        match text.strip_prefix(AMOUNT_ERROR_TAG) {
            Some(reason) if err.is_data() => LedgerError::validation("amount", reason),
            _ => LedgerError::Serialization(text),
        }
    }
}

pub type Result<T> = StdResult<T, LedgerError>;
