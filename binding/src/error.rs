//! Binding-specific error types

use shared::SharedError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BindingError {
    #[error("Fetch failed: {message}")]
    FetchFailed { message: String },

    #[error("Fetch timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("Fetch task failed: {message}")]
    TaskFailed { message: String },

    #[error("Shared component error")]
    SharedError(#[from] SharedError),
}

impl BindingError {
    /// Convenience constructor for fetch failures
    pub fn fetch(message: impl Into<String>) -> Self {
        BindingError::FetchFailed {
            message: message.into(),
        }
    }
}

pub type BindingResult<T> = Result<T, BindingError>;
