//! Shared error types for the recruiting pipeline workspace

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SharedError {
    #[error("Unknown pipeline stage: {input}")]
    InvalidStage { input: String },

    #[error("Invalid candidate id: {input}")]
    InvalidCandidateId { input: String },

    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
