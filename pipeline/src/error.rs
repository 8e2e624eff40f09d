//! Pipeline-specific error types

use binding::BindingError;
use shared::{CandidateId, SharedError, Stage};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Candidate not found: {candidate_id}")]
    CandidateNotFound { candidate_id: CandidateId },

    #[error("Candidate already exists: {candidate_id}")]
    DuplicateCandidate { candidate_id: CandidateId },

    #[error("A drag is already in progress for {candidate_id}")]
    DragInProgress { candidate_id: CandidateId },

    #[error("A move of {candidate_id} is still being confirmed")]
    MovePending { candidate_id: CandidateId },

    #[error("No drag in progress")]
    NoActiveDrag,

    #[error("Board has not loaded")]
    BoardNotLoaded,

    #[error("Move of {candidate_id} from {from} to {to} was rejected: {reason}")]
    MoveRejected {
        candidate_id: CandidateId,
        from: Stage,
        to: Stage,
        reason: String,
    },

    #[error("Persistence call failed: {message}")]
    PersistenceFailed { message: String },

    #[error("Stage mismatch for {candidate_id}: expected {expected}, found {actual}")]
    StageMismatch {
        candidate_id: CandidateId,
        expected: Stage,
        actual: Stage,
    },

    #[error("Binding error: {0}")]
    Binding(#[from] BindingError),

    #[error("Shared component error")]
    SharedError(#[from] SharedError),
}

impl PipelineError {
    pub fn not_found(candidate_id: &CandidateId) -> Self {
        PipelineError::CandidateNotFound {
            candidate_id: candidate_id.clone(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        PipelineError::PersistenceFailed {
            message: message.into(),
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
