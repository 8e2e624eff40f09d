//! Pipeline data types

use serde::{Deserialize, Serialize};
use shared::{Candidate, CandidateId, Stage};

/// Filter for the candidate list behind a board
///
/// This is the board's binding parameter: two equal queries never trigger
/// a second fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateQuery {
    pub job_id: Option<String>,
    /// Case-insensitive substring of the candidate name
    pub search: Option<String>,
    pub stages: Option<Vec<Stage>>,
}

impl CandidateQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_job(job_id: impl Into<String>) -> Self {
        Self {
            job_id: Some(job_id.into()),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_stages(mut self, stages: Vec<Stage>) -> Self {
        self.stages = Some(stages);
        self
    }

    pub fn matches(&self, candidate: &Candidate) -> bool {
        if let Some(job_id) = &self.job_id {
            if candidate.profile.job_id.as_deref() != Some(job_id.as_str()) {
                return false;
            }
        }
        if let Some(stages) = &self.stages {
            if !stages.contains(&candidate.stage_status) {
                return false;
            }
        }
        match &self.search {
            Some(search) if !search.trim().is_empty() => candidate
                .name
                .to_lowercase()
                .contains(&search.trim().to_lowercase()),
            _ => true,
        }
    }
}

/// Persistence acknowledgement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageUpdateAck {
    pub success: bool,
}

impl StageUpdateAck {
    pub fn accepted() -> Self {
        Self { success: true }
    }

    pub fn rejected() -> Self {
        Self { success: false }
    }
}

/// User-facing board notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Moved {
        candidate_id: CandidateId,
        from: Stage,
        to: Stage,
    },
    Reordered {
        candidate_id: CandidateId,
        stage: Stage,
    },
    /// A move was rejected and the card went back to its original place
    MoveReverted {
        candidate_id: CandidateId,
        stage: Stage,
        reason: String,
    },
}

impl Notification {
    pub fn is_revert(&self) -> bool {
        matches!(self, Notification::MoveReverted { .. })
    }
}

/// Result of a committed drag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing changed and nothing was persisted
    NoOp,
    Moved {
        candidate_id: CandidateId,
        from: Stage,
        to: Stage,
    },
    Reordered {
        candidate_id: CandidateId,
        stage: Stage,
        index: usize,
    },
}
