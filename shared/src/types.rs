//! Core shared types and identifiers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::{SharedError, SharedResult};

/// Unique identifier for candidates
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(Uuid);

impl CandidateId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> SharedResult<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| SharedError::InvalidCandidateId { input: s.to_string() })
    }
}

impl Default for CandidateId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One step of the recruitment pipeline, in board order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    New,
    InReview,
    HrInterview,
    TechnicalInterview,
    Offer,
    Hired,
    Rejected,
}

impl Stage {
    /// Number of pipeline stages
    pub const COUNT: usize = 7;

    /// All stages in column order
    pub const ALL: [Stage; Stage::COUNT] = [
        Stage::New,
        Stage::InReview,
        Stage::HrInterview,
        Stage::TechnicalInterview,
        Stage::Offer,
        Stage::Hired,
        Stage::Rejected,
    ];

    /// Column position of this stage on the board
    pub fn index(self) -> usize {
        match self {
            Stage::New => 0,
            Stage::InReview => 1,
            Stage::HrInterview => 2,
            Stage::TechnicalInterview => 3,
            Stage::Offer => 4,
            Stage::Hired => 5,
            Stage::Rejected => 6,
        }
    }

    /// Human readable column title
    pub fn label(self) -> &'static str {
        match self {
            Stage::New => "New",
            Stage::InReview => "In Review",
            Stage::HrInterview => "HR Interview",
            Stage::TechnicalInterview => "Technical Interview",
            Stage::Offer => "Offer",
            Stage::Hired => "Hired",
            Stage::Rejected => "Rejected",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::New => "new",
            Stage::InReview => "in_review",
            Stage::HrInterview => "hr_interview",
            Stage::TechnicalInterview => "technical_interview",
            Stage::Offer => "offer",
            Stage::Hired => "hired",
            Stage::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Stage {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == normalized)
            .ok_or_else(|| SharedError::InvalidStage { input: s.to_string() })
    }
}

/// Profile fields carried along with a candidate but never interpreted by the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub email: String,
    pub role: String,
    pub job_id: Option<String>,
    pub applied_at: DateTime<Utc>,
}

impl Default for CandidateProfile {
    fn default() -> Self {
        Self {
            email: String::new(),
            role: String::new(),
            job_id: None,
            applied_at: Utc::now(),
        }
    }
}

/// A candidate record as fetched from the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub stage_status: Stage,
    pub order_hint: u32,
    #[serde(default)]
    pub profile: CandidateProfile,
}

impl Candidate {
    pub fn new(name: impl Into<String>, stage: Stage) -> Self {
        Self {
            id: CandidateId::new(),
            name: name.into(),
            stage_status: stage,
            order_hint: 0,
            profile: CandidateProfile::default(),
        }
    }

    pub fn with_order_hint(mut self, order_hint: u32) -> Self {
        self.order_hint = order_hint;
        self
    }

    pub fn with_job(mut self, job_id: impl Into<String>) -> Self {
        self.profile.job_id = Some(job_id.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.profile.role = role.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.profile.email = email.into();
        self
    }
}

/// Component tag attached to every log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Binding,
    Board,
    Gateway,
    Repository,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Binding => write!(f, "binding"),
            Component::Board => write!(f, "board"),
            Component::Gateway => write!(f, "gateway"),
            Component::Repository => write!(f, "repository"),
        }
    }
}
