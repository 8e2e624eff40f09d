//! Trait definitions with mockall annotations for testing
//!
//! These are the seams the board controller depends on. Tests inject the
//! generated mocks; production wiring uses the implementations in
//! [`crate::services`].

use shared::{Candidate, CandidateId, Stage};

use crate::error::PipelineResult;
use crate::types::{CandidateQuery, Notification, StageUpdateAck};

/// Candidate storage
#[mockall::automock]
#[async_trait::async_trait]
pub trait CandidateRepository: Send + Sync {
    /// Candidates matching the query, in no particular order
    async fn list(&self, query: &CandidateQuery) -> PipelineResult<Vec<Candidate>>;

    /// A single candidate; `Ok(None)` when absent
    async fn get(&self, candidate_id: &CandidateId) -> PipelineResult<Option<Candidate>>;

    async fn insert(&self, candidate: Candidate) -> PipelineResult<Candidate>;

    async fn update(&self, candidate: Candidate) -> PipelineResult<Candidate>;

    /// Move a candidate to the end of another stage
    async fn update_stage(&self, candidate_id: &CandidateId, stage: Stage) -> PipelineResult<Candidate>;

    /// Rewrite `order_hint` for the listed candidates of one stage
    async fn reorder(&self, stage: Stage, ordered_ids: &[CandidateId]) -> PipelineResult<()>;
}

/// Confirms board changes with the backend
///
/// `Ok` with `success: false` and `Err` both mean the change did not stick.
#[mockall::automock]
#[async_trait::async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn update_stage(
        &self,
        candidate_id: &CandidateId,
        from: Stage,
        to: Stage,
    ) -> PipelineResult<StageUpdateAck>;

    async fn reorder(&self, stage: Stage, ordered_ids: &[CandidateId]) -> PipelineResult<StageUpdateAck>;
}

/// Surfaces board events to the user
#[mockall::automock]
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
