//! Simulated persistence backend
//!
//! Confirms board changes against a [`CandidateRepository`] after a fixed
//! delay. Rejections come from three sources: the configured random
//! failure rate, explicitly queued rejections, and transitions whose
//! origin stage no longer matches the stored candidate.

use rand::Rng;
use shared::{CandidateId, Component, GatewayConfig, Stage, component_debug, component_warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{PipelineError, PipelineResult};
use crate::traits::{CandidateRepository, PersistenceGateway};
use crate::types::StageUpdateAck;

pub struct SimulatedGateway<R> {
    repository: Arc<R>,
    config: GatewayConfig,
    pending_rejections: AtomicUsize,
}

impl<R> SimulatedGateway<R>
where
    R: CandidateRepository,
{
    pub fn new(repository: Arc<R>, config: GatewayConfig) -> Self {
        Self {
            repository,
            config,
            pending_rejections: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Reject the next `count` calls regardless of the failure rate
    pub fn reject_next(&self, count: usize) {
        self.pending_rejections.fetch_add(count, Ordering::SeqCst);
    }

    /// Wait out the latency, then decide whether this call is rejected
    async fn round_trip(&self) -> bool {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(self.config.latency()).await;
        }

        let queued = self
            .pending_rejections
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |pending| pending.checked_sub(1))
            .is_ok();
        if queued {
            return true;
        }

        roll_failure(self.config.failure_rate)
    }
}

fn roll_failure(rate: f64) -> bool {
    let rate = rate.clamp(0.0, 1.0);
    rate > 0.0 && rand::thread_rng().gen_bool(rate)
}

#[async_trait::async_trait]
impl<R> PersistenceGateway for SimulatedGateway<R>
where
    R: CandidateRepository + 'static,
{
    async fn update_stage(
        &self,
        candidate_id: &CandidateId,
        from: Stage,
        to: Stage,
    ) -> PipelineResult<StageUpdateAck> {
        if self.round_trip().await {
            component_warn!(
                Component::Gateway,
                candidate_id = %candidate_id,
                from = %from,
                to = %to,
                "Stage update rejected"
            );
            return Ok(StageUpdateAck::rejected());
        }

        let stored = self
            .repository
            .get(candidate_id)
            .await?
            .ok_or_else(|| PipelineError::not_found(candidate_id))?;
        if stored.stage_status != from {
            return Err(PipelineError::StageMismatch {
                candidate_id: candidate_id.clone(),
                expected: from,
                actual: stored.stage_status,
            });
        }

        self.repository.update_stage(candidate_id, to).await?;
        component_debug!(
            Component::Gateway,
            candidate_id = %candidate_id,
            from = %from,
            to = %to,
            "Stage update confirmed"
        );
        Ok(StageUpdateAck::accepted())
    }

    async fn reorder(&self, stage: Stage, ordered_ids: &[CandidateId]) -> PipelineResult<StageUpdateAck> {
        if self.round_trip().await {
            component_warn!(
                Component::Gateway,
                stage = %stage,
                count = ordered_ids.len(),
                "Reorder rejected"
            );
            return Ok(StageUpdateAck::rejected());
        }

        self.repository.reorder(stage, ordered_ids).await?;
        component_debug!(Component::Gateway, stage = %stage, "Reorder confirmed");
        Ok(StageUpdateAck::accepted())
    }
}
