//! In-memory candidate store
//!
//! Backs both the board's fetcher and the simulated gateway so that a
//! confirmed move is visible to the next refetch.

use shared::{Candidate, CandidateId, Component, Stage, component_debug};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::{PipelineError, PipelineResult};
use crate::traits::CandidateRepository;
use crate::types::CandidateQuery;

/// Candidate repository held in process memory
#[derive(Debug, Default)]
pub struct InMemoryCandidateRepository {
    candidates: RwLock<HashMap<CandidateId, Candidate>>,
}

impl InMemoryCandidateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candidates(candidates: impl IntoIterator<Item = Candidate>) -> Self {
        let candidates = candidates
            .into_iter()
            .map(|candidate| (candidate.id.clone(), candidate))
            .collect();
        Self {
            candidates: RwLock::new(candidates),
        }
    }

    /// Demo data with candidates in every stage
    pub fn seeded() -> Self {
        const SEED: &[(&str, &str, Stage)] = &[
            ("Ada Lovelace", "Backend Engineer", Stage::New),
            ("Alan Turing", "Backend Engineer", Stage::New),
            ("Grace Hopper", "Platform Engineer", Stage::New),
            ("Edsger Dijkstra", "Backend Engineer", Stage::InReview),
            ("Barbara Liskov", "Staff Engineer", Stage::InReview),
            ("Donald Knuth", "Platform Engineer", Stage::HrInterview),
            ("Margaret Hamilton", "Staff Engineer", Stage::TechnicalInterview),
            ("Ken Thompson", "Backend Engineer", Stage::TechnicalInterview),
            ("Frances Allen", "Platform Engineer", Stage::Offer),
            ("John Backus", "Backend Engineer", Stage::Hired),
            ("Niklaus Wirth", "Staff Engineer", Stage::Rejected),
        ];

        let mut hints: HashMap<Stage, u32> = HashMap::new();
        let candidates = SEED.iter().map(|&(name, role, stage)| {
            let hint = hints.entry(stage).or_insert(0);
            let candidate = Candidate::new(name, stage)
                .with_order_hint(*hint)
                .with_role(role)
                .with_job(if role == "Backend Engineer" { "job-backend" } else { "job-platform" })
                .with_email(format!(
                    "{}@example.com",
                    name.to_lowercase().replace(' ', ".")
                ));
            *hint += 1;
            candidate
        });
        Self::with_candidates(candidates.collect::<Vec<_>>())
    }

    pub async fn len(&self) -> usize {
        self.candidates.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.candidates.read().await.is_empty()
    }

    fn next_hint(candidates: &HashMap<CandidateId, Candidate>, stage: Stage) -> u32 {
        candidates
            .values()
            .filter(|candidate| candidate.stage_status == stage)
            .map(|candidate| candidate.order_hint + 1)
            .max()
            .unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl CandidateRepository for InMemoryCandidateRepository {
    async fn list(&self, query: &CandidateQuery) -> PipelineResult<Vec<Candidate>> {
        let candidates = self.candidates.read().await;
        let mut matching: Vec<Candidate> = candidates
            .values()
            .filter(|candidate| query.matches(candidate))
            .cloned()
            .collect();
        // HashMap order is arbitrary; give callers a stable listing
        matching.sort_by(|a, b| {
            (a.stage_status, a.order_hint, &a.id).cmp(&(b.stage_status, b.order_hint, &b.id))
        });
        Ok(matching)
    }

    async fn get(&self, candidate_id: &CandidateId) -> PipelineResult<Option<Candidate>> {
        Ok(self.candidates.read().await.get(candidate_id).cloned())
    }

    async fn insert(&self, candidate: Candidate) -> PipelineResult<Candidate> {
        let mut candidates = self.candidates.write().await;
        if candidates.contains_key(&candidate.id) {
            return Err(PipelineError::DuplicateCandidate {
                candidate_id: candidate.id,
            });
        }
        candidates.insert(candidate.id.clone(), candidate.clone());
        Ok(candidate)
    }

    async fn update(&self, candidate: Candidate) -> PipelineResult<Candidate> {
        let mut candidates = self.candidates.write().await;
        match candidates.get_mut(&candidate.id) {
            Some(existing) => {
                *existing = candidate.clone();
                Ok(candidate)
            }
            None => Err(PipelineError::not_found(&candidate.id)),
        }
    }

    async fn update_stage(&self, candidate_id: &CandidateId, stage: Stage) -> PipelineResult<Candidate> {
        let mut candidates = self.candidates.write().await;
        let hint = Self::next_hint(&candidates, stage);
        let candidate = candidates
            .get_mut(candidate_id)
            .ok_or_else(|| PipelineError::not_found(candidate_id))?;

        if candidate.stage_status != stage {
            candidate.stage_status = stage;
            candidate.order_hint = hint;
        }
        component_debug!(
            Component::Repository,
            candidate_id = %candidate_id,
            stage = %stage,
            "Stage updated"
        );
        Ok(candidate.clone())
    }

    async fn reorder(&self, stage: Stage, ordered_ids: &[CandidateId]) -> PipelineResult<()> {
        let mut candidates = self.candidates.write().await;
        // Validate everything before touching anything
        for candidate_id in ordered_ids {
            let candidate = candidates
                .get(candidate_id)
                .ok_or_else(|| PipelineError::not_found(candidate_id))?;
            if candidate.stage_status != stage {
                return Err(PipelineError::StageMismatch {
                    candidate_id: candidate_id.clone(),
                    expected: stage,
                    actual: candidate.stage_status,
                });
            }
        }

        for (index, candidate_id) in ordered_ids.iter().enumerate() {
            if let Some(candidate) = candidates.get_mut(candidate_id) {
                candidate.order_hint = index as u32;
            }
        }
        Ok(())
    }
}
