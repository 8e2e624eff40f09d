//! Service-specific tests
//!
//! Each service has its own test file. Gateways run with zero latency so
//! nothing here waits on the clock.

mod in_memory_repository;

// Common test utilities for services
pub mod common {
    use shared::{Candidate, Stage};
    use std::sync::Arc;

    use crate::services::InMemoryCandidateRepository;

    /// Repository holding the named candidates in one stage, in order
    pub fn repository_with(stage: Stage, names: &[&str]) -> (Arc<InMemoryCandidateRepository>, Vec<Candidate>) {
        let candidates: Vec<Candidate> = names
            .iter()
            .enumerate()
            .map(|(index, name)| Candidate::new(*name, stage).with_order_hint(index as u32))
            .collect();
        let repository = InMemoryCandidateRepository::with_candidates(candidates.clone());
        (Arc::new(repository), candidates)
    }
}
