//! Candidate fixtures for board tests

use shared::{Candidate, CandidateId, Stage};

/// A small pipeline with a known layout
///
/// New: A, B, C
/// InReview: D
/// Offer: E, F
pub struct TestFixtures {
    pub candidates: Vec<Candidate>,
}

impl TestFixtures {
    pub fn new() -> Self {
        let layout: &[(&str, Stage)] = &[
            ("A", Stage::New),
            ("B", Stage::New),
            ("C", Stage::New),
            ("D", Stage::InReview),
            ("E", Stage::Offer),
            ("F", Stage::Offer),
        ];

        let mut candidates: Vec<Candidate> = Vec::new();
        for &(name, stage) in layout {
            let hint = candidates.iter().filter(|c| c.stage_status == stage).count() as u32;
            candidates.push(
                Candidate::new(name, stage)
                    .with_order_hint(hint)
                    .with_job("job-backend"),
            );
        }
        Self { candidates }
    }

    pub fn id(&self, name: &str) -> CandidateId {
        self.candidates
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.id.clone())
            .unwrap_or_else(|| panic!("no fixture named {name}"))
    }
}
