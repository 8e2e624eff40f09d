//! Board fetcher over a candidate repository

use binding::{BindingError, BindingResult, Fetcher};
use shared::{Component, component_debug};
use std::sync::Arc;

use crate::core::Board;
use crate::traits::CandidateRepository;
use crate::types::CandidateQuery;

/// Lists candidates for a query and partitions them into a [`Board`]
pub struct CandidateFetcher<R> {
    repository: Arc<R>,
}

impl<R> CandidateFetcher<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl<R> Fetcher<CandidateQuery, Board> for CandidateFetcher<R>
where
    R: CandidateRepository + 'static,
{
    async fn fetch(&self, query: CandidateQuery) -> BindingResult<Option<Board>> {
        let candidates = self
            .repository
            .list(&query)
            .await
            .map_err(|e| BindingError::fetch(e.to_string()))?;
        component_debug!(
            Component::Repository,
            count = candidates.len(),
            "Candidates listed"
        );
        Ok(Some(Board::from_candidates(candidates)))
    }
}
