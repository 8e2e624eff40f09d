//! Test helpers and builder patterns for board tests

use async_trait::async_trait;
use pipeline::traits::{MockNotifier, MockPersistenceGateway};
use pipeline::*;
use shared::{Candidate, CandidateId, GatewayConfig, Stage};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, oneshot};

use super::fixtures::TestFixtures;

/// Column names in display order
pub fn names<G, N>(board: &PipelineBoard<G, N>, stage: Stage) -> Vec<String>
where
    G: PersistenceGateway + 'static,
    N: Notifier + 'static,
{
    board.column(stage).into_iter().map(|c| c.name).collect()
}

/// Builder for boards over the standard fixtures
pub struct BoardBuilder {
    fixtures: TestFixtures,
    config: GatewayConfig,
    query: CandidateQuery,
}

impl BoardBuilder {
    pub fn new() -> Self {
        shared::logging::init_tracing(Some("debug"));
        Self {
            fixtures: TestFixtures::new(),
            config: GatewayConfig::instant(),
            query: CandidateQuery::all(),
        }
    }

    pub fn persist_reorder(mut self) -> Self {
        self.config = self.config.with_persist_reorder(true);
        self
    }

    pub fn query(mut self, query: CandidateQuery) -> Self {
        self.query = query;
        self
    }

    pub fn fixtures(&self) -> &TestFixtures {
        &self.fixtures
    }

    pub fn repository(&self) -> Arc<InMemoryCandidateRepository> {
        Arc::new(InMemoryCandidateRepository::with_candidates(
            self.fixtures.candidates.clone(),
        ))
    }

    /// Mount with arbitrary gateway and notifier, waiting for the first load
    pub async fn mount<R, G, N>(
        &self,
        repository: Arc<R>,
        gateway: Arc<G>,
        notifier: Arc<N>,
    ) -> PipelineBoard<G, N>
    where
        R: CandidateRepository + 'static,
        G: PersistenceGateway + 'static,
        N: Notifier + 'static,
    {
        let board = PipelineBoard::mount(repository, gateway, notifier, self.query.clone(), &self.config);
        board.settled().await;
        board
    }

    /// Board over mocks; the caller sets the expectations
    pub async fn with_mocks(
        &self,
        gateway: MockPersistenceGateway,
        notifier: MockNotifier,
    ) -> PipelineBoard<MockPersistenceGateway, MockNotifier> {
        self.mount(self.repository(), Arc::new(gateway), Arc::new(notifier))
            .await
    }

    /// Board over the simulated gateway, sharing its repository
    pub async fn simulated(
        &self,
    ) -> (
        PipelineBoard<SimulatedGateway<InMemoryCandidateRepository>, TracingNotifier>,
        Arc<SimulatedGateway<InMemoryCandidateRepository>>,
        Arc<TracingNotifier>,
    ) {
        let repository = self.repository();
        let gateway = Arc::new(SimulatedGateway::new(repository.clone(), self.config.clone()));
        let notifier = Arc::new(TracingNotifier::new());
        let board = self.mount(repository, gateway.clone(), notifier.clone()).await;
        (board, gateway, notifier)
    }
}

/// Gateway whose stage updates block until the test answers them
///
/// With a repository attached, an accepted update is written through so a
/// later refetch sees it.
pub struct GatedGateway {
    pub entered: Notify,
    answers: Mutex<Vec<oneshot::Receiver<StageUpdateAck>>>,
    repository: Option<Arc<InMemoryCandidateRepository>>,
}

impl GatedGateway {
    pub fn new() -> Self {
        Self {
            entered: Notify::new(),
            answers: Mutex::new(Vec::new()),
            repository: None,
        }
    }

    pub fn writing_to(repository: Arc<InMemoryCandidateRepository>) -> Self {
        Self {
            repository: Some(repository),
            ..Self::new()
        }
    }

    /// Queue the answer channel for the next call
    pub fn gate(&self) -> oneshot::Sender<StageUpdateAck> {
        let (sender, receiver) = oneshot::channel();
        self.answers.lock().unwrap().push(receiver);
        sender
    }
}

#[async_trait]
impl PersistenceGateway for GatedGateway {
    async fn update_stage(
        &self,
        candidate_id: &CandidateId,
        _from: Stage,
        to: Stage,
    ) -> PipelineResult<StageUpdateAck> {
        let answer = {
            let mut answers = self.answers.lock().unwrap();
            if answers.is_empty() {
                None
            } else {
                Some(answers.remove(0))
            }
        };
        self.entered.notify_one();
        let ack = match answer {
            Some(receiver) => receiver
                .await
                .map_err(|_| PipelineError::persistence("gate dropped"))?,
            None => return Err(PipelineError::persistence("no gate registered")),
        };
        if let (true, Some(repository)) = (ack.success, &self.repository) {
            repository.update_stage(candidate_id, to).await?;
        }
        Ok(ack)
    }

    async fn reorder(&self, _stage: Stage, _ordered_ids: &[CandidateId]) -> PipelineResult<StageUpdateAck> {
        Ok(StageUpdateAck::accepted())
    }
}

/// Repository whose next listing reads the rows, then waits for the test
///
/// Models a fetch that read the backend before a move was persisted and
/// lands after it.
pub struct GatedRepository {
    inner: Arc<InMemoryCandidateRepository>,
    pub listed: Notify,
    hold: Mutex<Option<oneshot::Receiver<()>>>,
}

impl GatedRepository {
    pub fn new(inner: Arc<InMemoryCandidateRepository>) -> Self {
        Self {
            inner,
            listed: Notify::new(),
            hold: Mutex::new(None),
        }
    }

    /// Hold the next `list` after it has read its rows
    pub fn hold_next_list(&self) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        *self.hold.lock().unwrap() = Some(receiver);
        sender
    }
}

#[async_trait]
impl CandidateRepository for GatedRepository {
    async fn list(&self, query: &CandidateQuery) -> PipelineResult<Vec<Candidate>> {
        let rows = self.inner.list(query).await?;
        let hold = self.hold.lock().unwrap().take();
        if let Some(receiver) = hold {
            self.listed.notify_one();
            let _ = receiver.await;
        }
        Ok(rows)
    }

    async fn get(&self, candidate_id: &CandidateId) -> PipelineResult<Option<Candidate>> {
        self.inner.get(candidate_id).await
    }

    async fn insert(&self, candidate: Candidate) -> PipelineResult<Candidate> {
        self.inner.insert(candidate).await
    }

    async fn update(&self, candidate: Candidate) -> PipelineResult<Candidate> {
        self.inner.update(candidate).await
    }

    async fn update_stage(&self, candidate_id: &CandidateId, stage: Stage) -> PipelineResult<Candidate> {
        self.inner.update_stage(candidate_id, stage).await
    }

    async fn reorder(&self, stage: Stage, ordered_ids: &[CandidateId]) -> PipelineResult<()> {
        self.inner.reorder(stage, ordered_ids).await
    }
}
