//! Pipeline board controller
//!
//! Owns the board's resource binding and drives the three-phase drag
//! protocol: `begin_move`, `propose_drop` (or `hover`) and `commit_move`.
//! A committed move is applied to the local board immediately, then
//! confirmed through the [`PersistenceGateway`]. A rejected or failed
//! confirmation puts the candidate back at the exact stage and index it
//! had before the drag and emits a single `MoveReverted` notification.
//!
//! A candidate cannot be picked up again until its last move is confirmed
//! or rolled back, so there is never more than one snapshot per candidate.

use binding::{BindingOptions, FetchHandle, ResourceBinding, ResourceState};
use shared::{Candidate, CandidateId, Component, GatewayConfig, Stage, component_info, component_warn};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::{Board, DragContext, DropTarget, MoveSnapshot, Transition, resolve_drop};
use crate::error::{PipelineError, PipelineResult};
use crate::services::CandidateFetcher;
use crate::traits::{CandidateRepository, Notifier, PersistenceGateway};
use crate::types::{CandidateQuery, MoveOutcome, Notification, StageUpdateAck};

/// A move that has been applied locally and awaits confirmation
struct PendingMove {
    transition: Transition,
    snapshot: MoveSnapshot,
    /// Target column order after the move, sent when order is persisted
    column_ids: Vec<CandidateId>,
}

/// Marks a candidate as awaiting confirmation until dropped
struct PendingGuard<'a> {
    pending: &'a Mutex<HashSet<CandidateId>>,
    candidate_id: CandidateId,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        lock_pending(self.pending).remove(&self.candidate_id);
    }
}

fn lock_pending(pending: &Mutex<HashSet<CandidateId>>) -> MutexGuard<'_, HashSet<CandidateId>> {
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct PipelineBoard<G, N> {
    binding: ResourceBinding<CandidateQuery, Board>,
    gateway: Arc<G>,
    notifier: Arc<N>,
    drag: Mutex<Option<DragContext>>,
    /// Candidates whose move is applied but not yet confirmed
    pending: Mutex<HashSet<CandidateId>>,
    persist_reorder: bool,
}

impl<G, N> PipelineBoard<G, N>
where
    G: PersistenceGateway + 'static,
    N: Notifier + 'static,
{
    /// Bind a board to the repository and start loading it
    ///
    /// Must be called from within a Tokio runtime.
    pub fn mount<R>(
        repository: Arc<R>,
        gateway: Arc<G>,
        notifier: Arc<N>,
        query: CandidateQuery,
        config: &GatewayConfig,
    ) -> Self
    where
        R: CandidateRepository + 'static,
    {
        let binding = ResourceBinding::bind(
            CandidateFetcher::new(repository),
            query,
            BindingOptions::default(),
        );
        Self::with_binding(binding, gateway, notifier, config.persist_reorder)
    }

    /// Drive an existing binding
    pub fn with_binding(
        binding: ResourceBinding<CandidateQuery, Board>,
        gateway: Arc<G>,
        notifier: Arc<N>,
        persist_reorder: bool,
    ) -> Self {
        Self {
            binding,
            gateway,
            notifier,
            drag: Mutex::new(None),
            pending: Mutex::new(HashSet::new()),
            persist_reorder,
        }
    }

    pub fn binding(&self) -> &ResourceBinding<CandidateQuery, Board> {
        &self.binding
    }

    /// Loading, error and board data as one snapshot
    pub fn state(&self) -> ResourceState<Board> {
        self.binding.snapshot()
    }

    pub fn board(&self) -> Option<Board> {
        self.binding.data()
    }

    /// Wait for any in-flight fetch to land
    pub async fn settled(&self) -> ResourceState<Board> {
        self.binding.settled().await
    }

    /// Cards of one column in display order
    pub fn column(&self, stage: Stage) -> Vec<Candidate> {
        self.binding
            .data()
            .map(|board| board.column(stage).to_vec())
            .unwrap_or_default()
    }

    /// Badge count per column, computed from the live board
    pub fn counts(&self) -> Vec<(Stage, usize)> {
        match self.binding.data() {
            Some(board) => board.counts(),
            None => Stage::ALL.iter().map(|&stage| (stage, 0)).collect(),
        }
    }

    /// Change the filter; refetches only when the query actually changed
    pub fn set_query(&self, query: CandidateQuery) -> Option<FetchHandle> {
        self.binding.set_params(query)
    }

    pub fn refetch(&self) -> FetchHandle {
        self.binding.refetch()
    }

    pub fn active_drag(&self) -> Option<DragContext> {
        self.lock_drag().clone()
    }

    /// Whether a move of this candidate is still waiting for the backend
    pub fn is_pending(&self, candidate_id: &CandidateId) -> bool {
        lock_pending(&self.pending).contains(candidate_id)
    }

    /// Pick up a card
    pub fn begin_move(&self, candidate_id: &CandidateId) -> PipelineResult<()> {
        let mut drag = self.lock_drag();
        if let Some(active) = drag.as_ref() {
            return Err(PipelineError::DragInProgress {
                candidate_id: active.dragged_id.clone(),
            });
        }
        if lock_pending(&self.pending).contains(candidate_id) {
            return Err(PipelineError::MovePending {
                candidate_id: candidate_id.clone(),
            });
        }

        let board = self.binding.data().ok_or(PipelineError::BoardNotLoaded)?;
        *drag = Some(DragContext::begin(&board, candidate_id)?);
        Ok(())
    }

    /// Track the pointer over a column and, optionally, a card in it
    pub fn hover(&self, stage: Stage, candidate_id: Option<CandidateId>) -> PipelineResult<()> {
        let mut drag = self.lock_drag();
        let context = drag.as_mut().ok_or(PipelineError::NoActiveDrag)?;
        context.hover(stage, candidate_id);
        Ok(())
    }

    /// Record the drop target and preview the resulting transition
    pub fn propose_drop(&self, target: DropTarget) -> PipelineResult<Transition> {
        let mut drag = self.lock_drag();
        let context = drag.as_mut().ok_or(PipelineError::NoActiveDrag)?;
        context.hover(target.stage, target.before.clone());

        let board = self.binding.data().ok_or(PipelineError::BoardNotLoaded)?;
        resolve_drop(&board, context, &target)
    }

    /// Abandon the drag without touching the board
    pub fn cancel_move(&self) -> bool {
        self.lock_drag().take().is_some()
    }

    /// Drop the card on the proposed target
    ///
    /// The drag ends before the persistence call is awaited, so another
    /// card may be dragged while this one is being confirmed. Releasing the
    /// card with no target is a no-op.
    pub async fn commit_move(&self) -> PipelineResult<MoveOutcome> {
        let (context, _pending) = {
            let mut drag = self.lock_drag();
            let context = drag.take().ok_or(PipelineError::NoActiveDrag)?;
            lock_pending(&self.pending).insert(context.dragged_id.clone());
            let guard = PendingGuard {
                pending: &self.pending,
                candidate_id: context.dragged_id.clone(),
            };
            (context, guard)
        };
        let Some(target) = context.drop_target() else {
            return Ok(MoveOutcome::NoOp);
        };

        let pending = self.apply_locally(&context, &target)?;
        let Some(pending) = pending else {
            return Ok(MoveOutcome::NoOp);
        };

        match pending.transition.clone() {
            Transition::NoOp => Ok(MoveOutcome::NoOp),
            Transition::Reorder {
                candidate_id,
                stage,
                to_index,
                ..
            } => {
                if self.persist_reorder {
                    let result = self.gateway.reorder(stage, &pending.column_ids).await;
                    self.confirm(&pending, stage, stage, result)?;
                    self.reconcile(&candidate_id, stage);
                }
                self.notifier.notify(Notification::Reordered {
                    candidate_id: candidate_id.clone(),
                    stage,
                });
                Ok(MoveOutcome::Reordered {
                    candidate_id,
                    stage,
                    index: to_index,
                })
            }
            Transition::StageMove { candidate_id, from, to } => {
                let result = self
                    .gateway
                    .update_stage(&candidate_id, from.stage, to.stage)
                    .await;
                self.confirm(&pending, from.stage, to.stage, result)?;
                if self.persist_reorder {
                    self.persist_column_order(to.stage, &pending.column_ids).await;
                }
                self.reconcile(&candidate_id, to.stage);
                self.notifier.notify(Notification::Moved {
                    candidate_id: candidate_id.clone(),
                    from: from.stage,
                    to: to.stage,
                });
                Ok(MoveOutcome::Moved {
                    candidate_id,
                    from: from.stage,
                    to: to.stage,
                })
            }
        }
    }

    /// Resolve against the live board and apply in one state update
    fn apply_locally(&self, context: &DragContext, target: &DropTarget) -> PipelineResult<Option<PendingMove>> {
        self.binding.update_data(|data| {
            let board = data.as_mut().ok_or(PipelineError::BoardNotLoaded)?;
            let transition = resolve_drop(board, context, target)?;
            if transition.is_noop() {
                return Ok(None);
            }
            let Some(snapshot) = board.apply(&transition) else {
                return Ok(None);
            };

            let stage = match &transition {
                Transition::StageMove { to, .. } => to.stage,
                _ => snapshot.position.stage,
            };
            component_info!(
                Component::Board,
                candidate_id = %snapshot.candidate_id,
                from = %snapshot.position.stage,
                to = %stage,
                "Applied move optimistically"
            );
            Ok(Some(PendingMove {
                column_ids: board.ids(stage),
                transition,
                snapshot,
            }))
        })
    }

    /// Send the target column's order after a confirmed stage change
    ///
    /// The stage change already stuck, so a failure here is not rolled
    /// back; the board reloads the backend's order instead.
    async fn persist_column_order(&self, stage: Stage, column_ids: &[CandidateId]) {
        let reason = match self.gateway.reorder(stage, column_ids).await {
            Ok(ack) if ack.success => return,
            Ok(_) => "the backend rejected the order".to_string(),
            Err(error) => error.to_string(),
        };
        component_warn!(
            Component::Board,
            stage = %stage,
            reason = %reason,
            "Column order not persisted, reloading"
        );
        let _ = self.binding.refetch();
    }

    /// Refetch when the board may no longer show a confirmed move
    ///
    /// A fetch that read the backend before the move was persisted either
    /// already replaced the board or is still in flight.
    fn reconcile(&self, candidate_id: &CandidateId, stage: Stage) {
        let diverged = self
            .binding
            .data()
            .and_then(|board| board.get(candidate_id).map(|c| c.stage_status != stage))
            .unwrap_or(false);
        if diverged || self.binding.is_loading() {
            component_info!(
                Component::Board,
                candidate_id = %candidate_id,
                stage = %stage,
                "Board changed while the move was pending, refetching"
            );
            let _ = self.binding.refetch();
        }
    }

    /// Accept the gateway's answer or roll the move back
    fn confirm(
        &self,
        pending: &PendingMove,
        from: Stage,
        to: Stage,
        result: PipelineResult<StageUpdateAck>,
    ) -> PipelineResult<()> {
        let reason = match result {
            Ok(ack) if ack.success => {
                component_info!(
                    Component::Board,
                    candidate_id = %pending.snapshot.candidate_id,
                    stage = %to,
                    "Move persisted"
                );
                return Ok(());
            }
            Ok(_) => "the backend rejected the change".to_string(),
            Err(error) => error.to_string(),
        };

        let snapshot = &pending.snapshot;
        let restored = self
            .binding
            .update_data(|data| data.as_mut().is_some_and(|board| board.restore(snapshot)));
        if restored {
            component_warn!(
                Component::Board,
                candidate_id = %snapshot.candidate_id,
                stage = %snapshot.position.stage,
                index = snapshot.position.index,
                reason = %reason,
                "Rolled back move"
            );
        } else {
            component_warn!(
                Component::Board,
                candidate_id = %snapshot.candidate_id,
                reason = %reason,
                "Candidate left the board before rollback, skipping"
            );
        }

        self.notifier.notify(Notification::MoveReverted {
            candidate_id: snapshot.candidate_id.clone(),
            stage: snapshot.position.stage,
            reason: reason.clone(),
        });
        Err(PipelineError::MoveRejected {
            candidate_id: snapshot.candidate_id.clone(),
            from,
            to,
            reason,
        })
    }

    fn lock_drag(&self) -> MutexGuard<'_, Option<DragContext>> {
        self.drag.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
