//! Drag gesture state and drop resolution
//!
//! A drag is captured as three phases: begin (pick up a card), propose
//! (hover a column and optionally a card to drop before) and commit. This
//! module turns a proposed drop into a [`Transition`] the board can apply.
//!
//! Resolution rules:
//! - dropping a card onto itself is a no-op
//! - in the origin column, a drop with no target card is a no-op
//! - in the origin column, a target card moves the dragged card to just
//!   before it
//! - in another column, a target card inserts before it and no target
//!   card appends

use shared::{CandidateId, Stage};

use crate::core::board::{Board, Position};
use crate::error::{PipelineError, PipelineResult};

/// Where the dragged card would land
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub stage: Stage,
    pub before: Option<CandidateId>,
}

impl DropTarget {
    pub fn column(stage: Stage) -> Self {
        Self { stage, before: None }
    }

    pub fn before(stage: Stage, candidate_id: CandidateId) -> Self {
        Self {
            stage,
            before: Some(candidate_id),
        }
    }
}

/// Ephemeral state between drag start and drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragContext {
    pub dragged_id: CandidateId,
    pub origin: Position,
    pub hovered_stage: Option<Stage>,
    pub hovered_candidate: Option<CandidateId>,
}

impl DragContext {
    /// Pick up a card
    pub fn begin(board: &Board, candidate_id: &CandidateId) -> PipelineResult<Self> {
        let origin = board
            .locate(candidate_id)
            .ok_or_else(|| PipelineError::not_found(candidate_id))?;
        Ok(Self {
            dragged_id: candidate_id.clone(),
            origin,
            hovered_stage: None,
            hovered_candidate: None,
        })
    }

    /// Track the column and card under the pointer
    pub fn hover(&mut self, stage: Stage, candidate_id: Option<CandidateId>) {
        self.hovered_stage = Some(stage);
        self.hovered_candidate = candidate_id;
    }

    /// The drop target implied by the current hover, if any
    pub fn drop_target(&self) -> Option<DropTarget> {
        self.hovered_stage.map(|stage| DropTarget {
            stage,
            before: self.hovered_candidate.clone(),
        })
    }
}

/// A resolved board change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    NoOp,
    /// Same column, new index (index after removal of the dragged card)
    Reorder {
        candidate_id: CandidateId,
        stage: Stage,
        from_index: usize,
        to_index: usize,
    },
    /// Different column; `to.index` is the insertion index in the target
    StageMove {
        candidate_id: CandidateId,
        from: Position,
        to: Position,
    },
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        matches!(self, Transition::NoOp)
    }
}

/// Resolve a proposed drop against the current board
///
/// The dragged card's position is looked up again so a board that changed
/// since the drag began (e.g. after a refetch) is resolved against its
/// present layout.
pub fn resolve_drop(board: &Board, drag: &DragContext, target: &DropTarget) -> PipelineResult<Transition> {
    let dragged = &drag.dragged_id;
    let origin = board
        .locate(dragged)
        .ok_or_else(|| PipelineError::not_found(dragged))?;

    let before = match &target.before {
        Some(before) if before == dragged => return Ok(Transition::NoOp),
        Some(before) => {
            let position = board
                .locate(before)
                .ok_or_else(|| PipelineError::not_found(before))?;
            Some(position)
        }
        None => None,
    };

    // A target card decides the column it belongs to
    let stage = before.map(|position| position.stage).unwrap_or(target.stage);

    if stage == origin.stage {
        let Some(before) = before else {
            return Ok(Transition::NoOp);
        };
        let to_index = if before.index > origin.index {
            before.index - 1
        } else {
            before.index
        };
        if to_index == origin.index {
            return Ok(Transition::NoOp);
        }
        return Ok(Transition::Reorder {
            candidate_id: dragged.clone(),
            stage,
            from_index: origin.index,
            to_index,
        });
    }

    let to_index = before
        .map(|position| position.index)
        .unwrap_or_else(|| board.count(stage));
    Ok(Transition::StageMove {
        candidate_id: dragged.clone(),
        from: origin,
        to: Position::new(stage, to_index),
    })
}
