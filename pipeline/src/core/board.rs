//! Stage-partitioned candidate columns
//!
//! The board is the single authoritative collection: one ordered column per
//! stage, every candidate in exactly one column, and each candidate's
//! `stage_status` equal to its column. `order_hint` always equals the
//! candidate's index within its column.

use shared::{Candidate, CandidateId, Component, Stage, component_warn};
use std::collections::HashSet;

use crate::core::drag::Transition;

/// Where a candidate sits on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub stage: Stage,
    pub index: usize,
}

impl Position {
    pub fn new(stage: Stage, index: usize) -> Self {
        Self { stage, index }
    }
}

/// Everything needed to put a candidate back where it was before a move
#[derive(Debug, Clone, PartialEq)]
pub struct MoveSnapshot {
    pub candidate_id: CandidateId,
    pub position: Position,
    pub order_hint: u32,
}

/// One ordered column per stage
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Board {
    columns: [Vec<Candidate>; Stage::COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Partition candidates by stage, ordering each column by `order_hint`
    ///
    /// Ties keep input order. A repeated id keeps its first occurrence.
    pub fn from_candidates(candidates: impl IntoIterator<Item = Candidate>) -> Self {
        let mut board = Self::new();
        let mut seen = HashSet::new();

        for candidate in candidates {
            if !seen.insert(candidate.id.clone()) {
                component_warn!(
                    Component::Board,
                    candidate_id = %candidate.id,
                    "Dropping duplicate candidate"
                );
                continue;
            }
            board.columns[candidate.stage_status.index()].push(candidate);
        }

        for stage in Stage::ALL {
            board.columns[stage.index()].sort_by_key(|candidate| candidate.order_hint);
            board.renumber(stage);
        }
        board
    }

    pub fn column(&self, stage: Stage) -> &[Candidate] {
        &self.columns[stage.index()]
    }

    /// Badge count for a column, always the live column length
    pub fn count(&self, stage: Stage) -> usize {
        self.columns[stage.index()].len()
    }

    pub fn counts(&self) -> Vec<(Stage, usize)> {
        Stage::ALL.iter().map(|&stage| (stage, self.count(stage))).collect()
    }

    pub fn total(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn locate(&self, candidate_id: &CandidateId) -> Option<Position> {
        Stage::ALL.into_iter().find_map(|stage| {
            self.columns[stage.index()]
                .iter()
                .position(|candidate| &candidate.id == candidate_id)
                .map(|index| Position::new(stage, index))
        })
    }

    pub fn get(&self, candidate_id: &CandidateId) -> Option<&Candidate> {
        self.locate(candidate_id)
            .map(|position| &self.columns[position.stage.index()][position.index])
    }

    /// All candidates in column order
    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.columns.iter().flatten()
    }

    pub fn ids(&self, stage: Stage) -> Vec<CandidateId> {
        self.column(stage).iter().map(|candidate| candidate.id.clone()).collect()
    }

    /// Apply a resolved transition, returning the snapshot to undo it
    ///
    /// Returns `None` for `NoOp` or when the board no longer matches the
    /// transition's origin.
    pub fn apply(&mut self, transition: &Transition) -> Option<MoveSnapshot> {
        match transition {
            Transition::NoOp => None,
            Transition::Reorder {
                candidate_id,
                stage,
                from_index,
                to_index,
            } => {
                let snapshot = self.snapshot_at(candidate_id, Position::new(*stage, *from_index))?;
                let column = &mut self.columns[stage.index()];
                let candidate = column.remove(*from_index);
                let to_index = (*to_index).min(column.len());
                column.insert(to_index, candidate);
                self.renumber(*stage);
                Some(snapshot)
            }
            Transition::StageMove { candidate_id, from, to } => {
                let snapshot = self.snapshot_at(candidate_id, *from)?;
                let mut candidate = self.columns[from.stage.index()].remove(from.index);
                candidate.stage_status = to.stage;

                let target = &mut self.columns[to.stage.index()];
                let to_index = to.index.min(target.len());
                target.insert(to_index, candidate);

                self.renumber(from.stage);
                self.renumber(to.stage);
                Some(snapshot)
            }
        }
    }

    /// Put a candidate back at its snapshot stage and index
    ///
    /// Returns false when the candidate is no longer on the board.
    pub fn restore(&mut self, snapshot: &MoveSnapshot) -> bool {
        let Some(current) = self.locate(&snapshot.candidate_id) else {
            return false;
        };

        let mut candidate = self.columns[current.stage.index()].remove(current.index);
        candidate.stage_status = snapshot.position.stage;
        candidate.order_hint = snapshot.order_hint;

        let target = &mut self.columns[snapshot.position.stage.index()];
        let index = snapshot.position.index.min(target.len());
        target.insert(index, candidate);

        self.renumber(current.stage);
        self.renumber(snapshot.position.stage);
        true
    }

    /// Every candidate appears once, in the column of its own stage
    pub fn is_partitioned(&self) -> bool {
        let mut seen = HashSet::new();
        Stage::ALL.into_iter().all(|stage| {
            self.columns[stage.index()]
                .iter()
                .all(|candidate| candidate.stage_status == stage && seen.insert(candidate.id.clone()))
        })
    }

    fn snapshot_at(&self, candidate_id: &CandidateId, position: Position) -> Option<MoveSnapshot> {
        let candidate = self.columns[position.stage.index()].get(position.index)?;
        if &candidate.id != candidate_id {
            return None;
        }
        Some(MoveSnapshot {
            candidate_id: candidate_id.clone(),
            position,
            order_hint: candidate.order_hint,
        })
    }

    fn renumber(&mut self, stage: Stage) {
        for (index, candidate) in self.columns[stage.index()].iter_mut().enumerate() {
            candidate.order_hint = index as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(stage: Stage, names: &[&str]) -> (Board, Vec<CandidateId>) {
        let candidates: Vec<Candidate> = names
            .iter()
            .enumerate()
            .map(|(index, name)| Candidate::new(*name, stage).with_order_hint(index as u32))
            .collect();
        let ids = candidates.iter().map(|c| c.id.clone()).collect();
        (Board::from_candidates(candidates), ids)
    }

    fn names(board: &Board, stage: Stage) -> Vec<&str> {
        board.column(stage).iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_partition_by_stage_and_order_hint() {
        let board = Board::from_candidates(vec![
            Candidate::new("Grace", Stage::Offer).with_order_hint(5),
            Candidate::new("Ada", Stage::New).with_order_hint(1),
            Candidate::new("Linus", Stage::Offer).with_order_hint(2),
            Candidate::new("Barbara", Stage::New).with_order_hint(0),
        ]);

        assert_eq!(names(&board, Stage::New), vec!["Barbara", "Ada"]);
        assert_eq!(names(&board, Stage::Offer), vec!["Linus", "Grace"]);
        assert_eq!(board.count(Stage::Offer), 2);
        assert_eq!(board.count(Stage::Hired), 0);
        assert_eq!(board.total(), 4);
        assert!(board.is_partitioned());

        // Hints are renumbered to column indices
        let hints: Vec<u32> = board.column(Stage::Offer).iter().map(|c| c.order_hint).collect();
        assert_eq!(hints, vec![0, 1]);
    }

    #[test]
    fn test_duplicate_ids_are_dropped() {
        let ada = Candidate::new("Ada", Stage::New);
        let mut copy = ada.clone();
        copy.stage_status = Stage::Offer;

        let board = Board::from_candidates(vec![ada.clone(), copy]);
        assert_eq!(board.total(), 1);
        assert_eq!(board.locate(&ada.id), Some(Position::new(Stage::New, 0)));
    }

    #[test]
    fn test_reorder_moves_before_target() {
        let (mut board, ids) = board_with(Stage::New, &["A", "B", "C"]);
        let transition = Transition::Reorder {
            candidate_id: ids[2].clone(),
            stage: Stage::New,
            from_index: 2,
            to_index: 0,
        };

        let snapshot = board.apply(&transition).expect("applied");
        assert_eq!(names(&board, Stage::New), vec!["C", "A", "B"]);
        assert_eq!(snapshot.position, Position::new(Stage::New, 2));
    }

    #[test]
    fn test_stage_move_and_restore() {
        let (mut board, ids) = board_with(Stage::New, &["A", "B", "C"]);
        let transition = Transition::StageMove {
            candidate_id: ids[1].clone(),
            from: Position::new(Stage::New, 1),
            to: Position::new(Stage::InReview, 0),
        };

        let snapshot = board.apply(&transition).expect("applied");
        assert_eq!(names(&board, Stage::New), vec!["A", "C"]);
        assert_eq!(names(&board, Stage::InReview), vec!["B"]);
        assert_eq!(board.get(&ids[1]).unwrap().stage_status, Stage::InReview);
        assert!(board.is_partitioned());

        assert!(board.restore(&snapshot));
        assert_eq!(names(&board, Stage::New), vec!["A", "B", "C"]);
        assert_eq!(board.count(Stage::InReview), 0);
        assert_eq!(board.get(&ids[1]).unwrap().stage_status, Stage::New);
        assert_eq!(board.get(&ids[1]).unwrap().order_hint, 1);
    }

    #[test]
    fn test_apply_rejects_stale_origin() {
        let (mut board, ids) = board_with(Stage::New, &["A", "B"]);
        let transition = Transition::StageMove {
            candidate_id: ids[0].clone(),
            from: Position::new(Stage::New, 1),
            to: Position::new(Stage::Offer, 0),
        };

        assert!(board.apply(&transition).is_none());
        assert_eq!(names(&board, Stage::New), vec!["A", "B"]);
    }

    #[test]
    fn test_restore_missing_candidate_is_skipped() {
        let (mut board, _) = board_with(Stage::New, &["A"]);
        let snapshot = MoveSnapshot {
            candidate_id: CandidateId::new(),
            position: Position::new(Stage::New, 0),
            order_hint: 0,
        };

        assert!(!board.restore(&snapshot));
        assert_eq!(board.total(), 1);
    }

    #[test]
    fn test_restore_clamps_index_when_column_shrank() {
        let (mut board, ids) = board_with(Stage::New, &["A", "B", "C"]);
        let snapshot = MoveSnapshot {
            candidate_id: ids[0].clone(),
            position: Position::new(Stage::Offer, 4),
            order_hint: 4,
        };

        assert!(board.restore(&snapshot));
        assert_eq!(board.locate(&ids[0]), Some(Position::new(Stage::Offer, 0)));
        assert_eq!(board.get(&ids[0]).unwrap().order_hint, 0);
    }
}
