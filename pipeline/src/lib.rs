//! Recruitment pipeline board
//!
//! Stage-partitioned, drag-reorderable candidate columns layered on a
//! resource binding. Moves are applied optimistically, confirmed through a
//! persistence gateway and rolled back to the exact pre-drag position when
//! the gateway rejects them.

pub mod core;
pub mod error;
pub mod pipeline_board;
pub mod services;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use crate::core::{Board, DragContext, DropTarget, MoveSnapshot, Position, Transition};
pub use error::{PipelineError, PipelineResult};
pub use pipeline_board::PipelineBoard;
pub use traits::{CandidateRepository, Notifier, PersistenceGateway};
pub use types::{CandidateQuery, MoveOutcome, Notification, StageUpdateAck};

// Re-export service implementations
pub use services::{CandidateFetcher, InMemoryCandidateRepository, SimulatedGateway, TracingNotifier};
