//! Log-backed notifier

use shared::{Component, component_info, component_warn};
use std::sync::Mutex;

use crate::traits::Notifier;
use crate::types::Notification;

/// Writes notifications to the log and keeps them for inspection
#[derive(Debug, Default)]
pub struct TracingNotifier {
    history: Mutex<Vec<Notification>>,
}

impl TracingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything notified so far, oldest first
    pub fn history(&self) -> Vec<Notification> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match &notification {
            Notification::Moved { candidate_id, from, to } => {
                component_info!(
                    Component::Board,
                    candidate_id = %candidate_id,
                    "Moved from {} to {}",
                    from,
                    to
                );
            }
            Notification::Reordered { candidate_id, stage } => {
                component_info!(
                    Component::Board,
                    candidate_id = %candidate_id,
                    "Reordered within {}",
                    stage
                );
            }
            Notification::MoveReverted {
                candidate_id,
                stage,
                reason,
            } => {
                component_warn!(
                    Component::Board,
                    candidate_id = %candidate_id,
                    reason = %reason,
                    "Move reverted, back in {}",
                    stage
                );
            }
        }
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notification);
    }
}
