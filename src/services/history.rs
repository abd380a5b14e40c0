use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::{LeaveHistoryDetail, LeaveHistoryEntry};
use crate::database::repositories::HistoryStore;
use crate::error::AppError;

/// Append-only ledger over the history store. Recording never fails the
/// calling operation: auditing is not part of the transactional contract,
/// so persistence errors are logged and dropped here.
#[derive(Clone)]
pub struct LeaveHistoryLedger {
    store: Arc<dyn HistoryStore>,
}

impl LeaveHistoryLedger {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    pub async fn record(&self, entry: LeaveHistoryEntry) {
        if let Err(err) = self.store.insert(&entry).await {
            log::error!(
                "Failed to record {} history for leave {}: {}",
                entry.action,
                entry.leave_id,
                err
            );
        }
    }

    /// Every entry ever recorded for a leave, oldest first, enriched with
    /// actor name/role and the leave's reason.
    pub async fn history(&self, leave_id: Uuid) -> Result<Vec<LeaveHistoryDetail>, AppError> {
        let entries = self.store.list_for_leave(leave_id).await?;
        Ok(entries)
    }
}
