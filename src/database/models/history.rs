use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use super::leave::LeaveStatus;
use super::macros::string_enum;
use super::user::UserRole;

/// One row of the append-only audit trail. Entries are never updated or
/// deleted, and deliberately keep no foreign keys so they outlive the leave
/// and the actor they describe.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveHistoryEntry {
    pub id: Uuid,
    pub leave_id: Uuid,
    /// The user who performed the action.
    pub user_id: Uuid,
    pub action: LeaveAction,
    pub status_change: Option<LeaveStatus>,
    pub message: Option<String>,
    /// Field-level diff; populated only for `Updated`.
    pub change: Json<Vec<FieldChange>>,
    pub created_at: DateTime<Utc>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum LeaveAction {
        Created => "CREATED",
        Updated => "UPDATED",
        Approved => "APPROVED",
        Rejected => "REJECTED",
        Deleted => "DELETED",
    }
}

/// Tagged per-field change record, one variant per mutable leave field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "field", rename_all = "camelCase")]
pub enum FieldChange {
    Reason {
        from: String,
        to: String,
    },
    Attachment {
        from: Option<String>,
        to: Option<String>,
    },
    Dates {
        from: Vec<NaiveDate>,
        to: Vec<NaiveDate>,
    },
}

/// Read-side row: an entry enriched with the actor's name/role and the
/// leave's reason via LEFT JOIN, all optional because the referenced rows
/// may have been deleted since.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveHistoryDetail {
    pub id: Uuid,
    pub leave_id: Uuid,
    pub user_id: Uuid,
    pub action: LeaveAction,
    pub status_change: Option<LeaveStatus>,
    pub message: Option<String>,
    pub change: Json<Vec<FieldChange>>,
    pub created_at: DateTime<Utc>,
    pub actor_name: Option<String>,
    pub actor_role: Option<UserRole>,
    pub leave_reason: Option<String>,
}

impl LeaveHistoryEntry {
    pub fn new(leave_id: Uuid, actor: Uuid, action: LeaveAction) -> Self {
        Self {
            id: Uuid::new_v4(),
            leave_id,
            user_id: actor,
            action,
            status_change: None,
            message: None,
            change: Json(Vec::new()),
            created_at: Utc::now(),
        }
    }

    pub fn with_status(mut self, status: LeaveStatus) -> Self {
        self.status_change = Some(status);
        self
    }

    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }

    pub fn with_change(mut self, change: Vec<FieldChange>) -> Self {
        self.change = Json(change);
        self
    }
}
