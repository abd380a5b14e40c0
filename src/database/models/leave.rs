use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

/// A leave application. `leave_dates` holds discrete civil days (DATE[] in
/// Postgres), not a range.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Leave {
    pub id: Uuid,
    pub user_id: Uuid,
    pub leave_dates: Vec<NaiveDate>,
    pub reason: String,
    pub status: LeaveStatus,
    /// Set by the manager/admin who approved or rejected; null until reviewed.
    pub reviewed_by: Option<Uuid>,
    pub attachment_url: Option<String>,
    pub attachment_public_id: Option<String>,
    pub created_by: Option<Uuid>,
    pub last_modified_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum LeaveStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

/// Handle to a stored attachment as returned by the media store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRef {
    pub url: String,
    pub public_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveInput {
    pub dates: Vec<NaiveDate>,
    pub reason: String,
    /// Already uploaded by the caller; the workflow only cleans it up when
    /// validation fails.
    #[serde(default)]
    pub attachment: Option<AttachmentRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewInput {
    #[serde(default)]
    pub message: Option<String>,
}

/// Listing row: a leave joined with the requester's and reviewer's
/// name/email. Either side may be gone, so the joined fields are optional.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveDetails {
    pub id: Uuid,
    pub user_id: Uuid,
    pub leave_dates: Vec<NaiveDate>,
    pub reason: String,
    pub status: LeaveStatus,
    pub reviewed_by: Option<Uuid>,
    pub attachment_url: Option<String>,
    pub attachment_public_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub requester_name: Option<String>,
    pub requester_email: Option<String>,
    pub reviewer_name: Option<String>,
    pub reviewer_email: Option<String>,
}

impl Leave {
    pub fn attachment(&self) -> Option<AttachmentRef> {
        match (&self.attachment_url, &self.attachment_public_id) {
            (Some(url), Some(public_id)) => Some(AttachmentRef {
                url: url.clone(),
                public_id: public_id.clone(),
            }),
            _ => None,
        }
    }
}
