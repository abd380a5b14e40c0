use chrono::{Datelike, NaiveDate, Utc, Weekday};
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::{
    FieldChange, Leave, LeaveAction, LeaveHistoryEntry, LeaveInput, LeaveStatus, User,
};
use crate::database::repositories::{LeaveStore, UserStore};
use crate::error::AppError;
use crate::services::history::LeaveHistoryLedger;
use crate::services::notify::{self, Notifier};
use crate::services::storage::{AttachmentKind, AttachmentStore};

/// The leave lifecycle state machine.
///
/// Status moves `pending -> approved` (terminal), `pending -> rejected`,
/// and `rejected -> pending` via update only; nothing ever leaves
/// `approved`. The precondition check and the following write are not
/// atomic against a concurrent reviewer: last write wins and both
/// reviewers' history entries are recorded.
#[derive(Clone)]
pub struct LeaveWorkflow {
    leaves: Arc<dyn LeaveStore>,
    users: Arc<dyn UserStore>,
    ledger: LeaveHistoryLedger,
    attachments: Arc<dyn AttachmentStore>,
    notifier: Arc<dyn Notifier>,
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The comparison is midnight-of-date against the current instant, so the
/// current calendar day itself counts as past.
fn is_past(date: NaiveDate) -> bool {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc() < Utc::now())
        .unwrap_or(false)
}

fn sorted(dates: &[NaiveDate]) -> Vec<NaiveDate> {
    let mut copy = dates.to_vec();
    copy.sort();
    copy
}

impl LeaveWorkflow {
    pub fn new(
        leaves: Arc<dyn LeaveStore>,
        users: Arc<dyn UserStore>,
        ledger: LeaveHistoryLedger,
        attachments: Arc<dyn AttachmentStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            leaves,
            users,
            ledger,
            attachments,
            notifier,
        }
    }

    /// Deletes an attachment the caller already uploaded, after validation
    /// turned the request away. Failures are logged only; they must never
    /// mask the validation error that got us here.
    async fn cleanup_attachment(&self, public_id: &str) {
        let kind = AttachmentKind::for_filename(public_id);
        match self.attachments.delete(public_id, kind).await {
            Ok(()) => log::info!("Deleted attachment {} after failed validation", public_id),
            Err(err) => log::error!("Attachment cleanup failed for {}: {}", public_id, err),
        }
    }

    async fn fail_create(&self, input: &LeaveInput, err: AppError) -> Result<Leave, AppError> {
        if let Some(attachment) = &input.attachment {
            self.cleanup_attachment(&attachment.public_id).await;
        }
        Err(err)
    }

    pub async fn create_leave(
        &self,
        requester: Uuid,
        input: LeaveInput,
    ) -> Result<Leave, AppError> {
        if input.dates.is_empty() {
            return self
                .fail_create(&input, AppError::InvalidInput("Dates must be a non-empty array".into()))
                .await;
        }
        if input.reason.trim().is_empty() {
            return self
                .fail_create(&input, AppError::InvalidInput("Reason is required".into()))
                .await;
        }
        if input.dates.iter().any(|d| is_past(*d)) {
            return self.fail_create(&input, AppError::PastDateRejected).await;
        }

        let conflicts = self
            .leaves
            .find_conflicting(requester, &input.dates)
            .await?;
        if !conflicts.is_empty() {
            return self
                .fail_create(&input, AppError::DuplicateDateConflict(conflicts))
                .await;
        }

        if input.dates.iter().any(|d| is_weekend(*d)) {
            return self.fail_create(&input, AppError::WeekendNotAllowed).await;
        }

        let now = Utc::now();
        let leave = Leave {
            id: Uuid::new_v4(),
            user_id: requester,
            leave_dates: input.dates,
            reason: input.reason,
            status: LeaveStatus::Pending,
            reviewed_by: None,
            attachment_url: input.attachment.as_ref().map(|a| a.url.clone()),
            attachment_public_id: input.attachment.as_ref().map(|a| a.public_id.clone()),
            created_by: Some(requester),
            last_modified_by: Some(requester),
            created_at: now,
            updated_at: now,
        };
        self.leaves.create(&leave).await?;

        self.ledger
            .record(
                LeaveHistoryEntry::new(leave.id, requester, LeaveAction::Created)
                    .with_status(LeaveStatus::Pending),
            )
            .await;

        // Notify the requester's manager, when there is one to notify. A
        // delivery failure surfaces to the caller even though the leave is
        // already committed; the persisted row is the source of truth.
        if let Some((employee, manager)) = self.requester_with_manager(requester).await? {
            let email = notify::new_application_email(
                &manager.name,
                &manager.email,
                &employee.name,
                &leave.reason,
                &leave.leave_dates,
            );
            self.notifier
                .send(&email)
                .await
                .map_err(|e| AppError::DeliveryError(e.to_string()))?;
        }

        Ok(leave)
    }

    pub async fn update_leave(
        &self,
        id: Uuid,
        actor: Uuid,
        input: LeaveInput,
    ) -> Result<Leave, AppError> {
        let mut leave = self
            .leaves
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Leave".into()))?;

        // Approved leaves are immutable.
        if leave.status == LeaveStatus::Approved {
            return Err(AppError::AlreadyApproved);
        }

        if input.dates.iter().any(|d| is_past(*d)) {
            return Err(AppError::PastDateRejected);
        }
        // Weekend and duplicate-date rules are not re-checked on update.
        // That matches the create/update asymmetry this service has always
        // had; see DESIGN.md.

        let mut changes = Vec::new();
        if leave.reason != input.reason {
            changes.push(FieldChange::Reason {
                from: leave.reason.clone(),
                to: input.reason.clone(),
            });
        }
        if let Some(attachment) = &input.attachment {
            if leave.attachment_public_id.as_deref() != Some(attachment.public_id.as_str()) {
                changes.push(FieldChange::Attachment {
                    from: leave.attachment_url.clone(),
                    to: Some(attachment.url.clone()),
                });
            }
        }
        // Date equality is order-independent.
        if sorted(&leave.leave_dates) != sorted(&input.dates) {
            changes.push(FieldChange::Dates {
                from: leave.leave_dates.clone(),
                to: input.dates.clone(),
            });
        }

        leave.leave_dates = input.dates;
        leave.reason = input.reason;
        if let Some(attachment) = input.attachment {
            // A new attachment replaces the old reference; absent means
            // keep what is there.
            leave.attachment_url = Some(attachment.url);
            leave.attachment_public_id = Some(attachment.public_id);
        }
        // Any prior rejection is reopened.
        leave.status = LeaveStatus::Pending;
        leave.last_modified_by = Some(actor);
        leave.updated_at = Utc::now();
        self.leaves.update(&leave).await?;

        self.ledger
            .record(
                LeaveHistoryEntry::new(leave.id, actor, LeaveAction::Updated)
                    .with_status(LeaveStatus::Pending)
                    .with_change(changes),
            )
            .await;

        Ok(leave)
    }

    pub async fn approve_leave(
        &self,
        id: Uuid,
        reviewer: Uuid,
        message: Option<String>,
    ) -> Result<Leave, AppError> {
        let leave = self.review(id, reviewer, LeaveStatus::Approved).await?;

        self.ledger
            .record(
                LeaveHistoryEntry::new(leave.id, reviewer, LeaveAction::Approved)
                    .with_status(LeaveStatus::Approved)
                    .with_message(message),
            )
            .await;

        if let Some(requester) = self.users.find_by_id(leave.user_id).await? {
            let reviewer_name = self.reviewer_name(reviewer).await?;
            let email = notify::approved_email(
                &requester.name,
                &requester.email,
                &reviewer_name,
                &leave.reason,
                &leave.leave_dates,
            );
            self.notifier
                .send(&email)
                .await
                .map_err(|e| AppError::DeliveryError(e.to_string()))?;
        }

        Ok(leave)
    }

    pub async fn reject_leave(
        &self,
        id: Uuid,
        reviewer: Uuid,
        message: Option<String>,
    ) -> Result<Leave, AppError> {
        let leave = self.review(id, reviewer, LeaveStatus::Rejected).await?;

        self.ledger
            .record(
                LeaveHistoryEntry::new(leave.id, reviewer, LeaveAction::Rejected)
                    .with_status(LeaveStatus::Rejected)
                    .with_message(message.clone()),
            )
            .await;

        if let Some(requester) = self.users.find_by_id(leave.user_id).await? {
            let reviewer_name = self.reviewer_name(reviewer).await?;
            let email = notify::rejected_email(
                &requester.name,
                &requester.email,
                &reviewer_name,
                &leave.reason,
                &leave.leave_dates,
                message.as_deref(),
            );
            self.notifier
                .send(&email)
                .await
                .map_err(|e| AppError::DeliveryError(e.to_string()))?;
        }

        Ok(leave)
    }

    pub async fn delete_leave(&self, id: Uuid, actor: Uuid) -> Result<(), AppError> {
        let leave = self
            .leaves
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Leave".into()))?;

        if leave.status == LeaveStatus::Approved {
            return Err(AppError::CannotDeleteApproved);
        }

        if let Some(public_id) = &leave.attachment_public_id {
            // Stored file removal is best effort; the leave goes away
            // either way.
            let kind = AttachmentKind::for_filename(public_id);
            if let Err(err) = self.attachments.delete(public_id, kind).await {
                log::error!("Error deleting attachment {} for leave {}: {}", public_id, id, err);
            }
        }

        self.leaves.delete(id).await?;

        self.ledger
            .record(LeaveHistoryEntry::new(id, actor, LeaveAction::Deleted))
            .await;

        Ok(())
    }

    /// Shared approve/reject gate: the leave must exist and still be
    /// pending. The read and the write are two steps; see the type docs.
    async fn review(
        &self,
        id: Uuid,
        reviewer: Uuid,
        outcome: LeaveStatus,
    ) -> Result<Leave, AppError> {
        let mut leave = self
            .leaves
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Leave".into()))?;

        if leave.status != LeaveStatus::Pending {
            return Err(AppError::InvalidTransition(leave.status));
        }

        leave.status = outcome;
        leave.reviewed_by = Some(reviewer);
        leave.updated_at = Utc::now();
        self.leaves.update(&leave).await?;

        Ok(leave)
    }

    async fn requester_with_manager(
        &self,
        requester: Uuid,
    ) -> Result<Option<(User, User)>, AppError> {
        let Some(employee) = self.users.find_by_id(requester).await? else {
            return Ok(None);
        };
        let Some(manager_id) = employee.manager else {
            return Ok(None);
        };
        let manager = self.users.find_by_id(manager_id).await?;
        Ok(manager.map(|m| (employee, m)))
    }

    async fn reviewer_name(&self, reviewer: Uuid) -> Result<String, AppError> {
        let name = self
            .users
            .find_by_id(reviewer)
            .await?
            .map(|u| u.name)
            .unwrap_or_else(|| "Leave Management System".to_string());
        Ok(name)
    }
}
