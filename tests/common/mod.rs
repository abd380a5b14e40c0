#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use leavehub::database::models::{
    AttachmentRef, Leave, LeaveDetails, LeaveHistoryDetail, LeaveHistoryEntry, LeaveInput,
    ListOptions, User, UserRole,
};
use leavehub::database::repositories::{HistoryStore, LeaveStore, UserStore};
use leavehub::services::notify::{Email, Notifier};
use leavehub::services::storage::{AttachmentKind, AttachmentStore};
use leavehub::{LeaveHistoryLedger, LeaveQueryService, LeaveWorkflow};

// ---------------------------------------------------------------------------
// In-memory port doubles. The workflow talks to its collaborators through
// the store traits, so the whole state machine runs against these without a
// database server or any external service.
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryUsers {
    rows: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserStore for InMemoryUsers {
    async fn create(&self, user: &User) -> Result<()> {
        self.rows.write().await.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<()> {
        self.rows.write().await.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self.rows.read().await.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn list_paged(&self, opts: &ListOptions) -> Result<Vec<User>> {
        Ok(paginate(self.list_all().await?, opts))
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.rows.read().await.len() as i64)
    }

    async fn list_by_manager(&self, manager_id: Uuid, opts: &ListOptions) -> Result<Vec<User>> {
        let mut team: Vec<User> = self
            .rows
            .read()
            .await
            .values()
            .filter(|u| u.manager == Some(manager_id))
            .cloned()
            .collect();
        team.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(team, opts))
    }

    async fn count_by_manager(&self, manager_id: Uuid) -> Result<i64> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|u| u.manager == Some(manager_id))
            .count() as i64)
    }

    async fn list_managers(&self) -> Result<Vec<User>> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|u| matches!(u.role, UserRole::Manager | UserRole::Admin))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryLeaves {
    rows: RwLock<HashMap<Uuid, Leave>>,
}

impl InMemoryLeaves {
    pub async fn get(&self, id: Uuid) -> Option<Leave> {
        self.rows.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    async fn all_sorted(&self) -> Vec<Leave> {
        let mut leaves: Vec<Leave> = self.rows.read().await.values().cloned().collect();
        leaves.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        leaves
    }
}

fn paginate<T>(items: Vec<T>, opts: &ListOptions) -> Vec<T> {
    items
        .into_iter()
        .skip(opts.offset.max(0) as usize)
        .take(opts.limit.max(0) as usize)
        .collect()
}

fn details(leave: Leave) -> LeaveDetails {
    LeaveDetails {
        id: leave.id,
        user_id: leave.user_id,
        leave_dates: leave.leave_dates,
        reason: leave.reason,
        status: leave.status,
        reviewed_by: leave.reviewed_by,
        attachment_url: leave.attachment_url,
        attachment_public_id: leave.attachment_public_id,
        created_at: leave.created_at,
        updated_at: leave.updated_at,
        requester_name: None,
        requester_email: None,
        reviewer_name: None,
        reviewer_email: None,
    }
}

#[async_trait]
impl LeaveStore for InMemoryLeaves {
    async fn create(&self, leave: &Leave) -> Result<()> {
        self.rows.write().await.insert(leave.id, leave.clone());
        Ok(())
    }

    async fn update(&self, leave: &Leave) -> Result<()> {
        self.rows.write().await.insert(leave.id, leave.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.rows.write().await.remove(&id);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Leave>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_conflicting(&self, user_id: Uuid, dates: &[NaiveDate]) -> Result<Vec<Leave>> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|l| {
                l.user_id == user_id
                    && l.status != leavehub::database::models::LeaveStatus::Rejected
                    && l.leave_dates.iter().any(|d| dates.contains(d))
            })
            .cloned()
            .collect())
    }

    async fn list_for_user(&self, user_id: Uuid, opts: &ListOptions) -> Result<Vec<LeaveDetails>> {
        let leaves: Vec<Leave> = self
            .all_sorted()
            .await
            .into_iter()
            .filter(|l| l.user_id == user_id)
            .collect();
        Ok(paginate(leaves, opts).into_iter().map(details).collect())
    }

    async fn count_for_user(&self, user_id: Uuid) -> Result<i64> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|l| l.user_id == user_id)
            .count() as i64)
    }

    async fn list_all(&self, opts: &ListOptions) -> Result<Vec<LeaveDetails>> {
        Ok(paginate(self.all_sorted().await, opts)
            .into_iter()
            .map(details)
            .collect())
    }

    async fn count_all(&self) -> Result<i64> {
        Ok(self.rows.read().await.len() as i64)
    }

    async fn list_for_users(
        &self,
        user_ids: &[Uuid],
        opts: &ListOptions,
    ) -> Result<Vec<LeaveDetails>> {
        let leaves: Vec<Leave> = self
            .all_sorted()
            .await
            .into_iter()
            .filter(|l| user_ids.contains(&l.user_id))
            .collect();
        Ok(paginate(leaves, opts).into_iter().map(details).collect())
    }

    async fn count_for_users(&self, user_ids: &[Uuid]) -> Result<i64> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|l| user_ids.contains(&l.user_id))
            .count() as i64)
    }
}

/// History double. `fail` makes inserts error so tests can check that the
/// ledger swallows store failures.
#[derive(Default)]
pub struct InMemoryHistory {
    rows: RwLock<Vec<LeaveHistoryEntry>>,
    pub fail: AtomicBool,
}

impl InMemoryHistory {
    pub async fn entries_for(&self, leave_id: Uuid) -> Vec<LeaveHistoryEntry> {
        self.rows
            .read()
            .await
            .iter()
            .filter(|e| e.leave_id == leave_id)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistory {
    async fn insert(&self, entry: &LeaveHistoryEntry) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("history table unavailable"));
        }
        self.rows.write().await.push(entry.clone());
        Ok(())
    }

    async fn list_for_leave(&self, leave_id: Uuid) -> Result<Vec<LeaveHistoryDetail>> {
        Ok(self
            .entries_for(leave_id)
            .await
            .into_iter()
            .map(|e| LeaveHistoryDetail {
                id: e.id,
                leave_id: e.leave_id,
                user_id: e.user_id,
                action: e.action,
                status_change: e.status_change,
                message: e.message,
                change: e.change,
                created_at: e.created_at,
                actor_name: None,
                actor_role: None,
                leave_reason: None,
            })
            .collect())
    }
}

/// Notifier double recording every message; `fail` simulates the mail API
/// being down.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: RwLock<Vec<Email>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, email: &Email) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("mail API error: 503"));
        }
        self.sent.write().await.push(email.clone());
        Ok(())
    }
}

/// Attachment-store double recording deletions; `fail_delete` simulates the
/// media API rejecting the destroy call.
#[derive(Default)]
pub struct RecordingAttachments {
    pub deleted: RwLock<Vec<String>>,
    pub fail_delete: AtomicBool,
}

impl RecordingAttachments {
    pub async fn deleted_ids(&self) -> Vec<String> {
        self.deleted.read().await.clone()
    }
}

#[async_trait]
impl AttachmentStore for RecordingAttachments {
    async fn upload(&self, filename: &str, _bytes: Vec<u8>) -> Result<AttachmentRef> {
        Ok(AttachmentRef {
            url: format!("https://cdn.example.com/leave_app/{filename}"),
            public_id: format!("leave_app/{filename}"),
        })
    }

    async fn delete(&self, public_id: &str, _kind: AttachmentKind) -> Result<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(anyhow!("media delete failed: 401"));
        }
        self.deleted.write().await.push(public_id.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Wiring and fixtures
// ---------------------------------------------------------------------------

pub struct TestEnv {
    pub users: Arc<InMemoryUsers>,
    pub leaves: Arc<InMemoryLeaves>,
    pub history: Arc<InMemoryHistory>,
    pub notifier: Arc<RecordingNotifier>,
    pub attachments: Arc<RecordingAttachments>,
    pub ledger: LeaveHistoryLedger,
    pub workflow: LeaveWorkflow,
    pub queries: LeaveQueryService,
}

impl TestEnv {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUsers::default());
        let leaves = Arc::new(InMemoryLeaves::default());
        let history = Arc::new(InMemoryHistory::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let attachments = Arc::new(RecordingAttachments::default());

        let ledger = LeaveHistoryLedger::new(history.clone());
        let workflow = LeaveWorkflow::new(
            leaves.clone(),
            users.clone(),
            ledger.clone(),
            attachments.clone(),
            notifier.clone(),
        );
        let queries = LeaveQueryService::new(leaves.clone(), users.clone());

        Self {
            users,
            leaves,
            history,
            notifier,
            attachments,
            ledger,
            workflow,
            queries,
        }
    }

    pub async fn add_user(&self, role: UserRole, manager: Option<Uuid>) -> User {
        let mut user = User::new(
            Name().fake(),
            SafeEmail().fake(),
            "$2b$12$not-a-real-hash".to_string(),
            role,
        );
        user.manager = manager;
        UserStore::create(self.users.as_ref(), &user)
            .await
            .expect("insert user");
        user
    }

    /// An employee reporting to a freshly created manager.
    pub async fn add_employee_with_manager(&self) -> (User, User) {
        let manager = self.add_user(UserRole::Manager, None).await;
        let employee = self.add_user(UserRole::Employee, Some(manager.id)).await;
        (employee, manager)
    }
}

pub fn leave_input(dates: Vec<NaiveDate>) -> LeaveInput {
    LeaveInput {
        dates,
        reason: "travel".to_string(),
        attachment: None,
    }
}

pub fn leave_input_with_attachment(dates: Vec<NaiveDate>, public_id: &str) -> LeaveInput {
    LeaveInput {
        dates,
        reason: "travel".to_string(),
        attachment: Some(AttachmentRef {
            url: format!("https://cdn.example.com/{public_id}"),
            public_id: public_id.to_string(),
        }),
    }
}

/// `count` consecutive weekdays starting a month out, so the past-date and
/// weekend rules never fire by accident.
pub fn future_weekdays(count: usize) -> Vec<NaiveDate> {
    let mut date = Utc::now().date_naive() + Duration::days(30);
    let mut dates = Vec::with_capacity(count);
    while dates.len() < count {
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            dates.push(date);
        }
        date += Duration::days(1);
    }
    dates
}

pub fn future_saturday() -> NaiveDate {
    let mut date = Utc::now().date_naive() + Duration::days(30);
    while date.weekday() != Weekday::Sat {
        date += Duration::days(1);
    }
    date
}

pub fn past_weekday() -> NaiveDate {
    let mut date = Utc::now().date_naive() - Duration::days(7);
    while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        date -= Duration::days(1);
    }
    date
}
