use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{Leave, LeaveDetails, LeaveStatus, ListOptions},
    utils::sql,
};

/// Storage port for leave requests: lifecycle writes used by the workflow
/// plus the joined listings the query service reads.
#[async_trait]
pub trait LeaveStore: Send + Sync {
    async fn create(&self, leave: &Leave) -> Result<()>;
    async fn update(&self, leave: &Leave) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Leave>>;
    /// All non-rejected leaves of `user_id` sharing at least one day with
    /// `dates`.
    async fn find_conflicting(&self, user_id: Uuid, dates: &[NaiveDate]) -> Result<Vec<Leave>>;
    async fn list_for_user(&self, user_id: Uuid, opts: &ListOptions) -> Result<Vec<LeaveDetails>>;
    async fn count_for_user(&self, user_id: Uuid) -> Result<i64>;
    async fn list_all(&self, opts: &ListOptions) -> Result<Vec<LeaveDetails>>;
    async fn count_all(&self) -> Result<i64>;
    async fn list_for_users(
        &self,
        user_ids: &[Uuid],
        opts: &ListOptions,
    ) -> Result<Vec<LeaveDetails>>;
    async fn count_for_users(&self, user_ids: &[Uuid]) -> Result<i64>;
}

const LEAVE_COLUMNS: &str = r#"
    id,
    user_id,
    leave_dates,
    reason,
    status,
    reviewed_by,
    attachment_url,
    attachment_public_id,
    created_by,
    last_modified_by,
    created_at,
    updated_at
"#;

/// Listing shape: the leave plus requester/reviewer name and email.
const DETAIL_SELECT: &str = r#"
    SELECT
        l.id,
        l.user_id,
        l.leave_dates,
        l.reason,
        l.status,
        l.reviewed_by,
        l.attachment_url,
        l.attachment_public_id,
        l.created_at,
        l.updated_at,
        u.name AS requester_name,
        u.email AS requester_email,
        r.name AS reviewer_name,
        r.email AS reviewer_email
    FROM leaves l
    LEFT JOIN users u ON u.id = l.user_id
    LEFT JOIN users r ON r.id = l.reviewed_by
"#;

fn order_clause(opts: &ListOptions) -> String {
    let column = match opts.sort_field.as_deref() {
        Some("status") => "l.status",
        Some("reason") => "l.reason",
        Some("updatedAt") => "l.updated_at",
        _ => "l.created_at",
    };
    let direction = if opts.ascending { "ASC" } else { "DESC" };
    format!(
        " ORDER BY {} {} LIMIT {} OFFSET {}",
        column, direction, opts.limit, opts.offset
    )
}

#[derive(Clone)]
pub struct LeaveRepository {
    pool: PgPool,
}

impl LeaveRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaveStore for LeaveRepository {
    async fn create(&self, leave: &Leave) -> Result<()> {
        sqlx::query(&sql(r#"
            INSERT INTO
                leaves (
                    id,
                    user_id,
                    leave_dates,
                    reason,
                    status,
                    reviewed_by,
                    attachment_url,
                    attachment_public_id,
                    created_by,
                    last_modified_by,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#))
        .bind(leave.id)
        .bind(leave.user_id)
        .bind(&leave.leave_dates)
        .bind(&leave.reason)
        .bind(leave.status)
        .bind(leave.reviewed_by)
        .bind(&leave.attachment_url)
        .bind(&leave.attachment_public_id)
        .bind(leave.created_by)
        .bind(leave.last_modified_by)
        .bind(leave.created_at)
        .bind(leave.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, leave: &Leave) -> Result<()> {
        sqlx::query(&sql(r#"
            UPDATE leaves
            SET
                leave_dates = ?,
                reason = ?,
                status = ?,
                reviewed_by = ?,
                attachment_url = ?,
                attachment_public_id = ?,
                last_modified_by = ?,
                updated_at = ?
            WHERE
                id = ?
        "#))
        .bind(&leave.leave_dates)
        .bind(&leave.reason)
        .bind(leave.status)
        .bind(leave.reviewed_by)
        .bind(&leave.attachment_url)
        .bind(&leave.attachment_public_id)
        .bind(leave.last_modified_by)
        .bind(leave.updated_at)
        .bind(leave.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM leaves WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Leave>> {
        let leave = sqlx::query_as::<_, Leave>(&sql(&format!(
            "SELECT {LEAVE_COLUMNS} FROM leaves WHERE id = ?"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(leave)
    }

    async fn find_conflicting(&self, user_id: Uuid, dates: &[NaiveDate]) -> Result<Vec<Leave>> {
        // && is the array-overlap operator; the GIN index on leave_dates
        // serves this.
        let conflicts = sqlx::query_as::<_, Leave>(&sql(&format!(
            r#"
            SELECT {LEAVE_COLUMNS}
            FROM leaves
            WHERE
                user_id = ?
                AND status <> ?
                AND leave_dates && ?
            "#
        )))
        .bind(user_id)
        .bind(LeaveStatus::Rejected)
        .bind(dates)
        .fetch_all(&self.pool)
        .await?;

        Ok(conflicts)
    }

    async fn list_for_user(&self, user_id: Uuid, opts: &ListOptions) -> Result<Vec<LeaveDetails>> {
        let query = format!("{DETAIL_SELECT} WHERE l.user_id = ?{}", order_clause(opts));
        let leaves = sqlx::query_as::<_, LeaveDetails>(&sql(&query))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(leaves)
    }

    async fn count_for_user(&self, user_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM leaves WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn list_all(&self, opts: &ListOptions) -> Result<Vec<LeaveDetails>> {
        let query = format!("{DETAIL_SELECT}{}", order_clause(opts));
        let leaves = sqlx::query_as::<_, LeaveDetails>(&sql(&query))
            .fetch_all(&self.pool)
            .await?;

        Ok(leaves)
    }

    async fn count_all(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM leaves")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn list_for_users(
        &self,
        user_ids: &[Uuid],
        opts: &ListOptions,
    ) -> Result<Vec<LeaveDetails>> {
        let query = format!(
            "{DETAIL_SELECT} WHERE l.user_id = ANY(?){}",
            order_clause(opts)
        );
        let leaves = sqlx::query_as::<_, LeaveDetails>(&sql(&query))
            .bind(user_ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(leaves)
    }

    async fn count_for_users(&self, user_ids: &[Uuid]) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM leaves WHERE user_id = ANY($1)")
                .bind(user_ids)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
