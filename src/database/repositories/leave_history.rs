use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{LeaveHistoryDetail, LeaveHistoryEntry},
    utils::sql,
};

/// Storage port for the audit trail. Append and read only; there is no
/// update or delete on purpose.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn insert(&self, entry: &LeaveHistoryEntry) -> Result<()>;
    async fn list_for_leave(&self, leave_id: Uuid) -> Result<Vec<LeaveHistoryDetail>>;
}

#[derive(Clone)]
pub struct LeaveHistoryRepository {
    pool: PgPool,
}

impl LeaveHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for LeaveHistoryRepository {
    async fn insert(&self, entry: &LeaveHistoryEntry) -> Result<()> {
        sqlx::query(&sql(r#"
            INSERT INTO
                leave_history (
                    id,
                    leave_id,
                    user_id,
                    action,
                    status_change,
                    message,
                    change,
                    created_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?)
        "#))
        .bind(entry.id)
        .bind(entry.leave_id)
        .bind(entry.user_id)
        .bind(entry.action)
        .bind(entry.status_change)
        .bind(&entry.message)
        .bind(&entry.change)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_leave(&self, leave_id: Uuid) -> Result<Vec<LeaveHistoryDetail>> {
        // LEFT JOINs because the actor and the leave may be gone; DELETED
        // entries in particular outlive their leave row.
        let entries = sqlx::query_as::<_, LeaveHistoryDetail>(&sql(r#"
            SELECT
                h.id,
                h.leave_id,
                h.user_id,
                h.action,
                h.status_change,
                h.message,
                h.change,
                h.created_at,
                u.name AS actor_name,
                u.role AS actor_role,
                l.reason AS leave_reason
            FROM leave_history h
            LEFT JOIN users u ON u.id = h.user_id
            LEFT JOIN leaves l ON l.id = h.leave_id
            WHERE
                h.leave_id = ?
            ORDER BY
                h.created_at ASC
        "#))
        .bind(leave_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
