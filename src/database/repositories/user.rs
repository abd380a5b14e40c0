use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{ListOptions, User, UserRole},
    utils::sql,
};

/// Storage port for the user directory. The workflow resolves requesters,
/// managers and reviewers through this; the handlers drive the thin CRUD.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: &User) -> Result<()>;
    async fn update(&self, user: &User) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn email_exists(&self, email: &str) -> Result<bool>;
    async fn list_all(&self) -> Result<Vec<User>>;
    async fn list_paged(&self, opts: &ListOptions) -> Result<Vec<User>>;
    async fn count(&self) -> Result<i64>;
    async fn list_by_manager(&self, manager_id: Uuid, opts: &ListOptions) -> Result<Vec<User>>;
    async fn count_by_manager(&self, manager_id: Uuid) -> Result<i64>;
    async fn list_managers(&self) -> Result<Vec<User>>;
}

const USER_COLUMNS: &str = r#"
    id,
    name,
    email,
    password_hash,
    role,
    manager,
    created_by,
    last_modified_by,
    created_at,
    updated_at
"#;

/// Maps the caller-supplied sort field to a real column; anything outside
/// the whitelist falls back to created_at.
fn order_clause(opts: &ListOptions) -> String {
    let column = match opts.sort_field.as_deref() {
        Some("name") => "name",
        Some("email") => "email",
        Some("role") => "role",
        Some("updatedAt") => "updated_at",
        _ => "created_at",
    };
    let direction = if opts.ascending { "ASC" } else { "DESC" };
    format!(
        " ORDER BY {} {} LIMIT {} OFFSET {}",
        column, direction, opts.limit, opts.offset
    )
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, user: &User) -> Result<()> {
        sqlx::query(&sql(r#"
            INSERT INTO
                users (
                    id,
                    name,
                    email,
                    password_hash,
                    role,
                    manager,
                    created_by,
                    last_modified_by,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.manager)
        .bind(user.created_by)
        .bind(user.last_modified_by)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, user: &User) -> Result<()> {
        sqlx::query(&sql(r#"
            UPDATE users
            SET
                name = ?,
                email = ?,
                password_hash = ?,
                role = ?,
                manager = ?,
                last_modified_by = ?,
                updated_at = ?
            WHERE
                id = ?
        "#))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.manager)
        .bind(user.last_modified_by)
        .bind(Utc::now())
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&sql(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&sql(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        )))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&sql(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        )))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn list_paged(&self, opts: &ListOptions) -> Result<Vec<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users{}", order_clause(opts));
        let users = sqlx::query_as::<_, User>(&sql(&query))
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn list_by_manager(&self, manager_id: Uuid, opts: &ListOptions) -> Result<Vec<User>> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE manager = ?{}",
            order_clause(opts)
        );
        let users = sqlx::query_as::<_, User>(&sql(&query))
            .bind(manager_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn count_by_manager(&self, manager_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE manager = $1")
            .bind(manager_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn list_managers(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&sql(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE role IN (?, ?)
            ORDER BY name ASC
            "#
        )))
        .bind(UserRole::Manager)
        .bind(UserRole::Admin)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
