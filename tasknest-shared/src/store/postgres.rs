//! Postgres-backed store.
//!
//! Runtime-bound `sqlx::query_as` throughout; username comparisons go through
//! `LOWER(username)` so they hit the unique expression index that guards
//! registration under concurrency.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::task::Task;
use crate::models::user::User;

use super::{StoreError, TaskStore, UserStore};

/// Store over a shared connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, username, password_hash,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, username, password_hash,
                   created_at, updated_at
            FROM users
            WHERE LOWER(username) = LOWER($1)
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn username_taken(
        &self,
        username: &str,
        excluding: Option<Uuid>,
    ) -> Result<bool, StoreError> {
        let (taken,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE LOWER(username) = LOWER($1)
                  AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(username)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn insert_user(&self, user: &User) -> Result<User, StoreError> {
        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, first_name, last_name, username, password_hash,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, first_name, last_name, username, password_hash,
                      created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn update_user(&self, user: &User) -> Result<User, StoreError> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = $2, last_name = $3, username = $4,
                password_hash = $5, updated_at = $6
            WHERE id = $1
            RETURNING id, first_name, last_name, username, password_hash,
                      created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, details, completed, created_at, updated_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, details, completed, created_at, updated_at
            FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn insert_task(&self, task: &Task) -> Result<Task, StoreError> {
        let inserted = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (id, user_id, title, details, completed,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, title, details, completed, created_at, updated_at
            "#,
        )
        .bind(task.id)
        .bind(task.user_id)
        .bind(&task.title)
        .bind(&task.details)
        .bind(task.completed)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn update_task(&self, task: &Task) -> Result<Task, StoreError> {
        let updated = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $3, details = $4, completed = $5, updated_at = $6
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, details, completed, created_at, updated_at
            "#,
        )
        .bind(task.id)
        .bind(task.user_id)
        .bind(&task.title)
        .bind(&task.details)
        .bind(task.completed)
        .bind(task.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete_task(&self, id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// Integration tests for the Postgres store live in tests/store_tests.rs and
// are gated on DATABASE_URL.
