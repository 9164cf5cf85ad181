//! Typed repository traits over user and task persistence.
//!
//! Handlers and validators depend on these traits rather than on a concrete
//! database, so the same code paths run against Postgres in production and
//! against [`memory::MemoryStore`] in tests. Store failures surface as
//! [`StoreError`], never as validation failures.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::task::Task;
use crate::models::user::User;

pub mod memory;
pub mod postgres;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database query failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Store is unreachable or deliberately failing (test poisoning)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Repository of user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Looks up a user by username, case-insensitively.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Whether another record holds `username` (case-insensitive), excluding
    /// the record identified by `excluding` when given.
    async fn username_taken(
        &self,
        username: &str,
        excluding: Option<Uuid>,
    ) -> Result<bool, StoreError>;

    async fn insert_user(&self, user: &User) -> Result<User, StoreError>;

    async fn update_user(&self, user: &User) -> Result<User, StoreError>;
}

/// Repository of task records.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, StoreError>;

    /// Fetches a task only if it belongs to `user_id`.
    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<Task>, StoreError>;

    async fn insert_task(&self, task: &Task) -> Result<Task, StoreError>;

    async fn update_task(&self, task: &Task) -> Result<Task, StoreError>;

    /// Deletes the task if it belongs to `user_id`. Returns whether a row was
    /// removed.
    async fn delete_task(&self, id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;
}
