//! Session seam between the auth flow and the HTTP layer.
//!
//! The flow only needs to record, read, and clear the signed-in user id, so
//! it talks to a [`SessionHandle`] trait. The API crate implements it over
//! its cookie session; tests use the in-memory [`MemorySession`].

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

/// Error type for session storage operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The backing session store failed
    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}

/// Per-request handle on the caller's session.
#[async_trait]
pub trait SessionHandle: Send + Sync {
    /// Binds the session to `user_id`.
    async fn set_current_user(&self, user_id: Uuid) -> Result<(), SessionError>;

    /// Returns the signed-in user id, if any.
    async fn current_user(&self) -> Result<Option<Uuid>, SessionError>;

    /// Discards the session. Clearing an empty session is a no-op, never an
    /// error.
    async fn clear(&self);
}

/// In-memory session for tests.
#[derive(Debug, Default)]
pub struct MemorySession {
    current: Mutex<Option<Uuid>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionHandle for MemorySession {
    async fn set_current_user(&self, user_id: Uuid) -> Result<(), SessionError> {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = Some(user_id);
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<Uuid>, SessionError> {
        let current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        Ok(*current)
    }

    async fn clear(&self) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_session_roundtrip() {
        let session = MemorySession::new();
        assert_eq!(session.current_user().await.unwrap(), None);

        let id = Uuid::new_v4();
        session.set_current_user(id).await.unwrap();
        assert_eq!(session.current_user().await.unwrap(), Some(id));

        session.clear().await;
        assert_eq!(session.current_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_without_session_is_noop() {
        let session = MemorySession::new();
        session.clear().await;
        assert_eq!(session.current_user().await.unwrap(), None);
    }
}
