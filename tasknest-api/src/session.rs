//! Cookie session plumbing.
//!
//! [`CookieSession`] adapts the tower-sessions request session to the shared
//! [`SessionHandle`] seam so the auth flow stays independent of the HTTP
//! layer. Flash messages are stashed under their own session key and drained
//! on the next page render.

use async_trait::async_trait;
use tower_sessions::Session;
use uuid::Uuid;

use tasknest_shared::auth::session::{SessionError, SessionHandle};
use tasknest_shared::flash::{FlashBag, FlashMessage};

/// Session key holding the signed-in user's id
pub const CURRENT_USER_KEY: &str = "current_user_id";

const FLASH_KEY: &str = "flash_messages";

/// The request's cookie session, seen through the shared session seam.
#[derive(Clone)]
pub struct CookieSession {
    inner: Session,
}

impl CookieSession {
    pub fn new(inner: Session) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl SessionHandle for CookieSession {
    async fn set_current_user(&self, user_id: Uuid) -> Result<(), SessionError> {
        self.inner
            .insert(CURRENT_USER_KEY, user_id)
            .await
            .map_err(|e| SessionError::Unavailable(e.to_string()))
    }

    async fn current_user(&self) -> Result<Option<Uuid>, SessionError> {
        self.inner
            .get::<Uuid>(CURRENT_USER_KEY)
            .await
            .map_err(|e| SessionError::Unavailable(e.to_string()))
    }

    async fn clear(&self) {
        // Sign-out must not fail; a broken session store still ends the
        // session from the client's point of view.
        if let Err(e) = self.inner.flush().await {
            tracing::warn!("Failed to flush session: {}", e);
        }
    }
}

/// Appends the bag's messages to the session's flash stash.
pub async fn stash_flash(session: &Session, flash: &mut FlashBag) -> Result<(), SessionError> {
    if flash.is_empty() {
        return Ok(());
    }

    let mut stashed: Vec<FlashMessage> = session
        .get(FLASH_KEY)
        .await
        .map_err(|e| SessionError::Unavailable(e.to_string()))?
        .unwrap_or_default();
    stashed.extend(flash.drain());

    session
        .insert(FLASH_KEY, stashed)
        .await
        .map_err(|e| SessionError::Unavailable(e.to_string()))
}

/// Takes all stashed flash messages, emptying the stash.
pub async fn take_flash(session: &Session) -> Result<Vec<FlashMessage>, SessionError> {
    let stashed: Option<Vec<FlashMessage>> = session
        .remove(FLASH_KEY)
        .await
        .map_err(|e| SessionError::Unavailable(e.to_string()))?;
    Ok(stashed.unwrap_or_default())
}
