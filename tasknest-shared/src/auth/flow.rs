//! Sign-in and sign-out flows.
//!
//! A sign-in attempt moves through lookup and verification and ends either
//! `Authenticated` or `Rejected`. Both rejection causes (unknown username,
//! wrong password) produce the identical message on the same field, so a
//! caller probing for accounts learns nothing from the response. Store and
//! hash failures propagate as errors and are never folded into `Rejected`.

use serde::Deserialize;

use crate::auth::password::{verify_password, PasswordError};
use crate::auth::session::{SessionError, SessionHandle};
use crate::flash::FlashBag;
use crate::models::user::User;
use crate::store::{StoreError, UserStore};

/// Rejection message shared by every failed attempt.
pub const INVALID_CREDENTIALS: &str = "invalid username/password";

/// Credentials submitted with a sign-in attempt.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Outcome of a sign-in attempt.
#[derive(Debug)]
pub enum SignIn {
    Authenticated {
        user: User,
        redirect_to: &'static str,
    },
    Rejected {
        field: &'static str,
        message: &'static str,
    },
}

/// Error type for infrastructure failures during auth.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

fn rejected() -> SignIn {
    SignIn::Rejected {
        field: "username",
        message: INVALID_CREDENTIALS,
    }
}

/// Runs one sign-in attempt.
///
/// The username is trimmed and lowercased before lookup. On success the
/// session is bound to the user and a welcome flash is queued; the outcome
/// carries the post-login redirect target.
pub async fn sign_in(
    store: &dyn UserStore,
    session: &dyn SessionHandle,
    flash: &mut FlashBag,
    credentials: &Credentials,
) -> Result<SignIn, AuthError> {
    let username = credentials.username.trim().to_lowercase();

    let user = match store.find_by_username(&username).await? {
        Some(user) => user,
        None => {
            tracing::debug!("sign-in rejected");
            return Ok(rejected());
        }
    };

    if !verify_password(&credentials.password, &user.password_hash)? {
        tracing::debug!("sign-in rejected");
        return Ok(rejected());
    }

    session.set_current_user(user.id).await?;
    flash.success("Welcome back!");
    tracing::info!(user_id = %user.id, "sign-in succeeded");

    Ok(SignIn::Authenticated {
        user,
        redirect_to: "/tasks",
    })
}

/// Signs the caller out unconditionally.
///
/// Clears the session whether or not one was active, queues the goodbye
/// flash, and returns the redirect target. There is no failure path.
pub async fn sign_out(session: &dyn SessionHandle, flash: &mut FlashBag) -> &'static str {
    session.clear().await;
    flash.success("You have been signed out.");
    "/"
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::auth::session::MemorySession;
    use crate::models::user::{Signup, User};
    use crate::store::memory::MemoryStore;

    use super::*;

    async fn registered_store(username: &str, password: &str) -> MemoryStore {
        let store = MemoryStore::new();
        User::register(
            &store,
            Signup {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                username: username.to_string(),
                password: password.to_string(),
                password_confirmation: password.to_string(),
            },
        )
        .await
        .expect("register");
        store
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_success_binds_session_and_flash() {
        let store = registered_store("ada", "secret123").await;
        let session = MemorySession::new();
        let mut flash = FlashBag::new();

        let outcome = sign_in(&store, &session, &mut flash, &credentials("ada", "secret123"))
            .await
            .expect("sign in");

        match outcome {
            SignIn::Authenticated { user, redirect_to } => {
                assert_eq!(user.username, "ada");
                assert_eq!(redirect_to, "/tasks");
                assert_eq!(session.current_user().await.unwrap(), Some(user.id));
            }
            other => panic!("expected authenticated, got {other:?}"),
        }

        let messages = flash.drain();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message, "Welcome back!");
    }

    #[tokio::test]
    async fn test_sign_in_is_case_insensitive() {
        let store = registered_store("Alice", "secret123").await;

        for attempt in ["alice", "ALICE", "  Alice  "] {
            let session = MemorySession::new();
            let mut flash = FlashBag::new();
            let outcome = sign_in(&store, &session, &mut flash, &credentials(attempt, "secret123"))
                .await
                .expect("sign in");
            assert!(
                matches!(outcome, SignIn::Authenticated { .. }),
                "'{attempt}' should authenticate"
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
        let store = registered_store("ada", "secret123").await;
        let session = MemorySession::new();
        let mut flash = FlashBag::new();

        let unknown = sign_in(&store, &session, &mut flash, &credentials("nobody", "secret123"))
            .await
            .expect("sign in");
        let wrong = sign_in(&store, &session, &mut flash, &credentials("ada", "wrong"))
            .await
            .expect("sign in");

        match (unknown, wrong) {
            (
                SignIn::Rejected { field: f1, message: m1 },
                SignIn::Rejected { field: f2, message: m2 },
            ) => {
                assert_eq!(f1, f2);
                assert_eq!(m1, m2);
                assert_eq!(m1, INVALID_CREDENTIALS);
                assert_eq!(f1, "username");
            }
            other => panic!("expected two rejections, got {other:?}"),
        }

        assert_eq!(session.current_user().await.unwrap(), None);
        assert!(flash.is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_an_error_not_a_rejection() {
        let store = MemoryStore::new();
        store.fail_with("connection refused");
        let session = MemorySession::new();
        let mut flash = FlashBag::new();

        let err = sign_in(&store, &session, &mut flash, &credentials("ada", "secret123"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Store(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_sign_out_clears_active_session() {
        let store = registered_store("ada", "secret123").await;
        let session = MemorySession::new();
        let mut flash = FlashBag::new();
        sign_in(&store, &session, &mut flash, &credentials("ada", "secret123"))
            .await
            .expect("sign in");
        flash.drain();

        let redirect = sign_out(&session, &mut flash).await;

        assert_eq!(redirect, "/");
        assert_eq!(session.current_user().await.unwrap(), None);
        let messages = flash.drain();
        assert_eq!(messages[0].message, "You have been signed out.");
    }

    #[tokio::test]
    async fn test_sign_out_without_session_still_succeeds() {
        let session = MemorySession::new();
        let mut flash = FlashBag::new();

        let redirect = sign_out(&session, &mut flash).await;

        assert_eq!(redirect, "/");
        assert_eq!(session.current_user().await.unwrap(), None);
        assert_eq!(flash.drain().len(), 1);
    }

    #[tokio::test]
    async fn test_rejection_never_binds_session() {
        let store = registered_store("ada", "secret123").await;
        let session = MemorySession::new();
        session.set_current_user(Uuid::new_v4()).await.unwrap();
        let previous = session.current_user().await.unwrap();
        let mut flash = FlashBag::new();

        sign_in(&store, &session, &mut flash, &credentials("ada", "wrong"))
            .await
            .expect("sign in");

        // A failed attempt leaves whatever session existed untouched
        assert_eq!(session.current_user().await.unwrap(), previous);
    }
}
