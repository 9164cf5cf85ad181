//! Sign-in and sign-out handlers.
//!
//! Thin wrappers around the shared auth flow: the handler adapts the cookie
//! session, runs the flow, stashes any flash messages, and translates the
//! outcome into a redirect or a validation response. Both rejection causes
//! come back identical.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use tower_sessions::Session;

use tasknest_shared::auth::flow::{self, Credentials, SignIn};
use tasknest_shared::flash::FlashBag;
use tasknest_shared::validate::FieldError;

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::session::{stash_flash, CookieSession};

/// POST /signin
///
/// Redirects to the task list on success; responds 422 with the uniform
/// rejection otherwise.
pub async fn sign_in(
    State(state): State<AppState>,
    session: Session,
    Json(credentials): Json<Credentials>,
) -> ApiResult<Response> {
    let store = state.store();
    let handle = CookieSession::new(session.clone());
    let mut flash = FlashBag::new();

    let outcome = flow::sign_in(&store, &handle, &mut flash, &credentials).await?;

    match outcome {
        SignIn::Authenticated { redirect_to, .. } => {
            stash_flash(&session, &mut flash).await?;
            Ok(Redirect::to(redirect_to).into_response())
        }
        SignIn::Rejected { field, message } => Err(ApiError::ValidationError(vec![FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }])),
    }
}

/// POST /signout
///
/// Always succeeds and redirects home, session or no session.
pub async fn sign_out(session: Session) -> ApiResult<Response> {
    let handle = CookieSession::new(session.clone());
    let mut flash = FlashBag::new();

    let redirect_to = flow::sign_out(&handle, &mut flash).await;
    stash_flash(&session, &mut flash).await?;

    Ok(Redirect::to(redirect_to).into_response())
}
