//! Informational page payloads.
//!
//! The landing page drains flash messages stashed by previous requests
//! (sign-out lands here); about and news are static.

use axum::Json;
use serde::Serialize;
use tower_sessions::Session;

use tasknest_shared::flash::FlashMessage;

use crate::error::ApiResult;
use crate::session::take_flash;

/// Page payload with any pending notices.
#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub title: String,
    pub message: String,
    pub notices: Vec<FlashMessage>,
}

/// GET /
pub async fn home(session: Session) -> ApiResult<Json<PageResponse>> {
    let notices = take_flash(&session).await?;

    Ok(Json(PageResponse {
        title: "TaskNest".to_string(),
        message: "Keep every task in the nest.".to_string(),
        notices,
    }))
}

/// GET /about
pub async fn about() -> Json<PageResponse> {
    Json(PageResponse {
        title: "About".to_string(),
        message: "TaskNest is a small task manager for people who like lists.".to_string(),
        notices: Vec::new(),
    })
}

/// GET /news
pub async fn news() -> Json<PageResponse> {
    Json(PageResponse {
        title: "News".to_string(),
        message: "Nothing new under the sun.".to_string(),
        notices: Vec::new(),
    })
}
