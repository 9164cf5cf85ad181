//! User registration handler.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use validator::Validate;

use tasknest_shared::models::user::{Signup, User};

use crate::app::AppState;
use crate::error::{validation_details, ApiError, ApiResult};

/// Registration request body.
///
/// Shape limits are checked here; the domain rules (presence, uniqueness,
/// password confirmation) run in the model before anything is hashed or
/// written.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(max = 255, message = "First Name is too long."))]
    pub first_name: String,

    #[validate(length(max = 255, message = "Last Name is too long."))]
    pub last_name: String,

    #[validate(length(max = 255, message = "Username is too long."))]
    pub username: String,

    pub password: String,

    pub password_confirmation: String,
}

/// POST /users
///
/// Responds 201 with the created user (hash omitted) or 422 with the ordered
/// failure list.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    if let Err(errors) = request.validate() {
        return Err(ApiError::ValidationError(validation_details(&errors)));
    }

    let store = state.store();
    let user = User::register(
        &store,
        Signup {
            first_name: request.first_name,
            last_name: request.last_name,
            username: request.username,
            password: request.password,
            password_confirmation: request.password_confirmation,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user)))
}
