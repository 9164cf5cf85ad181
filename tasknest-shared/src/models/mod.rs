//! Domain models and their write operations.

use crate::auth::password::PasswordError;
use crate::store::StoreError;
use crate::validate::Errors;

pub mod task;
pub mod user;

/// Error type for model write operations.
///
/// Validation failures carry the ordered field errors; infrastructure
/// failures pass through untouched so callers can tell the two apart.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Input failed validation
    #[error("Validation failed with {} error(s)", .0.len())]
    Invalid(Errors),

    /// Store operation failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Password hashing failed
    #[error(transparent)]
    Password(#[from] PasswordError),
}
