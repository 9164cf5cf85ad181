//! User model, registration, and profile updates.
//!
//! Validation is explicit and runs before every write. Registration checks
//! presence, uniqueness, and the password pair before any hash is computed;
//! an invalid form never touches the hasher or the store.
//!
//! Usernames are normalized to lowercase on the way in and compared
//! case-insensitively everywhere. The in-process uniqueness check is
//! advisory; the database's unique index on `LOWER(username)` is the
//! authoritative guard under concurrent registration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::store::{StoreError, UserStore};
use crate::validate::Errors;

use super::ModelError;

/// A registered user account.
///
/// The password hash never serializes outward.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,

    pub first_name: String,

    pub last_name: String,

    /// Stored lowercase; unique case-insensitively
    pub username: String,

    /// Argon2id hash, never plaintext
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Registration form.
///
/// `password` and `password_confirmation` are transient; neither is ever
/// written to storage.
#[derive(Debug, Clone, Deserialize)]
pub struct Signup {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Profile fields a signed-in user may change without re-entering a password.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

impl Signup {
    /// Username as it will be stored: trimmed and lowercased.
    pub fn normalized_username(&self) -> String {
        self.username.trim().to_lowercase()
    }

    /// Validates the form against presence, uniqueness, and the password
    /// pair.
    ///
    /// Field failures accumulate in order; a store failure during the
    /// uniqueness query aborts with `StoreError` rather than passing
    /// silently.
    pub async fn validate(&self, store: &dyn UserStore) -> Result<Errors, StoreError> {
        let mut errors = Errors::new();

        errors.check_presence("first_name", &self.first_name, "First Name can not be blank.");
        errors.check_presence("last_name", &self.last_name, "Last Name can not be blank.");
        let has_username =
            errors.check_presence("username", &self.username, "Username can not be blank.");

        if has_username && store.username_taken(&self.normalized_username(), None).await? {
            errors.add("username", format!("{} already taken.", self.username));
        }

        errors.check_presence("password", &self.password, "Password can not be blank.");
        if self.password != self.password_confirmation {
            errors.add("password_confirmation", "Passwords do not match.");
        }

        Ok(errors)
    }
}

impl User {
    /// Validates a persisted record before an update.
    ///
    /// Uniqueness excludes the record itself so a user can keep their own
    /// username.
    pub async fn validate(&self, store: &dyn UserStore) -> Result<Errors, StoreError> {
        let mut errors = Errors::new();

        errors.check_presence("first_name", &self.first_name, "First Name can not be blank.");
        errors.check_presence("last_name", &self.last_name, "Last Name can not be blank.");
        let has_username =
            errors.check_presence("username", &self.username, "Username can not be blank.");
        errors.check_presence(
            "password_hash",
            &self.password_hash,
            "Password Hash can not be blank.",
        );

        if has_username && store.username_taken(&self.username, Some(self.id)).await? {
            errors.add("username", format!("{} already taken.", self.username));
        }

        Ok(errors)
    }

    /// Registers a new user.
    ///
    /// Validation runs first; only a fully valid form is hashed and inserted.
    pub async fn register(store: &dyn UserStore, signup: Signup) -> Result<User, ModelError> {
        let errors = signup.validate(store).await?;
        if !errors.is_empty() {
            return Err(ModelError::Invalid(errors));
        }

        let password_hash = hash_password(&signup.password)?;
        let now = Utc::now();
        let username = signup.normalized_username();
        let user = User {
            id: Uuid::new_v4(),
            first_name: signup.first_name,
            last_name: signup.last_name,
            username,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        let created = store.insert_user(&user).await?;
        tracing::info!(user_id = %created.id, username = %created.username, "user registered");
        Ok(created)
    }

    /// Applies a profile update. Password rules do not run here.
    pub async fn apply_profile(
        mut self,
        store: &dyn UserStore,
        update: ProfileUpdate,
    ) -> Result<User, ModelError> {
        self.first_name = update.first_name;
        self.last_name = update.last_name;
        self.username = update.username.trim().to_lowercase();
        self.updated_at = Utc::now();

        let errors = self.validate(store).await?;
        if !errors.is_empty() {
            return Err(ModelError::Invalid(errors));
        }

        Ok(store.update_user(&self).await?)
    }

    /// Changes the password after re-checking the pair rules, then rehashes.
    pub async fn change_password(
        mut self,
        store: &dyn UserStore,
        password: &str,
        password_confirmation: &str,
    ) -> Result<User, ModelError> {
        let mut errors = Errors::new();
        errors.check_presence("password", password, "Password can not be blank.");
        if password != password_confirmation {
            errors.add("password_confirmation", "Passwords do not match.");
        }
        if !errors.is_empty() {
            return Err(ModelError::Invalid(errors));
        }

        self.password_hash = hash_password(password)?;
        self.updated_at = Utc::now();

        let errors = self.validate(store).await?;
        if !errors.is_empty() {
            return Err(ModelError::Invalid(errors));
        }

        Ok(store.update_user(&self).await?)
    }
}
