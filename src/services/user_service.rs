//! User service for business logic operations.
//!
//! Registration, self-service profile reads and updates, and account removal.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, UpdateUser, User};
use crate::repositories::UserRepository;
use crate::utils::password::hash_password;

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Registers a user. `new_user.password` is plain text and is hashed here.
    pub async fn create_user(&self, mut new_user: NewUser) -> AppResult<User> {
        if self.repo.find_by_email(&new_user.email).await?.is_some() {
            return Err(AppError::already_exists("User", "email", new_user.email));
        }

        new_user.password = hash_password(&new_user.password)?;
        let user = self.repo.create(new_user).await?;
        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Loads a user by id without ownership checks (the principal itself).
    pub async fn find_user(&self, id: i64) -> AppResult<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User", id))
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.repo.find_by_email(email).await
    }

    /// Reads the principal's own record; any other id is reported as missing.
    pub async fn get_user(&self, principal_id: i64, id: i64) -> AppResult<User> {
        if principal_id != id {
            return Err(AppError::not_found("User", id));
        }
        self.find_user(id).await
    }

    /// Partial update of the principal's own record.
    ///
    /// Email uniqueness is only checked when the email actually changes and a
    /// new password is re-hashed.
    pub async fn update_user(
        &self,
        principal_id: i64,
        id: i64,
        mut changes: UpdateUser,
    ) -> AppResult<User> {
        let current = self.get_user(principal_id, id).await?;

        if changes.email.as_deref() == Some(current.email.as_str()) {
            changes.email = None;
        }
        if let Some(email) = &changes.email {
            if self.repo.find_by_email(email).await?.is_some() {
                return Err(AppError::already_exists("User", "email", email.clone()));
            }
        }
        if let Some(password) = changes.password.take() {
            changes.password = Some(hash_password(&password)?);
        }

        if changes.is_empty() {
            return Ok(current);
        }

        let user = self.repo.update(id, changes).await?;
        tracing::info!(user_id = user.id, "User updated");
        Ok(user)
    }

    /// Deletes the principal's own record; owned data cascades.
    pub async fn delete_user(&self, principal_id: i64, id: i64) -> AppResult<()> {
        self.get_user(principal_id, id).await?;
        self.repo.delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}
