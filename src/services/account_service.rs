//! Account service: ownership-scoped CRUD and the archive-before-delete rule.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{Account, NewAccount, UpdateAccount};
use crate::repositories::AccountRepository;

#[derive(Clone)]
pub struct AccountService {
    repo: Arc<dyn AccountRepository>,
}

impl AccountService {
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_account(&self, new_account: NewAccount) -> AppResult<Account> {
        let account = self.repo.create(new_account).await?;
        tracing::info!(account_id = account.id, user_id = account.user_id, "Account created");
        Ok(account)
    }

    /// Accounts owned by someone else are reported as not found.
    pub async fn get_account(&self, user_id: i64, id: i64) -> AppResult<Account> {
        self.repo
            .find_for_user(id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Account", id))
    }

    pub async fn list_accounts(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Account>, i64)> {
        self.repo.list_for_user(user_id, offset, limit).await
    }

    pub async fn update_account(
        &self,
        user_id: i64,
        id: i64,
        changes: UpdateAccount,
    ) -> AppResult<Account> {
        let current = self.get_account(user_id, id).await?;
        if changes.is_empty() {
            return Ok(current);
        }
        self.repo.update(id, changes).await
    }

    /// Idempotent: archiving an archived account returns it unchanged.
    pub async fn archive_account(&self, user_id: i64, id: i64) -> AppResult<Account> {
        let current = self.get_account(user_id, id).await?;
        if current.archived {
            return Ok(current);
        }

        let account = self.repo.update(id, UpdateAccount::archive()).await?;
        tracing::info!(account_id = id, user_id, "Account archived");
        Ok(account)
    }

    /// Deletes an archived account together with its credit cards.
    pub async fn delete_account(&self, user_id: i64, id: i64) -> AppResult<()> {
        let current = self.get_account(user_id, id).await?;
        if !current.archived {
            return Err(AppError::NotArchived {
                entity: "account".to_string(),
                id,
            });
        }

        self.repo.delete(id).await?;
        tracing::info!(account_id = id, user_id, "Account deleted");
        Ok(())
    }
}
