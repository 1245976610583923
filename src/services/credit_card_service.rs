//! Credit card service.
//!
//! Cards are owned through their account, so every account reference is
//! resolved with [`AccountService::get_account`] for the principal.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{CreditCard, NewCreditCard, UpdateCreditCard};
use crate::repositories::CreditCardRepository;
use crate::services::AccountService;

#[derive(Clone)]
pub struct CreditCardService {
    repo: Arc<dyn CreditCardRepository>,
    accounts: AccountService,
}

impl CreditCardService {
    pub fn new(repo: Arc<dyn CreditCardRepository>, accounts: AccountService) -> Self {
        Self { repo, accounts }
    }

    pub async fn create_credit_card(
        &self,
        user_id: i64,
        new_card: NewCreditCard,
    ) -> AppResult<CreditCard> {
        self.accounts.get_account(user_id, new_card.account_id).await?;

        let card = self.repo.create(new_card).await?;
        tracing::info!(credit_card_id = card.id, account_id = card.account_id, "Credit card created");
        Ok(card)
    }

    pub async fn get_credit_card(&self, user_id: i64, id: i64) -> AppResult<CreditCard> {
        self.repo
            .find_for_user(id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Credit card", id))
    }

    pub async fn list_credit_cards(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<CreditCard>, i64)> {
        self.repo.list_for_user(user_id, offset, limit).await
    }

    /// Partial update; moving the card requires owning the target account.
    pub async fn update_credit_card(
        &self,
        user_id: i64,
        id: i64,
        mut changes: UpdateCreditCard,
    ) -> AppResult<CreditCard> {
        let current = self.get_credit_card(user_id, id).await?;

        match changes.account_id {
            Some(account_id) if account_id == current.account_id => changes.account_id = None,
            Some(account_id) => {
                self.accounts.get_account(user_id, account_id).await?;
            }
            None => {}
        }

        if changes.is_empty() {
            return Ok(current);
        }
        self.repo.update(id, changes).await
    }

    pub async fn archive_credit_card(&self, user_id: i64, id: i64) -> AppResult<CreditCard> {
        let current = self.get_credit_card(user_id, id).await?;
        if current.archived {
            return Ok(current);
        }

        let card = self.repo.update(id, UpdateCreditCard::archive()).await?;
        tracing::info!(credit_card_id = id, user_id, "Credit card archived");
        Ok(card)
    }

    pub async fn delete_credit_card(&self, user_id: i64, id: i64) -> AppResult<()> {
        let current = self.get_credit_card(user_id, id).await?;
        if !current.archived {
            return Err(AppError::NotArchived {
                entity: "credit card".to_string(),
                id,
            });
        }

        self.repo.delete(id).await?;
        tracing::info!(credit_card_id = id, user_id, "Credit card deleted");
        Ok(())
    }
}
