//! In-memory repositories.
//!
//! One [`InMemoryStore`] implements every repository trait over shared
//! tables, mirroring the PostgreSQL constraints: unique user email, unique
//! category name, foreign keys, and cascading deletes. Used by tests and for
//! running the API without a database.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::models::{
    Account, Category, CreditCard, NewAccount, NewCategory, NewCreditCard, NewUser,
    UpdateAccount, UpdateCategory, UpdateCreditCard, UpdateUser, User,
};
use crate::repositories::{
    AccountRepository, CategoryRepository, CreditCardRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    accounts: BTreeMap<i64, Account>,
    categories: BTreeMap<i64, Category>,
    credit_cards: BTreeMap<i64, CreditCard>,
    last_id: i64,
}

impl Tables {
    // One sequence shared by all tables is enough for tests.
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.categories
            .values()
            .any(|c| c.name == name && Some(c.id) != except)
    }

    fn remove_account(&mut self, account_id: i64) -> usize {
        let removed = self.accounts.remove(&account_id).map_or(0, |_| 1);
        self.credit_cards.retain(|_, card| card.account_id != account_id);
        removed
    }

    fn account_owner(&self, account_id: i64) -> Option<i64> {
        self.accounts.get(&account_id).map(|a| a.user_id)
    }
}

fn page<T: Clone>(rows: Vec<&T>, offset: i64, limit: i64) -> (Vec<T>, i64) {
    let total = rows.len() as i64;
    let items = rows
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect();
    (items, total)
}

fn missing_reference(field: &str) -> AppError {
    AppError::Validation {
        field: field.to_string(),
        reason: "Referenced record does not exist".to_string(),
    }
}

/// Shared in-memory tables; clones see the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> AppResult<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| AppError::Internal {
            source: anyhow::anyhow!("In-memory store lock poisoned"),
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut tables = self.tables()?;
        if tables.email_taken(&new_user.email, None) {
            return Err(AppError::already_exists("User", "email", new_user.email));
        }

        let user = User {
            id: tables.next_id(),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            password: new_user.password,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, user_id: i64) -> AppResult<Option<User>> {
        Ok(self.tables()?.users.get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .tables()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update(&self, user_id: i64, changes: UpdateUser) -> AppResult<User> {
        let mut tables = self.tables()?;
        if let Some(email) = &changes.email {
            if tables.email_taken(email, Some(user_id)) {
                return Err(AppError::already_exists("User", "email", email.clone()));
            }
        }

        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::not_found("User", user_id))?;
        if let Some(value) = changes.first_name {
            user.first_name = value;
        }
        if let Some(value) = changes.last_name {
            user.last_name = value;
        }
        if let Some(value) = changes.email {
            user.email = value;
        }
        if let Some(value) = changes.password {
            user.password = value;
        }
        Ok(user.clone())
    }

    async fn delete(&self, user_id: i64) -> AppResult<usize> {
        let mut tables = self.tables()?;
        let Some(_) = tables.users.remove(&user_id) else {
            return Ok(0);
        };

        let owned: Vec<i64> = tables
            .accounts
            .values()
            .filter(|a| a.user_id == user_id)
            .map(|a| a.id)
            .collect();
        for account_id in owned {
            tables.remove_account(account_id);
        }
        tables.categories.retain(|_, c| c.user_id != user_id);
        Ok(1)
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn create(&self, new_account: NewAccount) -> AppResult<Account> {
        let mut tables = self.tables()?;
        if !tables.users.contains_key(&new_account.user_id) {
            return Err(missing_reference("user_id"));
        }

        let account = Account {
            id: tables.next_id(),
            initial_amount: new_account.initial_amount,
            financial_institution: new_account.financial_institution,
            description: new_account.description,
            account_type: new_account.account_type,
            color: new_account.color,
            icon: new_account.icon,
            archived: false,
            user_id: new_account.user_id,
        };
        tables.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_for_user(&self, account_id: i64, owner_id: i64) -> AppResult<Option<Account>> {
        Ok(self
            .tables()?
            .accounts
            .get(&account_id)
            .filter(|a| a.user_id == owner_id)
            .cloned())
    }

    async fn list_for_user(
        &self,
        owner_id: i64,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Account>, i64)> {
        let tables = self.tables()?;
        let rows = tables
            .accounts
            .values()
            .filter(|a| a.user_id == owner_id)
            .collect();
        Ok(page(rows, offset, limit))
    }

    async fn update(&self, account_id: i64, changes: UpdateAccount) -> AppResult<Account> {
        let mut tables = self.tables()?;
        let account = tables
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| AppError::not_found("Account", account_id))?;
        changes.apply_to(account);
        Ok(account.clone())
    }

    async fn delete(&self, account_id: i64) -> AppResult<usize> {
        Ok(self.tables()?.remove_account(account_id))
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn create(&self, new_category: NewCategory) -> AppResult<Category> {
        let mut tables = self.tables()?;
        if !tables.users.contains_key(&new_category.user_id) {
            return Err(missing_reference("user_id"));
        }
        if tables.name_taken(&new_category.name, None) {
            return Err(AppError::already_exists("Category", "name", new_category.name));
        }

        let category = Category {
            id: tables.next_id(),
            name: new_category.name,
            color: new_category.color,
            icon: new_category.icon,
            category_type: new_category.category_type,
            user_id: new_category.user_id,
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn find_for_user(
        &self,
        category_id: i64,
        owner_id: i64,
    ) -> AppResult<Option<Category>> {
        Ok(self
            .tables()?
            .categories
            .get(&category_id)
            .filter(|c| c.user_id == owner_id)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        Ok(self
            .tables()?
            .categories
            .values()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn list_for_user(
        &self,
        owner_id: i64,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Category>, i64)> {
        let tables = self.tables()?;
        let rows = tables
            .categories
            .values()
            .filter(|c| c.user_id == owner_id)
            .collect();
        Ok(page(rows, offset, limit))
    }

    async fn update(&self, category_id: i64, changes: UpdateCategory) -> AppResult<Category> {
        let mut tables = self.tables()?;
        if tables.name_taken(&changes.name, Some(category_id)) {
            return Err(AppError::already_exists("Category", "name", changes.name));
        }

        let category = tables
            .categories
            .get_mut(&category_id)
            .ok_or_else(|| AppError::not_found("Category", category_id))?;
        changes.apply_to(category);
        Ok(category.clone())
    }

    async fn delete(&self, category_id: i64) -> AppResult<usize> {
        Ok(self
            .tables()?
            .categories
            .remove(&category_id)
            .map_or(0, |_| 1))
    }
}

#[async_trait]
impl CreditCardRepository for InMemoryStore {
    async fn create(&self, new_card: NewCreditCard) -> AppResult<CreditCard> {
        let mut tables = self.tables()?;
        if !tables.accounts.contains_key(&new_card.account_id) {
            return Err(missing_reference("account_id"));
        }

        let card = CreditCard {
            id: tables.next_id(),
            credit_limit: new_card.credit_limit,
            description: new_card.description,
            brand: new_card.brand,
            closing_day: new_card.closing_day,
            due_date: new_card.due_date,
            archived: false,
            account_id: new_card.account_id,
        };
        tables.credit_cards.insert(card.id, card.clone());
        Ok(card)
    }

    async fn find_for_user(&self, card_id: i64, owner_id: i64) -> AppResult<Option<CreditCard>> {
        let tables = self.tables()?;
        Ok(tables
            .credit_cards
            .get(&card_id)
            .filter(|card| tables.account_owner(card.account_id) == Some(owner_id))
            .cloned())
    }

    async fn list_for_user(
        &self,
        owner_id: i64,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<CreditCard>, i64)> {
        let tables = self.tables()?;
        let rows = tables
            .credit_cards
            .values()
            .filter(|card| tables.account_owner(card.account_id) == Some(owner_id))
            .collect();
        Ok(page(rows, offset, limit))
    }

    async fn update(&self, card_id: i64, changes: UpdateCreditCard) -> AppResult<CreditCard> {
        let mut tables = self.tables()?;
        if let Some(account_id) = changes.account_id {
            if !tables.accounts.contains_key(&account_id) {
                return Err(missing_reference("account_id"));
            }
        }

        let card = tables
            .credit_cards
            .get_mut(&card_id)
            .ok_or_else(|| AppError::not_found("Credit card", card_id))?;
        changes.apply_to(card);
        Ok(card.clone())
    }

    async fn delete(&self, card_id: i64) -> AppResult<usize> {
        Ok(self
            .tables()?
            .credit_cards
            .remove(&card_id)
            .map_or(0, |_| 1))
    }
}
