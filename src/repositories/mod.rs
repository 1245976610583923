//! Repository layer for data access operations.
//!
//! Each entity has an async trait with a PostgreSQL implementation;
//! [`memory::InMemoryStore`] implements all of them without a database.

mod account_repo;
mod category_repo;
mod credit_card_repo;
pub mod memory;
mod user_repo;

pub use account_repo::{AccountRepository, PgAccountRepository};
pub use category_repo::{CategoryRepository, PgCategoryRepository};
pub use credit_card_repo::{CreditCardRepository, PgCreditCardRepository};
pub use user_repo::{PgUserRepository, UserRepository};

use std::sync::Arc;

use crate::db::AsyncDbPool;
use memory::InMemoryStore;

/// Aggregates all repositories behind trait objects.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub credit_cards: Arc<dyn CreditCardRepository>,
}

impl Repositories {
    /// PostgreSQL repositories sharing one pool.
    pub fn postgres(pool: AsyncDbPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            accounts: Arc::new(PgAccountRepository::new(pool.clone())),
            categories: Arc::new(PgCategoryRepository::new(pool.clone())),
            credit_cards: Arc::new(PgCreditCardRepository::new(pool)),
        }
    }

    /// Repositories backed by one fresh [`InMemoryStore`].
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        Self {
            users: Arc::new(store.clone()),
            accounts: Arc::new(store.clone()),
            categories: Arc::new(store.clone()),
            credit_cards: Arc::new(store),
        }
    }
}
